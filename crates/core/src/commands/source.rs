use crate::config::{ServerConfig, SettingsHandle};
use crate::utils::HyphenatedUUID;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityKind {
    Player,
    Other(String),
}

/// A live or stored game entity as reported by a collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityHandle {
    pub uuid: u128,
    pub name: String,
    pub kind: EntityKind,
}

impl EntityHandle {
    pub fn player(uuid: u128, name: impl Into<String>) -> Self {
        Self {
            uuid,
            name: name.into(),
            kind: EntityKind::Player,
        }
    }

    pub fn is_player(&self) -> bool {
        self.kind == EntityKind::Player
    }
}

impl fmt::Display for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, HyphenatedUUID(self.uuid))
    }
}

/// Something a name token may resolve to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub handle: EntityHandle,
    pub online: bool,
    pub nickname: Option<String>,
}

impl Candidate {
    pub fn new(handle: EntityHandle, online: bool) -> Self {
        Self {
            handle,
            online,
            nickname: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.handle.name
    }

    pub fn uuid(&self) -> u128 {
        self.handle.uuid
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandSender {
    Player(EntityHandle),
    Console,
}

impl CommandSender {
    pub fn name(&self) -> &str {
        match self {
            CommandSender::Player(handle) => &handle.name,
            CommandSender::Console => "Console",
        }
    }

    pub fn uuid(&self) -> Option<u128> {
        match self {
            CommandSender::Player(handle) => Some(handle.uuid),
            CommandSender::Console => None,
        }
    }
}

/// The persistent account store. Lookups are case-insensitive.
pub trait AccountStore: Send + Sync {
    fn lookup_by_exact_name(&self, name: &str) -> Option<Candidate>;
    fn lookup_all_by_prefix(&self, prefix: &str) -> Vec<Candidate>;
}

/// The currently connected sessions.
pub trait SessionTable: Send + Sync {
    fn list_connected(&self) -> Vec<Candidate>;

    /// Whether `viewer` may see `candidate` at all (vanish and the like).
    fn is_visible_to(&self, _viewer: &CommandSender, _candidate: &Candidate) -> bool {
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("{0}")]
    InvalidSyntax(String),
}

/// Evaluates `@`-prefixed selectors.
pub trait SelectorEvaluator: Send + Sync {
    fn resolve(
        &self,
        selector: &str,
        sender: &CommandSender,
    ) -> Result<Vec<EntityHandle>, SelectorError>;
}

pub trait PermissionCheck: Send + Sync {
    fn has_permission(&self, sender: &CommandSender, permission: &str) -> bool;
}

/// The collaborators every parse and completion call may consult.
#[derive(Clone)]
pub struct Services {
    pub accounts: Arc<dyn AccountStore>,
    pub sessions: Arc<dyn SessionTable>,
    pub selectors: Arc<dyn SelectorEvaluator>,
    pub permissions: Arc<dyn PermissionCheck>,
    pub settings: SettingsHandle,
}

/// The actor of a single parse, completion or execution.
pub struct CommandSource<'a> {
    sender: CommandSender,
    services: &'a Services,
}

impl<'a> CommandSource<'a> {
    pub fn new(sender: CommandSender, services: &'a Services) -> Self {
        Self { sender, services }
    }

    pub fn console(services: &'a Services) -> Self {
        Self::new(CommandSender::Console, services)
    }

    pub fn sender(&self) -> &CommandSender {
        &self.sender
    }

    pub fn services(&self) -> &'a Services {
        self.services
    }

    /// The configuration as of this call. Never cache the result across calls.
    pub fn settings(&self) -> Arc<ServerConfig> {
        self.services.settings.current()
    }

    pub fn is_console(&self) -> bool {
        matches!(self.sender, CommandSender::Console)
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        if self.is_console() && self.settings().console_bypass_permissions {
            return true;
        }
        self.services
            .permissions
            .has_permission(&self.sender, permission)
    }

    /// Whether the session gate lets this actor see `candidate`.
    pub fn can_see(&self, candidate: &Candidate) -> bool {
        let settings = self.settings();
        if self.has_permission(&settings.see_hidden_permission) {
            return true;
        }
        self.services.sessions.is_visible_to(&self.sender, candidate)
    }

    pub fn is_sender(&self, candidate: &Candidate) -> bool {
        self.sender.uuid() == Some(candidate.uuid())
    }

    /// The sender as a resolution candidate, if it is a player.
    pub fn sender_candidate(&self) -> Option<Candidate> {
        let CommandSender::Player(handle) = &self.sender else {
            return None;
        };
        let session = self
            .services
            .sessions
            .list_connected()
            .into_iter()
            .find(|candidate| candidate.uuid() == handle.uuid);
        Some(session.unwrap_or_else(|| Candidate::new(handle.clone(), true)))
    }
}
