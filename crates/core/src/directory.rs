//! In-memory accounts and sessions, used by the console front end and tests.

use crate::commands::{
    AccountStore, Candidate, CommandSender, EntityHandle, SelectorError, SelectorEvaluator,
    SessionTable,
};
use crate::utils::offline_uuid;
use indexmap::IndexMap;
use rand::RngExt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

#[derive(Debug, Clone)]
struct Session {
    handle: EntityHandle,
    nickname: Option<String>,
    vanished: bool,
}

#[derive(Default)]
struct DirectoryState {
    /// Keyed by lowercase name, in registration order.
    accounts: IndexMap<String, EntityHandle>,
    /// Keyed by uuid, in join order.
    sessions: IndexMap<u128, Session>,
}

impl DirectoryState {
    fn candidate(&self, handle: &EntityHandle) -> Candidate {
        match self.sessions.get(&handle.uuid) {
            Some(session) => Candidate {
                handle: handle.clone(),
                online: true,
                nickname: session.nickname.clone(),
            },
            None => Candidate::new(handle.clone(), false),
        }
    }

    fn connected(&self) -> impl Iterator<Item = &EntityHandle> {
        self.sessions.values().map(|session| &session.handle)
    }
}

#[derive(Default)]
pub struct PlayerDirectory {
    state: RwLock<DirectoryState>,
}

impl PlayerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, DirectoryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, DirectoryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers an offline-mode account, or returns the existing one.
    pub fn add_account(&self, name: &str) -> EntityHandle {
        self.write()
            .accounts
            .entry(name.to_lowercase())
            .or_insert_with(|| EntityHandle::player(offline_uuid(name), name))
            .clone()
    }

    pub fn account(&self, name: &str) -> Option<EntityHandle> {
        self.read().accounts.get(&name.to_lowercase()).cloned()
    }

    /// Opens a session for `name`, creating the account on first join.
    pub fn connect(&self, name: &str) -> EntityHandle {
        let handle = self.add_account(name);
        let mut state = self.write();
        state.sessions.entry(handle.uuid).or_insert_with(|| Session {
            handle: handle.clone(),
            nickname: None,
            vanished: false,
        });
        debug!("{} connected", handle);
        handle
    }

    pub fn disconnect(&self, name: &str) -> bool {
        let mut state = self.write();
        let Some(uuid) = state.accounts.get(&name.to_lowercase()).map(|h| h.uuid) else {
            return false;
        };
        state.sessions.shift_remove(&uuid).is_some()
    }

    pub fn is_online(&self, name: &str) -> bool {
        let state = self.read();
        state
            .accounts
            .get(&name.to_lowercase())
            .is_some_and(|handle| state.sessions.contains_key(&handle.uuid))
    }

    fn with_session(&self, name: &str, f: impl FnOnce(&mut Session)) -> bool {
        let mut state = self.write();
        let Some(uuid) = state.accounts.get(&name.to_lowercase()).map(|h| h.uuid) else {
            return false;
        };
        match state.sessions.get_mut(&uuid) {
            Some(session) => {
                f(session);
                true
            }
            None => false,
        }
    }

    /// Sets or clears the nickname of a connected player.
    pub fn set_nickname(&self, name: &str, nickname: Option<&str>) -> bool {
        self.with_session(name, |session| {
            session.nickname = nickname.map(str::to_string);
        })
    }

    pub fn set_vanished(&self, name: &str, vanished: bool) -> bool {
        self.with_session(name, |session| session.vanished = vanished)
    }

    pub fn is_vanished(&self, name: &str) -> bool {
        let mut vanished = false;
        self.with_session(name, |session| vanished = session.vanished);
        vanished
    }
}

impl AccountStore for PlayerDirectory {
    fn lookup_by_exact_name(&self, name: &str) -> Option<Candidate> {
        let state = self.read();
        let handle = state.accounts.get(&name.to_lowercase())?;
        Some(state.candidate(handle))
    }

    fn lookup_all_by_prefix(&self, prefix: &str) -> Vec<Candidate> {
        let prefix = prefix.to_lowercase();
        let state = self.read();
        state
            .accounts
            .iter()
            .filter(|(key, _)| key.starts_with(&prefix))
            .map(|(_, handle)| state.candidate(handle))
            .collect()
    }
}

impl SessionTable for PlayerDirectory {
    fn list_connected(&self) -> Vec<Candidate> {
        let state = self.read();
        state
            .connected()
            .map(|handle| state.candidate(handle))
            .collect()
    }

    /// Vanished players are only visible to the console and to themselves.
    fn is_visible_to(&self, viewer: &CommandSender, candidate: &Candidate) -> bool {
        let state = self.read();
        let vanished = state
            .sessions
            .get(&candidate.uuid())
            .is_some_and(|session| session.vanished);
        match viewer {
            _ if !vanished => true,
            CommandSender::Console => true,
            CommandSender::Player(handle) => handle.uuid == candidate.uuid(),
        }
    }
}

impl SelectorEvaluator for PlayerDirectory {
    /// Understands the bare `@a`, `@p`, `@r` and `@s` selectors.
    fn resolve(
        &self,
        selector: &str,
        sender: &CommandSender,
    ) -> Result<Vec<EntityHandle>, SelectorError> {
        if selector.contains('[') {
            return Err(SelectorError::InvalidSyntax(
                "selector arguments are not supported".to_string(),
            ));
        }

        let state = self.read();
        let connected: Vec<EntityHandle> = state.connected().cloned().collect();
        let own = sender
            .uuid()
            .and_then(|uuid| connected.iter().find(|handle| handle.uuid == uuid))
            .cloned();

        match selector {
            "@a" => Ok(connected),
            // Without positions the nearest player is the sender, if any
            "@p" => Ok(own.or_else(|| connected.first().cloned()).into_iter().collect()),
            "@r" => {
                if connected.is_empty() {
                    return Ok(Vec::new());
                }
                let mut rng = rand::rng();
                let picked = rng.random_range(0..connected.len());
                Ok(vec![connected[picked].clone()])
            }
            "@s" => Ok(own.into_iter().collect()),
            _ => Err(SelectorError::InvalidSyntax(format!(
                "unknown selector '{selector}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accounts_and_sessions() {
        let directory = PlayerDirectory::new();
        directory.add_account("Alex");
        let alice = directory.connect("alice");
        directory.set_nickname("alice", Some("&aAlpha"));

        assert_eq!(directory.lookup_by_exact_name("ALEX").unwrap().name(), "Alex");
        assert!(!directory.lookup_by_exact_name("alex").unwrap().online);
        assert_eq!(directory.lookup_all_by_prefix("al").len(), 2);

        let connected = directory.list_connected();
        assert_eq!(connected.len(), 1);
        assert_eq!(connected[0].handle, alice);
        assert_eq!(connected[0].nickname.as_deref(), Some("&aAlpha"));

        assert!(directory.disconnect("Alice"));
        assert!(!directory.disconnect("alice"));
        assert!(directory.list_connected().is_empty());
        assert!(!directory.set_nickname("alice", None));
    }

    #[test]
    fn vanished_sessions_are_hidden() {
        let directory = PlayerDirectory::new();
        let alice = directory.connect("alice");
        let bob = directory.connect("bob");
        directory.set_vanished("alice", true);

        let candidate = directory.lookup_by_exact_name("alice").unwrap();
        assert!(directory.is_visible_to(&CommandSender::Console, &candidate));
        assert!(directory.is_visible_to(&CommandSender::Player(alice), &candidate));
        assert!(!directory.is_visible_to(&CommandSender::Player(bob), &candidate));
    }

    #[test]
    fn selectors() {
        let directory = PlayerDirectory::new();
        let alice = directory.connect("alice");
        let bob = directory.connect("bob");
        let console = CommandSender::Console;
        let as_bob = CommandSender::Player(bob.clone());

        assert_eq!(directory.resolve("@a", &console).unwrap(), vec![alice.clone(), bob.clone()]);
        assert_eq!(directory.resolve("@s", &as_bob).unwrap(), vec![bob.clone()]);
        assert!(directory.resolve("@s", &console).unwrap().is_empty());
        assert_eq!(directory.resolve("@p", &console).unwrap(), vec![alice]);
        assert_eq!(directory.resolve("@r", &console).unwrap().len(), 1);
        assert!(matches!(
            directory.resolve("@a[distance=..5]", &console),
            Err(SelectorError::InvalidSyntax(_))
        ));
        assert!(directory.resolve("@e", &console).is_err());
    }
}
