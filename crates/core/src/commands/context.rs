use crate::commands::error::{CommandResult, InternalError, RuntimeError};
use crate::commands::registry::CommandRegistry;
use crate::commands::source::{Candidate, CommandSender, CommandSource, EntityHandle};
use crate::commands::value::Value;
use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};

pub const SKIP_COST: &str = "skip-cost";
pub const SKIP_COOLDOWN: &str = "skip-cooldown";
pub const SKIP_WARMUP: &str = "skip-warmup";

/// Everything bound while parsing one command line.
///
/// A key may be bound any number of times; bindings accumulate in insertion
/// order and are never overwritten. Modifier flags live in a separate side
/// channel written by combinators.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseContext {
    bindings: IndexMap<String, Vec<Value>>,
    modifiers: FxHashMap<String, bool>,
}

impl ParseContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, key: impl Into<String>, value: Value) {
        self.bindings.entry(key.into()).or_default().push(value);
    }

    pub fn values(&self, key: &str) -> &[Value] {
        self.bindings.get(key).map_or(&[], Vec::as_slice)
    }

    pub fn contains(&self, key: &str) -> bool {
        !self.values(key).is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn set_modifier(&mut self, name: impl Into<String>) {
        self.modifiers.insert(name.into(), true);
    }

    pub fn modifier(&self, name: &str) -> bool {
        self.modifiers.get(name).copied().unwrap_or(false)
    }

    pub fn modifiers(&self) -> impl Iterator<Item = (&str, bool)> {
        self.modifiers.iter().map(|(name, set)| (name.as_str(), *set))
    }

    fn get(&self, name: &str) -> CommandResult<&Value> {
        self.values(name).first().ok_or_else(|| {
            InternalError::MissingArgument {
                name: name.to_string(),
            }
            .into()
        })
    }

    pub fn get_string(&self, name: &str) -> CommandResult<String> {
        Ok(self.get(name)?.as_string()?.clone())
    }

    pub fn get_greedy(&self, name: &str) -> CommandResult<String> {
        Ok(self.get(name)?.as_greedy()?.clone())
    }

    pub fn get_integer(&self, name: &str) -> CommandResult<i64> {
        self.get(name)?.as_integer()
    }

    pub fn get_float(&self, name: &str) -> CommandResult<f64> {
        self.get(name)?.as_float()
    }

    pub fn get_boolean(&self, name: &str) -> CommandResult<bool> {
        self.get(name)?.as_boolean()
    }

    pub fn get_duration(&self, name: &str) -> CommandResult<u64> {
        self.get(name)?.as_duration()
    }

    pub fn get_uuid(&self, name: &str) -> CommandResult<u128> {
        self.get(name)?.as_uuid()
    }

    pub fn get_choice(&self, name: &str) -> CommandResult<String> {
        Ok(self.get(name)?.as_choice()?.clone())
    }

    pub fn get_entity(&self, name: &str) -> CommandResult<&Candidate> {
        self.get(name)?.as_entity()
    }

    pub fn get_entities(&self, name: &str) -> CommandResult<Vec<&Candidate>> {
        self.values(name).iter().map(Value::as_entity).collect()
    }

    pub fn get_flags(&self, name: &str) -> CommandResult<FxHashSet<String>> {
        Ok(self.get(name)?.as_flags()?.clone())
    }
}

/// What an executor sees: who ran the command, what was parsed, and where
/// replies go.
pub struct ExecutionContext<'a> {
    source: CommandSource<'a>,
    registry: &'a CommandRegistry,
    arguments: ParseContext,
    replies: Vec<String>,
}

impl<'a> ExecutionContext<'a> {
    pub(super) fn new(
        source: CommandSource<'a>,
        registry: &'a CommandRegistry,
        arguments: ParseContext,
    ) -> Self {
        Self {
            source,
            registry,
            arguments,
            replies: Vec::new(),
        }
    }

    pub fn args(&self) -> &ParseContext {
        &self.arguments
    }

    pub fn source(&self) -> &CommandSource<'a> {
        &self.source
    }

    pub fn sender(&self) -> &CommandSender {
        self.source.sender()
    }

    pub fn registry(&self) -> &'a CommandRegistry {
        self.registry
    }

    /// Queues a reply. `&` formatting codes are kept.
    pub fn reply(&mut self, message: impl Into<String>) {
        self.replies.push(message.into());
    }

    pub fn error(&mut self, message: &str) {
        self.replies.push(format!("&c{message}"));
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.source.has_permission(permission)
    }

    pub fn require_permission(&self, permission: &str) -> CommandResult<()> {
        if !self.has_permission(permission) {
            return Err(RuntimeError::PermissionDenied {
                permission: permission.to_string(),
            }
            .into());
        }
        Ok(())
    }

    pub fn player(&self) -> CommandResult<&EntityHandle> {
        match self.source.sender() {
            CommandSender::Player(handle) => Ok(handle),
            CommandSender::Console => Err(RuntimeError::PlayerOnly.into()),
        }
    }

    /// The first candidate bound under `name`, or the sender when nothing
    /// was bound.
    pub fn target_or_sender(&self, name: &str) -> CommandResult<Candidate> {
        match self.arguments.values(name).first() {
            Some(value) => Ok(value.as_entity()?.clone()),
            None => self
                .source
                .sender_candidate()
                .ok_or_else(|| RuntimeError::PlayerOnly.into()),
        }
    }

    pub fn into_replies(self) -> Vec<String> {
        self.replies
    }
}
