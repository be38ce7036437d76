mod argument;
mod argument_parser;
mod builtin;
mod choice;
mod combinator;
mod command;
pub mod complete;
mod context;
mod cursor;
mod entity;
mod error;
mod executor;
mod node;
mod registry;
mod source;
pub mod usage;
mod value;

pub use argument::{ArgumentType, ArgumentTypeFlagBuilder, FlagSpec};
pub use argument_parser::{TimespanError, parse_timespan};
pub use choice::{ChoiceArgument, NameSupplier, resolve_name};
pub use combinator::{sender_is_console, targets_other};
pub use command::{Command, Executor};
pub use context::{ExecutionContext, ParseContext, SKIP_COOLDOWN, SKIP_COST, SKIP_WARMUP};
pub use cursor::{CursorState, TokenCursor};
pub use entity::{
    CandidateFilter, EntityArgument, EntityConstraint, Multiplicity, any_candidate, not_sender,
    online_only, tie_break,
};
pub use error::{
    CommandError, CommandResult, InternalError, ParseError, ParseResult, RuntimeError,
};
pub use node::{Node, Predicate, Supplier, ValuePredicate};
pub use registry::CommandRegistry;
pub use source::{
    AccountStore, Candidate, CommandSender, CommandSource, EntityHandle, EntityKind,
    PermissionCheck, SelectorError, SelectorEvaluator, Services, SessionTable,
};
pub use value::Value;

use crate::config::ServerConfig;

/// A registry holding every built-in command plus the custom aliases of
/// `config`.
pub fn create_registry(config: &ServerConfig) -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    builtin::register_commands(&mut registry);
    for (alias, replacement) in &config.command_aliases {
        registry.add_custom_alias(alias.trim(), replacement.trim());
    }
    registry
}
