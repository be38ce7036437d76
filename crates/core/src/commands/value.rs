use crate::commands::error::{CommandResult, InternalError};
use crate::commands::source::Candidate;
use rustc_hash::FxHashSet;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    GreedyString(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    /// A timespan in seconds.
    Duration(u64),
    Uuid(u128),
    Choice(String),
    Entity(Candidate),
    Flags(FxHashSet<String>),
}

impl Value {
    fn type_error(&self, expected: &str) -> InternalError {
        InternalError::WrongArgumentType {
            name: format!("{:?}", self),
            expected: expected.to_string(),
        }
    }

    pub fn as_string(&self) -> CommandResult<&String> {
        match self {
            Value::String(s) => Ok(s),
            _ => Err(self.type_error("String").into()),
        }
    }

    pub fn as_greedy(&self) -> CommandResult<&String> {
        match self {
            Value::GreedyString(s) => Ok(s),
            _ => Err(self.type_error("Greedy").into()),
        }
    }

    pub fn as_integer(&self) -> CommandResult<i64> {
        match self {
            Value::Integer(i) => Ok(*i),
            _ => Err(self.type_error("Integer").into()),
        }
    }

    pub fn as_float(&self) -> CommandResult<f64> {
        match self {
            Value::Float(f) => Ok(*f),
            _ => Err(self.type_error("Float").into()),
        }
    }

    pub fn as_boolean(&self) -> CommandResult<bool> {
        match self {
            Value::Boolean(b) => Ok(*b),
            _ => Err(self.type_error("Boolean").into()),
        }
    }

    pub fn as_duration(&self) -> CommandResult<u64> {
        match self {
            Value::Duration(seconds) => Ok(*seconds),
            _ => Err(self.type_error("Duration").into()),
        }
    }

    pub fn as_uuid(&self) -> CommandResult<u128> {
        match self {
            Value::Uuid(uuid) => Ok(*uuid),
            _ => Err(self.type_error("Uuid").into()),
        }
    }

    pub fn as_choice(&self) -> CommandResult<&String> {
        match self {
            Value::Choice(name) => Ok(name),
            _ => Err(self.type_error("Choice").into()),
        }
    }

    pub fn as_entity(&self) -> CommandResult<&Candidate> {
        match self {
            Value::Entity(candidate) => Ok(candidate),
            _ => Err(self.type_error("Entity").into()),
        }
    }

    pub fn as_flags(&self) -> CommandResult<&FxHashSet<String>> {
        match self {
            Value::Flags(f) => Ok(f),
            _ => Err(self.type_error("Flags").into()),
        }
    }

    /// The candidate if this binding is an entity, for predicates that do not
    /// care about other kinds.
    pub fn entity(&self) -> Option<&Candidate> {
        match self {
            Value::Entity(candidate) => Some(candidate),
            _ => None,
        }
    }
}
