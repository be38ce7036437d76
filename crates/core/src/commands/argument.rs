use super::argument_parser::*;
use crate::commands::cursor::TokenCursor;
use crate::commands::error::ParseResult;
use crate::commands::value::Value;

/// Primitive value arguments: one token (or the rest of the line) turned into
/// a [`Value`].
#[derive(Debug, Clone)]
pub enum ArgumentType {
    String,
    GreedyString,
    Integer { min: i64, max: i64 },
    Float { min: f64, max: f64 },
    Boolean,
    Duration,
    Uuid,
    Flags { flags: Vec<FlagSpec> },
}

#[derive(Default, Clone)]
pub struct ArgumentTypeFlagBuilder {
    flags: Vec<FlagSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlagSpec {
    pub(super) short: Option<char>,
    pub(super) long: String,
    pub(super) description: Option<String>,
}

pub struct OptionChar(Option<char>);

pub struct OptionString(Option<String>);

impl ArgumentType {
    pub(super) fn parse(&self, cursor: &mut TokenCursor<'_>) -> ParseResult<Value> {
        match self {
            ArgumentType::String => parse_string(cursor),
            ArgumentType::GreedyString => parse_greedy_string(cursor),
            ArgumentType::Integer { min, max } => parse_integer(cursor, *min, *max),
            ArgumentType::Float { min, max } => parse_float(cursor, *min, *max),
            ArgumentType::Boolean => parse_boolean(cursor),
            ArgumentType::Duration => parse_duration(cursor),
            ArgumentType::Uuid => parse_uuid(cursor),
            ArgumentType::Flags { flags: specs } => parse_flags(cursor, specs),
        }
    }

    pub(super) fn complete(&self, cursor: &mut TokenCursor<'_>) -> Vec<String> {
        match self {
            ArgumentType::GreedyString => {
                cursor.seek_last();
                Vec::new()
            }
            ArgumentType::Integer { min, max } => complete_integer(cursor, *min, *max),
            ArgumentType::Boolean => complete_boolean(cursor),
            ArgumentType::Duration => complete_duration(cursor),
            ArgumentType::Flags { flags: specs } => complete_flags(cursor, specs),
            ArgumentType::String | ArgumentType::Float { .. } | ArgumentType::Uuid => Vec::new(),
        }
    }

    /// Whether the argument keeps reading tokens up to the end of the line.
    pub(super) fn is_greedy(&self) -> bool {
        matches!(self, ArgumentType::GreedyString | ArgumentType::Flags { .. })
    }

    pub fn flag_specs(&self) -> &[FlagSpec] {
        match self {
            ArgumentType::Flags { flags } => flags,
            _ => &[],
        }
    }

    pub fn string() -> Self {
        ArgumentType::String
    }

    pub fn greedy_string() -> Self {
        ArgumentType::GreedyString
    }

    pub fn integer(min: i64, max: i64) -> Self {
        ArgumentType::Integer { min, max }
    }

    pub fn float(min: f64, max: f64) -> Self {
        ArgumentType::Float { min, max }
    }

    pub fn boolean() -> Self {
        ArgumentType::Boolean
    }

    pub fn duration() -> Self {
        ArgumentType::Duration
    }

    pub fn uuid() -> Self {
        ArgumentType::Uuid
    }

    pub fn flags() -> ArgumentTypeFlagBuilder {
        ArgumentTypeFlagBuilder::default()
    }
}

impl FlagSpec {
    pub fn short(&self) -> Option<char> {
        self.short
    }

    pub fn long(&self) -> &str {
        &self.long
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl ArgumentTypeFlagBuilder {
    pub fn add(
        mut self,
        short: impl Into<OptionChar>,
        long: &str,
        description: impl Into<OptionString>,
    ) -> Self {
        self.flags.push(FlagSpec {
            short: short.into().0,
            long: long.to_string(),
            description: description.into().0,
        });
        self
    }

    pub fn build(self) -> ArgumentType {
        ArgumentType::Flags { flags: self.flags }
    }
}

impl From<ArgumentTypeFlagBuilder> for ArgumentType {
    fn from(value: ArgumentTypeFlagBuilder) -> Self {
        value.build()
    }
}

impl From<char> for OptionChar {
    fn from(c: char) -> Self {
        OptionChar(Some(c))
    }
}

impl From<Option<char>> for OptionChar {
    fn from(o: Option<char>) -> Self {
        OptionChar(o)
    }
}

impl From<&str> for OptionString {
    fn from(s: &str) -> Self {
        OptionString(Some(s.to_string()))
    }
}

impl From<Option<&str>> for OptionString {
    fn from(o: Option<&str>) -> Self {
        OptionString(o.map(|s| s.to_string()))
    }
}
