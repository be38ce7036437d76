use crate::commands::{
    argument::FlagSpec,
    complete::complete_token,
    cursor::TokenCursor,
    error::{ParseError, ParseResult},
    value::Value,
};
use crate::utils::HyphenatedUUID;
use rustc_hash::FxHashSet;

const TIMESPAN_UNITS: [(&str, u64); 7] = [
    ("y", 365 * 86_400),
    ("mo", 30 * 86_400),
    ("w", 7 * 86_400),
    ("d", 86_400),
    ("h", 3_600),
    ("m", 60),
    ("s", 1),
];

#[derive(Debug, PartialEq, Eq)]
pub enum TimespanError {
    Malformed,
    Overflow,
}

/// Parses `1h30m`-style timespans into seconds.
pub fn parse_timespan(input: &str) -> Result<u64, TimespanError> {
    let input = input.to_lowercase();
    let mut chars = input.chars().peekable();
    let mut total: u64 = 0;

    if chars.peek().is_none() {
        return Err(TimespanError::Malformed);
    }

    while chars.peek().is_some() {
        let mut digits = String::new();
        while let Some(c) = chars.next_if(char::is_ascii_digit) {
            digits.push(c);
        }
        let mut unit = String::new();
        while let Some(c) = chars.next_if(char::is_ascii_alphabetic) {
            unit.push(c);
        }
        if digits.is_empty() || unit.is_empty() {
            return Err(TimespanError::Malformed);
        }

        let (_, scale) = TIMESPAN_UNITS
            .iter()
            .find(|(name, _)| *name == unit)
            .ok_or(TimespanError::Malformed)?;
        let amount: u64 = digits.parse().map_err(|_| TimespanError::Overflow)?;
        total = amount
            .checked_mul(*scale)
            .and_then(|seconds| total.checked_add(seconds))
            .ok_or(TimespanError::Overflow)?;
    }

    Ok(total)
}

pub fn parse_string(cursor: &mut TokenCursor<'_>) -> ParseResult<Value> {
    Ok(Value::String(cursor.next()?))
}

pub fn parse_greedy_string(cursor: &mut TokenCursor<'_>) -> ParseResult<Value> {
    Ok(Value::GreedyString(cursor.take_rest()?))
}

pub fn parse_integer(cursor: &mut TokenCursor<'_>, min: i64, max: i64) -> ParseResult<Value> {
    let token = cursor.next()?;
    let value = token
        .parse::<i64>()
        .map_err(|_| ParseError::malformed(&token, "integer"))?;
    if !(min..=max).contains(&value) {
        return Err(ParseError::out_of_range(token, min, max));
    }
    Ok(Value::Integer(value))
}

pub fn parse_float(cursor: &mut TokenCursor<'_>, min: f64, max: f64) -> ParseResult<Value> {
    let token = cursor.next()?;
    let value = token
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| ParseError::malformed(&token, "number"))?;
    if !(min..=max).contains(&value) {
        return Err(ParseError::out_of_range(token, min, max));
    }
    Ok(Value::Float(value))
}

pub fn parse_boolean(cursor: &mut TokenCursor<'_>) -> ParseResult<Value> {
    let token = cursor.next()?;

    let value = match token.to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => true,
        "false" | "no" | "0" | "off" => false,
        _ => return Err(ParseError::malformed(token, "boolean")),
    };

    Ok(Value::Boolean(value))
}

pub fn parse_duration(cursor: &mut TokenCursor<'_>) -> ParseResult<Value> {
    let token = cursor.next()?;
    match parse_timespan(&token) {
        Ok(seconds) => Ok(Value::Duration(seconds)),
        Err(TimespanError::Malformed) => Err(ParseError::malformed(token, "timespan")),
        Err(TimespanError::Overflow) => Err(ParseError::out_of_range(token, "0s", u64::MAX)),
    }
}

pub fn parse_uuid(cursor: &mut TokenCursor<'_>) -> ParseResult<Value> {
    let token = cursor.next()?;
    let HyphenatedUUID(uuid) = token
        .parse()
        .map_err(|_| ParseError::malformed(&token, "UUID"))?;
    Ok(Value::Uuid(uuid))
}

/// Consumes tokens for as long as they look like flags.
pub fn parse_flags(cursor: &mut TokenCursor<'_>, flags_specs: &[FlagSpec]) -> ParseResult<Value> {
    let mut flags = FxHashSet::default();

    while cursor.peek().is_ok_and(|token| token.starts_with('-')) {
        let token = cursor.next()?;
        if let Some(long_name) = token.strip_prefix("--") {
            let spec = flags_specs
                .iter()
                .find(|s| s.long == long_name)
                .ok_or_else(|| ParseError::malformed(&token, "flag"))?;
            flags.insert(spec.long.clone());
        } else {
            let flag_chars = &token[1..];
            if flag_chars.is_empty() {
                return Err(ParseError::malformed(token, "flag"));
            }
            for c in flag_chars.chars() {
                let spec = flags_specs
                    .iter()
                    .find(|s| s.short == Some(c))
                    .ok_or_else(|| ParseError::malformed(&token, "flag"))?;
                flags.insert(spec.long.clone());
            }
        }
    }

    Ok(Value::Flags(flags))
}

pub fn complete_integer(cursor: &TokenCursor<'_>, min: i64, max: i64) -> Vec<String> {
    if max.saturating_sub(min) >= 10 {
        return Vec::new();
    }
    complete_token(cursor, (min..=max).map(|value| value.to_string()))
}

pub fn complete_boolean(cursor: &TokenCursor<'_>) -> Vec<String> {
    complete_token(cursor, ["true", "false"])
}

pub fn complete_duration(cursor: &TokenCursor<'_>) -> Vec<String> {
    match cursor.peek() {
        Ok(token) if !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()) => {
            TIMESPAN_UNITS
                .iter()
                .rev()
                .map(|(unit, _)| format!("{token}{unit}"))
                .collect()
        }
        Ok(_) => Vec::new(),
        Err(_) => vec!["1h".to_string(), "1d".to_string(), "1w".to_string()],
    }
}

pub fn complete_flags(cursor: &mut TokenCursor<'_>, flags_specs: &[FlagSpec]) -> Vec<String> {
    cursor.seek_last();
    let candidates = flags_specs.iter().flat_map(|spec| {
        let long = format!("--{}", spec.long);
        let short = spec.short.map(|c| format!("-{c}"));
        std::iter::once(long).chain(short)
    });
    complete_token(cursor, candidates)
}
