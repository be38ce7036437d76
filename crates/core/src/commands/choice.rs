use crate::commands::{
    complete::{complete_token, sort_ignore_case, starts_with_ignore_case},
    context::ParseContext,
    cursor::TokenCursor,
    error::{ParseError, ParseResult},
    source::CommandSource,
    value::Value,
};

/// Supplies names at call time, so configuration reloads are always seen.
pub type NameSupplier = fn(&CommandSource<'_>) -> Vec<String>;

/// Resolves a token against a named set such as kits or jails.
#[derive(Clone)]
pub struct ChoiceArgument {
    key: String,
    kind: String,
    names: NameSupplier,
    allow_prefix: bool,
}

impl ChoiceArgument {
    pub fn new(key: impl Into<String>, kind: impl Into<String>, names: NameSupplier) -> Self {
        Self {
            key: key.into(),
            kind: kind.into(),
            names,
            allow_prefix: true,
        }
    }

    pub fn exact_only(mut self) -> Self {
        self.allow_prefix = false;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub(super) fn parse(
        &self,
        source: &CommandSource<'_>,
        cursor: &mut TokenCursor<'_>,
        ctx: &mut ParseContext,
    ) -> ParseResult<()> {
        let token = cursor.next()?;
        let name = resolve_name(&self.kind, &token, (self.names)(source), self.allow_prefix)?;
        ctx.bind(self.key.clone(), Value::Choice(name));
        Ok(())
    }

    pub(super) fn complete(
        &self,
        source: &CommandSource<'_>,
        cursor: &TokenCursor<'_>,
    ) -> Vec<String> {
        let mut names = complete_token(cursor, (self.names)(source));
        sort_ignore_case(&mut names);
        names
    }

    pub(super) fn usage(&self) -> String {
        format!("<{}>", self.key)
    }
}

/// An exact case-insensitive match always wins over prefix matches. Otherwise
/// a single prefix match is accepted when `allow_prefix` is set.
pub fn resolve_name(
    kind: &str,
    token: &str,
    names: Vec<String>,
    allow_prefix: bool,
) -> ParseResult<String> {
    let lowered = token.to_lowercase();
    if let Some(exact) = names.iter().find(|name| name.to_lowercase() == lowered) {
        return Ok(exact.clone());
    }
    if !allow_prefix {
        return Err(ParseError::no_such(kind, token));
    }

    let mut matches: Vec<String> = names
        .into_iter()
        .filter(|name| starts_with_ignore_case(name, token))
        .collect();
    match matches.len() {
        0 => Err(ParseError::no_such(kind, token)),
        1 => Ok(matches.remove(0)),
        _ => {
            sort_ignore_case(&mut matches);
            Err(ParseError::ambiguous(kind, token, matches))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kits() -> Vec<String> {
        vec!["starter".into(), "starterkit".into(), "tools".into()]
    }

    #[test]
    fn exact_match_beats_prefix_matches() {
        assert_eq!(resolve_name("kit", "starter", kits(), true).unwrap(), "starter");
        assert_eq!(resolve_name("kit", "STARTER", kits(), true).unwrap(), "starter");
    }

    #[test]
    fn unique_prefix_is_accepted() {
        assert_eq!(resolve_name("kit", "to", kits(), true).unwrap(), "tools");
        assert_eq!(
            resolve_name("kit", "to", kits(), false),
            Err(ParseError::no_such("kit", "to"))
        );
    }

    #[test]
    fn several_prefix_matches_are_ambiguous() {
        assert_eq!(
            resolve_name("kit", "sta", kits(), true),
            Err(ParseError::ambiguous(
                "kit",
                "sta",
                vec!["starter".into(), "starterkit".into()]
            ))
        );
        assert_eq!(
            resolve_name("kit", "armor", kits(), true),
            Err(ParseError::no_such("kit", "armor"))
        );
    }
}
