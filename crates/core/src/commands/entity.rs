//! Resolution of name tokens to players and other entities.
//!
//! A token is tried against, in order:
//!
//! 1. the selector evaluator, if it starts with `@` (never falls through);
//! 2. the account store, by exact name and then by prefix;
//! 3. the nicknames of connected sessions, if the nickname module is on and
//!    the token did not carry the explicit-player marker (`p:` by default).
//!
//! Wherever several candidates are ranked, connected ones come first and
//! names are compared case-insensitively within each group.

use crate::commands::{
    complete::{cmp_ignore_case, complete_token},
    context::ParseContext,
    cursor::TokenCursor,
    error::{ParseError, ParseResult},
    source::{Candidate, CommandSource, SelectorError},
    value::Value,
};
use itertools::Itertools;
use lodestone_text::{normalize_nickname, strip_formatting};
use std::cmp::Ordering;
use tracing::debug;

/// Caller-supplied visibility rule, checked for every candidate.
pub type CandidateFilter = fn(&CommandSource<'_>, &Candidate) -> bool;

const SELECTOR_HEADS: [&str; 4] = ["@a", "@p", "@r", "@s"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Multiplicity {
    /// Exactly one entity; several matches are an error.
    Single,
    /// Every matching entity, at least one.
    Many,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityConstraint {
    Players,
    Any,
}

/// The ordering used for every ranked candidate list.
pub fn tie_break(a: &Candidate, b: &Candidate) -> Ordering {
    b.online
        .cmp(&a.online)
        .then_with(|| cmp_ignore_case(a.name(), b.name()))
}

pub fn any_candidate(_: &CommandSource<'_>, _: &Candidate) -> bool {
    true
}

pub fn online_only(_: &CommandSource<'_>, candidate: &Candidate) -> bool {
    candidate.online
}

pub fn not_sender(source: &CommandSource<'_>, candidate: &Candidate) -> bool {
    !source.is_sender(candidate)
}

fn strip_marker<'t>(token: &'t str, marker: &str) -> Option<&'t str> {
    if marker.is_empty() {
        return None;
    }
    token
        .get(..marker.len())
        .filter(|head| head.eq_ignore_ascii_case(marker))
        .map(|_| &token[marker.len()..])
}

#[derive(Clone)]
pub struct EntityArgument {
    key: String,
    multiplicity: Multiplicity,
    constraint: EntityConstraint,
    allow_prefix: bool,
    allow_selectors: bool,
    filter: CandidateFilter,
    default_to_sender: bool,
    others_permission: Option<String>,
}

impl EntityArgument {
    /// Resolves to exactly one player.
    pub fn player(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            multiplicity: Multiplicity::Single,
            constraint: EntityConstraint::Players,
            allow_prefix: true,
            allow_selectors: true,
            filter: any_candidate,
            default_to_sender: false,
            others_permission: None,
        }
    }

    /// Resolves to one or more players.
    pub fn players(key: impl Into<String>) -> Self {
        Self {
            multiplicity: Multiplicity::Many,
            ..Self::player(key)
        }
    }

    /// Selector results are not limited to players.
    pub fn any_entity(mut self) -> Self {
        self.constraint = EntityConstraint::Any;
        self
    }

    /// Selector results that are not players are dropped. This is the default.
    pub fn players_only(mut self) -> Self {
        self.constraint = EntityConstraint::Players;
        self
    }

    pub fn exact_only(mut self) -> Self {
        self.allow_prefix = false;
        self
    }

    pub fn allow_selectors(mut self, allow: bool) -> Self {
        self.allow_selectors = allow;
        self
    }

    pub fn filter(mut self, filter: CandidateFilter) -> Self {
        self.filter = filter;
        self
    }

    /// With no token left, a player sender resolves to themselves.
    pub fn or_self(mut self) -> Self {
        self.default_to_sender = true;
        self
    }

    /// Targets other than the sender require `permission`.
    pub fn others_permission(mut self, permission: impl Into<String>) -> Self {
        self.others_permission = Some(permission.into());
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn multiplicity(&self) -> Multiplicity {
        self.multiplicity
    }

    fn is_visible(&self, source: &CommandSource<'_>, candidate: &Candidate) -> bool {
        (self.filter)(source, candidate) && source.can_see(candidate)
    }

    pub(super) fn parse(
        &self,
        source: &CommandSource<'_>,
        cursor: &mut TokenCursor<'_>,
        ctx: &mut ParseContext,
    ) -> ParseResult<()> {
        if self.default_to_sender && !cursor.has_next() {
            if let Some(me) = source.sender_candidate() {
                ctx.bind(self.key.clone(), Value::Entity(me));
                return Ok(());
            }
        }

        let token = cursor.next()?;
        let matched = self.resolve(source, &token)?;

        if let Some(permission) = &self.others_permission {
            let targets_other = matched.iter().any(|c| !source.is_sender(c));
            if targets_other && !source.has_permission(permission) {
                return Err(ParseError::permission_denied(permission));
            }
        }

        for candidate in matched {
            ctx.bind(self.key.clone(), Value::Entity(candidate));
        }
        Ok(())
    }

    /// Resolves one token to its ranked matches. The result is never empty.
    pub fn resolve(&self, source: &CommandSource<'_>, token: &str) -> ParseResult<Vec<Candidate>> {
        if self.allow_selectors && token.starts_with('@') {
            return self.resolve_selector(source, token);
        }

        let settings = source.settings();
        if let Some(name) = strip_marker(token, &settings.explicit_player_marker) {
            let found = self.lookup_accounts(source, name);
            return self.finish(name, found);
        }

        let found = self.lookup_accounts(source, token);
        if !found.is_empty() {
            return self.finish(token, found);
        }

        if settings.nicknames_enabled {
            debug!("No account matched '{}', trying nicknames", token);
            let found = self.lookup_nicknames(
                source,
                token,
                &settings.nickname_prefix,
                settings.strict_nicknames,
            );
            return self.finish(token, found);
        }

        Err(ParseError::no_such("player", token))
    }

    fn finish(&self, token: &str, found: Vec<Candidate>) -> ParseResult<Vec<Candidate>> {
        match found.len() {
            0 => Err(ParseError::no_such("player", token)),
            1 => Ok(found),
            _ if self.multiplicity == Multiplicity::Single => Err(ParseError::ambiguous(
                "player",
                token,
                found.iter().map(|c| c.name().to_string()).collect(),
            )),
            _ => Ok(found),
        }
    }

    fn lookup_accounts(&self, source: &CommandSource<'_>, name: &str) -> Vec<Candidate> {
        if name.is_empty() {
            return Vec::new();
        }
        let accounts = &source.services().accounts;

        let exact = accounts
            .lookup_by_exact_name(name)
            .filter(|candidate| self.is_visible(source, candidate));
        if exact.is_some() && self.multiplicity == Multiplicity::Single || !self.allow_prefix {
            return exact.into_iter().collect();
        }

        let mut found: Vec<Candidate> = accounts
            .lookup_all_by_prefix(name)
            .into_iter()
            .filter(|candidate| self.is_visible(source, candidate))
            .collect();
        found.sort_by(tie_break);
        found
    }

    fn lookup_nicknames(
        &self,
        source: &CommandSource<'_>,
        token: &str,
        nickname_prefix: &str,
        strict: bool,
    ) -> Vec<Candidate> {
        let wanted = normalize_nickname(token, nickname_prefix);
        if wanted.is_empty() {
            return Vec::new();
        }

        let by_nickname: Vec<(String, Candidate)> = source
            .services()
            .sessions
            .list_connected()
            .into_iter()
            .filter(|session| session.online)
            .filter_map(|session| {
                let key = normalize_nickname(session.nickname.as_deref()?, nickname_prefix);
                (!key.is_empty()).then_some((key, session))
            })
            .sorted_by(|(a, _), (b, _)| a.cmp(b))
            .collect();

        let exact: Vec<Candidate> = by_nickname
            .iter()
            .filter(|(key, _)| *key == wanted)
            .map(|(_, session)| session.clone())
            .filter(|session| self.is_visible(source, session))
            .collect();
        if !exact.is_empty() || strict {
            return exact;
        }

        by_nickname
            .into_iter()
            .filter(|(key, _)| key.starts_with(&wanted))
            .map(|(_, session)| session)
            .filter(|session| self.is_visible(source, session))
            .collect()
    }

    fn resolve_selector(
        &self,
        source: &CommandSource<'_>,
        selector: &str,
    ) -> ParseResult<Vec<Candidate>> {
        let handles = source
            .services()
            .selectors
            .resolve(selector, source.sender())
            .map_err(|SelectorError::InvalidSyntax(reason)| {
                ParseError::InvalidSelectorSyntax {
                    selector: selector.to_string(),
                    reason,
                }
            })?;

        let mut found: Vec<Candidate> = handles
            .into_iter()
            .filter(|handle| match self.constraint {
                EntityConstraint::Players => handle.is_player(),
                EntityConstraint::Any => true,
            })
            .map(|handle| Candidate::new(handle, true))
            .filter(|candidate| self.is_visible(source, candidate))
            .collect();
        found.sort_by(tie_break);

        match found.len() {
            0 => Err(ParseError::NoSelectorTarget {
                selector: selector.to_string(),
            }),
            1 => Ok(found),
            _ if self.multiplicity == Multiplicity::Single => Err(ParseError::ambiguous(
                "entity",
                selector,
                found.iter().map(|c| c.name().to_string()).collect(),
            )),
            _ => Ok(found),
        }
    }

    pub(super) fn complete(
        &self,
        source: &CommandSource<'_>,
        cursor: &TokenCursor<'_>,
    ) -> Vec<String> {
        let token = cursor.peek().unwrap_or_default();
        if self.allow_selectors && token.starts_with('@') {
            return complete_token(cursor, SELECTOR_HEADS);
        }

        let settings = source.settings();
        // Suggestions keep the marker as it was typed
        let (marker, name) = match strip_marker(&token, &settings.explicit_player_marker) {
            Some(name) => (Some(&token[..token.len() - name.len()]), name),
            None => (None, token.as_str()),
        };

        let mut ranked: Vec<Candidate> = source
            .services()
            .accounts
            .lookup_all_by_prefix(name)
            .into_iter()
            .filter(|candidate| self.is_visible(source, candidate))
            .collect();

        if marker.is_none() && settings.nicknames_enabled {
            let wanted = normalize_nickname(name, &settings.nickname_prefix);
            let nicknamed = source
                .services()
                .sessions
                .list_connected()
                .into_iter()
                .filter(|session| session.online && self.is_visible(source, session))
                .filter_map(|session| {
                    let nickname = session.nickname.as_deref()?;
                    let key = normalize_nickname(nickname, &settings.nickname_prefix);
                    if key.is_empty() || !key.starts_with(&wanted) {
                        return None;
                    }
                    let plain = strip_formatting(nickname);
                    let plain = plain
                        .trim()
                        .strip_prefix(settings.nickname_prefix.as_str())
                        .unwrap_or(plain.trim())
                        .to_string();
                    let mut shown = session.clone();
                    shown.handle.name = plain;
                    Some(shown)
                });
            ranked.extend(nicknamed);
        }

        ranked.sort_by(tie_break);
        ranked
            .into_iter()
            .map(|candidate| candidate.handle.name)
            .unique_by(|name| name.to_lowercase())
            .map(|name| match marker {
                Some(marker) => format!("{marker}{name}"),
                None => name,
            })
            .collect()
    }

    pub(super) fn usage(&self) -> String {
        match self.multiplicity {
            Multiplicity::Single => format!("<{}>", self.key),
            Multiplicity::Many => format!("<{}...>", self.key),
        }
    }
}
