//! Behavior of the wrapping [`Node`] variants.
//!
//! A combinator only ever catches the errors it documents catching. Every
//! other failure of the wrapped node propagates unchanged.

use crate::commands::{
    complete::{complete_token, merge},
    context::ParseContext,
    cursor::TokenCursor,
    error::ParseResult,
    node::{Node, Predicate, Supplier, ValuePredicate},
    source::CommandSource,
    value::Value,
};

pub(super) fn parse_optional(
    child: &Node,
    default: Option<&Value>,
    source: &CommandSource<'_>,
    cursor: &mut TokenCursor<'_>,
    ctx: &mut ParseContext,
) -> ParseResult<()> {
    let state = cursor.snapshot();
    match child.parse(source, cursor, ctx) {
        Ok(()) => Ok(()),
        // Nothing was consumed, so the input simply wasn't meant for this node
        Err(_) if cursor.snapshot() == state => {
            if let (Some(default), Some(key)) = (default, child.key()) {
                ctx.bind(key, default.clone());
            }
            Ok(())
        }
        Err(err) => Err(err),
    }
}

pub(super) fn parse_arity(
    min: usize,
    max: usize,
    child: &Node,
    source: &CommandSource<'_>,
    cursor: &mut TokenCursor<'_>,
    ctx: &mut ParseContext,
) -> ParseResult<()> {
    if (min..=max).contains(&cursor.token_count()) {
        child.parse(source, cursor, ctx)
    } else {
        Ok(())
    }
}

pub(super) fn complete_arity(
    min: usize,
    max: usize,
    child: &Node,
    source: &CommandSource<'_>,
    cursor: &mut TokenCursor<'_>,
    ctx: &ParseContext,
) -> Vec<String> {
    if (min..=max).contains(&cursor.token_count()) {
        child.complete(source, cursor, ctx)
    } else {
        Vec::new()
    }
}

pub(super) fn select_branch<'n>(
    predicate: Predicate,
    when_true: &'n Node,
    when_false: &'n Node,
    source: &CommandSource<'_>,
    ctx: &ParseContext,
) -> &'n Node {
    if predicate(source, ctx) {
        when_true
    } else {
        when_false
    }
}

pub(super) fn parse_modifiers(
    child: &Node,
    applies: ValuePredicate,
    flags: &[String],
    source: &CommandSource<'_>,
    cursor: &mut TokenCursor<'_>,
    ctx: &mut ParseContext,
) -> ParseResult<()> {
    let key = child.key();
    let before = key.map_or(0, |key| ctx.values(key).len());
    child.parse(source, cursor, ctx)?;

    let bound = key.map_or(&[][..], |key| &ctx.values(key)[before..]);
    if applies(source, bound) {
        for flag in flags {
            ctx.set_modifier(flag.clone());
        }
    }
    Ok(())
}

pub(super) fn complete_suggest(
    child: &Node,
    (min, max): (usize, usize),
    permission: Option<&str>,
    supplier: Supplier,
    source: &CommandSource<'_>,
    cursor: &mut TokenCursor<'_>,
    ctx: &ParseContext,
) -> Vec<String> {
    let suggestions = child.complete(source, cursor, ctx);
    let in_window = (min..=max).contains(&cursor.index());
    let permitted = permission.map_or(true, |permission| source.has_permission(permission));
    if !in_window || !permitted {
        return suggestions;
    }
    merge([suggestions, complete_token(cursor, supplier(source))])
}

/// `<player>` becomes `[player]`.
pub(super) fn optional_usage(usage: &str) -> String {
    if usage.is_empty() || usage.starts_with('[') {
        return usage.to_string();
    }
    let inner = usage
        .strip_prefix('<')
        .and_then(|usage| usage.strip_suffix('>'))
        .unwrap_or(usage);
    format!("[{inner}]")
}

/// Whether any entity the wrapped node bound is not the sender.
pub fn targets_other(source: &CommandSource<'_>, values: &[Value]) -> bool {
    values
        .iter()
        .filter_map(Value::entity)
        .any(|candidate| !source.is_sender(candidate))
}

pub fn sender_is_console(source: &CommandSource<'_>, _: &ParseContext) -> bool {
    source.is_console()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{
        argument::ArgumentType,
        context::SKIP_COST,
        entity::EntityArgument,
        error::ParseError,
        testing::TestContext,
    };

    fn macros(_: &CommandSource<'_>) -> Vec<String> {
        vec!["{player}".to_string(), "{world}".to_string()]
    }

    #[test]
    fn optional_absorbs_failures_without_consumption() {
        let test = TestContext::new();
        let source = test.console();
        let node = Node::argument("amount", ArgumentType::integer(1, 64)).optional();

        let mut ctx = ParseContext::new();
        let mut cursor = TokenCursor::new("");
        assert_eq!(node.parse(&source, &mut cursor, &mut ctx), Ok(()));
        assert!(!ctx.contains("amount"));

        let mut cursor = TokenCursor::new("lots");
        assert_eq!(
            node.parse(&source, &mut cursor, &mut ctx),
            Err(ParseError::malformed("lots", "integer"))
        );
    }

    #[test]
    fn optional_binds_its_default() {
        let test = TestContext::new();
        let source = test.console();
        let node =
            Node::argument("amount", ArgumentType::integer(1, 64)).or_default(Value::Integer(1));

        let mut ctx = ParseContext::new();
        node.parse(&source, &mut TokenCursor::new(""), &mut ctx).unwrap();
        assert_eq!(ctx.values("amount"), &[Value::Integer(1)]);
    }

    #[test]
    fn arity_gate_counts_the_whole_line() {
        let test = TestContext::new();
        let source = test.console();
        let node = Node::argument("first", ArgumentType::string()).when_arity(2, 2);

        let mut ctx = ParseContext::new();
        let mut cursor = TokenCursor::new("only");
        node.parse(&source, &mut cursor, &mut ctx).unwrap();
        assert_eq!(cursor.index(), 0);
        assert!(ctx.is_empty());

        let mut cursor = TokenCursor::new("one two");
        node.parse(&source, &mut cursor, &mut ctx).unwrap();
        assert_eq!(ctx.get_string("first").unwrap(), "one");
    }

    #[test]
    fn modifiers_follow_the_bound_value() {
        let test = TestContext::new();
        test.join("alice", None);
        test.join("bob", None);
        let node = EntityArgument::player("player")
            .node()
            .modifiers_when(targets_other, &[SKIP_COST]);

        let alice = test.player("alice");
        let mut ctx = ParseContext::new();
        node.parse(&alice, &mut TokenCursor::new("alice"), &mut ctx).unwrap();
        assert!(!ctx.modifier(SKIP_COST));

        let mut ctx = ParseContext::new();
        node.parse(&alice, &mut TokenCursor::new("bob"), &mut ctx).unwrap();
        assert!(ctx.modifier(SKIP_COST));
    }

    #[test]
    fn branch_follows_the_sender() {
        let test = TestContext::new();
        test.join("alice", None);
        let node = Node::branch(
            sender_is_console,
            EntityArgument::player("player"),
            EntityArgument::player("player").or_self(),
        );

        let console = test.console();
        assert_eq!(node.usage(&console), "<player>");
        assert_eq!(
            node.parse(&console, &mut TokenCursor::new(""), &mut ParseContext::new()),
            Err(ParseError::NoMoreTokens)
        );

        let alice = test.player("alice");
        let mut ctx = ParseContext::new();
        node.parse(&alice, &mut TokenCursor::new(""), &mut ctx).unwrap();
        assert_eq!(ctx.get_entity("player").unwrap().name(), "alice");
    }

    #[test]
    fn suggestions_are_windowed_and_gated() {
        let test = TestContext::new();
        let node = Node::argument("message", ArgumentType::greedy_string())
            .suggest_with_permission(0, usize::MAX, "lodestone.broadcast.macros", macros);

        let console = test.console();
        let mut cursor = TokenCursor::new("hello {w");
        assert_eq!(
            node.complete(&console, &mut cursor, &ParseContext::new()),
            vec!["{world}"]
        );

        test.join("alice", None);
        let alice = test.player("alice");
        let mut cursor = TokenCursor::new("hello {w");
        assert!(node
            .complete(&alice, &mut cursor, &ParseContext::new())
            .is_empty());

        let windowed =
            Node::argument("message", ArgumentType::greedy_string()).suggest(1, 1, macros);
        let mut cursor = TokenCursor::new("{");
        assert!(windowed
            .complete(&console, &mut cursor, &ParseContext::new())
            .is_empty());

        // A trailing space starts the second token, which is inside the window
        let mut cursor = TokenCursor::for_completion("hello ");
        assert_eq!(
            windowed.complete(&console, &mut cursor, &ParseContext::new()),
            vec!["{player}", "{world}"]
        );
        let mut cursor = TokenCursor::for_completion("hello there ");
        assert!(windowed
            .complete(&console, &mut cursor, &ParseContext::new())
            .is_empty());
    }

    #[test]
    fn usage_overrides_and_silence() {
        let test = TestContext::new();
        let source = test.console();
        let hidden = Node::argument("internal", ArgumentType::string()).with_usage("");
        assert_eq!(hidden.usage(&source), "");

        let silent = Node::argument("flag", ArgumentType::boolean()).silent();
        let mut cursor = TokenCursor::new("t");
        assert!(silent
            .complete(&source, &mut cursor, &ParseContext::new())
            .is_empty());
        assert_eq!(silent.usage(&source), "<flag>");

        assert_eq!(optional_usage("<player>"), "[player]");
        assert_eq!(optional_usage("[player]"), "[player]");
        assert_eq!(optional_usage(""), "");
    }
}
