use crate::commands::{
    complete::merge,
    context::{ExecutionContext, ParseContext},
    cursor::TokenCursor,
    error::{CommandResult, ParseError, ParseResult},
    node::Node,
    source::CommandSource,
};

pub type Executor = fn(&mut ExecutionContext<'_>) -> CommandResult<()>;

/// A registered command: a label plus an ordered list of argument nodes.
#[derive(Clone)]
pub struct Command {
    name: String,
    aliases: Vec<String>,
    description: Option<String>,
    permissions: Vec<String>,
    nodes: Vec<Node>,
    executor: Option<Executor>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            description: None,
            permissions: Vec::new(),
            nodes: Vec::new(),
            executor: None,
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn require_permission(mut self, permission: impl Into<String>) -> Self {
        self.permissions.push(permission.into());
        self
    }

    pub fn then(mut self, node: impl Into<Node>) -> Self {
        self.nodes.push(node.into());
        self
    }

    pub fn executes(mut self, executor: Executor) -> Self {
        self.executor = Some(executor);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn get_description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub(super) fn executor(&self) -> Option<Executor> {
        self.executor
    }

    pub fn matches_label(&self, label: &str) -> bool {
        std::iter::once(&self.name)
            .chain(&self.aliases)
            .any(|name| name.eq_ignore_ascii_case(label))
    }

    pub fn can_use(&self, source: &CommandSource<'_>) -> bool {
        self.permissions
            .iter()
            .all(|permission| source.has_permission(permission))
    }

    /// Runs every node in order over `args`. The first failure aborts the
    /// parse; input left over after the last node is an error.
    pub fn parse(&self, source: &CommandSource<'_>, args: &str) -> ParseResult<ParseContext> {
        if let Some(missing) = self
            .permissions
            .iter()
            .find(|permission| !source.has_permission(permission))
        {
            return Err(ParseError::permission_denied(missing));
        }

        let mut cursor = TokenCursor::new(args);
        let mut ctx = ParseContext::new();
        for node in &self.nodes {
            node.parse(source, &mut cursor, &mut ctx)?;
        }

        if cursor.has_next() {
            return Err(ParseError::TooManyArguments {
                remaining: cursor.remaining_raw().trim().to_string(),
            });
        }
        Ok(ctx)
    }

    /// Suggestions for the last token of `args`, which may be partial or
    /// empty.
    ///
    /// Nodes before the token are parsed so that their bindings are visible
    /// to later nodes. The node whose turn it is at the token completes it. A
    /// node that is satisfied without consuming anything there lets the
    /// following node suggest as well.
    pub fn complete(&self, source: &CommandSource<'_>, args: &str) -> Vec<String> {
        if !self.can_use(source) {
            return Vec::new();
        }

        let mut cursor = TokenCursor::for_completion(args);
        let target = cursor.completion_offset();
        let mut ctx = ParseContext::new();
        let mut suggestions = Vec::new();

        for node in &self.nodes {
            let state = cursor.snapshot();

            if cursor.next_token_start() >= target {
                let offered = node.complete(source, &mut cursor.clone(), &ctx);
                suggestions = merge([suggestions, offered]);

                let passes = node.parse(source, &mut cursor, &mut ctx).is_ok()
                    && cursor.snapshot() == state;
                if !passes {
                    return suggestions;
                }
                continue;
            }

            let parsed = node.parse(source, &mut cursor, &mut ctx);
            // A greedy node that ran to the end would also take the pending token
            let swallowed = parsed.is_ok() && node.is_greedy() && !cursor.has_next();
            if cursor.offset() > target || swallowed {
                // The node reached into the token being completed
                cursor.restore(state);
                let offered = node.complete(source, &mut cursor, &ctx);
                return merge([suggestions, offered]);
            }
            if parsed.is_err() {
                return suggestions;
            }
        }

        suggestions
    }

    /// `/name <arg> [optional]`
    pub fn usage(&self, source: &CommandSource<'_>) -> String {
        std::iter::once(format!("/{}", self.name))
            .chain(
                self.nodes
                    .iter()
                    .map(|node| node.usage(source))
                    .filter(|usage| !usage.is_empty()),
            )
            .collect::<Vec<_>>()
            .join(" ")
    }
}
