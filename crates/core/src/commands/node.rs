use crate::commands::{
    argument::ArgumentType,
    choice::ChoiceArgument,
    combinator,
    complete::complete_token,
    context::ParseContext,
    cursor::TokenCursor,
    entity::EntityArgument,
    error::{ParseError, ParseResult},
    source::CommandSource,
    value::Value,
};

/// Branch selector. Must not depend on anything but its inputs, so that
/// parsing and completion agree on the branch taken.
pub type Predicate = fn(&CommandSource<'_>, &ParseContext) -> bool;
/// Checked against the values a wrapped node just bound.
pub type ValuePredicate = fn(&CommandSource<'_>, &[Value]) -> bool;
pub type Supplier = fn(&CommandSource<'_>) -> Vec<String>;

/// One declared parameter of a command.
///
/// Leaves consume tokens and bind values; the remaining variants wrap a
/// child node and change a single aspect of its behavior. A node tree is
/// built once at registration and never mutated afterwards.
#[derive(Clone)]
pub enum Node {
    Literal {
        name: String,
        aliases: Vec<String>,
    },
    Argument {
        key: String,
        arg_type: ArgumentType,
    },
    Choice(ChoiceArgument),
    Entity(EntityArgument),
    Optional {
        child: Box<Node>,
        default: Option<Value>,
    },
    Arity {
        min: usize,
        max: usize,
        child: Box<Node>,
    },
    Branch {
        predicate: Predicate,
        when_true: Box<Node>,
        when_false: Box<Node>,
    },
    Modifiers {
        child: Box<Node>,
        applies: ValuePredicate,
        flags: Vec<String>,
    },
    Usage {
        child: Box<Node>,
        text: String,
    },
    Suggest {
        child: Box<Node>,
        min: usize,
        max: usize,
        permission: Option<String>,
        supplier: Supplier,
    },
    Silent(Box<Node>),
}

impl Node {
    pub fn literal(name: impl Into<String>) -> Self {
        Node::Literal {
            name: name.into(),
            aliases: Vec::new(),
        }
    }

    pub fn argument(key: impl Into<String>, arg_type: impl Into<ArgumentType>) -> Self {
        Node::Argument {
            key: key.into(),
            arg_type: arg_type.into(),
        }
    }

    pub fn branch(
        predicate: Predicate,
        when_true: impl Into<Node>,
        when_false: impl Into<Node>,
    ) -> Self {
        Node::Branch {
            predicate,
            when_true: Box::new(when_true.into()),
            when_false: Box::new(when_false.into()),
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        let Node::Literal { aliases, .. } = &mut self else {
            panic!("Can not create alias for non-literal argument nodes")
        };
        aliases.push(alias.into());
        self
    }

    /// Succeeds without a binding when the wrapped node fails before
    /// consuming anything.
    pub fn optional(self) -> Self {
        Node::Optional {
            child: Box::new(self),
            default: None,
        }
    }

    /// Like [`Node::optional`], binding `default` under this node's key.
    pub fn or_default(self, default: Value) -> Self {
        Node::Optional {
            child: Box::new(self),
            default: Some(default),
        }
    }

    /// Only active when the argument line holds between `min` and `max`
    /// tokens, both inclusive.
    pub fn when_arity(self, min: usize, max: usize) -> Self {
        Node::Arity {
            min,
            max,
            child: Box::new(self),
        }
    }

    pub fn modifiers_when(self, applies: ValuePredicate, flags: &[&str]) -> Self {
        Node::Modifiers {
            child: Box::new(self),
            applies,
            flags: flags.iter().map(|flag| flag.to_string()).collect(),
        }
    }

    /// Replaces the usage text. An empty text hides the node from usage.
    pub fn with_usage(self, text: impl Into<String>) -> Self {
        Node::Usage {
            child: Box::new(self),
            text: text.into(),
        }
    }

    /// Appends `supplier`'s values to the completions while the token under
    /// completion has an index in `min..=max`.
    pub fn suggest(self, min: usize, max: usize, supplier: Supplier) -> Self {
        Node::Suggest {
            child: Box::new(self),
            min,
            max,
            permission: None,
            supplier,
        }
    }

    pub fn suggest_with_permission(
        self,
        min: usize,
        max: usize,
        permission: impl Into<String>,
        supplier: Supplier,
    ) -> Self {
        Node::Suggest {
            child: Box::new(self),
            min,
            max,
            permission: Some(permission.into()),
            supplier,
        }
    }

    pub fn silent(self) -> Self {
        Node::Silent(Box::new(self))
    }

    /// The key this node binds under, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            Node::Literal { .. } => None,
            Node::Argument { key, .. } => Some(key),
            Node::Choice(choice) => Some(choice.key()),
            Node::Entity(entity) => Some(entity.key()),
            Node::Branch { when_true, .. } => when_true.key(),
            Node::Optional { child, .. }
            | Node::Arity { child, .. }
            | Node::Modifiers { child, .. }
            | Node::Usage { child, .. }
            | Node::Suggest { child, .. }
            | Node::Silent(child) => child.key(),
        }
    }

    /// Whether the node consumes every token left on the line.
    pub(super) fn is_greedy(&self) -> bool {
        match self {
            Node::Argument { arg_type, .. } => arg_type.is_greedy(),
            Node::Literal { .. } | Node::Choice(_) | Node::Entity(_) => false,
            Node::Branch {
                when_true,
                when_false,
                ..
            } => when_true.is_greedy() && when_false.is_greedy(),
            Node::Optional { child, .. }
            | Node::Arity { child, .. }
            | Node::Modifiers { child, .. }
            | Node::Usage { child, .. }
            | Node::Suggest { child, .. }
            | Node::Silent(child) => child.is_greedy(),
        }
    }

    pub fn parse(
        &self,
        source: &CommandSource<'_>,
        cursor: &mut TokenCursor<'_>,
        ctx: &mut ParseContext,
    ) -> ParseResult<()> {
        match self {
            Node::Literal { name, aliases } => parse_literal(name, aliases, cursor),
            Node::Argument { key, arg_type } => {
                let value = arg_type.parse(cursor)?;
                ctx.bind(key.clone(), value);
                Ok(())
            }
            Node::Choice(choice) => choice.parse(source, cursor, ctx),
            Node::Entity(entity) => entity.parse(source, cursor, ctx),
            Node::Optional { child, default } => {
                combinator::parse_optional(child, default.as_ref(), source, cursor, ctx)
            }
            Node::Arity { min, max, child } => {
                combinator::parse_arity(*min, *max, child, source, cursor, ctx)
            }
            Node::Branch {
                predicate,
                when_true,
                when_false,
            } => combinator::select_branch(*predicate, when_true, when_false, source, ctx)
                .parse(source, cursor, ctx),
            Node::Modifiers {
                child,
                applies,
                flags,
            } => combinator::parse_modifiers(child, *applies, flags, source, cursor, ctx),
            Node::Usage { child, .. } | Node::Suggest { child, .. } | Node::Silent(child) => {
                child.parse(source, cursor, ctx)
            }
        }
    }

    /// Suggestions for the token under the cursor. Never fails.
    pub fn complete(
        &self,
        source: &CommandSource<'_>,
        cursor: &mut TokenCursor<'_>,
        ctx: &ParseContext,
    ) -> Vec<String> {
        match self {
            Node::Literal { name, .. } => complete_token(cursor, [name.as_str()]),
            Node::Argument { arg_type, .. } => arg_type.complete(cursor),
            Node::Choice(choice) => choice.complete(source, cursor),
            Node::Entity(entity) => entity.complete(source, cursor),
            Node::Arity { min, max, child } => {
                combinator::complete_arity(*min, *max, child, source, cursor, ctx)
            }
            Node::Branch {
                predicate,
                when_true,
                when_false,
            } => combinator::select_branch(*predicate, when_true, when_false, source, ctx)
                .complete(source, cursor, ctx),
            Node::Suggest {
                child,
                min,
                max,
                permission,
                supplier,
            } => combinator::complete_suggest(
                child,
                (*min, *max),
                permission.as_deref(),
                *supplier,
                source,
                cursor,
                ctx,
            ),
            Node::Silent(_) => Vec::new(),
            Node::Optional { child, .. }
            | Node::Modifiers { child, .. }
            | Node::Usage { child, .. } => child.complete(source, cursor, ctx),
        }
    }

    pub fn usage(&self, source: &CommandSource<'_>) -> String {
        match self {
            Node::Literal { name, .. } => name.clone(),
            Node::Argument { key, arg_type } => match arg_type {
                ArgumentType::GreedyString => format!("<{key}...>"),
                ArgumentType::Flags { flags } => flags
                    .iter()
                    .map(|spec| match spec.short() {
                        Some(short) => format!("[-{short}|--{}]", spec.long()),
                        None => format!("[--{}]", spec.long()),
                    })
                    .collect::<Vec<_>>()
                    .join(" "),
                _ => format!("<{key}>"),
            },
            Node::Choice(choice) => choice.usage(),
            Node::Entity(entity) => entity.usage(),
            Node::Optional { child, .. } => combinator::optional_usage(&child.usage(source)),
            Node::Branch {
                predicate,
                when_true,
                when_false,
            } => combinator::select_branch(
                *predicate,
                when_true,
                when_false,
                source,
                &ParseContext::new(),
            )
            .usage(source),
            Node::Usage { text, .. } => text.clone(),
            Node::Arity { child, .. }
            | Node::Modifiers { child, .. }
            | Node::Suggest { child, .. }
            | Node::Silent(child) => child.usage(source),
        }
    }
}

fn parse_literal(name: &str, aliases: &[String], cursor: &mut TokenCursor<'_>) -> ParseResult<()> {
    let token = cursor.peek()?;
    let matches = std::iter::once(name)
        .chain(aliases.iter().map(String::as_str))
        .any(|candidate| candidate.eq_ignore_ascii_case(&token));
    if !matches {
        return Err(ParseError::malformed(token, format!("'{name}'")));
    }
    cursor.next()?;
    Ok(())
}

impl From<ChoiceArgument> for Node {
    fn from(choice: ChoiceArgument) -> Self {
        Node::Choice(choice)
    }
}

impl From<EntityArgument> for Node {
    fn from(entity: EntityArgument) -> Self {
        Node::Entity(entity)
    }
}

impl ChoiceArgument {
    pub fn node(self) -> Node {
        Node::Choice(self)
    }
}

impl EntityArgument {
    pub fn node(self) -> Node {
        Node::Entity(self)
    }
}
