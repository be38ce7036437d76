use crate::commands::{
    command::Command,
    complete::{sort_ignore_case, starts_with_ignore_case},
    context::ParseContext,
    error::{ParseError, ParseResult},
    source::CommandSource,
};
use tracing::warn;

/// Splits `label args...`, dropping a leading `/`.
pub(super) fn split_label(line: &str) -> (&str, &str) {
    let line = line.trim_start();
    let line = line.strip_prefix('/').unwrap_or(line);
    line.split_once(char::is_whitespace).unwrap_or((line, ""))
}

#[derive(Default)]
pub struct CommandRegistry {
    commands: Vec<Command>,
    custom_aliases: Vec<(String, String)>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, command: Command) {
        if let Some(label) = std::iter::once(command.name())
            .chain(command.aliases().iter().map(String::as_str))
            .find(|label| self.get(label).is_some())
        {
            warn!("Command label '{}' is registered twice", label);
        }
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Looks a command up by name or alias.
    pub fn get(&self, label: &str) -> Option<&Command> {
        self.commands
            .iter()
            .find(|command| command.matches_label(label))
    }

    /// `prefix` is replaced by `replacement` when it is the first word of a
    /// line. A `{}` in the replacement marks where the rest of the line goes,
    /// otherwise the rest is appended.
    pub fn add_custom_alias(&mut self, prefix: impl Into<String>, replacement: impl Into<String>) {
        let prefix = prefix.into();
        if prefix.is_empty() || prefix.contains(char::is_whitespace) {
            warn!("Ignoring custom alias '{}': it must be a single word", prefix);
            return;
        }
        self.custom_aliases.push((prefix, replacement.into()));
    }

    pub fn get_custom_aliases(&self) -> &[(String, String)] {
        &self.custom_aliases
    }

    /// Parses a full command line, label included.
    pub fn parse(
        &self,
        source: &CommandSource<'_>,
        line: &str,
    ) -> ParseResult<(&Command, ParseContext)> {
        let line = self.expand_custom_aliases(line);
        let (label, args) = split_label(&line);
        let command = self
            .get(label)
            .ok_or_else(|| ParseError::UnknownCommand {
                name: label.to_string(),
            })?;
        let ctx = command.parse(source, args)?;
        Ok((command, ctx))
    }

    /// Suggestions for the last, possibly partial, token of `line`. The
    /// first token completes to the labels the actor may use.
    pub fn complete(&self, source: &CommandSource<'_>, line: &str) -> Vec<String> {
        let trimmed = line.trim_start();
        let trimmed = trimmed.strip_prefix('/').unwrap_or(trimmed);
        if !trimmed.contains(char::is_whitespace) {
            let mut labels: Vec<String> = self
                .commands
                .iter()
                .filter(|command| command.can_use(source))
                .flat_map(|command| {
                    std::iter::once(command.name())
                        .chain(command.aliases().iter().map(String::as_str))
                })
                .filter(|label| starts_with_ignore_case(label, trimmed))
                .map(str::to_string)
                .collect();
            sort_ignore_case(&mut labels);
            return labels;
        }

        let (label, args) = split_label(trimmed);
        match self.get(label) {
            Some(command) => command.complete(source, args),
            None => Vec::new(),
        }
    }

    pub fn usage(&self, source: &CommandSource<'_>, label: &str) -> Option<String> {
        self.get(label).map(|command| command.usage(source))
    }
}
