use crate::commands::{
    context::ExecutionContext,
    error::{CommandError, InternalError, ParseError},
    registry::{CommandRegistry, split_label},
    source::CommandSource,
};
use tracing::{debug, error};

impl CommandRegistry {
    /// Parses and runs `command_line`, returning the replies for the sender.
    ///
    /// User mistakes end up in the replies: a failed parse produces exactly
    /// one line holding the error and the command's usage. Only registration
    /// bugs are returned as errors.
    pub fn execute<'a>(
        &'a self,
        source: CommandSource<'a>,
        command_line: &str,
    ) -> Result<Vec<String>, InternalError> {
        let command_line = command_line.trim();
        if command_line.is_empty() {
            return Ok(Vec::new());
        }

        let (command, arguments) = match self.parse(&source, command_line) {
            Ok(parsed) => parsed,
            Err(err) => return Ok(vec![self.parse_error_message(&source, command_line, &err)]),
        };

        let Some(executor) = command.executor() else {
            return Err(InternalError::Message {
                message: format!("command '{}' has no executor", command.name()),
            });
        };

        let mut ctx = ExecutionContext::new(source, self, arguments);
        match executor(&mut ctx) {
            Ok(()) => {}
            Err(CommandError::Parse(err)) => ctx.error(&err.to_string()),
            Err(CommandError::Runtime(err)) => ctx.error(&err.to_string()),
            Err(CommandError::Internal(err)) => {
                error!("Error executing '{}': {}", command_line, err);
                return Err(err);
            }
        }
        Ok(ctx.into_replies())
    }

    pub(super) fn expand_custom_aliases(&self, command_line: &str) -> String {
        let command_line = command_line.trim_start();
        let command_line = command_line.strip_prefix('/').unwrap_or(command_line);
        let (label, rest) = split_label(command_line);

        for (alias, expansion) in self.get_custom_aliases() {
            if !alias.eq_ignore_ascii_case(label) {
                continue;
            }
            let expanded = if expansion.contains("{}") {
                expansion.replace("{}", rest)
            } else {
                format!("{} {}", expansion, rest)
            };
            debug!("Expanded alias '{}' to '{}'", label, expanded);
            return expanded;
        }

        command_line.to_string()
    }

    fn parse_error_message(
        &self,
        source: &CommandSource<'_>,
        command_line: &str,
        err: &ParseError,
    ) -> String {
        let expanded = self.expand_custom_aliases(command_line);
        let (label, _) = split_label(&expanded);
        match self.get(label) {
            Some(command) if command.can_use(source) => {
                format!("&c{} &6Usage: &e{}", err, command.usage(source))
            }
            Some(_) => format!("&c{err}"),
            None => format!("&c{err}. Run &e/help&c for a list of commands."),
        }
    }
}
