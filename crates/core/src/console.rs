//! The interactive console: executes command lines, prints completions and
//! manages the in-memory player directory.

use crate::commands::{self, CommandRegistry, CommandSender, CommandSource, Services};
use crate::config::SettingsHandle;
use crate::directory::PlayerDirectory;
use crate::permissions::Permissions;
use anyhow::Result;
use lodestone_text::strip_formatting;
use std::io::{BufRead, Write};
use std::sync::Arc;
use tracing::{info, warn};

pub struct Console {
    directory: Arc<PlayerDirectory>,
    permissions: Arc<Permissions>,
    services: Services,
    registry: CommandRegistry,
    sender: CommandSender,
}

impl Console {
    pub fn new(settings: SettingsHandle) -> Self {
        let directory = Arc::new(PlayerDirectory::new());
        let permissions = Arc::new(Permissions::new(settings.clone()));
        let registry = commands::create_registry(&settings.current());
        let services = Services {
            accounts: directory.clone(),
            sessions: directory.clone(),
            selectors: directory.clone(),
            permissions: permissions.clone(),
            settings,
        };
        Self {
            directory,
            permissions,
            services,
            registry,
            sender: CommandSender::Console,
        }
    }

    pub fn directory(&self) -> &PlayerDirectory {
        &self.directory
    }

    pub fn sender(&self) -> &CommandSender {
        &self.sender
    }

    /// Handles one input line and returns what should be printed.
    pub fn handle_line(&mut self, line: &str) -> Vec<String> {
        if let Some(partial) = line.trim_start().strip_prefix('?') {
            let source = CommandSource::new(self.sender.clone(), &self.services);
            let suggestions = self.registry.complete(&source, partial);
            if suggestions.is_empty() {
                return vec!["(no suggestions)".to_string()];
            }
            return vec![suggestions.join("  ")];
        }

        let line = line.trim();
        if line.is_empty() {
            return Vec::new();
        }
        if let Some(command) = line.strip_prefix(':') {
            return vec![self.handle_console_command(command)];
        }

        let source = CommandSource::new(self.sender.clone(), &self.services);
        match self.registry.execute(source, line) {
            Ok(replies) => replies.iter().map(|reply| strip_formatting(reply)).collect(),
            Err(_) => vec!["An internal error occurred while running that command.".to_string()],
        }
    }

    fn handle_console_command(&mut self, command: &str) -> String {
        let mut words = command.split_whitespace();
        match (words.next(), words.next(), words.next()) {
            (Some("join"), Some(name), nickname) => {
                let handle = self.directory.connect(name);
                self.directory.set_nickname(name, nickname);
                match nickname {
                    Some(nickname) => {
                        format!("{} joined as {}", handle.name, strip_formatting(nickname))
                    }
                    None => format!("{} joined", handle.name),
                }
            }
            (Some("leave"), Some(name), None) => {
                if self.directory.disconnect(name) {
                    format!("{name} left")
                } else {
                    format!("{name} is not connected")
                }
            }
            (Some("vanish"), Some(name), None) => {
                let vanished = !self.directory.is_vanished(name);
                if self.directory.set_vanished(name, vanished) {
                    format!("{name} is now {}", if vanished { "hidden" } else { "visible" })
                } else {
                    format!("{name} is not connected")
                }
            }
            (Some("as"), Some(name), None) => {
                self.sender = if name.eq_ignore_ascii_case("console") {
                    CommandSender::Console
                } else {
                    CommandSender::Player(self.directory.add_account(name))
                };
                format!("Now acting as {}", self.sender.name())
            }
            (Some("grant"), Some(name), Some(node)) => {
                self.permissions.grant(name, node);
                format!("Granted {node} to {name}")
            }
            (Some("reload"), None, None) => match self.reload() {
                Ok(()) => "Reloaded configuration".to_string(),
                Err(err) => {
                    warn!("Failed to reload configuration: {:#}", err);
                    format!("Reload failed: {err:#}")
                }
            },
            _ => "Console commands: :join <name> [nickname], :leave <name>, :vanish <name>, \
                  :as <name|console>, :grant <name> <node>, :reload"
                .to_string(),
        }
    }

    fn reload(&mut self) -> Result<()> {
        self.services.settings.reload()?;
        self.permissions.reload();
        self.registry = commands::create_registry(&self.services.settings.current());
        Ok(())
    }

    /// Reads lines from `input` until it ends.
    pub fn run(&mut self, input: impl BufRead, mut output: impl Write) -> Result<()> {
        info!("Console ready, type :help for console commands or ?<line> to complete");
        for line in input.lines() {
            for reply in self.handle_line(&line?) {
                writeln!(output, "{reply}")?;
            }
            output.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;

    fn console() -> Console {
        Console::new(SettingsHandle::new(ServerConfig::default()))
    }

    #[test]
    fn manages_the_directory() {
        let mut console = console();
        assert_eq!(console.handle_line(":join alice &bAl"), vec!["alice joined as Al"]);
        assert!(console.directory().is_online("alice"));
        assert_eq!(console.handle_line(":vanish alice"), vec!["alice is now hidden"]);
        assert_eq!(console.handle_line(":leave alice"), vec!["alice left"]);
        assert_eq!(console.handle_line(":leave alice"), vec!["alice is not connected"]);
        assert_eq!(console.handle_line(":as bob"), vec!["Now acting as bob"]);
        assert_eq!(console.sender().name(), "bob");
        assert!(console.handle_line(":reload")[0].starts_with("Reload failed"));
    }

    #[test]
    fn executes_and_completes() {
        let mut console = console();
        console.handle_line(":join alice");
        assert_eq!(
            console.handle_line("kit starter alice"),
            vec![
                "Kit starter given to alice.",
                "No cost, cooldown or warmup applies to kits given to others."
            ]
        );
        assert_eq!(console.handle_line("?ki"), vec!["kit"]);
        assert_eq!(console.handle_line("?kit st"), vec!["starter"]);
        assert_eq!(console.handle_line("?kit purple "), vec!["(no suggestions)"]);
        assert!(console.handle_line("   ").is_empty());
    }
}
