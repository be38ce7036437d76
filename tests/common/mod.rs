#![allow(dead_code)]

use lodestone_core::commands::{
    self, CommandRegistry, CommandSender, CommandSource, ParseContext, ParseResult, Services,
};
use lodestone_core::config::{ServerConfig, SettingsHandle};
use lodestone_core::directory::PlayerDirectory;
use lodestone_core::permissions::Permissions;
use lodestone_text::strip_formatting;
use std::sync::Arc;

/// An in-memory server: a player directory, the permission table and the
/// built-in command registry, all sharing one configuration.
pub struct TestServer {
    pub directory: Arc<PlayerDirectory>,
    pub permissions: Arc<Permissions>,
    pub services: Services,
    pub registry: CommandRegistry,
}

impl TestServer {
    pub fn new() -> TestServer {
        TestServer::with_config(ServerConfig::default())
    }

    pub fn with_config(config: ServerConfig) -> TestServer {
        let registry = commands::create_registry(&config);
        let settings = SettingsHandle::new(config);
        let directory = Arc::new(PlayerDirectory::new());
        let permissions = Arc::new(Permissions::new(settings.clone()));
        let services = Services {
            accounts: directory.clone(),
            sessions: directory.clone(),
            selectors: directory.clone(),
            permissions: permissions.clone(),
            settings,
        };
        TestServer {
            directory,
            permissions,
            services,
            registry,
        }
    }

    pub fn join(&self, name: &str, nickname: Option<&str>) {
        self.directory.connect(name);
        self.directory.set_nickname(name, nickname);
    }

    pub fn console(&self) -> CommandSource<'_> {
        CommandSource::console(&self.services)
    }

    pub fn player(&self, name: &str) -> CommandSource<'_> {
        let handle = self.directory.add_account(name);
        CommandSource::new(CommandSender::Player(handle), &self.services)
    }

    pub fn parse(&self, source: &CommandSource<'_>, line: &str) -> ParseResult<ParseContext> {
        self.registry.parse(source, line).map(|(_, ctx)| ctx)
    }

    pub fn complete(&self, source: &CommandSource<'_>, line: &str) -> Vec<String> {
        self.registry.complete(source, line)
    }

    /// Runs `line` and returns the replies with formatting removed.
    pub fn run(&self, source: CommandSource<'_>, line: &str) -> Vec<String> {
        self.registry
            .execute(source, line)
            .expect("command raised an internal error")
            .iter()
            .map(|reply| strip_formatting(reply))
            .collect()
    }
}
