mod core;

use crate::commands::{
    argument::ArgumentType,
    command::Command,
    context::ExecutionContext,
    error::CommandResult,
    node::Node,
    registry::CommandRegistry,
    usage,
};

pub fn register_commands(registry: &mut CommandRegistry) {
    core::register_commands(registry);

    register_help(registry);
}

fn register_help(registry: &mut CommandRegistry) {
    fn exec_help_command(ctx: &mut ExecutionContext<'_>) -> CommandResult<()> {
        let registry = ctx.registry();

        if !ctx.args().contains("command") {
            let commands = usage::generate_command_list(registry, ctx.source());
            ctx.reply("&6Run &e/help <command>&6 for more information.");
            ctx.reply("&6Available commands:");
            for command in commands {
                ctx.reply(format!(" &e{}", command));
            }
            return Ok(());
        }

        let label = ctx.args().get_string("command")?;
        let label = label.trim_start_matches('/');
        match registry.get(label) {
            Some(command) if command.can_use(ctx.source()) => {
                let usage = command.usage(ctx.source());
                ctx.reply(format!("&6Usage: &e{}", usage));
                if let Some(description) = command.get_description() {
                    ctx.reply(format!("&7{}", description));
                }
                let flag_details = usage::generate_flag_details(command);
                if !flag_details.is_empty() {
                    ctx.reply("&6Available flags:");
                    for flag_detail in flag_details {
                        ctx.reply(format!(" &e{flag_detail}"));
                    }
                }
            }
            _ => ctx.error(&format!("Command not found: {}", label)),
        }
        Ok(())
    }

    registry.register(
        Command::new("help")
            .description("Lists commands or shows how to use one")
            .require_permission("lodestone.help")
            .then(Node::argument("command", ArgumentType::string()).optional())
            .executes(exec_help_command),
    );
}
