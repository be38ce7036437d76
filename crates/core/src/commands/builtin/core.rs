use crate::commands::{
    argument::ArgumentType,
    choice::ChoiceArgument,
    combinator::{sender_is_console, targets_other},
    command::Command,
    context::{ExecutionContext, SKIP_COOLDOWN, SKIP_COST, SKIP_WARMUP},
    entity::{EntityArgument, online_only},
    error::CommandResult,
    node::Node,
    registry::CommandRegistry,
    source::CommandSource,
};
use crate::utils::HyphenatedUUID;
use lodestone_text::strip_formatting;
use std::fmt::Write;

const GAME_MODES: [&str; 4] = ["survival", "creative", "adventure", "spectator"];

fn kit_names(source: &CommandSource<'_>) -> Vec<String> {
    source.settings().kits.clone()
}

fn jail_names(source: &CommandSource<'_>) -> Vec<String> {
    source.settings().jails.clone()
}

fn game_modes(_: &CommandSource<'_>) -> Vec<String> {
    GAME_MODES.iter().map(|mode| mode.to_string()).collect()
}

fn broadcast_macros(_: &CommandSource<'_>) -> Vec<String> {
    vec!["{online}".to_string(), "{sender}".to_string()]
}

fn format_duration(mut seconds: u64) -> String {
    if seconds == 0 {
        return "0s".to_string();
    }
    let mut out = String::new();
    for (unit, scale) in [("d", 86_400), ("h", 3_600), ("m", 60), ("s", 1)] {
        if seconds >= scale {
            let _ = write!(out, "{}{}", seconds / scale, unit);
            seconds %= scale;
        }
    }
    out
}

pub(super) fn register_commands(registry: &mut CommandRegistry) {
    registry.register(
        Command::new("kit")
            .description("Gives a kit to yourself or another player")
            .require_permission("lodestone.kit")
            .then(ChoiceArgument::new("kit", "kit", kit_names))
            .then(
                EntityArgument::player("player")
                    .or_self()
                    .others_permission("lodestone.kit.others")
                    .node()
                    .modifiers_when(targets_other, &[SKIP_COST, SKIP_COOLDOWN, SKIP_WARMUP])
                    .optional(),
            )
            .executes(|ctx| {
                let kit = ctx.args().get_choice("kit")?;
                let target = ctx.target_or_sender("player")?;
                ctx.reply(format!("&6Kit &e{}&6 given to &e{}&6.", kit, target.name()));
                if ctx.args().modifier(SKIP_COST) {
                    ctx.reply("&7No cost, cooldown or warmup applies to kits given to others.");
                }
                Ok(())
            }),
    );

    fn exec_jail(ctx: &mut ExecutionContext<'_>) -> CommandResult<()> {
        let subject = ctx.args().get_entity("subject")?.name().to_string();
        let jail = ctx.args().get_choice("jail")?;

        let mut message = format!("&6Jailed &e{subject}&6 in &e{jail}");
        if ctx.args().contains("duration") {
            let duration = ctx.args().get_duration("duration")?;
            let _ = write!(message, "&6 for &e{}", format_duration(duration));
        }
        if ctx.args().contains("reason") {
            let reason = ctx.args().get_greedy("reason")?;
            let _ = write!(message, "&6: &f{reason}");
        }
        ctx.reply(message);
        Ok(())
    }

    registry.register(
        Command::new("jail")
            .alias("togglejail")
            .description("Sends a player to jail")
            .require_permission("lodestone.jail")
            .then(
                EntityArgument::player("subject")
                    .node()
                    .with_usage("<player>"),
            )
            .then(ChoiceArgument::new("jail", "jail", jail_names))
            .then(Node::argument("duration", ArgumentType::duration()).optional())
            .then(Node::argument("reason", ArgumentType::greedy_string()).optional())
            .executes(exec_jail),
    );

    registry.register(
        Command::new("heal")
            .description("Restores health and hunger")
            .require_permission("lodestone.heal")
            .then(
                EntityArgument::player("player")
                    .filter(online_only)
                    .or_self()
                    .others_permission("lodestone.heal.others")
                    .node()
                    .optional(),
            )
            .executes(|ctx| {
                let target = ctx.target_or_sender("player")?;
                ctx.reply(format!("&6Healed &e{}&6.", target.name()));
                Ok(())
            }),
    );

    registry.register(
        Command::new("tp")
            .alias("teleport")
            .description("Teleports a player to another player")
            .require_permission("lodestone.tp")
            .then(
                EntityArgument::player("player")
                    .filter(online_only)
                    .others_permission("lodestone.tp.others")
                    .node()
                    .when_arity(2, 2)
                    .with_usage("[player]"),
            )
            .then(EntityArgument::player("target").filter(online_only))
            .executes(|ctx| {
                let player = ctx.target_or_sender("player")?;
                let target = ctx.args().get_entity("target")?.name().to_string();
                ctx.reply(format!("&6Teleported &e{}&6 to &e{}&6.", player.name(), target));
                Ok(())
            }),
    );

    registry.register(
        Command::new("gamemode")
            .alias("gm")
            .description("Changes a player's game mode")
            .require_permission("lodestone.gamemode")
            .then(ChoiceArgument::new("mode", "game mode", game_modes))
            .then(Node::branch(
                sender_is_console,
                EntityArgument::player("player").filter(online_only),
                EntityArgument::player("player")
                    .filter(online_only)
                    .or_self()
                    .others_permission("lodestone.gamemode.others")
                    .node()
                    .with_usage("[player]"),
            ))
            .executes(|ctx| {
                let mode = ctx.args().get_choice("mode")?;
                let target = ctx.target_or_sender("player")?;
                ctx.reply(format!(
                    "&6Set game mode of &e{}&6 to &e{}&6.",
                    target.name(),
                    mode
                ));
                Ok(())
            }),
    );

    registry.register(
        Command::new("seen")
            .description("Shows whether a player is online")
            .require_permission("lodestone.seen")
            .then(EntityArgument::player("player").allow_selectors(false))
            .then(Node::argument(
                "flags",
                ArgumentType::flags()
                    .add('u', "uuid", "Also show the player's UUID")
                    .build(),
            ))
            .executes(|ctx| {
                let player = ctx.args().get_entity("player")?.clone();
                let status = if player.online { "&aonline" } else { "&coffline" };
                ctx.reply(format!("&e{}&6 is currently {}&6.", player.name(), status));
                if ctx.args().get_flags("flags")?.contains("uuid") {
                    ctx.reply(format!("&6UUID: &f{}", HyphenatedUUID(player.uuid())));
                }
                Ok(())
            }),
    );

    registry.register(
        Command::new("whois")
            .description("Shows details about one or more players")
            .require_permission("lodestone.whois")
            .then(EntityArgument::players("players").node().silent())
            .executes(|ctx| {
                let lines: Vec<String> = ctx
                    .args()
                    .get_entities("players")?
                    .into_iter()
                    .map(|player| {
                        let nickname = player
                            .nickname
                            .as_deref()
                            .map(strip_formatting)
                            .unwrap_or_else(|| "none".to_string());
                        format!(
                            "&e{}&6: uuid &f{}&6, nickname &f{}&6, {}",
                            player.name(),
                            HyphenatedUUID(player.uuid()),
                            nickname,
                            if player.online { "online" } else { "offline" }
                        )
                    })
                    .collect();
                for line in lines {
                    ctx.reply(line);
                }
                Ok(())
            }),
    );

    registry.register(
        Command::new("broadcast")
            .alias("bc")
            .description("Sends a message to everyone")
            .require_permission("lodestone.broadcast")
            .then(
                Node::argument("message", ArgumentType::greedy_string()).suggest_with_permission(
                    0,
                    usize::MAX,
                    "lodestone.broadcast.macros",
                    broadcast_macros,
                ),
            )
            .executes(|ctx| {
                let online = ctx.source().services().sessions.list_connected().len();
                let message = ctx
                    .args()
                    .get_greedy("message")?
                    .replace("{sender}", ctx.sender().name())
                    .replace("{online}", &online.to_string());
                ctx.reply(format!("&6[&4Broadcast&6]&r {message}"));
                Ok(())
            }),
    );
}
