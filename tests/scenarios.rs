mod common;

use common::TestServer;
use expect_test::expect;
use lodestone_core::commands::ParseError;
use lodestone_core::config::ServerConfig;
use lodestone_core::utils::HyphenatedUUID;

fn transcript(lines: &[String]) -> String {
    lines.iter().map(|line| format!("{line}\n")).collect()
}

#[test]
fn exact_kit_name_beats_longer_prefix_match() {
    let mut config = ServerConfig::default();
    config.kits = vec!["starter".to_string(), "starterkit".to_string()];
    let server = TestServer::with_config(config);
    server.join("alice", None);
    let alice = server.player("alice");

    let ctx = server.parse(&alice, "kit starter").unwrap();
    assert_eq!(ctx.get_choice("kit").unwrap(), "starter");
    assert_eq!(ctx.get_entity("player").unwrap().name(), "alice");
    assert!(!ctx.modifier(lodestone_core::commands::SKIP_COST));

    let ctx = server.parse(&alice, "kit STARTERK").unwrap();
    assert_eq!(ctx.get_choice("kit").unwrap(), "starterkit");

    assert!(matches!(
        server.parse(&alice, "kit sta"),
        Err(ParseError::AmbiguousMatch { .. })
    ));
}

#[test]
fn kits_for_others_skip_costs() {
    let server = TestServer::new();
    server.join("alice", None);
    server.join("bob", None);

    assert_eq!(
        server.run(server.player("alice"), "kit tools bob"),
        ["You do not have permission to do that (lodestone.kit.others) Usage: /kit <kit> [player]"]
    );
    server.permissions.grant("alice", "lodestone.kit.others");
    assert_eq!(
        server.run(server.player("alice"), "kit tools bob"),
        [
            "Kit tools given to bob.",
            "No cost, cooldown or warmup applies to kits given to others."
        ]
    );
    assert_eq!(
        server.run(server.player("alice"), "kit tools"),
        ["Kit tools given to alice."]
    );
}

#[test]
fn jail_binds_every_argument() {
    let server = TestServer::new();
    server.directory.add_account("bob");
    let console = server.console();

    let ctx = server
        .parse(&console, "jail bob cell1 2d reason text here")
        .unwrap();
    assert_eq!(ctx.get_entity("subject").unwrap().name(), "bob");
    assert_eq!(ctx.get_choice("jail").unwrap(), "cell1");
    assert_eq!(ctx.get_duration("duration").unwrap(), 172_800);
    assert_eq!(ctx.get_greedy("reason").unwrap(), "reason text here");

    assert_eq!(
        server.run(server.console(), "togglejail bob cell1 2d reason text here"),
        ["Jailed bob in cell1 for 2d: reason text here"]
    );
    assert_eq!(
        server.run(server.console(), "jail bob cell1"),
        ["Jailed bob in cell1"]
    );
}

#[test]
fn parse_errors_are_one_line() {
    let server = TestServer::new();
    assert_eq!(
        server.run(server.console(), "jail nobody cell1"),
        ["No player named 'nobody' was found Usage: /jail <player> <jail> [duration] [reason...]"]
    );
    assert_eq!(
        server.run(server.console(), "jail"),
        ["Not enough arguments Usage: /jail <player> <jail> [duration] [reason...]"]
    );
    assert_eq!(
        server.run(server.console(), "fly"),
        ["Unknown command: fly. Run /help for a list of commands."]
    );
    assert_eq!(
        server.run(server.player("bob"), "jail bob cell1"),
        ["You do not have permission to do that (lodestone.jail)"]
    );
    assert!(server.run(server.console(), "  ").is_empty());
}

#[test]
fn custom_aliases_expand() {
    let mut config = ServerConfig::default();
    config
        .command_aliases
        .insert("starter".to_string(), "kit starter {}".to_string());
    let server = TestServer::with_config(config);
    server.join("alice", None);

    assert_eq!(
        server.run(server.console(), "starter alice"),
        [
            "Kit starter given to alice.",
            "No cost, cooldown or warmup applies to kits given to others."
        ]
    );
}

#[test]
fn help_lists_usable_commands() {
    let server = TestServer::new();
    let replies = server.run(server.player("bob"), "help");
    expect![[r#"
        Run /help <command> for more information.
        Available commands:
         /help - Lists commands or shows how to use one
         /kit - Gives a kit to yourself or another player
         /seen - Shows whether a player is online
    "#]]
    .assert_eq(&transcript(&replies));
}

#[test]
fn help_shows_usage() {
    let server = TestServer::new();
    let console = server.console();
    let replies = server.run(server.console(), "help /jail");
    expect![[r#"
        Usage: /jail <player> <jail> [duration] [reason...]
        Sends a player to jail
    "#]]
    .assert_eq(&transcript(&replies));

    let usages: Vec<String> = ["kit", "heal", "tp", "gamemode", "whois", "broadcast"]
        .into_iter()
        .filter_map(|label| server.registry.usage(&console, label))
        .collect();
    expect![[r#"
        /kit <kit> [player]
        /heal [player]
        /tp [player] <target>
        /gamemode <mode> <player>
        /whois <players...>
        /broadcast <message...>
    "#]]
    .assert_eq(&transcript(&usages));
}

#[test]
fn flags_show_up_in_help() {
    let server = TestServer::new();
    server.join("alice", None);
    let bob = server.player("bob");

    let replies = server.run(server.player("bob"), "help seen");
    expect![[r#"
        Usage: /seen <player> [-u|--uuid]
        Shows whether a player is online
        Available flags:
         -u | --uuid: Also show the player's UUID
    "#]]
    .assert_eq(&transcript(&replies));

    assert_eq!(server.complete(&bob, "seen alice -"), ["--uuid", "-u"]);
    assert_eq!(
        server.run(server.player("bob"), "seen alice -u"),
        [
            "alice is currently online.".to_string(),
            format!(
                "UUID: {}",
                HyphenatedUUID(server.directory.account("alice").unwrap().uuid)
            ),
        ]
    );
}
