mod common;

use common::TestServer;
use lodestone_core::commands::{EntityArgument, ParseError, online_only};
use lodestone_core::config::ServerConfig;

fn names(found: &[lodestone_core::commands::Candidate]) -> Vec<&str> {
    found.iter().map(|candidate| candidate.name()).collect()
}

#[test]
fn connected_players_rank_before_offline_accounts() {
    let server = TestServer::new();
    server.directory.add_account("adam");
    server.directory.add_account("Amy");
    server.join("anna", None);
    server.join("Abe", None);

    let found = EntityArgument::players("targets")
        .resolve(&server.console(), "a")
        .unwrap();
    assert_eq!(names(&found), ["Abe", "anna", "adam", "Amy"]);
}

#[test]
fn marker_skips_the_nickname_overlay() {
    let server = TestServer::new();
    server.join("zoe", Some("alice"));
    let console = server.console();
    let player = EntityArgument::player("player");

    assert_eq!(
        player.resolve(&console, "p:alice"),
        Err(ParseError::NoSuchEntity {
            kind: "player".to_string(),
            token: "alice".to_string(),
        })
    );
    assert_eq!(names(&player.resolve(&console, "alice").unwrap()), ["zoe"]);
    assert_eq!(names(&player.resolve(&console, "P:ZO").unwrap()), ["zoe"]);
}

#[test]
fn account_matches_win_over_nicknames() {
    let server = TestServer::new();
    server.join("zoe", Some("&bAlpha"));
    server.directory.add_account("alex");

    let found = EntityArgument::player("player")
        .resolve(&server.console(), "al")
        .unwrap();
    assert_eq!(names(&found), ["alex"]);
}

#[test]
fn nicknames_are_normalized() {
    let server = TestServer::new();
    server.join("zoe", Some("&b~Alpha"));
    server.join("yan", Some("Alpine"));
    let console = server.console();

    let player = EntityArgument::player("player");
    assert_eq!(names(&player.resolve(&console, "~alpha").unwrap()), ["zoe"]);
    assert!(matches!(
        player.resolve(&console, "alp"),
        Err(ParseError::AmbiguousMatch { .. })
    ));

    let found = EntityArgument::players("players")
        .resolve(&console, "alp")
        .unwrap();
    assert_eq!(names(&found), ["zoe", "yan"]);
}

#[test]
fn strict_nicknames_need_an_exact_match() {
    let mut config = ServerConfig::default();
    config.strict_nicknames = true;
    let server = TestServer::with_config(config);
    server.join("zoe", Some("Alpha"));
    let player = EntityArgument::player("player");

    assert!(player.resolve(&server.console(), "alph").is_err());
    assert_eq!(names(&player.resolve(&server.console(), "alpha").unwrap()), ["zoe"]);
}

#[test]
fn nicknames_can_be_disabled() {
    let mut config = ServerConfig::default();
    config.nicknames_enabled = false;
    let server = TestServer::with_config(config);
    server.join("zoe", Some("Alpha"));

    assert_eq!(
        EntityArgument::player("player").resolve(&server.console(), "alpha"),
        Err(ParseError::NoSuchEntity {
            kind: "player".to_string(),
            token: "alpha".to_string(),
        })
    );
}

#[test]
fn exact_names_beat_prefix_ambiguity() {
    let server = TestServer::new();
    server.directory.add_account("al");
    server.directory.add_account("alex");
    server.directory.add_account("alice");
    let console = server.console();
    let player = EntityArgument::player("player");

    assert_eq!(names(&player.resolve(&console, "AL").unwrap()), ["al"]);
    match player.resolve(&console, "ali") {
        Ok(found) => assert_eq!(names(&found), ["alice"]),
        Err(err) => panic!("unexpected {err}"),
    }
    match player.resolve(&console, "ale") {
        Ok(found) => assert_eq!(names(&found), ["alex"]),
        Err(err) => panic!("unexpected {err}"),
    }
    server.directory.add_account("alexis");
    assert_eq!(
        player.resolve(&console, "alex").map(|found| names(&found).join(",")),
        Ok("alex".to_string())
    );
    assert_eq!(
        player.resolve(&console, "alexi").map(|found| names(&found).join(",")),
        Ok("alexis".to_string())
    );
    let err = player.resolve(&console, "a").unwrap_err();
    assert_eq!(
        err.to_string(),
        "'a' matches more than one player: al, alex, alexis, alice"
    );

    let exact = EntityArgument::player("player").exact_only();
    assert!(exact.resolve(&console, "ali").is_err());
    assert_eq!(names(&exact.resolve(&console, "alice").unwrap()), ["alice"]);
}

#[test]
fn visibility_filters_apply() {
    let server = TestServer::new();
    server.directory.add_account("alice");
    server.join("bob", None);
    let online = EntityArgument::player("player").filter(online_only);

    assert!(online.resolve(&server.console(), "alice").is_err());
    assert_eq!(names(&online.resolve(&server.console(), "bob").unwrap()), ["bob"]);
}

#[test]
fn vanished_players_are_hidden_from_other_players() {
    let server = TestServer::new();
    server.join("alice", None);
    server.join("bob", None);
    server.directory.set_vanished("alice", true);
    let player = EntityArgument::player("player");

    assert!(player.resolve(&server.player("bob"), "alice").is_err());
    assert!(player.resolve(&server.player("alice"), "alice").is_ok());
    assert!(player.resolve(&server.console(), "alice").is_ok());

    server.permissions.grant("bob", "lodestone.vanish.see");
    assert!(player.resolve(&server.player("bob"), "alice").is_ok());
}

#[test]
fn selectors_expand_to_connected_players() {
    let server = TestServer::new();
    server.join("carol", None);
    server.join("alice", None);
    server.directory.add_account("bob");
    let console = server.console();

    let all = EntityArgument::players("players")
        .resolve(&console, "@a")
        .unwrap();
    assert_eq!(names(&all), ["alice", "carol"]);

    assert!(matches!(
        EntityArgument::player("player").resolve(&console, "@a"),
        Err(ParseError::AmbiguousMatch { .. })
    ));
    assert_eq!(
        EntityArgument::player("player").resolve(&console, "@s"),
        Err(ParseError::NoSelectorTarget {
            selector: "@s".to_string()
        })
    );
    assert_eq!(
        names(&EntityArgument::player("player").resolve(&server.player("alice"), "@s").unwrap()),
        ["alice"]
    );
    let random = EntityArgument::player("player").resolve(&console, "@r").unwrap();
    assert!(["alice", "carol"].contains(&random[0].name()));

    assert!(matches!(
        EntityArgument::player("player").resolve(&console, "@a[distance=..5]"),
        Err(ParseError::InvalidSelectorSyntax { .. })
    ));
    assert!(
        EntityArgument::player("player")
            .allow_selectors(false)
            .resolve(&console, "@a")
            .is_err()
    );
}
