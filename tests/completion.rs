mod common;

use common::TestServer;

#[test]
fn labels_follow_permissions() {
    let server = TestServer::new();
    assert_eq!(server.complete(&server.player("bob"), ""), ["help", "kit", "seen"]);
    assert_eq!(server.complete(&server.player("bob"), "/k"), ["kit"]);
    assert_eq!(server.complete(&server.console(), "t"), ["teleport", "togglejail", "tp"]);
    assert!(server.complete(&server.player("bob"), "tp ").is_empty());
}

#[test]
fn exhausted_cursor_offers_everything() {
    let server = TestServer::new();
    let console = server.console();
    assert_eq!(server.complete(&console, "kit "), ["starter", "tools"]);
    assert_eq!(server.complete(&console, "kit T"), ["tools"]);
    assert_eq!(
        server.complete(&console, "gamemode "),
        ["adventure", "creative", "spectator", "survival"]
    );
}

#[test]
fn completion_is_repeatable() {
    let server = TestServer::new();
    server.join("alice", Some("&aAli"));
    server.directory.add_account("bob");
    let console = server.console();

    let first = server.complete(&console, "kit starter ");
    assert_eq!(first, ["Ali", "alice", "bob"]);
    assert_eq!(server.complete(&console, "kit starter "), first);
}

#[test]
fn marker_is_kept_on_suggestions() {
    let server = TestServer::new();
    server.join("alice", Some("alpha"));
    server.directory.add_account("alex");
    let console = server.console();

    assert_eq!(server.complete(&console, "seen p:a"), ["p:alice", "p:alex"]);
    assert_eq!(server.complete(&console, "seen P:a"), ["P:alice", "P:alex"]);
    assert_eq!(server.complete(&console, "kit starter P:al"), ["P:alice", "P:alex"]);
    assert_eq!(server.complete(&console, "seen a"), ["alice", "alpha", "alex"]);
}

#[test]
fn selectors_complete_where_allowed() {
    let server = TestServer::new();
    let console = server.console();
    assert_eq!(server.complete(&console, "heal @"), ["@a", "@p", "@r", "@s"]);
    assert!(server.complete(&console, "seen @").is_empty());
    assert!(server.complete(&console, "whois @").is_empty());
}

#[test]
fn arity_gate_counts_the_pending_token() {
    let server = TestServer::new();
    server.join("alice", None);
    server.join("bob", None);
    server.directory.add_account("alex");
    let console = server.console();

    assert_eq!(server.complete(&console, "tp al"), ["alice"]);
    assert_eq!(server.complete(&console, "tp alice "), ["alice", "bob"]);
    assert!(server.complete(&console, "tp alice bob ").is_empty());
}

#[test]
fn macros_need_their_permission() {
    let server = TestServer::new();
    server.permissions.grant("bob", "lodestone.broadcast");
    assert_eq!(
        server.complete(&server.console(), "bc hello {o"),
        ["{online}"]
    );
    assert!(server.complete(&server.player("bob"), "bc hello {").is_empty());

    server.permissions.grant("bob", "lodestone.broadcast.*");
    assert_eq!(
        server.complete(&server.player("bob"), "bc {"),
        ["{online}", "{sender}"]
    );
}

#[test]
fn greedy_arguments_complete_after_a_trailing_space() {
    let server = TestServer::new();
    server.join("alice", None);
    let console = server.console();

    assert_eq!(server.complete(&console, "bc hello "), ["{online}", "{sender}"]);
    assert_eq!(server.complete(&console, "bc hello world "), ["{online}", "{sender}"]);
    assert_eq!(server.complete(&console, "seen alice "), ["--uuid", "-u"]);
    assert_eq!(server.complete(&console, "seen alice -u "), ["--uuid", "-u"]);
    assert!(server.complete(&console, "jail alice cell1 2d ").is_empty());
}
