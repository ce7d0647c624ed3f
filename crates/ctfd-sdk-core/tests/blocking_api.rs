//! The blocking convention behaves exactly like the async one.

use std::time::Duration;

use ctfd_sdk_core::{BlockingCtfdApi, Config, EntityKind, FlagOptions, NewChallenge, UserRole};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;
use tempfile::TempDir;

fn api(server: &ServerGuard, dir: &TempDir) -> BlockingCtfdApi {
    let config = Config::new("secret")
        .with_host(server.url())
        .with_storage_path(dir.path().join("ctfd_storage.json"))
        .with_timeout(Duration::from_secs(5));
    BlockingCtfdApi::new(&config).unwrap()
}

#[test]
fn test_blocking_user_and_team_flow() {
    let mut server = Server::new();
    let dir = TempDir::new().unwrap();
    let api = api(&server, &dir);

    let user_mock = server
        .mock("POST", "/api/v1/users")
        .match_header("authorization", "Token secret")
        .match_body(Matcher::PartialJson(json!({"name": "bob", "type": "admin"})))
        .with_status(200)
        .with_body(r#"{"data": {"id": 21}}"#)
        .expect(1)
        .create();
    let team_mock = server
        .mock("POST", "/api/v1/teams")
        .with_status(201)
        .with_body(r#"{"data": {"id": 8}}"#)
        .expect(1)
        .create();
    let member_mock = server
        .mock("POST", "/api/v1/teams/8/members")
        .match_body(Matcher::Json(json!({"user_id": 21})))
        .with_status(200)
        .expect(1)
        .create();
    let leave_mock = server
        .mock("DELETE", "/api/v1/teams/8/members")
        .match_body(Matcher::Json(json!({"user_id": 21})))
        .with_status(200)
        .expect(1)
        .create();

    assert_eq!(api.create_user("bob", UserRole::Admin).unwrap(), 21);
    assert!(api.create_user("bob", UserRole::Admin).unwrap_err().is_duplicate());
    assert_eq!(api.create_team("blue").unwrap(), 8);
    api.assign_user_to_team("bob", "blue").unwrap();
    assert_eq!(api.storage().get_user("bob").unwrap().team_id, Some(8));

    api.remove_user_from_team("bob").unwrap();
    assert_eq!(api.storage().get_user("bob").unwrap().team_id, None);

    user_mock.assert();
    team_mock.assert();
    member_mock.assert();
    leave_mock.assert();
}

#[test]
fn test_blocking_challenge_flow_and_clear() {
    let mut server = Server::new();
    let dir = TempDir::new().unwrap();
    let api = api(&server, &dir);

    let _challenge = server
        .mock("POST", "/api/v1/challenges")
        .with_status(200)
        .with_body(r#"{"data": {"id": 2}}"#)
        .create();
    let _flag = server
        .mock("POST", "/api/v1/flags")
        .match_body(Matcher::PartialJson(json!({"challenge_id": 2})))
        .with_status(200)
        .with_body(r#"{"data": {"id": 30}}"#)
        .create();
    let update = server
        .mock("PATCH", "/api/v1/flags/30")
        .with_status(200)
        .expect(1)
        .create();
    let delete_flag = server
        .mock("DELETE", "/api/v1/flags/30")
        .with_status(200)
        .expect(1)
        .create();
    let delete_challenge = server
        .mock("DELETE", "/api/v1/challenges/2")
        .with_status(200)
        .expect(1)
        .create();

    api.create_challenge(NewChallenge::new("crypto-1", 50)).unwrap();
    api.create_flag("crypto-1", "crypto-1-flag", "CTF{a}", &FlagOptions::default())
        .unwrap();
    api.update_flag("crypto-1-flag", "CTF{b}", &FlagOptions::default())
        .unwrap();
    assert!(api.storage().exists(EntityKind::Flags, "crypto-1-flag"));

    api.clear().unwrap();

    update.assert();
    delete_flag.assert();
    delete_challenge.assert();
    assert!(api.storage().load().unwrap().is_empty());
}

#[test]
fn test_blocking_not_found() {
    let server = Server::new();
    let dir = TempDir::new().unwrap();
    let api = api(&server, &dir);

    assert!(api.delete_team("nobody").unwrap_err().is_not_found());
    assert!(api.delete_user("nobody").unwrap_err().is_not_found());
}
