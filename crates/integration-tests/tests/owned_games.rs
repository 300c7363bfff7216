//! Aggregated owned-games tests: merging, included-id tracking and cache
//! invalidation on deletion.

use game_night_core::SteamId;
use game_night_integration_tests::{
    ContextOptions, TestContext, library, mock_owned_games, mock_resolve_vanity,
};
use httpmock::prelude::*;
use reqwest::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
async fn empty_registry_yields_empty_games_without_upstream_calls() {
    let ctx = TestContext::start().await;
    let mock = ctx
        .steam
        .mock_async(|when, then| {
            when.method(GET).path("/IPlayerService/GetOwnedGames/v0001/");
            then.status(200).json_body(json!({"response": {}}));
        })
        .await;

    let resp = ctx
        .client
        .get(ctx.url("/api/owned-games"))
        .send()
        .await
        .expect("Failed to fetch games");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to read body");
    assert_eq!(body, json!({"games": []}));
    assert_eq!(mock.hits_async().await, 0);
}

#[tokio::test]
async fn libraries_merge_across_players() {
    let ctx = TestContext::start_with(ContextOptions {
        registered: vec![SteamId::new("111"), SteamId::new("222")],
        ..ContextOptions::default()
    })
    .await;
    mock_owned_games(&ctx.steam, "111", library(&[(10, "Counter-Strike", 100)])).await;
    mock_owned_games(&ctx.steam, "222", library(&[(10, "Counter-Strike", 50)])).await;

    let body: Value = ctx
        .client
        .get(ctx.url("/api/owned-games"))
        .send()
        .await
        .expect("Failed to fetch games")
        .json()
        .await
        .expect("Failed to read body");

    let games = body["games"].as_array().expect("games missing");
    assert_eq!(games.len(), 1);
    assert_eq!(games[0]["appid"], 10);
    assert_eq!(games[0]["name"], "Counter-Strike");
    assert_eq!(games[0]["playtime_forever"], 150);
    assert_eq!(games[0]["steam_ids"], json!(["111", "222"]));
}

#[tokio::test]
async fn a_private_library_still_marks_the_player_included() {
    let ctx = TestContext::start_with(ContextOptions {
        registered: vec![SteamId::new("111")],
        ..ContextOptions::default()
    })
    .await;
    // GetOwnedGames omits `games` entirely for private profiles
    let mock = mock_owned_games(&ctx.steam, "111", json!({})).await;

    for _ in 0..2 {
        let body: Value = ctx
            .client
            .get(ctx.url("/api/owned-games"))
            .send()
            .await
            .expect("Failed to fetch games")
            .json()
            .await
            .expect("Failed to read body");
        assert_eq!(body, json!({"games": []}));
    }

    assert_eq!(mock.hits_async().await, 1);
}

#[tokio::test]
async fn included_players_are_not_refetched() {
    let ctx = TestContext::start_with(ContextOptions {
        registered: vec![SteamId::new("111")],
        ..ContextOptions::default()
    })
    .await;
    let mock = mock_owned_games(&ctx.steam, "111", library(&[(10, "Counter-Strike", 100)])).await;

    let first: Value = ctx
        .client
        .get(ctx.url("/api/owned-games"))
        .send()
        .await
        .expect("Failed to fetch games")
        .json()
        .await
        .expect("Failed to read body");
    let second: Value = ctx
        .client
        .get(ctx.url("/api/owned-games"))
        .send()
        .await
        .expect("Failed to fetch games")
        .json()
        .await
        .expect("Failed to read body");

    assert_eq!(first, second);
    assert_eq!(mock.hits_async().await, 1);
}

#[tokio::test]
async fn deleting_a_player_resets_the_aggregate() {
    let ctx = TestContext::start_with(ContextOptions {
        registered: vec![SteamId::new("111"), SteamId::new("222")],
        ..ContextOptions::default()
    })
    .await;
    mock_resolve_vanity(&ctx.steam, "alice", "111").await;
    let games_111 = mock_owned_games(&ctx.steam, "111", library(&[(10, "Counter-Strike", 100)])).await;
    let games_222 = mock_owned_games(&ctx.steam, "222", library(&[(10, "Counter-Strike", 50)])).await;

    let body: Value = ctx
        .client
        .get(ctx.url("/api/owned-games"))
        .send()
        .await
        .expect("Failed to fetch games")
        .json()
        .await
        .expect("Failed to read body");
    assert_eq!(body["games"][0]["playtime_forever"], 150);

    let resp = ctx
        .client
        .delete(ctx.url("/api/players/alice"))
        .send()
        .await
        .expect("Failed to delete player");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // The next call rebuilds from upstream for the remaining player only
    let body: Value = ctx
        .client
        .get(ctx.url("/api/owned-games"))
        .send()
        .await
        .expect("Failed to fetch games")
        .json()
        .await
        .expect("Failed to read body");

    let games = body["games"].as_array().expect("games missing");
    assert_eq!(games.len(), 1);
    assert_eq!(games[0]["playtime_forever"], 50);
    assert_eq!(games[0]["steam_ids"], json!(["222"]));
    assert_eq!(games_111.hits_async().await, 1);
    assert_eq!(games_222.hits_async().await, 2);
}

#[tokio::test]
async fn deletion_is_forbidden_when_disabled() {
    let ctx = TestContext::start_with(ContextOptions {
        allow_player_deletion: false,
        ..ContextOptions::default()
    })
    .await;

    let resp = ctx
        .client
        .delete(ctx.url("/api/players/alice"))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn one_failed_fetch_fails_the_whole_request() {
    let ctx = TestContext::start_with(ContextOptions {
        registered: vec![SteamId::new("111"), SteamId::new("222")],
        ..ContextOptions::default()
    })
    .await;
    let games_111 = mock_owned_games(&ctx.steam, "111", library(&[(10, "Counter-Strike", 100)])).await;
    let broken_222 = ctx
        .steam
        .mock_async(|when, then| {
            when.method(GET)
                .path("/IPlayerService/GetOwnedGames/v0001/")
                .query_param("steamid", "222");
            then.status(500).body("upstream exploded");
        })
        .await;

    let resp = ctx
        .client
        .get(ctx.url("/api/owned-games"))
        .send()
        .await
        .expect("Failed to fetch games");
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    // Nothing from the failed batch was merged; once the upstream recovers,
    // both players are fetched again
    broken_222.delete_async().await;
    mock_owned_games(&ctx.steam, "222", library(&[(10, "Counter-Strike", 50)])).await;

    let body: Value = ctx
        .client
        .get(ctx.url("/api/owned-games"))
        .send()
        .await
        .expect("Failed to fetch games")
        .json()
        .await
        .expect("Failed to read body");

    assert_eq!(body["games"][0]["playtime_forever"], 150);
    assert_eq!(games_111.hits_async().await, 2);
}
