//! # Integration Tests for meeple-api
//!
//! Drives the assembled router with `oneshot`: health probes, the round
//! close scenario, vote rules and their error codes, the admin token,
//! the relay webhook and the OpenAPI document.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use meeple_api::{AppConfig, AppState};

async fn test_app_with(config: AppConfig) -> axum::Router {
    let state = AppState::in_memory(config).await.unwrap();
    meeple_api::app(state)
}

async fn test_app() -> axum::Router {
    test_app_with(AppConfig::default()).await
}

async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn get(app: &axum::Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

async fn post_json(app: &axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(
        app,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

async fn add_game(app: &axum::Router, name: &str, proposer: &str, duration: &str) -> i64 {
    let (status, body) = post_json(
        app,
        "/api/add-game",
        json!({"name": name, "proposer": proposer, "duration": duration}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_i64().unwrap()
}

async fn vote(app: &axum::Router, voter: &str, game_id: i64) -> (StatusCode, Value) {
    post_json(app, "/api/vote", json!({"voter": voter, "game_id": game_id})).await
}

// -- Health Probes ------------------------------------------------------------

#[tokio::test]
async fn test_liveness_and_readiness() {
    let app = test_app().await;
    for (uri, expected) in [("/health/liveness", "ok"), ("/health/readiness", "ready")] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], expected.as_bytes());
    }
}

// -- Rounds -------------------------------------------------------------------

#[tokio::test]
async fn test_current_round_is_stable() {
    let app = test_app().await;
    let (status, first) = get(&app, "/api/current-round").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["round"], 1);
    assert_eq!(first["status"], "active");
    let (_, second) = get(&app, "/api/current-round").await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_players_lists_default_roster() {
    let app = test_app().await;
    let (status, body) = get(&app, "/api/players").await;
    assert_eq!(status, StatusCode::OK);
    let players = body.as_array().unwrap();
    assert_eq!(players.len(), 6);
    assert_eq!(players[0], json!({"id": "1", "name": "Mako"}));
}

#[tokio::test]
async fn test_close_round_scenario() {
    let app = test_app().await;
    let a = add_game(&app, "A", "1", "long").await;
    let b = add_game(&app, "B", "2", "long").await;
    let c = add_game(&app, "C", "3", "short").await;

    for voter in ["v1", "v2", "v3"] {
        assert_eq!(vote(&app, voter, a).await.0, StatusCode::OK);
    }
    assert_eq!(vote(&app, "v4", b).await.0, StatusCode::OK);
    for voter in ["v1", "v2"] {
        assert_eq!(vote(&app, voter, c).await.0, StatusCode::OK);
    }

    let (_, games) = get(&app, "/api/games").await;
    let listed: Vec<(String, i64)> = games
        .as_array()
        .unwrap()
        .iter()
        .map(|g| (g["name"].as_str().unwrap().to_string(), g["votes"].as_i64().unwrap()))
        .collect();
    assert_eq!(
        listed,
        vec![("A".into(), 3), ("B".into(), 1), ("C".into(), 2)]
    );

    let (status, outcome) = post_json(&app, "/api/finish-round", json!({})).await;
    assert_eq!(status, StatusCode::OK, "{outcome}");
    assert_eq!(outcome["success"], true);
    assert_eq!(outcome["winners"]["long"], json!({"id": a, "name": "A", "proposer": "1"}));
    assert_eq!(outcome["winners"]["short"], json!({"id": c, "name": "C", "proposer": "3"}));
    assert_eq!(outcome["new_round_number"], 2);
    assert_eq!(outcome["carried_over"].as_array().unwrap().len(), 1);

    let (_, current) = get(&app, "/api/current-round").await;
    assert_eq!(current["round"], 2);
    assert_eq!(current["id"], outcome["new_round"]);

    let (_, games) = get(&app, "/api/games").await;
    let games = games.as_array().unwrap();
    assert_eq!(games.len(), 1);
    assert_eq!(games[0]["id"], outcome["carried_over"][0]);
    assert_ne!(games[0]["id"], b);
    assert_eq!(games[0]["name"], "B");
    assert_eq!(games[0]["proposer"], "2");
    assert_eq!(games[0]["duration"], "long");
    assert_eq!(games[0]["votes"], 0);

    let (_, rounds) = get(&app, "/api/rounds").await;
    let rounds = rounds.as_array().unwrap();
    assert_eq!(rounds.len(), 2);
    assert_eq!(rounds[0]["status"], "active");
    assert_eq!(rounds[1]["status"], "finished");
    assert_eq!(rounds[1]["winners"]["long"]["name"], "A");

    let closed_id = outcome["round"].as_i64().unwrap();
    let (status, closed) = get(&app, &format!("/api/rounds/{closed_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(closed["round"], 1);

    let (status, body) = post_json(&app, "/api/finish-round", json!({"round": closed_id})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_finish_round_without_body_closes_active_round() {
    let app = test_app().await;
    add_game(&app, "Azul", "1", "short").await;
    let (status, outcome) = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/api/finish-round")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{outcome}");
    assert_eq!(outcome["winners"]["short"]["name"], "Azul");
    assert!(outcome["winners"].get("long").is_none());
}

#[tokio::test]
async fn test_finish_round_without_proposals_is_not_found() {
    let app = test_app().await;
    let (status, body) = post_json(&app, "/api/finish-round", json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_unknown_round_is_not_found() {
    let app = test_app().await;
    let (status, body) = get(&app, "/api/rounds/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    let (status, _) = get(&app, "/api/games?round=999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// -- Proposals ----------------------------------------------------------------

#[tokio::test]
async fn test_add_game_validation() {
    let app = test_app().await;
    let (status, body) = post_json(
        &app,
        "/api/add-game",
        json!({"name": "  ", "proposer": "1", "duration": "long"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, body) = post_json(
        &app,
        "/api/add-game",
        json!({"name": "Brass", "proposer": "1", "duration": "medium"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"]["message"].as_str().unwrap().contains("medium"));

    let (status, body) = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/api/add-game")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_add_game_missing_field_is_validation_error() {
    let app = test_app().await;
    let (status, body) = post_json(
        &app,
        "/api/add-game",
        json!({"proposer": "1", "duration": "long"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{body}");
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["message"].as_str().unwrap().contains("name"));

    let (status, body) = post_json(&app, "/api/add-game", json!({"name": "Brass"})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (_, games) = get(&app, "/api/games").await;
    assert!(games.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_add_game_accepts_spanish_duration() {
    let app = test_app().await;
    let (status, body) = post_json(
        &app,
        "/api/add-game",
        json!({"name": "Catan", "proposer": "2", "duration": "largo"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["duration"], "long");
    assert_eq!(body["votes"], 0);
    assert_eq!(body["proposer_name"], "Fercho");
}

#[tokio::test]
async fn test_enforced_roster_rejects_unknown_proposer() {
    let app = test_app_with(AppConfig {
        enforce_roster: true,
        ..AppConfig::default()
    })
    .await;
    let (status, body) = post_json(
        &app,
        "/api/add-game",
        json!({"name": "Brass", "proposer": "stranger", "duration": "long"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"]["message"].as_str().unwrap().contains("stranger"));
}

// -- Votes --------------------------------------------------------------------

#[tokio::test]
async fn test_category_limit() {
    let app = test_app().await;
    let ids = [
        add_game(&app, "S1", "1", "short").await,
        add_game(&app, "S2", "1", "short").await,
        add_game(&app, "S3", "1", "short").await,
    ];
    assert_eq!(vote(&app, "v1", ids[0]).await.0, StatusCode::OK);
    assert_eq!(vote(&app, "v1", ids[1]).await.0, StatusCode::OK);
    let (status, body) = vote(&app, "v1", ids[2]).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CATEGORY_LIMIT");

    let (_, games) = get(&app, "/api/games").await;
    let third = games
        .as_array()
        .unwrap()
        .iter()
        .find(|g| g["id"] == ids[2])
        .unwrap()
        .clone();
    assert_eq!(third["votes"], 0);
}

#[tokio::test]
async fn test_duplicate_vote() {
    let app = test_app().await;
    let x = add_game(&app, "X", "1", "long").await;
    let (status, body) = vote(&app, "v1", x).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["votes"], 1);

    let (status, body) = vote(&app, "v1", x).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "DUPLICATE_VOTE");

    let (_, votes) = get(&app, "/api/votes?voter=v1").await;
    assert_eq!(votes.as_array().unwrap().len(), 1);
    assert_eq!(votes[0]["game_id"], x);

    let (_, games) = get(&app, "/api/games").await;
    assert_eq!(games[0]["votes"], 1);
}

#[tokio::test]
async fn test_vote_for_unknown_game_is_not_found() {
    let app = test_app().await;
    let (status, body) = vote(&app, "v1", 4242).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_vote_missing_field_is_validation_error() {
    let app = test_app().await;
    let (status, body) = post_json(&app, "/api/vote", json!({"voter": "v1"})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{body}");
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["message"].as_str().unwrap().contains("game_id"));

    let x = add_game(&app, "X", "1", "long").await;
    let (status, body) = post_json(&app, "/api/vote", json!({"game_id": x})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"]["message"].as_str().unwrap().contains("voter"));

    let (_, games) = get(&app, "/api/games").await;
    assert_eq!(games[0]["votes"], 0);
}

#[tokio::test]
async fn test_vote_for_game_of_another_round_is_rejected() {
    let app = test_app().await;
    let old = add_game(&app, "Brass", "1", "long").await;
    let (status, _) = post_json(&app, "/api/finish-round", json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = vote(&app, "v1", old).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{body}");
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (_, votes) = get(&app, "/api/votes?voter=v1").await;
    assert!(votes.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_votes_requires_voter() {
    let app = test_app().await;
    let (status, body) = get(&app, "/api/votes").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

// -- Admin Token --------------------------------------------------------------

#[tokio::test]
async fn test_finish_round_requires_admin_token_when_configured() {
    let app = test_app_with(AppConfig {
        admin_token: Some("s3cret".into()),
        ..AppConfig::default()
    })
    .await;
    add_game(&app, "Azul", "1", "short").await;

    let (status, body) = post_json(&app, "/api/finish-round", json!({})).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    let (status, _) = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/api/finish-round")
            .header("content-type", "application/json")
            .header("authorization", "Bearer s3cret")
            .body(Body::from("{}"))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Reads stay open.
    assert_eq!(get(&app, "/api/current-round").await.0, StatusCode::OK);
}

// -- Relay --------------------------------------------------------------------

#[tokio::test]
async fn test_relay_inbound_lists_games() {
    let app = test_app().await;
    add_game(&app, "Brass", "2", "long").await;
    let (status, body) = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/relay/inbound")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from("Body=1&From=whatsapp%3A%2B15550001"))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["to"], "whatsapp:+15550001");
    let reply = body["reply"].as_str().unwrap();
    assert!(reply.contains("Brass (long)"));
    assert!(reply.contains("Proposed by: Fercho"));
}

#[tokio::test]
async fn test_relay_inbound_unknown_command() {
    let app = test_app().await;
    let (status, body) = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/relay/inbound")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from("Body=hola&From=x"))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["reply"].as_str().unwrap().contains("menu"));
}

// -- OpenAPI ------------------------------------------------------------------

#[tokio::test]
async fn test_openapi_json_served() {
    let app = test_app().await;
    let (status, body) = get(&app, "/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/vote"].is_object());
    assert_eq!(body["info"]["title"], "meeple API");
}
