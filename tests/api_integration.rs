//! Integration tests for the HTTP API
//!
//! Tests session, dispatch, click and lock endpoints through the router

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use gosp::core::{create_router, Catalog};
use serde_json::{json, Value};
use tower::ServiceExt;

fn create_test_router() -> Router {
    create_router(Arc::new(Catalog::default()))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<String>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn new_session(app: &Router) -> String {
    let (status, json) = send(app, "POST", "/session/new", None).await;
    assert_eq!(status, StatusCode::OK);
    json["session_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_router();
    let (status, json) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["sessions_active"], 0);
}

#[tokio::test]
async fn test_catalog_endpoint() {
    let app = create_test_router();
    let (status, json) = send(&app, "GET", "/catalog", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["residues"].as_array().unwrap().len(), 30);
    assert_eq!(json["dehydron_ids"], json!(["hb1", "hb4", "hb6", "hb9", "hb13"]));
    assert_eq!(json["templates"].as_array().unwrap().len(), 3);
    assert_eq!(json["orphan"]["protein_id"], "YBR032W");
    let dehydron_flags = json["bonds"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|b| b["is_dehydron"] == true)
        .count();
    assert_eq!(dehydron_flags, 5);
}

#[tokio::test]
async fn test_create_session() {
    let app = create_test_router();
    let (status, json) = send(&app, "POST", "/session/new", None).await;

    assert_eq!(status, StatusCode::OK);
    let id = json["session_id"].as_str().unwrap();
    assert_eq!(json["websocket_url"], format!("/ws/{}", id));

    let (_, health) = send(&app, "GET", "/health", None).await;
    assert_eq!(health["sessions_active"], 1);
}

#[tokio::test]
async fn test_session_not_found() {
    let app = create_test_router();
    for (method, uri) in [
        ("GET", "/session/nonexistent"),
        ("GET", "/session/nonexistent/transitions"),
        ("GET", "/lock/nonexistent"),
    ] {
        let (status, _) = send(&app, method, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{} {}", method, uri);
    }
    let (status, _) = send(&app, "POST", "/session/nonexistent/dispatch", Some(r#"{"type":"RESET"}"#.into())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_session_snapshot() {
    let app = create_test_router();
    let id = new_session(&app).await;
    let (status, json) = send(&app, "GET", &format!("/session/{}", id), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["session_id"], id.as_str());
    assert_eq!(json["revision"], 0);
    assert_eq!(json["state"]["dsm_state"], "BREATHING");
    assert_eq!(json["fingerprint"].as_str().unwrap().len(), 64);
    assert_eq!(json["can_place_more"], true);
    assert_eq!(json["unwrapped_dehydrons"].as_array().unwrap().len(), 5);

    let (_, transitions) = send(&app, "GET", &format!("/session/{}/transitions", id), None).await;
    assert_eq!(transitions["from"], "BREATHING");
    assert_eq!(transitions["transitions"], json!(["STABILIZED", "NATIVE"]));
}

#[tokio::test]
async fn test_dispatch_flow() {
    let app = create_test_router();
    let id = new_session(&app).await;
    let uri = format!("/session/{}/dispatch", id);

    let (status, json) = send(&app, "POST", &uri, Some(r#"{"type":"TRANSITION_DSM","target":"UNFOLDED"}"#.into())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["applied"], false);
    assert_eq!(json["reason"], "R101_DSM_ILLEGAL_TRANSITION");
    assert_eq!(json["revision"], 0);

    let (_, json) = send(&app, "POST", &uri, Some(r#"{"type":"SELECT_TEMPLATE","template":"trehalose"}"#.into())).await;
    assert_eq!(json["applied"], true);
    assert_eq!(json["state"]["active_tool"], "place_stabilizer");

    let placement = json!({
        "type": "PLACE_STABILIZER",
        "template_id": "trehalose",
        "position": [0.0, 0.0, 0.0],
        "effect_radius": 1.5,
        "target_dehydron_id": "hb9",
        "color": "#44ffaa",
        "atom_count": 6
    });
    let (_, json) = send(&app, "POST", &uri, Some(placement.to_string())).await;
    assert_eq!(json["reason"], "R200_STABILIZER_PLACED");
    assert_eq!(json["revision"], 2);
    assert_eq!(json["state"]["wrapped_dehydrons"], json!(["hb9"]));
    assert_eq!(json["state"]["active_tool"], "inspect");
    assert_eq!(json["state"]["cascade"]["current"], 0);

    let (_, json) = send(&app, "POST", &uri, Some(r#"{"type":"SET_BREATHING_SPEED","speed":9}"#.into())).await;
    assert_eq!(json["reason"], "R404_SPEED_CLAMPED");
    assert_eq!(json["state"]["breathing_speed"], 3.0);
}

#[tokio::test]
async fn test_unknown_and_malformed_intents() {
    let app = create_test_router();
    let id = new_session(&app).await;
    let uri = format!("/session/{}/dispatch", id);

    let (status, json) = send(&app, "POST", &uri, Some(r#"{"type":"SPIN"}"#.into())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["applied"], false);
    assert_eq!(json["reason"], "R501_INTENT_UNKNOWN");

    let (status, _) = send(&app, "POST", &uri, Some("{not json".into())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_click_snaps_to_dehydron() {
    let app = create_test_router();
    let id = new_session(&app).await;
    let catalog = Catalog::default();
    let hb4 = catalog.bond("hb4").unwrap().midpoint;
    let click_uri = format!("/session/{}/click", id);

    // Not armed yet
    let (_, json) = send(&app, "POST", &click_uri, Some(json!({ "point": hb4 }).to_string())).await;
    assert_eq!(json["snapped"], false);

    send(
        &app,
        "POST",
        &format!("/session/{}/dispatch", id),
        Some(r#"{"type":"SELECT_TEMPLATE","template":"glycerol"}"#.into()),
    )
    .await;

    let (status, json) = send(&app, "POST", &click_uri, Some(json!({ "point": hb4 }).to_string())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["snapped"], true);
    assert_eq!(json["target"], "hb4");
    assert_eq!(json["result"]["applied"], true);
    assert_eq!(json["result"]["state"]["placed_stabilizers"][0]["template_id"], "glycerol");
}

#[tokio::test]
async fn test_lock_flow() {
    let app = create_test_router();
    let (status, json) = send(&app, "POST", "/lock/new", None).await;
    assert_eq!(status, StatusCode::OK);
    let id = json["lock_id"].as_str().unwrap().to_string();
    let event_uri = format!("/lock/{}/event", id);

    let (_, json) = send(&app, "GET", &format!("/lock/{}", id), None).await;
    assert_eq!(json["state"], "SEARCH");

    let (_, json) = send(
        &app,
        "POST",
        &event_uri,
        Some(r#"{"type":"IDENTIFY_VOID","coordinates":[4.5,4.5,2.0]}"#.into()),
    )
    .await;
    assert_eq!(json["state"], "ALIGN");
    assert_eq!(json["context"]["coordinates"], json!([4.5, 4.5, 2.0]));

    let (_, json) = send(
        &app,
        "POST",
        &event_uri,
        Some(r#"{"type":"VERIFY_MA","energy_potential":-17.2,"ramachandran_valid":true}"#.into()),
    )
    .await;
    assert_eq!(json["state"], "LOCK");
    assert_eq!(json["context"]["is_physically_locked"], true);
    assert_eq!(json["context"]["fidelity_score"], 1.0);

    let (status, _) = send(&app, "POST", &event_uri, Some(r#"{"type":"UNLOCK"}"#.into())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_session_and_lock() {
    let app = create_test_router();
    let id = new_session(&app).await;
    let (_, lock) = send(&app, "POST", "/lock/new", None).await;
    let lock_id = lock["lock_id"].as_str().unwrap().to_string();

    let (_, health) = send(&app, "GET", "/health", None).await;
    assert_eq!(health["sessions_active"], 1);
    assert_eq!(health["locks_active"], 1);

    let (status, _) = send(&app, "DELETE", &format!("/session/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "GET", &format!("/session/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "DELETE", &format!("/session/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", &format!("/lock/{}", lock_id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "GET", &format!("/lock/{}", lock_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, health) = send(&app, "GET", "/health", None).await;
    assert_eq!(health["sessions_active"], 0);
    assert_eq!(health["locks_active"], 0);
}
