//! End-to-end API tests: registration, authorization gating, opaque
//! identifiers, and cache invalidation through the full router.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use marquee_core::{EntityKind, decode_public_id};
use marquee_server::config::BootstrapAdmin;
use marquee_server::{AppConfig, build_app, build_state};

const ADMIN_EMAIL: &str = "root@example.com";
const ADMIN_PASSWORD: &str = "correct-horse";

async fn test_app() -> Router {
    let mut cfg = AppConfig::default();
    cfg.auth.secret = "0123456789abcdef0123456789abcdef".into();
    cfg.bootstrap.admin = Some(BootstrapAdmin {
        email: ADMIN_EMAIL.into(),
        name: "Root".into(),
        password: ADMIN_PASSWORD.into(),
    });
    let state = build_state(&cfg).await.unwrap();
    build_app(state, &cfg)
}

fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn register(app: &Router, email: &str, name: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/v1/register",
            None,
            &json!({ "email": email, "name": name, "password": password }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    body["data"]["token"].as_str().unwrap().to_string()
}

async fn login(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/v1/login",
            None,
            &json!({ "email": email, "password": password }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["data"]["token"].as_str().unwrap().to_string()
}

async fn create_cinema(app: &Router, token: &str, name: &str) -> Value {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/v1/cinemas",
            Some(token),
            &json!({
                "name": name,
                "address": "1 Main St",
                "capacity": 500,
                "email": "info@example.com",
                "phone_number": "555-0100",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create cinema failed: {body}");
    body["data"].clone()
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = test_app().await;
    let (status, body) = send(&app, get_request("/healthz", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&app, get_request("/ping", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "pong");
}

#[tokio::test]
async fn test_register_login_and_duplicates() {
    let app = test_app().await;

    register(&app, "bob@example.com", "Bob", "hunter2hunter2").await;
    login(&app, "bob@example.com", "hunter2hunter2").await;

    // Wrong password and unknown email both fail the same way.
    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/v1/login",
            None,
            &json!({ "email": "bob@example.com", "password": "wrong-password" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/v1/login",
            None,
            &json!({ "email": "ghost@example.com", "password": "hunter2hunter2" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Duplicate registration conflicts.
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/v1/register",
            None,
            &json!({ "email": "bob@example.com", "name": "Imposter", "password": "hunter2hunter2" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT, "{body}");
}

#[tokio::test]
async fn test_cinema_creation_requires_manager_role() {
    let app = test_app().await;
    let user_token = register(&app, "bob@example.com", "Bob", "hunter2hunter2").await;
    let admin_token = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    // No credential at all.
    let (status, _) = send(
        &app,
        json_request("POST", "/v1/cinemas", None, &json!({ "name": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Valid identity, insufficient role.
    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/v1/cinemas",
            Some(&user_token),
            &json!({
                "name": "Bob's Cinema",
                "address": "1 Main St",
                "capacity": 100,
                "email": "bob@example.com",
                "phone_number": "555-0100",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Admin role passes the gate.
    create_cinema(&app, &admin_token, "Grand Central").await;
}

#[tokio::test]
async fn test_opaque_identifiers_end_to_end() {
    let app = test_app().await;
    let admin_token = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let cinema = create_cinema(&app, &admin_token, "Grand Central").await;
    let public_id = cinema["id"].as_str().expect("cinema id must be a string");

    // The public id decodes only with the Cinema tag.
    let row_id = decode_public_id(EntityKind::Cinema, public_id).unwrap();
    assert!(row_id > 0);
    assert!(decode_public_id(EntityKind::Auditorium, public_id).is_err());

    // The nested owner id decodes only with the User tag.
    let owner_id = cinema["owner"]["id"].as_str().unwrap();
    assert!(decode_public_id(EntityKind::User, owner_id).is_ok());
    assert!(decode_public_id(EntityKind::Cinema, owner_id).is_err());

    // The public id round-trips through the read endpoint.
    let (status, body) = send(&app, get_request(&format!("/v1/cinemas/{public_id}"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], cinema["id"]);
    assert_eq!(body["data"]["name"], "Grand Central");

    // Garbage and wrong-tag identifiers read as not found.
    let (status, _) = send(&app, get_request("/v1/cinemas/zzzzzzzz", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, get_request(&format!("/v1/cinemas/{owner_id}"), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_auditorium_ownership_chain_is_masked() {
    let app = test_app().await;
    let admin_token = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let cinema = create_cinema(&app, &admin_token, "Grand Central").await;
    let cinema_public = cinema["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/v1/auditoriums",
            Some(&admin_token),
            &json!({ "name": "Screen 1", "seats": 120, "cinema_id": cinema_public }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let room_public = body["data"]["id"].as_str().unwrap().to_string();
    assert!(decode_public_id(EntityKind::Auditorium, &room_public).is_ok());
    assert_eq!(body["data"]["cinema"]["id"], cinema["id"]);

    // Listed under the cinema, with the nested cinema masked.
    let (status, body) = send(
        &app,
        get_request(&format!("/v1/cinemas/{cinema_public}/auditoriums"), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["id"], room_public);
    assert_eq!(body["data"][0]["cinema"]["id"], cinema["id"]);

    // Direct read hydrates the same chain.
    let (status, body) = send(&app, get_request(&format!("/v1/auditoriums/{room_public}"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Screen 1");

    // Unknown cinema id in the body reads as not found.
    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/v1/auditoriums",
            Some(&admin_token),
            &json!({ "name": "Screen 2", "seats": 80, "cinema_id": room_public }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_show_creation_for_any_authenticated_user() {
    let app = test_app().await;
    let admin_token = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let user_token = register(&app, "bob@example.com", "Bob", "hunter2hunter2").await;

    let cinema = create_cinema(&app, &admin_token, "Grand Central").await;
    let (_, body) = send(
        &app,
        json_request(
            "POST",
            "/v1/auditoriums",
            Some(&admin_token),
            &json!({ "name": "Screen 1", "seats": 120, "cinema_id": cinema["id"] }),
        ),
    )
    .await;
    let room_public = body["data"]["id"].as_str().unwrap().to_string();

    // Unauthenticated show creation is rejected.
    let (status, _) = send(
        &app,
        json_request("POST", "/v1/shows", None, &json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // A plain user may create shows.
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/v1/shows",
            Some(&user_token),
            &json!({
                "auditorium_id": room_public,
                "imdb_id": "tt0133093",
                "starts_at": "2026-08-06T18:00:00Z",
                "ends_at": "2026-08-06T20:30:00Z",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let show_public = body["data"]["id"].as_str().unwrap().to_string();
    assert!(decode_public_id(EntityKind::Show, &show_public).is_ok());
    assert_eq!(body["data"]["auditorium"]["id"], room_public);
    assert_eq!(body["data"]["auditorium"]["cinema"]["id"], cinema["id"]);

    // Reversed time range fails validation.
    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/v1/shows",
            Some(&user_token),
            &json!({
                "auditorium_id": room_public,
                "imdb_id": "tt0133093",
                "starts_at": "2026-08-06T20:30:00Z",
                "ends_at": "2026-08-06T18:00:00Z",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // The listing hydrates and masks the same chain.
    let (status, body) = send(&app, get_request("/v1/shows", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["id"], show_public);
    assert_eq!(body["paging"]["total"], 1);
}

#[tokio::test]
async fn test_profile_update_is_visible_immediately() {
    let app = test_app().await;
    let token = register(&app, "bob@example.com", "Bob", "hunter2hunter2").await;

    let (status, body) = send(&app, get_request("/v1/profile", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Bob");
    let profile_id = body["data"]["id"].as_str().unwrap().to_string();
    assert!(decode_public_id(EntityKind::User, &profile_id).is_ok());

    // Update the display name; the cached identity is evicted, so the next
    // read must reflect the new data.
    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            "/v1/profile",
            Some(&token),
            &json!({ "name": "Robert" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["name"], "Robert");

    let (status, body) = send(&app, get_request("/v1/profile", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Robert");

    // Password updates re-hash and keep login working.
    let (status, _) = send(
        &app,
        json_request(
            "PUT",
            "/v1/profile",
            Some(&token),
            &json!({ "password": "new-password-1" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    login(&app, "bob@example.com", "new-password-1").await;

    let (status, _) = send(
        &app,
        json_request("PUT", "/v1/profile", Some(&token), &json!({ "password": "short" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_bad_credentials_are_unauthorized() {
    let app = test_app().await;

    let (status, _) = send(&app, get_request("/v1/profile", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, get_request("/v1/profile", Some("garbage.token.here"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
