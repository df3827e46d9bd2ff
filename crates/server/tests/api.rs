use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use talent_match_server::api::{AppState, create_router};
use talent_match_server::config::ServerConfig;
use talent_match_server::db::init_pool_and_migrate;
use tower::ServiceExt;

const CONFIG: &str = r#"
[auth]
jwt_secret = "integration-test-secret"
allow_admin_registration = true
"#;

async fn app_with(config: &str) -> Router {
    let config = ServerConfig::from_str(config).expect("test config should parse");
    let db = init_pool_and_migrate("sqlite::memory:")
        .await
        .expect("in-memory database should migrate");
    let state = AppState::new(db, &config).expect("state should build");
    create_router(Arc::new(state))
}

async fn app() -> Router {
    app_with(CONFIG).await
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .expect("request should build");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("router should answer");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn register(app: &Router, email: &str, name: &str, role: &str) -> (String, String) {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/register",
        None,
        Some(json!({
            "email": email,
            "name": name,
            "password": "password123",
            "role": role,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register {email}: {body}");

    let token = body["access_token"]
        .as_str()
        .expect("token in response")
        .to_string();
    let user_id = body["user_id"].as_str().expect("user id").to_string();
    (token, user_id)
}

async fn create_company(app: &Router, token: &str, name: &str, registration_id: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/companies",
        Some(token),
        Some(json!({
            "name": name,
            "registration_id": registration_id,
            "description": "We build things",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create company: {body}");
    body["id"].as_str().expect("company id").to_string()
}

async fn create_challenge(app: &Router, token: &str, title: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/challenges",
        Some(token),
        Some(json!({ "title": title, "description": "Solve it" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create challenge: {body}");
    body["id"].as_str().expect("challenge id").to_string()
}

async fn respond(app: &Router, token: &str, challenge_id: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/responses",
        Some(token),
        Some(json!({ "challenge_id": challenge_id, "body": "My answer" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "respond: {body}");
    body["id"].as_str().expect("response id").to_string()
}

async fn evaluate(app: &Router, token: &str, response_id: &str, score: f64) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        "/api/evaluations",
        Some(token),
        Some(json!({ "response_id": response_id, "score": score, "comment": "noted" })),
    )
    .await
}

#[tokio::test]
async fn health_banner() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/api/", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "talent-match");
    assert_eq!(body["status"], "active");
}

#[tokio::test]
async fn evaluation_flow_drives_matches_and_stats() {
    let app = app().await;
    let (acme, _) = register(&app, "acme@example.com", "Acme HR", "company").await;
    let (globex, _) = register(&app, "globex@example.com", "Globex HR", "company").await;
    let (student, student_id) = register(&app, "ana@example.com", "Ana", "student").await;
    let (admin, _) = register(&app, "root@example.com", "Root", "admin").await;

    let acme_id = create_company(&app, &acme, "Acme", "11222333000181").await;
    create_company(&app, &globex, "Globex", "99888777000166").await;
    let first_challenge = create_challenge(&app, &acme, "Parser").await;
    let second_challenge = create_challenge(&app, &acme, "Scheduler").await;
    let first_response = respond(&app, &student, &first_challenge).await;
    let second_response = respond(&app, &student, &second_challenge).await;

    let (status, body) = evaluate(&app, &acme, &first_response, 7.0).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["score"], 7.0);

    let (status, matches) = send(&app, Method::GET, "/api/matches", Some(&student), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        matches,
        json!([{
            "student_id": student_id,
            "student_name": "Ana",
            "company_id": acme_id,
            "company_name": "Acme",
            "average_score": 7.0,
            "evaluation_count": 1,
        }])
    );

    let (status, body) = evaluate(&app, &acme, &first_response, 2.0).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "already_evaluated");
    let (_, stored) = send(
        &app,
        Method::GET,
        &format!("/api/evaluations/response/{first_response}"),
        Some(&student),
        None,
    )
    .await;
    assert_eq!(stored["score"], 7.0);

    let (status, body) = evaluate(&app, &globex, &second_response, 9.0).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "forbidden");

    let (status, body) = evaluate(&app, &acme, &second_response, 10.5).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_score");

    let (status, _) = evaluate(&app, &acme, &second_response, 5.0).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, matches) = send(&app, Method::GET, "/api/matches", Some(&acme), None).await;
    assert_eq!(matches, json!([]));

    let aggregate_uri = format!("/api/matches/{student_id}/{acme_id}");
    let (status, aggregate) = send(&app, Method::GET, &aggregate_uri, Some(&acme), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(aggregate["average_score"], 6.0);
    assert_eq!(aggregate["evaluation_count"], 2);
    assert_eq!(aggregate["is_match"], false);

    let (status, _) = send(&app, Method::GET, &aggregate_uri, Some(&globex), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, Method::GET, "/api/admin/stats", Some(&student), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, stats) = send(&app, Method::GET, "/api/admin/stats", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        stats,
        json!({
            "total_users": 4,
            "admin_users": 1,
            "company_users": 2,
            "student_users": 1,
            "total_companies": 2,
            "total_challenges": 2,
            "total_responses": 2,
            "total_evaluations": 2,
        })
    );
}

#[tokio::test]
async fn identity_failures() {
    let app = app().await;
    register(&app, "ana@example.com", "Ana", "student").await;

    let (status, body) = send(&app, Method::GET, "/api/profile", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthenticated");

    let (status, _) = send(&app, Method::GET, "/api/profile", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "email": "ana@example.com", "password": "not-the-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "invalid email or password");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/register",
        None,
        Some(json!({
            "email": "ANA@example.com",
            "name": "Ana again",
            "password": "password123",
            "role": "student",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "conflict");
}

#[tokio::test]
async fn login_returns_a_working_token() {
    let app = app().await;
    register(&app, "ana@example.com", "Ana", "student").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "email": "ana@example.com", "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["access_token"].as_str().expect("token").to_string();

    let (status, profile) = send(&app, Method::GET, "/api/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["email"], "ana@example.com");
    assert_eq!(profile["role"], "student");
}

#[tokio::test]
async fn role_and_catalog_rules() {
    let app = app().await;
    let (acme, _) = register(&app, "acme@example.com", "Acme HR", "company").await;
    let (student, _) = register(&app, "ana@example.com", "Ana", "student").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/challenges",
        Some(&student),
        Some(json!({ "title": "Nope", "description": "Students cannot post" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/challenges",
        Some(&acme),
        Some(json!({ "title": "Early", "description": "No profile yet" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");

    create_company(&app, &acme, "Acme", "11222333000181").await;
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/companies",
        Some(&acme),
        Some(json!({
            "name": "Acme Two",
            "registration_id": "00000000000000",
            "description": "Second profile",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let challenge = create_challenge(&app, &acme, "Parser").await;
    respond(&app, &student, &challenge).await;
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/responses",
        Some(&student),
        Some(json!({ "challenge_id": challenge, "body": "Second try" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, responses) = send(
        &app,
        Method::GET,
        &format!("/api/responses/challenge/{challenge}"),
        Some(&acme),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(responses.as_array().map(Vec::len), Some(1));

    let (status, _) = send(
        &app,
        Method::GET,
        "/api/evaluations/response/not-a-uuid",
        Some(&acme),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = evaluate(&app, &acme, "not-a-uuid", 8.0).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[tokio::test]
async fn admin_self_registration_is_disabled_by_default() {
    let app = app_with("[auth]\njwt_secret = \"integration-test-secret\"\n").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/register",
        None,
        Some(json!({
            "email": "root@example.com",
            "name": "Root",
            "password": "password123",
            "role": "admin",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}
