use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use server::routes::{self, auth::ServerState};
use service::auth::service::{AuthConfig, AuthService};
use service::events::EventService;
use service::storage::JsonStore;

fn cors() -> CorsLayer { CorsLayer::very_permissive() }

struct TestApp {
    base_url: String,
}

async fn start_server() -> anyhow::Result<TestApp> {
    // Use isolated data files per test run
    let temp_id = Uuid::new_v4();
    let users_path = format!("target/test-data/{}/users.json", temp_id);
    let events_path = format!("target/test-data/{}/events.json", temp_id);
    let store = Arc::new(JsonStore::new(users_path, events_path).await?);

    let state = ServerState {
        auth: Arc::new(AuthService::new(Arc::clone(&store), AuthConfig::default())),
        events: Arc::new(EventService::new(Arc::clone(&store))),
    };

    let app: Router = routes::build_router(cors(), state);
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url })
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("reqwest client")
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_openapi_document_served() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client()
        .get(format!("{}/api-docs/openapi.json", app.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert!(body["paths"].get("/api/events").is_some());
    Ok(())
}

#[tokio::test]
async fn e2e_register_login_verify() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let email = format!("user_{}@example.com", Uuid::new_v4());
    let username = format!("user_{}", Uuid::new_v4().simple());

    // Register
    let res = c.post(format!("{}/api/auth/register", app.base_url))
        .json(&json!({"username": username, "email": email, "password": "S3curePass"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let registered = res.json::<serde_json::Value>().await?;
    let token = registered["token"].as_str().unwrap().to_string();

    // Login returns the same token
    let res = c.post(format!("{}/api/auth/login", app.base_url))
        .json(&json!({"email": email, "password": "S3curePass"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let logged_in = res.json::<serde_json::Value>().await?;
    assert_eq!(logged_in["token"], token.as_str());

    // Verify with the raw header the legacy client sends
    let res = c.get(format!("{}/api/auth/verify", app.base_url))
        .header("authorization", &token)
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["authenticated"], true);
    assert_eq!(body["user"]["username"], username.as_str());
    Ok(())
}

#[tokio::test]
async fn e2e_event_vote_flow() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    // Create an event without authentication
    let res = c.post(format!("{}/api/events", app.base_url))
        .json(&json!({
            "title": "5v5", "description": "friendly match", "location": "Park",
            "date": "2024-06-01", "time": "18:00", "category": "Football"
        }))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let event = res.json::<serde_json::Value>().await?;
    let event_id = event["id"].as_str().unwrap().to_string();

    // Voting without a token is rejected
    let res = c.post(format!("{}/api/events/{}/vote", app.base_url, event_id))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNAUTHORIZED);

    // Register and vote
    let res = c.post(format!("{}/api/auth/register", app.base_url))
        .json(&json!({"username": "alice", "email": "a@x.com", "password": "pw1234"}))
        .send().await?;
    let token = res.json::<serde_json::Value>().await?["token"].as_str().unwrap().to_string();

    let res = c.post(format!("{}/api/events/{}/vote", app.base_url, event_id))
        .header("authorization", &token)
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["votes"], 1);

    // One vote per user per event
    let res = c.post(format!("{}/api/events/{}/vote", app.base_url, event_id))
        .header("authorization", &token)
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    // The listing still reports a single vote
    let res = c.get(format!("{}/api/events", app.base_url)).send().await?;
    let list = res.json::<serde_json::Value>().await?;
    assert_eq!(list[0]["votes"], 1);
    Ok(())
}
