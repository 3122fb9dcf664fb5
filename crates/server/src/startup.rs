use std::{env, net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes::{self, auth::ServerState};
use service::auth::service::{AuthConfig, AuthService};
use service::events::EventService;
use service::runtime;
use service::storage::JsonStore;

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load host/port from configs or env vars, with sensible fallbacks
fn load_bind_addr() -> anyhow::Result<SocketAddr> {
    let (host, port) = match configs::load_default() {
        Ok(cfg) => {
            let s = cfg.server;
            (s.host, s.port)
        }
        Err(_) => {
            let host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
            let port = env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(3000);
            (host, port)
        }
    };
    Ok(format!("{}:{}", host, port).parse()?)
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    // 配置文件缺失时退回默认值，本地开发零配置可启动
    let mut cfg = configs::load_default().unwrap_or_default();
    cfg.normalize_and_validate()?;

    runtime::ensure_env(&cfg.storage.data_dir).await?;

    // 两份 JSON 文档（users/events）是唯一的持久化介质
    let store =
        Arc::new(JsonStore::new(cfg.storage.users_path(), cfg.storage.events_path()).await?);

    let state = ServerState {
        auth: Arc::new(AuthService::new(
            Arc::clone(&store),
            AuthConfig { min_password_len: cfg.auth.min_password_len },
        )),
        events: Arc::new(EventService::new(Arc::clone(&store))),
    };

    // Build router
    let cors = build_cors();
    let app: Router = routes::build_router(cors, state);

    // Bind and serve
    let addr = load_bind_addr()?;
    info!(%addr, "starting event board server");
    println!("starting event board server at {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
