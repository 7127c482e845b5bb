//! # Parla 웹 서버 진입점
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. 설정 로딩
//! 4. SQLite 연결 풀 생성과 마이그레이션
//! 5. API 라우터 설정 (+ 선택적으로 셸 정적 파일)
//! 6. HTTP 서버 시작

use anyhow::Result;
use axum::Router;
use parla::{
    config::Config,
    db,
    routes::{self, AppState},
    services::registry::SessionRegistry,
};
use std::path::Path;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // .env 파일이 없어도 에러 없이 넘어갑니다
    dotenvy::dotenv().ok();

    // RUST_LOG가 없으면 parla, tower_http, axum을 debug 레벨로 출력합니다
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parla=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!("Starting Parla server on {}:{}", config.host, config.port);
    tracing::info!(
        model = %config.llm.model,
        base_url = %config.llm.base_url,
        context_window = ?config.context_window,
        server_key = config.llm.api_key.is_some(),
        session_idle_secs = config.session_idle.as_secs(),
        "Language model settings"
    );

    let pool = db::connect(&config.database_url).await?;

    tracing::info!("Running database migrations...");
    db::migrate(&pool).await?;

    // 셸이 DELETE 없이 닫혀도 세션이 쌓이지 않도록 유휴 세션을 주기적으로 정리합니다
    let sessions = SessionRegistry::new();
    sessions.spawn_idle_sweeper(config.session_idle);

    let state = AppState {
        pool,
        sessions,
        llm: config.llm.clone(),
        context_window: config.context_window,
    };

    let api_routes = routes::api_router(state);

    // 개발 환경용: 모든 출처 허용
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // 셸 빌드가 있으면 같은 서버에서 서빙합니다 (SPA: 없는 경로는 index.html)
    let app = match config.static_dir.as_deref() {
        Some(dir) if Path::new(dir).exists() => {
            tracing::info!("Serving shell static files from {}", dir);
            let serve_dir =
                ServeDir::new(dir).not_found_service(ServeFile::new(Path::new(dir).join("index.html")));

            Router::new()
                .nest("/api/v1", api_routes)
                .fallback_service(serve_dir)
                .layer(cors)
                .layer(TraceLayer::new_for_http())
        }
        other => {
            if let Some(dir) = other {
                tracing::warn!("Static directory {} not found, serving API only", dir);
            }

            Router::new()
                .nest("/api/v1", api_routes)
                .layer(cors)
                .layer(TraceLayer::new_for_http())
        }
    };

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
