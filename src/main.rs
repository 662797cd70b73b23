//! # liftlog 웹 서버 진입점
//!
//! 운동 세션 기록과 템플릿 저장/불러오기를 제공하는 서버입니다.
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. SQLite 연결 풀 생성 + 마이그레이션
//! 4. 문서 저장소(실시간 피드 포함) 열기
//! 5. API 라우터 설정
//! 6. HTTP 서버 시작 (Ctrl+C로 정상 종료)

mod config;
mod db;
mod error;
mod models;
mod routes;
mod services;
mod store;

use anyhow::Result;
use axum::Router;
use config::Config;
use routes::AppState;
use store::DocumentStore;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1단계: 환경변수 로딩 ──
    // .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    // ── 2단계: 로깅(tracing) 초기화 ──
    // RUST_LOG가 없으면 liftlog, tower_http, axum 모듈을 debug 레벨로 설정
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "liftlog=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // ── 3단계: 설정 로딩 ──
    let config = Config::from_env()?;
    tracing::info!("Starting liftlog server on {}:{}", config.host, config.port);

    // ── 4단계: 연결 풀 + 마이그레이션 ──
    let pool = db::connect(&config.database_url, config.max_connections).await?;

    // ── 5단계: 저장소와 서비스 ──
    // 저장소를 여는 순간 두 컬렉션의 초기 스냅샷이 피드에 올라갑니다.
    let store = DocumentStore::open(pool).await?;
    let state = AppState::new(store);

    // ── 6단계: 라우터 + 미들웨어 ──
    // 모바일 클라이언트가 호출하므로 CORS는 모두 허용합니다.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .nest("/api/v1", routes::api_router(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // ── 7단계: 서버 시작 ──
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Ctrl+C를 기다립니다. 신호 처리기를 설치하지 못하면 경고만 남기고 계속 실행합니다.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
