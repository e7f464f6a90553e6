//! ATM Finder API Server
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                           Client                             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Axum Web Server                         │
//! │  ┌─────────────────────────────────────────────────────────┐│
//! │  │                      Routes Layer                        ││
//! │  │  /health  /atms/*  /banks  /states                      ││
//! │  └─────────────────────────────────────────────────────────┘│
//! │  ┌─────────────────────────────────────────────────────────┐│
//! │  │                    Services Layer                        ││
//! │  │  TokenVerifier          Geo distance conversion         ││
//! │  └─────────────────────────────────────────────────────────┘│
//! │  ┌─────────────────────────────────────────────────────────┐│
//! │  │                    Data Layer                            ││
//! │  │  AtmRepository / BankRepository / StateRepository       ││
//! │  │  (PostgreSQL implementation via SQLx)                   ││
//! │  └─────────────────────────────────────────────────────────┘│
//! └─────────────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use atm_finder_api::{
    db::{AtmRepository, BankRepository, HealthProbe, StateRepository},
    routes, AppState, Config, Database, TokenVerifier,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 환경변수 로드
    dotenvy::dotenv().ok();

    // 로깅 초기화
    // RUST_LOG=debug,sqlx=warn 형태로 레벨 제어 가능
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "atm_finder_api=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("🚀 Starting ATM Finder API Server");

    // 설정 로드
    let config = Config::from_env()?;
    tracing::info!("📋 Configuration loaded");

    // 데이터베이스 연결
    let db = Arc::new(Database::connect(&config.database_url).await?);
    tracing::info!("🗄️  Database connected");

    // 마이그레이션 실행
    db.run_migrations().await?;
    tracing::info!("📦 Migrations completed");

    // 토큰 검증 서비스 (시크릿은 Config에서 주입)
    let verifier = TokenVerifier::new(&config.jwt_secret);
    tracing::info!("🔐 Token verifier initialized");

    // 앱 상태 구성: 저장소 trait object로 주입
    let atms: Arc<dyn AtmRepository> = db.clone();
    let banks: Arc<dyn BankRepository> = db.clone();
    let states: Arc<dyn StateRepository> = db.clone();
    let health: Arc<dyn HealthProbe> = db;

    let state = AppState {
        atms,
        banks,
        states,
        health,
        verifier: Arc::new(verifier),
        config: Arc::new(config.clone()),
    };

    // 라우터 구성
    let app = create_router(state);

    // 서버 시작
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🌐 Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// 라우터 생성
///
/// # Route Structure
///
/// ```text
/// GET    /health            - 서버 상태 확인
///
/// GET    /atms              - 근접 검색 (?lng&lat&userid&maxDistance)
/// POST   /atms              - ATM 생성 (토큰 필요)
/// GET    /atms/search       - bank/state 필터 검색
/// GET    /atms/:id          - 단건 조회
/// PUT    /atms/:id          - 수정
/// DELETE /atms/:id          - 삭제
/// POST   /atms/:token       - 생성 변형 (경로 세그먼트가 토큰)
///
/// POST   /banks             - 은행 생성
/// GET    /banks             - 은행 목록
/// POST   /states            - 주 생성
/// GET    /states            - 주 목록
/// ```
fn create_router(state: AppState) -> Router {
    // CORS 설정
    // 프로덕션에서는 특정 도메인만 허용
    // 개발 환경에서는 localhost 허용
    let cors = if state.config.is_production() {
        // 프로덕션: 특정 도메인만 허용 (환경변수로 설정)
        let allowed_origins = std::env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "https://yourdomain.com".to_string());
        let origins: Vec<_> = allowed_origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::DELETE,
            ])
            .allow_headers([axum::http::header::CONTENT_TYPE])
    } else {
        // 개발: 로컬 프론트엔드 허용
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        // Health check
        .route("/health", get(routes::health::health_check))

        // ATMs
        .route(
            "/atms",
            get(routes::atms::nearby_atms).post(routes::atms::create_atm),
        )
        .route("/atms/search", get(routes::atms::search_atms))
        .route(
            "/atms/:id",
            get(routes::atms::get_atm)
                .put(routes::atms::update_atm)
                .delete(routes::atms::delete_atm)
                .post(routes::atms::create_atm_with_token),
        )

        // Reference entities
        .route(
            "/banks",
            get(routes::banks::list_banks).post(routes::banks::create_bank),
        )
        .route(
            "/states",
            get(routes::states::list_states).post(routes::states::create_state),
        )

        // 미들웨어
        .layer(TraceLayer::new_for_http())
        .layer(cors)

        // 상태 주입
        .with_state(state)
}
