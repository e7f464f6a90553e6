//! ATM Finder API Library
//!
//! # Overview
//!
//! ATM 위치 / 은행 / 주(州) 레코드를 관리하는 CRUD API와
//! "가장 가까운 ATM" 근접 검색을 제공합니다.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                         API                              │
//! │                                                          │
//! │  ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌─────────┐    │
//! │  │ Routes  │  │Services │  │   DB    │  │   Geo   │    │
//! │  └────┬────┘  └────┬────┘  └────┬────┘  └────┬────┘    │
//! │       │            │            │            │          │
//! │       └────────────┴────────────┴────────────┘          │
//! │                         │                                │
//! └─────────────────────────┼────────────────────────────────┘
//!                           │
//!                           ▼
//!                  ┌────────────────┐
//!                  │   PostgreSQL   │
//!                  └────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `config`: 환경 설정 관리
//! - `error`: 에러 타입 및 처리
//! - `geo`: 각거리 ↔ km 변환 유틸
//! - `routes`: HTTP 엔드포인트 핸들러
//! - `services`: 토큰 검증 서비스
//! - `db`: 엔티티별 Repository trait + PostgreSQL 구현

use std::sync::Arc;

pub mod config;
pub mod db;
pub mod error;
pub mod geo;
pub mod routes;
pub mod services;

// Re-exports for convenience
pub use config::Config;
pub use db::Database;
pub use error::ApiError;
pub use services::TokenVerifier;

use db::{AtmRepository, BankRepository, HealthProbe, StateRepository};

/// 애플리케이션 전역 상태
///
/// 저장소는 trait object로 주입된다. 프로덕션에서는 세 필드 모두
/// 같은 [`Database`]를 가리키고, 테스트에서는 in-memory mock으로 교체된다.
#[derive(Clone)]
pub struct AppState {
    pub atms: Arc<dyn AtmRepository>,
    pub banks: Arc<dyn BankRepository>,
    pub states: Arc<dyn StateRepository>,
    pub health: Arc<dyn HealthProbe>,
    pub verifier: Arc<TokenVerifier>,
    pub config: Arc<Config>,
}
