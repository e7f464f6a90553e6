//! Health Check Endpoint
//!
//! 이 서비스는 요청 사이에 아무 상태도 들고 있지 않아서, 프로세스가
//! 떠 있다는 것만으로는 의미가 없다. ATM/Bank/State 조회가 실제로
//! 가능한지는 전적으로 스토어 연결에 달려 있으므로 [`HealthProbe`]를
//! 통해 스토어를 한 번 ping하는 깊은 헬스체크를 수행한다.
//!
//! ping 실패 시에도 응답 자체는 200이고 status만 "degraded"로 바뀐다.
//! 연결 판정은 로드밸런서/오케스트레이터가 이 필드로 내린다.
//!
//! [`HealthProbe`]: crate::db::HealthProbe

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

/// Health check 응답
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: DatabaseStatus,
    pub timestamp: String,
}

#[derive(Serialize)]
pub struct DatabaseStatus {
    pub connected: bool,
    pub latency_ms: Option<u64>,
}

/// GET /health
///
/// 서버 및 의존성 상태 확인
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    // DB 연결 테스트
    let db_start = std::time::Instant::now();
    let db_status = match state.health.ping().await {
        Ok(_) => DatabaseStatus {
            connected: true,
            latency_ms: Some(db_start.elapsed().as_millis() as u64),
        },
        Err(_) => DatabaseStatus {
            connected: false,
            latency_ms: None,
        },
    };

    Json(HealthResponse {
        status: if db_status.connected { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
