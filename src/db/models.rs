//! Database Models
//!
//! ATM / Bank / State 레코드와 근접 검색에 쓰이는 임시 값 객체 정의.
//! 스토어가 유일한 source of truth이며, 서비스는 요청 사이에
//! 어떤 상태도 메모리에 유지하지 않는다.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// ATM 레코드
///
/// 좌표는 항상 (경도, 위도) 순서로 저장/직렬화한다.
/// 순서를 뒤집는 실수가 잦은 지점이라 컬럼명도 lng/lat로 고정.
#[derive(Debug, Clone, FromRow)]
pub struct Atm {
    pub id: Uuid,

    /// Bank 참조 (쓰기 시점에 존재 검증 안 함, 조회 시 없으면 null로 확장)
    pub bank_id: String,

    /// State 참조 (동일)
    pub state_id: String,

    pub address: String,

    /// 경도 (longitude). 좌표쌍의 첫 번째 원소
    pub lng: f64,

    /// 위도 (latitude). 좌표쌍의 두 번째 원소
    pub lat: f64,

    /// 수수료/비용 추정치
    pub estimate: Option<f64>,

    /// 생성한 사용자 (검증된 토큰의 username)
    pub owner: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 근접 검색 결과 한 건
///
/// angular_distance는 스토어가 반환한 각거리(라디안).
/// km 변환은 핸들러가 geo 유틸로 수행하며, 거리는 절대 저장되지 않는다.
#[derive(Debug, Clone, FromRow)]
pub struct NearbyAtm {
    #[sqlx(flatten)]
    pub atm: Atm,
    pub angular_distance: f64,
}

/// 요청마다 새로 구성되는 근접 검색 질의점 (비영속)
#[derive(Debug, Clone)]
pub struct QueryPoint {
    pub lng: f64,
    pub lat: f64,
    /// 검색 반경 (각거리, 라디안)
    pub max_radius_rad: f64,
    /// 소유자 필터 (userid 쿼리 파라미터)
    pub owner: Option<String>,
}

/// 자유 검색 필터 (bank/state, 둘 다 주어지면 AND)
#[derive(Debug, Clone, Default)]
pub struct AtmFilter {
    pub bank_id: Option<String>,
    pub state_id: Option<String>,
}

/// Bank 레코드 (생성 후 불변, id는 호출자 지정)
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Bank {
    pub id: String,
    pub name: String,
}

/// State 레코드 (생성 후 불변, id는 호출자 지정)
///
/// `State`는 axum extractor와 이름이 겹쳐서 레코드 쪽을 StateRecord로 명명
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StateRecord {
    pub id: String,
    pub name: String,
}
