//! Geo Distance Utility
//!
//! 구면 geo 쿼리는 거리를 라디안(각거리)으로 반환한다.
//! 이 모듈은 각거리 ↔ km 변환만 담당하는 순수 함수 모음이다.
//! 상태도 에러 경로도 없고, DB 없이 단독으로 테스트 가능.

/// 지구 반지름 (km). 마일 기준은 3959.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// 각거리(라디안) → 선거리(km)
pub fn distance_from_angular(rads: f64) -> f64 {
    rads * EARTH_RADIUS_KM
}

/// 선거리(km) → 각거리(라디안)
pub fn angular_from_distance(km: f64) -> f64 {
    km / EARTH_RADIUS_KM
}
