//! ATM Endpoints
//!
//! 이 서비스에서 유일하게 다단계 오케스트레이션이 있는 핸들러 모음.
//! 근접 검색 흐름: 쿼리 파라미터 검증 → 스토어 geo 쿼리 → 각거리를 km로
//! 변환해 부착 → bank/state 참조를 배치로 확장 → 가까운 순서 그대로 응답.
//!
//! # Endpoints
//!
//! ```text
//! GET    /atms          ?lng&lat&userid&maxDistance  근접 검색
//! POST   /atms          생성 (토큰: body > query > path 우선순위)
//! GET    /atms/:id      단건 조회
//! PUT    /atms/:id      수정 (shallow merge)
//! DELETE /atms/:id      삭제
//! POST   /atms/:token   생성 변형 (경로 세그먼트가 토큰)
//! GET    /atms/search   ?bank&state 필터 검색
//! ```

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    db::{Atm, AtmFilter, QueryPoint},
    error::ApiError,
    geo, AppState,
};

// ============ Request/Response Types ============

/// 근접 검색 쿼리 파라미터
///
/// lng/lat는 문자열로 받아 직접 파싱한다. `0`은 유효한 좌표이므로
/// "falsy = 없음" 류의 판정을 하면 안 된다. 누락과 파싱 실패만 거부.
#[derive(Debug, Default, Deserialize)]
pub struct NearbyQuery {
    pub lng: Option<String>,
    pub lat: Option<String>,
    /// 소유자 필터
    pub userid: Option<String>,
    /// 검색 반경 (km). 생략 시 설정 기본값(100km)
    #[serde(rename = "maxDistance")]
    pub max_distance: Option<f64>,
}

/// 자유 검색 쿼리 파라미터 (둘 다 있으면 AND)
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub bank: Option<String>,
    pub state: Option<String>,
}

/// 쿼리 스트링으로 전달되는 토큰
#[derive(Debug, Default, Deserialize)]
pub struct TokenQuery {
    pub token: Option<String>,
}

/// ATM 생성 요청
///
/// 좌표는 문자열 입력을 부동소수점으로 파싱한다.
#[derive(Debug, Deserialize)]
pub struct CreateAtmRequest {
    pub bank: String,
    pub address: String,
    pub state: String,
    pub estimate: Option<f64>,
    pub lng: String,
    pub lat: String,
    /// body로 전달된 토큰 (query/path보다 우선)
    pub token: Option<String>,
}

/// ATM 수정 요청. 주어진 필드만 덮어쓴다 (shallow merge)
#[derive(Debug, Default, Deserialize)]
pub struct UpdateAtmRequest {
    pub bank: Option<String>,
    pub address: Option<String>,
    pub state: Option<String>,
    pub estimate: Option<f64>,
    pub lng: Option<String>,
    pub lat: Option<String>,
}

/// 참조 확장 결과: 저장된 id를 표시용 {id, name}으로 펼친 것
#[derive(Debug, Clone, Serialize)]
pub struct RefEntity {
    pub id: String,
    pub name: String,
}

/// ATM 응답
///
/// coords는 항상 [경도, 위도] 순서. distance는 근접 검색에서만 채워지는
/// 질의점 기준 계산값이며 저장되지 않는다.
#[derive(Debug, Serialize)]
pub struct AtmResponse {
    pub id: Uuid,
    /// 끊긴 참조는 null
    pub bank: Option<RefEntity>,
    pub state: Option<RefEntity>,
    pub address: String,
    pub coords: [f64; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimate: Option<f64>,
    pub user: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// 질의점으로부터의 거리 (km)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

// ============ Handlers ============

/// GET /atms?lng&lat&userid&maxDistance
///
/// 가까운 순서로 정렬된 ATM 목록. 각 항목에 거리(km)와 확장된
/// bank/state 참조가 붙는다.
///
/// - lng/lat 누락 또는 숫자 아님 → 400
/// - 결과 없음은 에러가 아님 → 200 + 빈 리스트
/// - 스토어 장애 → 500-class
pub async fn nearby_atms(
    State(state): State<AppState>,
    Query(query): Query<NearbyQuery>,
) -> Result<Json<Vec<AtmResponse>>, ApiError> {
    let lng = parse_required_coord(query.lng.as_deref(), "lng")?;
    let lat = parse_required_coord(query.lat.as_deref(), "lat")?;

    // 호출자의 maxDistance(km)를 존중, 생략 시 설정 기본값
    let radius_km = query
        .max_distance
        .unwrap_or(state.config.default_max_distance_km);

    let point = QueryPoint {
        lng,
        lat,
        max_radius_rad: geo::angular_from_distance(radius_km),
        owner: query.userid,
    };

    // 스토어가 가까운 순서로 정렬된 (레코드, 각거리) 쌍을 반환
    let matches = state.atms.find_near(&point).await?;

    let items: Vec<(Atm, Option<f64>)> = matches
        .into_iter()
        .map(|n| {
            let distance = geo::distance_from_angular(n.angular_distance);
            (n.atm, Some(distance))
        })
        .collect();

    let expanded = expand_refs(&state, items).await?;
    Ok(Json(expanded))
}

/// POST /atms
pub async fn create_atm(
    State(state): State<AppState>,
    Query(query): Query<TokenQuery>,
    Json(req): Json<CreateAtmRequest>,
) -> Result<(StatusCode, Json<AtmResponse>), ApiError> {
    create_atm_inner(state, query.token, None, req).await
}

/// POST /atms/:token
///
/// 경로 세그먼트로 토큰을 전달하는 생성 변형
pub async fn create_atm_with_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Query(query): Query<TokenQuery>,
    Json(req): Json<CreateAtmRequest>,
) -> Result<(StatusCode, Json<AtmResponse>), ApiError> {
    create_atm_inner(state, query.token, Some(token), req).await
}

async fn create_atm_inner(
    state: AppState,
    query_token: Option<String>,
    path_token: Option<String>,
    req: CreateAtmRequest,
) -> Result<(StatusCode, Json<AtmResponse>), ApiError> {
    // 토큰 우선순위: body > query > path
    let token = req
        .token
        .clone()
        .or(query_token)
        .or(path_token)
        .ok_or(ApiError::TokenMissing)?;

    let claims = state
        .verifier
        .verify(&token)
        .map_err(|_| ApiError::TokenInvalid)?;

    let lng = parse_coord(&req.lng, "lng")?;
    let lat = parse_coord(&req.lat, "lat")?;

    let now = Utc::now();
    let atm = Atm {
        id: Uuid::new_v4(),
        bank_id: req.bank,
        state_id: req.state,
        address: req.address,
        lng,
        lat,
        estimate: req.estimate,
        owner: claims.username,
        created_at: now,
        updated_at: now,
    };

    state.atms.create(&atm).await?;
    tracing::info!(atm_id = %atm.id, owner = %atm.owner, "ATM created");

    // 생성 직후 재조회해서 확장된 형태로 반환
    let created = state
        .atms
        .find_by_id(atm.id)
        .await?
        .ok_or(ApiError::InternalError)?;

    let mut expanded = expand_refs(&state, vec![(created, None)]).await?;
    Ok((StatusCode::CREATED, Json(expanded.remove(0))))
}

/// GET /atms/:id
pub async fn get_atm(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AtmResponse>, ApiError> {
    let atm = state
        .atms
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("ATM".to_string()))?;

    let mut expanded = expand_refs(&state, vec![(atm, None)]).await?;
    Ok(Json(expanded.remove(0)))
}

/// PUT /atms/:id
///
/// 기존 레코드를 읽어 요청 body의 필드만 덮어쓰고 updated_at을 갱신한다.
/// create와 달리 토큰 검증이 없다 (기존 API 표면과의 호환).
pub async fn update_atm(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateAtmRequest>,
) -> Result<Json<AtmResponse>, ApiError> {
    let mut atm = state
        .atms
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("ATM".to_string()))?;

    if let Some(bank) = req.bank {
        atm.bank_id = bank;
    }
    if let Some(state_id) = req.state {
        atm.state_id = state_id;
    }
    if let Some(address) = req.address {
        atm.address = address;
    }
    if let Some(estimate) = req.estimate {
        atm.estimate = Some(estimate);
    }
    if let Some(lng) = req.lng {
        atm.lng = parse_coord(&lng, "lng")?;
    }
    if let Some(lat) = req.lat {
        atm.lat = parse_coord(&lat, "lat")?;
    }
    atm.updated_at = Utc::now();

    if !state.atms.update(&atm).await? {
        return Err(ApiError::NotFound("ATM".to_string()));
    }

    let mut expanded = expand_refs(&state, vec![(atm, None)]).await?;
    Ok(Json(expanded.remove(0)))
}

/// DELETE /atms/:id
///
/// 성공 시 204 빈 응답. 없는 id는 404 (조용한 성공 금지).
pub async fn delete_atm(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.atms.delete(id).await? {
        tracing::info!(atm_id = %id, "ATM deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("ATM".to_string()))
    }
}

/// GET /atms/search?bank&state
///
/// bank/state 필터 검색. 둘 다 주어지면 AND, 없으면 전체.
pub async fn search_atms(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<AtmResponse>>, ApiError> {
    let filter = AtmFilter {
        bank_id: query.bank,
        state_id: query.state,
    };

    let atms = state.atms.find_many(&filter).await?;
    let items = atms.into_iter().map(|a| (a, None)).collect();

    let expanded = expand_refs(&state, items).await?;
    Ok(Json(expanded))
}

// ============ Helpers ============

/// 필수 좌표 쿼리 파라미터 파싱. `0`도 유효한 값이다.
fn parse_required_coord(value: Option<&str>, name: &str) -> Result<f64, ApiError> {
    match value {
        None => Err(ApiError::BadRequest(
            "lng and lat query parameters are required".to_string(),
        )),
        Some(raw) => raw.parse::<f64>().map_err(|_| {
            ApiError::BadRequest(format!("{} must be a valid number", name))
        }),
    }
}

/// body 좌표 문자열 파싱
fn parse_coord(raw: &str, name: &str) -> Result<f64, ApiError> {
    raw.parse::<f64>()
        .map_err(|_| ApiError::BadRequest(format!("{} must be a valid number", name)))
}

/// bank/state 참조 배치 확장
///
/// 전체 결과에서 중복 제거한 id 집합으로 엔티티 타입당 한 번씩만 조회한다
/// (ATM당 왕복 금지). 스토어에 없는 참조는 null로 남는다.
async fn expand_refs(
    state: &AppState,
    items: Vec<(Atm, Option<f64>)>,
) -> Result<Vec<AtmResponse>, ApiError> {
    let mut bank_ids: Vec<String> = items.iter().map(|(a, _)| a.bank_id.clone()).collect();
    bank_ids.sort();
    bank_ids.dedup();

    let mut state_ids: Vec<String> = items.iter().map(|(a, _)| a.state_id.clone()).collect();
    state_ids.sort();
    state_ids.dedup();

    let banks = state.banks.find_by_ids(&bank_ids).await?;
    let states = state.states.find_by_ids(&state_ids).await?;

    let bank_names: HashMap<String, String> =
        banks.into_iter().map(|b| (b.id, b.name)).collect();
    let state_names: HashMap<String, String> =
        states.into_iter().map(|s| (s.id, s.name)).collect();

    let responses = items
        .into_iter()
        .map(|(atm, distance)| AtmResponse {
            id: atm.id,
            bank: bank_names.get(&atm.bank_id).map(|name| RefEntity {
                id: atm.bank_id.clone(),
                name: name.clone(),
            }),
            state: state_names.get(&atm.state_id).map(|name| RefEntity {
                id: atm.state_id.clone(),
                name: name.clone(),
            }),
            address: atm.address,
            coords: [atm.lng, atm.lat],
            estimate: atm.estimate,
            user: atm.owner,
            created_at: atm.created_at,
            updated_at: atm.updated_at,
            distance,
        })
        .collect();

    Ok(responses)
}
