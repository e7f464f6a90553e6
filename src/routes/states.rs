//! State Endpoints
//!
//! 주(州) 레코드도 은행과 동일하게 생성/목록만 제공한다.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use crate::{db::StateRecord, error::ApiError, AppState};

// ============ Request/Response Types ============

/// 주 생성 요청 (id는 호출자 지정)
#[derive(Debug, Deserialize)]
pub struct CreateStateRequest {
    pub id: String,
    pub name: String,
}

// ============ Handlers ============

/// POST /states
pub async fn create_state(
    State(state): State<AppState>,
    Json(req): Json<CreateStateRequest>,
) -> Result<(StatusCode, Json<StateRecord>), ApiError> {
    let record = StateRecord {
        id: req.id,
        name: req.name,
    };
    state.states.create(&record).await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /states
pub async fn list_states(
    State(state): State<AppState>,
) -> Result<Json<Vec<StateRecord>>, ApiError> {
    let states = state.states.list().await?;
    Ok(Json(states))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::atms::tests::test_state;

    #[tokio::test]
    async fn test_create_then_list() {
        let state = test_state();

        let (status, Json(record)) = create_state(
            State(state.clone()),
            Json(CreateStateRequest {
                id: "ny".to_string(),
                name: "New York".to_string(),
            }),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(record.name, "New York");

        let Json(states) = list_states(State(state)).await.unwrap();
        assert!(states.iter().any(|s| s.id == "ny"));
    }

    #[tokio::test]
    async fn test_list_exposes_only_id_and_name() {
        let state = test_state();
        create_state(
            State(state.clone()),
            Json(CreateStateRequest {
                id: "ca".to_string(),
                name: "California".to_string(),
            }),
        )
        .await
        .unwrap();

        let Json(states) = list_states(State(state)).await.unwrap();
        let value = serde_json::to_value(&states).unwrap();
        let first = value.as_array().unwrap()[0].as_object().unwrap();
        let mut keys: Vec<_> = first.keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["id", "name"]);
    }
}
