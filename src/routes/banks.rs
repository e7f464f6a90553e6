//! Bank Endpoints
//!
//! 은행은 이 API 표면에서 생성 후 불변이다. 생성과 목록만 제공하고
//! 수정/삭제 엔드포인트는 없다.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use crate::{db::Bank, error::ApiError, AppState};

// ============ Request/Response Types ============

/// 은행 생성 요청 (id는 호출자 지정)
#[derive(Debug, Deserialize)]
pub struct CreateBankRequest {
    pub id: String,
    pub name: String,
}

// ============ Handlers ============

/// POST /banks
///
/// 은행 레코드 생성. 중복 id 등 스토어가 거부하면 500-class로 보고.
pub async fn create_bank(
    State(state): State<AppState>,
    Json(req): Json<CreateBankRequest>,
) -> Result<(StatusCode, Json<Bank>), ApiError> {
    let bank = Bank {
        id: req.id,
        name: req.name,
    };
    state.banks.create(&bank).await?;

    Ok((StatusCode::CREATED, Json(bank)))
}

/// GET /banks
///
/// 전체 은행 목록. id와 name만 노출한다.
pub async fn list_banks(
    State(state): State<AppState>,
) -> Result<Json<Vec<Bank>>, ApiError> {
    let banks = state.banks.list().await?;
    Ok(Json(banks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::atms::tests::test_state;

    #[tokio::test]
    async fn test_create_then_list() {
        let state = test_state();

        let (status, Json(bank)) = create_bank(
            State(state.clone()),
            Json(CreateBankRequest {
                id: "chase".to_string(),
                name: "Chase".to_string(),
            }),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(bank.id, "chase");

        let Json(banks) = list_banks(State(state)).await.unwrap();
        assert!(banks.iter().any(|b| b.id == "chase" && b.name == "Chase"));
    }

    #[tokio::test]
    async fn test_list_exposes_only_id_and_name() {
        let state = test_state();
        create_bank(
            State(state.clone()),
            Json(CreateBankRequest {
                id: "citi".to_string(),
                name: "Citi".to_string(),
            }),
        )
        .await
        .unwrap();

        let Json(banks) = list_banks(State(state)).await.unwrap();
        let value = serde_json::to_value(&banks).unwrap();
        let first = value.as_array().unwrap()[0].as_object().unwrap();
        let mut keys: Vec<_> = first.keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["id", "name"]);
    }
}
