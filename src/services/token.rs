//! Token Verifier Service
//!
//! # Interview Q&A
//!
//! Q: 왜 세션 대신 JWT인가?
//! A: 이 API는 상태를 갖지 않는다
//!    - 토큰 자체가 서명된 claim을 운반 → 서버 측 세션 저장소 불필요
//!    - 검증은 시크릿으로 서명만 확인하면 끝 (스토어 왕복 없음)
//!    - 발급은 별도 프로필 서비스의 책임, 여기서는 검증만 수행
//!
//! Q: 시크릿은 어디서 오는가?
//! A: 전역 env 읽기가 아니라 Config를 통해 생성자로 주입
//!    - 테스트에서 임의 시크릿으로 교체 가능

use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// 검증된 토큰이 운반하는 identity claim
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// ATM 레코드의 소유자로 기록되는 사용자명
    pub username: String,
    /// 만료 시각 (unix timestamp)
    pub exp: usize,
}

/// JWT 자격 증명 검증 서비스
///
/// 쓰기 연산 전에 호출되어 서명과 만료를 확인하고 [`Claims`]를 돌려준다.
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
    #[cfg(test)]
    secret: Vec<u8>,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
            #[cfg(test)]
            secret: secret.as_bytes().to_vec(),
        }
    }

    /// 토큰 서명/만료 검증
    ///
    /// 서명 불일치, 만료, 형식 오류 모두 Err로 귀결된다.
    /// 호출자는 이를 401로 매핑한다.
    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }

    /// 테스트용 토큰 발급 (실제 발급은 프로필 서비스 담당)
    #[cfg(test)]
    pub fn issue(&self, username: &str, ttl_secs: i64) -> String {
        use jsonwebtoken::{encode, EncodingKey, Header};

        let claims = Claims {
            username: username.to_string(),
            exp: (chrono::Utc::now().timestamp() + ttl_secs) as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(&self.secret),
        )
        .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_valid_token() {
        let verifier = TokenVerifier::new("test-secret");
        let token = verifier.issue("alice", 3600);

        let claims = verifier.verify(&token).unwrap();
        assert_eq!(claims.username, "alice");
    }

    #[test]
    fn test_reject_wrong_secret() {
        let issuer = TokenVerifier::new("other-secret");
        let verifier = TokenVerifier::new("test-secret");

        let token = issuer.issue("alice", 3600);
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn test_reject_expired_token() {
        let verifier = TokenVerifier::new("test-secret");
        // 이미 만료된 토큰 (기본 leeway 60초보다 과거)
        let token = verifier.issue("alice", -120);

        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn test_reject_garbage() {
        let verifier = TokenVerifier::new("test-secret");
        assert!(verifier.verify("not-a-jwt").is_err());
    }
}
