//! Services Module
//!
//! 비즈니스 로직을 담당하는 서비스 레이어
//!
//! # Services
//! - `TokenVerifier`: JWT 자격 증명 검증 서비스

mod token;

pub use token::{Claims, TokenVerifier};
