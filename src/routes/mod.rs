//! API Routes Module
//!
//! 모든 HTTP 엔드포인트 정의
//!
//! # Routes
//! - `/health` - 헬스 체크
//! - `/atms` - 근접 검색 + 생성
//! - `/atms/search` - bank/state 필터 검색
//! - `/atms/:id` - 단건 조회 / 수정 / 삭제 (POST는 경로 토큰 생성 변형)
//! - `/banks` - 은행 생성/목록
//! - `/states` - 주(州) 생성/목록

pub mod atms;
pub mod banks;
pub mod health;
pub mod states;
