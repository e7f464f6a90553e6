//! Repository Pattern Implementation
//!
//! # Interview Q&A
//!
//! Q: Repository 패턴이란?
//! A: 데이터 접근 로직을 추상화하는 패턴
//!
//!    장점:
//!    - 비즈니스 로직과 데이터 접근 분리
//!    - 테스트 시 Mock 구현 쉬움
//!    - DB 교체 시 영향 최소화
//!
//! Q: 여기서는 왜 trait 추상화를 실제로 적용했는가?
//! A: 핸들러가 특정 드라이버에 묶이지 않게 하기 위해
//!    - 엔티티별 trait (ATM/Bank/State)을 AppState에 trait object로 주입
//!    - PostgreSQL 구현은 db/mod.rs의 Database 구조체
//!    - 핸들러 테스트는 아래 mock 모듈의 in-memory 구현 사용

use async_trait::async_trait;
use anyhow::Result;
use uuid::Uuid;

use super::models::{Atm, AtmFilter, Bank, NearbyAtm, QueryPoint, StateRecord};

/// 깊은 헬스체크용 스토어 연결 확인
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn ping(&self) -> Result<()>;
}

/// ATM 저장소 인터페이스
#[async_trait]
pub trait AtmRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Atm>>;

    /// 구면 근접 검색. 각거리 오름차순으로 정렬된 결과를 반환한다.
    async fn find_near(&self, point: &QueryPoint) -> Result<Vec<NearbyAtm>>;

    async fn create(&self, atm: &Atm) -> Result<()>;

    /// 전체 문서 덮어쓰기. 대상이 없으면 Ok(false)
    async fn update(&self, atm: &Atm) -> Result<bool>;

    /// 삭제. 대상이 없으면 Ok(false)
    async fn delete(&self, id: Uuid) -> Result<bool>;

    async fn find_many(&self, filter: &AtmFilter) -> Result<Vec<Atm>>;
}

/// Bank 저장소 인터페이스
#[async_trait]
pub trait BankRepository: Send + Sync {
    async fn create(&self, bank: &Bank) -> Result<()>;
    async fn list(&self) -> Result<Vec<Bank>>;
    /// 참조 확장용 배치 조회 (ATM당 왕복이 아니라 한 번에)
    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Bank>>;
}

/// State 저장소 인터페이스
#[async_trait]
pub trait StateRepository: Send + Sync {
    async fn create(&self, state: &StateRecord) -> Result<()>;
    async fn list(&self) -> Result<Vec<StateRecord>>;
    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<StateRecord>>;
}
