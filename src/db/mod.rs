//! Database Module
//!
//! # Interview Q&A
//!
//! Q: 근접 검색을 DB에 위임한 이유는?
//! A: 정렬/바운딩은 스토어의 일
//!    - 핸들러는 검색 결과를 받아 거리 단위만 변환 (각거리 → km)
//!    - SQL의 haversine 식이 중심각(라디안)을 계산하고
//!      오름차순 정렬 + 반경 바운딩까지 처리
//!    - 스토어 교체 시 AtmRepository 구현만 바꾸면 됨
//!
//! Q: 커넥션 풀은 어떻게 관리하는가?
//! A: SQLx의 PgPool 사용
//!    - 최소/최대 커넥션 수 설정
//!    - 커넥션 재사용 (오버헤드 감소)
//!    - 타임아웃 처리

mod models;
mod repository;

pub use models::*;
pub use repository::{AtmRepository, BankRepository, HealthProbe, StateRepository};

#[cfg(test)]
pub use repository::mock;

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

/// 데이터베이스 연결 및 쿼리 담당
///
/// 엔티티별 Repository trait의 PostgreSQL 구현을 전부 이 구조체가 제공한다.
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// 데이터베이스 연결
    ///
    /// # Connection Pool Settings
    ///
    /// - max_connections: 10 (트래픽에 따라 조정)
    /// - min_connections: 1 (idle 시 최소 유지)
    /// - acquire_timeout: 3초 (커넥션 획득 대기)
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .min_connections(1)
            .acquire_timeout(std::time::Duration::from_secs(3))
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// 마이그레이션 실행
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Health check
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl HealthProbe for Database {
    async fn ping(&self) -> Result<()> {
        self.health_check().await
    }
}

#[async_trait]
impl AtmRepository for Database {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Atm>> {
        let atm = sqlx::query_as::<_, Atm>(
            r#"
            SELECT id, bank_id, state_id, address, lng, lat, estimate, owner,
                   created_at, updated_at
            FROM atms
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(atm)
    }

    /// 구면 근접 검색
    ///
    /// haversine 공식으로 질의점과 각 레코드 사이의 중심각(라디안)을 계산.
    /// 좌표 바인딩은 (경도, 위도) 순서 — $1=lng, $2=lat.
    async fn find_near(&self, point: &QueryPoint) -> Result<Vec<NearbyAtm>> {
        let matches = sqlx::query_as::<_, NearbyAtm>(
            r#"
            SELECT * FROM (
                SELECT
                    id, bank_id, state_id, address, lng, lat, estimate, owner,
                    created_at, updated_at,
                    2 * asin(sqrt(
                        pow(sin((radians(lat) - radians($2)) / 2), 2)
                        + cos(radians($2)) * cos(radians(lat))
                        * pow(sin((radians(lng) - radians($1)) / 2), 2)
                    )) AS angular_distance
                FROM atms
                WHERE $3::text IS NULL OR owner = $3
            ) nearby
            WHERE angular_distance <= $4
            ORDER BY angular_distance ASC
            "#,
        )
        .bind(point.lng)
        .bind(point.lat)
        .bind(point.owner.as_deref())
        .bind(point.max_radius_rad)
        .fetch_all(&self.pool)
        .await?;

        Ok(matches)
    }

    async fn create(&self, atm: &Atm) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO atms (
                id, bank_id, state_id, address, lng, lat, estimate, owner,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(atm.id)
        .bind(&atm.bank_id)
        .bind(&atm.state_id)
        .bind(&atm.address)
        .bind(atm.lng)
        .bind(atm.lat)
        .bind(atm.estimate)
        .bind(&atm.owner)
        .bind(atm.created_at)
        .bind(atm.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(&self, atm: &Atm) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE atms
            SET bank_id = $2, state_id = $3, address = $4, lng = $5, lat = $6,
                estimate = $7, updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(atm.id)
        .bind(&atm.bank_id)
        .bind(&atm.state_id)
        .bind(&atm.address)
        .bind(atm.lng)
        .bind(atm.lat)
        .bind(atm.estimate)
        .bind(atm.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM atms WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_many(&self, filter: &AtmFilter) -> Result<Vec<Atm>> {
        let atms = sqlx::query_as::<_, Atm>(
            r#"
            SELECT id, bank_id, state_id, address, lng, lat, estimate, owner,
                   created_at, updated_at
            FROM atms
            WHERE ($1::text IS NULL OR bank_id = $1)
              AND ($2::text IS NULL OR state_id = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(filter.bank_id.as_deref())
        .bind(filter.state_id.as_deref())
        .fetch_all(&self.pool)
        .await?;

        Ok(atms)
    }
}

#[async_trait]
impl BankRepository for Database {
    async fn create(&self, bank: &Bank) -> Result<()> {
        sqlx::query("INSERT INTO banks (id, name) VALUES ($1, $2)")
            .bind(&bank.id)
            .bind(&bank.name)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn list(&self) -> Result<Vec<Bank>> {
        let banks = sqlx::query_as::<_, Bank>("SELECT id, name FROM banks ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(banks)
    }

    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Bank>> {
        let banks =
            sqlx::query_as::<_, Bank>("SELECT id, name FROM banks WHERE id = ANY($1)")
                .bind(ids)
                .fetch_all(&self.pool)
                .await?;

        Ok(banks)
    }
}

#[async_trait]
impl StateRepository for Database {
    async fn create(&self, state: &StateRecord) -> Result<()> {
        sqlx::query("INSERT INTO states (id, name) VALUES ($1, $2)")
            .bind(&state.id)
            .bind(&state.name)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn list(&self) -> Result<Vec<StateRecord>> {
        let states =
            sqlx::query_as::<_, StateRecord>("SELECT id, name FROM states ORDER BY name")
                .fetch_all(&self.pool)
                .await?;

        Ok(states)
    }

    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<StateRecord>> {
        let states =
            sqlx::query_as::<_, StateRecord>("SELECT id, name FROM states WHERE id = ANY($1)")
                .bind(ids)
                .fetch_all(&self.pool)
                .await?;

        Ok(states)
    }
}
