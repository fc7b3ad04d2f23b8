//! Local repository for database operations.

use async_trait::async_trait;
use chrono::Utc;
use domain::models::{ListQuery, Local, LocalInput, PaginatedList, StatusCode};
use domain::ports::LocalRepository;
use domain::DomainResult;
use sqlx::PgPool;

use super::listing::{fetch_list, ListSource};
use super::storage_error;
use crate::entities::local::LOCAL_COLUMNS;
use crate::entities::LocalEntity;
use crate::metrics::QueryTimer;

const LOCALS: ListSource = ListSource {
    table: "locals",
    columns: LOCAL_COLUMNS,
};

/// PostgreSQL-backed local storage.
#[derive(Clone)]
pub struct PgLocalRepository {
    pool: PgPool,
}

impl PgLocalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LocalRepository for PgLocalRepository {
    async fn create(
        &self,
        owner_id: i64,
        input: LocalInput,
        status: StatusCode,
    ) -> DomainResult<i64> {
        let timer = QueryTimer::new("create_local");
        let result = async move {
            let mut tx = self.pool.begin().await?;
            let id = sqlx::query_scalar::<_, i64>(
                r#"
                INSERT INTO locals (user_id, name, description, state, city, street, is_active)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING id
                "#,
            )
            .bind(owner_id)
            .bind(input.name)
            .bind(input.description)
            .bind(input.state)
            .bind(input.city)
            .bind(input.street)
            .bind(input.is_active)
            .fetch_one(&mut *tx)
            .await?;

            sqlx::query("UPDATE locals SET status_code = $2, modified_at = $3 WHERE id = $1")
                .bind(id)
                .bind(status.as_i16())
                .bind(Utc::now())
                .execute(&mut *tx)
                .await?;

            tx.commit().await?;
            Ok::<_, sqlx::Error>(id)
        }
        .await;
        timer.record();
        result.map_err(storage_error("create_local"))
    }

    async fn set_status_code(
        &self,
        owner_id: i64,
        id: i64,
        status: StatusCode,
    ) -> DomainResult<()> {
        let timer = QueryTimer::new("set_local_status");
        let result = sqlx::query(
            "UPDATE locals SET status_code = $3, modified_at = $4 WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(owner_id)
        .bind(status.as_i16())
        .bind(Utc::now())
        .execute(&self.pool)
        .await;
        timer.record();
        result.map_err(storage_error("set_local_status"))?;
        Ok(())
    }

    async fn list(&self, query: ListQuery) -> DomainResult<PaginatedList<Local>> {
        let (rows, total) = fetch_list::<LocalEntity>(&self.pool, &LOCALS, &query)
            .await
            .map_err(storage_error("list_locals"))?;
        let items = rows.into_iter().map(Local::from).collect();
        Ok(PaginatedList::new(items, total, query.limit))
    }

    async fn get_by_id(&self, owner_id: i64, id: i64) -> DomainResult<Option<Local>> {
        let timer = QueryTimer::new("get_local");
        let sql = format!(
            "SELECT {} FROM locals WHERE id = $1 AND user_id = $2 AND status_code <> $3",
            LOCAL_COLUMNS
        );
        let result = sqlx::query_as::<_, LocalEntity>(&sql)
            .bind(id)
            .bind(owner_id)
            .bind(StatusCode::Deleted.as_i16())
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        Ok(result.map_err(storage_error("get_local"))?.map(Local::from))
    }

    async fn edit(&self, owner_id: i64, id: i64, input: LocalInput) -> DomainResult<bool> {
        let timer = QueryTimer::new("edit_local");
        let result = sqlx::query(
            r#"
            UPDATE locals
            SET name = $3, description = $4, state = $5, city = $6, street = $7,
                is_active = $8, modified_at = $9
            WHERE id = $1 AND user_id = $2 AND status_code <> $10
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(input.name)
        .bind(input.description)
        .bind(input.state)
        .bind(input.city)
        .bind(input.street)
        .bind(input.is_active)
        .bind(Utc::now())
        .bind(StatusCode::Deleted.as_i16())
        .execute(&self.pool)
        .await;
        timer.record();
        let result = result.map_err(storage_error("edit_local"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn soft_delete(&self, owner_id: i64, id: i64) -> DomainResult<()> {
        self.set_status_code(owner_id, id, StatusCode::Deleted).await
    }

    async fn exists_active(&self, owner_id: i64, id: i64) -> DomainResult<bool> {
        let timer = QueryTimer::new("local_exists_active");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM locals
                WHERE id = $1 AND user_id = $2 AND is_active = TRUE AND status_code <> $3
            )
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(StatusCode::Deleted.as_i16())
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result.map_err(storage_error("local_exists_active"))
    }
}
