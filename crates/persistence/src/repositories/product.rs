//! Product repository for database operations.

use async_trait::async_trait;
use chrono::Utc;
use domain::models::{ListQuery, PaginatedList, Product, ProductRecord, StatusCode};
use domain::ports::ProductRepository;
use domain::DomainResult;
use sqlx::PgPool;

use super::listing::{fetch_list, ListSource};
use super::storage_error;
use crate::entities::product::PRODUCT_COLUMNS;
use crate::entities::ProductEntity;
use crate::metrics::QueryTimer;

const PRODUCTS: ListSource = ListSource {
    table: "products",
    columns: PRODUCT_COLUMNS,
};

/// PostgreSQL-backed product storage.
#[derive(Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(
        &self,
        owner_id: i64,
        record: ProductRecord,
        status: StatusCode,
    ) -> DomainResult<i64> {
        let timer = QueryTimer::new("create_product");
        let result = async move {
            let mut tx = self.pool.begin().await?;
            let id = sqlx::query_scalar::<_, i64>(
                r#"
                INSERT INTO products (user_id, local_id, name, description, is_active, ip_address,
                                      port, username, password, stream_path, camera_type,
                                      stream_url, image_url)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
                RETURNING id
                "#,
            )
            .bind(owner_id)
            .bind(record.local_id)
            .bind(record.name)
            .bind(record.description)
            .bind(record.is_active)
            .bind(record.ip_address)
            .bind(record.port)
            .bind(record.username)
            .bind(record.password)
            .bind(record.stream_path)
            .bind(record.camera_type)
            .bind(record.stream_url)
            .bind(record.image_url)
            .fetch_one(&mut *tx)
            .await?;

            sqlx::query("UPDATE products SET status_code = $2, modified_at = $3 WHERE id = $1")
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
        result.map_err(storage_error("create_product"))
    }

    async fn set_status_code(
        &self,
        owner_id: i64,
        id: i64,
        status: StatusCode,
    ) -> DomainResult<()> {
        let timer = QueryTimer::new("set_product_status");
        let result = sqlx::query(
            r#"
            UPDATE products SET status_code = $3, modified_at = $4
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(status.as_i16())
        .bind(Utc::now())
        .execute(&self.pool)
        .await;
        timer.record();
        result.map_err(storage_error("set_product_status"))?;
        Ok(())
    }

    async fn list(&self, query: ListQuery) -> DomainResult<PaginatedList<Product>> {
        let (rows, total) = fetch_list::<ProductEntity>(&self.pool, &PRODUCTS, &query)
            .await
            .map_err(storage_error("list_products"))?;
        let items = rows.into_iter().map(Product::from).collect();
        Ok(PaginatedList::new(items, total, query.limit))
    }

    async fn get_by_id(&self, owner_id: i64, id: i64) -> DomainResult<Option<Product>> {
        let timer = QueryTimer::new("get_product");
        let sql = format!(
            "SELECT {} FROM products WHERE id = $1 AND user_id = $2 AND status_code <> $3",
            PRODUCT_COLUMNS
        );
        let result = sqlx::query_as::<_, ProductEntity>(&sql)
            .bind(id)
            .bind(owner_id)
            .bind(StatusCode::Deleted.as_i16())
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        Ok(result
            .map_err(storage_error("get_product"))?
            .map(Product::from))
    }

    async fn edit(&self, owner_id: i64, id: i64, record: ProductRecord) -> DomainResult<bool> {
        let timer = QueryTimer::new("edit_product");
        let result = sqlx::query(
            r#"
            UPDATE products
            SET local_id = $3, name = $4, description = $5, is_active = $6, ip_address = $7,
                port = $8, username = $9, password = $10, stream_path = $11,
                camera_type = $12, stream_url = $13, image_url = $14, modified_at = $15
            WHERE id = $1 AND user_id = $2 AND status_code <> $16
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(record.local_id)
        .bind(record.name)
        .bind(record.description)
        .bind(record.is_active)
        .bind(record.ip_address)
        .bind(record.port)
        .bind(record.username)
        .bind(record.password)
        .bind(record.stream_path)
        .bind(record.camera_type)
        .bind(record.stream_url)
        .bind(record.image_url)
        .bind(Utc::now())
        .bind(StatusCode::Deleted.as_i16())
        .execute(&self.pool)
        .await;
        timer.record();
        let result = result.map_err(storage_error("edit_product"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn soft_delete(&self, owner_id: i64, id: i64) -> DomainResult<()> {
        self.set_status_code(owner_id, id, StatusCode::Deleted).await
    }

    async fn set_parameter_flag(&self, owner_id: i64, id: i64, flag: bool) -> DomainResult<bool> {
        let timer = QueryTimer::new("set_product_parameter");
        let result = sqlx::query(
            r#"
            UPDATE products SET parameter = $3, modified_at = $4
            WHERE id = $1 AND user_id = $2 AND status_code <> $5
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(flag)
        .bind(Utc::now())
        .bind(StatusCode::Deleted.as_i16())
        .execute(&self.pool)
        .await;
        timer.record();
        let result = result.map_err(storage_error("set_product_parameter"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_recordable(&self) -> DomainResult<Vec<Product>> {
        let timer = QueryTimer::new("list_recordable_products");
        let sql = format!(
            "SELECT {} FROM products WHERE is_active = TRUE AND status_code <> $1 ORDER BY id",
            PRODUCT_COLUMNS
        );
        let result = sqlx::query_as::<_, ProductEntity>(&sql)
            .bind(StatusCode::Deleted.as_i16())
            .fetch_all(&self.pool)
            .await;
        timer.record();
        Ok(result
            .map_err(storage_error("list_recordable_products"))?
            .into_iter()
            .map(Product::from)
            .collect())
    }
}
