use async_trait::async_trait;
use chrono::{DateTime, Utc};
use checkout_types::domain::order::{CreateOrderRequest, Order, OrderPatch, OrderQuery};
use checkout_types::ports::order_repository::{OrderRepository, RepoError};
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{FromRow, SqlitePool};
use std::str::FromStr;
use uuid::Uuid;

const COLUMNS: &str = "id, cpf, email, transaction_id, delivered, created_at, updated_at";

pub struct SqliteRepo {
    pool: SqlitePool,
}

#[derive(FromRow)]
struct DbOrder {
    id: String,
    cpf: String,
    email: String,
    transaction_id: String,
    delivered: bool,
    created_at: String,
    updated_at: String,
}

impl DbOrder {
    fn into_order(self) -> Result<Order, RepoError> {
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| RepoError::DbError(e.to_string()))?
            .with_timezone(&Utc);
        let updated_at = DateTime::parse_from_rfc3339(&self.updated_at)
            .map_err(|e| RepoError::DbError(e.to_string()))?
            .with_timezone(&Utc);
        let id = Uuid::parse_str(&self.id).map_err(|e| RepoError::DbError(e.to_string()))?;
        Ok(Order {
            id,
            cpf: self.cpf,
            email: self.email,
            transaction_id: self.transaction_id,
            delivered: self.delivered,
            created_at,
            updated_at,
        })
    }
}

/// Column filter and bound value for a query.
fn filter(query: &OrderQuery) -> (&'static str, String) {
    match query {
        OrderQuery::Id(id) => ("id = ?", id.to_string()),
        OrderQuery::Cpf(cpf) => ("cpf = ?", cpf.clone()),
    }
}

impl SqliteRepo {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;

        let ddl = include_str!("../migrations/0001_create_orders.sql");
        sqlx::query(ddl).execute(&pool).await?;
        tracing::debug!(database_url, "sqlite order store ready");

        Ok(Self { pool })
    }

    async fn first_match(&self, query: &OrderQuery) -> Result<Option<Order>, RepoError> {
        let (clause, value) = filter(query);
        let sql = format!("SELECT {COLUMNS} FROM orders WHERE {clause} ORDER BY rowid LIMIT 1");
        let row: Option<DbOrder> = sqlx::query_as(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::DbError(e.to_string()))?;
        row.map(|r| r.into_order()).transpose()
    }
}

#[async_trait]
impl OrderRepository for SqliteRepo {
    async fn list(&self) -> Result<Vec<Order>, RepoError> {
        let sql = format!("SELECT {COLUMNS} FROM orders ORDER BY rowid");
        let rows: Vec<DbOrder> = sqlx::query_as(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::DbError(e.to_string()))?;

        rows.into_iter()
            .map(|r| r.into_order())
            .collect::<Result<Vec<_>, _>>()
    }

    async fn retrieve_by_cpf(&self, cpf: &str) -> Result<Option<Order>, RepoError> {
        self.first_match(&OrderQuery::Cpf(cpf.to_string())).await
    }

    async fn create(
        &self,
        request: &CreateOrderRequest,
        transaction_id: &str,
    ) -> Result<Order, RepoError> {
        let order = Order::new(&request.order_data, transaction_id);
        sqlx::query(&format!(
            "INSERT INTO orders ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?)"
        ))
        .bind(order.id.to_string())
        .bind(&order.cpf)
        .bind(&order.email)
        .bind(&order.transaction_id)
        .bind(order.delivered)
        .bind(order.created_at.to_rfc3339())
        .bind(order.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::DbError(e.to_string()))?;
        Ok(order)
    }

    async fn update(
        &self,
        query: &OrderQuery,
        patch: &OrderPatch,
    ) -> Result<Option<Order>, RepoError> {
        let Some(mut order) = self.first_match(query).await? else {
            return Ok(None);
        };
        order.apply(patch);
        let updated = sqlx::query(
            "UPDATE orders SET cpf = ?, email = ?, transaction_id = ?, delivered = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&order.cpf)
        .bind(&order.email)
        .bind(&order.transaction_id)
        .bind(order.delivered)
        .bind(order.updated_at.to_rfc3339())
        .bind(order.id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::DbError(e.to_string()))?;
        if updated.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(order))
    }

    async fn delete(&self, query: &OrderQuery) -> Result<bool, RepoError> {
        let (clause, value) = filter(query);
        let sql = format!(
            "DELETE FROM orders WHERE rowid = (SELECT rowid FROM orders WHERE {clause} ORDER BY rowid LIMIT 1)"
        );
        let res = sqlx::query(&sql)
            .bind(value)
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::DbError(e.to_string()))?;
        Ok(res.rows_affected() > 0)
    }
}
