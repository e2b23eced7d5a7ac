use async_trait::async_trait;

use crate::domain::order::{CreateOrderRequest, Order, OrderPatch, OrderQuery};

#[derive(thiserror::Error, Debug)]
pub enum RepoError {
    #[error("db error: {0}")]
    DbError(String),
}

/// Order storage. Lookups by query act on the first (earliest inserted) match.
#[async_trait]
pub trait OrderRepository: Send + Sync + 'static {
    async fn list(&self) -> Result<Vec<Order>, RepoError>;
    async fn retrieve_by_cpf(&self, cpf: &str) -> Result<Option<Order>, RepoError>;
    /// Stores the order fields of `request` with the charge's transaction id.
    /// Payment details are not persisted.
    async fn create(
        &self,
        request: &CreateOrderRequest,
        transaction_id: &str,
    ) -> Result<Order, RepoError>;
    async fn update(
        &self,
        query: &OrderQuery,
        patch: &OrderPatch,
    ) -> Result<Option<Order>, RepoError>;
    async fn delete(&self, query: &OrderQuery) -> Result<bool, RepoError>;
}
