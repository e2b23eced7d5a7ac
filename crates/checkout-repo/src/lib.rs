#[cfg(not(any(feature = "memory", feature = "sqlite")))]
compile_error!("Enable a repo feature: `memory` or `sqlite`.");

use checkout_types::domain::order::{CreateOrderRequest, Order, OrderPatch, OrderQuery};
use checkout_types::ports::order_repository::{OrderRepository, RepoError};

#[cfg(feature = "memory")]
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(all(feature = "sqlite", not(feature = "memory")))]
const DEFAULT_SQLITE_URL: &str = "sqlite://orders.db";

/// Store chosen at startup from the compiled-in features and the database url.
pub enum Repo {
    #[cfg(feature = "memory")]
    Memory(memory::InMemoryRepo),
    #[cfg(feature = "sqlite")]
    Sqlite(sqlite::SqliteRepo),
}

/// A url selects SQLite. Without one the in-memory store is used when it is
/// compiled in, otherwise SQLite at its default location.
pub async fn build_repo(url: Option<&str>) -> anyhow::Result<Repo> {
    Repo::build_repo(url).await
}

impl Repo {
    pub async fn build_repo(database_url: Option<&str>) -> anyhow::Result<Self> {
        let repo = match database_url {
            #[cfg(feature = "sqlite")]
            Some(url) => Repo::Sqlite(sqlite::SqliteRepo::new(url).await?),
            #[cfg(not(feature = "sqlite"))]
            Some(_) => anyhow::bail!("a database url was given but the `sqlite` feature is off"),
            #[cfg(feature = "memory")]
            None => Repo::Memory(memory::InMemoryRepo::new()),
            #[cfg(not(feature = "memory"))]
            None => Repo::Sqlite(sqlite::SqliteRepo::new(DEFAULT_SQLITE_URL).await?),
        };
        tracing::info!(backend = repo.backend(), "order repository built");
        Ok(repo)
    }

    pub fn backend(&self) -> &'static str {
        match self {
            #[cfg(feature = "memory")]
            Repo::Memory(_) => "memory",
            #[cfg(feature = "sqlite")]
            Repo::Sqlite(_) => "sqlite",
        }
    }
}

#[async_trait::async_trait]
impl OrderRepository for Repo {
    async fn list(&self) -> Result<Vec<Order>, RepoError> {
        match self {
            #[cfg(feature = "memory")]
            Repo::Memory(r) => r.list().await,
            #[cfg(feature = "sqlite")]
            Repo::Sqlite(r) => r.list().await,
        }
    }

    async fn retrieve_by_cpf(&self, cpf: &str) -> Result<Option<Order>, RepoError> {
        match self {
            #[cfg(feature = "memory")]
            Repo::Memory(r) => r.retrieve_by_cpf(cpf).await,
            #[cfg(feature = "sqlite")]
            Repo::Sqlite(r) => r.retrieve_by_cpf(cpf).await,
        }
    }

    async fn create(
        &self,
        request: &CreateOrderRequest,
        transaction_id: &str,
    ) -> Result<Order, RepoError> {
        match self {
            #[cfg(feature = "memory")]
            Repo::Memory(r) => r.create(request, transaction_id).await,
            #[cfg(feature = "sqlite")]
            Repo::Sqlite(r) => r.create(request, transaction_id).await,
        }
    }

    async fn update(
        &self,
        query: &OrderQuery,
        patch: &OrderPatch,
    ) -> Result<Option<Order>, RepoError> {
        match self {
            #[cfg(feature = "memory")]
            Repo::Memory(r) => r.update(query, patch).await,
            #[cfg(feature = "sqlite")]
            Repo::Sqlite(r) => r.update(query, patch).await,
        }
    }

    async fn delete(&self, query: &OrderQuery) -> Result<bool, RepoError> {
        match self {
            #[cfg(feature = "memory")]
            Repo::Memory(r) => r.delete(query).await,
            #[cfg(feature = "sqlite")]
            Repo::Sqlite(r) => r.delete(query).await,
        }
    }
}
