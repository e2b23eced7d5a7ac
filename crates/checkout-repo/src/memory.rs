use async_trait::async_trait;
use checkout_types::domain::order::{CreateOrderRequest, Order, OrderPatch, OrderQuery};
use checkout_types::ports::order_repository::{OrderRepository, RepoError};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
struct Stored {
    seq: u64,
    order: Order,
}

/// DashMap-backed store. An insertion sequence number decides which record
/// is "first" when several match a query.
#[derive(Clone)]
pub struct InMemoryRepo {
    map: Arc<DashMap<Uuid, Stored>>,
    next_seq: Arc<AtomicU64>,
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self {
            map: Arc::new(DashMap::new()),
            next_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn first_match(&self, query: &OrderQuery) -> Option<Uuid> {
        self.map
            .iter()
            .filter(|kv| query.matches(&kv.value().order))
            .min_by_key(|kv| kv.value().seq)
            .map(|kv| *kv.key())
    }
}

impl Default for InMemoryRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderRepository for InMemoryRepo {
    async fn list(&self) -> Result<Vec<Order>, RepoError> {
        let mut stored: Vec<Stored> = self.map.iter().map(|kv| kv.value().clone()).collect();
        stored.sort_by_key(|s| s.seq);
        Ok(stored.into_iter().map(|s| s.order).collect())
    }

    async fn retrieve_by_cpf(&self, cpf: &str) -> Result<Option<Order>, RepoError> {
        let query = OrderQuery::Cpf(cpf.to_string());
        Ok(self
            .first_match(&query)
            .and_then(|id| self.map.get(&id).map(|r| r.order.clone())))
    }

    async fn create(
        &self,
        request: &CreateOrderRequest,
        transaction_id: &str,
    ) -> Result<Order, RepoError> {
        let order = Order::new(&request.order_data, transaction_id);
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.map.insert(
            order.id,
            Stored {
                seq,
                order: order.clone(),
            },
        );
        Ok(order)
    }

    async fn update(
        &self,
        query: &OrderQuery,
        patch: &OrderPatch,
    ) -> Result<Option<Order>, RepoError> {
        let Some(id) = self.first_match(query) else {
            return Ok(None);
        };
        if let Some(mut v) = self.map.get_mut(&id) {
            v.order.apply(patch);
            return Ok(Some(v.order.clone()));
        }
        Ok(None)
    }

    async fn delete(&self, query: &OrderQuery) -> Result<bool, RepoError> {
        Ok(self
            .first_match(query)
            .is_some_and(|id| self.map.remove(&id).is_some()))
    }
}
