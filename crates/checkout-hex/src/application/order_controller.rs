use axum::http::StatusCode;
use checkout_types::domain::order::{
    CreateOrderRequest, Order, OrderPatch, OrderQuery, RetrieveOrderRequest,
};
use checkout_types::ports::cpf_validator::CpfValidator;
use checkout_types::ports::order_repository::OrderRepository;
use checkout_types::ports::payment_adapter::PaymentAdapter;
use serde::Serialize;

use crate::application::http_response::HttpResponse;
use crate::errors::{AppError, INVALID_CPF, INVALID_PARAM, NO_ORDERS_FOUND};

/// Per-request orchestration: validate, delegate, map the outcome to an
/// [`HttpResponse`]. Every operation is a single pass with no retries.
pub struct OrderController<R, V, P>
where
    R: OrderRepository,
    V: CpfValidator,
    P: PaymentAdapter,
{
    repo: R,
    validator: V,
    payments: P,
}

impl<R, V, P> OrderController<R, V, P>
where
    R: OrderRepository,
    V: CpfValidator,
    P: PaymentAdapter,
{
    pub fn new(repo: R, validator: V, payments: P) -> Self {
        Self {
            repo,
            validator,
            payments,
        }
    }

    /// 200 with the first order for the cpf.
    pub async fn retrieve_order(&self, request: RetrieveOrderRequest) -> HttpResponse {
        respond(StatusCode::OK, self.find_by_cpf(&request.cpf).await)
    }

    /// Charges the card, then stores the order. 201 with the stored order.
    pub async fn create_order(&self, request: CreateOrderRequest) -> HttpResponse {
        respond(StatusCode::CREATED, self.place(&request).await)
    }

    /// 200 with the patched order.
    ///
    /// The query is trusted as given: no cpf check and no ownership check is
    /// made before the first matching order is overwritten.
    pub async fn update_order(&self, query: OrderQuery, request: OrderPatch) -> HttpResponse {
        respond(StatusCode::OK, self.patch(&query, &request).await)
    }

    pub async fn list_orders(&self) -> HttpResponse {
        respond(StatusCode::OK, self.repo.list().await.map_err(AppError::from))
    }

    pub async fn delete_order(&self, query: OrderQuery) -> HttpResponse {
        match self.remove(&query).await {
            Ok(()) => HttpResponse::no_content_204(),
            Err(e) => failure(e),
        }
    }

    async fn ensure_valid_cpf(&self, cpf: &str) -> Result<(), AppError> {
        if self.validator.validate(cpf).await? {
            Ok(())
        } else {
            Err(AppError::BadRequest(INVALID_CPF.into()))
        }
    }

    async fn find_by_cpf(&self, cpf: &str) -> Result<Order, AppError> {
        self.ensure_valid_cpf(cpf).await?;
        self.repo
            .retrieve_by_cpf(cpf)
            .await?
            .ok_or_else(|| AppError::BadRequest(NO_ORDERS_FOUND.into()))
    }

    async fn place(&self, request: &CreateOrderRequest) -> Result<Order, AppError> {
        self.ensure_valid_cpf(&request.order_data.cpf).await?;
        let transaction_id = self.payments.pay(&request.payment_data).await?;

        match self.repo.create(request, &transaction_id).await {
            Ok(order) => {
                tracing::info!(order_id = %order.id, %transaction_id, "order created");
                Ok(order)
            }
            Err(e) => {
                // The charge already went through and is not reversed here.
                tracing::error!(
                    %transaction_id,
                    order_reference = request.payment_data.order_reference,
                    error = %e,
                    "order not stored after a successful charge"
                );
                Err(e.into())
            }
        }
    }

    async fn patch(&self, query: &OrderQuery, request: &OrderPatch) -> Result<Order, AppError> {
        self.repo
            .update(query, request)
            .await?
            .ok_or_else(|| AppError::BadRequest(INVALID_PARAM.into()))
    }

    async fn remove(&self, query: &OrderQuery) -> Result<(), AppError> {
        if self.repo.delete(query).await? {
            Ok(())
        } else {
            Err(AppError::BadRequest(INVALID_PARAM.into()))
        }
    }
}

fn respond<T: Serialize>(status: StatusCode, result: Result<T, AppError>) -> HttpResponse {
    let body = result
        .and_then(|v| serde_json::to_value(v).map_err(|e| AppError::Internal(e.into())));
    match body {
        Ok(body) => HttpResponse::new(status, body),
        Err(e) => failure(e),
    }
}

fn failure(e: AppError) -> HttpResponse {
    match &e {
        AppError::BadRequest(m) => tracing::debug!(message = %m, "request rejected"),
        AppError::Internal(err) => tracing::error!(error = %err, "request failed"),
    }
    e.into()
}
