use axum::{
    extract::{Path, State},
    routing::get,
    serve, Json, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::application::http_response::HttpResponse;
use crate::application::order_controller::OrderController;
use crate::errors::{AppError, INVALID_PARAM};
use checkout_types::domain::order::{
    CreateOrderRequest, OrderPatch, OrderQuery, RetrieveOrderRequest,
};
use checkout_types::ports::cpf_validator::CpfValidator;
use checkout_types::ports::order_repository::OrderRepository;
use checkout_types::ports::payment_adapter::PaymentAdapter;

type Shared<R, V, P> = State<Arc<OrderController<R, V, P>>>;

#[derive(Clone)]
pub struct HttpServerConfig {
    pub port: String,
}

pub struct HttpServer<R, V, P>
where
    R: OrderRepository,
    V: CpfValidator,
    P: PaymentAdapter,
{
    pub controller: Arc<OrderController<R, V, P>>,
    pub config: HttpServerConfig,
}

impl<R, V, P> HttpServer<R, V, P>
where
    R: OrderRepository,
    V: CpfValidator,
    P: PaymentAdapter,
{
    pub async fn new(
        controller: OrderController<R, V, P>,
        config: HttpServerConfig,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            controller: Arc::new(controller),
            config,
        })
    }

    /// `/orders/{key}` is a cpf for GET and an order id for PATCH and DELETE.
    pub fn router(&self) -> Router {
        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &axum::extract::Request<_>| {
                let uri = request.uri().to_string();
                let request_id = Uuid::new_v4();
                tracing::info_span!(
                    "http_request",
                    %request_id,
                    method = %request.method(),
                    uri
                )
            })
            .on_request(
                |request: &axum::extract::Request<_>, span: &tracing::Span| {
                    tracing::info!(
                        parent: span,
                        method = %request.method(),
                        uri = %request.uri(),
                        "request"
                    );
                },
            )
            .on_response(
                |response: &axum::response::Response, latency: Duration, span: &tracing::Span| {
                    tracing::info!(
                        parent: span,
                        status = %response.status(),
                        latency_ms = %latency.as_millis(),
                        "response"
                    );
                },
            );

        Router::new()
            .route("/health", get(health))
            .route(
                "/orders",
                get(list_orders::<R, V, P>).post(create_order::<R, V, P>),
            )
            .route(
                "/orders/{key}",
                get(retrieve_order::<R, V, P>)
                    .patch(update_order::<R, V, P>)
                    .delete(delete_order::<R, V, P>),
            )
            .layer(trace_layer)
            .with_state(self.controller.clone())
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let app = self.router();
        let addr: SocketAddr = format!("0.0.0.0:{}", self.config.port).parse()?;
        tracing::info!("starting server on {}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        serve(listener, app.into_make_service()).await?;
        Ok(())
    }
}

async fn health() -> (axum::http::StatusCode, Json<serde_json::Value>) {
    (
        axum::http::StatusCode::OK,
        Json(serde_json::json!({ "status": "ok" })),
    )
}

fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest(INVALID_PARAM.into()))
}

async fn list_orders<R, V, P>(State(controller): Shared<R, V, P>) -> HttpResponse
where
    R: OrderRepository,
    V: CpfValidator,
    P: PaymentAdapter,
{
    controller.list_orders().await
}

async fn create_order<R, V, P>(
    State(controller): Shared<R, V, P>,
    Json(payload): Json<CreateOrderRequest>,
) -> HttpResponse
where
    R: OrderRepository,
    V: CpfValidator,
    P: PaymentAdapter,
{
    controller.create_order(payload).await
}

async fn retrieve_order<R, V, P>(
    State(controller): Shared<R, V, P>,
    Path(cpf): Path<String>,
) -> HttpResponse
where
    R: OrderRepository,
    V: CpfValidator,
    P: PaymentAdapter,
{
    controller
        .retrieve_order(RetrieveOrderRequest { cpf })
        .await
}

async fn update_order<R, V, P>(
    State(controller): Shared<R, V, P>,
    Path(id): Path<String>,
    Json(payload): Json<OrderPatch>,
) -> Result<HttpResponse, AppError>
where
    R: OrderRepository,
    V: CpfValidator,
    P: PaymentAdapter,
{
    let id = parse_id(&id)?;
    Ok(controller.update_order(OrderQuery::Id(id), payload).await)
}

async fn delete_order<R, V, P>(
    State(controller): Shared<R, V, P>,
    Path(id): Path<String>,
) -> Result<HttpResponse, AppError>
where
    R: OrderRepository,
    V: CpfValidator,
    P: PaymentAdapter,
{
    let id = parse_id(&id)?;
    Ok(controller.delete_order(OrderQuery::Id(id)).await)
}
