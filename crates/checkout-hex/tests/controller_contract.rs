use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::StatusCode;
use checkout_hex::application::http_response::HttpResponse;
use checkout_hex::application::order_controller::OrderController;
use checkout_types::domain::order::{
    CreateOrderRequest, Order, OrderData, OrderPatch, OrderQuery, RetrieveOrderRequest,
};
use checkout_types::domain::payment::{PaymentData, TransactionId};
use checkout_types::ports::cpf_validator::{CpfValidator, ValidatorError};
use checkout_types::ports::order_repository::{OrderRepository, RepoError};
use checkout_types::ports::payment_adapter::{PaymentAdapter, PaymentError};
use serde_json::json;

// Collaborator stubs that record every call and answer per their mode.

#[derive(Clone, Copy, PartialEq)]
enum Mode {
    Succeed,
    Empty,
    Fail,
}

#[derive(Clone)]
struct StubValidator {
    mode: Arc<Mutex<Mode>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl StubValidator {
    fn new() -> Self {
        Self {
            mode: Arc::new(Mutex::new(Mode::Succeed)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn set(&self, mode: Mode) {
        *self.mode.lock().unwrap() = mode;
    }
}

#[async_trait]
impl CpfValidator for StubValidator {
    async fn validate(&self, cpf: &str) -> Result<bool, ValidatorError> {
        self.calls.lock().unwrap().push(cpf.to_string());
        match *self.mode.lock().unwrap() {
            Mode::Succeed => Ok(true),
            Mode::Empty => Ok(false),
            Mode::Fail => Err(ValidatorError::Unavailable("validator down".into())),
        }
    }
}

#[derive(Clone)]
struct StubPayments {
    fail: Arc<Mutex<bool>>,
    calls: Arc<Mutex<Vec<PaymentData>>>,
}

impl StubPayments {
    fn new() -> Self {
        Self {
            fail: Arc::new(Mutex::new(false)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl PaymentAdapter for StubPayments {
    async fn pay(&self, payment: &PaymentData) -> Result<TransactionId, PaymentError> {
        self.calls.lock().unwrap().push(payment.clone());
        if *self.fail.lock().unwrap() {
            return Err(PaymentError::Request("gateway unreachable".into()));
        }
        Ok("transaction_id".into())
    }
}

#[derive(Clone)]
struct StubRepo {
    mode: Arc<Mutex<Mode>>,
    record: Order,
    retrieve_calls: Arc<Mutex<Vec<String>>>,
    create_calls: Arc<Mutex<Vec<(CreateOrderRequest, String)>>>,
    update_calls: Arc<Mutex<Vec<(OrderQuery, OrderPatch)>>>,
}

impl StubRepo {
    fn new(record: Order) -> Self {
        Self {
            mode: Arc::new(Mutex::new(Mode::Succeed)),
            record,
            retrieve_calls: Arc::new(Mutex::new(Vec::new())),
            create_calls: Arc::new(Mutex::new(Vec::new())),
            update_calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn set(&self, mode: Mode) {
        *self.mode.lock().unwrap() = mode;
    }

    fn mode(&self) -> Mode {
        *self.mode.lock().unwrap()
    }

    fn answer(&self) -> Result<Option<Order>, RepoError> {
        match self.mode() {
            Mode::Succeed => Ok(Some(self.record.clone())),
            Mode::Empty => Ok(None),
            Mode::Fail => Err(RepoError::DbError("connection reset".into())),
        }
    }
}

#[async_trait]
impl OrderRepository for StubRepo {
    async fn list(&self) -> Result<Vec<Order>, RepoError> {
        Ok(self.answer()?.into_iter().collect())
    }

    async fn retrieve_by_cpf(&self, cpf: &str) -> Result<Option<Order>, RepoError> {
        self.retrieve_calls.lock().unwrap().push(cpf.to_string());
        self.answer()
    }

    async fn create(
        &self,
        request: &CreateOrderRequest,
        transaction_id: &str,
    ) -> Result<Order, RepoError> {
        self.create_calls
            .lock()
            .unwrap()
            .push((request.clone(), transaction_id.to_string()));
        if self.mode() == Mode::Fail {
            return Err(RepoError::DbError("insert failed".into()));
        }
        Ok(self.record.clone())
    }

    async fn update(
        &self,
        query: &OrderQuery,
        patch: &OrderPatch,
    ) -> Result<Option<Order>, RepoError> {
        self.update_calls
            .lock()
            .unwrap()
            .push((query.clone(), patch.clone()));
        self.answer().map(|found| {
            found.map(|mut o| {
                o.apply(patch);
                o
            })
        })
    }

    async fn delete(&self, _query: &OrderQuery) -> Result<bool, RepoError> {
        Ok(self.answer()?.is_some())
    }
}

struct Sut {
    controller: OrderController<StubRepo, StubValidator, StubPayments>,
    repo: StubRepo,
    validator: StubValidator,
    payments: StubPayments,
}

fn fake_order() -> Order {
    Order::new(
        &OrderData {
            cpf: "12345612312".into(),
            email: "valid_email@email.com".into(),
            delivered: false,
        },
        "2134534253252",
    )
}

fn make_sut() -> Sut {
    let repo = StubRepo::new(fake_order());
    let validator = StubValidator::new();
    let payments = StubPayments::new();
    let controller = OrderController::new(repo.clone(), validator.clone(), payments.clone());
    Sut {
        controller,
        repo,
        validator,
        payments,
    }
}

fn fake_create_request() -> CreateOrderRequest {
    CreateOrderRequest {
        order_data: OrderData {
            cpf: "12345612312".into(),
            email: "valid_email@email.com".into(),
            delivered: false,
        },
        payment_data: PaymentData {
            order_price: 10,
            order_reference: 5093,
            card_number: "5448280000000007".into(),
            cvv: "235".into(),
            expiration_month: "12".into(),
            expiration_year: "2020".into(),
            card_holder_name: "Fulano de Tal".into(),
        },
    }
}

fn retrieve(cpf: &str) -> RetrieveOrderRequest {
    RetrieveOrderRequest { cpf: cpf.into() }
}

fn bad_request(message: &str) -> HttpResponse {
    HttpResponse::bad_request_400(HttpResponse::message(message))
}

#[tokio::test]
async fn retrieve_returns_the_stored_record_with_200() {
    let sut = make_sut();
    let res = sut.controller.retrieve_order(retrieve("12345612312")).await;
    assert_eq!(
        res,
        HttpResponse::ok_200(serde_json::to_value(&sut.repo.record).unwrap())
    );
}

#[tokio::test]
async fn retrieve_passes_the_cpf_to_validator_and_repository() {
    let sut = make_sut();
    sut.controller.retrieve_order(retrieve("26306359028")).await;
    assert_eq!(*sut.validator.calls.lock().unwrap(), vec!["26306359028"]);
    assert_eq!(*sut.repo.retrieve_calls.lock().unwrap(), vec!["26306359028"]);
}

#[tokio::test]
async fn retrieve_validator_failure_is_500_and_stops() {
    let sut = make_sut();
    sut.validator.set(Mode::Fail);
    let res = sut.controller.retrieve_order(retrieve("12345612312")).await;
    assert_eq!(res.status_code, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        res.body,
        json!({ "error": "cpf validator unavailable: validator down" })
    );
    assert!(sut.repo.retrieve_calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn retrieve_rejected_cpf_is_400_and_stops() {
    let sut = make_sut();
    sut.validator.set(Mode::Empty);
    let res = sut.controller.retrieve_order(retrieve("12345612312")).await;
    assert_eq!(res, bad_request("Invalid param: cpf"));
    assert!(sut.repo.retrieve_calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn retrieve_without_match_is_400() {
    let sut = make_sut();
    sut.repo.set(Mode::Empty);
    let res = sut.controller.retrieve_order(retrieve("26306359028")).await;
    assert_eq!(res, bad_request("No orders were found"));
}

#[tokio::test]
async fn retrieve_repository_failure_is_500() {
    let sut = make_sut();
    sut.repo.set(Mode::Fail);
    let res = sut.controller.retrieve_order(retrieve("26306359028")).await;
    assert_eq!(res.status_code, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.body, json!({ "error": "db error: connection reset" }));
}

#[tokio::test]
async fn retrieve_is_idempotent_on_an_unchanged_store() {
    let sut = make_sut();
    let first = sut.controller.retrieve_order(retrieve("12345612312")).await;
    let second = sut.controller.retrieve_order(retrieve("12345612312")).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn create_returns_the_created_record_with_201() {
    let sut = make_sut();
    let res = sut.controller.create_order(fake_create_request()).await;
    assert_eq!(
        res,
        HttpResponse::created_201(serde_json::to_value(&sut.repo.record).unwrap())
    );
}

#[tokio::test]
async fn create_hands_collaborators_exactly_what_was_received() {
    let sut = make_sut();
    let request = fake_create_request();
    sut.controller.create_order(request.clone()).await;

    assert_eq!(*sut.validator.calls.lock().unwrap(), vec!["12345612312"]);
    assert_eq!(
        *sut.payments.calls.lock().unwrap(),
        vec![request.payment_data.clone()]
    );
    assert_eq!(
        *sut.repo.create_calls.lock().unwrap(),
        vec![(request, "transaction_id".to_string())]
    );
}

#[tokio::test]
async fn create_rejected_cpf_is_400_and_charges_nothing() {
    let sut = make_sut();
    sut.validator.set(Mode::Empty);
    let res = sut.controller.create_order(fake_create_request()).await;
    assert_eq!(res, bad_request("Invalid param: cpf"));
    assert!(sut.payments.calls.lock().unwrap().is_empty());
    assert!(sut.repo.create_calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn create_validator_failure_is_500_and_charges_nothing() {
    let sut = make_sut();
    sut.validator.set(Mode::Fail);
    let res = sut.controller.create_order(fake_create_request()).await;
    assert_eq!(res.status_code, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(sut.payments.calls.lock().unwrap().is_empty());
    assert!(sut.repo.create_calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn create_payment_failure_is_500_and_stores_nothing() {
    let sut = make_sut();
    *sut.payments.fail.lock().unwrap() = true;
    let res = sut.controller.create_order(fake_create_request()).await;
    assert_eq!(res.status_code, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        res.body,
        json!({ "error": "payment gateway request failed: gateway unreachable" })
    );
    assert!(sut.repo.create_calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn create_repository_failure_is_500_after_the_charge() {
    let sut = make_sut();
    sut.repo.set(Mode::Fail);
    let res = sut.controller.create_order(fake_create_request()).await;
    assert_eq!(res.status_code, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.body, json!({ "error": "db error: insert failed" }));
    assert_eq!(sut.payments.calls.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn update_returns_the_updated_record_with_200() {
    let sut = make_sut();
    let patch = OrderPatch {
        delivered: Some(true),
        ..Default::default()
    };
    let res = sut
        .controller
        .update_order(OrderQuery::Id(sut.repo.record.id), patch)
        .await;
    assert_eq!(res.status_code, StatusCode::OK);
    assert_eq!(res.body["delivered"], json!(true));
    assert_eq!(res.body["id"], json!(sut.repo.record.id));
    assert_eq!(res.body["transactionId"], json!("2134534253252"));
}

#[tokio::test]
async fn update_passes_the_request_as_new_data() {
    let sut = make_sut();
    let query = OrderQuery::Cpf("12345612312".into());
    let patch = OrderPatch {
        email: Some("valid_email@email.com".into()),
        cpf: Some("12345612312".into()),
        transaction_id: Some("2134534253252".into()),
        delivered: Some(false),
    };
    sut.controller.update_order(query.clone(), patch.clone()).await;
    assert_eq!(*sut.repo.update_calls.lock().unwrap(), vec![(query, patch)]);
    assert!(sut.validator.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn update_without_match_is_400() {
    let sut = make_sut();
    sut.repo.set(Mode::Empty);
    let res = sut
        .controller
        .update_order(OrderQuery::Cpf("12345612312".into()), OrderPatch::default())
        .await;
    assert_eq!(res, bad_request("Invalid param"));
}

#[tokio::test]
async fn update_repository_failure_is_500() {
    let sut = make_sut();
    sut.repo.set(Mode::Fail);
    let res = sut
        .controller
        .update_order(OrderQuery::Cpf("12345612312".into()), OrderPatch::default())
        .await;
    assert_eq!(res.status_code, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn list_and_delete_map_repository_outcomes() {
    let sut = make_sut();
    let listed = sut.controller.list_orders().await;
    assert_eq!(listed.status_code, StatusCode::OK);
    assert_eq!(listed.body.as_array().map(Vec::len), Some(1));

    let deleted = sut
        .controller
        .delete_order(OrderQuery::Id(sut.repo.record.id))
        .await;
    assert_eq!(deleted.status_code, StatusCode::NO_CONTENT);

    sut.repo.set(Mode::Empty);
    let missing = sut
        .controller
        .delete_order(OrderQuery::Id(sut.repo.record.id))
        .await;
    assert_eq!(missing, bad_request("Invalid param"));
}

#[tokio::test]
async fn list_repository_failure_is_500() {
    let sut = make_sut();
    sut.repo.set(Mode::Fail);
    let res = sut.controller.list_orders().await;
    assert_eq!(res.status_code, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.body, json!({ "error": "db error: connection reset" }));
}

#[tokio::test]
async fn delete_repository_failure_is_500() {
    let sut = make_sut();
    sut.repo.set(Mode::Fail);
    let res = sut
        .controller
        .delete_order(OrderQuery::Id(sut.repo.record.id))
        .await;
    assert_eq!(res.status_code, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.body, json!({ "error": "db error: connection reset" }));
}
