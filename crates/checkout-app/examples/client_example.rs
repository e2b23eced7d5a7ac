///  To run :
///  cargo r --example client_example
use checkout_client::CheckoutClient;
use checkout_hex::application::order_controller::OrderController;
use checkout_hex::inbound::http::{HttpServer, HttpServerConfig};
use checkout_payment::sandbox::SandboxGateway;
use checkout_repo::build_repo;
use checkout_types::domain::cpf::ChecksumCpfValidator;
use checkout_types::domain::order::{CreateOrderRequest, OrderData};
use checkout_types::domain::payment::PaymentData;
use tempfile::tempdir;

fn find_free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let port = find_free_port();
    let addr = format!("http://127.0.0.1:{port}/");

    // Use a temp file-backed SQLite DB so multiple connections see the same data.
    let tmp = tempdir()?;
    let db_path = tmp.path().join("orders.db");
    let db_url = format!("sqlite://{}", db_path.display());

    let repo = build_repo(Some(&db_url)).await?;
    let controller = OrderController::new(repo, ChecksumCpfValidator, SandboxGateway::new());
    let server = HttpServer::new(
        controller,
        HttpServerConfig {
            port: port.to_string(),
        },
    )
    .await?;

    let handle = tokio::spawn(async move {
        server.run().await.expect("server run");
    });
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let client = CheckoutClient::new(&addr)?;
    let created = client
        .create_order(&CreateOrderRequest {
            order_data: OrderData {
                cpf: "52998224725".into(),
                email: "example@example.com".into(),
                delivered: false,
            },
            payment_data: PaymentData {
                order_price: 1990,
                order_reference: 1,
                card_number: "5448280000000007".into(),
                cvv: "235".into(),
                expiration_month: "12".into(),
                expiration_year: "2030".into(),
                card_holder_name: "Fulano de Tal".into(),
            },
        })
        .await?;
    println!(
        "Created order id={} transaction={}",
        created.id, created.transaction_id
    );

    let fetched = client.get_order("52998224725").await?;
    println!("Fetched order for cpf, delivered={}", fetched.delivered);

    let updated = client.mark_delivered(&created.id.to_string()).await?;
    println!("Marked delivered={} for id {}", updated.delivered, updated.id);

    client.delete_order(&created.id.to_string()).await?;
    println!("Deleted order");

    match client.get_order("12345612312").await {
        Ok(_) => println!("unexpected: invalid cpf accepted"),
        Err(err) => println!("Invalid cpf rejected: {err}"),
    }

    handle.abort();
    Ok(())
}
