pub mod mock;
pub mod routes;
pub mod telemetry;

use actix_cors::Cors;
use actix_web::{App, HttpServer, dev::Server, middleware, web};
use mock::{Dataset, MockBackend};
use payloads::ClientError;
use reqwest::StatusCode;
use std::net::TcpListener;
use tracing_subscriber::util::SubscriberInitExt;

pub struct TestApp {
    pub port: u16,
    pub client: payloads::APIClient,
    pub backend: MockBackend,
}

impl TestApp {
    pub fn address(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }
}

/// Build the mock server, but not await it.
///
/// Binding to port 0 gets an os-assigned port; the bound port is returned
/// alongside the server.
pub fn build(
    ip: &str,
    port: u16,
    backend: MockBackend,
) -> std::io::Result<(Server, u16)> {
    let listener = TcpListener::bind(format!("{ip}:{port}"))?;
    let port = listener.local_addr()?.port();
    let backend = web::Data::new(backend);
    let server = HttpServer::new(move || {
        // trunk serves the ui from another origin during development
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .supports_credentials();

        App::new()
            .wrap(middleware::from_fn(routes::apply_overrides))
            .wrap(cors)
            .service(routes::api_services())
            .app_data(backend.clone())
    })
    .listen(listener)?
    .run();
    Ok((server, port))
}

pub async fn spawn_app_with(dataset: Dataset, port: u16) -> TestApp {
    let subscriber = telemetry::get_subscriber("error".into());
    let _ = tracing_log::LogTracer::init();
    let _ = subscriber.try_init();

    let backend = MockBackend::new(dataset);
    let (server, port) = build("127.0.0.1", port, backend.clone())
        .expect("Failed to bind mock server");
    tokio::spawn(server);

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to build client");

    TestApp {
        port,
        client: payloads::APIClient {
            address: format!("http://127.0.0.1:{port}"),
            inner_client: client,
        },
        backend,
    }
}

/// Use OS-assigned port for parallel testing.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(Dataset::sample(), 0).await
}

/// Assert that the result of an API action results in a specific status code.
pub fn assert_status_code<T>(
    result: Result<T, ClientError>,
    expected: StatusCode,
) {
    match result {
        Err(ClientError::Status { status, .. }) => {
            assert_eq!(status, expected)
        }
        _ => panic!("Expected ClientError::Status"),
    };
}
