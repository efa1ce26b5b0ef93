use futures::future::{Aborted, abortable};
use payloads::{APIClient, ClientError, FetchError};
use reqwest::StatusCode;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use test_helpers::{assert_status_code, spawn_app};

#[tokio::test]
async fn server_error_is_distinct_from_not_found() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.backend
        .force_status("me/user", StatusCode::INTERNAL_SERVER_ERROR);

    let result = app.client.current_user().await;
    assert_status_code(result, StatusCode::INTERNAL_SERVER_ERROR);

    let error = FetchError::from(app.client.current_user().await.unwrap_err());
    assert_eq!(error.status(), Some(500));
    assert!(!error.is_not_found());

    app.backend.clear_overrides();
    app.client.current_user().await?;

    Ok(())
}

#[tokio::test]
async fn malformed_body_is_a_parse_error() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.backend.serve_malformed("me/guilds");

    let result = app.client.guilds().await;
    assert!(matches!(result, Err(ClientError::Parse(_))));

    let error = FetchError::from(result.unwrap_err());
    assert!(matches!(error, FetchError::Generic { .. }));
    assert_eq!(error.status(), None);

    Ok(())
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() -> anyhow::Result<()> {
    // nothing listens on port 9 locally
    let client = payloads::APIClient::new("http://127.0.0.1:9");

    let result = client.bot_user().await;
    assert!(matches!(result, Err(ClientError::Network(_))));
    assert!(matches!(
        FetchError::from(result.unwrap_err()),
        FetchError::Generic { .. }
    ));

    Ok(())
}

#[tokio::test]
async fn aborting_drops_the_request() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.backend.delay("me/guilds", Duration::from_secs(30));

    let (request, handle) = abortable(app.client.guilds());
    let abort = async {
        tokio::time::sleep(Duration::from_millis(200)).await;
        handle.abort();
    };
    let both = async { futures::join!(request, abort) };
    let (result, ()) =
        tokio::time::timeout(Duration::from_secs(5), both).await?;
    assert!(matches!(result, Err(Aborted)));
    assert_eq!(app.backend.requests()[0].line(), "GET me/guilds");

    // the client stays usable
    app.backend.clear_overrides();
    assert_eq!(app.client.guilds().await?.len(), 2);

    Ok(())
}

#[tokio::test]
async fn truncated_error_body_keeps_the_status() -> anyhow::Result<()> {
    // promises 100 bytes of body, sends 5, then hangs up
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let address = format!("http://{}", listener.local_addr()?);
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await?;
        let mut request = [0; 1024];
        let _ = socket.read(&mut request).await?;
        socket
            .write_all(
                b"HTTP/1.1 500 Internal Server Error\r\n\
                  Content-Length: 100\r\n\r\nshort",
            )
            .await?;
        socket.shutdown().await
    });

    let result = APIClient::new(address).current_user().await;
    assert_status_code(result, StatusCode::INTERNAL_SERVER_ERROR);

    Ok(())
}
