use payloads::FetchError;
use reqwest::StatusCode;
use test_helpers::{assert_status_code, mock, spawn_app};

#[tokio::test]
async fn current_user_when_signed_in() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let user = app.client.current_user().await?;
    assert_eq!(user, mock::alice());
    assert_eq!(user.tag(), "alice#0007");

    Ok(())
}

#[tokio::test]
async fn current_user_is_not_found_without_session() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.backend.sign_out();

    let result = app.client.current_user().await;
    let error = FetchError::from(result.unwrap_err());
    assert!(error.is_not_found());
    assert_eq!(error.status(), Some(404));

    // the other user endpoints refuse too
    assert_status_code(app.client.guilds().await, StatusCode::NOT_FOUND);

    // the bot identity is public
    let bot = app.client.bot_user().await?;
    assert!(bot.bot);

    Ok(())
}

#[tokio::test]
async fn requests_ask_for_json() -> anyhow::Result<()> {
    let app = spawn_app().await;

    app.client.bot_user().await?;
    app.client.guilds().await?;

    let requests = app.backend.requests();
    let lines: Vec<_> = requests.iter().map(|r| r.line()).collect();
    assert_eq!(lines, vec!["GET bot", "GET me/guilds"]);
    assert!(
        requests
            .iter()
            .all(|r| r.accept.as_deref() == Some("application/json"))
    );

    Ok(())
}

#[tokio::test]
async fn auth_redirect_signs_in() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.backend.sign_out();

    let response = app
        .client
        .inner_client
        .post(app.client.auth_redirect_url())
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    app.client.current_user().await?;

    let response = app
        .client
        .inner_client
        .post(app.client.auth_clear_url())
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_status_code(app.client.current_user().await, StatusCode::NOT_FOUND);

    Ok(())
}
