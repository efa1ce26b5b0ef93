use payloads::{GuildId, RoleId};
use reqwest::StatusCode;
use test_helpers::{assert_status_code, spawn_app};

#[tokio::test]
async fn guild_ranks_split_by_membership() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let guilds = app.client.guilds().await?;
    assert_eq!(guilds.len(), 2);

    let ranks = app.client.guild_ranks(&guilds[0].id).await?;
    assert_eq!(ranks.current.len(), 1);
    assert_eq!(ranks.current[0].name, "Writers");
    assert_eq!(ranks.available.len(), 2);
    assert!(ranks.roles().all(|role| role.guild_id == guilds[0].id));

    Ok(())
}

#[tokio::test]
async fn toggling_a_rank_returns_the_new_snapshot() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let guild_id = GuildId::from("200000000000000001");
    let artists = RoleId::from("300000000000000001");

    let before = app.client.guild_ranks(&guild_id).await?;
    assert!(!before.is_current(&artists));

    let joined = app
        .client
        .set_rank_membership(&guild_id, &artists, true)
        .await?;
    assert!(joined.is_current(&artists));
    let mut optimistic: Vec<_> = before
        .with_membership(&artists, true)
        .current
        .into_iter()
        .map(|role| role.id)
        .collect();
    let mut confirmed: Vec<_> =
        joined.current.iter().map(|role| role.id.clone()).collect();
    optimistic.sort();
    confirmed.sort();
    assert_eq!(optimistic, confirmed);

    let left = app
        .client
        .set_rank_membership(&guild_id, &artists, false)
        .await?;
    assert!(!left.is_current(&artists));
    assert_eq!(app.client.guild_ranks(&guild_id).await?, left);

    let last = app.backend.requests().pop().unwrap();
    assert_eq!(last.line(), "GET me/guilds/200000000000000001/ranks");

    Ok(())
}

#[tokio::test]
async fn unknown_rank_is_not_found() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let guild_id = GuildId::from("200000000000000001");

    let result = app
        .client
        .set_rank_membership(&guild_id, &RoleId::from("1"), true)
        .await;
    assert_status_code(result, StatusCode::NOT_FOUND);

    let result = app.client.guild_ranks(&GuildId::from("1")).await;
    assert_status_code(result, StatusCode::NOT_FOUND);

    Ok(())
}
