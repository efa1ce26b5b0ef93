use payloads::{
    FetchError, RoleId, requests,
    responses::{self, Guild, Role},
};
use std::future::Future;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use super::{DiscordImage, Errors};
use crate::get_api_client;
use crate::hooks::use_fetch;
use crate::utils::by_key;
use crate::utils::discord_image::{
    ImageRequest, ImageShape, ImageSize, ImageSubject,
};

/// Join or leave one rank.
///
/// `set_data` first receives the optimistic snapshot derived from `prior`,
/// then either the server's snapshot or, if `request` fails, `prior` again.
pub async fn toggle_rank<E>(
    prior: responses::GuildRanks,
    role_id: &RoleId,
    on: bool,
    request: impl Future<Output = Result<responses::GuildRanks, E>>,
    set_data: impl Fn(responses::GuildRanks),
) -> Result<(), FetchError>
where
    E: Into<FetchError>,
{
    set_data(prior.with_membership(role_id, on));
    match request.await {
        Ok(snapshot) => {
            set_data(snapshot);
            Ok(())
        }
        Err(e) => {
            set_data(prior);
            Err(e.into())
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct GuildRanksProps {
    pub guild: Guild,
}

/// One guild's card with a checkbox per rank.
#[function_component]
pub fn GuildRanks(props: &GuildRanksProps) -> Html {
    let request = requests::guild_ranks(&props.guild.id);
    let ranks = use_fetch::<responses::GuildRanks>(request);
    let changing = use_state(|| false);
    let toggle_error = use_state(|| None::<FetchError>);

    let on_toggle = {
        let guild_id = props.guild.id.clone();
        let prior = ranks.data.clone();
        let set_data = ranks.set_data.clone();
        let changing = changing.clone();
        let toggle_error = toggle_error.clone();
        Callback::from(move |(role_id, on): (RoleId, bool)| {
            let Some(prior) = prior.clone() else {
                return;
            };
            changing.set(true);
            toggle_error.set(None);

            let guild_id = guild_id.clone();
            let set_data = set_data.clone();
            let changing = changing.clone();
            let toggle_error = toggle_error.clone();
            yew::platform::spawn_local(async move {
                let request = {
                    let guild_id = guild_id.clone();
                    let role_id = role_id.clone();
                    async move {
                        get_api_client()
                            .set_rank_membership(&guild_id, &role_id, on)
                            .await
                    }
                };
                let result =
                    toggle_rank(prior, &role_id, on, request, |snapshot| {
                        set_data.emit(Some(snapshot))
                    })
                    .await;
                if let Err(e) = result {
                    tracing::warn!("rank {role_id} in {guild_id}: {e}");
                    toggle_error.set(Some(e));
                }
                changing.set(false);
            });
        })
    };

    let icon = props.guild.icon.clone().map(|hash| {
        ImageRequest::new(ImageSubject::Icon {
            guild_id: props.guild.id.clone(),
            hash,
        })
        .size(ImageSize::PX64)
        .shape(ImageShape::Squircle)
        .animated(true)
    });

    html! {
        <div class="uk-card uk-card-default uk-card-body uk-margin">
            <h3 class="uk-card-title uk-flex uk-flex-middle">
                if let Some(request) = icon {
                    <DiscordImage
                        {request}
                        alt=""
                        class="uk-margin-small-right"
                    />
                }
                {&props.guild.name}
            </h3>
            <Errors
                heading={Some("Couldn't update your ranks".to_string())}
                errors={vec![(*toggle_error).clone()]}
            />
            { ranks.render("Rank", |ranks| html! {
                <RankList
                    ranks={ranks.clone()}
                    disabled={*changing}
                    on_toggle={on_toggle.clone()}
                />
            }) }
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct RankListProps {
    ranks: responses::GuildRanks,
    disabled: bool,
    on_toggle: Callback<(RoleId, bool)>,
}

#[function_component]
fn RankList(props: &RankListProps) -> Html {
    let mut roles: Vec<&Role> = props.ranks.roles().collect();
    if roles.is_empty() {
        return html! {
            <p class="uk-text-muted">
                {"This server has no self-assignable ranks."}
            </p>
        };
    }
    roles.sort_by(by_key(|role: &&Role| role.name.clone()));

    html! {
        <ul class="uk-list">
            { for roles.into_iter().map(|role| {
                let role_id = role.id.clone();
                let onchange = props.on_toggle.reform(move |e: Event| {
                    let input: HtmlInputElement = e.target_unchecked_into();
                    (role_id.clone(), input.checked())
                });
                let style = (role.color != 0)
                    .then(|| format!("color: #{:06x}", role.color));
                html! {
                    <li key={role.id.to_string()}>
                        <label>
                            <input
                                class="uk-checkbox uk-margin-small-right"
                                type="checkbox"
                                checked={props.ranks.is_current(&role.id)}
                                disabled={props.disabled}
                                {onchange}
                            />
                            <span {style}>{&role.name}</span>
                        </label>
                    </li>
                }
            }) }
        </ul>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use futures::FutureExt;
    use futures::future::{pending, ready};
    use payloads::responses::RoleTags;
    use std::cell::RefCell;

    fn role(id: &str, name: &str) -> Role {
        Role {
            id: id.into(),
            guild_id: "guild".into(),
            name: name.into(),
            color: 0,
            hoist: false,
            managed: false,
            mentionable: true,
            position: 1,
            tags: RoleTags::default(),
        }
    }

    fn prior() -> responses::GuildRanks {
        responses::GuildRanks {
            current: vec![role("2", "Writers")],
            available: vec![role("1", "Artists"), role("3", "gamers")],
        }
    }

    #[test]
    fn successful_toggle_shows_optimistic_then_server_snapshot() {
        let writes = RefCell::new(Vec::new());
        let artists = RoleId::from("1");
        let server = prior().with_membership(&artists, true);

        let result = block_on(toggle_rank(
            prior(),
            &artists,
            true,
            ready(Ok::<_, FetchError>(server.clone())),
            |snapshot| writes.borrow_mut().push(snapshot),
        ));

        assert_eq!(result, Ok(()));
        let writes = writes.into_inner();
        assert_eq!(writes.len(), 2);
        assert!(writes[0].is_current(&artists));
        assert_eq!(writes[1], server);
    }

    #[test]
    fn failed_toggle_reverts_and_reports() {
        let writes = RefCell::new(Vec::new());
        let artists = RoleId::from("1");
        let failure = FetchError::HttpStatus {
            status: 500,
            status_text: "Internal Server Error".into(),
        };

        let result = block_on(toggle_rank(
            prior(),
            &artists,
            true,
            ready(Err::<responses::GuildRanks, _>(failure.clone())),
            |snapshot| writes.borrow_mut().push(snapshot),
        ));

        assert_eq!(result, Err(failure));
        let writes = writes.into_inner();
        assert!(writes[0].is_current(&artists));
        assert_eq!(writes.last(), Some(&prior()));
        assert!(!writes[1].is_current(&artists));
    }

    #[test]
    fn optimistic_snapshot_lands_before_the_server_answers() {
        let writes = RefCell::new(Vec::new());
        let writers = RoleId::from("2");

        let outcome = toggle_rank(
            prior(),
            &writers,
            false,
            pending::<Result<responses::GuildRanks, FetchError>>(),
            |snapshot| writes.borrow_mut().push(snapshot),
        )
        .now_or_never();

        assert!(outcome.is_none());
        let writes = writes.into_inner();
        assert_eq!(writes.len(), 1);
        assert!(!writes[0].is_current(&writers));
        assert_eq!(writes[0].available.len(), 3);
    }
}
