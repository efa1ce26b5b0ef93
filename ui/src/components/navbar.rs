use payloads::{requests, responses::User};
use yew::prelude::*;

use super::DiscordImage;
use crate::get_api_client;
use crate::hooks::{use_fetch, use_title};
use crate::utils::discord_image::{
    ImageRequest, ImageShape, ImageSize, ImageSubject,
};

fn avatar_request(user: &User) -> Option<ImageRequest> {
    let hash = user.avatar.clone()?;
    Some(
        ImageRequest::new(ImageSubject::Avatar {
            user_id: user.id.clone(),
            hash,
        })
        .size(ImageSize::PX32)
        .shape(ImageShape::Circle)
        .animated(true),
    )
}

#[derive(Properties, PartialEq)]
pub struct NavbarBotProps {
    /// Bot identity embedded in the page, if any. Without it the bot is
    /// fetched from the API.
    #[prop_or_default]
    pub bot: Option<User>,
}

#[function_component]
pub fn NavbarBot(props: &NavbarBotProps) -> Html {
    match &props.bot {
        Some(bot) => html! { <BotIdentity bot={bot.clone()} /> },
        None => html! { <FetchedBot /> },
    }
}

#[function_component]
fn FetchedBot() -> Html {
    let bot = use_fetch::<User>(requests::bot_user());
    bot.render("Bot", |bot| html! { <BotIdentity bot={bot.clone()} /> })
}

#[derive(Properties, PartialEq)]
struct BotIdentityProps {
    bot: User,
}

#[function_component]
fn BotIdentity(props: &BotIdentityProps) -> Html {
    use_title(&props.bot.username);

    html! {
        <a class="uk-navbar-item uk-logo" href="/">
            if let Some(request) = avatar_request(&props.bot) {
                <DiscordImage
                    {request}
                    alt=""
                    class="uk-margin-small-right"
                />
            }
            {&props.bot.username}
        </a>
    }
}

#[derive(Properties, PartialEq)]
pub struct NavbarUserProps {
    pub user: User,
}

/// The signed-in user with a sign-out button.
#[function_component]
pub fn NavbarUser(props: &NavbarUserProps) -> Html {
    html! {
        <div class="uk-navbar-item">
            if let Some(request) = avatar_request(&props.user) {
                <DiscordImage
                    {request}
                    alt=""
                    class="uk-margin-small-right"
                />
            }
            <span class="uk-margin-small-right">{props.user.tag()}</span>
            <SignOutButton />
        </div>
    }
}

/// Ends the session through a full-page form submission, so the API can
/// clear its cookie and redirect.
#[function_component]
pub fn SignOutButton() -> Html {
    let action = get_api_client().auth_clear_url();

    html! {
        <form method="post" action={action} class="uk-display-inline">
            <button
                class="uk-button uk-button-default uk-button-small"
                type="submit"
            >
                <span uk-icon="sign-out"></span>
                {" Sign out"}
            </button>
        </form>
    }
}
