use payloads::{APIClient, FetchError, requests, responses::User};
use yew::prelude::*;
use yew_router::prelude::*;
#[cfg(feature = "ssr")]
use yew_router::history::{AnyHistory, History, MemoryHistory};

pub mod components;
pub mod hooks;
pub mod logs;
pub mod pages;
pub mod utils;

use components::{
    Errors, Guilds, NavLink, NavbarBot, NavbarUser, SignOutButton, Spinner,
};
use hooks::use_fetch;
use pages::NotFoundPage;

/// `type` of the script tag a server may embed the bot's identity in.
pub const INLINE_BOT_TYPE: &str = "application/x-bot-user+json";

// Global API client - configurable via environment or same-origin fallback
pub fn get_api_client() -> APIClient {
    // Try environment variable first (set at build time)
    let address = option_env!("BACKEND_URL")
        .map(|url| url.to_string())
        .unwrap_or_else(same_origin);
    APIClient::new(address)
}

#[cfg(target_arch = "wasm32")]
fn same_origin() -> String {
    web_sys::window()
        .and_then(|window| window.location().origin().ok())
        .unwrap_or_default()
}

// Relative urls when rendering outside a browser.
#[cfg(not(target_arch = "wasm32"))]
fn same_origin() -> String {
    String::new()
}

/// Bot identity embedded in the page by the server, read once at startup.
pub fn inline_bot() -> Option<User> {
    let document = web_sys::window()?.document()?;
    let selector = format!(r#"script[type="{INLINE_BOT_TYPE}"]"#);
    let script = document.query_selector(&selector).ok()??;
    let json = script.text_content()?;
    match serde_json::from_str(&json) {
        Ok(bot) => Some(bot),
        Err(e) => {
            tracing::warn!("ignoring inline bot data: {e}");
            None
        }
    }
}

#[derive(Clone, Debug, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/ranks")]
    Ranks,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(routes: Route) -> Html {
    match routes {
        Route::Home => html! { <Redirect<Route> to={Route::Ranks} /> },
        Route::Ranks => html! { <Guilds /> },
        Route::NotFound => html! { <NotFoundPage /> },
    }
}

#[derive(Properties, PartialEq, Default)]
pub struct AppProps {
    /// Bootstrap bot identity; fetched from the API when absent.
    #[prop_or_default]
    pub bot: Option<User>,
}

#[function_component]
pub fn App(props: &AppProps) -> Html {
    html! {
        <BrowserRouter>
            <Dashboard bot={props.bot.clone()} />
        </BrowserRouter>
    }
}

#[cfg(feature = "ssr")]
#[derive(Properties, PartialEq)]
pub struct ServerAppProps {
    pub path: AttrValue,
    #[prop_or_default]
    pub bot: Option<User>,
}

/// [`App`] with an in-memory history, for rendering outside a browser.
#[cfg(feature = "ssr")]
#[function_component]
pub fn ServerApp(props: &ServerAppProps) -> Html {
    let history = AnyHistory::from(MemoryHistory::new());
    history.push(&*props.path);

    html! {
        <Router history={history}>
            <Dashboard bot={props.bot.clone()} />
        </Router>
    }
}

#[derive(Properties, PartialEq)]
struct DashboardProps {
    bot: Option<User>,
}

/// What the main area shows for the state of the current-user fetch.
#[derive(Debug, Clone, PartialEq)]
enum DashboardView {
    Loading,
    /// 404 on the current user: there is no session.
    Redirecting,
    Failed(FetchError),
    Ready,
}

fn dashboard_view(
    user: Option<&User>,
    error: Option<&FetchError>,
) -> DashboardView {
    match (user, error) {
        (_, Some(error)) if error.is_not_found() => DashboardView::Redirecting,
        (Some(_), _) => DashboardView::Ready,
        (None, Some(error)) => DashboardView::Failed(error.clone()),
        (None, None) => DashboardView::Loading,
    }
}

#[function_component]
fn Dashboard(props: &DashboardProps) -> Html {
    let user = use_fetch::<User>(requests::current_user());
    let view = dashboard_view(user.data.as_ref(), user.error.as_ref());

    use_effect_with(view == DashboardView::Redirecting, |needs_login| {
        if *needs_login {
            redirect_to_login();
        }
    });

    let content = match view {
        DashboardView::Redirecting => html! {
            <p class="uk-text-muted">{"Redirecting to login…"}</p>
        },
        DashboardView::Ready => html! { <Switch<Route> render={switch} /> },
        DashboardView::Failed(error) => html! {
            <>
                <Errors
                    heading={Some("Couldn't load your account".to_string())}
                    errors={vec![Some(error)]}
                />
                <SignOutButton />
            </>
        },
        DashboardView::Loading => html! {
            <Spinner class="uk-margin" ratio={2.0} />
        },
    };

    html! {
        <>
            <nav class="uk-navbar-container uk-margin" uk-navbar="">
                <div class="uk-navbar-left">
                    <NavbarBot bot={props.bot.clone()} />
                    <ul class="uk-navbar-nav">
                        <NavLink to={Route::Ranks}>{"Ranks"}</NavLink>
                    </ul>
                </div>
                <div class="uk-navbar-right">
                    if let Some(user) = &user.data {
                        <NavbarUser user={user.clone()} />
                    }
                </div>
            </nav>
            <main class="uk-container">
                {content}
            </main>
        </>
    }
}

/// Full-page navigation to the API's OAuth entry point.
fn redirect_to_login() {
    let url = get_api_client().auth_redirect_url();
    tracing::info!("no session, redirecting to {url}");
    let Some(window) = web_sys::window() else {
        return;
    };
    if let Err(e) = window.location().set_href(&url) {
        tracing::error!("login redirect failed: {e:?}");
    }
}
