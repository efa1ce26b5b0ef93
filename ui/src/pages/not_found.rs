use yew::prelude::*;
use yew_router::prelude::*;

use crate::Route;

#[function_component]
pub fn NotFoundPage() -> Html {
    html! {
        <div class="uk-text-center uk-margin-large-top">
            <h1 class="uk-heading-small">{"404"}</h1>
            <p class="uk-text-muted">{"Page not found"}</p>
            <Link<Route> to={Route::Ranks}>{"Back to your ranks"}</Link<Route>>
        </div>
    }
}
