use payloads::FetchError;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ErrorsProps {
    #[prop_or_default]
    pub heading: Option<String>,
    /// Slots that hold no error are skipped, so callers can pass the error
    /// of every fetch on the page as-is.
    pub errors: Vec<Option<FetchError>>,
}

/// Danger alert listing each present error. Renders nothing if there are
/// none.
#[function_component]
pub fn Errors(props: &ErrorsProps) -> Html {
    let errors: Vec<&FetchError> = props.errors.iter().flatten().collect();
    if errors.is_empty() {
        return html! {};
    }

    html! {
        <div class="uk-alert-danger" uk-alert="">
            if let Some(heading) = &props.heading {
                <h3>{heading}</h3>
            }
            { for errors.iter().map(|error| html! {
                <p>{error.to_string()}</p>
            }) }
        </div>
    }
}
