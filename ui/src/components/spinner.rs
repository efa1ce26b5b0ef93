use yew::prelude::*;

use crate::hooks::use_prefers_reduced_motion;

#[derive(Properties, PartialEq)]
pub struct SpinnerProps {
    #[prop_or_default]
    pub class: Classes,
    #[prop_or(1.0)]
    pub ratio: f64,
}

/// Loading indicator. Users who prefer reduced motion get the text
/// "Loading…" instead of the spinning icon.
#[function_component]
pub fn Spinner(props: &SpinnerProps) -> Html {
    let reduced_motion = use_prefers_reduced_motion();

    if reduced_motion {
        html! {
            <div class={props.class.clone()}>{"Loading…"}</div>
        }
    } else {
        html! {
            <div
                class={props.class.clone()}
                uk-spinner={format!("ratio: {}", props.ratio)}
            />
        }
    }
}
