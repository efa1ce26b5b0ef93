use yew::prelude::*;

use crate::hooks::use_prefers_reduced_motion;
use crate::utils::discord_image::{ImageRequest, image_source};

#[derive(Properties, PartialEq)]
pub struct DiscordImageProps {
    pub request: ImageRequest,
    #[prop_or_default]
    pub alt: AttrValue,
    #[prop_or_default]
    pub class: Classes,
}

/// An avatar or guild icon from the CDN, sized and rounded as requested.
#[function_component]
pub fn DiscordImage(props: &DiscordImageProps) -> Html {
    let reduced_motion = use_prefers_reduced_motion();
    let source = image_source(&props.request, reduced_motion);
    let px = source.size.px().to_string();

    html! {
        <img
            src={source.url.clone()}
            width={px.clone()}
            height={px}
            style={source.style()}
            alt={props.alt.clone()}
            class={props.class.clone()}
        />
    }
}
