use yew::prelude::*;
use yew_router::prelude::*;

use crate::Route;

#[derive(Properties, PartialEq)]
pub struct NavLinkProps {
    pub to: Route,
    pub children: Children,
}

/// Navbar entry, highlighted while its route is showing.
#[function_component]
pub fn NavLink(props: &NavLinkProps) -> Html {
    let route = use_route::<Route>();
    let active = route.as_ref() == Some(&props.to);

    html! {
        <li class={classes!(active.then_some("uk-active"))}>
            <Link<Route> to={props.to.clone()}>
                {for props.children.iter()}
            </Link<Route>>
        </li>
    }
}
