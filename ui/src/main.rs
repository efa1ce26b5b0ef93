fn main() {
    ui::logs::init_logging();
    // only a prerendered page carries the inline bot
    match ui::inline_bot() {
        Some(bot) => {
            let props = ui::AppProps { bot: Some(bot) };
            yew::Renderer::<ui::App>::with_props(props).hydrate();
        }
        None => {
            yew::Renderer::<ui::App>::new().render();
        }
    }
}
