use yew::prelude::*;

/// Sets the document title. No cleanup on unmount; the bot's name stays the
/// title for the lifetime of the page.
#[hook]
pub fn use_title(title: &str) {
    let title = title.to_string();
    use_effect_with(title, |title| {
        if let Some(doc) = web_sys::window().and_then(|w| w.document()) {
            doc.set_title(title);
        }
    });
}
