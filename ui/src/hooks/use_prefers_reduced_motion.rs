use wasm_bindgen::prelude::*;
use web_sys::{MediaQueryList, MediaQueryListEvent};
use yew::prelude::*;

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

fn reduced_motion_query() -> Option<MediaQueryList> {
    web_sys::window()?.match_media(REDUCED_MOTION_QUERY).ok()?
}

/// Tracks the user's reduced-motion preference.
///
/// Starts out `false` on every render path, including server-side rendering,
/// so hydration sees the same tree the prerendered html was made from; the
/// real preference is read once mounted.
#[hook]
pub fn use_prefers_reduced_motion() -> bool {
    let reduced = use_state(|| false);

    {
        let reduced = reduced.clone();
        use_effect_with((), move |_| {
            let query = reduced_motion_query();
            let listener = query.map(|query| {
                reduced.set(query.matches());

                let closure = Closure::wrap(Box::new(
                    move |event: MediaQueryListEvent| {
                        reduced.set(event.matches());
                    },
                )
                    as Box<dyn FnMut(MediaQueryListEvent)>);
                if let Err(e) = query.add_event_listener_with_callback(
                    "change",
                    closure.as_ref().unchecked_ref(),
                ) {
                    tracing::warn!("can't watch reduced motion: {e:?}");
                }
                (query, closure)
            });

            // Rust owns the closure; JS only holds a pointer to it
            move || {
                if let Some((query, closure)) = listener {
                    let _ = query.remove_event_listener_with_callback(
                        "change",
                        closure.as_ref().unchecked_ref(),
                    );
                    drop(closure);
                }
            }
        });
    }

    *reduced
}
