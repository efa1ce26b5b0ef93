use payloads::{FetchError, RequestDescriptor};
use serde::de::DeserializeOwned;
use std::rc::Rc;
use yew::prelude::*;

use super::RequestLifecycle;
use crate::components::{Errors, Spinner};
use crate::get_api_client;

/// State of one fetch call site.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchState<T> {
    pub data: Option<T>,
    pub error: Option<FetchError>,
    pub is_loading: bool,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            is_loading: true,
        }
    }
}

pub enum FetchAction<T> {
    /// A request was issued. Data and error stay as they are.
    Start,
    /// The live request settled. Success replaces the data and clears the
    /// error; failure keeps the last data and records the error.
    Settle(Result<T, FetchError>),
    SetData(Option<T>),
    SetError(Option<FetchError>),
}

impl<T: Clone> FetchState<T> {
    pub fn apply(&self, action: FetchAction<T>) -> Self {
        let mut next = self.clone();
        match action {
            FetchAction::Start => next.is_loading = true,
            FetchAction::Settle(Ok(data)) => {
                next.data = Some(data);
                next.error = None;
                next.is_loading = false;
            }
            FetchAction::Settle(Err(error)) => {
                next.error = Some(error);
                next.is_loading = false;
            }
            FetchAction::SetData(data) => next.data = data,
            FetchAction::SetError(error) => next.error = error,
        }
        next
    }
}

impl<T: Clone> Reducible for FetchState<T> {
    type Action = FetchAction<T>;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        Rc::new(self.apply(action))
    }
}

/// Generic fetch hook return type
pub struct FetchHandle<T> {
    /// Last successfully fetched (or locally set) value. Kept while a newer
    /// request is in flight.
    pub data: Option<T>,
    /// Error from the latest request, cleared by the next success.
    pub error: Option<FetchError>,
    pub is_loading: bool,
    /// Write `data` directly, e.g. for optimistic updates. Doesn't interact
    /// with the request in flight.
    pub set_data: Callback<Option<T>>,
    pub set_error: Callback<Option<FetchError>>,
    /// Issue the same request again.
    pub reload: Callback<()>,
}

impl<T> FetchHandle<T> {
    /// Render based on fetch state with contextual loading/error messages.
    ///
    /// - No data + error: danger alert titled "{context} load error"
    /// - No data: spinner
    /// - Has data: `render_fn(data)`; errors from later reloads are left to
    ///   the caller
    pub fn render<F>(&self, context: &str, render_fn: F) -> Html
    where
        F: FnOnce(&T) -> Html,
    {
        match (&self.data, &self.error) {
            (Some(data), _) => render_fn(data),
            (None, Some(error)) => html! {
                <Errors
                    heading={Some(format!("{context} load error"))}
                    errors={vec![Some(error.clone())]}
                />
            },
            (None, None) => html! {
                <Spinner class="uk-margin" />
            },
        }
    }
}

/// Fetch `descriptor` for as long as the calling component is mounted.
///
/// A new request starts whenever the descriptor's dependency key changes,
/// cancelling the previous one; the old data stays visible until the new
/// result lands. Results of cancelled requests and of requests outliving the
/// component are dropped, never written.
///
/// Errors are captured in `error` rather than interpreted: whether a 404
/// means "not signed in" is up to the caller.
///
/// # Example
///
/// ```ignore
/// #[function_component]
/// fn Ranks(props: &Props) -> Html {
///     let ranks = use_fetch::<GuildRanks>(
///         requests::guild_ranks(&props.guild_id),
///     );
///     ranks.render("Rank", |ranks| html! {
///         <RankList ranks={ranks.clone()} />
///     })
/// }
/// ```
#[hook]
pub fn use_fetch<T>(descriptor: RequestDescriptor) -> FetchHandle<T>
where
    T: DeserializeOwned + Clone + 'static,
{
    let state = use_reducer(FetchState::<T>::default);
    let revision = use_state(|| 0u32);
    let lifecycle = use_mut_ref(RequestLifecycle::default);

    {
        let dispatcher = state.dispatcher();
        let lifecycle = lifecycle.clone();

        use_effect_with(
            (descriptor.dependency_key(), *revision),
            move |(key, _)| {
                let request = lifecycle.borrow().begin();
                tracing::debug!("fetching {key}");
                dispatcher.dispatch(FetchAction::Start);

                yew::platform::spawn_local(async move {
                    let client = get_api_client();
                    request
                        .run(client.send::<T>(&descriptor), move |result| {
                            let result = result.map_err(|e| {
                                tracing::warn!("request failed: {e}");
                                FetchError::from(e)
                            });
                            dispatcher.dispatch(FetchAction::Settle(result));
                        })
                        .await;
                });

                move || lifecycle.borrow().cancel()
            },
        );
    }

    let set_data = {
        let dispatcher = state.dispatcher();
        Callback::from(move |value: Option<T>| {
            dispatcher.dispatch(FetchAction::SetData(value))
        })
    };
    let set_error = {
        let dispatcher = state.dispatcher();
        Callback::from(move |value: Option<FetchError>| {
            dispatcher.dispatch(FetchAction::SetError(value))
        })
    };
    let reload = {
        let revision = revision.clone();
        Callback::from(move |_: ()| revision.set(revision.wrapping_add(1)))
    };

    FetchHandle {
        data: state.data.clone(),
        error: state.error.clone(),
        is_loading: state.is_loading,
        set_data,
        set_error,
        reload,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server_error() -> FetchError {
        FetchError::HttpStatus {
            status: 500,
            status_text: "Internal Server Error".into(),
        }
    }

    #[test]
    fn starts_loading_with_nothing() {
        let state = FetchState::<u8>::default();
        assert_eq!(state.data, None);
        assert_eq!(state.error, None);
        assert!(state.is_loading);
    }

    #[test]
    fn failure_keeps_stale_data() {
        let state = FetchState::default()
            .apply(FetchAction::Settle(Ok(1)))
            .apply(FetchAction::Start);
        assert_eq!(state.data, Some(1));
        assert!(state.is_loading);

        let state = state.apply(FetchAction::Settle(Err(server_error())));
        assert_eq!(state.data, Some(1));
        assert_eq!(state.error, Some(server_error()));
        assert!(!state.is_loading);
    }

    #[test]
    fn success_clears_the_error() {
        let state = FetchState::default()
            .apply(FetchAction::Settle(Err(server_error())))
            .apply(FetchAction::Start);
        assert_eq!(state.error, Some(server_error()));

        let state = state.apply(FetchAction::Settle(Ok(2)));
        assert_eq!(state.data, Some(2));
        assert_eq!(state.error, None);
    }

    #[test]
    fn setters_write_unconditionally() {
        let state = FetchState::default()
            .apply(FetchAction::Start)
            .apply(FetchAction::SetData(Some(3)))
            .apply(FetchAction::SetError(Some(FetchError::generic("x"))));
        assert_eq!(state.data, Some(3));
        assert_eq!(state.error, Some(FetchError::generic("x")));
        // the request in flight is unaffected
        assert!(state.is_loading);
    }
}
