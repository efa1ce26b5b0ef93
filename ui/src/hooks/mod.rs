pub mod lifecycle;
pub mod use_fetch;
pub mod use_prefers_reduced_motion;
pub mod use_title;

pub use lifecycle::{LiveRequest, RequestLifecycle};
pub use use_fetch::{FetchAction, FetchHandle, FetchState, use_fetch};
pub use use_prefers_reduced_motion::use_prefers_reduced_motion;
pub use use_title::use_title;
