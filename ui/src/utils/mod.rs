pub mod discord_image;
pub mod sort;

pub use sort::{SortKey, by_key};

