pub mod api_client;
pub mod requests;
pub mod responses;

pub use api_client::{APIClient, ClientError, FetchError};
pub use requests::{DependencyKey, Method, RequestDescriptor};

use serde::{Deserialize, Serialize};

// Discord snowflakes are 64-bit, which javascript can't represent exactly, so
// the API always sends them as strings.

/// Id type wrapper helps ensure we don't mix up ids for different objects.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(transparent)]
pub struct UserId(pub String);

#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(transparent)]
pub struct GuildId(pub String);

#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(transparent)]
pub struct RoleId(pub String);

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for GuildId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for RoleId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
