use crate::{
    GuildId, Method, RequestDescriptor, RoleId, requests,
    responses::{self, GuildRanks},
};
use reqwest::{StatusCode, header::ACCEPT};
use serde::de::DeserializeOwned;

type ReqwestResult = Result<reqwest::Response, reqwest::Error>;

/// An API client for interfacing with the dashboard backend.
pub struct APIClient {
    pub address: String,
    pub inner_client: reqwest::Client,
}

/// Helper methods for http actions
impl APIClient {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            inner_client: reqwest::Client::new(),
        }
    }

    fn format_url(&self, path: &str) -> String {
        format!("{}/api/{path}", &self.address)
    }

    async fn dispatch(&self, request: &RequestDescriptor) -> ReqwestResult {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Delete => reqwest::Method::DELETE,
        };
        let mut builder = self
            .inner_client
            .request(method, self.format_url(&request.path))
            .header(ACCEPT, "application/json");
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        #[cfg(target_arch = "wasm32")]
        let builder = builder.fetch_credentials_include();

        builder.send().await
    }

    /// Issue any request and deserialize its JSON response.
    ///
    /// Dropping the returned future aborts the underlying request; in the
    /// browser this aborts the `fetch` call.
    pub async fn send<T: DeserializeOwned>(
        &self,
        request: &RequestDescriptor,
    ) -> Result<T, ClientError> {
        let response = self.dispatch(request).await?;
        ok_body(response).await
    }
}

/// Methods on the backend API
impl APIClient {
    pub async fn health_check(&self) -> Result<(), ClientError> {
        let response = self
            .dispatch(&RequestDescriptor::get("health_check"))
            .await?;
        ok_empty(response).await
    }

    /// Get the signed-in user. A 404 status means there is no session.
    pub async fn current_user(
        &self,
    ) -> Result<responses::User, ClientError> {
        self.send(&requests::current_user()).await
    }

    pub async fn bot_user(&self) -> Result<responses::User, ClientError> {
        self.send(&requests::bot_user()).await
    }

    /// Get the guilds shared by the signed-in user and the bot.
    pub async fn guilds(&self) -> Result<Vec<responses::Guild>, ClientError> {
        self.send(&requests::guilds()).await
    }

    pub async fn guild_ranks(
        &self,
        guild_id: &GuildId,
    ) -> Result<GuildRanks, ClientError> {
        self.send(&requests::guild_ranks(guild_id)).await
    }

    /// Join or leave a rank, returning the updated ranks of the guild.
    pub async fn set_rank_membership(
        &self,
        guild_id: &GuildId,
        role_id: &RoleId,
        on: bool,
    ) -> Result<GuildRanks, ClientError> {
        self.send(&requests::rank_membership(guild_id, role_id, on))
            .await
    }

    /// Where to send the browser to start a Discord OAuth session. This is a
    /// full-page navigation, never fetched.
    pub fn auth_redirect_url(&self) -> String {
        self.format_url("auth/redirect")
    }

    /// Form action which ends the session.
    pub fn auth_clear_url(&self) -> String {
        self.format_url("auth/clear")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server answered with a non-2xx status.
    #[error("{status}")]
    Status { status: StatusCode, body: String },
    #[error("Network error. Please check your connection.")]
    Network(#[from] reqwest::Error),
    #[error("Malformed response: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Network(_) | Self::Parse(_) => None,
        }
    }
}

/// The error half of a fetch result, as held in UI state.
///
/// Transport and parse failures collapse into `Generic`. Non-2xx responses
/// keep their status so views can branch on it, e.g. 404 on the current user
/// meaning there is no session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("{message}")]
    Generic { message: String },
    #[error("{status} {status_text}")]
    HttpStatus { status: u16, status_text: String },
}

impl FetchError {
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            Self::Generic { .. } => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND.as_u16())
    }
}

impl From<ClientError> for FetchError {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::Status { status, .. } => Self::HttpStatus {
                status: status.as_u16(),
                status_text: status
                    .canonical_reason()
                    .unwrap_or_default()
                    .to_string(),
            },
            ClientError::Network(_) | ClientError::Parse(_) => {
                Self::generic(e.to_string())
            }
        }
    }
}

/// Deserialize a successful request into the desired type, or return an
/// appropriate error.
pub async fn ok_body<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ClientError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::Status {
            status,
            // a body that fails to arrive must not hide the status
            body: response.text().await.unwrap_or_default(),
        });
    }
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Check that an empty response is OK, returning a ClientError if not.
pub async fn ok_empty(response: reqwest::Response) -> Result<(), ClientError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::Status {
            status,
            // a body that fails to arrive must not hide the status
            body: response.text().await.unwrap_or_default(),
        });
    }
    Ok(())
}
