use crate::{GuildId, RoleId};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Method {
    #[display("GET")]
    Get,
    #[display("POST")]
    Post,
    #[display("DELETE")]
    Delete,
}

/// The values whose change invalidates an in-flight request and starts a
/// new one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub struct DependencyKey(pub String);

impl From<&str> for DependencyKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for DependencyKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Everything needed to issue one API request.
///
/// `path` is relative to the API root, e.g. `me/guilds`. Two descriptors
/// describe the same request exactly when their dependency keys are equal.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
    pub headers: Vec<(String, String)>,
    /// Explicit key overriding the identity derived from the request itself.
    pub key: Option<DependencyKey>,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            headers: Vec::new(),
            key: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn with_body(
        mut self,
        body: &impl Serialize,
    ) -> Result<Self, serde_json::Error> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn with_header(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn keyed(mut self, key: impl Into<DependencyKey>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn dependency_key(&self) -> DependencyKey {
        if let Some(key) = &self.key {
            return key.clone();
        }
        let mut identity = format!("{} {}", self.method, self.path);
        if let Some(body) = &self.body {
            identity.push(' ');
            identity.push_str(&body.to_string());
        }
        for (name, value) in &self.headers {
            identity.push_str(&format!(" {name}={value}"));
        }
        DependencyKey(identity)
    }
}

/// The signed-in user. Responds 404 when there is no session.
pub fn current_user() -> RequestDescriptor {
    RequestDescriptor::get("me/user")
}

pub fn bot_user() -> RequestDescriptor {
    RequestDescriptor::get("bot")
}

/// Guilds shared by the signed-in user and the bot.
pub fn guilds() -> RequestDescriptor {
    RequestDescriptor::get("me/guilds")
}

pub fn guild_ranks(guild_id: &GuildId) -> RequestDescriptor {
    RequestDescriptor::get(format!("me/guilds/{guild_id}/ranks"))
}

/// Join (`on == true`) or leave a rank. Responds with the new ranks snapshot.
pub fn rank_membership(
    guild_id: &GuildId,
    role_id: &RoleId,
    on: bool,
) -> RequestDescriptor {
    let path = format!("me/guilds/{guild_id}/ranks/{role_id}");
    if on {
        RequestDescriptor::post(path)
    } else {
        RequestDescriptor::delete(path)
    }
}
