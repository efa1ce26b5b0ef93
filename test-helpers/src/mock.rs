//! In-memory stand-in for the bot's dashboard API.
//!
//! The bot owns sessions and rank membership in production. Here a single
//! [`MockBackend`] holds one optional signed-in user plus the guilds, ranks
//! and memberships from a [`Dataset`], and lets tests force statuses,
//! malformed bodies or delays on individual paths.

use payloads::{
    GuildId, RoleId, UserId,
    responses::{Guild, GuildRanks, Role, RoleTags, User},
};
use reqwest::StatusCode;
use std::{
    collections::{BTreeSet, HashMap},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

/// Data served by the mock backend.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub bot: User,
    pub user: User,
    pub guilds: Vec<Guild>,
    pub roles: Vec<Role>,
    /// Ranks the user holds at startup.
    pub memberships: BTreeSet<(GuildId, RoleId)>,
}

impl Dataset {
    /// Two guilds with a handful of ranks each; the user starts with one rank
    /// in the first guild.
    pub fn sample() -> Self {
        let bot = User {
            id: "100000000000000001".into(),
            username: "Vega".into(),
            discriminator: 4127,
            avatar: Some("a_3f1c9bd2e0a24b7f8c6d5e4f3a2b1c0d".into()),
            bot: true,
        };
        let user = alice();
        let pony = Guild {
            id: "200000000000000001".into(),
            name: "pony hangout".into(),
            icon: Some("a_9e8d7c6b5a4f3e2d1c0b9a8f7e6d5c4b".into()),
            admin: false,
        };
        let cafe = Guild {
            id: "200000000000000002".into(),
            name: "Cafe".into(),
            icon: None,
            admin: true,
        };
        let roles = vec![
            rank(&pony.id, "300000000000000001", "Artists", 0x1abc9c),
            rank(&pony.id, "300000000000000002", "Writers", 0x3498db),
            rank(&pony.id, "300000000000000003", "gamers", 0x9b59b6),
            rank(&cafe.id, "300000000000000004", "Baristas", 0xe67e22),
            rank(&cafe.id, "300000000000000005", "Regulars", 0x95a5a6),
        ];
        let memberships =
            BTreeSet::from([(pony.id.clone(), "300000000000000002".into())]);
        Self {
            bot,
            user,
            guilds: vec![pony, cafe],
            roles,
            memberships,
        }
    }

    pub fn print_summary(&self) {
        tracing::info!("📋 Available test data:");
        tracing::info!("   🤖 Bot: {} ({})", self.bot.tag(), self.bot.id);
        tracing::info!("   👤 User: {} ({})", self.user.tag(), self.user.id);
        for guild in &self.guilds {
            tracing::info!("   🏠 {} ({})", guild.name, guild.id);
            for role in self.roles.iter().filter(|r| r.guild_id == guild.id) {
                let held = self
                    .memberships
                    .contains(&(guild.id.clone(), role.id.clone()));
                tracing::info!(
                    "      {} {} ({})",
                    if held { "☑" } else { "☐" },
                    role.name,
                    role.id
                );
            }
        }
    }
}

pub fn alice() -> User {
    User {
        id: UserId::from("400000000000000001"),
        username: "alice".into(),
        discriminator: 7,
        avatar: Some("5d41402abc4b2a76b9719d911017c592".into()),
        bot: false,
    }
}

pub fn rank(guild_id: &GuildId, id: &str, name: &str, color: u32) -> Role {
    Role {
        id: id.into(),
        guild_id: guild_id.clone(),
        name: name.into(),
        color,
        hoist: false,
        managed: false,
        mentionable: true,
        position: 1,
        tags: RoleTags::default(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MockError {
    #[error("No session")]
    NotSignedIn,
    #[error("Unknown guild")]
    GuildNotFound,
    #[error("Unknown rank")]
    RoleNotFound,
}

/// Response override for a single API path.
#[derive(Debug, Clone, Default)]
pub struct Override {
    pub status: Option<StatusCode>,
    pub malformed: bool,
    pub delay: Option<Duration>,
}

/// A request as the mock server saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    /// Path relative to `/api/`.
    pub path: String,
    pub accept: Option<String>,
}

impl RecordedRequest {
    /// `METHOD path`
    pub fn line(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

#[derive(Debug)]
struct BackendState {
    dataset: Dataset,
    signed_in: Option<User>,
    memberships: BTreeSet<(GuildId, RoleId)>,
    overrides: HashMap<String, Override>,
    requests: Vec<RecordedRequest>,
}

/// Shared handle to the mock's state; clones observe the same backend.
#[derive(Debug, Clone)]
pub struct MockBackend {
    inner: Arc<Mutex<BackendState>>,
}

impl MockBackend {
    /// A backend with the dataset's user already signed in.
    pub fn new(dataset: Dataset) -> Self {
        let state = BackendState {
            signed_in: Some(dataset.user.clone()),
            memberships: dataset.memberships.clone(),
            dataset,
            overrides: HashMap::new(),
            requests: Vec::new(),
        };
        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    fn state(&self) -> MutexGuard<'_, BackendState> {
        // a panicking handler must not take every later test request down
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn sign_in(&self) {
        let mut state = self.state();
        state.signed_in = Some(state.dataset.user.clone());
    }

    pub fn sign_out(&self) {
        self.state().signed_in = None;
    }

    pub fn current_user(&self) -> Result<User, MockError> {
        self.state().signed_in.clone().ok_or(MockError::NotSignedIn)
    }

    pub fn bot(&self) -> User {
        self.state().dataset.bot.clone()
    }

    pub fn guilds(&self) -> Result<Vec<Guild>, MockError> {
        let state = self.state();
        state.signed_in.as_ref().ok_or(MockError::NotSignedIn)?;
        Ok(state.dataset.guilds.clone())
    }

    pub fn ranks(&self, guild_id: &GuildId) -> Result<GuildRanks, MockError> {
        let state = self.state();
        state.signed_in.as_ref().ok_or(MockError::NotSignedIn)?;
        state.ranks(guild_id)
    }

    pub fn set_membership(
        &self,
        guild_id: &GuildId,
        role_id: &RoleId,
        on: bool,
    ) -> Result<GuildRanks, MockError> {
        let mut state = self.state();
        state.signed_in.as_ref().ok_or(MockError::NotSignedIn)?;
        let known = state
            .dataset
            .roles
            .iter()
            .any(|role| &role.guild_id == guild_id && &role.id == role_id);
        if !known {
            return Err(MockError::RoleNotFound);
        }
        let key = (guild_id.clone(), role_id.clone());
        if on {
            state.memberships.insert(key);
        } else {
            state.memberships.remove(&key);
        }
        state.ranks(guild_id)
    }

    /// Answer every request to `path` (relative to `/api/`) with `status`.
    pub fn force_status(&self, path: &str, status: StatusCode) {
        self.state()
            .overrides
            .entry(path.to_string())
            .or_default()
            .status = Some(status);
    }

    /// Answer requests to `path` with a 200 whose body is not JSON.
    pub fn serve_malformed(&self, path: &str) {
        self.state()
            .overrides
            .entry(path.to_string())
            .or_default()
            .malformed = true;
    }

    /// Hold requests to `path` for `delay` before answering.
    pub fn delay(&self, path: &str, delay: Duration) {
        self.state()
            .overrides
            .entry(path.to_string())
            .or_default()
            .delay = Some(delay);
    }

    pub fn clear_overrides(&self) {
        self.state().overrides.clear();
    }

    pub(crate) fn override_for(&self, path: &str) -> Option<Override> {
        self.state().overrides.get(path).cloned()
    }

    pub(crate) fn record(&self, request: RecordedRequest) {
        self.state().requests.push(request);
    }

    /// Every request the server has received, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state().requests.clone()
    }
}

impl BackendState {
    fn ranks(&self, guild_id: &GuildId) -> Result<GuildRanks, MockError> {
        if !self.dataset.guilds.iter().any(|g| &g.id == guild_id) {
            return Err(MockError::GuildNotFound);
        }
        let (current, available) = self
            .dataset
            .roles
            .iter()
            .filter(|role| &role.guild_id == guild_id)
            .cloned()
            .partition(|role| {
                self.memberships
                    .contains(&(guild_id.clone(), role.id.clone()))
            });
        Ok(GuildRanks { current, available })
    }
}
