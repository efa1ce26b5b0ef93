use crate::{GuildId, RoleId, UserId};
use serde::{Deserialize, Serialize};

/// A Discord user, used both for the signed-in user and the bot itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(alias = "name")]
    pub username: String,
    /// Legacy four digit tag. Users migrated to unique usernames have 0.
    #[serde(default)]
    pub discriminator: u16,
    /// Avatar asset hash; animated avatars are prefixed with `a_`.
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub bot: bool,
}

impl User {
    /// The `name#0042` form shown in the navbar, or just the name for users
    /// without a legacy discriminator.
    pub fn tag(&self) -> String {
        if self.discriminator == 0 {
            self.username.clone()
        } else {
            format!("{}#{:04}", self.username, self.discriminator)
        }
    }
}

/// A guild shared between the signed-in user and the bot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guild {
    pub id: GuildId,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    /// Whether the user may administer the bot in this guild.
    #[serde(default)]
    pub admin: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleTags {
    #[serde(default)]
    pub bot_id: Option<String>,
    #[serde(default)]
    pub integration_id: Option<String>,
    #[serde(default)]
    pub premium_subscriber: bool,
}

/// A guild role which the bot exposes as a self-assignable rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub guild_id: GuildId,
    pub name: String,
    #[serde(default)]
    pub color: u32,
    #[serde(default)]
    pub hoist: bool,
    #[serde(default)]
    pub managed: bool,
    #[serde(default)]
    pub mentionable: bool,
    #[serde(default)]
    pub position: i64,
    #[serde(default)]
    pub tags: RoleTags,
}

/// The ranks of one guild, split by whether the user currently holds them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildRanks {
    pub current: Vec<Role>,
    pub available: Vec<Role>,
}

impl GuildRanks {
    pub fn is_current(&self, role_id: &RoleId) -> bool {
        self.current.iter().any(|role| &role.id == role_id)
    }

    /// Every rank, held or not.
    pub fn roles(&self) -> impl Iterator<Item = &Role> {
        self.current.iter().chain(self.available.iter())
    }

    /// Returns a copy of the snapshot with a single rank moved to `current`
    /// (`on == true`) or to `available`. Unknown role ids and ranks that are
    /// already in the requested list leave the snapshot unchanged.
    pub fn with_membership(&self, role_id: &RoleId, on: bool) -> Self {
        let mut next = self.clone();
        let (from, to) = if on {
            (&mut next.available, &mut next.current)
        } else {
            (&mut next.current, &mut next.available)
        };
        if let Some(index) = from.iter().position(|role| &role.id == role_id) {
            let role = from.remove(index);
            to.push(role);
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(id: &str, name: &str) -> Role {
        Role {
            id: id.into(),
            guild_id: "guild".into(),
            name: name.into(),
            color: 0,
            hoist: false,
            managed: false,
            mentionable: false,
            position: 0,
            tags: RoleTags::default(),
        }
    }

    #[test]
    fn user_tag_pads_discriminator() {
        let mut user = User {
            id: "1".into(),
            username: "vega".into(),
            discriminator: 42,
            avatar: None,
            bot: true,
        };
        assert_eq!(user.tag(), "vega#0042");

        user.discriminator = 0;
        assert_eq!(user.tag(), "vega");
    }

    #[test]
    fn user_accepts_name_alias_and_missing_fields() {
        let user: User =
            serde_json::from_str(r#"{"id":"10","name":"bot"}"#).unwrap();
        assert_eq!(user.id, UserId::from("10"));
        assert_eq!(user.username, "bot");
        assert_eq!(user.avatar, None);
        assert!(!user.bot);
    }

    #[test]
    fn with_membership_moves_only_the_toggled_rank() {
        let ranks = GuildRanks {
            current: vec![role("1", "red")],
            available: vec![role("2", "green"), role("3", "blue")],
        };

        let on = ranks.with_membership(&"2".into(), true);
        assert!(on.is_current(&"2".into()));
        assert!(on.is_current(&"1".into()));
        assert!(!on.is_current(&"3".into()));
        assert_eq!(on.roles().count(), 3);

        let off = on.with_membership(&"1".into(), false);
        assert!(!off.is_current(&"1".into()));
        assert_eq!(off.available.len(), 2);

        // the original snapshot is untouched
        assert!(!ranks.is_current(&"2".into()));
    }

    #[test]
    fn with_membership_ignores_unknown_roles() {
        let ranks = GuildRanks {
            current: vec![role("1", "red")],
            available: vec![],
        };
        assert_eq!(ranks.with_membership(&"9".into(), true), ranks);
        assert_eq!(ranks.with_membership(&"1".into(), true), ranks);
    }
}
