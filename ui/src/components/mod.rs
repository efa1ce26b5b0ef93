pub mod discord_image;
pub mod errors;
pub mod guild_ranks;
pub mod guilds;
pub mod nav_link;
pub mod navbar;
pub mod spinner;

pub use discord_image::DiscordImage;
pub use errors::Errors;
pub use guild_ranks::GuildRanks;
pub use guilds::Guilds;
pub use nav_link::NavLink;
pub use navbar::{NavbarBot, NavbarUser, SignOutButton};
pub use spinner::Spinner;
