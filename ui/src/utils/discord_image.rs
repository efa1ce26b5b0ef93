//! URLs for avatars and guild icons on the Discord CDN.

use payloads::{GuildId, UserId};
use std::fmt;

pub const CDN_BASE: &str = "https://cdn.discordapp.com";

/// Hashes of animated assets carry this prefix.
const ANIMATED_PREFIX: &str = "a_";

/// Whose image to show.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSubject {
    Avatar { user_id: UserId, hash: String },
    Icon { guild_id: GuildId, hash: String },
}

impl ImageSubject {
    fn hash(&self) -> &str {
        match self {
            Self::Avatar { hash, .. } | Self::Icon { hash, .. } => hash,
        }
    }

    fn path(&self) -> String {
        match self {
            Self::Avatar { user_id, hash } => {
                format!("avatars/{user_id}/{hash}")
            }
            Self::Icon { guild_id, hash } => format!("icons/{guild_id}/{hash}"),
        }
    }

    pub fn is_animated(&self) -> bool {
        self.hash().starts_with(ANIMATED_PREFIX)
    }
}

/// One of the sizes the CDN serves: a power of two from 16 to 4096.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImageSize(u16);

impl ImageSize {
    pub const PX16: Self = Self(16);
    pub const PX32: Self = Self(32);
    pub const PX64: Self = Self(64);
    pub const PX128: Self = Self(128);
    pub const PX256: Self = Self(256);
    pub const PX512: Self = Self(512);
    pub const PX1024: Self = Self(1024);
    pub const PX2048: Self = Self(2048);
    pub const PX4096: Self = Self(4096);

    pub fn px(self) -> u32 {
        self.0.into()
    }
}

impl Default for ImageSize {
    fn default() -> Self {
        Self::PX16
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{0} is not a CDN image size (16, 32, ..., 4096)")]
pub struct InvalidImageSize(pub u32);

impl TryFrom<u32> for ImageSize {
    type Error = InvalidImageSize;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if (16..=4096).contains(&value) && value.is_power_of_two() {
            // 4096 fits in a u16
            Ok(Self(value as u16))
        } else {
            Err(InvalidImageSize(value))
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageShape {
    #[default]
    None,
    Circle,
    Squircle,
}

impl ImageShape {
    /// Border radius in px for an image of `size`.
    pub fn border_radius(self, size: ImageSize) -> Option<u32> {
        match self {
            Self::None => None,
            Self::Circle => Some(size.px() / 2),
            Self::Squircle => Some(size.px() * 5 / 16),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Webp,
    Gif,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Webp => "webp",
            Self::Gif => "gif",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageRequest {
    pub subject: ImageSubject,
    pub size: ImageSize,
    /// Play animated assets. Ignored when the asset is static or the user
    /// prefers reduced motion.
    pub animated: bool,
    pub shape: ImageShape,
}

impl ImageRequest {
    pub fn new(subject: ImageSubject) -> Self {
        Self {
            subject,
            size: ImageSize::default(),
            animated: false,
            shape: ImageShape::None,
        }
    }

    pub fn size(mut self, size: ImageSize) -> Self {
        self.size = size;
        self
    }

    pub fn animated(mut self, animated: bool) -> Self {
        self.animated = animated;
        self
    }

    pub fn shape(mut self, shape: ImageShape) -> Self {
        self.shape = shape;
        self
    }
}

/// A resolved image, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSource {
    pub url: String,
    pub format: ImageFormat,
    pub size: ImageSize,
    pub border_radius: Option<u32>,
}

impl ImageSource {
    pub fn style(&self) -> Option<String> {
        self.border_radius
            .map(|radius| format!("border-radius: {radius}px"))
    }
}

pub fn image_source(
    request: &ImageRequest,
    reduced_motion: bool,
) -> ImageSource {
    let format = if request.animated
        && request.subject.is_animated()
        && !reduced_motion
    {
        ImageFormat::Gif
    } else {
        ImageFormat::Webp
    };
    let url = format!(
        "{CDN_BASE}/{}.{}?size={}",
        request.subject.path(),
        format.extension(),
        request.size
    );
    ImageSource {
        url,
        format,
        size: request.size,
        border_radius: request.shape.border_radius(request.size),
    }
}
