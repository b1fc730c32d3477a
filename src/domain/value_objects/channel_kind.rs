//! Notification channel discriminator.

use std::borrow::Cow;
use std::fmt;

/// Key identifying a delivery channel implementation.
///
/// Always stored uppercase so lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelKind(Cow<'static, str>);

impl ChannelKind {
    /// Email delivery, the only built-in channel.
    pub const EMAIL: ChannelKind = ChannelKind(Cow::Borrowed("EMAIL"));

    /// Normalize a raw discriminator.
    pub fn new(raw: &str) -> Self {
        Self(Cow::Owned(raw.trim().to_uppercase()))
    }

    /// Normalized string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ChannelKind {
    fn default() -> Self {
        Self::EMAIL
    }
}

impl From<&str> for ChannelKind {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
