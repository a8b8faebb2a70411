use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Name of a cultural region (e.g. "Hong Kong").
///
/// Regions are opaque identifiers: any name is accepted and the store creates
/// unknown regions on first write.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Region(String);

impl Region {
    pub const HONG_KONG: &'static str = "Hong Kong";
    pub const CHINA: &'static str = "China";
    pub const VIETNAM: &'static str = "Vietnam";

    /// Regions seeded into the default document, in display order.
    pub const KNOWN: [&'static str; 3] = [Self::HONG_KONG, Self::CHINA, Self::VIETNAM];

    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the regions of the default document.
    #[must_use]
    pub fn known() -> Vec<Self> {
        Self::KNOWN.iter().map(|name| Self::new(*name)).collect()
    }
}

/// Name of a mini-activity (e.g. "Draw Animals").
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Activity(String);

impl Activity {
    pub const LANGUAGE: &'static str = "Language";
    pub const DRAW_ANIMALS: &'static str = "Draw Animals";
    pub const FOOD: &'static str = "Food";
    pub const PERFORMANCE: &'static str = "Performance";

    /// Activities every region carries, in display order.
    pub const KNOWN: [&'static str; 4] = [
        Self::LANGUAGE,
        Self::DRAW_ANIMALS,
        Self::FOOD,
        Self::PERFORMANCE,
    ];

    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn known() -> Vec<Self> {
        Self::KNOWN.iter().map(|name| Self::new(*name)).collect()
    }
}

// ─── Conversions ───────────────────────────────────────────────────────────────

impl From<&str> for Region {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Region {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Activity {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Activity {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for Region {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Activity {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Region({:?})", self.0)
    }
}

impl fmt::Debug for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Activity({:?})", self.0)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
