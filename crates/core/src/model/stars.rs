use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stars one activity can earn.
pub const MAX_STARS_PER_ACTIVITY: u8 = 3;

/// Star credit for a single (region, activity) pair, always within `0..=3`.
///
/// Construction clamps instead of rejecting, so callers can pass raw quiz
/// scores straight through.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "StoredStars", into = "u8")]
pub struct StarCount(u8);

/// Star values as they may appear in a stored document. Other writers of the
/// file emit floats such as `2.0`; those are truncated, then clamped.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredStars {
    Int(i64),
    Float(f64),
}

impl From<StoredStars> for StarCount {
    fn from(raw: StoredStars) -> Self {
        match raw {
            StoredStars::Int(value) => Self::clamped(value),
            // `as` saturates, so huge values still land on the bounds
            #[allow(clippy::cast_possible_truncation)]
            StoredStars::Float(value) => Self::clamped(value.trunc() as i64),
        }
    }
}

impl StarCount {
    pub const ZERO: Self = Self(0);
    pub const MAX: Self = Self(MAX_STARS_PER_ACTIVITY);

    /// Clamps `raw` into `0..=3`.
    #[must_use]
    pub fn clamped(raw: i64) -> Self {
        let bounded = raw.clamp(0, i64::from(MAX_STARS_PER_ACTIVITY));
        Self(u8::try_from(bounded).unwrap_or(MAX_STARS_PER_ACTIVITY))
    }

    #[must_use]
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Filled stars followed by empty slots, e.g. `⭐⭐☆`.
    #[must_use]
    pub fn render(&self) -> String {
        let filled = usize::from(self.0);
        let empty = usize::from(MAX_STARS_PER_ACTIVITY - self.0);
        format!("{}{}", "⭐".repeat(filled), "☆".repeat(empty))
    }
}

impl From<i64> for StarCount {
    fn from(raw: i64) -> Self {
        Self::clamped(raw)
    }
}

impl From<StarCount> for u8 {
    fn from(stars: StarCount) -> Self {
        stars.0
    }
}

impl From<StarCount> for u32 {
    fn from(stars: StarCount) -> Self {
        u32::from(stars.0)
    }
}

impl fmt::Debug for StarCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StarCount({})", self.0)
    }
}

impl fmt::Display for StarCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error type for parsing a star count from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStarsError {
    raw: String,
}

impl fmt::Display for ParseStarsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse star count from {:?}", self.raw)
    }
}

impl std::error::Error for ParseStarsError {}

impl FromStr for StarCount {
    type Err = ParseStarsError;

    /// Parses any integer and clamps it; only non-integers are errors.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(StarCount::clamped)
            .map_err(|_| ParseStarsError { raw: s.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_out_of_range_values() {
        assert_eq!(StarCount::clamped(-5), StarCount::ZERO);
        assert_eq!(StarCount::clamped(99), StarCount::MAX);
        assert_eq!(StarCount::clamped(i64::MIN).value(), 0);
        assert_eq!(StarCount::clamped(i64::MAX).value(), 3);
        assert_eq!(StarCount::clamped(2).value(), 2);
    }

    #[test]
    fn renders_filled_and_empty_slots() {
        assert_eq!(StarCount::ZERO.render(), "☆☆☆");
        assert_eq!(StarCount::clamped(2).render(), "⭐⭐☆");
        assert_eq!(StarCount::MAX.render(), "⭐⭐⭐");
    }

    #[test]
    fn parse_clamps_integers() {
        assert_eq!("7".parse::<StarCount>().unwrap(), StarCount::MAX);
        assert_eq!(" -1 ".parse::<StarCount>().unwrap(), StarCount::ZERO);
    }

    #[test]
    fn parse_rejects_non_integers() {
        assert!("two".parse::<StarCount>().is_err());
        assert!("2.5".parse::<StarCount>().is_err());
    }

    #[test]
    fn deserialize_clamps_stored_values() {
        let stars: StarCount = serde_json::from_str("12").unwrap();
        assert_eq!(stars, StarCount::MAX);
        assert_eq!(serde_json::to_string(&StarCount::clamped(1)).unwrap(), "1");
    }

    #[test]
    fn deserialize_accepts_float_values() {
        let parse = |raw: &str| serde_json::from_str::<StarCount>(raw).unwrap().value();
        assert_eq!(parse("2.0"), 2);
        assert_eq!(parse("2.7"), 2);
        assert_eq!(parse("-1.5"), 0);
        assert_eq!(parse("1e300"), 3);
        assert_eq!(parse("18446744073709551615"), 3);
        assert!(serde_json::from_str::<StarCount>("\"two\"").is_err());
    }
}
