use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeMap;

use super::names::{Activity, Region};
use super::stars::{MAX_STARS_PER_ACTIVITY, StarCount};

/// Stars a region can earn across the four known activities.
pub const MAX_STARS_PER_REGION: u32 =
    MAX_STARS_PER_ACTIVITY as u32 * Activity::KNOWN.len() as u32;

/// Stars available across the three known regions.
pub const MAX_TOTAL_STARS: u32 = MAX_STARS_PER_REGION * Region::KNOWN.len() as u32;

// ─── ActivityStars ─────────────────────────────────────────────────────────────

/// Star counts per activity for one region.
///
/// Always carries every known activity; documents missing one are filled with
/// zero when deserialized. Unknown activities are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<Activity, StarCount>",
    into = "BTreeMap<Activity, StarCount>"
)]
pub struct ActivityStars {
    stars: BTreeMap<Activity, StarCount>,
}

impl ActivityStars {
    /// Star count for `activity`, zero when absent.
    #[must_use]
    pub fn get<Q>(&self, activity: &Q) -> StarCount
    where
        Activity: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.stars.get(activity).copied().unwrap_or_default()
    }

    /// Overwrite the count for `activity` (no accumulation).
    pub fn set(&mut self, activity: Activity, stars: StarCount) {
        self.stars.insert(activity, stars);
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.stars.values().copied().map(u32::from).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Activity, StarCount)> {
        self.stars.iter().map(|(activity, stars)| (activity, *stars))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stars.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }
}

impl Default for ActivityStars {
    fn default() -> Self {
        Self::from(BTreeMap::new())
    }
}

impl From<BTreeMap<Activity, StarCount>> for ActivityStars {
    fn from(mut stars: BTreeMap<Activity, StarCount>) -> Self {
        for activity in Activity::known() {
            stars.entry(activity).or_default();
        }
        Self { stars }
    }
}

impl From<ActivityStars> for BTreeMap<Activity, StarCount> {
    fn from(value: ActivityStars) -> Self {
        value.stars
    }
}

// ─── ProgressRecord ────────────────────────────────────────────────────────────

/// The persisted document: region name to its activity stars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressRecord {
    regions: BTreeMap<Region, ActivityStars>,
}

impl ProgressRecord {
    /// A record without any region. The default document is `ProgressRecord::default()`.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            regions: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn region<Q>(&self, region: &Q) -> Option<&ActivityStars>
    where
        Region: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.regions.get(region)
    }

    /// Activity stars for `region`, or the zero map when the region is unknown.
    ///
    /// Never inserts the region.
    #[must_use]
    pub fn stars_for<Q>(&self, region: &Q) -> ActivityStars
    where
        Region: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.region(region).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn contains_region<Q>(&self, region: &Q) -> bool
    where
        Region: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.regions.contains_key(region)
    }

    /// Store an absolute star count, creating the region with zero defaults
    /// when it is missing.
    pub fn set_stars(&mut self, region: Region, activity: Activity, stars: StarCount) {
        self.regions
            .entry(region)
            .or_default()
            .set(activity, stars);
    }

    /// Sum for one region; zero when unknown.
    #[must_use]
    pub fn total_for<Q>(&self, region: &Q) -> u32
    where
        Region: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.region(region).map_or(0, ActivityStars::total)
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.regions.values().map(ActivityStars::total).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Region, &ActivityStars)> {
        self.regions.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    #[must_use]
    pub fn region_progress(&self, region: &Region) -> RegionProgress {
        RegionProgress::new(region.clone(), self.stars_for(region))
    }

    #[must_use]
    pub fn into_overall_stats(self) -> OverallStats {
        OverallStats::new(self)
    }
}

impl Default for ProgressRecord {
    /// All-zero document for the known regions.
    fn default() -> Self {
        let regions = Region::known()
            .into_iter()
            .map(|region| (region, ActivityStars::default()))
            .collect();
        Self { regions }
    }
}

// ─── Aggregates ────────────────────────────────────────────────────────────────

/// Progress summary for a single region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionProgress {
    pub region: Region,
    pub stars: ActivityStars,
    pub total: u32,
    pub max_stars: u32,
    pub progress_percentage: f64,
}

impl RegionProgress {
    #[must_use]
    pub fn new(region: Region, stars: ActivityStars) -> Self {
        let total = stars.total();
        Self {
            region,
            stars,
            total,
            max_stars: MAX_STARS_PER_REGION,
            progress_percentage: percentage(total, MAX_STARS_PER_REGION),
        }
    }
}

/// Full record plus grand total against the fixed maximum of 36.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallStats {
    pub all_stars: ProgressRecord,
    pub total_stars: u32,
    pub max_total_stars: u32,
    pub progress_percentage: f64,
}

impl OverallStats {
    #[must_use]
    pub fn new(all_stars: ProgressRecord) -> Self {
        let total_stars = all_stars.total();
        Self {
            all_stars,
            total_stars,
            max_total_stars: MAX_TOTAL_STARS,
            progress_percentage: percentage(total_stars, MAX_TOTAL_STARS),
        }
    }
}

fn percentage(earned: u32, max: u32) -> f64 {
    if max == 0 {
        return 0.0;
    }
    f64::from(earned) / f64::from(max) * 100.0
}
