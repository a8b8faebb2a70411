mod names;
mod progress;
mod stars;

pub use names::{Activity, Region};
pub use progress::{
    ActivityStars, MAX_STARS_PER_REGION, MAX_TOTAL_STARS, OverallStats, ProgressRecord,
    RegionProgress,
};
pub use stars::{MAX_STARS_PER_ACTIVITY, ParseStarsError, StarCount};
