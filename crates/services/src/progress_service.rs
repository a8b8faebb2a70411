use std::sync::Arc;

use culturo_core::model::{
    Activity, ActivityStars, OverallStats, ProgressRecord, Region, RegionProgress, StarCount,
};
use serde::Serialize;
use storage::repository::ProgressRepository;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::ProgressServiceError;

/// Result of a star lookup: one region's activities, or every region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StarsView {
    Region(ActivityStars),
    All(ProgressRecord),
}

/// Star bookkeeping for every (region, activity) pair.
///
/// Each call reloads the document from the repository; nothing is cached, so
/// a write from another process or page load is seen on the next read.
///
/// Writes within one process are serialized: every load-modify-save runs
/// under `write_lock`, shared by all clones of the service.
#[derive(Clone)]
pub struct ProgressService {
    repo: Arc<dyn ProgressRepository>,
    write_lock: Arc<Mutex<()>>,
}

impl ProgressService {
    #[must_use]
    pub fn new(repo: Arc<dyn ProgressRepository>) -> Self {
        Self {
            repo,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Write the all-zero default document if none exists yet.
    ///
    /// Returns `true` when a document was created. An unreadable document is
    /// left in place; reads treat it as the default and the next write
    /// replaces it.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the default cannot be written.
    pub async fn ensure_document(&self) -> Result<bool, ProgressServiceError> {
        let _guard = self.write_lock.lock().await;
        match self.repo.load_progress().await {
            Ok(Some(_)) => return Ok(false),
            Ok(None) => {}
            Err(err) => {
                warn!(error = %err, "existing progress document is unreadable");
                return Ok(false);
            }
        }
        self.repo.save_progress(&ProgressRecord::default()).await?;
        info!("created default progress document");
        Ok(true)
    }

    /// Current record, falling back to the default when the stored document
    /// is missing or unreadable.
    pub async fn load(&self) -> ProgressRecord {
        match self.repo.load_progress().await {
            Ok(Some(record)) => record,
            Ok(None) => ProgressRecord::default(),
            Err(err) => {
                warn!(error = %err, "failed to load progress, using defaults");
                ProgressRecord::default()
            }
        }
    }

    /// Store an absolute star count, clamped into `0..=3`.
    ///
    /// Returns the value actually stored.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the document cannot be saved.
    /// Nothing is kept in memory on failure.
    pub async fn try_set_stars(
        &self,
        region: &Region,
        activity: &Activity,
        stars: i64,
    ) -> Result<StarCount, ProgressServiceError> {
        let stars = StarCount::clamped(stars);
        let _guard = self.write_lock.lock().await;
        let mut record = self.load().await;
        record.set_stars(region.clone(), activity.clone(), stars);
        self.repo.save_progress(&record).await?;
        debug!(%region, %activity, %stars, "stars updated");
        Ok(stars)
    }

    /// Like [`ProgressService::try_set_stars`], reporting failure as `false`.
    pub async fn set_stars(&self, region: &Region, activity: &Activity, stars: i64) -> bool {
        match self.try_set_stars(region, activity, stars).await {
            Ok(_) => true,
            Err(err) => {
                warn!(%region, %activity, error = %err, "failed to save stars");
                false
            }
        }
    }

    /// Activity stars for `region`, or the full record when `region` is `None`.
    ///
    /// Looking up an unknown region yields the zero map and does not add it.
    pub async fn get_stars(&self, region: Option<&Region>) -> StarsView {
        let record = self.load().await;
        match region {
            Some(region) => StarsView::Region(record.stars_for(region)),
            None => StarsView::All(record),
        }
    }

    pub async fn region_stars(&self, region: &Region) -> ActivityStars {
        self.load().await.stars_for(region)
    }

    pub async fn all_stars(&self) -> ProgressRecord {
        self.load().await
    }

    /// Sum for `region` (zero when unknown), or the grand total.
    pub async fn total_stars(&self, region: Option<&Region>) -> u32 {
        let record = self.load().await;
        match region {
            Some(region) => record.total_for(region),
            None => record.total(),
        }
    }

    pub async fn overall_stats(&self) -> OverallStats {
        self.load().await.into_overall_stats()
    }

    pub async fn region_progress(&self, region: &Region) -> RegionProgress {
        self.load().await.region_progress(region)
    }

    /// Overwrite the document with the all-zero default.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the document cannot be saved.
    pub async fn try_reset_all(&self) -> Result<(), ProgressServiceError> {
        let _guard = self.write_lock.lock().await;
        self.repo.save_progress(&ProgressRecord::default()).await?;
        info!("progress reset");
        Ok(())
    }

    /// Like [`ProgressService::try_reset_all`], reporting failure as `false`.
    pub async fn reset_all(&self) -> bool {
        match self.try_reset_all().await {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "failed to reset progress");
                false
            }
        }
    }

    /// Delete the stored document and write a fresh default.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the document cannot be
    /// removed or recreated.
    pub async fn start_fresh(&self) -> Result<(), ProgressServiceError> {
        let _guard = self.write_lock.lock().await;
        self.repo.clear_progress().await?;
        self.repo.save_progress(&ProgressRecord::default()).await?;
        info!("progress cleared for a fresh session");
        Ok(())
    }
}
