// Daily on-disk cache of normalized team records

use chrono::NaiveDate;
use hoops_models::{CanonicalFeatureRecord, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::data_feed::{collect_records, StatsProvider};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedStats {
    season: String,
    fetched_on: NaiveDate,
    records: Vec<CanonicalFeatureRecord>,
}

/// One JSON file per season, valid for the calendar day it was written.
#[derive(Debug, Clone)]
pub struct StatsCache {
    dir: PathBuf,
}

impl StatsCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, season: &str) -> PathBuf {
        self.dir.join(format!("team_stats_{season}.json"))
    }

    /// Records cached for `season` on `today`, or `None` when absent or stale.
    pub fn load(
        &self,
        season: &str,
        today: NaiveDate,
    ) -> Result<Option<Vec<CanonicalFeatureRecord>>> {
        let path = self.path_for(season);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let cached: CachedStats = serde_json::from_str(&raw)?;

        if cached.season != season || cached.fetched_on != today {
            debug!("Cache for {} is from {}, ignoring", season, cached.fetched_on);
            return Ok(None);
        }
        Ok(Some(cached.records))
    }

    pub fn store(
        &self,
        season: &str,
        today: NaiveDate,
        records: &[CanonicalFeatureRecord],
    ) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let payload = CachedStats {
            season: season.to_string(),
            fetched_on: today,
            records: records.to_vec(),
        };
        write_atomic(&self.path_for(season), &serde_json::to_vec_pretty(&payload)?)?;
        debug!("💾 Cached {} team records for {}", records.len(), season);
        Ok(())
    }

    /// Today's records from the cache, else freshly collected from `provider`.
    /// An unreadable cache file is treated as a miss and rewritten.
    pub fn get_or_collect<P>(
        &self,
        provider: &P,
        season: &str,
        today: NaiveDate,
    ) -> Result<Vec<CanonicalFeatureRecord>>
    where
        P: StatsProvider + ?Sized,
    {
        match self.load(season, today) {
            Ok(Some(records)) => {
                info!("📂 Using cached stats for {} ({} teams)", season, records.len());
                return Ok(records);
            }
            Ok(None) => {}
            Err(e) => warn!("⚠️  Ignoring unreadable stats cache for {}: {}", season, e),
        }

        let records = collect_records(provider, season);
        if records.is_empty() {
            warn!("⚠️  Provider returned no stats for {}, nothing cached", season);
        } else {
            self.store(season, today, &records)?;
        }
        Ok(records)
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
