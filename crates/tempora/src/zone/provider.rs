//! Resolving zones by id.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::error::{Result, TemporalError};
use crate::zone::{DateTimeZone, FixedDateTimeZone};

/// A backing store of zone definitions, such as a compiled time zone
/// database.
pub trait ZoneSource: Send + Sync {
    /// Every id [`for_id`](Self::for_id) accepts.
    fn ids(&self) -> Vec<String>;

    /// Builds the zone for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`TemporalError::NotFound`] for an unknown id.
    fn for_id(&self, id: &str) -> Result<Arc<dyn DateTimeZone>>;

    /// Identifies the data version, e.g. `"2024a"`.
    fn version_id(&self) -> String;
}

/// Memoizes the zones of a [`ZoneSource`], one shared instance per id.
///
/// Zones are built outside the lock. When two threads build the same zone
/// at once, the first to publish wins and the other copy is dropped, so
/// every caller sees the same `Arc`. Entries are never evicted.
///
/// `UTC` and `UTC±HH:MM[:SS]` ids resolve to fixed zones without
/// consulting the source.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use tempora::{DateTimeZoneCache, testing::FakeZoneSource};
///
/// let cache = DateTimeZoneCache::new(FakeZoneSource::new("test-1"));
/// let first = cache.get_zone("UTC+01:00").unwrap();
/// let second = cache.get_zone("UTC+01:00").unwrap();
/// assert!(Arc::ptr_eq(&first, &second));
/// assert!(cache.get_zone("Mars/Olympus_Mons").is_err());
/// ```
pub struct DateTimeZoneCache<S: ZoneSource> {
    source: S,
    zones: RwLock<HashMap<String, Arc<dyn DateTimeZone>>>,
}

impl<S: ZoneSource> DateTimeZoneCache<S> {
    pub fn new(source: S) -> Self {
        DateTimeZoneCache {
            source,
            zones: RwLock::new(HashMap::new()),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn version_id(&self) -> String {
        self.source.version_id()
    }

    /// The source's ids, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids = self.source.ids();
        ids.sort();
        ids
    }

    pub fn utc(&self) -> Result<Arc<dyn DateTimeZone>> {
        self.get_zone("UTC")
    }

    /// The canonical zone for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`TemporalError::NotFound`] when neither the fixed-offset
    /// syntax nor the source knows `id`.
    pub fn get_zone(&self, id: &str) -> Result<Arc<dyn DateTimeZone>> {
        if let Some(zone) = self.zones.read().get(id) {
            return Ok(Arc::clone(zone));
        }

        debug!(zone = id, "zone cache miss");
        let built: Arc<dyn DateTimeZone> = match FixedDateTimeZone::for_id(id) {
            Some(fixed) => Arc::new(fixed),
            None => self.source.for_id(id).map_err(|err| match err {
                TemporalError::NotFound(_) => {
                    TemporalError::NotFound(format!("time zone '{id}'"))
                }
                other => other,
            })?,
        };

        let mut zones = self.zones.write();
        let zone = zones.entry(id.to_string()).or_insert_with(|| {
            debug!(zone = id, "zone cached");
            built
        });
        Ok(Arc::clone(zone))
    }

    /// Number of zones built so far.
    pub fn cached_count(&self) -> usize {
        self.zones.read().len()
    }
}

impl<S: ZoneSource> std::fmt::Debug for DateTimeZoneCache<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DateTimeZoneCache")
            .field("version", &self.source.version_id())
            .field("cached", &self.cached_count())
            .finish()
    }
}
