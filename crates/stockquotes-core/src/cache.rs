//! In-memory cache of fetched series, keyed by `(symbol, resolution)`.
//!
//! Entries are replaced whole and never mutated. Whether a stored series is
//! still usable is decided by a [`CachePolicy`]; the default [`NeverExpire`]
//! keeps every series for the life of the cache, so later queries see the
//! data as it was when first fetched.

use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::source::SourceError;
use crate::{Resolution, Series, Symbol};

/// Freshness rule applied to cached series.
pub trait CachePolicy: Debug + Send + Sync {
    /// Whether a series fetched `age` ago may still be served.
    fn is_fresh(&self, age: Duration) -> bool;
}

/// Cached series never expire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NeverExpire;

impl CachePolicy for NeverExpire {
    fn is_fresh(&self, _age: Duration) -> bool {
        true
    }
}

/// Cached series are refetched once older than the given duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxAge(pub Duration);

impl CachePolicy for MaxAge {
    fn is_fresh(&self, age: Duration) -> bool {
        age <= self.0
    }
}

/// Whether a series came from the cache or from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    Hit,
    Fetched,
}

type CacheKey = (Symbol, Resolution);
type Slot = Arc<tokio::sync::Mutex<Option<CacheEntry>>>;

#[derive(Debug, Clone)]
struct CacheEntry {
    series: Arc<Series>,
    fetched_at: Instant,
}

/// Series cache with one async lock per key.
///
/// Concurrent requests for the same key wait for the fetch already in flight
/// and then read its result. A failed fetch keeps any earlier entry; a key
/// that never held a series is dropped again.
#[derive(Debug)]
pub struct SeriesCache {
    slots: Mutex<HashMap<CacheKey, Slot>>,
    policy: Arc<dyn CachePolicy>,
}

impl Default for SeriesCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SeriesCache {
    pub fn new() -> Self {
        Self::with_policy(Arc::new(NeverExpire))
    }

    pub fn with_policy(policy: Arc<dyn CachePolicy>) -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            policy,
        }
    }

    /// Returns the cached series for the key, calling `fetch` when absent or stale.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        symbol: &Symbol,
        resolution: Resolution,
        fetch: F,
    ) -> Result<(Arc<Series>, CacheOutcome), SourceError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Series, SourceError>>,
    {
        let slot = self.slot(symbol, resolution);
        let mut entry = slot.lock().await;

        if let Some(cached) = entry.as_ref() {
            if self.policy.is_fresh(cached.fetched_at.elapsed()) {
                return Ok((Arc::clone(&cached.series), CacheOutcome::Hit));
            }
        }

        let series = match fetch().await {
            Ok(series) => Arc::new(series),
            Err(error) => {
                if entry.is_none() {
                    self.discard_unused_slot(symbol, resolution, &slot);
                }
                return Err(error);
            }
        };
        *entry = Some(CacheEntry {
            series: Arc::clone(&series),
            fetched_at: Instant::now(),
        });
        Ok((series, CacheOutcome::Fetched))
    }

    /// Cached series for the key, regardless of freshness.
    pub async fn peek(&self, symbol: &Symbol, resolution: Resolution) -> Option<Arc<Series>> {
        let slot = self.existing_slot(symbol, resolution)?;
        let entry = slot.lock().await;
        entry.as_ref().map(|cached| Arc::clone(&cached.series))
    }

    pub async fn contains(&self, symbol: &Symbol, resolution: Resolution) -> bool {
        self.peek(symbol, resolution).await.is_some()
    }

    /// Number of populated entries.
    pub async fn len(&self) -> usize {
        let slots: Vec<Slot> = self.lock_slots().values().cloned().collect();
        let mut populated = 0;
        for slot in slots {
            if slot.lock().await.is_some() {
                populated += 1;
            }
        }
        populated
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.lock_slots().clear();
    }

    fn slot(&self, symbol: &Symbol, resolution: Resolution) -> Slot {
        let mut slots = self.lock_slots();
        Arc::clone(
            slots
                .entry((symbol.clone(), resolution))
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(None))),
        )
    }

    /// Removes an empty slot once no other caller holds it.
    fn discard_unused_slot(&self, symbol: &Symbol, resolution: Resolution, slot: &Slot) {
        let mut slots = self.lock_slots();
        let key = (symbol.clone(), resolution);
        let unused = slots
            .get(&key)
            .is_some_and(|current| Arc::ptr_eq(current, slot) && Arc::strong_count(slot) == 2);
        if unused {
            slots.remove(&key);
        }
    }

    fn existing_slot(&self, symbol: &Symbol, resolution: Resolution) -> Option<Slot> {
        self.lock_slots()
            .get(&(symbol.clone(), resolution))
            .map(Arc::clone)
    }

    fn lock_slots(&self) -> std::sync::MutexGuard<'_, HashMap<CacheKey, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
