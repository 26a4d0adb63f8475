use crate::ports::outbound::{
    CacheEntry, CacheKey, CachePayload, CacheStore, Clock, Lookup, LookupOrigin,
};
use crate::shared::error::{CacheError, LookupError};
use chrono::Duration;
use dashmap::DashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Default validity window of a cache entry
pub const DEFAULT_TTL_HOURS: u64 = 24;

type Answer = Result<Lookup<CachePayload>, LookupError>;

/// Time-bounded cache in front of a fetch function.
///
/// Per query:
/// 1. A fresh entry answers without any remote call (a fresh "failed" marker answers
///    `NotFound`).
/// 2. Otherwise the fetch runs. Success replaces the entry.
/// 3. Any failure, a 404 included, falls back to a stale successful entry, reported
///    as [`LookupOrigin::StaleFallback`] and left on disk untouched. Without one, the
///    failure is returned, and a permanent failure is remembered as a "failed" marker.
///
/// Store errors never fail a lookup. After the first write error the cache stops
/// persisting for the rest of the run. Answers are also memoized in memory, so
/// records sharing a key (duplicates) cost one lookup.
pub struct LookupCache<S: CacheStore, C: Clock> {
    store: S,
    clock: C,
    ttl: Duration,
    memo: DashMap<CacheKey, Answer>,
    writes_disabled: AtomicBool,
    errors: Mutex<Vec<CacheError>>,
}

impl<S: CacheStore, C: Clock> LookupCache<S, C> {
    pub fn new(store: S, clock: C, ttl_hours: u64) -> Self {
        let ttl_hours = i64::try_from(ttl_hours).unwrap_or(i64::MAX / 3600);
        Self {
            store,
            clock,
            ttl: Duration::hours(ttl_hours),
            memo: DashMap::new(),
            writes_disabled: AtomicBool::new(false),
            errors: Mutex::new(Vec::new()),
        }
    }

    pub async fn lookup<F, Fut>(&self, key: CacheKey, fetch: F) -> Answer
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<CachePayload, LookupError>>,
    {
        if let Some(answer) = self.memo.get(&key) {
            return answer.clone();
        }

        let answer = self.resolve(&key, fetch).await;
        self.memo.insert(key, answer.clone());
        answer
    }

    async fn resolve<F, Fut>(&self, key: &CacheKey, fetch: F) -> Answer
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<CachePayload, LookupError>>,
    {
        let cached = match self.store.load(key) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!("{}", e);
                self.record_error(e);
                None
            }
        };

        if let Some(entry) = &cached {
            if self.is_fresh(entry) {
                tracing::debug!("cache hit for {} {}", key.kind, key.package);
                return match &entry.payload {
                    CachePayload::Failed { .. } => Err(LookupError::NotFound {
                        package: key.package.clone(),
                    }),
                    payload => Ok(Lookup {
                        value: payload.clone(),
                        origin: LookupOrigin::Cache,
                    }),
                };
            }
        }

        match fetch().await {
            Ok(payload) => {
                self.persist(key, payload.clone());
                Ok(Lookup {
                    value: payload,
                    origin: LookupOrigin::Remote,
                })
            }
            Err(error) => match cached {
                Some(stale) if !matches!(stale.payload, CachePayload::Failed { .. }) => {
                    tracing::debug!(
                        "using stale cache entry for {} {}: {}",
                        key.kind,
                        key.package,
                        error
                    );
                    Ok(Lookup {
                        value: stale.payload,
                        origin: LookupOrigin::StaleFallback {
                            fetched_at: stale.fetched_at,
                            error,
                        },
                    })
                }
                _ => {
                    if error.is_permanent() {
                        self.persist(
                            key,
                            CachePayload::Failed {
                                reason: error.to_string(),
                            },
                        );
                    }
                    Err(error)
                }
            },
        }
    }

    fn is_fresh(&self, entry: &CacheEntry) -> bool {
        self.clock.now() - entry.fetched_at < self.ttl
    }

    fn persist(&self, key: &CacheKey, payload: CachePayload) {
        if self.writes_disabled.load(Ordering::Relaxed) {
            return;
        }
        let entry = CacheEntry {
            key: key.clone(),
            fetched_at: self.clock.now(),
            payload,
        };
        if let Err(e) = self.store.store(&entry) {
            tracing::warn!("{}; results will not be cached for this run", e);
            if !self.writes_disabled.swap(true, Ordering::Relaxed) {
                self.record_error(e);
            }
        }
    }

    fn record_error(&self, error: CacheError) {
        if let Ok(mut errors) = self.errors.lock() {
            errors.push(error);
        }
    }

    /// Cache errors met since the last call
    pub fn take_errors(&self) -> Vec<CacheError> {
        self.errors
            .lock()
            .map(|mut errors| std::mem::take(&mut *errors))
            .unwrap_or_default()
    }
}
