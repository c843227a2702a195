//! Contribution sample source: fetches `{ contributions: [...] }` per username
//! and caches the result in memory.
//!
//! A failed fetch never escapes `samples_for`: callers get an empty sample set
//! plus a user-facing notice, and the failure is not cached. Expired entries are
//! swept whenever a new username arrives, and the cache holds at most
//! `max_users` usernames.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use reqwest::Client;
use thiserror::Error;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info, warn};

use crate::models::contribution::{ContributionSample, ContributionsPayload};

pub const FETCH_FAILED_NOTICE: &str = "Unable to load live GitHub contributions.";
const MAX_LEVEL: i8 = 4;
pub const DEFAULT_MAX_CACHED_USERS: usize = 256;

#[derive(Debug, Error)]
pub enum SampleFetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("contribution source returned status {0}")]
    Status(u16),

    #[error("malformed contribution payload: {0}")]
    Malformed(String),
}

/// Samples for one username plus the notice to show when they could not be loaded.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub samples: Arc<Vec<ContributionSample>>,
    pub notice: Option<String>,
}

struct CachedSamples {
    samples: Arc<Vec<ContributionSample>>,
    fetched_at: Instant,
}

type Slot = Arc<AsyncMutex<Option<CachedSamples>>>;

#[derive(Clone)]
pub struct ContributionsClient {
    client: Client,
    base_url: String,
    ttl: Duration,
    max_users: usize,
    slots: Arc<Mutex<HashMap<String, Slot>>>,
}

impl ContributionsClient {
    pub fn new(base_url: impl Into<String>, ttl: Duration) -> Result<Self, SampleFetchError> {
        Ok(Self {
            client: Client::builder().timeout(Duration::from_secs(15)).build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ttl,
            max_users: DEFAULT_MAX_CACHED_USERS,
            slots: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    pub fn with_max_users(mut self, max_users: usize) -> Self {
        self.max_users = max_users.max(1);
        self
    }

    /// Fetches samples straight from the source, bypassing the cache.
    pub async fn fetch(&self, username: &str) -> Result<Vec<ContributionSample>, SampleFetchError> {
        let url = format!("{}/v4/{}", self.base_url, username);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SampleFetchError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let payload: ContributionsPayload = serde_json::from_str(&body)
            .map_err(|e| SampleFetchError::Malformed(e.to_string()))?;

        Ok(payload
            .contributions
            .into_iter()
            .map(|mut s| {
                s.level = s.level.clamp(0, MAX_LEVEL);
                s
            })
            .collect())
    }

    /// Returns cached samples for `username`, fetching them when absent or stale.
    /// Concurrent callers for the same username share a single outstanding fetch.
    pub async fn samples_for(&self, username: &str) -> FetchOutcome {
        let key = username.to_ascii_lowercase();
        let slot = {
            let mut slots = self.slot_map();
            if !slots.contains_key(&key) {
                self.make_room(&mut slots);
            }
            slots.entry(key.clone()).or_default().clone()
        };

        let mut cached = slot.lock().await;
        if let Some(entry) = cached.as_ref() {
            if entry.fetched_at.elapsed() < self.ttl {
                debug!("Contribution cache hit for {username}");
                return FetchOutcome {
                    samples: entry.samples.clone(),
                    notice: None,
                };
            }
        }

        match self.fetch(username).await {
            Ok(samples) => {
                info!("Fetched {} contribution samples for {username}", samples.len());
                let samples = Arc::new(samples);
                *cached = Some(CachedSamples {
                    samples: samples.clone(),
                    fetched_at: Instant::now(),
                });
                FetchOutcome {
                    samples,
                    notice: None,
                }
            }
            Err(e) => {
                warn!("Failed to fetch contributions for {username}: {e}");
                drop(cached);
                self.release_empty_slot(&key, &slot);
                FetchOutcome {
                    samples: Arc::new(Vec::new()),
                    notice: Some(FETCH_FAILED_NOTICE.to_string()),
                }
            }
        }
    }

    fn slot_map(&self) -> std::sync::MutexGuard<'_, HashMap<String, Slot>> {
        self.slots.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Drops idle expired or empty slots, then the oldest entry if still full.
    /// Slots another caller is waiting on are left alone.
    fn make_room(&self, slots: &mut HashMap<String, Slot>) {
        slots.retain(|_, slot| {
            if Arc::strong_count(slot) > 1 {
                return true;
            }
            match slot.try_lock() {
                Ok(cached) => cached
                    .as_ref()
                    .is_some_and(|entry| entry.fetched_at.elapsed() < self.ttl),
                Err(_) => true,
            }
        });

        if slots.len() < self.max_users {
            return;
        }
        let oldest = slots
            .iter()
            .filter(|(_, slot)| Arc::strong_count(slot) == 1)
            .filter_map(|(key, slot)| {
                let cached = slot.try_lock().ok()?;
                let entry = cached.as_ref()?;
                Some((key.clone(), entry.fetched_at))
            })
            .min_by_key(|(_, fetched_at)| *fetched_at)
            .map(|(key, _)| key);
        if let Some(key) = oldest {
            debug!("Contribution cache full, evicting {key}");
            slots.remove(&key);
        }
    }

    /// Forgets the slot of a failed fetch unless another caller is using it.
    fn release_empty_slot(&self, key: &str, slot: &Slot) {
        let mut slots = self.slot_map();
        let unused = slots
            .get(key)
            .is_some_and(|held| Arc::ptr_eq(held, slot) && Arc::strong_count(slot) == 2);
        if unused {
            slots.remove(key);
        }
    }

    #[cfg(test)]
    fn cached_users(&self) -> usize {
        self.slot_map().len()
    }
}
