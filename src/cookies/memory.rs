use crate::base::neterror::NetError;
use crate::cookies::record::CookieRecord;
use crate::cookies::storage::{canonical_host, CookieStorage};
use dashmap::DashMap;
use http::HeaderValue;
use std::collections::HashMap;
use time::OffsetDateTime;

/// Upper bounds on how many cookies the in-memory engine keeps.
///
/// Both limits are off by default. Chromium uses 180 per domain and 3300 in
/// total, which makes a reasonable starting point when bounding memory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StorageLimits {
    pub max_cookies_per_host: Option<usize>,
    pub max_cookies_total: Option<usize>,
}

impl StorageLimits {
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn per_host(mut self, max: usize) -> Self {
        self.max_cookies_per_host = Some(max.max(1));
        self
    }

    pub fn total(mut self, max: usize) -> Self {
        self.max_cookies_total = Some(max.max(1));
        self
    }
}

/// The default in-memory engine. Accepts every well-formed cookie.
pub struct AcceptAllCookieStorage {
    // Store: Map<Host, List<Cookie>>, list order is insertion order.
    // Using DashMap for high concurrency.
    store: DashMap<String, Vec<CookieRecord>>,
    limits: StorageLimits,
}

impl Default for AcceptAllCookieStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl AcceptAllCookieStorage {
    pub fn new() -> Self {
        Self::with_limits(StorageLimits::unlimited())
    }

    pub fn with_limits(limits: StorageLimits) -> Self {
        Self {
            store: DashMap::new(),
            limits,
        }
    }

    pub fn limits(&self) -> StorageLimits {
        self.limits
    }

    /// Change the limits. Takes effect on the next `set`.
    pub fn set_limits(&mut self, limits: StorageLimits) {
        self.limits = limits;
    }

    /// Every stored `(host, cookie)` pair, expired ones included.
    pub fn snapshot(&self) -> Vec<(String, CookieRecord)> {
        self.store
            .iter()
            .flat_map(|entry| {
                let host = entry.key().clone();
                entry
                    .value()
                    .iter()
                    .map(move |c| (host.clone(), c.clone()))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Live records of `host`, evicting any expired ones on the way.
    fn live_records(&self, host: &str) -> Vec<CookieRecord> {
        let now = OffsetDateTime::now_utc();

        // Fast path under the shard read lock.
        {
            let Some(entry) = self.store.get(host) else {
                return Vec::new();
            };
            if !entry.value().iter().any(|c| c.is_expired(now)) {
                return entry.value().clone();
            }
        }

        let mut live = Vec::new();
        if let Some(mut entry) = self.store.get_mut(host) {
            let before = entry.len();
            entry.retain(|c| !c.is_expired(now));
            tracing::trace!(host = %host, evicted = before - entry.len(), "evicted expired cookies");
            live = entry.value().clone();
        }
        self.store.remove_if(host, |_, cookies| cookies.is_empty());
        live
    }

    fn delete(&self, host: &str, name: &str, now: OffsetDateTime) {
        if let Some(mut entry) = self.store.get_mut(host) {
            entry.retain(|c| c.name != name && !c.is_expired(now));
        }
        self.store.remove_if(host, |_, cookies| cookies.is_empty());
    }

    /// Drop `name` only if it is still expired under the write lock; a
    /// concurrent `set` may have replaced it since it was read.
    fn evict_if_expired(&self, host: &str, name: &str, now: OffsetDateTime) {
        if let Some(mut entry) = self.store.get_mut(host) {
            entry.retain(|c| !(c.name == name && c.is_expired(now)));
        }
        self.store.remove_if(host, |_, cookies| cookies.is_empty());
    }

    /// Enforce the global cookie limit by evicting the oldest cookie of the
    /// host holding the most cookies.
    fn enforce_global_limit(&self) {
        let Some(max) = self.limits.max_cookies_total else {
            return;
        };

        while self.len() > max {
            let largest = self
                .store
                .iter()
                .max_by_key(|entry| entry.value().len())
                .map(|entry| entry.key().clone());

            let Some(host) = largest else {
                break;
            };

            if let Some(mut entry) = self.store.get_mut(&host) {
                if !entry.is_empty() {
                    let evicted = entry.remove(0);
                    tracing::debug!(host = %host, name = %evicted.name, "global cookie limit reached, evicted oldest");
                }
            }
            self.store.remove_if(&host, |_, cookies| cookies.is_empty());
        }
    }
}

impl CookieStorage for AcceptAllCookieStorage {
    fn get(&self, host: &str) -> Result<HashMap<String, CookieRecord>, NetError> {
        let Some(host) = canonical_host(host) else {
            return Ok(HashMap::new());
        };

        Ok(self
            .live_records(&host)
            .into_iter()
            .map(|c| (c.name.clone(), c))
            .collect())
    }

    fn get_cookie(&self, host: &str, name: &str) -> Result<Option<CookieRecord>, NetError> {
        let Some(host) = canonical_host(host) else {
            return Ok(None);
        };
        let now = OffsetDateTime::now_utc();

        let found = self
            .store
            .get(&host)
            .and_then(|entry| entry.value().iter().find(|c| c.name == name).cloned());

        match found {
            Some(cookie) if cookie.is_expired(now) => {
                self.evict_if_expired(&host, name, now);
                Ok(None)
            }
            other => Ok(other),
        }
    }

    fn set(&self, host: &str, cookie: CookieRecord) -> Result<(), NetError> {
        let Some(host) = canonical_host(host) else {
            tracing::debug!(name = %cookie.name, "ignoring cookie without host");
            return Ok(());
        };
        if cookie.name.is_empty() {
            tracing::debug!(host = %host, "ignoring cookie with empty name");
            return Ok(());
        }

        let now = OffsetDateTime::now_utc();

        // An expired cookie is how a server deletes one.
        if cookie.is_expired(now) {
            self.delete(&host, &cookie.name, now);
            tracing::debug!(host = %host, name = %cookie.name, "cookie deleted by expiry");
            return Ok(());
        }

        if HeaderValue::from_str(&cookie.render_pair()).is_err() {
            tracing::debug!(host = %host, name = %cookie.name, "ignoring cookie that cannot be sent in a header");
            return Ok(());
        }

        let mut entry = self.store.entry(host.clone()).or_default();

        // Opportunistic eviction; a stale record of the same name is replaced below.
        entry.retain(|c| c.name == cookie.name || !c.is_expired(now));

        if let Some(existing) = entry.iter_mut().find(|c| c.name == cookie.name) {
            *existing = cookie;
        } else {
            if let Some(max) = self.limits.max_cookies_per_host {
                while entry.len() >= max && !entry.is_empty() {
                    let evicted = entry.remove(0);
                    tracing::debug!(host = %host, name = %evicted.name, "per-host cookie limit reached, evicted oldest");
                }
            }
            tracing::trace!(host = %host, name = %cookie.name, "cookie stored");
            entry.push(cookie);
        }
        drop(entry); // Release lock before checking global count

        self.enforce_global_limit();
        Ok(())
    }

    fn for_each(
        &self,
        host: &str,
        visitor: &mut dyn FnMut(&CookieRecord),
    ) -> Result<(), NetError> {
        let Some(host) = canonical_host(host) else {
            return Ok(());
        };

        // Visit outside the lock so the visitor may call back into the store.
        for cookie in &self.live_records(&host) {
            visitor(cookie);
        }
        Ok(())
    }

    fn remove_expired(&self) -> Result<usize, NetError> {
        let now = OffsetDateTime::now_utc();
        let mut removed = 0;

        self.store.retain(|_, cookies| {
            let before = cookies.len();
            cookies.retain(|c| !c.is_expired(now));
            removed += before - cookies.len();
            !cookies.is_empty()
        });

        if removed > 0 {
            tracing::debug!(removed, "expired cookies evicted");
        }
        Ok(removed)
    }

    fn clear(&self) -> Result<(), NetError> {
        self.store.clear();
        Ok(())
    }

    fn hosts(&self) -> Vec<String> {
        self.store.iter().map(|entry| entry.key().clone()).collect()
    }

    fn len(&self) -> usize {
        self.store.iter().map(|entry| entry.value().len()).sum()
    }
}
