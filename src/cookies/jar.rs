//! The cookie jar: one storage engine plus its one-time configuration.

use crate::base::neterror::NetError;
use crate::cookies::memory::AcceptAllCookieStorage;
use crate::cookies::record::CookieRecord;
use crate::cookies::storage::CookieStorage;
use http::HeaderValue;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

type ConfigureFn<S> = Box<dyn FnOnce(&mut S) -> Result<(), NetError>>;

/// Host-scoped access to a cookie storage engine.
///
/// # Example
/// ```
/// use hostjar::cookies::jar::CookieJar;
/// use hostjar::cookies::record::CookieRecord;
/// use hostjar::cookies::storage::CookieStorage;
///
/// let jar = CookieJar::builder()
///     .configure(|storage| storage.set("example.com", CookieRecord::new("lang", "en")))
///     .build()?;
///
/// assert_eq!(jar.cookie_header("example.com")?.as_deref(), Some("lang=en"));
/// # Ok::<(), hostjar::base::neterror::NetError>(())
/// ```
pub struct CookieJar<S: CookieStorage = AcceptAllCookieStorage> {
    storage: S,
}

impl Default for CookieJar {
    fn default() -> Self {
        Self::new(AcceptAllCookieStorage::new())
    }
}

impl CookieJar {
    /// Builder over the default in-memory engine.
    pub fn builder() -> CookieJarBuilder {
        CookieJarBuilder::new(AcceptAllCookieStorage::new())
    }
}

impl<S: CookieStorage> CookieJar<S> {
    /// Wrap `storage` without any configuration step.
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Builder over a caller-chosen engine.
    pub fn builder_with(storage: S) -> CookieJarBuilder<S> {
        CookieJarBuilder::new(storage)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// All live cookies for `host`, keyed by name.
    pub fn get(&self, host: &str) -> Result<HashMap<String, CookieRecord>, NetError> {
        self.storage.get(host)
    }

    pub fn get_cookie(&self, host: &str, name: &str) -> Result<Option<CookieRecord>, NetError> {
        self.storage.get_cookie(host, name)
    }

    pub fn set(&self, host: &str, cookie: CookieRecord) -> Result<(), NetError> {
        self.storage.set(host, cookie)
    }

    /// Visit every live cookie for `host` in stable order.
    pub fn for_each<F>(&self, host: &str, mut visitor: F) -> Result<(), NetError>
    where
        F: FnMut(&CookieRecord),
    {
        self.storage.for_each(host, &mut visitor)
    }

    /// The `Cookie` request header value for `host`, or `None` if the host
    /// has no live cookies. Pairs that are not valid header text are skipped.
    pub fn cookie_header(&self, host: &str) -> Result<Option<String>, NetError> {
        let mut pairs = Vec::new();
        self.for_each(host, |c| {
            let pair = c.render_pair();
            if HeaderValue::from_str(&pair).is_ok() {
                pairs.push(pair);
            } else {
                tracing::debug!(host = %host, name = %c.name, "skipping cookie that cannot be sent");
            }
        })?;

        if pairs.is_empty() {
            Ok(None)
        } else {
            Ok(Some(pairs.join("; ")))
        }
    }

    /// Like [`get`](Self::get), but a storage fault reads as "no cookies".
    pub fn cookies(&self, host: &str) -> HashMap<String, CookieRecord> {
        self.get(host).unwrap_or_else(|e| {
            tracing::warn!(host = %host, error = %e, "cookie storage read failed");
            HashMap::new()
        })
    }

    pub fn remove_expired(&self) -> Result<usize, NetError> {
        self.storage.remove_expired()
    }

    pub fn clear(&self) -> Result<(), NetError> {
        self.storage.clear()
    }
}

impl<S: CookieStorage + 'static> CookieJar<S> {
    /// Run [`remove_expired`](Self::remove_expired) every `interval` on the
    /// current tokio runtime. The task ends once the jar is dropped.
    pub fn start_eviction_task(self: &Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
        let jar: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                let Some(jar) = jar.upgrade() else {
                    break;
                };
                if let Err(e) = jar.remove_expired() {
                    tracing::warn!(error = %e, "periodic cookie eviction failed");
                }
            }
        })
    }
}

/// Collects configuration steps and applies them to the engine exactly once.
///
/// Steps run in registration order inside [`build`](Self::build), before the
/// jar exists, so they may freely mutate the engine.
pub struct CookieJarBuilder<S: CookieStorage = AcceptAllCookieStorage> {
    storage: S,
    defaults: Vec<ConfigureFn<S>>,
}

impl<S: CookieStorage> CookieJarBuilder<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            defaults: Vec::new(),
        }
    }

    /// Register a configuration step, e.g. to pre-seed cookies or tune limits.
    pub fn configure<F>(mut self, step: F) -> Self
    where
        F: FnOnce(&mut S) -> Result<(), NetError> + 'static,
    {
        self.defaults.push(Box::new(step));
        self
    }

    /// Apply every configuration step, then publish the jar.
    /// The first failing step aborts construction.
    pub fn build(self) -> Result<CookieJar<S>, NetError> {
        let Self {
            mut storage,
            defaults,
        } = self;

        let steps = defaults.len();
        for step in defaults {
            step(&mut storage)?;
        }
        tracing::debug!(steps, "cookie jar configured");

        Ok(CookieJar::new(storage))
    }
}
