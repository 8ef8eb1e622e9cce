//! Cookie persistence - a storage engine backed by a JSON file.
//!
//! [`FileCookieStorage`] keeps the working set in an
//! [`AcceptAllCookieStorage`] and writes a full snapshot through to disk on
//! every mutation.

use crate::base::context::IoResultExt;
use crate::base::neterror::NetError;
use crate::cookies::memory::AcceptAllCookieStorage;
use crate::cookies::record::CookieRecord;
use crate::cookies::storage::CookieStorage;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use time::OffsetDateTime;

use serde::{Deserialize, Serialize};

/// One line of the on-disk document.
#[derive(Serialize, Deserialize, Debug, Clone)]
struct PersistentCookie {
    host: String,
    cookie: CookieRecord,
}

/// Storage engine persisted to a JSON file.
///
/// # Example
/// ```no_run
/// use hostjar::cookies::persistence::FileCookieStorage;
/// use hostjar::cookies::jar::CookieJar;
///
/// let storage = FileCookieStorage::open("/tmp/cookies.json")?;
/// let jar = CookieJar::new(storage);
/// # Ok::<(), hostjar::base::neterror::NetError>(())
/// ```
pub struct FileCookieStorage {
    memory: AcceptAllCookieStorage,
    path: PathBuf,
    persist_session_cookies: bool,
    // Serialises snapshot + write so the file always reflects the newest state.
    write_lock: Mutex<()>,
}

impl FileCookieStorage {
    /// Open the store at `path`, loading any cookies already on disk.
    /// Expired cookies in the file are skipped. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, NetError> {
        let path = path.into();
        let memory = AcceptAllCookieStorage::new();

        if path.exists() {
            let json = fs::read_to_string(&path).store_context(&path)?;
            let persisted: Vec<PersistentCookie> = serde_json::from_str(&json)?;
            let now = OffsetDateTime::now_utc();

            let mut loaded = 0usize;
            for pc in persisted {
                if pc.cookie.is_expired(now) {
                    continue;
                }
                memory.set(&pc.host, pc.cookie)?;
                loaded += 1;
            }
            tracing::debug!(path = %path.display(), loaded, "loaded persisted cookies");
        }

        Ok(Self {
            memory,
            path,
            persist_session_cookies: false,
            write_lock: Mutex::new(()),
        })
    }

    /// Also write session cookies to disk. Off by default.
    pub fn persist_session_cookies(mut self, persist: bool) -> Self {
        self.persist_session_cookies = persist;
        self
    }

    pub fn set_persist_session_cookies(&mut self, persist: bool) {
        self.persist_session_cookies = persist;
    }

    /// The in-memory working set, e.g. to tune its limits.
    pub fn memory_mut(&mut self) -> &mut AcceptAllCookieStorage {
        &mut self.memory
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the current state to disk.
    pub fn flush(&self) -> Result<(), NetError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let now = OffsetDateTime::now_utc();
        let persisted: Vec<PersistentCookie> = self
            .memory
            .snapshot()
            .into_iter()
            .filter(|(_, c)| !c.is_expired(now))
            .filter(|(_, c)| self.persist_session_cookies || !c.is_session())
            .map(|(host, cookie)| PersistentCookie { host, cookie })
            .collect();

        let json = serde_json::to_string_pretty(&persisted)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).store_context(parent)?;
            }
        }

        let mut tmp = self.path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, json).store_context(&tmp)?;
        fs::rename(&tmp, &self.path).store_context(&self.path)?;

        tracing::trace!(path = %self.path.display(), count = persisted.len(), "cookies written to disk");
        Ok(())
    }
}

impl CookieStorage for FileCookieStorage {
    fn get(&self, host: &str) -> Result<HashMap<String, CookieRecord>, NetError> {
        self.memory.get(host)
    }

    fn get_cookie(&self, host: &str, name: &str) -> Result<Option<CookieRecord>, NetError> {
        self.memory.get_cookie(host, name)
    }

    fn set(&self, host: &str, cookie: CookieRecord) -> Result<(), NetError> {
        self.memory.set(host, cookie)?;
        self.flush()
    }

    fn for_each(
        &self,
        host: &str,
        visitor: &mut dyn FnMut(&CookieRecord),
    ) -> Result<(), NetError> {
        self.memory.for_each(host, visitor)
    }

    fn remove_expired(&self) -> Result<usize, NetError> {
        let removed = self.memory.remove_expired()?;
        if removed > 0 {
            self.flush()?;
        }
        Ok(removed)
    }

    fn clear(&self) -> Result<(), NetError> {
        self.memory.clear()?;
        self.flush()
    }

    fn hosts(&self) -> Vec<String> {
        self.memory.hosts()
    }

    fn len(&self) -> usize {
        self.memory.len()
    }
}
