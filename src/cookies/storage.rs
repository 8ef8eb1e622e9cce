//! The storage capability shared by every cookie engine.

use crate::base::neterror::NetError;
use crate::cookies::record::CookieRecord;
use std::collections::HashMap;
use std::sync::Arc;

/// Canonical form of a host key: trimmed, ASCII-lowercased, and without a
/// default `:80` or `:443` port. Returns `None` for an empty host.
pub fn canonical_host(host: &str) -> Option<String> {
    let host = host.trim();
    let host = match host.rsplit_once(':') {
        // A bare IPv6 literal has colons of its own; only bracketed ones carry a port.
        Some((name, "80" | "443"))
            if !name.is_empty() && (!name.contains(':') || name.ends_with(']')) =>
        {
            name
        }
        _ => host,
    };
    if host.is_empty() {
        None
    } else {
        Some(host.to_ascii_lowercase())
    }
}

/// A host-keyed cookie storage engine.
///
/// Cookies are keyed by exact host; within one host, names are unique. All
/// methods take `&self` and must be safe to call from many requests at once.
/// In-memory engines never return an error; persistent engines report I/O
/// faults from the call that hit them.
pub trait CookieStorage: Send + Sync {
    /// All live cookies for `host`, keyed by name.
    fn get(&self, host: &str) -> Result<HashMap<String, CookieRecord>, NetError>;

    /// A single live cookie. Expired records read as absent and are dropped.
    fn get_cookie(&self, host: &str, name: &str) -> Result<Option<CookieRecord>, NetError>;

    /// Insert or replace `(host, cookie.name)`.
    ///
    /// An already-expired record deletes the stored cookie of that name.
    /// Records with an empty name, or an empty host, are ignored.
    fn set(&self, host: &str, cookie: CookieRecord) -> Result<(), NetError>;

    /// Visit every live cookie for `host` in insertion order.
    fn for_each(&self, host: &str, visitor: &mut dyn FnMut(&CookieRecord))
        -> Result<(), NetError>;

    /// Drop every expired record. Returns how many were removed.
    fn remove_expired(&self) -> Result<usize, NetError>;

    fn clear(&self) -> Result<(), NetError>;

    /// Hosts that currently hold at least one record.
    fn hosts(&self) -> Vec<String>;

    /// Total number of stored records, expired ones included until evicted.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<S: CookieStorage + ?Sized> CookieStorage for Arc<S> {
    fn get(&self, host: &str) -> Result<HashMap<String, CookieRecord>, NetError> {
        (**self).get(host)
    }

    fn get_cookie(&self, host: &str, name: &str) -> Result<Option<CookieRecord>, NetError> {
        (**self).get_cookie(host, name)
    }

    fn set(&self, host: &str, cookie: CookieRecord) -> Result<(), NetError> {
        (**self).set(host, cookie)
    }

    fn for_each(
        &self,
        host: &str,
        visitor: &mut dyn FnMut(&CookieRecord),
    ) -> Result<(), NetError> {
        (**self).for_each(host, visitor)
    }

    fn remove_expired(&self) -> Result<usize, NetError> {
        (**self).remove_expired()
    }

    fn clear(&self) -> Result<(), NetError> {
        (**self).clear()
    }

    fn hosts(&self) -> Vec<String> {
        (**self).hosts()
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}

impl<S: CookieStorage + ?Sized> CookieStorage for Box<S> {
    fn get(&self, host: &str) -> Result<HashMap<String, CookieRecord>, NetError> {
        (**self).get(host)
    }

    fn get_cookie(&self, host: &str, name: &str) -> Result<Option<CookieRecord>, NetError> {
        (**self).get_cookie(host, name)
    }

    fn set(&self, host: &str, cookie: CookieRecord) -> Result<(), NetError> {
        (**self).set(host, cookie)
    }

    fn for_each(
        &self,
        host: &str,
        visitor: &mut dyn FnMut(&CookieRecord),
    ) -> Result<(), NetError> {
        (**self).for_each(host, visitor)
    }

    fn remove_expired(&self) -> Result<usize, NetError> {
        (**self).remove_expired()
    }

    fn clear(&self) -> Result<(), NetError> {
        (**self).clear()
    }

    fn hosts(&self) -> Vec<String> {
        (**self).hosts()
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}

/// Storage that keeps nothing. Installing it disables cookies without
/// removing the interceptors from the pipeline.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCookieStorage;

impl CookieStorage for NoopCookieStorage {
    fn get(&self, _host: &str) -> Result<HashMap<String, CookieRecord>, NetError> {
        Ok(HashMap::new())
    }

    fn get_cookie(&self, _host: &str, _name: &str) -> Result<Option<CookieRecord>, NetError> {
        Ok(None)
    }

    fn set(&self, host: &str, cookie: CookieRecord) -> Result<(), NetError> {
        tracing::trace!(host = %host, name = %cookie.name, "noop storage discarded cookie");
        Ok(())
    }

    fn for_each(
        &self,
        _host: &str,
        _visitor: &mut dyn FnMut(&CookieRecord),
    ) -> Result<(), NetError> {
        Ok(())
    }

    fn remove_expired(&self) -> Result<usize, NetError> {
        Ok(0)
    }

    fn clear(&self) -> Result<(), NetError> {
        Ok(())
    }

    fn hosts(&self) -> Vec<String> {
        Vec::new()
    }

    fn len(&self) -> usize {
        0
    }
}
