//! Cookie storage.
//!
//! - **Records**: [`CookieRecord`](record::CookieRecord), one parsed cookie
//! - **Engines**: the [`CookieStorage`](storage::CookieStorage) trait with an
//!   in-memory ([`AcceptAllCookieStorage`](memory::AcceptAllCookieStorage)),
//!   a file-backed ([`FileCookieStorage`](persistence::FileCookieStorage)) and
//!   a discarding ([`NoopCookieStorage`](storage::NoopCookieStorage)) variant
//! - **Jar**: [`CookieJar`](jar::CookieJar), host-scoped access plus one-time
//!   configuration of the engine
//! - **Domain checks**: [`psl`] helpers for `Domain` attributes
//!
//! Cookies are keyed by exact host (hostname plus explicit port). Names are
//! unique per host and a later write replaces an earlier one. A record whose
//! expiry has passed reads as absent and is removed the next time it is
//! touched; records without expiry live as long as the engine.
//!
//! ```
//! use hostjar::cookies::jar::CookieJar;
//! use hostjar::cookies::record::CookieRecord;
//!
//! let jar = CookieJar::default();
//! jar.set("example.com", CookieRecord::new("sid", "xyz"))?;
//!
//! let sid = jar.get_cookie("example.com", "sid")?;
//! assert_eq!(sid.map(|c| c.value), Some("xyz".to_string()));
//! assert!(jar.get("other.com")?.is_empty());
//! # Ok::<(), hostjar::base::neterror::NetError>(())
//! ```

pub mod jar;
pub mod memory;
#[cfg(feature = "json")]
pub mod persistence;
pub mod psl;
pub mod record;
pub mod storage;
