//! # hostjar
//!
//! A host-keyed cookie jar for HTTP clients.
//!
//! `hostjar` stores the cookies servers send and hands the right ones back on
//! later requests. It plugs into an existing client through two hooks: one
//! that runs right before a request is sent and one that runs after a
//! response arrives.
//!
//! ## Features
//!
//! - **Pluggable storage**: in-memory, JSON-file backed, or disabled
//! - **Concurrent access**: sharded locking, safe from many requests at once
//! - **Expiry**: expired cookies are evicted lazily and by an optional periodic task
//! - **One-time configuration**: seed or tune the storage before first use
//! - **Set-Cookie adapter**: `cookie` crate parsing with PSL domain checks
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use hostjar::cookies::jar::CookieJar;
//! use hostjar::cookies::record::CookieRecord;
//! use hostjar::http::{interceptors, PendingRequest, ReceivedResponse};
//!
//! let jar = Arc::new(CookieJar::default());
//! let (on_request, on_response) = interceptors(Arc::clone(&jar));
//!
//! // A response from example.com sets a cookie...
//! let response = ReceivedResponse::new("example.com", vec![CookieRecord::new("sid", "xyz")]);
//! on_response.intercept(&response)?;
//!
//! // ...and the next request to example.com carries it.
//! let mut request = PendingRequest::new("https://example.com/account")?;
//! on_request.intercept(&mut request)?;
//! assert_eq!(request.headers().get("Cookie").unwrap(), "sid=xyz");
//! # Ok::<(), hostjar::base::neterror::NetError>(())
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error definitions
//! - [`cookies`] - Cookie records, storage engines and the jar
//! - [`http`] - Request/response hook shapes and the interceptors

pub mod base;
pub mod cookies;
pub mod http;
