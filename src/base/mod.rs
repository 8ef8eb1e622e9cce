//! Base types and error handling.
//!
//! Provides foundational types mirroring Chromium's `net/base/`:
//! - [`NetError`](neterror::NetError): Error codes in the style of `net_error_list.h`
//! - [`IoResultExt`](context::IoResultExt): IO error context for storage engines

pub mod context;
pub mod neterror;
