//! The two pipeline extension points that connect a [`CookieJar`] to traffic.
//!
//! The surrounding client calls [`RequestInterceptor::intercept`] right before
//! a request is sent and [`ResponseInterceptor::intercept`] once a response has
//! been received. Both are cheap to clone and share one jar.

use crate::base::neterror::NetError;
use crate::cookies::jar::CookieJar;
use crate::cookies::memory::AcceptAllCookieStorage;
use crate::cookies::storage::CookieStorage;
use crate::http::request::OutgoingRequest;
use crate::http::response::IncomingResponse;
use http::header::{HeaderValue, COOKIE};
use std::sync::Arc;

/// Build both interceptors over one jar.
pub fn interceptors<S: CookieStorage>(
    jar: Arc<CookieJar<S>>,
) -> (RequestInterceptor<S>, ResponseInterceptor<S>) {
    (
        RequestInterceptor::new(Arc::clone(&jar)),
        ResponseInterceptor::new(jar),
    )
}

/// Pre-send hook: attaches the `Cookie` header.
pub struct RequestInterceptor<S: CookieStorage = AcceptAllCookieStorage> {
    jar: Arc<CookieJar<S>>,
}

impl<S: CookieStorage> Clone for RequestInterceptor<S> {
    fn clone(&self) -> Self {
        Self {
            jar: Arc::clone(&self.jar),
        }
    }
}

impl<S: CookieStorage> RequestInterceptor<S> {
    pub fn new(jar: Arc<CookieJar<S>>) -> Self {
        Self { jar }
    }

    pub fn jar(&self) -> &Arc<CookieJar<S>> {
        &self.jar
    }

    /// Render the host's live cookies into a single `Cookie` header.
    /// Nothing is attached when the host has no cookies.
    pub fn intercept<R>(&self, request: &mut R) -> Result<(), NetError>
    where
        R: OutgoingRequest + ?Sized,
    {
        let Some(host) = request.host() else {
            return Ok(());
        };

        let Some(cookie_value) = self.jar.cookie_header(&host)? else {
            return Ok(());
        };

        let value = HeaderValue::from_str(&cookie_value).map_err(|_| NetError::InvalidHeader)?;
        request.set_header(COOKIE, value);
        tracing::trace!(host = %host, "attached Cookie header");
        Ok(())
    }
}

/// Post-receive hook: stores the response's cookies.
pub struct ResponseInterceptor<S: CookieStorage = AcceptAllCookieStorage> {
    jar: Arc<CookieJar<S>>,
}

impl<S: CookieStorage> Clone for ResponseInterceptor<S> {
    fn clone(&self) -> Self {
        Self {
            jar: Arc::clone(&self.jar),
        }
    }
}

impl<S: CookieStorage> ResponseInterceptor<S> {
    pub fn new(jar: Arc<CookieJar<S>>) -> Self {
        Self { jar }
    }

    pub fn jar(&self) -> &Arc<CookieJar<S>> {
        &self.jar
    }

    /// Store every cookie in response order, so a later cookie of the same
    /// name wins. Stops at the first storage fault.
    pub fn intercept<R>(&self, response: &R) -> Result<(), NetError>
    where
        R: IncomingResponse + ?Sized,
    {
        let Some(host) = response.request_host() else {
            return Ok(());
        };

        let cookies = response.cookies();
        let count = cookies.len();
        for cookie in cookies {
            self.jar.set(&host, cookie)?;
        }

        if count > 0 {
            tracing::debug!(host = %host, count, "absorbed response cookies");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cookies::record::CookieRecord;
    use crate::http::request::PendingRequest;
    use crate::http::response::ReceivedResponse;

    #[test]
    fn test_request_without_cookies_gets_no_header() {
        let (request_hook, _) = interceptors(Arc::new(CookieJar::default()));
        let mut request = PendingRequest::new("https://example.com/").unwrap();

        request_hook.intercept(&mut request).unwrap();
        assert!(request.headers().get("Cookie").is_none());
    }

    #[test]
    fn test_round_trip_through_both_hooks() {
        let (request_hook, response_hook) = interceptors(Arc::new(CookieJar::default()));

        let response = ReceivedResponse::new(
            "example.com",
            vec![CookieRecord::new("a", "1"), CookieRecord::new("b", "2")],
        );
        response_hook.intercept(&response).unwrap();

        let mut request = PendingRequest::new("https://example.com/next").unwrap();
        request_hook.intercept(&mut request).unwrap();
        assert_eq!(request.headers().get("Cookie").unwrap(), "a=1; b=2");
    }

    #[test]
    fn test_later_duplicate_in_response_wins() {
        let jar = Arc::new(CookieJar::default());
        let response_hook = ResponseInterceptor::new(Arc::clone(&jar));

        let response = ReceivedResponse::new(
            "example.com",
            vec![CookieRecord::new("sid", "old"), CookieRecord::new("sid", "new")],
        );
        response_hook.intercept(&response).unwrap();

        assert_eq!(
            jar.get_cookie("example.com", "sid").unwrap().unwrap().value,
            "new"
        );
        assert_eq!(jar.get("example.com").unwrap().len(), 1);
    }

    #[test]
    fn test_response_without_host_is_ignored() {
        let jar = Arc::new(CookieJar::default());
        let response_hook = ResponseInterceptor::new(Arc::clone(&jar));

        response_hook.intercept(&ReceivedResponse::default()).unwrap();
        assert!(jar.storage().is_empty());
    }

    #[test]
    fn test_unsendable_cookie_does_not_block_siblings() {
        let jar = Arc::new(CookieJar::default());
        jar.set("example.com", CookieRecord::new("sid", "good")).unwrap();
        jar.set("example.com", CookieRecord::new("junk", "a\u{1}b"))
            .unwrap();
        let hook = RequestInterceptor::new(jar);

        for _ in 0..2 {
            let mut request = PendingRequest::new("https://example.com/").unwrap();
            hook.intercept(&mut request).unwrap();
            assert_eq!(request.headers().get("Cookie").unwrap(), "sid=good");
        }
    }
}
