use crate::base::neterror::NetError;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A parsed cookie as stored by the jar.
///
/// Records are produced by whatever parses `Set-Cookie` headers and are never
/// mutated once stored; an update replaces the whole record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieRecord {
    pub name: String,
    pub value: String,
    /// Declared domain. `None` means the cookie belongs to the request host.
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default = "default_path")]
    pub path: String,
    /// Absolute expiry. `None` marks a session cookie.
    #[serde(
        default,
        rename = "expires_unix_secs",
        with = "time::serde::timestamp::option"
    )]
    pub expires: Option<OffsetDateTime>,
    #[serde(default)]
    pub secure: bool,
    #[serde(default)]
    pub http_only: bool,
}

fn default_path() -> String {
    "/".to_string()
}

impl CookieRecord {
    /// A session cookie with path `/` and no flags.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: None,
            path: default_path(),
            expires: None,
            secure: false,
            http_only: false,
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_expires(mut self, expires: OffsetDateTime) -> Self {
        self.expires = Some(expires);
        self
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    pub fn is_expired(&self, current_time: OffsetDateTime) -> bool {
        self.expires.is_some_and(|expiry| expiry < current_time)
    }

    pub fn is_session(&self) -> bool {
        self.expires.is_none()
    }

    /// The domain this cookie applies to when received from `host`.
    pub fn effective_domain(&self, host: &str) -> String {
        match self.domain.as_deref().map(|d| d.trim_start_matches('.')) {
            Some(d) if !d.is_empty() => d.to_ascii_lowercase(),
            _ => host.to_ascii_lowercase(),
        }
    }

    /// `name=value`, the form used inside a `Cookie` request header.
    pub fn render_pair(&self) -> String {
        format!("{}={}", self.name, self.value)
    }

    /// Validate __Secure- and __Host- cookie prefixes per RFC 6265bis.
    /// - __Secure- cookies MUST have the Secure attribute
    /// - __Host- cookies MUST have Secure, Path="/", and no Domain attribute
    pub fn validate_prefix(&self, secure_origin: bool) -> Result<(), NetError> {
        if self.name.starts_with("__Secure-") && (!self.secure || !secure_origin) {
            return Err(NetError::CookieInvalidPrefix);
        }

        if self.name.starts_with("__Host-")
            && (!self.secure || self.path != "/" || self.domain.is_some() || !secure_origin)
        {
            return Err(NetError::CookieInvalidPrefix);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    #[test]
    fn test_new_is_session_cookie() {
        let c = CookieRecord::new("sid", "xyz");
        assert_eq!(c.path, "/");
        assert!(c.is_session());
        assert!(!c.is_expired(OffsetDateTime::now_utc()));
    }

    #[test]
    fn test_expiry() {
        let now = OffsetDateTime::now_utc();
        let past = CookieRecord::new("a", "1").with_expires(now - Duration::seconds(1));
        let future = CookieRecord::new("a", "1").with_expires(now + Duration::hours(1));
        assert!(past.is_expired(now));
        assert!(!future.is_expired(now));
    }

    #[test]
    fn test_effective_domain() {
        let host_only = CookieRecord::new("a", "1");
        assert_eq!(host_only.effective_domain("Example.com"), "example.com");

        let dotted = CookieRecord::new("a", "1").with_domain(".Example.COM");
        assert_eq!(dotted.effective_domain("www.example.com"), "example.com");
    }

    #[test]
    fn test_render_pair() {
        assert_eq!(CookieRecord::new("a", "1").render_pair(), "a=1");
    }

    #[test]
    fn test_secure_prefix() {
        let bad = CookieRecord::new("__Secure-id", "1");
        assert_eq!(bad.validate_prefix(true), Err(NetError::CookieInvalidPrefix));

        let good = CookieRecord::new("__Secure-id", "1").with_secure(true);
        assert!(good.validate_prefix(true).is_ok());
        assert!(good.validate_prefix(false).is_err());
    }

    #[test]
    fn test_host_prefix() {
        let good = CookieRecord::new("__Host-id", "1").with_secure(true);
        assert!(good.validate_prefix(true).is_ok());

        let with_domain = good.clone().with_domain("example.com");
        assert!(with_domain.validate_prefix(true).is_err());

        let with_path = good.with_path("/app");
        assert!(with_path.validate_prefix(true).is_err());
    }
}
