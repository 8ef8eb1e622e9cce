use crate::base::neterror::NetError;
use crate::cookies::psl;
use crate::cookies::record::CookieRecord;
use crate::http::request::url_host;
use http::header::SET_COOKIE;
use http::HeaderMap;
use time::{Duration, OffsetDateTime};
use url::Url;

/// RFC 6265bis caps Max-Age at 400 days.
const MAX_AGE_CAP: Duration = Duration::days(400);

/// What the response-stage hook needs from a completed response.
pub trait IncomingResponse {
    /// Host of the request that produced this response.
    fn request_host(&self) -> Option<String>;

    /// Cookies carried by the response, in header order.
    fn cookies(&self) -> Vec<CookieRecord>;
}

/// A received response reduced to what the cookie jar consumes.
#[derive(Debug, Clone, Default)]
pub struct ReceivedResponse {
    request_host: Option<String>,
    cookies: Vec<CookieRecord>,
}

impl ReceivedResponse {
    /// A response whose cookies were already parsed elsewhere.
    pub fn new(request_host: impl Into<String>, cookies: Vec<CookieRecord>) -> Self {
        Self {
            request_host: Some(request_host.into()),
            cookies,
        }
    }

    /// Parse every `Set-Cookie` header. Lines that fail to parse or
    /// validate are dropped.
    pub fn from_headers(request_host: &str, secure_origin: bool, headers: &HeaderMap) -> Self {
        let cookies = headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(|line| match parse_set_cookie(line, request_host, secure_origin) {
                Ok(cookie) => Some(cookie),
                Err(e) => {
                    tracing::debug!(host = %request_host, error = %e, "dropping Set-Cookie");
                    None
                }
            })
            .collect();

        Self {
            request_host: Some(request_host.to_string()),
            cookies,
        }
    }

    /// Like [`from_headers`](Self::from_headers), taking host and origin
    /// security from the request URL.
    pub fn from_url(url: &Url, headers: &HeaderMap) -> Self {
        match url_host(url) {
            Some(host) => Self::from_headers(&host, url.scheme() == "https", headers),
            None => Self::default(),
        }
    }
}

impl IncomingResponse for ReceivedResponse {
    fn request_host(&self) -> Option<String> {
        self.request_host.clone()
    }

    fn cookies(&self) -> Vec<CookieRecord> {
        self.cookies.clone()
    }
}

/// Parse one `Set-Cookie` line received from `request_host`.
///
/// `Max-Age` takes precedence over `Expires`; a non-positive `Max-Age`
/// yields an already-expired record, which the store treats as a deletion.
pub fn parse_set_cookie(
    line: &str,
    request_host: &str,
    secure_origin: bool,
) -> Result<CookieRecord, NetError> {
    let parsed =
        cookie::Cookie::parse(line).map_err(|e| NetError::cookie_invalid_data(e.to_string()))?;

    if parsed.name().is_empty() {
        return Err(NetError::cookie_invalid_data("empty cookie name"));
    }

    let domain = match parsed.domain() {
        Some(d) => {
            psl::check_cookie_domain(d, request_host)?;
            Some(d.trim_start_matches('.').to_ascii_lowercase())
        }
        None => None,
    };

    let path = parsed
        .path()
        .filter(|p| p.starts_with('/'))
        .unwrap_or("/")
        .to_string();

    let expires = match parsed.max_age() {
        Some(max_age) if max_age <= Duration::ZERO => Some(OffsetDateTime::UNIX_EPOCH),
        Some(max_age) => Some(OffsetDateTime::now_utc() + max_age.min(MAX_AGE_CAP)),
        None => parsed.expires_datetime(),
    };

    let record = CookieRecord {
        name: parsed.name().to_string(),
        value: parsed.value().to_string(),
        domain,
        path,
        expires,
        secure: parsed.secure().unwrap_or(false),
        http_only: parsed.http_only().unwrap_or(false),
    };

    record.validate_prefix(secure_origin)?;
    Ok(record)
}
