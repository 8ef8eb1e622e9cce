use crate::base::neterror::NetError;
use crate::http::orderedheaders::OrderedHeaderMap;
use http::header::{HeaderName, HeaderValue, HOST};
use url::Url;

/// What the request-stage hook needs from an in-flight request.
pub trait OutgoingRequest {
    /// The host cookies are keyed by: hostname plus any non-default port.
    fn host(&self) -> Option<String>;

    /// Set `name` to `value`, replacing any previous value.
    fn set_header(&mut self, name: HeaderName, value: HeaderValue);
}

/// Host key for a URL, e.g. `example.com` or `example.com:8080`.
pub fn url_host(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    // Url::port() is None when the port is the scheme default.
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

fn default_port(scheme: Option<&str>) -> Option<u16> {
    match scheme {
        Some("http") | Some("ws") => Some(80),
        Some("https") | Some("wss") => Some(443),
        _ => None,
    }
}

/// A request that has been built but not yet sent.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    url: Url,
    headers: OrderedHeaderMap,
}

impl PendingRequest {
    pub fn new(url_str: &str) -> Result<Self, NetError> {
        let url = Url::parse(url_str).map_err(|_| NetError::InvalidUrl)?;
        Ok(Self::from_url(url))
    }

    pub fn from_url(url: Url) -> Self {
        Self {
            url,
            headers: OrderedHeaderMap::new(),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &OrderedHeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut OrderedHeaderMap {
        &mut self.headers
    }

    pub fn into_headers(self) -> OrderedHeaderMap {
        self.headers
    }
}

impl OutgoingRequest for PendingRequest {
    fn host(&self) -> Option<String> {
        url_host(&self.url)
    }

    fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.set(name, value);
    }
}

impl<B> OutgoingRequest for http::Request<B> {
    fn host(&self) -> Option<String> {
        if let Some(authority) = self.uri().authority() {
            let host = authority.host();
            return Some(match authority.port_u16() {
                Some(port) if Some(port) != default_port(self.uri().scheme_str()) => {
                    format!("{host}:{port}")
                }
                _ => host.to_string(),
            });
        }

        // Origin-form URIs carry the authority in the Host header.
        self.headers()
            .get(HOST)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers_mut().insert(name, value);
    }
}
