use crate::base::neterror::NetError;
use http::header::{HeaderName, HeaderValue};
use http::HeaderMap;
use std::str::FromStr;

/// Request headers that keep the order they were added in.
///
/// Setting a header that is already present replaces its value in place.
#[derive(Debug, Clone, Default)]
pub struct OrderedHeaderMap {
    headers: Vec<(HeaderName, HeaderValue)>,
}

impl OrderedHeaderMap {
    pub fn new() -> Self {
        Self {
            headers: Vec::new(),
        }
    }

    /// Parse and set a header from strings.
    pub fn insert(&mut self, name: &str, value: &str) -> Result<(), NetError> {
        let name = HeaderName::from_str(name).map_err(|_| NetError::InvalidHeader)?;
        let value = HeaderValue::from_str(value).map_err(|_| NetError::InvalidHeader)?;
        self.set(name, value);
        Ok(())
    }

    pub fn set(&mut self, name: HeaderName, value: HeaderValue) {
        // HeaderName is already lowercase, so equality is case-insensitive.
        if let Some((_, v)) = self.headers.iter_mut().find(|(n, _)| *n == name) {
            *v = value;
        } else {
            self.headers.push((name, value));
        }
    }

    pub fn remove(&mut self, name: &str) {
        if let Ok(target) = HeaderName::from_str(name) {
            self.headers.retain(|(n, _)| *n != target);
        }
    }

    pub fn get(&self, name: &str) -> Option<&HeaderValue> {
        let target = HeaderName::from_str(name).ok()?;
        self.headers
            .iter()
            .find(|(n, _)| *n == target)
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&HeaderName, &HeaderValue)> {
        self.headers.iter().map(|(n, v)| (n, v))
    }

    /// Consumes the map and returns a standard `http::HeaderMap`.
    pub fn to_header_map(self) -> HeaderMap {
        let mut map = HeaderMap::with_capacity(self.headers.len());
        for (name, value) in self.headers {
            map.append(name, value);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::COOKIE;

    #[test]
    fn test_case_insensitive_get() {
        let mut headers = OrderedHeaderMap::new();
        headers.insert("COOKIE", "a=1").unwrap();
        assert_eq!(headers.get("cookie").unwrap(), "a=1");
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut headers = OrderedHeaderMap::new();
        headers.insert("Accept", "*/*").unwrap();
        headers.set(COOKIE, HeaderValue::from_static("a=1"));
        headers.insert("User-Agent", "test").unwrap();
        headers.set(COOKIE, HeaderValue::from_static("a=2"));

        let names: Vec<_> = headers.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["accept", "cookie", "user-agent"]);
        assert_eq!(headers.get("Cookie").unwrap(), "a=2");
    }

    #[test]
    fn test_remove_header() {
        let mut headers = OrderedHeaderMap::new();
        headers.insert("Cookie", "a=1").unwrap();
        headers.remove("cookie");
        assert!(headers.is_empty());
    }

    #[test]
    fn test_invalid_header_value() {
        let mut headers = OrderedHeaderMap::new();
        assert_eq!(
            headers.insert("Cookie", "a=1\nb=2"),
            Err(NetError::InvalidHeader)
        );
    }

    #[test]
    fn test_to_header_map() {
        let mut headers = OrderedHeaderMap::new();
        headers.insert("Host", "example.com").unwrap();
        headers.insert("Cookie", "a=1").unwrap();

        let map = headers.to_header_map();
        assert_eq!(map.len(), 2);
        assert_eq!(map.keys().next().unwrap().as_str(), "host");
    }
}
