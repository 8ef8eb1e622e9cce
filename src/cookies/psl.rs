//! Public Suffix List (PSL) checks for `Domain` attributes.
//!
//! Servers may only scope a cookie to their own host or one of its parent
//! domains, and never to a public suffix like `com` or `co.uk`.

use crate::base::neterror::NetError;
use psl::{List, Psl};

/// Check if a domain is a public suffix (e.g., "com", "co.uk").
pub fn is_public_suffix(domain: &str) -> bool {
    let domain = domain.trim_start_matches('.').to_ascii_lowercase();
    let bytes = domain.as_bytes();

    List.suffix(bytes)
        .is_some_and(|suffix| suffix.is_known() && suffix.as_bytes() == bytes)
}

/// The hostname part of a host key, without any `:port`.
pub fn hostname(host: &str) -> &str {
    // Bracketed IPv6 literals keep their colons.
    if let Some(rest) = host.strip_prefix('[') {
        return rest.split(']').next().unwrap_or(rest);
    }
    host.rsplit_once(':')
        .filter(|(_, port)| port.chars().all(|c| c.is_ascii_digit()))
        .map(|(name, _)| name)
        .unwrap_or(host)
}

/// RFC 6265 domain matching: `host` equals `domain` or is a subdomain of it.
pub fn domain_matches(domain: &str, host: &str) -> bool {
    let domain = domain.trim_start_matches('.').to_ascii_lowercase();
    let host = hostname(host).to_ascii_lowercase();

    host == domain || host.ends_with(&format!(".{domain}"))
}

/// Check that a cookie from `host` may declare `Domain=domain`.
pub fn check_cookie_domain(domain: &str, host: &str) -> Result<(), NetError> {
    let bare = domain.trim_start_matches('.');
    if bare.is_empty() {
        return Err(NetError::cookie_invalid_data("empty Domain attribute"));
    }

    // A host may set a cookie on itself even if it is listed as a suffix
    // (e.g. a github.io user page), but never on a broader suffix.
    if is_public_suffix(bare) && !bare.eq_ignore_ascii_case(hostname(host)) {
        return Err(NetError::CookiePublicSuffix);
    }

    if !domain_matches(bare, host) {
        return Err(NetError::cookie_invalid_data(format!(
            "domain {bare} does not match host {host}"
        )));
    }

    Ok(())
}
