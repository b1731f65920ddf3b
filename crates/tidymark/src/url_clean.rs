//! Tracking-parameter removal for URLs.

use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;
use url::{form_urlencoded, Url};

/// Query keys starting with any of these (case-insensitive) are tracking parameters
pub const TRACKING_PREFIXES: &[&str] = &[
    "utm_", "fbclid", "gclid", "gclsrc", "dclid", "ref", "mc_", "ad_id", "campaign", "osis",
    "cvosrc", "sc_", "yclid", "_hs", "cto_",
];

/// Splits a URL string into base, query and fragment
static QUERY_PARTS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^([^?#]*)\?([^#]*)(#.*)?$").expect("valid regex"));

/// Whether a query key names a tracking parameter
pub fn is_tracking_param(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    TRACKING_PREFIXES.iter().any(|prefix| key.starts_with(prefix))
}

/// Remove tracking parameters from a URL.
///
/// Never fails: anything that is not recognisable as a URL with a query is
/// returned unchanged. Surviving parameters keep their order and original
/// encoding, and a query left empty loses its `?`. Applying this twice gives
/// the same result as applying it once.
///
/// # Example
///
/// ```rust
/// use tidymark::clean_url;
///
/// assert_eq!(
///     clean_url("https://x.com/a?utm_source=n&id=5"),
///     "https://x.com/a?id=5"
/// );
/// assert_eq!(clean_url("/rel?fbclid=abc"), "/rel");
/// assert_eq!(clean_url("not a url"), "not a url");
/// ```
pub fn clean_url(url: &str) -> String {
    if url.is_empty() {
        return String::new();
    }

    // Keys without a value only count in URLs that parse as absolute
    let require_value = !is_absolute(url);
    let cleaned = strip_tracking(url, require_value).unwrap_or_else(|| url.to_string());
    if cleaned != url {
        trace!("cleaned url {:?} -> {:?}", url, cleaned);
    }
    cleaned
}

fn is_absolute(url: &str) -> bool {
    if Url::parse(url).is_ok() {
        return true;
    }
    url.starts_with("//") && Url::parse(&format!("https:{url}")).is_ok()
}

/// Rebuild `url` without its tracking segments; `None` when nothing matched
fn strip_tracking(url: &str, require_value: bool) -> Option<String> {
    let caps = QUERY_PARTS.captures(url)?;
    let base = caps.get(1).map_or("", |m| m.as_str());
    let query = caps.get(2).map_or("", |m| m.as_str());
    let fragment = caps.get(3).map_or("", |m| m.as_str());

    let mut removed = false;
    let kept: Vec<&str> = query
        .split('&')
        .filter(|segment| {
            let tracking = is_tracking_segment(segment, require_value);
            removed |= tracking;
            !tracking
        })
        .collect();

    if !removed {
        return None;
    }

    let kept: Vec<&str> = kept.into_iter().filter(|s| !s.is_empty()).collect();
    let mut out = String::with_capacity(url.len());
    out.push_str(base);
    if !kept.is_empty() {
        out.push('?');
        out.push_str(&kept.join("&"));
    }
    out.push_str(fragment);
    Some(out)
}

fn is_tracking_segment(segment: &str, require_value: bool) -> bool {
    if segment.is_empty() || (require_value && !segment.contains('=')) {
        return false;
    }
    form_urlencoded::parse(segment.as_bytes())
        .next()
        .is_some_and(|(key, _)| is_tracking_param(&key))
}
