//! Magnet URI parsing and construction.

use reqwest::Url;
use thiserror::Error;

use crate::model::SearchResult;

/// Title used when a magnet link carries no `dn` parameter.
pub const DEFAULT_MAGNET_TITLE: &str = "Magnet Link";
/// Category assigned to directly decoded magnet links.
pub const DIRECT_MAGNET_CATEGORY: &str = "Direct Magnet";
/// Source assigned to directly decoded magnet links.
pub const MAGNET_SOURCE: &str = "magnet-link";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MagnetError {
    #[error("Invalid magnet link: {0}")]
    InvalidUri(String),

    #[error("Only magnet links are supported, got scheme '{0}'")]
    UnsupportedScheme(String),
}

/// Prefix that routes a query to the codec instead of an adapter.
const MAGNET_PREFIX: &str = "magnet:?";

/// Returns true if the input looks like a magnet URI and should be decoded
/// instead of searched. A bare `magnet:` is an ordinary keyword.
pub fn is_magnet(raw: &str) -> bool {
    raw.trim_start()
        .get(..MAGNET_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(MAGNET_PREFIX))
}

/// Decode a magnet URI into a search result.
///
/// A bare magnet carries no swarm statistics, so seeders, leechers, size and
/// upload time are always absent.
pub fn parse(raw: &str) -> Result<SearchResult, MagnetError> {
    let url = Url::parse(raw.trim()).map_err(|e| MagnetError::InvalidUri(e.to_string()))?;
    if url.scheme() != "magnet" {
        return Err(MagnetError::UnsupportedScheme(url.scheme().to_string()));
    }

    let mut title = None;
    let mut info_hash = None;
    let mut trackers = Vec::new();

    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "dn" if title.is_none() => title = Some(value.into_owned()),
            "xt" if info_hash.is_none() => {
                info_hash = value.rsplit(':').next().map(str::to_uppercase);
            }
            "tr" => trackers.push(value.into_owned()),
            _ => {}
        }
    }

    let title = title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_MAGNET_TITLE.to_string());

    let mut result = SearchResult::new(title, raw.trim());
    if let Some(hash) = info_hash {
        result = result.with_info_hash(hash);
    }
    result.trackers = trackers;
    result.category = DIRECT_MAGNET_CATEGORY.to_string();
    result.source = MAGNET_SOURCE.to_string();
    Ok(result)
}

/// Build a magnet URI from an info hash, display name and tracker list.
///
/// Output is deterministic: `xt` first, then `dn`, then one `tr` per tracker
/// in input order.
pub fn build(info_hash: &str, title: &str, trackers: &[String]) -> String {
    let mut magnet = format!(
        "magnet:?xt=urn:btih:{}&dn={}",
        info_hash.to_uppercase(),
        urlencoding::encode(title)
    );
    for tracker in trackers {
        magnet.push_str("&tr=");
        magnet.push_str(&urlencoding::encode(tracker));
    }
    magnet
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_magnet() {
        let result = parse("magnet:?xt=urn:btih:ABCDEF&dn=Test&tr=udp://t1").unwrap();
        assert_eq!(result.title, "Test");
        assert_eq!(result.info_hash.as_deref(), Some("ABCDEF"));
        assert_eq!(result.trackers, vec!["udp://t1".to_string()]);
        assert_eq!(result.category, DIRECT_MAGNET_CATEGORY);
        assert_eq!(result.source, MAGNET_SOURCE);
        assert!(result.seeders.is_none());
        assert!(result.leechers.is_none());
        assert!(result.size.is_none());
        assert!(result.size_label.is_empty());
        assert!(result.uploaded.is_none());
    }

    #[test]
    fn test_parse_keeps_raw_uri() {
        let raw = "magnet:?xt=urn:btih:abc&dn=Name";
        let result = parse(raw).unwrap();
        assert_eq!(result.magnet, raw);
        assert_eq!(result.info_hash.as_deref(), Some("ABC"));
    }

    #[test]
    fn test_parse_decodes_plus_and_percent() {
        let result = parse("magnet:?xt=urn:btih:abc&dn=Big+Buck%20Bunny&tr=udp%3A%2F%2Fa%3A80")
            .unwrap();
        assert_eq!(result.title, "Big Buck Bunny");
        assert_eq!(result.trackers, vec!["udp://a:80".to_string()]);
    }

    #[test]
    fn test_parse_without_display_name() {
        let result = parse("magnet:?xt=urn:btih:abc").unwrap();
        assert_eq!(result.title, DEFAULT_MAGNET_TITLE);
    }

    #[test]
    fn test_parse_without_hash() {
        let result = parse("magnet:?dn=Orphan").unwrap();
        assert!(result.info_hash.is_none());
        assert!(result.trackers.is_empty());
    }

    #[test]
    fn test_parse_multiple_trackers_in_order() {
        let result = parse("magnet:?xt=urn:btih:abc&tr=udp://one&tr=udp://two&tr=http://three")
            .unwrap();
        assert_eq!(
            result.trackers,
            vec!["udp://one", "udp://two", "http://three"]
        );
    }

    #[test]
    fn test_parse_rejects_other_schemes() {
        let err = parse("https://example.com/?xt=urn:btih:abc").unwrap_err();
        assert!(matches!(err, MagnetError::UnsupportedScheme(ref s) if s == "https"));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse("definitely not a uri").unwrap_err();
        assert!(matches!(err, MagnetError::InvalidUri(_)));
    }

    #[test]
    fn test_is_magnet() {
        assert!(is_magnet("magnet:?xt=urn:btih:abc"));
        assert!(is_magnet("MAGNET:?xt=urn:btih:abc"));
        assert!(is_magnet("  Magnet:?dn=x"));
        assert!(!is_magnet("ubuntu iso"));
        assert!(!is_magnet("mag"));
        assert!(!is_magnet("magnet:"));
        assert!(!is_magnet("Magnet: The Movie"));
        assert!(!is_magnet("magnet://tracker/?xt=urn:btih:abc"));
    }

    #[test]
    fn test_parse_decodes_percent_encoded_hash() {
        let result = parse("magnet:?xt=urn%3Abtih%3Aabc123&dn=x").unwrap();
        assert_eq!(result.info_hash.as_deref(), Some("ABC123"));
    }

    #[test]
    fn test_build_format() {
        let magnet = build(
            "abcdef",
            "My Title",
            &["udp://tracker.example:1337/announce".to_string()],
        );
        assert_eq!(
            magnet,
            "magnet:?xt=urn:btih:ABCDEF&dn=My%20Title&tr=udp%3A%2F%2Ftracker.example%3A1337%2Fannounce"
        );
    }

    #[test]
    fn test_build_then_parse_round_trip() {
        let cases: Vec<(&str, &str, Vec<String>)> = vec![
            ("abcdef0123456789", "Simple", vec![]),
            (
                "F257AF31A6204CD734D2BAECB8331637850B7B44",
                "Ünïcödé & symbols = ?#+",
                vec![
                    "udp://tracker.opentrackr.org:1337/announce".to_string(),
                    "http://t.example/announce?passkey=a&b=c".to_string(),
                ],
            ),
            ("deadbeef", "a+b c", vec!["udp://x".to_string(); 3]),
        ];

        for (hash, title, trackers) in cases {
            let parsed = parse(&build(hash, title, &trackers)).unwrap();
            assert_eq!(parsed.info_hash.as_deref(), Some(hash.to_uppercase().as_str()));
            assert_eq!(parsed.title, title);
            assert_eq!(parsed.trackers, trackers);
        }
    }
}
