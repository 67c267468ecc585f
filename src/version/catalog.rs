//! Remote release index.
//!
//! The index is either the vendor's `index.json` or, on mirrors that only
//! serve a directory listing, an HTML page of `vX.Y.Z/` links. Both normalize
//! to an ascending, deduplicated list of [`IndexEntry`].

use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::debug;

use crate::error::{NodeenvError, Result};
use crate::fetch::Transport;

use super::Version;

/// Versions per line in `--list` output.
const LIST_COLUMNS: usize = 8;

/// One release in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Release version.
    pub version: Version,
    /// Whether the release belongs to a long-term-support line.
    pub lts: bool,
    /// Release date as published, if any.
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    version: String,
    #[serde(default)]
    lts: serde_json::Value,
    #[serde(default)]
    date: Option<String>,
}

/// Fetches and caches release indexes, keyed by mirror base URL.
#[derive(Debug, Default)]
pub struct VersionCatalog {
    cache: HashMap<String, Vec<IndexEntry>>,
}

impl VersionCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the index for `base_url`, reusing a previous fetch if there was one.
    ///
    /// Requests `{base}/index.json` and falls back to the directory listing at
    /// `{base}/` when the server answers 404.
    pub fn fetch_index(&mut self, transport: &dyn Transport, base_url: &str) -> Result<&[IndexEntry]> {
        let base = base_url.trim_end_matches('/');
        if !self.cache.contains_key(base) {
            let entries = Self::fetch_uncached(transport, base)?;
            debug!(base, count = entries.len(), "fetched release index");
            self.cache.insert(base.to_string(), entries);
        }
        Ok(self.cache.get(base).map(Vec::as_slice).unwrap_or_default())
    }

    /// Whether an index for `base_url` is already cached.
    pub fn is_cached(&self, base_url: &str) -> bool {
        self.cache.contains_key(base_url.trim_end_matches('/'))
    }

    fn fetch_uncached(transport: &dyn Transport, base: &str) -> Result<Vec<IndexEntry>> {
        let body = match transport.get(&format!("{}/index.json", base)) {
            Ok(body) => body,
            Err(err) if err.http_status() == Some(404) => {
                debug!(base, "index.json missing, reading directory listing");
                transport.get(&format!("{}/", base))?
            }
            Err(err) => return Err(err),
        };
        parse_index(&String::from_utf8_lossy(&body))
    }
}

/// Parse an index payload, either JSON or an HTML listing.
pub fn parse_index(body: &str) -> Result<Vec<IndexEntry>> {
    let trimmed = body.trim_start();
    let mut entries = if trimmed.starts_with('[') {
        parse_json(trimmed)?
    } else if trimmed.starts_with('<') {
        parse_listing(trimmed)
    } else {
        return Err(malformed("neither JSON nor an HTML listing"));
    };

    entries.sort_by(|a, b| a.version.cmp(&b.version));
    entries.dedup_by(|a, b| a.version == b.version);
    Ok(entries)
}

fn parse_json(body: &str) -> Result<Vec<IndexEntry>> {
    let raw: Vec<RawEntry> =
        serde_json::from_str(body).map_err(|e| malformed(&e.to_string()))?;

    raw.into_iter()
        .map(|entry| {
            Ok(IndexEntry {
                version: Version::parse(&entry.version)?,
                lts: match entry.lts {
                    serde_json::Value::Bool(flag) => flag,
                    serde_json::Value::String(codename) => !codename.is_empty(),
                    _ => false,
                },
                date: entry.date,
            })
        })
        .collect()
}

fn parse_listing(body: &str) -> Vec<IndexEntry> {
    static HREF: OnceLock<Option<Regex>> = OnceLock::new();
    let Some(href) = HREF
        .get_or_init(|| Regex::new(r#"href="v?(\d+(?:\.\d+){1,2})/?""#).ok())
        .as_ref()
    else {
        return Vec::new();
    };

    href.captures_iter(body)
        .filter_map(|caps| Version::parse(&caps[1]).ok())
        .map(|version| IndexEntry {
            version,
            lts: false,
            date: None,
        })
        .collect()
}

fn malformed(message: &str) -> NodeenvError {
    NodeenvError::Parse {
        what: "release index".to_string(),
        message: message.to_string(),
    }
}

/// Format versions for `--list`: eight per line, tab-separated.
pub fn format_version_list(entries: &[IndexEntry]) -> String {
    entries
        .chunks(LIST_COLUMNS)
        .map(|row| {
            let cells: Vec<String> = row.iter().map(|e| e.version.to_string()).collect();
            format!("{}\n", cells.join("\t"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    const INDEX: &str = r#"[
        {"version":"v13.5.0","date":"2019-12-18","lts":false},
        {"version":"v13.4.0","date":"2019-12-17","lts":false},
        {"version":"v12.14.0","date":"2019-12-17","lts":"Erbium"},
        {"version":"v12.13.1","date":"2019-11-19","lts":"Erbium"},
        {"version":"v10.18.0","date":"2019-12-17","lts":"Dubnium"},
        {"version":"v0.11.16","date":"2015-01-30","lts":false},
        {"version":"v0.10.48","date":"2016-10-07","lts":false}
    ]"#;

    struct FakeTransport {
        responses: HashMap<String, Result<Vec<u8>>>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeTransport {
        fn new() -> Self {
            Self {
                responses: HashMap::new(),
                calls: RefCell::new(Vec::new()),
            }
        }

        fn serve(mut self, url: &str, body: &str) -> Self {
            self.responses
                .insert(url.to_string(), Ok(body.as_bytes().to_vec()));
            self
        }
    }

    impl Transport for FakeTransport {
        fn get(&self, url: &str) -> Result<Vec<u8>> {
            self.calls.borrow_mut().push(url.to_string());
            match self.responses.get(url) {
                Some(Ok(body)) => Ok(body.clone()),
                _ => Err(NodeenvError::Network {
                    url: url.to_string(),
                    status: Some(404),
                    message: "HTTP 404".into(),
                }),
            }
        }
    }

    #[test]
    fn parses_json_index_ascending() {
        let entries = parse_index(INDEX).unwrap();
        let versions: Vec<String> = entries.iter().map(|e| e.version.to_string()).collect();
        assert_eq!(
            versions,
            [
                "0.10.48", "0.11.16", "10.18.0", "12.13.1", "12.14.0", "13.4.0", "13.5.0"
            ]
        );
    }

    #[test]
    fn lts_codename_means_lts() {
        let entries = parse_index(INDEX).unwrap();
        let erbium = entries
            .iter()
            .find(|e| e.version == Version::new(12, 14, 0))
            .unwrap();
        assert!(erbium.lts);
        assert_eq!(erbium.date.as_deref(), Some("2019-12-17"));
        assert!(!entries.last().unwrap().lts);
    }

    #[test]
    fn parses_html_listing() {
        let html = r#"<html><body><pre>
            <a href="../">../</a>
            <a href="latest/">latest/</a>
            <a href="v0.10.48/">v0.10.48/</a>
            <a href="v18.0.0/">v18.0.0/</a>
            <a href="v18.0.0/">v18.0.0/</a>
            <a href="index.json">index.json</a>
        </pre></body></html>"#;
        let entries = parse_index(html).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].version, Version::new(18, 0, 0));
        assert!(entries.iter().all(|e| !e.lts));
    }

    #[test]
    fn rejects_malformed_payloads() {
        assert!(matches!(
            parse_index("not an index"),
            Err(NodeenvError::Parse { .. })
        ));
        assert!(matches!(
            parse_index(r#"[{"version": 12}]"#),
            Err(NodeenvError::Parse { .. })
        ));
        assert!(parse_index(r#"[{"version": "vX"}]"#).is_err());
    }

    #[test]
    fn fetch_index_caches_per_base_url() {
        let transport = FakeTransport::new().serve("https://m/dist/index.json", INDEX);
        let mut catalog = VersionCatalog::new();

        assert!(!catalog.is_cached("https://m/dist"));
        assert_eq!(catalog.fetch_index(&transport, "https://m/dist").unwrap().len(), 7);
        assert_eq!(catalog.fetch_index(&transport, "https://m/dist/").unwrap().len(), 7);

        assert!(catalog.is_cached("https://m/dist"));
        assert_eq!(transport.calls.borrow().len(), 1);
    }

    #[test]
    fn fetch_index_falls_back_to_listing_on_404() {
        let transport =
            FakeTransport::new().serve("https://m/dist/", r#"<a href="v16.20.2/">v16.20.2/</a>"#);
        let mut catalog = VersionCatalog::new();

        let entries = catalog.fetch_index(&transport, "https://m/dist").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(
            *transport.calls.borrow(),
            ["https://m/dist/index.json", "https://m/dist/"]
        );
    }

    #[test]
    fn fetch_index_propagates_network_errors() {
        let transport = FakeTransport::new();
        let mut catalog = VersionCatalog::new();
        let err = catalog.fetch_index(&transport, "https://m/dist").unwrap_err();
        assert!(matches!(err, NodeenvError::Network { .. }));
    }

    #[test]
    fn version_list_has_eight_columns() {
        let entries: Vec<IndexEntry> = (0..10)
            .map(|minor| IndexEntry {
                version: Version::new(1, minor, 0),
                lts: false,
                date: None,
            })
            .collect();

        let listing = format_version_list(&entries);
        let lines: Vec<&str> = listing.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].split('\t').count(), 8);
        assert_eq!(lines[1], "1.8.0\t1.9.0");
    }
}
