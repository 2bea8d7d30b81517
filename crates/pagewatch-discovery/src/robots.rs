//! Robots directives and sitemap XML parsing.

use pagewatch_utils::http::{HttpClientFactory, HttpConfig};
use tracing::{debug, warn};
use xml::reader::{EventReader, XmlEvent};

/// Paths named by `Allow:`/`Disallow:` lines in `<origin>/robots.txt`.
///
/// Empty paths and the bare root are skipped. Any fetch or parse
/// problem yields an empty list.
pub fn robots_paths(base: &str, timeout_secs: u64) -> Vec<String> {
    let body = match fetch_text(&format!("{base}/robots.txt"), timeout_secs) {
        Some(body) => body,
        None => return Vec::new(),
    };
    parse_robots(&body)
}

/// Extract rule paths from robots.txt content.
pub fn parse_robots(content: &str) -> Vec<String> {
    let mut paths = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        let value = if let Some(rest) = line.strip_prefix("Disallow:") {
            rest
        } else if let Some(rest) = line.strip_prefix("Allow:") {
            rest
        } else {
            continue;
        };
        let path = value.trim();
        if !path.is_empty() && path != "/" {
            paths.push(path.to_string());
        }
    }
    paths
}

/// URLs from `<origin>/sitemap.xml`, following one level of
/// sitemap-index nesting.
pub fn sitemap_urls(base: &str, timeout_secs: u64) -> Vec<String> {
    let body = match fetch_text(&format!("{base}/sitemap.xml"), timeout_secs) {
        Some(body) => body,
        None => return Vec::new(),
    };

    let document = match parse_sitemap(&body) {
        Some(document) => document,
        None => {
            debug!("could not parse sitemap XML");
            return Vec::new();
        }
    };

    if !document.is_index {
        return document.locations;
    }

    // Sitemap index: each loc is itself a sitemap.
    let mut urls = Vec::new();
    for nested in document.locations {
        let Some(nested_body) = fetch_text(&nested, timeout_secs) else {
            continue;
        };
        if let Some(nested_document) = parse_sitemap(&nested_body) {
            urls.extend(nested_document.locations);
        }
    }
    urls
}

/// Parsed sitemap document: its `loc` values and whether the root
/// element was a `sitemapindex`.
#[derive(Debug, Default)]
pub struct SitemapDocument {
    pub is_index: bool,
    pub locations: Vec<String>,
}

/// Walk a sitemap document, collecting `loc` text. Returns `None` on
/// malformed XML.
pub fn parse_sitemap(content: &str) -> Option<SitemapDocument> {
    let parser = EventReader::from_str(content);
    let mut document = SitemapDocument::default();
    let mut saw_root = false;
    let mut in_loc = false;

    for event in parser {
        match event {
            Ok(XmlEvent::StartElement { name, .. }) => {
                if !saw_root {
                    saw_root = true;
                    document.is_index = name.local_name == "sitemapindex";
                }
                in_loc = name.local_name == "loc";
            }
            Ok(XmlEvent::Characters(text)) => {
                if in_loc {
                    let text = text.trim();
                    if !text.is_empty() {
                        document.locations.push(text.to_string());
                    }
                }
            }
            Ok(XmlEvent::EndElement { .. }) => {
                in_loc = false;
            }
            Ok(_) => {}
            Err(err) => {
                debug!(error = %err, "sitemap parse error");
                return None;
            }
        }
    }
    Some(document)
}

fn fetch_text(url: &str, timeout_secs: u64) -> Option<String> {
    let client = match HttpClientFactory::blocking_client(&HttpConfig::discovery(timeout_secs)) {
        Ok(client) => client,
        Err(err) => {
            warn!(error = %err, "could not build client");
            return None;
        }
    };
    match client.get(url).send() {
        Ok(response) if response.status().is_success() => response.text().ok(),
        Ok(response) => {
            debug!(url = %url, status = %response.status(), "skipped");
            None
        }
        Err(err) => {
            debug!(url = %url, error = %err, "fetch failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn robots_rules_yield_paths() {
        let content = "User-agent: *\nDisallow: /admin\nAllow: /public\nDisallow: /\nDisallow:\n# comment\n";
        let paths = parse_robots(content);
        assert_eq!(paths, vec!["/admin", "/public"]);
    }

    #[test]
    fn plain_sitemap_parses_locations() {
        let content = r#"<?xml version="1.0" encoding="UTF-8"?>
            <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
              <url><loc>https://example.com/</loc><priority>1.0</priority></url>
              <url><loc>https://example.com/about</loc></url>
            </urlset>"#;
        let document = parse_sitemap(content).expect("parse");
        assert!(!document.is_index);
        assert_eq!(
            document.locations,
            vec!["https://example.com/", "https://example.com/about"]
        );
    }

    #[test]
    fn sitemap_index_is_recognized() {
        let content = r#"<?xml version="1.0"?>
            <sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
              <sitemap><loc>https://example.com/sitemap-posts.xml</loc></sitemap>
            </sitemapindex>"#;
        let document = parse_sitemap(content).expect("parse");
        assert!(document.is_index);
        assert_eq!(document.locations, vec!["https://example.com/sitemap-posts.xml"]);
    }

    #[test]
    fn malformed_xml_is_discarded() {
        assert!(parse_sitemap("<urlset><loc>broken").is_none());
    }

    #[tokio::test]
    async fn sitemap_index_fetches_nested_documents() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        let base = server.uri();

        Mock::given(method("GET"))
            .and(path("/sitemap.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(format!(
                r#"<sitemapindex><sitemap><loc>{base}/sitemap-a.xml</loc></sitemap></sitemapindex>"#
            )))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/sitemap-a.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<urlset><url><loc>https://example.com/deep</loc></url></urlset>"#,
            ))
            .mount(&server)
            .await;

        let urls = tokio::task::spawn_blocking(move || sitemap_urls(&base, 5))
            .await
            .expect("task");
        assert_eq!(urls, vec!["https://example.com/deep"]);
    }
}
