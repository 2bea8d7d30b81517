//! Structural analysis of raw HTML: layout landmarks, repeated
//! classes, broken link/image candidates.

use pagewatch_types::{BrokenElement, BrokenKind, PageStructure};
use scraper::{Html, Selector};
use std::collections::HashMap;
use url::Url;

const ELEMENT_PREVIEW_LEN: usize = 120;

/// Analyze a page's HTML into a [`PageStructure`].
pub fn detect_structure(url: &str, html: &str) -> PageStructure {
    let document = Html::parse_document(html);

    let has = |css: &str| {
        Selector::parse(css)
            .map(|selector| document.select(&selector).next().is_some())
            .unwrap_or(false)
    };

    PageStructure {
        has_header: has("header"),
        has_footer: has("footer"),
        has_nav: has("nav"),
        repeated_classes: repeated_classes(&document),
        broken_links: broken_candidates(url, &document),
    }
}

/// Class names used by five or more elements, sorted.
fn repeated_classes(document: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse("*") else {
        return Vec::new();
    };
    let mut histogram: HashMap<&str, usize> = HashMap::new();
    for element in document.select(&selector) {
        for class in element.value().classes() {
            *histogram.entry(class).or_default() += 1;
        }
    }
    let mut repeated: Vec<String> = histogram
        .into_iter()
        .filter(|(_, count)| *count >= 5)
        .map(|(class, _)| class.to_string())
        .collect();
    repeated.sort();
    repeated
}

fn broken_candidates(page_url: &str, document: &Html) -> Vec<BrokenElement> {
    let mut broken = Vec::new();

    if let Ok(selector) = Selector::parse("img") {
        for img in document.select(&selector) {
            match img.value().attr("src") {
                None => broken.push(BrokenElement {
                    kind: BrokenKind::Image,
                    reason: "missing src".to_string(),
                    element: Some(preview(&img.html())),
                    src: None,
                }),
                Some(src) if src.starts_with("data:") => {}
                Some(src) if src.to_ascii_lowercase().contains("placeholder") => {
                    broken.push(BrokenElement {
                        kind: BrokenKind::Image,
                        reason: "placeholder src".to_string(),
                        element: None,
                        src: Some(absolutize(page_url, src)),
                    });
                }
                Some(_) => {}
            }
        }
    }

    if let Ok(selector) = Selector::parse("a") {
        for anchor in document.select(&selector) {
            if matches!(anchor.value().attr("href"), Some("#") | Some("javascript:void(0)")) {
                broken.push(BrokenElement {
                    kind: BrokenKind::Link,
                    reason: "empty href".to_string(),
                    element: Some(preview(&anchor.html())),
                    src: None,
                });
            }
        }
    }

    broken
}

fn absolutize(page_url: &str, src: &str) -> String {
    Url::parse(page_url)
        .and_then(|base| base.join(src))
        .map(|url| url.to_string())
        .unwrap_or_else(|_| src.to_string())
}

fn preview(html: &str) -> String {
    html.chars().take(ELEMENT_PREVIEW_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_layout_landmarks() {
        let html = "<header>h</header><nav>n</nav><main>body</main>";
        let structure = detect_structure("https://ex.com/", html);
        assert!(structure.has_header);
        assert!(structure.has_nav);
        assert!(!structure.has_footer);
    }

    #[test]
    fn counts_repeated_classes() {
        let html = r#"
            <div class="card">1</div><div class="card">2</div>
            <div class="card">3</div><div class="card">4</div>
            <div class="card">5</div>
            <div class="rare">once</div>
        "#;
        let structure = detect_structure("https://ex.com/", html);
        assert_eq!(structure.repeated_classes, vec!["card"]);
    }

    #[test]
    fn flags_missing_and_placeholder_images() {
        let html = r#"
            <img>
            <img src="data:image/png;base64,AAAA">
            <img src="/assets/placeholder.png">
            <img src="/assets/logo.png">
        "#;
        let structure = detect_structure("https://ex.com/page", html);
        let images: Vec<&BrokenElement> = structure
            .broken_links
            .iter()
            .filter(|b| b.kind == BrokenKind::Image)
            .collect();
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].reason, "missing src");
        assert_eq!(images[1].reason, "placeholder src");
        assert_eq!(
            images[1].src.as_deref(),
            Some("https://ex.com/assets/placeholder.png")
        );
    }

    #[test]
    fn flags_dead_anchors() {
        let html = r##"
            <a href="#">dead</a>
            <a href="javascript:void(0)">also dead</a>
            <a href="/real">fine</a>
        "##;
        let structure = detect_structure("https://ex.com/", html);
        let links: Vec<&BrokenElement> = structure
            .broken_links
            .iter()
            .filter(|b| b.kind == BrokenKind::Link)
            .collect();
        assert_eq!(links.len(), 2);
        assert!(links.iter().all(|l| l.reason == "empty href"));
    }

    #[test]
    fn empty_html_is_all_clear() {
        let structure = detect_structure("https://ex.com/", "");
        assert!(!structure.has_header);
        assert!(structure.repeated_classes.is_empty());
        assert!(structure.broken_links.is_empty());
    }
}
