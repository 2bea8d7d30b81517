//! URL normalization, validation, and internality classification.
//!
//! Normalization contract: strip the fragment, resolve relative paths
//! against a base, default the scheme to https, drop default ports,
//! default the path to "/", preserve the query verbatim, case-fold
//! scheme and host but never path or query. The operation is
//! idempotent.

use url::Url;

/// Normalize a URL, resolving it against `base` when relative.
///
/// Returns the input unchanged when it cannot be parsed; an empty input
/// stays empty. Never panics.
pub fn normalize_url(raw: &str, base: Option<&str>) -> String {
    let trimmed = raw.split('#').next().unwrap_or("").trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let parsed = if has_http_scheme(trimmed) {
        Url::parse(trimmed)
    } else if let Some(base) = base {
        Url::parse(base).and_then(|b| b.join(trimmed))
    } else {
        Url::parse(&format!("https://{trimmed}"))
    };

    match parsed {
        Ok(mut url) => {
            url.set_fragment(None);
            url.to_string()
        }
        Err(_) => trimmed.to_string(),
    }
}

/// Scheme check tolerant of mixed case, like `HTTPS://Host/`.
fn has_http_scheme(input: &str) -> bool {
    let lower = input
        .get(..8)
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Host of a URL with any leading `www.` removed.
///
/// Accepts bare domains (`example.com`) as well as full URLs.
pub fn extract_domain(input: &str) -> String {
    let with_scheme = if has_http_scheme(input) {
        input.to_string()
    } else {
        format!("https://{input}")
    };

    Url::parse(&with_scheme)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .map(|host| host.strip_prefix("www.").unwrap_or(&host).to_string())
        .unwrap_or_default()
}

/// True for absolute http/https URLs with a host.
pub fn is_valid_url(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

/// True iff `url`'s host equals the target host or is a subdomain of
/// it. `www.` is stripped from both sides before comparison.
pub fn is_internal_url(url: &str, target: &str) -> bool {
    let url_domain = extract_domain(url);
    let target_domain = extract_domain(target);
    if url_domain.is_empty() || target_domain.is_empty() {
        return false;
    }
    url_domain == target_domain || url_domain.ends_with(&format!(".{target_domain}"))
}

/// Human-readable status tag: `[200]`, `[404]`, or `[UNKNOWN]` when no
/// status was obtained.
pub fn status_tag(status: Option<u16>) -> String {
    match status {
        Some(code) if code != 0 => format!("[{code}]"),
        _ => "[UNKNOWN]".to_string(),
    }
}
