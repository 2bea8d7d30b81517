//! Heuristic page-role classification.

use pagewatch_types::{DomMetrics, PageType};
use scraper::{Html, Selector};

/// Classify a page from its HTML and browser-observed DOM metrics.
///
/// Rules apply in order; the first match wins:
/// 1. password input, or form + ≥3 inputs + button → login
/// 2. chart elements or "dashboard" in text → dashboard
/// 3. table + list + few inputs → list
/// 4. form + ≥2 inputs + button → form
/// 5. wizard steps → wizard
/// 6. chart + table → report
/// 7. otherwise unknown
pub fn classify(html: &str, metrics: &DomMetrics) -> PageType {
    let document = Html::parse_document(html);
    let count = |css: &str| {
        Selector::parse(css)
            .map(|selector| document.select(&selector).count())
            .unwrap_or(0)
    };

    let inputs = metrics.input_count;
    let buttons = metrics.button_count;
    let tables = count("table");
    let forms = count("form");
    let lists = count("ul") + count("ol");
    let charts = count("canvas") + count("svg");
    let steps = count("[role='tablist'] .step, .wizard-step, .step");
    let wizards = count(".wizard");
    let password_inputs = count("input[type='password']");

    if password_inputs >= 1 || (forms >= 1 && inputs >= 3 && buttons >= 1) {
        return PageType::Login;
    }
    if charts >= 1 || page_text_contains(&document, "dashboard") {
        return PageType::Dashboard;
    }
    if tables >= 1 && lists >= 1 && inputs < 5 {
        return PageType::List;
    }
    if forms >= 1 && inputs >= 2 && buttons >= 1 {
        return PageType::Form;
    }
    if steps >= 1 || wizards >= 1 {
        return PageType::Wizard;
    }
    if charts >= 1 && tables >= 1 {
        return PageType::Report;
    }
    PageType::Unknown
}

fn page_text_contains(document: &Html, needle: &str) -> bool {
    document
        .root_element()
        .text()
        .any(|chunk| chunk.to_ascii_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(inputs: u64, buttons: u64) -> DomMetrics {
        DomMetrics {
            input_count: inputs,
            button_count: buttons,
            ..DomMetrics::default()
        }
    }

    #[test]
    fn password_input_means_login() {
        let html = r#"<form><input type="password"/></form>"#;
        assert_eq!(classify(html, &metrics(1, 0)), PageType::Login);
    }

    #[test]
    fn form_with_three_inputs_and_button_means_login() {
        let html = r#"<form><input/><input/><input/><button>Go</button></form>"#;
        assert_eq!(classify(html, &metrics(3, 1)), PageType::Login);
    }

    #[test]
    fn charts_or_dashboard_text_mean_dashboard() {
        assert_eq!(
            classify("<canvas></canvas>", &metrics(0, 0)),
            PageType::Dashboard
        );
        assert_eq!(
            classify("<h1>Sales Dashboard</h1>", &metrics(0, 0)),
            PageType::Dashboard
        );
    }

    #[test]
    fn table_plus_list_with_few_inputs_means_list() {
        let html = "<table></table><ul><li>a</li></ul>";
        assert_eq!(classify(html, &metrics(0, 0)), PageType::List);
    }

    #[test]
    fn two_inputs_with_button_means_form() {
        let html = "<form><input/><input/><button>Send</button></form>";
        assert_eq!(classify(html, &metrics(2, 1)), PageType::Form);
    }

    #[test]
    fn wizard_steps_mean_wizard() {
        let html = r#"<div class="wizard-step">1</div>"#;
        assert_eq!(classify(html, &metrics(0, 0)), PageType::Wizard);
        let html = r#"<div class="wizard">steps</div>"#;
        assert_eq!(classify(html, &metrics(0, 0)), PageType::Wizard);
    }

    #[test]
    fn plain_page_is_unknown() {
        assert_eq!(classify("<p>hello</p>", &metrics(0, 0)), PageType::Unknown);
    }

    #[test]
    fn rule_order_prefers_login_over_form() {
        // Satisfies rule 1 and rule 4; rule 1 wins.
        let html = r#"<form><input/><input/><input/><button>x</button></form>"#;
        assert_eq!(classify(html, &metrics(3, 1)), PageType::Login);
    }
}
