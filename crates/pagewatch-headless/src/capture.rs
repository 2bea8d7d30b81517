//! CDP event conversion and in-page capture scripts.

use chromiumoxide::cdp::browser_protocol::accessibility::{
    AxNode as CdpAxNode, AxNodeId, AxValue, GetFullAxTreeParams,
};
use chromiumoxide::cdp::browser_protocol::network::{
    EventLoadingFailed, EventRequestWillBeSent, RequestId,
};
use chromiumoxide::cdp::js_protocol::runtime::{EventConsoleApiCalled, RemoteObject};
use chromiumoxide::Page;
use pagewatch_types::{AxNode, ConsoleLog, DomMetrics, NetworkFailure, PerformanceRecord};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Request metadata indexed by CDP request id, so loading failures can
/// be joined back to the URL and method that failed.
pub type RequestIndex = Arc<Mutex<HashMap<RequestId, (String, String)>>>;

const PERFORMANCE_SCRIPT: &str = r#"
    (() => {
        const nav = performance.getEntriesByType('navigation')[0];
        const paint = performance.getEntriesByType('paint');
        return {
            navigation: nav ? nav.toJSON() : {},
            paint: paint.map(entry => entry.toJSON()),
        };
    })()
"#;

const DOM_METRICS_SCRIPT: &str = r#"
    (() => ({
        nodeCount: document.getElementsByTagName('*').length,
        inputCount: document.querySelectorAll('input,select,textarea').length,
        buttonCount: document.querySelectorAll('button,[role="button"],input[type="submit"]').length,
        imgCount: document.querySelectorAll('img').length,
        linkCount: document.querySelectorAll('a').length,
    }))()
"#;

/// Convert a console-API event into a log record.
pub fn console_log_from_event(event: &EventConsoleApiCalled) -> ConsoleLog {
    let kind = serde_json::to_value(&event.r#type)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_else(|| "log".to_string());

    let text = event
        .args
        .iter()
        .map(remote_object_text)
        .collect::<Vec<_>>()
        .join(" ");

    let location = event.stack_trace.as_ref().and_then(|trace| {
        trace
            .call_frames
            .first()
            .map(|frame| format!("{}:{}", frame.url, frame.line_number))
    });

    ConsoleLog {
        kind,
        text,
        location,
    }
}

fn remote_object_text(object: &RemoteObject) -> String {
    if let Some(value) = &object.value {
        match value.as_str() {
            Some(text) => text.to_string(),
            None => value.to_string(),
        }
    } else {
        object.description.clone().unwrap_or_default()
    }
}

/// Record a request's URL and method for later failure joining.
pub fn index_request(index: &RequestIndex, event: &EventRequestWillBeSent) {
    if let Ok(mut index) = index.lock() {
        index.insert(
            event.request_id.clone(),
            (event.request.url.clone(), event.request.method.clone()),
        );
    }
}

/// Join a loading failure with its originating request.
pub fn network_failure_from_event(
    index: &RequestIndex,
    event: &EventLoadingFailed,
) -> NetworkFailure {
    let (url, method) = index
        .lock()
        .ok()
        .and_then(|index| index.get(&event.request_id).cloned())
        .unwrap_or_default();

    let resource_type = serde_json::to_value(&event.r#type)
        .ok()
        .and_then(|v| v.as_str().map(|s| s.to_ascii_lowercase()))
        .unwrap_or_default();

    NetworkFailure {
        url,
        method,
        failure: event.error_text.clone(),
        resource_type,
    }
}

/// Navigation and paint entries; empty record when evaluation fails.
pub async fn performance_entries(page: &Page) -> PerformanceRecord {
    match page.evaluate(PERFORMANCE_SCRIPT).await {
        Ok(result) => result.into_value().unwrap_or_default(),
        Err(err) => {
            debug!(error = %err, "performance capture failed");
            PerformanceRecord::default()
        }
    }
}

/// Element counts; zeroed metrics when evaluation fails.
pub async fn dom_metrics(page: &Page) -> DomMetrics {
    match page.evaluate(DOM_METRICS_SCRIPT).await {
        Ok(result) => result.into_value().unwrap_or_default(),
        Err(err) => {
            debug!(error = %err, "dom metrics capture failed");
            DomMetrics::default()
        }
    }
}

/// Snapshot the accessibility tree as a recursive `{role, name,
/// children}` record. `None` when the snapshot fails or is empty.
pub async fn accessibility_tree(page: &Page) -> Option<AxNode> {
    let response = match page.execute(GetFullAxTreeParams::default()).await {
        Ok(response) => response,
        Err(err) => {
            debug!(error = %err, "accessibility snapshot failed");
            return None;
        }
    };

    let nodes = &response.result.nodes;
    let by_id: HashMap<&AxNodeId, &CdpAxNode> =
        nodes.iter().map(|node| (&node.node_id, node)).collect();
    let root = nodes.first()?;
    collect_nodes(root, &by_id).into_iter().next()
}

/// Convert one CDP node (and its subtree). Ignored nodes disappear and
/// their children are hoisted, matching what assistive tech sees.
fn collect_nodes(node: &CdpAxNode, by_id: &HashMap<&AxNodeId, &CdpAxNode>) -> Vec<AxNode> {
    let children: Vec<AxNode> = node
        .child_ids
        .iter()
        .flatten()
        .filter_map(|id| by_id.get(id).copied())
        .flat_map(|child| collect_nodes(child, by_id))
        .collect();

    if node.ignored {
        return children;
    }

    vec![AxNode {
        role: ax_value_string(&node.role),
        name: ax_value_string(&node.name),
        children,
    }]
}

fn ax_value_string(value: &Option<AxValue>) -> Option<String> {
    let value = value.as_ref()?.value.as_ref()?;
    match value.as_str() {
        Some(text) => Some(text.to_string()),
        None => Some(value.to_string()),
    }
}
