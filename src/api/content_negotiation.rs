use axum::http::{header::ACCEPT, HeaderMap};

/// Media ranges the read endpoints can answer with.
const ACCEPTED_RANGES: [&str; 7] = [
    "*/*",
    "application/*",
    "application/json",
    "application/hal+json",
    "text/*",
    "text/html",
    "application/xhtml+xml",
];

/// Whether the `Accept` header allows a JSON or HTML response. A missing or
/// unreadable header accepts anything.
pub fn accepts_json_or_html(headers: &HeaderMap) -> bool {
    let Some(accept) = headers.get(ACCEPT).and_then(|value| value.to_str().ok()) else {
        return true;
    };
    if accept.trim().is_empty() {
        return true;
    }

    accept.split(',').any(|range| {
        let mut parts = range.split(';');
        let media_type = parts.next().unwrap_or_default().trim().to_ascii_lowercase();
        let refused = parts.any(|param| {
            let param = param.trim().replace(' ', "");
            param == "q=0" || param == "q=0.0" || param == "q=0.00" || param == "q=0.000"
        });
        !refused && ACCEPTED_RANGES.contains(&media_type.as_str())
    })
}
