use serde::Serialize;

use crate::element::Element;
use crate::error::AnalyzeError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Renders the element array, or the `{"error": ...}` object, as one JSON document.
pub fn render_result(result: &Result<Vec<Element>, AnalyzeError>, pretty: bool) -> String {
    let rendered = match result {
        Ok(elements) => to_json(elements, pretty),
        Err(err) => to_json(
            &ErrorResponse {
                error: err.to_string(),
            },
            pretty,
        ),
    };
    rendered.unwrap_or_else(|err| {
        serde_json::json!({ "error": format!("failed to serialize output: {}", err) }).to_string()
    })
}

fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}
