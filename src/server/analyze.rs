use axum::http::StatusCode;
use tracing::{info, warn};

use crate::element::Element;
use crate::error::AnalyzeError;

use super::models::AnalyzeRequest;
use super::state::ServerState;

#[derive(Debug)]
pub(crate) struct ServerError {
    pub(crate) status: StatusCode,
    pub(crate) message: String,
}

impl ServerError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<AnalyzeError> for ServerError {
    fn from(err: AnalyzeError) -> Self {
        let status = if err.is_decode() {
            StatusCode::UNPROCESSABLE_ENTITY
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

pub(crate) fn analyze_request(
    state: &ServerState,
    request: AnalyzeRequest,
) -> Result<Vec<Element>, ServerError> {
    let Some(image_base64) = request.image_base64 else {
        return Err(ServerError::bad_request("image_base64 is required"));
    };
    match crate::analyze_base64(&image_base64, state.settings.max_input_bytes) {
        Ok(elements) => {
            info!(elements = elements.len(), "analyzed image");
            Ok(elements)
        }
        Err(err) => {
            warn!(error = %err, "analysis failed");
            Err(err.into())
        }
    }
}
