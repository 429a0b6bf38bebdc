use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub(crate) struct AnalyzeRequest {
    pub(crate) image_base64: Option<String>,
}
