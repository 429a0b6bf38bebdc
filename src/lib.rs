use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

pub mod analyzer;
pub mod decode;
pub mod element;
pub mod error;
pub mod logging;
pub mod output;
pub mod server;
pub mod settings;

pub use analyzer::analyze;
pub use element::Element;
pub use error::{AnalyzeError, DecodeError};

/// One-shot invocation options, filled from the command line.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub data: Option<String>,
    pub settings_path: Option<String>,
    pub pretty: bool,
}

/// Decodes base64 image text and analyzes it.
pub fn analyze_base64(input: &str, max_bytes: usize) -> Result<Vec<Element>, AnalyzeError> {
    let image = decode::decode_base64_image(input, max_bytes)?;
    analyze(&image)
}

/// Analyzes raw encoded image bytes (no base64 layer).
pub fn analyze_bytes(bytes: &[u8], max_bytes: usize) -> Result<Vec<Element>, AnalyzeError> {
    let image = decode::decode_image_bytes(bytes, max_bytes)?;
    analyze(&image)
}

/// Runs one analysis and returns the JSON line to print. Analysis failures
/// become the error object; only setup failures (settings, unreadable
/// `--data` file) are returned as `Err`.
pub fn run(config: Config, input: Option<String>) -> Result<String> {
    let settings_path = config.settings_path.as_deref().map(Path::new);
    let settings = settings::load_settings(settings_path)?;

    let result = match config.data.as_deref() {
        Some(path) => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("failed to read image file: {}", path))?;
            analyze_bytes(&bytes, settings.max_input_bytes)
        }
        None => analyze_base64(input.as_deref().unwrap_or_default(), settings.max_input_bytes),
    };

    match &result {
        Ok(elements) => info!(elements = elements.len(), "analysis finished"),
        Err(err) => warn!(error = %err, "analysis failed"),
    }
    Ok(output::render_result(&result, config.pretty))
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn png_bytes(image: &RgbImage) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        image
            .write_to(&mut buffer, ImageFormat::Png)
            .expect("encode png");
        buffer.into_inner()
    }

    #[test]
    fn run_reads_raw_image_from_data_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("gray.png");
        let image = RgbImage::from_pixel(32, 32, Rgb([128, 128, 128]));
        std::fs::write(&path, png_bytes(&image)).expect("write png");

        let output = run(
            Config {
                data: Some(path.to_string_lossy().to_string()),
                ..Config::default()
            },
            None,
        )
        .expect("run");
        assert_eq!(output, "[]");
    }

    #[test]
    fn run_reports_missing_input_as_error_object() {
        let output = run(Config::default(), None).expect("run");
        assert_eq!(output, r#"{"error":"input is empty"}"#);
    }

    #[test]
    fn run_fails_on_unreadable_data_path() {
        let config = Config {
            data: Some("/definitely/not/here.png".to_string()),
            ..Config::default()
        };
        assert!(run(config, None).is_err());
    }

    #[test]
    fn base64_and_bytes_agree() {
        let image = RgbImage::from_pixel(20, 20, Rgb([10, 10, 10]));
        let bytes = png_bytes(&image);
        let from_bytes = analyze_bytes(&bytes, decode::DEFAULT_MAX_BYTES).expect("bytes");
        let from_base64 =
            analyze_base64(&BASE64.encode(&bytes), decode::DEFAULT_MAX_BYTES).expect("base64");
        assert_eq!(from_bytes, from_base64);
    }
}
