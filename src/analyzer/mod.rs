mod classify;
mod color;
mod contours;
mod edges;
mod geom;
mod regions;

use image::RgbImage;
use imageproc::filter::gaussian_blur_f32;
use tracing::debug;

use contours::{all_contours, external_contours};

use crate::element::Element;
use crate::error::AnalyzeError;

pub use regions::{Region, RegionGroup, accept_regions, group_regions, min_area};

const CANNY_LOW: f32 = 100.0;
const CANNY_HIGH: f32 = 200.0;
// sigma a 21x21 kernel gets when none is given: 0.3 * ((21 - 1) / 2 - 1) + 0.8
const RESIDUAL_BLUR_SIGMA: f32 = 3.5;

/// Runs the whole layout analysis on a decoded image.
pub fn analyze(image: &RgbImage) -> Result<Vec<Element>, AnalyzeError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(AnalyzeError::processing(format!(
            "image has zero dimensions ({}x{})",
            width, height
        )));
    }

    let masks = color::build_masks(image);
    let light_contours = all_contours(&masks.light);
    let dark_contours = external_contours(&masks.dark);
    debug!(
        light = light_contours.len(),
        dark = dark_contours.len(),
        "extracted mask contours"
    );

    let candidates = regions::region_candidates(
        light_contours.iter().map(Vec::as_slice),
        min_area(width, height),
    );
    let text_regions = accept_regions(candidates);
    let groups = group_regions(text_regions);
    debug!(groups = groups.len(), "grouped text regions");

    let dark_area: f64 = dark_contours
        .iter()
        .map(|contour| geom::contour_area(contour))
        .sum();

    let edge_map = edges::canny_rgb(image, CANNY_LOW, CANNY_HIGH);
    let edge_contours = external_contours(&edge_map);
    debug!(edges = edge_contours.len(), "extracted edge contours");

    let residual_mean = gradient_residual_mean(image);

    Ok(classify::classify(&classify::Evidence {
        width,
        height,
        groups: &groups,
        dark_area,
        edge_contours: &edge_contours,
        residual_mean,
    }))
}

/// Mean over all channels of `blur(image) - image`, saturating at zero.
fn gradient_residual_mean(image: &RgbImage) -> f64 {
    let blurred = gaussian_blur_f32(image, RESIDUAL_BLUR_SIGMA);
    let samples = image.as_raw().len();
    if samples == 0 {
        return 0.0;
    }
    let total: u64 = blurred
        .as_raw()
        .iter()
        .zip(image.as_raw())
        .map(|(blur, orig)| blur.saturating_sub(*orig) as u64)
        .sum();
    total as f64 / samples as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::MainTextPosition;
    use image::Rgb;

    fn black_with_white_rect(size: u32, x0: u32, y0: u32, w: u32, h: u32) -> RgbImage {
        let mut image = RgbImage::from_pixel(size, size, Rgb([0, 0, 0]));
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                image.put_pixel(x, y, Rgb([255, 255, 255]));
            }
        }
        image
    }

    #[test]
    fn zero_sized_image_is_a_processing_error() {
        let err = analyze(&RgbImage::new(0, 0)).unwrap_err();
        assert!(matches!(err, AnalyzeError::Processing(_)));
    }

    #[test]
    fn flat_image_has_no_residual() {
        let image = RgbImage::from_pixel(40, 40, Rgb([90, 90, 90]));
        assert!(gradient_residual_mean(&image) < 1.0);
    }

    #[test]
    fn dark_background_is_one_external_contour() {
        let image = black_with_white_rect(100, 40, 45, 20, 10);
        let masks = color::build_masks(&image);
        let dark = external_contours(&masks.dark);
        assert_eq!(dark.len(), 1);
        let area = geom::contour_area(&dark[0]);
        assert!(area > 9000.0 && area < 10000.0, "area = {}", area);
    }

    #[test]
    fn light_rect_yields_one_region() {
        let image = black_with_white_rect(100, 40, 45, 20, 10);
        let masks = color::build_masks(&image);
        let contours = all_contours(&masks.light);
        let regions = regions::region_candidates(
            contours.iter().map(Vec::as_slice),
            min_area(100, 100),
        );
        assert_eq!(regions.len(), 1);
        assert_eq!(
            (regions[0].x, regions[0].y, regions[0].width, regions[0].height),
            (40, 45, 20, 10)
        );
        assert_eq!(regions[0].center_y, 50.0);
    }

    #[test]
    fn all_black_image_is_background() {
        let image = RgbImage::from_pixel(100, 100, Rgb([0, 0, 0]));
        let elements = analyze(&image).expect("analysis");
        assert_eq!(elements.len(), 1);
        match &elements[0] {
            Element::Background { coverage, .. } => assert_eq!(coverage, "98.0%"),
            other => panic!("expected background, got {:?}", other),
        }
    }

    #[test]
    fn all_white_image_is_one_side_text_block() {
        let image = RgbImage::from_pixel(100, 100, Rgb([255, 255, 255]));
        let elements = analyze(&image).expect("analysis");
        assert_eq!(elements, vec![Element::main_text(MainTextPosition::Side)]);
    }

    #[test]
    fn full_width_band_is_text_over_background() {
        let image = black_with_white_rect(100, 0, 40, 100, 20);
        let elements = analyze(&image).expect("analysis");
        let kinds: Vec<&str> = elements.iter().map(Element::kind).collect();
        assert_eq!(kinds, vec!["texto_principal", "fundo"]);
        match &elements[1] {
            Element::Background { coverage, .. } => assert_eq!(coverage, "77.2%"),
            other => panic!("expected background, got {:?}", other),
        }
    }
}
