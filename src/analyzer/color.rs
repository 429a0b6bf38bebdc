use image::{GrayImage, Luma, RgbImage};
use imageproc::distance_transform::Norm;
use imageproc::morphology;

const LIGHT_MAX_SATURATION: u8 = 30;
const LIGHT_MIN_VALUE: u8 = 180;
const DARK_MAX_VALUE: u8 = 50;

/// 8-bit HSV triple: hue in `0..180` (degrees halved), saturation and value in `0..=255`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Hsv {
    pub(crate) h: u8,
    pub(crate) s: u8,
    pub(crate) v: u8,
}

pub(crate) fn rgb_to_hsv(r: u8, g: u8, b: u8) -> Hsv {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = (max - min) as f32;
    let v = max;
    let s = if max == 0 {
        0
    } else {
        (255.0 * delta / max as f32).round() as u8
    };
    let h = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (g as f32 - b as f32) / delta
    } else if max == g {
        120.0 + 60.0 * (b as f32 - r as f32) / delta
    } else {
        240.0 + 60.0 * (r as f32 - g as f32) / delta
    };
    let h = if h < 0.0 { h + 360.0 } else { h };
    Hsv {
        h: ((h / 2.0).round() as u32 % 180) as u8,
        s,
        v,
    }
}

pub(crate) struct Masks {
    pub(crate) light: GrayImage,
    pub(crate) dark: GrayImage,
}

/// Builds the light (near-white) and dark masks. The light mask is closed
/// then opened with a 3x3 square to drop speckles and fill pinholes.
pub(crate) fn build_masks(image: &RgbImage) -> Masks {
    let (width, height) = image.dimensions();
    let mut light = GrayImage::new(width, height);
    let mut dark = GrayImage::new(width, height);
    for (x, y, pixel) in image.enumerate_pixels() {
        let [r, g, b] = pixel.0;
        let hsv = rgb_to_hsv(r, g, b);
        if is_light(hsv) {
            light.put_pixel(x, y, Luma([255]));
        }
        if is_dark(hsv) {
            dark.put_pixel(x, y, Luma([255]));
        }
    }
    let light = morphology::close(&light, Norm::LInf, 1);
    let light = morphology::open(&light, Norm::LInf, 1);
    Masks { light, dark }
}

fn is_light(hsv: Hsv) -> bool {
    hsv.s <= LIGHT_MAX_SATURATION && hsv.v >= LIGHT_MIN_VALUE
}

fn is_dark(hsv: Hsv) -> bool {
    hsv.v <= DARK_MAX_VALUE
}
