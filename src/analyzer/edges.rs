use image::{GrayImage, Luma, RgbImage};
use imageproc::definitions::Image;
use imageproc::gradients::{horizontal_sobel, vertical_sobel};

// tan(22.5°) and tan(67.5°)
const TAN_22_5: f32 = 0.414_213_56;
const TAN_67_5: f32 = 2.414_213_6;

const EDGE: u8 = 255;

/// Canny edge map over all three channels of `image`.
///
/// Each pixel takes the 3x3 Sobel gradient of whichever channel has the
/// largest `|gx| + |gy|`. There is no smoothing pass, so one-pixel lines and
/// colour-only boundaries keep their full gradient. Pixels above `high` seed
/// edges, which grow through 8-connected neighbours above `low`.
pub(crate) fn canny_rgb(image: &RgbImage, low: f32, high: f32) -> GrayImage {
    let (width, height) = image.dimensions();
    let mut edges = GrayImage::new(width, height);
    if width == 0 || height == 0 {
        return edges;
    }

    let gradients = strongest_channel_gradients(image);
    let magnitude = |x: i64, y: i64| -> f32 {
        if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
            return 0.0;
        }
        gradients[(y as u32 * width + x as u32) as usize].2
    };

    // 0 = suppressed, 1 = weak, 2 = strong
    let mut state = vec![0u8; (width * height) as usize];
    let mut stack = Vec::new();
    for y in 0..height {
        for x in 0..width {
            let idx = (y * width + x) as usize;
            let (gx, gy, m) = gradients[idx];
            if m <= low {
                continue;
            }
            let (xi, yi) = (x as i64, y as i64);
            let (ax, ay) = (gx.abs(), gy.abs());
            let is_peak = if ay < ax * TAN_22_5 {
                m > magnitude(xi - 1, yi) && m >= magnitude(xi + 1, yi)
            } else if ay > ax * TAN_67_5 {
                m > magnitude(xi, yi - 1) && m >= magnitude(xi, yi + 1)
            } else {
                let s = if (gx < 0.0) != (gy < 0.0) { -1 } else { 1 };
                m > magnitude(xi - s, yi - 1) && m > magnitude(xi + s, yi + 1)
            };
            if !is_peak {
                continue;
            }
            if m > high {
                state[idx] = 2;
                stack.push((x, y));
            } else {
                state[idx] = 1;
            }
        }
    }

    while let Some((x, y)) = stack.pop() {
        edges.put_pixel(x, y, Luma([EDGE]));
        for ny in y.saturating_sub(1)..=(y + 1).min(height - 1) {
            for nx in x.saturating_sub(1)..=(x + 1).min(width - 1) {
                let idx = (ny * width + nx) as usize;
                if state[idx] == 1 {
                    state[idx] = 2;
                    stack.push((nx, ny));
                }
            }
        }
    }
    edges
}

/// `(gx, gy, |gx| + |gy|)` per pixel, taken from the channel with the
/// largest magnitude. Ties go to the earliest channel.
fn strongest_channel_gradients(image: &RgbImage) -> Vec<(f32, f32, f32)> {
    let (width, height) = image.dimensions();
    let per_channel: Vec<(Image<Luma<i16>>, Image<Luma<i16>>)> = (0..3)
        .map(|channel| {
            let plane =
                GrayImage::from_fn(width, height, |x, y| Luma([image.get_pixel(x, y)[channel]]));
            (horizontal_sobel(&plane), vertical_sobel(&plane))
        })
        .collect();

    let mut gradients = Vec::with_capacity((width * height) as usize);
    for y in 0..height {
        for x in 0..width {
            let mut best = (0.0f32, 0.0f32, 0.0f32);
            for (gx_plane, gy_plane) in &per_channel {
                let gx = gx_plane.get_pixel(x, y)[0] as f32;
                let gy = gy_plane.get_pixel(x, y)[0] as f32;
                let m = gx.abs() + gy.abs();
                if m > best.2 {
                    best = (gx, gy, m);
                }
            }
            gradients.push(best);
        }
    }
    gradients
}
