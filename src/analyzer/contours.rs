use image::GrayImage;
use imageproc::contours::{Contour, find_contours};
use imageproc::point::Point;

use super::geom;

/// Traces every border of a binary mask, treating pixels outside the image
/// as background so regions touching the frame still get an outer border.
fn trace(mask: &GrayImage) -> Vec<Contour<i32>> {
    let (width, height) = mask.dimensions();
    let mut padded = GrayImage::new(width + 2, height + 2);
    image::imageops::replace(&mut padded, mask, 1, 1);
    find_contours::<i32>(&padded)
        .into_iter()
        .map(|mut contour| {
            for point in &mut contour.points {
                point.x -= 1;
                point.y -= 1;
            }
            contour
        })
        .collect()
}

/// All borders, holes included, in retrieval order.
pub(crate) fn all_contours(mask: &GrayImage) -> Vec<Vec<Point<i32>>> {
    trace(mask)
        .into_iter()
        .map(|contour| geom::simplify_chain(&contour.points))
        .collect()
}

/// Outermost borders only.
pub(crate) fn external_contours(mask: &GrayImage) -> Vec<Vec<Point<i32>>> {
    trace(mask)
        .into_iter()
        .filter(|contour| contour.parent.is_none())
        .map(|contour| geom::simplify_chain(&contour.points))
        .collect()
}
