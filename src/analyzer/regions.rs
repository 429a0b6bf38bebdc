use imageproc::point::Point;

use super::geom::{PixelBox, bounding_box, contour_area};

const MIN_AREA_RATIO: f64 = 0.001;
const GROUP_GAP_FACTOR: f64 = 1.5;

/// Bounding box and area of one accepted light contour.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub area: f64,
    pub center_y: f64,
}

impl Region {
    pub(crate) fn new(bbox: PixelBox, area: f64) -> Self {
        Region {
            x: bbox.x,
            y: bbox.y,
            width: bbox.width,
            height: bbox.height,
            area,
            center_y: bbox.y as f64 + bbox.height as f64 / 2.0,
        }
    }

    fn bbox(&self) -> PixelBox {
        PixelBox {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}

pub type RegionGroup = Vec<Region>;

/// Smallest contour area considered, proportional to the image size.
pub fn min_area(width: u32, height: u32) -> f64 {
    width as f64 * height as f64 * MIN_AREA_RATIO
}

/// Turns contours (in retrieval order) into region candidates, skipping those
/// at or below `min_area`.
pub(crate) fn region_candidates<'a, I>(contours: I, min_area: f64) -> Vec<Region>
where
    I: IntoIterator<Item = &'a [Point<i32>]>,
{
    contours
        .into_iter()
        .filter_map(|points| {
            let area = contour_area(points);
            if area <= min_area {
                return None;
            }
            bounding_box(points).map(|bbox| Region::new(bbox, area))
        })
        .collect()
}

/// Keeps candidates whose box is not enclosed by an already accepted one.
/// Only earlier acceptances are checked, so an enclosing region that comes
/// later does not evict a nested one accepted before it.
pub fn accept_regions(candidates: Vec<Region>) -> Vec<Region> {
    let mut accepted: Vec<Region> = Vec::new();
    for candidate in candidates {
        let bbox = candidate.bbox();
        if accepted.iter().any(|region| region.bbox().contains(&bbox)) {
            continue;
        }
        accepted.push(candidate);
    }
    accepted
}

/// Sorts by vertical center and greedily chains regions whose center lies
/// within 1.5 heights of the previous member.
pub fn group_regions(mut regions: Vec<Region>) -> Vec<RegionGroup> {
    regions.sort_by(|a, b| a.center_y.total_cmp(&b.center_y));
    let mut groups: Vec<RegionGroup> = Vec::new();
    let mut current: RegionGroup = Vec::new();

    for region in regions {
        if let Some(prev) = current.last() {
            let gap = (region.center_y - prev.center_y).abs();
            if gap >= prev.height as f64 * GROUP_GAP_FACTOR {
                groups.push(std::mem::take(&mut current));
            }
        }
        current.push(region);
    }
    if !current.is_empty() {
        groups.push(current);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::geom::rect_outline;

    fn region(x: u32, y: u32, width: u32, height: u32) -> Region {
        Region::new(
            PixelBox {
                x,
                y,
                width,
                height,
            },
            (width * height) as f64,
        )
    }

    #[test]
    fn min_area_scales_with_pixel_count() {
        assert_eq!(min_area(100, 100), 10.0);
        assert_eq!(min_area(200, 200), 4.0 * min_area(100, 100));
    }

    #[test]
    fn candidates_below_min_area_are_dropped() {
        let small = rect_outline(0, 0, 3, 3);
        let large = rect_outline(10, 10, 20, 10);
        let candidates =
            region_candidates([small.as_slice(), large.as_slice()], min_area(100, 100));
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].area, 171.0);
        assert_eq!(candidates[0].center_y, 15.0);
    }

    #[test]
    fn area_equal_to_min_area_is_rejected() {
        let outline = rect_outline(0, 0, 11, 2);
        assert_eq!(contour_area(&outline), 10.0);
        assert!(region_candidates([outline.as_slice()], 10.0).is_empty());
    }

    #[test]
    fn nested_region_after_outer_is_suppressed() {
        let outer = region(10, 10, 80, 80);
        let inner = region(20, 20, 10, 10);
        let accepted = accept_regions(vec![outer.clone(), inner]);
        assert_eq!(accepted, vec![outer]);
    }

    #[test]
    fn nested_region_before_outer_is_kept() {
        let outer = region(10, 10, 80, 80);
        let inner = region(20, 20, 10, 10);
        let accepted = accept_regions(vec![inner.clone(), outer.clone()]);
        assert_eq!(accepted, vec![inner, outer]);
    }

    #[test]
    fn grouping_boundary_is_strict() {
        // height 10 => threshold 15
        let near = group_regions(vec![region(0, 0, 20, 10), region(0, 14, 20, 10)]);
        assert_eq!(near.len(), 1);
        let far = group_regions(vec![region(0, 0, 20, 10), region(0, 16, 20, 10)]);
        assert_eq!(far.len(), 2);
        let exact = group_regions(vec![region(0, 0, 20, 10), region(0, 15, 20, 10)]);
        assert_eq!(exact.len(), 2);
    }

    #[test]
    fn grouping_sorts_and_compares_with_last_member() {
        let groups = group_regions(vec![
            region(0, 100, 30, 10),
            region(0, 0, 30, 10),
            region(0, 12, 30, 10),
            region(0, 24, 30, 10),
        ]);
        assert_eq!(groups.len(), 2);
        let ys: Vec<u32> = groups[0].iter().map(|r| r.y).collect();
        assert_eq!(ys, vec![0, 12, 24]);
        assert_eq!(groups[1][0].y, 100);
    }

    #[test]
    fn no_regions_no_groups() {
        assert!(group_regions(Vec::new()).is_empty());
    }
}
