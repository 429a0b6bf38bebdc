use imageproc::point::Point;
use tracing::debug;

use super::geom::{approximate_polygon, arc_length, bounding_box, contour_area};
use super::regions::{Region, RegionGroup};
use crate::element::{BorderExtent, Element, MainTextPosition, RelativePosition};

const DARK_COVERAGE_RATIO: f64 = 0.5;
const POLY_EPSILON_RATIO: f64 = 0.04;
const BORDER_MIN_RATIO: f64 = 0.5;
const BORDER_COMPLETE_RATIO: f64 = 0.9;
const EFFECT_MIN_MEAN: f64 = 10.0;
const OBJECT_AREA_RATIO: f64 = 0.2;

/// Image-level measurements the classifier works from.
pub(crate) struct Evidence<'a> {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) groups: &'a [RegionGroup],
    pub(crate) dark_area: f64,
    pub(crate) edge_contours: &'a [Vec<Point<i32>>],
    pub(crate) residual_mean: f64,
}

/// Emits elements in fixed order: text, background, borders, effect, object.
pub(crate) fn classify(evidence: &Evidence<'_>) -> Vec<Element> {
    let mut elements = text_elements(evidence.groups, evidence.width);
    elements.extend(background_element(
        evidence.dark_area,
        evidence.width,
        evidence.height,
    ));
    elements.extend(border_elements(
        evidence.edge_contours,
        evidence.width,
        evidence.height,
    ));
    elements.extend(effect_element(evidence.residual_mean));
    elements.extend(object_element(
        evidence.edge_contours,
        evidence.width,
        evidence.height,
    ));
    debug!(count = elements.len(), "classified elements");
    elements
}

pub(crate) fn text_elements(groups: &[RegionGroup], width: u32) -> Vec<Element> {
    let Some(main_idx) = first_max_by_key(groups, group_area) else {
        return Vec::new();
    };
    let main_group = &groups[main_idx];
    let Some(main_region_idx) = first_max_by_key(main_group, |region| region.area) else {
        return Vec::new();
    };
    let main_region = &main_group[main_region_idx];

    let quarter = width as f64 / 4.0;
    let x = main_region.x as f64;
    let position = if x > quarter && x < 3.0 * quarter {
        MainTextPosition::Center
    } else {
        MainTextPosition::Side
    };
    let mut elements = vec![Element::main_text(position)];

    let main_y = mean_center_y(main_group);
    for (idx, group) in groups.iter().enumerate() {
        if idx == main_idx {
            continue;
        }
        let position = if mean_center_y(group) > main_y {
            RelativePosition::Below
        } else {
            RelativePosition::Above
        };
        elements.push(Element::secondary_text(position));
    }
    elements
}

pub(crate) fn background_element(dark_area: f64, width: u32, height: u32) -> Option<Element> {
    let total = width as f64 * height as f64;
    if total <= 0.0 || dark_area <= DARK_COVERAGE_RATIO * total {
        return None;
    }
    Some(Element::background(dark_area / total))
}

pub(crate) fn border_elements(
    contours: &[Vec<Point<i32>>],
    width: u32,
    height: u32,
) -> Vec<Element> {
    let (width, height) = (width as f64, height as f64);
    contours
        .iter()
        .filter_map(|contour| {
            let epsilon = POLY_EPSILON_RATIO * arc_length(contour, true);
            let approx = approximate_polygon(contour, epsilon);
            if approx.len() != 4 {
                return None;
            }
            let bbox = bounding_box(&approx)?;
            let (w, h) = (bbox.width as f64, bbox.height as f64);
            if w <= width * BORDER_MIN_RATIO || h <= height * BORDER_MIN_RATIO {
                return None;
            }
            let extent = if w > width * BORDER_COMPLETE_RATIO && h > height * BORDER_COMPLETE_RATIO
            {
                BorderExtent::Complete
            } else {
                BorderExtent::Partial
            };
            Some(Element::border(extent))
        })
        .collect()
}

pub(crate) fn effect_element(residual_mean: f64) -> Option<Element> {
    (residual_mean > EFFECT_MIN_MEAN).then(Element::effect)
}

pub(crate) fn object_element(
    contours: &[Vec<Point<i32>>],
    width: u32,
    height: u32,
) -> Option<Element> {
    let limit = width as f64 * height as f64 * OBJECT_AREA_RATIO;
    contours
        .iter()
        .any(|contour| contour_area(contour) > limit)
        .then(Element::object)
}

fn group_area(group: &RegionGroup) -> f64 {
    group.iter().map(|region| region.area).sum()
}

fn mean_center_y(group: &[Region]) -> f64 {
    if group.is_empty() {
        return 0.0;
    }
    group.iter().map(|region| region.center_y).sum::<f64>() / group.len() as f64
}

/// Index of the first item with the largest key; later ties lose.
fn first_max_by_key<T, F>(items: &[T], key: F) -> Option<usize>
where
    F: Fn(&T) -> f64,
{
    let mut best: Option<(usize, f64)> = None;
    for (idx, item) in items.iter().enumerate() {
        let value = key(item);
        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((idx, value)),
        }
    }
    best.map(|(idx, _)| idx)
}
