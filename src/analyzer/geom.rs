use imageproc::point::Point;

/// Axis-aligned box in pixel units; `width`/`height` count pixels, so a
/// single-pixel contour has a 1x1 box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PixelBox {
    pub(crate) x: u32,
    pub(crate) y: u32,
    pub(crate) width: u32,
    pub(crate) height: u32,
}

impl PixelBox {
    pub(crate) fn contains(&self, other: &PixelBox) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.x + other.width <= self.x + self.width
            && other.y + other.height <= self.y + self.height
    }
}

pub(crate) fn bounding_box(points: &[Point<i32>]) -> Option<PixelBox> {
    let first = points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for point in &points[1..] {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }
    Some(PixelBox {
        x: min_x.max(0) as u32,
        y: min_y.max(0) as u32,
        width: (max_x - min_x + 1) as u32,
        height: (max_y - min_y + 1) as u32,
    })
}

/// Shoelace area of the closed polygon through the points.
pub(crate) fn contour_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let n = points.len();
    let mut twice_area = 0i64;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        twice_area += a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64;
    }
    twice_area.abs() as f64 / 2.0
}

pub(crate) fn arc_length(points: &[Point<i32>], closed: bool) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    let mut length: f64 = points.windows(2).map(|pair| distance(pair[0], pair[1])).sum();
    if closed {
        length += distance(points[points.len() - 1], points[0]);
    }
    length
}

/// Drops the interior points of straight horizontal, vertical and diagonal
/// runs of a closed chain, keeping only the run endpoints.
pub(crate) fn simplify_chain(points: &[Point<i32>]) -> Vec<Point<i32>> {
    let n = points.len();
    if n <= 2 {
        return points.to_vec();
    }
    let step = |from: Point<i32>, to: Point<i32>| {
        ((to.x - from.x).signum(), (to.y - from.y).signum())
    };
    let mut kept = Vec::with_capacity(n);
    for i in 0..n {
        let prev = points[(i + n - 1) % n];
        let current = points[i];
        let next = points[(i + 1) % n];
        if step(prev, current) != step(current, next) {
            kept.push(current);
        }
    }
    if kept.is_empty() {
        kept.push(points[0]);
    }
    kept
}

/// Douglas-Peucker approximation of a closed curve. The curve is split at the
/// point farthest from its first point and each half is simplified on its own.
pub(crate) fn approximate_polygon(points: &[Point<i32>], epsilon: f64) -> Vec<Point<i32>> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }
    let origin = points[0];
    let mut far = 0;
    let mut far_dist = 0.0;
    for (idx, point) in points.iter().enumerate().skip(1) {
        let dist = distance(origin, *point);
        if dist > far_dist {
            far_dist = dist;
            far = idx;
        }
    }
    if far == 0 {
        return vec![origin];
    }

    let mut second_half = points[far..].to_vec();
    second_half.push(origin);

    let mut result = simplify_open(&points[..=far], epsilon);
    result.pop();
    let mut tail = simplify_open(&second_half, epsilon);
    tail.pop();
    result.extend(tail);
    result
}

fn simplify_open(points: &[Point<i32>], epsilon: f64) -> Vec<Point<i32>> {
    let n = points.len();
    if n <= 2 {
        return points.to_vec();
    }
    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;
    let mut stack = vec![(0usize, n - 1)];

    while let Some((start, end)) = stack.pop() {
        if end <= start + 1 {
            continue;
        }
        let mut max_dist = 0.0;
        let mut split = start;
        for idx in start + 1..end {
            let dist = segment_distance(points[idx], points[start], points[end]);
            if dist > max_dist {
                max_dist = dist;
                split = idx;
            }
        }
        if max_dist > epsilon {
            keep[split] = true;
            stack.push((start, split));
            stack.push((split, end));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(point, keep)| keep.then_some(*point))
        .collect()
}

fn distance(a: Point<i32>, b: Point<i32>) -> f64 {
    let dx = (b.x - a.x) as f64;
    let dy = (b.y - a.y) as f64;
    (dx * dx + dy * dy).sqrt()
}

fn segment_distance(point: Point<i32>, start: Point<i32>, end: Point<i32>) -> f64 {
    let dx = (end.x - start.x) as f64;
    let dy = (end.y - start.y) as f64;
    let len = (dx * dx + dy * dy).sqrt();
    if len == 0.0 {
        return distance(point, start);
    }
    let cross = dx * (point.y - start.y) as f64 - dy * (point.x - start.x) as f64;
    cross.abs() / len
}

/// Clockwise boundary pixels of a filled `w`x`h` rectangle, starting at its
/// top-left pixel, in the order a border follower would report them.
#[cfg(test)]
pub(crate) fn rect_outline(x: i32, y: i32, w: i32, h: i32) -> Vec<Point<i32>> {
    let (right, bottom) = (x + w - 1, y + h - 1);
    let mut points = Vec::new();
    for px in x..=right {
        points.push(Point::new(px, y));
    }
    for py in y + 1..=bottom {
        points.push(Point::new(right, py));
    }
    for px in (x..right).rev() {
        points.push(Point::new(px, bottom));
    }
    for py in (y + 1..bottom).rev() {
        points.push(Point::new(x, py));
    }
    points
}
