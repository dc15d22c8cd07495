use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct Vertex {
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
}

impl Vertex {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Four corners of a text region: top-left, top-right, bottom-right, bottom-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingPoly(pub [Vertex; 4]);

impl BoundingPoly {
    pub fn from_rect(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self([
            Vertex::new(x, y),
            Vertex::new(x + width, y),
            Vertex::new(x + width, y + height),
            Vertex::new(x, y + height),
        ])
    }

    /// Takes the first four vertices, `None` if there are fewer.
    pub fn from_vertices(vertices: &[Vertex]) -> Option<Self> {
        match vertices {
            [a, b, c, d, ..] => Some(Self([*a, *b, *c, *d])),
            _ => None,
        }
    }

    pub fn origin(&self) -> Vertex {
        self.0[0]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionGeometry {
    pub width: i32,
    pub height: i32,
    /// height / width, `None` when the width is zero
    pub aspect_ratio: Option<f64>,
}

impl RegionGeometry {
    /// Whether the ratio lies in `[min, max]`. A region without a ratio never does.
    pub fn ratio_within(&self, min: f64, max: f64) -> bool {
        self.aspect_ratio
            .map_or(false, |ratio| ratio >= min && ratio <= max)
    }
}

pub fn classify(poly: &BoundingPoly) -> RegionGeometry {
    let [top_left, top_right, bottom_right, _] = poly.0;
    let width = top_right.x - top_left.x;
    let height = bottom_right.y - top_right.y;
    let aspect_ratio = if width == 0 {
        None
    } else {
        Some(height as f64 / width as f64)
    };
    RegionGeometry { width, height, aspect_ratio }
}

#[cfg(test)]
mod test {
    use super::{classify, BoundingPoly, Vertex};

    #[test]
    fn plate_shaped_region() {
        let geometry = classify(&BoundingPoly::from_rect(10, 20, 100, 30));
        assert_eq!(geometry.width, 100);
        assert_eq!(geometry.height, 30);
        assert_eq!(geometry.aspect_ratio, Some(0.3));
        assert!(geometry.ratio_within(0.2, 0.5));
    }

    #[test]
    fn ratio_bounds_are_inclusive() {
        assert!(classify(&BoundingPoly::from_rect(0, 0, 100, 20)).ratio_within(0.2, 0.5));
        assert!(classify(&BoundingPoly::from_rect(0, 0, 100, 50)).ratio_within(0.2, 0.5));
        assert!(!classify(&BoundingPoly::from_rect(0, 0, 100, 19)).ratio_within(0.2, 0.5));
        assert!(!classify(&BoundingPoly::from_rect(0, 0, 100, 80)).ratio_within(0.2, 0.5));
    }

    #[test]
    fn zero_width_has_no_ratio() {
        let geometry = classify(&BoundingPoly::from_rect(5, 5, 0, 40));
        assert_eq!(geometry.aspect_ratio, None);
        assert!(!geometry.ratio_within(0.0, f64::MAX));
    }

    #[test]
    fn polygons_need_four_vertices() {
        let three = [Vertex::new(0, 0), Vertex::new(1, 0), Vertex::new(1, 1)];
        assert!(BoundingPoly::from_vertices(&three).is_none());
        let five = [
            Vertex::new(0, 0),
            Vertex::new(4, 0),
            Vertex::new(4, 2),
            Vertex::new(0, 2),
            Vertex::new(9, 9),
        ];
        let poly = BoundingPoly::from_vertices(&five);
        assert_eq!(poly, Some(BoundingPoly::from_rect(0, 0, 4, 2)));
    }
}
