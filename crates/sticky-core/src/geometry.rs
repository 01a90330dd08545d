//! Geometry and measurement constraint types.

/// A 2D extent produced by measuring a child.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns true when both dimensions are finite-or-infinite non-negative numbers.
    ///
    /// NaN and negative extents are never valid measurement results.
    pub fn is_valid(&self) -> bool {
        !self.width.is_nan() && !self.height.is_nan() && self.width >= 0.0 && self.height >= 0.0
    }
}

/// A 2D displacement relative to a parent's origin.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn translate(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Expresses `self` in the coordinate space whose origin sits at `origin`.
    pub fn relative_to(self, origin: Point) -> Self {
        Self {
            x: self.x - origin.x,
            y: self.y - origin.y,
        }
    }
}

/// Axis-aligned rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            width: size.width,
            height: size.height,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Half-open containment: the right and bottom edges are outside.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.y >= self.y
            && point.x < self.x + self.width
            && point.y < self.y + self.height
    }
}

/// Measurement constraints handed from a parent to a child.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Constraints {
    pub min_width: f32,
    pub max_width: f32,
    pub min_height: f32,
    pub max_height: f32,
}

impl Constraints {
    pub fn tight(size: Size) -> Self {
        Self {
            min_width: size.width,
            max_width: size.width,
            min_height: size.height,
            max_height: size.height,
        }
    }

    pub fn loose(max: Size) -> Self {
        Self {
            min_width: 0.0,
            max_width: max.width,
            min_height: 0.0,
            max_height: max.height,
        }
    }

    /// Keeps the width bounds and drops every bound on height.
    pub fn with_unbounded_height(self) -> Self {
        Self {
            min_height: 0.0,
            max_height: f32::INFINITY,
            ..self
        }
    }

    /// Tightens the width to exactly `width` and leaves height untouched.
    pub fn with_exact_width(self, width: f32) -> Self {
        Self {
            min_width: width,
            max_width: width,
            ..self
        }
    }

    pub fn has_bounded_width(&self) -> bool {
        self.max_width.is_finite()
    }

    pub fn constrain(&self, size: Size) -> Size {
        Size {
            width: size.width.clamp(self.min_width, self.max_width),
            height: size.height.clamp(self.min_height, self.max_height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_contains_is_half_open() {
        let rect = Rect::from_origin_size(Point::new(0.0, 10.0), Size::new(100.0, 50.0));
        assert!(rect.contains(Point::new(0.0, 10.0)));
        assert!(rect.contains(Point::new(99.9, 59.9)));
        assert!(!rect.contains(Point::new(100.0, 20.0)));
        assert!(!rect.contains(Point::new(10.0, 60.0)));
        assert!(!rect.contains(Point::new(10.0, 9.0)));
    }

    #[test]
    fn size_validity_rejects_nan_and_negative() {
        assert!(Size::new(10.0, 0.0).is_valid());
        assert!(Size::new(10.0, f32::INFINITY).is_valid());
        assert!(!Size::new(-1.0, 10.0).is_valid());
        assert!(!Size::new(10.0, f32::NAN).is_valid());
    }

    #[test]
    fn unbounded_height_keeps_width() {
        let constraints = Constraints::loose(Size::new(320.0, 480.0)).with_unbounded_height();
        assert_eq!(constraints.max_width, 320.0);
        assert_eq!(constraints.min_height, 0.0);
        assert!(constraints.max_height.is_infinite());
    }
}
