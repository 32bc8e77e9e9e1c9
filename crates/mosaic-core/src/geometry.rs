use std::ops::Mul;

/// Axis-aligned integer bounds, inclusive on both ends.
///
/// A rectangle with `max < min` on either axis is invalid; it marks nodes
/// that have not been positioned yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl Rect {
    pub const INVALID: Rect = Rect {
        min_x: 0,
        min_y: 0,
        max_x: -1,
        max_y: -1,
    };

    pub const fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Rect {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Rectangle covering `size` pixels starting at `origin`.
    pub fn from_origin_size(origin: Pos<i32>, size: Size<i32>) -> Self {
        Rect {
            min_x: origin.x,
            min_y: origin.y,
            max_x: origin.x + size.width - 1,
            max_y: origin.y + size.height - 1,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.max_x >= self.min_x && self.max_y >= self.min_y
    }

    pub fn width(&self) -> i32 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> i32 {
        self.max_y - self.min_y + 1
    }

    pub fn size(&self) -> Size<i32> {
        Size::new(self.width(), self.height())
    }

    pub fn area(&self) -> i64 {
        if self.is_valid() {
            self.width() as i64 * self.height() as i64
        } else {
            0
        }
    }

    /// Overlap of both rectangles; invalid when they are disjoint.
    pub fn intersection(&self, other: &Rect) -> Rect {
        Rect {
            min_x: self.min_x.max(other.min_x),
            min_y: self.min_y.max(other.min_y),
            max_x: self.max_x.min(other.max_x),
            max_y: self.max_y.min(other.max_y),
        }
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.intersection(other).is_valid()
    }

    /// Smallest rectangle covering both. Invalid operands are ignored.
    pub fn union(&self, other: &Rect) -> Rect {
        match (self.is_valid(), other.is_valid()) {
            (false, _) => *other,
            (_, false) => *self,
            _ => Rect {
                min_x: self.min_x.min(other.min_x),
                min_y: self.min_y.min(other.min_y),
                max_x: self.max_x.max(other.max_x),
                max_y: self.max_y.max(other.max_y),
            },
        }
    }

    pub fn contains(&self, point: Pos<i32>) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }

    /// Whether `self` lies entirely within `outer`.
    pub fn inside(&self, outer: &Rect) -> bool {
        self.min_x >= outer.min_x
            && self.max_x <= outer.max_x
            && self.min_y >= outer.min_y
            && self.max_y <= outer.max_y
    }

    /// Clamp `point` onto the rectangle.
    pub fn clamp(&self, point: Pos<i32>) -> Pos<i32> {
        Pos::new(
            point.x.clamp(self.min_x, self.max_x.max(self.min_x)),
            point.y.clamp(self.min_y, self.max_y.max(self.min_y)),
        )
    }
}

impl Default for Rect {
    fn default() -> Self {
        Rect::INVALID
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size<T> {
    pub width: T,
    pub height: T,
}

impl<T> Size<T> {
    pub fn new(width: T, height: T) -> Self {
        Size { width, height }
    }

    pub fn cast<U: From<T>>(self) -> Size<U> {
        Size {
            width: U::from(self.width),
            height: U::from(self.height),
        }
    }
}

impl<T: Mul + Copy> Mul<T> for Size<T> {
    type Output = Size<<T as Mul>::Output>;

    fn mul(self, rhs: T) -> Self::Output {
        Size {
            width: self.width * rhs,
            height: self.height * rhs,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pos<T> {
    pub x: T,
    pub y: T,
}

impl<T> Pos<T> {
    pub fn new(x: T, y: T) -> Self {
        Pos { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inclusive_extent() {
        let rect = Rect::new(0, 0, 1279, 719);
        assert_eq!(rect.width(), 1280);
        assert_eq!(rect.height(), 720);
        assert_eq!(rect, Rect::from_origin_size(Pos::new(0, 0), Size::new(1280, 720)));
    }

    #[test]
    fn test_invalid_sentinel() {
        assert!(!Rect::INVALID.is_valid());
        assert_eq!(Rect::INVALID.area(), 0);
        let rect = Rect::new(5, 5, 10, 10);
        assert_eq!(Rect::INVALID.union(&rect), rect);
        assert_eq!(rect.union(&Rect::INVALID), rect);
    }

    #[test]
    fn test_intersection_and_union() {
        let a = Rect::new(0, 0, 9, 9);
        let b = Rect::new(5, 5, 14, 14);
        assert_eq!(a.intersection(&b), Rect::new(5, 5, 9, 9));
        assert_eq!(a.union(&b), Rect::new(0, 0, 14, 14));
        assert!(!a.intersects(&Rect::new(10, 0, 20, 9)));
    }

    #[test]
    fn test_containment() {
        let outer = Rect::new(0, 0, 99, 99);
        assert!(outer.contains(Pos::new(0, 0)));
        assert!(outer.contains(Pos::new(99, 99)));
        assert!(!outer.contains(Pos::new(100, 50)));
        assert!(Rect::new(10, 10, 20, 20).inside(&outer));
        assert!(!Rect::new(90, 90, 100, 100).inside(&outer));
        assert_eq!(outer.clamp(Pos::new(-5, 150)), Pos::new(0, 99));
    }
}
