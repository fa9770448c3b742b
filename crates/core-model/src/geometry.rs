//! Pixel geometry shared by the controller and the painter.
//!
//! Rectangles use half-open extents: `right() == x + width` and
//! `bottom() == y + height` are the first coordinates *outside* the rect.
//! Width and height are never negative; constructors clamp them at zero.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width: width.max(0),
            height: height.max(0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width: width.max(0),
            height: height.max(0),
        }
    }

    pub fn from_size(size: Size) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn left(&self) -> i32 {
        self.x
    }
    pub fn top(&self) -> i32 {
        self.y
    }
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.left() && p.x < self.right() && p.y >= self.top() && p.y < self.bottom()
    }

    /// True when `other` lies entirely inside `self`. An empty `other` is
    /// contained when its origin is within the closed bounds.
    pub fn contains(&self, other: &Rect) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.top() >= self.top()
            && other.bottom() <= self.bottom()
    }

    pub fn intersection(&self, other: &Rect) -> Rect {
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= left || bottom <= top {
            return Rect::new(left, top, 0, 0);
        }
        Rect::new(left, top, right - left, bottom - top)
    }

    pub fn translated(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(
            self.x.saturating_add(dx),
            self.y.saturating_add(dy),
            self.width,
            self.height,
        )
    }

    pub fn with_width(&self, width: i32) -> Rect {
        Rect::new(self.x, self.y, width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_extents_clamp_to_zero() {
        let r = Rect::new(5, 5, -3, 10);
        assert_eq!(r.width, 0);
        assert!(r.is_empty());
        assert_eq!(Size::new(-1, -1), Size::default());
    }

    #[test]
    fn contains_uses_half_open_edges() {
        let outer = Rect::new(0, 0, 10, 10);
        assert!(outer.contains(&Rect::new(9, 9, 1, 1)));
        assert!(!outer.contains(&Rect::new(9, 9, 2, 1)));
        assert!(!outer.contains(&Rect::new(-1, 0, 1, 1)));
        assert!(outer.contains_point(Point::new(9, 0)));
        assert!(!outer.contains_point(Point::new(10, 0)));
    }

    #[test]
    fn intersection_of_overlapping_and_disjoint() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 10, 10);
        assert_eq!(a.intersection(&b), Rect::new(5, 5, 5, 5));
        assert!(a.intersection(&Rect::new(10, 0, 5, 5)).is_empty());
    }

    #[test]
    fn edges_saturate_at_extremes() {
        let r = Rect::new(i32::MAX - 1, i32::MAX - 1, 10, 10);
        assert_eq!(r.right(), i32::MAX);
        assert_eq!(r.bottom(), i32::MAX);
        assert_eq!(r.translated(5, 5).origin(), Point::new(i32::MAX, i32::MAX));
    }

    #[test]
    fn translate_keeps_size() {
        let r = Rect::new(1, 2, 3, 4).translated(-1, 10);
        assert_eq!(r, Rect::new(0, 12, 3, 4));
        assert_eq!(r.size(), Size::new(3, 4));
    }
}
