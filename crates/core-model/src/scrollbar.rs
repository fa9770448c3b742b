//! Scrollbar model.
//!
//! A scrollbar owns one viewport offset. The value is always clamped into
//! `[min, max]`; every mutator reports whether the value actually changed so
//! the owner can request a redraw (the "value-changed notification").

use crate::geometry::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone)]
pub struct ScrollBar {
    orientation: Orientation,
    min: i32,
    max: i32,
    value: i32,
    step: i32,
    big_step: i32,
    relative_rect: Rect,
}

impl ScrollBar {
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            min: 0,
            max: 0,
            value: 0,
            step: 1,
            big_step: 10,
            relative_rect: Rect::default(),
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }
    pub fn min(&self) -> i32 {
        self.min
    }
    pub fn max(&self) -> i32 {
        self.max
    }
    pub fn value(&self) -> i32 {
        self.value
    }
    pub fn step(&self) -> i32 {
        self.step
    }
    pub fn big_step(&self) -> i32 {
        self.big_step
    }
    pub fn relative_rect(&self) -> Rect {
        self.relative_rect
    }

    pub fn set_step(&mut self, step: i32) {
        self.step = step.max(1);
    }

    pub fn set_big_step(&mut self, big_step: i32) {
        self.big_step = big_step.max(1);
    }

    pub fn set_relative_rect(&mut self, rect: Rect) {
        self.relative_rect = rect;
    }

    /// Thickness across the scroll axis (0 before layout).
    pub fn thickness(&self) -> i32 {
        match self.orientation {
            Orientation::Vertical => self.relative_rect.width,
            Orientation::Horizontal => self.relative_rect.height,
        }
    }

    /// Set the range; `max < min` collapses to `min`. Returns true if the
    /// value had to be re-clamped.
    pub fn set_range(&mut self, min: i32, max: i32) -> bool {
        self.min = min;
        self.max = max.max(min);
        let clamped = self.value.clamp(self.min, self.max);
        if clamped != self.value {
            self.value = clamped;
            return true;
        }
        false
    }

    pub fn set_value(&mut self, value: i32) -> bool {
        let clamped = value.clamp(self.min, self.max);
        if clamped == self.value {
            return false;
        }
        self.value = clamped;
        true
    }

    pub fn scroll_by_steps(&mut self, steps: i32) -> bool {
        self.set_value(self.value.saturating_add(steps.saturating_mul(self.step)))
    }

    pub fn scroll_by_pages(&mut self, pages: i32) -> bool {
        self.set_value(self.value.saturating_add(pages.saturating_mul(self.big_step)))
    }

    /// Whether there is anything to scroll.
    pub fn has_scrubbable_range(&self) -> bool {
        self.max > self.min
    }

    /// Thumb position and length along a track of `track_len`, proportional to
    /// the visible share `page / (page + range)` and never shorter than 1.
    pub fn thumb_span(&self, track_len: i32) -> (i32, i32) {
        if track_len <= 0 {
            return (0, 0);
        }
        let range = (self.max - self.min) as i64;
        if range == 0 {
            return (0, track_len);
        }
        let page = self.big_step.max(1) as i64;
        let track = track_len as i64;
        let len = ((track * page) / (page + range)).clamp(1, track);
        let travel = track - len;
        let start = (travel * (self.value - self.min) as i64) / range;
        (start as i32, len as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_clamped_into_range() {
        let mut sb = ScrollBar::new(Orientation::Vertical);
        sb.set_range(0, 100);
        assert!(sb.set_value(150));
        assert_eq!(sb.value(), 100);
        assert!(sb.set_value(-5));
        assert_eq!(sb.value(), 0);
        assert!(!sb.set_value(-10), "already at min, no change");
    }

    #[test]
    fn shrinking_range_reclamps_value() {
        let mut sb = ScrollBar::new(Orientation::Horizontal);
        sb.set_range(0, 50);
        sb.set_value(40);
        assert!(sb.set_range(0, 10));
        assert_eq!(sb.value(), 10);
        assert!(!sb.set_range(0, 20));
        assert!(sb.set_range(0, -3));
        assert_eq!((sb.min(), sb.max(), sb.value()), (0, 0, 0));
    }

    #[test]
    fn steps_and_pages() {
        let mut sb = ScrollBar::new(Orientation::Vertical);
        sb.set_range(0, 100);
        sb.set_step(4);
        sb.set_big_step(30);
        assert!(sb.scroll_by_steps(2));
        assert_eq!(sb.value(), 8);
        assert!(sb.scroll_by_pages(1));
        assert_eq!(sb.value(), 38);
        assert!(sb.scroll_by_pages(-5));
        assert_eq!(sb.value(), 0);
        sb.set_step(0);
        assert_eq!(sb.step(), 1);
    }

    #[test]
    fn thumb_span_proportional() {
        let mut sb = ScrollBar::new(Orientation::Vertical);
        sb.set_big_step(10);
        assert_eq!(sb.thumb_span(20), (0, 20), "no range: full thumb");
        sb.set_range(0, 10);
        let (start, len) = sb.thumb_span(20);
        assert_eq!((start, len), (0, 10));
        sb.set_value(10);
        let (start, len) = sb.thumb_span(20);
        assert_eq!(start + len, 20, "thumb reaches track end at max");
        assert_eq!(sb.thumb_span(0), (0, 0));
    }

    #[test]
    fn thickness_follows_orientation() {
        let mut v = ScrollBar::new(Orientation::Vertical);
        v.set_relative_rect(Rect::new(78, 0, 2, 23));
        assert_eq!(v.thickness(), 2);
        let mut h = ScrollBar::new(Orientation::Horizontal);
        h.set_relative_rect(Rect::new(0, 23, 78, 1));
        assert_eq!(h.thickness(), 1);
    }
}
