//! Redraw request tracking.
//!
//! The controller never paints. Each mutation that changes what would be
//! painted records damage here, in widget-relative pixels; the host drains it
//! once per event-loop cycle and repaints the union it cares about.
//!
//! Invariants:
//! * A full-widget request absorbs every rect recorded before or after it
//!   until the next `take`.
//! * Empty rects are never stored.
//! * `take` is one-shot: internal storage is cleared.

use crate::geometry::Rect;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Damage {
    None,
    Full,
    Rects(Vec<Rect>),
}

impl Damage {
    pub fn is_none(&self) -> bool {
        matches!(self, Damage::None)
    }
}

#[derive(Debug, Default)]
pub struct DamageTracker {
    full: bool,
    rects: Vec<Rect>,
}

impl DamageTracker {
    pub fn new() -> Self {
        Self {
            full: false,
            rects: Vec::new(),
        }
    }

    /// Request a repaint of the whole widget.
    pub fn mark_full(&mut self) {
        self.full = true;
        self.rects.clear();
    }

    /// Request a repaint of one rect.
    pub fn mark(&mut self, rect: Rect) {
        if self.full || rect.is_empty() {
            return;
        }
        if self.rects.contains(&rect) {
            return;
        }
        self.rects.push(rect);
    }

    pub fn is_empty(&self) -> bool {
        !self.full && self.rects.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.full
    }

    /// Consume pending damage.
    pub fn take(&mut self) -> Damage {
        if self.full {
            self.full = false;
            self.rects.clear();
            return Damage::Full;
        }
        if self.rects.is_empty() {
            return Damage::None;
        }
        Damage::Rects(std::mem::take(&mut self.rects))
    }

    /// Consume pending damage clipped to `bounds`, dropping rects that fall
    /// entirely outside. A full request becomes `bounds` itself.
    pub fn take_within(&mut self, bounds: Rect) -> Vec<Rect> {
        match self.take() {
            Damage::None => Vec::new(),
            Damage::Full => {
                if bounds.is_empty() {
                    Vec::new()
                } else {
                    vec![bounds]
                }
            }
            Damage::Rects(rects) => rects
                .into_iter()
                .map(|r| r.intersection(&bounds))
                .filter(|r| !r.is_empty())
                .collect(),
        }
    }
}
