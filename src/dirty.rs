//! Dirty-region tracking
//!
//! On a serial panel link the dominant cost of a frame is the number of
//! pixels re-transmitted, so the compositor only pushes the rectangles that
//! actually changed. [`DirtyTracker`] collects those rectangles between
//! flushes in a small fixed-capacity list, merging anything that overlaps
//! or touches so that side-by-side damage becomes one transfer instead of
//! several fragmented ones.
//!
//! The tracker never loses coverage: when the list is full, everything
//! collapses into a single bounding rectangle. That over-covers pixels in
//! the rare overflow case but keeps the guarantee that a drained list
//! always covers at least every invalidated region.

use log::trace;

/// Maximum number of tracked rectangles before collapsing to a union
pub const DIRTY_CAPACITY: usize = 8;

/// A changed screen region in framebuffer coordinates
///
/// Always clamped to screen bounds by the time it is stored.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DirtyRect {
    /// Left edge
    pub x: i16,
    /// Top edge
    pub y: i16,
    /// Width in pixels
    pub w: i16,
    /// Height in pixels
    pub h: i16,
}

impl DirtyRect {
    /// Create a rectangle
    pub const fn new(x: i16, y: i16, w: i16, h: i16) -> Self {
        Self { x, y, w, h }
    }

    /// Boundary-inclusive overlap test: edge-adjacent rectangles count
    fn intersects_or_touches(&self, other: &Self) -> bool {
        let ax2 = self.x + self.w;
        let ay2 = self.y + self.h;
        let bx2 = other.x + other.w;
        let by2 = other.y + other.h;
        !(bx2 < self.x || other.x > ax2 || by2 < self.y || other.y > ay2)
    }

    /// Grow to the union with `other`
    fn merge(&mut self, other: &Self) {
        let x1 = self.x.min(other.x);
        let y1 = self.y.min(other.y);
        let x2 = (self.x + self.w).max(other.x + other.w);
        let y2 = (self.y + self.h).max(other.y + other.h);
        self.x = x1;
        self.y = y1;
        self.w = x2 - x1;
        self.h = y2 - y1;
    }

    /// True when the rectangle fully contains `(px, py)`
    #[cfg(test)]
    fn contains(&self, px: i16, py: i16) -> bool {
        px >= self.x && px < self.x + self.w && py >= self.y && py < self.y + self.h
    }
}

/// Bounded list of changed regions since the last flush
#[derive(Debug)]
pub struct DirtyTracker {
    rects: heapless::Vec<DirtyRect, DIRTY_CAPACITY>,
    screen_w: i16,
    screen_h: i16,
}

impl DirtyTracker {
    /// Create a tracker clamping to the given screen size
    pub fn new(screen_w: u16, screen_h: u16) -> Self {
        Self {
            rects: heapless::Vec::new(),
            screen_w: screen_w as i16,
            screen_h: screen_h as i16,
        }
    }

    /// Number of tracked rectangles
    pub fn len(&self) -> usize {
        self.rects.len()
    }

    /// True when nothing is pending
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Current rectangles, unordered
    pub fn rects(&self) -> &[DirtyRect] {
        &self.rects
    }

    /// Record a changed region
    ///
    /// The rectangle is clamped to screen bounds first; an empty result is
    /// ignored. If it intersects or touches an existing entry, that entry
    /// grows to the union and then absorbs every other entry the growth
    /// brought into contact (one cascading pass). Otherwise the rectangle is
    /// appended, or — at capacity — everything collapses to one bounding
    /// rectangle so no damage is ever dropped.
    pub fn invalidate(&mut self, x: i16, y: i16, w: i16, h: i16) {
        if w <= 0 || h <= 0 {
            return;
        }
        // Clamp edges in i32: the far edge of a rectangle near i16::MAX
        // is past i16 range before the screen clamp brings it back.
        let x0 = i32::from(x).max(0);
        let y0 = i32::from(y).max(0);
        let x1 = (i32::from(x) + i32::from(w)).min(i32::from(self.screen_w));
        let y1 = (i32::from(y) + i32::from(h)).min(i32::from(self.screen_h));
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let incoming = DirtyRect::new(x0 as i16, y0 as i16, (x1 - x0) as i16, (y1 - y0) as i16);

        for i in 0..self.rects.len() {
            if self.rects[i].intersects_or_touches(&incoming) {
                self.rects[i].merge(&incoming);
                self.consolidate(i);
                return;
            }
        }

        if self.rects.push(incoming).is_ok() {
            return;
        }

        // Capacity exhausted: union everything into the first slot.
        trace!("dirty list full, collapsing {} rects to union", self.rects.len());
        let mut union = incoming;
        for r in &self.rects {
            union.merge(r);
        }
        self.rects.clear();
        let _ = self.rects.push(union);
    }

    /// Fold into entry `i` every other entry it now touches
    fn consolidate(&mut self, i: usize) {
        let mut j = 0;
        while j < self.rects.len() {
            if j != i {
                let other = self.rects[j];
                if self.rects[i].intersects_or_touches(&other) {
                    self.rects[i].merge(&other);
                    // Keep `i` valid: only swap-remove from past it.
                    if j > i {
                        let _ = self.rects.swap_remove(j);
                        continue;
                    }
                    let merged = self.rects[i];
                    self.rects[j] = merged;
                    let _ = self.rects.swap_remove(i);
                    return self.consolidate(j);
                }
            }
            j += 1;
        }
    }

    /// Hand the current rectangles to `f`, then reset to empty
    pub fn drain<F: FnMut(DirtyRect)>(&mut self, mut f: F) {
        for r in &self.rects {
            f(*r);
        }
        self.rects.clear();
    }

    /// Discard all pending rectangles
    pub fn clear(&mut self) {
        self.rects.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn drained(t: &mut DirtyTracker) -> Vec<DirtyRect> {
        let mut out = Vec::new();
        t.drain(|r| out.push(r));
        out
    }

    #[test]
    fn test_empty_invalidate_is_noop() {
        let mut t = DirtyTracker::new(240, 240);
        t.invalidate(10, 10, 0, 5);
        t.invalidate(10, 10, 5, -1);
        t.invalidate(300, 300, 10, 10); // fully off-screen
        assert!(t.is_empty());
    }

    #[test]
    fn test_clamps_to_screen() {
        let mut t = DirtyTracker::new(240, 240);
        t.invalidate(-10, -20, 50, 50);
        assert_eq!(t.rects(), &[DirtyRect::new(0, 0, 40, 30)]);

        t.clear();
        t.invalidate(230, 235, 50, 50);
        assert_eq!(t.rects(), &[DirtyRect::new(230, 235, 10, 5)]);
    }

    #[test]
    fn test_touching_rects_merge() {
        let mut t = DirtyTracker::new(240, 240);
        t.invalidate(0, 0, 10, 10);
        t.invalidate(10, 0, 10, 10); // edge-adjacent
        assert_eq!(t.rects(), &[DirtyRect::new(0, 0, 20, 10)]);
    }

    #[test]
    fn test_disjoint_rects_stay_separate() {
        let mut t = DirtyTracker::new(240, 240);
        t.invalidate(0, 0, 10, 10);
        t.invalidate(100, 100, 10, 10);
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn test_cascading_consolidation() {
        let mut t = DirtyTracker::new(240, 240);
        // Two islands with a gap; the third rect bridges them, so all three
        // must end up in a single union.
        t.invalidate(0, 0, 10, 10);
        t.invalidate(30, 0, 10, 10);
        assert_eq!(t.len(), 2);
        t.invalidate(10, 0, 20, 10);
        assert_eq!(t.rects(), &[DirtyRect::new(0, 0, 40, 10)]);
    }

    #[test]
    fn test_overflow_collapses_to_union() {
        let mut t = DirtyTracker::new(240, 240);
        let cap = DIRTY_CAPACITY as i16;

        // Disjoint rects spread on a diagonal, exactly at capacity.
        let mut requested = Vec::new();
        for i in 0..cap {
            let r = DirtyRect::new(i * 20, i * 20, 5, 5);
            requested.push(r);
            t.invalidate(r.x, r.y, r.w, r.h);
        }
        assert_eq!(t.len(), DIRTY_CAPACITY);

        // One more disjoint rect cannot fit: the list collapses to one union.
        let r = DirtyRect::new(cap * 20, cap * 20, 5, 5);
        requested.push(r);
        t.invalidate(r.x, r.y, r.w, r.h);
        assert_eq!(t.len(), 1);

        // The collapse freed capacity, so later disjoint damage appends again.
        for i in (cap + 1)..(cap + 3) {
            let r = DirtyRect::new(i * 20, i * 20, 5, 5);
            requested.push(r);
            t.invalidate(r.x, r.y, r.w, r.h);
        }
        assert_eq!(t.len(), 3);

        // No request may have lost coverage, wherever it ended up.
        let rects = drained(&mut t);
        for r in &requested {
            assert!(
                rects
                    .iter()
                    .any(|c| c.contains(r.x, r.y) && c.contains(r.x + r.w - 1, r.y + r.h - 1)),
                "request {r:?} not covered"
            );
        }
    }

    #[test]
    fn test_extreme_coordinates_clamp_without_wrapping() {
        let mut t = DirtyTracker::new(240, 240);
        t.invalidate(i16::MAX - 2, 0, 10, 10);
        t.invalidate(0, i16::MAX - 2, 10, 10);
        t.invalidate(i16::MIN, i16::MIN, 10, 10);
        assert!(t.is_empty());

        // Oversized but overlapping damage clamps to the screen.
        t.invalidate(-10, -10, i16::MAX, i16::MAX);
        assert_eq!(t.rects(), &[DirtyRect::new(0, 0, 240, 240)]);
    }

    #[test]
    fn test_coverage_never_lost() {
        let mut t = DirtyTracker::new(240, 240);
        let requests = [
            (5, 5, 30, 30),
            (200, 10, 39, 20),
            (0, 100, 240, 4),
            (60, 60, 1, 1),
            (58, 58, 10, 10),
        ];
        for &(x, y, w, h) in &requests {
            t.invalidate(x, y, w, h);
        }
        let rects = drained(&mut t);
        // Every pixel of every request must be covered by some drained rect.
        for &(x, y, w, h) in &requests {
            for py in y..y + h {
                for px in x..x + w {
                    assert!(
                        rects.iter().any(|r| r.contains(px, py)),
                        "pixel ({px},{py}) not covered"
                    );
                }
            }
        }
        assert!(t.is_empty());
    }

    #[test]
    fn test_drain_resets() {
        let mut t = DirtyTracker::new(240, 240);
        t.invalidate(0, 0, 10, 10);
        let first = drained(&mut t);
        assert_eq!(first.len(), 1);
        assert!(drained(&mut t).is_empty());
    }
}
