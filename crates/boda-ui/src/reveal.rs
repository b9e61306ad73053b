//! Reveal-on-scroll tracking.
//!
//! Blocks are laid out in page coordinates. On every scroll the tracker
//! measures how much of each block sits inside the viewport, shrunk at the
//! bottom by a margin, and marks the block revealed once that fraction
//! reaches the threshold. A revealed block stays revealed.

use serde::Serialize;

/// When a block counts as visible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealOptions {
    /// Fraction of the block that must be inside the viewport, `0.0..=1.0`.
    pub threshold: f64,
    /// Pixels trimmed off the bottom of the viewport.
    pub bottom_margin: f64,
}

impl RevealOptions {
    /// Timeline entries.
    pub const TIMELINE_ITEM: Self = Self {
        threshold: 0.3,
        bottom_margin: 100.0,
    };

    /// Whole page sections.
    pub const SECTION: Self = Self {
        threshold: 0.1,
        bottom_margin: 50.0,
    };
}

/// A block's vertical extent in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockBounds {
    /// Distance from the top of the page.
    pub top: f64,
    /// Height in pixels.
    pub height: f64,
}

/// The visible slice of the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Current scroll position.
    pub scroll_y: f64,
    /// Viewport height in pixels.
    pub height: f64,
}

/// Handle to an observed block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct BlockId(usize);

/// Fraction of `block` inside `viewport` once `bottom_margin` is trimmed.
#[must_use]
pub fn intersection_ratio(block: BlockBounds, viewport: Viewport, bottom_margin: f64) -> f64 {
    let view_top = viewport.scroll_y;
    let view_bottom = viewport.scroll_y + (viewport.height - bottom_margin).max(0.0);
    let block_bottom = block.top + block.height.max(0.0);

    if block.height <= 0.0 {
        return if block.top >= view_top && block.top <= view_bottom {
            1.0
        } else {
            0.0
        };
    }
    let overlap = (view_bottom.min(block_bottom) - view_top.max(block.top)).max(0.0);
    (overlap / block.height).min(1.0)
}

#[derive(Debug)]
struct Observed {
    bounds: BlockBounds,
    revealed: bool,
}

/// Tracks which blocks have been revealed.
#[derive(Debug)]
pub struct RevealTracker {
    options: RevealOptions,
    blocks: Vec<Observed>,
}

impl RevealTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new(options: RevealOptions) -> Self {
        Self {
            options,
            blocks: Vec::new(),
        }
    }

    /// Starts observing a block.
    pub fn observe(&mut self, bounds: BlockBounds) -> BlockId {
        self.blocks.push(Observed {
            bounds,
            revealed: false,
        });
        BlockId(self.blocks.len() - 1)
    }

    /// Re-measures every unrevealed block and returns those revealed now.
    pub fn on_scroll(&mut self, viewport: Viewport) -> Vec<BlockId> {
        let options = self.options;
        self.blocks
            .iter_mut()
            .enumerate()
            .filter(|(_, block)| !block.revealed)
            .filter_map(|(i, block)| {
                let ratio = intersection_ratio(block.bounds, viewport, options.bottom_margin);
                (ratio > 0.0 && ratio >= options.threshold).then(|| {
                    block.revealed = true;
                    BlockId(i)
                })
            })
            .collect()
    }

    /// Whether `id` has been revealed.
    #[must_use]
    pub fn is_revealed(&self, id: BlockId) -> bool {
        self.blocks.get(id.0).is_some_and(|b| b.revealed)
    }

    /// Every revealed block, in observation order.
    #[must_use]
    pub fn revealed(&self) -> Vec<BlockId> {
        self.blocks
            .iter()
            .enumerate()
            .filter(|(_, b)| b.revealed)
            .map(|(i, _)| BlockId(i))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEW_HEIGHT: f64 = 800.0;

    fn at(scroll_y: f64) -> Viewport {
        Viewport {
            scroll_y,
            height: VIEW_HEIGHT,
        }
    }

    #[test]
    fn test_ratio_respects_bottom_margin() {
        // Block spans 600..800; the margin hides the last 100 px.
        let block = BlockBounds {
            top: 600.0,
            height: 200.0,
        };

        let ratio = intersection_ratio(block, at(0.0), 100.0);

        assert!((ratio - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_block_below_the_fold_is_not_revealed() {
        let mut tracker = RevealTracker::new(RevealOptions::TIMELINE_ITEM);
        let id = tracker.observe(BlockBounds {
            top: 1_000.0,
            height: 200.0,
        });

        let revealed = tracker.on_scroll(at(0.0));

        assert!(revealed.is_empty());
        assert!(!tracker.is_revealed(id));
    }

    #[test]
    fn test_block_reveals_once_threshold_crossed() {
        // Arrange
        let mut tracker = RevealTracker::new(RevealOptions::TIMELINE_ITEM);
        let id = tracker.observe(BlockBounds {
            top: 1_000.0,
            height: 200.0,
        });

        // Act: 50 px visible (0.25) then 70 px visible (0.35).
        let first = tracker.on_scroll(at(350.0));
        let second = tracker.on_scroll(at(370.0));

        // Assert
        assert!(first.is_empty());
        assert_eq!(second, vec![id]);
    }

    #[test]
    fn test_reveal_is_monotonic() {
        let mut tracker = RevealTracker::new(RevealOptions::SECTION);
        let id = tracker.observe(BlockBounds {
            top: 100.0,
            height: 300.0,
        });
        tracker.on_scroll(at(0.0));

        let again = tracker.on_scroll(at(5_000.0));

        assert!(again.is_empty());
        assert!(tracker.is_revealed(id));
        assert_eq!(tracker.revealed(), vec![id]);
    }

    #[test]
    fn test_section_preset_needs_less_of_the_block() {
        let bounds = BlockBounds {
            top: 700.0,
            height: 500.0,
        };
        let mut sections = RevealTracker::new(RevealOptions::SECTION);
        let mut items = RevealTracker::new(RevealOptions::TIMELINE_ITEM);
        sections.observe(bounds);
        items.observe(bounds);

        // Sections see 100 px of 500 (0.2); timeline items see 50 px (0.1).
        let viewport = at(50.0);

        assert_eq!(sections.on_scroll(viewport).len(), 1);
        assert!(items.on_scroll(viewport).is_empty());
    }

    #[test]
    fn test_unknown_block_is_not_revealed() {
        let tracker = RevealTracker::new(RevealOptions::SECTION);

        assert!(!tracker.is_revealed(BlockId(3)));
    }
}
