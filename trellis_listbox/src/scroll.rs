// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll correction along the listbox's main axis.

/// The visible window of a scrollable list, in content coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScrollWindow {
    /// Current scroll offset (start edge of the visible region).
    pub offset: f64,
    /// Visible extent.
    pub extent: f64,
}

/// One item's placement along the scroll axis, in content coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ItemExtent {
    /// Distance from the content start to the item's start edge.
    pub offset: f64,
    /// The item's extent.
    pub extent: f64,
}

/// Scroll offset that brings `item` fully into `window`, if it is not
/// already visible.
///
/// Nearest-edge policy: an item above the window aligns to the top, an item
/// below aligns to the bottom. An item larger than the window aligns to the
/// top so its start is readable. Returns `None` when no scrolling is needed,
/// so callers can skip issuing a host scroll command.
pub fn scroll_correction(window: ScrollWindow, item: ItemExtent) -> Option<f64> {
    let item_end = item.offset + item.extent;
    let window_end = window.offset + window.extent;
    if item.offset < window.offset || item.extent > window.extent {
        Some(item.offset)
    } else if item_end > window_end {
        Some(item_end - window.extent)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: ScrollWindow = ScrollWindow {
        offset: 100.0,
        extent: 50.0,
    };

    #[test]
    fn visible_item_needs_no_correction() {
        let item = ItemExtent {
            offset: 110.0,
            extent: 20.0,
        };
        assert_eq!(scroll_correction(WINDOW, item), None);
    }

    #[test]
    fn item_above_aligns_to_the_start_edge() {
        let item = ItemExtent {
            offset: 80.0,
            extent: 20.0,
        };
        assert_eq!(scroll_correction(WINDOW, item), Some(80.0));
    }

    #[test]
    fn item_below_aligns_to_the_end_edge() {
        let item = ItemExtent {
            offset: 160.0,
            extent: 20.0,
        };
        // 160 + 20 - 50
        assert_eq!(scroll_correction(WINDOW, item), Some(130.0));
    }

    #[test]
    fn oversized_item_aligns_to_the_start_edge() {
        let item = ItemExtent {
            offset: 90.0,
            extent: 80.0,
        };
        assert_eq!(scroll_correction(WINDOW, item), Some(90.0));
    }

    #[test]
    fn item_flush_with_an_edge_is_visible() {
        let item = ItemExtent {
            offset: 100.0,
            extent: 50.0,
        };
        assert_eq!(scroll_correction(WINDOW, item), None);
    }
}
