// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlay configuration: behavior features and positioning choices.

use bitflags::bitflags;

bitflags! {
    /// Composable overlay behaviors.
    ///
    /// Features are applied in a fixed order when an overlay is shown (see
    /// the manager docs) and torn down in reverse, so pairs like
    /// scroll-lock/unlock nest correctly across overlapping overlays.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct OverlayFeatures: u8 {
        /// Lock document scrolling while shown.
        const PREVENTS_SCROLL = 1 << 0;
        /// Visually suppress every other shown overlay while shown.
        const IS_BLOCKING = 1 << 1;
        /// Show a backdrop behind the overlay, faded in on show and faded
        /// out (then removed) on hide.
        const HAS_BACKDROP = 1 << 2;
        /// Contain keyboard focus inside the overlay. At most one overlay
        /// holds the trap; showing another trapping overlay moves it.
        const TRAPS_KEYBOARD_FOCUS = 1 << 3;
        /// Hide when the Escape key is pressed.
        const HIDES_ON_ESC = 1 << 4;
        /// Hide when a pointer press lands outside the overlay content and
        /// its invoker.
        const HIDES_ON_OUTSIDE_CLICK = 1 << 5;
        /// Maintain shown/hidden accessibility attributes on the content.
        const ACCESSIBILITY = 1 << 6;
        /// Keep the overlay's width in sync with the reference element,
        /// per [`WidthMode`](crate::WidthMode).
        const SYNCS_REFERENCE_WIDTH = 1 << 7;
    }
}

/// Side of the reference an anchored overlay prefers, with optional
/// start/end alignment along that side.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[allow(missing_docs, reason = "side and alignment are in the names")]
pub enum Placement {
    #[default]
    Top,
    TopStart,
    TopEnd,
    Bottom,
    BottomStart,
    BottomEnd,
    Left,
    LeftStart,
    LeftEnd,
    Right,
    RightStart,
    RightEnd,
}

impl Placement {
    /// The placement on the opposite side, keeping the alignment.
    pub fn flipped(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::TopStart => Self::BottomStart,
            Self::TopEnd => Self::BottomEnd,
            Self::Bottom => Self::Top,
            Self::BottomStart => Self::TopStart,
            Self::BottomEnd => Self::TopEnd,
            Self::Left => Self::Right,
            Self::LeftStart => Self::RightStart,
            Self::LeftEnd => Self::RightEnd,
            Self::Right => Self::Left,
            Self::RightStart => Self::LeftStart,
            Self::RightEnd => Self::LeftEnd,
        }
    }

    /// Whether the main axis is vertical (top/bottom side).
    pub fn is_vertical(self) -> bool {
        matches!(
            self,
            Self::Top
                | Self::TopStart
                | Self::TopEnd
                | Self::Bottom
                | Self::BottomStart
                | Self::BottomEnd
        )
    }
}

/// Positioning for an overlay anchored to a reference rectangle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlacementConfig {
    /// Preferred side and alignment.
    pub placement: Placement,
    /// Shift along the reference edge.
    pub skid: f64,
    /// Gap between reference and overlay on the main axis.
    pub distance: f64,
    /// Flip to the opposite side when the preferred side lacks room.
    pub flip: bool,
    /// Minimum room (beyond the overlay itself) required before flipping.
    pub flip_padding: f64,
    /// Clamp into the viewport on the cross axis.
    pub prevent_overflow: bool,
    /// Margin kept from the viewport edge when clamping.
    pub overflow_padding: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            placement: Placement::Top,
            skid: 0.0,
            distance: 8.0,
            flip: true,
            flip_padding: 16.0,
            prevent_overflow: true,
            overflow_padding: 16.0,
        }
    }
}

/// Where a viewport-positioned overlay sits.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[allow(missing_docs, reason = "anchor points are in the names")]
pub enum ViewportPlacement {
    #[default]
    Center,
    Top,
    TopLeft,
    TopRight,
    Bottom,
    BottomLeft,
    BottomRight,
    Left,
    Right,
}

/// Positioning for an overlay placed relative to the viewport.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ViewportConfig {
    /// Anchor point within the viewport.
    pub placement: ViewportPlacement,
}

/// How [`OverlayFeatures::ACCESSIBILITY`] wires the content to its invoker.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum AccessibilityMode {
    /// Interactive overlay: the invoker announces expanded/collapsed state
    /// and controls the content (`aria-expanded`/`aria-controls`-style).
    #[default]
    Expanded,
    /// Descriptive overlay: the content describes the invoker
    /// (`role=tooltip` + `aria-describedby`-style).
    Tooltip,
}

/// How [`OverlayFeatures::SYNCS_REFERENCE_WIDTH`] derives the overlay width
/// from the reference width.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum WidthMode {
    /// Leave the overlay's natural width alone.
    #[default]
    None,
    /// Reference width is a lower bound.
    Min,
    /// Reference width is an upper bound.
    Max,
    /// Overlay width equals the reference width.
    Full,
}

/// Full configuration of one overlay.
///
/// `placement` and `viewport` are alternatives: anchored overlays (tooltips,
/// dropdowns) set `placement`, viewport overlays (dialogs, bottom sheets)
/// set `viewport`. Setting both is reported on the warning channel and
/// anchored positioning wins.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct OverlayConfig {
    /// Enabled behaviors.
    pub features: OverlayFeatures,
    /// Anchored positioning, relative to a reference node.
    pub placement: Option<PlacementConfig>,
    /// Viewport positioning.
    pub viewport: Option<ViewportConfig>,
    /// Reference-width syncing mode.
    pub width_mode: WidthMode,
    /// Invoker wiring used by the accessibility feature.
    pub accessibility: AccessibilityMode,
}

impl OverlayConfig {
    /// Typical modal dialog: centered, blocking input behind a backdrop,
    /// trapping focus, closed with Escape.
    pub fn dialog() -> Self {
        Self {
            features: OverlayFeatures::PREVENTS_SCROLL
                | OverlayFeatures::HAS_BACKDROP
                | OverlayFeatures::TRAPS_KEYBOARD_FOCUS
                | OverlayFeatures::HIDES_ON_ESC
                | OverlayFeatures::ACCESSIBILITY,
            viewport: Some(ViewportConfig::default()),
            ..Self::default()
        }
    }

    /// Typical dropdown: anchored below its invoker, invoker-width, closed
    /// by Escape or clicking elsewhere.
    pub fn dropdown() -> Self {
        Self {
            features: OverlayFeatures::HIDES_ON_ESC
                | OverlayFeatures::HIDES_ON_OUTSIDE_CLICK
                | OverlayFeatures::ACCESSIBILITY
                | OverlayFeatures::SYNCS_REFERENCE_WIDTH,
            placement: Some(PlacementConfig {
                placement: Placement::BottomStart,
                ..PlacementConfig::default()
            }),
            width_mode: WidthMode::Full,
            ..Self::default()
        }
    }

    /// Typical tooltip: anchored above its reference, no interaction
    /// behaviors at all, described-by wiring.
    pub fn tooltip() -> Self {
        Self {
            features: OverlayFeatures::ACCESSIBILITY,
            placement: Some(PlacementConfig::default()),
            accessibility: AccessibilityMode::Tooltip,
            ..Self::default()
        }
    }
}
