// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pure positioning math: where an overlay goes, given rectangles.
//!
//! Everything here is a function from geometry to geometry; the manager
//! fetches rectangles from its [`PositionDriver`](crate::PositionDriver) and
//! writes the computed origin back through it.

use kurbo::{Point, Rect, Size};

use crate::config::{Placement, PlacementConfig, ViewportPlacement, WidthMode};

/// Top-left origin for an overlay anchored to `reference`.
///
/// Applies, in order: the preferred placement with its skid/distance
/// offsets, a flip to the opposite side when the preferred side lacks room
/// and the opposite side has more, and a clamp into the viewport.
pub fn anchored_position(
    reference: Rect,
    overlay: Size,
    viewport: Rect,
    cfg: &PlacementConfig,
) -> Point {
    let placement = if cfg.flip {
        resolve_flip(reference, overlay, viewport, cfg)
    } else {
        cfg.placement
    };
    let origin = place(reference, overlay, placement, cfg.skid, cfg.distance);
    if cfg.prevent_overflow {
        clamp_into(origin, overlay, viewport, cfg.overflow_padding)
    } else {
        origin
    }
}

/// Top-left origin for an overlay placed relative to the viewport.
pub fn viewport_position(overlay: Size, viewport: Rect, placement: ViewportPlacement) -> Point {
    let center_x = viewport.x0 + (viewport.width() - overlay.width) / 2.0;
    let center_y = viewport.y0 + (viewport.height() - overlay.height) / 2.0;
    let right = viewport.x1 - overlay.width;
    let bottom = viewport.y1 - overlay.height;
    match placement {
        ViewportPlacement::Center => Point::new(center_x, center_y),
        ViewportPlacement::Top => Point::new(center_x, viewport.y0),
        ViewportPlacement::TopLeft => Point::new(viewport.x0, viewport.y0),
        ViewportPlacement::TopRight => Point::new(right, viewport.y0),
        ViewportPlacement::Bottom => Point::new(center_x, bottom),
        ViewportPlacement::BottomLeft => Point::new(viewport.x0, bottom),
        ViewportPlacement::BottomRight => Point::new(right, bottom),
        ViewportPlacement::Left => Point::new(viewport.x0, center_y),
        ViewportPlacement::Right => Point::new(right, center_y),
    }
}

/// Overlay width under a [`WidthMode`], given the reference width and the
/// overlay's natural width.
pub fn synced_width(mode: WidthMode, reference_width: f64, natural_width: f64) -> f64 {
    match mode {
        WidthMode::None => natural_width,
        WidthMode::Min => natural_width.max(reference_width),
        WidthMode::Max => natural_width.min(reference_width),
        WidthMode::Full => reference_width,
    }
}

/// Room between the reference and the viewport edge on the given side.
fn room(reference: Rect, viewport: Rect, placement: Placement) -> f64 {
    match placement {
        Placement::Top | Placement::TopStart | Placement::TopEnd => reference.y0 - viewport.y0,
        Placement::Bottom | Placement::BottomStart | Placement::BottomEnd => {
            viewport.y1 - reference.y1
        }
        Placement::Left | Placement::LeftStart | Placement::LeftEnd => reference.x0 - viewport.x0,
        Placement::Right | Placement::RightStart | Placement::RightEnd => {
            viewport.x1 - reference.x1
        }
    }
}

fn resolve_flip(
    reference: Rect,
    overlay: Size,
    viewport: Rect,
    cfg: &PlacementConfig,
) -> Placement {
    let main = if cfg.placement.is_vertical() {
        overlay.height
    } else {
        overlay.width
    };
    let needed = main + cfg.distance + cfg.flip_padding;
    let preferred = room(reference, viewport, cfg.placement);
    if preferred >= needed {
        return cfg.placement;
    }
    let opposite = room(reference, viewport, cfg.placement.flipped());
    if opposite > preferred {
        cfg.placement.flipped()
    } else {
        cfg.placement
    }
}

fn place(reference: Rect, overlay: Size, placement: Placement, skid: f64, distance: f64) -> Point {
    let above = reference.y0 - distance - overlay.height;
    let below = reference.y1 + distance;
    let before = reference.x0 - distance - overlay.width;
    let after = reference.x1 + distance;
    let center_x = reference.x0 + (reference.width() - overlay.width) / 2.0;
    let center_y = reference.y0 + (reference.height() - overlay.height) / 2.0;
    let end_x = reference.x1 - overlay.width;
    let end_y = reference.y1 - overlay.height;
    match placement {
        Placement::Top => Point::new(center_x + skid, above),
        Placement::TopStart => Point::new(reference.x0 + skid, above),
        Placement::TopEnd => Point::new(end_x + skid, above),
        Placement::Bottom => Point::new(center_x + skid, below),
        Placement::BottomStart => Point::new(reference.x0 + skid, below),
        Placement::BottomEnd => Point::new(end_x + skid, below),
        Placement::Left => Point::new(before, center_y + skid),
        Placement::LeftStart => Point::new(before, reference.y0 + skid),
        Placement::LeftEnd => Point::new(before, end_y + skid),
        Placement::Right => Point::new(after, center_y + skid),
        Placement::RightStart => Point::new(after, reference.y0 + skid),
        Placement::RightEnd => Point::new(after, end_y + skid),
    }
}

fn clamp_into(origin: Point, overlay: Size, viewport: Rect, padding: f64) -> Point {
    let min_x = viewport.x0 + padding;
    let max_x = viewport.x1 - padding - overlay.width;
    let min_y = viewport.y0 + padding;
    let max_y = viewport.y1 - padding - overlay.height;
    // When the overlay is wider than the padded viewport, prefer the start
    // edge so the content's beginning stays reachable.
    Point::new(
        if max_x < min_x { min_x } else { origin.x.clamp(min_x, max_x) },
        if max_y < min_y { min_y } else { origin.y.clamp(min_y, max_y) },
    )
}
