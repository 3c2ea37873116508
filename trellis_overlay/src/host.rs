// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host boundary traits.
//!
//! The manager never touches a widget tree directly. Everything it wants
//! done in the host goes through [`OverlayHost`] (imperative side effects)
//! and [`PositionDriver`] (geometry in, placement out). Hosts implement as
//! much as they support; every hook except visibility has a no-op default.

use kurbo::{Point, Rect, Size};

use crate::config::AccessibilityMode;

/// Side effects the manager asks the host to perform.
///
/// `K` identifies a node in the host's tree; a DOM element handle, an entity
/// id, whatever the host uses. Hooks for features the host never enables can
/// keep their default no-op bodies.
pub trait OverlayHost<K> {
    /// Show or hide the overlay content node.
    fn set_visible(&mut self, content: K, visible: bool);

    /// Lock or unlock scrolling of the document behind the overlays.
    fn set_scroll_lock(&mut self, _locked: bool) {}

    /// Visually suppress (or restore) an overlay obscured by a blocking one.
    fn set_obscured(&mut self, _content: K, _obscured: bool) {}

    /// Put a backdrop behind `content`, fading in.
    fn show_backdrop(&mut self, _content: K) {}

    /// Start the backdrop's fade-out. The host reports the end of the
    /// animation through
    /// [`OverlayManager::backdrop_animation_ended`](crate::OverlayManager::backdrop_animation_ended),
    /// which is when removal happens.
    fn retire_backdrop(&mut self, _content: K) {}

    /// Remove the backdrop node entirely.
    fn remove_backdrop(&mut self, _content: K) {}

    /// Contain keyboard focus within `content`. When `focus_initial` is
    /// false, focus already sits inside the content and must stay where the
    /// user put it; install the trap without moving focus.
    fn trap_focus(&mut self, _content: K, _focus_initial: bool) {}

    /// Release a focus trap previously set on `content`.
    fn release_focus_trap(&mut self, _content: K) {}

    /// Move focus to a node (used to restore the invoker's focus on hide).
    fn focus(&mut self, _node: K) {}

    /// Whether keyboard focus is currently inside `content`.
    fn has_focus_within(&self, _content: K) -> bool {
        false
    }

    /// Update shown/hidden accessibility attributes on the content and its
    /// invoker, per the configured wiring mode.
    fn set_accessibility_shown(&mut self, _content: K, _shown: bool, _mode: AccessibilityMode) {}

    /// Set the overlay's width (reference-width syncing).
    fn set_width(&mut self, _content: K, _width: f64) {}
}

/// Geometry source and sink for positioning.
///
/// Rect queries return `None` when the node is not currently laid out; the
/// manager then skips positioning rather than placing the overlay at a
/// garbage origin.
pub trait PositionDriver<K> {
    /// The viewport rectangle overlays are constrained to.
    fn viewport(&self) -> Rect;

    /// Bounding rectangle of a reference (invoker/anchor) node.
    fn reference_rect(&self, node: K) -> Option<Rect>;

    /// Current size of the overlay content.
    ///
    /// Queried after any width sync, so the size reflects the synced width.
    fn overlay_size(&self, content: K) -> Option<Size>;

    /// Move the overlay content so its top-left corner sits at `origin`.
    fn place(&mut self, content: K, origin: Point);
}
