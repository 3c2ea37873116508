// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Overlay: a host-agnostic overlay manager.
//!
//! Overlays (dialogs, dropdowns, tooltips, bottom sheets) differ less in
//! kind than in which behaviors they enable. This crate models each overlay
//! as a content node plus an [`OverlayConfig`]: a set of composable
//! [`OverlayFeatures`] (scroll lock, blocking, backdrop, focus trap, Escape,
//! outside-click, accessibility wiring, reference-width syncing) and one of
//! two positioning modes (anchored to a reference via [`PlacementConfig`],
//! or viewport-relative via [`ViewportConfig`]).
//!
//! The [`OverlayManager`] owns all overlays of one document-equivalent and
//! enforces the invariants that only make sense globally: scroll stays
//! locked while any shown overlay wants it, exactly one overlay holds the
//! keyboard focus trap, and the newest blocking overlay suppresses the
//! rest. Features are applied in a fixed order on show and torn down in
//! reverse on hide.
//!
//! The manager performs no platform work itself. Side effects go through an
//! [`OverlayHost`] implementation, geometry through a [`PositionDriver`],
//! and user input comes in as plain method calls (`handle_escape`,
//! `report_document_click`, `backdrop_animation_ended`).
//!
//! ## Example
//!
//! A dropdown that closes when the user clicks elsewhere:
//!
//! ```rust
//! use kurbo::{Point, Rect, Size};
//! use trellis_overlay::{OverlayConfig, OverlayHost, OverlayManager, PositionDriver};
//!
//! struct Host;
//! impl OverlayHost<u32> for Host {
//!     fn set_visible(&mut self, _content: u32, _visible: bool) {}
//! }
//!
//! struct Driver;
//! impl PositionDriver<u32> for Driver {
//!     fn viewport(&self) -> Rect {
//!         Rect::new(0.0, 0.0, 800.0, 600.0)
//!     }
//!     fn reference_rect(&self, _node: u32) -> Option<Rect> {
//!         Some(Rect::new(100.0, 100.0, 160.0, 120.0))
//!     }
//!     fn overlay_size(&self, _content: u32) -> Option<Size> {
//!         Some(Size::new(100.0, 40.0))
//!     }
//!     fn place(&mut self, _content: u32, _origin: Point) {}
//! }
//!
//! let mut overlays = OverlayManager::new(Host, Driver);
//! let invoker = 2_u32;
//! let menu = overlays.add(1, Some(invoker), OverlayConfig::dropdown());
//!
//! overlays.show_with_focus(menu, invoker).unwrap();
//! assert!(overlays.is_shown(menu).unwrap());
//!
//! // A click lands somewhere else in the document; one tick later the
//! // deferred check closes the menu.
//! overlays.report_document_click();
//! overlays.run_deferred();
//! assert!(!overlays.is_shown(menu).unwrap());
//! ```
//!
//! This crate is `no_std` and uses `alloc`; enable the `libm` feature on
//! targets without std.

#![no_std]

extern crate alloc;

mod config;
mod controller;
mod host;
mod manager;
mod position;

pub use config::{
    AccessibilityMode, OverlayConfig, OverlayFeatures, Placement, PlacementConfig, ViewportConfig,
    ViewportPlacement, WidthMode,
};
pub use controller::{OverlayError, OverlayEvent, OverlayEventKind, OverlayId};
pub use host::{OverlayHost, PositionDriver};
pub use manager::{OverlayManager, SyncOptions};
pub use position::{anchored_position, synced_width, viewport_position};
