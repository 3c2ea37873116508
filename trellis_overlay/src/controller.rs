// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-overlay identifiers, state, and notifications.

use thiserror::Error;

use crate::config::{OverlayConfig, OverlayFeatures};

/// Identifier for an overlay registered with a manager (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct OverlayId(pub(crate) u32, pub(crate) u32);

impl OverlayId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Errors reported by manager operations.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum OverlayError {
    /// The overlay id does not refer to a registered overlay.
    #[error("unknown or removed overlay {0:?}")]
    NotRegistered(OverlayId),
}

/// What happened to an overlay.
///
/// Every transition records a pre-phase notification before any side effect
/// runs and a terminal one after, so observers can prepare content while it
/// is still hidden (or still visible).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OverlayEventKind {
    /// The overlay is about to become visible; no feature has been applied
    /// yet.
    BeforeShown,
    /// The overlay became visible.
    Shown,
    /// The overlay is about to hide; its features are still in effect.
    BeforeHidden,
    /// The overlay was hidden.
    Hidden,
}

/// A recorded overlay notification, drained via
/// [`OverlayManager::drain_events`](crate::OverlayManager::drain_events).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OverlayEvent {
    /// The overlay the notification is about.
    pub id: OverlayId,
    /// What happened.
    pub kind: OverlayEventKind,
}

/// Lifecycle of an overlay's backdrop.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum BackdropState {
    /// No backdrop node exists.
    #[default]
    None,
    /// Backdrop is present (fading in or steady).
    Shown,
    /// Fade-out started; removal waits for the animation-end report.
    Retiring,
}

/// State the manager keeps per registered overlay.
pub(crate) struct OverlayEntry<K> {
    pub(crate) generation: u32,
    pub(crate) content: K,
    pub(crate) reference: Option<K>,
    pub(crate) config: OverlayConfig,
    pub(crate) shown: bool,
    /// Bumped on every show/hide; deferred work carries the epoch it was
    /// scheduled under and is dropped when the entry has moved on.
    pub(crate) epoch: u64,
    /// Snapshot of the features actually applied at show time. Teardown
    /// walks this, not the live config, so a config change while shown
    /// cannot leave a feature half-applied.
    pub(crate) applied: OverlayFeatures,
    pub(crate) backdrop: BackdropState,
    pub(crate) was_click_inside: bool,
    pub(crate) focus_after_hide: Option<K>,
}

impl<K> OverlayEntry<K> {
    pub(crate) fn new(generation: u32, content: K, reference: Option<K>, config: OverlayConfig) -> Self {
        Self {
            generation,
            content,
            reference,
            config,
            shown: false,
            epoch: 0,
            applied: OverlayFeatures::empty(),
            backdrop: BackdropState::None,
            was_click_inside: false,
            focus_after_hide: None,
        }
    }
}
