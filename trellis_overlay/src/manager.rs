// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The overlay manager: registration, show/hide, and cross-overlay
//! coordination.

use alloc::vec::Vec;

use crate::config::{OverlayConfig, OverlayFeatures};
use crate::controller::{
    BackdropState, OverlayEntry, OverlayError, OverlayEvent, OverlayEventKind, OverlayId,
};
use crate::host::{OverlayHost, PositionDriver};
use crate::position::{anchored_position, synced_width, viewport_position};

/// Order features are applied in when an overlay is shown. Teardown runs in
/// reverse, so outer concerns (scroll lock, blocking) wrap inner ones
/// (focus, accessibility) symmetrically.
const FEATURE_ORDER: [OverlayFeatures; 8] = [
    OverlayFeatures::PREVENTS_SCROLL,
    OverlayFeatures::IS_BLOCKING,
    OverlayFeatures::HAS_BACKDROP,
    OverlayFeatures::TRAPS_KEYBOARD_FOCUS,
    OverlayFeatures::HIDES_ON_ESC,
    OverlayFeatures::HIDES_ON_OUTSIDE_CLICK,
    OverlayFeatures::ACCESSIBILITY,
    OverlayFeatures::SYNCS_REFERENCE_WIDTH,
];

/// Desired end state for [`OverlayManager::sync_with`].
#[derive(Copy, Clone, Debug)]
pub struct SyncOptions<K> {
    /// Whether the overlay should be shown after the sync.
    pub is_shown: bool,
    /// Replacement for the node refocused when the overlay next hides;
    /// `None` keeps the current target.
    pub focus_after_hide: Option<K>,
}

/// Work scheduled for the next [`OverlayManager::run_deferred`] call.
enum Deferred {
    /// Decide whether a document click was outside the overlay. Deferred by
    /// one tick so a capture-phase inside report can land first.
    OutsideClickCheck { id: OverlayId, epoch: u64 },
}

/// Coordinator for every overlay in one host.
///
/// The manager owns the per-overlay state and the cross-overlay invariants:
/// scroll lock is held while *any* shown overlay wants it, at most one
/// overlay holds the focus trap, and a blocking overlay suppresses everyone
/// else. Hosts construct one manager per document-equivalent and route user
/// input (escape, document clicks) and animation reports into it.
///
/// Side effects go through `H`; geometry through `D`. Notifications are
/// recorded and drained with [`OverlayManager::drain_events`].
pub struct OverlayManager<K, H, D> {
    host: H,
    driver: D,
    slots: Vec<Option<OverlayEntry<K>>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
    /// Shown overlays in show order; last is topmost.
    shown_stack: Vec<OverlayId>,
    trap_holder: Option<OverlayId>,
    events: Vec<OverlayEvent>,
    deferred: Vec<Deferred>,
    clock: u64,
}

impl<K, H, D> core::fmt::Debug for OverlayManager<K, H, D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OverlayManager")
            .field("overlays", &self.slots.iter().filter(|s| s.is_some()).count())
            .field("shown", &self.shown_stack.len())
            .field("trap_holder", &self.trap_holder)
            .finish_non_exhaustive()
    }
}

impl<K: Copy + Eq, H: OverlayHost<K>, D: PositionDriver<K>> OverlayManager<K, H, D> {
    /// Create a manager over the given host and position driver.
    pub fn new(host: H, driver: D) -> Self {
        Self {
            host,
            driver,
            slots: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            shown_stack: Vec::new(),
            trap_holder: None,
            events: Vec::new(),
            deferred: Vec::new(),
            clock: 0,
        }
    }

    /// The host, for inspection.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The host, mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The position driver, mutably.
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Register an overlay. `reference` is the node anchored positioning and
    /// width syncing measure against (the invoker, usually).
    ///
    /// The overlay starts hidden; the host is told so immediately.
    pub fn add(&mut self, content: K, reference: Option<K>, mut config: OverlayConfig) -> OverlayId {
        normalize(&mut config);
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            (idx, generation)
        } else {
            self.slots.push(None);
            self.generations.push(1);
            (self.slots.len() - 1, 1)
        };
        self.slots[idx] = Some(OverlayEntry::new(generation, content, reference, config));
        self.host.set_visible(content, false);
        OverlayId::new(idx as u32, generation)
    }

    /// Unregister an overlay, hiding it first when shown.
    pub fn remove(&mut self, id: OverlayId) -> Result<(), OverlayError> {
        self.hide(id)?;
        let idx = self.lookup(id)?.1;
        self.slots[idx] = None;
        self.free_list.push(idx);
        Ok(())
    }

    /// The overlay's current configuration.
    pub fn config(&self, id: OverlayId) -> Result<&OverlayConfig, OverlayError> {
        Ok(&self.lookup(id)?.0.config)
    }

    /// Whether the overlay is currently shown.
    pub fn is_shown(&self, id: OverlayId) -> Result<bool, OverlayError> {
        Ok(self.lookup(id)?.0.shown)
    }

    /// Shown overlays, bottom to top.
    pub fn shown(&self) -> &[OverlayId] {
        &self.shown_stack
    }

    /// Show an overlay: make it visible, apply its features in order, and
    /// position it.
    ///
    /// Showing an overlay that is already shown only refreshes its geometry;
    /// no feature is applied twice and no second notification is recorded.
    pub fn show(&mut self, id: OverlayId) -> Result<(), OverlayError> {
        if self.lookup(id)?.0.shown {
            return self.sync(id);
        }
        // Pre-phase notification: the content is still hidden, nothing has
        // been applied yet.
        self.events.push(OverlayEvent {
            id,
            kind: OverlayEventKind::BeforeShown,
        });
        self.clock += 1;
        let clock = self.clock;
        let (content, applied) = {
            let entry = self.lookup_mut(id)?;
            entry.shown = true;
            entry.epoch = clock;
            entry.applied = entry.config.features;
            (entry.content, entry.applied)
        };
        self.shown_stack.push(id);
        self.host.set_visible(content, true);
        for feature in FEATURE_ORDER {
            if applied.contains(feature) {
                self.apply_feature(id, feature);
            }
        }
        self.reposition(id);
        self.events.push(OverlayEvent {
            id,
            kind: OverlayEventKind::Shown,
        });
        Ok(())
    }

    /// Show an overlay and arrange for `focus_after_hide` to be refocused
    /// when it hides (the invoker, typically).
    pub fn show_with_focus(
        &mut self,
        id: OverlayId,
        focus_after_hide: K,
    ) -> Result<(), OverlayError> {
        self.lookup_mut(id)?.focus_after_hide = Some(focus_after_hide);
        self.show(id)
    }

    /// Hide an overlay, tearing its applied features down in reverse
    /// application order. Hiding a hidden overlay is a no-op.
    pub fn hide(&mut self, id: OverlayId) -> Result<(), OverlayError> {
        if !self.lookup(id)?.0.shown {
            return Ok(());
        }
        // Pre-phase notification: features are still in effect.
        self.events.push(OverlayEvent {
            id,
            kind: OverlayEventKind::BeforeHidden,
        });
        self.clock += 1;
        let clock = self.clock;
        let (content, applied) = {
            let entry = self.lookup_mut(id)?;
            entry.shown = false;
            entry.epoch = clock;
            let applied = entry.applied;
            entry.applied = OverlayFeatures::empty();
            (entry.content, applied)
        };
        self.shown_stack.retain(|&o| o != id);
        for feature in FEATURE_ORDER.iter().rev() {
            if applied.contains(*feature) {
                self.teardown_feature(id, *feature);
            }
        }
        self.host.set_visible(content, false);
        if let Some(target) = self.lookup_mut(id)?.focus_after_hide.take() {
            self.host.focus(target);
        }
        self.events.push(OverlayEvent {
            id,
            kind: OverlayEventKind::Hidden,
        });
        Ok(())
    }

    /// Show a hidden overlay, hide a shown one.
    pub fn toggle(&mut self, id: OverlayId) -> Result<(), OverlayError> {
        if self.is_shown(id)? {
            self.hide(id)
        } else {
            self.show(id)
        }
    }

    /// Refresh a shown overlay's width sync and position. Call after layout
    /// changes under the overlay (scroll, resize, content change).
    pub fn sync(&mut self, id: OverlayId) -> Result<(), OverlayError> {
        let (entry, _) = self.lookup(id)?;
        if !entry.shown {
            return Ok(());
        }
        if entry.applied.contains(OverlayFeatures::SYNCS_REFERENCE_WIDTH) {
            self.sync_width(id);
        }
        self.reposition(id);
        Ok(())
    }

    /// Drive an overlay toward a declared end state: show or hide as needed
    /// (refreshing geometry when already shown) and update the post-hide
    /// focus target. This is the entry point for hosts that mirror external
    /// state into the manager rather than issuing individual transitions.
    pub fn sync_with(&mut self, id: OverlayId, options: SyncOptions<K>) -> Result<(), OverlayError> {
        if let Some(target) = options.focus_after_hide {
            self.lookup_mut(id)?.focus_after_hide = Some(target);
        }
        if options.is_shown {
            self.show(id)
        } else {
            self.hide(id)
        }
    }

    /// Replace an overlay's configuration.
    ///
    /// On a shown overlay, features dropped by the new configuration are
    /// torn down (reverse order) and newly wanted ones applied (forward
    /// order); everything else stays untouched, then geometry refreshes.
    pub fn set_config(&mut self, id: OverlayId, mut config: OverlayConfig) -> Result<(), OverlayError> {
        normalize(&mut config);
        let shown = self.lookup(id)?.0.shown;
        if !shown {
            self.lookup_mut(id)?.config = config;
            return Ok(());
        }
        let old = self.lookup(id)?.0.applied;
        let new = config.features;
        let removed = old - new;
        let added = new - old;
        {
            let entry = self.lookup_mut(id)?;
            entry.config = config;
            entry.applied = new;
        }
        for feature in FEATURE_ORDER.iter().rev() {
            if removed.contains(*feature) {
                self.teardown_feature(id, *feature);
            }
        }
        for feature in FEATURE_ORDER {
            if added.contains(feature) {
                self.apply_feature(id, feature);
            }
        }
        self.sync(id)
    }

    /// Take all recorded notifications, oldest first.
    pub fn drain_events(&mut self) -> Vec<OverlayEvent> {
        core::mem::take(&mut self.events)
    }

    /// Report an Escape press. Hides the topmost shown overlay that closes
    /// on Escape; returns whether one did.
    pub fn handle_escape(&mut self) -> bool {
        let target = self.shown_stack.iter().rev().copied().find(|&id| {
            self.lookup(id)
                .is_ok_and(|(e, _)| e.applied.contains(OverlayFeatures::HIDES_ON_ESC))
        });
        match target {
            Some(id) => {
                let _ = self.hide(id);
                true
            }
            None => false,
        }
    }

    /// Report a capture-phase pointer press inside the overlay's content or
    /// invoker. Hosts that cannot attribute a press to a node should call
    /// this anyway: treating an unknown target as inside only keeps an
    /// overlay open, while the opposite guess would close it under the
    /// user's pointer.
    pub fn report_inside_click(&mut self, id: OverlayId) -> Result<(), OverlayError> {
        let entry = self.lookup_mut(id)?;
        if entry.shown && entry.applied.contains(OverlayFeatures::HIDES_ON_OUTSIDE_CLICK) {
            entry.was_click_inside = true;
        }
        Ok(())
    }

    /// Report a document-level pointer press. For every shown overlay that
    /// hides on outside clicks, schedules a deferred check rather than
    /// hiding immediately: the matching inside report (if any) must win
    /// regardless of handler order.
    pub fn report_document_click(&mut self) {
        for id in self.shown_stack.clone() {
            let Ok((entry, _)) = self.lookup(id) else {
                continue;
            };
            if entry.applied.contains(OverlayFeatures::HIDES_ON_OUTSIDE_CLICK) {
                self.deferred.push(Deferred::OutsideClickCheck {
                    id,
                    epoch: entry.epoch,
                });
            }
        }
    }

    /// Run work deferred by one tick (outside-click checks). Hosts call this
    /// from their zero-delay timer or next-microtask hook.
    ///
    /// Checks scheduled before an overlay hid, re-showed, or was removed are
    /// stale and dropped.
    pub fn run_deferred(&mut self) {
        let work = core::mem::take(&mut self.deferred);
        for item in work {
            match item {
                Deferred::OutsideClickCheck { id, epoch } => {
                    let Ok(entry) = self.lookup_mut(id) else {
                        continue;
                    };
                    if entry.epoch != epoch || !entry.shown {
                        continue;
                    }
                    let inside = entry.was_click_inside;
                    entry.was_click_inside = false;
                    if !inside {
                        let _ = self.hide(id);
                    }
                }
            }
        }
    }

    /// Report that an overlay's backdrop animation finished. Removes the
    /// backdrop if it was retiring; otherwise (a fade-in ended, or a stale
    /// report after a quick re-show) does nothing.
    pub fn backdrop_animation_ended(&mut self, id: OverlayId) -> Result<(), OverlayError> {
        let entry = self.lookup_mut(id)?;
        if entry.backdrop == BackdropState::Retiring {
            entry.backdrop = BackdropState::None;
            let content = entry.content;
            self.host.remove_backdrop(content);
        }
        Ok(())
    }

    // ---- feature application --------------------------------------------

    fn apply_feature(&mut self, id: OverlayId, feature: OverlayFeatures) {
        let Ok((entry, _)) = self.lookup(id) else {
            return;
        };
        let content = entry.content;
        if feature == OverlayFeatures::PREVENTS_SCROLL {
            if !self.any_other_shown_with(id, OverlayFeatures::PREVENTS_SCROLL) {
                self.host.set_scroll_lock(true);
            }
        } else if feature == OverlayFeatures::IS_BLOCKING {
            for other in self.shown_contents_except(id) {
                self.host.set_obscured(other, true);
            }
        } else if feature == OverlayFeatures::HAS_BACKDROP {
            // A quick re-show can catch the previous backdrop mid fade-out;
            // replace it rather than animating a corpse.
            if self.lookup(id).is_ok_and(|(e, _)| e.backdrop == BackdropState::Retiring) {
                self.host.remove_backdrop(content);
            }
            if let Ok(entry) = self.lookup_mut(id) {
                entry.backdrop = BackdropState::Shown;
            }
            self.host.show_backdrop(content);
        } else if feature == OverlayFeatures::TRAPS_KEYBOARD_FOCUS {
            if let Some(prev) = self.trap_holder {
                if prev != id {
                    if let Ok((e, _)) = self.lookup(prev) {
                        let prev_content = e.content;
                        self.host.release_focus_trap(prev_content);
                    }
                }
            }
            self.trap_holder = Some(id);
            // Focus the user already moved into the content stays put.
            let focus_initial = !self.host.has_focus_within(content);
            self.host.trap_focus(content, focus_initial);
        } else if feature == OverlayFeatures::HIDES_ON_OUTSIDE_CLICK {
            if let Ok(entry) = self.lookup_mut(id) {
                entry.was_click_inside = false;
            }
        } else if feature == OverlayFeatures::ACCESSIBILITY {
            let mode = self.lookup(id).map(|(e, _)| e.config.accessibility).unwrap_or_default();
            self.host.set_accessibility_shown(content, true, mode);
        } else if feature == OverlayFeatures::SYNCS_REFERENCE_WIDTH {
            self.sync_width(id);
        }
        // HIDES_ON_ESC has no imperative side.
    }

    fn teardown_feature(&mut self, id: OverlayId, feature: OverlayFeatures) {
        let Ok((entry, _)) = self.lookup(id) else {
            return;
        };
        let content = entry.content;
        if feature == OverlayFeatures::PREVENTS_SCROLL {
            if !self.any_other_shown_with(id, OverlayFeatures::PREVENTS_SCROLL) {
                self.host.set_scroll_lock(false);
            }
        } else if feature == OverlayFeatures::IS_BLOCKING {
            for other in self.shown_contents_except(id) {
                self.host.set_obscured(other, false);
            }
            // Another shown blocker takes over.
            let successor = self.shown_stack.iter().rev().copied().find(|&o| {
                o != id
                    && self
                        .lookup(o)
                        .is_ok_and(|(e, _)| e.applied.contains(OverlayFeatures::IS_BLOCKING))
            });
            if let Some(blocker) = successor {
                for other in self.shown_contents_except(blocker) {
                    self.host.set_obscured(other, true);
                }
            }
        } else if feature == OverlayFeatures::HAS_BACKDROP {
            if let Ok(entry) = self.lookup_mut(id) {
                entry.backdrop = BackdropState::Retiring;
            }
            self.host.retire_backdrop(content);
        } else if feature == OverlayFeatures::TRAPS_KEYBOARD_FOCUS {
            if self.trap_holder == Some(id) {
                self.host.release_focus_trap(content);
                self.trap_holder = None;
                // The topmost remaining trapping overlay inherits.
                let successor = self.shown_stack.iter().rev().copied().find(|&o| {
                    self.lookup(o)
                        .is_ok_and(|(e, _)| e.applied.contains(OverlayFeatures::TRAPS_KEYBOARD_FOCUS))
                });
                if let Some(next) = successor {
                    if let Ok((e, _)) = self.lookup(next) {
                        let next_content = e.content;
                        self.trap_holder = Some(next);
                        let focus_initial = !self.host.has_focus_within(next_content);
                        self.host.trap_focus(next_content, focus_initial);
                    }
                }
            }
        } else if feature == OverlayFeatures::HIDES_ON_OUTSIDE_CLICK {
            if let Ok(entry) = self.lookup_mut(id) {
                entry.was_click_inside = false;
            }
        } else if feature == OverlayFeatures::ACCESSIBILITY {
            let mode = self.lookup(id).map(|(e, _)| e.config.accessibility).unwrap_or_default();
            self.host.set_accessibility_shown(content, false, mode);
        }
        // HIDES_ON_ESC and SYNCS_REFERENCE_WIDTH need no teardown.
    }

    // ---- geometry -------------------------------------------------------

    fn sync_width(&mut self, id: OverlayId) {
        let Ok((entry, _)) = self.lookup(id) else {
            return;
        };
        let mode = entry.config.width_mode;
        let content = entry.content;
        let Some(reference) = entry.reference else {
            tracing::warn!("width-synced overlay has no reference node");
            return;
        };
        let Some(reference_rect) = self.driver.reference_rect(reference) else {
            return;
        };
        let Some(size) = self.driver.overlay_size(content) else {
            return;
        };
        let width = synced_width(mode, reference_rect.width(), size.width);
        if width != size.width {
            self.host.set_width(content, width);
        }
    }

    fn reposition(&mut self, id: OverlayId) {
        let Ok((entry, _)) = self.lookup(id) else {
            return;
        };
        if !entry.shown {
            return;
        }
        let content = entry.content;
        if let Some(placement) = entry.config.placement {
            let Some(reference) = entry.reference else {
                tracing::warn!("anchored overlay has no reference node");
                return;
            };
            let Some(reference_rect) = self.driver.reference_rect(reference) else {
                return;
            };
            let Some(size) = self.driver.overlay_size(content) else {
                return;
            };
            let origin = anchored_position(reference_rect, size, self.driver.viewport(), &placement);
            self.driver.place(content, origin);
        } else if let Some(viewport) = entry.config.viewport {
            let Some(size) = self.driver.overlay_size(content) else {
                return;
            };
            let origin = viewport_position(size, self.driver.viewport(), viewport.placement);
            self.driver.place(content, origin);
        }
        // Neither set: the host positions the overlay itself.
    }

    // ---- lookups --------------------------------------------------------

    fn any_other_shown_with(&self, id: OverlayId, feature: OverlayFeatures) -> bool {
        self.shown_stack.iter().any(|&other| {
            other != id && self.lookup(other).is_ok_and(|(e, _)| e.applied.contains(feature))
        })
    }

    fn shown_contents_except(&self, id: OverlayId) -> Vec<K> {
        self.shown_stack
            .iter()
            .filter(|&&other| other != id)
            .filter_map(|&other| self.lookup(other).ok().map(|(e, _)| e.content))
            .collect()
    }

    fn lookup(&self, id: OverlayId) -> Result<(&OverlayEntry<K>, usize), OverlayError> {
        match self.slots.get(id.idx()) {
            Some(Some(entry)) if entry.generation == id.1 => Ok((entry, id.idx())),
            _ => Err(OverlayError::NotRegistered(id)),
        }
    }

    fn lookup_mut(&mut self, id: OverlayId) -> Result<&mut OverlayEntry<K>, OverlayError> {
        match self.slots.get_mut(id.idx()) {
            Some(Some(entry)) if entry.generation == id.1 => Ok(entry),
            _ => Err(OverlayError::NotRegistered(id)),
        }
    }
}

fn normalize(config: &mut OverlayConfig) {
    if config.placement.is_some() && config.viewport.is_some() {
        tracing::warn!("overlay configured with both anchored and viewport positioning; anchored wins");
        config.viewport = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AccessibilityMode, PlacementConfig, ViewportConfig, WidthMode};
    use alloc::vec;
    use kurbo::{Point, Rect, Size};

    /// Host that logs every side effect it is asked to perform.
    #[derive(Default)]
    struct RecordingHost {
        calls: Vec<Call>,
        focus_within: bool,
    }

    #[derive(Clone, Debug, PartialEq)]
    enum Call {
        Visible(u32, bool),
        ScrollLock(bool),
        Obscured(u32, bool),
        ShowBackdrop(u32),
        RetireBackdrop(u32),
        RemoveBackdrop(u32),
        Trap(u32, bool),
        Release(u32),
        Focus(u32),
        A11y(u32, bool, AccessibilityMode),
        Width(u32, f64),
    }

    impl OverlayHost<u32> for RecordingHost {
        fn set_visible(&mut self, content: u32, visible: bool) {
            self.calls.push(Call::Visible(content, visible));
        }
        fn set_scroll_lock(&mut self, locked: bool) {
            self.calls.push(Call::ScrollLock(locked));
        }
        fn set_obscured(&mut self, content: u32, obscured: bool) {
            self.calls.push(Call::Obscured(content, obscured));
        }
        fn show_backdrop(&mut self, content: u32) {
            self.calls.push(Call::ShowBackdrop(content));
        }
        fn retire_backdrop(&mut self, content: u32) {
            self.calls.push(Call::RetireBackdrop(content));
        }
        fn remove_backdrop(&mut self, content: u32) {
            self.calls.push(Call::RemoveBackdrop(content));
        }
        fn trap_focus(&mut self, content: u32, focus_initial: bool) {
            self.calls.push(Call::Trap(content, focus_initial));
        }
        fn release_focus_trap(&mut self, content: u32) {
            self.calls.push(Call::Release(content));
        }
        fn focus(&mut self, node: u32) {
            self.calls.push(Call::Focus(node));
        }
        fn has_focus_within(&self, _content: u32) -> bool {
            self.focus_within
        }
        fn set_accessibility_shown(&mut self, content: u32, shown: bool, mode: AccessibilityMode) {
            self.calls.push(Call::A11y(content, shown, mode));
        }
        fn set_width(&mut self, content: u32, width: f64) {
            self.calls.push(Call::Width(content, width));
        }
    }

    /// Driver with one fixed reference rect and overlay size.
    struct StubDriver {
        placed: Vec<(u32, Point)>,
    }

    impl StubDriver {
        fn new() -> Self {
            Self { placed: Vec::new() }
        }
    }

    impl PositionDriver<u32> for StubDriver {
        fn viewport(&self) -> Rect {
            Rect::new(0.0, 0.0, 800.0, 600.0)
        }
        fn reference_rect(&self, _node: u32) -> Option<Rect> {
            Some(Rect::new(100.0, 100.0, 160.0, 120.0))
        }
        fn overlay_size(&self, _content: u32) -> Option<Size> {
            Some(Size::new(100.0, 40.0))
        }
        fn place(&mut self, content: u32, origin: Point) {
            self.placed.push((content, origin));
        }
    }

    type Manager = OverlayManager<u32, RecordingHost, StubDriver>;

    fn manager() -> Manager {
        OverlayManager::new(RecordingHost::default(), StubDriver::new())
    }

    fn calls(mgr: &mut Manager) -> Vec<Call> {
        core::mem::take(&mut mgr.host_mut().calls)
    }

    #[test]
    fn show_is_idempotent() {
        let mut mgr = manager();
        let id = mgr.add(1, None, OverlayConfig::dialog());
        mgr.show(id).unwrap();
        let first = calls(&mut mgr);
        assert!(first.contains(&Call::ShowBackdrop(1)));
        assert!(first.contains(&Call::Trap(1, true)));

        // Showing again only refreshes geometry.
        mgr.show(id).unwrap();
        assert_eq!(calls(&mut mgr), vec![]);
        let kinds: Vec<OverlayEventKind> = mgr.drain_events().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![OverlayEventKind::BeforeShown, OverlayEventKind::Shown]);
    }

    #[test]
    fn hide_tears_features_down_in_reverse_order() {
        let mut mgr = manager();
        let id = mgr.add(1, None, OverlayConfig::dialog());
        // Discard the `Visible(1, false)` the host receives at registration.
        calls(&mut mgr);
        mgr.show(id).unwrap();
        let shown = calls(&mut mgr);
        assert_eq!(
            shown,
            vec![
                Call::Visible(1, true),
                Call::ScrollLock(true),
                Call::ShowBackdrop(1),
                Call::Trap(1, true),
                Call::A11y(1, true, AccessibilityMode::Expanded),
            ]
        );

        mgr.hide(id).unwrap();
        assert_eq!(
            calls(&mut mgr),
            vec![
                Call::A11y(1, false, AccessibilityMode::Expanded),
                Call::Release(1),
                Call::RetireBackdrop(1),
                Call::ScrollLock(false),
                Call::Visible(1, false),
            ]
        );
        // Hiding again is a no-op.
        mgr.hide(id).unwrap();
        assert_eq!(calls(&mut mgr), vec![]);
        let kinds: Vec<OverlayEventKind> = mgr.drain_events().iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                OverlayEventKind::BeforeShown,
                OverlayEventKind::Shown,
                OverlayEventKind::BeforeHidden,
                OverlayEventKind::Hidden,
            ]
        );
    }

    #[test]
    fn scroll_lock_is_shared_across_overlays() {
        let mut mgr = manager();
        let a = mgr.add(1, None, OverlayConfig::dialog());
        let b = mgr.add(2, None, OverlayConfig::dialog());
        mgr.show(a).unwrap();
        mgr.show(b).unwrap();
        // Only the first show locks.
        let locks = |c: &Vec<Call>| {
            c.iter()
                .filter(|c| matches!(c, Call::ScrollLock(_)))
                .cloned()
                .collect::<Vec<Call>>()
        };
        assert_eq!(locks(&calls(&mut mgr)), vec![Call::ScrollLock(true)]);

        // Unlock only when the last locking overlay hides.
        mgr.hide(a).unwrap();
        assert_eq!(locks(&calls(&mut mgr)), vec![]);
        mgr.hide(b).unwrap();
        assert_eq!(locks(&calls(&mut mgr)), vec![Call::ScrollLock(false)]);
    }

    fn blocking() -> OverlayConfig {
        OverlayConfig {
            features: OverlayFeatures::IS_BLOCKING,
            ..OverlayConfig::default()
        }
    }

    #[test]
    fn newest_blocker_wins_and_hands_back_on_hide() {
        let mut mgr = manager();
        let plain = mgr.add(1, None, OverlayConfig::default());
        let first = mgr.add(2, None, blocking());
        let second = mgr.add(3, None, blocking());
        mgr.show(plain).unwrap();
        mgr.show(first).unwrap();
        calls(&mut mgr);

        mgr.show(second).unwrap();
        let c = calls(&mut mgr);
        assert!(c.contains(&Call::Obscured(1, true)));
        assert!(c.contains(&Call::Obscured(2, true)));

        // Hiding the top blocker re-asserts the remaining one.
        mgr.hide(second).unwrap();
        let c = calls(&mut mgr);
        assert!(c.contains(&Call::Obscured(1, true)));
        assert!(!c.contains(&Call::Obscured(2, true)));

        // Hiding the last blocker frees everyone.
        mgr.hide(first).unwrap();
        let c = calls(&mut mgr);
        assert!(c.contains(&Call::Obscured(1, false)));
    }

    #[test]
    fn focus_trap_moves_to_the_newest_holder_and_back() {
        let mut mgr = manager();
        let a = mgr.add(1, None, OverlayConfig::dialog());
        let b = mgr.add(2, None, OverlayConfig::dialog());
        mgr.show(a).unwrap();
        calls(&mut mgr);

        mgr.show(b).unwrap();
        let c = calls(&mut mgr);
        assert!(c.contains(&Call::Release(1)));
        assert!(c.contains(&Call::Trap(2, true)));

        mgr.hide(b).unwrap();
        let c = calls(&mut mgr);
        assert!(c.contains(&Call::Release(2)));
        // The remaining shown trapping overlay inherits the trap.
        assert!(c.contains(&Call::Trap(1, true)));
    }

    #[test]
    fn escape_hides_only_the_topmost_escape_closable_overlay() {
        let mut mgr = manager();
        let tooltip = mgr.add(1, Some(10), OverlayConfig::tooltip());
        let dialog = mgr.add(2, None, OverlayConfig::dialog());
        mgr.show(tooltip).unwrap();
        mgr.show(dialog).unwrap();

        assert!(mgr.handle_escape());
        assert!(!mgr.is_shown(dialog).unwrap());
        assert!(mgr.is_shown(tooltip).unwrap());
        // The tooltip does not close on Escape.
        assert!(!mgr.handle_escape());
        assert!(mgr.is_shown(tooltip).unwrap());
    }

    #[test]
    fn outside_click_hides_after_the_deferred_check() {
        let mut mgr = manager();
        let id = mgr.add(1, Some(10), OverlayConfig::dropdown());
        mgr.show(id).unwrap();

        mgr.report_document_click();
        // Still shown until the zero-delay check runs.
        assert!(mgr.is_shown(id).unwrap());
        mgr.run_deferred();
        assert!(!mgr.is_shown(id).unwrap());
    }

    #[test]
    fn inside_click_keeps_the_overlay_open_once() {
        let mut mgr = manager();
        let id = mgr.add(1, Some(10), OverlayConfig::dropdown());
        mgr.show(id).unwrap();

        mgr.report_inside_click(id).unwrap();
        mgr.report_document_click();
        mgr.run_deferred();
        assert!(mgr.is_shown(id).unwrap());

        // The inside flag was consumed; the next document click closes.
        mgr.report_document_click();
        mgr.run_deferred();
        assert!(!mgr.is_shown(id).unwrap());
    }

    #[test]
    fn stale_outside_click_checks_are_dropped() {
        let mut mgr = manager();
        let id = mgr.add(1, Some(10), OverlayConfig::dropdown());
        mgr.show(id).unwrap();
        mgr.report_document_click();

        // The overlay hid and re-showed before the check ran; the check
        // belongs to the old appearance and must not close the new one.
        mgr.hide(id).unwrap();
        mgr.show(id).unwrap();
        mgr.run_deferred();
        assert!(mgr.is_shown(id).unwrap());

        // Removal between scheduling and running is also safe.
        mgr.report_document_click();
        mgr.remove(id).unwrap();
        mgr.run_deferred();
    }

    #[test]
    fn backdrop_is_removed_on_animation_end_only() {
        let mut mgr = manager();
        let id = mgr.add(1, None, OverlayConfig::dialog());
        mgr.show(id).unwrap();
        mgr.hide(id).unwrap();
        let c = calls(&mut mgr);
        assert!(c.contains(&Call::RetireBackdrop(1)));
        assert!(!c.contains(&Call::RemoveBackdrop(1)));

        mgr.backdrop_animation_ended(id).unwrap();
        assert_eq!(calls(&mut mgr), vec![Call::RemoveBackdrop(1)]);
        // A duplicate report is ignored.
        mgr.backdrop_animation_ended(id).unwrap();
        assert_eq!(calls(&mut mgr), vec![]);
    }

    #[test]
    fn quick_reshow_replaces_a_retiring_backdrop() {
        let mut mgr = manager();
        let id = mgr.add(1, None, OverlayConfig::dialog());
        mgr.show(id).unwrap();
        mgr.hide(id).unwrap();
        calls(&mut mgr);

        // Re-shown before the fade-out finished.
        mgr.show(id).unwrap();
        let c = calls(&mut mgr);
        let backdrops: Vec<Call> = c
            .iter()
            .filter(|c| {
                matches!(
                    c,
                    Call::ShowBackdrop(_) | Call::RemoveBackdrop(_) | Call::RetireBackdrop(_)
                )
            })
            .cloned()
            .collect();
        assert_eq!(backdrops, vec![Call::RemoveBackdrop(1), Call::ShowBackdrop(1)]);

        // The stale animation-end report for the removed backdrop is a no-op.
        mgr.backdrop_animation_ended(id).unwrap();
        assert_eq!(calls(&mut mgr), vec![]);
    }

    #[test]
    fn anchored_overlay_is_placed_and_width_synced() {
        let mut mgr = manager();
        let id = mgr.add(1, Some(10), OverlayConfig::dropdown());
        mgr.show(id).unwrap();

        // Full width mode: reference is 60 wide, natural width 100.
        assert!(calls(&mut mgr).contains(&Call::Width(1, 60.0)));
        let placed = core::mem::take(&mut mgr.driver_mut().placed);
        // BottomStart of (100,100)-(160,120) with distance 8.
        assert_eq!(placed, vec![(1, Point::new(100.0, 128.0))]);
    }

    #[test]
    fn viewport_overlay_is_centered() {
        let mut mgr = manager();
        let id = mgr.add(1, None, OverlayConfig::dialog());
        mgr.show(id).unwrap();
        let placed = core::mem::take(&mut mgr.driver_mut().placed);
        assert_eq!(placed, vec![(1, Point::new(350.0, 280.0))]);
    }

    #[test]
    fn conflicting_positioning_resolves_to_anchored() {
        let mut mgr = manager();
        let id = mgr.add(
            1,
            Some(10),
            OverlayConfig {
                placement: Some(PlacementConfig::default()),
                viewport: Some(ViewportConfig::default()),
                ..OverlayConfig::default()
            },
        );
        let config = mgr.config(id).unwrap();
        assert!(config.placement.is_some());
        assert!(config.viewport.is_none());
    }

    #[test]
    fn set_config_diffs_features_while_shown() {
        let mut mgr = manager();
        let id = mgr.add(1, None, OverlayConfig::default());
        mgr.show(id).unwrap();
        calls(&mut mgr);

        // Add a backdrop without re-showing.
        mgr.set_config(
            id,
            OverlayConfig {
                features: OverlayFeatures::HAS_BACKDROP,
                ..OverlayConfig::default()
            },
        )
        .unwrap();
        assert_eq!(calls(&mut mgr), vec![Call::ShowBackdrop(1)]);

        // Drop it again.
        mgr.set_config(id, OverlayConfig::default()).unwrap();
        assert_eq!(calls(&mut mgr), vec![Call::RetireBackdrop(1)]);
        assert!(mgr.is_shown(id).unwrap());
    }

    #[test]
    fn width_mode_change_applies_on_sync() {
        let mut mgr = manager();
        let mut config = OverlayConfig::dropdown();
        config.width_mode = WidthMode::Min;
        let id = mgr.add(1, Some(10), config);
        mgr.show(id).unwrap();
        // Min mode: natural 100 already exceeds reference 60, no host call.
        assert!(!calls(&mut mgr).iter().any(|c| matches!(c, Call::Width(..))));

        mgr.sync(id).unwrap();
        let placed = &mgr.driver_mut().placed;
        assert_eq!(placed.len(), 2);
    }

    #[test]
    fn show_with_focus_restores_the_invoker_on_hide() {
        let mut mgr = manager();
        let id = mgr.add(1, Some(10), OverlayConfig::dropdown());
        mgr.show_with_focus(id, 10).unwrap();
        calls(&mut mgr);
        mgr.hide(id).unwrap();
        assert!(calls(&mut mgr).contains(&Call::Focus(10)));

        // The restore target does not survive into the next appearance.
        mgr.show(id).unwrap();
        mgr.hide(id).unwrap();
        assert!(!calls(&mut mgr).contains(&Call::Focus(10)));
    }

    #[test]
    fn removed_ids_are_invalid_and_slots_are_reused_safely() {
        let mut mgr = manager();
        let id = mgr.add(1, None, OverlayConfig::dialog());
        mgr.show(id).unwrap();
        mgr.remove(id).unwrap();
        // Removal hid it first.
        assert!(mgr.shown().is_empty());
        assert_eq!(mgr.show(id), Err(OverlayError::NotRegistered(id)));

        let fresh = mgr.add(2, None, OverlayConfig::default());
        assert_ne!(fresh, id);
        assert_eq!(mgr.is_shown(id), Err(OverlayError::NotRegistered(id)));
        assert!(!mgr.is_shown(fresh).unwrap());
    }

    #[test]
    fn toggle_flips_visibility() {
        let mut mgr = manager();
        let id = mgr.add(1, None, OverlayConfig::default());
        mgr.toggle(id).unwrap();
        assert!(mgr.is_shown(id).unwrap());
        mgr.toggle(id).unwrap();
        assert!(!mgr.is_shown(id).unwrap());
    }

    #[test]
    fn pre_phase_notifications_precede_side_effects() {
        let mut mgr = manager();
        let id = mgr.add(1, None, OverlayConfig::dialog());
        mgr.show(id).unwrap();
        // The pre-show notification is recorded while the content is still
        // hidden; the host has not been touched yet.
        let events = mgr.drain_events();
        assert_eq!(events[0].kind, OverlayEventKind::BeforeShown);
        assert!(mgr.is_shown(id).unwrap());

        mgr.hide(id).unwrap();
        let kinds: Vec<OverlayEventKind> = mgr.drain_events().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![OverlayEventKind::BeforeHidden, OverlayEventKind::Hidden]);
        // Idempotent transitions record no pre-phase notification either.
        mgr.hide(id).unwrap();
        assert!(mgr.drain_events().is_empty());
    }

    #[test]
    fn sync_with_drives_visibility_and_focus_restore() {
        let mut mgr = manager();
        let id = mgr.add(1, Some(10), OverlayConfig::dropdown());

        mgr.sync_with(
            id,
            SyncOptions {
                is_shown: true,
                focus_after_hide: Some(10),
            },
        )
        .unwrap();
        assert!(mgr.is_shown(id).unwrap());
        calls(&mut mgr);
        mgr.drain_events();

        // Syncing to shown again refreshes geometry without transitioning.
        mgr.sync_with(
            id,
            SyncOptions {
                is_shown: true,
                focus_after_hide: None,
            },
        )
        .unwrap();
        assert!(mgr.drain_events().is_empty());
        assert!(!calls(&mut mgr).contains(&Call::Visible(1, true)));

        // Syncing to hidden hides and restores the recorded focus target.
        mgr.sync_with(
            id,
            SyncOptions {
                is_shown: false,
                focus_after_hide: None,
            },
        )
        .unwrap();
        assert!(!mgr.is_shown(id).unwrap());
        assert!(calls(&mut mgr).contains(&Call::Focus(10)));
    }

    #[test]
    fn accessibility_mode_reaches_the_host() {
        let mut mgr = manager();
        let tip = mgr.add(1, Some(10), OverlayConfig::tooltip());
        let menu = mgr.add(2, Some(10), OverlayConfig::dropdown());
        mgr.show(tip).unwrap();
        mgr.show(menu).unwrap();
        let c = calls(&mut mgr);
        assert!(c.contains(&Call::A11y(1, true, AccessibilityMode::Tooltip)));
        assert!(c.contains(&Call::A11y(2, true, AccessibilityMode::Expanded)));

        mgr.hide(tip).unwrap();
        assert!(calls(&mut mgr).contains(&Call::A11y(1, false, AccessibilityMode::Tooltip)));
    }

    #[test]
    fn trap_leaves_focus_alone_when_already_inside_the_content() {
        let mut mgr = manager();
        let id = mgr.add(1, None, OverlayConfig::dialog());
        mgr.host_mut().focus_within = true;
        mgr.show(id).unwrap();
        assert!(calls(&mut mgr).contains(&Call::Trap(1, false)));
    }
}
