// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard and pointer interaction for a listbox over a choice group.

use trellis_form::{FormTree, FormTreeError, NodeId};

/// Keys a listbox reacts to. Hosts translate their own key events into
/// these before calling [`ListboxController::handle_key`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[allow(missing_docs, reason = "key names speak for themselves")]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    Enter,
    Space,
}

/// Main axis of the listbox; decides which arrow pair navigates.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    /// Up/Down arrows navigate.
    #[default]
    Vertical,
    /// Left/Right arrows navigate.
    Horizontal,
}

/// Behavior switches for a [`ListboxController`].
#[derive(Copy, Clone, Debug)]
pub struct ListboxOptions {
    /// Whether multiple options can be checked at once.
    pub multiselectable: bool,
    /// Main axis; the cross-axis arrow pair is left unhandled.
    pub orientation: Orientation,
    /// Whether arrow navigation wraps at the ends (stops there otherwise).
    pub rotate_navigation: bool,
    /// Whether moving the active option also selects it ("selection follows
    /// focus"). Ignored, and forced off, when `multiselectable` is set:
    /// selecting on every arrow press would make range building impossible.
    pub auto_select: bool,
}

impl Default for ListboxOptions {
    fn default() -> Self {
        Self {
            multiselectable: false,
            orientation: Orientation::Vertical,
            rotate_navigation: false,
            auto_select: true,
        }
    }
}

/// What a handled interaction asks the host to do.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListboxEffect {
    /// Whether the controller consumed the input. Unhandled keys should fall
    /// through to the host's own handling.
    pub handled: bool,
    /// Newly active option the host should scroll into view (see
    /// [`scroll_correction`](crate::scroll_correction)) and point
    /// active-descendant wiring at.
    pub activated: Option<NodeId>,
}

impl ListboxEffect {
    fn unhandled() -> Self {
        Self::default()
    }

    fn handled(activated: Option<NodeId>) -> Self {
        Self {
            handled: true,
            activated,
        }
    }
}

/// Interaction state machine for one listbox.
///
/// The controller owns only interaction state (which option is active, the
/// behavior switches); the options themselves, their checked state, and the
/// resulting value notifications live in the [`FormTree`]. Selection goes
/// through [`FormTree::set_checked`], so composites above the listbox see
/// user selections as ordinary repropagated changes.
#[derive(Clone, Debug)]
pub struct ListboxController {
    group: NodeId,
    active: Option<NodeId>,
    multiselectable: bool,
    orientation: Orientation,
    rotate_navigation: bool,
    auto_select: bool,
}

impl ListboxController {
    /// Create a controller for the choice group `group`.
    pub fn new(group: NodeId, options: ListboxOptions) -> Self {
        Self {
            group,
            active: None,
            multiselectable: options.multiselectable,
            orientation: options.orientation,
            rotate_navigation: options.rotate_navigation,
            auto_select: options.auto_select && !options.multiselectable,
        }
    }

    /// The choice group this controller drives.
    pub fn group(&self) -> NodeId {
        self.group
    }

    /// The currently active (keyboard-highlighted) option.
    pub fn active(&self) -> Option<NodeId> {
        self.active
    }

    /// Whether multiple options can be checked at once.
    pub fn multiselectable(&self) -> bool {
        self.multiselectable
    }

    /// Activate the option a freshly opened listbox should highlight: the
    /// first checked enabled option, or the first enabled option when
    /// nothing is checked.
    pub fn activate_initial<V>(
        &mut self,
        tree: &mut FormTree<V>,
    ) -> Result<ListboxEffect, FormTreeError> {
        let target = self
            .enabled_options(tree)?
            .into_iter()
            .find(|&opt| {
                tree.choice(opt)
                    .ok()
                    .flatten()
                    .is_some_and(|state| state.checked)
            })
            .or(self.first_enabled(tree)?);
        self.activate(tree, target)?;
        Ok(ListboxEffect::handled(target))
    }

    /// Handle a key press.
    ///
    /// Arrow keys on the main axis move the active option, skipping disabled
    /// ones; `Home`/`End` jump to the edges; `Enter`/`Space` select the
    /// active option (toggle it, for multiselect). With `auto_select`,
    /// moving also selects.
    pub fn handle_key<V>(
        &mut self,
        tree: &mut FormTree<V>,
        key: Key,
    ) -> Result<ListboxEffect, FormTreeError> {
        let (forward, backward) = match self.orientation {
            Orientation::Vertical => (Key::ArrowDown, Key::ArrowUp),
            Orientation::Horizontal => (Key::ArrowRight, Key::ArrowLeft),
        };
        let target = if key == forward {
            self.step(tree, 1)?
        } else if key == backward {
            self.step(tree, -1)?
        } else if key == Key::Home {
            self.first_enabled(tree)?
        } else if key == Key::End {
            self.last_enabled(tree)?
        } else if key == Key::Enter || key == Key::Space {
            if let Some(active) = self.active {
                self.select(tree, active, true)?;
            }
            return Ok(ListboxEffect::handled(None));
        } else {
            return Ok(ListboxEffect::unhandled());
        };

        if target != self.active {
            self.activate(tree, target)?;
            if self.auto_select {
                if let Some(opt) = target {
                    self.select(tree, opt, true)?;
                }
            }
        }
        Ok(ListboxEffect::handled(target))
    }

    /// Handle a pointer press on an option: activates and selects it.
    /// Disabled options are inert.
    pub fn click<V>(
        &mut self,
        tree: &mut FormTree<V>,
        option: NodeId,
    ) -> Result<ListboxEffect, FormTreeError> {
        if tree.disabled(option)? {
            return Ok(ListboxEffect::unhandled());
        }
        self.activate(tree, Some(option))?;
        self.select(tree, option, true)?;
        Ok(ListboxEffect::handled(Some(option)))
    }

    /// Select an option.
    ///
    /// Single-select unchecks every other option first, so at most one
    /// option is ever checked. Multiselect toggles the option instead.
    pub fn select<V>(
        &mut self,
        tree: &mut FormTree<V>,
        option: NodeId,
        is_triggered_by_user: bool,
    ) -> Result<(), FormTreeError> {
        if self.multiselectable {
            let was = tree
                .choice(option)?
                .ok_or(FormTreeError::NotAChoice(option))?
                .checked;
            tree.set_checked(option, !was, is_triggered_by_user)?;
            return Ok(());
        }
        for other in tree.registered_children(self.group)?.to_vec() {
            if other != option && tree.choice(other)?.is_some_and(|s| s.checked) {
                tree.set_checked(other, false, is_triggered_by_user)?;
            }
        }
        tree.set_checked(option, true, is_triggered_by_user)
    }

    fn activate<V>(
        &mut self,
        tree: &mut FormTree<V>,
        target: Option<NodeId>,
    ) -> Result<(), FormTreeError> {
        if self.active == target {
            return Ok(());
        }
        if let Some(prev) = self.active {
            // The previous active option may have been removed meanwhile.
            if tree.is_live(prev) {
                tree.set_active(prev, false)?;
            }
        }
        if let Some(next) = target {
            tree.set_active(next, true)?;
        }
        self.active = target;
        Ok(())
    }

    fn enabled_options<V>(
        &self,
        tree: &FormTree<V>,
    ) -> Result<alloc::vec::Vec<NodeId>, FormTreeError> {
        let mut out = alloc::vec::Vec::new();
        for &child in tree.registered_children(self.group)? {
            if tree.choice(child)?.is_some() && !tree.disabled(child)? {
                out.push(child);
            }
        }
        Ok(out)
    }

    fn first_enabled<V>(&self, tree: &FormTree<V>) -> Result<Option<NodeId>, FormTreeError> {
        Ok(self.enabled_options(tree)?.first().copied())
    }

    fn last_enabled<V>(&self, tree: &FormTree<V>) -> Result<Option<NodeId>, FormTreeError> {
        Ok(self.enabled_options(tree)?.last().copied())
    }

    /// One arrow step from the active option, skipping disabled options and
    /// wrapping or clamping at the ends per `rotate_navigation`.
    fn step<V>(&self, tree: &FormTree<V>, dir: i32) -> Result<Option<NodeId>, FormTreeError> {
        let options = self.enabled_options(tree)?;
        if options.is_empty() {
            return Ok(None);
        }
        let Some(pos) = self.active.and_then(|a| options.iter().position(|&o| o == a)) else {
            // No active option yet (or it was removed or disabled).
            return Ok(if dir > 0 {
                options.first().copied()
            } else {
                options.last().copied()
            });
        };
        let len = options.len() as i32;
        let next = pos as i32 + dir;
        let next = if self.rotate_navigation {
            (next + len) % len
        } else {
            next.clamp(0, len - 1)
        };
        Ok(Some(options[next as usize]))
    }
}
