// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Focus: focus containment primitives.
//!
//! This crate models the focus bookkeeping shared by the Trellis overlay and
//! form crates as three small, host-agnostic pieces:
//!
//! - A **focus scope** ([`FocusScope`]) over an ordered list of candidates
//!   ([`FocusEntry`]), with wrap-around forward/backward traversal that skips
//!   disabled entries. This is the containment boundary a focus trap cycles
//!   Tab/Shift+Tab through.
//! - A **tree-order comparator** ([`TreePosition`]) for sorting references in
//!   document order. Hosts describe where a node lives as a child-index path
//!   from the root; containers sort before their descendants, and siblings
//!   sort by index.
//! - An **id source** ([`IdSource`]) for handing out unique, deterministic
//!   string ids to nodes that need one delegated (for example listbox
//!   options registering with their group).
//!
//! ## Minimal example
//!
//! A trap cycling over two buttons, the second of which is disabled:
//!
//! ```rust
//! use trellis_focus::{FocusEntry, FocusScope};
//!
//! let scope = FocusScope::new(vec![
//!     FocusEntry::new(1_u32),
//!     FocusEntry { enabled: false, ..FocusEntry::new(2_u32) },
//!     FocusEntry::new(3_u32),
//! ]);
//!
//! // Tab moves from the first candidate to the third, skipping the
//! // disabled one…
//! assert_eq!(scope.next(1), Some(3));
//! // …and wraps back to the first at the end of the scope.
//! assert_eq!(scope.next(3), Some(1));
//! assert_eq!(scope.prev(1), Some(3));
//! ```
//!
//! The candidate type is generic over the node identifier `K`, so callers can
//! use any small, copyable handle (a DOM element reference on the host side,
//! or a plain integer in tests).
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;

/// A single focusable candidate within a [`FocusScope`].
#[derive(Clone, Debug)]
pub struct FocusEntry<K> {
    /// Identifier for this focusable node.
    pub id: K,
    /// Whether this node can be targeted by focus.
    ///
    /// Disabled entries are skipped during traversal but keep their slot in
    /// the scope so sibling order stays stable.
    pub enabled: bool,
    /// Whether this node should receive focus when its scope is first
    /// activated.
    pub autofocus: bool,
}

impl<K> FocusEntry<K> {
    /// Create an enabled, non-autofocus entry.
    pub fn new(id: K) -> Self {
        Self {
            id,
            enabled: true,
            autofocus: false,
        }
    }
}

/// An ordered set of focusable candidates forming a containment boundary.
///
/// The scope is a snapshot: hosts rebuild it when the focusable content
/// changes. Traversal wraps at both ends, which is what a keyboard focus trap
/// wants (Tab on the last candidate returns to the first).
#[derive(Clone, Debug)]
pub struct FocusScope<K> {
    entries: Vec<FocusEntry<K>>,
}

impl<K: Copy + Eq> FocusScope<K> {
    /// Create a scope from candidates in traversal order.
    pub fn new(entries: Vec<FocusEntry<K>>) -> Self {
        Self { entries }
    }

    /// Whether the scope has any enabled candidate at all.
    pub fn has_focusable(&self) -> bool {
        self.entries.iter().any(|e| e.enabled)
    }

    /// Whether `id` is one of the scope's candidates (enabled or not).
    pub fn contains(&self, id: K) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// First enabled candidate.
    pub fn first(&self) -> Option<K> {
        self.entries.iter().find(|e| e.enabled).map(|e| e.id)
    }

    /// Last enabled candidate.
    pub fn last(&self) -> Option<K> {
        self.entries.iter().rev().find(|e| e.enabled).map(|e| e.id)
    }

    /// The candidate to focus when the scope is activated: the first enabled
    /// autofocus entry if present, otherwise the first enabled entry.
    pub fn initial(&self) -> Option<K> {
        self.entries
            .iter()
            .find(|e| e.enabled && e.autofocus)
            .map(|e| e.id)
            .or_else(|| self.first())
    }

    /// Next enabled candidate after `current`, wrapping at the end.
    ///
    /// When `current` is not part of the scope (focus escaped or the scope
    /// was rebuilt), traversal restarts at the first enabled candidate.
    pub fn next(&self, current: K) -> Option<K> {
        self.step(current, Step::Forward)
    }

    /// Previous enabled candidate before `current`, wrapping at the start.
    pub fn prev(&self, current: K) -> Option<K> {
        self.step(current, Step::Backward)
    }

    fn step(&self, current: K, step: Step) -> Option<K> {
        if !self.has_focusable() {
            return None;
        }
        let Some(pos) = self.entries.iter().position(|e| e.id == current) else {
            return match step {
                Step::Forward => self.first(),
                Step::Backward => self.last(),
            };
        };
        let len = self.entries.len();
        // Walk at most one full cycle; lands back on `current` when it is the
        // only enabled entry.
        for offset in 1..=len {
            let i = match step {
                Step::Forward => (pos + offset) % len,
                Step::Backward => (pos + len - (offset % len)) % len,
            };
            if self.entries[i].enabled {
                return Some(self.entries[i].id);
            }
        }
        None
    }
}

#[derive(Copy, Clone)]
enum Step {
    Forward,
    Backward,
}

/// Position of a node in its host tree, as the child-index path from the root.
///
/// Comparing two positions yields document order: a container sorts before
/// every node it contains, and siblings sort by child index. This is the
/// ordering screen readers expect when a control lists its describing
/// elements.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TreePosition(Vec<u32>);

impl TreePosition {
    /// The root position (empty path).
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Create a position from an explicit child-index path.
    pub fn from_path(path: Vec<u32>) -> Self {
        Self(path)
    }

    /// Position of this node's `index`-th child.
    pub fn child(&self, index: u32) -> Self {
        let mut path = self.0.clone();
        path.push(index);
        Self(path)
    }

    /// Whether this position contains `other` (is a strict ancestor of it).
    pub fn contains(&self, other: &Self) -> bool {
        other.0.len() > self.0.len() && other.0[..self.0.len()] == self.0[..]
    }
}

/// Compare two tree positions in document order.
pub fn tree_order(a: &TreePosition, b: &TreePosition) -> Ordering {
    a.cmp(b)
}

/// Sort `(id, position)` pairs into document order.
///
/// The sort is stable so entries reported at the same position (which hosts
/// should not produce, but may under reparenting races) keep their relative
/// order.
pub fn sort_in_tree_order<K>(entries: &mut [(K, TreePosition)]) {
    entries.sort_by(|(_, a), (_, b)| tree_order(a, b));
}

/// Deterministic generator of unique string ids.
///
/// Ids look like `prefix-N` with a process-local monotonically increasing
/// `N`. Determinism keeps snapshots and test assertions stable, which random
/// suffixes would not.
#[derive(Clone, Debug, Default)]
pub struct IdSource {
    counter: u64,
}

impl IdSource {
    /// Create a source whose first id uses suffix `1`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce the next id for `prefix`.
    pub fn next_id(&mut self, prefix: &str) -> String {
        self.counter += 1;
        alloc::format!("{prefix}-{}", self.counter)
    }
}
