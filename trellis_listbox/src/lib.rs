// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Listbox: keyboard-driven selection over a choice group.
//!
//! A [`ListboxController`] layers listbox interaction semantics on top of a
//! [`trellis_form`] choice group:
//!
//! - Arrow navigation along the main axis, skipping disabled options, with
//!   optional wrap-around.
//! - Single-select mode keeps at most one option checked and can make
//!   selection follow focus; multiselect toggles with `Enter`/`Space`.
//! - Selection goes through the form tree, so value aggregation and
//!   repropagation behave exactly as for any other choice group.
//!
//! The controller returns a [`ListboxEffect`] instead of touching the host:
//! the host applies focus, active-descendant wiring, and scrolling itself.
//! [`scroll_correction`] computes the minimal scroll that brings the active
//! option into view.
//!
//! ## Example
//!
//! ```rust
//! use trellis_form::{FormTree, NodeSpec};
//! use trellis_listbox::{Key, ListboxController, ListboxOptions};
//!
//! let mut tree: FormTree<&str> = FormTree::new();
//! let group = tree.insert(None, NodeSpec::choice_group("color")).unwrap();
//! let red = tree.insert(Some(group), NodeSpec::option("red")).unwrap();
//! let green = tree.insert(Some(group), NodeSpec::option("green")).unwrap();
//! for id in [group, red, green] {
//!     tree.mount(id).unwrap();
//! }
//! tree.flush();
//!
//! let mut listbox = ListboxController::new(group, ListboxOptions::default());
//! listbox.activate_initial(&mut tree).unwrap();
//! listbox.handle_key(&mut tree, Key::ArrowDown).unwrap();
//! assert_eq!(tree.checked_value(group).unwrap(), Some("green"));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod controller;
mod scroll;

pub use controller::{Key, ListboxController, ListboxEffect, ListboxOptions, Orientation};
pub use scroll::{scroll_correction, ItemExtent, ScrollWindow};
