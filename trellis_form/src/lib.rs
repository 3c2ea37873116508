// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Form: a host-agnostic form-control tree.
//!
//! A [`FormTree`] models the relationships a form library needs but a widget
//! tree does not express on its own:
//!
//! - **Deferred registration**: controls announce themselves to their
//!   nearest composite ancestor at a task boundary ([`FormTree::flush`]),
//!   never synchronously, so listeners attached in the same task cannot miss
//!   a registration.
//! - **Aggregation**: a fieldset's value is a keyed mapping of its
//!   children's values; a choice group's value is a positional list, with
//!   [`FormTree::checked_value`] / [`FormTree::checked_values`] views over
//!   the selected subset.
//! - **Repropagation**: a leaf's value change walks up the registered
//!   composites, each of which decides whether to re-emit and what composite
//!   chain ([`FormPath`]) to advertise. See the [`ModelValueEvent`] docs for
//!   the exact shape.
//!
//! Validation severity tagging lives in [`validate`], kept separate from the
//! tree because validators run against values, not nodes.
//!
//! ## Example
//!
//! ```rust
//! use trellis_form::{FormTree, FormValue, NodeSpec};
//!
//! let mut tree: FormTree<&str> = FormTree::new();
//! let day = tree.insert(None, NodeSpec::fieldset("day")).unwrap();
//! let from = tree.insert(Some(day), NodeSpec::leaf_with_value("from", "09:00")).unwrap();
//! let to = tree.insert(Some(day), NodeSpec::leaf_with_value("to", "17:00")).unwrap();
//! for id in [day, from, to] {
//!     tree.mount(id).unwrap();
//! }
//! tree.flush();
//!
//! tree.set_model_value(to, "18:00", true).unwrap();
//! assert_eq!(
//!     tree.model_value(day).unwrap(),
//!     Some(FormValue::Keyed(vec![
//!         ("from".into(), FormValue::Leaf("09:00")),
//!         ("to".into(), FormValue::Leaf("18:00")),
//!     ])),
//! );
//! // The change was re-emitted by the fieldset.
//! assert!(tree.drain_events().iter().any(|e| e.emitter == day && e.source == to));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod repropagation;
mod tree;
mod types;
pub mod validate;

pub use tree::FormTree;
pub use types::{
    ChoiceState, FormPath, FormTreeError, FormValue, ModelValueEvent, NameChange, NodeId, NodeSpec,
    RepropagationCondition, RepropagationRole,
};
