// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the form tree: node identifiers, roles, specs, and the
//! notifications the tree records.

use alloc::string::String;
use alloc::vec::Vec;
use smallvec::SmallVec;
use thiserror::Error;

/// Identifier for a node in the form tree (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// How a control participates in model-value repropagation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum RepropagationRole {
    /// A leaf control; its value changes start a repropagation chain.
    #[default]
    Child,
    /// A composite whose aggregate value is a keyed mapping of its children.
    Fieldset,
    /// A composite wrapping exclusive/choice children (radio group, listbox,
    /// select). Acts as a repropagation endpoint and aggregates positionally.
    ChoiceGroup,
}

impl RepropagationRole {
    /// Whether this role registers children (fieldset or choice group).
    pub fn is_composite(self) -> bool {
        !matches!(self, Self::Child)
    }
}

/// Condition deciding whether a composite re-emits a child's value change.
///
/// Choice groups use [`RepropagationCondition::WhenTargetChecked`] to swallow
/// the "unchecked" half of a checked/unchecked pair: the paired "checked"
/// notification is sufficient for the outside world.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum RepropagationCondition {
    /// Re-emit every child change.
    #[default]
    Always,
    /// Re-emit only when the originating control is currently checked.
    /// Targets without choice state pass unconditionally.
    WhenTargetChecked,
}

/// Selection state carried by choice children (options, radios, checkboxes).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ChoiceState {
    /// Whether the choice is selected.
    pub checked: bool,
    /// Whether the choice is the keyboard-active one in its group. Purely
    /// presentational; changing it records no value notification.
    pub active: bool,
}

/// Description of a node to insert into a [`FormTree`](crate::FormTree).
#[derive(Clone, Debug)]
pub struct NodeSpec<V> {
    /// Key under which the value appears in an ancestor's aggregate. Only
    /// needs to be unique among one fieldset's direct children.
    pub name: String,
    /// Initial model value, if any.
    pub model_value: Option<V>,
    /// Whether the control is disabled.
    pub disabled: bool,
    /// Repropagation role.
    pub role: RepropagationRole,
    /// Hide internal children from the `form_path` even when the role is not
    /// a choice group (amount-input with an embedded currency select, say).
    pub is_repropagation_endpoint: bool,
    /// Re-emission condition consulted when this node is a composite.
    pub condition: RepropagationCondition,
    /// Choice state, present on choice children only.
    pub choice: Option<ChoiceState>,
    /// Whether this composite hands out generated ids to children that
    /// register without one (listboxes do, for active-descendant wiring).
    pub assigns_child_ids: bool,
}

impl<V> Default for NodeSpec<V> {
    fn default() -> Self {
        Self {
            name: String::new(),
            model_value: None,
            disabled: false,
            role: RepropagationRole::default(),
            is_repropagation_endpoint: false,
            condition: RepropagationCondition::default(),
            choice: None,
            assigns_child_ids: false,
        }
    }
}

impl<V> NodeSpec<V> {
    /// A leaf control.
    pub fn leaf(name: &str) -> Self {
        Self {
            name: String::from(name),
            ..Self::default()
        }
    }

    /// A leaf control with an initial value.
    pub fn leaf_with_value(name: &str, value: V) -> Self {
        Self {
            model_value: Some(value),
            ..Self::leaf(name)
        }
    }

    /// A fieldset composite aggregating children by name.
    pub fn fieldset(name: &str) -> Self {
        Self {
            role: RepropagationRole::Fieldset,
            ..Self::leaf(name)
        }
    }

    /// A choice-group composite (radio group, listbox, select).
    pub fn choice_group(name: &str) -> Self {
        Self {
            role: RepropagationRole::ChoiceGroup,
            condition: RepropagationCondition::WhenTargetChecked,
            ..Self::leaf(name)
        }
    }

    /// A choice child (option, radio) carrying a value.
    pub fn option(value: V) -> Self {
        Self {
            model_value: Some(value),
            choice: Some(ChoiceState::default()),
            ..Self::default()
        }
    }
}

/// Chain of composites a value change was repropagated through, nearest
/// composite first, root last.
pub type FormPath = SmallVec<[NodeId; 4]>;

/// A recorded model-value notification.
///
/// One is recorded for the originating control and one for every composite
/// that re-emits the change; observers watching a particular node filter on
/// [`ModelValueEvent::emitter`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelValueEvent {
    /// The node this notification was emitted from.
    pub emitter: NodeId,
    /// The control whose change started the chain.
    pub source: NodeId,
    /// Composite chain for composite emissions; `[source]` for the
    /// originating control's own notification.
    pub form_path: FormPath,
    /// Whether a user interaction triggered the change.
    pub is_triggered_by_user: bool,
    /// Whether this is the single synthetic notification a composite emits
    /// right after its first flush. Initialization notifications are never
    /// repropagated further.
    pub initialize: bool,
}

/// A recorded rename of a registered control.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NameChange {
    /// The renamed node.
    pub node: NodeId,
    /// Name before the change.
    pub old: String,
    /// Name after the change.
    pub new: String,
}

/// Aggregate model value of a subtree.
///
/// Fieldsets aggregate as a keyed mapping in registration order; choice
/// groups aggregate positionally. Children with no value yet are omitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormValue<V> {
    /// A leaf control's own value.
    Leaf(V),
    /// Fieldset aggregate: `(name, value)` pairs in registration order.
    Keyed(Vec<(String, FormValue<V>)>),
    /// Choice-group aggregate: child values in registration order.
    Listed(Vec<FormValue<V>>),
}

/// Errors reported by [`FormTree`](crate::FormTree) operations.
///
/// All of these indicate caller bugs (stale ids, conflicting registrations);
/// none of them leave the tree in an inconsistent state.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FormTreeError {
    /// The node id does not refer to a live node.
    #[error("unknown or removed form node {0:?}")]
    UnknownNode(NodeId),
    /// The operation needs a composite but the node is a leaf.
    #[error("form node {0:?} is not a composite")]
    NotAComposite(NodeId),
    /// The child is already registered with a composite.
    #[error("form node {0:?} is already registered")]
    AlreadyRegistered(NodeId),
    /// A fieldset already has a direct child with this name.
    #[error("duplicate name {name:?} among direct children of {group:?}")]
    DuplicateName {
        /// The rejecting composite.
        group: NodeId,
        /// The conflicting name.
        name: String,
    },
    /// The operation needs choice state but the node has none.
    #[error("form node {0:?} carries no choice state")]
    NotAChoice(NodeId),
}
