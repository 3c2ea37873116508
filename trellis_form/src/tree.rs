// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, registration, aggregation.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use smallvec::smallvec;
use trellis_focus::IdSource;

use crate::types::{
    ChoiceState, FormTreeError, FormValue, ModelValueEvent, NameChange, NodeId, NodeSpec,
    RepropagationCondition, RepropagationRole,
};

/// Tree of form controls.
///
/// The tree separates two relationships:
///
/// - The **structural** tree, built by [`FormTree::insert`]: where a control
///   lives in the host's widget hierarchy.
/// - The **registration** tree, built when a mounted control announces itself
///   to its nearest composite ancestor: which composite aggregates the
///   control's value and repropagates its changes.
///
/// Registration is deferred: [`FormTree::mount`] only queues the
/// announcement, and [`FormTree::flush`], the task boundary, performs the
/// actual registration and emits each composite's single synthetic initial
/// notification. This mirrors how hosts deliver registration events one task
/// after a control becomes structurally ready, so listeners attached in the
/// same task cannot miss them.
///
/// ## Example
///
/// ```rust
/// use trellis_form::{FormTree, FormValue, NodeSpec};
///
/// let mut tree: FormTree<i32> = FormTree::new();
/// let fieldset = tree.insert(None, NodeSpec::fieldset("totals")).unwrap();
/// let a = tree.insert(Some(fieldset), NodeSpec::leaf_with_value("a", 1)).unwrap();
///
/// // Nothing is registered until the flush boundary.
/// tree.mount(fieldset).unwrap();
/// tree.mount(a).unwrap();
/// assert!(tree.registered_children(fieldset).unwrap().is_empty());
/// tree.flush();
///
/// assert_eq!(
///     tree.model_value(fieldset).unwrap(),
///     Some(FormValue::Keyed(vec![("a".into(), FormValue::Leaf(1))])),
/// );
/// ```
pub struct FormTree<V> {
    /// slots
    nodes: Vec<Option<Node<V>>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    pending_mounts: Vec<NodeId>,
    pub(crate) events: Vec<ModelValueEvent>,
    name_changes: Vec<NameChange>,
    ids: IdSource,
}

impl<V> core::fmt::Debug for FormTree<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("FormTree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("pending_mounts", &self.pending_mounts.len())
            .field("events", &self.events.len())
            .finish_non_exhaustive()
    }
}

impl<V> Default for FormTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) struct Node<V> {
    generation: u32,
    pub(crate) name: String,
    pub(crate) model_value: Option<V>,
    pub(crate) disabled: bool,
    pub(crate) role: RepropagationRole,
    pub(crate) is_endpoint: bool,
    pub(crate) condition: RepropagationCondition,
    pub(crate) choice: Option<ChoiceState>,
    assigns_child_ids: bool,
    structural_parent: Option<NodeId>,
    structural_children: Vec<NodeId>,
    pub(crate) registered_parent: Option<NodeId>,
    registered_children: Vec<NodeId>,
    /// Fieldset-mode name lookup over direct registered children.
    names: HashMap<String, NodeId>,
    delegated_id: Option<String>,
    /// Whether the synthetic initial notification went out.
    pub(crate) initialized: bool,
}

impl<V> Node<V> {
    fn new(generation: u32, spec: NodeSpec<V>) -> Self {
        Self {
            generation,
            name: spec.name,
            model_value: spec.model_value,
            disabled: spec.disabled,
            role: spec.role,
            is_endpoint: spec.is_repropagation_endpoint,
            condition: spec.condition,
            choice: spec.choice,
            assigns_child_ids: spec.assigns_child_ids,
            structural_parent: None,
            structural_children: Vec::new(),
            registered_parent: None,
            registered_children: Vec::new(),
            names: HashMap::new(),
            delegated_id: None,
            initialized: false,
        }
    }
}

impl<V> FormTree<V> {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            pending_mounts: Vec::new(),
            events: Vec::new(),
            name_changes: Vec::new(),
            ids: IdSource::new(),
        }
    }

    /// Insert a node below `parent` (or as a root when `None`).
    ///
    /// Insertion is purely structural; the node participates in aggregation
    /// only after [`FormTree::mount`] and the next [`FormTree::flush`].
    pub fn insert(
        &mut self,
        parent: Option<NodeId>,
        spec: NodeSpec<V>,
    ) -> Result<NodeId, FormTreeError> {
        if let Some(p) = parent {
            self.idx(p)?;
        }
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, spec));
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, spec)));
            self.generations.push(generation);
            ((self.nodes.len() - 1) as u32, generation)
        };
        let id = NodeId::new(idx, generation);
        if let Some(p) = parent {
            self.nodes[p.idx()]
                .as_mut()
                .expect("live")
                .structural_children
                .push(id);
            self.nodes[id.idx()].as_mut().expect("live").structural_parent = Some(p);
        }
        Ok(id)
    }

    /// Whether `id` refers to a live node.
    pub fn is_live(&self, id: NodeId) -> bool {
        self.idx(id).is_ok()
    }

    /// Queue a registration announcement for a structurally ready node.
    ///
    /// The announcement is processed at the next [`FormTree::flush`];
    /// queueing the same node twice before a flush is a no-op.
    pub fn mount(&mut self, id: NodeId) -> Result<(), FormTreeError> {
        self.idx(id)?;
        if !self.pending_mounts.contains(&id) {
            self.pending_mounts.push(id);
        }
        Ok(())
    }

    /// Task boundary: perform queued registrations, then emit each newly
    /// mounted composite's single synthetic initial notification.
    ///
    /// A registration that fails (duplicate name under a fieldset, say) is
    /// reported on the warning channel and skipped; the rest of the queue
    /// still runs.
    pub fn flush(&mut self) {
        let pending = core::mem::take(&mut self.pending_mounts);
        for &id in &pending {
            if self.idx(id).is_err() {
                continue; // removed between mount and flush
            }
            if let Err(err) = self.register(id) {
                tracing::warn!(?id, %err, "form registration skipped");
            }
        }
        for &id in &pending {
            let Ok(idx) = self.idx(id) else { continue };
            let node = self.nodes[idx].as_ref().expect("live");
            if !node.role.is_composite() || node.initialized {
                continue;
            }
            self.nodes[idx].as_mut().expect("live").initialized = true;
            self.events.push(ModelValueEvent {
                emitter: id,
                source: id,
                form_path: smallvec![id],
                is_triggered_by_user: false,
                initialize: true,
            });
        }
    }

    /// Register `child` with its nearest composite ancestor.
    ///
    /// Usually called indirectly through [`FormTree::flush`]. A node with no
    /// composite ancestor stays unregistered, which is fine for top-level
    /// controls. Registering an already registered node is an error.
    pub fn register(&mut self, child: NodeId) -> Result<(), FormTreeError> {
        let cidx = self.idx(child)?;
        if self.nodes[cidx].as_ref().expect("live").registered_parent.is_some() {
            return Err(FormTreeError::AlreadyRegistered(child));
        }
        let Some(group) = self.nearest_composite_ancestor(child) else {
            return Ok(());
        };
        let gidx = self.idx(group)?;

        let child_name = self.nodes[cidx].as_ref().expect("live").name.clone();
        {
            let g = self.nodes[gidx].as_ref().expect("live");
            // Fieldsets key children by name; unnamed children are tolerated
            // but stay out of the keyed aggregate.
            if g.role == RepropagationRole::Fieldset
                && !child_name.is_empty()
                && g.names.contains_key(&child_name)
            {
                return Err(FormTreeError::DuplicateName {
                    group,
                    name: child_name,
                });
            }
        }

        let (group_disabled, assigns_ids, group_name) = {
            let g = self.nodes[gidx].as_mut().expect("live");
            g.registered_children.push(child);
            if g.role == RepropagationRole::Fieldset && !child_name.is_empty() {
                g.names.insert(child_name, child);
            }
            (g.disabled, g.assigns_child_ids, g.name.clone())
        };
        self.nodes[cidx].as_mut().expect("live").registered_parent = Some(group);

        if group_disabled {
            self.propagate_disabled(child, true);
        }
        // After-register hook: hand out a delegated id when the group does
        // active-descendant style bookkeeping and the child brought none.
        if assigns_ids && self.nodes[cidx].as_ref().expect("live").delegated_id.is_none() {
            let prefix = if group_name.is_empty() {
                String::from("option")
            } else {
                format!("{group_name}-option")
            };
            let delegated = self.ids.next_id(&prefix);
            self.nodes[cidx].as_mut().expect("live").delegated_id = Some(delegated);
        }
        Ok(())
    }

    /// Remove `child` from its registered composite, if any.
    ///
    /// Clears the back-link and any bookkeeping the composite delegated to
    /// the child (name key, generated id).
    pub fn unregister(&mut self, child: NodeId) -> Result<(), FormTreeError> {
        let cidx = self.idx(child)?;
        let Some(group) = self.nodes[cidx].as_ref().expect("live").registered_parent else {
            return Ok(());
        };
        if let Ok(gidx) = self.idx(group) {
            let child_name = self.nodes[cidx].as_ref().expect("live").name.clone();
            let g = self.nodes[gidx].as_mut().expect("live");
            g.registered_children.retain(|&c| c != child);
            if g.names.get(&child_name) == Some(&child) {
                g.names.remove(&child_name);
            }
            if g.assigns_child_ids {
                self.nodes[cidx].as_mut().expect("live").delegated_id = None;
            }
        }
        self.nodes[cidx].as_mut().expect("live").registered_parent = None;
        Ok(())
    }

    /// Remove a node and its structural subtree.
    pub fn remove(&mut self, id: NodeId) -> Result<(), FormTreeError> {
        self.idx(id)?;
        if let Some(parent) = self.nodes[id.idx()].as_ref().expect("live").structural_parent {
            if let Ok(pidx) = self.idx(parent) {
                self.nodes[pidx]
                    .as_mut()
                    .expect("live")
                    .structural_children
                    .retain(|&c| c != id);
            }
        }
        let mut stack = alloc::vec![id];
        while let Some(cur) = stack.pop() {
            if self.idx(cur).is_err() {
                continue;
            }
            self.unregister(cur)?;
            let node = self.nodes[cur.idx()].take().expect("live");
            stack.extend(node.structural_children);
            self.free_list.push(cur.idx());
            self.pending_mounts.retain(|&p| p != cur);
        }
        Ok(())
    }

    /// Rename a control, re-keying it in its registered fieldset.
    ///
    /// Records a [`NameChange`] notification on success.
    pub fn set_name(&mut self, id: NodeId, new: &str) -> Result<(), FormTreeError> {
        let idx = self.idx(id)?;
        let old = self.nodes[idx].as_ref().expect("live").name.clone();
        if old == new {
            return Ok(());
        }
        let registered = self.nodes[idx].as_ref().expect("live").registered_parent;
        if let Some(group) = registered {
            let gidx = self.idx(group)?;
            let g = self.nodes[gidx].as_mut().expect("live");
            if g.role == RepropagationRole::Fieldset {
                if !new.is_empty() && g.names.get(new).is_some_and(|&c| c != id) {
                    return Err(FormTreeError::DuplicateName {
                        group,
                        name: String::from(new),
                    });
                }
                if g.names.get(&old) == Some(&id) {
                    g.names.remove(&old);
                }
                if !new.is_empty() {
                    g.names.insert(String::from(new), id);
                }
            }
        }
        self.nodes[idx].as_mut().expect("live").name = String::from(new);
        self.name_changes.push(NameChange {
            node: id,
            old,
            new: String::from(new),
        });
        Ok(())
    }

    /// Set the disabled state, propagating down through registered children.
    pub fn set_disabled(&mut self, id: NodeId, disabled: bool) -> Result<(), FormTreeError> {
        self.idx(id)?;
        self.propagate_disabled(id, disabled);
        Ok(())
    }

    fn propagate_disabled(&mut self, id: NodeId, disabled: bool) {
        let Ok(idx) = self.idx(id) else { return };
        self.nodes[idx].as_mut().expect("live").disabled = disabled;
        let children = self.nodes[idx].as_ref().expect("live").registered_children.clone();
        for child in children {
            self.propagate_disabled(child, disabled);
        }
    }

    // ---- accessors ------------------------------------------------------

    /// The control's name.
    pub fn name(&self, id: NodeId) -> Result<&str, FormTreeError> {
        Ok(&self.node_ref(id)?.name)
    }

    /// The control's own (leaf) value, if set.
    pub fn value(&self, id: NodeId) -> Result<Option<&V>, FormTreeError> {
        Ok(self.node_ref(id)?.model_value.as_ref())
    }

    /// Whether the control is disabled.
    pub fn disabled(&self, id: NodeId) -> Result<bool, FormTreeError> {
        Ok(self.node_ref(id)?.disabled)
    }

    /// The control's repropagation role.
    pub fn role(&self, id: NodeId) -> Result<RepropagationRole, FormTreeError> {
        Ok(self.node_ref(id)?.role)
    }

    /// Whether the composite already emitted its initial notification.
    pub fn is_initialized(&self, id: NodeId) -> Result<bool, FormTreeError> {
        Ok(self.node_ref(id)?.initialized)
    }

    /// Choice state, for choice children.
    pub fn choice(&self, id: NodeId) -> Result<Option<ChoiceState>, FormTreeError> {
        Ok(self.node_ref(id)?.choice)
    }

    /// Generated id handed out at registration, if any.
    pub fn delegated_id(&self, id: NodeId) -> Result<Option<&str>, FormTreeError> {
        Ok(self.node_ref(id)?.delegated_id.as_deref())
    }

    /// The composite this control registered with.
    pub fn registered_parent(&self, id: NodeId) -> Result<Option<NodeId>, FormTreeError> {
        Ok(self.node_ref(id)?.registered_parent)
    }

    /// Registered children in registration order.
    pub fn registered_children(&self, id: NodeId) -> Result<&[NodeId], FormTreeError> {
        Ok(&self.node_ref(id)?.registered_children)
    }

    /// Direct registered child of a fieldset with the given name.
    pub fn child_named(&self, group: NodeId, name: &str) -> Result<Option<NodeId>, FormTreeError> {
        Ok(self.node_ref(group)?.names.get(name).copied())
    }

    /// Take all recorded model-value notifications, oldest first.
    pub fn drain_events(&mut self) -> Vec<ModelValueEvent> {
        core::mem::take(&mut self.events)
    }

    /// Take all recorded rename notifications, oldest first.
    pub fn drain_name_changes(&mut self) -> Vec<NameChange> {
        core::mem::take(&mut self.name_changes)
    }

    // ---- internals ------------------------------------------------------

    fn nearest_composite_ancestor(&self, id: NodeId) -> Option<NodeId> {
        let mut cur = self.node_ref(id).ok()?.structural_parent;
        while let Some(p) = cur {
            let node = self.node_ref(p).ok()?;
            if node.role.is_composite() {
                return Some(p);
            }
            cur = node.structural_parent;
        }
        None
    }

    pub(crate) fn idx(&self, id: NodeId) -> Result<usize, FormTreeError> {
        let idx = id.idx();
        match self.nodes.get(idx) {
            Some(Some(node)) if node.generation == id.1 => Ok(idx),
            _ => Err(FormTreeError::UnknownNode(id)),
        }
    }

    pub(crate) fn node_ref(&self, id: NodeId) -> Result<&Node<V>, FormTreeError> {
        let idx = self.idx(id)?;
        Ok(self.nodes[idx].as_ref().expect("live"))
    }

    pub(crate) fn node_mut_checked(
        &mut self,
        id: NodeId,
    ) -> Result<&mut Node<V>, FormTreeError> {
        let idx = self.idx(id)?;
        Ok(self.nodes[idx].as_mut().expect("live"))
    }

}

impl<V: Clone> FormTree<V> {
    /// Aggregate model value of `id`.
    ///
    /// Leaves yield their own value; fieldsets a keyed mapping over named
    /// registered children in registration order; choice groups a positional
    /// list. Children without a value yet are omitted.
    pub fn model_value(&self, id: NodeId) -> Result<Option<FormValue<V>>, FormTreeError> {
        let node = self.node_ref(id)?;
        match node.role {
            RepropagationRole::Child => Ok(node.model_value.clone().map(FormValue::Leaf)),
            RepropagationRole::Fieldset => {
                let mut entries = Vec::new();
                for &child in &node.registered_children {
                    let name = self.name(child)?;
                    if name.is_empty() {
                        continue;
                    }
                    if let Some(value) = self.model_value(child)? {
                        entries.push((String::from(name), value));
                    }
                }
                Ok(Some(FormValue::Keyed(entries)))
            }
            RepropagationRole::ChoiceGroup => {
                let mut entries = Vec::new();
                for &child in &node.registered_children {
                    if let Some(value) = self.model_value(child)? {
                        entries.push(value);
                    }
                }
                Ok(Some(FormValue::Listed(entries)))
            }
        }
    }

    /// Value of the first checked choice child (single-select groups).
    pub fn checked_value(&self, group: NodeId) -> Result<Option<V>, FormTreeError> {
        let node = self.node_ref(group)?;
        if !node.role.is_composite() {
            return Err(FormTreeError::NotAComposite(group));
        }
        for &child in &node.registered_children {
            let c = self.node_ref(child)?;
            if c.choice.is_some_and(|s| s.checked) {
                return Ok(c.model_value.clone());
            }
        }
        Ok(None)
    }

    /// Values of all checked choice children (multi-select groups).
    pub fn checked_values(&self, group: NodeId) -> Result<Vec<V>, FormTreeError> {
        let node = self.node_ref(group)?;
        if !node.role.is_composite() {
            return Err(FormTreeError::NotAComposite(group));
        }
        let mut out = Vec::new();
        for &child in &node.registered_children {
            let c = self.node_ref(child)?;
            if c.choice.is_some_and(|s| s.checked) {
                if let Some(v) = c.model_value.clone() {
                    out.push(v);
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FormValue;
    use alloc::string::ToString;
    use alloc::vec;

    fn mounted_fieldset(tree: &mut FormTree<i32>) -> (NodeId, NodeId, NodeId, NodeId) {
        let fs = tree.insert(None, NodeSpec::fieldset("fs")).unwrap();
        let a = tree.insert(Some(fs), NodeSpec::leaf_with_value("a", 1)).unwrap();
        let b = tree.insert(Some(fs), NodeSpec::leaf_with_value("b", 2)).unwrap();
        let c = tree.insert(Some(fs), NodeSpec::leaf_with_value("c", 3)).unwrap();
        for id in [fs, a, b, c] {
            tree.mount(id).unwrap();
        }
        tree.flush();
        (fs, a, b, c)
    }

    #[test]
    fn registration_is_deferred_until_flush() {
        let mut tree: FormTree<i32> = FormTree::new();
        let fs = tree.insert(None, NodeSpec::fieldset("fs")).unwrap();
        let a = tree.insert(Some(fs), NodeSpec::leaf("a")).unwrap();
        tree.mount(a).unwrap();
        assert!(tree.registered_children(fs).unwrap().is_empty());
        tree.flush();
        assert_eq!(tree.registered_children(fs).unwrap(), &[a]);
        assert_eq!(tree.registered_parent(a).unwrap(), Some(fs));
    }

    #[test]
    fn keyed_aggregate_preserves_registration_order() {
        let mut tree: FormTree<i32> = FormTree::new();
        let (fs, ..) = mounted_fieldset(&mut tree);
        assert_eq!(
            tree.model_value(fs).unwrap(),
            Some(FormValue::Keyed(vec![
                ("a".to_string(), FormValue::Leaf(1)),
                ("b".to_string(), FormValue::Leaf(2)),
                ("c".to_string(), FormValue::Leaf(3)),
            ])),
        );
    }

    #[test]
    fn registration_skips_intermediate_plain_children() {
        let mut tree: FormTree<i32> = FormTree::new();
        let fs = tree.insert(None, NodeSpec::fieldset("fs")).unwrap();
        let wrapper = tree.insert(Some(fs), NodeSpec::leaf("")).unwrap();
        let leaf = tree
            .insert(Some(wrapper), NodeSpec::leaf_with_value("x", 9))
            .unwrap();
        for id in [fs, wrapper, leaf] {
            tree.mount(id).unwrap();
        }
        tree.flush();
        // Both the wrapper and the leaf register with the fieldset; the
        // unnamed wrapper stays out of the keyed aggregate.
        assert_eq!(tree.registered_parent(leaf).unwrap(), Some(fs));
        assert_eq!(
            tree.model_value(fs).unwrap(),
            Some(FormValue::Keyed(vec![("x".to_string(), FormValue::Leaf(9))])),
        );
    }

    #[test]
    fn duplicate_name_rejected_under_fieldset() {
        let mut tree: FormTree<i32> = FormTree::new();
        let fs = tree.insert(None, NodeSpec::fieldset("fs")).unwrap();
        let first = tree.insert(Some(fs), NodeSpec::leaf("dup")).unwrap();
        let second = tree.insert(Some(fs), NodeSpec::leaf("dup")).unwrap();
        tree.register(first).unwrap();
        assert!(matches!(
            tree.register(second),
            Err(FormTreeError::DuplicateName { .. })
        ));
        assert_eq!(tree.registered_children(fs).unwrap(), &[first]);
    }

    #[test]
    fn duplicate_names_allowed_under_choice_group() {
        let mut tree: FormTree<i32> = FormTree::new();
        let group = tree.insert(None, NodeSpec::choice_group("g")).unwrap();
        let one = tree.insert(Some(group), NodeSpec::option(1)).unwrap();
        let two = tree.insert(Some(group), NodeSpec::option(2)).unwrap();
        tree.register(one).unwrap();
        tree.register(two).unwrap();
        assert_eq!(tree.registered_children(group).unwrap(), &[one, two]);
        assert_eq!(
            tree.model_value(group).unwrap(),
            Some(FormValue::Listed(vec![FormValue::Leaf(1), FormValue::Leaf(2)])),
        );
    }

    #[test]
    fn double_registration_is_rejected() {
        let mut tree: FormTree<i32> = FormTree::new();
        let fs = tree.insert(None, NodeSpec::fieldset("fs")).unwrap();
        let a = tree.insert(Some(fs), NodeSpec::leaf("a")).unwrap();
        tree.register(a).unwrap();
        assert_eq!(tree.register(a), Err(FormTreeError::AlreadyRegistered(a)));
    }

    #[test]
    fn disabled_group_disables_registering_child() {
        let mut tree: FormTree<i32> = FormTree::new();
        let fs = tree
            .insert(
                None,
                NodeSpec {
                    disabled: true,
                    ..NodeSpec::fieldset("fs")
                },
            )
            .unwrap();
        let a = tree.insert(Some(fs), NodeSpec::leaf("a")).unwrap();
        tree.register(a).unwrap();
        assert!(tree.disabled(a).unwrap());
    }

    #[test]
    fn delegated_ids_assigned_and_cleaned_up() {
        let mut tree: FormTree<i32> = FormTree::new();
        let group = tree
            .insert(
                None,
                NodeSpec {
                    assigns_child_ids: true,
                    ..NodeSpec::choice_group("color")
                },
            )
            .unwrap();
        let opt = tree.insert(Some(group), NodeSpec::option(1)).unwrap();
        tree.register(opt).unwrap();
        assert_eq!(tree.delegated_id(opt).unwrap(), Some("color-option-1"));

        tree.unregister(opt).unwrap();
        assert_eq!(tree.delegated_id(opt).unwrap(), None);
        assert_eq!(tree.registered_parent(opt).unwrap(), None);
        assert!(tree.registered_children(group).unwrap().is_empty());
    }

    #[test]
    fn set_name_rekeys_fieldset_child() {
        let mut tree: FormTree<i32> = FormTree::new();
        let (fs, a, b, _) = mounted_fieldset(&mut tree);
        assert_eq!(tree.child_named(fs, "a").unwrap(), Some(a));

        tree.set_name(a, "renamed").unwrap();
        assert_eq!(tree.child_named(fs, "a").unwrap(), None);
        assert_eq!(tree.child_named(fs, "renamed").unwrap(), Some(a));
        let changes = tree.drain_name_changes();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].old, "a");
        assert_eq!(changes[0].new, "renamed");

        // Renaming onto a sibling's key is rejected.
        assert!(matches!(
            tree.set_name(a, "b"),
            Err(FormTreeError::DuplicateName { .. })
        ));
        let _ = b;
    }

    #[test]
    fn remove_unregisters_subtree_and_invalidates_ids() {
        let mut tree: FormTree<i32> = FormTree::new();
        let (fs, a, ..) = mounted_fieldset(&mut tree);
        tree.remove(a).unwrap();
        assert!(!tree.is_live(a));
        assert_eq!(tree.registered_children(fs).unwrap().len(), 2);
        assert_eq!(tree.value(a), Err(FormTreeError::UnknownNode(a)));

        // Freed slots are safely reused under a new generation.
        let fresh = tree.insert(Some(fs), NodeSpec::leaf("fresh")).unwrap();
        assert_ne!(fresh, a);
        assert!(tree.is_live(fresh));
    }

    #[test]
    fn checked_value_accessors() {
        let mut tree: FormTree<i32> = FormTree::new();
        let group = tree.insert(None, NodeSpec::choice_group("g")).unwrap();
        let one = tree.insert(Some(group), NodeSpec::option(1)).unwrap();
        let two = tree.insert(Some(group), NodeSpec::option(2)).unwrap();
        tree.register(one).unwrap();
        tree.register(two).unwrap();
        assert_eq!(tree.checked_value(group).unwrap(), None);

        tree.set_checked(two, true, true).unwrap();
        assert_eq!(tree.checked_value(group).unwrap(), Some(2));
        tree.set_checked(one, true, true).unwrap();
        assert_eq!(tree.checked_values(group).unwrap(), vec![1, 2]);
    }

    #[test]
    fn mount_is_idempotent_and_survives_removal() {
        let mut tree: FormTree<i32> = FormTree::new();
        let fs = tree.insert(None, NodeSpec::fieldset("fs")).unwrap();
        let a = tree.insert(Some(fs), NodeSpec::leaf("a")).unwrap();
        tree.mount(a).unwrap();
        tree.mount(a).unwrap();
        tree.remove(a).unwrap();
        // The stale queue entry is dropped, not resurrected.
        tree.flush();
        assert!(tree.registered_children(fs).unwrap().is_empty());
    }
}
