// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Model-value repropagation: how a leaf's change travels up through its
//! registered composites.
//!
//! A change records one notification at the originating control and then
//! walks the registered-parent chain. Each composite decides whether to
//! re-emit (its [`RepropagationCondition`]) and what composite chain the
//! re-emission advertises (its `form_path`). The walk is explicit, not event
//! bubbling, so a composite that declines to re-emit ends the chain
//! for everything above it.

use smallvec::smallvec;

use crate::tree::FormTree;
use crate::types::{
    FormPath, FormTreeError, ModelValueEvent, NodeId, RepropagationCondition, RepropagationRole,
};

impl<V> FormTree<V> {
    /// Set a control's model value and repropagate the change.
    pub fn set_model_value(
        &mut self,
        id: NodeId,
        value: V,
        is_triggered_by_user: bool,
    ) -> Result<(), FormTreeError> {
        self.node_mut_checked(id)?.model_value = Some(value);
        self.repropagate_from(id, is_triggered_by_user);
        Ok(())
    }

    /// Set a choice child's checked state.
    ///
    /// A real state change repropagates like a value change; setting the
    /// state it already has records nothing. Note that choice groups default
    /// to [`RepropagationCondition::WhenTargetChecked`], so the "unchecked"
    /// half of an exclusive toggle is swallowed at the group.
    pub fn set_checked(
        &mut self,
        id: NodeId,
        checked: bool,
        is_triggered_by_user: bool,
    ) -> Result<(), FormTreeError> {
        let node = self.node_mut_checked(id)?;
        let Some(choice) = node.choice.as_mut() else {
            return Err(FormTreeError::NotAChoice(id));
        };
        if choice.checked == checked {
            return Ok(());
        }
        choice.checked = checked;
        self.repropagate_from(id, is_triggered_by_user);
        Ok(())
    }

    /// Set a choice child's active (keyboard highlight) state.
    ///
    /// Purely presentational; never records a value notification.
    pub fn set_active(&mut self, id: NodeId, active: bool) -> Result<(), FormTreeError> {
        let node = self.node_mut_checked(id)?;
        let Some(choice) = node.choice.as_mut() else {
            return Err(FormTreeError::NotAChoice(id));
        };
        choice.active = active;
        Ok(())
    }

    pub(crate) fn repropagate_from(&mut self, origin: NodeId, is_triggered_by_user: bool) {
        let Ok(origin_node) = self.node_ref(origin) else {
            return;
        };
        let origin_checked = origin_node.choice.map(|c| c.checked);
        let origin_is_composite = origin_node.role.is_composite();

        self.events.push(ModelValueEvent {
            emitter: origin,
            source: origin,
            form_path: smallvec![origin],
            is_triggered_by_user,
            initialize: false,
        });

        // Composite chain accumulated so far. A composite origin is part of
        // its own chain; a leaf origin is not.
        let mut path: FormPath = if origin_is_composite {
            smallvec![origin]
        } else {
            smallvec![]
        };

        let mut visited: FormPath = smallvec![origin];
        let mut cur = self.node_ref(origin).ok().and_then(|n| n.registered_parent);
        while let Some(group) = cur {
            // Guard against registration cycles from misbehaving hosts.
            if visited.contains(&group) {
                tracing::warn!(?group, "repropagation cycle detected, stopping");
                break;
            }
            visited.push(group);

            let Ok(node) = self.node_ref(group) else {
                break;
            };
            // A composite that has not sent its initial notification yet
            // swallows child changes; they are folded into that notification.
            if !node.initialized {
                break;
            }
            let relays = match node.condition {
                RepropagationCondition::Always => true,
                // Targets without choice state pass unconditionally.
                RepropagationCondition::WhenTargetChecked => origin_checked.unwrap_or(true),
            };
            if !relays {
                break;
            }
            // An endpoint hides its internals: the outside world sees the
            // chain as starting at the endpoint itself.
            let is_endpoint = node.is_endpoint || node.role == RepropagationRole::ChoiceGroup;
            if is_endpoint {
                path = smallvec![group];
            } else {
                path.push(group);
            }
            let next = node.registered_parent;
            self.events.push(ModelValueEvent {
                emitter: group,
                source: origin,
                form_path: path.clone(),
                is_triggered_by_user,
                initialize: false,
            });
            cur = next;
        }
    }
}
