//! Highlight coordinator - Mode state machine over the occurrence registry
//!
//! The coordinator owns the current context and the set of highlighted
//! handles. Every request clears the previous highlight before selecting.

use crate::keys::{KeyAction, KeyBindings};
use crate::mode::{HighlightContext, HighlightMode};
use crate::registry::{HandleId, HighlightRegistry, Occurrence};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Handles currently highlighted, and the id they belong to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightSet {
    pub expression_id: Option<String>,
    pub handles: BTreeSet<HandleId>,
}

impl HighlightSet {
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn contains(&self, handle: HandleId) -> bool {
        self.handles.contains(&handle)
    }

    /// Raw handle values, for markup writers
    pub fn raw_handles(&self) -> impl Iterator<Item = u32> + '_ {
        self.handles.iter().map(|h| h.value())
    }
}

#[derive(Debug, Clone, Default)]
pub struct HighlightCoordinator {
    registry: HighlightRegistry,
    context: HighlightContext,
    current: HighlightSet,
    bindings: KeyBindings,
}

impl HighlightCoordinator {
    pub fn new(registry: HighlightRegistry) -> Self {
        Self {
            registry,
            ..Default::default()
        }
    }

    pub fn with_bindings(mut self, bindings: KeyBindings) -> Self {
        self.bindings = bindings;
        self
    }

    pub fn registry(&self) -> &HighlightRegistry {
        &self.registry
    }

    pub fn context(&self) -> &HighlightContext {
        &self.context
    }

    pub fn mode(&self) -> HighlightMode {
        self.context.mode
    }

    pub fn current(&self) -> &HighlightSet {
        &self.current
    }

    /// Change the mode; an active highlight is re-selected under the new mode
    pub fn set_mode(&mut self, mode: HighlightMode) {
        debug!("Highlight mode {} -> {}", self.context.mode, mode);
        self.context.mode = mode;
        self.reapply();
    }

    pub fn cycle_mode(&mut self) -> HighlightMode {
        let next = self.context.mode.next();
        self.set_mode(next);
        next
    }

    /// Move the reader to another proof node and/or section
    pub fn set_context(&mut self, proof_node_id: Option<String>, section_id: Option<String>) {
        if let Some(id) = &proof_node_id {
            if self.registry.proof_node_index(id).is_none() {
                warn!("Highlight context names unknown proof node {}", id);
            }
        }
        self.context.proof_node_id = proof_node_id;
        self.context.section_id = section_id;
        self.reapply();
    }

    /// Highlight every in-scope occurrence of `expression_id`.
    ///
    /// Repeating the request for the id that is already highlighted clears it.
    pub fn highlight_by_id(&mut self, expression_id: &str) -> &HighlightSet {
        let toggling_off = self.current.expression_id.as_deref() == Some(expression_id);
        self.clear();
        if toggling_off {
            debug!("Highlight for {} toggled off", expression_id);
            return &self.current;
        }
        self.current = self.select(expression_id);
        debug!(
            "Highlighted {} occurrence(s) of {} in mode {}",
            self.current.len(),
            expression_id,
            self.context.mode
        );
        &self.current
    }

    pub fn clear(&mut self) {
        self.current = HighlightSet::default();
    }

    /// Apply the action bound to `key`, if any
    pub fn handle_key(&mut self, key: &str) -> Option<KeyAction> {
        let action = self.bindings.action_for(key)?;
        match action {
            KeyAction::SetMode(mode) => self.set_mode(mode),
            KeyAction::CycleMode => {
                self.cycle_mode();
            }
            KeyAction::Clear => self.clear(),
        }
        Some(action)
    }

    fn reapply(&mut self) {
        if let Some(id) = self.current.expression_id.take() {
            self.current = self.select(&id);
        }
    }

    fn select(&self, expression_id: &str) -> HighlightSet {
        let handles = self
            .registry
            .occurrences(expression_id)
            .iter()
            .filter(|occ| self.in_scope(occ))
            .map(|occ| occ.handle)
            .collect();
        HighlightSet {
            expression_id: Some(expression_id.to_string()),
            handles,
        }
    }

    fn in_scope(&self, occurrence: &Occurrence) -> bool {
        match self.context.mode {
            HighlightMode::EntireDocument => true,
            HighlightMode::WithinProofNode => {
                let (Some(current), Some(node)) =
                    (&self.context.proof_node_id, &occurrence.scope.proof_node)
                else {
                    return false;
                };
                self.registry.is_within(&node.id, current)
            }
            HighlightMode::CurrentAndPrevious => {
                let Some(current_index) = self
                    .context
                    .proof_node_id
                    .as_deref()
                    .and_then(|id| self.registry.proof_node_index(id))
                else {
                    return false;
                };
                let Some(node) = &occurrence.scope.proof_node else {
                    return false;
                };
                if let Some(section) = &self.context.section_id {
                    if occurrence.scope.section_id.as_ref() != Some(section) {
                        return false;
                    }
                }
                // Nested nodes belong to every enclosing node, so the outermost decides
                self.registry
                    .proof_node_chain(&node.id)
                    .iter()
                    .filter_map(|id| self.registry.proof_node_index(id))
                    .min()
                    .unwrap_or(node.index)
                    <= current_index
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{OccurrenceScope, ProofNodeRef};

    fn scope(registry: &mut HighlightRegistry, section: &str, node: &str) -> OccurrenceScope {
        let index = registry.register_proof_node(node, Some(section), None);
        OccurrenceScope::in_section(section).with_proof_node(ProofNodeRef {
            id: node.to_string(),
            index,
        })
    }

    /// e7 appears in p1, p2 (section a) and p3 (section b), plus once outside proofs
    fn sample() -> (HighlightCoordinator, Vec<HandleId>) {
        let mut registry = HighlightRegistry::new();
        let mut handles = Vec::new();
        for (section, node) in [("a", "p1"), ("a", "p2"), ("b", "p3")] {
            let s = scope(&mut registry, section, node);
            handles.push(registry.register("e7", s).unwrap());
        }
        handles.push(registry.register("e7", OccurrenceScope::in_section("a")).unwrap());
        registry.register("other", OccurrenceScope::document()).unwrap();
        (HighlightCoordinator::new(registry), handles)
    }

    #[test]
    fn test_within_proof_node_selects_only_that_node() {
        let (mut coordinator, handles) = sample();
        coordinator.set_context(Some("p1".to_string()), None);
        let set = coordinator.highlight_by_id("e7");
        assert_eq!(set.len(), 1);
        assert!(set.contains(handles[0]));
    }

    #[test]
    fn test_switching_to_entire_document_reselects() {
        let (mut coordinator, _) = sample();
        coordinator.set_context(Some("p1".to_string()), None);
        coordinator.highlight_by_id("e7");
        coordinator.set_mode(HighlightMode::EntireDocument);
        assert_eq!(coordinator.current().len(), 4);
        assert_eq!(coordinator.current().expression_id.as_deref(), Some("e7"));
    }

    #[test]
    fn test_current_and_previous() {
        let (mut coordinator, handles) = sample();
        coordinator.set_mode(HighlightMode::CurrentAndPrevious);
        coordinator.set_context(Some("p2".to_string()), None);
        let set = coordinator.highlight_by_id("e7").clone();
        assert_eq!(set.len(), 2);
        assert!(set.contains(handles[0]));
        assert!(set.contains(handles[1]));

        coordinator.clear();
        coordinator.set_context(Some("p3".to_string()), Some("b".to_string()));
        let set = coordinator.highlight_by_id("e7");
        assert_eq!(set.len(), 1);
        assert!(set.contains(handles[2]));
    }

    #[test]
    fn test_nested_occurrences_are_within_parent() {
        let mut registry = HighlightRegistry::new();
        registry.register_proof_node("p1", None, None);
        let inner = registry.register_proof_node("p1.1", None, Some("p1"));
        let handle = registry
            .register(
                "x",
                OccurrenceScope::document().with_proof_node(ProofNodeRef {
                    id: "p1.1".to_string(),
                    index: inner,
                }),
            )
            .unwrap();
        let mut coordinator = HighlightCoordinator::new(registry);
        coordinator.set_context(Some("p1".to_string()), None);
        assert!(coordinator.highlight_by_id("x").contains(handle));
    }

    #[test]
    fn test_no_proof_node_selects_nothing_in_scoped_modes() {
        let (mut coordinator, _) = sample();
        assert!(coordinator.highlight_by_id("e7").is_empty());
        coordinator.set_mode(HighlightMode::CurrentAndPrevious);
        assert!(coordinator.current().is_empty());
    }

    #[test]
    fn test_repeat_request_toggles_off() {
        let (mut coordinator, _) = sample();
        coordinator.set_mode(HighlightMode::EntireDocument);
        assert_eq!(coordinator.highlight_by_id("e7").len(), 4);
        assert!(coordinator.highlight_by_id("e7").is_empty());
        assert_eq!(coordinator.current().expression_id, None);
        assert_eq!(coordinator.highlight_by_id("e7").len(), 4);
    }

    #[test]
    fn test_new_request_replaces_previous() {
        let (mut coordinator, _) = sample();
        coordinator.set_mode(HighlightMode::EntireDocument);
        coordinator.highlight_by_id("e7");
        let set = coordinator.highlight_by_id("other");
        assert_eq!(set.len(), 1);
        assert_eq!(set.expression_id.as_deref(), Some("other"));
    }

    #[test]
    fn test_unknown_id_selects_nothing() {
        let (mut coordinator, _) = sample();
        coordinator.set_mode(HighlightMode::EntireDocument);
        assert!(coordinator.highlight_by_id("nope").is_empty());
    }

    #[test]
    fn test_handle_key_drives_modes() {
        let (mut coordinator, _) = sample();
        assert_eq!(
            coordinator.handle_key("2"),
            Some(KeyAction::SetMode(HighlightMode::EntireDocument))
        );
        assert_eq!(coordinator.mode(), HighlightMode::EntireDocument);
        coordinator.highlight_by_id("e7");

        assert_eq!(coordinator.handle_key("m"), Some(KeyAction::CycleMode));
        assert_eq!(coordinator.mode(), HighlightMode::CurrentAndPrevious);

        assert_eq!(coordinator.handle_key("Escape"), Some(KeyAction::Clear));
        assert!(coordinator.current().is_empty());

        assert_eq!(coordinator.handle_key("q"), None);
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;
        use proptest::prelude::prop;

        proptest! {
            #[test]
            fn test_scoped_modes_are_subsets_of_entire_document(
                placements in prop::collection::vec((0usize..4, 0usize..2), 1..20),
                current in 0usize..4,
            ) {
                let mut registry = HighlightRegistry::new();
                for node in 0..4 {
                    registry.register_proof_node(&format!("p{}", node), None, None);
                }
                for (node, id) in &placements {
                    let name = format!("p{}", node);
                    let scope = OccurrenceScope::document().with_proof_node(ProofNodeRef {
                        index: registry.proof_node_index(&name).unwrap_or(0),
                        id: name,
                    });
                    registry.register(&format!("e{}", id), scope);
                }

                let mut coordinator = HighlightCoordinator::new(registry);
                coordinator.set_context(Some(format!("p{}", current)), None);
                coordinator.set_mode(HighlightMode::EntireDocument);
                let all = coordinator.highlight_by_id("e0").clone();

                for mode in [HighlightMode::WithinProofNode, HighlightMode::CurrentAndPrevious] {
                    coordinator.set_mode(mode);
                    prop_assert!(coordinator.current().handles.is_subset(&all.handles));
                }
                coordinator.set_mode(HighlightMode::WithinProofNode);
                let within = coordinator.current().handles.clone();
                coordinator.set_mode(HighlightMode::CurrentAndPrevious);
                prop_assert!(within.is_subset(&coordinator.current().handles));
            }
        }
    }
}
