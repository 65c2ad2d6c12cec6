//! Occurrence registry
//!
//! Built during the render pass. Every rendered occurrence of an expression id
//! gets a handle and the scope it was rendered in, so highlighting is a lookup
//! rather than a query over rendered output.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::trace;

/// Handle of one rendered occurrence, unique within a registry
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HandleId(pub u32);

impl HandleId {
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "h{}", self.0)
    }
}

impl From<HandleId> for u32 {
    fn from(id: HandleId) -> Self {
        id.0
    }
}

/// A proof node together with its position in document order
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProofNodeRef {
    pub id: String,
    pub index: usize,
}

/// Where an occurrence was rendered
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccurrenceScope {
    pub section_id: Option<String>,
    /// Innermost enclosing proof node
    pub proof_node: Option<ProofNodeRef>,
}

impl OccurrenceScope {
    pub fn document() -> Self {
        Self::default()
    }

    pub fn in_section(section_id: impl Into<String>) -> Self {
        Self {
            section_id: Some(section_id.into()),
            proof_node: None,
        }
    }

    pub fn with_proof_node(mut self, node: ProofNodeRef) -> Self {
        self.proof_node = Some(node);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub handle: HandleId,
    pub scope: OccurrenceScope,
}

#[derive(Debug, Clone)]
struct ProofNodeEntry {
    index: usize,
    section_id: Option<String>,
    parent: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct HighlightRegistry {
    next_handle: u32,
    occurrences: HashMap<String, Vec<Occurrence>>,
    proof_nodes: HashMap<String, ProofNodeEntry>,
    proof_node_order: Vec<String>,
}

impl HighlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a proof node in document order and return its index.
    ///
    /// `parent` is the enclosing proof node, if any. Registering an id twice
    /// keeps the first index.
    pub fn register_proof_node(
        &mut self,
        id: &str,
        section_id: Option<&str>,
        parent: Option<&str>,
    ) -> usize {
        if let Some(entry) = self.proof_nodes.get(id) {
            return entry.index;
        }
        let index = self.proof_node_order.len();
        let parent = parent
            .filter(|p| self.proof_nodes.contains_key(*p))
            .map(str::to_string);
        trace!("Registering proof node {} at index {}", id, index);
        self.proof_nodes.insert(
            id.to_string(),
            ProofNodeEntry {
                index,
                section_id: section_id.map(str::to_string),
                parent,
            },
        );
        self.proof_node_order.push(id.to_string());
        index
    }

    /// Record one rendered occurrence of an expression id.
    ///
    /// Empty ids are not addressable and return `None`.
    pub fn register(&mut self, expression_id: &str, scope: OccurrenceScope) -> Option<HandleId> {
        if expression_id.is_empty() {
            return None;
        }
        let handle = HandleId(self.next_handle);
        self.next_handle += 1;
        trace!("Registering {} for expression {}", handle, expression_id);
        self.occurrences
            .entry(expression_id.to_string())
            .or_default()
            .push(Occurrence { handle, scope });
        Some(handle)
    }

    /// All occurrences of an id in registration order
    pub fn occurrences(&self, expression_id: &str) -> &[Occurrence] {
        self.occurrences
            .get(expression_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn proof_node_index(&self, id: &str) -> Option<usize> {
        self.proof_nodes.get(id).map(|e| e.index)
    }

    pub fn proof_node_section(&self, id: &str) -> Option<&str> {
        self.proof_nodes.get(id).and_then(|e| e.section_id.as_deref())
    }

    pub fn proof_node_parent(&self, id: &str) -> Option<&str> {
        self.proof_nodes.get(id).and_then(|e| e.parent.as_deref())
    }

    /// Proof node ids from `id` outward to the outermost enclosing node
    pub fn proof_node_chain<'a>(&'a self, id: &'a str) -> Vec<&'a str> {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current {
            if !self.proof_nodes.contains_key(node) || chain.len() > self.proof_node_order.len() {
                break;
            }
            chain.push(node);
            current = self.proof_node_parent(node);
        }
        chain
    }

    /// Whether `node` is `ancestor` or nested inside it
    pub fn is_within(&self, node: &str, ancestor: &str) -> bool {
        self.proof_node_chain(node).contains(&ancestor)
    }

    pub fn proof_node_count(&self) -> usize {
        self.proof_node_order.len()
    }

    pub fn handle_count(&self) -> usize {
        self.next_handle as usize
    }

    /// Every registered id with its occurrences
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Occurrence])> {
        self.occurrences
            .iter()
            .map(|(id, occ)| (id.as_str(), occ.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.next_handle == 0
    }
}
