//! Branching containers - Proof trees laid out as parent/child node lists

use crate::rich_text::RichText;
use crate::section::SectionContentNode;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BranchingContainer {
    pub id: String,
    /// Free-form kind, e.g. `ProofTree` or `Exploration`
    #[serde(default)]
    pub container_type: String,
    #[serde(default)]
    pub nodes: Vec<BranchingNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchingNode {
    pub id: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub title: Option<RichText>,
    #[serde(default)]
    pub content: Vec<SectionContentNode>,
}

/// Why a node is missing from [`BranchingContainer::walk`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detached {
    /// An earlier node already uses the id
    DuplicateId,
    /// The parent chain loops without reaching a root
    CyclicParent,
}

impl BranchingContainer {
    fn contains(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }

    /// Nodes without a parent inside this container, in document order
    pub fn roots(&self) -> impl Iterator<Item = &BranchingNode> {
        self.nodes.iter().filter(move |n| match &n.parent_id {
            None => true,
            Some(parent) => !self.contains(parent),
        })
    }

    pub fn children_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a BranchingNode> {
        self.nodes
            .iter()
            .filter(move |n| n.parent_id.as_deref() == Some(id))
    }

    /// Depth-first order with depth; each id is visited at most once
    pub fn walk(&self) -> Vec<(usize, &BranchingNode)> {
        let mut visited = HashSet::new();
        let mut out = Vec::new();
        for root in self.roots() {
            self.walk_from(root, 0, &mut visited, &mut out);
        }
        out
    }

    /// Nodes the walk never reaches, in document order
    pub fn detached(&self) -> Vec<(&BranchingNode, Detached)> {
        let walked = self.walk();
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| !walked.iter().any(|(_, w)| std::ptr::eq(*w, *node)))
            .map(|(i, node)| {
                let reason = if self.nodes[..i].iter().any(|n| n.id == node.id) {
                    Detached::DuplicateId
                } else {
                    Detached::CyclicParent
                };
                (node, reason)
            })
            .collect()
    }

    fn walk_from<'a>(
        &'a self,
        node: &'a BranchingNode,
        depth: usize,
        visited: &mut HashSet<&'a str>,
        out: &mut Vec<(usize, &'a BranchingNode)>,
    ) {
        if !visited.insert(node.id.as_str()) {
            return;
        }
        out.push((depth, node));
        for child in self.children_of(&node.id) {
            self.walk_from(child, depth + 1, visited, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, parent: Option<&str>) -> BranchingNode {
        BranchingNode {
            id: id.to_string(),
            parent_id: parent.map(str::to_string),
            title: None,
            content: vec![],
        }
    }

    #[test]
    fn test_walk_order() {
        let container = BranchingContainer {
            id: "b".to_string(),
            container_type: "ProofTree".to_string(),
            nodes: vec![
                node("root", None),
                node("c2", Some("root")),
                node("c1a", Some("c1")),
                node("c1", Some("root")),
            ],
        };
        let order: Vec<_> = container
            .walk()
            .into_iter()
            .map(|(depth, n)| (depth, n.id.as_str()))
            .collect();
        assert_eq!(order, vec![(0, "root"), (1, "c2"), (1, "c1"), (2, "c1a")]);
    }

    #[test]
    fn test_dangling_parent_is_root() {
        let container = BranchingContainer {
            id: "b".to_string(),
            container_type: String::new(),
            nodes: vec![node("a", Some("missing"))],
        };
        assert_eq!(container.roots().count(), 1);
    }

    #[test]
    fn test_cycle_is_not_followed() {
        // a and b name each other as parent, so neither is a root
        let container = BranchingContainer {
            id: "b".to_string(),
            container_type: String::new(),
            nodes: vec![node("a", Some("b")), node("b", Some("a")), node("r", None)],
        };
        let walked = container.walk();
        assert_eq!(walked.len(), 1);
        assert_eq!(walked[0].1.id, "r");

        let detached: Vec<_> = container
            .detached()
            .into_iter()
            .map(|(n, reason)| (n.id.as_str(), reason))
            .collect();
        assert_eq!(
            detached,
            vec![("a", Detached::CyclicParent), ("b", Detached::CyclicParent)]
        );
    }

    #[test]
    fn test_self_parent_visited_once() {
        let container = BranchingContainer {
            id: "b".to_string(),
            container_type: String::new(),
            nodes: vec![node("root", None), node("x", Some("x")), node("y", Some("root"))],
        };
        let ids: Vec<_> = container.walk().into_iter().map(|(_, n)| n.id.clone()).collect();
        assert_eq!(ids, vec!["root", "y"]);
        assert_eq!(container.detached()[0].0.id, "x");
    }

    #[test]
    fn test_duplicate_id_is_detached() {
        let container = BranchingContainer {
            id: "b".to_string(),
            container_type: String::new(),
            nodes: vec![node("root", None), node("root", None), node("c", Some("root"))],
        };
        assert_eq!(container.walk().len(), 2);
        let detached = container.detached();
        assert_eq!(detached.len(), 1);
        assert!(std::ptr::eq(detached[0].0, &container.nodes[1]));
        assert_eq!(detached[0].1, Detached::DuplicateId);
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;
        use proptest::prelude::prop;

        proptest! {
            #[test]
            fn test_walk_visits_each_id_at_most_once(
                parents in prop::collection::vec(prop::option::of(0usize..8), 0..8)
            ) {
                let nodes: Vec<_> = parents
                    .iter()
                    .enumerate()
                    .map(|(i, p)| {
                        let parent = p.map(|p| format!("n{}", p));
                        node(&format!("n{}", i), parent.as_deref())
                    })
                    .collect();
                let container = BranchingContainer {
                    id: "b".to_string(),
                    container_type: String::new(),
                    nodes,
                };
                let walked = container.walk();
                let unique: HashSet<_> = walked.iter().map(|(_, n)| n.id.as_str()).collect();
                prop_assert_eq!(unique.len(), walked.len());
                prop_assert_eq!(walked.len() + container.detached().len(), parents.len());
            }
        }
    }
}
