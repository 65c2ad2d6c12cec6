//! Proof display - Ordered proof steps with nested sub-proofs
//!
//! A proof is a list of steps. Steps can hold whole sub-proofs (case analysis,
//! induction, nested proofs), so the structure is a tree.

use crate::rich_text::{RichText, RichTextSegment};
use crate::section::SectionContentNode;
use crate::tactic::TacticDisplay;
use math::ExpressionNode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default QED mark when a proof does not specify one
pub const DEFAULT_QED_SYMBOL: &str = "∎";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProofDisplay {
    #[serde(default)]
    pub title: Option<RichText>,
    #[serde(default)]
    pub strategy: Vec<SectionContentNode>,
    #[serde(default)]
    pub steps: Vec<ProofStep>,
    /// `Some("")` suppresses the mark
    #[serde(default)]
    pub qed_symbol: Option<String>,
}

impl ProofDisplay {
    pub fn new(steps: Vec<ProofStep>) -> Self {
        Self {
            steps,
            ..Default::default()
        }
    }

    pub fn qed(&self) -> Option<&str> {
        match self.qed_symbol.as_deref() {
            Some("") => None,
            Some(symbol) => Some(symbol),
            None => Some(DEFAULT_QED_SYMBOL),
        }
    }

    /// Total number of steps, counting steps of nested proofs
    pub fn total_steps(&self) -> usize {
        self.steps.iter().map(|s| 1 + s.kind.nested_step_count()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProofStep {
    /// Stable id used as the highlight scope; generated from position when absent
    #[serde(default)]
    pub id: Option<String>,
    pub kind: ProofStepKind,
}

impl ProofStep {
    pub fn new(kind: ProofStepKind) -> Self {
        Self { id: None, kind }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProofStepKind {
    Statement {
        claim: Vec<RichTextSegment>,
        #[serde(default)]
        justification: Vec<RichTextSegment>,
    },
    TacticApplication {
        tactic: TacticDisplay,
        #[serde(default)]
        goal_before: Option<ExpressionNode>,
        #[serde(default)]
        goal_after: Option<ExpressionNode>,
    },
    Elaboration(Vec<SectionContentNode>),
    CaseAnalysis {
        #[serde(default)]
        introduction: Option<RichText>,
        cases: Vec<ProofCase>,
    },
    InductiveProof {
        #[serde(alias = "variable_of_induction")]
        variable: ExpressionNode,
        base_case: Box<ProofDisplay>,
        inductive_hypothesis: RichText,
        inductive_step: Box<ProofDisplay>,
    },
    Assume(RichText),
    Goal(RichText),
    NestedProof(Box<ProofDisplay>),
    #[serde(untagged)]
    Unknown(Value),
}

impl ProofStepKind {
    pub const KNOWN_TAGS: &'static [&'static str] = &[
        "Statement",
        "TacticApplication",
        "Elaboration",
        "CaseAnalysis",
        "InductiveProof",
        "Assume",
        "Goal",
        "NestedProof",
    ];

    pub fn css_name(&self) -> &'static str {
        match self {
            ProofStepKind::Statement { .. } => "statement",
            ProofStepKind::TacticApplication { .. } => "tactic",
            ProofStepKind::Elaboration(_) => "elaboration",
            ProofStepKind::CaseAnalysis { .. } => "case-analysis",
            ProofStepKind::InductiveProof { .. } => "induction",
            ProofStepKind::Assume(_) => "assume",
            ProofStepKind::Goal(_) => "goal",
            ProofStepKind::NestedProof(_) => "nested",
            ProofStepKind::Unknown(_) => "unknown",
        }
    }

    fn nested_step_count(&self) -> usize {
        match self {
            ProofStepKind::CaseAnalysis { cases, .. } => {
                cases.iter().map(|c| c.proof.total_steps()).sum()
            }
            ProofStepKind::InductiveProof {
                base_case,
                inductive_step,
                ..
            } => base_case.total_steps() + inductive_step.total_steps(),
            ProofStepKind::NestedProof(proof) => proof.total_steps(),
            ProofStepKind::TacticApplication { tactic, .. } => tactic.nested_step_count(),
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProofCase {
    pub condition: RichText,
    #[serde(alias = "proof_for_case")]
    pub proof: ProofDisplay,
    #[serde(default)]
    pub case_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qed_symbol_defaults() {
        let mut proof = ProofDisplay::default();
        assert_eq!(proof.qed(), Some(DEFAULT_QED_SYMBOL));
        proof.qed_symbol = Some("□".to_string());
        assert_eq!(proof.qed(), Some("□"));
        proof.qed_symbol = Some(String::new());
        assert_eq!(proof.qed(), None);
    }

    #[test]
    fn test_step_decoding() {
        let json = r#"{"steps": [
            {"id": "p1", "kind": {"Statement": {"claim": [{"Text": "x > 0"}]}}},
            {"kind": {"Assume": {"segments": [{"Text": "x = 1"}]}}},
            {"kind": {"Telepathy": {}}}
        ]}"#;
        let proof: ProofDisplay = serde_json::from_str(json).unwrap();
        assert_eq!(proof.steps.len(), 3);
        assert_eq!(proof.steps[0].id.as_deref(), Some("p1"));
        assert_eq!(proof.steps[1].kind.css_name(), "assume");
        assert!(matches!(proof.steps[2].kind, ProofStepKind::Unknown(_)));
    }

    #[test]
    fn test_total_steps_counts_nested() {
        let inner = ProofDisplay::new(vec![
            ProofStep::new(ProofStepKind::Goal(RichText::plain("a"))),
            ProofStep::new(ProofStepKind::Goal(RichText::plain("b"))),
        ]);
        let proof = ProofDisplay::new(vec![
            ProofStep::new(ProofStepKind::Assume(RichText::plain("h"))),
            ProofStep::new(ProofStepKind::NestedProof(Box::new(inner))),
        ]);
        assert_eq!(proof.total_steps(), 4);
    }

    #[test]
    fn test_case_analysis_legacy_field_name() {
        let json = r#"{"CaseAnalysis": {"cases": [
            {"condition": {"segments": [{"Text": "n even"}]}, "proof_for_case": {"steps": []}}
        ]}}"#;
        let kind: ProofStepKind = serde_json::from_str(json).unwrap();
        match kind {
            ProofStepKind::CaseAnalysis { cases, .. } => assert_eq!(cases.len(), 1),
            other => panic!("Expected case analysis, got {:?}", other),
        }
    }
}
