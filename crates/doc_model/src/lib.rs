//! Document Model Crate - Schema for structured mathematical documents
//!
//! This crate provides:
//! - Top-level documents with abstract, body, footnotes, glossary and bibliography
//! - Sections and their content blocks
//! - Rich text with inline math and links
//! - Structured math (definitions, theorems, exercises)
//! - Proof displays and tactic templates
//! - Layout containers, interactive blocks and branching proof trees
//!
//! Every externally versioned union keeps unrecognized input as raw JSON
//! instead of failing, so documents from newer producers still load.

pub mod blocks;
pub mod branching;
pub mod document;
pub mod error;
pub mod panels;
pub mod proof;
pub mod rich_text;
pub mod section;
pub mod structured;
pub mod tactic;

pub use blocks::*;
pub use branching::*;
pub use document::*;
pub use error::*;
pub use panels::*;
pub use proof::*;
pub use rich_text::*;
pub use section::*;
pub use structured::*;
pub use tactic::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theorem_with_proof_document() {
        let json = r#"{
            "id": "groups",
            "title": {"segments": [{"Text": "Groups"}]},
            "content": [
                {"StructuredMath": {"TheoremLike": {
                    "kind": "Theorem",
                    "statement": {"Content": [{"RichText": {"segments": [{"Text": "Identity is unique"}]}}]},
                    "proof": {
                        "steps": [
                            {"id": "s1", "kind": {"Assume": {"segments": [{"Text": "e, f identities"}]}}},
                            {"kind": {"TacticApplication": {"tactic": {"ExactWith": {"theorem_name": "id_unique"}}}}}
                        ],
                        "qed_symbol": "□"
                    }
                }}}
            ]
        }"#;
        let section = Section::from_json(json).unwrap();
        let SectionContentNode::StructuredMath(StructuredMathNode::TheoremLike { proof, .. }) =
            &section.content[0]
        else {
            panic!("Expected theorem block");
        };
        let proof = proof.as_ref().unwrap();
        assert_eq!(proof.steps.len(), 2);
        assert_eq!(proof.qed(), Some("□"));
        assert!(matches!(
            &proof.steps[1].kind,
            ProofStepKind::TacticApplication {
                tactic: TacticDisplay::ExactWith { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_round_trip_section() {
        let section = Section::new("s")
            .with_title("Title")
            .with_content(vec![SectionContentNode::paragraph("hello")]);
        let json = section.to_json().unwrap();
        assert_eq!(Section::from_json(&json).unwrap(), section);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let err = Section::from_json("{not json").unwrap_err();
        assert!(matches!(err, DocModelError::Json(_)));
    }
}
