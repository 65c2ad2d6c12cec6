//! Proof, tactic and branching container rendering
//!
//! Every proof step and branching node is a proof-node scope: it carries
//! `data-node-id` and `data-node-index` and is registered with the highlight
//! registry, so occurrences rendered inside it can be scoped to it.

use crate::document::DocumentRenderer;
use crate::presentation::{Element, PresentationNode};
use doc_model::{
    BranchingContainer, BranchingNode, Detached, ProofDisplay, ProofStep, ProofStepKind,
    TacticDisplay, TraceStep,
};
use math::{symbols, ExpressionNode};
use tracing::{debug, warn};

impl DocumentRenderer {
    /// Render a proof. Steps get ids `"{prefix}.{n}"` unless they carry one.
    ///
    /// Top-level proofs take a generated prefix `proof-{k}`.
    pub(crate) fn render_proof(&mut self, proof: &ProofDisplay, prefix: Option<String>) -> PresentationNode {
        let prefix = prefix.unwrap_or_else(|| {
            self.proof_count += 1;
            format!("proof-{}", self.proof_count)
        });
        debug!("Rendering proof {} with {} step(s)", prefix, proof.steps.len());

        let mut element = Element::div("proof").attr("data-proof-id", prefix.as_str());
        let title = match &proof.title {
            Some(title) => Element::div("proof-title").children(self.render_rich_text(title)),
            None => Element::div("proof-title").text("Proof."),
        };
        element.push(title);

        if !proof.strategy.is_empty() {
            element.push(Element::div("proof-strategy").children(self.render_contents(&proof.strategy)));
        }

        let mut steps = Element::new("ol").class("proof-steps");
        for (i, step) in proof.steps.iter().enumerate() {
            let rendered = self.render_step(step, i + 1, &prefix);
            steps.push(rendered);
        }
        element.push(steps);

        if self.config.show_qed {
            if let Some(qed) = proof.qed() {
                element.push(Element::div("proof-qed").text(qed));
            }
        }
        element.into()
    }

    fn render_step(&mut self, step: &ProofStep, number: usize, prefix: &str) -> PresentationNode {
        let id = step
            .id
            .clone()
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| format!("{}.{}", prefix, number));
        let index = self.enter_proof_node(&id, None);

        let mut item = Element::new("li")
            .class("proof-step")
            .class(format!("proof-step-{}", step.kind.css_name()))
            .attr("data-node-id", id.as_str())
            .attr("data-node-index", index.to_string());
        if self.config.number_steps {
            item.push(Element::span("step-number").text(format!("{}.", number)));
        }
        let body = self.render_step_body(&step.kind, &id);
        item.push(body);

        self.leave_proof_node();
        item.into()
    }

    fn render_step_body(&mut self, kind: &ProofStepKind, step_id: &str) -> PresentationNode {
        match kind {
            ProofStepKind::Statement {
                claim,
                justification,
            } => {
                let mut element = Element::div("step-statement")
                    .child(Element::span("claim").children(self.render_segments(claim)));
                if !justification.is_empty() {
                    element = element.child(
                        Element::span("justification")
                            .text(" (")
                            .children(self.render_segments(justification))
                            .text(")"),
                    );
                }
                element.into()
            }
            ProofStepKind::TacticApplication {
                tactic,
                goal_before,
                goal_after,
            } => {
                let mut element = Element::div("step-tactic");
                if let Some(goal) = goal_before {
                    element.push(self.render_goal(goal, "goal-before", "Goal: "));
                }
                let rendered = self.render_tactic(tactic, step_id);
                element.push(rendered);
                if let Some(goal) = goal_after {
                    element.push(self.render_goal(goal, "goal-after", "Remaining: "));
                }
                element.into()
            }
            ProofStepKind::Elaboration(content) => Element::div("step-elaboration")
                .children(self.render_contents(content))
                .into(),
            ProofStepKind::CaseAnalysis {
                introduction,
                cases,
            } => {
                let mut element = Element::div("step-case-analysis");
                if let Some(introduction) = introduction {
                    let paragraph = self.render_paragraph(introduction);
                    element.push(paragraph);
                }
                for (i, case) in cases.iter().enumerate() {
                    let heading = case
                        .case_name
                        .clone()
                        .unwrap_or_else(|| format!("Case {}", i + 1));
                    let condition = Element::div("case-condition")
                        .child(Element::new("strong").text(format!("{}: ", heading)))
                        .children(self.render_rich_text(&case.condition));
                    let proof = self.render_proof(&case.proof, Some(format!("{}.case{}", step_id, i + 1)));
                    element.push(
                        Element::div("proof-case")
                            .attr("data-case-index", (i + 1).to_string())
                            .child(condition)
                            .child(proof),
                    );
                }
                element.into()
            }
            ProofStepKind::InductiveProof {
                variable,
                base_case,
                inductive_hypothesis,
                inductive_step,
            } => {
                let intro = Element::div("induction-variable")
                    .text("Induction on ")
                    .child(self.render_math(variable, false));
                let base = self.render_proof(base_case, Some(format!("{}.base", step_id)));
                let hypothesis = Element::div("inductive-hypothesis")
                    .child(Element::new("strong").text("Inductive hypothesis: "))
                    .children(self.render_rich_text(inductive_hypothesis));
                let step = self.render_proof(inductive_step, Some(format!("{}.step", step_id)));
                Element::div("step-induction")
                    .child(intro)
                    .child(Element::div("base-case").child(Element::div("case-heading").text("Base case")).child(base))
                    .child(hypothesis)
                    .child(
                        Element::div("inductive-step")
                            .child(Element::div("case-heading").text("Inductive step"))
                            .child(step),
                    )
                    .into()
            }
            ProofStepKind::Assume(text) => Element::div("step-assume")
                .child(Element::new("strong").text("Assume "))
                .children(self.render_rich_text(text))
                .into(),
            ProofStepKind::Goal(text) => Element::div("step-goal")
                .child(Element::new("strong").text("Goal: "))
                .children(self.render_rich_text(text))
                .into(),
            ProofStepKind::NestedProof(proof) => self.render_proof(proof, Some(step_id.to_string())),
            ProofStepKind::Unknown(value) => {
                self.render_raw("proof step", value, ProofStepKind::KNOWN_TAGS)
            }
        }
    }

    fn render_goal(&mut self, goal: &ExpressionNode, class: &str, label: &str) -> PresentationNode {
        Element::div("goal")
            .class(class)
            .child(Element::span("goal-label").text(label))
            .child(self.render_math(goal, false))
            .into()
    }

    // =========================================================================
    // Tactics
    // =========================================================================

    pub(crate) fn render_tactic(&mut self, tactic: &TacticDisplay, step_id: &str) -> PresentationNode {
        use TacticDisplay as T;

        if let T::Unknown(value) = tactic {
            return self.render_raw("tactic", value, TacticDisplay::KNOWN_TAGS);
        }

        let mut element = Element::div("tactic")
            .class(format!("tactic-{}", tactic.css_name()))
            .child(Element::span("tactic-name").text(tactic.name()));
        let mut body = Element::span("tactic-body");

        match tactic {
            T::IntroduceQuantifier {
                quantifier,
                variables,
                domain,
            } => {
                let (glyph, is_keyword) = symbols::quantifier_symbol(*quantifier);
                let class = if is_keyword { "keyword" } else { "quantifier" };
                body.push(Element::span(class).text(format!("{} ", glyph)));
                body = body.children(self.render_math_list(variables));
                if let Some(domain) = domain {
                    body.push(operator(symbols::ELEMENT_OF));
                    body.push(self.render_math(domain, false));
                }
            }
            T::IntroduceFreshVariable {
                variable,
                target,
                explanation,
            } => {
                body = body.text("Let ").child(self.render_math(variable, false));
                if let Some(target) = target {
                    body = body.text(" for ").child(self.render_math(target, false));
                }
                if let Some(explanation) = explanation {
                    body.push(Element::span("tactic-explanation").children(self.render_rich_text(explanation)));
                }
            }
            T::ProvideWitness { variable, witness } => {
                body = body
                    .text("Take ")
                    .child(self.render_math(variable, false))
                    .child(operator("="))
                    .child(self.render_math(witness, false));
            }
            T::ReorderQuantifiers { before, after } => {
                body = body
                    .child(self.render_math(before, false))
                    .child(operator(symbols::RIGHT_ARROW))
                    .child(self.render_math(after, false));
            }
            T::ApplyTheorem {
                theorem_name,
                instantiation,
                target,
            } => {
                body.push(Element::span("theorem-name").text(theorem_name.as_str()));
                if !instantiation.is_empty() {
                    let mut with = Element::span("instantiation").text(" with ");
                    for (i, (name, value)) in instantiation.iter().enumerate() {
                        if i > 0 {
                            with = with.text(", ");
                        }
                        with = with.text(format!("{} := ", name)).child(self.render_math(value, false));
                    }
                    body.push(with);
                }
                if let Some(target) = target {
                    body = body.text(" to ").child(self.render_math(target, false));
                }
            }
            T::Rewrite {
                target,
                equation,
                direction,
                steps,
            } => {
                body = body
                    .child(self.render_math(target, false))
                    .text(" using ")
                    .child(self.render_math(equation, false))
                    .child(
                        Element::span("rewrite-direction")
                            .attr("data-direction", format!("{:?}", direction))
                            .text(format!(" {}", direction.arrow())),
                    );
                if self.config.show_step_traces && !steps.is_empty() {
                    element.push(self.render_trace(steps));
                }
            }
            T::SplitConjunction {
                target,
                conjuncts,
                selected_index,
            } => {
                body.push(self.render_math(target, false));
                element.push(self.render_choice_list(conjuncts, *selected_index, "conjuncts", "selected"));
            }
            T::SplitDisjunction {
                target,
                disjuncts,
                chosen_index,
            } => {
                body.push(self.render_math(target, false));
                element.push(self.render_choice_list(disjuncts, *chosen_index, "disjuncts", "chosen"));
            }
            T::Simplify {
                target,
                steps,
                result,
            } => {
                body = body
                    .child(self.render_math(target, false))
                    .child(operator("⟹"))
                    .child(self.render_math(result, false));
                if self.config.show_step_traces && !steps.is_empty() {
                    element.push(self.render_trace(steps));
                }
            }
            T::Auto {
                tactic_type,
                attempted,
                success_path,
            } => {
                body.push(Element::span("auto-tactic").text(tactic_type.as_str()));
                if !attempted.is_empty() {
                    body.push(Element::span("attempted").text(format!(" tried: {}", attempted.join(", "))));
                }
                match success_path {
                    Some(path) => body.push(Element::span("success-path").text(format!(" succeeded via {}", path))),
                    None => body.push(Element::span("success-path").class("failed").text(" no success path")),
                }
            }
            T::Induction {
                variable,
                base_case,
                inductive_step,
                hypothesis_name,
            } => {
                body = body.text("on ").child(self.render_math(variable, false));
                if let Some(name) = hypothesis_name {
                    body.push(Element::span("hypothesis-name").text(format!(" ({})", name)));
                }
                let base = self.render_proof(base_case, Some(format!("{}.base", step_id)));
                let step = self.render_proof(inductive_step, Some(format!("{}.step", step_id)));
                element.push(body);
                return element
                    .child(Element::div("base-case").child(Element::div("case-heading").text("Base case")).child(base))
                    .child(
                        Element::div("inductive-step")
                            .child(Element::div("case-heading").text("Inductive step"))
                            .child(step),
                    )
                    .into();
            }
            T::Contradiction { assumption } => {
                body = body
                    .text("Assume for contradiction ")
                    .child(self.render_math(assumption, false));
            }
            T::CaseSplit { target, cases } => {
                body = body.text("on ").child(self.render_math(target, false));
                let mut list = Element::new("ol").class("tactic-cases");
                for case in cases {
                    list.push(Element::new("li").child(self.render_math(case, false)));
                }
                element.push(body);
                return element.child(list).into();
            }
            T::ExactWith { theorem_name } => {
                body.push(Element::span("theorem-name").text(theorem_name.as_str()));
            }
            T::Unknown(_) => {}
        }

        // Traces and choice lists were pushed before the body; keep the body first
        element.children.insert(1, body.into());
        element.into()
    }

    fn render_math_list(&mut self, nodes: &[ExpressionNode]) -> Vec<PresentationNode> {
        let mut out = Vec::with_capacity(nodes.len() * 2);
        for (i, node) in nodes.iter().enumerate() {
            if i > 0 {
                out.push(PresentationNode::text(", "));
            }
            out.push(self.render_math(node, false));
        }
        out
    }

    /// Ordered list of alternatives; an out-of-range index marks nothing
    fn render_choice_list(
        &mut self,
        items: &[ExpressionNode],
        marked: Option<usize>,
        class: &str,
        marker: &str,
    ) -> PresentationNode {
        let mut list = Element::new("ol").class(class);
        for (i, item) in items.iter().enumerate() {
            let mut li = Element::new("li");
            if marked == Some(i) {
                li = li.class(marker);
            }
            list.push(li.child(self.render_math(item, false)));
        }
        list.into()
    }

    fn render_trace(&mut self, steps: &[TraceStep]) -> PresentationNode {
        let mut list = Element::new("ol").class("step-trace");
        for step in steps {
            let mut item = Element::new("li").class("trace-step");
            if let Some(rule) = &step.rule {
                item.push(Element::span("trace-rule").text(format!("{}: ", rule)));
            }
            item = item
                .child(self.render_math(&step.before, false))
                .child(operator(symbols::RIGHT_ARROW))
                .child(self.render_math(&step.after, false));
            list.push(item);
        }
        list.into()
    }

    // =========================================================================
    // Branching containers
    // =========================================================================

    pub(crate) fn render_branching(&mut self, container: &BranchingContainer) -> PresentationNode {
        let mut element = Element::div("branching-container")
            .attr("data-container-id", container.id.as_str())
            .attr("data-container-type", container.container_type.as_str());
        for (depth, node) in container.walk() {
            element.push(self.render_branching_node(node, depth));
        }
        for (node, reason) in container.detached() {
            let message = match reason {
                Detached::DuplicateId => format!("branching node {} repeats an earlier id", node.id),
                Detached::CyclicParent => {
                    format!("branching node {} has a cyclic parent link", node.id)
                }
            };
            warn!("{} in container {}", message, container.id);
            element.push(PresentationNode::error(message));
            element.push(self.render_branching_node(node, 0));
        }
        element.into()
    }

    fn render_branching_node(&mut self, node: &BranchingNode, depth: usize) -> Element {
        let index = self.enter_proof_node(&node.id, node.parent_id.as_deref());
        let mut item = Element::div("branching-node")
            .attr("data-node-id", node.id.as_str())
            .attr("data-node-index", index.to_string())
            .attr("data-depth", depth.to_string());
        if let Some(parent) = &node.parent_id {
            item = item.attr("data-parent-id", parent.as_str());
        }
        if let Some(title) = &node.title {
            item.push(Element::div("branching-title").children(self.render_rich_text(title)));
        }
        item = item.children(self.render_contents(&node.content));
        self.leave_proof_node();
        item
    }
}

fn operator(glyph: &str) -> PresentationNode {
    Element::span("operator").text(format!(" {} ", glyph)).into()
}
