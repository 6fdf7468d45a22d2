use std::collections::HashSet;

use serde::Serialize;

use crate::pipeline::lexicon::{Category, Language};

use super::library::QuestionLibrary;

const QUESTION_NODES_PER_DOMAIN: usize = 2;
const MAX_LABEL_CHARS: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphNodeKind {
    Root,
    Department,
    Intent,
    Question,
    Template,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNodeData {
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub data: GraphNodeData,
    #[serde(rename = "type")]
    pub kind: GraphNodeKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Department -> intent -> question/template view of the template library.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KnowledgeGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl KnowledgeGraph {
    fn node(&mut self, id: impl Into<String>, label: impl Into<String>, kind: GraphNodeKind) {
        self.nodes.push(GraphNode {
            id: id.into(),
            data: GraphNodeData {
                label: label.into(),
            },
            kind,
        });
    }

    fn edge(&mut self, source: &str, target: &str, label: Option<&str>) {
        self.edges.push(GraphEdge {
            source: source.to_string(),
            target: target.to_string(),
            label: label.map(str::to_string),
        });
    }
}

fn department_label(category: Category) -> &'static str {
    match category {
        Category::Budget => "Finance Dept",
        Category::Contractor => "Public Works",
        Category::Timeline => "Project Monitoring",
        Category::Documents => "Record Room",
        Category::Personnel => "HR Dept",
        Category::General => "General Admin",
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn truncate_label(text: &str) -> String {
    if text.chars().count() > MAX_LABEL_CHARS {
        let head: String = text.chars().take(MAX_LABEL_CHARS).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

pub(crate) fn build(library: &QuestionLibrary) -> KnowledgeGraph {
    let mut graph = KnowledgeGraph::default();
    graph.node("root", "RTI AI Engine", GraphNodeKind::Root);

    let mut departments = HashSet::new();
    for domain in library.domains() {
        let department = department_label(domain);
        let department_id = format!("dept-{}", department.replace(' ', "-"));
        if departments.insert(department_id.clone()) {
            graph.node(&department_id, department, GraphNodeKind::Department);
            graph.edge("root", &department_id, Some("manages"));
        }

        let intent_id = format!("intent-{domain}");
        graph.node(&intent_id, capitalize(domain.id()), GraphNodeKind::Intent);
        graph.edge(&department_id, &intent_id, None);

        let snapshot = library.snapshot();
        let questions = snapshot.templates_for(Language::English, domain);
        for (index, question) in questions.iter().take(QUESTION_NODES_PER_DOMAIN).enumerate() {
            let question_id = format!("q-{domain}-{index}");
            graph.node(&question_id, truncate_label(question), GraphNodeKind::Question);
            graph.edge(&intent_id, &question_id, None);
        }
        drop(snapshot);

        let template_id = format!("tpl-{domain}");
        graph.node(
            &template_id,
            format!("{} Template", domain.id().to_uppercase()),
            GraphNodeKind::Template,
        );
        graph.edge(&intent_id, &template_id, None);
    }

    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::lexicon::Lexicon;

    #[test]
    fn graph_links_every_domain() {
        let library = QuestionLibrary::from_lexicon(&Lexicon::builtin());
        let graph = build(&library);

        let intents = graph
            .nodes
            .iter()
            .filter(|node| node.kind == GraphNodeKind::Intent)
            .count();
        assert_eq!(intents, 6);

        let questions: Vec<_> = graph
            .nodes
            .iter()
            .filter(|node| node.kind == GraphNodeKind::Question)
            .collect();
        assert_eq!(questions.len(), 12);
        assert!(questions
            .iter()
            .all(|node| node.data.label.chars().count() <= MAX_LABEL_CHARS + 3));

        assert!(graph
            .edges
            .iter()
            .any(|edge| edge.source == "root" && edge.target == "dept-Finance-Dept"));
        assert!(graph
            .nodes
            .iter()
            .any(|node| node.id == "intent-budget" && node.data.label == "Budget"));
    }
}
