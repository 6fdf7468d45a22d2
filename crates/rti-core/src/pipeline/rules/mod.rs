//! Rule engine: ordered condition/action rules evaluated against a read-only context.

mod conditions;
mod domain;

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::repository::{bounded_lookup, RuleStore};

pub use domain::{
    validate_rule_set, Action, Condition, FieldPath, Operator, RawAction, Resolved, Rule,
    RuleDefinitionError, ScoreModifier, MAX_PRIORITY, MIN_PRIORITY,
};

/// Accumulated effects of every rule whose conditions held.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleEvaluationResult {
    pub applied_rules: Vec<String>,
    pub actions: Vec<Action>,
    pub warnings: Vec<String>,
    pub template_override: Option<String>,
    pub score_modifiers: Vec<ScoreModifier>,
    pub additional_questions: Vec<String>,
}

impl RuleEvaluationResult {
    fn apply(&mut self, rule: &str, action: &Action) {
        match action {
            Action::SetTemplate(template) => {
                // Later (lower-priority) rules overwrite earlier ones.
                self.template_override = Some(template.clone());
            }
            Action::AddWarning(warning) => self.warnings.push(warning.clone()),
            Action::SetScore(score) => self.score_modifiers.push(ScoreModifier::Set(*score)),
            Action::AddQuestion(question) => self.additional_questions.push(question.clone()),
            Action::ModifyField { field, .. } => {
                debug!(rule, field = %field, "modifyField recorded; context is read-only");
            }
            Action::Unsupported { kind, .. } => {
                warn!(rule, action = %kind, "skipping unsupported rule action");
                return;
            }
        }
        self.actions.push(action.clone());
    }
}

/// Pure evaluation over an explicit rule list. Inactive rules are skipped and the rest run
/// in descending priority, keeping the given order for ties.
pub fn evaluate_rules(rules: &[Rule], context: &Value) -> RuleEvaluationResult {
    let mut ordered: Vec<&Rule> = rules.iter().filter(|rule| rule.is_active).collect();
    ordered.sort_by(|a, b| b.priority.cmp(&a.priority));

    let mut result = RuleEvaluationResult::default();
    for rule in ordered {
        let matched = rule
            .conditions
            .iter()
            .all(|condition| conditions::evaluate_condition(condition, context));
        if !matched {
            continue;
        }

        result.applied_rules.push(rule.name.clone());
        for action in &rule.actions {
            result.apply(&rule.name, action);
        }
    }
    result
}

pub struct RuleEngine<R> {
    store: Arc<R>,
    lookup_timeout: Duration,
}

impl<R> RuleEngine<R>
where
    R: RuleStore + 'static,
{
    pub fn new(store: Arc<R>, lookup_timeout: Duration) -> Self {
        Self {
            store,
            lookup_timeout,
        }
    }

    /// Loads active rules and evaluates them. A failing or slow store yields an empty result.
    pub async fn evaluate(&self, context: &Value) -> RuleEvaluationResult {
        let lookup = self.store.find_active_rules_by_priority_desc();
        let rules = match bounded_lookup(self.lookup_timeout, lookup).await {
            Ok(rules) => rules,
            Err(err) => {
                warn!(error = %err, "rule store unavailable; evaluating no rules");
                return RuleEvaluationResult::default();
            }
        };

        let result = evaluate_rules(&rules, context);
        debug!(
            considered = rules.len(),
            applied = result.applied_rules.len(),
            "rules evaluated"
        );
        result
    }
}
