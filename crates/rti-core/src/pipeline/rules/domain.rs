use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const MIN_PRIORITY: i32 = 1;
pub const MAX_PRIORITY: i32 = 100;

/// Condition/action pair authored as configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_priority")]
    pub priority: i32,
    pub conditions: Vec<Condition>,
    pub actions: Vec<Action>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_priority() -> i32 {
    MIN_PRIORITY
}

fn default_active() -> bool {
    true
}

impl Rule {
    /// Authoring-time checks; evaluation assumes rules passed through here.
    pub fn validate(&self) -> Result<(), RuleDefinitionError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(RuleDefinitionError::EmptyName);
        }
        if self.conditions.is_empty() {
            return Err(RuleDefinitionError::NoConditions(name.to_string()));
        }
        if self.actions.is_empty() {
            return Err(RuleDefinitionError::NoActions(name.to_string()));
        }
        if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&self.priority) {
            return Err(RuleDefinitionError::PriorityOutOfRange {
                name: name.to_string(),
                priority: self.priority,
            });
        }
        Ok(())
    }
}

/// Validates every rule and enforces unique names across the set.
pub fn validate_rule_set(rules: &[Rule]) -> Result<(), RuleDefinitionError> {
    let mut seen = HashSet::new();
    for rule in rules {
        rule.validate()?;
        if !seen.insert(rule.name.trim()) {
            return Err(RuleDefinitionError::DuplicateName(rule.name.trim().to_string()));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleDefinitionError {
    #[error("rule name is required")]
    EmptyName,
    #[error("rule '{0}' needs at least one condition")]
    NoConditions(String),
    #[error("rule '{0}' needs at least one action")]
    NoActions(String),
    #[error("rule '{name}' priority {priority} outside {MIN_PRIORITY}..={MAX_PRIORITY}")]
    PriorityOutOfRange { name: String, priority: i32 },
    #[error("rule name '{0}' is already defined")]
    DuplicateName(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub field: FieldPath,
    pub operator: Operator,
    pub value: Value,
}

/// Dot-separated path into the evaluation context, e.g. `intent.department`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct FieldPath(Vec<String>);

/// Outcome of resolving a path; absence is explicit instead of a null stand-in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolved<'a> {
    Absent,
    Present(&'a Value),
}

impl FieldPath {
    pub fn new(path: &str) -> Self {
        Self(path.split('.').map(str::to_string).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Total: missing keys, out-of-range indices, and scalar intermediates are `Absent`.
    pub fn resolve<'a>(&self, context: &'a Value) -> Resolved<'a> {
        let mut current = context;
        for segment in &self.0 {
            let next = match current {
                Value::Object(map) => map.get(segment),
                Value::Array(items) => segment
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| items.get(index)),
                _ => None,
            };
            match next {
                Some(value) => current = value,
                None => return Resolved::Absent,
            }
        }
        Resolved::Present(current)
    }
}

impl From<String> for FieldPath {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl From<&str> for FieldPath {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<FieldPath> for String {
    fn from(path: FieldPath) -> Self {
        path.0.join(".")
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    Equals,
    NotEquals,
    Contains,
    GreaterThan,
    LessThan,
    In,
    NotIn,
    /// Unrecognized operator name; always evaluates to false.
    Unsupported(String),
}

impl Operator {
    pub fn as_str(&self) -> &str {
        match self {
            Operator::Equals => "equals",
            Operator::NotEquals => "not_equals",
            Operator::Contains => "contains",
            Operator::GreaterThan => "greater_than",
            Operator::LessThan => "less_than",
            Operator::In => "in",
            Operator::NotIn => "not_in",
            Operator::Unsupported(name) => name,
        }
    }
}

impl From<String> for Operator {
    fn from(value: String) -> Self {
        match value.as_str() {
            "equals" => Operator::Equals,
            "not_equals" => Operator::NotEquals,
            "contains" => Operator::Contains,
            "greater_than" => Operator::GreaterThan,
            "less_than" => Operator::LessThan,
            "in" => Operator::In,
            "not_in" => Operator::NotIn,
            _ => Operator::Unsupported(value),
        }
    }
}

impl From<Operator> for String {
    fn from(operator: Operator) -> Self {
        operator.as_str().to_string()
    }
}

/// Effect applied when all of a rule's conditions hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAction", into = "RawAction")]
pub enum Action {
    SetTemplate(String),
    AddWarning(String),
    SetScore(i64),
    AddQuestion(String),
    /// Accepted and recorded, but the context stays read-only: no field is changed.
    ModifyField { field: FieldPath, value: Value },
    /// Unknown action type; skipped with a warning at evaluation time.
    Unsupported { kind: String, value: Value },
}

impl Action {
    pub fn kind(&self) -> &str {
        match self {
            Action::SetTemplate(_) => "setTemplate",
            Action::AddWarning(_) => "addWarning",
            Action::SetScore(_) => "setScore",
            Action::AddQuestion(_) => "addQuestion",
            Action::ModifyField { .. } => "modifyField",
            Action::Unsupported { kind, .. } => kind,
        }
    }
}

/// Wire shape of an action: `{"type": "...", "value": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawAction {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub value: Value,
}

fn expect_text(kind: &str, value: Value) -> Result<String, String> {
    match value {
        Value::String(text) => Ok(text),
        other => Err(format!("{kind} expects a string value, found {other}")),
    }
}

impl TryFrom<RawAction> for Action {
    type Error = String;

    fn try_from(raw: RawAction) -> Result<Self, Self::Error> {
        let RawAction { kind, value } = raw;
        match kind.as_str() {
            "setTemplate" => expect_text(&kind, value).map(Action::SetTemplate),
            "addWarning" => expect_text(&kind, value).map(Action::AddWarning),
            "addQuestion" => expect_text(&kind, value).map(Action::AddQuestion),
            "setScore" => value
                .as_f64()
                .map(|score| Action::SetScore(score.round() as i64))
                .ok_or_else(|| format!("setScore expects a numeric value, found {value}")),
            "modifyField" => {
                let field = value
                    .get("field")
                    .and_then(Value::as_str)
                    .map(FieldPath::new)
                    .ok_or_else(|| "modifyField expects {\"field\", \"value\"}".to_string())?;
                let new_value = value.get("value").cloned().unwrap_or(Value::Null);
                Ok(Action::ModifyField {
                    field,
                    value: new_value,
                })
            }
            _ => Ok(Action::Unsupported { kind, value }),
        }
    }
}

impl From<Action> for RawAction {
    fn from(action: Action) -> Self {
        let kind = action.kind().to_string();
        let value = match action {
            Action::SetTemplate(text) | Action::AddWarning(text) | Action::AddQuestion(text) => {
                Value::String(text)
            }
            Action::SetScore(score) => Value::from(score),
            Action::ModifyField { field, value } => serde_json::json!({
                "field": String::from(field),
                "value": value,
            }),
            Action::Unsupported { value, .. } => value,
        };
        RawAction { kind, value }
    }
}

/// Score adjustment requested by a rule, applied later by the scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ScoreModifier {
    Set(i64),
}
