use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::pipeline::lexicon::Language;
use crate::pipeline::repository::{bounded_lookup, StoreError, TemplateStore};

const RULE: &str = "--------------------------------------------------------------------------";
const DATE_FORMAT: &str = "%d/%m/%Y";

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([\w.@]+)\s*\}\}").expect("static pattern compiles")
});

static VARIABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([^}]+?)\s*\}\}").expect("static pattern compiles"));

const HELPER_KEYWORDS: [&str; 18] = [
    "#if", "/if", "#each", "/each", "#unless", "/unless", "#with", "/with", "else", "log",
    "this", ".", "@index", "@key", "@first", "@last", "addOne", "formatDate",
];

/// Values substituted into the letter. Blank fields fall back to bracketed defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderData {
    pub applicant_name: Option<String>,
    pub applicant_address: Option<String>,
    pub department: Option<String>,
    pub location: Option<String>,
    pub questions: Vec<String>,
    pub language: Language,
    pub topic: Option<String>,
    pub date: Option<NaiveDate>,
}

fn filled(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|value| !value.is_empty())
}

impl RenderData {
    fn date_text(&self) -> String {
        self.date
            .unwrap_or_else(|| Utc::now().date_naive())
            .format(DATE_FORMAT)
            .to_string()
    }

    fn numbered_questions(&self, separator: &str) -> String {
        self.questions
            .iter()
            .enumerate()
            .map(|(index, question)| format!("{}. {question}", index + 1))
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// Placeholder table for stored templates: defaults first, provided values on top.
    fn placeholder_values(&self) -> BTreeMap<&'static str, String> {
        let mut values = BTreeMap::from([
            ("location", "[Location]".to_string()),
            ("applicantName", "[Your Name]".to_string()),
            ("department", "[Department]".to_string()),
            ("date", self.date_text()),
            ("language", self.language.display_name().to_string()),
        ]);

        let provided = [
            ("applicantName", filled(&self.applicant_name)),
            ("applicantAddress", filled(&self.applicant_address)),
            ("department", filled(&self.department)),
            ("location", filled(&self.location)),
            ("topic", filled(&self.topic)),
        ];
        for (key, value) in provided {
            if let Some(value) = value {
                values.insert(key, value.to_string());
            }
        }
        if !self.questions.is_empty() {
            values.insert("questions", self.numbered_questions("\n"));
        }
        values
    }
}

/// Placeholder inventory of a stored template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateMetadata {
    pub id: String,
    pub name: String,
    pub variables: Vec<String>,
    pub department: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("template '{0}' not found")]
    TemplateNotFound(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Renders RTI application letters, optionally from a stored template.
pub struct DraftRenderer<T> {
    templates: Arc<T>,
    lookup_timeout: Duration,
}

impl<T> DraftRenderer<T>
where
    T: TemplateStore + 'static,
{
    pub fn new(templates: Arc<T>, lookup_timeout: Duration) -> Self {
        Self {
            templates,
            lookup_timeout,
        }
    }

    /// Renders with the stored template when an override is given, falling back to the
    /// standard letter if that template cannot be loaded.
    pub async fn render(&self, data: &RenderData, template_override: Option<&str>) -> String {
        let Some(template_id) = template_override else {
            return render_default(data);
        };

        match self.render_stored(template_id, data).await {
            Ok(rendered) => rendered,
            Err(err) => {
                warn!(template = template_id, error = %err, "falling back to default letter");
                render_default(data)
            }
        }
    }

    pub async fn render_stored(
        &self,
        template_id: &str,
        data: &RenderData,
    ) -> Result<String, RenderError> {
        let lookup = self.templates.find_template(template_id);
        let template = bounded_lookup(self.lookup_timeout, lookup)
            .await?
            .ok_or_else(|| RenderError::TemplateNotFound(template_id.to_string()))?;
        Ok(fill_placeholders(&template.content, data))
    }

    pub async fn template_metadata(
        &self,
        template_id: &str,
    ) -> Result<TemplateMetadata, RenderError> {
        let lookup = self.templates.find_template(template_id);
        let template = bounded_lookup(self.lookup_timeout, lookup)
            .await?
            .ok_or_else(|| RenderError::TemplateNotFound(template_id.to_string()))?;
        Ok(TemplateMetadata {
            variables: template_variables(&template.content),
            id: template.id,
            name: template.name,
            department: template.department,
            language: template.language,
        })
    }
}

/// Substitutes `{{key}}` markers; unknown keys are left as written.
pub fn fill_placeholders(content: &str, data: &RenderData) -> String {
    let values = data.placeholder_values();
    PLACEHOLDER
        .replace_all(content, |caps: &Captures<'_>| {
            values
                .get(&caps[1])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Unique template variable names in first-seen order, without block helpers.
pub fn template_variables(content: &str) -> Vec<String> {
    let mut variables: Vec<String> = Vec::new();
    for caps in VARIABLE.captures_iter(content) {
        let variable = caps[1].trim();
        let first_word = variable.split(' ').next().unwrap_or_default();
        if variable.starts_with('#') || variable.starts_with('/') {
            continue;
        }
        if HELPER_KEYWORDS.contains(&first_word) {
            continue;
        }
        if !variables.iter().any(|existing| existing == variable) {
            variables.push(variable.to_string());
        }
    }
    variables
}

/// Standard RTI application letter.
pub fn render_default(data: &RenderData) -> String {
    StandardLetter::new(data).to_string()
}

struct StandardLetter<'a> {
    data: &'a RenderData,
    name: &'a str,
    address: &'a str,
    department: &'a str,
}

impl<'a> StandardLetter<'a> {
    fn new(data: &'a RenderData) -> Self {
        Self {
            data,
            name: filled(&data.applicant_name).unwrap_or("[Your Name]"),
            address: filled(&data.applicant_address).unwrap_or("[Your Address]"),
            department: filled(&data.department).unwrap_or("[Department Name]"),
        }
    }
}

impl fmt::Display for StandardLetter<'_> {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            data,
            name,
            address,
            department,
        } = self;
        writeln!(out, "APPLICATION UNDER THE RIGHT TO INFORMATION ACT, 2005")?;
        writeln!(out, "{}", "=".repeat(RULE.len()))?;
        writeln!(out)?;
        writeln!(out, "To,")?;
        writeln!(out, "The Public Information Officer (PIO),")?;
        writeln!(out, "{department}")?;
        if let Some(location) = filled(&data.location) {
            writeln!(out, "{location}")?;
        }
        writeln!(out)?;
        writeln!(
            out,
            "Subject: Request for Information under Right to Information Act, 2005."
        )?;
        writeln!(out)?;
        writeln!(out, "Respected Sir/Madam,")?;
        writeln!(out)?;
        writeln!(
            out,
            "I, {name}, a citizen of India, resident of {address}, most respectfully request you \
             to provide the following information:"
        )?;
        writeln!(out)?;
        writeln!(out, "DESCRIPTION OF INFORMATION REQUIRED:")?;
        writeln!(out, "{RULE}")?;
        writeln!(out, "{}", data.numbered_questions("\n\n"))?;
        writeln!(out, "{RULE}")?;
        writeln!(out)?;
        writeln!(
            out,
            "I state that the information sought does not fall within the restrictions contained \
             in Section 8 and 9 of the RTI Act and to the best of my knowledge it pertains to your \
             office."
        )?;
        writeln!(out)?;
        writeln!(
            out,
            "I am willing to pay the fees for this information as per the Right to Information \
             Rules, 2012. I am depositing the application fee via [Mode of Payment] or attaching \
             Court Fee Stamp."
        )?;
        writeln!(out)?;
        writeln!(
            out,
            "Please provide the information using the preferred language ({}). If any of the above \
             requested information is not available in your records, please forward this \
             application to the concerned Public Authority under Section 6(3) of the RTI Act \
             within 5 days.",
            data.language.display_name()
        )?;
        writeln!(out)?;
        writeln!(out, "Yours faithfully,")?;
        writeln!(out)?;
        writeln!(out, "(Signature)")?;
        writeln!(out)?;
        writeln!(out, "Name: {name}")?;
        writeln!(out, "Address: {address}")?;
        writeln!(out, "Date: {}", data.date_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> RenderData {
        RenderData {
            applicant_name: Some("Asha Verma".to_string()),
            applicant_address: Some("12 MG Road, Pune".to_string()),
            department: Some("Public Works Department".to_string()),
            location: Some("Pune".to_string()),
            questions: vec![
                "Provide the sanctioned budget.".to_string(),
                "Provide the contractor details.".to_string(),
            ],
            language: Language::Hindi,
            topic: Some("road repair".to_string()),
            date: NaiveDate::from_ymd_opt(2024, 3, 9),
        }
    }

    #[test]
    fn default_letter_numbers_questions() {
        let letter = render_default(&data());
        assert!(letter.starts_with("APPLICATION UNDER THE RIGHT TO INFORMATION ACT, 2005\n"));
        assert!(letter.contains("Public Works Department\nPune\n"));
        assert!(letter.contains(
            "1. Provide the sanctioned budget.\n\n2. Provide the contractor details.\n"
        ));
        assert!(letter.contains("preferred language (Hindi)"));
        assert!(letter.contains("Yours faithfully,"));
        assert!(letter.ends_with("Date: 09/03/2024\n"));
    }

    #[test]
    fn default_letter_uses_bracketed_placeholders() {
        let letter = render_default(&RenderData {
            date: NaiveDate::from_ymd_opt(2024, 1, 1),
            ..RenderData::default()
        });
        assert!(letter.contains("I, [Your Name], a citizen of India, resident of [Your Address]"));
        assert!(letter.contains("(PIO),\n[Department Name]\n\nSubject"));
        assert!(letter.contains("preferred language (English)"));
    }

    #[test]
    fn placeholders_fill_known_keys_only() {
        let content = "To {{ department }} at {{location}} re {{topic}}:\n{{questions}}\n{{fee}}";
        let rendered = fill_placeholders(content, &data());
        assert_eq!(
            rendered,
            "To Public Works Department at Pune re road repair:\n\
             1. Provide the sanctioned budget.\n2. Provide the contractor details.\n{{fee}}"
        );

        let defaults =
            fill_placeholders("{{applicantName}} / {{location}}", &RenderData::default());
        assert_eq!(defaults, "[Your Name] / [Location]");
    }

    #[test]
    fn template_variables_skip_helpers() {
        let content = "{{applicantName}} {{#each questions}}{{addOne @index}}. {{this}}{{/each}} \
                       {{ department }} {{applicantName}} {{formatDate date}} {{location}}";
        assert_eq!(
            template_variables(content),
            vec!["applicantName", "department", "location"]
        );
    }
}
