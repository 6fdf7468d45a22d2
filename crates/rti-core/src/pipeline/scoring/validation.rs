use serde::{Deserialize, Serialize};

const MIN_DRAFT_LENGTH: usize = 100;
const MIN_NAME_LENGTH: usize = 3;
const SUGGESTED_QUESTIONS: usize = 3;
const MISSING_REQUIRED: &str = "Missing required field";

/// Draft fields inspected by the strict validator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DraftRecord {
    pub applicant_name: Option<String>,
    pub applicant_address: Option<String>,
    pub department: Option<String>,
    pub location: Option<String>,
    pub questions: Vec<String>,
    pub draft_text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Completeness {
    pub percentage: u8,
    pub filled_fields: usize,
    pub total_fields: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub score: u8,
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
    pub is_valid: bool,
    pub completeness: Completeness,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Excellent,
    Good,
    Fair,
    NeedsImprovement,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    pub status: ValidationStatus,
    pub score: u8,
    pub completeness: u8,
    pub issue_count: usize,
    pub suggestion_count: usize,
}

impl ValidationReport {
    pub fn summary(&self) -> ValidationSummary {
        let status = match self.score {
            80.. => ValidationStatus::Excellent,
            60..=79 => ValidationStatus::Good,
            40..=59 => ValidationStatus::Fair,
            _ => ValidationStatus::NeedsImprovement,
        };
        ValidationSummary {
            status,
            score: self.score,
            completeness: self.completeness.percentage,
            issue_count: self.warnings.len(),
            suggestion_count: self.suggestions.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    ApplicantName,
    ApplicantAddress,
    Department,
    Location,
    Questions,
    DraftText,
}

struct FieldRule {
    field: Field,
    weight: f64,
    required: bool,
}

const FIELD_RULES: [FieldRule; 6] = [
    FieldRule { field: Field::ApplicantName, weight: 15.0, required: true },
    FieldRule { field: Field::ApplicantAddress, weight: 10.0, required: false },
    FieldRule { field: Field::Department, weight: 15.0, required: true },
    FieldRule { field: Field::Location, weight: 10.0, required: false },
    FieldRule { field: Field::Questions, weight: 25.0, required: true },
    FieldRule { field: Field::DraftText, weight: 25.0, required: true },
];

const COMPLETENESS_FIELDS: [Field; 5] = [
    Field::ApplicantName,
    Field::ApplicantAddress,
    Field::Department,
    Field::Location,
    Field::Questions,
];

impl Field {
    fn label(self) -> &'static str {
        match self {
            Field::ApplicantName => "Applicant Name",
            Field::ApplicantAddress => "Applicant Address",
            Field::Department => "Department",
            Field::Location => "Location",
            Field::Questions => "Questions",
            Field::DraftText => "Draft Text",
        }
    }

    fn is_filled(self, record: &DraftRecord) -> bool {
        let text = match self {
            Field::ApplicantName => &record.applicant_name,
            Field::ApplicantAddress => &record.applicant_address,
            Field::Department => &record.department,
            Field::Location => &record.location,
            Field::DraftText => &record.draft_text,
            Field::Questions => return !record.questions.is_empty(),
        };
        text.as_deref().is_some_and(|value| !value.trim().is_empty())
    }
}

#[derive(Default)]
struct Findings {
    warnings: Vec<String>,
    suggestions: Vec<String>,
}

impl Findings {
    fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    fn suggest(&mut self, message: impl Into<String>) {
        self.suggestions.push(message.into());
    }
}

/// Quality score for a present field, starting from its full weight.
fn field_score(rule: &FieldRule, record: &DraftRecord, findings: &mut Findings) -> f64 {
    let mut score = rule.weight;
    match rule.field {
        Field::Questions => {
            if record.questions.len() < SUGGESTED_QUESTIONS {
                findings.suggest("Consider adding more specific questions for better results");
                score *= 0.8;
            }
        }
        Field::DraftText => {
            let text = record.draft_text.as_deref().unwrap_or_default();
            if text.chars().count() < MIN_DRAFT_LENGTH {
                findings.warn("Draft text seems incomplete");
                score *= 0.7;
            }
            if text.contains("[Your Name]") || text.contains("[Department Name]") {
                findings.warn("Draft contains placeholder text that needs to be filled");
                score *= 0.8;
            }
        }
        Field::ApplicantName => {
            let name = record.applicant_name.as_deref().unwrap_or_default();
            if name.chars().count() < MIN_NAME_LENGTH {
                findings.warn("Applicant name seems incomplete");
                score *= 0.7;
            }
        }
        Field::ApplicantAddress | Field::Department | Field::Location => {}
    }
    score
}

fn check_content(record: &DraftRecord, findings: &mut Findings) {
    let Some(text) = record.draft_text.as_deref().filter(|text| !text.is_empty()) else {
        return;
    };
    let lowered = text.to_lowercase();

    if !lowered.contains("right to information") && !lowered.contains("rti act") {
        findings.suggest("Consider explicitly mentioning the RTI Act, 2005");
    }
    if !lowered.contains("yours faithfully") && !lowered.contains("yours sincerely") {
        findings.suggest("Consider adding a formal closing (Yours faithfully)");
    }
}

fn completeness(record: &DraftRecord) -> Completeness {
    let filled = COMPLETENESS_FIELDS
        .iter()
        .filter(|field| field.is_filled(record))
        .count();
    let total = COMPLETENESS_FIELDS.len();
    Completeness {
        percentage: (filled as f64 / total as f64 * 100.0).round() as u8,
        filled_fields: filled,
        total_fields: total,
    }
}

/// Field-presence weighted validation. Independent of [`super::analyze_draft`]; the two
/// scores are allowed to disagree.
pub fn validate_draft(record: &DraftRecord) -> ValidationReport {
    let mut findings = Findings::default();
    let mut total = 0.0;
    let mut max = 0.0;

    for rule in &FIELD_RULES {
        max += rule.weight;
        let filled = rule.field.is_filled(record);
        if !filled && rule.required {
            findings.warn(format!("{MISSING_REQUIRED}: {}", rule.field.label()));
        } else if !filled {
            findings.suggest(format!("Consider adding: {}", rule.field.label()));
            total += rule.weight * 0.5;
        } else {
            total += field_score(rule, record, &mut findings);
        }
    }

    check_content(record, &mut findings);

    let score = ((total / max) * 100.0).round().min(100.0) as u8;
    let is_valid = !findings
        .warnings
        .iter()
        .any(|warning| warning.contains(MISSING_REQUIRED));

    ValidationReport {
        score,
        is_valid,
        completeness: completeness(record),
        warnings: findings.warnings,
        suggestions: findings.suggestions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_record() -> DraftRecord {
        DraftRecord {
            applicant_name: Some("Asha Verma".to_string()),
            applicant_address: Some("12 MG Road, Pune".to_string()),
            department: Some("Public Works Department".to_string()),
            location: Some("Pune".to_string()),
            questions: vec![
                "Provide the sanctioned budget.".to_string(),
                "Provide copies of the contract.".to_string(),
                "Provide the inspection reports.".to_string(),
            ],
            draft_text: Some(format!(
                "Application under the Right to Information Act, 2005. {} Yours faithfully",
                "Please provide the requested records. ".repeat(3)
            )),
        }
    }

    #[test]
    fn complete_record_is_excellent() {
        let report = validate_draft(&complete_record());
        assert_eq!(report.score, 100);
        assert!(report.is_valid);
        assert!(report.warnings.is_empty());
        assert!(report.suggestions.is_empty());
        assert_eq!(report.completeness.percentage, 100);
        assert_eq!(report.summary().status, ValidationStatus::Excellent);
    }

    #[test]
    fn empty_record_lists_missing_fields() {
        let report = validate_draft(&DraftRecord::default());
        assert!(!report.is_valid);
        assert_eq!(
            report.warnings,
            vec![
                "Missing required field: Applicant Name",
                "Missing required field: Department",
                "Missing required field: Questions",
                "Missing required field: Draft Text",
            ]
        );
        assert_eq!(
            report.suggestions,
            vec![
                "Consider adding: Applicant Address",
                "Consider adding: Location",
            ]
        );
        // Only the two optional half weights count: (5 + 5) / 100.
        assert_eq!(report.score, 10);
        assert_eq!(report.completeness.filled_fields, 0);
        assert_eq!(report.summary().status, ValidationStatus::NeedsImprovement);
    }

    #[test]
    fn placeholder_text_and_short_fields_are_penalized() {
        let record = DraftRecord {
            draft_text: Some("To the PIO, [Department Name]. Signed [Your Name]".to_string()),
            questions: vec!["Provide the file notings.".to_string()],
            location: None,
            ..complete_record()
        };
        let report = validate_draft(&record);

        // name 15 + address 10 + dept 15 + location 5 + questions 20 + draft 14
        assert_eq!(report.score, 79);
        assert!(report.is_valid);
        assert_eq!(
            report.warnings,
            vec![
                "Draft text seems incomplete",
                "Draft contains placeholder text that needs to be filled",
            ]
        );
        assert!(report
            .suggestions
            .contains(&"Consider explicitly mentioning the RTI Act, 2005".to_string()));
        assert_eq!(report.completeness.percentage, 80);
        assert_eq!(report.summary().status, ValidationStatus::Good);
    }

    #[test]
    fn short_applicant_name_is_flagged() {
        let record = DraftRecord {
            applicant_name: Some("Al".to_string()),
            ..complete_record()
        };
        let report = validate_draft(&record);
        assert_eq!(report.warnings, vec!["Applicant name seems incomplete"]);
        assert!(report.score < 100);
        assert!(report.is_valid);
    }
}
