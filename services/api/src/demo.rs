use crate::infra::build_service;
use clap::Args;
use rti_core::config::AppConfig;
use rti_core::error::AppError;
use rti_core::pipeline::{DraftRequest, GeneratedDraft, Language};

#[derive(Args, Debug)]
pub(crate) struct IntentArgs {
    /// Grievance text to analyse
    pub(crate) text: String,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DraftArgs {
    /// Free-text description of the problem
    #[arg(long)]
    pub(crate) description: String,
    /// Department to address; detected from the description when omitted
    #[arg(long)]
    pub(crate) department: Option<String>,
    /// Location line for the PIO address
    #[arg(long)]
    pub(crate) location: Option<String>,
    /// Applicant name
    #[arg(long)]
    pub(crate) name: Option<String>,
    /// Applicant postal address
    #[arg(long)]
    pub(crate) address: Option<String>,
    /// Response language (en or hi)
    #[arg(long, default_value = "en")]
    pub(crate) language: String,
}

impl From<DraftArgs> for DraftRequest {
    fn from(args: DraftArgs) -> Self {
        DraftRequest {
            description: args.description,
            department: args.department,
            location: args.location,
            language: Language::from(args.language.as_str()),
            applicant_name: args.name,
            applicant_address: args.address,
            ..DraftRequest::default()
        }
    }
}

pub(crate) async fn run_intent(args: IntentArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = build_service(&config.pipeline)?;

    let intent = service.detector().detect(&args.text).await;
    println!("{}", serde_json::to_string_pretty(&intent)?);
    Ok(())
}

pub(crate) async fn run_draft(args: DraftArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = build_service(&config.pipeline)?;

    let draft = service.generate_draft(args.into()).await?;
    print!("{}", render_summary(&draft));
    Ok(())
}

fn render_summary(draft: &GeneratedDraft) -> String {
    let mut lines = vec![
        draft.draft.clone(),
        String::new(),
        "== Analysis ==".to_string(),
        format!(
            "Department: {}",
            draft.department.as_deref().unwrap_or("not detected")
        ),
        format!(
            "Score: {} / 100 (risk {:?}, completeness {}%)",
            draft.score, draft.risk_level, draft.completeness
        ),
        format!("Template: {}", draft.metadata.template_used),
        format!(
            "Generated: {}",
            draft.metadata.generated_at.format("%Y-%m-%d %H:%M UTC")
        ),
    ];
    if !draft.applied_rules.is_empty() {
        lines.push(format!("Rules applied: {}", draft.applied_rules.join(", ")));
    }
    for warning in &draft.warnings {
        lines.push(format!("- {warning}"));
    }
    lines.push(String::new());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rti_core::config::PipelineConfig;

    #[tokio::test]
    async fn draft_args_produce_a_summarised_draft() {
        let args = DraftArgs {
            description: "Street light broken near the park".to_string(),
            name: Some("Ravi Kumar".to_string()),
            language: "hi".to_string(),
            ..DraftArgs::default()
        };
        let request = DraftRequest::from(args);
        assert_eq!(request.language, Language::Hindi);

        let service = build_service(&PipelineConfig::default()).expect("service builds");
        let draft = service.generate_draft(request).await.expect("draft generated");
        let summary = render_summary(&draft);

        assert!(summary.starts_with("APPLICATION UNDER THE RIGHT TO INFORMATION ACT, 2005"));
        assert!(summary.contains("Department: Municipal"));
        assert!(summary.contains("Template: default"));
        assert!(summary.ends_with('\n'));
    }
}
