//! Draft orchestration and letter rendering.

mod renderer;
mod service;

pub use renderer::{
    fill_placeholders, render_default, template_variables, DraftRenderer, RenderData,
    RenderError, TemplateMetadata,
};
pub use service::{
    DraftError, DraftMetadata, DraftRequest, DraftService, GeneratedDraft, IntentSummary,
    PipelineSettings, DEFAULT_STORE_TIMEOUT,
};
