use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("template parse error: {0}")]
    TemplateParse(String),

    #[error("template rendering failed: {0}")]
    TemplateRender(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] omni_core::error::CoreError),
}

impl From<tera::Error> for DashboardError {
    fn from(e: tera::Error) -> Self {
        DashboardError::TemplateRender(e.to_string())
    }
}
