use thiserror::Error;

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("template parse error: {0}")]
    TemplateParse(String),

    #[error("template rendering failed: {0}")]
    TemplateRender(String),

    #[error("conversation has no current turn to frame")]
    EmptyConversation,
}

impl From<tera::Error> for PromptError {
    fn from(e: tera::Error) -> Self {
        PromptError::TemplateRender(e.to_string())
    }
}
