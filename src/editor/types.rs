use crate::model::{PresetId, TemplateId};
use crate::time::TimeError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    #[error("unknown template: {0}")]
    UnknownTemplate(TemplateId),
    #[error("unknown preset: {0}")]
    UnknownPreset(PresetId),
    #[error("row `{0}` is neither in the template nor in the roster")]
    UnknownRow(String),
    #[error("template name cannot be empty")]
    EmptyName,
    #[error(transparent)]
    Time(#[from] TimeError),
}
