use thiserror::Error;

/// A raw form value could not be turned into a feature value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("`{label}` for `{field}` has no embedded numeric code")]
    MissingCode { field: String, label: String },

    #[error("`{value}` is not a number for `{field}`")]
    NotANumber { field: String, value: String },

    #[error("`{label}` is not an option of `{field}`")]
    UnknownOption { field: String, label: String },

    #[error("unknown field `{0}`")]
    UnknownField(String),
}

/// Why a single assessment failed. Nothing is shown for a failed request.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("input does not match the model schema: {0}")]
    SchemaMismatch(String),

    #[error("inference failed: {0}")]
    Inference(String),
}
