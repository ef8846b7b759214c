use thiserror::Error;

#[derive(Error, Debug)]
pub enum PageSplitError {
    #[error("Failed to load PDF: {0}")]
    Load(String),

    /// The options resolve to nothing that can be produced. The message is
    /// shown to the user as-is.
    #[error("{0}")]
    InvalidPlan(String),

    /// 1-based page number that the source does not have
    #[error("Page {0} does not exist")]
    PageNotFound(usize),

    #[error("Failed to assemble {group}: {reason}")]
    Assembly { group: String, reason: String },

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl PageSplitError {
    pub(crate) fn invalid_plan(reason: &str) -> Self {
        PageSplitError::InvalidPlan(reason.to_string())
    }

    /// Attach the name of the output being built to an assembly failure.
    pub(crate) fn for_group(self, name: &str) -> Self {
        match self {
            PageSplitError::Assembly { reason, .. } => PageSplitError::Assembly {
                group: name.to_string(),
                reason,
            },
            other => other,
        }
    }
}
