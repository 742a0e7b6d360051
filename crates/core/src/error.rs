use thiserror::Error;

/// Failure for a single media file. Never fatal for the batch.
///
/// `file` is always the original `{name}{extension}`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemError {
    #[error("{file}: failed to parse - {reason}")]
    Unparseable { file: String, reason: String },

    #[error("{file}: no match found for \"{query}\"")]
    NoMatch { file: String, query: String },

    #[error("{file}: failed to rename to {target} - {reason}")]
    RenameFailed {
        file: String,
        target: String,
        reason: String,
    },
}

impl ItemError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unparseable { .. } => "unparseable",
            Self::NoMatch { .. } => "no_match",
            Self::RenameFailed { .. } => "rename_failed",
        }
    }

    pub fn file(&self) -> &str {
        match self {
            Self::Unparseable { file, .. }
            | Self::NoMatch { file, .. }
            | Self::RenameFailed { file, .. } => file,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_lead_with_the_file() {
        let err = ItemError::Unparseable {
            file: "___.mkv".into(),
            reason: "no title".into(),
        };
        assert_eq!(err.to_string(), "___.mkv: failed to parse - no title");
        assert_eq!(err.code(), "unparseable");
        assert_eq!(err.file(), "___.mkv");

        let err = ItemError::NoMatch {
            file: "Taboo.S01E09.mkv".into(),
            query: "Taboo".into(),
        };
        assert_eq!(err.code(), "no_match");
        assert!(err.to_string().contains("\"Taboo\""));
    }
}
