//! Error types.

/// Failure of an asynchronous embed resolution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("embed provider rejected {url}: {reason}")]
    Rejected { url: String, reason: String },
    #[error("embed provider unavailable: {0}")]
    Unavailable(String),
    #[error("embed provider failed without a reason")]
    Unknown,
}

impl ResolveError {
    /// Text suitable for a user-facing error notification.
    pub fn notification(&self) -> String {
        match self {
            ResolveError::Rejected { reason, .. } => {
                format!("Media embed handler error: {reason}")
            }
            ResolveError::Unavailable(reason) => format!("Media embed handler error: {reason}"),
            ResolveError::Unknown => "Media embed handler threw unknown error.".to_string(),
        }
    }
}

/// Error loading engine options.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid options: {0}")]
    Toml(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_with_reason() {
        let err = ResolveError::Rejected {
            url: "https://a.test".into(),
            reason: "not found".into(),
        };
        assert_eq!(err.notification(), "Media embed handler error: not found");
    }

    #[test]
    fn test_notification_without_reason() {
        assert_eq!(
            ResolveError::Unknown.notification(),
            "Media embed handler threw unknown error."
        );
    }
}
