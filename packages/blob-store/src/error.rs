//! Error types for the serialization layer.

/// Errors producing or consuming serialized store artifacts.
///
/// Two kinds, matching the two failure surfaces: the write path wraps any
/// underlying I/O failure into `Serialize` (the store itself is left
/// unmodified); the read path reports any malformed or truncated input as
/// `Deserialize` before anything is committed to the store.
#[derive(thiserror::Error, Debug)]
pub enum BlobError {
    /// Writing the blob failed; carries the underlying message.
    #[error("blob serialization failed: {message}")]
    Serialize {
        /// Description of the underlying failure.
        message: String,
    },

    /// The input is not a valid blob (bad key, bad version, truncated or
    /// corrupt section).
    #[error("blob deserialization failed: {message}")]
    Deserialize {
        /// Description of what was malformed.
        message: String,
    },
}

impl BlobError {
    pub(crate) fn serialize(message: impl Into<String>) -> Self {
        BlobError::Serialize {
            message: message.into(),
        }
    }

    pub(crate) fn deserialize(message: impl Into<String>) -> Self {
        BlobError::Deserialize {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let e = BlobError::serialize("disk full");
        assert_eq!(
            format!("{}", e),
            "blob serialization failed: disk full"
        );

        let e = BlobError::deserialize("truncated at section 3");
        assert!(format!("{}", e).contains("deserialization failed"));
        assert!(format!("{}", e).contains("truncated at section 3"));
    }
}
