//! Error types for the core layer.
//!
//! Errors at this level are semantic. The heap layer below has no error
//! type at all - growth is infallible by contract and accessors are
//! bounds-checked - so everything that can go wrong semantically surfaces
//! here.

use fstore_heap_store::Address;

use crate::types::TypeCode;

/// Errors at the core layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A type code with no registry entry.
    ///
    /// Encountering one means the store is corrupted or the type was never
    /// registered - it is reported explicitly, never as a stray
    /// out-of-bounds fault or a silent `None`.
    UnknownTypeCode {
        /// The offending type code.
        code: TypeCode,
    },

    /// An address that does not resolve to a live feature structure.
    InvalidAddress {
        /// The offending address.
        addr: Address,
    },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::UnknownTypeCode { code } => write!(f, "unknown type code: {}", code),
            Error::InvalidAddress { addr } => write!(f, "invalid feature structure address: {}", addr),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let e = Error::UnknownTypeCode { code: 77 };
        assert_eq!(format!("{}", e), "unknown type code: 77");

        let e = Error::InvalidAddress { addr: 12 };
        assert!(format!("{}", e).contains("12"));
    }
}
