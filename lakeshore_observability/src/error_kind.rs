/// Broad classification of errors, used to pick log levels and exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad configuration, needs operator fix
    Configuration,

    /// Malformed input
    Validation,

    /// Object or bucket missing
    NotFound,

    /// Destination exists or is locked
    Conflict,

    /// Network/IO errors, a later delivery may succeed
    Temporary,

    /// Bugs, system errors
    Internal,
}

impl ErrorKind {
    /// Whether a re-delivery of the same notification could succeed.
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::Temporary)
    }

    /// Standard exit code for this error category.
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Configuration => 78, // EX_CONFIG
            Self::Validation => 65,    // EX_DATAERR
            Self::Temporary => 75,     // EX_TEMPFAIL
            Self::NotFound => 66,      // EX_NOINPUT
            _ => 70,                   // EX_SOFTWARE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_temporary_is_retryable() {
        assert!(ErrorKind::Temporary.is_retryable());
        assert!(!ErrorKind::Validation.is_retryable());
        assert!(!ErrorKind::NotFound.is_retryable());
        assert!(!ErrorKind::Internal.is_retryable());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(ErrorKind::Configuration.exit_code(), 78);
        assert_eq!(ErrorKind::Conflict.exit_code(), 70);
    }
}
