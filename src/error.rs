use thiserror::Error;

/// Boxed error returned by watch callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised by [`ValidatedCell`](crate::ValidatedCell) operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CellError {
    /// The validator rejected the candidate value. The cell is unchanged.
    #[error("invalid reference state")]
    InvalidState,

    /// A watch callback failed. The new value was already committed.
    #[error("watch `{key}` failed: {source}")]
    Watch {
        /// Key the failing watch was registered under
        key: String,
        /// Error returned by the callback
        #[source]
        source: BoxError,
    },
}

/// One operation was declared by two interfaces with different classifications.
///
/// Raised while building a [`Classification`](crate::Classification), so a
/// [`StableHandle`](crate::StableHandle) is never created over an ambiguous surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("operation `{op}` is head-mutating in `{head}` but not in `{value}`")]
pub struct ClassificationConflict {
    /// Debug rendering of the operation identifier
    pub op: String,
    /// Interface declaring the operation as returning the capability
    pub head: &'static str,
    /// Interface declaring the operation as returning a plain value
    pub value: &'static str,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(CellError::InvalidState.to_string(), "invalid reference state");

        let err = CellError::Watch {
            key: "audit".to_owned(),
            source: "disk full".into(),
        };
        assert_eq!(err.to_string(), "watch `audit` failed: disk full");
        assert!(std::error::Error::source(&err).is_some());

        let conflict = ClassificationConflict {
            op: "Append".to_owned(),
            head: "Vector",
            value: "Log",
        };
        assert_eq!(
            conflict.to_string(),
            "operation `Append` is head-mutating in `Vector` but not in `Log`"
        );
    }
}
