//! Error types for the chart engine.

use std::fmt;

use crate::axis::AxisOrientation;
use crate::engine::ChartKind;

/// Errors returned by chart operations.
///
/// Degenerate numeric input is never an error; scalers recover from it
/// locally. These variants all point at a caller bug.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartError {
    /// The chart was queried before its first measure pass.
    NotMeasured,

    /// A required collaborator was not supplied to the builder.
    MissingCollaborator {
        /// Name of the collaborator (`"host"`, `"clock"`, ...).
        name: &'static str,
    },

    /// An axis index does not exist on the chart.
    AxisIndexOutOfRange {
        /// Which axis collection was indexed.
        orientation: AxisOrientation,
        /// Requested index.
        index: usize,
        /// Number of axes in that collection.
        len: usize,
    },

    /// A configuration value is outside its allowed range.
    InvalidConfig {
        /// Offending field.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// The operation does not apply to this kind of chart.
    UnsupportedOperation {
        /// Operation name.
        operation: &'static str,
        /// Kind of chart it was called on.
        kind: ChartKind,
    },
}

impl fmt::Display for ChartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartError::NotMeasured => {
                write!(f, "Chart has not been measured yet")
            }
            ChartError::MissingCollaborator { name } => {
                write!(f, "Chart builder is missing its {}", name)
            }
            ChartError::AxisIndexOutOfRange {
                orientation,
                index,
                len,
            } => {
                write!(
                    f,
                    "{:?} axis index {} out of range (chart has {})",
                    orientation, index, len
                )
            }
            ChartError::InvalidConfig { field, reason } => {
                write!(f, "Invalid chart config `{}`: {}", field, reason)
            }
            ChartError::UnsupportedOperation { operation, kind } => {
                write!(f, "`{}` is not supported on {:?} charts", operation, kind)
            }
        }
    }
}

impl std::error::Error for ChartError {}

/// Result type for chart operations.
pub type Result<T> = std::result::Result<T, ChartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_axis() {
        let err = ChartError::AxisIndexOutOfRange {
            orientation: AxisOrientation::Y,
            index: 3,
            len: 1,
        };
        assert_eq!(err.to_string(), "Y axis index 3 out of range (chart has 1)");
    }
}
