use core::fmt;

/// Result alias for `cohesion`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the modularity metrics.
///
/// The condensation side of the crate is total over finite graphs and
/// returns no errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A modularity formula degenerated to a division by zero, either
    /// because the graph has no edges or because the partition's maximum
    /// modularity is zero.
    UndefinedMetric,

    /// The membership function assigned no module to a vertex.
    InvalidPartition {
        /// Index of the unclassified vertex.
        node: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UndefinedMetric => write!(f, "metric is undefined for this graph and partition"),
            Error::InvalidPartition { node } => {
                write!(f, "partition assigns no module to vertex {node}")
            }
        }
    }
}

impl std::error::Error for Error {}
