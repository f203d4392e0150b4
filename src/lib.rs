//! # cohesion
//!
//! Structural analysis of directed and undirected [petgraph] graphs: strongly
//! connected component condensation and modularity metrics.
//!
//! Two independent capabilities over the same graph model:
//!
//! - **Condensation** ([`condense`], [`condense_filtered`]): Tarjan's
//!   linear-time decomposition into maximal strongly connected components,
//!   with an optional edge filter, yielding a vertex-to-component mapping
//!   and a condensed component graph.
//! - **Modularity** ([`modularity`], [`max_modularity`],
//!   [`scaled_modularity`], [`module_modularity`]): how much better a vertex
//!   partition concentrates edges inside its modules than a degree-preserving
//!   random graph would.
//!
//! Input graphs are borrowed immutably and never mutated; every call builds
//! its own traversal state, so concurrent callers can share one graph.
//!
//! ```rust
//! use petgraph::graph::DiGraph;
//! use cohesion::{condense, modularity};
//!
//! let mut graph = DiGraph::<&str, ()>::new();
//! let a = graph.add_node("a");
//! let b = graph.add_node("b");
//! let c = graph.add_node("c");
//! graph.add_edge(a, b, ());
//! graph.add_edge(b, a, ());
//! graph.add_edge(b, c, ());
//!
//! let cond = condense(&graph);
//! assert!(cond.is_same_component(a, b));
//!
//! // The component labels are a partition; score it.
//! let labels = cond.labels();
//! let q = modularity(&graph, |v| Some(labels[v.index()])).unwrap();
//! assert!(q.is_finite());
//! ```

pub mod condensation;
/// Error types used across `cohesion`.
pub mod error;
pub mod modularity;

pub use condensation::{condense, condense_filtered, strongly_connected_components, Condensation};
pub use error::{Error, Result};
pub use modularity::{max_modularity, modularity, module_modularity, scaled_modularity};
