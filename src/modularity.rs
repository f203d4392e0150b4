//! Modularity metrics for vertex partitions.
//!
//! Quantifies how well a partition concentrates edges inside its modules
//! compared to a random graph with the same degree sequence:
//!
//! ```text
//! Q = (1/2m) × Σ [A(v1,v2) - k(v1) × k(v2)/(2m)]
//! ```
//!
//! summed over all ordered same-module vertex pairs, self-pairs included.
//! `m` is the edge count, `A` the adjacency indicator and `k` the degree.
//!
//! ## Scaling
//!
//! Raw Q is capped below 1 whenever the partition's modules are sparse or
//! disconnected (Newman discusses this in *Networks*, p. 224), so [`max_modularity`]
//! computes the ceiling the partition could reach if every same-module pair
//! were connected, and [`scaled_modularity`] renormalizes Q against it. The
//! scaled value is also known as the assortativity coefficient; a partition
//! that is as modular as its module sizes allow scores 1.
//!
//! ## Degree convention
//!
//! Directed and undirected graphs are treated uniformly: `k` is the total
//! degree (in plus out for directed graphs) and two vertices are adjacent
//! when an edge connects them in either direction. Self-loops count toward
//! degree and adjacency exactly as the graph reports them.
//!
//! ## Usage
//!
//! ```rust
//! use petgraph::graph::UnGraph;
//! use cohesion::{modularity, scaled_modularity};
//!
//! // Two disconnected edges, one module each.
//! let mut graph = UnGraph::<u32, ()>::new_undirected();
//! let a = graph.add_node(0);
//! let b = graph.add_node(0);
//! let c = graph.add_node(1);
//! let d = graph.add_node(1);
//! graph.add_edge(a, b, ());
//! graph.add_edge(c, d, ());
//!
//! let q = modularity(&graph, |v| Some(graph[v])).unwrap();
//! assert!((q - 0.5).abs() < 0.01);
//! let scaled = scaled_modularity(&graph, |v| Some(graph[v])).unwrap();
//! assert!((scaled - 1.0).abs() < 0.01);
//! ```
//!
//! ## References
//!
//! - Newman & Girvan (2004). "Finding and evaluating community structure
//!   in networks."
//! - Newman (2010). *Networks: An Introduction*, Oxford University Press.

use crate::error::{Error, Result};
use petgraph::graph::{Graph, IndexType, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::{Direction, EdgeType};
use std::collections::HashSet;

/// Accumulated terms of the same-module double sum: the count of adjacent
/// ordered pairs and the sum of degree products. Both are integer-valued
/// and summed exactly; division by 2m happens once, at the end.
struct PairSums {
    adjacent: f64,
    degree_products: f64,
}

/// Modularity Q of a partition.
///
/// `membership` must classify every vertex into a module; module labels
/// only need to compare equal. Returns [`Error::InvalidPartition`] if some
/// vertex gets no label and [`Error::UndefinedMetric`] if the graph has no
/// edges.
pub fn modularity<N, E, Ty, Ix, M, F>(graph: &Graph<N, E, Ty, Ix>, membership: F) -> Result<f64>
where
    Ty: EdgeType,
    Ix: IndexType,
    M: PartialEq,
    F: Fn(NodeIndex<Ix>) -> Option<M>,
{
    let two_m = double_edge_count(graph)?;
    let labels = classify(graph, &membership)?;
    let sums = same_group_sums(graph, |a, b| labels[a] == labels[b]);
    Ok((sums.adjacent - sums.degree_products / two_m) / two_m)
}

/// The modularity the partition would reach if every same-module pair were
/// connected: only the expected term is subtracted from 2m.
///
/// This is a normalizer for [`scaled_modularity`], not a probability; it is
/// legitimately below 1 for most partitions.
pub fn max_modularity<N, E, Ty, Ix, M, F>(graph: &Graph<N, E, Ty, Ix>, membership: F) -> Result<f64>
where
    Ty: EdgeType,
    Ix: IndexType,
    M: PartialEq,
    F: Fn(NodeIndex<Ix>) -> Option<M>,
{
    let two_m = double_edge_count(graph)?;
    let labels = classify(graph, &membership)?;
    let sums = same_group_sums(graph, |a, b| labels[a] == labels[b]);
    Ok((two_m - sums.degree_products / two_m) / two_m)
}

/// Modularity scaled against the partition's own ceiling,
/// [`modularity`] / [`max_modularity`].
///
/// Returns [`Error::UndefinedMetric`] when the maximum modularity is zero,
/// which includes the partition that puts every vertex into one module: the
/// expected term then consumes all of 2m and the quotient is 0/0.
pub fn scaled_modularity<N, E, Ty, Ix, M, F>(
    graph: &Graph<N, E, Ty, Ix>,
    membership: F,
) -> Result<f64>
where
    Ty: EdgeType,
    Ix: IndexType,
    M: PartialEq,
    F: Fn(NodeIndex<Ix>) -> Option<M>,
{
    let two_m = double_edge_count(graph)?;
    let labels = classify(graph, &membership)?;
    let sums = same_group_sums(graph, |a, b| labels[a] == labels[b]);
    let expected = sums.degree_products / two_m;
    let q_max = (two_m - expected) / two_m;
    if q_max == 0.0 {
        return Err(Error::UndefinedMetric);
    }
    Ok(((sums.adjacent - expected) / two_m) / q_max)
}

/// Contribution of a single module to the modularity: the same double sum
/// restricted to pairs whose vertices both satisfy `in_module`.
///
/// Summing this over every module of a total partition reproduces
/// [`modularity`] for that partition, because the global double sum splits
/// into disjoint per-module double sums.
pub fn module_modularity<N, E, Ty, Ix, P>(graph: &Graph<N, E, Ty, Ix>, in_module: P) -> Result<f64>
where
    Ty: EdgeType,
    Ix: IndexType,
    P: Fn(NodeIndex<Ix>) -> bool,
{
    let two_m = double_edge_count(graph)?;
    let included: Vec<bool> = graph.node_indices().map(in_module).collect();
    let sums = same_group_sums(graph, |a, b| included[a] && included[b]);
    Ok((sums.adjacent - sums.degree_products / two_m) / two_m)
}

/// 2m: total edge-endpoint count, the normalizer of every formula here.
fn double_edge_count<N, E, Ty, Ix>(graph: &Graph<N, E, Ty, Ix>) -> Result<f64>
where
    Ty: EdgeType,
    Ix: IndexType,
{
    match graph.edge_count() {
        0 => Err(Error::UndefinedMetric),
        m => Ok(2.0 * m as f64),
    }
}

/// Classify every vertex once; a vertex without a module is a caller
/// contract violation.
fn classify<N, E, Ty, Ix, M, F>(graph: &Graph<N, E, Ty, Ix>, membership: &F) -> Result<Vec<M>>
where
    Ty: EdgeType,
    Ix: IndexType,
    F: Fn(NodeIndex<Ix>) -> Option<M>,
{
    graph
        .node_indices()
        .map(|v| membership(v).ok_or(Error::InvalidPartition { node: v.index() }))
        .collect()
}

/// Shared double-sum routine: walk all ordered vertex pairs in the same
/// group and accumulate adjacency and degree products. The group test is
/// the only thing the labeling and predicate variants disagree on.
fn same_group_sums<N, E, Ty, Ix, S>(graph: &Graph<N, E, Ty, Ix>, same: S) -> PairSums
where
    Ty: EdgeType,
    Ix: IndexType,
    S: Fn(usize, usize) -> bool,
{
    let n = graph.node_count();
    let degrees = total_degrees(graph);
    let adjacent = adjacency_pairs(graph);

    let mut sums = PairSums {
        adjacent: 0.0,
        degree_products: 0.0,
    };
    for a in 0..n {
        for b in 0..n {
            if !same(a, b) {
                continue;
            }
            if adjacent.contains(&normalized(a, b)) {
                sums.adjacent += 1.0;
            }
            sums.degree_products += degrees[a] * degrees[b];
        }
    }
    sums
}

/// Total degree per vertex: incident edge count for undirected graphs,
/// in-degree plus out-degree for directed ones.
fn total_degrees<N, E, Ty, Ix>(graph: &Graph<N, E, Ty, Ix>) -> Vec<f64>
where
    Ty: EdgeType,
    Ix: IndexType,
{
    let mut degrees = vec![0.0; graph.node_count()];
    for v in graph.node_indices() {
        let mut degree = graph.edges_directed(v, Direction::Outgoing).count();
        if graph.is_directed() {
            degree += graph.edges_directed(v, Direction::Incoming).count();
        }
        degrees[v.index()] = degree as f64;
    }
    degrees
}

/// Direction-agnostic adjacency, one lookup set for the whole pair loop.
fn adjacency_pairs<N, E, Ty, Ix>(graph: &Graph<N, E, Ty, Ix>) -> HashSet<(usize, usize)>
where
    Ty: EdgeType,
    Ix: IndexType,
{
    let mut adjacent = HashSet::with_capacity(graph.edge_count());
    for edge in graph.edge_references() {
        adjacent.insert(normalized(edge.source().index(), edge.target().index()));
    }
    adjacent
}

fn normalized(a: usize, b: usize) -> (usize, usize) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petgraph::graph::Graph;
    use petgraph::{Directed, Undirected};

    const DELTA: f64 = 0.01;

    fn module_of(name: &str) -> &str {
        name.split('.').next().unwrap_or(name)
    }

    /// Two triples of vertices named `c1.v*` and `c2.v*`. `intra` adds the
    /// triangle edges inside each triple; `inter` lists cross links as
    /// (c1 vertex, c2 vertex) position pairs.
    fn two_triples<Ty: EdgeType>(intra: bool, inter: &[(usize, usize)]) -> Graph<&'static str, (), Ty> {
        let mut graph = Graph::<&str, (), Ty>::with_capacity(6, 7);
        let c1 = [
            graph.add_node("c1.v1"),
            graph.add_node("c1.v2"),
            graph.add_node("c1.v3"),
        ];
        let c2 = [
            graph.add_node("c2.v1"),
            graph.add_node("c2.v2"),
            graph.add_node("c2.v3"),
        ];
        if intra {
            for group in [c1, c2] {
                let _ = graph.add_edge(group[0], group[1], ());
                let _ = graph.add_edge(group[1], group[2], ());
                let _ = graph.add_edge(group[2], group[0], ());
            }
        }
        for &(i, j) in inter {
            let _ = graph.add_edge(c1[i], c2[j], ());
        }
        graph
    }

    fn assert_metrics<Ty: EdgeType>(
        graph: &Graph<&'static str, (), Ty>,
        expected_q: f64,
        expected_q_max: f64,
        expected_scaled: f64,
    ) {
        let by_name = |v: NodeIndex| Some(module_of(graph[v]));
        let q = modularity(graph, by_name).unwrap();
        assert!((q - expected_q).abs() < DELTA, "q = {q}");

        let q_max = max_modularity(graph, by_name).unwrap();
        assert!((q_max - expected_q_max).abs() < DELTA, "q_max = {q_max}");

        let scaled = scaled_modularity(graph, by_name).unwrap();
        assert!(
            (scaled - expected_scaled).abs() < DELTA,
            "scaled = {scaled}"
        );
    }

    fn assert_decomposition_law<Ty: EdgeType>(graph: &Graph<&'static str, (), Ty>) {
        let whole = modularity(graph, |v| Some(module_of(graph[v]))).unwrap();
        let part1 = module_modularity(graph, |v| module_of(graph[v]) == "c1").unwrap();
        let part2 = module_modularity(graph, |v| module_of(graph[v]) == "c2").unwrap();
        assert!((whole - (part1 + part2)).abs() < DELTA);
    }

    #[test]
    fn test_bridged_triangles_undirected() {
        // Two triangles joined by a single edge: the canonical scenario,
        // with known values for all three metrics.
        let graph = two_triples::<Undirected>(true, &[(0, 0)]);
        assert_metrics(&graph, 5.0 / 14.0, 0.5, 10.0 / 14.0);
        assert_decomposition_law(&graph);
    }

    #[test]
    fn test_bridged_triangles_directed() {
        // Total degree and either-direction adjacency make the directed
        // reading score identically to the undirected one.
        let graph = two_triples::<Directed>(true, &[(0, 0)]);
        assert_metrics(&graph, 5.0 / 14.0, 0.5, 10.0 / 14.0);
        assert_decomposition_law(&graph);
    }

    #[test]
    fn test_disconnected_triangles_scale_to_one() {
        // Raw Q of two disconnected triangles is only 0.5; scaling against
        // the partition's own ceiling restores 1.
        let undirected = two_triples::<Undirected>(true, &[]);
        let scaled =
            scaled_modularity(&undirected, |v| Some(module_of(undirected[v]))).unwrap();
        assert!((scaled - 1.0).abs() < DELTA);
        assert_decomposition_law(&undirected);

        let directed = two_triples::<Directed>(true, &[]);
        let scaled = scaled_modularity(&directed, |v| Some(module_of(directed[v]))).unwrap();
        assert!((scaled - 1.0).abs() < DELTA);
        assert_decomposition_law(&directed);
    }

    #[test]
    fn test_three_cross_links() {
        let links = [(0, 0), (1, 1), (2, 2)];
        let undirected = two_triples::<Undirected>(true, &links);
        assert_metrics(&undirected, 1.0 / 6.0, 0.5, 1.0 / 3.0);
        assert_decomposition_law(&undirected);

        let directed = two_triples::<Directed>(true, &links);
        assert_metrics(&directed, 1.0 / 6.0, 0.5, 1.0 / 3.0);
        assert_decomposition_law(&directed);
    }

    #[test]
    fn test_only_cross_links() {
        // No intra-module edges at all: modularity goes fully negative.
        let links = [(0, 0), (1, 1), (2, 2)];
        let undirected = two_triples::<Undirected>(false, &links);
        assert_metrics(&undirected, -0.5, 0.5, -1.0);
        assert_decomposition_law(&undirected);

        let directed = two_triples::<Directed>(false, &links);
        assert_metrics(&directed, -0.5, 0.5, -1.0);
        assert_decomposition_law(&directed);
    }

    #[test]
    fn test_single_module_is_undefined() {
        // One label for everything drives the expected term to exactly 2m,
        // so both Q and its ceiling vanish and the quotient is 0/0.
        let graph = two_triples::<Undirected>(true, &[(0, 0)]);

        let q = modularity(&graph, |_| Some("42")).unwrap();
        assert!(q.abs() < DELTA);
        let q_max = max_modularity(&graph, |_| Some("42")).unwrap();
        assert!(q_max.abs() < DELTA);

        let scaled = scaled_modularity(&graph, |_| Some("42"));
        assert_eq!(scaled, Err(Error::UndefinedMetric));
    }

    #[test]
    fn test_edgeless_graph_is_undefined() {
        let mut graph = Graph::<&str, (), Undirected>::with_capacity(2, 0);
        let _ = graph.add_node("c1.v1");
        let _ = graph.add_node("c2.v1");

        let by_name = |v: NodeIndex| Some(module_of(graph[v]));
        assert_eq!(modularity(&graph, by_name), Err(Error::UndefinedMetric));
        assert_eq!(max_modularity(&graph, by_name), Err(Error::UndefinedMetric));
        assert_eq!(scaled_modularity(&graph, by_name), Err(Error::UndefinedMetric));
        assert_eq!(
            module_modularity(&graph, |_| true),
            Err(Error::UndefinedMetric)
        );
    }

    #[test]
    fn test_partial_membership_is_rejected() {
        let graph = two_triples::<Undirected>(true, &[(0, 0)]);
        let hole = graph.node_indices().nth(4).unwrap();

        let partial = |v: NodeIndex| {
            if v == hole {
                None
            } else {
                Some(module_of(graph[v]))
            }
        };
        assert_eq!(
            modularity(&graph, partial),
            Err(Error::InvalidPartition { node: hole.index() })
        );
        assert_eq!(
            scaled_modularity(&graph, partial),
            Err(Error::InvalidPartition { node: hole.index() })
        );
    }

    #[test]
    fn test_deterministic() {
        let graph = two_triples::<Directed>(true, &[(0, 0), (2, 1)]);
        let by_name = |v: NodeIndex| Some(module_of(graph[v]));

        let first = modularity(&graph, by_name).unwrap();
        let second = modularity(&graph, by_name).unwrap();
        assert_eq!(first.to_bits(), second.to_bits());

        let first = scaled_modularity(&graph, by_name).unwrap();
        let second = scaled_modularity(&graph, by_name).unwrap();
        assert_eq!(first.to_bits(), second.to_bits());
    }
}
