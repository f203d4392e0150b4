//! Strongly connected component condensation.
//!
//! Decomposes a graph into its maximal strongly connected components using
//! Tarjan's algorithm, and condenses it into a component graph whose nodes
//! are the components and whose edges are the original edges projected onto
//! component pairs.
//!
//! ## The Algorithm (Tarjan 1972)
//!
//! A single depth-first traversal assigns every vertex a discovery index and
//! a *lowlink*: the smallest discovery index reachable through tree edges
//! plus at most one edge back to a vertex still on the active stack. When a
//! vertex finishes with its lowlink equal to its own discovery index, it is
//! the root of a completed component, and the active stack is popped down to
//! it to collect the members. Complexity is O(|V|+|E|).
//!
//! The traversal here is iterative: each frame carries the vertex and its
//! resumable incident-edge iterator, so decomposing a path graph of a
//! million vertices needs no more call-stack depth than a triangle.
//!
//! For undirected graphs every edge is walked from both endpoints, so the
//! components coincide with the connected components.
//!
//! ## Usage
//!
//! ```rust
//! use petgraph::graph::DiGraph;
//! use cohesion::condense;
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
//! assert_eq!(cond.component_count(), 2);
//! assert!(cond.is_same_component(a, b));
//! assert!(!cond.is_same_component(a, c));
//! ```
//!
//! ## References
//!
//! Tarjan, R. E. (1972). "Depth-first search and linear graph algorithms."
//! SIAM Journal on Computing 1 (2): 146-160.

use petgraph::graph::{DiGraph, EdgeReference, Edges, Graph, IndexType, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::EdgeType;
use std::collections::HashSet;

/// Result of a strongly-connected-component decomposition.
///
/// Holds the membership mapping (vertex to component) and the condensed
/// component graph. Component-graph nodes are weighted with the member list
/// of the component they stand for; the component graph is directed even
/// when the decomposed graph was undirected.
#[derive(Debug, Clone)]
pub struct Condensation<Ix: IndexType> {
    graph: DiGraph<Vec<NodeIndex<Ix>>, (), Ix>,
    membership: Vec<NodeIndex<Ix>>,
}

impl<Ix: IndexType> Condensation<Ix> {
    /// The condensed component graph.
    ///
    /// Nodes are components (weights are their member lists). Edges are the
    /// filtered original edges whose endpoints fell into different
    /// components, deduplicated to at most one per ordered component pair;
    /// projections landing inside one component are dropped, so the
    /// component graph never contains self-loops.
    pub fn graph(&self) -> &DiGraph<Vec<NodeIndex<Ix>>, (), Ix> {
        &self.graph
    }

    /// Component containing `v`, as a node of the component graph.
    ///
    /// # Panics
    ///
    /// Panics if `v` is not a vertex of the decomposed graph.
    pub fn component_of(&self, v: NodeIndex<Ix>) -> NodeIndex<Ix> {
        self.membership[v.index()]
    }

    /// Member vertices of a component.
    pub fn members(&self, component: NodeIndex<Ix>) -> &[NodeIndex<Ix>] {
        &self.graph[component]
    }

    /// Number of components.
    pub fn component_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Whether two vertices ended up in the same component, i.e. are
    /// mutually reachable through the filtered edges.
    pub fn is_same_component(&self, a: NodeIndex<Ix>, b: NodeIndex<Ix>) -> bool {
        self.membership[a.index()] == self.membership[b.index()]
    }

    /// Component labels in the shape community detectors use: position `i`
    /// holds the component id of the vertex with index `i`.
    ///
    /// Handy for feeding a condensation into the modularity metrics as a
    /// membership function.
    pub fn labels(&self) -> Vec<usize> {
        self.membership.iter().map(|c| c.index()).collect()
    }

    /// Consume the condensation and return just the component member lists.
    pub fn into_components(self) -> Vec<Vec<NodeIndex<Ix>>> {
        let (nodes, _) = self.graph.into_nodes_edges();
        nodes.into_iter().map(|n| n.weight).collect()
    }
}

/// One suspended depth-first visit: the vertex and the incident edges not
/// yet walked.
struct Frame<'g, E, Ty: EdgeType, Ix: IndexType> {
    vertex: NodeIndex<Ix>,
    edges: Edges<'g, E, Ty, Ix>,
}

/// Per-run traversal bookkeeping. Built fresh inside every `condense*`
/// call, never shared.
struct Traversal<Ix: IndexType> {
    next_index: usize,
    discovery: Vec<Option<usize>>,
    lowlink: Vec<usize>,
    active: Vec<NodeIndex<Ix>>,
    on_stack: Vec<bool>,
}

impl<Ix: IndexType> Traversal<Ix> {
    fn new(node_count: usize) -> Self {
        Self {
            next_index: 0,
            discovery: vec![None; node_count],
            lowlink: vec![0; node_count],
            active: Vec::new(),
            on_stack: vec![false; node_count],
        }
    }

    /// Assign the next discovery index to `v` and mark it active.
    fn open(&mut self, v: NodeIndex<Ix>) {
        self.discovery[v.index()] = Some(self.next_index);
        self.lowlink[v.index()] = self.next_index;
        self.next_index += 1;
        self.on_stack[v.index()] = true;
        self.active.push(v);
    }
}

/// Decompose `graph` into strongly connected components, with every edge
/// participating in connectivity.
pub fn condense<N, E, Ty, Ix>(graph: &Graph<N, E, Ty, Ix>) -> Condensation<Ix>
where
    Ty: EdgeType,
    Ix: IndexType,
{
    condense_filtered(graph, |_| true)
}

/// Decompose `graph` into strongly connected components, counting only
/// edges accepted by `edge_filter` toward connectivity and toward the
/// component graph.
///
/// Total over any finite graph: an empty graph yields an empty membership
/// and an empty component graph.
pub fn condense_filtered<'g, N, E, Ty, Ix, F>(
    graph: &'g Graph<N, E, Ty, Ix>,
    mut edge_filter: F,
) -> Condensation<Ix>
where
    Ty: EdgeType,
    Ix: IndexType,
    F: FnMut(EdgeReference<'g, E, Ix>) -> bool,
{
    let mut state = Traversal::new(graph.node_count());
    let mut condensed = DiGraph::<Vec<NodeIndex<Ix>>, (), Ix>::with_capacity(0, 0);
    let mut membership = vec![NodeIndex::end(); graph.node_count()];
    let mut frames: Vec<Frame<'g, E, Ty, Ix>> = Vec::new();

    // The graph may be disconnected: every unvisited vertex starts a root.
    for root in graph.node_indices() {
        if state.discovery[root.index()].is_some() {
            continue;
        }
        state.open(root);
        frames.push(Frame {
            vertex: root,
            edges: graph.edges(root),
        });

        loop {
            let (v, step) = match frames.last_mut() {
                Some(frame) => (frame.vertex, frame.edges.next()),
                None => break,
            };

            match step {
                Some(edge) => {
                    if !edge_filter(edge) {
                        continue;
                    }
                    // Orient the edge away from v; for undirected graphs the
                    // stored endpoint order is not significant.
                    let next = if edge.source() == v {
                        edge.target()
                    } else {
                        edge.source()
                    };
                    match state.discovery[next.index()] {
                        None => {
                            state.open(next);
                            frames.push(Frame {
                                vertex: next,
                                edges: graph.edges(next),
                            });
                        }
                        // An edge back to a still-active vertex tightens
                        // v's lowlink; edges into finished components are
                        // ignored.
                        Some(d) if state.on_stack[next.index()] => {
                            if d < state.lowlink[v.index()] {
                                state.lowlink[v.index()] = d;
                            }
                        }
                        Some(_) => {}
                    }
                }
                None => {
                    frames.pop();
                    if state.discovery[v.index()] == Some(state.lowlink[v.index()]) {
                        // v roots a finished component: pop the active stack
                        // down to and including v.
                        let mut members = Vec::new();
                        while let Some(w) = state.active.pop() {
                            state.on_stack[w.index()] = false;
                            members.push(w);
                            if w == v {
                                break;
                            }
                        }
                        let component = condensed.add_node(members);
                        for &w in &condensed[component] {
                            membership[w.index()] = component;
                        }
                    }
                    if let Some(parent) = frames.last() {
                        let p = parent.vertex.index();
                        if state.lowlink[v.index()] < state.lowlink[p] {
                            state.lowlink[p] = state.lowlink[v.index()];
                        }
                    }
                }
            }
        }
    }

    // Project the filtered edges onto component pairs. Self-loops are
    // dropped and parallel projections collapse to one edge.
    let mut projected = HashSet::new();
    for edge in graph.edge_references() {
        if !edge_filter(edge) {
            continue;
        }
        let source = membership[edge.source().index()];
        let target = membership[edge.target().index()];
        if source != target && projected.insert((source, target)) {
            condensed.add_edge(source, target, ());
        }
    }

    Condensation {
        graph: condensed,
        membership,
    }
}

/// Clusterer-style convenience: just the strongly connected component sets,
/// every edge participating.
pub fn strongly_connected_components<N, E, Ty, Ix>(
    graph: &Graph<N, E, Ty, Ix>,
) -> Vec<Vec<NodeIndex<Ix>>>
where
    Ty: EdgeType,
    Ix: IndexType,
{
    condense(graph).into_components()
}
