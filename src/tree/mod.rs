//! Fibonacci call tree
//!
//! Builds the call graph of naive recursive Fibonacci, redundant calls
//! included, so the exponential blow-up is visible. Nodes are registered in
//! pre-order (the `n - 1` call before the `n - 2` call), which fixes both the
//! occurrence counters in node ids and the petgraph node indices.

mod export;
mod render;

pub use export::{to_dot, to_json, to_text, TreeFormat};
pub use render::{draw_fib_tree, DrawOptions};

use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use std::collections::HashMap;

/// One invocation of `fib(value)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallNode {
    pub value: u32,
    /// How many earlier calls had the same argument
    pub occurrence: usize,
    pub depth: usize,
}

impl CallNode {
    /// Unique id, e.g. `fib(3)_1` for the second call with argument 3
    pub fn id(&self) -> String {
        format!("fib({})_{}", self.value, self.occurrence)
    }

    pub fn label(&self) -> String {
        format!("fib({})", self.value)
    }

    pub fn is_leaf(&self) -> bool {
        self.value <= 1
    }

    /// Repeated calls are the work memoization would save
    pub fn is_recomputation(&self) -> bool {
        self.occurrence > 0
    }
}

/// Largest argument drawn; `fib(25)` already makes 242785 calls
pub const MAX_TREE_N: u32 = 25;

/// Directed call tree rooted at `fib(n)`
#[derive(Debug, Clone)]
pub struct CallTree {
    n: u32,
    graph: DiGraph<CallNode, ()>,
    root: NodeIndex,
}

impl CallTree {
    pub fn n(&self) -> u32 {
        self.n
    }

    pub fn root(&self) -> NodeIndex {
        self.root
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn node(&self, index: NodeIndex) -> &CallNode {
        &self.graph[index]
    }

    /// Nodes in pre-order
    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &CallNode)> {
        self.graph
            .node_indices()
            .map(move |index| (index, &self.graph[index]))
    }

    /// Children in call order (`n - 1` first)
    pub fn children(&self, index: NodeIndex) -> Vec<NodeIndex> {
        // petgraph yields neighbors newest edge first
        let mut children: Vec<NodeIndex> = self.graph.neighbors(index).collect();
        children.sort();
        children
    }

    /// Parent/child pairs in pre-order of the child
    pub fn edges(&self) -> Vec<(NodeIndex, NodeIndex)> {
        let mut edges: Vec<(NodeIndex, NodeIndex)> = self
            .graph
            .edge_indices()
            .filter_map(|edge| self.graph.edge_endpoints(edge))
            .collect();
        edges.sort_by_key(|(_, child)| *child);
        edges
    }

    pub fn max_depth(&self) -> usize {
        self.graph
            .node_weights()
            .map(|node| node.depth)
            .max()
            .unwrap_or(0)
    }
}

/// Build the call tree of the naive `fib(n)`.
///
/// Argument values are unsigned, so the recursion always bottoms out at the
/// `n <= 1` leaves. The tree has `2 * fib(n + 1) - 1` nodes.
pub fn build_fib_tree(n: u32) -> CallTree {
    let mut graph = DiGraph::new();
    let mut counter: HashMap<u32, usize> = HashMap::new();
    let root = visit(&mut graph, &mut counter, n, 0, None);
    tracing::debug!(n, nodes = graph.node_count(), "Built Fibonacci call tree");
    CallTree { n, graph, root }
}

fn visit(
    graph: &mut DiGraph<CallNode, ()>,
    counter: &mut HashMap<u32, usize>,
    value: u32,
    depth: usize,
    parent: Option<NodeIndex>,
) -> NodeIndex {
    let occurrence = counter.entry(value).or_insert(0);
    let node = CallNode {
        value,
        occurrence: *occurrence,
        depth,
    };
    *occurrence += 1;

    let index = graph.add_node(node);
    if let Some(parent) = parent {
        graph.add_edge(parent, index, ());
    }

    if value > 1 {
        visit(graph, counter, value - 1, depth + 1, Some(index));
        visit(graph, counter, value - 2, depth + 1, Some(index));
    }
    index
}

/// Iterative Fibonacci, saturating at `u64::MAX`
pub fn fib(n: u32) -> u64 {
    let (mut a, mut b) = (0u64, 1u64);
    for _ in 0..n {
        let next = a.saturating_add(b);
        a = b;
        b = next;
    }
    a
}

/// Number of calls the naive recursion makes for `fib(n)`
pub fn call_count(n: u32) -> u64 {
    fib(n.saturating_add(1)).saturating_mul(2) - 1
}
