//! Call tree exporters: Graphviz DOT, indented text and JSON

use super::{CallNode, CallTree};
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output format for `fib-tree`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TreeFormat {
    Dot,
    Text,
    Json,
    Png,
    Svg,
}

impl TreeFormat {
    /// Formats that need the Graphviz renderer
    pub fn is_image(&self) -> bool {
        matches!(self, TreeFormat::Png | TreeFormat::Svg)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            TreeFormat::Dot => "dot",
            TreeFormat::Text => "txt",
            TreeFormat::Json => "json",
            TreeFormat::Png => "png",
            TreeFormat::Svg => "svg",
        }
    }
}

impl fmt::Display for TreeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TreeFormat::Dot => "dot",
            TreeFormat::Text => "text",
            TreeFormat::Json => "json",
            TreeFormat::Png => "png",
            TreeFormat::Svg => "svg",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for TreeFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dot" | "gv" => Ok(TreeFormat::Dot),
            "text" | "txt" => Ok(TreeFormat::Text),
            "json" => Ok(TreeFormat::Json),
            "png" => Ok(TreeFormat::Png),
            "svg" => Ok(TreeFormat::Svg),
            other => Err(format!(
                "unknown tree format '{}' (expected dot, text, json, png or svg)",
                other
            )),
        }
    }
}

/// Convert a call tree to a DOT digraph named `FibonacciTree`
pub fn to_dot(tree: &CallTree, rankdir: &str) -> String {
    let mut lines = Vec::new();

    lines.push("digraph FibonacciTree {".to_string());
    lines.push(format!("    rankdir={};", rankdir));
    lines.push("    node [fontname=\"Helvetica\", fontsize=12];".to_string());
    lines.push("".to_string());

    for (_, node) in tree.nodes() {
        let (shape, style, fill) = node_style(node);
        lines.push(format!(
            "    \"{}\" [label=\"{}\", shape={}, style=\"{}\", fillcolor=\"{}\"];",
            escape_label(&node.id()),
            escape_label(&node.label()),
            shape,
            style,
            fill
        ));
    }

    lines.push("".to_string());

    for (parent, child) in tree.edges() {
        lines.push(format!(
            "    \"{}\" -> \"{}\";",
            escape_label(&tree.node(parent).id()),
            escape_label(&tree.node(child).id())
        ));
    }

    lines.push("}".to_string());
    lines.join("\n")
}

fn node_style(node: &CallNode) -> (&'static str, &'static str, &'static str) {
    match (node.is_leaf(), node.is_recomputation()) {
        (true, false) => ("box", "filled,rounded", "#a6e3a1"),
        (true, true) => ("box", "filled,rounded,dashed", "#d9f2d4"),
        (false, false) => ("ellipse", "filled", "#89b4fa"),
        (false, true) => ("ellipse", "filled,dashed", "#f9e2af"),
    }
}

fn escape_label(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Render the tree as indented text with box-drawing connectors
pub fn to_text(tree: &CallTree) -> String {
    let mut lines = vec![tree.node(tree.root()).label()];
    write_children(tree, tree.root(), "", &mut lines);
    lines.join("\n")
}

fn write_children(tree: &CallTree, index: NodeIndex, prefix: &str, lines: &mut Vec<String>) {
    let children = tree.children(index);
    let last = children.len().saturating_sub(1);
    for (i, child) in children.into_iter().enumerate() {
        let (branch, extension) = if i == last {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        lines.push(format!("{}{}{}", prefix, branch, tree.node(child).label()));
        write_children(tree, child, &format!("{}{}", prefix, extension), lines);
    }
}

#[derive(Serialize)]
struct JsonNode<'a> {
    id: String,
    label: String,
    #[serde(flatten)]
    node: &'a CallNode,
}

#[derive(Serialize)]
struct JsonEdge {
    from: String,
    to: String,
}

#[derive(Serialize)]
struct JsonTree<'a> {
    n: u32,
    root: String,
    nodes: Vec<JsonNode<'a>>,
    edges: Vec<JsonEdge>,
}

/// Serialize nodes and edges as pretty JSON
pub fn to_json(tree: &CallTree) -> serde_json::Result<String> {
    let nodes = tree
        .nodes()
        .map(|(_, node)| JsonNode {
            id: node.id(),
            label: node.label(),
            node,
        })
        .collect();
    let edges = tree
        .edges()
        .into_iter()
        .map(|(parent, child)| JsonEdge {
            from: tree.node(parent).id(),
            to: tree.node(child).id(),
        })
        .collect();

    serde_json::to_string_pretty(&JsonTree {
        n: tree.n(),
        root: tree.node(tree.root()).id(),
        nodes,
        edges,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::build_fib_tree;

    #[test]
    fn test_to_dot() {
        let dot = to_dot(&build_fib_tree(3), "TB");
        assert!(dot.starts_with("digraph FibonacciTree {"));
        assert!(dot.contains("rankdir=TB"));
        assert!(dot.contains("\"fib(3)_0\" [label=\"fib(3)\""));
        assert!(dot.contains("\"fib(2)_0\" -> \"fib(1)_0\";"));
        assert!(dot.contains("\"fib(3)_0\" -> \"fib(1)_1\";"));
        assert_eq!(dot.matches("->").count(), 4);
        assert!(dot.ends_with('}'));
    }

    #[test]
    fn recomputed_calls_are_dashed() {
        let dot = to_dot(&build_fib_tree(3), "LR");
        let repeated = dot
            .lines()
            .find(|line| line.contains("\"fib(1)_1\" ["))
            .unwrap();
        assert!(repeated.contains("dashed"));
        assert!(dot.contains("rankdir=LR"));
    }

    #[test]
    fn text_tree_layout() {
        let text = to_text(&build_fib_tree(3));
        let expected = "fib(3)\n├── fib(2)\n│   ├── fib(1)\n│   └── fib(0)\n└── fib(1)";
        assert_eq!(text, expected);
    }

    #[test]
    fn json_lists_nodes_and_edges() {
        let json = to_json(&build_fib_tree(2)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["n"], 2);
        assert_eq!(value["root"], "fib(2)_0");
        assert_eq!(value["nodes"].as_array().unwrap().len(), 3);
        assert_eq!(value["nodes"][1]["value"], 1);
        assert_eq!(value["nodes"][1]["depth"], 1);
        assert_eq!(value["edges"][1]["to"], "fib(0)_0");
    }

    #[test]
    fn format_parsing() {
        assert_eq!("SVG".parse::<TreeFormat>().unwrap(), TreeFormat::Svg);
        assert_eq!("txt".parse::<TreeFormat>().unwrap(), TreeFormat::Text);
        assert!("pdf".parse::<TreeFormat>().is_err());
        assert!(TreeFormat::Png.is_image());
        assert!(!TreeFormat::Json.is_image());
    }
}
