//! Structural export of a compiled network, for inspection and tooling.

use std::fmt::Write as _;

use crate::network::{Network, NodeKind};

/// The role of an exported node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GraphNodeKind {
    /// The dispatcher every fact change enters through.
    Root,
    /// A single-fact test.
    Test,
    /// A two-input join.
    Join,
    /// A two-input absence gate.
    Negation,
    /// A per-rule activation sink.
    Terminal,
}

/// One node of the exported structure.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphNode {
    /// The node's id; the root uses the highest id.
    pub id: usize,
    /// The node's role.
    pub kind: GraphNodeKind,
    /// A human-readable label: the check, or the rule name.
    pub label: String,
}

/// One edge of the exported structure.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphEdge {
    /// The parent node id.
    pub from: usize,
    /// The child node id.
    pub to: usize,
    /// Which input of the child the edge feeds.
    pub port: String,
}

/// A network's shape, decoupled from its memories.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NetworkGraph {
    /// Every node, the synthetic root last.
    pub nodes: Vec<GraphNode>,
    /// Every edge, root edges included.
    pub edges: Vec<GraphEdge>,
}

impl NetworkGraph {
    /// Renders the graph in Graphviz dot format.
    #[must_use]
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph network {\n  rankdir=TB;\n");
        for node in &self.nodes {
            let shape = match node.kind {
                GraphNodeKind::Root => "point",
                GraphNodeKind::Test => "box",
                GraphNodeKind::Join => "ellipse",
                GraphNodeKind::Negation => "diamond",
                GraphNodeKind::Terminal => "doubleoctagon",
            };
            let label = node.label.replace('"', "\\\"");
            let _ = writeln!(
                out,
                "  n{} [shape={shape}, label=\"{label}\"];",
                node.id
            );
        }
        for edge in &self.edges {
            if edge.port == "single" {
                let _ = writeln!(out, "  n{} -> n{};", edge.from, edge.to);
            } else {
                let _ = writeln!(
                    out,
                    "  n{} -> n{} [label=\"{}\"];",
                    edge.from, edge.to, edge.port
                );
            }
        }
        out.push_str("}\n");
        out
    }
}

impl Network {
    /// Exports the network's structure.
    #[must_use]
    pub fn graph(&self) -> NetworkGraph {
        let root_id = self.node_count();
        let mut nodes = Vec::with_capacity(root_id + 1);
        let mut edges = Vec::new();
        for id in 0..self.node_count() {
            let node_id = crate::network::NodeId::from_index(id);
            let (kind, label) = match self.kind(node_id) {
                NodeKind::Test(test) => (
                    GraphNodeKind::Test,
                    self.registry().get(test.check).to_string(),
                ),
                NodeKind::Join(join) => (GraphNodeKind::Join, join.test.label().to_string()),
                NodeKind::Negation(_) => (GraphNodeKind::Negation, "not".to_string()),
                NodeKind::Terminal(terminal) => {
                    (GraphNodeKind::Terminal, terminal.rule.to_string())
                }
            };
            nodes.push(GraphNode { id, kind, label });
            for (child, port) in self.children(node_id) {
                edges.push(GraphEdge {
                    from: id,
                    to: child.index(),
                    port: port.to_string(),
                });
            }
        }
        nodes.push(GraphNode {
            id: root_id,
            kind: GraphNodeKind::Root,
            label: "root".to_string(),
        });
        for (child, port) in self.root_edges() {
            edges.push(GraphEdge {
                from: root_id,
                to: child.index(),
                port: port.to_string(),
            });
        }
        NetworkGraph { nodes, edges }
    }
}
