//! Integration tests for the structural graph export.

use std::collections::HashSet;

use seine_language::{Pattern, Rule, Ruleset, all, bind, lit, none, wildcard};
use seine_rete::{GraphNodeKind, NetworkGraph, build};

fn sample_graph() -> NetworkGraph {
    let rules = Ruleset::new()
        .with(Rule::new(
            "paired",
            all([
                Pattern::new().with("left", bind("id", wildcard())).into(),
                Pattern::new().with("right", bind("id", wildcard())).into(),
            ]),
        ))
        .unwrap()
        .with(Rule::new("quiet", none(Pattern::new().with("alarm", wildcard()))))
        .unwrap()
        .with(Rule::new("people", Pattern::new().with("kind", lit("person"))))
        .unwrap();
    build(&rules).unwrap().graph()
}

// =============================================================================
// Coverage
// =============================================================================

#[test]
fn export_covers_every_node_kind() {
    let graph = sample_graph();
    let kinds: HashSet<GraphNodeKind> = graph.nodes.iter().map(|n| n.kind).collect();
    for kind in [
        GraphNodeKind::Root,
        GraphNodeKind::Test,
        GraphNodeKind::Join,
        GraphNodeKind::Negation,
        GraphNodeKind::Terminal,
    ] {
        assert!(kinds.contains(&kind), "missing {kind:?}");
    }

    let root = graph.nodes.last().unwrap();
    assert_eq!(root.kind, GraphNodeKind::Root);
    assert_eq!(root.label, "root");
}

#[test]
fn terminals_carry_rule_names_and_sink_edges() {
    let graph = sample_graph();
    let terminal_ids: HashSet<usize> = graph
        .nodes
        .iter()
        .filter(|n| n.kind == GraphNodeKind::Terminal)
        .map(|n| n.id)
        .collect();
    let labels: HashSet<&str> = graph
        .nodes
        .iter()
        .filter(|n| n.kind == GraphNodeKind::Terminal)
        .map(|n| n.label.as_str())
        .collect();
    assert_eq!(labels, HashSet::from(["paired", "quiet", "people"]));

    // Terminals only receive.
    assert!(graph.edges.iter().all(|e| !terminal_ids.contains(&e.from)));
    for id in terminal_ids {
        assert!(graph.edges.iter().any(|e| e.to == id));
    }
}

#[test]
fn edges_stay_inside_the_exported_nodes() {
    let graph = sample_graph();
    let count = graph.nodes.len();
    let root_id = graph.nodes.last().unwrap().id;
    for edge in &graph.edges {
        assert!(edge.from < count && edge.to < count);
        if edge.from == root_id {
            assert_eq!(graph.nodes[edge.to].kind, GraphNodeKind::Test);
        }
    }
}

#[test]
fn two_input_nodes_receive_one_edge_per_port() {
    let graph = sample_graph();
    for node in &graph.nodes {
        if matches!(node.kind, GraphNodeKind::Join | GraphNodeKind::Negation) {
            let ports: Vec<&str> = graph
                .edges
                .iter()
                .filter(|e| e.to == node.id)
                .map(|e| e.port.as_str())
                .collect();
            assert_eq!(ports.len(), 2);
            assert!(ports.contains(&"left"));
            assert!(ports.contains(&"right"));
        }
    }
}

// =============================================================================
// Dot rendering
// =============================================================================

#[test]
fn dot_renders_shapes_ports_and_labels() {
    let dot = sample_graph().to_dot();
    assert!(dot.starts_with("digraph network {"));
    assert!(dot.ends_with("}\n"));
    assert!(dot.contains("shape=ellipse, label=\"bindings\""));
    assert!(dot.contains("shape=diamond, label=\"not\""));
    assert!(dot.contains("shape=doubleoctagon, label=\"paired\""));
    assert!(dot.contains("[label=\"left\"]"));
    assert!(dot.contains("[label=\"right\"]"));
    assert!(dot.contains("kind: =\\\"person\\\""));
}
