//! The compiled match network: an arena of nodes joined by port edges.

use std::fmt;

use seine_foundation::{Fact, Name};

use crate::activation::{Activation, ActivationDelta};
use crate::check::{CheckId, CheckRegistry};
use crate::node::{JoinNode, JoinTest, NegationNode, TerminalNode, TestNode};
use crate::token::{Context, FactSet, Token};

/// A handle to a node in the network's arena.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// The raw arena index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// Which input of the target node an edge feeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Port {
    /// The only input of a test or terminal node.
    Single,
    /// The left input of a join or negation node.
    Left,
    /// The right input of a join or negation node.
    Right,
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Port::Single => write!(f, "single"),
            Port::Left => write!(f, "left"),
            Port::Right => write!(f, "right"),
        }
    }
}

/// A parent-to-child connection carrying tokens into a specific port.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Edge {
    pub(crate) child: NodeId,
    pub(crate) port: Port,
}

/// Every kind of node the network can hold.
#[derive(Debug)]
pub(crate) enum NodeKind {
    Test(TestNode),
    Join(JoinNode),
    Negation(NegationNode),
    Terminal(TerminalNode),
}

#[derive(Debug)]
struct NetNode {
    kind: NodeKind,
    children: Vec<Edge>,
}

/// The compiled network.
///
/// Built once per ruleset; afterwards only node memories change. Facts
/// enter at the root dispatcher, flow down the shared test chains, get
/// combined by joins and negations, and settle into per-rule terminals.
/// The graph itself is append-only during the build and never revisited,
/// so it cannot form cycles.
pub struct Network {
    nodes: Vec<NetNode>,
    roots: Vec<Edge>,
    terminals: Vec<NodeId>,
    registry: CheckRegistry,
}

impl Network {
    pub(crate) fn new() -> Self {
        Self {
            nodes: Vec::new(),
            roots: Vec::new(),
            terminals: Vec::new(),
            registry: CheckRegistry::new(),
        }
    }

    // ========================================================================
    // Build surface
    // ========================================================================

    pub(crate) fn registry_mut(&mut self) -> &mut CheckRegistry {
        &mut self.registry
    }

    pub(crate) fn add_test(&mut self, check: CheckId) -> NodeId {
        self.push(NodeKind::Test(TestNode { check }))
    }

    pub(crate) fn add_join(&mut self) -> NodeId {
        self.push(NodeKind::Join(JoinNode::new(JoinTest::bindings())))
    }

    pub(crate) fn add_negation(&mut self) -> NodeId {
        self.push(NodeKind::Negation(NegationNode::new()))
    }

    pub(crate) fn add_terminal(&mut self, rule: Name, salience: i64) -> NodeId {
        let id = self.push(NodeKind::Terminal(TerminalNode::new(rule, salience)));
        self.terminals.push(id);
        id
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NetNode {
            kind,
            children: Vec::new(),
        });
        id
    }

    /// Wires `child`'s port under `parent`, or under the root dispatcher
    /// when `parent` is `None`.
    pub(crate) fn connect(&mut self, parent: Option<NodeId>, child: NodeId, port: Port) {
        let edge = Edge { child, port };
        match parent {
            Some(parent) => self.nodes[parent.index()].children.push(edge),
            None => self.roots.push(edge),
        }
    }

    /// Finds an existing test child holding `check` under `parent`, for
    /// prefix sharing during the build.
    pub(crate) fn test_child(&self, parent: Option<NodeId>, check: CheckId) -> Option<NodeId> {
        let edges = match parent {
            Some(parent) => &self.nodes[parent.index()].children,
            None => &self.roots,
        };
        edges.iter().map(|edge| edge.child).find(|&child| {
            matches!(
                &self.nodes[child.index()].kind,
                NodeKind::Test(test) if test.check == check
            )
        })
    }

    pub(crate) fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    pub(crate) fn children(&self, id: NodeId) -> impl Iterator<Item = (NodeId, Port)> + '_ {
        self.nodes[id.index()]
            .children
            .iter()
            .map(|edge| (edge.child, edge.port))
    }

    pub(crate) fn root_edges(&self) -> impl Iterator<Item = (NodeId, Port)> + '_ {
        self.roots.iter().map(|edge| (edge.child, edge.port))
    }

    pub(crate) fn registry(&self) -> &CheckRegistry {
        &self.registry
    }

    // ========================================================================
    // Propagation
    // ========================================================================

    /// Applies a batch of fact changes and returns the activation deltas.
    ///
    /// Additions propagate first, then removals; each change runs to
    /// completion before the next starts. Deltas are collected from the
    /// terminals only after the whole batch has propagated, in terminal
    /// creation order and, per terminal, in arrival order.
    pub fn apply(&mut self, additions: &[Fact], removals: &[Fact]) -> Vec<ActivationDelta> {
        for fact in additions {
            self.dispatch(&Token::valid(
                FactSet::singleton(fact.clone()),
                Context::new(),
            ));
        }
        for fact in removals {
            self.dispatch(&Token::invalid(
                FactSet::singleton(fact.clone()),
                Context::new(),
            ));
        }
        self.drain()
    }

    fn dispatch(&mut self, token: &Token) {
        let roots = self.roots.clone();
        for edge in roots {
            self.deliver(edge.child, edge.port, token);
        }
    }

    fn deliver(&mut self, id: NodeId, port: Port, token: &Token) {
        let outputs: Vec<Token> = {
            let node = &mut self.nodes[id.index()];
            match (&mut node.kind, port) {
                (NodeKind::Test(test), Port::Single) => {
                    let check = self.registry.get(test.check);
                    test.deliver(token, check).into_iter().collect()
                }
                (NodeKind::Join(join), Port::Left) => join.deliver_left(token),
                (NodeKind::Join(join), Port::Right) => join.deliver_right(token),
                (NodeKind::Negation(negation), Port::Left) => negation.deliver_left(token),
                (NodeKind::Negation(negation), Port::Right) => negation.deliver_right(token),
                (NodeKind::Terminal(terminal), Port::Single) => {
                    terminal.deliver(token);
                    Vec::new()
                }
                // The builder wires ports to matching node kinds; other
                // combinations cannot be constructed.
                _ => Vec::new(),
            }
        };
        if outputs.is_empty() {
            return;
        }
        let children = self.nodes[id.index()].children.clone();
        for output in &outputs {
            for edge in &children {
                self.deliver(edge.child, edge.port, output);
            }
        }
    }

    fn drain(&mut self) -> Vec<ActivationDelta> {
        let mut deltas = Vec::new();
        let terminals = self.terminals.clone();
        for id in terminals {
            if let NodeKind::Terminal(terminal) = &mut self.nodes[id.index()].kind {
                deltas.append(&mut terminal.take_pending());
            }
        }
        deltas
    }

    // ========================================================================
    // Views
    // ========================================================================

    /// Every currently satisfied match, across all rules.
    #[must_use]
    pub fn activations(&self) -> Vec<Activation> {
        let mut all = Vec::new();
        for &id in &self.terminals {
            if let NodeKind::Terminal(terminal) = &self.nodes[id.index()].kind {
                all.extend(terminal.activations());
            }
        }
        all
    }

    /// The number of nodes in the network.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The number of distinct checks compiled into the network.
    #[must_use]
    pub fn check_count(&self) -> usize {
        self.registry.len()
    }

    /// Clears every node memory, forgetting all matches.
    ///
    /// The graph structure is untouched; the network behaves as if no
    /// fact had ever been applied.
    pub fn reset(&mut self) {
        for node in &mut self.nodes {
            match &mut node.kind {
                NodeKind::Test(_) => {}
                NodeKind::Join(join) => {
                    join.left.clear();
                    join.right.clear();
                }
                NodeKind::Negation(negation) => {
                    negation.outer.clear();
                    negation.monitored.clear();
                }
                NodeKind::Terminal(terminal) => {
                    terminal.memory.clear();
                    terminal.pending.clear();
                }
            }
        }
    }
}

impl fmt::Debug for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Network")
            .field("nodes", &self.nodes.len())
            .field("terminals", &self.terminals.len())
            .field("checks", &self.registry.len())
            .finish()
    }
}
