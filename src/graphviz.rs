//! Presentational node/edge view of a tree, renderable as Graphviz DOT with
//! record-shaped nodes. One port per child slot, so edges attach between the
//! keys they separate.

use std::fmt::{Display, Write};

use serde::Serialize;

use crate::btree_base::{btree::BTree, node::Node};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub keys: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub from: String,
    /// Child slot in `from` the edge leaves from.
    pub port: usize,
    pub to: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GraphView {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl GraphView {
    /// Nodes are numbered in pre-order starting at `node0` for the root.
    pub fn build<K: Display>(root: &Node<K>) -> Self {
        let mut view = GraphView::default();
        view.walk(root);
        view
    }

    fn walk<K: Display>(&mut self, node: &Node<K>) -> String {
        let id = format!("node{}", self.nodes.len());
        self.nodes.push(GraphNode {
            id: id.clone(),
            keys: node.keys().iter().map(ToString::to_string).collect(),
        });

        for (port, child) in node.children().iter().enumerate() {
            let child_id = self.walk(child);
            self.edges.push(GraphEdge {
                from: id.clone(),
                port,
                to: child_id,
            });
        }
        id
    }

    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph g {\nnode [shape = record,height=.1];\n");
        for node in &self.nodes {
            let _ = write!(out, "{}[label = \"", node.id);
            for (i, key) in node.keys.iter().enumerate() {
                let _ = write!(out, "<f{}> |{}|", i, escape_record(key));
            }
            let _ = writeln!(out, "<f{}>\"];", node.keys.len());
        }
        for edge in &self.edges {
            let _ = writeln!(out, "\"{}\":f{} -> \"{}\"", edge.from, edge.port, edge.to);
        }
        out.push('}');
        out
    }
}

/// Escape characters that carry meaning inside a record label.
fn escape_record(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    for c in label.chars() {
        if matches!(c, '"' | '\\' | '|' | '{' | '}' | '<' | '>') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

impl<K: Display, C> BTree<K, C> {
    pub fn graph_view(&self) -> GraphView {
        GraphView::build(self.root())
    }

    pub fn to_dot(&self) -> String {
        self.graph_view().to_dot()
    }
}
