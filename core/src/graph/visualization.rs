//! Graph visualization utilities.
//!
//! Export a compiled graph's structure to Graphviz DOT format, or a plain
//! text summary, for debugging.

use std::fmt::Write;

use super::compiled::CompiledStateGraph;
use super::state_graph::{END, START};

/// Generates a Graphviz DOT representation of the graph.
pub fn generate_dot<S>(graph: &CompiledStateGraph<S>) -> String
where
    S: std::fmt::Debug,
{
    let mut dot = String::from("digraph {\n");
    dot.push_str("  rankdir=LR;\n");
    dot.push_str("  node [shape=box];\n\n");

    dot.push_str(&format!(
        "  \"{}\" [label=\"START\", style=bold, fillcolor=lightgreen];\n",
        START
    ));
    dot.push_str(&format!(
        "  \"{}\" [label=\"END\", style=bold, fillcolor=lightcoral];\n",
        END
    ));

    for node_id in graph.nodes.keys() {
        dot.push_str(&format!("  \"{}\";\n", node_id));
    }

    dot.push('\n');

    if !graph.edge_order.is_empty() {
        dot.push_str(&format!("  \"{}\" -> \"{}\";\n", START, graph.edge_order[0]));

        for i in 1..graph.edge_order.len() {
            dot.push_str(&format!(
                "  \"{}\" -> \"{}\";\n",
                graph.edge_order[i - 1],
                graph.edge_order[i]
            ));
        }

        if let Some(last_node) = graph.edge_order.last() {
            dot.push_str(&format!("  \"{}\" -> \"{}\";\n", last_node, END));
        }
    }

    dot.push_str("}\n");
    dot
}

/// Generates a plain text summary of the graph's node count and execution order.
pub fn generate_text<S>(graph: &CompiledStateGraph<S>) -> String
where
    S: std::fmt::Debug,
{
    let mut text = String::new();
    writeln!(text, "Graph Structure:").unwrap();
    writeln!(text, "Nodes: {}", graph.nodes.len()).unwrap();

    writeln!(text, "\nExecution Order:").unwrap();
    writeln!(text, "  {} ->", START).unwrap();
    for (i, node_id) in graph.edge_order.iter().enumerate() {
        if i == graph.edge_order.len() - 1 {
            writeln!(text, "  {} -> {}", node_id, END).unwrap();
        } else {
            writeln!(text, "  {} ->", node_id).unwrap();
        }
    }

    text
}
