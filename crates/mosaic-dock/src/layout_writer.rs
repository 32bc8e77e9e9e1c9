//! Text form of a dock tree.
//!
//! One block per node, indented four spaces per level:
//!
//! ```text
//! root vertical {
//!     window "Scene" tabs 1 {
//!         tab "Scene"
//!     }
//!     split 500
//!     window "Inspector" tabs 0
//! }
//! ```
//!
//! Split positions are written as integer permille. Only writing is provided.

use std::fmt::{self, Write};

use crate::docker::Docker;
use crate::node::{NodeId, NodeKind};

const INDENT: &str = "    ";

/// Write the docked tree to `out`. An empty tree writes nothing.
pub fn write_layout<W: Write>(docker: &Docker, out: &mut W) -> fmt::Result {
    match docker.root() {
        Some(root) => write_node(docker, root, 0, out),
        None => Ok(()),
    }
}

/// [`write_layout`] into a fresh string.
pub fn layout_string(docker: &Docker) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_layout(docker, &mut out);
    out
}

fn write_node<W: Write>(docker: &Docker, id: NodeId, depth: usize, out: &mut W) -> fmt::Result {
    let Some(node) = docker.node(id) else {
        return Ok(());
    };
    indent(out, depth)?;
    match &node.kind {
        NodeKind::Root(root) => {
            writeln!(out, "root {} {{", root.direction().name())?;
            for &child in root.children() {
                write_node(docker, child, depth + 1, out)?;
            }
            indent(out, depth)?;
            out.write_str("}\n")
        }
        NodeKind::Split(split) => writeln!(out, "split {}", split.permille()),
        NodeKind::Window(window) => {
            out.write_str("window ")?;
            write_quoted(out, window.name())?;
            write!(out, " tabs {}", window.tab_count())?;
            if window.tabs().is_empty() {
                return out.write_char('\n');
            }
            out.write_str(" {\n")?;
            for tab in window.tabs() {
                indent(out, depth + 1)?;
                out.write_str("tab ")?;
                write_quoted(out, &tab.title)?;
                out.write_char('\n')?;
            }
            indent(out, depth)?;
            out.write_str("}\n")
        }
    }
}

fn indent<W: Write>(out: &mut W, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        out.write_str(INDENT)?;
    }
    Ok(())
}

fn write_quoted<W: Write>(out: &mut W, text: &str) -> fmt::Result {
    out.write_char('"')?;
    for ch in text.chars() {
        match ch {
            '"' => out.write_str("\\\"")?,
            '\\' => out.write_str("\\\\")?,
            '\n' => out.write_str("\\n")?,
            _ => out.write_char(ch)?,
        }
    }
    out.write_char('"')
}
