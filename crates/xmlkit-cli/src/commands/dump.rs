/*
 * dump.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! `xmlkit dump`: an outline of node kinds, one node per line.

use anyhow::Result;
use std::path::Path;
use xmlkit::{Document, NodeHandle, NodeType, kind};

pub fn execute(file: &Path) -> Result<()> {
    let doc = Document::load_file(file)?;
    print!("{}", outline(&doc)?);
    Ok(())
}

pub fn outline(doc: &Document) -> xmlkit::Result<String> {
    let mut lines = Vec::new();
    collect_lines(doc, doc.root().as_node(), 0, &mut lines)?;
    let mut out = lines.join("\n");
    out.push('\n');
    Ok(out)
}

fn collect_lines(
    doc: &Document,
    node: NodeHandle,
    depth: usize,
    lines: &mut Vec<String>,
) -> xmlkit::Result<()> {
    let line = describe(doc, node)?;
    lines.push(format!("{:indent$}{}", "", line, indent = depth * 2));
    for child in node.children::<kind::Any>(doc)? {
        collect_lines(doc, child, depth + 1, lines)?;
    }
    Ok(())
}

fn describe(doc: &Document, node: NodeHandle) -> xmlkit::Result<String> {
    Ok(match node.kind(doc)? {
        NodeType::Element => {
            let element = node.cast::<kind::Element>(doc)?;
            let mut line = format!("element <{}>", element.name(doc)?);
            for attr in element.attributes(doc)? {
                line.push_str(&format!(" {}={:?}", attr.name(), attr.text(doc)?));
            }
            line
        }
        NodeType::Text => format!("text {:?}", node.cast::<kind::Text>(doc)?.value(doc)?),
        NodeType::Comment => {
            format!("comment {:?}", node.cast::<kind::Comment>(doc)?.value(doc)?)
        }
        NodeType::Declaration => {
            let decl = node.cast::<kind::Declaration>(doc)?;
            format!("declaration version={}", decl.version(doc)?.unwrap_or("1.0"))
        }
        NodeType::StylesheetReference => {
            let sheet = node.cast::<kind::StylesheetReference>(doc)?;
            format!(
                "stylesheet type={} href={}",
                sheet.stylesheet_type(doc)?,
                sheet.href(doc)?
            )
        }
        other => other.to_string(),
    })
}
