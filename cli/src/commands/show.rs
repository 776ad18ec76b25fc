use std::path::PathBuf;

use anyhow::{Context, Result};
use restable_xml::{Dom, NodeId, NodeKind};

pub(crate) fn command_show(paths: &[PathBuf]) -> Result<()> {
    for path in paths {
        show(path)?;
    }
    Ok(())
}

fn show(path: &PathBuf) -> Result<()> {
    let bytes = std::fs::read(path).with_context(|| format!("can't read file: {:?}", path))?;
    let dom = restable_xml::from_reader(&bytes)
        .with_context(|| format!("got error while parsing xml: {:?}", path))?;

    println!("{}:", path.display());
    match dom.root() {
        Some(root) => print_node(&dom, root, 1),
        None => println!("  (empty document)"),
    }
    Ok(())
}

fn print_node(dom: &Dom, id: NodeId, depth: usize) {
    let indent = "  ".repeat(depth);
    match &dom.get(id).kind {
        NodeKind::Namespace(ns) => println!("{}xmlns:{}=\"{}\"", indent, ns.prefix, ns.uri),
        NodeKind::Element(el) => {
            let qualified = if el.namespace_uri.is_empty() {
                el.name.clone()
            } else {
                format!("{{{}}}{}", el.namespace_uri, el.name)
            };
            let attrs = el
                .attributes
                .iter()
                .map(|a| format!("{}=\"{}\"", a.name, a.value))
                .collect::<Vec<_>>()
                .join(" ");
            if attrs.is_empty() {
                println!("{}<{}>", indent, qualified);
            } else {
                println!("{}<{} {}>", indent, qualified, attrs);
            }
        }
        NodeKind::Text(text) => {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                println!("{}\"{}\"", indent, trimmed);
            }
        }
    }

    for &child in &dom.get(id).children {
        print_node(dom, child, depth + 1);
    }
}
