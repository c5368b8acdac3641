//! HTML scanning into flat [`ParsedElement`] records.
//!
//! The fragment is parsed with a real tree builder so nested, self-closing
//! and multi-line markup is handled; the result is still flattened to one
//! `(tag, class, text)` record per class-bearing element, in document order.

use html5ever::tendril::TendrilSink as _;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::types::ParsedElement;

/// Parse an HTML fragment into class-bearing elements.
///
/// Elements without a `class` attribute are walked through but not recorded.
pub fn parse_html_structure(html: &str) -> std::io::Result<Vec<ParsedElement>> {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            exact_errors: false,
            scripting_enabled: false,
            ..TreeBuilderOpts::default()
        },
        ..ParseOpts::default()
    };

    let dom = parse_document(RcDom::default(), opts)
        .from_utf8()
        .read_from(&mut html.as_bytes())?;

    let mut elements = Vec::new();
    collect_elements(&dom.document, &mut elements);
    tracing::debug!(count = elements.len(), "parsed html elements");
    Ok(elements)
}

fn collect_elements(handle: &Handle, acc: &mut Vec<ParsedElement>) {
    if let NodeData::Element { name, attrs, .. } = &handle.data {
        let class_name = attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == "class")
            .map(|attr| attr.value.to_string());

        if let Some(class_name) = class_name {
            acc.push(ParsedElement {
                tag: name.local.to_string(),
                class_name: class_name.trim().to_string(),
                content: direct_text(handle),
                id: format!("element-{}", acc.len()),
            });
        }
    }

    for child in handle.children.borrow().iter() {
        collect_elements(child, acc);
    }
}

fn direct_text(handle: &Handle) -> String {
    let mut text = String::new();
    for child in handle.children.borrow().iter() {
        if let NodeData::Text { contents } = &child.data {
            text.push_str(&contents.borrow());
        }
    }
    text.trim().to_string()
}
