//! HTML to plain text.

use scraper::{ElementRef, Html, Node, Selector};

/// Elements whose whole subtree is not page content.
const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "svg", "template"];

/// Extract the readable text of an HTML document, in document order.
///
/// Text comes from `<body>` when present, otherwise from the root element.
/// Block-level boundaries become newlines and runs of whitespace collapse.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let root = Selector::parse("body")
        .ok()
        .and_then(|body| document.select(&body).next())
        .unwrap_or_else(|| document.root_element());

    let mut parts = Vec::new();
    collect_text(root, &mut parts);
    clean_whitespace(&parts.join(""))
}

fn is_block(tag: &str) -> bool {
    matches!(
        tag,
        "p" | "div"
            | "br"
            | "li"
            | "ul"
            | "ol"
            | "tr"
            | "table"
            | "section"
            | "article"
            | "header"
            | "footer"
            | "nav"
            | "aside"
            | "main"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "pre"
            | "blockquote"
    )
}

fn collect_text(element: ElementRef, parts: &mut Vec<String>) {
    let tag = element.value().name();
    if SKIPPED_TAGS.contains(&tag) {
        return;
    }

    let block = is_block(tag);
    if block {
        parts.push("\n".to_string());
    }

    for child in element.children() {
        match child.value() {
            Node::Text(text) => parts.push(text.to_string()),
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_text(child_el, parts);
                }
            }
            _ => {}
        }
    }

    if block {
        parts.push("\n".to_string());
    }
}

/// Collapse horizontal whitespace to single spaces and keep at most one blank line.
fn clean_whitespace(text: &str) -> String {
    let lines: Vec<String> = text
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect();

    let mut result = String::with_capacity(text.len());
    let mut blank_run = 0;
    for line in lines {
        if line.is_empty() {
            blank_run += 1;
            if blank_run > 1 || result.is_empty() {
                continue;
            }
        } else {
            blank_run = 0;
        }
        result.push_str(&line);
        result.push('\n');
    }

    result.trim().to_string()
}
