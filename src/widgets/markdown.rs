//! Plain-text Markdown layout for chat transcripts.

use markdown::{mdast, to_mdast, ParseOptions};

use crate::core::text::wrap_words;

/// Lay out `text` as wrapped plain lines.
///
/// Returns the parser's error description when the source cannot be parsed;
/// callers fall back to the raw text.
pub fn render_markdown(text: &str, width: usize) -> Result<Vec<String>, String> {
    let normalized = text.replace('\t', "   ");
    let root = to_mdast(&normalized, &ParseOptions::gfm()).map_err(|err| format!("{err:?}"))?;
    let nodes = match root {
        mdast::Node::Root(root) => root.children,
        other => vec![other],
    };

    let mut lines = Vec::new();
    for (idx, node) in nodes.iter().enumerate() {
        if idx > 0 {
            lines.push(String::new());
        }
        render_block(node, width, "", &mut lines);
    }
    Ok(lines)
}

/// Raw text wrapped the same way, for when parsing fails.
pub fn render_plain(text: &str, width: usize) -> Vec<String> {
    wrap_words(text, width)
}

fn push_wrapped(text: &str, width: usize, prefix: &str, out: &mut Vec<String>) {
    let inner = width.saturating_sub(prefix.chars().count()).max(1);
    for line in wrap_words(text, inner) {
        out.push(format!("{prefix}{line}"));
    }
}

fn render_block(node: &mdast::Node, width: usize, prefix: &str, out: &mut Vec<String>) {
    match node {
        mdast::Node::Heading(heading) => {
            let text = inline_text(&heading.children);
            let marks = "#".repeat(heading.depth as usize);
            push_wrapped(&format!("{marks} {text}"), width, prefix, out);
        }
        mdast::Node::Paragraph(paragraph) => {
            push_wrapped(&inline_text(&paragraph.children), width, prefix, out);
        }
        mdast::Node::Code(code) => {
            out.push(format!("{prefix}```{}", code.lang.clone().unwrap_or_default()));
            for line in code.value.split('\n') {
                out.push(format!("{prefix}  {line}"));
            }
            out.push(format!("{prefix}```"));
        }
        mdast::Node::List(list) => {
            let mut number = list.start.unwrap_or(1);
            for child in &list.children {
                let mdast::Node::ListItem(item) = child else {
                    continue;
                };
                let bullet = if list.ordered {
                    let bullet = format!("{number}. ");
                    number += 1;
                    bullet
                } else {
                    "- ".to_string()
                };
                let indent = " ".repeat(bullet.len());
                let mut item_lines = Vec::new();
                for block in &item.children {
                    render_block(block, width.saturating_sub(bullet.len()), "", &mut item_lines);
                }
                for (line_idx, line) in item_lines.into_iter().enumerate() {
                    let lead = if line_idx == 0 { &bullet } else { &indent };
                    out.push(format!("{prefix}{lead}{line}"));
                }
            }
        }
        mdast::Node::Blockquote(quote) => {
            let nested = format!("{prefix}│ ");
            for block in &quote.children {
                render_block(block, width, &nested, out);
            }
        }
        mdast::Node::ThematicBreak(_) => {
            out.push(format!("{prefix}{}", "─".repeat(width.saturating_sub(prefix.len()).min(40))));
        }
        mdast::Node::Html(html) => push_wrapped(&html.value, width, prefix, out),
        mdast::Node::Math(math) => {
            for line in math.value.split('\n') {
                out.push(format!("{prefix}  {line}"));
            }
        }
        other => {
            if let Some(children) = other.children() {
                let text = inline_text(children);
                if !text.is_empty() {
                    push_wrapped(&text, width, prefix, out);
                }
            }
        }
    }
}

fn inline_text(nodes: &[mdast::Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        match node {
            mdast::Node::Text(text) => out.push_str(&text.value),
            mdast::Node::InlineCode(code) => {
                out.push('`');
                out.push_str(&code.value);
                out.push('`');
            }
            mdast::Node::InlineMath(math) => out.push_str(&math.value),
            mdast::Node::Html(html) => out.push_str(&html.value),
            mdast::Node::Break(_) => out.push('\n'),
            mdast::Node::Link(link) => {
                let label = inline_text(&link.children);
                if label.is_empty() || label == link.url {
                    out.push_str(&link.url);
                } else {
                    out.push_str(&format!("{label} ({})", link.url));
                }
            }
            mdast::Node::Image(image) => out.push_str(&format!("[{}]", image.alt)),
            other => {
                if let Some(children) = other.children() {
                    out.push_str(&inline_text(children));
                }
            }
        }
    }
    out
}
