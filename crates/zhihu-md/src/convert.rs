//! HTML to Markdown conversion
//!
//! A linear tag scan over the HTML fragment, good enough for the markup the
//! content API emits. Unknown tags are dropped and their text kept.

use crate::scan::extract_attribute;

/// Elements whose content is dropped entirely
const SKIP_TAGS: &[&str] = &["script", "style", "noscript", "iframe", "svg"];

/// List nesting state
enum ListKind {
    Unordered,
    Ordered(usize),
}

/// Convert an HTML fragment to Markdown
pub fn html_to_markdown(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut skip_stack: Vec<&str> = Vec::new();
    let mut lists: Vec<ListKind> = Vec::new();
    let mut link_hrefs: Vec<Option<String>> = Vec::new();
    let mut in_pre = false;
    let mut in_blockquote = false;

    let mut chars = html.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '<' {
            if skip_stack.is_empty() {
                let decoded = decode_entity_inline(c, &mut chars);
                if in_blockquote && decoded == '\n' {
                    out.push_str("\n> ");
                } else {
                    out.push(decoded);
                }
            }
            continue;
        }

        // Collect the tag body up to the closing '>'
        let mut tag = String::new();
        for next in chars.by_ref() {
            if next == '>' {
                break;
            }
            tag.push(next);
        }

        let is_closing = tag.starts_with('/');
        let name_part = if is_closing { &tag[1..] } else { tag.as_str() };
        let tag_name: String = name_part
            .split(|c: char| c.is_whitespace() || c == '/')
            .next()
            .unwrap_or("")
            .chars()
            .map(|c| c.to_ascii_lowercase())
            .collect();

        if let Some(skip) = SKIP_TAGS.iter().find(|t| **t == tag_name) {
            if is_closing {
                if let Some(pos) = skip_stack.iter().rposition(|t| t == skip) {
                    skip_stack.remove(pos);
                }
            } else if !tag.ends_with('/') {
                skip_stack.push(skip);
            }
            continue;
        }
        if !skip_stack.is_empty() {
            continue;
        }

        match tag_name.as_str() {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                if is_closing {
                    out.push_str("\n\n");
                } else {
                    let level = tag_name[1..].parse::<usize>().unwrap_or(1);
                    out.push('\n');
                    for _ in 0..level {
                        out.push('#');
                    }
                    out.push(' ');
                }
            }
            "p" | "div" | "section" | "article" | "figure" | "figcaption" => {
                if is_closing {
                    out.push_str("\n\n");
                }
            }
            "br" => out.push('\n'),
            "hr" => out.push_str("\n---\n"),
            "ul" => handle_list_edge(&mut lists, &mut out, is_closing, ListKind::Unordered),
            "ol" => handle_list_edge(&mut lists, &mut out, is_closing, ListKind::Ordered(0)),
            "li" => {
                if !is_closing {
                    out.push('\n');
                    for _ in 0..lists.len().saturating_sub(1) {
                        out.push_str("  ");
                    }
                    match lists.last_mut() {
                        Some(ListKind::Ordered(n)) => {
                            *n += 1;
                            out.push_str(&format!("{}. ", n));
                        }
                        _ => out.push_str("- "),
                    }
                }
            }
            "strong" | "b" => out.push_str("**"),
            "em" | "i" => out.push('*'),
            "pre" => {
                out.push_str("\n```\n");
                in_pre = !is_closing;
            }
            "code" => {
                if !in_pre {
                    out.push('`');
                }
            }
            "blockquote" => {
                if is_closing {
                    in_blockquote = false;
                    out.push('\n');
                } else {
                    in_blockquote = true;
                    out.push_str("\n> ");
                }
            }
            "a" => {
                if is_closing {
                    if let Some(Some(href)) = link_hrefs.pop() {
                        out.push_str(&format!("]({})", href));
                    }
                } else {
                    let href = extract_attribute(&tag, "href");
                    if href.is_some() {
                        out.push('[');
                    }
                    link_hrefs.push(href);
                }
            }
            "img" => {
                if let Some(src) = extract_attribute(&tag, "src") {
                    let alt = extract_attribute(&tag, "alt").unwrap_or_default();
                    out.push_str(&format!("![{}]({})", alt, src));
                }
            }
            _ => {}
        }
    }

    tidy_whitespace(&out)
}

fn handle_list_edge(lists: &mut Vec<ListKind>, out: &mut String, is_closing: bool, kind: ListKind) {
    if is_closing {
        lists.pop();
        if lists.is_empty() {
            out.push('\n');
        }
    } else {
        lists.push(kind);
    }
}

/// Decode an HTML entity when the current character starts one
fn decode_entity_inline(c: char, chars: &mut std::iter::Peekable<std::str::Chars>) -> char {
    if c != '&' {
        return c;
    }

    let mut entity = String::new();
    while let Some(&next) = chars.peek() {
        if next == ';' {
            chars.next();
            return decode_entity(&entity).unwrap_or('&');
        }
        if next.is_whitespace() || entity.len() > 10 {
            break;
        }
        entity.push(chars.next().unwrap_or_default());
    }
    '&'
}

/// Decode a named or numeric entity (the text between `&` and `;`)
fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" | "#39" => Some('\''),
        "nbsp" => Some(' '),
        "hellip" => Some('…'),
        "mdash" => Some('—'),
        "ndash" => Some('–'),
        "copy" => Some('©'),
        "reg" => Some('®'),
        _ => {
            let num = entity.strip_prefix('#')?;
            let code = match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

/// Collapse space runs, strip trailing spaces, and keep at most one blank line
fn tidy_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pending_newlines = 0;
    let mut pending_space = false;

    for c in s.chars() {
        match c {
            '\n' => {
                pending_newlines += 1;
                pending_space = false;
            }
            c if c.is_whitespace() => {
                if pending_newlines == 0 {
                    pending_space = true;
                }
            }
            c => {
                if !out.is_empty() {
                    if pending_newlines > 0 {
                        out.push('\n');
                        if pending_newlines > 1 {
                            out.push('\n');
                        }
                    } else if pending_space {
                        out.push(' ');
                    }
                }
                pending_newlines = 0;
                pending_space = false;
                out.push(c);
            }
        }
    }
    out
}
