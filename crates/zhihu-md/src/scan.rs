//! Low-level tag scanning helpers shared by the rewriter and converter
//!
//! The content coming back from the API is an HTML fragment, not a full
//! document, so matching works on a linear scan of tags rather than a parsed
//! tree. Anything that does not look like a well-formed tag passes through
//! untouched.

/// An `<img ...>` tag located in an HTML fragment
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct ImgTag<'a> {
    /// Byte offset of the `<` that opens the tag
    pub start: usize,
    /// Byte offset one past the closing `>`
    pub end: usize,
    /// Tag text between `<img` and `>`
    pub body: &'a str,
}

/// Find the next `<img ...>` tag in the fragment
///
/// Requires a boundary after `img` so that tags like `<imgx>` do not match.
/// A tag whose closing `>` is missing is ignored.
pub(crate) fn next_img_tag(html: &str) -> Option<ImgTag<'_>> {
    let mut search = 0;
    loop {
        let start = html[search..].find("<img")? + search;
        let after = &html[start + 4..];
        match after.chars().next() {
            Some(c) if c.is_ascii_whitespace() || c == '/' || c == '>' => {}
            _ => {
                search = start + 4;
                continue;
            }
        }
        let close = match html[start..].find('>') {
            Some(off) => start + off,
            None => return None,
        };
        return Some(ImgTag {
            start,
            end: close + 1,
            body: &html[start + 4..close],
        });
    }
}

/// Extract an attribute value from the body of a tag
///
/// Handles double-quoted, single-quoted, and bare values. The attribute name
/// must start the body or follow whitespace, so `src` does not match inside
/// `data-src` or inside another attribute's value.
pub(crate) fn extract_attribute(tag: &str, attr: &str) -> Option<String> {
    // ASCII-only lowercasing keeps byte offsets valid for the original text
    let tag_lower: String = tag.chars().map(|c| c.to_ascii_lowercase()).collect();
    let pattern = format!("{}=", attr);

    let mut search = 0;
    while let Some(pos) = tag_lower[search..].find(&pattern) {
        let start = search + pos;
        if start > 0 && !tag_lower.as_bytes()[start - 1].is_ascii_whitespace() {
            search = start + pattern.len();
            continue;
        }

        let rest = &tag[start + pattern.len()..];
        let rest = rest.trim_start();

        if let Some(rest) = rest.strip_prefix('"') {
            return rest.find('"').map(|end| rest[..end].to_string());
        } else if let Some(rest) = rest.strip_prefix('\'') {
            return rest.find('\'').map(|end| rest[..end].to_string());
        }
        let end = rest
            .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
            .unwrap_or(rest.len());
        return Some(rest[..end].to_string());
    }
    None
}
