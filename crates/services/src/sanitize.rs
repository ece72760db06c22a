//! Allowlist HTML sanitization for user-authored rich text.
//!
//! Question descriptions and answer bodies arrive as HTML from the client's
//! editor. We keep a small set of formatting tags, drop every attribute not
//! on the allowlist, strip scriptable URL schemes, and escape everything
//! else so it renders as text.

use once_cell::sync::Lazy;
use regex::Regex;

/// Tags that survive sanitization.
const ALLOWED_TAGS: &[&str] = &[
    "p", "br", "strong", "em", "u", "ol", "ul", "li", "h1", "h2", "h3", "h4", "h5", "h6",
    "blockquote", "code", "pre", "a", "img",
];

/// Attributes that survive on allowed tags.
const ALLOWED_ATTRS: &[&str] = &["href", "target", "src", "alt", "width", "height", "class"];

/// Elements whose entire content is dangerous, not just the tag itself.
static SCRIPT_BLOCK: Lazy<Regex> = Lazy::new(|| {
    let blocked = ["script", "style", "iframe", "object", "embed", "form"];
    let alternation = blocked
        .iter()
        .map(|name| format!(r"<{name}\b[^>]*>.*?</{name}\s*>"))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!("(?is){alternation}")).unwrap()
});

/// Any HTML tag, with its raw attribute text captured.
static TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<(/?)([a-zA-Z][a-zA-Z0-9]*)((?:[^>"']|"[^"]*"|'[^']*')*)/?>"#).unwrap()
});

/// One attribute inside a tag.
static ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([a-zA-Z-]+)\s*=\s*("[^"]*"|'[^']*'|[^\s>]+)"#).unwrap()
});

/// URL schemes that can execute or smuggle script. href/src values carrying
/// one of these are dropped; relative URLs and ordinary schemes pass.
static DANGEROUS_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(javascript|vbscript|data|file)\s*:").unwrap()
});

/// Sanitizes user HTML: strips script-like blocks, keeps only allowlisted
/// tags and attributes, and escapes anything unrecognized.
pub fn sanitize_html(raw: &str) -> String {
    let without_blocks = SCRIPT_BLOCK.replace_all(raw, "");

    let mut out = String::with_capacity(without_blocks.len());
    let mut last = 0;
    for m in TAG.find_iter(&without_blocks) {
        out.push_str(&escape_text(&without_blocks[last..m.start()]));
        out.push_str(&rewrite_tag(m.as_str()));
        last = m.end();
    }
    out.push_str(&escape_text(&without_blocks[last..]));
    out
}

fn escape_text(text: &str) -> String {
    html_escape::encode_safe(text).to_string()
}

/// Keeps an allowed tag with filtered attributes; escapes everything else.
fn rewrite_tag(tag_text: &str) -> String {
    let caps = match TAG.captures(tag_text) {
        Some(caps) => caps,
        None => return escape_text(tag_text),
    };
    let closing = &caps[1];
    let name = caps[2].to_ascii_lowercase();
    if !ALLOWED_TAGS.contains(&name.as_str()) {
        return escape_text(tag_text);
    }
    if !closing.is_empty() {
        return format!("</{name}>");
    }

    let mut rebuilt = format!("<{name}");
    for attr in ATTR.captures_iter(&caps[3]) {
        let attr_name = attr[1].to_ascii_lowercase();
        if !ALLOWED_ATTRS.contains(&attr_name.as_str()) {
            continue;
        }
        let value = attr[2].trim_matches(|c| c == '"' || c == '\'');
        if (attr_name == "href" || attr_name == "src") && DANGEROUS_URL.is_match(value) {
            continue;
        }
        rebuilt.push_str(&format!(
            " {attr_name}=\"{}\"",
            html_escape::encode_double_quoted_attribute(value)
        ));
    }
    rebuilt.push('>');
    rebuilt
}
