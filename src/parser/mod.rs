//! Text-pattern extraction for TV.com pages
//!
//! Extraction is deliberately tied to the site's current markup: each
//! helper runs one fixed pattern over a normalized document and returns
//! an empty result on a miss, never an error. Parsers for the individual
//! page kinds live in the submodules:
//! - `search`: program search results scan
//! - `series`: show summary page and episode listings
//! - `episode`: episode summary page

pub(crate) mod episode;
pub(crate) mod search;
pub(crate) mod series;

use regex_lite::Regex;

/// Normalize a fetched page: split into lines, trim each line, rejoin
/// with newlines. Every extraction pattern assumes this form.
pub(crate) fn normalize_document(html: &str) -> String {
    html.lines().map(str::trim).collect::<Vec<_>>().join("\n")
}

/// Drop all tag markup from an HTML fragment, keeping the text.
pub(crate) fn strip_tags(fragment: &str) -> String {
    let re = Regex::new(r"<[^>]*>").unwrap();
    re.replace_all(fragment, "").trim().to_string()
}

/// Remove `<br>` markup from a text block.
pub(crate) fn strip_line_breaks(text: &str) -> String {
    let re = Regex::new(r"(?i)<br\s*/?>").unwrap();
    re.replace_all(text, " ").to_string()
}

/// First heading inside the page's content-head region.
///
/// Series and episode summary pages share this layout.
pub(crate) fn extract_name(doc: &str) -> Option<String> {
    let re = Regex::new(r#"(?s)<div id="content-head">.*?<h1[^>]*>(.*?)</h1>"#).ok()?;
    let caps = re.captures(doc)?;
    let name = strip_tags(caps.get(1)?.as_str());
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Body text of the first paragraph in the main content column, skipping
/// a leading "more pictures" teaser block when present. Line-break markup
/// is stripped and whitespace collapsed.
pub(crate) fn extract_summary(doc: &str) -> Option<String> {
    let re = Regex::new(
        r#"(?s)<div id="main-col">\s*(?:<div class="more_pictures">.*?</div>\s*)?<p[^>]*>(.*?)</p>"#,
    )
    .ok()?;
    let caps = re.captures(doc)?;
    let text = strip_line_breaks(caps.get(1)?.as_str());
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
