//! Program search scan for TV.com
//!
//! The search page is only ever used to resolve a show name to an id, so
//! the scan stops at the first matching result anchor.

use regex_lite::Regex;

/// Id of the first show search-result anchor in the response body.
///
/// Result anchors link to `…/show/{id}/summary.html`; the body is
/// scanned in order and the first match wins.
pub(crate) fn first_show_id(body: &str) -> Option<u32> {
    let re = Regex::new(r#"href="[^"]*/show/(\d+)/summary\.html"#).ok()?;
    let caps = re.captures(body)?;
    let id: u32 = caps.get(1)?.as_str().parse().ok()?;
    if id > 0 {
        Some(id)
    } else {
        None
    }
}
