//! Show summary page and episode listing extraction for TV.com

use regex_lite::Regex;

use super::strip_tags;

/// Genres from the comma-separated list after the `Show Categories:`
/// label, one entry per link, markup stripped.
pub(crate) fn extract_genres(doc: &str) -> Vec<String> {
    let Ok(re) = Regex::new(r"Show Categories:\s*(.*)") else {
        return Vec::new();
    };
    let Some(caps) = re.captures(doc) else {
        return Vec::new();
    };
    caps[1]
        .split(',')
        .map(strip_tags)
        .filter(|genre| !genre.is_empty())
        .collect()
}

/// `src` of the "more pictures" thumbnail.
pub(crate) fn extract_image(doc: &str) -> Option<String> {
    let re = Regex::new(r#"(?s)<div class="more_pictures">.*?<img src="([^"]+)""#).ok()?;
    let caps = re.captures(doc)?;
    Some(caps.get(1)?.as_str().to_string())
}

/// Every cast-member anchor on the show page, in document order.
///
/// Cast anchors carry the `cast;name;{n}` tag on the person summary URL.
pub(crate) fn extract_cast(doc: &str) -> Vec<String> {
    let Ok(re) = Regex::new(
        r#"<a href="[^"]*/person/\d+/summary\.html\?tag=cast;name;\d+"[^>]*>([^<]+)</a>"#,
    ) else {
        return Vec::new();
    };
    re.captures_iter(doc)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str().trim().to_string();
            if name.is_empty() {
                None
            } else {
                Some(name)
            }
        })
        .collect()
}

/// Episode anchors from a listing page: `(id, name)` per anchor matching
/// `episode/{id}/summary.html`, in document order. Lines without a
/// matching anchor contribute nothing.
pub(crate) fn parse_episode_listing(doc: &str) -> Vec<(u32, String)> {
    let Ok(re) =
        Regex::new(r#"<a href="[^"]*/episode/(\d+)/summary\.html[^"]*"[^>]*>([^<]+)</a>"#)
    else {
        return Vec::new();
    };
    re.captures_iter(doc)
        .filter_map(|caps| {
            let id: u32 = caps.get(1)?.as_str().parse().ok()?;
            let name = caps.get(2)?.as_str().trim().to_string();
            if id == 0 || name.is_empty() {
                return None;
            }
            Some((id, name))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{fixtures, normalize_document};

    #[test]
    fn test_extract_genres() {
        let doc = normalize_document(fixtures::SERIES_PAGE);
        assert_eq!(extract_genres(&doc), vec!["Drama".to_string(), "Action".to_string()]);
    }

    #[test]
    fn test_extract_genres_miss() {
        assert!(extract_genres("<html><body></body></html>").is_empty());
    }

    #[test]
    fn test_extract_image() {
        let doc = normalize_document(fixtures::SERIES_PAGE);
        assert_eq!(
            extract_image(&doc),
            Some("https://images.tv.com/shows/31635/thumb.jpg".to_string())
        );
    }

    #[test]
    fn test_extract_image_miss() {
        assert_eq!(extract_image("<html><body></body></html>"), None);
    }

    #[test]
    fn test_extract_cast_in_document_order() {
        let doc = normalize_document(fixtures::SERIES_PAGE);
        assert_eq!(
            extract_cast(&doc),
            vec![
                "Wentworth Miller".to_string(),
                "Dominic Purcell".to_string(),
                "Sarah Wayne Callies".to_string(),
            ]
        );
    }

    #[test]
    fn test_extract_cast_requires_cast_tag() {
        // Person links without the cast tag (credit rows) are not cast anchors.
        let doc = normalize_document(fixtures::EPISODE_PAGE);
        assert!(extract_cast(&doc).is_empty());
    }

    #[test]
    fn test_parse_episode_listing() {
        let doc = normalize_document(fixtures::LISTING_SEASON_1);
        assert_eq!(
            parse_episode_listing(&doc),
            vec![
                (475628, "Pilot".to_string()),
                (475629, "Allen".to_string()),
                (484848, "Cell Test".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_episode_listing_empty_page() {
        assert!(parse_episode_listing("<html><body></body></html>").is_empty());
    }
}
