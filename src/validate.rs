use crate::constants::{MIN_PAGE_LEN, NOT_FOUND_PHRASES, SECTION_MARKERS};
use crate::types::Position;

/// Verdict on whether a fetched document represents the intended player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageCheck {
    /// A player profile page; carries the position detected from content,
    /// if any phrase matched.
    Accepted(Option<Position>),
    /// A profile page whose detected position contradicts the expected one.
    RejectedWrongEntity(Position),
    /// Too short, an explicit error page, or not a profile page at all.
    RejectedNotFound,
}

// Phrase-to-position mapping used for content-based detection. When several
// phrases appear, the earliest occurrence in the document wins.
const POSITION_PHRASES: &[(&str, Position)] = &[
    ("quarterback", Position::QB),
    ("running back", Position::RB),
    ("wide receiver", Position::WR),
    ("tight end", Position::TE),
];

/// Detects the player's position from page content. Best-effort; pages that
/// never spell the role out yield `None`.
pub fn detect_position(body_lower: &str) -> Option<Position> {
    POSITION_PHRASES
        .iter()
        .filter_map(|(phrase, position)| body_lower.find(phrase).map(|idx| (idx, *position)))
        .min_by_key(|(idx, _)| *idx)
        .map(|(_, position)| position)
}

/// Layered heuristic validation of a fetched document.
///
/// False positives and negatives are expected: the page was never designed
/// for this check, and ambiguous names shared by several real players can
/// validate against the wrong one. The ordered-candidate, first-acceptance
/// policy upstream is what keeps both rates low.
pub fn check_page(body: &str, expected: Option<Position>) -> PageCheck {
    if body.len() < MIN_PAGE_LEN {
        return PageCheck::RejectedNotFound;
    }
    let lower = body.to_lowercase();
    if NOT_FOUND_PHRASES.iter().any(|phrase| lower.contains(phrase)) {
        return PageCheck::RejectedNotFound;
    }
    if !SECTION_MARKERS.iter().any(|marker| lower.contains(marker)) {
        return PageCheck::RejectedNotFound;
    }
    let detected = detect_position(&lower);
    match (detected, expected) {
        (Some(found), Some(wanted)) if found != wanted => PageCheck::RejectedWrongEntity(found),
        _ => PageCheck::Accepted(detected),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile_page(extra: &str) -> String {
        let padding = "<div class=\"nav\"><!-- chrome --></div>".repeat(40);
        format!("<html><body>{padding}<section>Stats</section>{extra}</body></html>")
    }

    #[test]
    fn short_documents_are_rejected() {
        assert_eq!(check_page("<html></html>", None), PageCheck::RejectedNotFound);
    }

    #[test]
    fn explicit_error_pages_are_rejected() {
        let body = profile_page("Page Not Found");
        assert_eq!(check_page(&body, None), PageCheck::RejectedNotFound);
    }

    #[test]
    fn pages_without_profile_sections_are_rejected() {
        let padding = "<p>lorem ipsum dolor sit amet</p>".repeat(60);
        let body = format!("<html><body>{padding}</body></html>");
        assert_eq!(check_page(&body, None), PageCheck::RejectedNotFound);
    }

    #[test]
    fn profile_page_with_position_phrase_is_accepted() {
        let body = profile_page("Buffalo Bills quarterback, seventh season");
        assert_eq!(check_page(&body, Some(Position::QB)), PageCheck::Accepted(Some(Position::QB)));
        assert_eq!(check_page(&body, None), PageCheck::Accepted(Some(Position::QB)));
    }

    #[test]
    fn position_mismatch_is_flagged_with_the_detected_value() {
        let body = profile_page("Detroit Lions wide receiver");
        assert_eq!(
            check_page(&body, Some(Position::RB)),
            PageCheck::RejectedWrongEntity(Position::WR)
        );
    }

    #[test]
    fn missing_position_phrase_is_tolerated() {
        let body = profile_page("Game Log and News");
        assert_eq!(check_page(&body, Some(Position::TE)), PageCheck::Accepted(None));
    }

    #[test]
    fn earliest_phrase_wins_detection() {
        let body = profile_page("tight end turned wide receiver");
        assert_eq!(detect_position(&body.to_lowercase()), Some(Position::TE));
    }
}
