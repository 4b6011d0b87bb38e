use crate::constants::SLUG_SUFFIXES;
use crate::types::Position;
use once_cell::sync::Lazy;
use regex::Regex;

static NON_SLUG_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z ]").unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Normalizes a display name into the site's slug form: lower-cased,
/// punctuation dropped, whitespace runs collapsed to single hyphens.
pub fn normalize_name(name: &str) -> String {
    let lowered = name.to_lowercase();
    let stripped = NON_SLUG_CHARS.replace_all(&lowered, "");
    let hyphenated = WHITESPACE_RUN.replace_all(stripped.trim(), "-");
    hyphenated.trim_matches('-').to_string()
}

/// Ordered, deduplicated slug candidates for a name. The bare slug leads,
/// followed by the fixed suffix list and finally the position suffix when
/// the position is known.
pub fn slug_candidates(name: &str, position: Option<Position>) -> Vec<String> {
    let slug = normalize_name(name);
    let mut candidates: Vec<String> = Vec::with_capacity(SLUG_SUFFIXES.len() + 1);
    for suffix in SLUG_SUFFIXES {
        let candidate = format!("{slug}{suffix}");
        if !candidates.contains(&candidate) {
            candidates.push(candidate);
        }
    }
    if let Some(position) = position {
        let candidate = format!("{}-{}", slug, position.to_string().to_lowercase());
        if !candidates.contains(&candidate) {
            candidates.push(candidate);
        }
    }
    candidates
}

/// A candidate grammar turns (name, position, season) into the ordered page
/// locators to try. Pure; no I/O.
pub trait CandidateGrammar: Send + Sync {
    fn page_urls(&self, name: &str, position: Option<Position>, season: i32) -> Vec<String>;
}

/// Injury-report pages, keyed by the topic path suffix.
pub struct InjuryReportGrammar {
    pub base: String,
}

impl CandidateGrammar for InjuryReportGrammar {
    fn page_urls(&self, name: &str, position: Option<Position>, season: i32) -> Vec<String> {
        slug_candidates(name, position)
            .into_iter()
            .map(|slug| format!("{}/nfl/{}-player/injuries/{}", self.base, slug, season))
            .collect()
    }
}

/// Game-log pages, keyed by a season query parameter.
pub struct GameLogGrammar {
    pub base: String,
}

impl CandidateGrammar for GameLogGrammar {
    fn page_urls(&self, name: &str, position: Option<Position>, season: i32) -> Vec<String> {
        slug_candidates(name, position)
            .into_iter()
            .map(|slug| format!("{}/nfl/{}-player/game-log?season={}", self.base, slug, season))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_strips_punctuation_and_hyphenates() {
        assert_eq!(normalize_name("A. Example"), "a-example");
        assert_eq!(normalize_name("D'Andre  Swift"), "dandre-swift");
        assert_eq!(normalize_name("Amon-Ra St. Brown"), "amonra-st-brown");
        assert_eq!(normalize_name("  Odell Beckham Jr.  "), "odell-beckham-jr");
    }

    #[test]
    fn first_candidate_has_no_punctuation_or_double_hyphen() {
        for name in ["A. Example", "Ja'Marr Chase", "C.J. Stroud", "St. Brown"] {
            let first = &slug_candidates(name, None)[0];
            assert!(first.chars().all(|c| c.is_ascii_lowercase() || c == '-'), "{first}");
            assert!(!first.contains("--"), "{first}");
            assert!(!first.starts_with('-') && !first.ends_with('-'), "{first}");
        }
    }

    #[test]
    fn candidates_are_deterministic_and_ordered() {
        let a = slug_candidates("Josh Allen", Some(Position::QB));
        let b = slug_candidates("Josh Allen", Some(Position::QB));
        assert_eq!(a, b);
        assert_eq!(a[0], "josh-allen");
        assert_eq!(a[1], "josh-allen-2");
        assert_eq!(*a.last().unwrap(), "josh-allen-qb");
        // no duplicates
        let mut deduped = a.clone();
        deduped.dedup();
        assert_eq!(a.len(), deduped.len());
    }

    #[test]
    fn grammars_key_pages_differently() {
        let injury = InjuryReportGrammar { base: "https://site.test".into() };
        let game_log = GameLogGrammar { base: "https://site.test".into() };
        let i = injury.page_urls("Josh Allen", None, 2024);
        let g = game_log.page_urls("Josh Allen", None, 2024);
        assert_eq!(i[0], "https://site.test/nfl/josh-allen-player/injuries/2024");
        assert_eq!(g[0], "https://site.test/nfl/josh-allen-player/game-log?season=2024");
        assert_eq!(i.len(), g.len());
    }
}
