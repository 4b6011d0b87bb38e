/// Site and pacing constants shared across the scraper.
/// Pacing values here are the compiled-in defaults; config.toml overrides them.

// User-friendly source names (used in CLI)
pub const INJURY_SOURCE: &str = "injury";
pub const GAME_LOG_SOURCE: &str = "gamelog";

/// Identifier sent as the User-Agent header on every outbound request.
pub const USER_AGENT: &str =
    "gridiron_scraper/0.1 (player history collector; github.com/gridiron-scraper)";

/// Base of the stat site hosting per-player pages.
pub const STAT_SITE_BASE: &str = "https://www.foxsports.com";

/// Consensus rankings endpoint used to build the roster.
pub const RANKINGS_URL: &str =
    "https://api.fantasypros.com/public/v2/json/nfl/consensus-rankings";

// Slug disambiguation suffixes, tried in priority order. The bare slug wins
// when it validates; numeric suffixes cover same-name collisions on the site,
// generational suffixes cover Jr/Sr/II/III naming, and the position suffix is
// appended last by the candidate generator.
pub const SLUG_SUFFIXES: &[&str] = &["", "-2", "-3", "-jr", "-sr", "-ii", "-iii"];

/// Phrases that mark a fetched document as a dead or mis-routed locator.
pub const NOT_FOUND_PHRASES: &[&str] = &[
    "page not found",
    "no results found",
    "this page doesn't exist",
];

/// At least one of these must appear for a document to count as a player
/// profile page rather than a landing or error page.
pub const SECTION_MARKERS: &[&str] = &["injuries", "stats", "game log", "news"];

/// Documents shorter than this are rejected outright.
pub const MIN_PAGE_LEN: usize = 1024;

/// Marker cell identifying the aggregate row inside a stats table.
pub const TOTALS_MARKER: &str = "totals";

// Fetch retry policy for transient upstream failures.
pub const MAX_FETCH_ATTEMPTS: u32 = 3;
pub const RETRY_BACKOFF_MS: u64 = 30_000;

// Pacing defaults.
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 300;
pub const DEFAULT_BATCH_SIZE: usize = 5;
pub const DEFAULT_INJURY_BATCH_DELAY_MS: u64 = 2_000;
pub const DEFAULT_GAME_LOG_BATCH_DELAY_MS: u64 = 4_000;
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 15_000;
pub const DEFAULT_RANKINGS_TIMEOUT_MS: u64 = 60_000;

// History walk policy.
/// A new season year begins in August; before that the previous season is
/// still the operative one.
pub const SEASON_ROLLOVER_MONTH: u32 = 8;
/// The walk never probes more than this many years before the start year.
pub const MAX_LOOKBACK_YEARS: i32 = 10;
/// Consecutive empty seasons before the walk concludes.
pub const CONSECUTIVE_EMPTY_LIMIT: u32 = 2;
