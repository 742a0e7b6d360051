use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// What a filename says about its content.
///
/// `episode` present means a TV episode; absent means a movie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    pub title: String,
    pub year: Option<u16>,
    pub season: Option<u32>,
    pub episode: Option<u32>,
}

impl ParsedName {
    pub fn movie(title: impl Into<String>, year: Option<u16>) -> Self {
        Self {
            title: title.into(),
            year,
            season: None,
            episode: None,
        }
    }

    pub fn episode(title: impl Into<String>, season: Option<u32>, episode: u32) -> Self {
        Self {
            title: title.into(),
            year: None,
            season,
            episode: Some(episode),
        }
    }

    pub fn is_episode(&self) -> bool {
        self.episode.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("no title found in {0:?}")]
    NoTitle(String),
}

static VIDEO_EXTENSIONS: &[&str] = &[
    "asf", "avi", "mov", "mp4", "ts", "mkv", "wmv", "m4v", "mpg", "mpeg", "webm", "flv",
];

// SxxExx pattern: S01E02, s1e3, etc.
static RE_SXXEXX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[Ss](\d{1,2})[Ee](\d{1,3})").unwrap());

// 1x02 and 1x2; a two digit season cap keeps 1920x1080 out
static RE_XEP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d{1,2})[xX](\d{1,3})\b").unwrap());

// "Season X Episode Y" pattern
static RE_SEASON_EPISODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Season\s+(\d+)\s+Episode\s+(\d+)").unwrap());

// Episode only: "E05", "Ep 05", "Episode.5"
static RE_EPISODE_ONLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|[\.\s_\-])(?:e|ep|episode)[\.\s]?(\d{1,3})(?:[\.\s_\-]|$)").unwrap()
});

// Movie: "Title (Year)" or "Title.Year"
static RE_MOVIE_YEAR_PAREN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)\s*\((\d{4})\)").unwrap());

static RE_MOVIE_YEAR_DOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)[\.\s](\d{4})(?:[\.\s]|$)").unwrap());

// Release noise; everything from the first tag on is dropped.
static RE_NOISE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)[\.\s_\-\[\(](?:2160p|1080p|720p|480p|4k|bluray|blu-ray|brrip|bdrip|dvdrip|webrip|web-dl|hdtv|x264|x265|h\.?264|h\.?265|hevc|xvid|proper|repack)\b.*$",
    )
    .unwrap()
});

static RE_SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").unwrap());

/// Check if a file has a supported video extension.
pub fn is_video_file(filename: &str) -> bool {
    match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => {
            VIDEO_EXTENSIONS.contains(&ext.to_lowercase().as_str())
        }
        _ => false,
    }
}

/// Clean up a title: replace dots/underscores with spaces, trim separators.
fn clean_title(raw: &str) -> String {
    let spaced = raw.replace(['.', '_'], " ");
    RE_SPACES
        .replace_all(&spaced, " ")
        .trim_matches(|c: char| c.is_whitespace() || c == '-')
        .to_string()
}

fn non_empty(title: String, stem: &str) -> Result<String, ParseError> {
    if title.is_empty() {
        Err(ParseError::NoTitle(stem.to_string()))
    } else {
        Ok(title)
    }
}

/// Parse a full filename, extension included.
pub fn parse_filename(filename: &str) -> Result<ParsedName, ParseError> {
    let stem = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);

    let stem = match stem.rfind('.') {
        Some(pos) if pos > 0 => &stem[..pos],
        _ => stem,
    };

    parse_name(stem)
}

/// Parse a file name with the extension already removed.
pub fn parse_name(stem: &str) -> Result<ParsedName, ParseError> {
    // Episode patterns first (more specific)
    if let Some((title, season, episode)) = try_parse_episode(stem) {
        return Ok(ParsedName::episode(non_empty(title, stem)?, season, episode));
    }

    if let Some((title, year)) = try_parse_movie(stem) {
        return Ok(ParsedName::movie(non_empty(title, stem)?, Some(year)));
    }

    // Fallback: movie with just a title
    let title = clean_title(&RE_NOISE.replace(stem, ""));
    Ok(ParsedName::movie(non_empty(title, stem)?, None))
}

fn try_parse_episode(stem: &str) -> Option<(String, Option<u32>, u32)> {
    for re in [&*RE_SXXEXX, &*RE_XEP, &*RE_SEASON_EPISODE] {
        if let Some(caps) = re.captures(stem) {
            let season: u32 = caps[1].parse().ok()?;
            let episode: u32 = caps[2].parse().ok()?;
            let title = clean_title(&stem[..caps.get(0)?.start()]);
            return Some((title, Some(season), episode));
        }
    }

    let caps = RE_EPISODE_ONLY.captures(stem)?;
    let episode: u32 = caps[1].parse().ok()?;
    let title = clean_title(&stem[..caps.get(0)?.start()]);
    Some((title, None, episode))
}

fn try_parse_movie(stem: &str) -> Option<(String, u16)> {
    // "Title (2024)"
    if let Some(caps) = RE_MOVIE_YEAR_PAREN.captures(stem) {
        let year: u16 = caps[2].parse().ok()?;
        return Some((clean_title(&caps[1]), year));
    }

    // "Title.2024.etc"
    if let Some(caps) = RE_MOVIE_YEAR_DOT.captures(stem) {
        let year: u16 = caps[2].parse().ok()?;
        if year >= 1900 && year <= 2100 {
            return Some((clean_title(&caps[1]), year));
        }
    }

    None
}

// ─── Tests ───────────────────────────────────────────────────────────────────
