use std::collections::BTreeMap;
use std::str::FromStr;

/// Catalog provider a client can be built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Tmdb,
    Tvdb,
}

impl ProviderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tmdb => "TMDB",
            Self::Tvdb => "TVDB",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported database: {0}")]
pub struct UnknownProvider(pub String);

impl FromStr for ProviderKind {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "TMDB" => Ok(Self::Tmdb),
            "TVDB" => Ok(Self::Tvdb),
            _ => Err(UnknownProvider(s.to_string())),
        }
    }
}

/// A movie search hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movie {
    pub title: String,
    pub release_year: Option<i32>,
}

impl Movie {
    pub fn new(title: impl Into<String>, release_year: Option<i32>) -> Self {
        Self {
            title: title.into(),
            release_year,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Episode {
    pub title: String,
    pub number: u32,
}

impl Episode {
    pub fn new(number: u32, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            number,
        }
    }
}

/// One season of a show, episodes keyed by the provider's episode number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Season {
    pub title: String,
    pub number: u32,
    pub episodes: BTreeMap<u32, Episode>,
}

impl Season {
    /// Later episodes with a duplicate number replace earlier ones.
    pub fn new(
        number: u32,
        title: impl Into<String>,
        episodes: impl IntoIterator<Item = Episode>,
    ) -> Self {
        Self {
            title: title.into(),
            number,
            episodes: episodes.into_iter().map(|e| (e.number, e)).collect(),
        }
    }

    pub fn episode(&self, number: u32) -> Option<&Episode> {
        self.episodes.get(&number)
    }

    pub fn is_specials(&self) -> bool {
        self.number == SPECIALS_SEASON
    }
}

/// Season number providers use for specials.
pub const SPECIALS_SEASON: u32 = 0;

/// A fully aggregated show. Never exposed half-built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Show {
    pub title: String,
    /// Number of seasons, not counting specials.
    pub season_count: u32,
    pub seasons: BTreeMap<u32, Season>,
}

impl Show {
    pub fn new(title: impl Into<String>, seasons: impl IntoIterator<Item = Season>) -> Self {
        let seasons: BTreeMap<u32, Season> =
            seasons.into_iter().map(|s| (s.number, s)).collect();
        let season_count = seasons.values().filter(|s| !s.is_specials()).count() as u32;

        Self {
            title: title.into(),
            season_count,
            seasons,
        }
    }

    pub fn season(&self, number: u32) -> Option<&Season> {
        self.seasons.get(&number)
    }

    /// Look up an episode by the provider's season and episode numbers.
    pub fn episode(&self, season: u32, episode: u32) -> Option<(&Season, &Episode)> {
        let season = self.season(season)?;
        season.episode(episode).map(|e| (season, e))
    }
}
