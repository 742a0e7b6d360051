//! Turns parsed filenames into canonical names using a catalog.
//!
//! Movies become `{title} ({year})`, episodes become
//! `{show} - {season}x{episode} - {episode title}` using the provider's
//! numbering. The first search result is always taken as the match.

use mediamap_core::types::SPECIALS_SEASON;
use mediamap_core::{Episode, ItemError, Movie, Season, Show};
use mediamap_metadata::CatalogProvider;
use mediamap_scanner::parser::{self, ParsedName};
use mediamap_scanner::ChangeSet;
use tracing::debug;

pub fn movie_name(movie: &Movie) -> String {
    match movie.release_year {
        Some(year) => format!("{} ({year})", movie.title),
        None => movie.title.clone(),
    }
}

pub fn episode_name(show: &Show, season: &Season, episode: &Episode) -> String {
    format!(
        "{} - {}x{} - {}",
        show.title, season.number, episode.number, episode.title
    )
}

pub struct NameResolver<P> {
    provider: P,
}

impl<P: CatalogProvider> NameResolver<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Canonical name for a parsed filename, or `None` when the catalog
    /// has no match.
    pub async fn resolve(&self, parsed: &ParsedName) -> Option<String> {
        let Some(episode) = parsed.episode else {
            let movies = self.provider.search_movies(&parsed.title).await;
            return movies.first().map(movie_name);
        };

        let shows = self.provider.search_shows(&parsed.title).await;
        let show = shows.first()?;
        // An episode with no season number is looked up among the specials
        let season_number = parsed.season.unwrap_or(SPECIALS_SEASON);

        let Some(season) = show.season(season_number) else {
            debug!(show = %show.title, season = season_number, "season not in catalog");
            return None;
        };
        let Some(episode) = season.episode(episode) else {
            debug!(show = %show.title, season = season_number, episode, "episode not in catalog");
            return None;
        };

        Some(episode_name(show, season, episode))
    }

    /// Resolve every file in the change set, storing proposed names.
    ///
    /// Per-file failures are returned in encounter order and never stop
    /// the pass.
    pub async fn resolve_all(&self, changes: &mut ChangeSet) -> Vec<ItemError> {
        let mut errors = Vec::new();

        for (dir, file) in changes.iter_mut() {
            file.clear_proposal();

            let parsed = match parser::parse_name(&file.name) {
                Ok(parsed) => parsed,
                Err(e) => {
                    debug!(dir, file = %file.file_name(), error = %e, "unparseable filename");
                    errors.push(ItemError::Unparseable {
                        file: file.file_name(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            match self.resolve(&parsed).await {
                Some(name) => {
                    debug!(dir, file = %file.file_name(), proposed = %name, "resolved");
                    file.propose(&name);
                }
                None => errors.push(ItemError::NoMatch {
                    file: file.file_name(),
                    query: parsed.title,
                }),
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediamap_scanner::MediaFile;

    struct StubProvider;

    #[async_trait::async_trait]
    impl CatalogProvider for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }

        async fn search_movies(&self, title: &str) -> Vec<Movie> {
            match title {
                "Requiem for a Dream" => vec![
                    Movie::new("Requiem for a Dream", Some(2000)),
                    Movie::new("Requiem for a Dream (Director's Cut)", Some(2001)),
                ],
                "Undated" => vec![Movie::new("Undated", None)],
                _ => Vec::new(),
            }
        }

        async fn search_shows(&self, title: &str) -> Vec<Show> {
            match title {
                "Taboo" => vec![Show::new(
                    "Taboo",
                    [
                        Season::new(0, "Specials", [Episode::new(1, "Behind the Scenes")]),
                        Season::new(
                            1,
                            "Season 1",
                            [
                                Episode::new(1, "Episode 1"),
                                Episode::new(2, "Episode 2"),
                                Episode::new(10, "Finale"),
                            ],
                        ),
                    ],
                )],
                "AC DC" => vec![Show::new(
                    "AC/DC Live",
                    [Season::new(1, "Season 1", [Episode::new(1, "Wembley")])],
                )],
                _ => Vec::new(),
            }
        }
    }

    #[tokio::test]
    async fn movie_resolves_to_title_and_year() {
        let resolver = NameResolver::new(StubProvider);
        let parsed = ParsedName::movie("Requiem for a Dream", None);

        assert_eq!(
            resolver.resolve(&parsed).await.as_deref(),
            Some("Requiem for a Dream (2000)")
        );
    }

    #[tokio::test]
    async fn movie_without_year_keeps_title() {
        let resolver = NameResolver::new(StubProvider);
        let parsed = ParsedName::movie("Undated", None);

        assert_eq!(resolver.resolve(&parsed).await.as_deref(), Some("Undated"));
    }

    #[tokio::test]
    async fn episode_resolves_with_provider_numbers() {
        let resolver = NameResolver::new(StubProvider);

        let parsed = ParsedName::episode("Taboo", Some(1), 2);
        assert_eq!(
            resolver.resolve(&parsed).await.as_deref(),
            Some("Taboo - 1x2 - Episode 2")
        );

        let parsed = ParsedName::episode("Taboo", None, 1);
        assert_eq!(
            resolver.resolve(&parsed).await.as_deref(),
            Some("Taboo - 0x1 - Behind the Scenes")
        );
        assert!(resolver.resolve(&ParsedName::episode("Taboo", None, 2)).await.is_none());
    }

    #[tokio::test]
    async fn resolved_names_parse_back_to_the_same_episode() {
        let resolver = NameResolver::new(StubProvider);

        for (season, episode) in [(1, 2), (1, 10), (0, 1)] {
            let name = resolver
                .resolve(&ParsedName::episode("Taboo", Some(season), episode))
                .await
                .unwrap();
            let reparsed = parser::parse_name(&name).unwrap();

            assert_eq!(reparsed, ParsedName::episode("Taboo", Some(season), episode), "{name}");
            assert_eq!(resolver.resolve(&reparsed).await.as_deref(), Some(name.as_str()));
        }
    }

    #[tokio::test]
    async fn already_renamed_file_is_not_pending_or_an_error() {
        let resolver = NameResolver::new(StubProvider);
        let mut changes = ChangeSet::new();
        changes.insert("tv", MediaFile::new("Taboo - 1x2 - Episode 2", ".mkv"));

        let errors = resolver.resolve_all(&mut changes).await;

        assert!(errors.is_empty());
        assert_eq!(changes.pending_count(), 0);
    }

    #[tokio::test]
    async fn missing_season_or_episode_has_no_match() {
        let resolver = NameResolver::new(StubProvider);

        assert!(resolver.resolve(&ParsedName::episode("Taboo", Some(2), 1)).await.is_none());
        assert!(resolver.resolve(&ParsedName::episode("Taboo", Some(1), 9)).await.is_none());
        assert!(resolver.resolve(&ParsedName::episode("Nothing", Some(1), 1)).await.is_none());
        assert!(resolver.resolve(&ParsedName::movie("Nothing", None)).await.is_none());
    }

    #[tokio::test]
    async fn resolve_all_records_failures_and_keeps_going() {
        let resolver = NameResolver::new(StubProvider);
        let mut changes = ChangeSet::new();
        changes.insert("tv", MediaFile::new("S01E01", ".mkv"));
        changes.insert("tv", MediaFile::new("Taboo.S01E02.720p", ".mkv"));
        changes.insert("tv", MediaFile::new("Taboo.S01E09", ".mkv"));
        changes.insert("tv", MediaFile::new("AC.DC.S01E01", ".mkv"));
        changes.insert("movies", MediaFile::new("Requiem.for.a.Dream.2000.1080p", ".avi"));

        let errors = resolver.resolve_all(&mut changes).await;

        let codes: Vec<(&str, &str)> = errors.iter().map(|e| (e.code(), e.file())).collect();
        assert_eq!(
            codes,
            vec![("unparseable", "S01E01.mkv"), ("no_match", "Taboo.S01E09.mkv")]
        );

        let proposed: Vec<(String, String)> = changes
            .pending()
            .map(|(_, f)| (f.file_name(), f.proposed_file_name().unwrap()))
            .collect();
        assert_eq!(
            proposed,
            vec![
                (
                    "Requiem.for.a.Dream.2000.1080p.avi".to_string(),
                    "Requiem for a Dream (2000).avi".to_string()
                ),
                (
                    "Taboo.S01E02.720p.mkv".to_string(),
                    "Taboo - 1x2 - Episode 2.mkv".to_string()
                ),
                (
                    "AC.DC.S01E01.mkv".to_string(),
                    "AC-DC Live - 1x1 - Wembley.mkv".to_string()
                ),
            ]
        );
    }
}
