//! TMDB (The Movie Database) catalog client.
//!
//! Uses TMDB API v3: https://developer.themoviedb.org/docs
//!
//! A show is assembled from three kinds of request: the search hit, the show
//! detail (season list) and one season detail per listed season. If any of
//! the detail requests fails the whole show is dropped from the results.

use chrono::Datelike;
use mediamap_core::{Episode, Movie, Season, Show};
use tracing::{debug, warn};

use crate::MetadataError;
use crate::provider::CatalogProvider;
use crate::transport::{HttpTransport, Transport};

const BASE_URL: &str = "https://api.themoviedb.org/3";
const LANGUAGE: &str = "en-GB";
const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct TmdbClient<T = HttpTransport> {
    transport: T,
}

impl TmdbClient {
    pub fn new(api_key: &str) -> Self {
        Self::with_transport(
            HttpTransport::new(BASE_URL)
                .with_param("api_key", api_key)
                .with_param("language", LANGUAGE),
        )
    }
}

impl<T: Transport> TmdbClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    async fn search(&self, kind: &str, title: &str) -> Result<Vec<serde_json::Value>, MetadataError> {
        let data = self
            .transport
            .get_json(
                &format!("/search/{kind}"),
                &[("query", title), ("page", "1"), ("include_adult", "true")],
            )
            .await?;

        Ok(data["results"].as_array().cloned().unwrap_or_default())
    }

    async fn fetch_show(&self, id: u64, fallback_title: &str) -> Result<Show, MetadataError> {
        let detail = self.transport.get_json(&format!("/tv/{id}"), &[]).await?;
        let listed = detail["seasons"].as_array().cloned().unwrap_or_default();

        let mut seasons = Vec::with_capacity(listed.len());
        for entry in &listed {
            let number = entry["season_number"]
                .as_u64()
                .ok_or_else(|| MetadataError::Provider(format!("show {id}: season without number")))?
                as u32;

            let data = self
                .transport
                .get_json(&format!("/tv/{id}/season/{number}"), &[])
                .await?;

            seasons.push(parse_season(number, entry, &data));
        }

        let title = detail["name"].as_str().unwrap_or(fallback_title);
        Ok(Show::new(title, seasons))
    }
}

#[async_trait::async_trait]
impl<T: Transport> CatalogProvider for TmdbClient<T> {
    fn name(&self) -> &str {
        "tmdb"
    }

    async fn search_movies(&self, title: &str) -> Vec<Movie> {
        match self.search("movie", title).await {
            Ok(results) => results.iter().map(parse_movie).collect(),
            Err(e) => {
                warn!(title, error = %e, "TMDB movie search failed");
                Vec::new()
            }
        }
    }

    async fn search_shows(&self, title: &str) -> Vec<Show> {
        let results = match self.search("tv", title).await {
            Ok(results) => results,
            Err(e) => {
                warn!(title, error = %e, "TMDB show search failed");
                return Vec::new();
            }
        };

        let mut shows = Vec::with_capacity(results.len());
        for hit in &results {
            let Some(id) = hit["id"].as_u64() else {
                debug!(title, "TMDB show hit without id");
                continue;
            };
            let name = hit["name"].as_str().unwrap_or("Unknown");

            match self.fetch_show(id, name).await {
                Ok(show) => shows.push(show),
                Err(e) => warn!(show = name, id, error = %e, "dropping show, detail fetch failed"),
            }
        }
        shows
    }
}

fn parse_movie(data: &serde_json::Value) -> Movie {
    Movie::new(
        data["title"].as_str().unwrap_or("Unknown"),
        data["release_date"].as_str().and_then(release_year),
    )
}

/// Year of a `YYYY-MM-DD` release date; empty or malformed dates give `None`.
pub(crate) fn release_year(date: &str) -> Option<i32> {
    chrono::NaiveDate::parse_from_str(date, DATE_FORMAT)
        .ok()
        .map(|d| d.year())
}

fn parse_season(number: u32, listing: &serde_json::Value, data: &serde_json::Value) -> Season {
    let title = data["name"]
        .as_str()
        .or_else(|| listing["name"].as_str())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Season {number}"));

    let episodes = data["episodes"]
        .as_array()
        .map(|eps| {
            eps.iter()
                .filter_map(|ep| {
                    let n = ep["episode_number"].as_u64()? as u32;
                    Some(Episode::new(n, ep["name"].as_str().unwrap_or_default()))
                })
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    Season::new(number, title, episodes)
}
