//! TheTVDB v3 catalog client.
//!
//! TVDB delivers a show's episodes as one flat, paginated list. Pages are
//! followed until `links.next` is absent or zero, then episodes are grouped
//! by their aired season. Delivery order is not trusted: seasons and episodes
//! are keyed by the provider's numbers.

use std::collections::BTreeMap;

use mediamap_core::types::SPECIALS_SEASON;
use mediamap_core::{Episode, Movie, Season, Show};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::MetadataError;
use crate::provider::CatalogProvider;
use crate::transport::{HttpTransport, Transport};

const BASE_URL: &str = "https://api.thetvdb.com";

/// Credentials exchanged for a bearer token at login.
#[derive(Debug, Clone, Serialize)]
pub struct TvdbCredentials {
    #[serde(rename = "apikey")]
    pub api_key: String,
    pub username: String,
    #[serde(rename = "userkey")]
    pub user_key: String,
}

#[derive(Debug, Deserialize)]
struct Token {
    token: String,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeriesHit {
    id: u64,
    #[serde(default)]
    series_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeriesDetail {
    #[serde(default)]
    series_name: String,
}

#[derive(Debug, Deserialize)]
struct EpisodePage {
    #[serde(default)]
    data: Vec<RawEpisode>,
    #[serde(default)]
    links: Links,
}

#[derive(Debug, Default, Deserialize)]
struct Links {
    next: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawEpisode {
    aired_season: Option<u32>,
    aired_episode_number: Option<u32>,
    #[serde(default)]
    episode_name: Option<String>,
}

pub struct TvdbClient<T = HttpTransport> {
    transport: T,
}

impl TvdbClient {
    /// Log in and build a client carrying the session token.
    pub async fn login(credentials: &TvdbCredentials) -> Result<Self, MetadataError> {
        let url = format!("{BASE_URL}/login");
        debug!(url = %url, "TVDB login");

        let resp = reqwest::Client::new()
            .post(&url)
            .json(credentials)
            .send()
            .await
            .map_err(|e| MetadataError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(MetadataError::Auth(format!(
                "TVDB login returned {}",
                resp.status()
            )));
        }

        let token: Token = resp
            .json()
            .await
            .map_err(|e| MetadataError::Auth(format!("parse token: {e}")))?;
        info!(username = %credentials.username, "logged in to TVDB");

        Ok(Self::with_transport(
            HttpTransport::new(BASE_URL).with_bearer(token.token),
        ))
    }
}

impl<T: Transport> TvdbClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    async fn search(&self, title: &str) -> Result<Vec<SeriesHit>, MetadataError> {
        match self
            .transport
            .get_json("/search/series", &[("name", title)])
            .await
        {
            Ok(data) => Ok(serde_json::from_value::<Envelope<Vec<SeriesHit>>>(data)?.data),
            // TVDB answers an empty search with 404.
            Err(MetadataError::NotFound) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    async fn fetch_show(&self, hit: &SeriesHit) -> Result<Show, MetadataError> {
        let data = self
            .transport
            .get_json(&format!("/series/{}", hit.id), &[])
            .await?;
        let detail = serde_json::from_value::<Envelope<SeriesDetail>>(data)?.data;

        let episodes = self.fetch_episodes(hit.id).await?;
        let title = if detail.series_name.is_empty() {
            &hit.series_name
        } else {
            &detail.series_name
        };
        Ok(group_episodes(title, episodes))
    }

    /// Follow the episode pages until the provider reports no next page.
    async fn fetch_episodes(&self, id: u64) -> Result<Vec<RawEpisode>, MetadataError> {
        let path = format!("/series/{id}/episodes");
        let mut episodes = Vec::new();
        let mut page = 1u32;

        loop {
            let page_str = page.to_string();
            let data = self
                .transport
                .get_json(&path, &[("page", page_str.as_str())])
                .await?;
            let body: EpisodePage = serde_json::from_value(data)?;
            episodes.extend(body.data);

            match body.links.next {
                Some(next) if next > page => page = next,
                Some(0) | None => break,
                Some(next) => {
                    return Err(MetadataError::Provider(format!(
                        "series {id}: page {page} links back to page {next}"
                    )));
                }
            }
        }

        debug!(id, episodes = episodes.len(), "fetched TVDB episodes");
        Ok(episodes)
    }
}

/// Group a flat episode list into seasons keyed by aired season number.
pub(crate) fn group_episodes(title: &str, episodes: Vec<RawEpisode>) -> Show {
    let mut grouped: BTreeMap<u32, Vec<Episode>> = BTreeMap::new();

    for ep in episodes {
        let (Some(season), Some(number)) = (ep.aired_season, ep.aired_episode_number) else {
            continue;
        };
        grouped
            .entry(season)
            .or_default()
            .push(Episode::new(number, ep.episode_name.unwrap_or_default()));
    }

    let seasons = grouped.into_iter().map(|(number, eps)| {
        let title = if number == SPECIALS_SEASON {
            "Specials".to_string()
        } else {
            format!("Season {number}")
        };
        Season::new(number, title, eps)
    });

    Show::new(title, seasons)
}

#[async_trait::async_trait]
impl<T: Transport> CatalogProvider for TvdbClient<T> {
    fn name(&self) -> &str {
        "tvdb"
    }

    /// TVDB v3 has no movie search.
    async fn search_movies(&self, title: &str) -> Vec<Movie> {
        debug!(title, "TVDB does not support movie search");
        Vec::new()
    }

    async fn search_shows(&self, title: &str) -> Vec<Show> {
        let hits = match self.search(title).await {
            Ok(hits) => hits,
            Err(e) => {
                warn!(title, error = %e, "TVDB show search failed");
                return Vec::new();
            }
        };

        let mut shows = Vec::with_capacity(hits.len());
        for hit in &hits {
            match self.fetch_show(hit).await {
                Ok(show) => shows.push(show),
                Err(e) => warn!(
                    show = %hit.series_name,
                    id = hit.id,
                    error = %e,
                    "dropping show, detail fetch failed"
                ),
            }
        }
        shows
    }
}
