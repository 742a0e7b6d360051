use mediamap_core::{Movie, Show};

/// A catalog that can be searched for movies and shows.
///
/// Results keep the provider's relevance order; index 0 is the best match.
/// Implementations never return partially built shows and never fail: a
/// search that cannot be completed is logged and yields fewer (or no) results.
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn search_movies(&self, title: &str) -> Vec<Movie>;

    async fn search_shows(&self, title: &str) -> Vec<Show>;
}

#[async_trait::async_trait]
impl<P: CatalogProvider + ?Sized> CatalogProvider for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn search_movies(&self, title: &str) -> Vec<Movie> {
        (**self).search_movies(title).await
    }

    async fn search_shows(&self, title: &str) -> Vec<Show> {
        (**self).search_shows(title).await
    }
}
