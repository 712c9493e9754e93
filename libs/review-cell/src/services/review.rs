use anyhow::{anyhow, Result};
use reqwest::Method;
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{Review, SubmitReviewRequest, LATEST_REVIEWS_LIMIT};

pub struct ReviewService {
    supabase: SupabaseClient,
}

impl ReviewService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub fn for_admin(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::privileged(config),
        }
    }

    /// Stores a validated review.
    pub async fn submit(&self, request: &SubmitReviewRequest) -> Result<Review> {
        let rows: Vec<Review> = self.supabase
            .returning(Method::POST, "/rest/v1/reviews", request.to_row())
            .await?;

        let review = rows.into_iter().next()
            .ok_or_else(|| anyhow!("Review insert returned no rows"))?;
        info!("Review {} submitted with rating {}", review.id, review.rating);
        Ok(review)
    }

    /// Newest reviews first, capped for the public page.
    pub async fn latest(&self) -> Result<Vec<Review>> {
        let path = format!("/rest/v1/reviews?order=created_at.desc&limit={}", LATEST_REVIEWS_LIMIT);
        let reviews: Vec<Review> = self.supabase.request(Method::GET, &path, None).await?;
        debug!("Fetched {} latest reviews", reviews.len());
        Ok(reviews)
    }

    pub async fn list_all(&self) -> Result<Vec<Review>> {
        let reviews: Vec<Review> = self.supabase
            .request(Method::GET, "/rest/v1/reviews?order=created_at.desc", None)
            .await?;
        Ok(reviews)
    }

    pub async fn delete(&self, review_id: i64) -> Result<()> {
        let path = format!("/rest/v1/reviews?id=eq.{}", review_id);
        self.supabase.execute(Method::DELETE, &path, None).await?;
        info!("Deleted review {}", review_id);
        Ok(())
    }
}
