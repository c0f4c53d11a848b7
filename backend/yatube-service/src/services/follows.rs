/// Follow service - directed follower -> author edges
use crate::db::ContentStore;
use crate::error::{AppError, Result};
use crate::metrics::content::FOLLOW_CHANGES_TOTAL;
use crate::models::{Author, AuthorRef};
use std::sync::Arc;

pub struct FollowService {
    store: Arc<dyn ContentStore>,
}

impl FollowService {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    async fn resolve(&self, username: &str) -> Result<Author> {
        self.store
            .find_author_by_username(username)
            .await?
            .ok_or_else(|| AppError::author_not_found(username))
    }

    /// Idempotent; following yourself is ignored.
    pub async fn follow(&self, follower: &AuthorRef, username: &str) -> Result<Author> {
        let author = self.resolve(username).await?;
        if author.id == follower.id {
            tracing::debug!(author = %username, "ignoring self-follow");
            return Ok(author);
        }

        if self.store.insert_follow(follower.id, author.id).await? {
            FOLLOW_CHANGES_TOTAL.with_label_values(&["follow"]).inc();
            tracing::info!(follower = %follower.username, author = %username, "author followed");
        }
        Ok(author)
    }

    pub async fn unfollow(&self, follower: &AuthorRef, username: &str) -> Result<Author> {
        let author = self.resolve(username).await?;

        if self.store.delete_follow(follower.id, author.id).await? {
            FOLLOW_CHANGES_TOTAL.with_label_values(&["unfollow"]).inc();
            tracing::info!(follower = %follower.username, author = %username, "author unfollowed");
        }
        Ok(author)
    }

    /// `false` for anonymous callers.
    pub async fn is_following(&self, follower: Option<&AuthorRef>, author: &Author) -> Result<bool> {
        match follower {
            Some(follower) if follower.id != author.id => {
                self.store.is_following(follower.id, author.id).await
            }
            _ => Ok(false),
        }
    }
}
