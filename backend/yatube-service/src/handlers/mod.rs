/// HTTP handlers for yatube-service
///
/// This module contains handlers for:
/// - Feeds: global, group, author and followed-authors listings
/// - Posts: detail, create and author-only edit
/// - Comments: adding a comment to a post
/// - Follows: following and unfollowing authors
/// - Health: liveness, readiness and the JSON 404 fallback
pub mod comments;
pub mod feed;
pub mod follows;
pub mod health;
pub mod posts;

// Re-export handler functions at module level
pub use comments::add_comment;
pub use feed::{follow_index, group_posts, index, profile};
pub use follows::{profile_follow, profile_unfollow};
pub use health::{health_summary, liveness_check, not_found, readiness_summary};
pub use posts::{post_create, post_create_form, post_detail, post_edit, post_edit_form};

use actix_web::web;

use crate::db::ContentStore;
use crate::error::Result;
use crate::middleware::Caller;
use crate::pagination::Paginator;
use crate::services::{CommentService, FeedService, FollowService, PostService};
use std::sync::Arc;

pub(crate) fn post_url(post_id: i64) -> String {
    format!("/posts/{}/", post_id)
}

pub(crate) fn profile_url(username: &str) -> String {
    format!("/profile/{}/", urlencoding::encode(username))
}

/// Submitted form body, or an empty form when the body does not decode.
///
/// Runs after the caller check so a bad body never hides a login redirect;
/// the empty form then fails validation and the page is re-rendered.
pub(crate) fn submitted<T: Default>(form: actix_web::Result<web::Form<T>>, name: &str) -> T {
    match form {
        Ok(form) => form.into_inner(),
        Err(e) => {
            tracing::debug!(form = name, error = %e, "undecodable form body");
            T::default()
        }
    }
}

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ContentStore>,
    pub paginator: Paginator,
    /// Authentication entry point denied requests are redirected to
    pub login_url: String,
}

impl AppState {
    pub fn new(store: Arc<dyn ContentStore>, paginator: Paginator, login_url: &str) -> Self {
        Self {
            store,
            paginator,
            login_url: login_url.to_string(),
        }
    }

    /// Re-read the token's author from the store. A token whose author no
    /// longer exists is treated as anonymous.
    pub async fn resolve_caller(&self, caller: Caller) -> Result<Caller> {
        let Some(claimed) = caller.author() else {
            return Ok(Caller::Anonymous);
        };

        match self.store.find_author_by_id(claimed.id).await? {
            Some(author) => Ok(Caller::Authenticated(author.to_ref())),
            None => {
                tracing::debug!(author_id = claimed.id, "session names an unknown author");
                Ok(Caller::Anonymous)
            }
        }
    }

    pub fn feeds(&self) -> FeedService {
        FeedService::new(self.store.clone(), self.paginator)
    }

    pub fn posts(&self) -> PostService {
        PostService::new(self.store.clone())
    }

    pub fn comments(&self) -> CommentService {
        CommentService::new(self.store.clone())
    }

    pub fn follows(&self) -> FollowService {
        FollowService::new(self.store.clone())
    }
}
