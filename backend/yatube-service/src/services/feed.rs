/// Feed service - ordered, paginated post listings
use crate::db::{ContentStore, Scope};
use crate::error::{AppError, Result};
use crate::models::{Author, Group, PostEntry};
use crate::pagination::{Page, Paginator};
use std::sync::Arc;

pub struct FeedService {
    store: Arc<dyn ContentStore>,
    paginator: Paginator,
}

impl FeedService {
    pub fn new(store: Arc<dyn ContentStore>, paginator: Paginator) -> Self {
        Self { store, paginator }
    }

    /// One page of `scope`, newest first.
    pub async fn page(&self, scope: Scope, number: u64) -> Result<Page<PostEntry>> {
        let count = self.store.count_posts(scope).await?;
        let (limit, offset) = self.paginator.window(number);

        let posts = if (offset as u64) < count {
            self.store.list_posts(scope, limit, offset).await?
        } else {
            Vec::new()
        };

        tracing::debug!(?scope, page = number, count, "feed page loaded");
        Ok(self.paginator.page(number, count, posts))
    }

    pub async fn index(&self, number: u64) -> Result<Page<PostEntry>> {
        self.page(Scope::All, number).await
    }

    pub async fn group(&self, slug: &str, number: u64) -> Result<(Group, Page<PostEntry>)> {
        let group = self
            .store
            .find_group_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::group_not_found(slug))?;

        let page = self.page(Scope::Group(group.id), number).await?;
        Ok((group, page))
    }

    /// The author's page; its `count` doubles as the author's post count.
    pub async fn profile(&self, username: &str, number: u64) -> Result<(Author, Page<PostEntry>)> {
        let author = self
            .store
            .find_author_by_username(username)
            .await?
            .ok_or_else(|| AppError::author_not_found(username))?;

        let page = self.page(Scope::Author(author.id), number).await?;
        Ok((author, page))
    }

    /// Posts by every author `user_id` follows.
    pub async fn followed(&self, user_id: i64, number: u64) -> Result<Page<PostEntry>> {
        self.page(Scope::FollowedBy(user_id), number).await
    }
}
