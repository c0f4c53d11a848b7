/// Database access layer
///
/// `ContentStore` is the seam between the services and persistence:
/// - `postgres`: sqlx-backed store used in deployments
/// - `memory`: in-process store for local runs and the HTTP test suite
///
/// Every listing method orders posts newest first (`created_at DESC`, then
/// `id DESC`) so repeated reads of the same scope are deterministic.
pub mod memory;
pub mod postgres;

pub use memory::MemoryContentStore;
pub use postgres::PgContentStore;

use crate::error::Result;
use crate::models::{
    Author, CommentEntry, Group, NewComment, NewGroup, NewPost, PostChanges, PostEntry,
};
use async_trait::async_trait;

/// Which subset of posts a feed lists. Ids are already resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    All,
    Group(i64),
    Author(i64),
    /// Posts by every author the given user follows
    FollowedBy(i64),
}

#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Cheap connectivity probe for readiness checks.
    async fn ping(&self) -> Result<()>;

    async fn create_author(&self, username: &str) -> Result<Author>;
    async fn find_author_by_id(&self, author_id: i64) -> Result<Option<Author>>;
    async fn find_author_by_username(&self, username: &str) -> Result<Option<Author>>;

    async fn create_group(&self, group: NewGroup) -> Result<Group>;
    async fn find_group_by_id(&self, group_id: i64) -> Result<Option<Group>>;
    async fn find_group_by_slug(&self, slug: &str) -> Result<Option<Group>>;
    /// All groups ordered by title.
    async fn list_groups(&self) -> Result<Vec<Group>>;

    async fn count_posts(&self, scope: Scope) -> Result<u64>;
    async fn list_posts(&self, scope: Scope, limit: i64, offset: i64) -> Result<Vec<PostEntry>>;
    async fn find_post(&self, post_id: i64) -> Result<Option<PostEntry>>;
    /// Atomically insert a post and return it with its references resolved.
    async fn insert_post(&self, post: NewPost) -> Result<PostEntry>;
    /// Atomically apply `changes`; `None` when the post does not exist.
    async fn update_post(&self, post_id: i64, changes: PostChanges) -> Result<Option<PostEntry>>;

    /// Comments of a post, oldest first.
    async fn list_comments(&self, post_id: i64) -> Result<Vec<CommentEntry>>;
    async fn insert_comment(&self, comment: NewComment) -> Result<CommentEntry>;

    /// Returns true when a new edge was stored.
    async fn insert_follow(&self, user_id: i64, author_id: i64) -> Result<bool>;
    /// Returns true when an edge was removed.
    async fn delete_follow(&self, user_id: i64, author_id: i64) -> Result<bool>;
    async fn is_following(&self, user_id: i64, author_id: i64) -> Result<bool>;
}
