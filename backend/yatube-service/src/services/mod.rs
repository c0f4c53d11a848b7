/// Business logic layer for yatube-service
///
/// This module provides high-level operations:
/// - Feed service: paginated listings for the global, group, author and
///   followed-authors scopes
/// - Post service: post detail, creation and author-only updates
/// - Comment service: appending comments to posts
/// - Follow service: follow edges between authors
///
/// Services hold an `Arc<dyn ContentStore>` and never cache; every call
/// reads through to the store.
pub mod comments;
pub mod feed;
pub mod follows;
pub mod posts;

pub use comments::CommentService;
pub use feed::FeedService;
pub use follows::FollowService;
pub use posts::{PostDetail, PostService};
