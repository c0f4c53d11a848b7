/// Data models for yatube-service
///
/// This module defines structures for:
/// - Author: identity with a unique username
/// - Group: topical bucket posts may belong to
/// - PostEntry: a post together with its author and group references
/// - CommentEntry: a comment together with its author reference
/// - Follow: directed follower -> author edge
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Author {
    pub id: i64,
    pub username: String,
}

impl Author {
    pub fn to_ref(&self) -> AuthorRef {
        AuthorRef {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

/// Lightweight author reference embedded in posts, comments and the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRef {
    pub id: i64,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Group {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
}

/// Group reference embedded in listed posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRef {
    pub id: i64,
    pub slug: String,
    pub title: String,
}

impl From<&Group> for GroupRef {
    fn from(group: &Group) -> Self {
        GroupRef {
            id: group.id,
            slug: group.slug.clone(),
            title: group.title.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewGroup {
    pub title: String,
    pub slug: String,
    pub description: String,
}

/// A post as shown in feeds and on the detail page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostEntry {
    pub id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub image: Option<String>,
    pub author: AuthorRef,
    pub group: Option<GroupRef>,
}

/// Flat row shape produced by the posts/authors/groups join.
#[derive(Debug, sqlx::FromRow)]
pub struct PostRow {
    pub id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub image: Option<String>,
    pub author_id: i64,
    pub author_username: String,
    pub group_id: Option<i64>,
    pub group_slug: Option<String>,
    pub group_title: Option<String>,
}

impl From<PostRow> for PostEntry {
    fn from(row: PostRow) -> Self {
        let group = match (row.group_id, row.group_slug, row.group_title) {
            (Some(id), Some(slug), Some(title)) => Some(GroupRef { id, slug, title }),
            _ => None,
        };

        PostEntry {
            id: row.id,
            text: row.text,
            created_at: row.created_at,
            image: row.image,
            author: AuthorRef {
                id: row.author_id,
                username: row.author_username,
            },
            group,
        }
    }
}

/// Validated values for a new post. The author always comes from the caller.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub author_id: i64,
    pub text: String,
    pub group_id: Option<i64>,
    pub image: Option<String>,
}

/// How an edit treats the stored image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageChange {
    Keep,
    Replace(String),
    Clear,
}

/// Validated values for an edit. Author and creation time are never touched.
#[derive(Debug, Clone)]
pub struct PostChanges {
    pub text: String,
    pub group_id: Option<i64>,
    pub image: ImageChange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentEntry {
    pub id: i64,
    pub post_id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub author: AuthorRef,
}

#[derive(Debug, sqlx::FromRow)]
pub struct CommentRow {
    pub id: i64,
    pub post_id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub author_id: i64,
    pub author_username: String,
}

impl From<CommentRow> for CommentEntry {
    fn from(row: CommentRow) -> Self {
        CommentEntry {
            id: row.id,
            post_id: row.post_id,
            text: row.text,
            created_at: row.created_at,
            author: AuthorRef {
                id: row.author_id,
                username: row.author_username,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: i64,
    pub author_id: i64,
    pub text: String,
}

/// Directed edge: `user_id` follows `author_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Follow {
    pub user_id: i64,
    pub author_id: i64,
}
