//! In-process `ContentStore`.
//!
//! All state sits behind a single `RwLock`; each mutation runs under one
//! write guard, so readers never observe a half-applied create or update.
//! Foreign keys are resolved explicitly on every read and a dangling
//! reference surfaces as an internal error.
use super::{ContentStore, Scope};
use crate::error::{AppError, Result};
use crate::models::{
    Author, CommentEntry, Follow, Group, GroupRef, ImageChange, NewComment, NewGroup, NewPost,
    PostChanges, PostEntry,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct PostRecord {
    id: i64,
    author_id: i64,
    text: String,
    group_id: Option<i64>,
    image: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct CommentRecord {
    id: i64,
    post_id: i64,
    author_id: i64,
    text: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct State {
    authors: BTreeMap<i64, Author>,
    groups: BTreeMap<i64, Group>,
    posts: BTreeMap<i64, PostRecord>,
    comments: Vec<CommentRecord>,
    follows: BTreeSet<Follow>,
    last_id: i64,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn author(&self, author_id: i64) -> Result<&Author> {
        self.authors.get(&author_id).ok_or_else(|| {
            AppError::Internal(format!("dangling reference to author {}", author_id))
        })
    }

    fn group(&self, group_id: i64) -> Result<&Group> {
        self.groups.get(&group_id).ok_or_else(|| {
            AppError::Internal(format!("dangling reference to group {}", group_id))
        })
    }

    fn require_group(&self, group_id: Option<i64>) -> Result<()> {
        match group_id {
            Some(id) if !self.groups.contains_key(&id) => Err(AppError::ValidationError(
                format!("group {} does not exist", id),
            )),
            _ => Ok(()),
        }
    }

    fn in_scope(&self, post: &PostRecord, scope: Scope) -> bool {
        match scope {
            Scope::All => true,
            Scope::Group(group_id) => post.group_id == Some(group_id),
            Scope::Author(author_id) => post.author_id == author_id,
            Scope::FollowedBy(user_id) => self.follows.contains(&Follow {
                user_id,
                author_id: post.author_id,
            }),
        }
    }

    fn entry(&self, post: &PostRecord) -> Result<PostEntry> {
        let author = self.author(post.author_id)?;
        let group = match post.group_id {
            Some(group_id) => Some(GroupRef::from(self.group(group_id)?)),
            None => None,
        };

        Ok(PostEntry {
            id: post.id,
            text: post.text.clone(),
            created_at: post.created_at,
            image: post.image.clone(),
            author: author.to_ref(),
            group,
        })
    }

    fn comment_entry(&self, comment: &CommentRecord) -> Result<CommentEntry> {
        Ok(CommentEntry {
            id: comment.id,
            post_id: comment.post_id,
            text: comment.text.clone(),
            created_at: comment.created_at,
            author: self.author(comment.author_id)?.to_ref(),
        })
    }
}

#[derive(Debug, Default)]
pub struct MemoryContentStore {
    state: RwLock<State>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn create_author(&self, username: &str) -> Result<Author> {
        let mut state = self.state.write().await;
        if state.authors.values().any(|a| a.username == username) {
            return Err(AppError::Conflict(format!(
                "author '{}' already exists",
                username
            )));
        }

        let author = Author {
            id: state.next_id(),
            username: username.to_string(),
        };
        state.authors.insert(author.id, author.clone());
        Ok(author)
    }

    async fn find_author_by_id(&self, author_id: i64) -> Result<Option<Author>> {
        Ok(self.state.read().await.authors.get(&author_id).cloned())
    }

    async fn find_author_by_username(&self, username: &str) -> Result<Option<Author>> {
        let state = self.state.read().await;
        Ok(state
            .authors
            .values()
            .find(|a| a.username == username)
            .cloned())
    }

    async fn create_group(&self, group: NewGroup) -> Result<Group> {
        let mut state = self.state.write().await;
        if state.groups.values().any(|g| g.slug == group.slug) {
            return Err(AppError::Conflict(format!(
                "group '{}' already exists",
                group.slug
            )));
        }

        let group = Group {
            id: state.next_id(),
            title: group.title,
            slug: group.slug,
            description: group.description,
        };
        state.groups.insert(group.id, group.clone());
        Ok(group)
    }

    async fn find_group_by_id(&self, group_id: i64) -> Result<Option<Group>> {
        Ok(self.state.read().await.groups.get(&group_id).cloned())
    }

    async fn find_group_by_slug(&self, slug: &str) -> Result<Option<Group>> {
        let state = self.state.read().await;
        Ok(state.groups.values().find(|g| g.slug == slug).cloned())
    }

    async fn list_groups(&self) -> Result<Vec<Group>> {
        let state = self.state.read().await;
        let mut groups: Vec<Group> = state.groups.values().cloned().collect();
        groups.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        Ok(groups)
    }

    async fn count_posts(&self, scope: Scope) -> Result<u64> {
        let state = self.state.read().await;
        Ok(state
            .posts
            .values()
            .filter(|p| state.in_scope(p, scope))
            .count() as u64)
    }

    async fn list_posts(&self, scope: Scope, limit: i64, offset: i64) -> Result<Vec<PostEntry>> {
        let state = self.state.read().await;
        let mut posts: Vec<&PostRecord> = state
            .posts
            .values()
            .filter(|p| state.in_scope(p, scope))
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        posts
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .map(|p| state.entry(p))
            .collect()
    }

    async fn find_post(&self, post_id: i64) -> Result<Option<PostEntry>> {
        let state = self.state.read().await;
        state.posts.get(&post_id).map(|p| state.entry(p)).transpose()
    }

    async fn insert_post(&self, post: NewPost) -> Result<PostEntry> {
        let mut state = self.state.write().await;
        state.author(post.author_id)?;
        state.require_group(post.group_id)?;

        let record = PostRecord {
            id: state.next_id(),
            author_id: post.author_id,
            text: post.text,
            group_id: post.group_id,
            image: post.image,
            created_at: Utc::now(),
        };
        let entry = state.entry(&record)?;
        state.posts.insert(record.id, record);
        Ok(entry)
    }

    async fn update_post(&self, post_id: i64, changes: PostChanges) -> Result<Option<PostEntry>> {
        let mut state = self.state.write().await;
        state.require_group(changes.group_id)?;

        let Some(record) = state.posts.get_mut(&post_id) else {
            return Ok(None);
        };

        record.text = changes.text;
        record.group_id = changes.group_id;
        match changes.image {
            ImageChange::Keep => {}
            ImageChange::Replace(key) => record.image = Some(key),
            ImageChange::Clear => record.image = None,
        }

        let record = record.clone();
        state.entry(&record).map(Some)
    }

    async fn list_comments(&self, post_id: i64) -> Result<Vec<CommentEntry>> {
        let state = self.state.read().await;
        let mut comments: Vec<&CommentRecord> = state
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        comments
            .into_iter()
            .map(|c| state.comment_entry(c))
            .collect()
    }

    async fn insert_comment(&self, comment: NewComment) -> Result<CommentEntry> {
        let mut state = self.state.write().await;
        if !state.posts.contains_key(&comment.post_id) {
            return Err(AppError::post_not_found(comment.post_id));
        }
        state.author(comment.author_id)?;

        let record = CommentRecord {
            id: state.next_id(),
            post_id: comment.post_id,
            author_id: comment.author_id,
            text: comment.text,
            created_at: Utc::now(),
        };
        let entry = state.comment_entry(&record)?;
        state.comments.push(record);
        Ok(entry)
    }

    async fn insert_follow(&self, user_id: i64, author_id: i64) -> Result<bool> {
        if user_id == author_id {
            return Err(AppError::ValidationError(
                "authors cannot follow themselves".to_string(),
            ));
        }

        let mut state = self.state.write().await;
        state.author(user_id)?;
        state.author(author_id)?;
        Ok(state.follows.insert(Follow { user_id, author_id }))
    }

    async fn delete_follow(&self, user_id: i64, author_id: i64) -> Result<bool> {
        let mut state = self.state.write().await;
        Ok(state.follows.remove(&Follow { user_id, author_id }))
    }

    async fn is_following(&self, user_id: i64, author_id: i64) -> Result<bool> {
        let state = self.state.read().await;
        Ok(state.follows.contains(&Follow { user_id, author_id }))
    }
}
