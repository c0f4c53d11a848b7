/// Post service - post detail, creation and author-only updates
use crate::db::{ContentStore, Scope};
use crate::error::{AppError, Result};
use crate::forms::CleanedPost;
use crate::metrics::content::POST_WRITES_TOTAL;
use crate::models::{AuthorRef, CommentEntry, Group, NewPost, PostChanges, PostEntry};
use std::sync::Arc;

/// Everything the post detail page shows besides the comment form.
#[derive(Debug, Clone)]
pub struct PostDetail {
    pub post: PostEntry,
    pub author_posts_count: u64,
    pub comments: Vec<CommentEntry>,
}

pub struct PostService {
    store: Arc<dyn ContentStore>,
}

impl PostService {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Get a post by ID
    pub async fn get_post(&self, post_id: i64) -> Result<PostEntry> {
        self.store
            .find_post(post_id)
            .await?
            .ok_or_else(|| AppError::post_not_found(post_id))
    }

    pub async fn detail(&self, post_id: i64) -> Result<PostDetail> {
        let post = self.get_post(post_id).await?;
        let author_posts_count = self.store.count_posts(Scope::Author(post.author.id)).await?;
        let comments = self.store.list_comments(post_id).await?;

        Ok(PostDetail {
            post,
            author_posts_count,
            comments,
        })
    }

    /// Groups offered by the post form, ordered by title.
    pub async fn group_choices(&self) -> Result<Vec<Group>> {
        self.store.list_groups().await
    }

    /// Create a post authored by `author`.
    pub async fn create_post(&self, author: &AuthorRef, cleaned: CleanedPost) -> Result<PostEntry> {
        let image = cleaned.new_image();
        let post = self
            .store
            .insert_post(NewPost {
                author_id: author.id,
                text: cleaned.text,
                group_id: cleaned.group_id,
                image,
            })
            .await?;

        POST_WRITES_TOTAL.with_label_values(&["create"]).inc();
        tracing::info!(post_id = post.id, author = %author.username, "post created");
        Ok(post)
    }

    /// Apply an edit. Permission is checked by the caller.
    pub async fn update_post(&self, post_id: i64, cleaned: CleanedPost) -> Result<PostEntry> {
        let post = self
            .store
            .update_post(
                post_id,
                PostChanges {
                    text: cleaned.text,
                    group_id: cleaned.group_id,
                    image: cleaned.image,
                },
            )
            .await?
            .ok_or_else(|| AppError::post_not_found(post_id))?;

        POST_WRITES_TOTAL.with_label_values(&["update"]).inc();
        tracing::info!(post_id = post.id, author = %post.author.username, "post updated");
        Ok(post)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryContentStore;
    use crate::models::{ImageChange, NewComment, NewGroup};

    async fn setup() -> (PostService, Arc<dyn ContentStore>, AuthorRef, Group) {
        let store: Arc<dyn ContentStore> = Arc::new(MemoryContentStore::new());
        let author = store.create_author("leo").await.unwrap().to_ref();
        let group = store
            .create_group(NewGroup {
                title: "Cats".into(),
                slug: "cats".into(),
                description: String::new(),
            })
            .await
            .unwrap();
        (PostService::new(store.clone()), store, author, group)
    }

    fn cleaned(text: &str, group_id: Option<i64>, image: ImageChange) -> CleanedPost {
        CleanedPost {
            text: text.into(),
            group_id,
            image,
        }
    }

    #[tokio::test]
    async fn test_create_then_detail() {
        let (service, store, author, group) = setup().await;
        let post = service
            .create_post(
                &author,
                cleaned("hello", Some(group.id), ImageChange::Replace("posts/a.jpg".into())),
            )
            .await
            .unwrap();
        assert_eq!(post.author, author);
        assert_eq!(post.image.as_deref(), Some("posts/a.jpg"));

        store
            .insert_comment(NewComment {
                post_id: post.id,
                author_id: author.id,
                text: "first!".into(),
            })
            .await
            .unwrap();

        let detail = service.detail(post.id).await.unwrap();
        assert_eq!(detail.post.id, post.id);
        assert_eq!(detail.author_posts_count, 1);
        assert_eq!(detail.comments.len(), 1);
    }

    #[tokio::test]
    async fn test_update_keeps_author_and_created_at() {
        let (service, _, author, group) = setup().await;
        let post = service
            .create_post(&author, cleaned("before", None, ImageChange::Keep))
            .await
            .unwrap();

        let updated = service
            .update_post(post.id, cleaned("after", Some(group.id), ImageChange::Keep))
            .await
            .unwrap();

        assert_eq!(updated.text, "after");
        assert_eq!(updated.group.map(|g| g.id), Some(group.id));
        assert_eq!(updated.author, post.author);
        assert_eq!(updated.created_at, post.created_at);
    }

    #[tokio::test]
    async fn test_missing_post_is_not_found() {
        let (service, _, _, _) = setup().await;
        assert!(matches!(service.detail(404).await, Err(AppError::NotFound(_))));
        assert!(matches!(
            service
                .update_post(404, cleaned("x", None, ImageChange::Keep))
                .await,
            Err(AppError::NotFound(_))
        ));
    }
}
