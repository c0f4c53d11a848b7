/// Comment service - append-only comments on posts
use crate::db::ContentStore;
use crate::error::{AppError, Result};
use crate::metrics::content::COMMENTS_CREATED_TOTAL;
use crate::models::{AuthorRef, CommentEntry, NewComment};
use std::sync::Arc;

pub struct CommentService {
    store: Arc<dyn ContentStore>,
}

impl CommentService {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Attach `text` to `post_id` on behalf of `author`.
    pub async fn add_comment(
        &self,
        post_id: i64,
        author: &AuthorRef,
        text: String,
    ) -> Result<CommentEntry> {
        if self.store.find_post(post_id).await?.is_none() {
            return Err(AppError::post_not_found(post_id));
        }

        let comment = self
            .store
            .insert_comment(NewComment {
                post_id,
                author_id: author.id,
                text,
            })
            .await
            .map_err(|e| {
                COMMENTS_CREATED_TOTAL.with_label_values(&["error"]).inc();
                e
            })?;

        COMMENTS_CREATED_TOTAL.with_label_values(&["success"]).inc();
        tracing::info!(post_id, comment_id = comment.id, author = %author.username, "comment added");
        Ok(comment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryContentStore;
    use crate::models::NewPost;

    #[tokio::test]
    async fn test_comment_on_existing_post() {
        let store: Arc<dyn ContentStore> = Arc::new(MemoryContentStore::new());
        let author = store.create_author("leo").await.unwrap().to_ref();
        let post = store
            .insert_post(NewPost {
                author_id: author.id,
                text: "hello".into(),
                group_id: None,
                image: None,
            })
            .await
            .unwrap();

        let service = CommentService::new(store.clone());
        let comment = service
            .add_comment(post.id, &author, "nice".into())
            .await
            .unwrap();
        assert_eq!(comment.author, author);
        assert_eq!(store.list_comments(post.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_comment_on_missing_post() {
        let store: Arc<dyn ContentStore> = Arc::new(MemoryContentStore::new());
        let author = store.create_author("leo").await.unwrap().to_ref();
        let service = CommentService::new(store);

        assert!(matches!(
            service.add_comment(77, &author, "hi".into()).await,
            Err(AppError::NotFound(_))
        ));
    }
}
