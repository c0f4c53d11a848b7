//! PostgreSQL-backed `ContentStore`.
use super::{ContentStore, Scope};
use crate::error::Result;
use crate::models::{
    Author, CommentEntry, CommentRow, Group, ImageChange, NewComment, NewGroup, NewPost,
    PostChanges, PostEntry, PostRow,
};
use async_trait::async_trait;
use sqlx::migrate::Migrator;
use sqlx::{PgPool, Postgres, QueryBuilder};

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

const SERVICE_NAME: &str = "yatube-service";

macro_rules! post_select {
    () => {
        r#"
        SELECT p.id, p.text, p.created_at, p.image,
               p.author_id, a.username AS author_username,
               p.group_id, g.slug AS group_slug, g.title AS group_title
        FROM posts p
        JOIN authors a ON a.id = p.author_id
        LEFT JOIN post_groups g ON g.id = p.group_id
        "#
    };
}

#[derive(Clone)]
pub struct PgContentStore {
    pool: PgPool,
}

impl PgContentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<()> {
        db_pool::run_migrations(&self.pool, &MIGRATOR).await?;
        Ok(())
    }
}

fn push_scope(qb: &mut QueryBuilder<'_, Postgres>, scope: Scope) {
    match scope {
        Scope::All => {}
        Scope::Group(group_id) => {
            qb.push(" WHERE p.group_id = ").push_bind(group_id);
        }
        Scope::Author(author_id) => {
            qb.push(" WHERE p.author_id = ").push_bind(author_id);
        }
        Scope::FollowedBy(user_id) => {
            qb.push(" WHERE p.author_id IN (SELECT f.author_id FROM follows f WHERE f.user_id = ")
                .push_bind(user_id)
                .push(")");
        }
    }
}

#[async_trait]
impl ContentStore for PgContentStore {
    async fn ping(&self) -> Result<()> {
        let mut conn = db_pool::acquire_with_metrics(&self.pool, SERVICE_NAME).await?;
        sqlx::query("SELECT 1").execute(&mut *conn).await?;
        Ok(())
    }

    async fn create_author(&self, username: &str) -> Result<Author> {
        let author = sqlx::query_as::<_, Author>(
            r#"
            INSERT INTO authors (username)
            VALUES ($1)
            RETURNING id, username
            "#,
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await?;

        Ok(author)
    }

    async fn find_author_by_id(&self, author_id: i64) -> Result<Option<Author>> {
        let author = sqlx::query_as::<_, Author>("SELECT id, username FROM authors WHERE id = $1")
            .bind(author_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(author)
    }

    async fn find_author_by_username(&self, username: &str) -> Result<Option<Author>> {
        let author =
            sqlx::query_as::<_, Author>("SELECT id, username FROM authors WHERE username = $1")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;

        Ok(author)
    }

    async fn create_group(&self, group: NewGroup) -> Result<Group> {
        let group = sqlx::query_as::<_, Group>(
            r#"
            INSERT INTO post_groups (title, slug, description)
            VALUES ($1, $2, $3)
            RETURNING id, title, slug, description
            "#,
        )
        .bind(&group.title)
        .bind(&group.slug)
        .bind(&group.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(group)
    }

    async fn find_group_by_id(&self, group_id: i64) -> Result<Option<Group>> {
        let group = sqlx::query_as::<_, Group>(
            "SELECT id, title, slug, description FROM post_groups WHERE id = $1",
        )
        .bind(group_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(group)
    }

    async fn find_group_by_slug(&self, slug: &str) -> Result<Option<Group>> {
        let group = sqlx::query_as::<_, Group>(
            "SELECT id, title, slug, description FROM post_groups WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(group)
    }

    async fn list_groups(&self) -> Result<Vec<Group>> {
        let groups = sqlx::query_as::<_, Group>(
            "SELECT id, title, slug, description FROM post_groups ORDER BY title, id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(groups)
    }

    async fn count_posts(&self, scope: Scope) -> Result<u64> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM posts p");
        push_scope(&mut qb, scope);

        let (count,): (i64,) = qb.build_query_as().fetch_one(&self.pool).await?;
        Ok(count.max(0) as u64)
    }

    async fn list_posts(&self, scope: Scope, limit: i64, offset: i64) -> Result<Vec<PostEntry>> {
        let mut qb = QueryBuilder::<Postgres>::new(post_select!());
        push_scope(&mut qb, scope);
        qb.push(" ORDER BY p.created_at DESC, p.id DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let rows: Vec<PostRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(PostEntry::from).collect())
    }

    async fn find_post(&self, post_id: i64) -> Result<Option<PostEntry>> {
        let row = sqlx::query_as::<_, PostRow>(concat!(post_select!(), " WHERE p.id = $1"))
            .bind(post_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(PostEntry::from))
    }

    async fn insert_post(&self, post: NewPost) -> Result<PostEntry> {
        let mut tx = self.pool.begin().await?;

        let (post_id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO posts (author_id, text, group_id, image)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(post.author_id)
        .bind(&post.text)
        .bind(post.group_id)
        .bind(&post.image)
        .fetch_one(&mut *tx)
        .await?;

        let row = sqlx::query_as::<_, PostRow>(concat!(post_select!(), " WHERE p.id = $1"))
            .bind(post_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    async fn update_post(&self, post_id: i64, changes: PostChanges) -> Result<Option<PostEntry>> {
        let mut tx = self.pool.begin().await?;

        let current: Option<(Option<String>,)> =
            sqlx::query_as("SELECT image FROM posts WHERE id = $1 FOR UPDATE")
                .bind(post_id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some((current_image,)) = current else {
            return Ok(None);
        };

        let image = match changes.image {
            ImageChange::Keep => current_image,
            ImageChange::Replace(key) => Some(key),
            ImageChange::Clear => None,
        };

        sqlx::query(
            r#"
            UPDATE posts
            SET text = $1, group_id = $2, image = $3
            WHERE id = $4
            "#,
        )
        .bind(&changes.text)
        .bind(changes.group_id)
        .bind(&image)
        .bind(post_id)
        .execute(&mut *tx)
        .await?;

        let row = sqlx::query_as::<_, PostRow>(concat!(post_select!(), " WHERE p.id = $1"))
            .bind(post_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(row.into()))
    }

    async fn list_comments(&self, post_id: i64) -> Result<Vec<CommentEntry>> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT c.id, c.post_id, c.text, c.created_at,
                   c.author_id, a.username AS author_username
            FROM comments c
            JOIN authors a ON a.id = c.author_id
            WHERE c.post_id = $1
            ORDER BY c.created_at ASC, c.id ASC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CommentEntry::from).collect())
    }

    async fn insert_comment(&self, comment: NewComment) -> Result<CommentEntry> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            WITH inserted AS (
                INSERT INTO comments (post_id, author_id, text)
                VALUES ($1, $2, $3)
                RETURNING id, post_id, author_id, text, created_at
            )
            SELECT c.id, c.post_id, c.text, c.created_at,
                   c.author_id, a.username AS author_username
            FROM inserted c
            JOIN authors a ON a.id = c.author_id
            "#,
        )
        .bind(comment.post_id)
        .bind(comment.author_id)
        .bind(&comment.text)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn insert_follow(&self, user_id: i64, author_id: i64) -> Result<bool> {
        let inserted = sqlx::query_as::<_, (i64,)>(
            r#"
            INSERT INTO follows (user_id, author_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, author_id) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(author_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(inserted.is_some())
    }

    async fn delete_follow(&self, user_id: i64, author_id: i64) -> Result<bool> {
        let affected = sqlx::query("DELETE FROM follows WHERE user_id = $1 AND author_id = $2")
            .bind(user_id)
            .bind(author_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(affected > 0)
    }

    async fn is_following(&self, user_id: i64, author_id: i64) -> Result<bool> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM follows WHERE user_id = $1 AND author_id = $2)",
        )
        .bind(user_id)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}
