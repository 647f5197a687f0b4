use async_trait::async_trait;
use sqlx::{Postgres, Transaction};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    models::posts::{NewPost, Post, PostChanges},
    Result,
};

use super::PostgresRepo;

#[async_trait]
pub trait PostsRepository: Sync + Send {
    async fn get_all_posts(&self) -> Result<Vec<Post>>;
    async fn get_post_by_id(&self, post_id: Uuid) -> Result<Option<Post>>;
    async fn get_posts_by_tag_name(&self, tag_name: &str) -> Result<Vec<Post>>;
    /// `Ok(None)` means the store accepted the call but produced no post.
    async fn create_post(&self, new_post: NewPost) -> Result<Option<Post>>;
    /// `Ok(None)` when no post has `post_id`.
    async fn update_post(&self, post_id: Uuid, changes: PostChanges) -> Result<Option<Post>>;
}

const SELECT_POSTS: &str = r#"
    SELECT p.id, p.title, p.content, p.author_id, p.active, p.created_at,
           COALESCE(
               array_agg(t.name ORDER BY pt.position) FILTER (WHERE t.id IS NOT NULL),
               '{}'::text[]
           ) AS tags
    FROM posts p
    LEFT JOIN post_tags pt ON pt.post_id = p.id
    LEFT JOIN tags t ON t.id = pt.tag_id
"#;

async fn replace_tags(
    tx: &mut Transaction<'_, Postgres>,
    post_id: Uuid,
    tags: &[String],
) -> Result<()> {
    sqlx::query("DELETE FROM post_tags WHERE post_id = $1")
        .bind(post_id)
        .execute(&mut **tx)
        .await?;

    for (position, name) in tags.iter().enumerate() {
        let tag_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO tags (id, name)
            VALUES ($1, $2)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(name)
        .fetch_one(&mut **tx)
        .await?;

        sqlx::query("INSERT INTO post_tags (post_id, tag_id, position) VALUES ($1, $2, $3)")
            .bind(post_id)
            .bind(tag_id)
            .bind(position as i32)
            .execute(&mut **tx)
            .await?;
    }

    Ok(())
}

#[async_trait]
impl PostsRepository for PostgresRepo {
    #[instrument(skip(self))]
    async fn get_all_posts(&self) -> Result<Vec<Post>> {
        let sql = format!("{SELECT_POSTS} GROUP BY p.id ORDER BY p.created_at, p.id");

        let posts = sqlx::query_as::<_, Post>(&sql)
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(count = posts.len(), "Fetched posts");
        Ok(posts)
    }

    #[instrument(skip(self))]
    async fn get_post_by_id(&self, post_id: Uuid) -> Result<Option<Post>> {
        let sql = format!("{SELECT_POSTS} WHERE p.id = $1 GROUP BY p.id");

        let post = sqlx::query_as::<_, Post>(&sql)
            .bind(post_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(post)
    }

    #[instrument(skip(self))]
    async fn get_posts_by_tag_name(&self, tag_name: &str) -> Result<Vec<Post>> {
        let sql = format!(
            r#"{SELECT_POSTS}
            WHERE p.id IN (
                SELECT tagged.post_id
                FROM post_tags tagged
                JOIN tags tag ON tag.id = tagged.tag_id
                WHERE tag.name = $1
            )
            GROUP BY p.id
            ORDER BY p.created_at, p.id"#
        );

        let posts = sqlx::query_as::<_, Post>(&sql)
            .bind(tag_name)
            .fetch_all(&self.pool)
            .await?;

        Ok(posts)
    }

    #[instrument(skip(self, new_post), fields(author_id = %new_post.author_id))]
    async fn create_post(&self, new_post: NewPost) -> Result<Option<Post>> {
        let mut tx = self.pool.begin().await?;

        let post_id: Option<Uuid> = sqlx::query_scalar(
            r#"
            INSERT INTO posts (id, author_id, title, content)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(new_post.author_id)
        .bind(&new_post.title)
        .bind(&new_post.content)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(post_id) = post_id else {
            tx.rollback().await?;
            tracing::warn!("Insert returned no post");
            return Ok(None);
        };

        if let Some(tags) = &new_post.tags {
            replace_tags(&mut tx, post_id, tags).await?;
        }

        tx.commit().await?;

        self.get_post_by_id(post_id).await
    }

    #[instrument(skip(self))]
    async fn update_post(&self, post_id: Uuid, changes: PostChanges) -> Result<Option<Post>> {
        let mut tx = self.pool.begin().await?;

        let updated: Option<Uuid> = sqlx::query_scalar(
            r#"
            UPDATE posts
            SET title = COALESCE($2, title),
                content = COALESCE($3, content),
                active = COALESCE($4, active)
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(post_id)
        .bind(changes.title.as_deref())
        .bind(changes.content.as_deref())
        .bind(changes.active)
        .fetch_optional(&mut *tx)
        .await?;

        if updated.is_none() {
            tx.rollback().await?;
            return Ok(None);
        }

        if let Some(tags) = &changes.tags {
            replace_tags(&mut tx, post_id, tags).await?;
        }

        tx.commit().await?;

        self.get_post_by_id(post_id).await
    }
}
