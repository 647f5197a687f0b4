use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::tags::split_tags;

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone, PartialEq)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(rename = "authorId")]
    pub author_id: Uuid,
    pub active: bool,
    pub tags: Vec<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostDto {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Title must be between 1 and 255 characters"
    ))]
    pub title: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    pub tags: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdatePostDto {
    #[validate(length(max = 255, message = "Title must be at most 255 characters"))]
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<String>,
}

/// Payload handed to the repository when creating a post.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub tags: Option<Vec<String>>,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub active: Option<bool>,
}

impl CreatePostDto {
    pub fn into_new_post(self, author_id: Uuid) -> NewPost {
        let tags = split_tags(self.tags.as_deref().unwrap_or(""));

        NewPost {
            author_id,
            title: self.title,
            content: self.content,
            tags: (!tags.is_empty()).then_some(tags),
        }
    }
}

impl UpdatePostDto {
    pub fn into_changes(self) -> PostChanges {
        let tags = self
            .tags
            .map(|raw| split_tags(&raw))
            .filter(|tags| !tags.is_empty());

        PostChanges {
            title: self.title.filter(|title| !title.is_empty()),
            content: self.content.filter(|content| !content.is_empty()),
            tags,
            active: None,
        }
    }
}

impl PostChanges {
    pub fn deactivate() -> Self {
        Self {
            active: Some(false),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_dto(tags: Option<&str>) -> CreatePostDto {
        CreatePostDto {
            title: "T".to_string(),
            content: "C".to_string(),
            tags: tags.map(str::to_string),
        }
    }

    #[test]
    fn blank_tags_are_left_out_of_new_post() {
        let author = Uuid::now_v7();
        assert_eq!(create_dto(None).into_new_post(author).tags, None);
        assert_eq!(create_dto(Some("")).into_new_post(author).tags, None);
        assert_eq!(create_dto(Some("  \t ")).into_new_post(author).tags, None);
    }

    #[test]
    fn new_post_carries_author_and_split_tags() {
        let author = Uuid::now_v7();
        let new_post = create_dto(Some("x y")).into_new_post(author);

        assert_eq!(new_post.author_id, author);
        assert_eq!(new_post.title, "T");
        assert_eq!(new_post.content, "C");
        assert_eq!(new_post.tags, Some(vec!["x".to_string(), "y".to_string()]));
    }

    #[test]
    fn empty_fields_are_dropped_from_changes() {
        let changes = UpdatePostDto {
            title: Some(String::new()),
            content: Some(String::new()),
            tags: Some("z".to_string()),
        }
        .into_changes();

        assert_eq!(
            changes,
            PostChanges {
                tags: Some(vec!["z".to_string()]),
                ..PostChanges::default()
            }
        );
    }

    #[test]
    fn whitespace_tags_do_not_clear_existing_tags() {
        let changes = UpdatePostDto {
            title: Some("New".to_string()),
            content: None,
            tags: Some("   ".to_string()),
        }
        .into_changes();

        assert_eq!(changes.title.as_deref(), Some("New"));
        assert_eq!(changes.tags, None);
    }

    #[test]
    fn update_dto_rejects_overlong_title() {
        let dto = UpdatePostDto {
            title: Some("t".repeat(256)),
            ..UpdatePostDto::default()
        };
        assert!(dto.validate().is_err());

        let dto = UpdatePostDto {
            title: Some("t".repeat(255)),
            ..UpdatePostDto::default()
        };
        assert!(dto.validate().is_ok());
        assert!(UpdatePostDto::default().validate().is_ok());
    }

    #[test]
    fn create_dto_rejects_empty_title() {
        let mut dto = create_dto(None);
        dto.title = String::new();
        assert!(dto.validate().is_err());
        assert!(create_dto(None).validate().is_ok());
    }
}
