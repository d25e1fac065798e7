//! Records read from and written to the store.
//!
//! Field names match the column names of the `posts`, `persons` and
//! `engagements` tables so the structs (de)serialize straight from the REST
//! payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const ENGAGEMENT_TYPE_REACTION: &str = "reaction";
pub const REACTION_TYPE_LIKE: &str = "like";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub tenant_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: Uuid,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub engagement_score: Option<f64>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub tenant_id: Option<Uuid>,
}

impl Person {
    /// Name for progress and error output; falls back to the id when unnamed.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self.id.to_string(),
        }
    }
}

/// Insert payload for the `engagements` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEngagement {
    pub post_id: Uuid,
    pub person_id: Uuid,
    pub engagement_type: String,
    pub reaction_type: String,
    pub engaged_at: DateTime<Utc>,
    pub tenant_id: Uuid,
}

impl NewEngagement {
    /// An inferred "like" reaction by `person` on `post`, dated at the
    /// person's creation time.
    #[must_use]
    pub fn inferred_like(post: &Post, person: &Person, tenant_id: Uuid) -> Self {
        Self {
            post_id: post.id,
            person_id: person.id,
            engagement_type: ENGAGEMENT_TYPE_REACTION.to_string(),
            reaction_type: REACTION_TYPE_LIKE.to_string(),
            engaged_at: person.created_at,
            tenant_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_deserializes_from_projection() {
        let post: Post = serde_json::from_value(serde_json::json!({
            "id": "0b8f7c5e-2d0a-4a57-9d39-0f5b6c1a2e01",
            "linkedin_url": "https://www.linkedin.com/posts/example-activity-1",
            "created_at": "2025-06-18T09:30:00.123456+00:00"
        }))
        .expect("post should parse");
        assert_eq!(
            post.linkedin_url.as_deref(),
            Some("https://www.linkedin.com/posts/example-activity-1")
        );
        assert!(post.tenant_id.is_none());
    }

    #[test]
    fn person_accepts_integer_and_null_fields() {
        let person: Person = serde_json::from_value(serde_json::json!({
            "id": "7c9e6679-7425-40de-944b-e07fc1f90ae7",
            "name": null,
            "engagement_score": 3,
            "created_at": "2025-06-18T10:00:00Z"
        }))
        .expect("person should parse");
        assert_eq!(person.engagement_score, Some(3.0));
        assert_eq!(person.display_name(), "7c9e6679-7425-40de-944b-e07fc1f90ae7");
    }

    #[test]
    fn inferred_like_copies_person_timestamp() {
        let created_at = "2025-06-18T10:00:00Z".parse().unwrap();
        let post = Post {
            id: Uuid::new_v4(),
            linkedin_url: None,
            created_at: "2025-06-18T09:00:00Z".parse().unwrap(),
            tenant_id: None,
        };
        let person = Person {
            id: Uuid::new_v4(),
            name: Some("Ada Lovelace".to_string()),
            engagement_score: Some(1.0),
            created_at,
            tenant_id: None,
        };
        let tenant = Uuid::nil();

        let engagement = NewEngagement::inferred_like(&post, &person, tenant);

        assert_eq!(engagement.post_id, post.id);
        assert_eq!(engagement.person_id, person.id);
        assert_eq!(engagement.engagement_type, "reaction");
        assert_eq!(engagement.reaction_type, "like");
        assert_eq!(engagement.engaged_at, created_at);
        assert_eq!(engagement.tenant_id, tenant);

        let body = serde_json::to_value(&engagement).unwrap();
        assert_eq!(body["engaged_at"], "2025-06-18T10:00:00Z");
    }
}
