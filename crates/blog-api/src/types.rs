//! Wire types for the blog API.
//!
//! Field names mirror the server's JSON (`_id`, `createdAt`); the structs
//! rename them to Rust conventions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The authenticated user's profile plus bearer credential.
///
/// Returned by the register and login endpoints. The `token` is an opaque
/// server-issued string; the client attaches it to requests and never parses
/// it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// User ID.
    #[serde(rename = "_id")]
    pub id: String,
    /// Username.
    pub username: String,
    /// Email address (not always echoed by the server).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Opaque bearer credential.
    pub token: String,
    /// Display name (optional).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Profile returned by `GET /api/auth/me`.
///
/// Carries no credential; used for ownership checks against a post's author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User ID.
    #[serde(rename = "_id")]
    pub id: String,
    /// Username.
    pub username: String,
    /// Email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// A post's author as the server serializes it.
///
/// The server sometimes embeds a user summary and sometimes sends a bare ID
/// string, depending on whether the query populated the reference. Both
/// forms must be accepted; `Author::id` normalizes for ownership checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Author {
    /// Embedded user summary.
    Embedded {
        /// Author's user ID.
        #[serde(rename = "_id")]
        id: String,
        /// Author's username.
        username: String,
    },
    /// Bare user ID reference.
    Id(String),
}

impl Author {
    /// The author's user ID, regardless of wire form.
    pub fn id(&self) -> &str {
        match self {
            Self::Embedded { id, .. } => id,
            Self::Id(id) => id,
        }
    }

    /// The author's username, if the server embedded it.
    pub fn username(&self) -> Option<&str> {
        match self {
            Self::Embedded { username, .. } => Some(username),
            Self::Id(_) => None,
        }
    }
}

/// A blog post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Post ID, stable and unique within a loaded collection.
    #[serde(rename = "_id")]
    pub id: String,
    /// Title.
    pub title: String,
    /// Formatted body text; opaque to the client.
    pub content: String,
    /// Author, embedded or referenced.
    pub author: Author,
    /// Server-side creation timestamp.
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// View counter, server-maintained; the client never increments it.
    #[serde(default)]
    pub views: u64,
}

/// Request body for `POST /api/auth/register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterPayload {
    /// Desired username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Password (validated client-side before submission).
    pub password: String,
}

/// Request body for `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginPayload {
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
}

/// Request body for creating or updating a post.
#[derive(Debug, Clone, Serialize)]
pub struct PostPayload {
    /// Title; required non-empty.
    pub title: String,
    /// Formatted body text; required non-empty.
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_deserializes_server_field_names() {
        let json = r#"{"_id":"u1","username":"a","token":"tok"}"#;
        let identity: Identity = serde_json::from_str(json).unwrap();
        assert_eq!(identity.id, "u1");
        assert_eq!(identity.username, "a");
        assert_eq!(identity.token, "tok");
        assert!(identity.email.is_none());
    }

    #[test]
    fn identity_roundtrips_through_json() {
        let identity = Identity {
            id: "u1".to_string(),
            username: "a".to_string(),
            email: Some("a@b.com".to_string()),
            token: "tok".to_string(),
            name: None,
        };
        let json = serde_json::to_string(&identity).unwrap();
        assert!(json.contains("\"_id\":\"u1\""));
        let back: Identity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, identity);
    }

    #[test]
    fn author_accepts_embedded_form() {
        let json = r#"{"_id":"u1","username":"alice"}"#;
        let author: Author = serde_json::from_str(json).unwrap();
        assert_eq!(author.id(), "u1");
        assert_eq!(author.username(), Some("alice"));
    }

    #[test]
    fn author_accepts_bare_id_form() {
        let author: Author = serde_json::from_str(r#""u1""#).unwrap();
        assert_eq!(author.id(), "u1");
        assert_eq!(author.username(), None);
    }

    #[test]
    fn post_defaults_views_to_zero() {
        let json = r#"{"_id":"p1","title":"t","content":"c","author":"u1"}"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.views, 0);
        assert!(post.created_at.is_none());
    }

    #[test]
    fn post_parses_full_server_shape() {
        let json = r#"{
            "_id": "p1",
            "title": "Hello",
            "content": "<p>world</p>",
            "author": {"_id": "u1", "username": "alice"},
            "createdAt": "2024-03-01T12:00:00Z",
            "views": 7
        }"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.author.id(), "u1");
        assert_eq!(post.views, 7);
        assert!(post.created_at.is_some());
    }
}
