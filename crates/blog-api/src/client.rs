//! Reqwest-based client for the blog REST API.

use crate::error::{ApiError, ApiResult};
use crate::types::{Identity, LoginPayload, Post, PostPayload, RegisterPayload, UserProfile};
use serde::de::DeserializeOwned;

/// Client for the blog REST API.
///
/// One method per endpoint; authenticated calls take the bearer credential
/// as an argument so the client itself stays stateless.
#[derive(Clone)]
pub struct BlogApiClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl BlogApiClient {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `base_url` - Server base URL (e.g. `http://localhost:5000`); a
    ///   trailing slash is tolerated.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http_client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Build the URL for an API path.
    fn api_url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    /// Register a new account. On success the server echoes the identity,
    /// credential included.
    pub async fn register(&self, payload: &RegisterPayload) -> ApiResult<Identity> {
        let url = self.api_url("auth/register");
        tracing::debug!(username = %payload.username, "Registering account");
        let response = self.http_client.post(&url).json(payload).send().await?;
        decode(response).await
    }

    /// Log in with email and password.
    pub async fn login(&self, payload: &LoginPayload) -> ApiResult<Identity> {
        let url = self.api_url("auth/login");
        tracing::debug!(email = %payload.email, "Logging in");
        let response = self.http_client.post(&url).json(payload).send().await?;
        decode(response).await
    }

    /// Fetch the profile behind a credential.
    pub async fn current_user(&self, token: &str) -> ApiResult<UserProfile> {
        let url = self.api_url("auth/me");
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await?;
        decode(response).await
    }

    /// List all posts.
    pub async fn list_posts(&self) -> ApiResult<Vec<Post>> {
        let url = self.api_url("blogs/");
        tracing::debug!("Fetching all posts");
        let response = self.http_client.get(&url).send().await?;
        decode(response).await
    }

    /// Fetch a single post by ID.
    pub async fn get_post(&self, id: &str) -> ApiResult<Post> {
        let url = self.api_url(&format!("blogs/{}", id));
        let response = self.http_client.get(&url).send().await?;
        decode(response).await
    }

    /// List the posts owned by the credential's user.
    pub async fn list_my_posts(&self, token: &str) -> ApiResult<Vec<Post>> {
        let url = self.api_url("blogs/myblogs");
        tracing::debug!("Fetching own posts");
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await?;
        decode(response).await
    }

    /// Create a post. The server assigns the ID and echoes the full post.
    pub async fn create_post(&self, payload: &PostPayload, token: &str) -> ApiResult<Post> {
        let url = self.api_url("blogs/");
        tracing::debug!(title = %payload.title, "Creating post");
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(token)
            .json(payload)
            .send()
            .await?;
        decode(response).await
    }

    /// Update a post. The server echoes the updated post.
    pub async fn update_post(
        &self,
        id: &str,
        payload: &PostPayload,
        token: &str,
    ) -> ApiResult<Post> {
        let url = self.api_url(&format!("blogs/{}", id));
        tracing::debug!(post_id = %id, "Updating post");
        let response = self
            .http_client
            .put(&url)
            .bearer_auth(token)
            .json(payload)
            .send()
            .await?;
        decode(response).await
    }

    /// Delete a post.
    pub async fn delete_post(&self, id: &str, token: &str) -> ApiResult<()> {
        let url = self.api_url(&format!("blogs/{}", id));
        tracing::debug!(post_id = %id, "Deleting post");
        let response = self
            .http_client
            .delete(&url)
            .bearer_auth(token)
            .send()
            .await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(remote_error(response).await)
        }
    }
}

/// Decode a response body, or map a non-2xx status to `ApiError::Remote`.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
    if response.status().is_success() {
        Ok(response.json().await?)
    } else {
        Err(remote_error(response).await)
    }
}

/// Build a `Remote` error from a failed response.
///
/// The server reports failures as `{"message": "..."}`; fall back to the raw
/// body when it doesn't.
async fn remote_error(response: reqwest::Response) -> ApiError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or(body);
    tracing::debug!(status, message = %message, "Server rejected request");
    ApiError::Remote { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = BlogApiClient::new("http://localhost:5000/");
        assert_eq!(client.base_url, "http://localhost:5000");
        assert_eq!(client.api_url("blogs/"), "http://localhost:5000/api/blogs/");
    }

    #[tokio::test]
    async fn test_login_decodes_identity() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/auth/login")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"_id":"u1","username":"a","token":"tok"}"#)
            .create_async()
            .await;

        let client = BlogApiClient::new(server.url());
        let identity = client
            .login(&LoginPayload {
                email: "a@b.com".to_string(),
                password: "secret1".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(identity.id, "u1");
        assert_eq!(identity.token, "tok");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_login_rejection_carries_server_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/auth/login")
            .with_status(401)
            .with_body(r#"{"message":"Invalid credentials"}"#)
            .create_async()
            .await;

        let client = BlogApiClient::new(server.url());
        let err = client
            .login(&LoginPayload {
                email: "a@b.com".to_string(),
                password: "wrong-password".to_string(),
            })
            .await
            .unwrap_err();

        match err {
            ApiError::Remote { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid credentials");
            }
            other => panic!("expected Remote error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_remote_error_falls_back_to_raw_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/blogs/")
            .with_status(500)
            .with_body("Internal Server Error")
            .create_async()
            .await;

        let client = BlogApiClient::new(server.url());
        let err = client.list_posts().await.unwrap_err();
        match err {
            ApiError::Remote { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Internal Server Error");
            }
            other => panic!("expected Remote error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_post_attaches_bearer_credential() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/blogs/")
            .match_header("authorization", "Bearer tok")
            .with_status(201)
            .with_body(r#"{"_id":"p1","title":"t","content":"c","author":"u1"}"#)
            .create_async()
            .await;

        let client = BlogApiClient::new(server.url());
        let post = client
            .create_post(
                &PostPayload {
                    title: "t".to_string(),
                    content: "c".to_string(),
                },
                "tok",
            )
            .await
            .unwrap();

        assert_eq!(post.id, "p1");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_list_posts_decodes_both_author_forms() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/blogs/")
            .with_status(200)
            .with_body(
                r#"[
                  {"_id":"p1","title":"a","content":"x","author":{"_id":"u1","username":"alice"}},
                  {"_id":"p2","title":"b","content":"y","author":"u2","views":3}
                ]"#,
            )
            .create_async()
            .await;

        let client = BlogApiClient::new(server.url());
        let posts = client.list_posts().await.unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].author.username(), Some("alice"));
        assert_eq!(posts[1].author.id(), "u2");
        assert_eq!(posts[1].views, 3);
    }

    #[tokio::test]
    async fn test_update_post_hits_put_path() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/api/blogs/p1")
            .match_header("authorization", "Bearer tok")
            .with_status(200)
            .with_body(r#"{"_id":"p1","title":"new","content":"c","author":"u1"}"#)
            .create_async()
            .await;

        let client = BlogApiClient::new(server.url());
        let post = client
            .update_post(
                "p1",
                &PostPayload {
                    title: "new".to_string(),
                    content: "c".to_string(),
                },
                "tok",
            )
            .await
            .unwrap();

        assert_eq!(post.title, "new");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_post_accepts_no_content() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("DELETE", "/api/blogs/p1")
            .match_header("authorization", "Bearer tok")
            .with_status(204)
            .create_async()
            .await;

        let client = BlogApiClient::new(server.url());
        client.delete_post("p1", "tok").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unreachable_server_is_a_network_error() {
        // Port 1 is never listening.
        let client = BlogApiClient::new("http://127.0.0.1:1");
        let err = client.list_posts().await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }
}
