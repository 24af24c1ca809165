//! Content store: the posts currently loaded and their operation status.

use crate::error::{EngineError, EngineResult};
use crate::lifecycle::OpTickets;
use crate::status::OperationStatus;
use crate::validate::validate_post;
use blog_api::{ApiResult, BlogApiClient, Post, PostPayload};
use std::future::Future;
use std::sync::RwLock;

/// Status message when an authenticated operation runs without an identity.
const AUTH_REQUIRED_MESSAGE: &str = "You must be logged in to do that";

/// Snapshot of the content store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentState {
    /// The loaded posts: either the all-posts view or the my-posts view,
    /// never both. Switching views is a fresh fetch, not a merge.
    pub posts: Vec<Post>,
    /// Status of the most recent content operation.
    pub status: OperationStatus,
}

/// Holds the in-memory collection of posts currently loaded.
///
/// List operations replace the collection wholesale on success and leave
/// stale posts visible on failure. Create appends the server's echo; edit
/// replaces the matching entry in place. All reads are snapshots; no lock
/// is held across an await.
pub struct ContentStore {
    client: BlogApiClient,
    state: RwLock<ContentState>,
    tickets: OpTickets,
}

impl ContentStore {
    /// Create an empty content store.
    pub fn new(client: BlogApiClient) -> Self {
        Self {
            client,
            state: RwLock::new(ContentState::default()),
            tickets: OpTickets::default(),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> ContentState {
        self.state.read().unwrap().clone()
    }

    /// Snapshot of the loaded posts.
    pub fn posts(&self) -> Vec<Post> {
        self.state.read().unwrap().posts.clone()
    }

    /// Load the all-posts view, replacing the collection wholesale.
    ///
    /// On failure the previous posts stay visible (stale-but-visible) and
    /// only the status records the error.
    pub async fn list_all(&self) -> EngineResult<Vec<Post>> {
        self.run_list(self.client.list_posts()).await
    }

    /// Load the my-posts view, replacing the collection wholesale.
    pub async fn list_mine(&self, token: Option<&str>) -> EngineResult<Vec<Post>> {
        let token = self.require_auth(token)?;
        self.run_list(self.client.list_my_posts(&token)).await
    }

    /// Create a post and append the server's echo to the collection.
    ///
    /// Requires an identity upstream: with no credential this fails fast
    /// with `AuthRequired` and no network call is made. The collection is
    /// not re-fetched.
    pub async fn create(
        &self,
        payload: &PostPayload,
        token: Option<&str>,
    ) -> EngineResult<Post> {
        validate_post(payload)?;
        let token = self.require_auth(token)?;

        let ticket = self.tickets.issue();
        self.state.write().unwrap().status = OperationStatus::loading();

        match self.client.create_post(payload, &token).await {
            Ok(post) => {
                let mut state = self.state.write().unwrap();
                if self.tickets.is_current(ticket) {
                    state.posts.push(post.clone());
                    state.status = OperationStatus::succeeded();
                } else {
                    tracing::debug!("Discarding stale create settlement");
                }
                Ok(post)
            }
            Err(err) => {
                self.settle_failure(ticket, err.surface_message());
                Err(err.into())
            }
        }
    }

    /// Edit a post and replace the matching entry in place.
    ///
    /// If the echoed post is not in the loaded collection the echo is
    /// dropped and the collection is left unchanged; the operation still
    /// settles as succeeded. This mirrors the list-was-switched case and is
    /// deliberate, not a repair site.
    pub async fn edit(
        &self,
        id: &str,
        payload: &PostPayload,
        token: Option<&str>,
    ) -> EngineResult<Post> {
        validate_post(payload)?;
        let token = self.require_auth(token)?;

        let ticket = self.tickets.issue();
        self.state.write().unwrap().status = OperationStatus::loading();

        match self.client.update_post(id, payload, &token).await {
            Ok(post) => {
                let mut state = self.state.write().unwrap();
                if self.tickets.is_current(ticket) {
                    match state.posts.iter().position(|p| p.id == post.id) {
                        Some(index) => state.posts[index] = post.clone(),
                        None => {
                            tracing::debug!(
                                post_id = %post.id,
                                "Edited post is not in the loaded collection; dropping echo"
                            );
                        }
                    }
                    state.status = OperationStatus::succeeded();
                } else {
                    tracing::debug!("Discarding stale edit settlement");
                }
                Ok(post)
            }
            Err(err) => {
                self.settle_failure(ticket, err.surface_message());
                Err(err.into())
            }
        }
    }

    /// Reset the status to idle without touching the posts. Idempotent.
    pub fn reset_status(&self) {
        self.state.write().unwrap().status = OperationStatus::idle();
    }

    /// Fail fast when an authenticated operation has no credential.
    fn require_auth(&self, token: Option<&str>) -> EngineResult<String> {
        match token {
            Some(token) => Ok(token.to_string()),
            None => {
                self.tickets.issue();
                self.state.write().unwrap().status =
                    OperationStatus::failed(AUTH_REQUIRED_MESSAGE);
                Err(EngineError::AuthRequired)
            }
        }
    }

    /// Shared lifecycle for the two list views.
    async fn run_list<F>(&self, call: F) -> EngineResult<Vec<Post>>
    where
        F: Future<Output = ApiResult<Vec<Post>>>,
    {
        let ticket = self.tickets.issue();
        self.state.write().unwrap().status = OperationStatus::loading();

        match call.await {
            Ok(posts) => {
                let mut state = self.state.write().unwrap();
                if self.tickets.is_current(ticket) {
                    state.posts = posts.clone();
                    state.status = OperationStatus::succeeded();
                } else {
                    tracing::debug!("Discarding stale list settlement");
                }
                Ok(posts)
            }
            Err(err) => {
                self.settle_failure(ticket, err.surface_message());
                Err(err.into())
            }
        }
    }

    /// Commit a failure status, leaving the posts untouched.
    fn settle_failure(&self, ticket: u64, message: String) {
        let mut state = self.state.write().unwrap();
        if self.tickets.is_current(ticket) {
            state.status = OperationStatus::failed(message);
        } else {
            tracing::debug!("Discarding stale failure settlement");
        }
    }
}
