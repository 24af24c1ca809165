//! HTTP access layer for the Inkwell blog API.
//!
//! This crate provides:
//! - Wire types for the remote API (identities, posts, request payloads)
//! - A thin reqwest-based client, one method per endpoint
//! - A typed error distinguishing remote rejections from transport failures
//!
//! The client performs no retries and no caching; callers own all policy.

mod client;
mod error;
mod types;

pub use client::BlogApiClient;
pub use error::{ApiError, ApiResult};
pub use types::{
    Author, Identity, LoginPayload, Post, PostPayload, RegisterPayload, UserProfile,
};
