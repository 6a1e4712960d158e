pub mod client;
pub mod error;
pub mod pages;
pub mod publisher;
pub mod types;

pub use client::GitHubClient;
pub use error::{GitHubError, Result};
pub use pages::GitHubPages;
pub use publisher::GitHubPublisher;
pub use types::{
    ContentInfo, CreateRepoRequest, CreatedRepo, GitHubConfig, PagesRequest, PutContentRequest,
    PutContentResponse,
};
