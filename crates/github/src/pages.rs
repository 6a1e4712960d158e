use async_trait::async_trait;
use handler_core::{PagesActivation, PagesActivator, RepoRef};
use std::sync::Arc;
use tracing::{info, warn};

use crate::client::GitHubClient;
use crate::types::PagesRequest;

/// Serves the repository root of the default branch.
pub struct GitHubPages {
    client: Arc<GitHubClient>,
}

impl GitHubPages {
    pub fn new(client: Arc<GitHubClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PagesActivator for GitHubPages {
    async fn activate(&self, full_name: &str) -> PagesActivation {
        let repo = RepoRef::parse(full_name);
        let request = PagesRequest::root_of(self.client.branch());

        match self.client.enable_pages(&repo.full_name(), &request).await {
            Ok(()) => {
                let url = repo.pages_url();
                info!(repo = %full_name, url = %url, "Pages enabled");
                PagesActivation::live(url)
            }
            Err(e) => {
                warn!(repo = %full_name, error = %e, "Failed to enable Pages, using repository URL");
                PagesActivation::fallback(repo.html_url())
            }
        }
    }
}
