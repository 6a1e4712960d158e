use async_trait::async_trait;
use handler_core::{FileSet, FirstCommit, PublishResult, RepoMetadata, RepoRef, RepositoryPublisher};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::client::GitHubClient;
use crate::types::{CreateRepoRequest, PutContentRequest};

/// Publishes file sets through the contents API, one commit per file.
///
/// Files are written one at a time in path order. The commit sha of the first
/// successful write is the one reported; later failures are only logged.
pub struct GitHubPublisher {
    client: Arc<GitHubClient>,
}

impl GitHubPublisher {
    pub fn new(client: Arc<GitHubClient>) -> Self {
        Self { client }
    }

    async fn commit(
        &self,
        first: &mut FirstCommit,
        full_name: &str,
        path: &str,
        request: &PutContentRequest,
    ) {
        match self.client.put_file(full_name, path, request).await {
            Ok(sha) => {
                debug!(repo = %full_name, path = %path, sha = %sha, "File committed");
                first.record(sha);
            }
            Err(e) => {
                warn!(repo = %full_name, path = %path, error = %e, "Failed to write file");
            }
        }
    }
}

#[async_trait]
impl RepositoryPublisher for GitHubPublisher {
    async fn create(
        &self,
        repo_name: &str,
        files: &FileSet,
        metadata: &RepoMetadata,
    ) -> handler_core::Result<PublishResult> {
        let created = self
            .client
            .create_repository(&CreateRepoRequest::public(
                repo_name,
                metadata.description.as_str(),
            ))
            .await?;

        let full_name = created
            .full_name
            .clone()
            .or_else(|| RepoRef::from_html_url(&created.html_url).map(|r| r.full_name()))
            .unwrap_or_else(|| repo_name.to_string());

        info!(
            repo = %full_name,
            files = files.publishable().count(),
            "Publishing files to new repository"
        );

        let mut first = FirstCommit::new();
        for (path, content) in files.publishable() {
            let request = PutContentRequest::create(path, content, self.client.branch());
            self.commit(&mut first, &full_name, path, &request).await;
        }

        Ok(PublishResult {
            repo_url: created.html_url,
            commit_sha: first.finish(),
        })
    }

    async fn update(&self, repo_name: &str, files: &FileSet) -> handler_core::Result<String> {
        info!(
            repo = %repo_name,
            files = files.publishable().count(),
            "Updating repository files"
        );

        let mut first = FirstCommit::new();
        for (path, content) in files.publishable() {
            let request = match self.client.file_sha(repo_name, path).await {
                Ok(Some(sha)) => PutContentRequest::update(path, content, self.client.branch(), sha),
                Ok(None) => {
                    debug!(repo = %repo_name, path = %path, "File does not exist yet, creating it");
                    PutContentRequest::create(path, content, self.client.branch())
                }
                Err(e) => {
                    warn!(repo = %repo_name, path = %path, error = %e, "Failed to read current revision, skipping file");
                    continue;
                }
            };
            self.commit(&mut first, repo_name, path, &request).await;
        }

        Ok(first.finish())
    }
}
