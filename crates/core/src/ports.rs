use async_trait::async_trait;

use crate::domain::{Attachment, FileSet, PagesActivation, PublishResult, RepoMetadata};
use crate::Result;

/// Produces file sets from task briefs.
///
/// Implementations never fail: the create path degrades to a fallback page
/// and the modify path to a sentinel-only [`FileSet`].
#[async_trait]
pub trait CodeGenerator: Send + Sync {
    async fn generate(&self, brief: &str, attachments: &[Attachment], checks: &[String]) -> FileSet;

    async fn modify(&self, instruction: &str, repo_name: &str, checks: &[String]) -> FileSet;
}

/// Writes file sets to a hosted repository, one commit per file.
#[async_trait]
pub trait RepositoryPublisher: Send + Sync {
    /// Create `repo_name` under the authenticated account and publish `files`.
    ///
    /// Fails only when the repository itself cannot be created; individual
    /// file failures are logged and skipped.
    async fn create(
        &self,
        repo_name: &str,
        files: &FileSet,
        metadata: &RepoMetadata,
    ) -> Result<PublishResult>;

    /// Overwrite files in an existing `owner/repo`, returning the commit sha
    /// of the first successful write or `"unknown"`.
    async fn update(&self, repo_name: &str, files: &FileSet) -> Result<String>;
}

/// Enables static hosting for a repository.
#[async_trait]
pub trait PagesActivator: Send + Sync {
    /// Never fails; a rejected activation yields [`PagesActivation::fallback`]
    /// carrying the repository page.
    async fn activate(&self, full_name: &str) -> PagesActivation;
}
