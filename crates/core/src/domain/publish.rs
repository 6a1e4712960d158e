use serde::{Deserialize, Serialize};

/// Commit identifier reported when no file write succeeded.
pub const UNKNOWN_COMMIT: &str = "unknown";

const GITHUB_WEB: &str = "https://github.com";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishResult {
    pub repo_url: String,
    pub commit_sha: String,
}

/// Repository description sent along with creation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoMetadata {
    pub description: String,
}

impl RepoMetadata {
    const DESCRIPTION_LIMIT: usize = 100;

    /// `IITM Task: ` followed by the first 100 characters of the brief.
    pub fn for_brief(brief: &str) -> Self {
        let summary: String = brief.chars().take(Self::DESCRIPTION_LIMIT).collect();
        Self {
            description: format!("IITM Task: {}", summary),
        }
    }
}

/// Keeps the commit identifier of the first successful write in a batch.
///
/// Later successes never replace it, so the propagated sha is independent of
/// how many subsequent writes succeed or fail.
#[derive(Debug, Default)]
pub struct FirstCommit {
    sha: Option<String>,
}

impl FirstCommit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, sha: impl Into<String>) {
        if self.sha.is_none() {
            self.sha = Some(sha.into());
        }
    }

    pub fn finish(self) -> String {
        self.sha.unwrap_or_else(|| UNKNOWN_COMMIT.to_string())
    }
}

/// Result of enabling static hosting for a repository.
///
/// `url` is always usable: the Pages site when hosting was enabled, otherwise
/// the repository page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagesActivation {
    pub url: String,
    pub enabled: bool,
}

impl PagesActivation {
    pub fn live(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            enabled: true,
        }
    }

    pub fn fallback(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            enabled: false,
        }
    }
}

/// An `owner/repo` pair, or a bare name when no owner is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: Option<String>,
    pub repo: String,
}

impl RepoRef {
    pub fn parse(full_name: &str) -> Self {
        let full_name = full_name.trim().trim_matches('/');
        match full_name.split_once('/') {
            Some((owner, repo)) => Self {
                owner: Some(owner.to_string()),
                repo: repo.to_string(),
            },
            None => Self {
                owner: None,
                repo: full_name.to_string(),
            },
        }
    }

    /// Extract `owner/repo` from a `https://github.com/owner/repo` page URL.
    pub fn from_html_url(url: &str) -> Option<Self> {
        let (_, rest) = url.split_once("github.com/")?;
        let rest = rest.trim_end_matches('/').trim_end_matches(".git");
        if rest.is_empty() {
            return None;
        }
        Some(Self::parse(rest))
    }

    pub fn full_name(&self) -> String {
        match &self.owner {
            Some(owner) => format!("{}/{}", owner, self.repo),
            None => self.repo.clone(),
        }
    }

    pub fn html_url(&self) -> String {
        format!("{}/{}", GITHUB_WEB, self.full_name())
    }

    /// Public GitHub Pages URL for the repository.
    pub fn pages_url(&self) -> String {
        match &self.owner {
            Some(owner) => format!("https://{}.github.io/{}/", owner, self.repo),
            None => format!("https://{}.github.io/", self.repo),
        }
    }
}
