use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_BRANCH: &str = "main";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// Client configuration
// =============================================================================

#[derive(Debug, Clone)]
pub struct GitHubConfig {
    pub token: String,
    pub api_url: String,
    pub branch: String,
    pub timeout: Duration,
}

impl GitHubConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_url: DEFAULT_API_URL.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// =============================================================================
// Repositories
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct CreateRepoRequest {
    pub name: String,
    pub description: String,
    pub private: bool,
    pub auto_init: bool,
    pub has_issues: bool,
    pub has_projects: bool,
    pub has_wiki: bool,
}

impl CreateRepoRequest {
    /// A public repository without an initial commit.
    pub fn public(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            private: false,
            auto_init: false,
            has_issues: true,
            has_projects: true,
            has_wiki: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedRepo {
    pub html_url: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

// =============================================================================
// Contents
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct PutContentRequest {
    pub message: String,
    /// Base64 of the UTF-8 file text
    pub content: String,
    pub branch: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

impl PutContentRequest {
    pub fn create(path: &str, content: &str, branch: &str) -> Self {
        Self {
            message: format!("Add {}", path),
            content: encode_content(content),
            branch: branch.to_string(),
            sha: None,
        }
    }

    /// Overwrite an existing file; the host rejects updates without `sha`.
    pub fn update(path: &str, content: &str, branch: &str, sha: impl Into<String>) -> Self {
        Self {
            message: format!("Update {}", path),
            content: encode_content(content),
            branch: branch.to_string(),
            sha: Some(sha.into()),
        }
    }
}

pub fn encode_content(content: &str) -> String {
    STANDARD.encode(content.as_bytes())
}

#[derive(Debug, Clone, Deserialize)]
pub struct PutContentResponse {
    pub commit: CommitRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitRef {
    #[serde(default)]
    pub sha: Option<String>,
}

/// The subset of a contents entry needed to overwrite it.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentInfo {
    pub sha: String,
}

// =============================================================================
// Pages
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct PagesRequest {
    pub source: PagesSource,
}

#[derive(Debug, Clone, Serialize)]
pub struct PagesSource {
    pub branch: String,
    pub path: String,
}

impl PagesRequest {
    /// Serve the repository root of `branch`.
    pub fn root_of(branch: &str) -> Self {
        Self {
            source: PagesSource {
                branch: branch.to_string(),
                path: "/".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_request_is_public_without_init() {
        let request = CreateRepoRequest::public("iitm-demo-n1-1", "IITM Task: hello");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["private"], false);
        assert_eq!(value["auto_init"], false);
        assert_eq!(value["name"], "iitm-demo-n1-1");
    }

    #[test]
    fn test_put_content_encodes_base64() {
        let request = PutContentRequest::create("index.html", "<h1>héllo</h1>", "main");
        assert_eq!(request.message, "Add index.html");
        assert_eq!(request.content, STANDARD.encode("<h1>héllo</h1>".as_bytes()));

        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("sha").is_none());
    }

    #[test]
    fn test_put_content_update_carries_sha() {
        let request = PutContentRequest::update("index.html", "x", "main", "blob123");
        assert_eq!(request.message, "Update index.html");
        assert_eq!(
            serde_json::to_value(&request).unwrap()["sha"],
            json!("blob123")
        );
    }

    #[test]
    fn test_pages_request_shape() {
        let value = serde_json::to_value(PagesRequest::root_of("main")).unwrap();
        assert_eq!(value, json!({"source": {"branch": "main", "path": "/"}}));
    }

    #[test]
    fn test_config_trims_trailing_slash() {
        let config = GitHubConfig::new("t").with_api_url("http://127.0.0.1:9999/");
        assert_eq!(config.api_url, "http://127.0.0.1:9999");
        assert_eq!(config.branch, DEFAULT_BRANCH);
    }
}
