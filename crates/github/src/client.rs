use octocrab::service::middleware::retry::RetryConfig;
use octocrab::Octocrab;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::error::{GitHubError, Result};
use crate::types::{
    ContentInfo, CreateRepoRequest, CreatedRepo, GitHubConfig, PagesRequest, PutContentRequest,
    PutContentResponse,
};

/// Thin REST client over the repository, contents and pages endpoints.
///
/// Requests go out once: octocrab's retry middleware is disabled because only
/// callback delivery retries.
pub struct GitHubClient {
    octocrab: Octocrab,
    api_url: String,
    branch: String,
}

impl GitHubClient {
    pub fn new(config: &GitHubConfig) -> Result<Self> {
        if config.token.trim().is_empty() {
            return Err(GitHubError::Authentication("GITHUB_TOKEN not set".to_string()));
        }

        let octocrab = Octocrab::builder()
            .personal_token(config.token.clone())
            .base_uri(config.api_url.as_str())
            .map_err(|e| GitHubError::Config(e.to_string()))?
            .add_retry_config(RetryConfig::None)
            .set_connect_timeout(Some(config.timeout))
            .set_read_timeout(Some(config.timeout))
            .set_write_timeout(Some(config.timeout))
            .build()
            .map_err(|e| GitHubError::Config(e.to_string()))?;

        Ok(Self {
            octocrab,
            api_url: config.api_url.clone(),
            branch: config.branch.clone(),
        })
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    fn url(&self, route: &str) -> String {
        format!("{}{}", self.api_url, route)
    }

    fn contents_url(&self, full_name: &str, path: &str) -> String {
        let encoded: Vec<String> = path
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        self.url(&format!("/repos/{}/contents/{}", full_name, encoded.join("/")))
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T> {
    Ok(serde_json::from_str(body)?)
}

fn failure(status: u16, body: String) -> GitHubError {
    if status == 401 {
        GitHubError::Authentication(body)
    } else {
        GitHubError::api(status, body)
    }
}

impl GitHubClient {
    /// `POST /user/repos`; anything other than a success status is fatal.
    pub async fn create_repository(&self, request: &CreateRepoRequest) -> Result<CreatedRepo> {
        info!(name = %request.name, "Creating repository");

        let response = self
            .octocrab
            ._post(self.url("/user/repos"), Some(request))
            .await?;

        let status = response.status();
        let body = self.octocrab.body_to_string(response).await?;

        if !status.is_success() {
            debug!(status = status.as_u16(), "Repository creation rejected");
            return Err(GitHubError::RepoCreation(body));
        }

        decode(&body)
    }

    /// Current blob sha of `path`, or `None` when the file does not exist.
    pub async fn file_sha(&self, full_name: &str, path: &str) -> Result<Option<String>> {
        debug!(repo = %full_name, path = %path, "Fetching current file revision");

        let response = self
            .octocrab
            ._get(self.contents_url(full_name, path))
            .await?;

        let status = response.status().as_u16();
        let body = self.octocrab.body_to_string(response).await?;

        match status {
            200 => {
                let info: ContentInfo = decode(&body)?;
                Ok(Some(info.sha))
            }
            404 => Ok(None),
            _ => Err(failure(status, body)),
        }
    }

    /// `PUT /repos/{full_name}/contents/{path}`, returning the commit sha.
    pub async fn put_file(
        &self,
        full_name: &str,
        path: &str,
        request: &PutContentRequest,
    ) -> Result<String> {
        debug!(repo = %full_name, path = %path, "Writing file");

        let response = self
            .octocrab
            ._put(self.contents_url(full_name, path), Some(request))
            .await?;

        let status = response.status();
        let body = self.octocrab.body_to_string(response).await?;

        if !status.is_success() {
            return Err(failure(status.as_u16(), body));
        }

        let written: PutContentResponse = decode(&body)?;
        written
            .commit
            .sha
            .ok_or_else(|| GitHubError::Decode(format!("no commit sha for {}", path)))
    }

    /// `POST /repos/{full_name}/pages`.
    pub async fn enable_pages(&self, full_name: &str, request: &PagesRequest) -> Result<()> {
        info!(repo = %full_name, "Enabling GitHub Pages");

        let response = self
            .octocrab
            ._post(self.url(&format!("/repos/{}/pages", full_name)), Some(request))
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = self.octocrab.body_to_string(response).await?;
            return Err(failure(status.as_u16(), body));
        }

        Ok(())
    }
}
