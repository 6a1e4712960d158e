use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(try_from = "i64", into = "i64")]
pub enum Round {
    /// Generate from scratch and publish a new repository
    Create,
    /// Modify an already-published repository
    Modify,
}

impl Round {
    pub fn as_number(&self) -> i64 {
        match self {
            Self::Create => 1,
            Self::Modify => 2,
        }
    }

    pub fn parse(value: i64) -> Option<Self> {
        match value {
            1 => Some(Self::Create),
            2 => Some(Self::Modify),
            _ => None,
        }
    }
}

impl TryFrom<i64> for Round {
    type Error = CoreError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::parse(value).ok_or(CoreError::UnsupportedRound(value))
    }
}

impl From<Round> for i64 {
    fn from(round: Round) -> Self {
        round.as_number()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Attachment {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// Inbound task submission.
///
/// Every field is optional on the wire so that the secret gate can run before
/// anything else is looked at. `round` is kept as the raw integer and only
/// interpreted by [`TaskRequest::round`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct TaskRequest {
    #[serde(default)]
    pub secret: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub task: String,
    #[serde(default)]
    pub round: Option<i64>,
    #[serde(default)]
    pub nonce: String,
    #[serde(default)]
    pub brief: String,
    #[serde(default)]
    pub checks: Vec<String>,
    #[serde(default)]
    pub evaluation_url: Option<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub repo_name: Option<String>,
}

impl TaskRequest {
    pub fn new(task: impl Into<String>, nonce: impl Into<String>, brief: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            nonce: nonce.into(),
            brief: brief.into(),
            ..Default::default()
        }
    }

    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    pub fn with_round(mut self, round: Round) -> Self {
        self.round = Some(round.as_number());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn with_evaluation_url(mut self, url: impl Into<String>) -> Self {
        self.evaluation_url = Some(url.into());
        self
    }

    pub fn with_repo_name(mut self, repo_name: impl Into<String>) -> Self {
        self.repo_name = Some(repo_name.into());
        self
    }

    pub fn with_checks<I, S>(mut self, checks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.checks = checks.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_attachment(mut self, name: impl Into<String>, url: impl Into<String>) -> Self {
        self.attachments.push(Attachment {
            name: name.into(),
            url: url.into(),
        });
        self
    }

    /// The validated round. A missing round is a validation error.
    pub fn round(&self) -> Result<Round, CoreError> {
        let value = self.round.ok_or(CoreError::MissingField("round"))?;
        Round::try_from(value)
    }

    /// The round-2 target repository, rejecting missing or blank names.
    pub fn required_repo_name(&self) -> Result<&str, CoreError> {
        match self.repo_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => Ok(name),
            _ => Err(CoreError::Validation(
                "repo_name required for round 2".to_string(),
            )),
        }
    }

    /// The callback URL when one was supplied and is not blank.
    pub fn evaluation_target(&self) -> Option<&str> {
        self.evaluation_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}
