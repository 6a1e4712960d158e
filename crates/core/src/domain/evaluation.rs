use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::task::{Round, TaskRequest};

/// Completion notification delivered to the evaluator.
///
/// Field names and nesting are an external contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EvaluationPayload {
    pub email: String,
    pub task: String,
    pub round: i64,
    pub nonce: String,
    pub repo_url: String,
    pub commit_sha: String,
    pub pages_url: String,
}

impl EvaluationPayload {
    pub fn for_request(
        request: &TaskRequest,
        round: Round,
        repo_url: impl Into<String>,
        commit_sha: impl Into<String>,
        pages_url: impl Into<String>,
    ) -> Self {
        Self {
            email: request.email.clone(),
            task: request.task.clone(),
            round: round.as_number(),
            nonce: request.nonce.clone(),
            repo_url: repo_url.into(),
            commit_sha: commit_sha.into(),
            pages_url: pages_url.into(),
        }
    }
}

/// Round 1 success body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreateTaskResponse {
    pub status: String,
    pub message: String,
    pub repo_url: String,
    pub pages_url: String,
    pub evaluation_sent: bool,
}

impl CreateTaskResponse {
    pub fn success(repo_url: String, pages_url: String, evaluation_sent: bool) -> Self {
        Self {
            status: "success".to_string(),
            message: "Task completed successfully".to_string(),
            repo_url,
            pages_url,
            evaluation_sent,
        }
    }
}

/// Round 2 success body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ModifyTaskResponse {
    pub status: String,
    pub round: i64,
    pub message: String,
    pub commit_sha: String,
}

impl ModifyTaskResponse {
    pub fn success(commit_sha: String) -> Self {
        Self {
            status: "success".to_string(),
            round: Round::Modify.as_number(),
            message: "Code modified and updated in repo".to_string(),
            commit_sha,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum TaskResponse {
    Created(CreateTaskResponse),
    Modified(ModifyTaskResponse),
}

impl TaskResponse {
    pub fn commit_sha(&self) -> Option<&str> {
        match self {
            Self::Created(_) => None,
            Self::Modified(response) => Some(&response.commit_sha),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_wire_shape() {
        let request = TaskRequest::new("demo", "n1", "hello page").with_email("a@b.c");
        let payload = EvaluationPayload::for_request(
            &request,
            Round::Create,
            "https://github.com/octo/iitm-demo-n1-1",
            "abc123",
            "https://octo.github.io/iitm-demo-n1-1/",
        );

        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "email": "a@b.c",
                "task": "demo",
                "round": 1,
                "nonce": "n1",
                "repo_url": "https://github.com/octo/iitm-demo-n1-1",
                "commit_sha": "abc123",
                "pages_url": "https://octo.github.io/iitm-demo-n1-1/"
            })
        );
    }

    #[test]
    fn test_modify_response_shape() {
        let response = TaskResponse::Modified(ModifyTaskResponse::success("unknown".to_string()));
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "status": "success",
                "round": 2,
                "message": "Code modified and updated in repo",
                "commit_sha": "unknown"
            })
        );
        assert_eq!(response.commit_sha(), Some("unknown"));
    }

    #[test]
    fn test_create_response_shape() {
        let response = CreateTaskResponse::success(
            "https://github.com/octo/r".to_string(),
            "https://octo.github.io/r/".to_string(),
            false,
        );
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["status"], "success");
        assert_eq!(value["message"], "Task completed successfully");
        assert_eq!(value["evaluation_sent"], false);
    }
}
