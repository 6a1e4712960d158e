use axum_test::TestServer;
use events::{Event, EventEnvelope};
use orchestrator::RetrySchedule;
use serde_json::{json, Value};
use server::config::HandlerConfig;
use server::{create_router, state::AppState};
use std::time::Duration;
use tokio::sync::broadcast;
use wiremock::matchers::{any, body_partial_json, method, path, path_regex};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const SECRET: &str = "test-secret";

struct Harness {
    server: TestServer,
    state: AppState,
    github: MockServer,
    llm: MockServer,
}

async fn setup_test_server() -> Harness {
    let github = MockServer::start().await;
    let llm = MockServer::start().await;

    let config = HandlerConfig {
        expected_secret: SECRET.to_string(),
        github_token: "test-token".to_string(),
        generation_api_key: "test-key".to_string(),
        generation_base_url: llm.uri(),
        github_api_url: github.uri(),
        retry_schedule: RetrySchedule::new(vec![Duration::from_millis(10); 6]),
        ..Default::default()
    };

    let state = AppState::from_config(&config).expect("Failed to build state");
    let server = TestServer::new(create_router(state.clone())).expect("Failed to create test server");

    Harness {
        server,
        state,
        github,
        llm,
    }
}

fn completion(files: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{"message": {"role": "assistant", "content": files.to_string()}}]
    }))
}

async fn mount_generation(llm: &MockServer, files: Value) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(completion(files))
        .mount(llm)
        .await;
}

async fn mount_repository(github: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/user/repos"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "html_url": "https://github.com/octo/generated",
            "full_name": "octo/generated"
        })))
        .expect(1)
        .mount(github)
        .await;
    Mock::given(method("PUT"))
        .and(path_regex(r"^/repos/octo/generated/contents/.+$"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"commit": {"sha": "sha-1"}})))
        .mount(github)
        .await;
}

async fn wait_for_callback(rx: &mut broadcast::Receiver<EventEnvelope>) -> Event {
    tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            let envelope = rx.recv().await.expect("event bus closed");
            if envelope.event.is_callback_outcome() {
                return envelope.event;
            }
        }
    })
    .await
    .expect("no callback outcome published")
}

fn round_one_body() -> Value {
    json!({
        "secret": SECRET,
        "email": "student@example.com",
        "task": "Captcha Solver",
        "round": 1,
        "nonce": "n1",
        "brief": "Solve captchas passed as ?url=",
        "checks": ["Page has an h1"],
        "attachments": [{"name": "sample.png", "url": "data:image/png;base64,AAAA"}]
    })
}

mod health {
    use super::*;

    #[tokio::test]
    async fn test_root_endpoint() {
        let harness = setup_test_server().await;

        let response = harness.server.get("/").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["message"], "IITM Task Handler API");
        assert_eq!(body["status"], "running");
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let harness = setup_test_server().await;

        let response = harness.server.get("/health").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["status"], "healthy");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_info_lists_endpoints() {
        let harness = setup_test_server().await;

        let response = harness.server.get("/info").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["title"], "IITM Task Handler API");
        assert!(body["endpoints"]["POST /api-endpoint"].is_string());
    }

    #[tokio::test]
    async fn test_openapi_document() {
        let harness = setup_test_server().await;

        let response = harness.server.get("/api/openapi.json").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert!(body["paths"]["/api-endpoint"]["post"].is_object());
        assert!(body["paths"]["/iitm-round2"]["post"].is_object());
    }
}

mod rejections {
    use super::*;

    #[tokio::test]
    async fn test_wrong_secret_is_401_without_external_calls() {
        let harness = setup_test_server().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&harness.github)
            .await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&harness.llm)
            .await;

        let mut body = round_one_body();
        body["secret"] = json!("wrong");
        let response = harness.server.post("/api-endpoint").json(&body).await;

        response.assert_status_unauthorized();
        assert_eq!(response.json::<Value>(), json!({"detail": "Invalid secret"}));
    }

    #[tokio::test]
    async fn test_missing_secret_is_401_on_compat_routes() {
        let harness = setup_test_server().await;

        for route in ["/iitm-task", "/iitm-round2"] {
            let response = harness
                .server
                .post(route)
                .json(&json!({"task": "demo", "repo_name": "octo/demo"}))
                .await;
            response.assert_status_unauthorized();
        }
    }

    #[tokio::test]
    async fn test_unparseable_json_is_400() {
        let harness = setup_test_server().await;

        let response = harness.server.post("/api-endpoint").text("{not json").await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert!(body["detail"]
            .as_str()
            .unwrap()
            .starts_with("Invalid JSON body"));
    }

    #[tokio::test]
    async fn test_invalid_round_is_400() {
        let harness = setup_test_server().await;

        let mut body = round_one_body();
        body["round"] = json!(3);
        let response = harness.server.post("/api-endpoint").json(&body).await;

        response.assert_status_bad_request();
        assert_eq!(
            response.json::<Value>()["detail"],
            "Invalid round number 3. Must be 1 or 2"
        );
    }

    #[tokio::test]
    async fn test_round_two_without_repo_name_is_400() {
        let harness = setup_test_server().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&harness.llm)
            .await;

        let response = harness
            .server
            .post("/api-endpoint")
            .json(&json!({"secret": SECRET, "round": 2, "brief": "Add dark mode"}))
            .await;

        response.assert_status_bad_request();
        assert_eq!(
            response.json::<Value>()["detail"],
            "repo_name required for round 2"
        );
    }
}

mod round_one {
    use super::*;

    #[tokio::test]
    async fn test_creates_repository_and_notifies_evaluator() {
        let harness = setup_test_server().await;
        mount_generation(&harness.llm, json!({"index.html": "<h1>Captcha</h1>"})).await;
        mount_repository(&harness.github).await;
        Mock::given(method("POST"))
            .and(path("/repos/octo/generated/pages"))
            .and(body_partial_json(json!({"source": {"branch": "main", "path": "/"}})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
            .expect(1)
            .mount(&harness.github)
            .await;

        let evaluator = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/notify"))
            .and(body_partial_json(json!({
                "email": "student@example.com",
                "task": "Captcha Solver",
                "round": 1,
                "nonce": "n1",
                "repo_url": "https://github.com/octo/generated",
                "commit_sha": "sha-1",
                "pages_url": "https://octo.github.io/generated/"
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&evaluator)
            .await;

        let mut rx = harness.state.event_bus.subscribe();
        let mut body = round_one_body();
        body["evaluation_url"] = json!(format!("{}/notify", evaluator.uri()));

        let response = harness.server.post("/api-endpoint").json(&body).await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<Value>(),
            json!({
                "status": "success",
                "message": "Task completed successfully",
                "repo_url": "https://github.com/octo/generated",
                "pages_url": "https://octo.github.io/generated/",
                "evaluation_sent": true
            })
        );

        assert!(matches!(
            wait_for_callback(&mut rx).await,
            Event::CallbackDelivered { attempts: 1, .. }
        ));

        let requests = harness.github.received_requests().await.unwrap();
        let written: Vec<String> = requests
            .iter()
            .filter(|r| r.method.as_str() == "PUT")
            .map(|r| r.url.path().rsplit('/').next().unwrap_or_default().to_string())
            .collect();
        assert_eq!(written, ["LICENSE", "README.md", "index.html"]);
    }

    /// Numeric millisecond stamp after `prefix`, if `value` has that shape.
    fn stamp_after<'a>(value: &'a str, prefix: &str, suffix: &str) -> Option<&'a str> {
        let stamp = value.strip_prefix(prefix)?.strip_suffix(suffix)?;
        (!stamp.is_empty() && stamp.chars().all(|c| c.is_ascii_digit())).then_some(stamp)
    }

    #[tokio::test]
    async fn test_generated_repository_name_flows_into_urls() {
        let harness = setup_test_server().await;
        mount_generation(&harness.llm, json!({"index.html": "<h1>hello</h1>"})).await;
        Mock::given(method("POST"))
            .and(path("/user/repos"))
            .respond_with(|request: &Request| {
                let body: Value = serde_json::from_slice(&request.body).unwrap();
                let name = body["name"].as_str().unwrap();
                ResponseTemplate::new(201).set_body_json(json!({
                    "html_url": format!("https://github.com/octo/{}", name),
                    "full_name": format!("octo/{}", name)
                }))
            })
            .expect(1)
            .mount(&harness.github)
            .await;
        Mock::given(method("PUT"))
            .and(path_regex(r"^/repos/octo/iitm-demo-n1-\d+/contents/.+$"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"commit": {"sha": "sha-1"}})))
            .mount(&harness.github)
            .await;
        Mock::given(method("POST"))
            .and(path_regex(r"^/repos/octo/iitm-demo-n1-\d+/pages$"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
            .expect(1)
            .mount(&harness.github)
            .await;

        let response = harness
            .server
            .post("/api-endpoint")
            .json(&json!({
                "secret": SECRET,
                "round": 1,
                "task": "demo",
                "nonce": "n1",
                "brief": "hello page"
            }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        let repo_url = body["repo_url"].as_str().unwrap();
        let pages_url = body["pages_url"].as_str().unwrap();

        let stamp = stamp_after(repo_url, "https://github.com/octo/iitm-demo-n1-", "")
            .unwrap_or_else(|| panic!("unexpected repo_url {repo_url}"));
        assert_eq!(
            stamp_after(pages_url, "https://octo.github.io/iitm-demo-n1-", "/"),
            Some(stamp)
        );

        let requests = harness.github.received_requests().await.unwrap();
        let created: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(created["name"], format!("iitm-demo-n1-{}", stamp));
        assert_eq!(created["description"], "IITM Task: hello page");
    }

    #[tokio::test]
    async fn test_pages_failure_falls_back_to_repository_url() {
        let harness = setup_test_server().await;
        mount_generation(&harness.llm, json!({"index.html": "<h1>x</h1>"})).await;
        mount_repository(&harness.github).await;
        Mock::given(method("POST"))
            .and(path("/repos/octo/generated/pages"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({"message": "nope"})))
            .mount(&harness.github)
            .await;

        let response = harness.server.post("/iitm-task").json(&round_one_body()).await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["pages_url"], "https://github.com/octo/generated");
        assert_eq!(body["evaluation_sent"], false);
    }

    #[tokio::test]
    async fn test_generation_failure_publishes_default_application() {
        let harness = setup_test_server().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&harness.llm)
            .await;
        mount_repository(&harness.github).await;
        Mock::given(method("POST"))
            .and(path("/repos/octo/generated/pages"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
            .mount(&harness.github)
            .await;

        let response = harness.server.post("/api-endpoint").json(&round_one_body()).await;
        response.assert_status_ok();

        let requests = harness.github.received_requests().await.unwrap();
        let written: Vec<&str> = requests
            .iter()
            .filter(|r| r.method.as_str() == "PUT")
            .filter_map(|r| r.url.path().rsplit('/').next())
            .collect();
        assert_eq!(
            written,
            ["LICENSE", "README.md", "index.html", "script.js", "style.css"]
        );
    }

    #[tokio::test]
    async fn test_repository_creation_failure_is_500() {
        let harness = setup_test_server().await;
        mount_generation(&harness.llm, json!({"index.html": "<h1>x</h1>"})).await;
        Mock::given(method("POST"))
            .and(path("/user/repos"))
            .respond_with(
                ResponseTemplate::new(422)
                    .set_body_json(json!({"message": "name already exists on this account"})),
            )
            .mount(&harness.github)
            .await;

        let response = harness.server.post("/api-endpoint").json(&round_one_body()).await;

        response.assert_status(axum::http::StatusCode::INTERNAL_SERVER_ERROR);
        let detail = response.json::<Value>()["detail"]
            .as_str()
            .unwrap()
            .to_string();
        assert!(detail.starts_with("Task processing failed: "));
        assert!(detail.contains("name already exists"));
    }
}

mod round_two {
    use super::*;

    #[tokio::test]
    async fn test_legacy_route_updates_existing_files() {
        let harness = setup_test_server().await;
        mount_generation(&harness.llm, json!({"index.html": "<h1>v2</h1>"})).await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/demo/contents/index.html"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sha": "blob-1"})))
            .mount(&harness.github)
            .await;
        Mock::given(method("PUT"))
            .and(path("/repos/octo/demo/contents/index.html"))
            .and(body_partial_json(json!({"sha": "blob-1", "message": "Update index.html"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"commit": {"sha": "update-1"}})))
            .expect(1)
            .mount(&harness.github)
            .await;

        let response = harness
            .server
            .post("/iitm-round2")
            .json(&json!({
                "secret": SECRET,
                "repo_name": "octo/demo",
                "modification": "Make the heading say v2"
            }))
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<Value>(),
            json!({
                "status": "success",
                "round": 2,
                "message": "Code modified and updated in repo",
                "commit_sha": "update-1"
            })
        );

        let prompts = harness.llm.received_requests().await.unwrap();
        let sent: Value = serde_json::from_slice(&prompts[0].body).unwrap();
        assert!(sent["messages"][1]["content"]
            .as_str()
            .unwrap()
            .contains("Make the heading say v2"));
    }

    #[tokio::test]
    async fn test_unparseable_modification_writes_nothing() {
        let harness = setup_test_server().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "Sorry, no."}}]
            })))
            .mount(&harness.llm)
            .await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&harness.github)
            .await;

        let evaluator = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "round": 2,
                "commit_sha": "unknown",
                "repo_url": "https://github.com/octo/demo",
                "pages_url": "https://octo.github.io/demo/"
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&evaluator)
            .await;

        let mut rx = harness.state.event_bus.subscribe();
        let response = harness
            .server
            .post("/api-endpoint")
            .json(&json!({
                "secret": SECRET,
                "round": 2,
                "repo_name": "octo/demo",
                "brief": "Add dark mode",
                "evaluation_url": evaluator.uri()
            }))
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["commit_sha"], "unknown");
        assert!(matches!(
            wait_for_callback(&mut rx).await,
            Event::CallbackDelivered { .. }
        ));
    }
}
