mod common;

use axum::http::StatusCode;
use common::{repo, test_config, TestApp};
use prism_service::services::{MockRepositoryHost, MockTextProvider};
use serde_json::json;

fn catalogue() -> MockRepositoryHost {
    MockRepositoryHost::new(vec![
        repo("tokio-rs", "tokio", Some("Rust"), 27_000),
        repo("tokio-rs", "axum", Some("Rust"), 19_000),
        repo("BurntSushi", "ripgrep", None, 50_000),
        repo("pallets", "flask", Some("Python"), 68_000),
    ])
}

#[tokio::test]
async fn home_returns_welcome_message() {
    let app = TestApp::new(catalogue(), MockTextProvider::new());

    let (status, body) = app.get("/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Welcome to PRism API!" }));
}

#[tokio::test]
async fn health_reports_service_name() {
    let app = TestApp::new(catalogue(), MockTextProvider::new());

    let (status, body) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "prism-service");
}

// ---------------------------------------------------------------------------
// /repositories
// ---------------------------------------------------------------------------

#[tokio::test]
async fn repositories_rejects_empty_or_missing_skills_without_searching() {
    let app = TestApp::new(catalogue(), MockTextProvider::new());

    for body in [json!({ "skills": [] }), json!({}), json!({ "skills": null })] {
        let (status, response) = app.post_json("/repositories", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"], "No skills provided");
    }

    assert_eq!(app.repos.search_calls(), 0);
}

#[tokio::test]
async fn repositories_rejects_malformed_json() {
    let app = TestApp::new(catalogue(), MockTextProvider::new());

    let (status, _) = app.post_raw("/repositories", "{not json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.repos.search_calls(), 0);
}

#[tokio::test]
async fn repositories_searches_once_per_skill_in_order() {
    let app = TestApp::new(catalogue(), MockTextProvider::new());

    let (status, body) = app
        .post_json("/repositories", json!({ "skills": ["python", "rust"] }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.repos.search_calls(), 2);

    let queries: Vec<String> = app.repos.queries().into_iter().map(|q| q.q).collect();
    assert_eq!(queries, vec!["python stars:>100", "rust stars:>100"]);
    assert!(app.repos.queries().iter().all(|q| q.limit == 9));

    // Skill order first, then the host's star ranking within each skill.
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["repo"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["flask", "tokio", "axum"]);
}

#[tokio::test]
async fn repositories_caps_results_at_nine_per_skill() {
    let many = (0..15)
        .map(|i| repo("org", &format!("rust-{}", i), Some("Rust"), 1_000 + i))
        .collect();
    let app = TestApp::new(MockRepositoryHost::new(many), MockTextProvider::new());

    let (status, body) = app
        .post_json("/repositories", json!({ "skills": ["rust", "rust"] }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 18);
}

#[tokio::test]
async fn repositories_reports_unknown_language_when_absent() {
    let mut ripgrep = repo("BurntSushi", "ripgrep", None, 50_000);
    ripgrep.topics = vec!["search".to_string()];
    let app = TestApp::new(MockRepositoryHost::new(vec![ripgrep]), MockTextProvider::new());

    let (status, body) = app
        .post_json("/repositories", json!({ "skills": ["search"] }))
        .await;

    assert_eq!(status, StatusCode::OK);
    let first = &body[0];
    assert_eq!(first["lang"], "Unknown");
    assert_eq!(first["owner"], "BurntSushi");
    assert_eq!(first["stars"], 50_000);
    assert_eq!(first["topics"], json!(["search"]));
    assert_eq!(first["is_fork"], false);
    assert_eq!(first["issues"], 3);
    assert_eq!(first["last_updated"], "2024-06-01T00:00:00+00:00");
}

#[tokio::test]
async fn repositories_fails_whole_request_when_one_search_fails() {
    let app = TestApp::new(
        catalogue().failing_on("rust stars:>100"),
        MockTextProvider::new(),
    );

    let (status, body) = app
        .post_json("/repositories", json!({ "skills": ["python", "rust", "go"] }))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("API rate limit exceeded"));
    // Stops at the failing skill.
    assert_eq!(app.repos.search_calls(), 2);
}

// ---------------------------------------------------------------------------
// /get_info
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_info_returns_detail() {
    let app = TestApp::new(catalogue(), MockTextProvider::new());

    let (status, body) = app
        .post_json("/get_info", json!({ "owner": "tokio-rs", "repo_name": "axum" }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "name": "axum",
            "description": "axum description",
            "stars": 19000,
            "forks": 1900,
            "language": "Rust",
            "url": "https://github.com/tokio-rs/axum",
            "issues": 3,
            "is_private": false,
            "is_archived": false,
            "is_disabled": false
        })
    );
}

#[tokio::test]
async fn get_info_defaults_language_to_unknown() {
    let app = TestApp::new(catalogue(), MockTextProvider::new());

    let (_, body) = app
        .post_json("/get_info", json!({ "owner": "BurntSushi", "repo_name": "ripgrep" }))
        .await;

    assert_eq!(body["language"], "Unknown");
}

#[tokio::test]
async fn get_info_returns_404_for_unknown_repository() {
    let app = TestApp::new(catalogue(), MockTextProvider::new());

    let (status, body) = app
        .post_json("/get_info", json!({ "owner": "nobody", "repo_name": "nothing" }))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Repository not found");
}

#[tokio::test]
async fn get_info_passes_empty_input_to_the_host() {
    let app = TestApp::new(catalogue(), MockTextProvider::new());

    let (status, _) = app.post_json("/get_info", json!({})).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.repos.lookup_calls(), 1);
}

#[tokio::test]
async fn get_info_is_idempotent() {
    let app = TestApp::new(catalogue(), MockTextProvider::new());
    let request = json!({ "owner": "tokio-rs", "repo_name": "tokio" });

    let (_, first) = app.post_json("/get_info", request.clone()).await;
    let (_, second) = app.post_json("/get_info", request).await;

    assert_eq!(first.to_string(), second.to_string());
}

// ---------------------------------------------------------------------------
// /get_ai_recs
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ai_recs_require_skills_and_repo_name_before_calling_model() {
    let app = TestApp::new(catalogue(), MockTextProvider::new());

    for body in [
        json!({ "skills": [], "repo_name": "tokio" }),
        json!({ "skills": ["rust"], "repo_name": "" }),
        json!({ "skills": ["rust"] }),
        json!({}),
    ] {
        let (status, response) = app.post_json("/get_ai_recs", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"], "Skills and repository name required");
    }

    assert_eq!(app.model.call_count(), 0);
}

#[tokio::test]
async fn ai_recs_return_model_text_and_send_persona() {
    let app = TestApp::new(catalogue(), MockTextProvider::fixed("1. Read CONTRIBUTING.md"));

    let (status, body) = app
        .post_json(
            "/get_ai_recs",
            json!({
                "skills": ["rust", "async"],
                "repo_name": "tokio",
                "repo_desc": "A runtime",
                "user_experience": "beginner",
                "user_interests": "networking",
                "user_time": "3 hours a week"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ai_suggestions": "1. Read CONTRIBUTING.md" }));

    let calls = app.model.calls();
    assert_eq!(calls.len(), 1);
    let call = &calls[0];
    assert!(call.prompt.contains("rust, async"));
    assert!(call.prompt.contains("\"tokio\""));
    assert!(call.prompt.contains("User Interests: networking"));
    let instruction = call.system_instruction.as_deref().unwrap();
    // The length limit is a request to the model, not a hard cap.
    assert!(instruction.contains("under 600 tokens"));
}

#[tokio::test]
async fn ai_recs_fall_back_when_model_returns_nothing() {
    let app = TestApp::new(catalogue(), MockTextProvider::empty());

    let (status, body) = app
        .post_json("/get_ai_recs", json!({ "skills": ["rust"], "repo_name": "tokio" }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ai_suggestions"], "No insights available.");
}

#[tokio::test]
async fn ai_recs_surface_provider_errors_as_500() {
    let app = TestApp::new(catalogue(), MockTextProvider::failing("quota exhausted"));

    let (status, body) = app
        .post_json("/get_ai_recs", json!({ "skills": ["rust"], "repo_name": "tokio" }))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "quota exhausted");
}

// ---------------------------------------------------------------------------
// /ai_chat
// ---------------------------------------------------------------------------

#[tokio::test]
async fn chat_requires_prompt() {
    let app = TestApp::new(catalogue(), MockTextProvider::new());

    let (status, body) = app
        .post_json("/ai_chat", json!({ "prompt": "", "history": [] }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Prompt is required");
    assert_eq!(app.model.call_count(), 0);
}

#[tokio::test]
async fn chat_appends_turn_to_caller_history() {
    let app = TestApp::new(catalogue(), MockTextProvider::fixed("Try the good-first-issue label."));

    let (status, body) = app
        .post_json(
            "/ai_chat",
            json!({
                "prompt": "what now?",
                "history": [{ "user": "hi", "ai": "hello" }],
                "repo_name": "tokio",
                "repo_info": { "stars": 27000 },
                "skills": ["rust"]
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "Try the good-first-issue label.");

    let history = body["history"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0], json!({ "user": "hi", "ai": "hello" }));
    assert_eq!(history[1]["user"], "what now?");
    assert_eq!(history[1]["ai"], "Try the good-first-issue label.");

    let prompt = &app.model.calls()[0].prompt;
    assert!(prompt.contains("User: hi\nAI: hello"));
    assert!(prompt.contains(r#"Repository Info: {"stars":27000}"#));
}

#[tokio::test]
async fn chat_history_round_trips_as_prefix() {
    let app = TestApp::new(catalogue(), MockTextProvider::new());
    let history = json!([
        { "user": "first", "ai": "one" },
        { "type": "user", "text": "free-form entry" },
        { "user": "second", "ai": "two" }
    ]);

    let (status, body) = app
        .post_json("/ai_chat", json!({ "prompt": "third", "history": history.clone() }))
        .await;

    assert_eq!(status, StatusCode::OK);
    let returned = body["history"].as_array().unwrap();
    assert_eq!(returned.len(), 4);
    assert_eq!(json!(returned[..3]), history);
    assert_eq!(returned[3]["user"], "third");
}

#[tokio::test]
async fn chat_defaults_to_empty_history() {
    let app = TestApp::new(catalogue(), MockTextProvider::empty());

    let (status, body) = app.post_json("/ai_chat", json!({ "prompt": "hello?" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "No insights available.");
    assert_eq!(
        body["history"],
        json!([{ "user": "hello?", "ai": "No insights available." }])
    );
}

#[tokio::test]
async fn chat_prompt_only_embeds_recent_history() {
    let mut config = test_config();
    config.chat.history_window = 1;
    let app = TestApp::with_config(config, catalogue(), MockTextProvider::new());

    let (status, body) = app
        .post_json(
            "/ai_chat",
            json!({
                "prompt": "next",
                "history": [
                    { "user": "old question", "ai": "old answer" },
                    { "user": "recent question", "ai": "recent answer" }
                ]
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    // Echoed history is never trimmed.
    assert_eq!(body["history"].as_array().unwrap().len(), 3);

    let prompt = &app.model.calls()[0].prompt;
    assert!(!prompt.contains("old question"));
    assert!(prompt.contains("recent question"));
}

#[tokio::test]
async fn chat_provider_errors_map_to_500() {
    let app = TestApp::new(catalogue(), MockTextProvider::failing("model overloaded"));

    let (status, body) = app.post_json("/ai_chat", json!({ "prompt": "hi" })).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "model overloaded");
}

// ---------------------------------------------------------------------------
// Cross-cutting layers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn responses_carry_cors_request_id_and_security_headers() {
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    let app = TestApp::new(catalogue(), MockTextProvider::new());
    let request = Request::builder()
        .uri("/")
        .header("origin", "http://localhost:5173")
        .body(Body::empty())
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();

    let headers = response.headers();
    assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
    assert!(headers.contains_key("x-request-id"));
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
}

#[tokio::test]
async fn request_id_from_caller_is_echoed() {
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    let app = TestApp::new(catalogue(), MockTextProvider::new());
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "abc-123")
        .body(Body::empty())
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.headers().get("x-request-id").unwrap(), "abc-123");
}

#[tokio::test]
async fn readiness_uses_text_provider_health() {
    let app = TestApp::new(catalogue(), MockTextProvider::new());

    let (status, body) = app.get("/ready").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}
