use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::state::AppState;
use super::{banks, exams, health, questions};

/// Create the full router with application state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        // Bank catalog
        .route("/banks", get(banks::list_banks).post(banks::create_bank))
        .route("/banks/import", post(banks::import_bank))
        .route("/banks/{bank_key}", get(banks::get_bank))
        .route("/banks/{bank_key}/topics", get(banks::list_topics))
        .route(
            "/banks/{bank_key}/questions",
            get(questions::list_questions).post(questions::create_question),
        )
        .route(
            "/banks/{bank_key}/questions/{external_id}",
            put(questions::update_question).delete(questions::delete_question),
        )
        .route("/courses", get(banks::list_courses))
        .route("/courses/{course}/banks", get(banks::list_course_banks))
        // Exam generation
        .route("/generate-preview", post(exams::generate_preview))
        .route("/generate-exam", post(exams::generate_exam))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::domain::{ExamTemplate, InMemoryBankRepository};
    use crate::infrastructure::bank::{BankResolver, FlatFileBankStore};
    use crate::infrastructure::services::{BankService, ExamService};

    const BANK_JSON: &str = r#"{
        "course": "CS 345",
        "unit": "Unit 1",
        "questions": [
            {"id": "a1", "latex": "\\question A1", "topic": "algebra"},
            {"id": "a2", "latex": "\\question A2", "topic": "algebra"},
            {"id": "g1", "latex": "\\question G1", "topic": "graphs"},
            {"id": "g2", "latex": "\\question G2", "topic": "graphs"}
        ]
    }"#;

    fn app(dir: &Path) -> Router {
        let repository = Arc::new(InMemoryBankRepository::new());
        let resolver = BankResolver::new(repository.clone(), FlatFileBankStore::new(dir));
        let template = ExamTemplate::new("{{ COURSE }} / {{ UNIT }}\n{{ QUESTIONS }}");

        create_router(AppState::new(
            BankService::new(repository),
            ExamService::new(resolver, template),
        ))
    }

    fn banks_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("unit1.json"), BANK_JSON).unwrap();
        dir
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let dir = banks_dir();
        let response = app(dir.path()).oneshot(get("/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "healthy");
    }

    #[tokio::test]
    async fn test_ready_reports_store_check() {
        let dir = banks_dir();
        let response = app(dir.path()).oneshot(get("/ready")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["checks"][0]["name"], "bank_store");
        assert_eq!(body["checks"][0]["status"], "healthy");
        assert!(body["checks"][0]["latency_ms"].is_u64());
    }

    #[tokio::test]
    async fn test_list_banks_and_topics_from_files() {
        let dir = banks_dir();
        let app = app(dir.path());

        let response = app.clone().oneshot(get("/banks")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!(["unit1"]));

        let response = app.clone().oneshot(get("/banks/unit1/topics")).await.unwrap();
        assert_eq!(body_json(response).await, json!(["algebra", "graphs"]));

        let response = app.oneshot(get("/banks/unknown/topics")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!([]));
    }

    #[tokio::test]
    async fn test_preview_matches_exam() {
        let dir = banks_dir();
        let app = app(dir.path());
        let body = json!({
            "total_questions": 4,
            "topic_weights": {"algebra": 0.5, "graphs": 0.5},
            "seed": 42
        });

        let response = app
            .clone()
            .oneshot(json_request("POST", "/generate-preview?bank_file=unit1.json", body.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let preview = body_json(response).await;
        assert_eq!(preview["course"], "CS 345");
        let latex: Vec<String> = preview["questions"]
            .as_array()
            .unwrap()
            .iter()
            .map(|q| q["latex"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(latex.len(), 4);

        let response = app
            .oneshot(json_request("POST", "/generate-exam?bank_file=unit1.json", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/plain"));

        let document = body_text(response).await;
        assert_eq!(document, format!("CS 345 / Unit 1\n{}", latex.join("\n")));
    }

    #[tokio::test]
    async fn test_generate_errors_use_envelope() {
        let dir = banks_dir();
        let app = app(dir.path());

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/generate-exam?bank_file=missing",
                json!({"total_questions": 1, "topic_weights": {"algebra": 1.0}}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"]["type"], "not_found_error");

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/generate-exam?bank_file=unit1",
                json!({"total_questions": 4, "topic_weights": {"algebra": 0.5, "graphs": 0.4}}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"]["message"],
            "weights must sum to ~1.0"
        );

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/generate-preview?bank_file=unit1",
                json!({"total_questions": "four"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(response).await["error"]["code"], "json_parse_error");

        let response = app
            .oneshot(json_request(
                "POST",
                "/generate-exam",
                json!({"total_questions": 1, "topic_weights": {"algebra": 1.0}}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["type"], "invalid_request_error");
        assert_eq!(body["error"]["code"], "query_parse_error");
    }

    #[tokio::test]
    async fn test_question_crud() {
        let dir = banks_dir();
        let app = app(dir.path());

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/banks",
                json!({"bank_key": "cs345-u2", "course": "CS 345", "unit": "Unit 2"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/banks/cs345-u2/questions",
                json!({"external_id": "q1", "latex": "\\question Q1", "topic": "trees"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/banks/cs345-u2/questions",
                json!({"external_id": "q1", "latex": "\\question again"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                "/banks/cs345-u2/questions/q1",
                json!({"difficulty": 3}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let updated = body_json(response).await;
        assert_eq!(updated["difficulty"], 3);
        assert_eq!(updated["topic"], "trees");

        let response = app
            .clone()
            .oneshot(get("/banks/cs345-u2/questions"))
            .await
            .unwrap();
        assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/banks/cs345-u2/questions/q1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/banks/cs345-u2/questions/q1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_import_then_resolve_from_store() {
        let dir = banks_dir();
        let app = app(dir.path());

        let boundary = "exam-boundary";
        let imported = r#"{"course": "CS 345", "unit": "Unit 1", "title": "Stored",
            "questions": [{"id": "s1", "latex": "\\question S1", "topic": "algebra"}]}"#;
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"cs345_unit1.json\"\r\n\
             Content-Type: application/json\r\n\r\n{imported}\r\n--{b}--\r\n",
            b = boundary
        );

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/banks/import")
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={}", boundary),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(response).await["bank_key"], "cs345_unit1");

        let response = app.clone().oneshot(get("/courses")).await.unwrap();
        assert_eq!(body_json(response).await, json!(["CS 345"]));

        let response = app
            .clone()
            .oneshot(get("/courses/CS%20345/banks"))
            .await
            .unwrap();
        assert_eq!(body_json(response).await[0]["title"], "Stored");

        let response = app.clone().oneshot(get("/banks/cs345_unit1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["unit"], "Unit 1");

        let response = app.clone().oneshot(get("/banks/nope")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // Topics follow the stored questions of the file's course unit.
        let response = app.clone().oneshot(get("/banks/unit1/topics")).await.unwrap();
        assert_eq!(body_json(response).await, json!(["algebra"]));

        // The flat file still anchors the identity; the durable store now supplies questions.
        let response = app
            .oneshot(json_request(
                "POST",
                "/generate-preview?bank_file=unit1",
                json!({"total_questions": 1, "topic_weights": {"algebra": 1.0}, "seed": 1}),
            ))
            .await
            .unwrap();
        let preview = body_json(response).await;
        assert_eq!(preview["questions"][0]["id"], "s1");
    }
}
