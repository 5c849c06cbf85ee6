pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::jobs::handlers as jobs;
use crate::portfolio::handlers as portfolio;
use crate::recommendations::handlers as recommendations;
use crate::skills::handlers as skills;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Skills
        .route("/api/v1/roles", get(skills::handle_list_roles))
        .route("/api/v1/skills/gap", post(skills::handle_skill_gap))
        .route("/api/v1/skills/extract", post(skills::handle_extract_skills))
        // Jobs
        .route("/api/v1/jobs/match", post(jobs::handle_job_match))
        // Portfolio
        .route(
            "/api/v1/portfolio/score",
            post(portfolio::handle_score_portfolio),
        )
        // Recommendations
        .route(
            "/api/v1/recommendations",
            post(recommendations::handle_recommendations),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;

    fn make_router() -> Router {
        build_router(AppState::from_config(Config::default()).unwrap())
    }

    async fn send(method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = make_router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send("GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_roles() {
        let (status, body) = send("GET", "/api/v1/roles", None).await;
        assert_eq!(status, StatusCode::OK);
        let roles: Vec<&str> = body["roles"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert!(roles.contains(&"frontend"));
        assert!(roles.contains(&"backend"));
    }

    #[tokio::test]
    async fn test_skill_gap() {
        let (status, body) = send(
            "POST",
            "/api/v1/skills/gap",
            Some(json!({"presentSkills": ["html", "CSS", "JavaScript", "React"], "role": "Frontend"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["analysis"]["role"], "frontend");
        assert_eq!(
            body["analysis"]["missingSkills"]["essential"],
            json!(["Responsive Design"])
        );
        assert!(body["summary"]["message"].is_string());
    }

    #[tokio::test]
    async fn test_unknown_role_is_invalid_role() {
        let (status, body) = send(
            "POST",
            "/api/v1/skills/gap",
            Some(json!({"presentSkills": [], "role": "wizard"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_ROLE");
    }

    #[tokio::test]
    async fn test_malformed_body_is_validation_error() {
        let (status, body) = send("POST", "/api/v1/skills/gap", Some(json!({"presentSkills": []}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_extract_skills() {
        let (status, body) = send(
            "POST",
            "/api/v1/skills/extract",
            Some(json!({"projects": [{
                "id": "web",
                "dependencyFiles": [{"path": "package.json", "contents": "{\"dependencies\": {\"react\": \"^18.0.0\"}}"}]
            }]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["completed"], 1);
        assert!(body["skills"]
            .as_array()
            .unwrap()
            .contains(&json!("React")));
    }

    #[tokio::test]
    async fn test_job_match_from_description() {
        let (status, body) = send(
            "POST",
            "/api/v1/jobs/match",
            Some(json!({
                "jobDescription": "We need Python and Docker experience.",
                "projects": [{"id": "p1", "languages": {"Python": 1200}, "stars": 3}]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["matchedSkills"], json!(["Python"]));
        assert_eq!(body["missingSkills"], json!(["Docker"]));
        assert_eq!(body["matchPercentage"], 50);
        assert_eq!(body["recommendedProjects"], json!(["p1"]));
    }

    #[tokio::test]
    async fn test_job_match_requires_skills_or_description() {
        let (status, body) = send("POST", "/api/v1/jobs/match", Some(json!({"projects": []}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_portfolio_score_empty() {
        let (status, body) = send(
            "POST",
            "/api/v1/portfolio/score",
            Some(json!({"projects": []})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["overallScore"], 0);
        assert_eq!(body["rank"], "C");
    }

    #[tokio::test]
    async fn test_recommendations_filtered() {
        let (status, body) = send(
            "POST",
            "/api/v1/recommendations",
            Some(json!({
                "presentSkills": ["HTML", "CSS"],
                "role": "frontend",
                "filters": {"difficulty": "beginner", "category": "all", "sortBy": "priority"}
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let recommendations = body["recommendations"].as_array().unwrap();
        assert!(!recommendations.is_empty());
        assert!(recommendations.iter().all(|r| r["difficulty"] == "beginner"));
        let scores: Vec<u64> = recommendations
            .iter()
            .filter_map(|r| r["priorityScore"].as_u64())
            .collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }
}
