//! Highlight injection API routes

use axum::{extract::rejection::JsonRejection, extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::highlights::Highlight;
use crate::html::{make_tag, InjectionResult};
use crate::state::AppState;

/// Create the highlights router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/inject", post(inject))
        .route("/tag", post(tag))
}

/// Chapter HTML plus the highlights to place in it
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InjectRequest {
    pub html: String,
    #[serde(default)]
    pub highlights: Vec<Highlight>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InjectResponse {
    pub html: String,
    pub injected_count: usize,
    pub injected: Vec<String>,
    pub skipped: Vec<SkippedEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedEntry {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight_id: Option<String>,
    pub reason: String,
}

impl From<InjectionResult> for InjectResponse {
    fn from(result: InjectionResult) -> Self {
        Self {
            injected_count: result.injected_count(),
            skipped: result
                .skipped
                .into_iter()
                .map(|skipped| SkippedEntry {
                    index: skipped.index,
                    highlight_id: skipped.highlight_id,
                    reason: skipped.reason.to_string(),
                })
                .collect(),
            injected: result.injected,
            html: result.html,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TagRequest {
    pub highlight: Highlight,
}

#[derive(Debug, Serialize)]
pub struct TagResponse {
    pub tag: String,
}

/// Inject highlights into chapter HTML
async fn inject(
    State(state): State<AppState>,
    payload: std::result::Result<Json<InjectRequest>, JsonRejection>,
) -> Result<Json<InjectResponse>> {
    let Json(request) = payload?;

    // A pass is CPU-bound over the whole chapter
    let worker = state.clone();
    let result = tokio::task::spawn_blocking(move || {
        worker.injector().inject(&request.html, &request.highlights)
    })
    .await?;

    state.record_pass();
    Ok(Json(result.into()))
}

/// Render the markup for a single highlight
async fn tag(
    State(state): State<AppState>,
    payload: std::result::Result<Json<TagRequest>, JsonRejection>,
) -> Result<Json<TagResponse>> {
    let Json(request) = payload?;
    let styles = &state.injector().config().style_classes;
    let anchor = request.highlight.validate(0, styles)?;
    Ok(Json(TagResponse {
        tag: make_tag(&anchor, anchor.style_class),
    }))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::routes::app;
    use crate::state::AppState;

    async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
        let app = app(AppState::new(Config::default()));
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_inject_route() {
        let (status, body) = post_json(
            "/api/v1/highlights/inject",
            json!({
                "html": "This is a highlight example to perform test.",
                "highlights": [
                    {
                        "highlightId": "h-1",
                        "content": "highlight example",
                        "contentPre": "is a ",
                        "contentPost": " to perform",
                        "type": 0
                    },
                    {
                        "highlightId": "h-2",
                        "content": "absent",
                        "contentPre": "not ",
                        "contentPost": " here",
                        "type": 0
                    }
                ]
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["injectedCount"], 1);
        assert_eq!(body["injected"][0], "h-1");
        assert_eq!(body["skipped"][0]["highlightId"], "h-2");
        assert_eq!(body["skipped"][0]["index"], 1);
        assert!(body["html"]
            .as_str()
            .unwrap()
            .contains("<highlight id=\"h-1\" onclick=\"callHighlightURL(this);\""));
    }

    #[tokio::test]
    async fn test_tag_route() {
        let (status, body) = post_json(
            "/api/v1/highlights/tag",
            json!({
                "highlight": {
                    "highlightId": "h-1",
                    "content": "highlight example",
                    "type": 3,
                    "noteForHighlight": "note"
                }
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["tag"],
            "<highlight id=\"h-1\" onclick=\"callHighlightWithNoteURL(this);\" \
             class=\"highlight-pink\">highlight example</highlight>"
        );
    }

    #[tokio::test]
    async fn test_tag_route_rejects_invalid_highlight() {
        let (status, body) = post_json(
            "/api/v1/highlights/tag",
            json!({ "highlight": { "highlightId": "h-1", "content": "x", "type": 9 } }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "bad_request");
        assert!(body["message"].as_str().unwrap().contains("unknown style code 9"));
    }

    #[tokio::test]
    async fn test_inject_route_counts_passes() {
        let state = AppState::new(Config::default());
        let body = json!({ "html": "<p>text</p>", "highlights": [] });

        for _ in 0..2 {
            let response = app(state.clone())
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/api/v1/highlights/inject")
                        .header("content-type", "application/json")
                        .body(Body::from(body.to_string()))
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        assert_eq!(state.passes_served(), 2);
    }

    #[tokio::test]
    async fn test_inject_route_rejects_malformed_body() {
        let (status, body) = post_json("/api/v1/highlights/inject", json!({ "highlights": [] })).await;

        assert!(status.is_client_error());
        assert_eq!(body["error"], "invalid_body");
    }
}
