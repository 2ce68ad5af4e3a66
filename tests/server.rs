// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Algoflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Algoflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;

use algoflow::classify::Classifier;
use algoflow::convert::{fallback_diagram, Converter, FallbackKind};
use algoflow::generate::mock::ScriptedClient;
use algoflow::generate::GenerationError;
use algoflow::server::{self, AppState, ConvertResponse, ErrorBody, TEXT_REQUIRED};
use algoflow::session::SessionController;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::sync::oneshot;

const BUBBLE_SORT: &str = "Sort the array using bubble sort, comparing adjacent elements";

struct TestServer {
    base: String,
    http: reqwest::Client,
    client: Arc<ScriptedClient>,
    shutdown: Option<oneshot::Sender<()>>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn start(client: ScriptedClient) -> Self {
        let client = Arc::new(client);
        let converter = Converter::new(client.clone());
        let state = AppState {
            controller: SessionController::new(converter.clone(), Classifier::default()),
            converter,
        };

        let listener = server::bind(0).await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let (shutdown, stop) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            server::serve(listener, state, async {
                let _ = stop.await;
            })
            .await
            .expect("serve");
        });

        Self {
            base: format!("http://{addr}"),
            http: reqwest::Client::builder().no_proxy().build().expect("http client"),
            client,
            shutdown: Some(shutdown),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let response =
            self.http.post(self.url(path)).json(&body).send().await.expect("request sent");
        let status = response.status();
        (status, response.json().await.expect("json body"))
    }

    async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        self.handle.await.expect("server task");
    }
}

#[tokio::test]
async fn health_answers_ok() {
    let server = TestServer::start(ScriptedClient::replying("flowchart TD")).await;

    let response = server.http.get(server.url("/health")).send().await.expect("request sent");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.expect("body"), "ok");

    server.stop().await;
}

#[tokio::test]
async fn convert_rejects_missing_text() {
    let server = TestServer::start(ScriptedClient::replying("flowchart TD")).await;

    for body in [json!({}), json!({ "algorithmText": "   " }), json!({ "algorithmText": 7 })] {
        let (status, value) = server.post("/convert", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value, json!({ "error": TEXT_REQUIRED }));
    }

    let response = server
        .http
        .post(server.url("/convert"))
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body("not json")
        .send()
        .await
        .expect("request sent");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = response.json().await.expect("error body");
    assert_eq!(body.error, TEXT_REQUIRED);

    assert_eq!(server.client.calls(), 0);
    server.stop().await;
}

#[tokio::test]
async fn convert_returns_repaired_code_and_raw_response() {
    let raw = "```mermaid\ngraph TD\n  A[\"Start\"] -> B{Is valid(x)?}\n```";
    let server = TestServer::start(ScriptedClient::replying(raw)).await;

    let (status, value) = server.post("/convert", json!({ "algorithmText": "hi" })).await;
    assert_eq!(status, StatusCode::OK);
    let response: ConvertResponse = serde_json::from_value(value).expect("convert response");
    assert_eq!(response.mermaid_code, "flowchart TD\nA[Start] --> B{Is valid x ?}");
    assert_eq!(response.full_response.as_deref(), Some(raw));
    assert!(!response.fallback);

    server.stop().await;
}

#[tokio::test]
async fn convert_falls_back_when_provider_fails() {
    let server =
        TestServer::start(ScriptedClient::failing(GenerationError::MissingCredential)).await;

    let (status, value) = server.post("/convert", json!({ "algorithmText": BUBBLE_SORT })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        value,
        json!({
            "mermaidCode": fallback_diagram(FallbackKind::Minimal).as_str(),
            "fallback": true,
        })
    );

    server.stop().await;
}

#[tokio::test]
async fn session_routes_follow_the_lifecycle() {
    let reply = "flowchart TD\nA([Start]) --> B[Compare pairs]\nB --> C([End])";
    let server = TestServer::start(ScriptedClient::replying(reply)).await;

    let (status, idle) = server.post("/session/render-error", json!({ "message": "x" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(idle["error"].as_str().is_some_and(|e| e.contains("idle")));

    let (_, rejected) = server.post("/session/submit", json!({ "algorithmText": "hi" })).await;
    assert_eq!(rejected["state"], "failed");
    assert_eq!(server.client.calls(), 0);

    let (_, ready) = server.post("/session/submit", json!({ "algorithmText": BUBBLE_SORT })).await;
    assert_eq!(ready["state"], "ready");
    assert_eq!(ready["mermaidCode"], reply);
    assert_eq!(ready["algorithmText"], BUBBLE_SORT);
    assert_eq!(ready["fullResponse"], reply);

    let current: Value = server
        .http
        .get(server.url("/session"))
        .send()
        .await
        .expect("request sent")
        .json()
        .await
        .expect("snapshot");
    assert_eq!(current, ready);

    let (_, regenerated) = server.post("/session/regenerate", json!({})).await;
    assert_eq!(regenerated["state"], "ready");
    assert_eq!(server.client.calls(), 2);

    let (status, failed) =
        server.post("/session/render-error", json!({ "message": "Parse error" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(failed["error"], "Error rendering diagram: Parse error");

    let (_, cleared) = server.post("/session/clear", json!({})).await;
    assert_eq!(cleared["state"], "idle");
    assert_eq!(cleared["algorithmText"], "");
    assert_eq!(cleared["mermaidCode"], "");
    assert_eq!(cleared["fullResponse"], Value::Null);

    server.stop().await;
}
