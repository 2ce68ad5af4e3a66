// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Algoflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Algoflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::debug;
use serde::{Deserialize, Serialize};

use super::{AppState, TEXT_REQUIRED};
use crate::model::AlgorithmText;
use crate::session::{SessionSnapshot, TransitionError};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertRequest {
    #[serde(default)]
    pub algorithm_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertResponse {
    pub mermaid_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_response: Option<String>,
    /// Set when `mermaid_code` is a fallback diagram rather than the model's answer.
    #[serde(default, skip_serializing_if = "is_false")]
    pub fallback: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SubmitRequest {
    #[serde(default)]
    algorithm_text: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct RenderErrorRequest {
    #[serde(default)]
    message: String,
}

#[derive(Debug)]
pub(super) enum ApiError {
    BadRequest(String),
    Conflict(TransitionError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            Self::BadRequest(error) => (StatusCode::BAD_REQUEST, error),
            Self::Conflict(err) => (StatusCode::CONFLICT, err.to_string()),
        };
        (status, Json(ErrorBody { error })).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

pub(super) async fn health() -> &'static str {
    "ok"
}

pub(super) async fn convert(
    State(state): State<AppState>,
    payload: Result<Json<ConvertRequest>, JsonRejection>,
) -> Result<Json<ConvertResponse>, ApiError> {
    let text = match payload {
        Ok(Json(request)) => request.algorithm_text.unwrap_or_default(),
        Err(rejection) => {
            debug!(err:err = rejection; "unreadable /convert body");
            String::new()
        }
    };
    let text = AlgorithmText::new(text).map_err(|err| {
        debug!(err:err; "rejecting /convert");
        ApiError::BadRequest(TEXT_REQUIRED.to_owned())
    })?;

    let conversion = state.converter.convert(&text).await;
    Ok(Json(ConvertResponse {
        fallback: conversion.is_fallback(),
        mermaid_code: conversion.diagram.into_string(),
        full_response: conversion.full_response,
    }))
}

pub(super) async fn session(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.controller.snapshot().await)
}

pub(super) async fn submit(
    State(state): State<AppState>,
    payload: Result<Json<SubmitRequest>, JsonRejection>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let Json(request) = payload?;
    Ok(Json(state.controller.submit(request.algorithm_text).await))
}

pub(super) async fn regenerate(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.controller.regenerate().await)
}

pub(super) async fn clear(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.controller.clear().await)
}

pub(super) async fn render_error(
    State(state): State<AppState>,
    payload: Result<Json<RenderErrorRequest>, JsonRejection>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let Json(request) = payload?;
    let snapshot =
        state.controller.report_render_error(request.message).await.map_err(ApiError::Conflict)?;
    Ok(Json(snapshot))
}
