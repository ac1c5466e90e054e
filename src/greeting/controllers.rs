//! Greeting controllers.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::http::middleware::JsonBodyMiddleware;
use crate::service::{ControllerClass, ControllerError, ControllerHandler, ControllerRequest, HttpMethod, WebController};

const CURRENT_USER_NAME: &str = "currentUserName";

/// `GET hello`: greets the current user.
pub struct HelloHandler;

#[async_trait]
impl ControllerHandler for HelloHandler {
    async fn handle(&self, request: ControllerRequest) -> Result<Response, ControllerError> {
        let name = request
            .state_str(CURRENT_USER_NAME)
            .ok_or_else(|| ControllerError::NotFound(CURRENT_USER_NAME.into()))?;
        Ok(Json(json!({ "message": format!("Hello {}!", name) })).into_response())
    }
}

/// `POST name`: replaces the current user name with `userName` from the body.
pub struct NameHandler;

#[async_trait]
impl ControllerHandler for NameHandler {
    async fn handle(&self, request: ControllerRequest) -> Result<Response, ControllerError> {
        let new_name = request
            .body_str("userName")
            .ok_or_else(|| ControllerError::BadRequest("userName is required".into()))?
            .to_string();

        let previous = request.store.state().set(CURRENT_USER_NAME, new_name.clone());
        let old_name = previous
            .as_ref()
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        tracing::info!(
            request_id = request.request_id.as_deref().unwrap_or("unknown"),
            old = %old_name,
            new = %new_name,
            elapsed_us = request.store.age().as_micros() as u64,
            "Username updated"
        );
        Ok(Json(json!({
            "message": format!("Username has been updated from {} to {}", old_name, new_name)
        }))
        .into_response())
    }
}

/// `GET creator`: reports who created the service state, and when.
pub struct CreatorHandler;

#[async_trait]
impl ControllerHandler for CreatorHandler {
    async fn handle(&self, request: ControllerRequest) -> Result<Response, ControllerError> {
        Ok(Json(json!({
            "creatorName": request.state.get("creatorName"),
            "createdAt": request.state.get("createdAt"),
        }))
        .into_response())
    }
}

pub fn name_controller() -> ControllerClass {
    ControllerClass::new(|props| {
        WebController::new("NameController", "name", HttpMethod::Post, NameHandler)
            .with_middleware(JsonBodyMiddleware::default())
            .with_state_converter(Arc::clone(&props.state_converter))
    })
}

pub fn hello_controller() -> ControllerClass {
    ControllerClass::new(|props| {
        WebController::new("HelloController", "hello", HttpMethod::Get, HelloHandler)
            .with_state_converter(Arc::clone(&props.state_converter))
    })
}

pub fn creator_controller() -> ControllerClass {
    ControllerClass::new(|props| {
        WebController::new("CreatorController", "creator", HttpMethod::Get, CreatorHandler)
            .with_middleware(JsonBodyMiddleware::default())
            .with_state_converter(Arc::clone(&props.state_converter))
    })
}
