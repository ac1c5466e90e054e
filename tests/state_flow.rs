//! Request flow through an installed greeting service.

use axum::http::{header, StatusCode};
use serde_json::json;
use web_service_host::http::{AxumHost, HttpServer, X_REQUEST_ID};
use web_service_host::Shutdown;

mod common;

use common::{body_json, get, post_json};

#[tokio::test]
async fn test_name_update_is_visible_to_later_requests() {
    let host = AxumHost::new();
    let app = host.router();
    let mut service = common::greeting_service(host.clone());
    service.install().await.unwrap();

    let response = get(&app, "/webservice/api/hello").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "message": "Hello Jaymoney!" }));

    let response = post_json(&app, "/webservice/api/name", json!({ "userName": "WannaWatchMeCode" })).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("application/json"));
    assert_eq!(
        body_json(response).await,
        json!({ "message": "Username has been updated from Jaymoney to WannaWatchMeCode" })
    );

    let response = get(&app, "/webservice/api/hello").await;
    assert_eq!(body_json(response).await, json!({ "message": "Hello WannaWatchMeCode!" }));

    let response = post_json(&app, "/webservice/api/name", json!({ "userName": "AnadaOne" })).await;
    assert_eq!(
        body_json(response).await,
        json!({ "message": "Username has been updated from WannaWatchMeCode to AnadaOne" })
    );
    assert_eq!(service.state().get_str("currentUserName").as_deref(), Some("AnadaOne"));
}

#[tokio::test]
async fn test_creator_is_unchanged_by_name_updates() {
    let host = AxumHost::new();
    let app = host.router();
    let mut service = common::greeting_service(host.clone());
    service.install().await.unwrap();

    post_json(&app, "/webservice/api/name", json!({ "userName": "AnadaOne" })).await;
    let body = body_json(get(&app, "/webservice/api/creator").await).await;
    assert_eq!(body["creatorName"], common::USER_NAME);
    assert!(body["createdAt"].is_u64());
}

#[tokio::test]
async fn test_name_requires_user_name() {
    let host = AxumHost::new();
    let app = host.router();
    let mut service = common::greeting_service(host.clone());
    service.install().await.unwrap();

    let response = post_json(&app, "/webservice/api/name", json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"]["code"], "bad_request");
    assert_eq!(service.state().get_str("currentUserName").as_deref(), Some("Jaymoney"));
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let host = AxumHost::new();
    let app = host.router();
    let mut service = common::greeting_service(host.clone());
    service.install().await.unwrap();

    let response = get(&app, "/webservice/api/hello").await;
    let id = response.headers()[X_REQUEST_ID].to_str().unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok());
}

#[tokio::test]
async fn test_routes_disappear_after_uninstall() {
    let host = AxumHost::new();
    let app = host.router();
    let mut service = common::greeting_service(host.clone());

    assert_eq!(get(&app, "/webservice/api/hello").await.status(), StatusCode::NOT_FOUND);
    service.install().await.unwrap();
    assert_eq!(get(&app, "/webservice/api/hello").await.status(), StatusCode::OK);
    service.uninstall().await.unwrap();
    assert_eq!(get(&app, "/webservice/api/hello").await.status(), StatusCode::NOT_FOUND);
    assert!(host.mounted_paths().await.is_empty());
}

#[tokio::test]
async fn test_wrong_method_is_not_served() {
    let host = AxumHost::new();
    let app = host.router();
    let mut service = common::greeting_service(host.clone());
    service.install().await.unwrap();

    let status = get(&app, "/webservice/api/name").await.status();
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_over_a_real_socket() {
    let host = AxumHost::new();
    let mut service = common::greeting_service(host.clone());
    service.install().await.unwrap();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = tokio::spawn(HttpServer::new(host).run(listener, shutdown.subscribe()));

    let client = reqwest::Client::new();
    let base = format!("http://{}/webservice/api", addr);

    let res = client
        .post(format!("{}/name", base))
        .json(&json!({ "userName": "WannaWatchMeCode" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);

    let body: serde_json::Value = client
        .get(format!("{}/hello", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body, json!({ "message": "Hello WannaWatchMeCode!" }));

    shutdown.trigger();
    server.await.unwrap().unwrap();
}
