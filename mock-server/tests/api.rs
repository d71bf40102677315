use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Comment, FileInfo, Hook};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

// --- hooks ---

#[tokio::test]
async fn list_hooks_empty() {
    let resp = app().oneshot(empty_request("GET", "/hook/app/1")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let hooks: Vec<Hook> = body_json(resp).await;
    assert!(hooks.is_empty());
}

#[tokio::test]
async fn create_hook_returns_201() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/hook/app/1",
            r#"{"url":"https://example.com/cb","type":"item.create"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["hook_id"], 1);
}

#[tokio::test]
async fn create_hook_malformed_json_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/hook/app/1", r#"{"url":"x"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn delete_hook_not_found() {
    let resp = app().oneshot(empty_request("DELETE", "/hook/99")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn validate_unknown_hook_returns_404() {
    let resp = app()
        .oneshot(json_request("POST", "/hook/5/verify/validate", r#"{"code":"abc"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn hook_bad_ref_id_returns_400() {
    let resp = app().oneshot(empty_request("GET", "/hook/app/undefined")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- files ---

#[tokio::test]
async fn upload_multipart_file() {
    let boundary = "XBOUNDARY";
    let body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"filename\"\r\n\r\nnotes.txt\r\n\
         --{boundary}\r\nContent-Disposition: form-data; name=\"source\"\r\n\r\nhello\r\n\
         --{boundary}--\r\n"
    );
    let req = Request::builder()
        .method("POST")
        .uri("/file")
        .header(
            http::header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(body)
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let file: FileInfo = body_json(resp).await;
    assert_eq!(file.name, "notes.txt");
    assert_eq!(file.size, 5);
}

#[tokio::test]
async fn upload_json_is_rejected() {
    let resp = app()
        .oneshot(json_request("POST", "/file", r#"{"filename":"a"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_file_not_found() {
    let resp = app().oneshot(empty_request("GET", "/file/1")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- comments ---

#[tokio::test]
async fn comment_records_hook_flag() {
    let resp = app()
        .oneshot(json_request("POST", "/comment/item/3?hook=false", r#"{"value":"hi"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let comment: Comment = body_json(resp).await;
    assert_eq!(comment.value, "hi");
    assert!(!comment.hook);
}

// --- full hook lifecycle ---

#[tokio::test]
async fn hook_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/hook/space/8",
            r#"{"url":"https://example.com/cb","type":"status.create"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: serde_json::Value = body_json(resp).await;
    let id = created["hook_id"].as_u64().unwrap();

    // list: only on the ref it was attached to
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/hook/space/8"))
        .await
        .unwrap();
    let hooks: Vec<Hook> = body_json(resp).await;
    assert_eq!(hooks.len(), 1);
    assert_eq!(hooks[0].hook_id, id);
    assert_eq!(hooks[0].status, "inactive");

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/hook/app/8"))
        .await
        .unwrap();
    let hooks: Vec<Hook> = body_json(resp).await;
    assert!(hooks.is_empty());

    // validate
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            &format!("/hook/{id}/verify/validate"),
            r#"{"code":"1234"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/hook/space/8"))
        .await
        .unwrap();
    let hooks: Vec<Hook> = body_json(resp).await;
    assert_eq!(hooks[0].status, "active");

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("DELETE", &format!("/hook/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let body = body_bytes(resp).await;
    assert!(body.is_empty());

    // delete again: 404
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("DELETE", &format!("/hook/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
