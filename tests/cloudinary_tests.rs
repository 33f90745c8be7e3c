mod test_utils;

use actix_web::web::Bytes;
use saree_catalog::{
    entities::image::ImageUpload,
    errors::AppError,
    media::{cloudinary::CloudinaryStore, MediaStore},
};
use serde_json::json;
use test_utils::{png_bytes, test_config};
use wiremock::{
    matchers::{body_string_contains, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn sample_upload() -> ImageUpload {
    ImageUpload::from_bytes(Some("front.png".into()), Bytes::from(png_bytes(8, 8))).unwrap()
}

async fn store_for(server: &MockServer) -> CloudinaryStore {
    CloudinaryStore::new(&test_config(&server.uri())).unwrap()
}

#[actix_rt::test]
async fn upload_returns_secure_url_and_public_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/demo-cloud/image/upload"))
        .and(body_string_contains("name=\"signature\""))
        .and(body_string_contains("test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "public_id": "sarees/xyz123",
            "secure_url": "https://res.cloudinary.com/demo-cloud/image/upload/v1/sarees/xyz123.png",
            "bytes": 68
        })))
        .expect(1)
        .mount(&server)
        .await;

    let stored = store_for(&server).await.upload(&sample_upload()).await.unwrap();

    assert_eq!(stored.public_id, "sarees/xyz123");
    assert!(stored.url.starts_with("https://res.cloudinary.com/"));
}

#[actix_rt::test]
async fn upload_error_becomes_media_store_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/demo-cloud/image/upload"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "message": "Invalid Signature" }
        })))
        .mount(&server)
        .await;

    let err = store_for(&server).await.upload(&sample_upload()).await.unwrap_err();

    match err {
        AppError::MediaStore(msg) => assert!(msg.contains("Invalid Signature")),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[actix_rt::test]
async fn delete_accepts_missing_assets() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/demo-cloud/image/destroy"))
        .and(body_string_contains("public_id=sarees%2Fgone"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": "not found" })))
        .expect(1)
        .mount(&server)
        .await;

    store_for(&server).await.delete("sarees/gone").await.unwrap();
}

#[actix_rt::test]
async fn delete_reports_unexpected_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/demo-cloud/image/destroy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": "error" })))
        .mount(&server)
        .await;

    let err = store_for(&server).await.delete("sarees/a").await.unwrap_err();
    assert!(matches!(err, AppError::MediaStore(_)));
}

#[test]
fn debug_output_redacts_credentials() {
    let store = CloudinaryStore::new(&test_config("http://127.0.0.1:1")).unwrap();
    let rendered = format!("{:?}", store);

    assert!(!rendered.contains("test-secret"));
    assert!(!rendered.contains("test-key"));
}
