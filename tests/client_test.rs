mod common;

use common::{MockStorageService, app_with};
use photo_upload::client::{ClientError, HttpTransport, LocalFile, PhotoUploader, UploadTransport};
use std::sync::Arc;
use url::Url;

async fn spawn_server(storage: Arc<MockStorageService>) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = app_with(storage);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    Url::parse(&format!("http://{}/api/upload", addr)).unwrap()
}

fn photo(name: &str, size: usize) -> LocalFile {
    LocalFile::new(name, "image/png", vec![0xAB; size])
}

#[tokio::test]
async fn test_transport_round_trip() {
    let storage = Arc::new(MockStorageService::new());
    let endpoint = spawn_server(storage.clone()).await;
    let transport = HttpTransport::new(endpoint);

    let response = transport
        .send_batch(&[photo("cat.png", 1000), photo("dog.png", 2000)])
        .await
        .unwrap();

    assert_eq!(response.files.len(), 2);
    assert_eq!(response.files[0].name, "cat.png");
    assert_eq!(response.files[0].size, 1000);
    assert_eq!(response.files[1].name, "dog.png");
    assert_eq!(response.files[1].size, 2000);
    assert_eq!(response.files[1].content_type, "image/png");
    assert_ne!(response.files[0].path, response.files[1].path);
    assert_eq!(storage.call_count(), 2);
}

#[tokio::test]
async fn test_transport_surfaces_server_error() {
    let storage = Arc::new(MockStorageService::failing_at(1));
    let endpoint = spawn_server(storage).await;
    let transport = HttpTransport::new(endpoint);

    let err = transport
        .send_batch(&[photo("a.png", 1), photo("b.png", 1)])
        .await
        .unwrap_err();

    match err {
        ClientError::Status { status, message } => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(message, "Failed to upload files");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_uploader_against_live_server() {
    let storage = Arc::new(MockStorageService::new());
    let endpoint = spawn_server(storage.clone()).await;
    let mut uploader = PhotoUploader::new(HttpTransport::new(endpoint));

    uploader.select_files([
        photo("cat.png", 1000),
        photo("extra.png", 5),
        photo("dog.png", 2000),
    ]);
    uploader.remove_staged(1);
    assert_eq!(uploader.staged().len(), 2);

    let notice = uploader.upload_batch().await;
    assert!(!notice.is_error(), "{:?}", notice);
    assert_eq!(notice.description, "Successfully uploaded 2 photos");

    assert!(uploader.staged().is_empty());
    assert_eq!(uploader.previews().live(), 0);
    let names: Vec<_> = uploader.uploaded().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["cat.png", "dog.png"]);
    assert_eq!(storage.keys().len(), 2);
}

#[tokio::test]
async fn test_uploader_keeps_staged_after_storage_fault() {
    let storage = Arc::new(MockStorageService::failing_at(0));
    let endpoint = spawn_server(storage.clone()).await;
    let mut uploader = PhotoUploader::new(HttpTransport::new(endpoint));

    uploader.select_files([photo("cat.png", 10), photo("dog.png", 20)]);
    let notice = uploader.upload_batch().await;

    assert!(notice.is_error());
    assert_eq!(notice.title, "Upload failed");
    assert_eq!(uploader.staged().len(), 2);
    assert_eq!(uploader.staged()[0].file.name, "cat.png");
    assert!(uploader.uploaded().is_empty());
    assert!(uploader.can_submit());

    // Resubmission goes through once storage recovers (mock only fails call #0)
    let notice = uploader.upload_batch().await;
    assert!(!notice.is_error());
    assert_eq!(uploader.uploaded().len(), 2);
}

#[tokio::test]
async fn test_uploader_transport_error() {
    // Nothing listens on this port once the listener is dropped
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let endpoint = Url::parse(&format!("http://{}/api/upload", addr)).unwrap();
    let mut uploader = PhotoUploader::new(HttpTransport::new(endpoint));
    uploader.select_files([photo("cat.png", 10)]);

    let notice = uploader.upload_batch().await;
    assert!(notice.is_error());
    assert_eq!(uploader.staged().len(), 1);
    assert!(!uploader.is_uploading());
}
