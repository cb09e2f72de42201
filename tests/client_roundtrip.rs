use std::net::TcpListener;
use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use reqwest::StatusCode;
use url::Url;

use employee_directory::client::{ClientError, Directory, EmployeeClient, EmployeeForm};
use employee_directory::handlers;
use employee_directory::models::employee::{EmployeeChanges, Gender, Position};
use employee_directory::storage::memory::{MemoryBlobStore, MemoryDocumentStore};
use employee_directory::storage::{BlobStore, DocumentStore};

const JPEG_BYTES: [u8; 4] = [0xFF, 0xD8, 0xFF, 0xE0];

#[actix_web::test]
async fn form_and_directory_drive_a_running_server() {
    let documents: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
    let blobs: Arc<dyn BlobStore> = Arc::new(MemoryBlobStore::new(
        Url::parse("https://photos.example.com/").unwrap(),
    ));

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(handlers::json_config(1024 * 1024))
            .app_data(web::Data::from(documents.clone()))
            .app_data(web::Data::from(blobs.clone()))
            .configure(handlers::configure)
    })
    .workers(1)
    .listen(listener)
    .unwrap()
    .run();
    let server_handle = server.handle();
    actix_web::rt::spawn(server);

    let client = EmployeeClient::new(&format!("http://{}", address)).unwrap();
    let mut directory = Directory::new();
    directory.refresh(&client).await.unwrap();
    assert!(directory.employees().is_empty());

    // A rejected draft leaves both the form and the list alone.
    let mut incomplete = EmployeeForm::new();
    incomplete.employee_id = "E-0".to_string();
    assert!(matches!(
        incomplete.submit(&client, &mut directory).await,
        Err(ClientError::Invalid(_))
    ));
    assert_eq!(incomplete.employee_id, "E-0");

    // Add mode submits through create.
    let mut form = EmployeeForm::new();
    form.employee_id = "E-1".to_string();
    form.name = "Ada Lovelace".to_string();
    form.email = "ada@example.com".to_string();
    form.phone = "555-0100".to_string();
    form.position = Some(Position::Developer);
    form.gender = Some(Gender::Female);
    form.attach_image(&JPEG_BYTES, "image/jpeg");
    form.submit(&client, &mut directory).await.unwrap();
    assert_eq!(form, EmployeeForm::new());

    // The directory is reloaded by the submit itself.
    let stored = directory.employees()[0].clone();
    assert_eq!(stored.employee_id, "E-1");
    assert_eq!(
        stored.image.as_deref(),
        Some("https://photos.example.com/employee_images/E-1.png")
    );

    // Edit mode submits through update and keeps the stored photo URL.
    form.edit(&stored);
    form.phone = "555-0199".to_string();
    form.submit(&client, &mut directory).await.unwrap();

    let updated = &directory.employees()[0];
    assert_eq!(updated.phone, "555-0199");
    assert_eq!(updated.image, stored.image);

    let missing = client
        .update("ghost", &EmployeeChanges { name: Some("Ghost".to_string()), ..Default::default() })
        .await;
    match missing {
        Err(ClientError::Status { status, message }) => {
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(message, "Employee not found");
        }
        other => panic!("unexpected {:?}", other),
    }

    directory.set_search("LOVE");
    assert_eq!(directory.visible().len(), 1);
    directory.set_search("hopper");
    assert!(directory.visible().is_empty());
    directory.reset_search(&client).await.unwrap();
    assert_eq!(directory.search(), "");
    assert_eq!(directory.visible().len(), 1);

    directory.delete(&client, "E-1").await.unwrap();
    assert!(directory.employees().is_empty());

    server_handle.stop(true).await;
}
