use actix_web::{web, HttpResponse};
use log::{error, info};
use serde_json::json;

use crate::errors::AppError;
use crate::models::employee::{Employee, EmployeeChanges};
use crate::storage::{BlobStore, DocumentStore};
use crate::utils::image::{decode_data_url, image_key, is_data_url};
use crate::utils::validation::validate_payload;

/// A photo written to the blob store during the current request.
struct UploadedImage {
    key: String,
    url: String,
}

/// Uploads `image` when it is a data URL and returns the value to persist in
/// its place. Anything else (an already-resolved URL) passes through.
async fn store_image(
    blobs: &dyn BlobStore,
    employee_id: &str,
    image: Option<String>,
) -> Result<(Option<String>, Option<UploadedImage>), AppError> {
    match image {
        Some(value) if is_data_url(&value) => {
            let decoded = decode_data_url(&value)?;
            let key = image_key(employee_id);
            blobs.put(&key, decoded.bytes, &decoded.content_type).await?;
            let url = blobs.public_url(&key);
            info!("Stored image for employee {} at {}", employee_id, url);
            Ok((Some(url.clone()), Some(UploadedImage { key, url })))
        }
        other => Ok((other, None)),
    }
}

fn report_orphaned_image(uploaded: &Option<UploadedImage>, employee_id: &str, err: &AppError) {
    if let Some(image) = uploaded {
        error!(
            "Image {} ({}) was stored but employee {} was not written: {}",
            image.key, image.url, employee_id, err
        );
    }
}

async fn create(
    documents: &dyn DocumentStore,
    blobs: &dyn BlobStore,
    mut employee: Employee,
) -> Result<(), AppError> {
    validate_payload(&employee)?;

    let (image, uploaded) = store_image(blobs, &employee.employee_id, employee.image.take()).await?;
    employee.image = image;

    if let Err(err) = documents.put(&employee).await {
        report_orphaned_image(&uploaded, &employee.employee_id, &err);
        return Err(err);
    }
    Ok(())
}

async fn update(
    documents: &dyn DocumentStore,
    blobs: &dyn BlobStore,
    employee_id: &str,
    mut changes: EmployeeChanges,
) -> Result<(), AppError> {
    validate_payload(&changes)?;

    if documents.get(employee_id).await?.is_none() {
        return Err(AppError::NotFound("Employee not found".to_string()));
    }

    let mut uploaded = None;
    if let Some(image) = changes.image.take() {
        let (image, stored) = store_image(blobs, employee_id, image).await?;
        changes.image = Some(image);
        uploaded = stored;
    }

    match documents.merge(employee_id, &changes).await {
        Ok(true) => Ok(()),
        // Deleted between the existence check and the merge.
        Ok(false) => {
            let err = AppError::NotFound("Employee not found".to_string());
            report_orphaned_image(&uploaded, employee_id, &err);
            Err(err)
        }
        Err(err) => {
            report_orphaned_image(&uploaded, employee_id, &err);
            Err(err)
        }
    }
}

pub async fn create_employee(
    documents: web::Data<dyn DocumentStore>,
    blobs: web::Data<dyn BlobStore>,
    new_employee: web::Json<Employee>,
) -> Result<HttpResponse, actix_web::Error> {
    let new_employee = new_employee.into_inner();
    info!("Received employee {}", new_employee.employee_id);

    create(&**documents, &**blobs, new_employee)
        .await
        .map_err(|err| err.collapse("Error creating employee"))?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Employee created successfully",
    })))
}

pub async fn get_employees(
    documents: web::Data<dyn DocumentStore>,
) -> Result<HttpResponse, actix_web::Error> {
    let employees = documents
        .list()
        .await
        .map_err(|err| err.collapse("Error fetching employees"))?;

    Ok(HttpResponse::Ok().json(employees))
}

pub async fn update_employee(
    documents: web::Data<dyn DocumentStore>,
    blobs: web::Data<dyn BlobStore>,
    employee_id: web::Path<String>,
    changes: web::Json<EmployeeChanges>,
) -> Result<HttpResponse, actix_web::Error> {
    let employee_id = employee_id.into_inner();

    update(&**documents, &**blobs, &employee_id, changes.into_inner())
        .await
        .map_err(|err| err.collapse("Error updating employee"))?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Employee updated successfully",
    })))
}

pub async fn delete_employee(
    documents: web::Data<dyn DocumentStore>,
    employee_id: web::Path<String>,
) -> Result<HttpResponse, actix_web::Error> {
    let employee_id = employee_id.into_inner();

    // The stored photo, if any, is left in place.
    documents
        .delete(&employee_id)
        .await
        .map_err(|err| err.collapse("Error deleting employee"))?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Employee deleted successfully",
    })))
}
