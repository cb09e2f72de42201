use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{http, middleware, web, App, HttpServer};
use log::info;

use employee_directory::config::{Config, StorageConfig};
use employee_directory::db::{create_pool, PgDocumentStore};
use employee_directory::errors::AppError;
use employee_directory::handlers;
use employee_directory::storage::memory::{MemoryBlobStore, MemoryDocumentStore};
use employee_directory::storage::{BlobStore, DocumentStore};
use employee_directory::utils::s3::{create_s3_client, S3BlobStore};

async fn build_stores(
    storage: &StorageConfig,
) -> Result<(Arc<dyn DocumentStore>, Arc<dyn BlobStore>), AppError> {
    match storage {
        StorageConfig::Postgres {
            database_url,
            bucket,
            region,
            image_base_url,
        } => {
            let pool = create_pool(database_url).await?;
            let documents = PgDocumentStore::new(pool);
            documents.migrate().await?;

            let s3_client = create_s3_client(region.clone()).await;
            let blobs = S3BlobStore::new(s3_client, bucket.clone(), image_base_url.clone());

            info!("Using PostgreSQL documents and S3 bucket {}", bucket);
            Ok((Arc::new(documents), Arc::new(blobs)))
        }
        StorageConfig::Memory { image_base_url } => {
            info!("Using in-memory storage; records are lost on shutdown");
            Ok((
                Arc::new(MemoryDocumentStore::new()),
                Arc::new(MemoryBlobStore::new(image_base_url.clone())),
            ))
        }
    }
}

fn cors(allowed_origin: Option<&str>) -> Cors {
    match allowed_origin {
        Some(origin) => Cors::default()
            .allowed_origin(origin)
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
            .allowed_header(http::header::CONTENT_TYPE),
        None => Cors::permissive(),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = Config::from_env().map_err(std::io::Error::other)?;
    env_logger::init();

    let (documents, blobs) = build_stores(&config.storage)
        .await
        .map_err(std::io::Error::other)?;

    info!("Starting server at {}", config.bind_address);

    let json_body_limit = config.json_body_limit;
    let allowed_origin = config.cors_allowed_origin.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(cors(allowed_origin.as_deref()))
            .wrap(middleware::Logger::default())
            .app_data(handlers::json_config(json_body_limit))
            .app_data(web::Data::from(documents.clone()))
            .app_data(web::Data::from(blobs.clone()))
            .configure(handlers::configure)
    })
    .bind(&config.bind_address)?
    .run()
    .await
}
