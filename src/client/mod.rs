//! Client side of the employee directory: a typed HTTP client plus the state
//! the form and list views are built on.

mod directory;
mod form;

pub use directory::Directory;
pub use form::EmployeeForm;

use std::fmt;

use log::debug;
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use url::Url;

use crate::models::employee::{Employee, EmployeeChanges};

#[derive(Debug)]
pub enum ClientError {
    InvalidUrl(String),
    Invalid(String),
    Http(reqwest::Error),
    Status { status: StatusCode, message: String },
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::InvalidUrl(msg) => write!(f, "Invalid URL: {}", msg),
            ClientError::Invalid(msg) => write!(f, "Invalid employee: {}", msg),
            ClientError::Http(err) => write!(f, "HTTP Error: {}", err),
            ClientError::Status { status, message } => write!(f, "{}: {}", status, message),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Http(err)
    }
}

#[derive(Deserialize)]
struct MessageBody {
    message: String,
}

#[derive(Clone)]
pub struct EmployeeClient {
    http: reqwest::Client,
    base_url: Url,
}

impl EmployeeClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url).map_err(|err| ClientError::InvalidUrl(err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(format!("{} cannot be a base URL", base_url)));
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
        })
    }

    fn endpoint(&self, employee_id: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("employees");
            if let Some(id) = employee_id {
                segments.push(id);
            }
        }
        url
    }

    pub async fn list(&self) -> Result<Vec<Employee>, ClientError> {
        let response = self.http.get(self.endpoint(None)).send().await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn create(&self, employee: &Employee) -> Result<(), ClientError> {
        debug!("Creating employee {}", employee.employee_id);
        let response = self.http.post(self.endpoint(None)).json(employee).send().await?;
        check(response).await.map(drop)
    }

    pub async fn update(&self, employee_id: &str, changes: &EmployeeChanges) -> Result<(), ClientError> {
        debug!("Updating employee {}", employee_id);
        let response = self
            .http
            .put(self.endpoint(Some(employee_id)))
            .json(changes)
            .send()
            .await?;
        check(response).await.map(drop)
    }

    pub async fn delete(&self, employee_id: &str) -> Result<(), ClientError> {
        debug!("Deleting employee {}", employee_id);
        let response = self.http.delete(self.endpoint(Some(employee_id))).send().await?;
        check(response).await.map(drop)
    }
}

async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = match response.json::<MessageBody>().await {
        Ok(body) => body.message,
        Err(_) => status.canonical_reason().unwrap_or("Unknown error").to_string(),
    };
    Err(ClientError::Status { status, message })
}
