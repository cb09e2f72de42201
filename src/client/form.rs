use log::error;

use super::{ClientError, Directory, EmployeeClient};
use crate::models::employee::{Employee, EmployeeChanges, Gender, Position};
use crate::utils::image::encode_data_url;

/// The add/edit form: one draft record and whether it edits an existing one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeeForm {
    pub employee_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub position: Option<Position>,
    pub gender: Option<Gender>,
    pub image: Option<String>,
    pub edit_mode: bool,
}

impl EmployeeForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads an existing record for editing.
    pub fn edit(&mut self, employee: &Employee) {
        *self = EmployeeForm {
            employee_id: employee.employee_id.clone(),
            name: employee.name.clone(),
            email: employee.email.clone(),
            phone: employee.phone.clone(),
            position: Some(employee.position),
            gender: employee.gender,
            image: employee.image.clone(),
            edit_mode: true,
        };
    }

    pub fn reset(&mut self) {
        *self = EmployeeForm::default();
    }

    pub fn attach_image(&mut self, bytes: &[u8], content_type: &str) {
        self.image = Some(encode_data_url(bytes, content_type));
    }

    pub fn title(&self) -> &'static str {
        if self.edit_mode {
            "Edit Employee"
        } else {
            "Add Employee"
        }
    }

    /// The draft as a record, provided every required field is filled in.
    pub fn to_record(&self) -> Result<Employee, ClientError> {
        let required = [
            ("employeeId", &self.employee_id),
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ClientError::Invalid(format!("{} is required", field)));
        }
        let position = self
            .position
            .ok_or_else(|| ClientError::Invalid("position is required".to_string()))?;

        Ok(Employee {
            employee_id: self.employee_id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            position,
            gender: self.gender,
            image: self.image.clone(),
        })
    }

    /// Creates the record in add mode and updates it in edit mode, then
    /// clears the form and reloads `directory`. On failure the draft is kept
    /// so it can be resubmitted.
    pub async fn submit(
        &mut self,
        client: &EmployeeClient,
        directory: &mut Directory,
    ) -> Result<(), ClientError> {
        let record = self.to_record()?;

        let result = if self.edit_mode {
            let employee_id = record.employee_id.clone();
            client.update(&employee_id, &EmployeeChanges::from(record)).await
        } else {
            client.create(&record).await
        };

        if let Err(err) = result {
            error!("Failed to save employee {}: {}", self.employee_id, err);
            return Err(err);
        }

        self.reset();
        directory.refresh(client).await
    }
}
