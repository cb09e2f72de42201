use super::{ClientError, EmployeeClient};
use crate::models::employee::Employee;

/// Fetched records plus the search box. Search filters locally and never
/// goes back to the server.
#[derive(Debug, Default)]
pub struct Directory {
    employees: Vec<Employee>,
    search: String,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn refresh(&mut self, client: &EmployeeClient) -> Result<(), ClientError> {
        self.employees = client.list().await?;
        Ok(())
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    pub async fn reset_search(&mut self, client: &EmployeeClient) -> Result<(), ClientError> {
        self.search.clear();
        self.refresh(client).await
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    /// Records whose name contains the search string, ignoring case.
    pub fn visible(&self) -> Vec<&Employee> {
        let needle = self.search.trim().to_lowercase();
        self.employees
            .iter()
            .filter(|employee| needle.is_empty() || employee.name.to_lowercase().contains(&needle))
            .collect()
    }

    pub async fn delete(&mut self, client: &EmployeeClient, employee_id: &str) -> Result<(), ClientError> {
        client.delete(employee_id).await?;
        self.refresh(client).await
    }

    #[cfg(test)]
    fn with_employees(employees: Vec<Employee>) -> Self {
        Self {
            employees,
            search: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::employee::Position;

    fn employee(id: &str, name: &str) -> Employee {
        Employee {
            employee_id: id.to_string(),
            name: name.to_string(),
            email: format!("{}@example.com", id),
            phone: "555-0100".to_string(),
            position: Position::Technician,
            gender: None,
            image: None,
        }
    }

    #[test]
    fn search_is_case_insensitive_substring_on_name() {
        let mut directory = Directory::with_employees(vec![
            employee("1", "Ada Lovelace"),
            employee("2", "Grace Hopper"),
            employee("3", "Adele Goldberg"),
        ]);

        directory.set_search("ADA");
        let names: Vec<_> = directory.visible().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Ada Lovelace"]);

        directory.set_search("e");
        assert_eq!(directory.visible().len(), 3);

        directory.set_search("nobody");
        assert!(directory.visible().is_empty());
        assert_eq!(directory.employees().len(), 3);
    }

    #[test]
    fn empty_search_shows_everything() {
        let mut directory = Directory::with_employees(vec![employee("1", "Ada"), employee("2", "Grace")]);
        directory.set_search("   ");
        assert_eq!(directory.visible().len(), 2);
    }
}
