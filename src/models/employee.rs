use serde::de::value::StrDeserializer;
use serde::de::{DeserializeOwned, IntoDeserializer};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Technician,
    Developer,
    Tester,
    Specialist,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// One employee document, keyed by `employee_id`.
///
/// `image` holds a Base64 data URL on its way in and a fetchable URL once stored.
#[derive(Serialize, Deserialize, Validate, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[validate(length(min = 1))]
    pub employee_id: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub phone: String,
    pub position: Position,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Body of an update: only the fields present are merged into the stored
/// document. The key is taken from the path, never from here.
#[derive(Serialize, Deserialize, Validate, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeChanges {
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    /// `Some(None)` (sent as `""` or `null`) clears the stored value.
    #[serde(default, deserialize_with = "empty_as_cleared", skip_serializing_if = "Option::is_none")]
    pub gender: Option<Option<Gender>>,
    #[serde(default, deserialize_with = "empty_as_cleared", skip_serializing_if = "Option::is_none")]
    pub image: Option<Option<String>>,
}

impl From<Employee> for EmployeeChanges {
    fn from(employee: Employee) -> Self {
        EmployeeChanges {
            name: Some(employee.name),
            email: Some(employee.email),
            phone: Some(employee.phone),
            position: Some(employee.position),
            gender: Some(employee.gender),
            image: Some(employee.image),
        }
    }
}

// The browser form sends "" for untouched radio buttons and file inputs.
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<String>::deserialize(deserializer)?;
    match value.as_deref() {
        None | Some("") => Ok(None),
        Some(raw) => {
            let de: StrDeserializer<'_, D::Error> = raw.into_deserializer();
            T::deserialize(de).map(Some)
        }
    }
}

// Present-but-empty becomes `Some(None)`, which serializes to `null` and
// clears the key when merged. Absent fields stay `None` via `default`.
fn empty_as_cleared<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    empty_as_none(deserializer).map(Some)
}
