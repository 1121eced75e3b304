use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::Resource;

const REQUIRED_TEXT: [&str; 3] = ["name1st", "nameLast", "mobileNo"];
const OPTIONAL_TEXT: [&str; 6] = [
    "name2nd",
    "name3rd",
    "address",
    "dOB",
    "identityNumber",
    "identityImage",
];
const CHILD_COLLECTIONS: [&str; 3] = ["employeeDevices", "employeeDocuments", "employeeReferences"];

/// Everything about an employee except its identifier.
///
/// This is also the create payload. Keys the directory sends that are not
/// modelled here survive in `extra` and are written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonProfile {
    pub name1st: String,
    #[serde(default)]
    pub name2nd: Option<String>,
    #[serde(default)]
    pub name3rd: Option<String>,
    pub name_last: String,
    pub mobile_no: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, rename = "dOB")]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub identity_type: Option<Value>,
    #[serde(default)]
    pub identity_number: Option<String>,
    #[serde(default)]
    pub identity_image: Option<String>,
    #[serde(default)]
    pub employee_devices: Option<Vec<Value>>,
    #[serde(default)]
    pub employee_documents: Option<Vec<Value>>,
    #[serde(default)]
    pub employee_references: Option<Vec<Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An employee as held by the directory. Also the update payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonRecord {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(flatten)]
    pub profile: PersonProfile,
}

/// One slice of the validated employee collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonPage {
    pub employees: Vec<PersonRecord>,
    /// Number of valid records before slicing.
    pub total: usize,
}

impl Resource for PersonRecord {
    type Id = String;

    fn id(&self) -> &String {
        &self.id
    }
}

/// Schema failure, shaped as `{formErrors, fieldErrors}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    pub form_errors: Vec<String>,
    pub field_errors: BTreeMap<String, Vec<String>>,
}

impl ValidationError {
    pub fn form(message: impl Into<String>) -> Self {
        Self {
            form_errors: vec![message.into()],
            field_errors: BTreeMap::new(),
        }
    }

    pub fn add_field(&mut self, field: &str, message: impl Into<String>) {
        self.field_errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.form_errors.is_empty() && self.field_errors.is_empty()
    }

    fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = self.form_errors.clone();
        for (field, messages) in &self.field_errors {
            parts.push(format!("{}: {}", field, messages.join(", ")));
        }
        write!(f, "Invalid employee data: {}", parts.join("; "))
    }
}

impl std::error::Error for ValidationError {}

impl PersonProfile {
    /// Checks `value` against the required-field contract and converts it.
    pub fn validate(value: &Value) -> Result<Self, ValidationError> {
        let object = expect_object(value)?;
        let mut errors = ValidationError::default();
        check_profile(object, &mut errors);
        errors.into_result()?;
        serde_json::from_value(value.clone()).map_err(|e| ValidationError::form(e.to_string()))
    }
}

impl PersonRecord {
    /// Like [`PersonProfile::validate`], additionally requiring an `id`.
    pub fn validate(value: &Value) -> Result<Self, ValidationError> {
        let object = expect_object(value)?;
        let mut errors = ValidationError::default();
        match object.get("id") {
            None | Some(Value::Null) => errors.add_field("id", "Required"),
            Some(Value::String(s)) if s.trim().is_empty() => errors.add_field("id", "Required"),
            Some(Value::String(_)) | Some(Value::Number(_)) => {}
            Some(other) => errors.add_field(
                "id",
                format!("Expected string, received {}", kind_of(other)),
            ),
        }
        check_profile(object, &mut errors);
        errors.into_result()?;
        serde_json::from_value(value.clone()).map_err(|e| ValidationError::form(e.to_string()))
    }

    /// Non-empty name parts joined by spaces.
    pub fn full_name(&self) -> String {
        let p = &self.profile;
        let parts: Vec<&str> = [
            Some(p.name1st.as_str()),
            p.name2nd.as_deref(),
            p.name3rd.as_deref(),
            Some(p.name_last.as_str()),
        ]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect();
        if parts.is_empty() {
            "—".to_string()
        } else {
            parts.join(" ")
        }
    }

    pub fn initials(&self) -> String {
        let first = self.profile.name1st.trim().chars().next();
        let last = self.profile.name_last.trim().chars().next();
        let initials: String = first
            .into_iter()
            .chain(last)
            .flat_map(char::to_uppercase)
            .collect();
        if initials.is_empty() {
            "?".to_string()
        } else {
            initials
        }
    }

    /// Identity image reference (URL or data URI), if any.
    pub fn avatar(&self) -> Option<&str> {
        self.profile
            .identity_image
            .as_deref()
            .filter(|s| !s.is_empty())
    }
}

fn expect_object(value: &Value) -> Result<&Map<String, Value>, ValidationError> {
    value.as_object().ok_or_else(|| {
        ValidationError::form(format!("Expected object, received {}", kind_of(value)))
    })
}

fn check_profile(object: &Map<String, Value>, errors: &mut ValidationError) {
    for field in REQUIRED_TEXT {
        match object.get(field) {
            Some(Value::String(_)) => {}
            None | Some(Value::Null) => errors.add_field(field, "Required"),
            Some(other) => errors.add_field(
                field,
                format!("Expected string, received {}", kind_of(other)),
            ),
        }
    }
    for field in OPTIONAL_TEXT {
        match object.get(field) {
            None | Some(Value::Null) | Some(Value::String(_)) => {}
            Some(other) => errors.add_field(
                field,
                format!("Expected string, received {}", kind_of(other)),
            ),
        }
    }
    for field in CHILD_COLLECTIONS {
        match object.get(field) {
            None | Some(Value::Null) | Some(Value::Array(_)) => {}
            Some(other) => errors.add_field(
                field,
                format!("Expected array, received {}", kind_of(other)),
            ),
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Directory ids arrive as strings or numbers; both become strings.
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}
