//! Core data type definitions

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Access tier determining which views are reachable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Customer,
    Admin,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Customer, Role::Admin];

    /// Wire spelling, as sent to and received from the server
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "CUSTOMER",
            Role::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "customer" => Ok(Role::Customer),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// An authenticated identity as issued by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Get user display string
    pub fn display_string(&self) -> String {
        format!("{} <{}> ({})", self.name, self.email, self.role)
    }
}

/// Services and products that feedback can be left for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Service {
    Swiggy,
    Zomato,
    Sbi,
    Icici,
    Hdfc,
    Amazon,
    Flipkart,
    Netflix,
}

impl Service {
    pub const ALL: [Service; 8] = [
        Service::Swiggy,
        Service::Zomato,
        Service::Sbi,
        Service::Icici,
        Service::Hdfc,
        Service::Amazon,
        Service::Flipkart,
        Service::Netflix,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Service::Swiggy => "Swiggy",
            Service::Zomato => "Zomato",
            Service::Sbi => "SBI",
            Service::Icici => "ICICI",
            Service::Hdfc => "HDFC",
            Service::Amazon => "Amazon",
            Service::Flipkart => "Flipkart",
            Service::Netflix => "Netflix",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for Service {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Service::ALL
            .into_iter()
            .find(|service| service.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("Unknown service: {}", s))
    }
}

impl TryFrom<String> for Service {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Service> for String {
    fn from(service: Service) -> Self {
        service.label().to_string()
    }
}

/// One customer-submitted rating/comment record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub rating: u8,
    pub comment: String,
    pub service: Service,
    /// Assigned by the server on creation
    #[serde(default)]
    pub timestamp: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub user_id: Option<String>,
}

/// Validated request body for create and update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackDraft {
    pub rating: u8,
    pub comment: String,
    pub service: Service,
    pub user_id: String,
}

/// `POST /login` body
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `POST /signup` body
#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl SignupRequest {
    pub fn credentials(&self) -> LoginRequest {
        LoginRequest {
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Integer(i64),
    Unsigned(u64),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::String(s) => s,
            StringOrNumber::Integer(n) => n.to_string(),
            StringOrNumber::Unsigned(n) => n.to_string(),
        }
    }
}

// The server's entities use numeric ids; older clients persisted them as strings.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    StringOrNumber::deserialize(deserializer).map(String::from)
}

fn optional_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<StringOrNumber>::deserialize(deserializer).map(|value| value.map(String::from))
}
