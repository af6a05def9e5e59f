//! User model and auth wire types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Role of a library account
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    Student,
    /// Any role the portal has no dedicated page for
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "admin",
            Role::Student => "student",
            Role::Other(s) => s.as_str(),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "admin" => Role::Admin,
            "student" => Role::Student,
            other => Role::Other(other.to_string()),
        })
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        match s.as_str() {
            "admin" => Role::Admin,
            "student" => Role::Student,
            _ => Role::Other(s),
        }
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        Role::from(s.to_string())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

/// User record as returned by the auth endpoints.
///
/// Fields beyond `id`, `username` and `role` are kept verbatim so a cached
/// record round-trips without losing what the server sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub role: Role,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    pub fn new(id: i64, username: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            username: username.into(),
            role,
            extra: Map::new(),
        }
    }

    pub fn has_role(&self, role: &Role) -> bool {
        &self.role == role
    }
}

/// Login request body
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Registration request body; the backend decides which extra fields it needs
#[derive(Debug, Clone, Default, Serialize)]
pub struct Registration {
    pub username: String,
    pub password: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Registration {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }
}

/// `GET /check-auth` response body
#[derive(Debug, Deserialize)]
pub struct CheckAuthResponse {
    #[serde(default)]
    pub authenticated: bool,
}

/// Body of the endpoints that answer with `{ user }`
#[derive(Debug, Deserialize)]
pub struct UserEnvelope {
    pub user: User,
}

/// `POST /register` success body. Some backends echo the new user, others
/// only send a confirmation message.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Error body of a rejected auth request
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    pub error: Option<String>,
    pub message: Option<String>,
}

impl ErrorBody {
    /// Server-supplied message; the Flask backend uses `message` where the
    /// portal contract says `error`, so both are accepted.
    pub fn into_message(self) -> Option<String> {
        self.error.or(self.message)
    }
}
