use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Videographer,
    Couple,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Videographer => "videographer",
            UserRole::Couple => "couple",
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "videographer" => Ok(UserRole::Videographer),
            "couple" => Ok(UserRole::Couple),
            other => Err(format!("Unknown user role: {}", other)),
        }
    }
}

/// Account record mirrored from the external auth provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    id: Uuid,
    email: String,
    name: Option<String>,
    role: UserRole,
    created_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: String, name: Option<String>, role: UserRole) -> Result<Self, String> {
        let email = normalize_email(&email)?;
        Ok(Self {
            id: Uuid::new_v4(),
            email,
            name,
            role,
            created_at: Utc::now(),
        })
    }

    pub fn from_database(
        id: Uuid,
        email: String,
        name: Option<String>,
        role: UserRole,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            name,
            role,
            created_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn role(&self) -> UserRole {
        self.role
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Lowercases and trims an address, rejecting anything without a local part
/// and a domain.
pub fn normalize_email(email: &str) -> Result<String, String> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(format!("Invalid email address: {}", email)),
    }
}
