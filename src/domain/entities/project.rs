use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Active,
    Delivered,
    Archived,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Delivered => "delivered",
            ProjectStatus::Archived => "archived",
        }
    }
}

impl std::str::FromStr for ProjectStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(ProjectStatus::Active),
            "delivered" => Ok(ProjectStatus::Delivered),
            "archived" => Ok(ProjectStatus::Archived),
            other => Err(format!("Unknown project status: {}", other)),
        }
    }
}

/// A single wedding: the unit of ownership, sharing and search scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    id: Uuid,
    owner_id: Uuid,
    name: String,
    couple_names: Option<String>,
    wedding_date: Option<NaiveDate>,
    venue: Option<String>,
    status: ProjectStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Partial update applied by the owner. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProjectChanges {
    pub name: Option<String>,
    pub couple_names: Option<String>,
    pub wedding_date: Option<NaiveDate>,
    pub venue: Option<String>,
    pub status: Option<ProjectStatus>,
}

impl Project {
    pub fn new(
        owner_id: Uuid,
        name: String,
        couple_names: Option<String>,
        wedding_date: Option<NaiveDate>,
        venue: Option<String>,
    ) -> Result<Self, String> {
        let name = validate_name(name)?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            owner_id,
            name,
            couple_names,
            wedding_date,
            venue,
            status: ProjectStatus::Active,
            created_at: now,
            updated_at: now,
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn from_database(
        id: Uuid,
        owner_id: Uuid,
        name: String,
        couple_names: Option<String>,
        wedding_date: Option<NaiveDate>,
        venue: Option<String>,
        status: ProjectStatus,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            owner_id,
            name,
            couple_names,
            wedding_date,
            venue,
            status,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn owner_id(&self) -> Uuid {
        self.owner_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn couple_names(&self) -> Option<&str> {
        self.couple_names.as_deref()
    }

    pub fn wedding_date(&self) -> Option<NaiveDate> {
        self.wedding_date
    }

    pub fn venue(&self) -> Option<&str> {
        self.venue.as_deref()
    }

    pub fn status(&self) -> ProjectStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }

    pub fn apply(&mut self, changes: ProjectChanges) -> Result<(), String> {
        if let Some(name) = changes.name {
            self.name = validate_name(name)?;
        }
        if changes.couple_names.is_some() {
            self.couple_names = changes.couple_names;
        }
        if changes.wedding_date.is_some() {
            self.wedding_date = changes.wedding_date;
        }
        if changes.venue.is_some() {
            self.venue = changes.venue;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

fn validate_name(name: String) -> Result<String, String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Project name cannot be empty".to_string());
    }
    if trimmed.chars().count() > 200 {
        return Err("Project name cannot exceed 200 characters".to_string());
    }
    Ok(trimmed.to_string())
}
