use crate::tenant::{Searchable, TenantId, TenantOwned};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Candidate profile managed by a customer organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Talent {
    pub id: Uuid,

    // Owning customer (tenant); set at creation, never reassigned
    pub customer_id: TenantId,

    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub skills: Option<String>,
    pub experience: Option<String>,
    pub education: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub location: Option<String>,

    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub resume_url: Option<String>,

    pub current_position: Option<String>,
    pub desired_position: Option<String>,
    pub salary_expectation: Option<f64>,
    pub availability: Option<String>,
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TenantOwned for Talent {
    type Id = Uuid;

    const ENTITY: &'static str = "Talent";
    const TABLE: &'static str = "talents";
    const ID_COLUMN: &'static str = "id";
    const TENANT_COLUMN: &'static str = "customer_id";
    const UNIQUE_COLUMN: Option<&'static str> = Some("email");

    fn id(&self) -> Uuid {
        self.id
    }

    fn tenant_id(&self) -> TenantId {
        self.customer_id
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.email.to_lowercase())
    }
}

impl Talent {
    /// Build a new talent owned by `customer_id`.
    pub fn new(customer_id: TenantId, new_talent: NewTalent) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            customer_id,
            first_name: new_talent.first_name,
            last_name: new_talent.last_name,
            email: new_talent.email,
            phone: new_talent.phone,
            skills: new_talent.skills,
            experience: new_talent.experience,
            education: new_talent.education,
            date_of_birth: new_talent.date_of_birth,
            location: new_talent.location,
            linkedin_url: new_talent.linkedin_url,
            github_url: new_talent.github_url,
            portfolio_url: new_talent.portfolio_url,
            resume_url: new_talent.resume_url,
            current_position: new_talent.current_position,
            desired_position: new_talent.desired_position,
            salary_expectation: new_talent.salary_expectation,
            availability: new_talent.availability,
            notes: new_talent.notes,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update. The owning customer is not updatable.
    pub fn apply(&mut self, update: UpdateTalent) {
        if let Some(first_name) = update.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            self.last_name = last_name;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if update.phone.is_some() {
            self.phone = update.phone;
        }
        if update.skills.is_some() {
            self.skills = update.skills;
        }
        if update.experience.is_some() {
            self.experience = update.experience;
        }
        if update.education.is_some() {
            self.education = update.education;
        }
        if update.date_of_birth.is_some() {
            self.date_of_birth = update.date_of_birth;
        }
        if update.location.is_some() {
            self.location = update.location;
        }
        if update.linkedin_url.is_some() {
            self.linkedin_url = update.linkedin_url;
        }
        if update.github_url.is_some() {
            self.github_url = update.github_url;
        }
        if update.portfolio_url.is_some() {
            self.portfolio_url = update.portfolio_url;
        }
        if update.resume_url.is_some() {
            self.resume_url = update.resume_url;
        }
        if update.current_position.is_some() {
            self.current_position = update.current_position;
        }
        if update.desired_position.is_some() {
            self.desired_position = update.desired_position;
        }
        if update.salary_expectation.is_some() {
            self.salary_expectation = update.salary_expectation;
        }
        if update.availability.is_some() {
            self.availability = update.availability;
        }
        if update.notes.is_some() {
            self.notes = update.notes;
        }
        self.updated_at = Utc::now();
    }
}

impl Searchable for Talent {
    const SEARCH_COLUMNS: &'static [&'static str] = &["first_name", "last_name", "email", "skills"];

    fn matches_keyword(&self, keyword: &str) -> bool {
        let needle = keyword.to_lowercase();
        [
            Some(self.first_name.as_str()),
            Some(self.last_name.as_str()),
            Some(self.email.as_str()),
            self.skills.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewTalent {
    #[validate(length(min = 1, max = 50, message = "First name is required and must be less than 50 characters"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 50, message = "Last name is required and must be less than 50 characters"))]
    pub last_name: String,

    #[validate(email(message = "Email should be valid"), length(max = 100))]
    pub email: String,

    #[validate(length(max = 20, message = "Phone number must be less than 20 characters"))]
    pub phone: Option<String>,

    pub skills: Option<String>,
    pub experience: Option<String>,
    pub education: Option<String>,

    #[validate(custom(function = "validate_past_date"))]
    pub date_of_birth: Option<NaiveDate>,

    pub location: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub resume_url: Option<String>,
    pub current_position: Option<String>,
    pub desired_position: Option<String>,
    pub salary_expectation: Option<f64>,
    pub availability: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateTalent {
    #[validate(length(min = 1, max = 50))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 50))]
    pub last_name: Option<String>,

    #[validate(email, length(max = 100))]
    pub email: Option<String>,

    #[validate(length(max = 20))]
    pub phone: Option<String>,

    pub skills: Option<String>,
    pub experience: Option<String>,
    pub education: Option<String>,

    #[validate(custom(function = "validate_past_date"))]
    pub date_of_birth: Option<NaiveDate>,

    pub location: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub resume_url: Option<String>,
    pub current_position: Option<String>,
    pub desired_position: Option<String>,
    pub salary_expectation: Option<f64>,
    pub availability: Option<String>,
    pub notes: Option<String>,
}

fn validate_past_date(date: &NaiveDate) -> Result<(), ValidationError> {
    if *date >= Utc::now().date_naive() {
        let mut err = ValidationError::new("past_date");
        err.message = Some("Date of birth must be in the past".into());
        return Err(err);
    }
    Ok(())
}
