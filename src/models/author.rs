//! Author model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::validation::{collect_errors, escape_html, parse_date, FieldError};

/// Full author model from the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Author {
    pub id: i32,
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
    pub image_path: Option<String>,
}

impl Author {
    /// Display name: "family, first".
    pub fn name(&self) -> String {
        format!("{}, {}", self.family_name, self.first_name)
    }

    /// Canonical detail-page locator.
    pub fn url(&self) -> String {
        format!("/catalog/authors/{}", self.id)
    }

    pub fn lifespan(&self) -> String {
        format!(
            "{} - {}",
            self.date_of_birth.map(format_date).unwrap_or_default(),
            self.date_of_death.map(format_date).unwrap_or_default(),
        )
    }

    /// ISO value for the date-of-birth form input.
    pub fn date_of_birth_ymd(&self) -> Option<String> {
        self.date_of_birth.map(|d| d.format("%Y-%m-%d").to_string())
    }

    pub fn date_of_death_ymd(&self) -> Option<String> {
        self.date_of_death.map(|d| d.format("%Y-%m-%d").to_string())
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Author as exposed to view contexts and the search JSON payload, with the
/// virtual fields inlined.
#[derive(Serialize)]
pub struct AuthorView<'a> {
    #[serde(flatten)]
    author: &'a Author,
    pub name: String,
    pub url: String,
    pub lifespan: String,
    pub date_of_birth_ymd: Option<String>,
    pub date_of_death_ymd: Option<String>,
}

impl<'a> From<&'a Author> for AuthorView<'a> {
    fn from(author: &'a Author) -> Self {
        Self {
            name: author.name(),
            url: author.url(),
            lifespan: author.lifespan(),
            date_of_birth_ymd: author.date_of_birth_ymd(),
            date_of_death_ymd: author.date_of_death_ymd(),
            author,
        }
    }
}

/// Mutable field set written by the create and update workflows.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuthor {
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
    pub image_path: String,
}

/// Author form payload, validated before any persistence.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AuthorForm {
    #[validate(
        length(min = 1, message = "First name must be specified."),
        custom(
            function = crate::validation::alphanumeric,
            message = "First name has non-alphanumeric characters."
        )
    )]
    pub first_name: String,
    #[validate(
        length(min = 1, message = "Family name must be specified."),
        custom(
            function = crate::validation::alphanumeric,
            message = "Family name has non-alphanumeric characters."
        )
    )]
    pub family_name: String,
    #[validate(custom(function = crate::validation::iso_date, message = "Invalid date of birth"))]
    pub date_of_birth: Option<String>,
    #[validate(custom(function = crate::validation::iso_date, message = "Invalid date of death"))]
    pub date_of_death: Option<String>,
}

impl AuthorForm {
    const FIELDS: [&'static str; 4] = [
        "first_name",
        "family_name",
        "date_of_birth",
        "date_of_death",
    ];

    /// Trim all fields; applied before validation.
    pub fn trimmed(self) -> Self {
        Self {
            first_name: self.first_name.trim().to_string(),
            family_name: self.family_name.trim().to_string(),
            date_of_birth: self.date_of_birth.map(|d| d.trim().to_string()),
            date_of_death: self.date_of_death.map(|d| d.trim().to_string()),
        }
    }

    /// Run the field rules, flattening failures into the form-context shape.
    pub fn check(&self) -> Result<(), Vec<FieldError>> {
        self.validate()
            .map_err(|errors| collect_errors(&errors, &Self::FIELDS))
    }

    /// Build the record to persist: escaped field values, parsed dates.
    pub fn to_record(&self, image_path: String) -> NewAuthor {
        NewAuthor {
            first_name: escape_html(&self.first_name),
            family_name: escape_html(&self.family_name),
            date_of_birth: parse_date(&self.date_of_birth),
            date_of_death: parse_date(&self.date_of_death),
            image_path,
        }
    }
}
