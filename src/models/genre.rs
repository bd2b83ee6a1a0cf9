//! Genre model and related types

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::validation::{collect_errors, escape_html, FieldError};

/// Genre model. Names are unique by convention: the create workflow looks the
/// name up and reuses an existing row instead of inserting a duplicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

impl Genre {
    pub fn url(&self) -> String {
        format!("/catalog/genres/{}", self.id)
    }
}

/// Genre as exposed to view contexts, with virtuals inlined.
#[derive(Serialize)]
pub struct GenreView<'a> {
    #[serde(flatten)]
    genre: &'a Genre,
    pub url: String,
}

impl<'a> From<&'a Genre> for GenreView<'a> {
    fn from(genre: &'a Genre) -> Self {
        Self {
            url: genre.url(),
            genre,
        }
    }
}

/// Genre with its checkbox state for the book form.
#[derive(Debug, Clone, Serialize)]
pub struct GenreCheckbox {
    #[serde(flatten)]
    pub genre: Genre,
    pub url: String,
    pub checked: bool,
}

/// Decorate each genre with whether the candidate book references it.
/// Membership is tested on identities, not on instance equality: the genres
/// come from a fresh store fetch and are never the same values the book holds.
pub fn mark_checked(genres: Vec<Genre>, selected: &HashSet<i32>) -> Vec<GenreCheckbox> {
    genres
        .into_iter()
        .map(|genre| GenreCheckbox {
            checked: selected.contains(&genre.id),
            url: genre.url(),
            genre,
        })
        .collect()
}

/// Genre form payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct GenreForm {
    #[validate(length(min = 1, message = "Genre name required"))]
    pub name: String,
}

impl GenreForm {
    pub fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
        }
    }

    pub fn check(&self) -> Result<(), Vec<FieldError>> {
        self.validate()
            .map_err(|errors| collect_errors(&errors, &["name"]))
    }

    /// The name as persisted and as used for the dedup lookup.
    pub fn stored_name(&self) -> String {
        escape_html(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_is_derived_from_identity() {
        let genre = Genre {
            id: 3,
            name: "Fantasy".to_string(),
        };
        assert_eq!(genre.url(), "/catalog/genres/3");
    }

    #[test]
    fn mark_checked_uses_identity_membership() {
        let genres = vec![
            Genre {
                id: 1,
                name: "Fantasy".to_string(),
            },
            Genre {
                id: 2,
                name: "Poetry".to_string(),
            },
            Genre {
                id: 5,
                name: "Essays".to_string(),
            },
        ];
        let selected: HashSet<i32> = [5, 1].into_iter().collect();

        let boxes = mark_checked(genres, &selected);
        let checked: Vec<_> = boxes.iter().map(|b| (b.genre.id, b.checked)).collect();
        assert_eq!(checked, [(1, true), (2, false), (5, true)]);
    }

    #[test]
    fn empty_selection_checks_nothing() {
        let genres = vec![Genre {
            id: 1,
            name: "Fantasy".to_string(),
        }];
        let boxes = mark_checked(genres, &HashSet::new());
        assert!(!boxes[0].checked);
    }

    #[test]
    fn form_requires_name() {
        let form = GenreForm {
            name: "  ".to_string(),
        }
        .trimmed();
        let errors = form.check().unwrap_err();
        assert_eq!(errors[0].msg, "Genre name required");
    }

    #[test]
    fn stored_name_is_escaped() {
        let form = GenreForm {
            name: "Sword & Sorcery".to_string(),
        };
        assert_eq!(form.stored_name(), "Sword &amp; Sorcery");
    }
}
