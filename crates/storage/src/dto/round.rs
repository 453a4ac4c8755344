use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RoundStatus {
    #[default]
    Open,
    Closed,
}

impl RoundStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

/// Request payload for creating a new round
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateRoundRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name: String,

    /// Derived from the name when omitted
    #[validate(length(
        min = 1,
        max = 255,
        message = "Slug must be between 1 and 255 characters"
    ))]
    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[serde(default)]
    pub status: RoundStatus,
}

/// Request payload for updating an existing round
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateRoundRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    pub status: Option<RoundStatus>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct RoundListFilter {
    pub status: Option<RoundStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoundResponse {
    pub round_id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub closed_at: Option<NaiveDateTime>,
}

fn validate_slug(slug: &str) -> Result<(), validator::ValidationError> {
    let is_valid = slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--");

    if is_valid {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_slug"))
    }
}

/// Lowercase ASCII slug built from a round name, e.g. "Round 3: Été" → "round-3-ete".
pub fn slugify(name: &str) -> String {
    let slug = name
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'à' | 'á' | 'â' | 'ä' => 'a',
            'ç' => 'c',
            'è' | 'é' | 'ê' | 'ë' => 'e',
            'ì' | 'í' | 'î' | 'ï' => 'i',
            'ò' | 'ó' | 'ô' | 'ö' => 'o',
            'ù' | 'ú' | 'û' | 'ü' => 'u',
            c if c.is_ascii_alphanumeric() => c,
            _ => '-',
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<&str>>()
        .join("-");

    if slug.is_empty() {
        "round".to_string()
    } else {
        slug
    }
}

impl From<crate::models::Round> for RoundResponse {
    fn from(round: crate::models::Round) -> Self {
        Self {
            round_id: round.round_id,
            name: round.name,
            slug: round.slug,
            description: round.description,
            status: round.status,
            created_at: round.created_at,
            closed_at: round.closed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Round 3 — Été"), "round-3-ete");
        assert_eq!(slugify("  Spring   Cup  "), "spring-cup");
        assert_eq!(slugify("!!!"), "round");
    }

    #[test]
    fn test_slugify_output_is_a_valid_slug() {
        for name in ["Gymkhana #1", "Manche d'hiver", "a--b"] {
            assert!(validate_slug(&slugify(name)).is_ok(), "{}", name);
        }
    }

    #[test]
    fn test_create_request_rejects_bad_slug() {
        let req = CreateRoundRequest {
            name: "Round 1".to_string(),
            slug: Some("Round_1".to_string()),
            description: None,
            status: RoundStatus::Open,
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("slug"));
    }

    #[test]
    fn test_status_deserializes_lowercase() {
        let status: RoundStatus = serde_json::from_str("\"closed\"").unwrap();
        assert_eq!(status, RoundStatus::Closed);
        assert_eq!(RoundStatus::default().as_str(), "open");
    }
}
