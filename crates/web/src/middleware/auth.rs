use std::collections::HashSet;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use storage::{Database, error::StorageError, models::Rider, repository::session::SessionRepository};
use uuid::Uuid;

use crate::error::WebError;

/// Admin keys accepted as `Authorization: Bearer <key>`
#[derive(Clone)]
pub struct ApiKeys {
    keys: HashSet<String>,
}

impl ApiKeys {
    pub fn from_comma_separated(keys_str: &str) -> Self {
        let keys = keys_str
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        Self { keys }
    }

    pub fn is_valid(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn count(&self) -> usize {
        self.keys.len()
    }
}

/// How long a login stays valid
#[derive(Debug, Clone, Copy)]
pub struct SessionSettings {
    pub ttl: chrono::Duration,
}

/// Rider resolved from a session token, available to handlers as an extension
#[derive(Debug, Clone)]
pub struct CurrentRider {
    pub token: Uuid,
    pub rider: Rider,
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

pub async fn require_auth(
    State(api_keys): State<ApiKeys>,
    req: Request,
    next: Next,
) -> Result<Response, WebError> {
    let authorized = bearer_token(req.headers()).is_some_and(|key| api_keys.is_valid(key));

    if !authorized {
        tracing::warn!("Invalid API key attempt");
        return Err(WebError::Unauthorized);
    }

    Ok(next.run(req).await)
}

pub async fn require_session(
    State(db): State<Database>,
    mut req: Request,
    next: Next,
) -> Result<Response, WebError> {
    let token = bearer_token(req.headers())
        .and_then(|token| Uuid::parse_str(token).ok())
        .ok_or(WebError::Unauthorized)?;

    let rider = SessionRepository::new(db.pool())
        .find_rider(token)
        .await
        .map_err(|e| match e {
            StorageError::NotFound => {
                tracing::debug!("Unknown or expired session token");
                WebError::Unauthorized
            }
            other => WebError::from(other),
        })?;

    req.extensions_mut().insert(CurrentRider { token, rider });

    Ok(next.run(req).await)
}
