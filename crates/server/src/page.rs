//! Per-request navigation context handed to every view.

use std::collections::HashMap;
use std::convert::Infallible;

use axum::async_trait;
use axum::extract::{FromRequestParts, Query};
use axum::http::{request::Parts, Uri};
use serde::Serialize;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PageContext {
    /// First path segment, e.g. `/blog` for `/blog/3`; `/` for the root.
    pub active_route: String,
    /// `category` query parameter, if any.
    pub viewing_category: Option<String>,
}

impl PageContext {
    pub fn from_uri(uri: &Uri) -> Self {
        let first = uri.path().trim_start_matches('/').split('/').next().unwrap_or("");
        let viewing_category = Query::<HashMap<String, String>>::try_from_uri(uri)
            .ok()
            .and_then(|Query(mut q)| q.remove("category"))
            .filter(|c| !c.is_empty());
        Self { active_route: format!("/{first}"), viewing_category }
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for PageContext {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_uri(&parts.uri))
    }
}
