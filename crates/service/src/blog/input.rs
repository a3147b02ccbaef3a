//! Form payloads and the coercions applied before anything reaches the store.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Deserialize;

use models::post::NewPost;

use crate::errors::ServiceError;

/// Post form as submitted by the browser. Every field is optional on the wire.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PostInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub published: Option<String>,
    #[serde(default, rename = "featureImage")]
    pub feature_image: String,
    /// Accepted so that a client-sent date does not fail decoding; never stored.
    #[serde(default, rename = "postDate")]
    pub post_date: Option<String>,
}

impl PostInput {
    /// Coerce the raw form into the fields persisted for a new post.
    pub fn normalize(self) -> Result<NewPost, ServiceError> {
        Ok(NewPost {
            category: parse_category(self.category.as_deref())?,
            published: is_truthy(self.published.as_deref()),
            title: self.title,
            body: self.body,
            feature_image: self.feature_image,
        })
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct CategoryInput {
    #[serde(default)]
    pub category: Option<String>,
}

impl CategoryInput {
    /// An empty label is stored as NULL; anything else is kept verbatim.
    pub fn normalize(self) -> Option<String> {
        self.category.filter(|c| !c.is_empty())
    }
}

/// Form truthiness: a missing field, `""` and `"0"` are false, any other value is true.
pub fn is_truthy(value: Option<&str>) -> bool {
    !matches!(value, None | Some("") | Some("0"))
}

/// Empty category means "uncategorized".
pub fn parse_category(raw: Option<&str>) -> Result<Option<i32>, ServiceError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => parse_id(v).map(Some),
    }
}

pub fn parse_id(raw: &str) -> Result<i32, ServiceError> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| ServiceError::Validation(format!("invalid id: {raw:?}")))
}

/// Accepts `YYYY-MM-DD` (midnight UTC) or a full RFC 3339 timestamp.
pub fn parse_min_date(raw: &str) -> Result<DateTime<Utc>, ServiceError> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    let day = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ServiceError::Validation(format!("invalid date: {raw:?}")))?;
    let midnight = day
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| ServiceError::Validation(format!("invalid date: {raw:?}")))?;
    Ok(Utc.from_utc_datetime(&midnight))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness_follows_form_semantics() {
        assert!(!is_truthy(None));
        assert!(!is_truthy(Some("")));
        assert!(!is_truthy(Some("0")));
        assert!(is_truthy(Some("on")));
        assert!(is_truthy(Some("off")));
        assert!(is_truthy(Some("false")));
        assert!(is_truthy(Some(" ")));
        assert!(is_truthy(Some("1")));
        assert!(is_truthy(Some("true")));
        assert!(is_truthy(Some("yes")));
    }

    #[test]
    fn empty_category_becomes_none() {
        assert_eq!(parse_category(None).unwrap(), None);
        assert_eq!(parse_category(Some("")).unwrap(), None);
        assert_eq!(parse_category(Some("  ")).unwrap(), None);
        assert_eq!(parse_category(Some("7")).unwrap(), Some(7));
        assert!(matches!(parse_category(Some("tech")), Err(ServiceError::Validation(_))));
    }

    #[test]
    fn post_input_normalizes() {
        let input = PostInput {
            title: "Hi".into(),
            body: "World".into(),
            category: Some("".into()),
            published: Some("on".into()),
            post_date: Some("1999-01-01".into()),
            ..Default::default()
        };
        let new = input.normalize().unwrap();
        assert_eq!(new.title, "Hi");
        assert_eq!(new.category, None);
        assert!(new.published);
        assert_eq!(new.feature_image, "");
    }

    #[test]
    fn category_input_blank_is_null() {
        assert_eq!(CategoryInput { category: Some("".into()) }.normalize(), None);
        assert_eq!(CategoryInput { category: None }.normalize(), None);
        assert_eq!(CategoryInput { category: Some(" Tech ".into()) }.normalize(), Some(" Tech ".into()));
        assert_eq!(CategoryInput { category: Some(" ".into()) }.normalize(), Some(" ".into()));
    }

    #[test]
    fn min_date_formats() {
        let d = parse_min_date("2024-03-05").unwrap();
        assert_eq!(d.to_rfc3339(), "2024-03-05T00:00:00+00:00");
        let t = parse_min_date("2024-03-05T10:00:00+02:00").unwrap();
        assert_eq!(t.to_rfc3339(), "2024-03-05T08:00:00+00:00");
        assert!(parse_min_date("yesterday").is_err());
    }
}
