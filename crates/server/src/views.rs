//! HTML rendering. Templates are compiled into the binary and rendered with
//! minijinja; `.html` templates are auto-escaped.

use axum::response::Html;
use minijinja::{Environment, Value};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::errors::AppError;

const TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("../views/layout.html")),
    ("about.html", include_str!("../views/about.html")),
    ("blog.html", include_str!("../views/blog.html")),
    ("posts.html", include_str!("../views/posts.html")),
    ("add_post.html", include_str!("../views/add_post.html")),
    ("categories.html", include_str!("../views/categories.html")),
    ("add_category.html", include_str!("../views/add_category.html")),
    ("404.html", include_str!("../views/404.html")),
];

static SCRIPT_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("valid regex"));
static SCRIPT_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)</?script\b[^>]*>").expect("valid regex"));
static EVENT_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)\s+on[a-z]+\s*=\s*("[^"]*"|'[^']*'|[^\s>]+)"#).expect("valid regex"));
static JS_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)javascript\s*:").expect("valid regex"));

/// Remove script blocks, inline event handlers and `javascript:` URLs from
/// author-supplied HTML, keeping the rest of the markup.
pub fn strip_js(html: &str) -> String {
    let out = SCRIPT_BLOCK.replace_all(html, "");
    let out = SCRIPT_TAG.replace_all(&out, "");
    let out = EVENT_ATTR.replace_all(&out, "");
    JS_URL.replace_all(&out, "").into_owned()
}

fn safe_html(value: String) -> Value {
    Value::from_safe_string(strip_js(&value))
}

/// `2024-03-05T10:00:00+00:00` -> `2024-03-05`; anything unparsable is passed through.
fn format_date(value: String) -> String {
    chrono::DateTime::parse_from_rfc3339(&value)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or(value)
}

pub struct Views {
    env: Environment<'static>,
}

impl Views {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        env.add_filter("safe_html", safe_html);
        env.add_filter("date", format_date);
        Ok(Self { env })
    }

    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<Html<String>, AppError> {
        let template = self.env.get_template(name)?;
        Ok(Html(template.render(ctx)?))
    }
}
