//! Service layer for the blog.
//! - `blog_service`: data-access operations over posts and categories.
//! - `blog`: input normalization, the repository seam and the post-creation workflow.
//! - `uploader`: feature-image hosting.

pub mod errors;
pub mod blog_service;
pub mod blog;
pub mod uploader;
#[cfg(test)]
pub mod test_support;
