//! HTTP surface of the blog: routes, views and process startup.

pub mod errors;
pub mod page;
pub mod routes;
pub mod startup;
pub mod state;
pub mod views;

pub use startup::run;
