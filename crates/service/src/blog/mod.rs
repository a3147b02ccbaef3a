pub mod input;
pub mod repository;
pub mod service;
