pub mod errors;
pub mod db;
pub mod category;
pub mod post;

#[cfg(test)]
mod tests;
