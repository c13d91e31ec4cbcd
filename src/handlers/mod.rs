pub mod contributors;
pub mod repository;

#[cfg(test)]
mod contributors_http_tests;


pub use contributors::configure_contributor_routes;
pub use repository::configure_repository_routes;
