pub mod errors;
pub mod ids;
pub mod images;
pub mod recipes;
pub mod repositories;
pub mod users;

pub use errors::RepositoryError;
