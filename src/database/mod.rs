pub mod manager;
pub mod models;
pub mod query_builder;
pub mod repository;
pub mod service;

pub use manager::{DatabaseError, DatabaseManager};
pub use query_builder::{QueryBuilder, SqlParam};
pub use repository::Repository;
pub use service::{find_user_by_email, list_center_products, list_staff_affiliations};
