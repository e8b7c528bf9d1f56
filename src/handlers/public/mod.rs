// handlers/public - read-only content endpoints (no authentication)
//
// Only published rows are exposed. Localized fields follow `?lang=` or
// `Accept-Language`; without either the raw locale maps are returned.
pub mod auth;
pub mod directory;
pub mod products;
pub mod service_centers;
pub mod services;
pub mod system;
