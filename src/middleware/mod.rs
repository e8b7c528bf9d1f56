pub mod auth;
pub mod locale;
pub mod response;

pub use auth::{jwt_auth_middleware, require_editor, AuthUser};
pub use locale::{resolve_locale, RequestLocale};
pub use response::{ApiResponse, ApiResult};
