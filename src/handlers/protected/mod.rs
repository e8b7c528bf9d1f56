// handlers/protected - authenticated endpoints
//
// Every route here sits behind `jwt_auth_middleware`. Writes additionally
// pass through `require_editor`. Responses carry raw locale maps so editors
// see every translation.
pub mod payload;
pub mod products;
pub mod service_centers;
pub mod services;
pub mod whoami;
