// handlers/mod.rs - two access tiers
//
// Public (no auth): read-only content for the website, localized per request.
// Protected (JWT auth): editor views with raw locale maps and all writes.
pub mod protected;
pub mod public;
pub mod utils;
