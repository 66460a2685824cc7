// handlers/protected/mod.rs - handlers behind jwt_auth_middleware
//
// Every handler here can rely on an `AuthUser` in the request extensions.
// Ownership checks run after existence checks: 404 wins over 403.

pub mod movies;
pub mod users;
