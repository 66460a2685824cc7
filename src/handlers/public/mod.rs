// handlers/public/mod.rs - handlers reachable without a token
//
// Anything here must validate its whole input; there is no caller identity.

pub mod auth;
pub mod movies;
pub mod system;
pub mod users;
