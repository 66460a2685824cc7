// handlers/mod.rs - two security tiers
//
// Public (no auth) and Protected (bearer JWT, see middleware::auth).
// Routes are wired in app.rs; this module only declares the handlers.

pub mod protected;
pub mod public;
