pub mod extract;
pub mod validate;

pub use extract::{ApiJson, ApiPath};
pub use validate::{validate_score, FieldErrors};
