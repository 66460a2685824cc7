pub mod movie;
pub mod rating;
pub mod user;

pub use movie::{Movie, MovieChanges, MovieFilters, MovieWithRatings};
pub use rating::{Rating, RatingAggregate};
pub use user::{PublicUser, User};
