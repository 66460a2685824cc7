pub mod cleanup;
pub mod migrate;
pub mod seed;
