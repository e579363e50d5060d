pub mod auth;
pub mod issuance;
pub mod token_generator;
