pub mod dictionary;
pub mod user;
pub mod word;
