pub mod history;
pub mod logger;
