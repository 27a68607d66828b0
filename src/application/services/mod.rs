pub mod auth_service;

pub mod dictionary_service;

pub mod word_service;
