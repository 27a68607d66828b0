pub mod interceptor;

pub mod refresh;

pub mod tokens;
