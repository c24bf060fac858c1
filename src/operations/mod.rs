pub mod boolean;
pub mod validate;
