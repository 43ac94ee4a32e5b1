pub mod fetch;
pub mod symbols;
