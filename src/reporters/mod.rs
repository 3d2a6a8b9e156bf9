pub mod json;
pub mod plain;
pub mod terminal;
