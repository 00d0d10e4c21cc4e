pub mod aggregate;
pub mod csv;
pub mod json;
pub mod merger;
pub mod table;
pub mod terminal;
