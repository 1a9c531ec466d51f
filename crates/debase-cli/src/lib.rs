pub mod explain;
pub mod symbols;
