pub mod export;
pub mod parser;
