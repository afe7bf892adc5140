pub mod ast;
pub mod config;
pub mod diagnostic;
pub mod frontend;
pub mod lexer;
pub mod parser;
pub mod semantic;
pub mod token;
pub mod types;
