pub mod ast;
pub mod parser;

pub use ast::Command;
pub use parser::parse_command;
