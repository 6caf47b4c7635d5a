mod lexer;
mod parser;

pub use lexer::{tokenize, Token, TokenKind};
pub use parser::parse_program;
