use ws_core::{SourceLocation, SourceSpan, WormScriptError};

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(f64),
    Ident(String),
    Def,
    Print,
    If,
    Else,
    While,
    Break,
    Invoke,
    Turn,
    Move,
    Jump,
    Eat,
    Fire,
    True,
    False,
    Null,
    SelfActor,
    Sqrt,
    Sin,
    Cos,
    GetX,
    GetY,
    GetRadius,
    GetDir,
    GetAp,
    GetMaxAp,
    GetHp,
    DistanceTo,
    IsWorm,
    IsFood,
    IsProjectile,
    SameTeam,
    SearchObj,
    Assign,
    Colon,
    Semicolon,
    LeftBrace,
    RightBrace,
    LeftParen,
    RightParen,
    Plus,
    Minus,
    Star,
    Slash,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    EqualEqual,
    BangEqual,
    AndAnd,
    OrOr,
    Bang,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: SourceSpan,
}

fn keyword(ident: &str) -> Option<TokenKind> {
    Some(match ident {
        "def" => TokenKind::Def,
        "print" => TokenKind::Print,
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "while" => TokenKind::While,
        "break" => TokenKind::Break,
        "invoke" => TokenKind::Invoke,
        "turn" => TokenKind::Turn,
        "move" => TokenKind::Move,
        "jump" => TokenKind::Jump,
        "eat" => TokenKind::Eat,
        "fire" => TokenKind::Fire,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "null" => TokenKind::Null,
        "self" => TokenKind::SelfActor,
        "sqrt" => TokenKind::Sqrt,
        "sin" => TokenKind::Sin,
        "cos" => TokenKind::Cos,
        "getx" => TokenKind::GetX,
        "gety" => TokenKind::GetY,
        "getradius" => TokenKind::GetRadius,
        "getdir" => TokenKind::GetDir,
        "getap" => TokenKind::GetAp,
        "getmaxap" => TokenKind::GetMaxAp,
        "gethp" => TokenKind::GetHp,
        "distanceto" => TokenKind::DistanceTo,
        "isworm" => TokenKind::IsWorm,
        "isfood" => TokenKind::IsFood,
        "isprojectile" => TokenKind::IsProjectile,
        "sameteam" => TokenKind::SameTeam,
        "searchobj" => TokenKind::SearchObj,
        _ => return None,
    })
}

struct Lexer {
    chars: Vec<char>,
    index: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            index: 0,
            line: 1,
            column: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.index).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.index + 1).copied()
    }

    fn location(&self) -> SourceLocation {
        SourceLocation {
            line: self.line,
            column: self.column,
        }
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.index += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn skip_trivia(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance();
                continue;
            }
            if ch == '/' && self.peek_next() == Some('/') {
                while let Some(ch) = self.peek() {
                    if ch == '\n' {
                        break;
                    }
                    self.advance();
                }
                continue;
            }
            break;
        }
    }

    fn lex_number(&mut self) -> Result<TokenKind, WormScriptError> {
        let start = self.location();
        let mut text = String::new();
        while matches!(self.peek(), Some(ch) if ch.is_ascii_digit()) {
            text.push(self.advance().expect("digit was peeked"));
        }
        if self.peek() == Some('.') && matches!(self.peek_next(), Some(ch) if ch.is_ascii_digit())
        {
            text.push(self.advance().expect("dot was peeked"));
            while matches!(self.peek(), Some(ch) if ch.is_ascii_digit()) {
                text.push(self.advance().expect("digit was peeked"));
            }
        }
        let value = text.parse::<f64>().map_err(|_| {
            WormScriptError::with_span(
                "LEX_BAD_NUMBER",
                format!("Invalid number literal \"{}\".", text),
                SourceSpan {
                    start: start.clone(),
                    end: self.location(),
                },
            )
        })?;
        Ok(TokenKind::Number(value))
    }

    fn lex_word(&mut self) -> TokenKind {
        let mut text = String::new();
        while matches!(self.peek(), Some(ch) if ch.is_ascii_alphanumeric() || ch == '_') {
            text.push(self.advance().expect("word char was peeked"));
        }
        keyword(&text).unwrap_or(TokenKind::Ident(text))
    }

    fn lex_symbol(&mut self) -> Result<TokenKind, WormScriptError> {
        let start = self.location();
        let ch = self.advance().expect("symbol char was peeked");
        let two = |lexer: &mut Lexer, second: char| -> bool {
            if lexer.peek() == Some(second) {
                lexer.advance();
                true
            } else {
                false
            }
        };
        let kind = match ch {
            ':' => {
                if two(self, '=') {
                    TokenKind::Assign
                } else {
                    TokenKind::Colon
                }
            }
            ';' => TokenKind::Semicolon,
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '<' => {
                if two(self, '=') {
                    TokenKind::LessEq
                } else {
                    TokenKind::Less
                }
            }
            '>' => {
                if two(self, '=') {
                    TokenKind::GreaterEq
                } else {
                    TokenKind::Greater
                }
            }
            '=' => {
                if two(self, '=') {
                    TokenKind::EqualEqual
                } else {
                    return Err(WormScriptError::with_span(
                        "LEX_UNEXPECTED_CHAR",
                        "Found \"=\"; assignment is written \":=\".".to_string(),
                        SourceSpan {
                            start,
                            end: self.location(),
                        },
                    ));
                }
            }
            '!' => {
                if two(self, '=') {
                    TokenKind::BangEqual
                } else {
                    TokenKind::Bang
                }
            }
            '&' => {
                if two(self, '&') {
                    TokenKind::AndAnd
                } else {
                    return Err(WormScriptError::with_span(
                        "LEX_UNEXPECTED_CHAR",
                        "Found \"&\"; logical and is written \"&&\".".to_string(),
                        SourceSpan {
                            start,
                            end: self.location(),
                        },
                    ));
                }
            }
            '|' => {
                if two(self, '|') {
                    TokenKind::OrOr
                } else {
                    return Err(WormScriptError::with_span(
                        "LEX_UNEXPECTED_CHAR",
                        "Found \"|\"; logical or is written \"||\".".to_string(),
                        SourceSpan {
                            start,
                            end: self.location(),
                        },
                    ));
                }
            }
            other => {
                return Err(WormScriptError::with_span(
                    "LEX_UNEXPECTED_CHAR",
                    format!("Unexpected character \"{}\".", other),
                    SourceSpan {
                        start,
                        end: self.location(),
                    },
                ))
            }
        };
        Ok(kind)
    }
}

pub fn tokenize(source: &str) -> Result<Vec<Token>, WormScriptError> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        lexer.skip_trivia();
        let Some(ch) = lexer.peek() else {
            return Ok(tokens);
        };
        let start = lexer.location();
        let kind = if ch.is_ascii_digit() {
            lexer.lex_number()?
        } else if ch.is_ascii_alphabetic() || ch == '_' {
            lexer.lex_word()
        } else {
            lexer.lex_symbol()?
        };
        tokens.push(Token {
            kind,
            span: SourceSpan {
                start,
                end: lexer.location(),
            },
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .expect("tokenize should pass")
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn tokenizes_assignment_and_print() {
        assert_eq!(
            kinds("a := 1.5; print a;"),
            vec![
                TokenKind::Ident("a".to_string()),
                TokenKind::Assign,
                TokenKind::Number(1.5),
                TokenKind::Semicolon,
                TokenKind::Print,
                TokenKind::Ident("a".to_string()),
                TokenKind::Semicolon,
            ]
        );
    }

    #[test]
    fn tokenizes_compound_operators() {
        assert_eq!(
            kinds("<= >= == != && || ! < >"),
            vec![
                TokenKind::LessEq,
                TokenKind::GreaterEq,
                TokenKind::EqualEqual,
                TokenKind::BangEqual,
                TokenKind::AndAnd,
                TokenKind::OrOr,
                TokenKind::Bang,
                TokenKind::Less,
                TokenKind::Greater,
            ]
        );
    }

    #[test]
    fn recognizes_keywords_and_builtins() {
        assert_eq!(
            kinds("def invoke while break self null searchobj getmaxap"),
            vec![
                TokenKind::Def,
                TokenKind::Invoke,
                TokenKind::While,
                TokenKind::Break,
                TokenKind::SelfActor,
                TokenKind::Null,
                TokenKind::SearchObj,
                TokenKind::GetMaxAp,
            ]
        );
    }

    #[test]
    fn skips_line_comments_and_tracks_lines() {
        let tokens = tokenize("// header\nprint 1;").expect("tokenize should pass");
        assert_eq!(tokens[0].kind, TokenKind::Print);
        assert_eq!(tokens[0].span.start.line, 2);
        assert_eq!(tokens[0].span.start.column, 1);
        assert_eq!(tokens[1].span.start.column, 7);
    }

    #[test]
    fn number_without_trailing_fraction_stops_at_dot() {
        // "1." is a number followed by an unexpected dot, not a literal.
        let error = tokenize("a := 1.;").expect_err("bare dot should fail");
        assert_eq!(error.code, "LEX_UNEXPECTED_CHAR");
    }

    #[test]
    fn rejects_single_equals_with_hint() {
        let error = tokenize("a = 1;").expect_err("single equals should fail");
        assert_eq!(error.code, "LEX_UNEXPECTED_CHAR");
        assert!(error.message.contains(":="));
    }

    #[test]
    fn rejects_unknown_characters_with_span() {
        let error = tokenize("print @;").expect_err("unknown char should fail");
        assert_eq!(error.code, "LEX_UNEXPECTED_CHAR");
        let span = error.span.expect("span should be present");
        assert_eq!(span.start.line, 1);
        assert_eq!(span.start.column, 7);
    }
}
