use ws_core::{
    BinaryOp, Expression, Procedure, Program, QueryKind, SourceSpan, Statement, UnaryOp,
    WormScriptError,
};

use crate::lexer::{tokenize, Token, TokenKind};

/// Parses source text into an immutable [`Program`]. The main statement is
/// always a sequence; procedure definitions are collected in source order.
pub fn parse_program(source: &str) -> Result<Program, WormScriptError> {
    let tokens = tokenize(source)?;
    Parser { tokens, index: 0 }.parse_program()
}

fn join(start: &SourceSpan, end: &SourceSpan) -> SourceSpan {
    SourceSpan {
        start: start.start.clone(),
        end: end.end.clone(),
    }
}

struct Parser {
    tokens: Vec<Token>,
    index: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).cloned();
        if token.is_some() {
            self.index += 1;
        }
        token
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.peek().is_some_and(|token| &token.kind == kind)
    }

    fn eat(&mut self, kind: TokenKind, expected: &str) -> Result<Token, WormScriptError> {
        if self.check(&kind) {
            return Ok(self.advance().expect("checked token should be present"));
        }
        Err(self.unexpected(expected))
    }

    fn expect_ident(&mut self, expected: &str) -> Result<(String, SourceSpan), WormScriptError> {
        match self.peek() {
            Some(Token {
                kind: TokenKind::Ident(name),
                span,
            }) => {
                let found = (name.clone(), span.clone());
                self.index += 1;
                Ok(found)
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    fn unexpected(&self, expected: &str) -> WormScriptError {
        match self.peek() {
            Some(token) => WormScriptError::with_span(
                "PARSE_UNEXPECTED_TOKEN",
                format!("Expected {} but found {:?}.", expected, token.kind),
                token.span.clone(),
            ),
            None => WormScriptError::new(
                "PARSE_UNEXPECTED_EOF",
                format!("Expected {} but reached end of input.", expected),
            ),
        }
    }

    fn parse_program(mut self) -> Result<Program, WormScriptError> {
        let mut procedures = Vec::new();
        let mut statements = Vec::new();
        while self.peek().is_some() {
            if self.check(&TokenKind::Def) {
                procedures.push(self.parse_procedure()?);
            } else {
                statements.push(self.parse_statement()?);
            }
        }
        let location = match (statements.first(), statements.last()) {
            (Some(first), Some(last)) => join(first.location(), last.location()),
            _ => SourceSpan::synthetic(),
        };
        Ok(Program {
            procedures,
            main: Statement::Sequence {
                statements,
                location,
            },
        })
    }

    fn parse_procedure(&mut self) -> Result<Procedure, WormScriptError> {
        let def = self.eat(TokenKind::Def, "\"def\"")?;
        let (name, _) = self.expect_ident("a procedure name")?;
        self.eat(TokenKind::Colon, "\":\" after the procedure name")?;
        let body = self.parse_statement()?;
        let location = join(&def.span, body.location());
        Ok(Procedure {
            name,
            body,
            location,
        })
    }

    fn parse_statement(&mut self) -> Result<Statement, WormScriptError> {
        let Some(token) = self.peek().cloned() else {
            return Err(self.unexpected("a statement"));
        };
        match token.kind {
            TokenKind::LeftBrace => self.parse_sequence(),
            TokenKind::Print => {
                self.advance();
                let value = self.parse_expression()?;
                let semi = self.eat(TokenKind::Semicolon, "\";\"")?;
                Ok(Statement::Print {
                    value,
                    location: join(&token.span, &semi.span),
                })
            }
            TokenKind::If => {
                self.advance();
                let condition = self.parse_expression()?;
                let then_branch = Box::new(self.parse_statement()?);
                let mut else_branch = None;
                if self.check(&TokenKind::Else) {
                    self.advance();
                    else_branch = Some(Box::new(self.parse_statement()?));
                }
                let end = else_branch
                    .as_deref()
                    .unwrap_or(&then_branch)
                    .location()
                    .clone();
                Ok(Statement::If {
                    condition,
                    then_branch,
                    else_branch,
                    location: join(&token.span, &end),
                })
            }
            TokenKind::While => {
                self.advance();
                let condition = self.parse_expression()?;
                let body = Box::new(self.parse_statement()?);
                let location = join(&token.span, body.location());
                Ok(Statement::While {
                    condition,
                    body,
                    location,
                })
            }
            TokenKind::Break => {
                self.advance();
                let semi = self.eat(TokenKind::Semicolon, "\";\"")?;
                Ok(Statement::Break {
                    location: join(&token.span, &semi.span),
                })
            }
            TokenKind::Invoke => {
                self.advance();
                let (name, _) = self.expect_ident("a procedure name")?;
                let semi = self.eat(TokenKind::Semicolon, "\";\"")?;
                Ok(Statement::Invoke {
                    name,
                    location: join(&token.span, &semi.span),
                })
            }
            TokenKind::Turn => {
                self.advance();
                let angle = self.parse_expression()?;
                let semi = self.eat(TokenKind::Semicolon, "\";\"")?;
                Ok(Statement::Turn {
                    angle,
                    location: join(&token.span, &semi.span),
                })
            }
            TokenKind::Move | TokenKind::Jump | TokenKind::Eat | TokenKind::Fire => {
                self.advance();
                let semi = self.eat(TokenKind::Semicolon, "\";\"")?;
                let location = join(&token.span, &semi.span);
                Ok(match token.kind {
                    TokenKind::Move => Statement::Move { location },
                    TokenKind::Jump => Statement::Jump { location },
                    TokenKind::Eat => Statement::Eat { location },
                    _ => Statement::Fire { location },
                })
            }
            TokenKind::Ident(_) => {
                let (name, name_span) = self.expect_ident("a variable name")?;
                self.eat(TokenKind::Assign, "\":=\"")?;
                let value = self.parse_expression()?;
                let semi = self.eat(TokenKind::Semicolon, "\";\"")?;
                Ok(Statement::Assign {
                    name,
                    value,
                    location: join(&name_span, &semi.span),
                })
            }
            _ => Err(self.unexpected("a statement")),
        }
    }

    fn parse_sequence(&mut self) -> Result<Statement, WormScriptError> {
        let open = self.eat(TokenKind::LeftBrace, "\"{\"")?;
        let mut statements = Vec::new();
        while !self.check(&TokenKind::RightBrace) {
            if self.peek().is_none() {
                return Err(self.unexpected("\"}\""));
            }
            statements.push(self.parse_statement()?);
        }
        let close = self.eat(TokenKind::RightBrace, "\"}\"")?;
        Ok(Statement::Sequence {
            statements,
            location: join(&open.span, &close.span),
        })
    }

    fn parse_expression(&mut self) -> Result<Expression, WormScriptError> {
        self.parse_or()
    }

    fn match_binary(&mut self, table: &[(TokenKind, BinaryOp)]) -> Option<BinaryOp> {
        let kind = &self.peek()?.kind;
        for (token_kind, op) in table {
            if kind == token_kind {
                self.advance();
                return Some(*op);
            }
        }
        None
    }

    fn binary(op: BinaryOp, left: Expression, right: Expression) -> Expression {
        let location = join(left.location(), right.location());
        Expression::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
            location,
        }
    }

    fn parse_or(&mut self) -> Result<Expression, WormScriptError> {
        let mut left = self.parse_and()?;
        while let Some(op) = self.match_binary(&[(TokenKind::OrOr, BinaryOp::Or)]) {
            let right = self.parse_and()?;
            left = Self::binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expression, WormScriptError> {
        let mut left = self.parse_equality()?;
        while let Some(op) = self.match_binary(&[(TokenKind::AndAnd, BinaryOp::And)]) {
            let right = self.parse_equality()?;
            left = Self::binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Expression, WormScriptError> {
        let mut left = self.parse_comparison()?;
        while let Some(op) = self.match_binary(&[
            (TokenKind::EqualEqual, BinaryOp::Equal),
            (TokenKind::BangEqual, BinaryOp::NotEqual),
        ]) {
            let right = self.parse_comparison()?;
            left = Self::binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Expression, WormScriptError> {
        let mut left = self.parse_additive()?;
        while let Some(op) = self.match_binary(&[
            (TokenKind::Less, BinaryOp::Less),
            (TokenKind::LessEq, BinaryOp::LessEq),
            (TokenKind::Greater, BinaryOp::Greater),
            (TokenKind::GreaterEq, BinaryOp::GreaterEq),
        ]) {
            let right = self.parse_additive()?;
            left = Self::binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expression, WormScriptError> {
        let mut left = self.parse_multiplicative()?;
        while let Some(op) = self.match_binary(&[
            (TokenKind::Plus, BinaryOp::Add),
            (TokenKind::Minus, BinaryOp::Subtract),
        ]) {
            let right = self.parse_multiplicative()?;
            left = Self::binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expression, WormScriptError> {
        let mut left = self.parse_unary()?;
        while let Some(op) = self.match_binary(&[
            (TokenKind::Star, BinaryOp::Multiply),
            (TokenKind::Slash, BinaryOp::Divide),
        ]) {
            let right = self.parse_unary()?;
            left = Self::binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expression, WormScriptError> {
        if self.check(&TokenKind::Bang) {
            let bang = self.advance().expect("checked token should be present");
            let operand = self.parse_unary()?;
            let location = join(&bang.span, operand.location());
            return Ok(Expression::Unary {
                op: UnaryOp::Not,
                operand: Box::new(operand),
                location,
            });
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expression, WormScriptError> {
        let Some(token) = self.peek().cloned() else {
            return Err(self.unexpected("an expression"));
        };
        if let Some(op) = math_function(&token.kind) {
            return self.parse_unary_call(op);
        }
        if let Some(query) = query_function(&token.kind) {
            return self.parse_query_call(query);
        }
        match token.kind {
            TokenKind::Number(value) => {
                self.advance();
                Ok(Expression::NumberLiteral {
                    value,
                    location: token.span,
                })
            }
            TokenKind::True => {
                self.advance();
                Ok(Expression::BooleanLiteral {
                    value: true,
                    location: token.span,
                })
            }
            TokenKind::False => {
                self.advance();
                Ok(Expression::BooleanLiteral {
                    value: false,
                    location: token.span,
                })
            }
            TokenKind::Null => {
                self.advance();
                Ok(Expression::NullLiteral {
                    location: token.span,
                })
            }
            TokenKind::SelfActor => {
                self.advance();
                Ok(Expression::SelfActor {
                    location: token.span,
                })
            }
            TokenKind::Ident(name) => {
                self.advance();
                Ok(Expression::Variable {
                    name,
                    location: token.span,
                })
            }
            TokenKind::LeftParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.eat(TokenKind::RightParen, "\")\"")?;
                Ok(inner)
            }
            _ => Err(self.unexpected("an expression")),
        }
    }

    fn parse_unary_call(&mut self, op: UnaryOp) -> Result<Expression, WormScriptError> {
        let keyword = self.advance().expect("builtin keyword was peeked");
        self.eat(TokenKind::LeftParen, "\"(\"")?;
        let operand = self.parse_expression()?;
        let close = self.eat(TokenKind::RightParen, "\")\"")?;
        Ok(Expression::Unary {
            op,
            operand: Box::new(operand),
            location: join(&keyword.span, &close.span),
        })
    }

    fn parse_query_call(&mut self, query: QueryKind) -> Result<Expression, WormScriptError> {
        let keyword = self.advance().expect("builtin keyword was peeked");
        self.eat(TokenKind::LeftParen, "\"(\"")?;
        let operand = self.parse_expression()?;
        let close = self.eat(TokenKind::RightParen, "\")\"")?;
        Ok(Expression::Query {
            query,
            operand: Box::new(operand),
            location: join(&keyword.span, &close.span),
        })
    }
}

fn math_function(kind: &TokenKind) -> Option<UnaryOp> {
    Some(match kind {
        TokenKind::Sqrt => UnaryOp::Sqrt,
        TokenKind::Sin => UnaryOp::Sin,
        TokenKind::Cos => UnaryOp::Cos,
        _ => return None,
    })
}

fn query_function(kind: &TokenKind) -> Option<QueryKind> {
    Some(match kind {
        TokenKind::GetX => QueryKind::PositionX,
        TokenKind::GetY => QueryKind::PositionY,
        TokenKind::GetRadius => QueryKind::Radius,
        TokenKind::GetDir => QueryKind::Direction,
        TokenKind::GetAp => QueryKind::ActionPoints,
        TokenKind::GetMaxAp => QueryKind::MaxActionPoints,
        TokenKind::GetHp => QueryKind::HitPoints,
        TokenKind::DistanceTo => QueryKind::DistanceTo,
        TokenKind::IsWorm => QueryKind::IsWorm,
        TokenKind::IsFood => QueryKind::IsFood,
        TokenKind::IsProjectile => QueryKind::IsProjectile,
        TokenKind::SameTeam => QueryKind::SameTeam,
        TokenKind::SearchObj => QueryKind::SearchObject,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Program {
        parse_program(source).expect("parse should pass")
    }

    fn main_statements(program: &Program) -> &[Statement] {
        let Statement::Sequence { statements, .. } = &program.main else {
            panic!("main should be a sequence");
        };
        statements
    }

    #[test]
    fn main_is_always_a_sequence() {
        let program = parse("print 1;");
        assert_eq!(main_statements(&program).len(), 1);
        assert!(matches!(
            main_statements(&program)[0],
            Statement::Print { .. }
        ));
    }

    #[test]
    fn parses_loop_with_unbraced_if_body() {
        let program = parse("a:=1; while true { a:=a+1; if a>4 break; } print a;");
        let statements = main_statements(&program);
        assert_eq!(statements.len(), 3);
        let Statement::While { body, .. } = &statements[1] else {
            panic!("second statement should be a while");
        };
        let Statement::Sequence {
            statements: body_statements,
            ..
        } = body.as_ref()
        else {
            panic!("loop body should be a sequence");
        };
        assert_eq!(body_statements.len(), 2);
        let Statement::If {
            then_branch,
            else_branch,
            ..
        } = &body_statements[1]
        else {
            panic!("second body statement should be an if");
        };
        assert!(matches!(then_branch.as_ref(), Statement::Break { .. }));
        assert!(else_branch.is_none());
    }

    #[test]
    fn procedures_are_collected_in_order_and_interleave_with_main() {
        let program = parse("def p: { print 1; } print 0; def p: { print 2; } invoke p;");
        assert_eq!(program.procedures.len(), 2);
        assert_eq!(program.procedures[0].name, "p");
        assert_eq!(program.procedures[1].name, "p");
        let statements = main_statements(&program);
        assert_eq!(statements.len(), 2);
        assert!(matches!(statements[1], Statement::Invoke { .. }));
    }

    #[test]
    fn arithmetic_binds_tighter_than_comparison() {
        let program = parse("print 1 + 2 * 3 == 7;");
        let Statement::Print { value, .. } = &main_statements(&program)[0] else {
            panic!("expected a print statement");
        };
        let Expression::Binary {
            op: BinaryOp::Equal,
            left,
            ..
        } = value
        else {
            panic!("top operator should be ==");
        };
        let Expression::Binary {
            op: BinaryOp::Add,
            right: add_right,
            ..
        } = left.as_ref()
        else {
            panic!("left of == should be +");
        };
        assert!(matches!(
            add_right.as_ref(),
            Expression::Binary {
                op: BinaryOp::Multiply,
                ..
            }
        ));
    }

    #[test]
    fn and_binds_tighter_than_or() {
        let program = parse("print true || false && false;");
        let Statement::Print { value, .. } = &main_statements(&program)[0] else {
            panic!("expected a print statement");
        };
        let Expression::Binary {
            op: BinaryOp::Or,
            right,
            ..
        } = value
        else {
            panic!("top operator should be ||");
        };
        assert!(matches!(
            right.as_ref(),
            Expression::Binary {
                op: BinaryOp::And,
                ..
            }
        ));
    }

    #[test]
    fn world_queries_nest_as_expressions() {
        let program = parse("print isworm(searchobj(0 - 0.75));");
        let Statement::Print { value, .. } = &main_statements(&program)[0] else {
            panic!("expected a print statement");
        };
        let Expression::Query {
            query: QueryKind::IsWorm,
            operand,
            ..
        } = value
        else {
            panic!("expected an isworm query");
        };
        let Expression::Query {
            query: QueryKind::SearchObject,
            operand: angle,
            ..
        } = operand.as_ref()
        else {
            panic!("expected a nested searchobj query");
        };
        assert!(matches!(
            angle.as_ref(),
            Expression::Binary {
                op: BinaryOp::Subtract,
                ..
            }
        ));
    }

    #[test]
    fn else_attaches_to_the_if() {
        let program = parse("if a == null print 1; else print 2;");
        let Statement::If { else_branch, .. } = &main_statements(&program)[0] else {
            panic!("expected an if statement");
        };
        assert!(else_branch.is_some());
    }

    #[test]
    fn statement_spans_point_at_the_source() {
        let program = parse("print 1;\nmove;");
        let statements = main_statements(&program);
        assert_eq!(statements[0].location().start.line, 1);
        assert_eq!(statements[1].location().start.line, 2);
        assert_eq!(statements[1].location().start.column, 1);
    }

    #[test]
    fn missing_semicolon_is_reported() {
        let error = parse_program("print 1 print 2;").expect_err("missing semicolon should fail");
        assert_eq!(error.code, "PARSE_UNEXPECTED_TOKEN");
    }

    #[test]
    fn turn_requires_an_angle_expression() {
        let error = parse_program("turn;").expect_err("turn without angle should fail");
        assert_eq!(error.code, "PARSE_UNEXPECTED_TOKEN");
    }

    #[test]
    fn unary_minus_is_not_part_of_the_language() {
        let error = parse_program("a := -1;").expect_err("unary minus should fail");
        assert_eq!(error.code, "PARSE_UNEXPECTED_TOKEN");
    }

    #[test]
    fn unterminated_block_reports_eof() {
        let error = parse_program("while true { print 1;").expect_err("open block should fail");
        assert_eq!(error.code, "PARSE_UNEXPECTED_EOF");
    }

    #[test]
    fn procedure_header_requires_colon() {
        let error = parse_program("def p print 1;").expect_err("missing colon should fail");
        assert_eq!(error.code, "PARSE_UNEXPECTED_TOKEN");
    }
}
