use crate::{
    ast::{Expr, Literal},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::core::{ParseResult, Parser},
    },
};

impl Parser<'_> {
    /// Parses prefix operators.
    ///
    /// - `-term` becomes `Negative`.
    /// - `+term` is the term itself.
    /// - `!expr` negates a whole comparison, so `!a == b` is `!(a == b)`.
    ///
    /// The rule is: `unary := "-" unary | "+" unary | "!" comparison | postfix`
    pub(super) fn unary(&mut self) -> ParseResult<Expr> {
        if self.accept(&Token::Minus)? {
            return Ok(Expr::Negative(Box::new(self.unary()?)));
        }
        if self.accept(&Token::Plus)? {
            return self.unary();
        }
        if self.accept(&Token::Bang)? {
            return Ok(Expr::Negation(Box::new(self.comparison()?)));
        }
        self.postfix()
    }

    /// Parses a primary term followed by any number of `.name`, `::Name` and
    /// `[index]` suffixes.
    ///
    /// The rule is:
    /// `postfix := primary ("." name call-arguments | "::" name | "[" expression "]")*`
    ///
    /// An opening bracket separated from a bare name by whitespace is left
    /// alone, so `puts [1]` can become a command call.
    fn postfix(&mut self) -> ParseResult<Expr> {
        let mut expr = self.primary()?;
        loop {
            let (token, spaced) = match self.tokens.peek()? {
                Some(lexeme) => (lexeme.token.clone(), lexeme.spaced),
                None => break,
            };
            match token {
                Token::Dot => {
                    self.tokens.next_token()?;
                    let name = self.method_name()?;
                    let args = self.call_arguments()?;
                    expr = Expr::Dot { target: Box::new(expr),
                                       name,
                                       args };
                },
                Token::DoubleColon => {
                    self.tokens.next_token()?;
                    let name = self.method_name()?;
                    expr = Expr::DoubleColon { target: Box::new(expr),
                                               name };
                },
                Token::LBracket if !spaced || !matches!(expr, Expr::Name(_)) => {
                    self.tokens.next_token()?;
                    let index = self.restricted(false, |parser| {
                                        parser.skip_newlines()?;
                                        let index = parser.expression()?;
                                        parser.skip_newlines()?;
                                        Ok(index)
                                    })?;
                    self.expect(&Token::RBracket)?;
                    expr = Expr::Indexed { target: Box::new(expr),
                                           index:  Box::new(index), };
                },
                _ => break,
            }
        }
        Ok(expr)
    }

    /// Parses a single term.
    ///
    /// Literals, names, `self`, instance and class variables, grouping,
    /// array and hash literals, and the keyword forms (`if`, `while`, `def`,
    /// ...) which are expressions too.
    ///
    /// A name immediately followed by `(` is a call with parenthesized
    /// arguments.
    ///
    /// # Errors
    /// `unexpected '<token>'` for anything that cannot start a term, and
    /// `unexpected end of input` when the input is exhausted.
    fn primary(&mut self) -> ParseResult<Expr> {
        let lexeme = self.expect_next()?;
        let line = lexeme.line;
        match lexeme.token {
            Token::Integer(i) => Ok(Expr::constant(i)),
            Token::Real(r) => Ok(Expr::constant(r)),
            Token::Str(s) => Ok(Expr::Constant(Literal::Str(s))),
            Token::Symbol(s) => Ok(Expr::Constant(Literal::Symbol(s))),
            Token::Nil => Ok(Expr::Constant(Literal::Nil)),
            Token::True => Ok(Expr::constant(true)),
            Token::False => Ok(Expr::constant(false)),
            Token::SelfKeyword => Ok(Expr::SelfValue),
            Token::InstanceVar(name) => Ok(Expr::InstanceVar(name)),
            Token::ClassVar(name) => Ok(Expr::ClassVar(name)),
            Token::Name(name) => {
                if self.tokens
                       .peek()?
                       .is_some_and(|l| l.token == Token::LParen && !l.spaced)
                {
                    self.tokens.next_token()?;
                    let mut args = self.paren_arguments()?;
                    args.extend(self.block_trailer()?);
                    return Ok(Expr::Call { name, args });
                }
                Ok(Expr::Name(name))
            },
            Token::LParen => {
                let inner = self.restricted(false, |parser| {
                                    parser.skip_separators()?;
                                    let inner = parser.expression()?;
                                    parser.skip_separators()?;
                                    Ok(inner)
                                })?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            },
            Token::LBracket => {
                let elements =
                    self.restricted(false, |parser| {
                            parser.delimited_list(&Token::RBracket, Self::expression)
                        })?;
                Ok(Expr::Array(elements))
            },
            Token::LBrace => self.hash_literal(),
            Token::If => self.if_expression(),
            Token::While => self.while_expression(),
            Token::Until => self.until_expression(),
            Token::For => self.for_expression(),
            Token::Def => self.def_expression(),
            Token::Class => self.class_expression(),
            Token::Module => self.module_expression(),
            other => Err(ParseError::Unexpected { token: other.to_string(),
                                                  line }),
        }
    }

    /// Parses `{ key => value, ... }` after the opening brace.
    fn hash_literal(&mut self) -> ParseResult<Expr> {
        let entries = self.restricted(false, |parser| {
                              parser.delimited_list(&Token::RBrace, |parser| {
                                        let key = parser.expression()?;
                                        parser.expect(&Token::FatArrow)?;
                                        parser.skip_newlines()?;
                                        let value = parser.expression()?;
                                        Ok((key, value))
                                    })
                          })?;
        Ok(Expr::Hash(entries))
    }
}
