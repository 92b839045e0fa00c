use crate::{
    ast::Expr,
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::core::{ParseResult, Parser},
    },
};

impl Parser<'_> {
    /// Reports whether the next token equals `token`, without consuming it.
    pub(super) fn next_is(&mut self, token: &Token) -> ParseResult<bool> {
        Ok(self.tokens.peek()?.is_some_and(|l| &l.token == token))
    }

    /// Consumes the next token if it equals `token`.
    ///
    /// # Returns
    /// Whether the token was consumed.
    pub(super) fn accept(&mut self, token: &Token) -> ParseResult<bool> {
        if self.next_is(token)? {
            self.tokens.next_token()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Consumes `token` or fails with `expected '<token>'`.
    pub(super) fn expect(&mut self, token: &Token) -> ParseResult<()> {
        if self.accept(token)? {
            return Ok(());
        }
        Err(ParseError::Expected { expected: token.to_string(),
                                   line:     self.tokens.line(), })
    }

    /// Skips newlines and semicolons.
    pub(super) fn skip_separators(&mut self) -> ParseResult<()> {
        while self.accept(&Token::NewLine)? || self.accept(&Token::Semicolon)? {}
        Ok(())
    }

    /// Skips newlines only, used inside brackets where they carry no meaning.
    pub(super) fn skip_newlines(&mut self) -> ParseResult<()> {
        while self.accept(&Token::NewLine)? {}
        Ok(())
    }

    /// Runs `parse` with the `do` restriction set to `no_do_block`, restoring
    /// the previous setting afterwards.
    pub(super) fn restricted<T>(&mut self,
                                no_do_block: bool,
                                parse: impl FnOnce(&mut Self) -> ParseResult<T>)
                                -> ParseResult<T> {
        let saved = std::mem::replace(&mut self.no_do_block, no_do_block);
        let result = parse(self);
        self.no_do_block = saved;
        result
    }

    /// Reads a method name: a plain name or a keyword.
    ///
    /// # Errors
    /// `name expected` when the next token cannot name a method.
    pub(super) fn method_name(&mut self) -> ParseResult<String> {
        let line = self.tokens.line();
        match self.tokens.next_token()? {
            Some(lexeme) => lexeme.token
                                  .as_method_name()
                                  .ok_or(ParseError::NameExpected { line: lexeme.line }),
            None => Err(ParseError::NameExpected { line }),
        }
    }

    /// Reads a plain identifier, as used for parameters and loop variables.
    pub(super) fn identifier(&mut self) -> ParseResult<String> {
        let line = self.tokens.line();
        match self.tokens.next_token()? {
            Some(lexeme) => match lexeme.token {
                Token::Name(name) => Ok(name),
                _ => Err(ParseError::NameExpected { line: lexeme.line }),
            },
            None => Err(ParseError::NameExpected { line }),
        }
    }

    /// Parses identifiers separated by commas until `closing`, which is
    /// consumed. Used for `(a, b)` parameter lists and `|a, b|` block
    /// parameters.
    pub(super) fn parameter_list(&mut self, closing: &Token) -> ParseResult<Vec<String>> {
        let mut names = Vec::new();
        if self.accept(closing)? {
            return Ok(names);
        }
        loop {
            names.push(self.identifier()?);
            if !self.accept(&Token::Comma)? {
                break;
            }
        }
        self.expect(closing)?;
        Ok(names)
    }

    /// Parses `(a, b, ...)` after the opening parenthesis has been consumed.
    ///
    /// Newlines inside the parentheses are ignored.
    pub(super) fn paren_arguments(&mut self) -> ParseResult<Vec<Expr>> {
        self.restricted(false, |parser| {
                parser.delimited_list(&Token::RParen, Self::expression)
            })
    }

    /// Parses comma-separated items up to and including `closing`.
    ///
    /// Grammar (simplified): `list := [item ("," item)* [","]] closing`
    pub(super) fn delimited_list<T>(&mut self,
                                    closing: &Token,
                                    mut item: impl FnMut(&mut Self) -> ParseResult<T>)
                                    -> ParseResult<Vec<T>> {
        let mut items = Vec::new();
        self.skip_newlines()?;
        while !self.next_is(closing)? {
            items.push(item(self)?);
            self.skip_newlines()?;
            if !self.accept(&Token::Comma)? {
                break;
            }
            self.skip_newlines()?;
        }
        self.expect(closing)?;
        Ok(items)
    }

    /// Parses the arguments of a command call written without parentheses,
    /// as in `puts 1, 2`.
    ///
    /// A `do` block after the arguments belongs to the outer call, so nested
    /// calls inside the arguments do not take it.
    pub(super) fn bare_arguments(&mut self) -> ParseResult<Vec<Expr>> {
        self.restricted(true, |parser| {
                let mut args = vec![parser.expression()?];
                while parser.accept(&Token::Comma)? {
                    parser.skip_newlines()?;
                    args.push(parser.expression()?);
                }
                Ok(args)
            })
    }

    /// Parses the arguments after `.name`: parenthesized, bare, or none,
    /// followed by an optional block.
    pub(super) fn call_arguments(&mut self) -> ParseResult<Vec<Expr>> {
        let mut args = if self.tokens
                              .peek()?
                              .is_some_and(|l| l.token == Token::LParen && !l.spaced)
        {
            self.tokens.next_token()?;
            self.paren_arguments()?
        } else if self.argument_follows()? {
            self.bare_arguments()?
        } else {
            Vec::new()
        };
        args.extend(self.block_trailer()?);
        Ok(args)
    }

    /// Reports whether the next token can begin the first argument of a call
    /// written without parentheses.
    ///
    /// Operators never do, so `a - 1` stays a subtraction. Brackets and
    /// parentheses only do when separated by whitespace: `puts [1]` passes an
    /// array while `a[1]` indexes.
    pub(super) fn argument_follows(&mut self) -> ParseResult<bool> {
        let Some(lexeme) = self.tokens.peek()? else {
            return Ok(false);
        };
        Ok(match lexeme.token {
            Token::Integer(_)
            | Token::Real(_)
            | Token::Str(_)
            | Token::Symbol(_)
            | Token::Name(_)
            | Token::InstanceVar(_)
            | Token::ClassVar(_)
            | Token::SelfKeyword
            | Token::Nil
            | Token::True
            | Token::False => true,
            Token::LBracket | Token::LParen => lexeme.spaced,
            _ => false,
        })
    }
}
