use crate::{
    ast::{Expr, is_constant},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::core::{ParseResult, Parser},
    },
};

impl Parser<'_> {
    /// Parses one expression and the end of command after it.
    pub(super) fn command(&mut self) -> ParseResult<Expr> {
        let expr = self.expression()?;
        self.end_of_command()?;
        Ok(expr)
    }

    /// Parses commands until one of `terminators` is next. The terminator
    /// itself is left for the caller.
    ///
    /// # Errors
    /// `unexpected end of input` when the input ends before a terminator,
    /// which is how a missing `end` surfaces.
    pub(super) fn command_list(&mut self, terminators: &[Token]) -> ParseResult<Vec<Expr>> {
        let mut commands = Vec::new();
        loop {
            self.skip_separators()?;
            match self.tokens.peek()? {
                None => {
                    return Err(ParseError::UnexpectedEndOfInput { line: self.tokens.line() });
                },
                Some(lexeme) if terminators.contains(&lexeme.token) => break,
                Some(_) => commands.push(self.command()?),
            }
        }
        Ok(commands)
    }

    /// Consumes the end of a command.
    ///
    /// A newline or `;` is consumed; `end`, `else`, `elif` and `}` close an
    /// enclosing body and stay in the stream. The end of input also ends a
    /// command.
    ///
    /// # Errors
    /// `end of command expected` for anything else, as in `a=2 b=3`.
    pub(super) fn end_of_command(&mut self) -> ParseResult<()> {
        let Some(lexeme) = self.tokens.next_token()? else {
            return Ok(());
        };
        if lexeme.token.closes_body() {
            self.tokens.push_token(lexeme);
            return Ok(());
        }
        match lexeme.token {
            Token::NewLine | Token::Semicolon => Ok(()),
            _ => Err(ParseError::EndOfCommandExpected { line: lexeme.line }),
        }
    }

    /// Requires a newline or `;` after a header such as `while c` or
    /// `class Foo`, unless `end` follows directly.
    fn header_end(&mut self) -> ParseResult<()> {
        if self.accept(&Token::NewLine)? || self.accept(&Token::Semicolon)? || self.next_is(&Token::End)? {
            return Ok(());
        }
        match self.tokens.peek()? {
            None => Err(ParseError::UnexpectedEndOfInput { line: self.tokens.line() }),
            Some(lexeme) => Err(ParseError::EndOfCommandExpected { line: lexeme.line }),
        }
    }

    /// Parses a body up to `end` and consumes the `end`.
    fn body_until_end(&mut self) -> ParseResult<Expr> {
        let body = self.command_list(&[Token::End])?;
        self.expect(&Token::End)?;
        Ok(Expr::body(body))
    }

    /// Builds the assignment node for `target = ...`, after the `=` has been
    /// consumed.
    ///
    /// Accepted targets are names, `@ivar`, `@@cvar`, `a[i]` and `a.b`.
    /// Assignment is right-associative: `a = b = 1`.
    pub(super) fn assignment(&mut self, target: Expr, line: usize) -> ParseResult<Expr> {
        self.skip_newlines()?;
        let value = Box::new(self.expression()?);
        match target {
            Expr::Name(name) => Ok(Expr::Assign { name, value }),
            Expr::InstanceVar(name) => Ok(Expr::AssignInstanceVar { name, value }),
            Expr::ClassVar(name) => Ok(Expr::AssignClassVar { name, value }),
            Expr::Indexed { target, index } => Ok(Expr::AssignIndexed { target,
                                                                        index,
                                                                        value }),
            dot @ Expr::Dot { .. } if matches!(&dot, Expr::Dot { args, .. } if args.is_empty()) => {
                Ok(Expr::AssignDot { target: Box::new(dot),
                                     value })
            },
            _ => Err(ParseError::InvalidAssignmentTarget { line }),
        }
    }

    /// Parses an `if` after the keyword.
    ///
    /// Syntax:
    /// ```text
    ///     if <condition> [then]
    ///         <commands>
    ///     elif <condition> [then]
    ///         <commands>
    ///     else
    ///         <commands>
    ///     end
    /// ```
    /// Each `elif` becomes a nested `If` in the else branch of the previous
    /// one, and only the innermost consumes the `end`. The one-line forms
    /// `if c then a end` and `if c; a; end` are accepted.
    pub(super) fn if_expression(&mut self) -> ParseResult<Expr> {
        let condition = self.expression()?;
        if !self.accept(&Token::Then)? {
            self.header_end()?;
        }
        let then_branch = Expr::body(self.command_list(&[Token::End, Token::Else, Token::Elif])?);

        let else_branch = if self.accept(&Token::Elif)? {
            Some(Box::new(self.if_expression()?))
        } else if self.accept(&Token::Else)? {
            Some(Box::new(self.body_until_end()?))
        } else {
            self.expect(&Token::End)?;
            None
        };

        Ok(Expr::If { condition: Box::new(condition),
                      then_branch: Box::new(then_branch),
                      else_branch })
    }

    /// Parses the condition of a loop and the optional `do` after it.
    fn loop_header(&mut self) -> ParseResult<Expr> {
        let condition = self.restricted(true, Self::expression)?;
        if !self.accept(&Token::Do)? {
            self.header_end()?;
        }
        Ok(condition)
    }

    /// Parses `while <condition> [do] ... end` after the keyword.
    pub(super) fn while_expression(&mut self) -> ParseResult<Expr> {
        let condition = self.loop_header()?;
        let body = self.body_until_end()?;
        Ok(Expr::While { condition: Box::new(condition),
                         body:      Box::new(body), })
    }

    /// Parses `until <condition> [do] ... end` after the keyword.
    pub(super) fn until_expression(&mut self) -> ParseResult<Expr> {
        let condition = self.loop_header()?;
        let body = self.body_until_end()?;
        Ok(Expr::Until { condition: Box::new(condition),
                         body:      Box::new(body), })
    }

    /// Parses `for <name> in <collection> [do] ... end` after the keyword.
    pub(super) fn for_expression(&mut self) -> ParseResult<Expr> {
        let name = self.identifier()?;
        self.expect(&Token::In)?;
        let collection = self.loop_header()?;
        let body = self.body_until_end()?;
        Ok(Expr::ForIn { name,
                         collection: Box::new(collection),
                         body: Box::new(body) })
    }

    /// Parses a method definition after `def`.
    ///
    /// Targets:
    /// - `def name`, a plain definition;
    /// - `def recv.name` and `def recv::name`, where `recv` is `self` or a
    ///   name, defining on the receiver's singleton class.
    ///
    /// A setter is written `def name=(value)`. Parameters may be
    /// parenthesized or bare (`def add a, b`).
    ///
    /// # Errors
    /// `name expected` when no usable name follows `def`.
    pub(super) fn def_expression(&mut self) -> ParseResult<Expr> {
        let line = self.tokens.line();
        let first = self.tokens
                        .next_token()?
                        .ok_or(ParseError::NameExpected { line })?;
        let receiver = match &first.token {
            Token::SelfKeyword => Some(Expr::SelfValue),
            Token::Name(name) => Some(Expr::Name(name.clone())),
            _ => None,
        };

        let qualified = self.next_is(&Token::Dot)? || self.next_is(&Token::DoubleColon)?;
        let target = match receiver {
            Some(receiver) if qualified => {
                let double_colon = self.accept(&Token::DoubleColon)?;
                if !double_colon {
                    self.expect(&Token::Dot)?;
                }
                let name = self.method_name()?;
                let name = self.setter_suffix(name)?;
                if double_colon {
                    Expr::double_colon(receiver, &name)
                } else {
                    Expr::dot(receiver, &name, Vec::new())
                }
            },
            Some(Expr::SelfValue) => return Err(ParseError::NameExpected { line: first.line }),
            _ => {
                let name = first.token
                                .as_method_name()
                                .ok_or(ParseError::NameExpected { line: first.line })?;
                Expr::Name(self.setter_suffix(name)?)
            },
        };

        let params = if self.accept(&Token::LParen)? {
            self.parameter_list(&Token::RParen)?
        } else if self.tokens
                      .peek()?
                      .is_some_and(|l| matches!(l.token, Token::Name(_)))
        {
            let mut params = vec![self.identifier()?];
            while self.accept(&Token::Comma)? {
                params.push(self.identifier()?);
            }
            params
        } else {
            Vec::new()
        };

        let body = self.body_until_end()?;
        Ok(Expr::Def { target: Box::new(target),
                       params,
                       body: Box::new(body) })
    }

    /// Appends `=` to a method name written as `name=`, with no space before
    /// the `=`.
    fn setter_suffix(&mut self, name: String) -> ParseResult<String> {
        if self.tokens
               .peek()?
               .is_some_and(|l| l.token == Token::Equals && !l.spaced)
        {
            self.tokens.next_token()?;
            return Ok(format!("{name}="));
        }
        Ok(name)
    }

    /// Reads the constant after `class` or `module`.
    ///
    /// # Errors
    /// `class/module name must be a CONSTANT` for a lowercase name, `name
    /// expected` for anything that is not a name at all.
    fn constant_name(&mut self) -> ParseResult<String> {
        let line = self.tokens.line();
        let lexeme = self.tokens
                         .next_token()?
                         .ok_or(ParseError::NameExpected { line })?;
        match lexeme.token {
            Token::Name(name) if is_constant(&name) => Ok(name),
            Token::Name(_) => Err(ParseError::ConstantNameExpected { line: lexeme.line }),
            _ => Err(ParseError::NameExpected { line: lexeme.line }),
        }
    }

    /// Parses `class Name[::Nested]* [< Superclass] ... end` after the
    /// keyword.
    pub(super) fn class_expression(&mut self) -> ParseResult<Expr> {
        let mut name = Expr::Name(self.constant_name()?);
        while self.accept(&Token::DoubleColon)? {
            let nested = self.constant_name()?;
            name = Expr::double_colon(name, &nested);
        }
        let superclass = if self.accept(&Token::Less)? {
            Some(Box::new(self.range()?))
        } else {
            None
        };
        self.header_end()?;
        let body = self.body_until_end()?;
        Ok(Expr::Class { name: Box::new(name),
                         superclass,
                         body: Box::new(body) })
    }

    /// Parses `module Name ... end` after the keyword.
    pub(super) fn module_expression(&mut self) -> ParseResult<Expr> {
        let name = self.constant_name()?;
        self.header_end()?;
        let body = self.body_until_end()?;
        Ok(Expr::Module { name,
                          body: Box::new(body) })
    }
}
