use crate::{
    ast::Expr,
    error::ParseError,
    interpreter::lexer::{Lexeme, Token, TokenStream},
};

pub type ParseResult<T> = Result<T, ParseError>;

/// A recursive descent parser over a [`TokenStream`].
///
/// The parser is lazy: each call to [`Parser::parse_command`] or
/// [`Parser::parse_expression`] reads only as many tokens as the next
/// construct needs, so one instance can be drained command by command.
///
/// The first malformed construct aborts the current call with a
/// [`ParseError`]; no partial tree is returned.
pub struct Parser<'src> {
    pub(super) tokens:      TokenStream<'src>,
    /// Set while parsing the condition of `while`, `until` and `for`, and the
    /// bare arguments of a command call, where `do` belongs to the enclosing
    /// construct rather than to a nested call.
    pub(super) no_do_block: bool,
}

impl<'src> Parser<'src> {
    /// Creates a parser over `source`.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self { tokens:      TokenStream::new(source),
               no_do_block: false, }
    }

    /// Parses the next command.
    ///
    /// Leading newlines and semicolons are skipped. The command must be
    /// followed by an end of command: a newline, `;`, the end of input, or a
    /// closing `end`/`else`/`elif`/`}` which is left in the stream.
    ///
    /// # Returns
    /// `Ok(None)` once the input is exhausted.
    ///
    /// # Example
    /// ```
    /// use rubyish::{ast::Expr, interpreter::parser::core::Parser};
    ///
    /// let mut parser = Parser::new("a=2\n");
    /// let command = parser.parse_command().unwrap();
    ///
    /// assert_eq!(command, Some(Expr::assign("a", Expr::constant(2))));
    /// assert_eq!(parser.parse_command().unwrap(), None);
    /// ```
    pub fn parse_command(&mut self) -> ParseResult<Option<Expr>> {
        self.skip_separators()?;
        if self.tokens.peek()?.is_none() {
            return Ok(None);
        }
        self.command().map(Some)
    }

    /// Parses the next expression without requiring a command terminator.
    ///
    /// Nothing is skipped before the expression, and nothing after it is
    /// consumed, so several expressions separated only by spaces can be read
    /// one after another.
    ///
    /// # Returns
    /// `Ok(None)` at the end of input.
    pub fn parse_expression(&mut self) -> ParseResult<Option<Expr>> {
        if self.tokens.peek()?.is_none() {
            return Ok(None);
        }
        self.expression().map(Some)
    }

    /// Parses every remaining command.
    pub fn parse_program(&mut self) -> ParseResult<Vec<Expr>> {
        let mut commands = Vec::new();
        while let Some(command) = self.parse_command()? {
            commands.push(command);
        }
        Ok(commands)
    }

    /// Parses a full expression, including assignment and command calls.
    ///
    /// The rule is:
    /// `expression := range [call-arguments] ["=" expression]`
    ///
    /// A bare name followed by something that can start an argument, or by a
    /// block, becomes a call: `puts 1, 2` or `map do ... end`.
    pub(super) fn expression(&mut self) -> ParseResult<Expr> {
        let line = self.tokens.line();
        let mut left = self.range()?;

        if let Expr::Name(name) = &left {
            let name = name.clone();
            if self.argument_follows()? {
                let mut args = self.bare_arguments()?;
                args.extend(self.block_trailer()?);
                left = Expr::Call { name, args };
            } else if let Some(block) = self.block_trailer()? {
                left = Expr::Call { name,
                                    args: vec![block] };
            }
        }

        if self.accept(&Token::Equals)? {
            return self.assignment(left, line);
        }
        Ok(left)
    }

    /// Consumes the next token, failing at the end of input.
    pub(super) fn expect_next(&mut self) -> ParseResult<Lexeme> {
        let line = self.tokens.line();
        self.tokens
            .next_token()?
            .ok_or(ParseError::UnexpectedEndOfInput { line })
    }
}
