use crate::{
    ast::Expr,
    interpreter::{
        lexer::Token,
        parser::core::{ParseResult, Parser},
    },
};

impl Parser<'_> {
    /// Parses a block trailer if one follows.
    ///
    /// Two forms are accepted:
    /// ```text
    ///     do |x, y| ... end
    ///     { |x, y| ... }
    /// ```
    /// The parameter list is optional. A `do` is not taken while the parser
    /// is restricted, so `while running do ... end` keeps its `do`.
    ///
    /// # Returns
    /// An `Expr::Block`, or `None` when no block follows.
    pub(super) fn block_trailer(&mut self) -> ParseResult<Option<Expr>> {
        let closing = if !self.no_do_block && self.accept(&Token::Do)? {
            Token::End
        } else if self.accept(&Token::LBrace)? {
            Token::RBrace
        } else {
            return Ok(None);
        };

        let block = self.restricted(false, |parser| {
                            let params = if parser.accept(&Token::Pipe)? {
                                parser.parameter_list(&Token::Pipe)?
                            } else {
                                Vec::new()
                            };
                            let body = parser.command_list(&[closing.clone()])?;
                            parser.expect(&closing)?;
                            Ok(Expr::Block { params,
                                             body: Box::new(Expr::body(body)) })
                        })?;
        Ok(Some(block))
    }
}
