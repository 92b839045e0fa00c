use crate::{
    ast::{CompareOperator, Expr},
    interpreter::{
        lexer::Token,
        parser::core::{ParseResult, Parser},
    },
};

impl Parser<'_> {
    /// Parses an inclusive range, the lowest binary tier.
    ///
    /// The rule is: `range := comparison [".." comparison]`
    ///
    /// `1+2..10` is therefore the range from `1+2` to `10`.
    pub(super) fn range(&mut self) -> ParseResult<Expr> {
        let from = self.comparison()?;
        if self.accept(&Token::DotDot)? {
            let to = self.comparison()?;
            return Ok(Expr::Range { from: Box::new(from),
                                    to:   Box::new(to), });
        }
        Ok(from)
    }

    /// Parses comparisons, left-associatively.
    ///
    /// The rule is: `comparison := additive (compare-op additive)*`
    pub(super) fn comparison(&mut self) -> ParseResult<Expr> {
        let mut left = self.additive()?;
        while let Some(op) = self.tokens.peek()?.and_then(|l| compare_operator(&l.token)) {
            self.tokens.next_token()?;
            let right = self.additive()?;
            left = Expr::compare(left, op, right);
        }
        Ok(left)
    }

    /// Parses addition and subtraction.
    ///
    /// Handles left-associative binary operators: `+` and `-`, so `1-2-3` is
    /// `(1-2)-3`.
    ///
    /// The rule is: `additive := multiplicative (("+" | "-") multiplicative)*`
    ///
    /// # Returns
    /// A tree of `Add`/`Subtract` nodes over multiplicative operands.
    pub(super) fn additive(&mut self) -> ParseResult<Expr> {
        let mut left = self.multiplicative()?;
        loop {
            if self.accept(&Token::Plus)? {
                left = Expr::add(left, self.multiplicative()?);
            } else if self.accept(&Token::Minus)? {
                left = Expr::subtract(left, self.multiplicative()?);
            } else {
                break;
            }
        }
        Ok(left)
    }

    /// Parses multiplication and division.
    ///
    /// The rule is: `multiplicative := unary (("*" | "/") unary)*`
    ///
    /// # Returns
    /// A tree of `Multiply`/`Divide` nodes over unary operands.
    pub(super) fn multiplicative(&mut self) -> ParseResult<Expr> {
        let mut left = self.unary()?;
        loop {
            if self.accept(&Token::Star)? {
                left = Expr::multiply(left, self.unary()?);
            } else if self.accept(&Token::Slash)? {
                left = Expr::divide(left, self.unary()?);
            } else {
                break;
            }
        }
        Ok(left)
    }
}

/// Maps a token to the comparison it denotes, if any.
fn compare_operator(token: &Token) -> Option<CompareOperator> {
    match token {
        Token::EqualEqual => Some(CompareOperator::Equal),
        Token::BangEqual => Some(CompareOperator::NotEqual),
        Token::Less => Some(CompareOperator::Less),
        Token::Greater => Some(CompareOperator::Greater),
        Token::LessEqual => Some(CompareOperator::LessOrEqual),
        Token::GreaterEqual => Some(CompareOperator::GreaterOrEqual),
        _ => None,
    }
}
