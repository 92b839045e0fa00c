use std::fmt;

use logos::Logos;

use crate::error::ParseError;

/// Represents a lexical token in the source input.
///
/// Newlines are significant: they terminate commands. Keywords get their own
/// variants, but the parser still accepts them as method names after `.`,
/// `::` and `def`, so `obj.class` works.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(extras = LexerExtras)]
pub enum Token {
    /// Real literal tokens, such as `3.14`.
    #[regex(r"[0-9]+\.[0-9]+", parse_float)]
    Real(f64),
    /// Integer literal tokens, such as `42`.
    #[regex(r"[0-9]+", parse_integer)]
    Integer(i64),
    /// String literal tokens in single or double quotes, unescaped.
    #[regex(r#""([^"\\\n]|\\.)*""#, parse_string)]
    #[regex(r"'([^'\\\n]|\\.)*'", parse_string)]
    Str(String),
    /// Symbol tokens such as `:name`, without the colon.
    #[regex(r":[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice()[1..].to_string())]
    Symbol(String),
    /// Identifier tokens. An uppercase first letter marks a constant.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Name(String),
    /// Instance variable tokens such as `@name`, without the sigil.
    #[regex(r"@[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice()[1..].to_string())]
    InstanceVar(String),
    /// Class variable tokens such as `@@count`, without the sigils.
    #[regex(r"@@[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice()[2..].to_string())]
    ClassVar(String),

    #[token("if")]
    If,
    #[token("elif")]
    #[token("elsif")]
    Elif,
    #[token("else")]
    Else,
    #[token("then")]
    Then,
    #[token("end")]
    End,
    #[token("def")]
    Def,
    #[token("class")]
    Class,
    #[token("module")]
    Module,
    #[token("while")]
    While,
    #[token("until")]
    Until,
    #[token("for")]
    For,
    #[token("in")]
    In,
    #[token("do")]
    Do,
    #[token("self")]
    SelfKeyword,
    #[token("nil")]
    Nil,
    #[token("true")]
    True,
    #[token("false")]
    False,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("==")]
    EqualEqual,
    #[token("!=")]
    BangEqual,
    #[token("<=")]
    LessEqual,
    #[token(">=")]
    GreaterEqual,
    #[token("<")]
    Less,
    #[token(">")]
    Greater,
    #[token("=")]
    Equals,
    #[token("!")]
    Bang,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token("::")]
    DoubleColon,
    #[token(".")]
    Dot,
    #[token("..")]
    DotDot,
    #[token("=>")]
    FatArrow,
    #[token("|")]
    Pipe,

    /// `# Comments.`
    #[regex(r"#[^\n]*", logos::skip, allow_greedy = true)]
    Comment,
    /// A backslash at the end of a line joins it with the next one.
    #[regex(r"\\\r?\n", |lex| {
        lex.extras.line += 1;
        logos::Skip
    })]
    LineContinuation,
    #[token("\n", |lex| {
        lex.extras.line += 1;
        Token::NewLine
    })]
    NewLine,
    #[regex(r"[ \t\r\f]+", logos::skip)]
    Ignored,
}

impl Token {
    /// Returns the text of this token when it can serve as a method name.
    ///
    /// Names qualify, and so do keywords, so that `obj.class` or
    /// `def self.end` parse.
    #[must_use]
    pub fn as_method_name(&self) -> Option<String> {
        match self {
            Self::Name(name) => Some(name.clone()),
            Self::If
            | Self::Elif
            | Self::Else
            | Self::Then
            | Self::End
            | Self::Def
            | Self::Class
            | Self::Module
            | Self::While
            | Self::Until
            | Self::For
            | Self::In
            | Self::Do
            | Self::SelfKeyword
            | Self::Nil
            | Self::True
            | Self::False => Some(self.to_string()),
            _ => None,
        }
    }

    /// Reports whether this token terminates a command without being
    /// consumed by it.
    #[must_use]
    pub const fn closes_body(&self) -> bool {
        matches!(self, Self::End | Self::Else | Self::Elif | Self::RBrace)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Real(r) => write!(f, "{r}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Symbol(s) => write!(f, ":{s}"),
            Self::Name(s) => f.write_str(s),
            Self::InstanceVar(s) => write!(f, "@{s}"),
            Self::ClassVar(s) => write!(f, "@@{s}"),
            other => f.write_str(match other {
                          Self::If => "if",
                          Self::Elif => "elif",
                          Self::Else => "else",
                          Self::Then => "then",
                          Self::End => "end",
                          Self::Def => "def",
                          Self::Class => "class",
                          Self::Module => "module",
                          Self::While => "while",
                          Self::Until => "until",
                          Self::For => "for",
                          Self::In => "in",
                          Self::Do => "do",
                          Self::SelfKeyword => "self",
                          Self::Nil => "nil",
                          Self::True => "true",
                          Self::False => "false",
                          Self::Plus => "+",
                          Self::Minus => "-",
                          Self::Star => "*",
                          Self::Slash => "/",
                          Self::EqualEqual => "==",
                          Self::BangEqual => "!=",
                          Self::LessEqual => "<=",
                          Self::GreaterEqual => ">=",
                          Self::Less => "<",
                          Self::Greater => ">",
                          Self::Equals => "=",
                          Self::Bang => "!",
                          Self::LParen => "(",
                          Self::RParen => ")",
                          Self::LBracket => "[",
                          Self::RBracket => "]",
                          Self::LBrace => "{",
                          Self::RBrace => "}",
                          Self::Comma => ",",
                          Self::Semicolon => ";",
                          Self::DoubleColon => "::",
                          Self::Dot => ".",
                          Self::DotDot => "..",
                          Self::FatArrow => "=>",
                          Self::Pipe => "|",
                          Self::NewLine => "\\n",
                          _ => "",
                      }),
        }
    }
}

/// Additional information carried by the lexer during tokenization.
///
/// Tracks the current line number for error reporting.
#[derive(Default)]
pub struct LexerExtras {
    pub line: usize,
}

/// Parses a real literal from the current token slice.
fn parse_float(lex: &logos::Lexer<Token>) -> Option<f64> {
    lex.slice().parse().ok()
}

/// Parses an integer literal from the current token slice.
///
/// Returns `None` for literals that do not fit in an `i64`, which surfaces as
/// a lexing error.
fn parse_integer(lex: &logos::Lexer<Token>) -> Option<i64> {
    lex.slice().parse().ok()
}

/// Strips the quotes from a string literal and resolves its escapes.
///
/// Unknown escapes keep the escaped character, so `'\q'` reads as `q`.
fn parse_string(lex: &logos::Lexer<Token>) -> String {
    let slice = lex.slice();
    let body = &slice[1..slice.len() - 1];
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// A token together with where it was found.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme {
    /// The token itself.
    pub token:  Token,
    /// The 1-based source line.
    pub line:   usize,
    /// Whether whitespace or a comment separates this token from the
    /// previous one. `puts [1]` passes an array while `a[1]` indexes.
    pub spaced: bool,
}

/// A lazily lexed token stream with unlimited pushback.
///
/// Tokens are produced one at a time from the underlying `logos` lexer.
/// [`TokenStream::push_token`] returns a token to the front of the stream;
/// pushed tokens come back out in reverse order of pushing.
pub struct TokenStream<'src> {
    lexer:    logos::Lexer<'src, Token>,
    pushed:   Vec<Lexeme>,
    last_end: usize,
}

impl<'src> TokenStream<'src> {
    /// Creates a stream over `source`, starting at line 1.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self { lexer:    Token::lexer_with_extras(source, LexerExtras { line: 1 }),
               pushed:   Vec::new(),
               last_end: 0, }
    }

    /// Consumes and returns the next token, or `None` at end of input.
    ///
    /// # Errors
    /// Returns [`ParseError::Unexpected`] for characters that start no token
    /// and [`ParseError::LiteralTooLarge`] for oversized integers.
    pub fn next_token(&mut self) -> Result<Option<Lexeme>, ParseError> {
        if let Some(lexeme) = self.pushed.pop() {
            return Ok(Some(lexeme));
        }

        let line = self.lexer.extras.line;
        let Some(result) = self.lexer.next() else {
            return Ok(None);
        };
        let span = self.lexer.span();
        let spaced = span.start > self.last_end;
        self.last_end = span.end;

        match result {
            Ok(token) => Ok(Some(Lexeme { token, line, spaced })),
            Err(()) => {
                let text = self.lexer.slice();
                if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
                    Err(ParseError::LiteralTooLarge { line })
                } else {
                    Err(ParseError::Unexpected { token: text.to_string(),
                                                 line })
                }
            },
        }
    }

    /// Returns a token to the front of the stream.
    pub fn push_token(&mut self, lexeme: Lexeme) {
        self.pushed.push(lexeme);
    }

    /// Looks at the next token without consuming it.
    ///
    /// # Errors
    /// Propagates lexing errors from [`TokenStream::next_token`].
    pub fn peek(&mut self) -> Result<Option<&Lexeme>, ParseError> {
        if self.pushed.is_empty()
           && let Some(lexeme) = self.next_token()?
        {
            self.pushed.push(lexeme);
        }
        Ok(self.pushed.last())
    }

    /// The line the lexer has reached, used for end-of-input errors.
    #[must_use]
    pub fn line(&self) -> usize {
        self.pushed.last().map_or(self.lexer.extras.line, |l| l.line)
    }
}
