//! Specification tokenizer with source spans
//!
//! Splits DSL text into punctuation, identifiers, sort-qualified identifiers
//! and section keywords. Whitespace is insignificant. An identifier runs until
//! whitespace, a paren, a comma, `=`, or the start of `->`; a `-` not followed
//! by `>` is ordinary identifier text.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::LexError;

/// Source span (byte offsets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Token kinds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Opening parenthesis
    LParen,
    /// Closing parenthesis
    RParen,
    Comma,
    /// `->`
    Map,
    /// `=`
    Equal,
    /// Bare identifier
    Identifier(String),
    /// `Sort:name`
    Qualified { sort: String, name: String },
    /// Any bare word ending in `:`, e.g. `axioms:`
    Keyword(String),
}

impl TokenKind {
    /// Short name of the token class, used in grammar errors.
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::Comma => "','",
            TokenKind::Map => "'->'",
            TokenKind::Equal => "'='",
            TokenKind::Identifier(_) => "identifier",
            TokenKind::Qualified { .. } => "qualified identifier",
            TokenKind::Keyword(_) => "keyword",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Map => write!(f, "->"),
            TokenKind::Equal => write!(f, "="),
            TokenKind::Identifier(s) => write!(f, "{}", s),
            TokenKind::Qualified { sort, name } => write!(f, "{}:{}", sort, name),
            TokenKind::Keyword(k) => write!(f, "{}", k),
        }
    }
}

/// Token with span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Tokenizer for specification text
pub struct Tokenizer<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    /// Tokenize entire input
    pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
        let mut tokenizer = Tokenizer::new(input);
        let mut tokens = Vec::new();
        while let Some(token) = tokenizer.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    /// Get next token, `None` at end of input
    pub fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        self.skip_whitespace();

        let start = self.current_pos();

        let kind = match self.peek_char() {
            None => return Ok(None),
            Some('(') => {
                self.advance();
                TokenKind::LParen
            }
            Some(')') => {
                self.advance();
                TokenKind::RParen
            }
            Some(',') => {
                self.advance();
                TokenKind::Comma
            }
            Some('=') => {
                self.advance();
                TokenKind::Equal
            }
            Some('-') if self.peek_next_is('>') => {
                self.advance();
                self.advance();
                TokenKind::Map
            }
            Some(_) => return self.read_word(start).map(Some),
        };

        Ok(Some(Token::new(kind, Span::new(start, self.current_pos()))))
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if is_whitespace(c) {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_word(&mut self, start: usize) -> Result<Token, LexError> {
        while let Some(c) = self.peek_char() {
            if is_delimiter(c) || (c == '-' && self.peek_next_is('>')) {
                break;
            }
            self.advance();
        }

        let span = Span::new(start, self.current_pos());
        let text = &self.input[start..span.end];

        if text.ends_with(':') {
            return Ok(Token::new(TokenKind::Keyword(text.to_string()), span));
        }

        let kind = match text.split_once(':') {
            None => TokenKind::Identifier(text.to_string()),
            Some((_, rest)) if rest.contains(':') => {
                return Err(LexError::TooManyQualifiers {
                    text: text.to_string(),
                    span,
                });
            }
            Some((sort, name)) if sort.is_empty() || name.is_empty() => {
                return Err(LexError::EmptyQualifier {
                    text: text.to_string(),
                    span,
                });
            }
            Some((sort, name)) => TokenKind::Qualified {
                sort: sort.to_string(),
                name: name.to_string(),
            },
        };

        Ok(Token::new(kind, span))
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn peek_next_is(&self, expected: char) -> bool {
        let mut chars = self.chars.clone();
        chars.next(); // skip current
        chars.peek().map(|(_, c)| *c == expected).unwrap_or(false)
    }

    fn advance(&mut self) -> Option<char> {
        self.chars.next().map(|(_, c)| c)
    }

    fn current_pos(&mut self) -> usize {
        self.chars
            .peek()
            .map(|(i, _)| *i)
            .unwrap_or(self.input.len())
    }
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Characters that end an identifier
fn is_delimiter(c: char) -> bool {
    is_whitespace(c) || matches!(c, '(' | ')' | ',' | '=')
}

/// Cursor over a tokenized input with single-token push-back.
///
/// Pushed tokens are returned before the underlying stream resumes, so a
/// caller that took one token too many can reconsider it.
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<Token>,
    pos: usize,
    pushed: Vec<Token>,
    input_len: usize,
}

impl TokenStream {
    pub fn new(input: &str) -> Result<Self, LexError> {
        Ok(Self {
            tokens: Tokenizer::tokenize(input)?,
            pos: 0,
            pushed: Vec::new(),
            input_len: input.len(),
        })
    }

    /// Token under the cursor, `None` at end of stream
    pub fn current(&self) -> Option<&Token> {
        self.pushed.last().or_else(|| self.tokens.get(self.pos))
    }

    pub fn current_kind(&self) -> Option<&TokenKind> {
        self.current().map(|t| &t.kind)
    }

    /// Take the current token and move past it
    pub fn advance(&mut self) -> Option<Token> {
        if let Some(token) = self.pushed.pop() {
            return Some(token);
        }
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Return a previously taken token to the front of the stream
    pub fn push_back(&mut self, token: Token) {
        self.pushed.push(token);
    }

    pub fn is_eof(&self) -> bool {
        self.current().is_none()
    }

    /// Span just past the end of the input, for errors at end of stream
    pub fn end_span(&self) -> Span {
        Span::new(self.input_len, self.input_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Tokenizer::tokenize(input)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_operation_line() {
        let tokens = kinds("add(Number, Number) -> Number");
        assert_eq!(tokens.len(), 8);
        assert!(matches!(&tokens[0], TokenKind::Identifier(s) if s == "add"));
        assert!(matches!(tokens[1], TokenKind::LParen));
        assert!(matches!(tokens[3], TokenKind::Comma));
        assert!(matches!(tokens[5], TokenKind::RParen));
        assert!(matches!(tokens[6], TokenKind::Map));
        assert!(matches!(&tokens[7], TokenKind::Identifier(s) if s == "Number"));
    }

    #[test]
    fn test_keywords_and_qualified() {
        let tokens = kinds("type: Stack\naxioms:\tbool:true()");
        assert!(matches!(&tokens[0], TokenKind::Keyword(k) if k == "type:"));
        assert!(matches!(&tokens[2], TokenKind::Keyword(k) if k == "axioms:"));
        assert!(matches!(
            &tokens[3],
            TokenKind::Qualified { sort, name } if sort == "bool" && name == "true"
        ));
    }

    #[test]
    fn test_dash_without_arrow_is_identifier_text() {
        let tokens = kinds("is-empty(a-b)->c");
        assert!(matches!(&tokens[0], TokenKind::Identifier(s) if s == "is-empty"));
        assert!(matches!(&tokens[2], TokenKind::Identifier(s) if s == "a-b"));
        assert!(matches!(tokens[4], TokenKind::Map));
        assert!(matches!(&tokens[5], TokenKind::Identifier(s) if s == "c"));
    }

    #[test]
    fn test_arrow_directly_after_identifier() {
        let tokens = kinds("x->y");
        assert_eq!(tokens.len(), 3);
        assert!(matches!(tokens[1], TokenKind::Map));
    }

    #[test]
    fn test_equal_splits_identifiers() {
        let tokens = kinds("a=b");
        assert_eq!(tokens.len(), 3);
        assert!(matches!(tokens[1], TokenKind::Equal));
    }

    #[test]
    fn test_spans() {
        let tokens = Tokenizer::tokenize("  foo (").unwrap();
        assert_eq!(tokens[0].span, Span::new(2, 5));
        assert_eq!(tokens[1].span, Span::new(6, 7));
    }

    #[test]
    fn test_too_many_colons() {
        let err = Tokenizer::tokenize("a:b:c").unwrap_err();
        assert!(matches!(err, LexError::TooManyQualifiers { ref text, .. } if text == "a:b:c"));
        assert_eq!(err.span(), Span::new(0, 5));
    }

    #[test]
    fn test_empty_sort_qualifier() {
        let err = Tokenizer::tokenize(":x").unwrap_err();
        assert!(matches!(err, LexError::EmptyQualifier { .. }));
    }

    #[test]
    fn test_stream_push_back() {
        let mut stream = TokenStream::new("x = y").unwrap();
        let first = stream.advance().unwrap();
        assert!(matches!(stream.current_kind(), Some(TokenKind::Equal)));
        stream.push_back(first);
        assert!(matches!(stream.current_kind(), Some(TokenKind::Identifier(s)) if s == "x"));
        stream.advance();
        stream.advance();
        stream.advance();
        assert!(stream.is_eof());
        assert!(stream.advance().is_none());
        assert_eq!(stream.end_span(), Span::new(5, 5));
    }
}
