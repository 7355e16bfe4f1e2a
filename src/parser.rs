//! Recursive-descent parser for specifications and ad hoc expressions
//!
//! ```text
//! spec       := "type:" IDENT "sorts:" sortlist "operations:" operation* "axioms:" axiom*
//! sortlist   := (IDENT ("," IDENT)*)?
//! operation  := IDENT "(" sortlist ")" "->" IDENT
//! axiom      := term "=" term
//! term       := (IDENT | QUALIFIED_IDENT) ["(" term ("," term)* ")"]
//! statement  := IDENT "=" term | term
//! ```
//!
//! Inside a specification every term is checked against the signature parsed
//! so far: qualified sorts and literal sorts must be declared, and
//! applications of the specification's own sort must name a known operation
//! with the declared arity. A bare name of a nullary operation of the own
//! sort (`zero` for `zero() -> Number`) is read as that constant. Expressions
//! and statements are parsed unchecked against a caller supplied default sort.

use tracing::debug;

use crate::error::{ParseError, Result, SignatureError};
use crate::extensions::LiteralTransformers;
use crate::lexer::{Span, Token, TokenKind, TokenStream};
use crate::model::{Axiom, Operation, Specification};
use crate::term::Term;

// ============================================================================
// Public API
// ============================================================================

/// One statement of an ad hoc evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `name = term`
    Assignment { name: String, expression: Term },
    Expression(Term),
}

impl Statement {
    pub fn expression(&self) -> &Term {
        match self {
            Statement::Assignment { expression, .. } => expression,
            Statement::Expression(term) => term,
        }
    }
}

/// Parse a complete specification with no literal transformers.
pub fn parse_specification(input: &str) -> Result<Specification> {
    parse_specification_with(input, &LiteralTransformers::new())
}

/// Parse a complete specification, offering bare identifiers in axioms to
/// `transformers` first.
pub fn parse_specification_with(
    input: &str,
    transformers: &LiteralTransformers,
) -> Result<Specification> {
    Parser::new(input, transformers)?.specification()
}

/// Parse a single term. Unqualified identifiers take `default_sort`.
pub fn parse_expression(
    input: &str,
    default_sort: &str,
    transformers: &LiteralTransformers,
) -> Result<Term> {
    let mut parser = Parser::new(input, transformers)?;
    let scope = Scope::unchecked(default_sort);
    let term = parser.term(&scope)?;
    parser.expect_eof()?;
    Ok(term)
}

/// Parse a sequence of assignments and bare terms.
pub fn parse_statements(
    input: &str,
    default_sort: &str,
    transformers: &LiteralTransformers,
) -> Result<Vec<Statement>> {
    Parser::new(input, transformers)?.statements(default_sort)
}

// ============================================================================
// Parser
// ============================================================================

/// How terms are read: which sort unqualified names get, and which signature
/// (if any) they are checked against.
struct Scope<'s> {
    default_sort: &'s str,
    signature: Option<&'s Specification>,
}

impl<'s> Scope<'s> {
    fn checked(signature: &'s Specification) -> Self {
        Self {
            default_sort: signature.name(),
            signature: Some(signature),
        }
    }

    fn unchecked(default_sort: &'s str) -> Self {
        Self {
            default_sort,
            signature: None,
        }
    }
}

struct Parser<'a> {
    tokens: TokenStream,
    transformers: &'a LiteralTransformers,
}

impl<'a> Parser<'a> {
    fn new(input: &str, transformers: &'a LiteralTransformers) -> Result<Self> {
        Ok(Self {
            tokens: TokenStream::new(input)?,
            transformers,
        })
    }

    fn specification(mut self) -> Result<Specification> {
        self.expect_keyword("type:")?;
        let name = self.expect_identifier("sort name")?;

        self.expect_keyword("sorts:")?;
        let sorts = self.sort_list()?;

        self.expect_keyword("operations:")?;
        let operations = self.operations()?;
        let signature = Specification::new(name, sorts, operations, Vec::new())?;

        self.expect_keyword("axioms:")?;
        let axioms = self.axioms(&signature)?;
        self.expect_eof()?;

        debug!(
            "Parsed specification '{}': {} operations, {} axioms",
            signature.name(),
            signature.operations().len(),
            axioms.len()
        );

        Ok(signature.with_axioms(axioms))
    }

    fn sort_list(&mut self) -> Result<Vec<String>> {
        let mut sorts = Vec::new();
        if matches!(self.tokens.current_kind(), Some(TokenKind::Identifier(_))) {
            sorts.push(self.expect_identifier("sort")?);
            while matches!(self.tokens.current_kind(), Some(TokenKind::Comma)) {
                self.tokens.advance();
                sorts.push(self.expect_identifier("sort")?);
            }
        }
        Ok(sorts)
    }

    fn operations(&mut self) -> Result<Vec<Operation>> {
        let mut operations = Vec::new();
        loop {
            match self.tokens.current_kind() {
                Some(TokenKind::Keyword(_)) => return Ok(operations),
                Some(_) => operations.push(self.operation()?),
                None => return Err(ParseError::eof("'axioms:'").into()),
            }
        }
    }

    fn operation(&mut self) -> Result<Operation> {
        let name = self.expect_identifier("operation name")?;
        self.expect(TokenKind::LParen)?;
        let argument_sorts = self.sort_list()?;
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::Map)?;
        let result_sort = self.expect_identifier("result sort")?;
        Ok(Operation::new(name, argument_sorts, result_sort))
    }

    fn axioms(&mut self, signature: &Specification) -> Result<Vec<Axiom>> {
        let scope = Scope::checked(signature);
        let mut axioms = Vec::new();
        while !self.tokens.is_eof()
            && !matches!(self.tokens.current_kind(), Some(TokenKind::Keyword(_)))
        {
            let pattern = self.term(&scope)?;
            self.expect(TokenKind::Equal)?;
            let template = self.term(&scope)?;
            axioms.push(Axiom::new(pattern, template)?);
        }
        Ok(axioms)
    }

    fn statements(&mut self, default_sort: &str) -> Result<Vec<Statement>> {
        let scope = Scope::unchecked(default_sort);
        let mut statements = Vec::new();

        while let Some(token) = self.tokens.advance() {
            let assigned = match &token.kind {
                TokenKind::Identifier(name)
                    if matches!(self.tokens.current_kind(), Some(TokenKind::Equal)) =>
                {
                    Some(name.clone())
                }
                _ => None,
            };

            match assigned {
                Some(name) => {
                    self.tokens.advance();
                    let expression = self.term(&scope)?;
                    statements.push(Statement::Assignment { name, expression });
                }
                None => {
                    self.tokens.push_back(token);
                    statements.push(Statement::Expression(self.term(&scope)?));
                }
            }
        }

        if statements.is_empty() {
            return Err(ParseError::EmptyInput.into());
        }
        Ok(statements)
    }

    fn term(&mut self, scope: &Scope<'_>) -> Result<Term> {
        let token = self
            .tokens
            .advance()
            .ok_or_else(|| ParseError::eof("identifier"))?;

        let (name, sort) = match token.kind {
            TokenKind::Identifier(name) => (name, scope.default_sort.to_string()),
            TokenKind::Qualified { sort, name } => {
                if let Some(signature) = scope.signature {
                    if !signature.knows_sort(&sort) {
                        return Err(SignatureError::UndeclaredSort {
                            sort,
                            name,
                            span: Some(token.span),
                        }
                        .into());
                    }
                }
                (name, sort)
            }
            other => {
                return Err(ParseError::unexpected("identifier", other.to_string(), token.span).into())
            }
        };

        if !matches!(self.tokens.current_kind(), Some(TokenKind::LParen)) {
            return self.terminal(Term::variable(name, sort), token.span, scope);
        }

        self.tokens.advance();
        let mut arguments = Vec::new();
        if !matches!(self.tokens.current_kind(), Some(TokenKind::RParen)) {
            arguments.push(self.term(scope)?);
            while !matches!(self.tokens.current_kind(), Some(TokenKind::RParen)) {
                self.expect(TokenKind::Comma)?;
                arguments.push(self.term(scope)?);
            }
        }
        self.expect(TokenKind::RParen)?;

        let term = Term::application(name, sort, arguments);
        if let Some(signature) = scope.signature {
            signature.check_application(&term)?;
        }
        Ok(term)
    }

    /// A bare identifier: a literal if a transformer claims it, a constant if
    /// it names a nullary operation of the signature's own sort, otherwise a
    /// variable.
    fn terminal(&self, terminal: Term, span: Span, scope: &Scope<'_>) -> Result<Term> {
        let Some(signature) = scope.signature else {
            return Ok(self.transformers.transform(&terminal).unwrap_or(terminal));
        };

        if let Some(literal) = self.transformers.transform(&terminal) {
            if !signature.knows_sort(literal.sort()) {
                return Err(SignatureError::UndeclaredSort {
                    sort: literal.sort().to_string(),
                    name: terminal.name().to_string(),
                    span: Some(span),
                }
                .into());
            }
            return Ok(literal);
        }

        if terminal.sort() == signature.name() && signature.constant(terminal.name()).is_some() {
            return Ok(Term::constant(terminal.name(), terminal.sort()));
        }
        Ok(terminal)
    }

    // ------------------------------------------------------------------------
    // Token checks
    // ------------------------------------------------------------------------

    fn expect(&mut self, kind: TokenKind) -> Result<Span> {
        match self.tokens.advance() {
            Some(token) if token.kind == kind => Ok(token.span),
            Some(token) => Err(unexpected(kind.describe(), token).into()),
            None => Err(ParseError::eof(kind.describe()).into()),
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<()> {
        let expected = format!("'{}'", keyword);
        match self.tokens.advance() {
            Some(Token {
                kind: TokenKind::Keyword(found),
                ..
            }) if found == keyword => Ok(()),
            Some(token) => Err(unexpected(&expected, token).into()),
            None => Err(ParseError::eof(expected).into()),
        }
    }

    fn expect_identifier(&mut self, what: &str) -> Result<String> {
        match self.tokens.advance() {
            Some(Token {
                kind: TokenKind::Identifier(name),
                ..
            }) => Ok(name),
            Some(token) => Err(unexpected(what, token).into()),
            None => Err(ParseError::eof(what).into()),
        }
    }

    fn expect_eof(&self) -> Result<()> {
        match self.tokens.current() {
            Some(token) => Err(unexpected("end of input", token.clone()).into()),
            None => Ok(()),
        }
    }
}

fn unexpected(expected: &str, token: Token) -> ParseError {
    ParseError::unexpected(expected, token.kind.to_string(), token.span)
}
