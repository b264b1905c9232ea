//! Type-syntax scanner and recursive-descent parser.
//!
//! Grammar, loosest binding first:
//!
//! ```text
//! type         := intersection ('|' intersection)*
//! intersection := postfix ('&' postfix)*
//! postfix      := primary ('.' IDENT)*
//! primary      := NAME ('<' (type (',' type)*)? '>')?
//!               | '?' | STRING | NUMBER | 'null' | 'undefined'
//!               | '[' (IDENT '?'? ':' type),* ']'
//!               | '(' type ')'
//!               | '(' ('...'? IDENT ':' type),* ')' '=>' type
//!               | 'template' '(' ((IDENT | '@'IDENT) '?'? ':' type),* ')' '=>' type
//! ```
//!
//! The return type after `=>` extends as far as possible, so
//! `() => string|null` is a function returning a union.

use super::{
    FunctionParameterNode, LiteralTypeValue, RecordPropertyNode, TemplateParameterNode, TypeNode,
    TypeNodeKind,
};
use crate::types::{ParameterKind, attribute_to_param_name};
use soyc_common::diagnostics::diagnostic_messages;
use soyc_common::limits::MAX_TYPE_NESTING_DEPTH;
use soyc_common::{ErrorReporter, SourceLocation};
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq)]
enum Token {
    /// Identifier, possibly dotted (`foo.bar.Baz`).
    Name(String),
    /// `@attr-name`, without the `@`.
    AttributeName(String),
    Str(String),
    Number(String),
    LAngle,
    RAngle,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Colon,
    Question,
    Pipe,
    Amp,
    Dot,
    Arrow,
    Ellipsis,
    Eof,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Name(name) => name.clone(),
            Token::AttributeName(name) => format!("@{name}"),
            Token::Str(text) => format!("'{text}'"),
            Token::Number(text) => text.clone(),
            Token::LAngle => "<".to_string(),
            Token::RAngle => ">".to_string(),
            Token::LParen => "(".to_string(),
            Token::RParen => ")".to_string(),
            Token::LBracket => "[".to_string(),
            Token::RBracket => "]".to_string(),
            Token::Comma => ",".to_string(),
            Token::Colon => ":".to_string(),
            Token::Question => "?".to_string(),
            Token::Pipe => "|".to_string(),
            Token::Amp => "&".to_string(),
            Token::Dot => ".".to_string(),
            Token::Arrow => "=>".to_string(),
            Token::Ellipsis => "...".to_string(),
            Token::Eof => "end of input".to_string(),
        }
    }
}

#[derive(Clone, Debug)]
struct Spanned {
    token: Token,
    start: u32,
    end: u32,
}

enum ParseFailure {
    Syntax {
        expected: &'static str,
        found: String,
        start: u32,
        end: u32,
    },
    TooDeep {
        start: u32,
        end: u32,
    },
}

type ParseResult<T> = Result<T, ParseFailure>;

// =============================================================================
// Scanner
// =============================================================================

fn is_name_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || ch == '$'
}

fn is_name_part(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '$'
}

fn scan(text: &str) -> ParseResult<Vec<Spanned>> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let offset_at = |i: usize| -> u32 { chars.get(i).map_or(text.len(), |&(o, _)| o) as u32 };
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let (_, ch) = chars[i];
        if ch.is_whitespace() {
            i += 1;
            continue;
        }
        let start = i;
        let next = chars.get(i + 1).map(|&(_, c)| c);
        let after_next = chars.get(i + 2).map(|&(_, c)| c);

        let token = match ch {
            '<' => {
                i += 1;
                Token::LAngle
            }
            '>' => {
                i += 1;
                Token::RAngle
            }
            '(' => {
                i += 1;
                Token::LParen
            }
            ')' => {
                i += 1;
                Token::RParen
            }
            '[' => {
                i += 1;
                Token::LBracket
            }
            ']' => {
                i += 1;
                Token::RBracket
            }
            ',' => {
                i += 1;
                Token::Comma
            }
            ':' => {
                i += 1;
                Token::Colon
            }
            '?' => {
                i += 1;
                Token::Question
            }
            '|' => {
                i += 1;
                Token::Pipe
            }
            '&' => {
                i += 1;
                Token::Amp
            }
            '=' if next == Some('>') => {
                i += 2;
                Token::Arrow
            }
            '.' if next == Some('.') && after_next == Some('.') => {
                i += 3;
                Token::Ellipsis
            }
            '.' => {
                i += 1;
                Token::Dot
            }
            '@' if next.is_some_and(is_name_start) => {
                i += 1;
                let name_start = i;
                while chars.get(i).is_some_and(|&(_, c)| is_name_part(c) || c == '-') {
                    i += 1;
                }
                Token::AttributeName(chars[name_start..i].iter().map(|&(_, c)| c).collect())
            }
            '\'' | '"' => {
                let quote = ch;
                i += 1;
                let mut value = String::new();
                loop {
                    let Some(&(_, c)) = chars.get(i) else {
                        return Err(ParseFailure::Syntax {
                            expected: "a closing quote",
                            found: "end of input".to_string(),
                            start: offset_at(start),
                            end: offset_at(i),
                        });
                    };
                    i += 1;
                    if c == quote {
                        break;
                    }
                    if c != '\\' {
                        value.push(c);
                        continue;
                    }
                    let Some(&(_, escaped)) = chars.get(i) else {
                        continue;
                    };
                    i += 1;
                    value.push(match escaped {
                        'n' => '\n',
                        'r' => '\r',
                        't' => '\t',
                        other => other,
                    });
                }
                Token::Str(value)
            }
            c if c.is_ascii_digit() || (c == '-' && next.is_some_and(|d| d.is_ascii_digit())) => {
                i += 1;
                while chars
                    .get(i)
                    .is_some_and(|&(_, d)| d.is_ascii_digit() || d == '.')
                {
                    i += 1;
                }
                Token::Number(chars[start..i].iter().map(|&(_, c)| c).collect())
            }
            c if is_name_start(c) => {
                i += 1;
                loop {
                    while chars.get(i).is_some_and(|&(_, c)| is_name_part(c)) {
                        i += 1;
                    }
                    let dotted = chars.get(i).is_some_and(|&(_, c)| c == '.')
                        && chars.get(i + 1).is_some_and(|&(_, c)| is_name_start(c));
                    if !dotted {
                        break;
                    }
                    i += 1;
                }
                Token::Name(chars[start..i].iter().map(|&(_, c)| c).collect())
            }
            other => {
                return Err(ParseFailure::Syntax {
                    expected: "a type",
                    found: other.to_string(),
                    start: offset_at(start),
                    end: offset_at(start + 1),
                });
            }
        };
        tokens.push(Spanned {
            token,
            start: offset_at(start),
            end: offset_at(i),
        });
    }

    let end = text.len() as u32;
    tokens.push(Spanned {
        token: Token::Eof,
        start: end,
        end,
    });
    Ok(tokens)
}

// =============================================================================
// Parser
// =============================================================================

struct TypeParser {
    tokens: Vec<Spanned>,
    pos: usize,
    file: Option<Arc<str>>,
    depth: u32,
}

impl TypeParser {
    fn location(&self, start: u32, end: u32) -> SourceLocation {
        SourceLocation {
            file: self.file.clone(),
            start,
            end,
        }
    }

    fn peek(&self) -> &Token {
        &self.peek_at(0).token
    }

    fn peek_at(&self, k: usize) -> &Spanned {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + k).min(last)]
    }

    fn advance(&mut self) -> Spanned {
        let current = self.peek_at(0).clone();
        if current.token != Token::Eof {
            self.pos += 1;
        }
        current
    }

    fn previous_end(&self) -> u32 {
        self.pos
            .checked_sub(1)
            .map_or(0, |p| self.tokens[p].end)
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == token {
            self.advance();
            true
        } else {
            false
        }
    }

    fn error<T>(&self, expected: &'static str) -> ParseResult<T> {
        let current = self.peek_at(0);
        Err(ParseFailure::Syntax {
            expected,
            found: current.token.describe(),
            start: current.start,
            end: current.end,
        })
    }

    fn expect(&mut self, token: &Token, expected: &'static str) -> ParseResult<Spanned> {
        if self.peek() == token {
            Ok(self.advance())
        } else {
            self.error(expected)
        }
    }

    /// An undotted identifier and its location.
    fn simple_name(&mut self, expected: &'static str) -> ParseResult<(String, SourceLocation)> {
        match self.peek().clone() {
            Token::Name(name) if !name.contains('.') => {
                let token = self.advance();
                Ok((name, self.location(token.start, token.end)))
            }
            _ => self.error(expected),
        }
    }

    fn parse_root(&mut self) -> ParseResult<TypeNode> {
        let node = self.parse_type()?;
        if *self.peek() != Token::Eof {
            return self.error("end of type expression");
        }
        Ok(node)
    }

    fn parse_type(&mut self) -> ParseResult<TypeNode> {
        self.depth += 1;
        if self.depth > MAX_TYPE_NESTING_DEPTH {
            let current = self.peek_at(0);
            return Err(ParseFailure::TooDeep {
                start: current.start,
                end: current.end,
            });
        }
        let result = self.parse_union();
        self.depth -= 1;
        result
    }

    fn parse_union(&mut self) -> ParseResult<TypeNode> {
        let first = self.parse_intersection()?;
        if *self.peek() != Token::Pipe {
            return Ok(first);
        }
        let start = first.location.start;
        let mut candidates = vec![first];
        while self.eat(&Token::Pipe) {
            candidates.push(self.parse_intersection()?);
        }
        let location = self.location(start, self.previous_end());
        Ok(TypeNode::new(location, TypeNodeKind::Union(candidates)))
    }

    fn parse_intersection(&mut self) -> ParseResult<TypeNode> {
        let first = self.parse_postfix()?;
        if *self.peek() != Token::Amp {
            return Ok(first);
        }
        let start = first.location.start;
        let mut candidates = vec![first];
        while self.eat(&Token::Amp) {
            candidates.push(self.parse_postfix()?);
        }
        let location = self.location(start, self.previous_end());
        Ok(TypeNode::new(location, TypeNodeKind::Intersection(candidates)))
    }

    fn parse_postfix(&mut self) -> ParseResult<TypeNode> {
        let mut node = self.parse_primary()?;
        while self.eat(&Token::Dot) {
            let Token::Name(path) = self.peek().clone() else {
                return self.error("a property name");
            };
            let property = self.advance();
            for segment in path.split('.') {
                let location = self.location(node.location.start, property.end);
                node = TypeNode::new(
                    location,
                    TypeNodeKind::Indexed {
                        base: Box::new(node),
                        property: segment.to_string(),
                    },
                );
            }
        }
        Ok(node)
    }

    fn parse_primary(&mut self) -> ParseResult<TypeNode> {
        let start = self.peek_at(0).start;
        match self.peek().clone() {
            Token::Name(name) => {
                if name == "template" && self.peek_at(1).token == Token::LParen {
                    return self.parse_template();
                }
                let token = self.advance();
                let literal = match name.as_str() {
                    "null" => Some(LiteralTypeValue::Null),
                    "undefined" => Some(LiteralTypeValue::Undefined),
                    "true" | "false" => Some(LiteralTypeValue::Other(name.clone())),
                    _ => None,
                };
                if let Some(value) = literal {
                    let location = self.location(token.start, token.end);
                    return Ok(TypeNode::new(location, TypeNodeKind::Literal(value)));
                }
                if !self.eat(&Token::LAngle) {
                    let location = self.location(token.start, token.end);
                    return Ok(TypeNode::new(location, TypeNodeKind::Named(name)));
                }
                let mut arguments = Vec::new();
                if *self.peek() != Token::RAngle {
                    arguments.push(self.parse_type()?);
                    while self.eat(&Token::Comma) {
                        arguments.push(self.parse_type()?);
                    }
                }
                let close = self.expect(&Token::RAngle, "'>' or ','")?;
                let location = self.location(start, close.end);
                Ok(TypeNode::new(location, TypeNodeKind::Generic { name, arguments }))
            }
            Token::Question => {
                let token = self.advance();
                let location = self.location(token.start, token.end);
                Ok(TypeNode::new(location, TypeNodeKind::Named("?".to_string())))
            }
            Token::Str(value) => {
                let token = self.advance();
                let location = self.location(token.start, token.end);
                Ok(TypeNode::new(
                    location,
                    TypeNodeKind::Literal(LiteralTypeValue::String(value)),
                ))
            }
            Token::Number(text) => {
                let token = self.advance();
                let location = self.location(token.start, token.end);
                Ok(TypeNode::new(
                    location,
                    TypeNodeKind::Literal(LiteralTypeValue::Other(text)),
                ))
            }
            Token::LBracket => self.parse_record(),
            Token::LParen => {
                if self.is_function_start() {
                    return self.parse_function();
                }
                self.advance();
                let inner = self.parse_type()?;
                self.expect(&Token::RParen, "')'")?;
                Ok(inner)
            }
            _ => self.error("a type"),
        }
    }

    fn is_function_start(&self) -> bool {
        match &self.peek_at(1).token {
            Token::RParen | Token::Ellipsis => true,
            Token::Name(name) => !name.contains('.') && self.peek_at(2).token == Token::Colon,
            _ => false,
        }
    }

    fn parse_record(&mut self) -> ParseResult<TypeNode> {
        let open = self.expect(&Token::LBracket, "'['")?;
        let mut properties = Vec::new();
        while *self.peek() != Token::RBracket {
            let (name, name_location) = self.simple_name("a record field name")?;
            let optional = self.eat(&Token::Question);
            self.expect(&Token::Colon, "':'")?;
            let type_node = self.parse_type()?;
            properties.push(RecordPropertyNode {
                name,
                name_location,
                optional,
                type_node,
            });
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        let close = self.expect(&Token::RBracket, "']' or ','")?;
        let location = self.location(open.start, close.end);
        Ok(TypeNode::new(location, TypeNodeKind::Record(properties)))
    }

    fn parse_function(&mut self) -> ParseResult<TypeNode> {
        let open = self.expect(&Token::LParen, "'('")?;
        let mut parameters = Vec::new();
        while *self.peek() != Token::RParen {
            let is_var_args = self.eat(&Token::Ellipsis);
            let (name, name_location) = self.simple_name("a parameter name")?;
            self.expect(&Token::Colon, "':'")?;
            let type_node = self.parse_type()?;
            parameters.push(FunctionParameterNode {
                source_name: name.clone(),
                name,
                name_location,
                type_node,
                is_var_args,
            });
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        self.expect(&Token::RParen, "')' or ','")?;
        self.expect(&Token::Arrow, "'=>'")?;
        let return_type = self.parse_type()?;
        let location = self.location(open.start, return_type.location.end);
        Ok(TypeNode::new(
            location,
            TypeNodeKind::Function {
                parameters,
                return_type: Box::new(return_type),
            },
        ))
    }

    fn parse_template(&mut self) -> ParseResult<TypeNode> {
        let keyword = self.advance();
        self.expect(&Token::LParen, "'('")?;
        let mut parameters = Vec::new();
        while *self.peek() != Token::RParen {
            let (name, source_name, kind) = match self.peek().clone() {
                Token::Name(name) if !name.contains('.') => {
                    (name.clone(), name, ParameterKind::Param)
                }
                Token::AttributeName(attribute) => (
                    attribute_to_param_name(&attribute),
                    format!("@{attribute}"),
                    ParameterKind::Attribute,
                ),
                _ => return self.error("a parameter name"),
            };
            let name_token = self.advance();
            let required = !self.eat(&Token::Question);
            self.expect(&Token::Colon, "':'")?;
            let type_node = self.parse_type()?;
            parameters.push(TemplateParameterNode {
                name,
                source_name,
                name_location: self.location(name_token.start, name_token.end),
                kind,
                type_node,
                required,
            });
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        self.expect(&Token::RParen, "')' or ','")?;
        self.expect(&Token::Arrow, "'=>'")?;
        let return_type = self.parse_type()?;
        let location = self.location(keyword.start, return_type.location.end);
        Ok(TypeNode::new(
            location,
            TypeNodeKind::Template {
                parameters,
                return_type: Box::new(return_type),
            },
        ))
    }
}

/// Parse a standalone type expression.
///
/// Syntax errors are reported to `reporter` and yield `None`.
pub fn parse_type(text: &str, reporter: &mut ErrorReporter) -> Option<TypeNode> {
    parse_type_in_file(text, None, reporter)
}

/// Parse a type expression whose locations belong to `file`.
pub fn parse_type_in_file(
    text: &str,
    file: Option<Arc<str>>,
    reporter: &mut ErrorReporter,
) -> Option<TypeNode> {
    let result = scan(text).and_then(|tokens| {
        let mut parser = TypeParser {
            tokens,
            pos: 0,
            file: file.clone(),
            depth: 0,
        };
        parser.parse_root()
    });

    match result {
        Ok(node) => Some(node),
        Err(ParseFailure::Syntax {
            expected,
            found,
            start,
            end,
        }) => {
            let location = SourceLocation { file, start, end };
            reporter.report(
                &location,
                &diagnostic_messages::TYPE_SYNTAX_ERROR,
                &[expected, found.as_str()],
            );
            None
        }
        Err(ParseFailure::TooDeep { start, end }) => {
            let location = SourceLocation { file, start, end };
            let limit = MAX_TYPE_NESTING_DEPTH.to_string();
            reporter.report(&location, &diagnostic_messages::TYPE_TOO_DEEP, &[limit.as_str()]);
            None
        }
    }
}
