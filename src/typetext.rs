//! Parser for the textual type notation.
//!
//! Hand-rolled recursive descent over the notation produced by
//! [`crate::stringify`], plus the common PHPDoc synonyms (`boolean`,
//! `integer`, `double`, `?T`, `T[]`, `array-key`, `scalar`). The docblock
//! layer feeds `@param`/`@return`/`@var` texts through here.
//!
//! Errors carry the byte position of the offending character.

use thiserror::Error;

use crate::ty::{CallableParameter, ShapeElement, ShapeKey, Type};
use crate::types;

/// A syntax error in a type text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at byte {position}")]
pub struct ParseError {
    pub position: usize,
    pub message: String,
}

/// Parse a complete type text. Trailing non-whitespace input is an error.
pub fn parse(text: &str) -> Result<Type, ParseError> {
    let mut parser = Parser {
        input: text,
        pos: 0,
    };
    let ty = parser.parse_type()?;
    parser.skip_ws();
    if parser.pos < parser.input.len() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(ty)
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            position: self.pos,
            message: message.into(),
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_ascii_whitespace() {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
    }

    /// Consume `c` if it is next (after whitespace).
    fn eat(&mut self, c: char) -> bool {
        self.skip_ws();
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char) -> Result<(), ParseError> {
        if self.eat(c) {
            Ok(())
        } else {
            Err(self.error(format!("expected `{c}`")))
        }
    }

    /// Consume `word` if it is the next full word.
    fn eat_word(&mut self, word: &str) -> bool {
        let saved = self.pos;
        self.skip_ws();
        if let Some(next) = self.lex_word() {
            if next == word {
                return true;
            }
        }
        self.pos = saved;
        false
    }

    /// Lex an identifier-like word: letters, digits, `_`, `\` namespace
    /// separators, and interior hyphens followed by a letter (so that
    /// `key-of` lexes whole while `1, -1` does not).
    fn lex_word(&mut self) -> Option<&'a str> {
        let start = self.pos;
        let bytes = self.input.as_bytes();
        let first = *bytes.get(self.pos)?;
        if !(first.is_ascii_alphabetic() || first == b'_' || first == b'\\') {
            return None;
        }
        while let Some(&b) = bytes.get(self.pos) {
            if b.is_ascii_alphanumeric() || b == b'_' || b == b'\\' {
                self.pos += 1;
            } else if b == b'-'
                && bytes
                    .get(self.pos + 1)
                    .is_some_and(|next| next.is_ascii_alphabetic())
            {
                self.pos += 1;
            } else {
                break;
            }
        }
        Some(&self.input[start..self.pos])
    }

    // ─── Grammar ────────────────────────────────────────────────────────

    /// type := intersection ('|' intersection)*
    fn parse_type(&mut self) -> Result<Type, ParseError> {
        let first = self.parse_intersection()?;
        if !self.eat('|') {
            return Ok(first);
        }
        let mut members = vec![first, self.parse_intersection()?];
        while self.eat('|') {
            members.push(self.parse_intersection()?);
        }
        Ok(Type::Union(members))
    }

    /// intersection := postfix ('&' postfix)*
    fn parse_intersection(&mut self) -> Result<Type, ParseError> {
        let first = self.parse_postfix()?;
        if !self.eat('&') {
            return Ok(first);
        }
        let mut members = vec![first, self.parse_postfix()?];
        while self.eat('&') {
            members.push(self.parse_postfix()?);
        }
        Ok(Type::Intersection(members))
    }

    /// postfix := atom ('[' type? ']')*
    ///
    /// Empty brackets are the PHPDoc `T[]` synonym for `array<T>`; a
    /// bracketed type is an offset access.
    fn parse_postfix(&mut self) -> Result<Type, ParseError> {
        let mut ty = self.parse_atom()?;
        while self.eat('[') {
            if self.eat(']') {
                ty = types::array_of_value(ty);
            } else {
                let offset = self.parse_type()?;
                self.expect(']')?;
                ty = types::offset(ty, offset);
            }
        }
        Ok(ty)
    }

    fn parse_atom(&mut self) -> Result<Type, ParseError> {
        self.skip_ws();
        match self.peek() {
            None => Err(self.error("expected a type")),
            Some('(') => self.parse_parenthesized(),
            Some('?') => {
                self.pos += 1;
                Ok(types::nullable(self.parse_postfix()?))
            }
            Some('\'') => self.parse_string_literal().map(Type::StringLiteral),
            Some(c) if c.is_ascii_digit() || c == '-' => self.parse_number(),
            _ => self.parse_word(),
        }
    }

    /// `( type )` or the conditional form `( subject is pattern ? then : otherwise )`.
    fn parse_parenthesized(&mut self) -> Result<Type, ParseError> {
        self.expect('(')?;
        let subject = self.parse_type()?;
        if self.eat_word("is") {
            let is = self.parse_type()?;
            self.expect('?')?;
            let then = self.parse_type()?;
            self.expect(':')?;
            let otherwise = self.parse_type()?;
            self.expect(')')?;
            return Ok(types::conditional(subject, is, then, otherwise));
        }
        self.expect(')')?;
        Ok(subject)
    }

    fn parse_string_literal(&mut self) -> Result<String, ParseError> {
        self.expect('\'')?;
        let mut value = String::new();
        loop {
            let Some(c) = self.peek() else {
                return Err(self.error("unterminated string literal"));
            };
            self.pos += c.len_utf8();
            match c {
                '\'' => return Ok(value),
                '\\' => {
                    let Some(escaped) = self.peek() else {
                        return Err(self.error("unterminated escape"));
                    };
                    self.pos += escaped.len_utf8();
                    match escaped {
                        '\\' => value.push('\\'),
                        '\'' => value.push('\''),
                        'n' => value.push('\n'),
                        'r' => value.push('\r'),
                        other => return Err(self.error(format!("unknown escape `\\{other}`"))),
                    }
                }
                other => value.push(other),
            }
        }
    }

    fn parse_number(&mut self) -> Result<Type, ParseError> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.pos += 1;
        }
        let digits_start = self.pos;
        let bytes = self.input.as_bytes();
        let mut is_float = false;
        while let Some(&b) = bytes.get(self.pos) {
            if b.is_ascii_digit() {
                self.pos += 1;
            } else if (b == b'.' || b == b'e' || b == b'E')
                && bytes.get(self.pos + 1).is_some_and(|next| {
                    next.is_ascii_digit() || *next == b'-' || *next == b'+'
                })
            {
                is_float = true;
                self.pos += 2;
            } else {
                break;
            }
        }
        if self.pos == digits_start {
            return Err(self.error("expected a number"));
        }
        let text = &self.input[start..self.pos];
        if is_float {
            let value: f64 = text
                .parse()
                .map_err(|_| self.error("invalid float literal"))?;
            Ok(types::float_literal(value))
        } else {
            let value: i64 = text
                .parse()
                .map_err(|_| self.error("invalid int literal"))?;
            Ok(types::int_literal(value))
        }
    }

    fn parse_word(&mut self) -> Result<Type, ParseError> {
        self.skip_ws();
        let word_start = self.pos;
        let Some(word) = self.lex_word() else {
            return Err(self.error("expected a type"));
        };
        match word {
            "never" => Ok(Type::Never),
            "void" => Ok(Type::Void),
            "null" => Ok(Type::Null),
            "true" => Ok(Type::True),
            "false" => Ok(Type::False),
            "bool" | "boolean" => Ok(Type::Bool),
            "int" | "integer" => self.parse_int(),
            "float" | "double" => Ok(Type::Float),
            "string" => Ok(Type::String),
            "numeric-string" => Ok(Type::NumericString),
            "non-empty-string" => Ok(Type::NonEmptyString),
            "mixed" => Ok(Type::Mixed),
            "resource" => Ok(Type::Resource),
            "scalar" => Ok(types::scalar()),
            "array-key" => Ok(types::array_key()),
            "array" => self.parse_array(),
            "non-empty-array" => Ok(types::non_empty(self.parse_array()?)),
            "list" => self.parse_list(),
            "non-empty-list" => Ok(types::non_empty(self.parse_list()?)),
            "iterable" => self.parse_iterable(),
            "object" => self.parse_object(),
            "callable" => self.parse_callable(false),
            "Closure" | "\\Closure" => self.parse_callable(true),
            "class-string" => {
                if self.eat('<') {
                    let object = self.parse_type()?;
                    self.expect('>')?;
                    Ok(types::class_string_of(object))
                } else {
                    Ok(types::class_string())
                }
            }
            "key-of" => {
                self.expect('<')?;
                let inner = self.parse_type()?;
                self.expect('>')?;
                Ok(types::key_of(inner))
            }
            "value-of" => {
                self.expect('<')?;
                let inner = self.parse_type()?;
                self.expect('>')?;
                Ok(types::value_of(inner))
            }
            "static" => Ok(types::static_(self.parse_arguments()?)),
            "self" => Ok(types::self_(self.parse_arguments()?)),
            "parent" => Ok(types::parent_(self.parse_arguments()?)),
            "covariant" => Ok(types::covariant(self.parse_postfix()?)),
            "contravariant" => Ok(types::contravariant(self.parse_postfix()?)),
            "bivariant" => Ok(types::variance_aware(
                crate::ty::Variance::Bivariant,
                self.parse_postfix()?,
            )),
            name => {
                if name.contains('-') {
                    self.pos = word_start;
                    return Err(self.error(format!("unknown type keyword `{name}`")));
                }
                self.parse_named(name)
            }
        }
    }

    /// `int`, or `int<bound, bound>` where a bound is an integer or the
    /// `min`/`max` keyword.
    fn parse_int(&mut self) -> Result<Type, ParseError> {
        if !self.eat('<') {
            return Ok(Type::Int);
        }
        let min = self.parse_bound("min")?;
        self.expect(',')?;
        let max = self.parse_bound("max")?;
        self.expect('>')?;
        Ok(types::int_range(min, max))
    }

    fn parse_bound(&mut self, unbounded: &str) -> Result<Option<i64>, ParseError> {
        self.skip_ws();
        if self.eat_word(unbounded) {
            return Ok(None);
        }
        match self.parse_number()? {
            Type::IntLiteral(value) => Ok(Some(value)),
            _ => Err(self.error("range bounds must be integers")),
        }
    }

    fn parse_array(&mut self) -> Result<Type, ParseError> {
        self.skip_ws();
        if self.peek() == Some('{') {
            let (elements, sealed) = self.parse_shape_body()?;
            return Ok(Type::ArrayShape { elements, sealed });
        }
        if !self.eat('<') {
            return Ok(types::array());
        }
        let first = self.parse_type()?;
        if self.eat(',') {
            let value = self.parse_type()?;
            self.expect('>')?;
            Ok(types::array_of(first, value))
        } else {
            self.expect('>')?;
            Ok(types::array_of_value(first))
        }
    }

    fn parse_list(&mut self) -> Result<Type, ParseError> {
        if !self.eat('<') {
            return Ok(types::list());
        }
        let value = self.parse_type()?;
        self.expect('>')?;
        Ok(types::list_of(value))
    }

    fn parse_iterable(&mut self) -> Result<Type, ParseError> {
        if !self.eat('<') {
            return Ok(types::iterable());
        }
        let first = self.parse_type()?;
        if self.eat(',') {
            let value = self.parse_type()?;
            self.expect('>')?;
            Ok(types::iterable_of(first, value))
        } else {
            self.expect('>')?;
            Ok(types::iterable_of(types::mixed(), first))
        }
    }

    fn parse_object(&mut self) -> Result<Type, ParseError> {
        self.skip_ws();
        if self.peek() == Some('{') {
            let (elements, sealed) = self.parse_shape_body()?;
            return Ok(Type::ObjectShape { elements, sealed });
        }
        Ok(Type::Object)
    }

    /// `{key: T, other?: U, ...}` — positional entries get sequential
    /// integer keys. A `...` entry unseals the shape and must come last.
    fn parse_shape_body(&mut self) -> Result<(Vec<(ShapeKey, ShapeElement)>, bool), ParseError> {
        self.expect('{')?;
        let mut elements = Vec::new();
        let mut sealed = true;
        if !self.eat('}') {
            loop {
                self.skip_ws();
                if self.rest().starts_with("...") {
                    self.pos += 3;
                    sealed = false;
                    self.expect('}')?;
                    break;
                }
                let (key, optional) = match self.try_shape_key()? {
                    Some(keyed) => keyed,
                    None => (ShapeKey::Int(elements.len() as i64), false),
                };
                let ty = self.parse_type()?;
                elements.push((key, ShapeElement { ty, optional }));
                if self.eat(',') {
                    continue;
                }
                self.expect('}')?;
                break;
            }
        }
        Ok((elements, sealed))
    }

    /// Lookahead for a `key:` / `key?:` prefix; restores the position when
    /// the entry turns out to be positional.
    fn try_shape_key(&mut self) -> Result<Option<(ShapeKey, bool)>, ParseError> {
        let saved = self.pos;
        self.skip_ws();
        let key = match self.peek() {
            Some('\'') => Some(ShapeKey::String(self.parse_string_literal()?)),
            Some(c) if c.is_ascii_digit() || c == '-' => match self.parse_number() {
                Ok(Type::IntLiteral(value)) => Some(ShapeKey::Int(value)),
                _ => None,
            },
            _ => self.lex_word().map(|word| ShapeKey::String(word.to_string())),
        };
        let Some(key) = key else {
            self.pos = saved;
            return Ok(None);
        };
        let optional = self.eat('?');
        if self.eat(':') {
            Ok(Some((key, optional)))
        } else {
            self.pos = saved;
            Ok(None)
        }
    }

    fn parse_callable(&mut self, closure: bool) -> Result<Type, ParseError> {
        let build: fn(Vec<CallableParameter>, Type) -> Type = if closure {
            types::closure_with
        } else {
            types::callable_with
        };
        self.skip_ws();
        if self.peek() != Some('(') {
            return Ok(if closure {
                types::closure()
            } else {
                types::callable()
            });
        }
        self.expect('(')?;
        let mut parameters = Vec::new();
        if !self.eat(')') {
            loop {
                let ty = self.parse_type()?;
                let mut parameter = CallableParameter::new(ty);
                self.skip_ws();
                if self.rest().starts_with("...") {
                    self.pos += 3;
                    parameter.variadic = true;
                } else if self.eat('=') {
                    parameter.has_default = true;
                }
                parameters.push(parameter);
                if self.eat(',') {
                    continue;
                }
                self.expect(')')?;
                break;
            }
        }
        let return_type = if self.eat(':') {
            self.parse_type()?
        } else {
            types::mixed()
        };
        Ok(build(parameters, return_type))
    }

    /// A class-like name: `Name<args>`, `Name::class`, `Name::CONST`, or a
    /// bare object reference.
    fn parse_named(&mut self, name: &str) -> Result<Type, ParseError> {
        self.skip_ws();
        if self.rest().starts_with("::") {
            self.pos += 2;
            if self.eat_word("class") {
                return Ok(types::class_string_literal(name));
            }
            let Some(constant) = self.lex_word() else {
                return Err(self.error("expected a constant name after `::`"));
            };
            return Ok(types::class_constant(name, constant));
        }
        Ok(Type::NamedObject {
            class: name.to_string(),
            arguments: self.parse_arguments()?,
        })
    }

    fn parse_arguments(&mut self) -> Result<Vec<Type>, ParseError> {
        if !self.eat('<') {
            return Ok(Vec::new());
        }
        let mut arguments = vec![self.parse_type()?];
        while self.eat(',') {
            arguments.push(self.parse_type()?);
        }
        self.expect('>')?;
        Ok(arguments)
    }
}
