//! Unresolved type expressions
//!
//! A [`TypeRepr`] is the written form of a type as it appears in an
//! inheritance clause, annotation or requirement. Resolution into a
//! [`TypeId`](super::TypeId) happens later, in a declaration context.
//!
//! Grammar:
//!
//! ```text
//! type        := postfix ('&' postfix)*
//! postfix     := primary ('?' | '!')*
//! primary     := path | '[' type (':' type)? ']' | '(' elements ')' ('throws'? '->' type)?
//! path        := ident generic-args? ('.' ident generic-args?)*
//! elements    := (element (',' element)*)?
//! element     := (ident ':')? type
//! ```

use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRepr {
    /// `Name` or `Name<Args>`
    Named { name: String, args: Vec<TypeRepr> },
    /// `Base.Name`, used for nested and dependent member types
    Member { base: Box<TypeRepr>, name: String, args: Vec<TypeRepr> },
    Optional(Box<TypeRepr>),
    ImplicitlyUnwrapped(Box<TypeRepr>),
    Array(Box<TypeRepr>),
    Dictionary(Box<TypeRepr>, Box<TypeRepr>),
    Tuple(Vec<(Option<String>, TypeRepr)>),
    Function {
        params: Vec<(Option<String>, TypeRepr)>,
        result: Box<TypeRepr>,
        throws: bool,
    },
    Composition(Vec<TypeRepr>),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeReprError {
    #[error("unexpected end of type expression '{0}'")]
    UnexpectedEnd(String),
    #[error("unexpected '{found}' at offset {offset} in type expression '{text}'")]
    Unexpected {
        text: String,
        found: char,
        offset: usize,
    },
    #[error("empty type expression")]
    Empty,
}

impl TypeRepr {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRepr::Named {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn parse(text: &str) -> Result<TypeRepr, TypeReprError> {
        if text.trim().is_empty() {
            return Err(TypeReprError::Empty);
        }
        let mut parser = ReprParser {
            text,
            chars: text.char_indices().collect(),
            pos: 0,
        };
        let repr = parser.parse_type()?;
        parser.skip_ws();
        match parser.peek() {
            None => Ok(repr),
            Some(c) => Err(parser.unexpected(c)),
        }
    }

    /// The innermost written name, used to point diagnostics at a component
    pub fn head_name(&self) -> Option<&str> {
        match self {
            TypeRepr::Named { name, .. } | TypeRepr::Member { name, .. } => Some(name),
            TypeRepr::Optional(inner)
            | TypeRepr::ImplicitlyUnwrapped(inner)
            | TypeRepr::Array(inner) => inner.head_name(),
            _ => None,
        }
    }
}

impl fmt::Display for TypeRepr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn args(f: &mut fmt::Formatter<'_>, args: &[TypeRepr]) -> fmt::Result {
            if args.is_empty() {
                return Ok(());
            }
            write!(f, "<")?;
            for (i, a) in args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", a)?;
            }
            write!(f, ">")
        }
        fn elements(f: &mut fmt::Formatter<'_>, elts: &[(Option<String>, TypeRepr)]) -> fmt::Result {
            write!(f, "(")?;
            for (i, (label, ty)) in elts.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                if let Some(label) = label {
                    write!(f, "{}: ", label)?;
                }
                write!(f, "{}", ty)?;
            }
            write!(f, ")")
        }

        match self {
            TypeRepr::Named { name, args: a } => {
                write!(f, "{}", name)?;
                args(f, a)
            }
            TypeRepr::Member { base, name, args: a } => {
                write!(f, "{}.{}", base, name)?;
                args(f, a)
            }
            TypeRepr::Optional(inner) => write!(f, "{}?", inner),
            TypeRepr::ImplicitlyUnwrapped(inner) => write!(f, "{}!", inner),
            TypeRepr::Array(inner) => write!(f, "[{}]", inner),
            TypeRepr::Dictionary(k, v) => write!(f, "[{}: {}]", k, v),
            TypeRepr::Tuple(elts) => elements(f, elts),
            TypeRepr::Function {
                params,
                result,
                throws,
            } => {
                elements(f, params)?;
                if *throws {
                    write!(f, " throws")?;
                }
                write!(f, " -> {}", result)
            }
            TypeRepr::Composition(parts) => {
                for (i, p) in parts.iter().enumerate() {
                    if i > 0 {
                        write!(f, " & ")?;
                    }
                    write!(f, "{}", p)?;
                }
                Ok(())
            }
        }
    }
}

struct ReprParser<'a> {
    text: &'a str,
    chars: Vec<(usize, char)>,
    pos: usize,
}

impl ReprParser<'_> {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|(_, c)| *c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn unexpected(&self, found: char) -> TypeReprError {
        TypeReprError::Unexpected {
            text: self.text.to_string(),
            found,
            offset: self.chars.get(self.pos).map_or(self.text.len(), |(o, _)| *o),
        }
    }

    fn end(&self) -> TypeReprError {
        TypeReprError::UnexpectedEnd(self.text.to_string())
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_ws();
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), TypeReprError> {
        if self.eat(expected) {
            return Ok(());
        }
        match self.peek() {
            Some(c) => Err(self.unexpected(c)),
            None => Err(self.end()),
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        self.skip_ws();
        let save = self.pos;
        for expected in keyword.chars() {
            if self.peek() != Some(expected) {
                self.pos = save;
                return false;
            }
            self.pos += 1;
        }
        if self.peek().is_some_and(is_ident_char) {
            self.pos = save;
            return false;
        }
        true
    }

    fn eat_arrow(&mut self) -> bool {
        self.skip_ws();
        if self.peek() == Some('-') && self.chars.get(self.pos + 1).map(|(_, c)| *c) == Some('>') {
            self.pos += 2;
            true
        } else {
            false
        }
    }

    fn ident(&mut self) -> Result<String, TypeReprError> {
        self.skip_ws();
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if is_ident_char(c) {
                name.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
        if name.is_empty() {
            return match self.peek() {
                Some(c) => Err(self.unexpected(c)),
                None => Err(self.end()),
            };
        }
        Ok(name)
    }

    fn parse_type(&mut self) -> Result<TypeRepr, TypeReprError> {
        let first = self.parse_postfix()?;
        if !self.eat('&') {
            return Ok(first);
        }
        let mut parts = vec![first, self.parse_postfix()?];
        while self.eat('&') {
            parts.push(self.parse_postfix()?);
        }
        Ok(TypeRepr::Composition(parts))
    }

    fn parse_postfix(&mut self) -> Result<TypeRepr, TypeReprError> {
        let mut ty = self.parse_primary()?;
        loop {
            // no whitespace allowed before sugar
            match self.peek() {
                Some('?') => {
                    self.pos += 1;
                    ty = TypeRepr::Optional(Box::new(ty));
                }
                Some('!') => {
                    self.pos += 1;
                    ty = TypeRepr::ImplicitlyUnwrapped(Box::new(ty));
                }
                _ => return Ok(ty),
            }
        }
    }

    fn parse_generic_args(&mut self) -> Result<Vec<TypeRepr>, TypeReprError> {
        if !self.eat('<') {
            return Ok(Vec::new());
        }
        let mut args = vec![self.parse_type()?];
        while self.eat(',') {
            args.push(self.parse_type()?);
        }
        self.expect('>')?;
        Ok(args)
    }

    fn parse_primary(&mut self) -> Result<TypeRepr, TypeReprError> {
        self.skip_ws();
        match self.peek() {
            Some('[') => {
                self.pos += 1;
                let element = self.parse_type()?;
                let repr = if self.eat(':') {
                    let value = self.parse_type()?;
                    TypeRepr::Dictionary(Box::new(element), Box::new(value))
                } else {
                    TypeRepr::Array(Box::new(element))
                };
                self.expect(']')?;
                Ok(repr)
            }
            Some('(') => {
                self.pos += 1;
                let elements = self.parse_elements()?;
                let throws = self.eat_keyword("throws");
                if self.eat_arrow() {
                    let result = self.parse_type()?;
                    return Ok(TypeRepr::Function {
                        params: elements,
                        result: Box::new(result),
                        throws,
                    });
                }
                if throws {
                    return match self.peek() {
                        Some(c) => Err(self.unexpected(c)),
                        None => Err(self.end()),
                    };
                }
                // parenthesized single unlabeled type is just that type
                let mut elements = elements;
                if elements.len() == 1 && elements[0].0.is_none() {
                    return Ok(elements.remove(0).1);
                }
                Ok(TypeRepr::Tuple(elements))
            }
            Some(_) => {
                let name = self.ident()?;
                let args = self.parse_generic_args()?;
                let mut repr = TypeRepr::Named { name, args };
                while self.peek() == Some('.') {
                    self.pos += 1;
                    let name = self.ident()?;
                    let args = self.parse_generic_args()?;
                    repr = TypeRepr::Member {
                        base: Box::new(repr),
                        name,
                        args,
                    };
                }
                Ok(repr)
            }
            None => Err(self.end()),
        }
    }

    fn parse_elements(&mut self) -> Result<Vec<(Option<String>, TypeRepr)>, TypeReprError> {
        let mut elements = Vec::new();
        if self.eat(')') {
            return Ok(elements);
        }
        loop {
            elements.push(self.parse_element()?);
            if self.eat(')') {
                return Ok(elements);
            }
            self.expect(',')?;
        }
    }

    fn parse_element(&mut self) -> Result<(Option<String>, TypeRepr), TypeReprError> {
        self.skip_ws();
        let save = self.pos;
        if let Ok(label) = self.ident() {
            if self.eat(':') {
                let label = if label == "_" { None } else { Some(label) };
                return Ok((label, self.parse_type()?));
            }
        }
        self.pos = save;
        Ok((None, self.parse_type()?))
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
