//! Typed setting values and their canonical text form.
//!
//! The text form is the subset of the GVariant text format that `gsettings get`
//! prints and `dconf dump` writes:
//!
//! ```text
//! value     := bool | typed-num | number | string | list
//! bool      := "true" | "false"
//! typed-num := ("int32" | "uint32" | "int64" | "uint64" | "double") WS number
//! number    := int32 | double
//! int32     := ["-"|"+"] digits
//! double    := digits with "." or exponent | "inf" | "-inf" | "nan"
//! string    := "'" chars "'" | '"' chars '"'
//! list      := ["@as" | "@ai"] WS "[" [value ("," value)*] "]"
//! ```
//!
//! Lists must be homogeneous (all strings or all int32). A bare `[]` is an empty
//! string list. [`TypedValue`]'s `Display` output is canonical: parsing it yields
//! the same value again, NaN excepted.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter, Write as _};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Ungültiger Wert an Position {position}: {reason}")]
pub struct TypedValueParseError {
    pub position: usize,
    pub reason: String,
}

/// A value stored under a settings key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypedValue {
    Boolean(bool),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Double(f64),
    String(String),
    StringList(Vec<String>),
    Int32List(Vec<i32>),
}

impl TypedValue {
    /// GVariant type string of this value.
    pub fn type_tag(&self) -> &'static str {
        match self {
            TypedValue::Boolean(_) => "b",
            TypedValue::Int32(_) => "i",
            TypedValue::UInt32(_) => "u",
            TypedValue::Int64(_) => "x",
            TypedValue::UInt64(_) => "t",
            TypedValue::Double(_) => "d",
            TypedValue::String(_) => "s",
            TypedValue::StringList(_) => "as",
            TypedValue::Int32List(_) => "ai",
        }
    }

    /// Canonical text form; same as `to_string()`.
    pub fn encode(&self) -> String {
        self.to_string()
    }

    pub fn decode(text: &str) -> Result<Self, TypedValueParseError> {
        text.parse()
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TypedValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedValue::String(s) => Some(s),
            _ => None,
        }
    }
}

fn write_quoted(f: &mut Formatter<'_>, s: &str) -> fmt::Result {
    f.write_char('\'')?;
    for c in s.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '\'' => f.write_str("\\'")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            '\u{0c}' => f.write_str("\\f")?,
            '\u{08}' => f.write_str("\\b")?,
            '\u{0b}' => f.write_str("\\v")?,
            '\u{07}' => f.write_str("\\a")?,
            c if c.is_control() => write!(f, "\\u{:04x}", c as u32)?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('\'')
}

fn write_double(f: &mut Formatter<'_>, d: f64) -> fmt::Result {
    if d.is_nan() {
        f.write_str("nan")
    } else if d.is_infinite() {
        f.write_str(if d > 0.0 { "inf" } else { "-inf" })
    } else {
        // Debug keeps a '.' or exponent, so the text never reads back as int32.
        write!(f, "{:?}", d)
    }
}

impl Display for TypedValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Boolean(b) => write!(f, "{}", b),
            TypedValue::Int32(i) => write!(f, "{}", i),
            TypedValue::UInt32(u) => write!(f, "uint32 {}", u),
            TypedValue::Int64(x) => write!(f, "int64 {}", x),
            TypedValue::UInt64(t) => write!(f, "uint64 {}", t),
            TypedValue::Double(d) => write_double(f, *d),
            TypedValue::String(s) => write_quoted(f, s),
            TypedValue::StringList(items) if items.is_empty() => f.write_str("@as []"),
            TypedValue::StringList(items) => {
                f.write_char('[')?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_quoted(f, item)?;
                }
                f.write_char(']')
            }
            TypedValue::Int32List(items) if items.is_empty() => f.write_str("@ai []"),
            TypedValue::Int32List(items) => {
                f.write_char('[')?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_char(']')
            }
        }
    }
}

impl FromStr for TypedValue {
    type Err = TypedValueParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser { src: s, pos: 0 };
        let value = parser.parse_value()?;
        parser.skip_ws();
        if parser.pos < s.len() {
            return Err(parser.error("unerwartete Zeichen nach dem Wert"));
        }
        Ok(value)
    }
}

/// Parses the canonical text form. An owned string is therefore never wrapped as
/// [`TypedValue::String`] implicitly; use the variant or `From<&str>` for that.
impl TryFrom<String> for TypedValue {
    type Error = TypedValueParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TypedValue> for String {
    fn from(value: TypedValue) -> Self {
        value.to_string()
    }
}

impl From<bool> for TypedValue {
    fn from(value: bool) -> Self {
        TypedValue::Boolean(value)
    }
}

impl From<i32> for TypedValue {
    fn from(value: i32) -> Self {
        TypedValue::Int32(value)
    }
}

impl From<&str> for TypedValue {
    fn from(value: &str) -> Self {
        TypedValue::String(value.to_string())
    }
}

impl From<Vec<String>> for TypedValue {
    fn from(value: Vec<String>) -> Self {
        TypedValue::StringList(value)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Strings,
    Ints,
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn error(&self, reason: impl Into<String>) -> TypedValueParseError {
        TypedValueParseError { position: self.pos, reason: reason.into() }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let src = self.src;
        let start = self.pos;
        while matches!(self.peek(), Some(c) if pred(c)) {
            self.bump();
        }
        &src[start..self.pos]
    }

    fn expect(&mut self, expected: char) -> Result<(), TypedValueParseError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(self.error(format!("'{}' erwartet, '{}' gefunden", expected, c))),
            None => Err(self.error(format!("'{}' erwartet, Ende erreicht", expected))),
        }
    }

    fn parse_value(&mut self) -> Result<TypedValue, TypedValueParseError> {
        self.skip_ws();
        match self.peek() {
            None => Err(self.error("leere Eingabe")),
            Some('\'') | Some('"') => self.parse_string().map(TypedValue::String),
            Some('[') => self.parse_list(None),
            Some('@') => self.parse_annotated_list(),
            Some(c) if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => self.parse_bare_number(),
            Some(c) if c.is_ascii_alphabetic() => self.parse_word(),
            Some(c) => Err(self.error(format!("unerwartetes Zeichen '{}'", c))),
        }
    }

    fn parse_word(&mut self) -> Result<TypedValue, TypedValueParseError> {
        let start = self.pos;
        let word = self.take_while(|c| c.is_ascii_alphanumeric());
        match word {
            "true" => Ok(TypedValue::Boolean(true)),
            "false" => Ok(TypedValue::Boolean(false)),
            "inf" => Ok(TypedValue::Double(f64::INFINITY)),
            "nan" => Ok(TypedValue::Double(f64::NAN)),
            "int32" | "uint32" | "int64" | "uint64" | "double" => {
                self.skip_ws();
                let token = self.number_token();
                let value = match word {
                    "int32" => token.parse().map(TypedValue::Int32).ok(),
                    "uint32" => token.parse().map(TypedValue::UInt32).ok(),
                    "int64" => token.parse().map(TypedValue::Int64).ok(),
                    "uint64" => token.parse().map(TypedValue::UInt64).ok(),
                    _ => parse_double(token).map(TypedValue::Double),
                };
                value.ok_or_else(|| self.error(format!("'{}' ist keine gültige {}-Zahl", token, word)))
            }
            _ => {
                self.pos = start;
                Err(self.error(format!("unbekanntes Schlüsselwort '{}'", word)))
            }
        }
    }

    fn number_token(&mut self) -> &'a str {
        self.take_while(|c| c.is_ascii_alphanumeric() || c == '-' || c == '+' || c == '.')
    }

    fn parse_bare_number(&mut self) -> Result<TypedValue, TypedValueParseError> {
        let start = self.pos;
        let token = self.number_token();
        let is_double = matches!(token, "inf" | "-inf" | "+inf" | "nan")
            || token.contains('.')
            || token.contains(['e', 'E']);
        let value = if is_double {
            parse_double(token).map(TypedValue::Double)
        } else {
            token.parse().ok().map(TypedValue::Int32)
        };
        value.ok_or_else(|| TypedValueParseError {
            position: start,
            reason: format!("'{}' ist keine gültige Zahl", token),
        })
    }

    fn parse_string(&mut self) -> Result<String, TypedValueParseError> {
        let quote = self.bump().ok_or_else(|| self.error("Anführungszeichen erwartet"))?;
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error("nicht abgeschlossene Zeichenkette")),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => {
                    let escaped = self.bump().ok_or_else(|| self.error("unvollständige Escape-Sequenz"))?;
                    match escaped {
                        'n' => out.push('\n'),
                        't' => out.push('\t'),
                        'r' => out.push('\r'),
                        'f' => out.push('\u{0c}'),
                        'b' => out.push('\u{08}'),
                        'v' => out.push('\u{0b}'),
                        'a' => out.push('\u{07}'),
                        'u' => out.push(self.parse_unicode_escape(4)?),
                        'U' => out.push(self.parse_unicode_escape(8)?),
                        other => out.push(other),
                    }
                }
                Some(c) => out.push(c),
            }
        }
    }

    fn parse_unicode_escape(&mut self, digits: usize) -> Result<char, TypedValueParseError> {
        let src = self.src;
        let end = self.pos + digits;
        let hex = src
            .get(self.pos..end)
            .ok_or_else(|| self.error("unvollständige Unicode-Escape-Sequenz"))?;
        let c = u32::from_str_radix(hex, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| self.error(format!("ungültige Unicode-Escape-Sequenz '{}'", hex)))?;
        self.pos = end;
        Ok(c)
    }

    fn parse_annotated_list(&mut self) -> Result<TypedValue, TypedValueParseError> {
        self.expect('@')?;
        let annotation = self.take_while(|c| c.is_ascii_alphanumeric());
        let kind = match annotation {
            "as" => ListKind::Strings,
            "ai" => ListKind::Ints,
            other => return Err(self.error(format!("nicht unterstützter Typ '@{}'", other))),
        };
        self.skip_ws();
        self.parse_list(Some(kind))
    }

    fn parse_list(&mut self, annotated: Option<ListKind>) -> Result<TypedValue, TypedValueParseError> {
        self.expect('[')?;
        let mut strings = Vec::new();
        let mut ints = Vec::new();
        let mut kind = annotated;

        self.skip_ws();
        if self.peek() == Some(']') {
            self.bump();
        } else {
            loop {
                self.skip_ws();
                let element_pos = self.pos;
                let element = self.parse_value()?;
                let element_kind = match &element {
                    TypedValue::String(_) => ListKind::Strings,
                    TypedValue::Int32(_) => ListKind::Ints,
                    other => {
                        return Err(TypedValueParseError {
                            position: element_pos,
                            reason: format!("Listenelement vom Typ '{}' wird nicht unterstützt", other.type_tag()),
                        });
                    }
                };
                if kind.is_some_and(|k| k != element_kind) {
                    return Err(TypedValueParseError {
                        position: element_pos,
                        reason: "Liste ist nicht homogen".to_string(),
                    });
                }
                kind = Some(element_kind);
                match element {
                    TypedValue::String(s) => strings.push(s),
                    TypedValue::Int32(i) => ints.push(i),
                    _ => {}
                }

                self.skip_ws();
                match self.bump() {
                    Some(',') => continue,
                    Some(']') => break,
                    _ => return Err(self.error("',' oder ']' erwartet")),
                }
            }
        }

        Ok(match kind {
            Some(ListKind::Ints) => TypedValue::Int32List(ints),
            Some(ListKind::Strings) | None => TypedValue::StringList(strings),
        })
    }
}

fn parse_double(token: &str) -> Option<f64> {
    match token {
        "inf" | "+inf" => Some(f64::INFINITY),
        "-inf" => Some(f64::NEG_INFINITY),
        "nan" => Some(f64::NAN),
        _ => token.parse().ok(),
    }
}
