//! Parser for OpenStep-style ASCII property lists.
//!
//! This is the format Xcode uses for `project.pbxproj`: dictionaries are
//! `{ key = value; }`, arrays are `( a, b, )`, strings are either bare words
//! or double-quoted with C-like escapes, and `<hex>` is raw data. Comments in
//! both C styles may appear anywhere between tokens.
//!
//! Every scalar is read as a string (the format has no numbers or booleans),
//! so the result is a tree of `plist::Value::{Dictionary, Array, String, Data}`.

use miette::{Diagnostic as MietteDiagnostic, NamedSource, SourceSpan};
use plist::{Dictionary, Value};
use thiserror::Error;

/// A syntax error with the offending location in the source document.
#[derive(Debug, Error, MietteDiagnostic)]
#[error("{message}")]
#[diagnostic(
    code(cosigner::pbxproj::syntax),
    help("The project file is not a valid property list; check for merge conflict markers or a truncated file")
)]
pub struct ParseError {
    message: String,
    #[source_code]
    src: NamedSource<String>,
    #[label("here")]
    span: SourceSpan,
    offset: usize,
    line: usize,
    column: usize,
}

impl ParseError {
    fn new(source: &str, name: &str, offset: usize, message: impl Into<String>) -> Self {
        let offset = offset.min(source.len());
        let before = &source[..offset];
        let line = before.matches('\n').count() + 1;
        let column = before.rfind('\n').map_or(offset, |nl| offset - nl - 1) + 1;
        let len = source[offset..].chars().next().map_or(0, char::len_utf8);

        ParseError {
            message: message.into(),
            src: NamedSource::new(name, source.to_string()),
            span: (offset, len).into(),
            offset,
            line,
            column,
        }
    }

    /// Human-readable message without location.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Byte offset of the error in the source.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// 1-based line number of the error.
    pub fn line(&self) -> usize {
        self.line
    }

    /// 1-based column (in bytes) of the error.
    pub fn column(&self) -> usize {
        self.column
    }
}

/// Parse a complete ASCII property list document.
///
/// `name` is only used for diagnostics (usually the file path).
pub fn parse(source: &str, name: &str) -> Result<Value, ParseError> {
    let mut parser = Parser::new(source, name);
    let value = parser.parse_value()?;
    parser.skip_trivia()?;
    if parser.pos < source.len() {
        return Err(parser.error("unexpected content after the end of the document"));
    }
    Ok(value)
}

/// Characters allowed in an unquoted string.
pub(crate) fn is_bare_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '/' | ':' | '.' | '-' | '+')
}

struct Parser<'a> {
    src: &'a str,
    name: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str, name: &'a str) -> Self {
        let pos = if src.starts_with('\u{feff}') { 3 } else { 0 };
        Parser { src, name, pos }
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(self.src, self.name, self.pos, message)
    }

    fn error_at(&self, offset: usize, message: impl Into<String>) -> ParseError {
        ParseError::new(self.src, self.name, offset, message)
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Skip whitespace and comments.
    fn skip_trivia(&mut self) -> Result<(), ParseError> {
        loop {
            let rest = self.rest();
            if rest.starts_with("/*") {
                let start = self.pos;
                match rest[2..].find("*/") {
                    Some(end) => self.pos += 2 + end + 2,
                    None => return Err(self.error_at(start, "unterminated comment")),
                }
            } else if rest.starts_with("//") {
                match rest.find('\n') {
                    Some(end) => self.pos += end + 1,
                    None => self.pos = self.src.len(),
                }
            } else if let Some(c) = self.peek().filter(|c| c.is_whitespace()) {
                self.pos += c.len_utf8();
            } else {
                return Ok(());
            }
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        self.skip_trivia()?;
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += c.len_utf8();
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected `{}`, found `{}`", expected, c))),
            None => Err(self.error(format!("expected `{}`, found end of file", expected))),
        }
    }

    fn parse_value(&mut self) -> Result<Value, ParseError> {
        self.skip_trivia()?;
        match self.peek() {
            Some('{') => self.parse_dictionary().map(Value::Dictionary),
            Some('(') => self.parse_array().map(Value::Array),
            Some('<') => self.parse_data().map(Value::Data),
            Some(_) => self.parse_string().map(Value::String),
            None => Err(self.error("expected a value, found end of file")),
        }
    }

    fn parse_dictionary(&mut self) -> Result<Dictionary, ParseError> {
        let open = self.pos;
        self.expect('{')?;
        let mut dict = Dictionary::new();

        loop {
            self.skip_trivia()?;
            match self.peek() {
                Some('}') => {
                    self.pos += 1;
                    return Ok(dict);
                }
                None => return Err(self.error_at(open, "unterminated dictionary")),
                _ => {}
            }

            let key = self.parse_string()?;
            self.expect('=')?;
            let value = self.parse_value()?;
            self.expect(';')?;
            dict.insert(key, value);
        }
    }

    fn parse_array(&mut self) -> Result<Vec<Value>, ParseError> {
        let open = self.pos;
        self.expect('(')?;
        let mut items = Vec::new();

        loop {
            self.skip_trivia()?;
            match self.peek() {
                Some(')') => {
                    self.pos += 1;
                    return Ok(items);
                }
                None => return Err(self.error_at(open, "unterminated array")),
                _ => {}
            }

            items.push(self.parse_value()?);

            self.skip_trivia()?;
            match self.peek() {
                Some(',') => self.pos += 1,
                Some(')') => {}
                Some(c) => return Err(self.error(format!("expected `,` or `)`, found `{}`", c))),
                None => return Err(self.error_at(open, "unterminated array")),
            }
        }
    }

    fn parse_data(&mut self) -> Result<Vec<u8>, ParseError> {
        let open = self.pos;
        self.expect('<')?;
        let mut bytes = Vec::new();
        let mut high: Option<u8> = None;

        loop {
            let c = match self.bump() {
                Some(c) => c,
                None => return Err(self.error_at(open, "unterminated data")),
            };
            if c == '>' {
                break;
            }
            if c.is_whitespace() {
                continue;
            }
            let nibble = match c.to_digit(16) {
                Some(n) => n as u8,
                None => {
                    return Err(self.error_at(
                        self.pos - c.len_utf8(),
                        format!("invalid character `{}` in data", c),
                    ))
                }
            };
            match high.take() {
                Some(h) => bytes.push((h << 4) | nibble),
                None => high = Some(nibble),
            }
        }

        if high.is_some() {
            return Err(self.error_at(open, "data has an odd number of hex digits"));
        }
        Ok(bytes)
    }

    fn parse_string(&mut self) -> Result<String, ParseError> {
        self.skip_trivia()?;
        match self.peek() {
            Some(q @ ('"' | '\'')) => {
                self.pos += 1;
                self.parse_quoted(q)
            }
            Some(c) if is_bare_char(c) => {
                let start = self.pos;
                while self.peek().is_some_and(is_bare_char) && !self.at_comment() {
                    self.pos += 1;
                }
                Ok(self.src[start..self.pos].to_string())
            }
            Some(c) => Err(self.error(format!("unexpected character `{}`", c))),
            None => Err(self.error("expected a string, found end of file")),
        }
    }

    fn parse_quoted(&mut self, quote: char) -> Result<String, ParseError> {
        let open = self.pos - 1;
        let mut out = String::new();

        loop {
            let c = match self.bump() {
                Some(c) => c,
                None => return Err(self.error_at(open, "unterminated string")),
            };
            if c == quote {
                return Ok(out);
            }
            if c != '\\' {
                out.push(c);
                continue;
            }

            let escape_start = self.pos - 1;
            let e = match self.bump() {
                Some(e) => e,
                None => return Err(self.error_at(open, "unterminated string")),
            };
            match e {
                'a' => out.push('\u{07}'),
                'b' => out.push('\u{08}'),
                'f' => out.push('\u{0c}'),
                'n' => out.push('\n'),
                'r' => out.push('\r'),
                't' => out.push('\t'),
                'v' => out.push('\u{0b}'),
                'U' | 'u' => match self.take_unicode_escape() {
                    Some(ch) => out.push(ch),
                    None => {
                        return Err(self.error_at(escape_start, "invalid unicode escape"));
                    }
                },
                '0'..='7' => {
                    self.pos -= 1;
                    let code = self.take_digits(3, 8).unwrap_or(0);
                    out.push(char::from_u32(code).unwrap_or('\u{fffd}'));
                }
                other => out.push(other),
            }
        }
    }

    /// Whether a comment starts at the current position.
    fn at_comment(&self) -> bool {
        let rest = self.rest();
        rest.starts_with("/*") || rest.starts_with("//")
    }

    /// The digits of a `\U` escape, joining a UTF-16 surrogate pair
    /// spelled as two consecutive escapes.
    fn take_unicode_escape(&mut self) -> Option<char> {
        let high = self.take_digits(4, 16)?;
        if !(0xD800..0xDC00).contains(&high) {
            return char::from_u32(high);
        }

        let rest = self.rest();
        if !(rest.starts_with("\\U") || rest.starts_with("\\u")) {
            return None;
        }
        self.pos += 2;
        let low = self.take_digits(4, 16)?;
        if !(0xDC00..0xE000).contains(&low) {
            return None;
        }
        char::from_u32(0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00))
    }

    /// Consume up to `max` digits in `radix`; `None` if there were none.
    fn take_digits(&mut self, max: usize, radix: u32) -> Option<u32> {
        let mut value = 0u32;
        let mut count = 0;
        while count < max {
            match self.peek().and_then(|c| c.to_digit(radix)) {
                Some(d) => {
                    value = value * radix + d;
                    self.pos += 1;
                    count += 1;
                }
                None => break,
            }
        }
        (count > 0).then_some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(src: &str) -> Value {
        parse(src, "test.pbxproj").unwrap()
    }

    #[test]
    fn test_parse_nested_structure() {
        let value = parse_ok(
            r#"// !$*UTF8*$!
{
	archiveVersion = 1;
	objects = {
		ABC /* App */ = {
			isa = PBXNativeTarget;
			buildPhases = (
				DEF /* Sources */,
				GHI,
			);
			name = App;
		};
	};
}
"#,
        );

        let root = value.as_dictionary().unwrap();
        assert_eq!(root.get("archiveVersion").unwrap().as_string(), Some("1"));

        let target = root
            .get("objects")
            .and_then(Value::as_dictionary)
            .and_then(|o| o.get("ABC"))
            .and_then(Value::as_dictionary)
            .unwrap();
        assert_eq!(target.get("isa").unwrap().as_string(), Some("PBXNativeTarget"));

        let phases = target.get("buildPhases").unwrap().as_array().unwrap();
        assert_eq!(phases.len(), 2);
        assert_eq!(phases[0].as_string(), Some("DEF"));
        assert_eq!(phases[1].as_string(), Some("GHI"));
    }

    #[test]
    fn test_parse_quoted_escapes() {
        let value = parse_ok(r#"{ a = "line\nnext"; b = "say \"hi\""; c = "\U00e9t\351"; d = 'single'; }"#);
        let dict = value.as_dictionary().unwrap();
        assert_eq!(dict.get("a").unwrap().as_string(), Some("line\nnext"));
        assert_eq!(dict.get("b").unwrap().as_string(), Some("say \"hi\""));
        assert_eq!(dict.get("c").unwrap().as_string(), Some("\u{e9}t\u{e9}"));
        assert_eq!(dict.get("d").unwrap().as_string(), Some("single"));
    }

    #[test]
    fn test_parse_surrogate_pair_escape() {
        let value = parse_ok(r#"{ a = "\UD83D\UDE00 ok"; }"#);
        let dict = value.as_dictionary().unwrap();
        assert_eq!(dict.get("a").unwrap().as_string(), Some("\u{1F600} ok"));
    }

    #[test]
    fn test_parse_lone_surrogate_is_rejected() {
        let err = parse(r#"{ a = "\UD83D"; }"#, "bad.pbxproj").unwrap_err();
        assert!(err.message().contains("invalid unicode escape"));

        let err = parse(r#"{ a = "\UDE00"; }"#, "bad.pbxproj").unwrap_err();
        assert!(err.message().contains("invalid unicode escape"));
    }

    #[test]
    fn test_parse_bare_string_before_comment() {
        let value = parse_ok("{ a = b/* c */; d = e// f\n; g = path/to/file; }");
        let dict = value.as_dictionary().unwrap();
        assert_eq!(dict.get("a").unwrap().as_string(), Some("b"));
        assert_eq!(dict.get("d").unwrap().as_string(), Some("e"));
        assert_eq!(dict.get("g").unwrap().as_string(), Some("path/to/file"));
    }

    #[test]
    fn test_parse_conditional_key() {
        let value = parse_ok(r#"{ "CODE_SIGN_IDENTITY[sdk=iphoneos*]" = "iPhone Developer"; }"#);
        let dict = value.as_dictionary().unwrap();
        assert_eq!(
            dict.get("CODE_SIGN_IDENTITY[sdk=iphoneos*]").unwrap().as_string(),
            Some("iPhone Developer")
        );
    }

    #[test]
    fn test_parse_preserves_key_order() {
        let value = parse_ok("{ zeta = 1; alpha = 2; mid = 3; }");
        let keys: Vec<_> = value.as_dictionary().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_parse_data() {
        let value = parse_ok("{ blob = <0fa0 01>; }");
        let dict = value.as_dictionary().unwrap();
        assert_eq!(dict.get("blob").unwrap().as_data(), Some(&[0x0f, 0xa0, 0x01][..]));
    }

    #[test]
    fn test_parse_empty_containers() {
        let value = parse_ok("{ classes = {\n\t}; files = (\n\t); }");
        let dict = value.as_dictionary().unwrap();
        assert!(dict.get("classes").unwrap().as_dictionary().unwrap().is_empty());
        assert!(dict.get("files").unwrap().as_array().unwrap().is_empty());
    }

    #[test]
    fn test_parse_error_missing_semicolon() {
        let err = parse("{\n\ta = b\n}", "bad.pbxproj").unwrap_err();
        assert_eq!(err.line(), 3);
        assert_eq!(err.column(), 1);
        assert!(err.message().contains("expected `;`"));
    }

    #[test]
    fn test_parse_error_unterminated_string() {
        let err = parse("{ a = \"open; }", "bad.pbxproj").unwrap_err();
        assert_eq!(err.offset(), 6);
        assert!(err.message().contains("unterminated string"));
    }

    #[test]
    fn test_parse_error_merge_conflict_marker() {
        let err = parse("{\n<<<<<<< HEAD\n}", "bad.pbxproj").unwrap_err();
        assert_eq!(err.line(), 2);
    }

    #[test]
    fn test_parse_error_trailing_content() {
        let err = parse("{ } extra", "bad.pbxproj").unwrap_err();
        assert!(err.message().contains("after the end"));
    }
}
