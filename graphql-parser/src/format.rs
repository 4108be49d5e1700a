//! Formatting graphql
use std::default::Default;
use std::fmt::Write;

use crate::common::{Directive, Txt, Value};

#[derive(Debug, PartialEq)]
pub struct Formatter<'a> {
    buf: String,
    style: &'a Style,
    indent: u32,
    pending_space: bool,
}

/// A configuration of formatting style
///
/// Indentation width and minification are configurable. Minified output
/// puts the whole document on one line and only keeps the spaces needed to
/// separate adjacent names.
#[derive(Debug, PartialEq, Clone)]
pub struct Style {
    indent: u32,
    minified: bool,
}

impl Default for Style {
    fn default() -> Style {
        Style {
            indent: 2,
            minified: false,
        }
    }
}

impl Style {
    /// Change the number of spaces used for indentation
    pub fn indent(&mut self, indent: u32) -> &mut Self {
        self.indent = indent;
        self
    }

    pub fn minified() -> Self {
        Style {
            indent: 0,
            minified: true,
        }
    }
}

pub(crate) trait Displayable {
    fn display(&self, f: &mut Formatter);
}

fn is_name_char(c: char) -> bool {
    c == '_' || c.is_ascii_alphanumeric()
}

impl<'a> Formatter<'a> {
    pub fn new(style: &Style) -> Formatter {
        Formatter {
            buf: String::with_capacity(1024),
            style,
            indent: 0,
            pending_space: false,
        }
    }

    pub fn is_minified(&self) -> bool {
        self.style.minified
    }

    pub fn indent(&mut self) {
        if self.is_minified() {
            return;
        }
        for _ in 0..self.indent {
            self.buf.push(' ');
        }
    }

    /// A separator that minified output drops unless two names would touch
    pub fn space(&mut self) {
        if self.is_minified() {
            self.pending_space = true;
        } else {
            self.buf.push(' ');
        }
    }

    pub fn endline(&mut self) {
        if self.is_minified() {
            self.pending_space = true;
        } else {
            self.buf.push('\n');
        }
    }

    pub fn start_block(&mut self) {
        self.write("{");
        self.endline();
        self.indent += self.style.indent;
    }

    pub fn end_block(&mut self) {
        self.indent = self.indent.saturating_sub(self.style.indent);
        self.indent();
        self.write("}");
        self.endline();
    }

    /// Writes `{}` for a selection that is still pending
    pub fn empty_block(&mut self) {
        self.write("{}");
        self.endline();
    }

    pub fn margin(&mut self) {
        if self.is_minified() {
            return;
        }
        if !self.buf.is_empty() {
            self.buf.push('\n');
        }
    }

    pub fn write(&mut self, s: &str) {
        if self.pending_space {
            self.pending_space = false;
            let joins_names = match (self.buf.chars().last(), s.chars().next()) {
                (Some(prev), Some(next)) => is_name_char(prev) && is_name_char(next),
                _ => false,
            };
            if joins_names {
                self.buf.push(' ');
            }
        }
        self.buf.push_str(s);
    }

    pub fn into_string(self) -> String {
        self.buf
    }

    pub fn write_quoted(&mut self, s: &str) {
        let mut has_newline = false;
        let mut has_nonprintable = false;
        for c in s.chars() {
            match c {
                '\n' => has_newline = true,
                '\r' | '\t' | '\u{0020}'..='\u{FFFF}' => {}
                _ => has_nonprintable = true,
            }
        }
        if !has_newline || has_nonprintable || self.is_minified() {
            let mut quoted = String::with_capacity(s.len() + 2);
            quoted.push('"');
            for c in s.chars() {
                match c {
                    '\r' => quoted.push_str(r"\r"),
                    '\n' => quoted.push_str(r"\n"),
                    '\t' => quoted.push_str(r"\t"),
                    '"' => quoted.push_str("\\\""),
                    '\\' => quoted.push_str(r"\\"),
                    '\u{0020}'..='\u{FFFF}' => quoted.push(c),
                    _ => {
                        let mut units = [0u16; 2];
                        for unit in c.encode_utf16(&mut units) {
                            let _ = write!(quoted, "\\u{:04X}", unit);
                        }
                    }
                }
            }
            quoted.push('"');
            self.write(&quoted);
        } else {
            self.write(r#"""""#);
            self.endline();
            self.indent += self.style.indent;
            for line in s.lines() {
                if !line.trim().is_empty() {
                    self.indent();
                    self.write(&line.replace(r#"""""#, r#"\""""#));
                }
                self.endline();
            }
            self.indent -= self.style.indent;
            self.indent();
            self.write(r#"""""#);
        }
    }
}

pub(crate) fn format_directives(dirs: &[Directive], f: &mut Formatter) {
    for dir in dirs {
        f.space();
        dir.display(f);
    }
}

pub(crate) fn format_arguments(arguments: &[(Txt, Value)], f: &mut Formatter) {
    if arguments.is_empty() {
        return;
    }
    f.write("(");
    for (idx, (name, value)) in arguments.iter().enumerate() {
        if idx > 0 {
            f.write(",");
            f.space();
        }
        f.write(name);
        f.write(":");
        f.space();
        value.display(f);
    }
    f.write(")");
}

impl Displayable for Directive {
    fn display(&self, f: &mut Formatter) {
        f.write("@");
        f.write(&self.name);
        format_arguments(&self.arguments, f);
    }
}

impl Displayable for Value {
    fn display(&self, f: &mut Formatter) {
        match *self {
            Value::Variable(ref name) => {
                f.write("$");
                f.write(name);
            }
            Value::Int(ref num) => f.write(&num.to_string()),
            Value::Float(val) => {
                let mut text = val.to_string();
                // keep the literal a float when it is reparsed
                if val.is_finite() && !text.contains(|c: char| c == '.' || c == 'e' || c == 'E') {
                    text.push_str(".0");
                }
                f.write(&text)
            }
            Value::String(ref val) => f.write_quoted(val),
            Value::Boolean(true) => f.write("true"),
            Value::Boolean(false) => f.write("false"),
            Value::Null => f.write("null"),
            Value::Enum(ref name) => f.write(name),
            Value::List(ref items) => {
                f.write("[");
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write(",");
                        f.space();
                    }
                    item.display(f);
                }
                f.write("]");
            }
            Value::Object(ref items) => {
                f.write("{");
                for (idx, (name, value)) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write(",");
                        f.space();
                    }
                    f.write(name);
                    f.write(":");
                    f.space();
                    value.display(f);
                }
                f.write("}");
            }
        }
    }
}

macro_rules! impl_display {
    ($( $typ: ident, )+) => {
        $(
            impl fmt::Display for $typ {
                fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                    f.write_str(&to_string(self))
                }
            }
        )+
    };
}
