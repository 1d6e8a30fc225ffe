//! Positional placeholder templating
//!
//! Templates contain `%N` placeholders, numbered from 1, each rendering
//! the matching typed argument. An index past the supplied arguments is
//! left in the output verbatim so a bad template degrades visibly
//! instead of panicking.

use std::fmt;

/// A typed positional argument for template rendering
#[derive(Debug, Clone)]
pub enum FormatArg<'a> {
    Str(&'a str),
    Uint(u64),
    Uint8(u8),
    Double(f64),
}

impl fmt::Display for FormatArg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatArg::Str(value) => f.write_str(value),
            FormatArg::Uint(value) => write!(f, "{}", value),
            FormatArg::Uint8(value) => write!(f, "{}", value),
            FormatArg::Double(value) => write!(f, "{}", value),
        }
    }
}

/// Render `template`, substituting each `%N` with the N-th argument.
///
/// `%%` renders a literal `%`; a `%` not followed by a digit is kept as-is.
pub fn parse_format_string(template: &str, args: &[FormatArg]) -> String {
    let mut out = String::with_capacity(template.len() + 16);
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('%') => {
                chars.next();
                out.push('%');
            }
            Some(d) if d.is_ascii_digit() => {
                let mut digits = String::new();
                while let Some(&d) = chars.peek() {
                    if !d.is_ascii_digit() {
                        break;
                    }
                    digits.push(d);
                    chars.next();
                }
                let index: usize = digits.parse().unwrap_or(0);
                if index >= 1 && index <= args.len() {
                    out.push_str(&args[index - 1].to_string());
                } else {
                    out.push('%');
                    out.push_str(&digits);
                }
            }
            _ => out.push('%'),
        }
    }
    out
}
