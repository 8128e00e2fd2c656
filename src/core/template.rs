//! printf-style template substitution
//!
//! Renders templates such as `"user %s failed %d times"` against positional
//! [`Arg`] values. Rendering never fails: problems are written into the
//! output as inline markers so the message still reaches the chat.
//!
//! | Problem                 | Marker               |
//! |-------------------------|----------------------|
//! | not enough arguments    | `%!d(MISSING)`       |
//! | verb/argument mismatch  | `%!t(hello)`         |
//! | `%` at end of template  | `%!(NOVERB)`         |
//! | unused arguments        | `%!(EXTRA 1, two)`   |
//!
//! Supported verbs: `%s %v %d %i %f %F %e %E %g %G %x %X %o %b %q %t %c %%`,
//! with the flags `-` (left align), `0` (zero pad), `+` (always sign), a
//! width and a `.precision`.

use std::fmt::{self, Write};
use std::iter::Peekable;
use std::str::Chars;

/// Upper bound for width and precision read from a template
const MAX_WIDTH: usize = 4096;

/// A positional template argument
#[derive(Clone, Copy)]
pub enum Arg<'a> {
    Str(&'a str),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Char(char),
    Display(&'a dyn fmt::Display),
}

impl<'a> Arg<'a> {
    /// Wrap any `Display` value; it renders with `%s`/`%v`/`%q` only
    pub fn display<T: fmt::Display>(value: &'a T) -> Self {
        Arg::Display(value)
    }
}

impl fmt::Display for Arg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Str(s) => f.write_str(s),
            Arg::Int(n) => write!(f, "{}", n),
            Arg::Uint(n) => write!(f, "{}", n),
            Arg::Float(n) => write!(f, "{}", n),
            Arg::Bool(b) => write!(f, "{}", b),
            Arg::Char(c) => write!(f, "{}", c),
            Arg::Display(d) => write!(f, "{}", d),
        }
    }
}

impl fmt::Debug for Arg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Arg::Int(n) => f.debug_tuple("Int").field(n).finish(),
            Arg::Uint(n) => f.debug_tuple("Uint").field(n).finish(),
            Arg::Float(n) => f.debug_tuple("Float").field(n).finish(),
            Arg::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Arg::Char(c) => f.debug_tuple("Char").field(c).finish(),
            Arg::Display(d) => f.debug_tuple("Display").field(&d.to_string()).finish(),
        }
    }
}

impl<'a> From<&'a str> for Arg<'a> {
    fn from(value: &'a str) -> Self {
        Arg::Str(value)
    }
}

impl<'a> From<&'a String> for Arg<'a> {
    fn from(value: &'a String) -> Self {
        Arg::Str(value.as_str())
    }
}

macro_rules! impl_from_int {
    ($variant:ident, $target:ty: $($t:ty),+) => {
        $(
            impl From<$t> for Arg<'_> {
                fn from(value: $t) -> Self {
                    Arg::$variant(value as $target)
                }
            }
        )+
    };
}

impl_from_int!(Int, i64: i8, i16, i32, i64, isize);
impl_from_int!(Uint, u64: u8, u16, u32, u64, usize);
impl_from_int!(Float, f64: f32, f64);

impl From<bool> for Arg<'_> {
    fn from(value: bool) -> Self {
        Arg::Bool(value)
    }
}

impl From<char> for Arg<'_> {
    fn from(value: char) -> Self {
        Arg::Char(value)
    }
}

#[derive(Debug, Default)]
struct Spec {
    left: bool,
    zero: bool,
    plus: bool,
    width: Option<usize>,
    precision: Option<usize>,
}

/// Substitute `args` into `template`
///
/// ```
/// use rust_telegram_logger::core::template::{render, Arg};
///
/// let text = render("%s took %.1fs", &[Arg::from("sync"), Arg::from(1.5)]);
/// assert_eq!(text, "sync took 1.5s");
///
/// let text = render("%d of %d", &[Arg::from(3)]);
/// assert_eq!(text, "3 of %!d(MISSING)");
/// ```
pub fn render(template: &str, args: &[Arg<'_>]) -> String {
    let mut out = String::with_capacity(template.len() + args.len() * 8);
    let mut chars = template.chars().peekable();
    let mut next_arg = 0;

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        let spec = parse_spec(&mut chars);
        let Some(verb) = chars.next() else {
            out.push_str("%!(NOVERB)");
            break;
        };

        if verb == '%' {
            out.push('%');
            continue;
        }

        match args.get(next_arg) {
            Some(arg) => {
                next_arg += 1;
                match render_arg(verb, &spec, arg) {
                    Some(rendered) => out.push_str(&rendered),
                    None => {
                        let _ = write!(out, "%!{}({})", verb, arg);
                    }
                }
            }
            None => {
                let _ = write!(out, "%!{}(MISSING)", verb);
            }
        }
    }

    if next_arg < args.len() {
        out.push_str("%!(EXTRA ");
        for (i, arg) in args[next_arg..].iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            let _ = write!(out, "{}", arg);
        }
        out.push(')');
    }

    out
}

fn parse_spec(chars: &mut Peekable<Chars<'_>>) -> Spec {
    let mut spec = Spec::default();

    while let Some(&flag) = chars.peek() {
        match flag {
            '-' => spec.left = true,
            '0' => spec.zero = true,
            '+' => spec.plus = true,
            _ => break,
        }
        chars.next();
    }

    spec.width = take_number(chars);
    if chars.peek() == Some(&'.') {
        chars.next();
        spec.precision = Some(take_number(chars).unwrap_or(0));
    }

    spec
}

fn take_number(chars: &mut Peekable<Chars<'_>>) -> Option<usize> {
    let mut value: Option<usize> = None;
    while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
        chars.next();
        let current = value.unwrap_or(0);
        value = Some(
            current
                .saturating_mul(10)
                .saturating_add(digit as usize)
                .min(MAX_WIDTH),
        );
    }
    value
}

/// Render one argument, or `None` when the verb does not apply to it
fn render_arg(verb: char, spec: &Spec, arg: &Arg<'_>) -> Option<String> {
    let (body, numeric) = match verb {
        's' | 'v' => {
            let text = arg.to_string();
            match (arg, spec.precision) {
                (Arg::Str(_) | Arg::Display(_), Some(limit)) => {
                    (text.chars().take(limit).collect(), false)
                }
                (Arg::Float(v), Some(precision)) => (signed(format!("{:.*}", precision, v), spec), true),
                (Arg::Int(_) | Arg::Uint(_) | Arg::Float(_), None) => (signed(text, spec), true),
                _ => (text, false),
            }
        }
        'd' | 'i' => match arg {
            Arg::Int(n) => (signed(n.to_string(), spec), true),
            Arg::Uint(n) => (signed(n.to_string(), spec), true),
            Arg::Char(c) => ((*c as u32).to_string(), true),
            _ => return None,
        },
        'f' | 'F' | 'e' | 'E' | 'g' | 'G' => {
            let value = as_float(arg)?;
            let text = match verb {
                'f' | 'F' => format!("{:.*}", spec.precision.unwrap_or(6), value),
                'e' => format!("{:.*e}", spec.precision.unwrap_or(6), value),
                'E' => format!("{:.*E}", spec.precision.unwrap_or(6), value),
                _ => match spec.precision {
                    Some(precision) => format!("{:.*}", precision, value),
                    None => value.to_string(),
                },
            };
            (signed(text, spec), true)
        }
        'x' | 'X' | 'o' | 'b' => {
            let text = match arg {
                Arg::Int(n) => {
                    let digits = radix(n.unsigned_abs(), verb);
                    if *n < 0 {
                        format!("-{}", digits)
                    } else {
                        digits
                    }
                }
                Arg::Uint(n) => radix(*n, verb),
                Arg::Str(s) if verb == 'x' || verb == 'X' => hex_bytes(s.as_bytes(), verb),
                _ => return None,
            };
            (text, true)
        }
        'q' => match arg {
            Arg::Char(c) => (format!("{:?}", c), false),
            Arg::Str(s) => (format!("{:?}", s), false),
            Arg::Display(d) => (format!("{:?}", d.to_string()), false),
            _ => return None,
        },
        't' => match arg {
            Arg::Bool(b) => (b.to_string(), false),
            _ => return None,
        },
        'c' => match arg {
            Arg::Char(c) => (c.to_string(), false),
            Arg::Int(n) => (char_from(u64::try_from(*n).ok()?)?.to_string(), false),
            Arg::Uint(n) => (char_from(*n)?.to_string(), false),
            _ => return None,
        },
        _ => return None,
    };

    Some(pad(body, spec, numeric))
}

fn as_float(arg: &Arg<'_>) -> Option<f64> {
    match arg {
        Arg::Float(v) => Some(*v),
        Arg::Int(n) => Some(*n as f64),
        Arg::Uint(n) => Some(*n as f64),
        _ => None,
    }
}

fn char_from(code: u64) -> Option<char> {
    u32::try_from(code).ok().and_then(char::from_u32)
}

fn radix(value: u64, verb: char) -> String {
    match verb {
        'x' => format!("{:x}", value),
        'X' => format!("{:X}", value),
        'o' => format!("{:o}", value),
        _ => format!("{:b}", value),
    }
}

fn hex_bytes(bytes: &[u8], verb: char) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = if verb == 'X' {
            write!(out, "{:02X}", byte)
        } else {
            write!(out, "{:02x}", byte)
        };
    }
    out
}

fn signed(text: String, spec: &Spec) -> String {
    if spec.plus && !text.starts_with('-') {
        format!("+{}", text)
    } else {
        text
    }
}

fn pad(text: String, spec: &Spec, numeric: bool) -> String {
    let Some(width) = spec.width else {
        return text;
    };
    let len = text.chars().count();
    if len >= width {
        return text;
    }
    let fill = width - len;

    if spec.left {
        format!("{}{}", text, " ".repeat(fill))
    } else if spec.zero && numeric {
        let (sign, digits) = if text.starts_with(['-', '+']) {
            text.split_at(1)
        } else {
            ("", text.as_str())
        };
        format!("{}{}{}", sign, "0".repeat(fill), digits)
    } else {
        format!("{}{}", " ".repeat(fill), text)
    }
}
