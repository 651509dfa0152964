//! Replacement-field templates.
//!
//! Templates use the replacement-field syntax message authors already know
//! from `str.format`-style formatting:
//!
//! | Syntax | Meaning |
//! |--------|---------|
//! | `{{` / `}}` | literal brace |
//! | `{self}` | text of the owning fault |
//! | `{self.what}` | attribute of the owner (data, kind default, or detail message) |
//! | `{ez}` / `{ez.template}` / `{ez.<default>}` | the rendering message descriptor |
//! | `{name}` | keyword (bound default or per-call override) |
//! | `{x.attr}` / `{x[0]}` | attribute / list index accessors |
//! | `{x!r}` / `{x!s}` / `{x!a}` | quoted / text / ASCII-quoted conversion |
//! | `{x:>10}` / `{x:.2f}` | format specifier |
//!
//! Parsing happens at render time: a template is never validated when it is
//! declared.

use std::fmt::Write;

use ezc::consts::MAX_RENDER_DEPTH;

use crate::error::{EzcError, EzcResult, TemplateError};
use crate::value::{Args, Value, float_repr, python_exponent, repr_str};

/// Name that binds the owner inside a template.
pub const SELF: &str = "self";

/// Name that binds the rendering message descriptor inside a template.
pub const DESCRIPTOR: &str = "ez";

/// The owner of a render: whatever `{self}` refers to.
pub trait Subject {
    /// Resolve `{self.<name>}`.
    ///
    /// `depth` is the current render nesting; implementations that render
    /// further messages pass `depth + 1` down.
    fn attribute(&self, name: &str, depth: usize) -> EzcResult<Value>;

    /// Resolve `{self}`.
    fn text(&self, depth: usize) -> EzcResult<String>;
}

/// Plain records: `{self.who}` reads the `who` entry.
impl Subject for Args {
    fn attribute(&self, name: &str, _depth: usize) -> EzcResult<Value> {
        self.get(name).cloned().ok_or_else(|| EzcError::NoAttribute {
            owner: "record".to_string(),
            attribute: name.to_string(),
        })
    }

    fn text(&self, _depth: usize) -> EzcResult<String> {
        let mut out = String::from("{");
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            let _ = write!(out, "{}: {}", repr_str(key), value.repr());
        }
        out.push('}');
        Ok(out)
    }
}

// ─── Parsing ────────────────────────────────────────────────────────

/// Conversion applied before formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// `!s`
    Str,
    /// `!r`
    Repr,
    /// `!a`
    Ascii,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Accessor<'t> {
    Attr(&'t str),
    Index(&'t str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Field<'t> {
    pub(crate) root: &'t str,
    pub(crate) accessors: Vec<Accessor<'t>>,
    pub(crate) conversion: Option<Conversion>,
    pub(crate) spec: &'t str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment<'t> {
    Literal(String),
    Field(Field<'t>),
}

pub(crate) fn parse(template: &str) -> Result<Vec<Segment<'_>>, TemplateError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = template.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        match c {
            '{' => {
                if chars.next_if(|&(_, d)| d == '{').is_some() {
                    literal.push('{');
                    continue;
                }
                let start = i + 1;
                let end = loop {
                    match chars.next() {
                        Some((j, '}')) => break j,
                        Some((j, '{')) => {
                            return Err(TemplateError::NestedField(template[start..j].to_string()));
                        }
                        Some(_) => {}
                        None if start == template.len() => {
                            return Err(TemplateError::SingleBrace('{'));
                        }
                        None => return Err(TemplateError::Unterminated),
                    }
                };
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Field(parse_field(&template[start..end])?));
            }
            '}' => {
                if chars.next_if(|&(_, d)| d == '}').is_none() {
                    return Err(TemplateError::SingleBrace('}'));
                }
                literal.push('}');
            }
            c => literal.push(c),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

fn parse_field(text: &str) -> Result<Field<'_>, TemplateError> {
    // The field name ends at the first `!` or `:` outside an index.
    let mut in_index = false;
    let mut name_end = text.len();
    for (i, c) in text.char_indices() {
        match c {
            '[' => in_index = true,
            ']' => in_index = false,
            '!' | ':' if !in_index => {
                name_end = i;
                break;
            }
            _ => {}
        }
    }
    let (name, rest) = text.split_at(name_end);
    let (conversion, spec) = parse_conversion(rest)?;
    let (root, accessors) = parse_name(name)?;
    Ok(Field {
        root,
        accessors,
        conversion,
        spec,
    })
}

fn parse_conversion(rest: &str) -> Result<(Option<Conversion>, &str), TemplateError> {
    if let Some(spec) = rest.strip_prefix(':') {
        return Ok((None, spec));
    }
    let Some(after) = rest.strip_prefix('!') else {
        return Ok((None, ""));
    };
    let mut chars = after.chars();
    let conversion = match chars.next() {
        Some('s') => Conversion::Str,
        Some('r') => Conversion::Repr,
        Some('a') => Conversion::Ascii,
        Some(c) => return Err(TemplateError::UnknownConversion(c.to_string())),
        None => return Err(TemplateError::UnknownConversion("!".to_string())),
    };
    let tail = chars.as_str();
    if tail.is_empty() {
        Ok((Some(conversion), ""))
    } else if let Some(spec) = tail.strip_prefix(':') {
        Ok((Some(conversion), spec))
    } else {
        Err(TemplateError::BadSpec(tail.to_string()))
    }
}

fn parse_name(name: &str) -> Result<(&str, Vec<Accessor<'_>>), TemplateError> {
    let root_end = name.find(['.', '[']).unwrap_or(name.len());
    let root = &name[..root_end];
    if root.is_empty() || root.chars().all(|c| c.is_ascii_digit()) {
        return Err(TemplateError::Positional(name.to_string()));
    }

    let bad = || TemplateError::BadAccessor(name.to_string());
    let mut accessors = Vec::new();
    let mut rest = &name[root_end..];
    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix('.') {
            let end = after.find(['.', '[']).unwrap_or(after.len());
            if end == 0 {
                return Err(bad());
            }
            accessors.push(Accessor::Attr(&after[..end]));
            rest = &after[end..];
        } else if let Some(after) = rest.strip_prefix('[') {
            let end = after.find(']').ok_or_else(bad)?;
            if end == 0 {
                return Err(bad());
            }
            accessors.push(Accessor::Index(&after[..end]));
            rest = &after[end + 1..];
        } else {
            return Err(bad());
        }
    }
    Ok((root, accessors))
}

// ─── Format Specifiers ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
    Center,
    AfterSign,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Sign {
    #[default]
    Minus,
    Plus,
    Space,
}

/// `[[fill]align][sign][#][0][width][,|_][.precision][type]`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct FormatSpec {
    fill: Option<char>,
    align: Option<Align>,
    sign: Sign,
    alternate: bool,
    zero: bool,
    width: usize,
    grouping: Option<char>,
    precision: Option<usize>,
    ty: Option<char>,
}

fn align_of(c: char) -> Option<Align> {
    match c {
        '<' => Some(Align::Left),
        '>' => Some(Align::Right),
        '^' => Some(Align::Center),
        '=' => Some(Align::AfterSign),
        _ => None,
    }
}

fn digits_at(chars: &[char], i: &mut usize) -> Option<usize> {
    let start = *i;
    while chars.get(*i).is_some_and(char::is_ascii_digit) {
        *i += 1;
    }
    if *i == start {
        return None;
    }
    chars[start..*i].iter().collect::<String>().parse().ok()
}

impl FormatSpec {
    pub(crate) fn parse(spec: &str) -> Result<Self, TemplateError> {
        let bad = || TemplateError::BadSpec(spec.to_string());
        let chars: Vec<char> = spec.chars().collect();
        let mut out = Self::default();
        let mut i = 0;

        if chars.len() >= 2 && align_of(chars[1]).is_some() {
            out.fill = Some(chars[0]);
            out.align = align_of(chars[1]);
            i = 2;
        } else if let Some(align) = chars.first().copied().and_then(align_of) {
            out.align = Some(align);
            i = 1;
        }
        match chars.get(i) {
            Some('+') => {
                out.sign = Sign::Plus;
                i += 1;
            }
            Some(' ') => {
                out.sign = Sign::Space;
                i += 1;
            }
            Some('-') => i += 1,
            _ => {}
        }
        if chars.get(i) == Some(&'#') {
            out.alternate = true;
            i += 1;
        }
        if chars.get(i) == Some(&'0') {
            out.zero = true;
            i += 1;
        }
        if let Some(width) = digits_at(&chars, &mut i) {
            out.width = width;
        }
        if let Some(&c) = chars.get(i).filter(|c| matches!(c, ',' | '_')) {
            out.grouping = Some(c);
            i += 1;
        }
        if chars.get(i) == Some(&'.') {
            i += 1;
            out.precision = Some(digits_at(&chars, &mut i).ok_or_else(bad)?);
        }
        match &chars[i..] {
            [] => {}
            [t] if "bcdeEfFgGnosxX%".contains(*t) => out.ty = Some(*t),
            _ => return Err(bad()),
        }
        Ok(out)
    }

    pub(crate) fn apply(&self, value: &Value, raw: &str) -> EzcResult<String> {
        match value {
            Value::Str(s) => self.format_str(s, raw),
            Value::Int(i) => self.format_int(*i, raw),
            Value::Bool(b) => self.format_int(i64::from(*b), raw),
            Value::Float(x) => self.format_float(*x, raw),
            Value::None | Value::List(_) => Err(self.mismatch(raw, value.type_name())),
        }
    }

    fn mismatch(&self, raw: &str, type_name: &str) -> EzcError {
        EzcError::FormatSpec {
            spec: self.ty.map_or_else(|| raw.to_string(), String::from),
            type_name: type_name.to_string(),
        }
    }

    fn format_str(&self, s: &str, raw: &str) -> EzcResult<String> {
        if !matches!(self.ty, None | Some('s')) {
            return Err(self.mismatch(raw, "str"));
        }
        if self.sign != Sign::Minus
            || self.alternate
            || self.grouping.is_some()
            || self.align == Some(Align::AfterSign)
        {
            return Err(TemplateError::BadSpec(raw.to_string()).into());
        }
        let body: String = match self.precision {
            Some(p) => s.chars().take(p).collect(),
            None => s.to_string(),
        };
        Ok(self.pad("", &body, Align::Left, false))
    }

    fn format_int(&self, i: i64, raw: &str) -> EzcResult<String> {
        let abs = i.unsigned_abs();
        let (prefix, digits, group_size) = match self.ty {
            None | Some('d') | Some('n') => ("", abs.to_string(), 3),
            Some('x') => ("0x", format!("{abs:x}"), 4),
            Some('X') => ("0X", format!("{abs:X}"), 4),
            Some('o') => ("0o", format!("{abs:o}"), 4),
            Some('b') => ("0b", format!("{abs:b}"), 4),
            Some('c') => {
                let c = u32::try_from(i)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| TemplateError::BadSpec(raw.to_string()))?;
                return Ok(self.pad("", &c.to_string(), Align::Left, false));
            }
            Some('e' | 'E' | 'f' | 'F' | 'g' | 'G' | '%') => {
                return self.format_float(i as f64, raw);
            }
            Some(_) => return Err(self.mismatch(raw, "int")),
        };
        if self.precision.is_some() {
            return Err(TemplateError::BadSpec(raw.to_string()).into());
        }
        let digits = match self.grouping {
            Some(sep) => group(&digits, group_size, sep),
            None => digits,
        };
        let mut lead = self.sign_text(i < 0).to_string();
        if self.alternate {
            lead.push_str(prefix);
        }
        Ok(self.pad(&lead, &digits, Align::Right, true))
    }

    fn format_float(&self, x: f64, raw: &str) -> EzcResult<String> {
        let upper = self.ty.is_some_and(|t| t.is_ascii_uppercase());
        let negative = x.is_sign_negative() && !x.is_nan();
        let abs = x.abs();

        let body = if !abs.is_finite() {
            let text = if abs.is_nan() { "nan" } else { "inf" };
            let text = if upper { text.to_uppercase() } else { text.to_string() };
            if self.ty == Some('%') { format!("{text}%") } else { text }
        } else {
            match self.ty {
                None => match self.precision {
                    Some(p) => general(abs, p, true),
                    None => float_repr(abs),
                },
                Some('f' | 'F') => format!("{:.*}", self.precision.unwrap_or(6), abs),
                Some('e' | 'E') => {
                    let s = python_exponent(&format!("{:.*e}", self.precision.unwrap_or(6), abs));
                    if upper { s.to_uppercase() } else { s }
                }
                Some('g' | 'G') => {
                    let s = general(abs, self.precision.unwrap_or(6), false);
                    if upper { s.to_uppercase() } else { s }
                }
                Some('%') => format!("{:.*}%", self.precision.unwrap_or(6), abs * 100.0),
                Some(_) => return Err(self.mismatch(raw, "float")),
            }
        };

        let body = match (self.grouping, body.find(|c: char| !c.is_ascii_digit())) {
            (Some(sep), Some(end)) if end > 0 => format!("{}{}", group(&body[..end], 3, sep), &body[end..]),
            (Some(sep), None) => group(&body, 3, sep),
            _ => body,
        };
        Ok(self.pad(self.sign_text(negative), &body, Align::Right, true))
    }

    fn sign_text(&self, negative: bool) -> &'static str {
        match (negative, self.sign) {
            (true, _) => "-",
            (false, Sign::Plus) => "+",
            (false, Sign::Space) => " ",
            (false, Sign::Minus) => "",
        }
    }

    fn pad(&self, lead: &str, body: &str, default: Align, numeric: bool) -> String {
        let len = lead.chars().count() + body.chars().count();
        if self.width <= len {
            return format!("{lead}{body}");
        }
        let n = self.width - len;
        let (fill, align) = match (self.zero, self.fill, self.align) {
            (true, None, None) if numeric => ('0', Align::AfterSign),
            (true, None, align) => ('0', align.unwrap_or(default)),
            (_, fill, align) => (fill.unwrap_or(' '), align.unwrap_or(default)),
        };
        let fill_n = |count: usize| std::iter::repeat_n(fill, count).collect::<String>();
        match align {
            Align::Left => format!("{lead}{body}{}", fill_n(n)),
            Align::Right => format!("{}{lead}{body}", fill_n(n)),
            Align::Center => format!("{}{lead}{body}{}", fill_n(n / 2), fill_n(n - n / 2)),
            Align::AfterSign => format!("{lead}{}{body}", fill_n(n)),
        }
    }
}

/// Insert `sep` every `size` digits, counting from the right.
fn group(digits: &str, size: usize, sep: char) -> String {
    let chars: Vec<char> = digits.chars().collect();
    let mut out = String::with_capacity(chars.len() + chars.len() / size);
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % size == 0 {
            out.push(sep);
        }
        out.push(*c);
    }
    out
}

/// General format of a finite, non-negative float with `precision`
/// significant digits.
fn general(x: f64, precision: usize, keep_point: bool) -> String {
    let p = precision.max(1);
    if x == 0.0 {
        return if keep_point { "0.0".to_string() } else { "0".to_string() };
    }
    let sci = format!("{:.*e}", p - 1, x);
    let exp: i32 = sci
        .split_once('e')
        .and_then(|(_, e)| e.parse().ok())
        .unwrap_or(0);

    if exp >= -4 && exp < p as i32 {
        let decimals = (p as i32 - 1 - exp).max(0) as usize;
        let fixed = trim_zeros(&format!("{x:.decimals$}"));
        if keep_point && !fixed.contains('.') {
            format!("{fixed}.0")
        } else {
            fixed
        }
    } else {
        let (mantissa, _) = sci.split_once('e').unwrap_or((sci.as_str(), ""));
        python_exponent(&format!("{}e{exp}", trim_zeros(mantissa)))
    }
}

fn trim_zeros(s: &str) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s.to_string()
    }
}

// ─── Rendering ──────────────────────────────────────────────────────

/// Everything a template can see while rendering.
pub(crate) struct Scope<'a> {
    pub(crate) owner: &'a dyn Subject,
    /// Bound to `ez`; unset when rendering outside a message.
    pub(crate) descriptor: Option<&'a dyn Subject>,
    pub(crate) args: &'a Args,
    pub(crate) depth: usize,
}

pub(crate) fn render(template: &str, scope: &Scope<'_>) -> EzcResult<String> {
    if scope.depth > MAX_RENDER_DEPTH {
        return Err(EzcError::RecursionLimit(MAX_RENDER_DEPTH));
    }
    let segments = parse(template)?;
    let mut out = String::with_capacity(template.len());
    for segment in &segments {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Field(field) => out.push_str(&render_field(field, scope)?),
        }
    }
    Ok(out)
}

fn render_field(field: &Field<'_>, scope: &Scope<'_>) -> EzcResult<String> {
    let value = resolve(field, scope)?;
    let value = match field.conversion {
        None => value,
        Some(Conversion::Str) => Value::Str(value.to_string()),
        Some(Conversion::Repr) => Value::Str(value.repr()),
        Some(Conversion::Ascii) => Value::Str(value.ascii()),
    };
    if field.spec.is_empty() {
        return Ok(value.to_string());
    }
    FormatSpec::parse(field.spec)?.apply(&value, field.spec)
}

fn resolve(field: &Field<'_>, scope: &Scope<'_>) -> EzcResult<Value> {
    let mut accessors = field.accessors.iter();
    let subject = match field.root {
        SELF => Some(scope.owner),
        DESCRIPTOR => scope.descriptor,
        _ => None,
    };
    let mut value = if let Some(subject) = subject {
        match accessors.next() {
            None => Value::Str(subject.text(scope.depth)?),
            Some(Accessor::Attr(name)) => subject.attribute(name, scope.depth)?,
            Some(Accessor::Index(_)) => {
                return Err(EzcError::NotIndexable {
                    type_name: field.root.to_string(),
                });
            }
        }
    } else {
        scope
            .args
            .get(field.root)
            .cloned()
            .ok_or_else(|| EzcError::MissingKey(field.root.to_string()))?
    };

    for accessor in accessors {
        value = match accessor {
            Accessor::Attr(name) => {
                return Err(EzcError::NoAttribute {
                    owner: value.type_name().to_string(),
                    attribute: (*name).to_string(),
                });
            }
            Accessor::Index(index) => index_value(value, index)?,
        };
    }
    Ok(value)
}

fn index_value(value: Value, index: &str) -> EzcResult<Value> {
    match value {
        Value::List(mut items) => {
            let out_of_range = || EzcError::IndexOutOfRange {
                index: index.to_string(),
            };
            let i: usize = index.parse().map_err(|_| out_of_range())?;
            if i >= items.len() {
                return Err(out_of_range());
            }
            Ok(items.swap_remove(i))
        }
        other => Err(EzcError::NotIndexable {
            type_name: other.type_name().to_string(),
        }),
    }
}
