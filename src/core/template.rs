//! Message format templates
//!
//! A template is plain text with field placeholders such as `{Message}` or
//! `{Timestamp:HH:mm:ss}`. [`CompiledTemplate::compile`] turns it into an
//! ordered list of [`Token`]s once; rendering is then a straight
//! substitution over that list.
//!
//! Field names are matched case-insensitively and may be padded with
//! whitespace inside the braces (`{ message  }`). Only `Timestamp` takes a
//! `:spec` suffix, and that spec keeps its case. Anything else between
//! braces, including unclosed braces, stays literal text, so compilation
//! never fails.

use super::caller::CallerInfo;
use super::severity::Severity;
use super::timestamp::DateFormat;
use chrono::{DateTime, FixedOffset};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// The six fields a template can reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Message,
    Timestamp,
    CallerName,
    CallerLineNumber,
    Category,
    MessageLevel,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Message,
        Field::Timestamp,
        Field::CallerName,
        Field::CallerLineNumber,
        Field::Category,
        Field::MessageLevel,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Field::Message => "Message",
            Field::Timestamp => "Timestamp",
            Field::CallerName => "CallerName",
            Field::CallerLineNumber => "CallerLineNumber",
            Field::Category => "Category",
            Field::MessageLevel => "MessageLevel",
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }

    fn from_name(name: &str) -> Option<Self> {
        Field::ALL
            .iter()
            .copied()
            .find(|field| field.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Set of fields referenced by a compiled template
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldSet(u8);

impl FieldSet {
    #[inline]
    pub fn contains(&self, field: Field) -> bool {
        self.0 & field.bit() != 0
    }

    fn insert(&mut self, field: Field) {
        self.0 |= field.bit();
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Field> + '_ {
        Field::ALL.into_iter().filter(|field| self.contains(*field))
    }
}

/// One element of a compiled template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Literal(String),
    Message,
    Timestamp(DateFormat),
    CallerName,
    CallerLineNumber,
    Category,
    MessageLevel,
}

impl Token {
    pub fn field(&self) -> Option<Field> {
        match self {
            Token::Literal(_) => None,
            Token::Message => Some(Field::Message),
            Token::Timestamp(_) => Some(Field::Timestamp),
            Token::CallerName => Some(Field::CallerName),
            Token::CallerLineNumber => Some(Field::CallerLineNumber),
            Token::Category => Some(Field::Category),
            Token::MessageLevel => Some(Field::MessageLevel),
        }
    }
}

/// Values substituted into a template for one message
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub message: &'a str,
    pub severity: Severity,
    pub category: &'a str,
    /// `None` when the caller was not resolved; renders as unknown
    pub caller: Option<&'a CallerInfo>,
    pub timestamp: DateTime<FixedOffset>,
}

/// A template compiled into literal and field tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTemplate {
    source: String,
    tokens: Vec<Token>,
    fields: FieldSet,
}

impl CompiledTemplate {
    /// Compile a template string. Total over all inputs.
    pub fn compile(template: &str) -> Self {
        let text = template.trim_end();
        let mut tokens = Vec::new();
        let mut fields = FieldSet::default();
        let mut literal = String::new();
        let mut rest = text;

        while let Some(open) = rest.find('{') {
            literal.push_str(&rest[..open]);
            let after_open = &rest[open + 1..];

            let matched = after_open.find('}').and_then(|close| {
                let inner = &after_open[..close];
                parse_placeholder(inner).map(|token| (token, close))
            });

            match matched {
                Some((token, close)) => {
                    if !literal.is_empty() {
                        tokens.push(Token::Literal(std::mem::take(&mut literal)));
                    }
                    if let Some(field) = token.field() {
                        fields.insert(field);
                    }
                    tokens.push(token);
                    rest = &after_open[close + 1..];
                }
                None => {
                    // Not a placeholder: keep the brace and rescan after it
                    literal.push('{');
                    rest = after_open;
                }
            }
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            tokens.push(Token::Literal(literal));
        }

        Self {
            source: template.to_string(),
            tokens,
            fields,
        }
    }

    /// The template string this was compiled from
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Fields referenced at least once
    pub fn fields_present(&self) -> FieldSet {
        self.fields
    }

    #[inline]
    pub fn uses(&self, field: Field) -> bool {
        self.fields.contains(field)
    }

    /// Whether rendering needs a resolved caller identity
    #[inline]
    pub fn needs_caller(&self) -> bool {
        self.uses(Field::CallerName) || self.uses(Field::CallerLineNumber)
    }

    /// Substitute every token; never fails
    pub fn render(&self, ctx: &RenderContext<'_>) -> String {
        let mut out = String::with_capacity(self.source.len() + ctx.message.len() + 32);
        for token in &self.tokens {
            match token {
                Token::Literal(text) => out.push_str(text),
                Token::Message => out.push_str(ctx.message),
                Token::Timestamp(format) => out.push_str(&format.format(&ctx.timestamp)),
                Token::CallerName => match ctx.caller {
                    Some(caller) => out.push_str(&caller.name),
                    None => out.push_str(CallerInfo::UNKNOWN_NAME),
                },
                Token::CallerLineNumber => match ctx.caller {
                    Some(caller) => out.push_str(&caller.line_number),
                    None => out.push_str(CallerInfo::UNKNOWN_LINE),
                },
                Token::Category => out.push_str(ctx.category.trim()),
                Token::MessageLevel => out.push_str(ctx.severity.to_str()),
            }
        }
        out
    }
}

/// Match the text between braces against the known fields
fn parse_placeholder(inner: &str) -> Option<Token> {
    if inner.contains('{') {
        return None;
    }
    let trimmed = inner.trim();

    let is_timestamp = trimmed
        .get(..Field::Timestamp.name().len())
        .is_some_and(|head| head.eq_ignore_ascii_case(Field::Timestamp.name()));
    if is_timestamp {
        let suffix = trimmed[Field::Timestamp.name().len()..].trim_start();
        if suffix.is_empty() {
            return Some(Token::Timestamp(DateFormat::default()));
        }
        let spec = suffix.strip_prefix(':')?.trim();
        if spec.is_empty() {
            return Some(Token::Timestamp(DateFormat::default()));
        }
        return Some(Token::Timestamp(DateFormat::parse(spec)));
    }

    match Field::from_name(trimmed)? {
        Field::Message => Some(Token::Message),
        Field::CallerName => Some(Token::CallerName),
        Field::CallerLineNumber => Some(Token::CallerLineNumber),
        Field::Category => Some(Token::Category),
        Field::MessageLevel => Some(Token::MessageLevel),
        Field::Timestamp => Some(Token::Timestamp(DateFormat::default())),
    }
}

/// Compile-once cache keyed by template text
#[derive(Debug)]
pub struct TemplateCache {
    entries: Mutex<HashMap<String, Arc<CompiledTemplate>>>,
    capacity: usize,
}

impl TemplateCache {
    pub const DEFAULT_CAPACITY: usize = 64;

    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    pub fn get_or_compile(&self, template: &str) -> Arc<CompiledTemplate> {
        let mut entries = self.entries.lock();
        if let Some(compiled) = entries.get(template) {
            return Arc::clone(compiled);
        }
        if entries.len() >= self.capacity {
            entries.clear();
        }
        let compiled = Arc::new(CompiledTemplate::compile(template));
        entries.insert(template.to_string(), Arc::clone(&compiled));
        compiled
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TemplateCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
