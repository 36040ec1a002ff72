//! Formatter compilation backed by Fluent bundles
//!
//! A parsed template is lowered to a single-message Fluent resource and
//! loaded into a concurrent [`FluentBundle`] for the target locale. Fluent
//! then handles CLDR plural categories.
//!
//! Plural selectors are passed to Fluent as numbers. Every rendered value,
//! `#` included, is the caller's text as given, so values beyond `f64`
//! precision are never rewritten.

use crate::locale::Locale;
use crate::params::Params;
use crate::syntax::{Branch, BranchKey, Element, ParsedTemplate};
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource, FluentValue};
use std::collections::HashMap;
use std::fmt::{self, Write as _};
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

/// Id of the only message in every generated resource.
const MESSAGE_ID: &str = "template";

/// A compiled, locale-bound template.
pub trait Formatter: Send + Sync + fmt::Debug {
    /// Render with the given parameters.
    fn render(&self, params: &Params) -> String;
}

/// Failure to build a formatter from a parsed template.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct CompileError(
    /// Human readable reason
    pub String,
);

/// Builds formatters from parsed templates.
pub trait FormatterCompiler: Send + Sync {
    /// Bind `template` to `locale`.
    ///
    /// # Errors
    ///
    /// Returns a [`CompileError`] when the template cannot be expressed for
    /// this backend.
    fn compile(&self, template: &ParsedTemplate, locale: &Locale) -> Result<Arc<dyn Formatter>, CompileError>;
}

/// Compiles templates into [`FluentFormatter`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct FluentCompiler;

impl FormatterCompiler for FluentCompiler {
    fn compile(&self, template: &ParsedTemplate, locale: &Locale) -> Result<Arc<dyn Formatter>, CompileError> {
        Ok(Arc::new(FluentFormatter::new(template, locale)?))
    }
}

/// A parameter the generated Fluent source refers to as `$aN`.
///
/// A plural parameter gets two slots: a numeric one to select the branch
/// and a text one for `#`.
#[derive(Debug, Clone)]
struct Slot {
    name: String,
    numeric: bool,
}

/// Formatter holding a one-message Fluent bundle.
pub struct FluentFormatter {
    bundle: FluentBundle<FluentResource>,
    slots: Vec<Slot>,
    locale: String,
}

impl fmt::Debug for FluentFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FluentFormatter")
            .field("bundle", &"FluentBundle<FluentResource>")
            .field("slots", &self.slots)
            .field("locale", &self.locale)
            .finish()
    }
}

impl FluentFormatter {
    /// Lower `template` and build a bundle for `locale`.
    pub fn new(template: &ParsedTemplate, locale: &Locale) -> Result<Self, CompileError> {
        let (source, slots) = lower(template);

        let resource = FluentResource::try_new(source).map_err(|(_, errors)| {
            let messages: Vec<String> = errors.into_iter().map(|e| format!("{e:?}")).collect();
            CompileError(format!("generated Fluent source was rejected: {messages:?}"))
        })?;

        let mut bundle = FluentBundle::new_concurrent(vec![locale.language_identifier().clone()]);
        // Unicode isolation marks around placeables would leak into plain-text output
        bundle.set_use_isolating(false);
        bundle.add_resource(resource).map_err(|errors| {
            let messages: Vec<String> = errors.into_iter().map(|e| format!("{e:?}")).collect();
            CompileError(format!("failed to add resource to bundle: {messages:?}"))
        })?;

        Ok(Self {
            bundle,
            slots,
            locale: locale.tag().to_string(),
        })
    }

    fn args<'p>(&self, params: &'p Params) -> FluentArgs<'p> {
        let mut args = FluentArgs::new();
        let mut missing: Vec<&str> = Vec::new();

        for (index, slot) in self.slots.iter().enumerate() {
            let value = match params.get(&slot.name) {
                Some(value) if slot.numeric => FluentValue::try_number(value.as_str()),
                Some(value) => FluentValue::from(value.as_str()),
                None => {
                    if !missing.contains(&slot.name.as_str()) {
                        missing.push(&slot.name);
                    }
                    FluentValue::from(format!("{{{}}}", slot.name))
                }
            };
            args.set(variable(index), value);
        }

        if !missing.is_empty() {
            warn!("Missing parameters {:?} while rendering ({})", missing, self.locale);
        }
        args
    }
}

impl Formatter for FluentFormatter {
    fn render(&self, params: &Params) -> String {
        let Some(message) = self.bundle.get_message(MESSAGE_ID) else {
            return String::new();
        };
        let Some(pattern) = message.value() else {
            return String::new();
        };

        let args = self.args(params);
        let mut errors = Vec::new();
        let formatted = self.bundle.format_pattern(pattern, Some(&args), &mut errors);

        if !errors.is_empty() {
            let messages: Vec<String> = errors.into_iter().map(|e| format!("{e:?}")).collect();
            warn!("Formatting errors ({}): {:?}", self.locale, messages);
        }

        formatted.into_owned()
    }
}

fn variable(index: usize) -> String {
    format!("a{index}")
}

/// Generates Fluent source for `template`.
///
/// Text is emitted as string-literal placeables so whitespace, braces and
/// line breaks survive Fluent's own syntax. Parameters are renamed to `$aN`
/// because ICU names need not be valid Fluent identifiers.
fn lower(template: &ParsedTemplate) -> (String, Vec<Slot>) {
    let mut lowering = Lowering::default();
    let mut body = String::new();
    lowering.pattern(template.elements(), None, 1, &mut body);

    (format!("{MESSAGE_ID} = {body}\n"), lowering.slots)
}

#[derive(Default)]
struct Lowering {
    slots: Vec<Slot>,
    index: HashMap<(String, bool), usize>,
}

impl Lowering {
    fn slot(&mut self, name: &str, numeric: bool) -> String {
        let key = (name.to_string(), numeric);
        let index = match self.index.get(&key) {
            Some(&index) => index,
            None => {
                self.slots.push(Slot {
                    name: name.to_string(),
                    numeric,
                });
                self.index.insert(key, self.slots.len() - 1);
                self.slots.len() - 1
            }
        };
        variable(index)
    }

    fn pattern(&mut self, elements: &[Element], pound: Option<&str>, depth: usize, out: &mut String) {
        if elements.is_empty() {
            out.push_str("{ \"\" }");
            return;
        }

        for element in elements {
            match element {
                Element::Text { value } => push_literal(out, value),
                Element::Argument { name } | Element::Number { name } => {
                    let var = self.slot(name, false);
                    let _ = write!(out, "{{ ${var} }}");
                }
                Element::Pound => match pound {
                    Some(var) => {
                        let _ = write!(out, "{{ ${var} }}");
                    }
                    None => push_literal(out, "#"),
                },
                Element::Plural { name, branches } => {
                    let selector = self.slot(name, true);
                    let display = self.slot(name, false);
                    self.select(&selector, branches, Some(&display), depth, out);
                }
                Element::Select { name, branches } => {
                    let var = self.slot(name, false);
                    self.select(&var, branches, pound, depth, out);
                }
            }
        }
    }

    fn select(&mut self, var: &str, branches: &[Branch], pound: Option<&str>, depth: usize, out: &mut String) {
        let indent = "    ".repeat(depth);
        let _ = write!(out, "{{ ${var} ->");

        for branch in branches {
            let marker = if branch.key.is_other() { "*" } else { " " };
            let key = match &branch.key {
                BranchKey::Exact(number) => number.as_str(),
                BranchKey::Named(name) => name.as_str(),
            };
            let _ = write!(out, "\n{indent}{marker}[{key}] ");
            self.pattern(&branch.body, pound, depth + 1, out);
        }

        let _ = write!(out, "\n{indent}}}");
    }
}

fn push_literal(out: &mut String, text: &str) {
    out.push_str("{ \"");
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04X}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out.push_str("\" }");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params;
    use crate::syntax::{MessageParser, TemplateParser};

    fn compile(source: &str, locale: &str) -> Arc<dyn Formatter> {
        let parsed = MessageParser.parse(source).unwrap();
        FluentCompiler
            .compile(&parsed, &Locale::parse(locale).unwrap())
            .unwrap()
    }

    #[test]
    fn test_lowering_of_simple_template() {
        let parsed = MessageParser.parse("Hi {name}!").unwrap();
        let (source, slots) = lower(&parsed);
        assert_eq!(source, "template = { \"Hi \" }{ $a0 }{ \"!\" }\n");
        assert_eq!(slots.len(), 1);
        assert!(!slots[0].numeric);
    }

    #[test]
    fn test_lowering_escapes_literals() {
        let mut out = String::new();
        push_literal(&mut out, "say \"hi\"\\\n");
        assert_eq!(out, r#"{ "say \"hi\"\\\u000A" }"#);
    }

    #[test]
    fn test_render_argument() {
        let formatter = compile("Hello, {name}!", "en");
        assert_eq!(formatter.render(&params! { "name" => "Sam" }), "Hello, Sam!");
    }

    #[test]
    fn test_render_keeps_whitespace_and_braces() {
        let formatter = compile("  '{'{a}'}'  \n next", "en");
        assert_eq!(formatter.render(&params! { "a" => "x" }), "  {x}  \n next");
    }

    #[test]
    fn test_render_empty_template() {
        assert_eq!(compile("", "en").render(&Params::new()), "");
    }

    #[test]
    fn test_render_missing_parameter() {
        let formatter = compile("Hello, {name}!", "en");
        assert_eq!(formatter.render(&Params::new()), "Hello, {name}!");
    }

    #[test]
    fn test_render_plural_english() {
        let formatter = compile("{count, plural, =0 {No files} one {# file} other {# files}}", "en");
        assert_eq!(formatter.render(&params! { "count" => 0 }), "No files");
        assert_eq!(formatter.render(&params! { "count" => 1 }), "1 file");
        assert_eq!(formatter.render(&params! { "count" => 7 }), "7 files");
    }

    #[test]
    fn test_lowering_of_plural_uses_separate_display_slot() {
        let parsed = MessageParser.parse("{n, plural, other {# left}}").unwrap();
        let (source, slots) = lower(&parsed);
        assert_eq!(source, "template = { $a0 ->\n    *[other] { $a1 }{ \" left\" }\n    }\n");
        assert!(slots[0].numeric);
        assert!(!slots[1].numeric);
    }

    #[test]
    fn test_render_large_numbers_verbatim() {
        let big = "12345678901234567890";
        let plural = compile("{n, plural, one {# item} other {# items}}", "en");
        assert_eq!(plural.render(&params! { "n" => big }), format!("{big} items"));

        let number = compile("Total: {n, number}", "en");
        assert_eq!(number.render(&params! { "n" => big }), format!("Total: {big}"));
        assert_eq!(plural.render(&params! { "n" => "1.50" }), "1.50 items");
    }

    #[test]
    fn test_render_plural_uses_locale_rules() {
        let formatter = compile("{count, plural, one {# fichier} other {# fichiers}}", "fr");
        assert_eq!(formatter.render(&params! { "count" => 0 }), "0 fichier");
        assert_eq!(formatter.render(&params! { "count" => 2 }), "2 fichiers");
    }

    #[test]
    fn test_render_select_with_nested_plural() {
        let formatter = compile(
            "{who, select, me {You have {n, plural, one {# task} other {# tasks}}} other {{who} has # tasks}}",
            "en",
        );
        assert_eq!(formatter.render(&params! { "who" => "me", "n" => 1 }), "You have 1 task");
        assert_eq!(formatter.render(&params! { "who" => "Ana", "n" => 3 }), "Ana has # tasks");
    }

    #[test]
    fn test_render_select_falls_back_to_other() {
        let formatter = compile("{g, select, female {her} male {his} other {their}}", "en");
        assert_eq!(formatter.render(&params! { "g" => "female" }), "her");
        assert_eq!(formatter.render(&params! { "g" => "unknown" }), "their");
    }

    #[test]
    fn test_parameter_names_need_not_be_identifiers() {
        let formatter = compile("{0} and {user-name.first}", "en");
        assert_eq!(
            formatter.render(&params! { "0" => "zero", "user-name.first" => "Ana" }),
            "zero and Ana"
        );
    }
}
