//! Template registry: one entry per supported [`Language`].
//!
//! | Language   | Runtime match  | Output file        |
//! |------------|----------------|--------------------|
//! | Node       | `*node*`       | `<name>.js`        |
//! | TypeScript | `*typescript*` | `<name>.ts`        |
//!
//! Supporting another language means adding a template file and a row to
//! [`REGISTRY`]; discovery and orchestration pick it up from here.

use std::fmt;

use recap_core::types::Language;

/// Placeholder replaced with the handler's module path.
pub const RELATIVE_PATH_PLACEHOLDER: &str = "RELATIVE_PATH";
/// Placeholder replaced with the handler's exported method (import and export).
pub const METHOD_PLACEHOLDER: &str = "METHOD";

/// Static template data for one language.
#[derive(Clone, Copy)]
pub struct TemplateEntry {
    pub language: Language,
    /// Wrapper source with [`RELATIVE_PATH_PLACEHOLDER`] and [`METHOD_PLACEHOLDER`].
    pub template: &'static str,
    /// Maps a wrapper base name to the file name written on disk.
    pub file_name: fn(&str) -> String,
}

impl fmt::Debug for TemplateEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateEntry")
            .field("language", &self.language)
            .field("template", &self.template)
            .finish_non_exhaustive()
    }
}

fn js_file_name(name: &str) -> String {
    format!("{name}.js")
}

fn ts_file_name(name: &str) -> String {
    format!("{name}.ts")
}

/// Registered languages in match order: the first entry whose tag occurs in a
/// runtime string classifies that runtime.
pub const REGISTRY: &[TemplateEntry] = &[
    TemplateEntry {
        language: Language::Node,
        template: include_str!("templates/node.js.tpl"),
        file_name: js_file_name,
    },
    TemplateEntry {
        language: Language::TypeScript,
        template: include_str!("templates/typescript.ts.tpl"),
        file_name: ts_file_name,
    },
];

/// Template entry for `language`, if one is registered.
pub fn template_for(language: Language) -> Option<&'static TemplateEntry> {
    REGISTRY.iter().find(|e| e.language == language)
}

/// Classify a runtime string (e.g. `nodejs18.x`). First registered match wins.
pub fn language_for_runtime(runtime: &str) -> Option<Language> {
    REGISTRY
        .iter()
        .map(|e| e.language)
        .find(|lang| runtime.contains(lang.tag()))
}

/// Languages in registry order.
pub fn supported_languages() -> impl Iterator<Item = Language> {
    REGISTRY.iter().map(|e| e.language)
}
