//! Wrapper rendering: placeholder substitution over registry templates.

use recap_core::types::FunctionDescriptor;

use crate::error::RenderError;
use crate::registry::{self, TemplateEntry, METHOD_PLACEHOLDER, RELATIVE_PATH_PLACEHOLDER};

/// Renders wrapper sources and names their files.
///
/// Stateless; all language knowledge lives in [`registry::REGISTRY`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// Wrapper source for `func`. Every placeholder occurrence is replaced.
    pub fn render(&self, func: &FunctionDescriptor) -> Result<String, RenderError> {
        let entry = entry_for(func)?;
        Ok(entry
            .template
            .replace(RELATIVE_PATH_PLACEHOLDER, &func.relative_path)
            .replace(METHOD_PLACEHOLDER, &func.method))
    }

    /// File name of the wrapper, e.g. `fnA-recap-dev.js`.
    pub fn output_file_name(&self, func: &FunctionDescriptor) -> Result<String, RenderError> {
        let entry = entry_for(func)?;
        Ok((entry.file_name)(&func.wrapper_base_name))
    }

    /// `(file name, source)` for `func`.
    pub fn render_file(&self, func: &FunctionDescriptor) -> Result<(String, String), RenderError> {
        Ok((self.output_file_name(func)?, self.render(func)?))
    }
}

fn entry_for(func: &FunctionDescriptor) -> Result<&'static TemplateEntry, RenderError> {
    registry::template_for(func.language).ok_or(RenderError::TemplateMissing {
        language: func.language,
        function: func.key.0.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use recap_core::types::{wrapper_base_name, FunctionKey, Language};

    fn descriptor(language: Language) -> FunctionDescriptor {
        let key = FunctionKey::from("fnA");
        FunctionDescriptor {
            wrapper_base_name: wrapper_base_name(&key),
            key,
            handler_reference: Some("src/foo.handler".into()),
            relative_path: "src/foo".into(),
            method: "handler".into(),
            runtime: "nodejs18.x".into(),
            language,
        }
    }

    #[test]
    fn node_wrapper_matches_fixed_text() {
        let out = Renderer::new().render(&descriptor(Language::Node)).unwrap();
        assert_eq!(
            out,
            "\n  const recap = require('@recap.dev/client')\n  const handler = require('../src/foo.js');\n\n  exports.handler = recap.wrapLambdaHandler(handler.handler);\n"
        );
    }

    #[test]
    fn typescript_wrapper_uses_static_import_without_extension() {
        let out = Renderer::new().render(&descriptor(Language::TypeScript)).unwrap();
        assert!(out.contains("import { handler as originalHandler } from '../src/foo'\n"));
        assert!(out.contains("export const handler = recap.wrapLambdaHandler(originalHandler)"));
        assert!(!out.contains("RELATIVE_PATH"));
        assert!(!out.contains("METHOD"));
    }

    #[test]
    fn file_name_differs_only_by_extension() {
        let r = Renderer::new();
        let js = r.output_file_name(&descriptor(Language::Node)).unwrap();
        let ts = r.output_file_name(&descriptor(Language::TypeScript)).unwrap();
        assert_eq!(js, "fnA-recap-dev.js");
        assert_eq!(ts, "fnA-recap-dev.ts");
    }

    #[test]
    fn render_file_pairs_name_and_source() {
        let (name, source) = Renderer::new().render_file(&descriptor(Language::Node)).unwrap();
        assert_eq!(name, "fnA-recap-dev.js");
        assert!(source.contains("exports.handler"));
    }
}
