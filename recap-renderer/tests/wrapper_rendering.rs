//! Wrapper rendering across registered languages.

use recap_core::types::{wrapper_base_name, FunctionDescriptor, FunctionKey, Language};
use recap_renderer::{registry::REGISTRY, Renderer};
use rstest::rstest;

fn descriptor(key: &str, relative_path: &str, method: &str, language: Language) -> FunctionDescriptor {
    let key = FunctionKey::from(key);
    FunctionDescriptor {
        wrapper_base_name: wrapper_base_name(&key),
        key,
        handler_reference: Some(format!("{relative_path}.{method}")),
        relative_path: relative_path.to_string(),
        method: method.to_string(),
        runtime: language.tag().to_string(),
        language,
    }
}

#[rstest]
#[case(Language::Node, "require('../src/foo.js')", "exports.handler = recap.wrapLambdaHandler(handler.handler)")]
#[case(Language::TypeScript, "from '../src/foo'\n", "export const handler = recap.wrapLambdaHandler(")]
fn wrapper_imports_module_and_exports_method(
    #[case] language: Language,
    #[case] import: &str,
    #[case] export: &str,
) {
    let out = Renderer::new()
        .render(&descriptor("fn", "src/foo", "handler", language))
        .expect("render");
    assert!(out.contains("@recap.dev/client"), "client import missing:\n{out}");
    assert!(out.contains(import), "import missing:\n{out}");
    assert!(out.contains(export), "export missing:\n{out}");
}

#[rstest]
#[case(Language::Node)]
#[case(Language::TypeScript)]
fn rendering_is_deterministic(#[case] language: Language) {
    let r = Renderer::new();
    let d = descriptor("fn", "lib/api.v2/users", "list", language);
    assert_eq!(r.render(&d).unwrap(), r.render(&d).unwrap());
    assert_eq!(r.output_file_name(&d).unwrap(), r.output_file_name(&d).unwrap());
}

#[test]
fn dotted_module_paths_are_kept_verbatim() {
    let out = Renderer::new()
        .render(&descriptor("fn", "lib/api.v2/users", "list", Language::Node))
        .unwrap();
    assert!(out.contains("require('../lib/api.v2/users.js')"));
    assert!(out.contains("exports.list = recap.wrapLambdaHandler(handler.list);"));
}

#[test]
fn file_names_share_stem_across_languages() {
    let r = Renderer::new();
    let stems: Vec<String> = REGISTRY
        .iter()
        .map(|e| {
            let name = r
                .output_file_name(&descriptor("orders", "x", "y", e.language))
                .unwrap();
            name.rsplit_once('.').unwrap().0.to_string()
        })
        .collect();
    assert!(stems.iter().all(|s| s == "orders-recap-dev"), "{stems:?}");
}
