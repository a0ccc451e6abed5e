use indexmap::IndexMap;
use oxc_ast::ast::*;

use super::ParseError;
use crate::signature::{format_function, ExportEntry};

/// Exported name to completion entry, in declaration order.
pub type ModuleExportMap = IndexMap<String, ExportEntry>;

/// Walks the top-level statements of a parsed module and collects its named
/// exports.
///
/// Only `export function ...` and `export const/let/var ...` contribute.
/// Default exports, `export *`, re-exports and class exports are ignored.
pub fn extract_exports(program: &Program, module_name: &str) -> Result<ModuleExportMap, ParseError> {
    let mut exports = ModuleExportMap::new();

    for stmt in &program.body {
        match stmt {
            Statement::ExportNamedDeclaration(decl) => {
                if let Some(declaration) = &decl.declaration {
                    collect_declaration(declaration, module_name, &mut exports)?;
                }
            }
            _ => {}
        }
    }

    Ok(exports)
}

fn collect_declaration(
    declaration: &Declaration,
    module_name: &str,
    exports: &mut ModuleExportMap,
) -> Result<(), ParseError> {
    match declaration {
        Declaration::FunctionDeclaration(func) => {
            if let Some(id) = &func.id {
                let name = id.name.to_string();
                let entry = format_function(module_name, &name, &param_names(&func.params));
                exports.insert(name, entry);
            }
        }
        Declaration::VariableDeclaration(var_decl) => {
            for declarator in &var_decl.declarations {
                let BindingPatternKind::BindingIdentifier(id) = &declarator.id.kind else {
                    return Err(ParseError::UnsupportedExport {
                        module: module_name.to_string(),
                        detail: "destructuring binding in exported declaration".to_string(),
                    });
                };
                let name = id.name.to_string();

                let entry = match &declarator.init {
                    Some(Expression::ArrowFunctionExpression(arrow)) => {
                        format_function(module_name, &name, &param_names(&arrow.params))
                    }
                    _ => ExportEntry::value(module_name, &name),
                };
                exports.insert(name, entry);
            }
        }
        _ => {}
    }

    Ok(())
}

/// Names of the parameters that can be shown as placeholders.
///
/// Plain identifiers and identifiers with a default value are kept. Object and
/// array patterns and the rest parameter are dropped, so the resulting list can
/// be shorter than the real signature.
fn param_names<'p>(params: &'p FormalParameters<'_>) -> Vec<&'p str> {
    let mut names = Vec::new();

    for param in &params.items {
        match &param.pattern.kind {
            BindingPatternKind::BindingIdentifier(id) => names.push(id.name.as_str()),
            BindingPatternKind::AssignmentPattern(assign) => {
                if let BindingPatternKind::BindingIdentifier(id) = &assign.left.kind {
                    names.push(id.name.as_str());
                }
            }
            BindingPatternKind::ObjectPattern(_) | BindingPatternKind::ArrayPattern(_) => {}
        }
    }

    names
}

#[cfg(test)]
mod tests {
    use super::super::parse_module_exports;
    use super::*;

    fn exports_of(source: &str) -> ModuleExportMap {
        parse_module_exports(source, "mod.js").unwrap()
    }

    #[test]
    fn test_function_with_default_param() {
        let exports = exports_of("export function add(a, b = 1) { return a + b; }");
        let entry = &exports["add"];
        assert_eq!(entry.display_label, "add(a, b)\tmod.js");
        assert_eq!(entry.insertion_template, "add(${1:a}, ${2:b})");
    }

    #[test]
    fn test_constant_export() {
        let exports = exports_of("export const PI = 3.14;");
        let entry = &exports["PI"];
        assert_eq!(entry.display_label, "PI\tmod.js");
        assert_eq!(entry.insertion_template, "PI");
    }

    #[test]
    fn test_arrow_function_export() {
        let exports = exports_of("export const scale = (v, factor = 2) => v * factor;");
        let entry = &exports["scale"];
        assert_eq!(entry.display_label, "scale(v, factor)\tmod.js");
        assert_eq!(entry.insertion_template, "scale(${1:v}, ${2:factor})");
    }

    #[test]
    fn test_function_expression_is_not_callable() {
        let exports = exports_of("export const twice = function (x) { return x * 2; };");
        assert_eq!(exports["twice"].insertion_template, "twice");
    }

    #[test]
    fn test_destructured_param_is_skipped() {
        let exports = exports_of("export function f({ x, y }) {}");
        let entry = &exports["f"];
        assert_eq!(entry.display_label, "f()\tmod.js");
        assert_eq!(entry.insertion_template, "f()");
    }

    #[test]
    fn test_rest_and_array_params_are_skipped() {
        let exports = exports_of("export function g(a, [b, c], ...rest) {}");
        assert_eq!(exports["g"].display_label, "g(a)\tmod.js");
        assert_eq!(exports["g"].insertion_template, "g(${1:a})");
    }

    #[test]
    fn test_defaulted_destructuring_is_skipped() {
        let exports = exports_of("export const h = ({ a } = {}, b) => a + b;");
        assert_eq!(exports["h"].insertion_template, "h(${1:b})");
    }

    #[test]
    fn test_multiple_declarators() {
        let exports = exports_of("export let a = 1, b = () => a;");
        assert_eq!(exports["a"].insertion_template, "a");
        assert_eq!(exports["b"].insertion_template, "b()");
    }

    #[test]
    fn test_ignored_statements() {
        let exports = exports_of(r#"
            import * as other from './other.js';
            export default function main() {}
            export * from './all.js';
            export { helper } from './helper.js';
            export class Shape {}
            function local() {}
            const hidden = 1;
        "#);
        assert!(exports.is_empty());
    }

    #[test]
    fn test_declaration_order_is_kept() {
        let exports = exports_of(r#"
            export const zeta = 1;
            export function alpha() {}
            export const mid = () => {};
        "#);
        let names: Vec<_> = exports.keys().map(String::as_str).collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_async_and_generator_functions() {
        let exports = exports_of(r#"
            export async function load(url) {}
            export function* ids(start) {}
        "#);
        assert_eq!(exports["load"].insertion_template, "load(${1:url})");
        assert_eq!(exports["ids"].insertion_template, "ids(${1:start})");
    }

    #[test]
    fn test_destructured_declarator_is_rejected() {
        let err = parse_module_exports("export const { a, b } = obj;", "mod.js").unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedExport { .. }));
    }
}
