//! Build script for karma-i18n.
//!
//! Validates every Fluent locale file at compile time:
//! - Fluent syntax is valid
//! - every locale defines the same message keys
//! - every message uses the same variables in every locale

use std::collections::{BTreeMap, BTreeSet};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use fluent_syntax::ast::{Entry, Expression, InlineExpression, Pattern, PatternElement};
use fluent_syntax::parser::parse;

type MessageParams = BTreeMap<String, BTreeSet<String>>;

const RESOURCE_FILE: &str = "karma.ftl";

fn collect_pattern_params(pattern: &Pattern<&str>, params: &mut BTreeSet<String>) {
    for element in &pattern.elements {
        if let PatternElement::Placeable { expression } = element {
            collect_expression_params(expression, params);
        }
    }
}

fn collect_expression_params(expression: &Expression<&str>, params: &mut BTreeSet<String>) {
    match expression {
        Expression::Select { selector, variants } => {
            collect_inline_params(selector, params);
            for variant in variants {
                collect_pattern_params(&variant.value, params);
            }
        }
        Expression::Inline(inline) => collect_inline_params(inline, params),
    }
}

fn collect_inline_params(expression: &InlineExpression<&str>, params: &mut BTreeSet<String>) {
    match expression {
        InlineExpression::VariableReference { id } => {
            params.insert(id.name.to_string());
        }
        InlineExpression::FunctionReference { arguments, .. } => {
            for arg in &arguments.positional {
                collect_inline_params(arg, params);
            }
            for arg in &arguments.named {
                collect_inline_params(&arg.value, params);
            }
        }
        InlineExpression::Placeable { expression } => collect_expression_params(expression, params),
        InlineExpression::MessageReference { .. }
        | InlineExpression::TermReference { .. }
        | InlineExpression::StringLiteral { .. }
        | InlineExpression::NumberLiteral { .. } => {}
    }
}

fn validate_locale_file(path: &Path) -> Result<MessageParams, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    let resource = parse(content.as_str())
        .map_err(|(_, errors)| format!("{}: {} parse error(s): {errors:?}", path.display(), errors.len()))?;

    let mut messages = MessageParams::new();
    for entry in &resource.body {
        if let Entry::Message(message) = entry {
            let mut params = BTreeSet::new();
            if let Some(value) = &message.value {
                collect_pattern_params(value, &mut params);
            }
            for attribute in &message.attributes {
                collect_pattern_params(&attribute.value, &mut params);
            }
            messages.insert(message.id.name.to_string(), params);
        }
    }
    Ok(messages)
}

fn find_locale_files(locales_dir: &Path) -> Result<BTreeMap<String, PathBuf>, String> {
    let mut files = BTreeMap::new();
    let entries = fs::read_dir(locales_dir)
        .map_err(|e| format!("failed to read {}: {e}", locales_dir.display()))?;
    for entry in entries {
        let path = entry.map_err(|e| format!("failed to read directory entry: {e}"))?.path();
        let resource = path.join(RESOURCE_FILE);
        if path.is_dir() && resource.exists() {
            let locale = path
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| format!("invalid locale directory {}", path.display()))?;
            files.insert(locale.to_string(), resource);
        }
    }
    if files.is_empty() {
        return Err(format!("no {RESOURCE_FILE} files under {}", locales_dir.display()));
    }
    Ok(files)
}

fn validate_locales() -> Result<(), String> {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").map_err(|_| "CARGO_MANIFEST_DIR not set")?;
    let locales_dir = Path::new(&manifest_dir).join("locales");
    println!("cargo:rerun-if-changed={}", locales_dir.display());

    let mut catalogues = BTreeMap::new();
    for (locale, path) in find_locale_files(&locales_dir)? {
        println!("cargo:rerun-if-changed={}", path.display());
        catalogues.insert(locale, validate_locale_file(&path)?);
    }

    let mut problems = Vec::new();
    let mut iter = catalogues.iter();
    if let Some((reference_locale, reference)) = iter.next() {
        for (locale, messages) in iter {
            for (key, params) in reference {
                match messages.get(key) {
                    None => problems.push(format!("{locale}: missing '{key}' (present in {reference_locale})")),
                    Some(found) if found != params => problems.push(format!(
                        "{locale}: '{key}' uses {found:?}, {reference_locale} uses {params:?}"
                    )),
                    Some(_) => {}
                }
            }
            for key in messages.keys().filter(|k| !reference.contains_key(*k)) {
                problems.push(format!("{locale}: extra message '{key}'"));
            }
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems.join("\n"))
    }
}

fn main() {
    if let Err(e) = validate_locales() {
        eprintln!("Locale validation failed:\n{e}");
        process::exit(1);
    }
}
