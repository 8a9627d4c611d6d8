//! CLI command implementations.

use anyhow::{Context, Result};
use buildmatrix_config::{ConfigDocument, ConfigResult, EvalContext, evaluate};
use buildmatrix_core::{BuildDescriptor, MemoryRegistrar, ResolvingRegistrar};
use std::io::Write;
use std::path::Path;
use tracing::info;

pub fn eval_context(cc: Option<String>) -> EvalContext {
    match cc {
        Some(cc) if !cc.trim().is_empty() => EvalContext::new().with_cc(cc.trim()),
        _ => EvalContext::new(),
    }
}

fn load_document(path: Option<&Path>) -> ConfigResult<ConfigDocument> {
    match path {
        Some(path) => buildmatrix_config::load_document(path),
        None => buildmatrix_config::default_document(),
    }
}

pub fn load(path: Option<&Path>) -> Result<ConfigDocument> {
    load_document(path).with_context(|| match path {
        Some(path) => format!("failed to load build matrix {}", path.display()),
        None => "failed to load built-in build matrix".to_string(),
    })
}

/// Load and resolve every build. Returns whether the matrix is valid.
pub fn validate(path: Option<&Path>, ctx: &EvalContext, out: &mut impl Write) -> Result<bool> {
    let result = load_document(path).and_then(|doc| buildmatrix_config::resolve_all(&doc, ctx));
    match result {
        Ok(builds) => {
            writeln!(out, "Configuration is valid ({} builds)", builds.len())?;
            Ok(true)
        }
        Err(e) => {
            writeln!(out, "Configuration error: {}", e)?;
            Ok(false)
        }
    }
}

pub fn list(doc: &ConfigDocument, out: &mut impl Write) -> Result<()> {
    for name in doc.build_names() {
        writeln!(out, "{}", name)?;
    }
    Ok(())
}

pub fn show(
    doc: &ConfigDocument,
    ctx: &EvalContext,
    name: &str,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let build = buildmatrix_config::resolve_one(doc, ctx, name)?;
    if json {
        writeln!(out, "{}", build.to_json()?)?;
    } else {
        write!(out, "{}", build.to_human())?;
    }
    Ok(())
}

pub fn plan(
    doc: &ConfigDocument,
    ctx: &EvalContext,
    gem_root: Option<&Path>,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let builds: Vec<BuildDescriptor> = match gem_root {
        Some(root) => {
            info!(gem_root = %root.display(), "Resolving core gems");
            let mut registrar = ResolvingRegistrar::new(root, MemoryRegistrar::new());
            evaluate(doc, ctx, &mut registrar)?;
            registrar.into_inner().into_builds()
        }
        None => buildmatrix_config::resolve_all(doc, ctx)?,
    };

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&builds)?)?;
        return Ok(());
    }

    for (i, build) in builds.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        write!(out, "{}", build.to_human())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> Result<()>,
    {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_eval_context_ignores_blank_cc() {
        assert!(eval_context(Some("  ".to_string())).cc_override.is_none());
        assert!(eval_context(None).cc_override.is_none());
        assert_eq!(
            eval_context(Some("gcc".to_string())).cc_override.as_deref(),
            Some("gcc")
        );
    }

    #[test]
    fn test_list_default_builds() {
        let doc = load(None).unwrap();
        let output = run(|out| list(&doc, out));
        assert_eq!(output, "host\nhost-nan\nhost++-word\n");
    }

    #[test]
    fn test_validate_default() {
        let mut out = Vec::new();
        assert!(validate(None, &EvalContext::new(), &mut out).unwrap());
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Configuration is valid (3 builds)\n"
        );
    }

    #[test]
    fn test_validate_reports_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("builds.kdl");
        std::fs::write(&path, "builds { a; a }").unwrap();

        let mut out = Vec::new();
        assert!(!validate(Some(path.as_path()), &EvalContext::new(), &mut out).unwrap());
        assert!(
            String::from_utf8(out)
                .unwrap()
                .starts_with("Configuration error: duplicate definition")
        );
    }

    #[test]
    fn test_show_json() {
        let doc = load(None).unwrap();
        let output = run(|out| show(&doc, &EvalContext::new(), "host-nan", true, out));
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["name"], "host-nan");
        assert_eq!(value["defines"][0], "MRB_NAN_BOXING");
        assert_eq!(value["build_dir"], "build/host-nan");
    }

    #[test]
    fn test_show_unknown_build() {
        let doc = load(None).unwrap();
        let mut out = Vec::new();
        assert!(show(&doc, &EvalContext::new(), "nope", false, &mut out).is_err());
    }

    #[test]
    fn test_plan_human() {
        let doc = load(None).unwrap();
        let output = run(|out| plan(&doc, &EvalContext::new(), None, false, out));
        assert!(output.starts_with("host (build/host)"));
        assert!(output.contains("\n\nhost-nan (build/host-nan)"));
        assert!(output.contains("host++-word (build/host++-word)"));
    }

    #[test]
    fn test_plan_with_missing_gem_root() {
        let doc = load(None).unwrap();
        let root = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        let err = plan(&doc, &EvalContext::new(), Some(root.path()), true, &mut out)
            .unwrap_err();
        assert!(err.to_string().contains("mruby-sprintf"));
        assert!(out.is_empty());
    }

    #[test]
    fn test_plan_with_gem_root() {
        let doc = load(None).unwrap();
        let root = tempfile::tempdir().unwrap();
        for gem in [
            "mruby-sprintf",
            "mruby-print",
            "mruby-bin-mrbc",
            "mruby-bin-mirb",
            "mruby-bin-mruby",
            "mruby-io",
        ] {
            std::fs::create_dir(root.path().join(gem)).unwrap();
        }

        let output = run(|out| plan(&doc, &EvalContext::new(), Some(root.path()), true, out));
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 3);
        assert_eq!(value[2]["cxx_abi"], true);
    }
}
