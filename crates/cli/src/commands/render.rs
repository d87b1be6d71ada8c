//! `render` command implementation.

use anyhow::{Context, Result};
use contracts::RenderOptions;
use doc_loader::DocumentLoader;
use tracing::info;

use crate::cli::RenderArgs;
use crate::error::{ensure_exists, CliError};

/// Execute the `render` command
pub fn run_render(args: &RenderArgs) -> Result<()> {
    info!(files = args.files.len(), "Rendering declaration file");

    let rendered = render_files(args)?;

    if let Some(golden) = &args.check {
        ensure_exists(golden)?;
        let expected = std::fs::read_to_string(golden)
            .with_context(|| format!("Failed to read golden file {}", golden.display()))?;
        check_golden(&golden.display().to_string(), &expected, &rendered)?;
        info!(golden = %golden.display(), "Output matches golden file");
        return Ok(());
    }

    match &args.out {
        Some(out) => {
            std::fs::write(out, &rendered)
                .with_context(|| format!("Failed to write {}", out.display()))?;
            info!(out = %out.display(), bytes = rendered.len(), "Declaration file written");
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

fn render_files(args: &RenderArgs) -> Result<String, CliError> {
    for path in &args.files {
        ensure_exists(path)?;
    }

    let mut options = match &args.options {
        Some(path) => {
            ensure_exists(path)?;
            DocumentLoader::load_render_options(path)?
        }
        None => RenderOptions::default(),
    };
    if let Some(name) = &args.module_name {
        options.module_name = name.clone();
    }

    let batch = DocumentLoader::load_batch(&args.files)?;
    let rendered = interop_engine::render_batch(&batch, &options)
        .map_err(contracts::ContractError::from)?;

    Ok(rendered)
}

/// Compare line by line; report the first line that differs
fn check_golden(path: &str, expected: &str, actual: &str) -> Result<(), CliError> {
    if expected == actual {
        return Ok(());
    }

    let mut expected_lines = expected.lines();
    let mut actual_lines = actual.lines();
    let mut line = 1;

    loop {
        match (expected_lines.next(), actual_lines.next()) {
            (Some(e), Some(a)) if e == a => line += 1,
            (None, None) => {
                // Same lines, different trailing newline
                return Err(CliError::golden_mismatch(
                    path,
                    line,
                    "<end of file>",
                    "<end of file, trailing newline differs>",
                ));
            }
            (e, a) => {
                return Err(CliError::golden_mismatch(
                    path,
                    line,
                    e.unwrap_or("<end of file>"),
                    a.unwrap_or("<end of file>"),
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::{Path, PathBuf};

    fn write_doc(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    fn render_args(files: Vec<PathBuf>) -> RenderArgs {
        RenderArgs {
            files,
            out: None,
            options: None,
            module_name: None,
            check: None,
        }
    }

    const MAIN: &str = r#"
namespace = "Main"

[[ports]]
name = "newJwt"
direction = "subscribe"
value = { kind = "string" }
"#;

    #[test]
    fn test_render_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(dir.path(), "main.toml", MAIN);

        let rendered = render_files(&render_args(vec![path])).unwrap();
        assert!(rendered.contains("declare module Elm {"));
        assert!(rendered.contains("namespace Main {"));
        assert!(rendered.contains("newJwt: {"));
    }

    #[test]
    fn test_module_name_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(dir.path(), "main.toml", MAIN);
        let options = write_doc(dir.path(), "options.toml", "module_name = \"App\"\n");

        let mut args = render_args(vec![path]);
        args.options = Some(options);
        assert!(render_files(&args).unwrap().contains("declare module App {"));

        args.module_name = Some("Other".to_string());
        assert!(render_files(&args).unwrap().contains("declare module Other {"));
    }

    #[test]
    fn test_render_invalid_document_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(dir.path(), "main.toml", "namespace = \"1Main\"\n");

        let err = render_files(&render_args(vec![path])).unwrap_err();
        assert!(err.to_string().contains("failed validation"), "got: {err}");
    }

    #[test]
    fn test_check_golden_first_difference() {
        let err = check_golden("golden.d.ts", "a\nb\nc\n", "a\nx\nc\n").unwrap_err();
        match err {
            CliError::GoldenMismatch {
                line,
                expected,
                actual,
                ..
            } => {
                assert_eq!(line, 2);
                assert_eq!(expected, "b");
                assert_eq!(actual, "x");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_check_golden_trailing_lines() {
        assert!(check_golden("g", "a\n", "a\n").is_ok());

        let err = check_golden("g", "a\nb\n", "a\n").unwrap_err();
        assert!(matches!(err, CliError::GoldenMismatch { line: 2, .. }));

        let err = check_golden("g", "a\n", "a").unwrap_err();
        assert!(matches!(err, CliError::GoldenMismatch { line: 2, .. }));
    }
}
