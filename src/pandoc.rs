//! Conversion invocation
//!
//! Builds the pandoc argument list from the resolved configuration and runs
//! it. Only the exit status is interpreted; pandoc's own diagnostics go
//! straight to the user.

use crate::config::Config;
use crate::error::{PublishError, Result};
use crate::process::ToolRunner;

/// MultiMarkdown extensions enabled on the pandoc reader
pub const INPUT_EXTENSIONS: &[&str] = &[
    "auto_identifiers",
    "implicit_header_references",
    "yaml_metadata_block",
    "citations",
    "implicit_figures",
    "header_attributes",
    "pipe_tables",
    "grid_tables",
    "multiline_tables",
    "table_captions",
    "strikeout",
    "footnotes",
    "inline_notes",
    "tex_math_dollars",
    "superscript",
    "subscript",
    "raw_tex",
    "definition_lists",
    "fancy_lists",
    "example_lists",
    "startnum",
    "fenced_code_blocks",
    "fenced_code_attributes",
    "link_attributes",
];

/// The `-f` value: base reader plus every enabled extension
pub fn input_format() -> String {
    let mut format = String::from("markdown_mmd");
    for ext in INPUT_EXTENSIONS {
        format.push('+');
        format.push_str(ext);
    }
    format
}

/// Build the full pandoc argument list.
///
/// `version` is the reconciled version string passed into the template as
/// document metadata; `None` leaves the metadata out entirely.
pub fn build_args(config: &Config, version: Option<&str>) -> Vec<String> {
    let mut args = vec![
        "-o".to_string(),
        config.target_path.to_string_lossy().into_owned(),
        "-f".to_string(),
        input_format(),
        "--data-dir".to_string(),
        config.base_dir.to_string_lossy().into_owned(),
        "--filter".to_string(),
        "pandoc-citeproc".to_string(),
    ];

    if let Some(bib) = &config.bibliography {
        args.push("--bibliography".to_string());
        args.push(bib.to_string_lossy().into_owned());
    }

    if let Some(version) = version {
        args.push("-M".to_string());
        args.push(format!("version={}", version));
    }

    let template_flag = if config.format.uses_reference_doc() {
        "--reference-docx"
    } else {
        "--template"
    };
    args.push(template_flag.to_string());
    args.push(config.template_path.to_string_lossy().into_owned());

    args.push("--number-sections".to_string());
    args.push("--top-level-division=chapter".to_string());
    args.push("--smart".to_string());

    // Unrecognized command-line options pass through verbatim
    args.extend(config.passthrough.iter().cloned());

    args.push(config.source_path.to_string_lossy().into_owned());
    args
}

/// Run pandoc. A non-zero exit means the sources contain errors; the exit
/// code is reported and nothing gets pushed or opened.
pub fn convert<R: ToolRunner>(runner: &mut R, config: &Config, version: Option<&str>) -> Result<()> {
    let args = build_args(config, version);
    let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
    let result = runner.run("pandoc", &arg_refs)?;
    if result.success() {
        Ok(())
    } else {
        Err(PublishError::conversion(format!(
            "pandoc returned {}",
            result.code
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CliOverrides, Config, Defaults, OutputFormat};
    use crate::process::ScriptedRunner;
    use std::fs;

    fn config_for(format: OutputFormat, bib: Option<&str>) -> (tempfile::TempDir, Config) {
        let td = tempfile::TempDir::new().unwrap();
        fs::create_dir_all(td.path().join("src/docs")).unwrap();
        fs::create_dir_all(td.path().join("templates")).unwrap();
        fs::write(td.path().join("src/docs/thesis.mmd"), "x").unwrap();
        fs::write(td.path().join("templates/pandoc-docstyle.docx"), b"x").unwrap();
        fs::write(td.path().join("templates/pandoc-docstyle.tex"), b"x").unwrap();

        let args = CliOverrides {
            source: "thesis".to_string(),
            format,
            bib: bib.map(str::to_string),
            passthrough: vec!["--toc".to_string()],
            ..CliOverrides::default()
        };
        let config = Config::resolve(args, &Defaults::default(), td.path().to_path_buf()).unwrap();
        (td, config)
    }

    #[test]
    fn test_input_format_lists_extensions() {
        let format = input_format();
        assert!(format.starts_with("markdown_mmd+auto_identifiers"));
        assert!(format.contains("+citations"));
        assert!(format.ends_with("+link_attributes"));
    }

    #[test]
    fn test_docx_uses_reference_doc() {
        let (_td, config) = config_for(OutputFormat::Docx, None);
        let args = build_args(&config, Some("v1.3-0"));
        assert!(args.contains(&"--reference-docx".to_string()));
        assert!(!args.contains(&"--template".to_string()));
        assert!(args.contains(&"version=v1.3-0".to_string()));
    }

    #[test]
    fn test_pdf_uses_template() {
        let (_td, config) = config_for(OutputFormat::Pdf, None);
        let args = build_args(&config, None);
        assert!(args.contains(&"--template".to_string()));
        assert!(!args.iter().any(|a| a.starts_with("version=")));
    }

    #[test]
    fn test_bibliography_flag_only_when_given() {
        let (_td, config) = config_for(OutputFormat::Docx, Some("references"));
        let args = build_args(&config, None);
        let at = args.iter().position(|a| a == "--bibliography").unwrap();
        assert!(args[at + 1].ends_with("references.bib"));

        let (_td, config) = config_for(OutputFormat::Docx, None);
        assert!(!build_args(&config, None).contains(&"--bibliography".to_string()));
    }

    #[test]
    fn test_passthrough_precedes_source() {
        let (_td, config) = config_for(OutputFormat::Docx, None);
        let args = build_args(&config, None);
        let toc = args.iter().position(|a| a == "--toc").unwrap();
        assert_eq!(toc, args.len() - 2);
        assert!(args[args.len() - 1].ends_with("thesis.mmd"));
    }

    #[test]
    fn test_convert_reports_exit_code() {
        let (_td, config) = config_for(OutputFormat::Docx, None);
        let mut runner = ScriptedRunner::new();
        runner.enqueue_err(43, "pandoc: citeproc error");
        let err = convert(&mut runner, &config, None).unwrap_err();
        assert!(err.to_string().contains("43"));
    }

    #[test]
    fn test_convert_success() {
        let (_td, config) = config_for(OutputFormat::Docx, None);
        let mut runner = ScriptedRunner::new();
        runner.enqueue_ok("");
        assert!(convert(&mut runner, &config, Some("v1.3-0")).is_ok());
        assert!(runner.saw("pandoc"));
    }
}
