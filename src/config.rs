use crate::category::BranchChoice;
use crate::error::{PublishError, Result};
use crate::version::VersionPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Target output formats of the conversion step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    Doc,
    #[default]
    Docx,
    Tex,
    Pdf,
}

impl OutputFormat {
    /// File extension of the produced document
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Doc => "doc",
            OutputFormat::Docx => "docx",
            OutputFormat::Tex => "tex",
            OutputFormat::Pdf => "pdf",
        }
    }

    /// Default extension of a compatible template file (pdf renders through
    /// a TeX template)
    pub fn template_extension(&self) -> &'static str {
        match self {
            OutputFormat::Doc => ".doc",
            OutputFormat::Docx => ".docx",
            OutputFormat::Tex | OutputFormat::Pdf => ".tex",
        }
    }

    /// Word output takes a reference document, everything else a template
    pub fn uses_reference_doc(&self) -> bool {
        matches!(self, OutputFormat::Doc | OutputFormat::Docx)
    }
}

fn default_template() -> String {
    "pandoc-docstyle".to_string()
}

fn default_template_dir() -> String {
    "templates".to_string()
}

fn default_source_dir() -> String {
    "src".to_string()
}

fn default_results_dir() -> String {
    "results".to_string()
}

fn default_branch() -> String {
    "master".to_string()
}

/// Project-independent defaults, overridable from a TOML file.
///
/// Looked up as `pandocpublish.toml` in the working directory, then
/// `.pandocpublish.toml` in the user config directory.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Defaults {
    #[serde(default = "default_template")]
    pub template: String,

    #[serde(default = "default_template_dir")]
    pub template_dir: String,

    #[serde(default = "default_source_dir")]
    pub source_dir: String,

    #[serde(default = "default_results_dir")]
    pub results_dir: String,

    #[serde(default = "default_branch")]
    pub branch: String,

    /// Remote base URLs offered by the one-time remote setup menu
    #[serde(default)]
    pub remote_candidates: Vec<String>,

    /// Never prompt for a remote; keep git local
    #[serde(default)]
    pub skip_remote_selection: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Defaults {
            template: default_template(),
            template_dir: default_template_dir(),
            source_dir: default_source_dir(),
            results_dir: default_results_dir(),
            branch: default_branch(),
            remote_candidates: Vec::new(),
            skip_remote_selection: false,
        }
    }
}

/// Load defaults from file or fall back to the built-ins.
///
/// Lookup order: explicit path, `./pandocpublish.toml`, then
/// `~/.config/.pandocpublish.toml`.
pub fn load_defaults(config_path: Option<&str>) -> std::result::Result<Defaults, Box<dyn std::error::Error>> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./pandocpublish.toml").exists() {
        fs::read_to_string("./pandocpublish.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".pandocpublish.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Defaults::default());
        }
    } else {
        return Ok(Defaults::default());
    };

    let defaults: Defaults = toml::from_str(&config_str)?;
    Ok(defaults)
}

/// Raw, unresolved command-line input
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub source: String,
    pub format: OutputFormat,
    pub message: Option<String>,
    pub level: Option<VersionPolicy>,
    pub checkout: Option<String>,
    pub template: Option<String>,
    pub template_dir: Option<String>,
    pub source_dir: Option<String>,
    pub results_dir: Option<String>,
    pub bib: Option<String>,
    pub project: Option<String>,
    pub passthrough: Vec<String>,
}

/// The validated, immutable configuration record for one build.
///
/// All relative paths are relative to `base_dir`; components never read
/// ambient global state.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_dir: PathBuf,
    pub project: String,
    pub format: OutputFormat,
    /// Source file name with inferred extension (e.g. `thesis.mmd`)
    pub source_file: String,
    /// Resolved source path relative to `base_dir`
    pub source_path: PathBuf,
    pub template_path: PathBuf,
    pub target_path: PathBuf,
    pub bibliography: Option<PathBuf>,
    pub message: Option<String>,
    pub level: Option<VersionPolicy>,
    pub branch_choice: BranchChoice,
    pub default_branch: String,
    pub remote_candidates: Vec<String>,
    pub skip_remote_selection: bool,
    pub passthrough: Vec<String>,
}

impl Config {
    /// Resolve CLI input and defaults into a validated configuration.
    ///
    /// Performs extension inference, path joins and the existence checks for
    /// the source and template files. Missing files are configuration
    /// errors: the run exits before any repository state is touched.
    pub fn resolve(args: CliOverrides, defaults: &Defaults, base_dir: PathBuf) -> Result<Config> {
        let source_file = with_extension(file_name(&args.source), ".mmd");

        let source_dir = args
            .source_dir
            .clone()
            .unwrap_or_else(|| defaults.source_dir.clone());
        let docs_dir = Path::new(&source_dir).join("docs");
        let bib_dir = Path::new(&source_dir).join("bib");

        // Scrivener mmd projects may introduce an extra compile folder named
        // after the source file.
        let direct = docs_dir.join(&source_file);
        let nested = docs_dir.join(&source_file).join(&source_file);
        let source_path = if base_dir.join(&direct).exists() {
            direct
        } else if base_dir.join(&nested).exists() {
            nested
        } else {
            return Err(PublishError::config(format!(
                "source file not found: {}",
                base_dir.join(&direct).display()
            )));
        };

        let template = args
            .template
            .clone()
            .unwrap_or_else(|| defaults.template.clone());
        let template_file = with_extension(&template, args.format.template_extension());
        let template_dir = args
            .template_dir
            .clone()
            .unwrap_or_else(|| defaults.template_dir.clone());
        let template_path = Path::new(&template_dir).join(&template_file);
        if !base_dir.join(&template_path).exists() {
            return Err(PublishError::config(format!(
                "template file not found: {}",
                base_dir.join(&template_path).display()
            )));
        }

        let bibliography = args
            .bib
            .as_deref()
            .map(|bib| bib_dir.join(with_extension(bib, ".bib")));

        let results_dir = args
            .results_dir
            .clone()
            .unwrap_or_else(|| defaults.results_dir.clone());
        let stem = match source_file.rsplit_once('.') {
            Some((stem, _)) => stem.to_string(),
            None => source_file.clone(),
        };
        let target_path =
            Path::new(&results_dir).join(format!("{}.{}", stem, args.format.extension()));

        let project = match args.project.clone() {
            Some(project) => project,
            None => base_dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "project".to_string()),
        };

        Ok(Config {
            base_dir,
            project,
            format: args.format,
            branch_choice: BranchChoice::from_arg(args.checkout.as_deref()),
            source_file,
            source_path,
            template_path,
            target_path,
            bibliography,
            message: args.message,
            level: args.level,
            default_branch: defaults.branch.clone(),
            remote_candidates: defaults.remote_candidates.clone(),
            skip_remote_selection: defaults.skip_remote_selection,
            passthrough: args.passthrough,
        })
    }

    /// True when the source is MultiMarkdown (metadata block applies)
    pub fn source_is_mmd(&self) -> bool {
        self.source_file.ends_with(".mmd")
    }
}

fn file_name(source: &str) -> &str {
    Path::new(source)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(source)
}

/// Append `default_ext` when `name` carries no extension of its own
fn with_extension(name: &str, default_ext: &str) -> String {
    if Path::new(name).extension().is_some() {
        name.to_string()
    } else {
        format!("{}{}", name, default_ext)
    }
}
