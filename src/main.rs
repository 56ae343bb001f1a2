use clap::Parser;

use pandoc_publish::cli;
use pandoc_publish::config::{CliOverrides, OutputFormat};
use pandoc_publish::ui;
use pandoc_publish::version::VersionPolicy;
use pandoc_publish::PublishError;

/// Version level incremented by this build
#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum Level {
    None,
    Minor,
    Major,
}

impl From<Level> for VersionPolicy {
    fn from(level: Level) -> Self {
        match level {
            Level::None => VersionPolicy::Retain,
            Level::Minor => VersionPolicy::Minor,
            Level::Major => VersionPolicy::Major,
        }
    }
}

#[derive(clap::Parser)]
#[command(
    name = "pandoc-publish",
    about = "Wrapper around pandoc that versions document sources through git",
    after_help = "Appended arguments are transferred 1-to-1 to pandoc, e.g. --toc.\n\
        Expected project structure relative to the working directory:\n\
        templates/ holds the style templates, src/docs/ the document sources,\n\
        src/bib/ bibliographies, src/images/ images, results/ the output."
)]
struct Args {
    /// The name of the source file; leaving out the extension assumes .mmd
    source: String,

    /// The target format
    #[arg(value_enum)]
    format: OutputFormat,

    /// Commit the current text with this message, tagged as a new minor
    /// version unless --level says otherwise
    #[arg(short = 'g', long = "git")]
    message: Option<String>,

    /// The version level to increment (requires --git <msg> unless 'none')
    #[arg(short, long, value_enum)]
    level: Option<Level>,

    /// Checkout this branch, overriding the category entry in the document
    /// metadata block; 0 skips branch handling entirely
    #[arg(short, long)]
    checkout: Option<String>,

    /// Style template file; without extension one compatible with the
    /// target format is assumed
    #[arg(short, long)]
    template: Option<String>,

    /// Directory holding the style template files
    #[arg(short = 'd', long = "template-dir")]
    template_dir: Option<String>,

    /// Directory holding the document sources
    #[arg(short = 's', long = "source-dir")]
    source_dir: Option<String>,

    /// Directory receiving the generated target file
    #[arg(short = 'r', long = "results-dir")]
    results_dir: Option<String>,

    /// Bibliography file, overriding the document metadata block; without
    /// extension assumes .bib
    #[arg(short, long)]
    bib: Option<String>,

    /// Project name holding the writing-tool sources; defaults to the name
    /// of the working directory
    #[arg(short, long)]
    project: Option<String>,

    /// Custom defaults file path
    #[arg(long)]
    config: Option<String>,

    /// Do not open the produced document in a viewer
    #[arg(long)]
    no_open: bool,

    /// Extra arguments passed through to pandoc verbatim
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    passthrough: Vec<String>,
}

fn main() {
    let args = Args::parse();

    let overrides = CliOverrides {
        source: args.source,
        format: args.format,
        message: args.message,
        level: args.level.map(VersionPolicy::from),
        checkout: args.checkout,
        template: args.template,
        template_dir: args.template_dir,
        source_dir: args.source_dir,
        results_dir: args.results_dir,
        bib: args.bib,
        project: args.project,
        passthrough: args.passthrough,
    };

    match cli::run_build_workflow(overrides, args.config.as_deref(), !args.no_open) {
        Ok(result) => {
            ui::display_success(&format!(
                "Done: {} at version {}",
                result.output.display(),
                result.version
            ));
        }
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            let code = e
                .downcast_ref::<PublishError>()
                .map(PublishError::exit_code)
                .unwrap_or(1);
            std::process::exit(code);
        }
    }
}
