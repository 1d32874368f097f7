//! CLI command implementations

use anyhow::{Context, bail};
use sendable_core::{
    CONFIG_FILE_NAMES, ConfigLoader, DeclKind, Driver, FilesConfiguration, Mode, Pass, PassKind,
    Pipeline, SendableConfiguration, list_source_files,
};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tracing::debug;

use crate::output::{OutputFormatter, ProgressReporter};
use crate::{ConfigFormat, RunArgs};

/// Directory the config search starts from
fn search_start(paths: &[PathBuf]) -> &Path {
    match paths.first() {
        Some(path) if path.is_file() => match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        },
        Some(path) => path,
        None => Path::new("."),
    }
}

fn load_config(
    config_path: Option<&Path>,
    paths: &[PathBuf],
) -> anyhow::Result<SendableConfiguration> {
    let (config, source) = ConfigLoader::load(config_path, Some(search_start(paths)))?;
    match source {
        Some(path) => debug!("Loaded configuration from {}", path.display()),
        None => debug!("Using default configuration"),
    }
    Ok(config)
}

/// `files` section with the command line patterns layered on top
fn files_with_overrides(config: &SendableConfiguration, run: &RunArgs) -> FilesConfiguration {
    let mut files = config.files_config();
    if !run.include.is_empty() {
        files.include = Some(run.include.clone());
    }
    if !run.exclude.is_empty() {
        files.exclude = Some(run.exclude.clone());
    }
    files
}

fn mode_for(run: &RunArgs) -> Mode {
    if run.check {
        Mode::Check
    } else if run.diff {
        Mode::Diff
    } else {
        Mode::Write
    }
}

/// Discover files, run `pipeline` over them and report
fn run_pipeline(
    pipeline: Pipeline,
    run: RunArgs,
    files: &FilesConfiguration,
    use_colors: bool,
) -> anyhow::Result<ExitCode> {
    let start_time = Instant::now();
    let paths = if run.paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        run.paths.clone()
    };

    let sources: Vec<PathBuf> = list_source_files(&paths, files)?.into_iter().collect();
    if sources.is_empty() {
        println!("No Swift files found in specified paths.");
        return Ok(ExitCode::SUCCESS);
    }
    debug!("Found {} Swift files to rewrite", sources.len());

    let mode = mode_for(&run);
    let colored_diff = use_colors && std::io::stdout().is_terminal();
    let driver = Driver::new(pipeline, mode).with_colored_diff(colored_diff);

    let progress = ProgressReporter::new(run.progress, sources.len());
    let summary = driver.run_with_progress(&sources, |report| progress.inc(&report.path));
    progress.finish();

    let output = OutputFormatter::new(mode);
    output.print_reports(&summary);
    output.print_summary(&summary, start_time.elapsed());

    let failed = summary.failed() > 0 || (mode == Mode::Check && summary.changed() > 0);
    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Full pipeline: unchecked marker, plain marker, final
pub fn sendable_command(
    run: RunArgs,
    protocols: bool,
    immutable_classes: bool,
    config_path: Option<PathBuf>,
    use_colors: bool,
) -> anyhow::Result<ExitCode> {
    let config = load_config(config_path.as_deref(), &run.paths)?;
    let mut rewrite = config.rewrite_config();
    if protocols {
        rewrite.protocols = Some(true);
    }
    if immutable_classes {
        let mut passes = rewrite.passes();
        if !passes.contains(&PassKind::ImmutableClasses) {
            let at = passes
                .iter()
                .position(|p| *p == PassKind::Final)
                .unwrap_or(passes.len());
            passes.insert(at, PassKind::ImmutableClasses);
        }
        rewrite.passes = Some(passes);
    }

    let pipeline = Pipeline::from_config(&rewrite);
    debug!(
        "Running passes: {}",
        pipeline
            .passes()
            .iter()
            .map(Pass::name)
            .collect::<Vec<_>>()
            .join(", ")
    );
    let files = files_with_overrides(&config, &run);
    run_pipeline(pipeline, run, &files, use_colors)
}

/// `@unchecked` marker on every class
pub fn unchecked_command(
    run: RunArgs,
    config_path: Option<PathBuf>,
    use_colors: bool,
) -> anyhow::Result<ExitCode> {
    let config = load_config(config_path.as_deref(), &run.paths)?;
    let rewrite = config.rewrite_config();
    let pipeline = Pipeline::new().with_pass(Pass::unchecked_all_classes(
        rewrite.marker(),
        rewrite.unchecked_attribute(),
    ));
    let files = files_with_overrides(&config, &run);
    run_pipeline(pipeline, run, &files, use_colors)
}

/// Attribute pass over the listed declaration kinds
pub fn attribute_command(
    name: String,
    kinds: Vec<DeclKind>,
    visibility: Vec<String>,
    run: RunArgs,
    config_path: Option<PathBuf>,
    use_colors: bool,
) -> anyhow::Result<ExitCode> {
    let name = name.strip_prefix('@').unwrap_or(&name);
    if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        bail!("'{name}' is not a valid attribute name");
    }

    let config = load_config(config_path.as_deref(), &run.paths)?;
    let visibility = (!visibility.is_empty()).then_some(visibility);
    let pipeline = Pipeline::attribute(name, kinds, visibility);
    let files = files_with_overrides(&config, &run);
    run_pipeline(pipeline, run, &files, use_colors)
}

fn serialize(config: &SendableConfiguration, format: ConfigFormat) -> anyhow::Result<String> {
    let text = match format {
        ConfigFormat::Json => config.to_json_string()?,
        ConfigFormat::Toml => config.to_toml_string()?,
    };
    Ok(text)
}

pub fn config_init_command(format: ConfigFormat, force: bool) -> anyhow::Result<ExitCode> {
    debug!("Initializing configuration file with format: {:?}", format);

    let filename = match format {
        ConfigFormat::Json => ".autosendable.json",
        ConfigFormat::Toml => ".autosendable.toml",
    };
    let config_path = PathBuf::from(filename);

    if config_path.exists() && !force {
        bail!("Configuration file '{filename}' already exists. Use --force to overwrite.");
    }

    let content = serialize(&SendableConfiguration::documented_defaults(), format)?;
    std::fs::write(&config_path, content)
        .with_context(|| format!("Failed to write {filename}"))?;

    println!("Created configuration file: {filename}");
    println!("   Edit the file to choose which passes run and what they add.");
    Ok(ExitCode::SUCCESS)
}

/// Loaded configuration with every default spelled out
fn resolved(config: &SendableConfiguration) -> SendableConfiguration {
    let defaults = SendableConfiguration::documented_defaults();
    let rewrite = config.rewrite_config();
    let mut files = config.files_config();
    if files.include.is_none() {
        files.include = defaults.files_config().include;
    }
    if files.exclude.is_none() {
        files.exclude = defaults.files_config().exclude;
    }
    SendableConfiguration {
        schema: config.schema.clone(),
        files: Some(files),
        rewrite: Some(sendable_core::RewriteConfiguration {
            marker: Some(rewrite.marker().to_string()),
            unchecked_attribute: Some(rewrite.unchecked_attribute().to_string()),
            final_modifier: Some(rewrite.final_modifier().to_string()),
            visibility: Some(rewrite.visibility()),
            protocols: Some(rewrite.protocols()),
            passes: Some(rewrite.passes()),
        }),
    }
}

pub fn config_show_command(
    format: ConfigFormat,
    config_path: Option<PathBuf>,
) -> anyhow::Result<ExitCode> {
    let (config, source) = ConfigLoader::load(config_path.as_deref(), None)?;
    match &source {
        Some(path) => println!("# Configuration from {}", path.display()),
        None => println!(
            "# No configuration file found ({}), showing defaults",
            CONFIG_FILE_NAMES.join(", ")
        ),
    }
    println!("{}", serialize(&resolved(&config), format)?);
    Ok(ExitCode::SUCCESS)
}

pub fn config_schema_command() -> anyhow::Result<ExitCode> {
    println!("{}", SendableConfiguration::json_schema()?);
    Ok(ExitCode::SUCCESS)
}
