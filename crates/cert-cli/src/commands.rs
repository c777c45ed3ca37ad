use std::path::Path;

use anyhow::{Context, Result};

use cert_cli::config::{load_settings, resolve_output_root, settings_path, settings_to_toml};
use cert_cli::pipeline::{PipelineOptions, check_template, run_pipeline};
use cert_cli::types::{RunResult, TemplateCheck};

use crate::cli::{CheckTemplateArgs, GenerateArgs};

pub fn run_generate(args: &GenerateArgs, config: Option<&Path>) -> Result<RunResult> {
    let loaded = load_settings(config).context("load settings")?;
    let mut settings = loaded.settings;
    if let Some(dir) = &args.output_dir {
        settings.output.root = Some(dir.clone());
    }
    if let Some(format) = args.summary_format {
        settings.output.summary_format = format.into();
    }
    if let Some(minutes) = args.min_duration {
        settings.eligibility.min_duration_minutes = minutes;
    }

    let options = PipelineOptions {
        csv_path: args.csv.clone(),
        template_path: args.template.clone(),
        output_root: resolve_output_root(&settings),
        summary_format: settings.output.summary_format,
        rules: settings.eligibility,
        tokens: settings.placeholders,
        dry_run: args.dry_run,
    };
    run_pipeline(&options)
}

pub fn run_check_template(args: &CheckTemplateArgs, config: Option<&Path>) -> Result<TemplateCheck> {
    let loaded = load_settings(config).context("load settings")?;
    check_template(&args.template, &loaded.settings.placeholders)
}

pub fn run_config(config: Option<&Path>) -> Result<()> {
    let loaded = load_settings(config).context("load settings")?;
    match (&loaded.source, settings_path()) {
        (Some(path), _) => println!("# Loaded from {}", path.display()),
        (None, Some(path)) => println!("# Defaults (no settings file at {})", path.display()),
        (None, None) => println!("# Defaults (no settings directory on this platform)"),
    }
    println!(
        "# Output root: {}",
        resolve_output_root(&loaded.settings).display()
    );
    print!("{}", settings_to_toml(&loaded.settings)?);
    Ok(())
}
