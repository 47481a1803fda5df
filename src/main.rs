use anyhow::{Context, Result};
use clap::Parser;
use rayon::prelude::*;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use lynceus::cli::{Cli, build_config};
use lynceus::{InspectionVerdict, Inspector};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let inspector = Inspector::new(build_config(cli)?);

    let reports: Vec<(PathBuf, Result<InspectionVerdict>)> = cli
        .files
        .par_iter()
        .map(|path| {
            let outcome =
                inspect_file(&inspector, path, cli.max_bytes, cli.declared_mime.as_deref());
            (path.clone(), outcome)
        })
        .collect();

    let mut read_errors = 0usize;
    let mut rejections = 0usize;

    for (path, outcome) in &reports {
        match outcome {
            Ok(verdict) => {
                if !verdict.safe {
                    rejections += 1;
                }
                if cli.json {
                    println!("{}", render_json(path, verdict)?);
                } else if verdict.safe {
                    println!("PASS    {}", path.display());
                } else {
                    println!("REJECT  {}: {}", path.display(), verdict.reason);
                }
            }
            Err(err) => {
                read_errors += 1;
                eprintln!("warning: {}: {err:#}", path.display());
            }
        }
    }

    if !cli.json {
        println!();
        println!("{}", inspector.stats().summary());
    }

    Ok(if read_errors > 0 {
        ExitCode::from(2)
    } else if rejections > 0 {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    })
}

// Reads at most one byte past the cap; the inspector turns an over-long
// buffer into an input-too-large verdict, so a huge file is never slurped.
fn inspect_file(
    inspector: &Inspector,
    path: &Path,
    max_bytes: usize,
    declared_mime: Option<&str>,
) -> Result<InspectionVerdict> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let mut data = Vec::new();
    file.take((max_bytes as u64).saturating_add(1))
        .read_to_end(&mut data)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(inspector.inspect(&data, declared_mime))
}

fn render_json(path: &Path, verdict: &InspectionVerdict) -> Result<String> {
    #[derive(serde::Serialize)]
    struct FileReport<'a> {
        file: String,
        #[serde(flatten)]
        verdict: &'a InspectionVerdict,
    }

    serde_json::to_string(&FileReport {
        file: path.display().to_string(),
        verdict,
    })
    .context("failed to serialize verdict")
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
