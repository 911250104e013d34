//! stubdoc — merge docstrings from Python sources into `.pyi` stubs.
//!
//! Two modes:
//!
//! - **pair mode**: `stubdoc pkg/find.py stubs/find.pyi` prints the
//!   merged stub to stdout; `-i` rewrites the stub, `-o` writes a copy.
//! - **batch mode**: `stubdoc --source-dir src --stub-dir stubs -i`
//!   pairs every `*.pyi` under the stub dir with the same-named `*.py`
//!   under the source dir and merges the pairs in parallel. One pair's
//!   failure never aborts the rest; failures are summarized at the end.

use anyhow::{bail, Context, Result};
use clap::Parser;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use stubdoc::MergePolicy;

#[derive(Parser)]
#[command(
    name = "stubdoc",
    about = "Merge docstrings from Python sources into interface stubs"
)]
struct Cli {
    /// Implementation source file (.py)
    source: Option<PathBuf>,

    /// Stub file (.pyi) to document
    stub: Option<PathBuf>,

    /// Rewrite stub files in place
    #[arg(short = 'i', long = "in-place", conflicts_with = "output")]
    in_place: bool,

    /// Output file (pair mode) or directory (batch mode)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Replace stub docstrings that differ from the source
    #[arg(long)]
    overwrite: bool,

    /// Directory of implementation sources (batch mode)
    #[arg(long, requires = "stub_dir", conflicts_with = "source")]
    source_dir: Option<PathBuf>,

    /// Directory of stubs to document (batch mode)
    #[arg(long, requires = "source_dir", conflicts_with = "stub")]
    stub_dir: Option<PathBuf>,

    /// Worker threads for batch mode (default: one per core)
    #[arg(short = 'j', long)]
    jobs: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Log only errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

/// One source/stub file pair plus its output destination.
struct PairJob {
    source: PathBuf,
    stub: PathBuf,
    dest: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let policy = if cli.overwrite {
        MergePolicy::Overwrite
    } else {
        MergePolicy::KeepExisting
    };

    match (&cli.source_dir, &cli.stub_dir) {
        (Some(source_dir), Some(stub_dir)) => {
            batch_mode(&cli, source_dir, stub_dir, policy)
        }
        _ => match (&cli.source, &cli.stub) {
            (Some(source), Some(stub)) => pair_mode(&cli, source, stub, policy),
            _ => bail!("provide SOURCE and STUB files, or --source-dir and --stub-dir"),
        },
    }
}

/// pair mode: merge one file pair, write to stdout unless told otherwise.
fn pair_mode(cli: &Cli, source: &Path, stub: &Path, policy: MergePolicy) -> Result<()> {
    let merged = merge_paths(source, stub, policy)?;

    if cli.in_place {
        fs::write(stub, &merged).with_context(|| format!("failed to write {}", stub.display()))?;
    } else if let Some(out) = &cli.output {
        write_with_parents(out, &merged)?;
    } else {
        print!("{merged}");
    }
    Ok(())
}

/// batch mode: pair stubs with sources by relative path, merge in
/// parallel, report failures at the end.
fn batch_mode(cli: &Cli, source_dir: &Path, stub_dir: &Path, policy: MergePolicy) -> Result<()> {
    if !cli.in_place && cli.output.is_none() {
        bail!("batch mode requires --in-place or --output DIR");
    }

    if let Some(jobs) = cli.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .context("failed to configure worker pool")?;
    }

    let dest_root = if cli.in_place {
        None
    } else {
        cli.output.as_deref()
    };
    let jobs = discover_pairs(source_dir, stub_dir, dest_root)?;
    if jobs.is_empty() {
        bail!("no stub/source pairs found under {}", stub_dir.display());
    }

    let failures: Vec<(PathBuf, anyhow::Error)> = jobs
        .par_iter()
        .filter_map(|job| process_pair(job, policy).err().map(|e| (job.stub.clone(), e)))
        .collect();

    log::info!("merged {} of {} stub(s)", jobs.len() - failures.len(), jobs.len());

    if !failures.is_empty() {
        eprintln!("stubdoc: {} of {} file pairs failed:", failures.len(), jobs.len());
        for (stub, err) in &failures {
            eprintln!("  {}: {err:#}", stub.display());
        }
        bail!("{} of {} file pairs failed", failures.len(), jobs.len());
    }
    Ok(())
}

/// Find every `*.pyi` under the stub dir and pair it with the
/// corresponding `*.py` under the source dir. `dest_root` of `None`
/// means rewrite stubs in place.
fn discover_pairs(
    source_dir: &Path,
    stub_dir: &Path,
    dest_root: Option<&Path>,
) -> Result<Vec<PairJob>> {
    let pattern = format!("{}/**/*.pyi", stub_dir.display());
    let mut stubs: Vec<PathBuf> = glob::glob(&pattern)
        .with_context(|| format!("invalid stub directory: {}", stub_dir.display()))?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();
    // Sort for deterministic pairing and reporting order
    stubs.sort();

    let mut jobs = Vec::with_capacity(stubs.len());
    for stub in stubs {
        let rel = stub
            .strip_prefix(stub_dir)
            .context("stub path escaped the stub directory")?;
        let source = source_dir.join(rel).with_extension("py");
        if !source.is_file() {
            eprintln!(
                "warning: skipping {}: no source at {}",
                stub.display(),
                source.display()
            );
            continue;
        }
        let dest = match dest_root {
            Some(root) => root.join(rel),
            None => stub.clone(),
        };
        jobs.push(PairJob { source, stub, dest });
    }
    Ok(jobs)
}

/// Merge one pair and write the result to its destination.
fn process_pair(job: &PairJob, policy: MergePolicy) -> Result<()> {
    let merged = merge_paths(&job.source, &job.stub, policy)?;
    write_with_parents(&job.dest, &merged)
}

fn merge_paths(source: &Path, stub: &Path, policy: MergePolicy) -> Result<String> {
    let source_text = fs::read_to_string(source)
        .with_context(|| format!("failed to read {}", source.display()))?;
    let stub_text =
        fs::read_to_string(stub).with_context(|| format!("failed to read {}", stub.display()))?;
    stubdoc::merge_stub(&source_text, &stub_text, policy)
        .with_context(|| format!("failed to merge {} into {}", source.display(), stub.display()))
}

fn write_with_parents(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

fn init_logging(verbose: bool, quiet: bool) {
    let default = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}
