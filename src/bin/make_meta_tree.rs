//! CLI front-end: parses a tracker URL, one or more source paths, and the
//! path-composition flags, then drives the Tree Builder, Meta-Tree Driver,
//! and Artifact Writer over each source in turn.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use meta_tree::driver::{self, RunConfig};
use meta_tree::error::{ErrorKind, Result};
use meta_tree::path::{normalize_component, Component};
use meta_tree::{tree, writer};

#[derive(Parser, Debug)]
#[command(name = "make-meta-tree", about = "Build a tree of torrent metainfo artifacts from a source tree")]
struct Args {
    /// Tracker announce URL.
    announce: String,

    /// One or more source files or directories to process.
    #[arg(required = true)]
    sources: Vec<PathBuf>,

    /// Fold ancestor path components (between the working directory and
    /// the source) into the recorded path.
    #[arg(short = 'u', long = "use-path")]
    use_path: bool,

    /// Components prepended to every recorded path, `/`-separated.
    #[arg(short = 'p', long = "prefix")]
    prefix: Option<String>,

    /// A leading component sequence to strip from the use-path-derived
    /// ancestor components. Implies `--use-path`.
    #[arg(short = 'i', long = "ignore-prefix")]
    ignore_prefix: Option<String>,

    /// Output root directory for the artifact tree.
    #[arg(short = 't', long = "target", default_value = ".")]
    target: PathBuf,
}

fn split_components(value: &str) -> Vec<Component> {
    value.split('/').filter(|s| !s.is_empty()).map(|s| s.as_bytes().to_vec()).collect()
}

/// Ancestor components between the current working directory and `source`'s
/// parent, with `ignore_prefix` stripped from the front if it matches.
fn ancestor_components(source: &Path, ignore_prefix: &[Component]) -> Result<Vec<Component>> {
    let cwd = std::env::current_dir()?;
    let absolute = if source.is_absolute() { source.to_path_buf() } else { cwd.join(source) };

    let parent = absolute.parent().unwrap_or(Path::new(""));
    let relative = parent.strip_prefix(&cwd).unwrap_or(parent);

    let mut components = Vec::new();
    for part in relative.components() {
        components.push(normalize_component(part.as_os_str())?);
    }

    if ignore_prefix.len() <= components.len() && components[..ignore_prefix.len()] == ignore_prefix[..] {
        components.drain(..ignore_prefix.len());
    }

    Ok(components)
}

fn run_source(source: &Path, args: &Args) -> Result<()> {
    let prefix = args.prefix.as_deref().map(split_components).unwrap_or_default();
    let ignore_prefix = args.ignore_prefix.as_deref().map(split_components).unwrap_or_default();
    let use_path = args.use_path || args.ignore_prefix.is_some();

    let basename = source
        .file_name()
        .map(|n| normalize_component(n))
        .unwrap_or_else(|| normalize_component(source.as_os_str()))?;

    let mut recorded_path = prefix;
    if use_path {
        recorded_path.extend(ancestor_components(source, &ignore_prefix)?);
    }
    recorded_path.push(basename);

    let node = tree::build(source, recorded_path)?;

    let creation_date = meta_tree_now();
    let target_root = args.target.clone();
    let config = RunConfig {
        announce: args.announce.clone(),
        creation_date,
        target_for: Box::new(move |path: &[Component]| {
            let mut buf = target_root.clone();
            for component in path {
                buf.push(String::from_utf8_lossy(component).into_owned());
            }
            let mut with_ext = buf.into_os_string();
            with_ext.push(".torrent");
            PathBuf::from(with_ext)
        }),
    };

    let mut active = Vec::new();
    driver::visit(&node, &config, &mut active, &mut |metainfo| {
        info!(target = %metainfo.target.display(), pieces = metainfo.pieces.len(), "writing");
        writer::write(&metainfo)
    })
}

/// Seconds since the Unix epoch, shared by every artifact in a run.
fn meta_tree_now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Validate `announce` as a parseable URL before any filesystem work
/// begins.
fn validate_announce(announce: &str) -> Result<()> {
    url::Url::parse(announce).map(|_| ()).map_err(|_| ErrorKind::BadAnnounceUrl(announce.to_owned()).into())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    if let Err(err) = validate_announce(&args.announce) {
        error!(error = %err, "invalid announce url");
        return ExitCode::FAILURE;
    }

    for source in &args.sources {
        if let Err(err) = run_source(source, &args) {
            error!(source = %source.display(), error = %err, "failed to build meta-tree");
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}
