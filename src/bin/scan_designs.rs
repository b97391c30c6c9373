//! scan_designs - Import every design under a directory.
//!
//! Walks a directory tree, imports each `.ork` and `.rkt` file it finds and
//! prints one summary line per file: stage and component counts, the
//! number of simulations and warnings, or the error that stopped the
//! import.
//!
//! # Usage
//!
//! ```bash
//! scan_designs [OPTIONS] [PATH]
//! ```
//!
//! # Examples
//!
//! ```bash
//! # Scan the current directory
//! scan_designs
//!
//! # Scan a library of designs with 4 threads
//! scan_designs -j 4 ~/rockets
//! ```

use std::path::{Path, PathBuf};

use clap::Parser;
use rayon::prelude::*;
use walkdir::WalkDir;

use rocketdoc_rs::{Format, Loader};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Import every design under a directory.
#[derive(Parser, Debug)]
#[command(name = "scan_designs")]
#[command(version = VERSION)]
#[command(about = "Import every rocket design under a directory and summarize each")]
struct Args {
    /// Directory to scan
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Number of parallel imports
    #[arg(short, long, default_value = "1")]
    jobs: usize,

    /// Follow symbolic links
    #[arg(long)]
    follow_links: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn summarize(loader: &Loader<'_>, path: &Path) -> String {
    match loader.load_file(path) {
        Ok(loaded) => {
            let document = &loaded.document;
            format!(
                "{}\t{} stage(s)\t{} component(s)\t{} simulation(s)\t{} warning(s)",
                path.display(),
                document.stage_count(),
                document.component_count(),
                document.simulations.len(),
                loaded.warnings.len()
            )
        }
        Err(e) => format!("{}\terror: {}", path.display(), e),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = if args.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if args.jobs == 0 {
        eprintln!("Error: jobs must be at least 1");
        std::process::exit(1);
    }

    let mut paths: Vec<PathBuf> = Vec::new();
    let walker = WalkDir::new(&args.path)
        .follow_links(args.follow_links)
        .sort_by_file_name();
    for entry in walker {
        match entry {
            Ok(e) if e.file_type().is_file() && Format::from_extension(e.path()).is_some() => {
                paths.push(e.path().to_path_buf());
            }
            Ok(_) => {}
            Err(e) => log::warn!("error walking directory: {}", e),
        }
    }
    log::debug!("found {} design file(s)", paths.len());

    let loader = Loader::new();
    let mut lines: Vec<(PathBuf, String)> = if args.jobs > 1 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(args.jobs)
            .build_global()
            .ok();
        paths
            .par_iter()
            .map(|path| (path.clone(), summarize(&loader, path)))
            .collect()
    } else {
        paths
            .iter()
            .map(|path| (path.clone(), summarize(&loader, path)))
            .collect()
    };

    lines.sort_by(|a, b| a.0.cmp(&b.0));
    for (_, line) in lines {
        println!("{}", line);
    }

    Ok(())
}
