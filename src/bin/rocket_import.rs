//! rocket_import - Import one rocket design and print it.
//!
//! Reads a native `.ork` or RockSim `.rkt` document and prints the
//! component tree, the stored simulations and every warning raised while
//! reading.
//!
//! # Usage
//!
//! ```bash
//! rocket_import [OPTIONS] <FILENAME>
//! ```
//!
//! # Examples
//!
//! ```bash
//! # Import a native design
//! rocket_import design.ork
//!
//! # Force the RockSim reader and show only the warnings
//! rocket_import --format rocksim --warnings-only legacy.xml
//!
//! # Log handler activity to stderr
//! rocket_import --debug design.ork
//! ```

use clap::{Parser, ValueEnum};

use rocketdoc_rs::objects::{Simulation, XmlEnum};
use rocketdoc_rs::{Format, Loader, RocketComponent};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Dialect selection on the command line.
#[derive(ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Native,
    Rocksim,
}

impl From<FormatArg> for Format {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Native => Format::Native,
            FormatArg::Rocksim => Format::RockSim,
        }
    }
}

/// Import one rocket design and print it.
#[derive(Parser, Debug)]
#[command(name = "rocket_import")]
#[command(version = VERSION)]
#[command(about = "Import a rocket design and print its components, simulations and warnings")]
struct Args {
    /// Design file to import
    filename: String,

    /// Read the file as this dialect instead of detecting it
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Print only the warnings
    #[arg(long)]
    warnings_only: bool,
}

fn print_component(component: &RocketComponent, depth: usize) {
    let kind = component.component_type().display_name();
    match component.length() {
        Some(length) => println!(
            "{:indent$}{} ({}, {:.1} mm)",
            "",
            component.name,
            kind,
            length * 1000.0,
            indent = depth * 2
        ),
        None => println!("{:indent$}{} ({})", "", component.name, kind, indent = depth * 2),
    }
    for child in component.children() {
        print_component(child, depth + 1);
    }
}

fn print_simulation(simulation: &Simulation) {
    let status = simulation.status.name().to_lowercase();
    print!("  {} [{}]", simulation.name, status);
    if let Some(apogee) = simulation.flight_data.as_ref().and_then(|d| d.max_altitude) {
        print!(" apogee {:.1} m", apogee);
    }
    println!();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = if args.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let mut loader = Loader::new();
    if let Some(format) = args.format {
        loader = loader.with_format(format.into());
    }

    let loaded = match loader.load_file(&args.filename) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {}: {}", args.filename, e);
            std::process::exit(1);
        }
    };

    if !args.warnings_only {
        let document = &loaded.document;
        if let Some(version) = &document.source_version {
            println!("Version: {}", version);
        }
        print_component(&document.rocket, 0);

        if !document.simulations.is_empty() {
            println!();
            println!("Simulations:");
            for simulation in &document.simulations {
                print_simulation(simulation);
            }
        }
        if !loaded.warnings.is_empty() {
            println!();
        }
    }

    for warning in loaded.warnings.iter() {
        println!("Warning: {}", warning);
    }

    Ok(())
}
