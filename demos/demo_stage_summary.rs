//! demo_stage_summary - Summarize each stage of a rocket design.
//!
//! This demo imports a native or RockSim design and prints, per stage, the
//! length of its airframe, the number of components it holds and the
//! number of those that are recovery devices.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example demo_stage_summary <design.ork>
//! ```
//!
//! # Output
//!
//! A table with columns:
//! - Stage: Stage name
//! - Length: Sum of the body component lengths in millimetres
//! - Parts: Components in the stage, nested ones included
//! - Recovery: Parachutes and streamers

use std::env;

use rocketdoc_rs::{load_file, ComponentType, RocketComponent};

/// Figures for one stage.
#[derive(Debug, Default, PartialEq)]
struct StageStats {
    length: f64,
    parts: usize,
    recovery: usize,
}

/// Collects the figures of one stage component.
fn stage_stats(stage: &RocketComponent) -> StageStats {
    let mut stats = StageStats::default();
    for child in stage.children() {
        stats.length += child.length().unwrap_or(0.0);
    }
    for component in stage.iter().skip(1) {
        stats.parts += 1;
        if matches!(
            component.component_type(),
            ComponentType::Parachute | ComponentType::Streamer
        ) {
            stats.recovery += 1;
        }
    }
    stats
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <design>", args[0]);
        std::process::exit(1);
    }

    let loaded = load_file(&args[1])?;
    println!("{}", loaded.document.rocket.name);
    println!("{:<20} {:>10} {:>8} {:>8}", "Stage", "Length", "Parts", "Recovery");

    for stage in loaded.document.stages() {
        let s = stage_stats(stage);
        println!(
            "{:<20} {:>10.1} {:>8} {:>8}",
            stage.name,
            s.length * 1000.0,
            s.parts,
            s.recovery
        );
    }

    if !loaded.warnings.is_empty() {
        eprintln!("{} warning(s) while reading", loaded.warnings.len());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stage() {
        let stage = RocketComponent::new(ComponentType::Stage);
        assert_eq!(stage_stats(&stage), StageStats::default());
    }

    #[test]
    fn test_nested_parts_are_counted() {
        let mut tube = RocketComponent::new(ComponentType::BodyTube);
        tube.try_add_child(RocketComponent::new(ComponentType::Parachute)).unwrap();
        tube.try_add_child(RocketComponent::new(ComponentType::CenteringRing)).unwrap();

        let mut stage = RocketComponent::new(ComponentType::Stage);
        stage.try_add_child(RocketComponent::new(ComponentType::NoseCone)).unwrap();
        stage.try_add_child(tube).unwrap();

        let stats = stage_stats(&stage);
        assert_eq!(stats.parts, 4);
        assert_eq!(stats.recovery, 1);
        // nose cone 0.1 m plus body tube 0.3 m by default
        assert!((stats.length - 0.4).abs() < 1e-9);
    }
}
