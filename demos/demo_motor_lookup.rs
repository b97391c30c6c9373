//! demo_motor_lookup - List the motors of every configuration of a design.
//!
//! This demo builds a small motor database, imports a design with it and
//! prints which motor each mount carries in each motor configuration.
//! Motors the database does not know show up as warnings.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example demo_motor_lookup <design.ork>
//! ```

use std::env;

use rocketdoc_rs::catalog::MotorDatabase;
use rocketdoc_rs::objects::{Motor, MotorType};
use rocketdoc_rs::{Loader, RocketComponent};

/// A few common motors.
fn database() -> MotorDatabase {
    [
        Motor::new("Estes", "A8", MotorType::Single, 0.018, 0.070),
        Motor::new("Estes", "B6", MotorType::Single, 0.018, 0.070),
        Motor::new("Estes", "C6", MotorType::Single, 0.018, 0.070),
        Motor::new("AeroTech", "F40W", MotorType::Single, 0.029, 0.124),
        Motor::new("Cesaroni Technology", "H128", MotorType::Reload, 0.029, 0.194),
    ]
    .into_iter()
    .collect()
}

/// One line per mounted motor: configuration, mount and motor.
fn motor_lines(rocket: &RocketComponent) -> Vec<String> {
    let mut lines = Vec::new();
    for component in rocket.iter() {
        let Some(mount) = component.motor_mount() else {
            continue;
        };
        for (config, mounted) in &mount.motors {
            let delay = match mounted.delay {
                Some(delay) => format!("{}", delay),
                None => "P".to_string(),
            };
            let motor = match &mounted.motor {
                Some(motor) => format!("{} {}-{}", motor.manufacturer, motor.designation, delay),
                None => "(unknown motor)".to_string(),
            };
            lines.push(format!("{}\t{}\t{}", config, component.name, motor));
        }
    }
    lines
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <design>", args[0]);
        std::process::exit(1);
    }

    let motors = database();
    let loaded = Loader::new().with_motor_finder(&motors).load_file(&args[1])?;

    if let Some(rocket) = loaded.document.rocket.rocket() {
        for configuration in &rocket.motor_configurations {
            let name = configuration.name.as_deref().unwrap_or("(unnamed)");
            println!("configuration {}: {}", configuration.id, name);
        }
    }
    for line in motor_lines(&loaded.document.rocket) {
        println!("{}", line);
    }
    for warning in loaded.warnings.iter() {
        eprintln!("Warning: {}", warning);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rocketdoc_rs::objects::MountedMotor;
    use rocketdoc_rs::ComponentType;

    #[test]
    fn test_database_lookup() {
        assert_eq!(database().len(), 5);
    }

    #[test]
    fn test_motor_lines() {
        let motor = Motor::new("Estes", "C6", MotorType::Single, 0.018, 0.070);
        let mut tube = RocketComponent::new(ComponentType::BodyTube);
        tube.name = "Sustainer".to_string();
        if let Some(mount) = tube.motor_mount_mut() {
            mount.is_mount = true;
            mount.set_motor("a", MountedMotor { motor: Some(motor), delay: Some(5.0) });
            mount.set_motor("b", MountedMotor { motor: None, delay: None });
        }
        assert_eq!(
            motor_lines(&tube),
            vec!["a\tSustainer\tEstes C6-5", "b\tSustainer\t(unknown motor)"]
        );
    }
}
