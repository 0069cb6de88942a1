// Nightjar — CLI entry point.
//
// Generates one sketch and writes it to a WAV file, picking a fresh file
// name if the target already exists.
//
// Usage:
//   cargo run -p nightjar -- [output-base-name] [--seed N] [--duration SECS]
//     [--sample-rate HZ] [--config config.json]

use nightjar::config::SketchConfig;
use nightjar::encode::{EncoderSettings, WavEncoder, encode_buffer};
use nightjar::render::generate;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::{Path, PathBuf};

fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();

    let base_name = args
        .get(1)
        .filter(|s| !s.starts_with("--"))
        .map(|s| s.as_str())
        .unwrap_or("nightjar_sketch");
    let seed: Option<u64> = parse_flag(&args, "--seed");

    let mut config = match parse_flag::<String>(&args, "--config") {
        Some(path) => match SketchConfig::load(Path::new(&path)) {
            Ok(c) => {
                println!("Loaded config from {}.", path);
                c
            }
            Err(e) => {
                println!("Failed to load {}: {}. Using defaults.", path, e);
                SketchConfig::default()
            }
        },
        None => SketchConfig::default(),
    };
    if let Some(duration) = parse_flag(&args, "--duration") {
        config.duration_seconds = duration;
    }
    if let Some(rate) = parse_flag(&args, "--sample-rate") {
        config.sample_rate = rate;
    }

    println!("=== Nightjar Sketch Generator ===");
    println!("Duration: {:.1}s at {} Hz", config.duration_seconds, config.sample_rate);
    if let Some(s) = seed {
        println!("Seed: {}", s);
    }
    println!();

    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    };

    println!("[1/3] Composing...");
    let sketch = match generate(&config, &mut rng) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("  Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    println!("  Tempo: {} bpm", sketch.plan.bpm);
    println!("  Progression: {}", sketch.plan.progression.join(" "));
    println!("  Motif: {}", sketch.plan.motif.join(" "));

    println!("[2/3] Encoding to WAV...");
    let mut encoder = WavEncoder::new(&EncoderSettings::mono(config.sample_rate));
    let bytes = match encode_buffer(&sketch.buffer, &mut encoder) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("  Encoding failed: {}", e);
            std::process::exit(1);
        }
    };

    println!("[3/3] Writing...");
    let path = unique_path(base_name, ".wav");
    if let Err(e) = std::fs::write(&path, &bytes) {
        eprintln!("  Error writing {}: {}", path.display(), e);
        std::process::exit(1);
    }

    println!();
    println!("Sketch saved to: {}", path.display());
}

/// First non-colliding path among "base.ext", "base (1).ext", "base (2).ext", ...
fn unique_path(base: &str, ext: &str) -> PathBuf {
    let mut path = PathBuf::from(format!("{}{}", base, ext));
    let mut i = 1;
    while path.exists() {
        path = PathBuf::from(format!("{} ({}){}", base, i, ext));
        i += 1;
    }
    path
}

fn parse_flag<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
}
