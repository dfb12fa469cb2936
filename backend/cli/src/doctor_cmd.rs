//! CLI Doctor Command
//!
//! Reports config validation findings and checks the ffmpeg toolchain.

use std::path::Path;

use anyhow::Result;

use vidwatch_config::{redact, validate, VidwatchConfig};
use vidwatch_media::FfmpegDecoder;

/// Executes the full doctor diagnosis. Returns whether every check passed.
pub async fn run(config: &VidwatchConfig, config_path: &Path) -> Result<bool> {
    println!("\n🔍 Running vidwatch doctor...\n");
    println!("Config file: {}", config_path.display());
    println!("{}\n", serde_json::to_string_pretty(&redact(&serde_json::to_value(config)?))?);

    let is_ok = check_config(config) & check_ffmpeg(config) & check_folder(config);

    println!();
    if is_ok {
        println!("✅ All checks passed! vidwatch is ready.");
    } else {
        println!("❌ Some checks failed! Please fix the errors above.");
    }

    Ok(is_ok)
}

fn check_config(config: &VidwatchConfig) -> bool {
    println!("Checking configuration:");
    let report = validate(config);
    for warning in &report.warnings {
        println!("  🟡 {}: {}", warning.path, warning.message);
    }
    for error in &report.errors {
        println!("  🔴 {}: {}", error.path, error.message);
    }
    if report.is_valid() && report.warnings.is_empty() {
        println!("  🟢 No problems found");
    }
    report.is_valid()
}

fn check_ffmpeg(config: &VidwatchConfig) -> bool {
    println!("Checking ffmpeg:");
    let sampling = &config.sampling;
    let decoder = FfmpegDecoder::new().with_binaries(sampling.ffmpeg_path(), sampling.ffprobe_path());
    match decoder.check_available() {
        Ok(()) => {
            println!("  🟢 {} and {} are runnable", sampling.ffmpeg_path(), sampling.ffprobe_path());
            true
        }
        Err(e) => {
            println!("  🔴 {}", e);
            false
        }
    }
}

fn check_folder(config: &VidwatchConfig) -> bool {
    println!("Checking video folder:");
    let folder = config.storage.input_folder();
    if folder.is_dir() {
        println!("  🟢 {} exists", folder.display());
        true
    } else {
        println!("  🔴 {} is not a directory", folder.display());
        false
    }
}
