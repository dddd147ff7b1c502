//! `slidecap` - Slider puzzle captcha generator.
//!
//! Copyright (C) 2026 Maverick
//! SPDX-License-Identifier: AGPL-3.0-only
//!
//! Loads configuration, sets up logging, generates one challenge and writes
//! its images to the output directory. An optional offset argument is
//! verified against the challenge.

use slidecap::{Config, Result, SliderCaptchaGenerator, SliderChallenge};

use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn write_images(config: &Config, challenge: &SliderChallenge) -> Result<()> {
    let dir = &config.output_dir;
    challenge.background().save(dir.join("background.png"))?;
    challenge.piece().save(dir.join("piece.png"))?;
    if let Some(original) = challenge.original() {
        original.save(dir.join("original.png"))?;
    }
    Ok(())
}

fn run(config: Arc<Config>) -> Result<()> {
    let generator = SliderCaptchaGenerator::new(config.clone())?;
    let challenge = generator.generate();
    write_images(&config, &challenge)?;
    info!(
        x = challenge.x(),
        y = challenge.y(),
        tolerance = challenge.tolerance(),
        output_dir = %config.output_dir.display(),
        "Challenge written"
    );

    if let Some(arg) = std::env::args().nth(1) {
        match arg.trim().parse::<i64>() {
            Ok(user_x) => println!("{}", challenge.verify_details(user_x)),
            Err(e) => error!(offset = %arg, error = %e, "Ignoring malformed offset"),
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let (non_blocking, _guard) = tracing_appender::non_blocking(std::io::stdout());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(non_blocking);

    if log_format.eq_ignore_ascii_case("pretty") {
        subscriber.init();
    } else {
        subscriber.json().init();
    }

    let config = Config::from_env();
    info!(
        width = config.width,
        height = config.height,
        tolerance = config.tolerance,
        background = ?config.builtin_background,
        log_format = %config.log_format,
        "Configuration loaded"
    );

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Challenge generation failed");
            ExitCode::FAILURE
        }
    }
}
