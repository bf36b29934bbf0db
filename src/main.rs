//! Binary entry point (§6 "Invocation"): `dfngen <input-file-path>
//! <output-folder-path>`. Exits `0` on success, `1` on an argument/input
//! error or on completion with no surviving fractures.

use std::path::PathBuf;

use clap::Parser;

use dfngen::driver::Driver;
use dfngen::error::DfnError;
use dfngen::hotkey::StdinHaltSignal;
use dfngen::{input, output};

#[derive(Parser)]
#[command(name = "dfngen", about = "Stochastic discrete fracture network generator (FRAM insertion engine)")]
struct Args {
    /// Path to the flat keyword/value input file.
    input_file: PathBuf,
    /// Output folder; created (with `radii/` and `polys/` subfolders) if missing.
    output_folder: PathBuf,
}

fn main() {
    let args = Args::parse();
    // Failing to create the output folder up front is itself an argument
    // error (§7): nothing downstream, including the log file, can proceed.
    if let Err(e) = std::fs::create_dir_all(&args.output_folder) {
        eprintln!("failed to create output folder {:?}: {e}", args.output_folder);
        std::process::exit(1);
    }
    let _log_guard = install_tracing(&args.output_folder);

    match run(&args) {
        Ok(()) => std::process::exit(0),
        Err(DfnError::Input(e)) => {
            tracing::error!(error = %e, "input error");
            std::process::exit(1);
        }
        Err(DfnError::NoConnectivity {
            attempted_boundary_faces,
            remediation,
        }) => {
            tracing::error!(
                boundary_faces = ?attempted_boundary_faces,
                remediation,
                "no fractures survived cluster analysis"
            );
            std::process::exit(1);
        }
    }
}

fn run(args: &Args) -> Result<(), DfnError> {
    let input_path = args
        .input_file
        .to_str()
        .ok_or_else(|| DfnError::Input(dfngen::error::InputError::Parse {
            line: 0,
            message: "input path is not valid UTF-8".to_string(),
        }))?;
    let parsed = input::read_input_file(input_path)?;

    let output_dir = args.output_folder.to_string_lossy().into_owned();
    let output_all_radii = parsed.config.output_all_radii;

    let driver = Driver::new(parsed.config, parsed.families, parsed.user_fractures);
    let mut halt = StdinHaltSignal::spawn();
    let result = driver.run(&mut halt)?;

    if let Err(e) = output::write_all(&output_dir, &result, output_all_radii) {
        tracing::error!(error = %e, "failed to write output");
    }

    tracing::info!(
        accepted = result.accepted.len(),
        final_fractures = result.cluster.final_fractures.len(),
        "run complete"
    );

    Ok(())
}

/// Installs a console `fmt` layer plus a non-blocking file layer writing
/// to `<output>/dfngen_logfile.txt` (mirrors the original's single
/// timestamped `Logger` class, split across two `tracing-subscriber`
/// layers instead of one hand-rolled writer). Returns the file appender's
/// guard; dropping it flushes the background writer thread, so it must
/// live for the whole of `main`.
fn install_tracing(output_folder: &std::path::Path) -> tracing_appender::non_blocking::WorkerGuard {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let file_appender = tracing_appender::rolling::never(output_folder, "dfngen_logfile.txt");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_filter(env_filter()))
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(env_filter()),
        )
        .init();

    guard
}
