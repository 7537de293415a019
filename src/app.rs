//! Application orchestrator.
//! Loads/merges config, initializes logging, installs the Ctrl-C handler, validates the
//! target, and runs the organizer over the requested files.

use anyhow::{Context, Result};
use std::process::ExitCode;
use tracing::{debug, error};

use dcm_organize::cli::Args;
use dcm_organize::config::{CONFIG_ENV, load_config_from_xml};
use dcm_organize::output as out;
use dcm_organize::{
    CancelToken, Config, ConsoleReporter, DicomReader, FileSource, Organizer, RunState,
    default_config_path,
};

use crate::logging::init_tracing;

/// Run the CLI application and map the outcome to a process exit code.
pub fn run(args: Args) -> ExitCode {
    if args.print_config {
        print_config_location();
        return ExitCode::SUCCESS;
    }

    let cfg = match build_config(&args) {
        Ok(cfg) => cfg,
        Err(e) => {
            out::print_error(&format!("{e:#}"));
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging; the guard must live until exit to flush the file appender
    let guard = match init_tracing(&cfg.log_level, cfg.log_file.as_deref(), args.json) {
        Ok(g) => g,
        Err(e) => {
            out::print_error(&format!("Failed to initialize logging: {e:#}"));
            return ExitCode::FAILURE;
        }
    };

    let cancel = CancelToken::new();
    {
        let cancel = cancel.clone();
        if let Err(e) = ctrlc::set_handler(move || {
            if !cancel.is_cancelled() {
                out::print_warn("Received interrupt; finishing in-flight files...");
            }
            cancel.cancel();
        }) {
            out::print_warn(&format!("Could not install interrupt handler: {e}"));
        }
    }

    debug!("Starting dcm_organize: {:?}", args);

    let code = organize(&cfg, args.input_files(), cancel);

    drop(guard);
    code
}

/// Defaults < XML config file < CLI flags.
fn build_config(args: &Args) -> Result<Config> {
    let mut cfg = Config::default();
    if let Some(xml) = load_config_from_xml()? {
        xml.apply_to(&mut cfg).context("invalid value in config file")?;
    }
    args.apply_overrides(&mut cfg);
    Ok(cfg)
}

fn organize(cfg: &Config, files: Vec<std::path::PathBuf>, cancel: CancelToken) -> ExitCode {
    // Setup errors are reported once, before any file is touched.
    let job = match cfg.to_job() {
        Ok(job) => job,
        Err(e) => {
            error!(kind = e.kind(), "setup failed");
            out::print_error(&out::error_chain(&e));
            return ExitCode::FAILURE;
        }
    };

    let organizer = Organizer::new(job, DicomReader).with_cancel_token(cancel);
    match organizer.run(FileSource::from_args(files), &ConsoleReporter) {
        Ok(summary) => {
            if summary.state == RunState::Cancelled {
                out::print_info(&format!(
                    "Cancelled; {} file(s) organized before the interrupt",
                    summary.organized
                ));
            } else if summary.failed > 0 {
                out::print_warn(&format!(
                    "{} file(s) organized, {} failed",
                    summary.organized, summary.failed
                ));
            }
            ExitCode::SUCCESS
        }
        Err(e) if e.is_per_file() => {
            // The failure line itself was already printed by the reporter.
            error!(kind = e.kind(), "run stopped after the first failure");
            out::print_info("Stopped after the first failure (use --error-mode continue to keep going)");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!(kind = e.kind(), "run failed");
            out::print_error(&out::error_chain(&e));
            ExitCode::FAILURE
        }
    }
}

fn print_config_location() {
    if let Some(cfg_env) = std::env::var_os(CONFIG_ENV) {
        out::print_info(&format!(
            "Using {} (explicit):\n  {}\n",
            CONFIG_ENV,
            std::path::Path::new(&cfg_env).display()
        ));
        out::print_info(&format!(
            "To override, unset {CONFIG_ENV} or set it to another file."
        ));
        return;
    }
    match default_config_path() {
        Some(p) => {
            out::print_info(&format!(
                "Default dcm_organize config path:\n  {}\n",
                p.display()
            ));
            if p.exists() {
                out::print_info("A config file exists at that location.");
            } else {
                out::print_info("No config file exists there; built-in defaults apply.");
            }
        }
        None => out::print_error("Could not determine a default config path"),
    }
}
