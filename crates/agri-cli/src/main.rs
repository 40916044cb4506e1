//! Agri Shield CLI.

use std::io::{self, IsTerminal};
use std::path::Path;

use agri_cli::cli::{Cli, Command, ConfigCommand, LogFormatArg, LogLevelArg};
use agri_cli::commands::{Services, run};
use agri_cli::logging::{LogConfig, LogFormat, init_logging};
use agri_cli::settings::{Settings, load_settings, save_settings, settings_path};
use agri_state::{load_or_new, save_session};
use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match execute(cli) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn execute(cli: Cli) -> Result<()> {
    let settings = load_settings(cli.config.as_deref());
    let session_path = settings.session_path(cli.session.as_deref());

    if let Command::Config(cmd) = cli.command {
        return run_config(&cmd, &settings, cli.config.as_deref(), &session_path);
    }

    let mut state = load_or_new(&session_path)
        .with_context(|| format!("load session {}", session_path.display()))?;
    let revision = state.revision();
    let services = Services::from_settings(&settings);

    run(cli.command, &mut state, &services)?;

    if state.revision() != revision {
        save_session(&state, &session_path)
            .with_context(|| format!("save session {}", session_path.display()))?;
    }
    Ok(())
}

fn run_config(
    cmd: &ConfigCommand,
    settings: &Settings,
    explicit: Option<&Path>,
    session_path: &Path,
) -> Result<()> {
    let config_path = explicit.map(Path::to_path_buf).or_else(settings_path);
    match cmd {
        ConfigCommand::Show => {
            print!("{}", toml::to_string_pretty(settings).context("serialize settings")?);
        }
        ConfigCommand::Path => {
            match &config_path {
                Some(path) => println!("Settings: {}", path.display()),
                None => println!("Settings: (no config directory on this platform)"),
            }
            println!("Session: {}", session_path.display());
        }
        ConfigCommand::Init { force } => {
            let path = config_path.context("no config directory on this platform; pass --config")?;
            if path.exists() && !force {
                anyhow::bail!("{} already exists; use --force to overwrite", path.display());
            }
            save_settings(&Settings::default(), &path)?;
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
