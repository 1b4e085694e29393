//! `config` subcommands: init, show, path.

use spyder_config::{Config, config_path, load_config_or_default, save_config};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

pub fn handle(global: &GlobalOpts, args: &ConfigArgs) -> Result<(), CliError> {
    match &args.command {
        ConfigCommand::Init { host } => init(global, host),
        ConfigCommand::Show => show(global),
        ConfigCommand::Path => {
            output::print(&config_path().display().to_string(), global.quiet);
            Ok(())
        }
    }
}

/// The one-field setup flow: validate the host, then persist it. A bad
/// host writes nothing.
fn init(global: &GlobalOpts, host: &str) -> Result<(), CliError> {
    let mut cfg = load_config_or_default();
    cfg.set_host(host)?;
    save_config(&cfg)?;

    if !global.quiet {
        println!(
            "Configured controller {} ({})",
            cfg.host.as_deref().unwrap_or(host),
            config_path().display()
        );
    }
    Ok(())
}

/// Show the effective configuration after file + env merging.
fn show(global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = load_config_or_default();
    let format = super::resolve_output(global, &cfg);

    let out = match format {
        // TOML mirrors what `config init` writes to disk.
        OutputFormat::Table | OutputFormat::Plain => render_toml(&cfg)?,
        OutputFormat::Json => output::json(&cfg),
        OutputFormat::JsonCompact => output::json_compact(&cfg),
        OutputFormat::Yaml => output::yaml(&cfg),
    };
    output::print(out.trim_end(), global.quiet);
    Ok(())
}

fn render_toml(cfg: &Config) -> Result<String, CliError> {
    toml::to_string_pretty(cfg).map_err(|e| CliError::Validation {
        field: "config".into(),
        reason: e.to_string(),
    })
}
