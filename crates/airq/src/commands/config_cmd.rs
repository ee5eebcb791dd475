//! Config subcommand handlers.

use dialoguer::Input;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

fn format_config(cfg: &Config) -> String {
    output::detail(&[
        ("api_url", cfg.api_url.clone()),
        ("timeout", cfg.timeout.to_string()),
        ("insecure", cfg.insecure.to_string()),
        (
            "ca_cert",
            cfg.ca_cert
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        ),
        ("session_dir", cfg.session_dir().display().to_string()),
        ("output", cfg.output.clone()),
        ("color", cfg.color.clone()),
    ])
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => {
            let mut cfg = config::load_config_or_default();
            config::apply_overrides(&mut cfg, global);

            if global.api_url.is_none() && !global.yes {
                cfg.api_url = Input::new()
                    .with_prompt("API base URL")
                    .default(cfg.api_url.clone())
                    .interact_text()
                    .map_err(prompt_err)?;
            }
            cfg.api_url()?;

            let path = config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("✓ Configuration written to {}", path.display());
                eprintln!("  Next: airq login");
            }
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::resolve(global)?;
            let format = config::output_format(global, &cfg);
            let out = output::render_single(format, &cfg, format_config, |c| c.api_url.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }
    }
}
