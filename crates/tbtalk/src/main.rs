//! `tbtalk` - CLI for the toolbox talk meeting record
//!
//! This binary runs the interactive meeting shell and the configuration
//! inspection commands.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::{BufReader, Write as _};

use anyhow::Result;
use clap::Parser;

use tbtalk::cli::{Cli, Command, ConfigCommand};
use tbtalk::{init_logging, Config, Shell};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Execute the command
    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            let config = Config::load_from(cli.config)?;
            handle_run(&config)
        }
        Command::Config(config_cmd) => handle_config(cli.config, config_cmd),
    }
}

fn handle_run(config: &Config) -> Result<()> {
    let stdin = BufReader::new(std::io::stdin());
    let mut stdout = std::io::stdout();
    let mut shell = Shell::new(config);
    shell.run(stdin, &mut stdout)?;
    stdout.flush()?;
    Ok(())
}

fn handle_config(config_path: Option<std::path::PathBuf>, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = Config::load_from(config_path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Export]");
                println!("  Output dir:      {}", config.output_dir().display());
                println!("  Filename prefix: {}", config.export.filename_prefix);
                println!("  Keep file:       {}", config.export.keep_file);
                println!();
                println!("[Meeting defaults]");
                println!("  Place:           {}", config.meeting.place);
                println!("  Work:            {}", config.meeting.work);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
