use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::Parser;

use gamut::{Converter, DEFAULT_PASS_ORDER};

mod cli;
use cli::{Cli, Commands};

fn read_all(path: Option<&PathBuf>) -> io::Result<String> {
    match path {
        Some(p) => fs::read_to_string(p),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn start_dir_for(input_path: &Option<PathBuf>) -> io::Result<PathBuf> {
    if let Some(p) = input_path {
        Ok(p.parent().unwrap_or(Path::new(".")).to_path_buf())
    } else {
        std::env::current_dir()
    }
}

fn main() -> io::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            file,
            output,
            omit_extra_wl,
        } => {
            let start_dir = start_dir_for(&file)?;
            let (mut cfg, cfg_path) = gamut::config::load(cli.config.as_deref(), &start_dir)?;

            if let Some(path) = &cfg_path {
                log::debug!("Using config from: {}", path.display());
            } else {
                log::debug!("Using default config");
            }

            if omit_extra_wl {
                cfg.omit_extra_wl_in_code_blocks = true;
            }

            let input = read_all(file.as_ref())?;
            let html = match Converter::new(cfg).make_html(&input) {
                Ok(html) => html,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };

            if let Some(output_path) = &output {
                fs::write(output_path, &html)?;
                log::info!("Wrote {}", output_path.display());
            } else {
                println!("{html}");
            }

            Ok(())
        }
        Commands::Passes => {
            for name in DEFAULT_PASS_ORDER {
                println!("{name}");
            }
            Ok(())
        }
    }
}
