use std::fs;
use std::path::{Path, PathBuf};
use std::process::{ExitCode, Termination};

use clap::Parser;

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    #[command(subcommand)]
    SearchPage(search_page::Command),
}

#[derive(clap::Parser, Debug)]
#[command(
    author,
    version = env!("CARGO_PKG_VERSION"),
    about = "Scour",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub(crate) command: Command,
}

impl Cli {
    async fn run(self) -> ExitCode {
        match self.run_command().await {
            Ok(code) => code,
            Err(err) => {
                eprintln!("Error: {err}");
                for (n, err) in err.chain().skip(1).enumerate() {
                    if n == 0 {
                        eprintln!("Caused by:");
                    }
                    eprintln!("\t{err}");
                }

                ExitCode::FAILURE
            }
        }
    }

    async fn run_command(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Command::SearchPage(run) => run.run().await,
        }
    }
}

#[tokio::main]
async fn main() -> impl Termination {
    load_xdg_config();
    Cli::parse().run().await
}

fn config_dir() -> Option<PathBuf> {
    if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
        Some(Path::new(&xdg_config_home).join("scour"))
    } else if let Ok(home) = std::env::var("HOME") {
        Some(Path::new(&home).join(".config").join("scour"))
    } else {
        None
    }
}

/// Read a configuration directory: every file is a variable, named after the file, holding its
/// trimmed content.
fn read_config_dir(dir: &Path) -> std::io::Result<Vec<(String, String)>> {
    let mut vars = Vec::new();
    for entry in dir.read_dir()?.flatten() {
        if !entry.path().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(ToString::to_string) else {
            continue;
        };
        if let Ok(value) = fs::read_to_string(entry.path()) {
            vars.push((name, value.trim().to_string()));
        }
    }
    Ok(vars)
}

fn load_xdg_config() {
    let Some(config_dir) = config_dir() else {
        return;
    };

    if config_dir.is_dir() {
        match read_config_dir(&config_dir) {
            Ok(vars) => {
                for (name, value) in vars {
                    std::env::set_var(name, value);
                }
            }
            Err(_) => eprintln!("Warning: unable to read configuration directory: {:?}", config_dir),
        }
    }
}
