//! Prints or acts on macOS light/dark mode changes.
use clap::Parser;
use dark_mode_config::{init_logger, load_config, save_config};
use log::{debug, error, info};
use options::{Options, Settings};

#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
mod options;
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
mod report;

fn main() -> anyhow::Result<()> {
    let options = Options::parse();
    let _logger = init_logger()?;

    let config = load_config()
        .inspect_err(|err| {
            info!("No config file: {err}");
        })
        .unwrap_or_default();

    if options.save {
        save_config(&options.to_config(&config))?;
    }

    let settings = options.settings(&config);
    debug!("Settings: {settings:?}");

    handle_quit();
    run(settings)
}

/// Exit when "quit" is typed on stdin.
fn handle_quit() {
    std::thread::spawn(|| {
        for line in std::io::stdin().lines() {
            match line {
                Ok(line) if line.trim() == "quit" => {
                    info!("Quit requested");
                    std::process::exit(0);
                }
                Ok(_) => {}
                Err(err) => {
                    error!("Failed to read stdin: {err}");
                    break;
                }
            }
        }
    });
}

#[cfg(target_os = "macos")]
fn run(settings: Settings) -> anyhow::Result<()> {
    let reporter = settings.reporter();
    let exit = settings.exit;

    match dark_mode_observer::observe(settings.trigger_initially(), move |appearance| {
        if let Err(err) = reporter.report(appearance) {
            error!("Failed to report {appearance}: {err}");
            std::process::exit(1);
        }
        if exit {
            std::process::exit(0);
        }
    })? {}
}

#[cfg(not(target_os = "macos"))]
fn run(_settings: Settings) -> anyhow::Result<()> {
    anyhow::bail!("dark-mode-notify only supports macOS")
}
