//! Reporting appearance changes.
use dark_mode_observer::Appearance;
use log::{debug, error};
use std::{
    io::{self, Write},
    process::{Child, Command, Stdio},
};

/// Where an appearance is reported to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reporter {
    /// Print the appearance on its own line.
    Print,
    /// Run a shell command with the appearance appended.
    Command(String),
}

impl Reporter {
    /// Report `appearance`. Only printing can fail, a command that can not be
    /// started is logged.
    pub fn report(&self, appearance: Appearance) -> io::Result<()> {
        match self {
            Reporter::Print => {
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "{appearance}")?;
                stdout.flush()
            }
            Reporter::Command(command) => {
                match spawn(command, appearance) {
                    Ok(mut child) => {
                        std::thread::spawn(move || {
                            if let Err(err) = child.wait() {
                                error!("Failed to wait for command: {err}");
                            }
                        });
                    }
                    Err(err) => error!("Failed to run {command:?}: {err}"),
                }
                Ok(())
            }
        }
    }
}

/// The shell command line for `appearance`.
pub fn command_line(command: &str, appearance: Appearance) -> String {
    format!("{command} {appearance}")
}

fn spawn(command: &str, appearance: Appearance) -> io::Result<Child> {
    let command_line = command_line(command, appearance);
    debug!("Running: {command_line}");

    Command::new("sh")
        .arg("-c")
        .arg(&command_line)
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
}
