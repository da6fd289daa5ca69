//! Command line options.
use crate::report::Reporter;
use clap::Parser;
use dark_mode_config::Config;

/// Watcher for macOS 10.14+ light/dark mode changes
///
/// Will print "light" or "dark" as it changes. By default, it also prints the current appearance
/// at startup. Use Ctrl-C or type "quit<enter>" to quit.
#[derive(Parser, Debug, Default)]
#[command(version)]
pub struct Options {
    /// Get the current appearance, print it or execute the command once, and exit.
    #[arg(short, long)]
    pub exit: bool,

    /// Run a command instead of printing. The appearance is appended as the last argument.
    #[arg(short, long)]
    pub command: Option<String>,

    /// Does not print the initial value, only prints actual changes.
    #[arg(short, long, overrides_with = "no_only_changes")]
    pub only_changes: bool,

    /// Print the initial value even when --only-changes was saved as a default.
    #[arg(long, overrides_with = "only_changes")]
    pub no_only_changes: bool,

    /// Save the given --command and --only-changes choices as defaults for future runs.
    #[arg(long)]
    pub save: bool,
}

/// Options merged with the saved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub exit: bool,
    pub command: Option<String>,
    pub only_changes: bool,
}

impl Options {
    /// Flags given on the command line win over saved defaults.
    pub fn settings(&self, config: &Config) -> Settings {
        let config = self.to_config(config);
        Settings {
            exit: self.exit,
            command: config.command,
            only_changes: config.only_changes,
        }
    }

    /// `config` updated with the flags given on the command line.
    pub fn to_config(&self, config: &Config) -> Config {
        let only_changes = if self.no_only_changes {
            false
        } else {
            self.only_changes || config.only_changes
        };

        Config {
            command: self.command.clone().or_else(|| config.command.clone()),
            only_changes,
        }
    }
}

impl Settings {
    /// Exiting after one report needs the initial appearance.
    pub fn trigger_initially(&self) -> bool {
        !self.only_changes || self.exit
    }

    pub fn reporter(&self) -> Reporter {
        match &self.command {
            Some(command) => Reporter::Command(command.clone()),
            None => Reporter::Print,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Options::command().debug_assert();
    }

    #[test]
    fn parse_flags() {
        let options = Options::parse_from(["dark-mode-notify", "-e", "-o", "-c", "echo"]);
        assert!(options.exit);
        assert!(options.only_changes);
        assert_eq!(options.command.as_deref(), Some("echo"));
        assert!(!options.save);

        let options = Options::parse_from([
            "dark-mode-notify",
            "--exit",
            "--only-changes",
            "--command",
            "say",
            "--save",
        ]);
        assert!(options.exit && options.only_changes && options.save);
        assert_eq!(options.command.as_deref(), Some("say"));
    }

    #[test]
    fn trigger_initially() {
        let settings = Options::default().settings(&Config::default());
        assert!(settings.trigger_initially());

        let only_changes = Options {
            only_changes: true,
            ..Default::default()
        };
        assert!(!only_changes.settings(&Config::default()).trigger_initially());

        let exit = Options {
            only_changes: true,
            exit: true,
            ..Default::default()
        };
        assert!(exit.settings(&Config::default()).trigger_initially());
    }

    #[test]
    fn saved_defaults() {
        let config = Config {
            command: Some("saved".into()),
            only_changes: true,
        };

        let settings = Options::default().settings(&config);
        assert_eq!(settings.command.as_deref(), Some("saved"));
        assert!(settings.only_changes);
        assert!(!settings.trigger_initially());

        let options = Options {
            command: Some("given".into()),
            ..Default::default()
        };
        assert_eq!(
            options.settings(&config).reporter(),
            Reporter::Command("given".into())
        );
    }

    #[test]
    fn no_only_changes_overrides_saved_default() {
        let config = Config {
            command: None,
            only_changes: true,
        };

        let options = Options::parse_from(["dark-mode-notify", "--no-only-changes"]);
        let settings = options.settings(&config);
        assert!(!settings.only_changes);
        assert!(settings.trigger_initially());
        assert!(!options.to_config(&config).only_changes);

        // The last of the two flags wins.
        let options = Options::parse_from(["dark-mode-notify", "--no-only-changes", "-o"]);
        assert!(options.settings(&Config::default()).only_changes);
        let options = Options::parse_from(["dark-mode-notify", "-o", "--no-only-changes"]);
        assert!(!options.settings(&config).only_changes);
    }

    #[test]
    fn save_keeps_unset_values() {
        let saved = Config {
            command: Some("say".into()),
            only_changes: false,
        };

        let options = Options::parse_from(["dark-mode-notify", "-o", "--save"]);
        assert_eq!(
            options.to_config(&saved),
            Config {
                command: Some("say".into()),
                only_changes: true,
            }
        );

        let options = Options::parse_from(["dark-mode-notify", "-c", "osascript", "--save"]);
        assert_eq!(
            options.to_config(&saved),
            Config {
                command: Some("osascript".into()),
                only_changes: false,
            }
        );
    }

    #[test]
    fn to_config() {
        let options = Options {
            command: Some("say".into()),
            only_changes: true,
            exit: true,
            save: true,
            ..Default::default()
        };
        assert_eq!(
            options.to_config(&Config::default()),
            Config {
                command: Some("say".into()),
                only_changes: true,
            }
        );
        assert_eq!(
            Options::default().settings(&Config::default()).reporter(),
            Reporter::Print
        );
    }
}
