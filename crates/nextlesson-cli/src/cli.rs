//! Command-line interface definition.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use nextlesson_providers::UntisConfig;

/// nextlesson - your school day at a glance
#[derive(Debug, Parser)]
#[command(name = "nextlesson")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    /// Server hostname
    #[arg(long, env = "UNTIS_SERVER")]
    pub server: Option<String>,

    /// School name
    #[arg(long, env = "UNTIS_SCHOOL")]
    pub school: Option<String>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Deployment config from flags, falling back to env and defaults.
    pub fn untis_config(&self) -> UntisConfig {
        let mut config = UntisConfig::from_env();
        if let Some(ref server) = self.server {
            config = config.with_server(server.clone());
        }
        if let Some(ref school) = self.school {
            config = config.with_school(school.clone());
        }
        config
    }
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve a class or teacher name to its element
    Resolve {
        /// Class code, teacher initials, or full name
        name: String,
    },

    /// Show today's lessons
    Today {
        /// Class code, teacher initials, or full name
        name: String,
    },

    /// Show the lessons of a specific date
    Date {
        /// Class code, teacher initials, or full name
        name: String,
        /// Date in YYYY-MM-DD format
        date: NaiveDate,
    },

    /// List every known class and teacher
    List,

    /// Keep today's lessons on screen and send notifications
    Watch {
        /// Class code, teacher initials, or full name
        name: String,

        /// Minutes of warning before each lesson
        #[arg(long, default_value = "5")]
        lead_minutes: u32,

        /// Disable desktop notifications
        #[arg(long)]
        no_notify: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_today_command() {
        let cli = Cli::parse_from(["nextlesson", "today", "M5"]);
        match cli.command {
            Command::Today { name } => assert_eq!(name, "M5"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_date_command() {
        let cli = Cli::parse_from(["nextlesson", "date", "M5", "2025-08-25"]);
        match cli.command {
            Command::Date { name, date } => {
                assert_eq!(name, "M5");
                assert_eq!(date, NaiveDate::from_ymd_opt(2025, 8, 25).unwrap());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_dates() {
        assert!(Cli::try_parse_from(["nextlesson", "date", "M5", "25.08.2025"]).is_err());
    }

    #[test]
    fn watch_defaults() {
        let cli = Cli::parse_from(["nextlesson", "watch", "M5"]);
        match cli.command {
            Command::Watch {
                lead_minutes,
                no_notify,
                ..
            } => {
                assert_eq!(lead_minutes, 5);
                assert!(!no_notify);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn server_flag_overrides_config() {
        let cli = Cli::parse_from(["nextlesson", "--server", "other.webuntis.com", "list"]);
        assert_eq!(cli.untis_config().server, "other.webuntis.com");
    }
}
