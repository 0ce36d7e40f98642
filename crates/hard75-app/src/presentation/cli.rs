use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use hard75_domain::day_record::Habit;
use hard75_domain::identity::Identity;
use hard75_infrastructure::config::Environment;
use hard75_infrastructure::identity::SimulatedFailure;

use crate::application::services::LogLevel;
use crate::application::{AppEvent, FormEdit};

#[derive(Parser, Debug)]
#[command(name = "hard75", version, about = "Hard 75 daily habit tracker")]
pub struct Cli {
    /// Data directory (default: platform data dir + /hard75)
    #[arg(long, global = true, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Never talk to the remote log
    #[arg(long, global = true)]
    pub offline: bool,

    /// Environment: local, staging or production (default: detected)
    #[arg(long, global = true, value_name = "ENV")]
    pub env: Option<Environment>,

    /// Machine-readable JSON output
    #[arg(long, global = true)]
    pub json: bool,

    /// Remote log backend
    #[arg(long, global = true, value_enum, default_value_t = RemoteKind::Firestore)]
    pub remote: RemoteKind,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RemoteKind {
    /// Firestore REST API
    Firestore,
    /// Process-local store, nothing leaves this run
    Memory,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Show today's status, streaks, form and log (default)
    Status,

    /// Tick (or with --off, untick) a requirement and autosave
    Check {
        /// workout1, workout2, diet, photo or reading
        habit: Habit,
        #[arg(long)]
        off: bool,
    },

    /// Change today's water count (0..=20 cups of 400 ml)
    Water {
        #[command(subcommand)]
        action: WaterAction,
    },

    /// Submit today; rejected with reasons unless every requirement is met
    Submit,

    /// Delete today's record and clear the form
    Reset,

    /// Show the log, newest first
    Log,

    /// Sign in
    Login(LoginArgs),

    /// Sign out
    Logout,

    /// Stay running: live sync, day rollover, commands from stdin
    Watch,

    /// Show or persist the log level used from the next start
    LogLevel {
        level: Option<LogLevel>,
    },
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaterAction {
    Inc,
    Dec,
    Set {
        #[arg(allow_negative_numbers = true)]
        cups: i64,
    },
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct LoginArgs {
    #[arg(long)]
    pub uid: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    /// Bearer ID token for the remote log
    #[arg(long)]
    pub token: Option<String>,

    /// Reproduce a popup outcome: popup-blocked, popup-closed or error:<msg>
    #[arg(long, value_name = "OUTCOME")]
    pub simulate: Option<SimulatedFailure>,
}

impl LoginArgs {
    pub fn claim(&self) -> Identity {
        let mut identity = Identity::new(&self.uid);
        if let Some(name) = &self.name {
            identity = identity.with_display_name(name);
        }
        if let Some(email) = &self.email {
            identity = identity.with_email(email);
        }
        if let Some(token) = &self.token {
            identity = identity.with_id_token(token);
        }
        identity
    }
}

impl Command {
    /// Event this command feeds the tracker; `None` for pure reads
    pub fn to_event(&self) -> Option<AppEvent> {
        match self {
            Command::Check { habit, off } => {
                Some(AppEvent::FormEdited(FormEdit::Check(*habit, !off)))
            }
            Command::Water { action } => Some(AppEvent::FormEdited(match action {
                WaterAction::Inc => FormEdit::WaterIncrement,
                WaterAction::Dec => FormEdit::WaterDecrement,
                WaterAction::Set { cups } => FormEdit::WaterSet(*cups),
            })),
            Command::Submit => Some(AppEvent::Submit),
            Command::Reset => Some(AppEvent::ResetToday),
            Command::Login(args) => Some(AppEvent::SignInRequested(args.claim())),
            Command::Logout => Some(AppEvent::SignOutRequested),
            Command::Status | Command::Log | Command::Watch | Command::LogLevel { .. } => None,
        }
    }
}

/// One line typed into `watch`
#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_help_flag = true)]
struct WatchLine {
    #[command(subcommand)]
    command: Command,
}

/// Parse a `watch` input line with the same grammar as the CLI.
/// A blank line or a read-only command re-renders; `quit` stops.
pub fn parse_watch_line(line: &str) -> Result<AppEvent, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        [] => return Ok(AppEvent::Refresh),
        ["quit"] | ["exit"] => return Ok(AppEvent::Shutdown),
        _ => {}
    }

    let parsed = WatchLine::try_parse_from(words).map_err(|e| e.to_string())?;
    match parsed.command {
        Command::Watch | Command::LogLevel { .. } => {
            Err("Not available inside watch".to_string())
        }
        Command::Login(LoginArgs {
            simulate: Some(_), ..
        }) => Err("--simulate is only available on the login command".to_string()),
        command => Ok(command.to_event().unwrap_or(AppEvent::Refresh)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("hard75").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_default_command_and_global_flags() {
        let cli = parse(&["--offline", "--json"]);
        assert!(cli.offline);
        assert!(cli.json);
        assert_eq!(cli.remote, RemoteKind::Firestore);
        assert!(cli.command.is_none());

        let cli = parse(&["log", "--env", "staging", "--remote", "memory"]);
        assert_eq!(cli.command, Some(Command::Log));
        assert_eq!(cli.env, Some(Environment::Staging));
        assert_eq!(cli.remote, RemoteKind::Memory);
    }

    #[test]
    fn test_form_commands_map_to_events() {
        let cli = parse(&["check", "diet"]);
        assert_eq!(
            cli.command.unwrap().to_event(),
            Some(AppEvent::FormEdited(FormEdit::Check(Habit::Diet, true)))
        );

        let cli = parse(&["check", "w2", "--off"]);
        assert_eq!(
            cli.command.unwrap().to_event(),
            Some(AppEvent::FormEdited(FormEdit::Check(Habit::Workout2, false)))
        );

        let cli = parse(&["water", "set", "-3"]);
        assert_eq!(
            cli.command.unwrap().to_event(),
            Some(AppEvent::FormEdited(FormEdit::WaterSet(-3)))
        );

        assert!(Cli::try_parse_from(["hard75", "check", "yoga"]).is_err());
    }

    #[test]
    fn test_login_builds_claim() {
        let cli = parse(&[
            "login",
            "--uid",
            "u1",
            "--name",
            "Alice",
            "--simulate",
            "popup-blocked",
        ]);
        let Some(Command::Login(args)) = cli.command else {
            panic!("expected login");
        };
        assert_eq!(args.simulate, Some(SimulatedFailure::PopupBlocked));
        assert_eq!(args.claim(), Identity::new("u1").with_display_name("Alice"));
    }

    #[test]
    fn test_log_level_command() {
        let cli = parse(&["log-level", "debug"]);
        assert_eq!(
            cli.command,
            Some(Command::LogLevel {
                level: Some(LogLevel::Debug)
            })
        );
    }

    #[test]
    fn test_watch_lines() {
        assert_eq!(parse_watch_line("  "), Ok(AppEvent::Refresh));
        assert_eq!(parse_watch_line("status"), Ok(AppEvent::Refresh));
        assert_eq!(parse_watch_line("quit"), Ok(AppEvent::Shutdown));
        assert_eq!(
            parse_watch_line("water inc"),
            Ok(AppEvent::FormEdited(FormEdit::WaterIncrement))
        );
        assert_eq!(parse_watch_line("submit"), Ok(AppEvent::Submit));
        assert_eq!(
            parse_watch_line("login --uid u2"),
            Ok(AppEvent::SignInRequested(Identity::new("u2")))
        );
        assert!(parse_watch_line("login --uid u2 --simulate popup-closed").is_err());
        assert!(parse_watch_line("watch").is_err());
        assert!(parse_watch_line("dance").is_err());
    }
}
