use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Course Selection Client
///
/// Browse and enroll in university courses as a student, or create and
/// remove course offerings as an administrator.
#[derive(Parser, Debug)]
#[command(name = "course-selection")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding config.toml and the saved login
    #[arg(long, env = "COURSE_SELECTION_HOME", global = true)]
    pub home: Option<PathBuf>,

    /// Override the API root from the config file
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and remember the session
    Login {
        #[arg(long)]
        email: Option<String>,

        #[arg(long, env = "COURSE_SELECTION_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Create a student account
    Signup {
        #[arg(long)]
        email: Option<String>,

        #[arg(long, env = "COURSE_SELECTION_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Full name shown to administrators
        #[arg(long)]
        name: Option<String>,
    },
    /// Forget the saved session
    Logout,
    /// Show who is logged in
    Whoami,
    /// Navigate to a screen (/, /login, /signup, /course-selection, /admin-panel)
    Open {
        #[arg(default_value = "/")]
        path: String,
    },
    /// Student course commands
    Courses {
        #[command(subcommand)]
        command: CourseCommands,
    },
    /// Administrator course commands
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
    /// Client configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum CourseCommands {
    /// List offered courses
    List {
        /// Filter by course name
        #[arg(long)]
        name: Option<String>,

        /// Filter by professor
        #[arg(long)]
        professor: Option<String>,
    },
    /// List the courses you are enrolled in
    Enrolled,
    /// Enroll in a course
    Enroll {
        course_id: String,

        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Drop a course
    Unenroll {
        course_id: String,

        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum AdminCommands {
    /// List all course offerings
    List,
    /// Define a new course offering
    Create {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        professor: Option<String>,

        /// Meeting day; repeat or comma-separate (Saturday..Thursday)
        #[arg(long = "day", value_delimiter = ',')]
        days: Vec<String>,

        /// Start time, 24-hour HH:MM
        #[arg(long = "from")]
        from_time: Option<String>,

        /// End time, 24-hour HH:MM
        #[arg(long = "to")]
        to_time: Option<String>,
    },
    /// Remove a course offering
    Delete {
        course_id: String,

        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a config file
    Init {
        /// API root, e.g. https://courses.example.edu/api/v1/
        #[arg(long)]
        url: Option<String>,

        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration
    Show,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn create_accepts_comma_separated_days() {
        let args = Args::try_parse_from([
            "course-selection", "admin", "create", "--name", "OS", "--professor", "Tanenbaum",
            "--day", "Saturday,Monday", "--day", "Wednesday", "--from", "08:00", "--to", "09:30",
        ])
        .unwrap();

        match args.command {
            Commands::Admin { command: AdminCommands::Create { days, from_time, .. } } => {
                assert_eq!(days, vec!["Saturday", "Monday", "Wednesday"]);
                assert_eq!(from_time.as_deref(), Some("08:00"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let args = Args::try_parse_from([
            "course-selection", "courses", "enroll", "17", "-y", "--home", "/tmp/cs", "-v",
        ])
        .unwrap();

        assert!(args.verbose);
        assert_eq!(args.home, Some(PathBuf::from("/tmp/cs")));
        assert!(matches!(
            args.command,
            Commands::Courses { command: CourseCommands::Enroll { yes: true, .. } }
        ));
    }
}
