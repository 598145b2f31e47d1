pub mod admin;
pub mod auth;
pub mod config;
pub mod courses;
pub mod navigate;
pub mod utils;

use anyhow::Result;

use course_selection::course::CourseDraft;

use crate::cli::{AdminCommands, Commands, ConfigCommands, CourseCommands};
use utils::AppContext;

/// Dispatch a parsed command
pub fn run_command(command: Commands, ctx: &AppContext) -> Result<()> {
    match command {
        Commands::Login { email, password } => auth::login(ctx, email, password),
        Commands::Signup { email, password, name } => auth::signup(ctx, email, password, name),
        Commands::Logout => auth::logout(ctx),
        Commands::Whoami => auth::whoami(ctx),
        Commands::Open { path } => navigate::open(ctx, &path),
        Commands::Courses { command } => match command {
            CourseCommands::List { name, professor } => courses::list(ctx, name, professor),
            CourseCommands::Enrolled => courses::enrolled(ctx),
            CourseCommands::Enroll { course_id, yes } => courses::enroll(ctx, &course_id, yes),
            CourseCommands::Unenroll { course_id, yes } => courses::unenroll(ctx, &course_id, yes),
        },
        Commands::Admin { command } => match command {
            AdminCommands::List => admin::list(ctx),
            AdminCommands::Create { name, professor, days, from_time, to_time } => {
                let draft = CourseDraft {
                    name: name.unwrap_or_default(),
                    professor: professor.unwrap_or_default(),
                    days,
                    from_time,
                    to_time,
                };
                admin::create(ctx, draft)
            }
            AdminCommands::Delete { course_id, yes } => admin::delete(ctx, &course_id, yes),
        },
        Commands::Config { command } => match command {
            ConfigCommands::Init { url, timeout, force } => config::init(ctx, url, timeout, force),
            ConfigCommands::Show => config::show(ctx),
        },
    }
}
