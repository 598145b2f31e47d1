use anyhow::{Context, Result};
use chrono::Duration;
use std::future::Future;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use course_selection::access::Screen;
use course_selection::api::{ApiError, ErrorKind};
use course_selection::app::{FlowError, Notification, Session};
use course_selection::config::ClientConfig;
use course_selection::course::Course;

/// Resolved locations and configuration shared by every command
pub struct AppContext {
    pub data_dir: PathBuf,
    pub config_path: PathBuf,
    pub config: ClientConfig,
}

impl AppContext {
    pub fn session(&self) -> Result<Session> {
        Session::open(&self.data_dir, &self.config)
    }
}

/// Initialize logging
///
/// `RUST_LOG` wins; otherwise `--verbose` means debug and the configured
/// level applies.
pub fn init_logging(verbose: bool, configured_level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let level = if verbose { "debug" } else { configured_level };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(level)))
        .init();
}

/// Run an async flow to completion on a fresh runtime
pub fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Runtime::new()
        .context("Failed to start async runtime")?;
    Ok(runtime.block_on(future))
}

/// Format duration for display
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.num_seconds();
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m", secs / 60)
    } else if secs < 86400 {
        format!("{}h", secs / 3600)
    } else {
        format!("{}d", secs / 86400)
    }
}

/// Ask a yes/no question on stdin; anything but y/yes is a no
pub fn confirm(question: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }

    print!("{} [y/N] ", question);
    std::io::stdout().flush().context("Failed to flush stdout")?;

    let mut answer = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read answer")?;

    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

pub fn print_notification(notification: &Notification) {
    println!("{}", notification);
}

/// Print a list of courses in card form
pub fn print_courses(courses: &[Course]) {
    if courses.is_empty() {
        println!("  No courses yet!");
        return;
    }

    for course in courses {
        println!("  [{}] {}", course.course_id, course.name);
        println!("       Professor: {}", course.professor);
        println!("       Days:      {}", course.days.display());
        println!("       Time:      {}", course.time);
    }
}

/// Turn a failed flow into the error returned from `main`
///
/// Backend failures are shown as an error notification first; form
/// problems are listed one per line.
pub fn flow_failure(err: FlowError) -> anyhow::Error {
    match err {
        FlowError::Invalid(errors) => {
            for problem in errors.iter() {
                eprintln!("  - {}", problem);
            }
            anyhow::anyhow!("Form not submitted: {}", errors)
        }
        FlowError::Redirected { from, to: Screen::Login } => anyhow::anyhow!(
            "{} is not available with the current login. Redirecting to {}; run 'course-selection login' first.",
            from,
            Screen::Login
        ),
        FlowError::Redirected { from, to } => {
            anyhow::anyhow!("Already logged in; {} redirects to {}", from, to)
        }
        FlowError::Api(e) => {
            eprintln!("{}", Notification::from_api_error(&e));
            anyhow::anyhow!(api_failure_summary(&e))
        }
        FlowError::Local(e) => e,
    }
}

/// One-line exit error for a call whose details were already shown
fn api_failure_summary(err: &ApiError) -> String {
    match (err.kind(), err.status()) {
        (ErrorKind::Backend, Some(status)) => format!("Request rejected (HTTP {})", status),
        (ErrorKind::Backend, None) => "Request rejected".to_string(),
        (ErrorKind::Transport, _) => "Request failed: backend unreachable".to_string(),
        (ErrorKind::Decode, _) => "Request failed: unexpected response".to_string(),
        (ErrorKind::InvalidUrl, _) => "Request failed: invalid API URL".to_string(),
    }
}
