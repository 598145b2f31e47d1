use anyhow::Result;

use course_selection::access::{Navigation, Screen};
use course_selection::app::FlowError;
use course_selection::course::CourseFilter;

use super::utils::{AppContext, block_on, flow_failure, print_courses};

/// Navigate to a screen and render it
pub fn open(ctx: &AppContext, path: &str) -> Result<()> {
    let Some(requested) = Screen::from_path(path) else {
        anyhow::bail!(
            "Unknown screen '{}'. Known screens: {}",
            path,
            Screen::ALL.iter().map(|s| s.path()).collect::<Vec<_>>().join(", ")
        );
    };

    let mut session = ctx.session()?;

    let screen = match session.navigate(requested) {
        Navigation::Show(screen) => screen,
        Navigation::Redirect { from, to } => {
            return Err(flow_failure(FlowError::Redirected { from, to }));
        }
    };

    if screen != requested {
        println!("{} → {}", requested, screen);
    }

    match screen {
        Screen::Root | Screen::CourseSelection => {
            let (all, selected) = block_on(async {
                let all = session.all_courses(CourseFilter::default()).await?;
                let selected = session.selected_courses().await?;
                Ok::<_, FlowError>((all, selected))
            })?
            .map_err(flow_failure)?;

            println!("All Courses");
            print_courses(&all);
            println!();
            println!("Selected Courses");
            print_courses(&selected);
        }
        Screen::AdminPanel => {
            let courses = block_on(session.admin_courses())?.map_err(flow_failure)?;

            println!("Total Courses");
            print_courses(&courses);
        }
        Screen::Login => {
            println!("Log in with: course-selection login --email <EMAIL> --password <PASSWORD>");
            println!("Don't have an account? course-selection signup");
        }
        Screen::Signup => {
            println!("Sign up with: course-selection signup --email <EMAIL> --password <PASSWORD> --name <NAME>");
        }
    }

    Ok(())
}
