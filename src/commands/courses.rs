use anyhow::Result;

use course_selection::access::Screen;
use course_selection::course::CourseFilter;

use super::utils::{AppContext, block_on, confirm, flow_failure, print_courses, print_notification};

/// List offered courses, optionally filtered
pub fn list(ctx: &AppContext, name: Option<String>, professor: Option<String>) -> Result<()> {
    let mut session = ctx.session()?;
    let filter = CourseFilter::new(name, professor);

    let courses = block_on(session.all_courses(filter))?.map_err(flow_failure)?;

    println!("All Courses");
    print_courses(&courses);
    Ok(())
}

/// List the student's courses
pub fn enrolled(ctx: &AppContext) -> Result<()> {
    let mut session = ctx.session()?;

    let courses = block_on(session.selected_courses())?.map_err(flow_failure)?;

    println!("Selected Courses");
    print_courses(&courses);
    Ok(())
}

/// Enroll, then show the refreshed selection
pub fn enroll(ctx: &AppContext, course_id: &str, yes: bool) -> Result<()> {
    let mut session = ctx.session()?;
    session.guard(Screen::CourseSelection).map_err(flow_failure)?;

    if !confirm(&format!("Select course {}?", course_id), yes)? {
        println!("Cancelled");
        return Ok(());
    }

    let courses = block_on(async {
        let notification = session.enroll(course_id).await?;
        print_notification(&notification);
        session.selected_courses().await
    })?
    .map_err(flow_failure)?;

    println!();
    println!("Selected Courses");
    print_courses(&courses);
    Ok(())
}

/// Drop a course, then show the refreshed selection
pub fn unenroll(ctx: &AppContext, course_id: &str, yes: bool) -> Result<()> {
    let mut session = ctx.session()?;
    session.guard(Screen::CourseSelection).map_err(flow_failure)?;

    if !confirm(&format!("Unenroll from course {}?", course_id), yes)? {
        println!("Cancelled");
        return Ok(());
    }

    let courses = block_on(async {
        let notification = session.unenroll(course_id).await?;
        print_notification(&notification);
        session.selected_courses().await
    })?
    .map_err(flow_failure)?;

    println!();
    println!("Selected Courses");
    print_courses(&courses);
    Ok(())
}
