use anyhow::Result;

use course_selection::access::Screen;
use course_selection::course::CourseDraft;

use super::utils::{AppContext, block_on, confirm, flow_failure, print_courses, print_notification};

/// List every offering
pub fn list(ctx: &AppContext) -> Result<()> {
    let mut session = ctx.session()?;

    let courses = block_on(session.admin_courses())?.map_err(flow_failure)?;

    println!("Total Courses");
    print_courses(&courses);
    Ok(())
}

/// Validate and submit a new offering, then show the refreshed list
pub fn create(ctx: &AppContext, draft: CourseDraft) -> Result<()> {
    let mut session = ctx.session()?;

    let courses = block_on(async {
        let notification = session.create_course(&draft).await?;
        print_notification(&notification);
        session.admin_courses().await
    })?
    .map_err(flow_failure)?;

    println!();
    println!("Total Courses");
    print_courses(&courses);
    Ok(())
}

/// Remove an offering after confirmation
pub fn delete(ctx: &AppContext, course_id: &str, yes: bool) -> Result<()> {
    let mut session = ctx.session()?;
    session.guard(Screen::AdminPanel).map_err(flow_failure)?;

    if !confirm(&format!("Delete course {}? This cannot be undone.", course_id), yes)? {
        println!("Cancelled");
        return Ok(());
    }

    let courses = block_on(async {
        let notification = session.delete_course(course_id).await?;
        print_notification(&notification);
        session.admin_courses().await
    })?
    .map_err(flow_failure)?;

    println!();
    println!("Total Courses");
    print_courses(&courses);
    Ok(())
}
