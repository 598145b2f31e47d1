use anyhow::Result;

use course_selection::app::{LoginForm, SignupForm};
use course_selection::identity::IdentityStore;

use super::utils::{AppContext, block_on, flow_failure, format_duration, print_notification};

/// Log in and persist the returned identity
pub fn login(ctx: &AppContext, email: Option<String>, password: Option<String>) -> Result<()> {
    let mut session = ctx.session()?;
    let form = LoginForm {
        email: email.unwrap_or_default(),
        password: password.unwrap_or_default(),
    };

    let outcome = block_on(session.login(&form))?.map_err(flow_failure)?;

    print_notification(&outcome.notification);
    println!("  Continue at: {}", outcome.landing);
    Ok(())
}

/// Register a student account
pub fn signup(
    ctx: &AppContext,
    email: Option<String>,
    password: Option<String>,
    name: Option<String>,
) -> Result<()> {
    let mut session = ctx.session()?;
    let form = SignupForm {
        email: email.unwrap_or_default(),
        password: password.unwrap_or_default(),
        name: name.unwrap_or_default(),
    };

    let notification = block_on(session.signup(&form))?.map_err(flow_failure)?;

    print_notification(&notification);
    println!("  Log in with: course-selection login --email {}", form.email.trim());
    Ok(())
}

/// Clear the saved identity
///
/// Goes straight to the store so a damaged identity file can always be removed.
pub fn logout(ctx: &AppContext) -> Result<()> {
    let store = IdentityStore::new(&ctx.data_dir);

    if store.logout()? {
        println!("✓ Logged out");
    } else {
        println!("Not logged in");
    }
    Ok(())
}

/// Show the saved identity
pub fn whoami(ctx: &AppContext) -> Result<()> {
    let session = ctx.session()?;
    let identity = session.identity();

    if !identity.is_authenticated() {
        println!("Not logged in");
        return Ok(());
    }

    println!("Logged in");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    if let Some(name) = &identity.display_name {
        println!("Name:        {}", name);
    }
    if let Some(role) = identity.role {
        println!("Role:        {}", role);
    }
    if let Some(student_id) = &identity.student_id {
        println!("Student ID:  {}", student_id);
    }
    if let Some(at) = identity.logged_in_at {
        let ago = chrono::Utc::now() - at;
        println!(
            "Since:       {} ({} ago)",
            at.format("%Y-%m-%d %H:%M:%S %Z"),
            format_duration(ago)
        );
    }
    if let Some(print) = identity.fingerprint() {
        println!("Token:       {}…", print);
    }
    println!("API:         {}", session.client().base_url());

    Ok(())
}
