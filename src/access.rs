use std::fmt;

use crate::identity::{IdentitySnapshot, Role};

/// Path of the login screen, the target of every denied navigation
pub const LOGIN_PATH: &str = "/login";

/// A precondition a screen declares before it may be entered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Authenticated,
    AdminRole,
}

impl Capability {
    fn is_satisfied_by(&self, identity: &IdentitySnapshot) -> bool {
        match self {
            Capability::Authenticated => identity.is_authenticated(),
            Capability::AdminRole => identity.is_admin(),
        }
    }
}

/// Outcome of an authorization check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    RedirectTo(&'static str),
}

/// One entry of the rule table
struct Rule {
    capability: Capability,
    redirect: &'static str,
}

/// Authorization rules in priority order; the first unmet rule decides.
/// Authentication must stay ahead of any role rule.
const RULES: &[Rule] = &[
    Rule {
        capability: Capability::Authenticated,
        redirect: LOGIN_PATH,
    },
    Rule {
        capability: Capability::AdminRole,
        redirect: LOGIN_PATH,
    },
];

/// Decides whether a screen may be entered
pub struct AccessGate;

impl AccessGate {
    /// Check `required` capabilities against the identity
    ///
    /// Pure: the same inputs always give the same decision, and nothing is
    /// cached between calls.
    pub fn authorize(identity: &IdentitySnapshot, required: &[Capability]) -> Decision {
        RULES
            .iter()
            .filter(|rule| required.contains(&rule.capability))
            .find(|rule| !rule.capability.is_satisfied_by(identity))
            .map_or(Decision::Allow, |rule| Decision::RedirectTo(rule.redirect))
    }
}

/// Screens of the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Root,
    Login,
    Signup,
    CourseSelection,
    AdminPanel,
}

impl Screen {
    pub const ALL: [Screen; 5] = [
        Screen::Root,
        Screen::Login,
        Screen::Signup,
        Screen::CourseSelection,
        Screen::AdminPanel,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Screen::Root => "/",
            Screen::Login => LOGIN_PATH,
            Screen::Signup => "/signup",
            Screen::CourseSelection => "/course-selection",
            Screen::AdminPanel => "/admin-panel",
        }
    }

    pub fn from_path(path: &str) -> Option<Screen> {
        let path = path.trim();
        let normalized = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };
        Self::ALL.into_iter().find(|s| s.path() == normalized)
    }

    /// Capabilities the screen requires before it mounts
    pub fn requirements(&self) -> &'static [Capability] {
        match self {
            Screen::CourseSelection => &[Capability::Authenticated],
            Screen::AdminPanel => &[Capability::Authenticated, Capability::AdminRole],
            Screen::Root | Screen::Login | Screen::Signup => &[],
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Result of following a navigation request to its end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// The requested screen (or the one it forwards to) may be shown
    Show(Screen),
    /// Access was denied; go here instead
    Redirect { from: Screen, to: Screen },
}

/// Follow a navigation request, applying forwards and the access gate
pub fn resolve(requested: Screen, identity: &IdentitySnapshot) -> Navigation {
    let screen = match requested {
        Screen::Root => Screen::CourseSelection,
        Screen::Login | Screen::Signup if identity.is_authenticated() => Screen::CourseSelection,
        other => other,
    };

    match AccessGate::authorize(identity, screen.requirements()) {
        Decision::Allow => Navigation::Show(screen),
        Decision::RedirectTo(path) => Navigation::Redirect {
            from: requested,
            to: Screen::from_path(path).unwrap_or(Screen::Login),
        },
    }
}

/// First screen shown after login
pub fn landing_screen(role: Option<Role>) -> Screen {
    match role {
        Some(Role::Admin) => Screen::AdminPanel,
        _ => Screen::CourseSelection,
    }
}
