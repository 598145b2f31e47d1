use anyhow::Context;
use std::fmt;
use std::path::Path;
use thiserror::Error;

use crate::access::{self, Navigation, Screen};
use crate::api::{
    ApiClient, ApiError, Credentials, Mutation, QueryCache, QueryKey, Registration,
};
use crate::config::ClientConfig;
use crate::course::{Course, CourseDraft, CourseFilter, FormError, FormErrors};
use crate::identity::{IdentitySnapshot, IdentityStore};

/// Severity of a user-facing notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
}

/// A dismissable message shown after an action completes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub title: String,
    pub description: Option<String>,
}

impl Notification {
    pub fn success(title: impl Into<String>, description: Option<String>) -> Self {
        Self {
            level: Level::Success,
            title: title.into(),
            description,
        }
    }

    /// The failure notification for a backend error: raw message, no retry
    pub fn from_api_error(err: &ApiError) -> Self {
        Self {
            level: Level::Error,
            title: "Error!".to_string(),
            description: Some(err.message().to_string()),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = match self.level {
            Level::Success => "✓",
            Level::Error => "✗",
        };
        match &self.description {
            Some(description) => write!(f, "{} {} {}", mark, self.title, description),
            None => write!(f, "{} {}", mark, self.title),
        }
    }
}

/// Why a user action did not complete
#[derive(Debug, Error)]
pub enum FlowError {
    /// Form input was rejected locally; nothing was sent
    #[error("{0}")]
    Invalid(#[from] FormErrors),

    /// The screen behind the action is not reachable with this identity
    #[error("{from} requires a different login, redirecting to {to}")]
    Redirected { from: Screen, to: Screen },

    /// The backend call failed
    #[error("{0}")]
    Api(#[from] ApiError),

    /// Local persistence failed
    #[error(transparent)]
    Local(#[from] anyhow::Error),
}

/// Values from the login form
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<Credentials, FormErrors> {
        let mut errors = Vec::new();
        if self.email.trim().is_empty() {
            errors.push(FormError::Required("email"));
        }
        if self.password.is_empty() {
            errors.push(FormError::Required("password"));
        }
        FormErrors(errors).into_result()?;

        Ok(Credentials {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

/// Values from the signup form
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl SignupForm {
    pub fn validate(&self) -> Result<Registration, FormErrors> {
        let mut errors = Vec::new();
        if self.email.trim().is_empty() {
            errors.push(FormError::Required("email"));
        }
        if self.password.is_empty() {
            errors.push(FormError::Required("password"));
        }
        if self.name.trim().is_empty() {
            errors.push(FormError::Required("name"));
        }
        FormErrors(errors).into_result()?;

        Ok(Registration::student(
            self.email.trim().to_string(),
            self.password.clone(),
            self.name.trim().to_string(),
        ))
    }
}

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub notification: Notification,
    pub landing: Screen,
    pub identity: IdentitySnapshot,
}

/// One client session: the stored identity, the backend client and the
/// list cache
///
/// Every guarded action re-reads the current identity through the access
/// gate before doing anything else.
pub struct Session {
    store: IdentityStore,
    identity: IdentitySnapshot,
    client: ApiClient,
    cache: QueryCache,
}

impl Session {
    /// Open a session using the identity stored in `data_dir`
    pub fn open(data_dir: &Path, config: &ClientConfig) -> anyhow::Result<Self> {
        let store = IdentityStore::new(data_dir);
        let identity = store.load().context("Failed to load identity")?;
        let client = ApiClient::new(&config.api)
            .context("Failed to create API client")?
            .with_token(identity.token.clone());

        Ok(Self {
            store,
            identity,
            client,
            cache: QueryCache::new(),
        })
    }

    pub fn identity(&self) -> &IdentitySnapshot {
        &self.identity
    }

    pub fn store(&self) -> &IdentityStore {
        &self.store
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Where a navigation to `screen` ends up right now
    pub fn navigate(&self, screen: Screen) -> Navigation {
        access::resolve(screen, &self.identity)
    }

    /// Fail with a redirect unless `screen` can be shown as requested
    pub fn guard(&self, screen: Screen) -> Result<(), FlowError> {
        match self.navigate(screen) {
            Navigation::Show(shown) if shown == screen => Ok(()),
            Navigation::Show(shown) => Err(FlowError::Redirected { from: screen, to: shown }),
            Navigation::Redirect { from, to } => {
                tracing::info!("Navigation to {} denied, redirecting to {}", from, to);
                Err(FlowError::Redirected { from, to })
            }
        }
    }

    fn replace_identity(&mut self, identity: IdentitySnapshot) {
        self.client.set_token(identity.token.clone());
        self.identity = identity;
        self.cache.clear();
    }

    pub async fn login(&mut self, form: &LoginForm) -> Result<LoginOutcome, FlowError> {
        self.guard(Screen::Login)?;
        let credentials = form.validate()?;

        let response = self.client.login(&credentials).await?;
        let identity = self.store.login(&response)?;
        tracing::info!("Logged in as {} ({})", response.user.name, response.user.role);

        self.replace_identity(identity.clone());

        Ok(LoginOutcome {
            notification: Notification::success("Welcome", identity.display_name.clone()),
            landing: access::landing_screen(identity.role),
            identity,
        })
    }

    pub async fn signup(&mut self, form: &SignupForm) -> Result<Notification, FlowError> {
        self.guard(Screen::Signup)?;
        let registration = form.validate()?;

        self.client.register(&registration).await?;
        tracing::info!("Registered {}", registration.email);

        Ok(Notification::success("Account Created Successfully!", None))
    }

    /// Clear the whole identity; returns false when nobody was logged in
    pub fn logout(&mut self) -> Result<bool, FlowError> {
        let was_logged_in = self.store.logout()?;
        self.replace_identity(IdentitySnapshot::anonymous());
        Ok(was_logged_in)
    }

    /// All offered courses, as seen from the course selection screen
    pub async fn all_courses(&mut self, filter: CourseFilter) -> Result<Vec<Course>, FlowError> {
        self.guard(Screen::CourseSelection)?;
        self.fetch_total(filter).await
    }

    /// All offered courses, as seen from the admin panel
    pub async fn admin_courses(&mut self) -> Result<Vec<Course>, FlowError> {
        self.guard(Screen::AdminPanel)?;
        self.fetch_total(CourseFilter::default()).await
    }

    async fn fetch_total(&mut self, filter: CourseFilter) -> Result<Vec<Course>, FlowError> {
        let client = &self.client;
        let courses = self
            .cache
            .get_or_fetch(QueryKey::TotalCourses(filter.clone()), || {
                client.list_courses(&filter)
            })
            .await?;
        Ok(courses)
    }

    /// Courses the current student is enrolled in
    pub async fn selected_courses(&mut self) -> Result<Vec<Course>, FlowError> {
        self.guard(Screen::CourseSelection)?;
        let client = &self.client;
        let courses = self
            .cache
            .get_or_fetch(QueryKey::SelectedCourses, || client.enrolled_courses())
            .await?;
        Ok(courses)
    }

    fn completed(&mut self, mutation: Mutation) {
        self.cache.invalidate(mutation.invalidates());
    }

    pub async fn enroll(&mut self, course_id: &str) -> Result<Notification, FlowError> {
        self.guard(Screen::CourseSelection)?;
        let course = self.client.enroll(course_id).await?;
        self.completed(Mutation::Enroll);

        Ok(Notification::success(
            "Course Selected!",
            Some(format!("course selected with id of {}", course.course_id)),
        ))
    }

    pub async fn unenroll(&mut self, course_id: &str) -> Result<Notification, FlowError> {
        self.guard(Screen::CourseSelection)?;
        let course = self.client.unenroll(course_id).await?;
        self.completed(Mutation::Unenroll);

        Ok(Notification::success(
            "Course Unenrolled!",
            Some(format!("course unenrolled with id of {}", course.course_id)),
        ))
    }

    pub async fn create_course(&mut self, draft: &CourseDraft) -> Result<Notification, FlowError> {
        self.guard(Screen::AdminPanel)?;
        let new_course = draft.validate()?;

        let course = self.client.create_course(&new_course).await?;
        self.completed(Mutation::CreateCourse);

        Ok(Notification::success(
            "Course Added",
            Some(format!("Course Added with id of {}", course.course_id)),
        ))
    }

    pub async fn delete_course(&mut self, course_id: &str) -> Result<Notification, FlowError> {
        self.guard(Screen::AdminPanel)?;
        let course = self.client.delete_course(course_id).await?;
        self.completed(Mutation::DeleteCourse);

        Ok(Notification::success(
            "Course Deleted!",
            Some(format!("course deleted with id of {}", course.course_id)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Role;
    use tempfile::tempdir;

    // Nothing listens here, so any request that escapes fails as Transport.
    fn offline_config() -> ClientConfig {
        let mut config = ClientConfig::default();
        config.api.base_url = "http://127.0.0.1:9/api/v1/".to_string();
        config.api.timeout_secs = 2;
        config
    }

    fn write_identity(dir: &Path, token: &str, role: Role) {
        let json = serde_json::json!({
            "version": "1.0",
            "token": token,
            "role": role,
        });
        std::fs::write(dir.join("identity.json"), json.to_string()).unwrap();
    }

    #[test]
    fn login_form_requires_both_fields() {
        let errors = LoginForm::default().validate().unwrap_err();
        assert_eq!(
            errors.0,
            vec![FormError::Required("email"), FormError::Required("password")]
        );
    }

    #[test]
    fn signup_form_builds_student_registration() {
        let form = SignupForm {
            email: " sam@uni.edu ".to_string(),
            password: "hunter2".to_string(),
            name: "Sam".to_string(),
        };
        let registration = form.validate().unwrap();

        assert_eq!(registration.email, "sam@uni.edu");
        assert_eq!(registration.role, Role::Student);
    }

    #[test]
    fn error_notification_carries_backend_message() {
        let err = ApiError::Backend {
            status: 409,
            message: "already enrolled".to_string(),
        };
        let notification = Notification::from_api_error(&err);

        assert_eq!(notification.level, Level::Error);
        assert_eq!(notification.description.as_deref(), Some("already enrolled"));
        assert_eq!(notification.to_string(), "✗ Error! already enrolled");
    }

    #[tokio::test]
    async fn anonymous_enroll_is_redirected_before_any_request() {
        let dir = tempdir().unwrap();
        let mut session = Session::open(dir.path(), &offline_config()).unwrap();

        let err = session.enroll("12").await.unwrap_err();
        assert!(matches!(
            err,
            FlowError::Redirected { from: Screen::CourseSelection, to: Screen::Login }
        ));
    }

    #[tokio::test]
    async fn student_cannot_create_course() {
        let dir = tempdir().unwrap();
        write_identity(dir.path(), "t", Role::Student);
        let mut session = Session::open(dir.path(), &offline_config()).unwrap();

        let err = session.create_course(&CourseDraft::default()).await.unwrap_err();
        assert!(matches!(err, FlowError::Redirected { to: Screen::Login, .. }));
    }

    #[tokio::test]
    async fn empty_day_set_is_rejected_without_request() {
        let dir = tempdir().unwrap();
        write_identity(dir.path(), "t", Role::Admin);
        let mut session = Session::open(dir.path(), &offline_config()).unwrap();

        let draft = CourseDraft {
            name: "Networks".to_string(),
            professor: "Dr. Cerf".to_string(),
            days: vec![],
            from_time: Some("10:00".to_string()),
            to_time: Some("11:00".to_string()),
        };

        match session.create_course(&draft).await.unwrap_err() {
            FlowError::Invalid(errors) => assert_eq!(errors.0, vec![FormError::NoDays]),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn login_screen_is_skipped_when_logged_in() {
        let dir = tempdir().unwrap();
        write_identity(dir.path(), "t", Role::Student);
        let mut session = Session::open(dir.path(), &offline_config()).unwrap();

        let form = LoginForm {
            email: "a@b.c".to_string(),
            password: "pw".to_string(),
        };
        let err = session.login(&form).await.unwrap_err();
        assert!(matches!(
            err,
            FlowError::Redirected { from: Screen::Login, to: Screen::CourseSelection }
        ));
    }

    #[test]
    fn logout_returns_to_anonymous() {
        let dir = tempdir().unwrap();
        write_identity(dir.path(), "t", Role::Admin);
        let mut session = Session::open(dir.path(), &offline_config()).unwrap();
        assert!(session.identity().is_authenticated());

        assert!(session.logout().unwrap());
        assert!(!session.identity().is_authenticated());
        assert!(session.guard(Screen::AdminPanel).is_err());
        assert!(!session.logout().unwrap());
    }
}
