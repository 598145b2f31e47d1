use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use super::error::ApiError;
use super::types::{
    CourseResponse, CoursesResponse, Credentials, LoginResponse, Registration,
};
use crate::config::ApiSettings;
use crate::course::{Course, CourseFilter, NewCourse};

/// HTTP client for the course backend
///
/// Every request carries the stored token verbatim in `Authorization`
/// (no `Bearer` prefix) when one is held.
pub struct ApiClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new client for the configured API root
    pub fn new(settings: &ApiSettings) -> Result<Self, ApiError> {
        let base_url = Url::parse(&settings.base_url)?;

        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl {
                message: format!("{} cannot be used as an API root", settings.base_url),
            });
        }

        let client = Client::builder()
            .user_agent(format!("course-selection/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| ApiError::Transport {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url,
            token: None,
        })
    }

    /// Attach (or drop) the session token sent with each request
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.set_token(token);
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token.filter(|t| !t.is_empty());
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an endpoint URL below the API root, one path segment per item
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl {
                message: format!("{} cannot be used as an API root", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, ApiError> {
        let url = self.endpoint(segments)?;
        tracing::debug!("{} {}", method, url);

        let mut request = self.client.request(method, url);
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, token.as_str());
        }
        Ok(request)
    }

    async fn check(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = ApiError::from_response(status, &body);
        tracing::debug!("Backend returned {}: {}", status, err.message());
        Err(err)
    }

    async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
        let response = Self::check(request.send().await?).await?;
        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| ApiError::Decode {
            message: e.to_string(),
        })
    }

    /// `GET /courses` with optional name/professor filters
    pub async fn list_courses(&self, filter: &CourseFilter) -> Result<Vec<Course>, ApiError> {
        let request = self
            .request(Method::GET, &["courses"])?
            .query(&filter.query_pairs());
        let response: CoursesResponse = Self::send_json(request).await?;
        tracing::info!("Fetched {} courses", response.courses.len());
        Ok(response.courses)
    }

    /// `POST /courses/create`
    pub async fn create_course(&self, course: &NewCourse) -> Result<Course, ApiError> {
        let request = self
            .request(Method::POST, &["courses", "create"])?
            .json(course);
        let response: CourseResponse = Self::send_json(request).await?;
        tracing::info!("Created course {}", response.course.course_id);
        Ok(response.course)
    }

    /// `DELETE /courses/remove/{course_id}`
    pub async fn delete_course(&self, course_id: &str) -> Result<Course, ApiError> {
        let request = self.request(Method::DELETE, &["courses", "remove", course_id])?;
        let response: CourseResponse = Self::send_json(request).await?;
        tracing::info!("Deleted course {}", response.course.course_id);
        Ok(response.course)
    }

    /// `GET /user/courses`
    pub async fn enrolled_courses(&self) -> Result<Vec<Course>, ApiError> {
        let request = self.request(Method::GET, &["user", "courses"])?;
        let response: CoursesResponse = Self::send_json(request).await?;
        tracing::info!("Fetched {} enrolled courses", response.courses.len());
        Ok(response.courses)
    }

    /// `POST /user/enroll/{course_id}`
    pub async fn enroll(&self, course_id: &str) -> Result<Course, ApiError> {
        let request = self.request(Method::POST, &["user", "enroll", course_id])?;
        let response: CourseResponse = Self::send_json(request).await?;
        tracing::info!("Enrolled in course {}", response.course.course_id);
        Ok(response.course)
    }

    /// `POST /user/unenroll/{course_id}`
    pub async fn unenroll(&self, course_id: &str) -> Result<Course, ApiError> {
        let request = self.request(Method::POST, &["user", "unenroll", course_id])?;
        let response: CourseResponse = Self::send_json(request).await?;
        tracing::info!("Unenrolled from course {}", response.course.course_id);
        Ok(response.course)
    }

    /// `POST /login`
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let request = self.request(Method::POST, &["login"])?.json(credentials);
        Self::send_json(request).await
    }

    /// `POST /register`; the response body is not used
    pub async fn register(&self, registration: &Registration) -> Result<(), ApiError> {
        let request = self.request(Method::POST, &["register"])?.json(registration);
        Self::check(request.send().await?).await?;
        Ok(())
    }
}
