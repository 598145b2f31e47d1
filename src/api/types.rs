//! Request and response bodies exchanged with the backend.

use serde::{Deserialize, Deserializer, Serialize};

use crate::course::Course;
use crate::identity::Role;

/// Body of `POST /login`
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Body of `POST /register`; self-service signup always creates students
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Role,
}

impl Registration {
    pub fn student(email: String, password: String, name: String) -> Self {
        Self {
            email,
            password,
            name,
            role: Role::Student,
        }
    }
}

/// Successful `POST /login` response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: LoginUser,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoginUser {
    #[serde(default, deserialize_with = "string_or_number")]
    pub student_id: Option<String>,
    pub name: String,
    pub role: Role,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoursesResponse {
    pub courses: Vec<Course>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CourseResponse {
    pub course: Course,
}

/// Student ids arrive as strings from some deployments and numbers from others
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
