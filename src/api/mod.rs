//! REST transport for the course backend
//!
//! Every call returns a tagged Result: the response body on success, or an
//! ApiError saying whether the request failed to travel, the backend
//! refused it, or the answer could not be read. Callers decide how to show
//! it. Lists are cached in-process and invalidated by the mutations that
//! change them.

mod cache;
mod client;
mod error;
mod types;

pub use cache::{Mutation, QueryCache, QueryKey, QueryScope};
pub use client::ApiClient;
pub use error::{ApiError, ErrorKind};
pub use types::{CourseResponse, CoursesResponse, Credentials, LoginResponse, LoginUser, Registration};
