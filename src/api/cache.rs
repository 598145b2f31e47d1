//! In-process cache of course list queries.
//!
//! Lists are fetched once and reused until a mutation invalidates the
//! scope they belong to, at which point the next read refetches.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::future::Future;

use super::error::ApiError;
use crate::course::{Course, CourseFilter};

/// Identifies one cached list
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// `GET /courses` with a particular filter
    TotalCourses(CourseFilter),
    /// `GET /user/courses`
    SelectedCourses,
}

/// Group of keys invalidated together
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryScope {
    TotalCourses,
    SelectedCourses,
}

impl QueryKey {
    pub fn scope(&self) -> QueryScope {
        match self {
            QueryKey::TotalCourses(_) => QueryScope::TotalCourses,
            QueryKey::SelectedCourses => QueryScope::SelectedCourses,
        }
    }
}

/// A state-changing backend call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    CreateCourse,
    DeleteCourse,
    Enroll,
    Unenroll,
}

impl Mutation {
    /// Lists made stale when this mutation succeeds
    pub fn invalidates(&self) -> QueryScope {
        match self {
            Mutation::CreateCourse | Mutation::DeleteCourse => QueryScope::TotalCourses,
            Mutation::Enroll | Mutation::Unenroll => QueryScope::SelectedCourses,
        }
    }
}

#[derive(Debug, Clone)]
struct CachedQuery {
    courses: Vec<Course>,
    fetched_at: DateTime<Utc>,
}

/// Cache of fetched course lists
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: HashMap<QueryKey, CachedQuery>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &QueryKey) -> Option<&[Course]> {
        self.entries.get(key).map(|entry| entry.courses.as_slice())
    }

    pub fn fetched_at(&self, key: &QueryKey) -> Option<DateTime<Utc>> {
        self.entries.get(key).map(|entry| entry.fetched_at)
    }

    pub fn insert(&mut self, key: QueryKey, courses: Vec<Course>) {
        self.entries.insert(
            key,
            CachedQuery {
                courses,
                fetched_at: Utc::now(),
            },
        );
    }

    /// Return the cached list or fetch and remember it
    ///
    /// A failed fetch leaves the cache untouched.
    pub async fn get_or_fetch<F, Fut>(&mut self, key: QueryKey, fetch: F) -> Result<Vec<Course>, ApiError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Course>, ApiError>>,
    {
        if let Some(courses) = self.get(&key) {
            tracing::debug!("Cache hit for {:?}", key);
            return Ok(courses.to_vec());
        }

        tracing::debug!("Cache miss for {:?}", key);
        let courses = fetch().await?;
        self.insert(key, courses.clone());
        Ok(courses)
    }

    /// Drop every entry in `scope`; returns how many were dropped
    pub fn invalidate(&mut self, scope: QueryScope) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| key.scope() != scope);
        let dropped = before - self.entries.len();
        tracing::debug!("Invalidated {} cached {:?} queries", dropped, scope);
        dropped
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
