pub mod dto;

use std::env;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::error::AppError;
use crate::models::Course;

#[derive(Clone, Debug)]
pub struct CatalogConfig {
    pub base_url: String,
    pub api_token: String,
}

impl CatalogConfig {
    pub fn new_from_env() -> Result<Self, AppError> {
        let base_url = env::var("CATALOG_API_URL")
            .map_err(|_| AppError::BadRequest("CATALOG_API_URL is not set".to_string()))?;
        let api_token = env::var("CATALOG_API_TOKEN")
            .map_err(|_| AppError::BadRequest("CATALOG_API_TOKEN is not set".to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token,
        })
    }
}

/// Data-access collaborator. Courses come back pre-populated with their
/// sections, enrollments and ratings; the engine never writes through this
/// interface.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn fetch_courses_by_instructor(
        &self,
        instructor_id: &str,
    ) -> Result<Vec<Course>, AppError>;
    async fn fetch_course_by_id(&self, course_id: &str) -> Result<Course, AppError>;
}

pub struct CatalogHttpClient {
    client: Client,
    config: CatalogConfig,
}

impl CatalogHttpClient {
    pub fn new(config: CatalogConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::BadRequest(format!("Failed to build http client: {}", e)))?;
        Ok(Self { client, config })
    }

    async fn get(&self, path: &str) -> Result<reqwest::Response, AppError> {
        let url = format!("{}{}", self.config.base_url, path);
        self.client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_token))
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("catalog request failed: {}", e)))
    }
}

#[async_trait]
impl CatalogClient for CatalogHttpClient {
    async fn fetch_courses_by_instructor(
        &self,
        instructor_id: &str,
    ) -> Result<Vec<Course>, AppError> {
        let response = self
            .get(&format!(
                "/internal/instructors/{}/courses?include=enrollments,ratings,sections",
                instructor_id
            ))
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(AppError::NotFound),
            status if !status.is_success() => {
                let body = response.text().await.unwrap_or_default();
                return Err(AppError::Upstream(format!(
                    "catalog API error {}: {}",
                    status, body
                )));
            }
            _ => {}
        }

        let parsed: dto::CourseListResponse = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("failed to parse catalog response: {}", e)))?;

        let mut courses = Vec::new();
        for doc in parsed.courses {
            let id = doc.id.clone();
            match doc.into_course() {
                Ok(course) => courses.push(course),
                Err(e) => {
                    tracing::warn!("Skipping malformed course document {}: {}", id, e);
                }
            }
        }
        Ok(courses)
    }

    async fn fetch_course_by_id(&self, course_id: &str) -> Result<Course, AppError> {
        let response = self
            .get(&format!(
                "/internal/courses/{}?include=enrollments,ratings,sections",
                course_id
            ))
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(AppError::NotFound),
            status if !status.is_success() => {
                let body = response.text().await.unwrap_or_default();
                return Err(AppError::Upstream(format!(
                    "catalog API error {}: {}",
                    status, body
                )));
            }
            _ => {}
        }

        let doc: dto::CourseDoc = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("failed to parse catalog response: {}", e)))?;

        doc.into_course()
            .map_err(|e| AppError::Upstream(format!("malformed course document: {}", e)))
    }
}

/// In-memory catalog used by tests and by local runs without a configured
/// catalog service.
#[derive(Default)]
pub struct StaticCatalog {
    pub courses: Vec<Course>,
}

impl StaticCatalog {
    pub fn new(courses: Vec<Course>) -> Self {
        Self { courses }
    }
}

#[async_trait]
impl CatalogClient for StaticCatalog {
    async fn fetch_courses_by_instructor(
        &self,
        instructor_id: &str,
    ) -> Result<Vec<Course>, AppError> {
        Ok(self
            .courses
            .iter()
            .filter(|c| c.instructor_id == instructor_id)
            .cloned()
            .collect())
    }

    async fn fetch_course_by_id(&self, course_id: &str) -> Result<Course, AppError> {
        self.courses
            .iter()
            .find(|c| c.id == course_id)
            .cloned()
            .ok_or(AppError::NotFound)
    }
}
