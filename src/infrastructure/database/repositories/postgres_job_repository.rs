use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::AnalysisJob;
use crate::domain::repositories::{JobRepository, job_repository::JobRepositoryError};
use crate::infrastructure::database::connection::{DbPool, get_connection_from_pool};
use crate::infrastructure::database::models::{JobModel, UpdateJobModel};
use crate::infrastructure::database::schema::analysis_jobs;

pub struct PostgresJobRepository {
    pool: DbPool,
}

impl PostgresJobRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn connection(
        &self,
    ) -> Result<crate::infrastructure::database::connection::DbConnection, JobRepositoryError> {
        get_connection_from_pool(&self.pool)
            .map_err(|e| JobRepositoryError::DatabaseError(e.to_string()))
    }
}

#[async_trait]
impl JobRepository for PostgresJobRepository {
    async fn save(&self, job: &AnalysisJob) -> Result<(), JobRepositoryError> {
        let model = JobModel::from(job);
        let mut conn = self.connection()?;

        tokio::task::spawn_blocking(move || {
            diesel::insert_into(analysis_jobs::table)
                .values(&model)
                .execute(&mut conn)
                .map_err(|e| JobRepositoryError::DatabaseError(format!("Failed to save job: {}", e)))
        })
        .await
        .map_err(|e| JobRepositoryError::DatabaseError(format!("Task join error: {}", e)))??;

        Ok(())
    }

    async fn find_by_id(&self, job_id: Uuid) -> Result<Option<AnalysisJob>, JobRepositoryError> {
        let mut conn = self.connection()?;

        let result = tokio::task::spawn_blocking(move || {
            analysis_jobs::table
                .filter(analysis_jobs::id.eq(job_id))
                .first::<JobModel>(&mut conn)
                .optional()
                .map_err(|e| JobRepositoryError::DatabaseError(format!("Failed to find job: {}", e)))
        })
        .await
        .map_err(|e| JobRepositoryError::DatabaseError(format!("Task join error: {}", e)))??;

        result
            .map(|model| AnalysisJob::try_from(model).map_err(JobRepositoryError::ValidationError))
            .transpose()
    }

    async fn find_by_document_id(
        &self,
        document_id: Uuid,
    ) -> Result<Vec<AnalysisJob>, JobRepositoryError> {
        let mut conn = self.connection()?;

        let models = tokio::task::spawn_blocking(move || {
            analysis_jobs::table
                .filter(analysis_jobs::document_id.eq(document_id))
                .order(analysis_jobs::created_at.desc())
                .load::<JobModel>(&mut conn)
                .map_err(|e| {
                    JobRepositoryError::DatabaseError(format!(
                        "Failed to find jobs by document: {}",
                        e
                    ))
                })
        })
        .await
        .map_err(|e| JobRepositoryError::DatabaseError(format!("Task join error: {}", e)))??;

        models
            .into_iter()
            .map(|model| AnalysisJob::try_from(model).map_err(JobRepositoryError::ValidationError))
            .collect()
    }

    async fn find_active_jobs(&self) -> Result<Vec<AnalysisJob>, JobRepositoryError> {
        let mut conn = self.connection()?;

        let models = tokio::task::spawn_blocking(move || {
            analysis_jobs::table
                .filter(analysis_jobs::status.eq_any(vec!["PENDING", "PROCESSING"]))
                .order(analysis_jobs::created_at.asc())
                .load::<JobModel>(&mut conn)
                .map_err(|e| {
                    JobRepositoryError::DatabaseError(format!("Failed to find active jobs: {}", e))
                })
        })
        .await
        .map_err(|e| JobRepositoryError::DatabaseError(format!("Task join error: {}", e)))??;

        models
            .into_iter()
            .map(|model| AnalysisJob::try_from(model).map_err(JobRepositoryError::ValidationError))
            .collect()
    }

    async fn update(&self, job: &AnalysisJob) -> Result<(), JobRepositoryError> {
        let update = UpdateJobModel::from(job);
        let job_id = job.id();
        let mut conn = self.connection()?;

        tokio::task::spawn_blocking(move || {
            diesel::update(analysis_jobs::table.filter(analysis_jobs::id.eq(job_id)))
                .set(&update)
                .execute(&mut conn)
                .map_err(|e| {
                    JobRepositoryError::DatabaseError(format!("Failed to update job: {}", e))
                })
        })
        .await
        .map_err(|e| JobRepositoryError::DatabaseError(format!("Task join error: {}", e)))??;

        Ok(())
    }
}
