use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::File;
use crate::domain::repositories::{FileRepository, RepositoryError};
use crate::domain::value_objects::FileHash;
use crate::infrastructure::database::models::{FileModel, NewFileModel};
use crate::infrastructure::database::schema::files;
use crate::infrastructure::database::{DbPool, map_diesel_error, run_blocking};

pub struct PostgresFileRepository {
    pool: DbPool,
}

impl PostgresFileRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_domain(model: FileModel) -> Result<File, RepositoryError> {
    File::try_from(model).map_err(RepositoryError::ValidationError)
}

#[async_trait]
impl FileRepository for PostgresFileRepository {
    async fn save(&self, file: &File) -> Result<(), RepositoryError> {
        let new_file = NewFileModel::from(file);

        run_blocking(&self.pool, move |conn| {
            diesel::insert_into(files::table)
                .values(&new_file)
                .execute(conn)
                .map_err(map_diesel_error)
        })
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, file_id: Uuid) -> Result<Option<File>, RepositoryError> {
        let model = run_blocking(&self.pool, move |conn| {
            files::table
                .find(file_id)
                .select(FileModel::as_select())
                .first(conn)
                .optional()
                .map_err(map_diesel_error)
        })
        .await?;

        model.map(to_domain).transpose()
    }

    async fn find_by_hash(
        &self,
        project_id: Uuid,
        hash: &FileHash,
    ) -> Result<Option<File>, RepositoryError> {
        let hash = hash.as_str().to_string();
        let model = run_blocking(&self.pool, move |conn| {
            files::table
                .filter(files::project_id.eq(project_id))
                .filter(files::file_hash.eq(hash))
                .select(FileModel::as_select())
                .first(conn)
                .optional()
                .map_err(map_diesel_error)
        })
        .await?;

        model.map(to_domain).transpose()
    }

    async fn find_by_project(&self, project_id: Uuid) -> Result<Vec<File>, RepositoryError> {
        let models = run_blocking(&self.pool, move |conn| {
            files::table
                .filter(files::project_id.eq(project_id))
                .order(files::created_at.desc())
                .select(FileModel::as_select())
                .load(conn)
                .map_err(map_diesel_error)
        })
        .await?;

        models.into_iter().map(to_domain).collect()
    }

    async fn update(&self, file: &File) -> Result<(), RepositoryError> {
        let changes = NewFileModel::from(file);
        let file_id = file.id();

        let updated = run_blocking(&self.pool, move |conn| {
            diesel::update(files::table.find(file_id))
                .set(&changes)
                .execute(conn)
                .map_err(map_diesel_error)
        })
        .await?;

        if updated == 0 {
            return Err(RepositoryError::NotFound(file_id));
        }
        Ok(())
    }

    async fn delete(&self, file_id: Uuid) -> Result<bool, RepositoryError> {
        let deleted = run_blocking(&self.pool, move |conn| {
            diesel::delete(files::table.find(file_id))
                .execute(conn)
                .map_err(map_diesel_error)
        })
        .await?;

        Ok(deleted > 0)
    }
}
