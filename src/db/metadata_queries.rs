use sqlx::PgPool;

use crate::models::UploadMetadata;

// The table holds at most one row, pinned to id 1.
const UPLOAD_INFO_ID: i16 = 1;

pub async fn upsert(pool: &PgPool, metadata: &UploadMetadata) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO upload_metadata (id, last_upload, total_records, filename)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (id) DO UPDATE SET
            last_upload = EXCLUDED.last_upload,
            total_records = EXCLUDED.total_records,
            filename = EXCLUDED.filename
        "#,
    )
    .bind(UPLOAD_INFO_ID)
    .bind(metadata.last_upload)
    .bind(metadata.total_records)
    .bind(&metadata.filename)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn fetch(pool: &PgPool) -> Result<Option<UploadMetadata>, sqlx::Error> {
    sqlx::query_as::<_, UploadMetadata>(
        "SELECT last_upload, total_records, filename FROM upload_metadata WHERE id = $1",
    )
    .bind(UPLOAD_INFO_ID)
    .fetch_optional(pool)
    .await
}
