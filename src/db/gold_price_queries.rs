use sqlx::PgPool;
use tracing::error;

use crate::models::GoldPrice;

pub async fn fetch_by_date(
    pool: &PgPool,
    date_sortable: &str,
) -> Result<Option<GoldPrice>, sqlx::Error> {
    sqlx::query_as::<_, GoldPrice>(
        r#"
        SELECT date, date_sortable, price_per_ounce, price_24k, price_22k, price_18k, uploaded_at
        FROM gold_prices
        WHERE date_sortable = $1
        "#,
    )
    .bind(date_sortable)
    .fetch_optional(pool)
    .await
}

/// Fetch the most recent `limit` records, newest first.
pub async fn fetch_recent(pool: &PgPool, limit: i64) -> Result<Vec<GoldPrice>, sqlx::Error> {
    sqlx::query_as::<_, GoldPrice>(
        r#"
        SELECT date, date_sortable, price_per_ounce, price_24k, price_22k, price_18k, uploaded_at
        FROM gold_prices
        ORDER BY date_sortable DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn fetch_latest(pool: &PgPool) -> Result<Option<GoldPrice>, sqlx::Error> {
    Ok(fetch_recent(pool, 1).await?.into_iter().next())
}

/// Upsert every record inside one transaction.
pub async fn upsert_batch(pool: &PgPool, prices: &[GoldPrice]) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await.map_err(|e| {
        error!("Failed to begin gold price batch transaction: {}", e);
        e
    })?;

    for p in prices {
        if let Err(e) = sqlx::query(
            r#"
            INSERT INTO gold_prices
                (date_sortable, date, price_per_ounce, price_24k, price_22k, price_18k, uploaded_at)
            VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, NOW()))
            ON CONFLICT (date_sortable) DO UPDATE SET
                date = EXCLUDED.date,
                price_per_ounce = EXCLUDED.price_per_ounce,
                price_24k = EXCLUDED.price_24k,
                price_22k = EXCLUDED.price_22k,
                price_18k = EXCLUDED.price_18k,
                uploaded_at = EXCLUDED.uploaded_at
            "#,
        )
        .bind(&p.date_sortable)
        .bind(&p.date)
        .bind(p.price_per_ounce)
        .bind(p.price_24k)
        .bind(p.price_22k)
        .bind(p.price_18k)
        .bind(p.uploaded_at)
        .execute(&mut *tx)
        .await
        {
            error!("Failed to upsert gold price for {}: {}", p.date_sortable, e);
            return Err(e);
        }
    }

    tx.commit().await.map_err(|e| {
        error!("Failed to commit gold price batch of {}: {}", prices.len(), e);
        e
    })?;
    Ok(())
}

pub async fn delete_all(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM gold_prices").execute(pool).await?;
    Ok(result.rows_affected())
}
