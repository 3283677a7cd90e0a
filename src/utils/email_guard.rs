use std::sync::RwLock;
use std::time::Duration;

use anyhow::{Result, anyhow};
use autoscale_cuckoo_filter::CuckooFilter;
use futures_util::StreamExt;
use moka::future::Cache;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;

/// Expected capacity and false-positive rate.
/// Tune these based on real headcount.
const FILTER_CAPACITY: usize = 100_000;
const FALSE_POSITIVE_RATE: f64 = 0.001;

/// Fast negatives: an email absent from the filter is definitely free.
static TAKEN_FILTER: Lazy<RwLock<CuckooFilter<String>>> =
    Lazy::new(|| RwLock::new(CuckooFilter::new(FILTER_CAPACITY, FALSE_POSITIVE_RATE)));

/// Fast positives: emails confirmed taken, 24h TTL. Populated on signup and
/// lazily on DB fallback hits; no boot-time warmup needed.
static TAKEN_CACHE: Lazy<Cache<String, bool>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(500_000)
        .time_to_live(Duration::from_secs(86_400))
        .build()
});

#[inline]
fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Record a freshly registered email in both layers.
pub async fn mark_taken(email: &str) {
    let email = normalize(email);
    TAKEN_FILTER
        .write()
        .expect("email filter poisoned")
        .add(&email);
    TAKEN_CACHE.insert(email, true).await;
}

/// true  => email AVAILABLE
/// false => email TAKEN
pub async fn is_available(email: &str, pool: &MySqlPool) -> bool {
    let email = normalize(email);

    if !TAKEN_FILTER
        .read()
        .expect("email filter poisoned")
        .contains(&email)
    {
        return true;
    }

    if TAKEN_CACHE.get(&email).await.unwrap_or(false) {
        return false;
    }

    // Filter hit but cache miss: could be a false positive, ask the database.
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM users WHERE email = ? LIMIT 1)",
    )
    .bind(&email)
    .fetch_one(pool)
    .await
    .unwrap_or(true); // fail-safe: treat lookup failure as taken

    if exists {
        TAKEN_CACHE.insert(email, true).await;
        return false;
    }

    true
}

/// Stream every registered email into the filter at boot, in batches.
pub async fn warmup(pool: &MySqlPool, batch_size: usize) -> Result<()> {
    let mut stream = sqlx::query_as::<_, (String,)>("SELECT email FROM users").fetch(pool);

    let mut batch = Vec::with_capacity(batch_size);
    let mut total = 0usize;

    while let Some(row) = stream.next().await {
        let (email,) = row.map_err(|e| anyhow!("DB row fetch failed: {}", e))?;

        batch.push(normalize(&email));
        total += 1;

        if batch.len() == batch_size {
            insert_batch(&batch);
            batch.clear();
        }
    }

    if !batch.is_empty() {
        insert_batch(&batch);
    }

    log::info!("Email filter warmup complete: {} accounts", total);
    Ok(())
}

fn insert_batch(emails: &[String]) {
    let mut filter = TAKEN_FILTER.write().expect("email filter poisoned");

    for email in emails {
        filter.add(email);
    }
}
