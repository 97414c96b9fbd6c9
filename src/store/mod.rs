pub mod repository;

pub use repository::{DayRepository, SqliteDayRepository};

use std::sync::Arc;

use crate::day::Day;
use crate::error::{AppError, AppResult};
use crate::record::ImageRecord;
use crate::unsplash::ImageSource;

/// Maps calendar days to photo records, fetching each day's record once and
/// keeping it forever.
#[derive(Clone)]
pub struct DayImageStore {
    source: Arc<dyn ImageSource>,
    repo: Arc<dyn DayRepository>,
}

impl DayImageStore {
    pub fn new(source: Arc<dyn ImageSource>, repo: Arc<dyn DayRepository>) -> Self {
        Self { source, repo }
    }

    /// The record for `day`, fetched from the photo API on first access.
    /// Fetch failures propagate; nothing is stored for the day in that case.
    pub async fn get_image(&self, day: Day) -> AppResult<ImageRecord> {
        let key = day.key();

        if let Some(json) = self.repo.get(&key)? {
            return ImageRecord::parse(&json);
        }

        tracing::info!("Fetching new image for {}", key);
        let json = self.source.fetch_random_image().await?;
        self.repo.set(&key, &json)?;
        ImageRecord::parse(&json)
    }

    /// The record already stored for `day`, without fetching.
    pub fn stored(&self, day: Day) -> AppResult<ImageRecord> {
        let key = day.key();
        let json = self.repo.get(&key)?.ok_or(AppError::NotFound(key))?;
        ImageRecord::parse(&json)
    }

    /// Mark a stored day as liked. The day must have been fetched first.
    pub fn mark_liked(&self, day: Day) -> AppResult<()> {
        let key = day.key();
        let mut record = self.stored(day)?;
        if record.is_liked() {
            return Ok(());
        }

        record.set_liked(true);
        self.repo.set(&key, &record.to_json())?;
        tracing::info!("Liked image for {}", key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const SAMPLE: &str = r#"{"urls":{"small":"http://x/img.jpg"},"user":{"name":"A","bio":"B","location":"C"}}"#;

    struct FakeSource {
        body: Result<String, u16>,
        calls: AtomicUsize,
    }

    impl FakeSource {
        fn ok(body: &str) -> Arc<Self> {
            Arc::new(Self {
                body: Ok(body.to_string()),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(status: u16) -> Arc<Self> {
            Arc::new(Self {
                body: Err(status),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ImageSource for FakeSource {
        async fn fetch_random_image(&self) -> AppResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.body.clone().map_err(|status| AppError::Api {
                status,
                reason: "Service Unavailable".to_string(),
            })
        }
    }

    fn repo() -> Arc<SqliteDayRepository> {
        let pool = db::memory_pool().unwrap();
        db::run_migrations(&pool).unwrap();
        Arc::new(SqliteDayRepository::new(pool))
    }

    fn day(y: i32, m: u32, d: u32) -> Day {
        Day::new(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[tokio::test]
    async fn second_get_is_served_from_storage() {
        let source = FakeSource::ok(SAMPLE);
        let store = DayImageStore::new(source.clone(), repo());
        let d = day(2024, 3, 10);

        let first = store.get_image(d).await.unwrap();
        let second = store.get_image(d).await.unwrap();

        assert_eq!(source.calls(), 1);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn each_day_gets_its_own_fetch() {
        let source = FakeSource::ok(SAMPLE);
        let store = DayImageStore::new(source.clone(), repo());

        store.get_image(day(2024, 3, 10)).await.unwrap();
        store.get_image(day(2024, 3, 9)).await.unwrap();

        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn fetch_failure_propagates_and_stores_nothing() {
        let source = FakeSource::failing(503);
        let repo = repo();
        let store = DayImageStore::new(source.clone(), repo.clone());

        let err = store.get_image(day(2024, 3, 10)).await.unwrap_err();
        assert!(matches!(err, AppError::Api { status: 503, .. }));
        assert_eq!(repo.get("2024-03-10").unwrap(), None);

        // No cached failure: the next access tries again
        store.get_image(day(2024, 3, 10)).await.unwrap_err();
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn malformed_fetch_is_a_parse_error() {
        let store = DayImageStore::new(FakeSource::ok("<html>"), repo());
        let err = store.get_image(day(2024, 3, 10)).await.unwrap_err();
        assert!(matches!(err, AppError::Parse(_)));
    }

    #[test]
    fn mark_liked_on_unstored_day_is_not_found() {
        let repo = repo();
        let store = DayImageStore::new(FakeSource::ok(SAMPLE), repo.clone());

        let err = store.mark_liked(day(2024, 3, 10)).unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref key) if key == "2024-03-10"));
        assert_eq!(repo.get("2024-03-10").unwrap(), None);
    }

    #[tokio::test]
    async fn stored_never_fetches() {
        let source = FakeSource::ok(SAMPLE);
        let store = DayImageStore::new(source.clone(), repo());
        let d = day(2024, 3, 10);

        assert!(matches!(store.stored(d), Err(AppError::NotFound(_))));
        store.get_image(d).await.unwrap();
        assert_eq!(store.stored(d).unwrap().author_name().unwrap(), "A");
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn mark_liked_is_idempotent() {
        let repo = repo();
        let store = DayImageStore::new(FakeSource::ok(SAMPLE), repo.clone());
        let d = day(2024, 3, 10);
        store.get_image(d).await.unwrap();

        store.mark_liked(d).unwrap();
        let once = repo.get(&d.key()).unwrap();
        store.mark_liked(d).unwrap();
        let twice = repo.get(&d.key()).unwrap();

        assert_eq!(once, twice);
    }

    #[tokio::test]
    async fn liked_day_reads_back_liked() {
        let source = FakeSource::ok(SAMPLE);
        let store = DayImageStore::new(source.clone(), repo());
        let d = day(2024, 3, 10);

        let before = store.get_image(d).await.unwrap();
        assert_eq!(before.display_url().unwrap(), "http://x/img.jpg");
        assert_eq!(before.author_name().unwrap(), "A");
        assert!(!before.is_liked());

        store.mark_liked(d).unwrap();

        let after = store.get_image(d).await.unwrap();
        assert!(after.is_liked());
        assert_eq!(after.display_url().unwrap(), "http://x/img.jpg");
        // Records held from before the like are not updated
        assert!(!before.is_liked());
        assert_eq!(source.calls(), 1);
    }
}
