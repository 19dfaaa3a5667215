// Loader service - Fetches both comparison years once and hands them to the view
use crate::application::price_history_repository::PriceHistoryRepository;
use crate::application::view_service::{ViewEvent, ViewHandle};
use crate::domain::price::normalize;
use crate::domain::series::SeriesSlot;
use anyhow::Context;
use std::sync::Arc;

#[derive(Clone)]
pub struct DataLoader {
    repository: Arc<dyn PriceHistoryRepository>,
    view: ViewHandle,
}

impl DataLoader {
    pub fn new(repository: Arc<dyn PriceHistoryRepository>, view: ViewHandle) -> Self {
        Self { repository, view }
    }

    /// Run `load_all` once in the background
    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            if let Err(e) = self.load_all().await {
                tracing::error!("Price history load stopped: {:#}", e);
            }
        })
    }

    /// Load A, install it, then load B. A failure stops the sequence, so B is
    /// never requested when A fails.
    pub async fn load_all(&self) -> anyhow::Result<()> {
        for slot in SeriesSlot::ALL {
            if let Err(e) = self.load(slot).await {
                // the view may already be gone; nothing left to tell then
                if let Err(send_err) = self
                    .view
                    .dispatch(ViewEvent::LoadFailed(slot, format!("{:#}", e)))
                    .await
                {
                    tracing::debug!("Dropping load failure for {}: {}", slot.label(), send_err);
                }
                return Err(e);
            }
        }
        Ok(())
    }

    async fn load(&self, slot: SeriesSlot) -> anyhow::Result<()> {
        let (start, end) = slot.request_range();
        tracing::debug!("Fetching {} closing prices {}..{}", slot.label(), start, end);

        let raw = self
            .repository
            .fetch_close_prices(start, end)
            .await
            .with_context(|| format!("Failed to fetch {} prices", slot.label()))?;
        if raw.is_empty() {
            tracing::warn!("No closing prices returned for {}", slot.label());
        }
        let series = normalize(&raw)?;

        tracing::info!("Loaded {} daily prices for {}", series.len(), slot.label());
        self.view.install(slot, series).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::frame_renderer::{Frame, FrameRenderer};
    use crate::application::view_service::ViewService;
    use crate::domain::price::RawSeries;
    use crate::domain::view::{Size, ViewState};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    struct NullRenderer;

    impl FrameRenderer for NullRenderer {
        fn render(&self, state: &ViewState) -> anyhow::Result<Frame> {
            Ok(Frame {
                revision: state.revision,
                svg: String::new(),
            })
        }

        fn nearest_points(&self, _state: &ViewState, _x: f64, _y: f64) -> Vec<(SeriesSlot, usize)> {
            Vec::new()
        }
    }

    /// Records every requested range; fails for the years in `failing` and
    /// returns no prices for the years in `empty`
    #[derive(Default)]
    struct MockRepository {
        requests: Mutex<Vec<(String, String)>>,
        failing: Vec<i32>,
        empty: Vec<i32>,
    }

    #[async_trait]
    impl PriceHistoryRepository for MockRepository {
        async fn fetch_close_prices(&self, start: NaiveDate, end: NaiveDate) -> anyhow::Result<RawSeries> {
            self.requests
                .lock()
                .unwrap()
                .push((start.to_string(), end.to_string()));

            if self.failing.contains(&chrono::Datelike::year(&start)) {
                anyhow::bail!("connection refused");
            }
            if self.empty.contains(&chrono::Datelike::year(&start)) {
                return Ok(RawSeries::new(Vec::new()));
            }

            Ok(RawSeries::new(vec![
                (start.to_string(), 1000.0),
                (end.to_string(), 1500.0),
            ]))
        }
    }

    fn view() -> ViewHandle {
        ViewService::spawn(Size::new(800, 600), Arc::new(NullRenderer)).unwrap()
    }

    #[tokio::test]
    async fn test_loads_both_years_in_order() {
        let repository = Arc::new(MockRepository::default());
        let view = view();
        let loader = DataLoader::new(repository.clone(), view.clone());

        loader.load_all().await.unwrap();

        let requests = repository.requests.lock().unwrap().clone();
        assert_eq!(
            requests,
            vec![
                ("2017-01-01".to_string(), "2017-12-31".to_string()),
                ("2021-01-01".to_string(), "2021-12-31".to_string()),
            ]
        );

        let snapshot = view.snapshot().await.unwrap();
        assert_eq!(snapshot.series_a_len, 2);
        assert_eq!(snapshot.series_b_len, 2);
        assert!(snapshot.load_error.is_none());
    }

    #[tokio::test]
    async fn test_first_failure_skips_second_request() {
        let repository = Arc::new(MockRepository {
            failing: vec![2017],
            ..Default::default()
        });
        let view = view();
        let loader = DataLoader::new(repository.clone(), view.clone());

        assert!(loader.load_all().await.is_err());
        assert_eq!(repository.requests.lock().unwrap().len(), 1);

        let snapshot = view.snapshot().await.unwrap();
        assert_eq!(snapshot.series_a_len, 0);
        assert_eq!(snapshot.series_b_len, 0);
        assert!(snapshot.load_error.unwrap().starts_with("2017 prices unavailable"));
    }

    #[tokio::test]
    async fn test_second_failure_keeps_first_series() {
        let repository = Arc::new(MockRepository {
            failing: vec![2021],
            ..Default::default()
        });
        let view = view();
        let loader = DataLoader::new(repository.clone(), view.clone());

        assert!(loader.load_all().await.is_err());

        let snapshot = view.snapshot().await.unwrap();
        assert_eq!(snapshot.series_a_len, 2);
        assert_eq!(snapshot.series_b_len, 0);
    }

    #[tokio::test]
    async fn test_empty_year_still_loads_next() {
        let repository = Arc::new(MockRepository {
            empty: vec![2017],
            ..Default::default()
        });
        let view = view();
        let loader = DataLoader::new(repository.clone(), view.clone());

        loader.load_all().await.unwrap();
        assert_eq!(repository.requests.lock().unwrap().len(), 2);

        let snapshot = view.snapshot().await.unwrap();
        assert_eq!(snapshot.series_a_len, 0);
        assert_eq!(snapshot.series_b_len, 2);
        assert!(snapshot.load_error.is_none());
    }
}
