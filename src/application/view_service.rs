// View service - Owns the chart state and redraws it on every effective event
use crate::application::frame_renderer::{Frame, FrameRenderer};
use crate::domain::price::PlotSeries;
use crate::domain::series::SeriesSlot;
use crate::domain::view::{Size, ViewSnapshot, ViewState};
use anyhow::{anyhow, Context};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};

const EVENT_BUFFER: usize = 100;

#[derive(Debug)]
pub enum ViewEvent {
    DataLoaded(SeriesSlot, PlotSeries),
    LoadFailed(SeriesSlot, String),
    /// Pointer position in pixels, relative to the chart container
    PointerMove { x: f64, y: f64 },
    PointerLeave,
    Resize(Size),
    Snapshot(oneshot::Sender<ViewSnapshot>),
}

pub struct ViewService {
    state: ViewState,
    renderer: Arc<dyn FrameRenderer>,
    frames: watch::Sender<Arc<Frame>>,
}

impl ViewService {
    /// Render the empty chart and start the dispatch loop on its own task
    pub fn spawn(size: Size, renderer: Arc<dyn FrameRenderer>) -> anyhow::Result<ViewHandle> {
        let state = ViewState::new(size);
        let first = renderer.render(&state).context("Failed to render initial frame")?;

        let (frame_tx, frame_rx) = watch::channel(Arc::new(first));
        let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER);

        let service = Self {
            state,
            renderer,
            frames: frame_tx,
        };
        tokio::spawn(service.run(event_rx));

        Ok(ViewHandle {
            events: event_tx,
            frames: frame_rx,
        })
    }

    async fn run(mut self, mut events: mpsc::Receiver<ViewEvent>) {
        while let Some(event) = events.recv().await {
            if self.apply(event) {
                self.redraw();
            }
        }
        tracing::debug!("View event channel closed, stopping view service");
    }

    fn apply(&mut self, event: ViewEvent) -> bool {
        match event {
            ViewEvent::DataLoaded(slot, series) => {
                tracing::debug!("Installing {} points for {}", series.len(), slot.label());
                self.state.on_data_loaded(slot, series)
            }
            ViewEvent::LoadFailed(slot, message) => self.state.on_load_failed(slot, message),
            ViewEvent::PointerMove { x, y } => {
                let hits = self.renderer.nearest_points(&self.state, x, y);
                hits.into_iter().fold(false, |changed, (slot, index)| {
                    self.state.on_pointer_near(slot, index) || changed
                })
            }
            ViewEvent::PointerLeave => self.state.on_pointer_leave(),
            ViewEvent::Resize(size) => self.state.on_resize(size),
            ViewEvent::Snapshot(reply) => {
                let _ = reply.send(ViewSnapshot::from(&self.state));
                false
            }
        }
    }

    fn redraw(&self) {
        match self.renderer.render(&self.state) {
            Ok(frame) => {
                self.frames.send_replace(Arc::new(frame));
            }
            Err(e) => {
                tracing::error!("Failed to render revision {}: {:#}", self.state.revision, e);
            }
        }
    }
}

/// Cloneable front door to a running `ViewService`
#[derive(Clone)]
pub struct ViewHandle {
    events: mpsc::Sender<ViewEvent>,
    frames: watch::Receiver<Arc<Frame>>,
}

impl ViewHandle {
    pub async fn dispatch(&self, event: ViewEvent) -> anyhow::Result<()> {
        self.events
            .send(event)
            .await
            .map_err(|_| anyhow!("view service has stopped"))
    }

    /// Install a series and wait until the view has applied it
    pub async fn install(&self, slot: SeriesSlot, series: PlotSeries) -> anyhow::Result<()> {
        self.dispatch(ViewEvent::DataLoaded(slot, series)).await?;
        // events are applied in order, so the snapshot reply doubles as an ack
        self.snapshot().await?;
        Ok(())
    }

    pub async fn snapshot(&self) -> anyhow::Result<ViewSnapshot> {
        let (tx, rx) = oneshot::channel();
        self.dispatch(ViewEvent::Snapshot(tx)).await?;
        rx.await.context("view service dropped snapshot request")
    }

    pub fn current_frame(&self) -> Arc<Frame> {
        self.frames.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Frame>> {
        self.frames.clone()
    }
}
