// Server-Sent Events stream of rendered frames
use crate::application::frame_renderer::Frame;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{Stream, StreamExt};
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::watch;

/// The current frame, then every frame published after it. Frames published
/// faster than the client reads are skipped; only the latest is delivered.
pub fn frames_from(mut frames: watch::Receiver<Arc<Frame>>) -> impl Stream<Item = Arc<Frame>> {
    async_stream::stream! {
        let current = frames.borrow_and_update().clone();
        yield current;

        while frames.changed().await.is_ok() {
            let frame = frames.borrow_and_update().clone();
            yield frame;
        }
    }
}

pub fn frame_event_stream(
    frames: watch::Receiver<Arc<Frame>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let events = frames_from(frames).map(|frame| Ok(frame_event(&frame)));
    Sse::new(events).keep_alive(KeepAlive::default())
}

/// SSE data may span lines but never carry a carriage return
fn frame_event(frame: &Frame) -> Event {
    let data = frame.svg.replace("\r\n", "\n").replace('\r', "\n");
    Event::default()
        .event("frame")
        .id(frame.revision.to_string())
        .data(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    fn frame(revision: u64) -> Arc<Frame> {
        Arc::new(Frame {
            revision,
            svg: format!("<svg id=\"{}\"/>", revision),
        })
    }

    #[tokio::test]
    async fn test_stream_starts_with_current_frame() {
        let (tx, rx) = watch::channel(frame(3));
        let stream = frames_from(rx);
        futures::pin_mut!(stream);

        assert_eq!(stream.next().await.map(|f| f.revision), Some(3));

        tx.send_replace(frame(4));
        assert_eq!(stream.next().await.map(|f| f.revision), Some(4));

        drop(tx);
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_event_stream_strips_carriage_returns() {
        let (tx, rx) = watch::channel(Arc::new(Frame {
            revision: 7,
            svg: "<svg>\r\n<text>502 Bad Gateway</text>\r</svg>".to_string(),
        }));
        // closed channel: the stream ends after the current frame
        drop(tx);

        let response = frame_event_stream(rx).into_response();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();

        assert!(!body.contains('\r'));
        assert!(body.contains("event: frame"));
        assert!(body.contains("id: 7"));
        assert!(body.contains("data: <text>502 Bad Gateway</text>"));
    }

    #[tokio::test]
    async fn test_stream_skips_to_latest() {
        let (tx, rx) = watch::channel(frame(1));
        let stream = frames_from(rx);
        futures::pin_mut!(stream);
        stream.next().await;

        tx.send_replace(frame(2));
        tx.send_replace(frame(3));
        assert_eq!(stream.next().await.map(|f| f.revision), Some(3));
    }
}
