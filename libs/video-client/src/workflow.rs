use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

use crate::error::UploadError;
use crate::progress::ProgressTracker;
use crate::request::UploadRequest;
use crate::transport::{ProgressFn, UploadTransport};
use crate::validation::validate;
use crate::Video;

/// Delay between a successful upload and the redirect, long enough for the
/// success message to be read.
pub const REDIRECT_DELAY: Duration = Duration::from_millis(1500);
pub const REDIRECT_TARGET: &str = "/";

#[derive(Debug, Clone, PartialEq)]
pub enum UploadState {
    Idle,
    Validating,
    Transferring { percent: u8 },
    Succeeded { video_id: String, redirect_at: Instant },
    /// The last transfer failed. Progress is back to 0 and the form can be
    /// submitted again.
    Failed { message: String },
}

impl UploadState {
    pub fn progress(&self) -> u8 {
        match self {
            UploadState::Transferring { percent } => *percent,
            UploadState::Succeeded { .. } => 100,
            _ => 0,
        }
    }

    /// Whether a new submission may start from this state.
    pub fn accepts_submission(&self) -> bool {
        match self {
            UploadState::Idle | UploadState::Failed { .. } => true,
            UploadState::Succeeded { redirect_at, .. } => Instant::now() >= *redirect_at,
            UploadState::Validating | UploadState::Transferring { .. } => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadReceipt {
    pub video: Video,
    pub redirect_at: Instant,
}

/// Puts the workflow back to `Idle` unless disarmed, so a rejected or dropped submission
/// leaves it re-submittable.
struct IdleOnDrop {
    state: Arc<watch::Sender<UploadState>>,
    armed: bool,
}

impl IdleOnDrop {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for IdleOnDrop {
    fn drop(&mut self) {
        if self.armed {
            self.state.send_replace(UploadState::Idle);
        }
    }
}

/// Moves `Succeeded` to `Idle` once, for the success that scheduled `due`.
fn complete_redirect(state: &watch::Sender<UploadState>, due: Instant) -> bool {
    state.send_if_modified(|current| {
        if matches!(current, UploadState::Succeeded { redirect_at, .. } if *redirect_at == due) {
            *current = UploadState::Idle;
            true
        } else {
            false
        }
    })
}

/// One upload form: validate, transfer with progress, then redirect.
///
/// There is exactly one state value at a time, observers follow it through
/// [`UploadWorkflow::subscribe`]. `submit` takes `&mut self`, so a second
/// submission cannot start while one is in flight. A failed transfer leaves
/// the workflow in `Failed` with progress 0 and is never retried
/// automatically. A success returns to `Idle` once the redirect delay has
/// passed, whether or not anyone waits for it.
pub struct UploadWorkflow<T> {
    transport: T,
    state: Arc<watch::Sender<UploadState>>,
    redirect_delay: Duration,
}

impl<T: UploadTransport> UploadWorkflow<T> {
    pub fn new(transport: T) -> Self {
        let (state, _) = watch::channel(UploadState::Idle);
        UploadWorkflow {
            transport,
            state: Arc::new(state),
            redirect_delay: REDIRECT_DELAY,
        }
    }

    pub fn state(&self) -> UploadState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<UploadState> {
        self.state.subscribe()
    }

    pub async fn submit(&mut self, request: UploadRequest) -> Result<UploadReceipt, UploadError> {
        if !self.state.borrow().accepts_submission() {
            return Err(UploadError::Busy);
        }

        let reset = IdleOnDrop { state: Arc::clone(&self.state), armed: true };

        self.state.send_replace(UploadState::Validating);
        if let Err(err) = validate(&request) {
            tracing::warn!("Upload rejected before sending: {}", err);
            return Err(err.into());
        }

        self.state.send_replace(UploadState::Transferring { percent: 0 });
        let progress = self.progress_reporter();

        let video = match self.transport.send(request, progress).await {
            Ok(video) => video,
            Err(err) => {
                tracing::error!("Upload failed: {}", err);
                self.state.send_replace(UploadState::Failed { message: err.message.clone() });
                reset.disarm();
                return Err(UploadError::Transfer(err));
            }
        };

        let redirect_at = Instant::now() + self.redirect_delay;
        tracing::info!("Uploaded video {}, redirecting in {:?}", video.id, self.redirect_delay);
        self.state.send_replace(UploadState::Succeeded { video_id: video.id.clone(), redirect_at });
        reset.disarm();

        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            tokio::time::sleep_until(redirect_at).await;
            complete_redirect(&state, redirect_at);
        });

        Ok(UploadReceipt { video, redirect_at })
    }

    /// Wait out the redirect delay after a successful upload. Returns the
    /// redirect target, or `None` if there is no pending redirect.
    pub async fn wait_for_redirect(&mut self) -> Option<&'static str> {
        let redirect_at = match &*self.state.borrow() {
            UploadState::Succeeded { redirect_at, .. } => *redirect_at,
            _ => return None,
        };

        tokio::time::sleep_until(redirect_at).await;
        complete_redirect(&self.state, redirect_at);
        Some(REDIRECT_TARGET)
    }

    fn progress_reporter(&self) -> ProgressFn {
        let state = Arc::clone(&self.state);
        let tracker = ProgressTracker::new();

        Arc::new(move |sent, total| {
            let next = tracker.update(sent, total);
            state.send_if_modified(|current| match current {
                UploadState::Transferring { percent } if *percent != next => {
                    *percent = next;
                    true
                }
                _ => false,
            });
        })
    }
}
