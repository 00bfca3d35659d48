//! SubmissionController - serializes conversions and applies their outcomes.

use futures_util::future::{BoxFuture, FutureExt};

use super::client::{ConvertClient, ConvertError};
use super::status::{StatusEvent, SubmissionStatus};
use crate::resource::{HandleRole, ObjectUrl, ResourceLifecycle};
use crate::selection::{BlockWidth, SourceImage, WidthPolicy};

/// A dispatched conversion, holding the image and width captured at submit
/// time. Later edits to the selection do not reach it.
#[derive(Debug)]
pub struct Submission {
    id: u64,
    image: SourceImage,
    width: BlockWidth,
    client: ConvertClient,
}

impl Submission {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn image(&self) -> &SourceImage {
        &self.image
    }

    pub fn width(&self) -> BlockWidth {
        self.width
    }

    /// Perform the network exchange. The returned future owns everything it
    /// needs and can be spawned.
    pub fn send(self) -> BoxFuture<'static, Completion> {
        async move {
            let outcome = self.client.convert(&self.image, self.width).await;
            Completion {
                id: self.id,
                outcome,
            }
        }
        .boxed()
    }
}

/// Terminal outcome of a [`Submission`].
#[derive(Debug)]
pub struct Completion {
    id: u64,
    outcome: Result<Vec<u8>, ConvertError>,
}

impl Completion {
    pub fn new(id: u64, outcome: Result<Vec<u8>, ConvertError>) -> Self {
        Self { id, outcome }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn outcome(&self) -> &Result<Vec<u8>, ConvertError> {
        &self.outcome
    }
}

/// Owns the [`SubmissionStatus`] and allows at most one submission in flight.
#[derive(Debug)]
pub struct SubmissionController {
    client: ConvertClient,
    policy: WidthPolicy,
    status: SubmissionStatus,
    next_id: u64,
    in_flight: Option<u64>,
}

impl SubmissionController {
    pub fn new(client: ConvertClient) -> Self {
        Self::with_policy(client, WidthPolicy::default())
    }

    pub fn with_policy(client: ConvertClient, policy: WidthPolicy) -> Self {
        Self {
            client,
            policy,
            status: SubmissionStatus::Idle,
            next_id: 0,
            in_flight: None,
        }
    }

    pub fn status(&self) -> &SubmissionStatus {
        &self.status
    }

    pub fn policy(&self) -> WidthPolicy {
        self.policy
    }

    pub fn client(&self) -> &ConvertClient {
        &self.client
    }

    /// Start a conversion of `image` at `width`.
    ///
    /// Returns `None` without touching the network when no image is selected,
    /// when a submission is already in flight, or when the width policy
    /// rejects the width (status becomes `Failed`). Otherwise the status is
    /// `InFlight` and the caller must drive the returned submission to a
    /// [`Completion`] and hand it to [`complete`](Self::complete).
    pub fn submit(&mut self, image: Option<&SourceImage>, width: BlockWidth) -> Option<Submission> {
        let image = match image {
            Some(image) => image,
            None => {
                log::debug!("Submit ignored: no image selected");
                return None;
            }
        };

        if self.status.is_in_flight() {
            log::debug!("Submit ignored: submission {:?} in flight", self.in_flight);
            return None;
        }

        self.status = self.status.transition(StatusEvent::Dispatch);

        let width = match self.policy.apply(width) {
            Ok(width) => width,
            Err(reason) => {
                log::warn!("Submit refused locally: {}", reason);
                let err = ConvertError::InvalidWidth(reason);
                self.status = self.status.transition(StatusEvent::Fail(err.user_message()));
                return None;
            }
        };

        self.next_id += 1;
        self.in_flight = Some(self.next_id);
        log::info!(
            "Dispatching submission {}: {} at width {}",
            self.next_id,
            image.file_name(),
            width
        );

        Some(Submission {
            id: self.next_id,
            image: image.clone(),
            width,
            client: self.client.clone(),
        })
    }

    /// Apply a completed submission.
    ///
    /// On success the result bytes replace the active result handle. On
    /// failure the result handle is left as it was. Completions that do not
    /// belong to the in-flight submission are discarded.
    pub fn complete(
        &mut self,
        completion: Completion,
        resources: &mut ResourceLifecycle,
    ) -> Option<ObjectUrl> {
        if self.in_flight != Some(completion.id) {
            log::warn!("Discarding stale completion for submission {}", completion.id);
            return None;
        }
        self.in_flight = None;

        match completion.outcome {
            Ok(bytes) => {
                log::info!(
                    "Submission {} succeeded ({} bytes)",
                    completion.id,
                    bytes.len()
                );
                let url = resources.replace(HandleRole::Result, bytes);
                self.status = self.status.transition(StatusEvent::Succeed);
                Some(url)
            }
            Err(err) => {
                log::error!("Submission {} failed: {}", completion.id, err);
                self.status = self.status.transition(StatusEvent::Fail(err.user_message()));
                None
            }
        }
    }

    /// Drop a displayed failure so a new attempt starts clean.
    pub fn clear_error(&mut self) {
        self.status = self.status.transition(StatusEvent::ClearError);
    }
}
