use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response, Sse, sse::Event},
};
use futures::stream::{self, Stream};
use std::{convert::Infallible, sync::Arc, time::Duration};
use tokio::time::sleep;
use uuid::Uuid;

use crate::application::use_cases::GetJobStatusUseCase;
use crate::presentation::http::dto::JobStatusDto;
use crate::presentation::http::errors::AppError;
use crate::presentation::http::middleware::AuthUser;

pub struct SseHandler {
    get_job_status_use_case: Arc<GetJobStatusUseCase>,
    poll_interval: Duration,
}

impl SseHandler {
    pub fn new(get_job_status_use_case: Arc<GetJobStatusUseCase>) -> Self {
        Self {
            get_job_status_use_case,
            poll_interval: Duration::from_secs(1),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Emits `job_progress` events until the job reaches a terminal state.
    pub async fn job_progress_stream(
        State(handler): State<Arc<SseHandler>>,
        Extension(auth): Extension<AuthUser>,
        Path(job_id): Path<Uuid>,
    ) -> Result<impl IntoResponse, AppError> {
        // Access is checked once; later polls only reload the job.
        handler
            .get_job_status_use_case
            .execute(job_id, auth.user_id)
            .await?;

        let use_case = handler.get_job_status_use_case.clone();
        let poll_interval = handler.poll_interval;

        let stream = stream::unfold(Some(true), move |state| {
            let use_case = use_case.clone();
            async move {
                let first = state?;
                if !first {
                    sleep(poll_interval).await;
                }

                match use_case.current(job_id).await {
                    Ok(job) => {
                        let job_status = JobStatusDto::from(&job);
                        let event_data = serde_json::to_string(&job_status).unwrap_or_default();
                        let event = Event::default().event("job_progress").data(event_data);

                        let next = if job_status.is_terminal { None } else { Some(false) };
                        Some((Ok::<_, Infallible>(event), next))
                    }
                    Err(e) => {
                        tracing::warn!(%job_id, error = %e, "Job progress stream stopped");
                        let event = Event::default().event("error").data(e.to_string());
                        Some((Ok::<_, Infallible>(event), None))
                    }
                }
            }
        });

        Ok(create_sse_response(stream))
    }
}

pub fn create_sse_response<S>(stream: S) -> Response
where
    S: Stream<Item = Result<Event, Infallible>> + Send + 'static,
{
    Sse::new(stream)
        .keep_alive(
            axum::response::sse::KeepAlive::new()
                .interval(Duration::from_secs(30))
                .text("keep-alive"),
        )
        .into_response()
}
