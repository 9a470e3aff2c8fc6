use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use uuid::Uuid;

use crate::application::ports::job_queue::{JobQueue, JobQueueError};
use crate::domain::entities::ProcessingJob;

type PendingJobs = Arc<Mutex<HashMap<Uuid, ProcessingJob>>>;

/// Sending half of the in-process job channel.
///
/// Jobs stay in the pending map until a worker takes them, so a job removed
/// before pickup is skipped by the receiver.
pub struct MpscJobQueue {
    sender: mpsc::UnboundedSender<ProcessingJob>,
    pending_jobs: PendingJobs,
}

impl MpscJobQueue {
    pub fn create_pair() -> (Self, MpscJobQueueReceiver) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let pending_jobs: PendingJobs = Arc::new(Mutex::new(HashMap::new()));

        let queue = Self {
            sender,
            pending_jobs: pending_jobs.clone(),
        };
        let receiver = MpscJobQueueReceiver {
            receiver: Mutex::new(receiver),
            pending_jobs,
        };

        (queue, receiver)
    }
}

#[async_trait]
impl JobQueue for MpscJobQueue {
    async fn enqueue(&self, job: ProcessingJob) -> Result<(), JobQueueError> {
        {
            let mut pending = self.pending_jobs.lock().await;
            pending.insert(job.id(), job.clone());
        }

        if self.sender.send(job).is_err() {
            return Err(JobQueueError::ConnectionError("Channel closed".to_string()));
        }
        Ok(())
    }

    async fn size(&self) -> Result<usize, JobQueueError> {
        let pending = self.pending_jobs.lock().await;
        Ok(pending.len())
    }

    async fn remove_job(&self, job_id: Uuid) -> Result<bool, JobQueueError> {
        let mut pending = self.pending_jobs.lock().await;
        Ok(pending.remove(&job_id).is_some())
    }
}

/// Receiving half, shared by the worker tasks.
pub struct MpscJobQueueReceiver {
    receiver: Mutex<mpsc::UnboundedReceiver<ProcessingJob>>,
    pending_jobs: PendingJobs,
}

impl MpscJobQueueReceiver {
    /// Next job that is still pending, or `None` once every sender is gone.
    pub async fn recv(&self) -> Option<ProcessingJob> {
        loop {
            let job = {
                let mut receiver = self.receiver.lock().await;
                receiver.recv().await?
            };

            let still_pending = self.pending_jobs.lock().await.remove(&job.id()).is_some();
            if still_pending {
                return Some(job);
            }
            tracing::debug!(job_id = %job.id(), "Skipping job removed from the queue");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_enqueue_then_receive() {
        let (queue, receiver) = MpscJobQueue::create_pair();
        let job = ProcessingJob::new(Uuid::new_v4());

        queue.enqueue(job.clone()).await.unwrap();
        assert_eq!(queue.size().await.unwrap(), 1);

        let received = receiver.recv().await.unwrap();
        assert_eq!(received.id(), job.id());
        assert_eq!(queue.size().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_removed_job_is_skipped() {
        let (queue, receiver) = MpscJobQueue::create_pair();
        let removed = ProcessingJob::new(Uuid::new_v4());
        let kept = ProcessingJob::new(Uuid::new_v4());

        queue.enqueue(removed.clone()).await.unwrap();
        queue.enqueue(kept.clone()).await.unwrap();
        assert!(queue.remove_job(removed.id()).await.unwrap());
        assert!(!queue.remove_job(removed.id()).await.unwrap());

        let received = receiver.recv().await.unwrap();
        assert_eq!(received.id(), kept.id());
    }

    #[tokio::test]
    async fn test_receiver_ends_when_queue_dropped() {
        let (queue, receiver) = MpscJobQueue::create_pair();
        drop(queue);
        assert!(receiver.recv().await.is_none());
    }
}
