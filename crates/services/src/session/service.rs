use std::sync::Arc;

use storage::repository::QuizArchive;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::controller::{GenerationTicket, PersistRequest, SessionController};
use super::state::Phase;
use crate::error::GenerationError;
use crate::generator::QuizGenerator;

/// Runs the async side of a quiz session: generation requests and
/// best-effort archiving.
#[derive(Clone)]
pub struct QuizSessionService {
    generator: Arc<dyn QuizGenerator>,
    archive: Arc<dyn QuizArchive>,
}

impl QuizSessionService {
    #[must_use]
    pub fn new(generator: Arc<dyn QuizGenerator>, archive: Arc<dyn QuizArchive>) -> Self {
        Self { generator, archive }
    }

    /// Ask the generator for the quiz described by `ticket`.
    ///
    /// # Errors
    ///
    /// Returns whatever `GenerationError` the generator produced.
    pub async fn generate(&self, ticket: &GenerationTicket) -> Result<String, GenerationError> {
        info!(
            epoch = ticket.epoch(),
            subject = %ticket.subject(),
            difficulty = %ticket.difficulty(),
            "generating quiz"
        );
        let result = self
            .generator
            .generate(ticket.subject(), ticket.difficulty())
            .await;
        match &result {
            Ok(raw) => info!(epoch = ticket.epoch(), bytes = raw.len(), "generator responded"),
            Err(err) => warn!(epoch = ticket.epoch(), error = %err, "generator failed"),
        }
        result
    }

    /// Archive a generated document on a detached task.
    ///
    /// This is the fire-and-forget side channel: the outcome only reaches the
    /// log and never flows back into session state. The handle is returned for
    /// callers that want to wait for the log line (tests); dropping it does not
    /// cancel the write.
    pub fn persist_detached(&self, request: PersistRequest) -> JoinHandle<()> {
        let archive = Arc::clone(&self.archive);
        tokio::spawn(async move {
            match archive.save_quiz(&request.subject, &request.document).await {
                Ok(saved) => info!(
                    epoch = request.epoch,
                    subject = %saved.subject,
                    location = %saved.location,
                    "quiz archived"
                ),
                Err(err) => warn!(
                    epoch = request.epoch,
                    subject = %request.subject,
                    error = %err,
                    "failed to archive quiz"
                ),
            }
        })
    }

    /// Feed a generation result back into the controller and, if the session
    /// reached `Playing`, kick off archiving.
    pub fn complete(
        &self,
        controller: &mut SessionController,
        epoch: u64,
        result: Result<String, GenerationError>,
    ) -> Option<JoinHandle<()>> {
        let request = controller.finish_generation(epoch, result)?;
        debug_assert_eq!(controller.phase(), Phase::Playing);
        Some(self.persist_detached(request))
    }

    /// Run a full start: request, await generation, transition, archive.
    ///
    /// Returns `None` when the controller refused to start or the generation
    /// failed; the controller state tells which.
    pub async fn start(&self, controller: &mut SessionController) -> Option<JoinHandle<()>> {
        let ticket = controller.start()?;
        let result = self.generate(&ticket).await;
        self.complete(controller, ticket.epoch(), result)
    }
}
