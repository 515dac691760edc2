use tracing::{info, instrument, warn};

use crate::messages::{ADD_SUCCESS, CONFIRM_DELETE, DELETE_SUCCESS};
use crate::{
    AdminPage, NewQuestion, Notifier, Outcome, QuestionId, QuestionServer, QuestionnaireError,
    strip_query,
};

/// The admin question list: create and delete questions.
pub struct AdminController<P, N, S> {
    page: P,
    notifier: N,
    server: S,
}

impl<P, N, S> AdminController<P, N, S>
where
    P: AdminPage,
    N: Notifier,
    S: QuestionServer,
{
    pub fn new(page: P, notifier: N, server: S) -> Self {
        Self {
            page,
            notifier,
            server,
        }
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn server(&self) -> &S {
        &self.server
    }

    /// Validate the form and create the question.
    ///
    /// On success the page is reloaded at its own path with the query string
    /// dropped. Invalid forms never reach the server.
    #[instrument(level = "info", skip_all, fields(kind = %question.question_type.markup_name()))]
    pub async fn add_question(&mut self, question: &NewQuestion) -> Result<(), QuestionnaireError> {
        if let Err(invalid) = question.validate() {
            warn!(error = %invalid, "question form rejected");
            self.notifier.notify_error(&invalid.to_string());
            return Err(invalid.into());
        }

        let result = self
            .server
            .add_question(question)
            .await
            .map_err(QuestionnaireError::from)
            .and_then(|reply| reply.into_result());

        match result {
            Ok(()) => {
                info!("question created");
                self.notifier.notify_success(ADD_SUCCESS);
                let target = strip_query(&self.page.location());
                self.page.reload(&target);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "question not created");
                self.notifier.notify_error(&err.user_message());
                Err(err)
            }
        }
    }

    /// Ask for confirmation, then delete the question and drop it from the list.
    #[instrument(level = "info", skip(self))]
    pub async fn delete_question(&mut self, id: &QuestionId) -> Result<Outcome, QuestionnaireError> {
        if !self.notifier.confirm(CONFIRM_DELETE).await {
            info!("deletion declined");
            return Ok(Outcome::Declined);
        }

        let result = self
            .server
            .delete_question(id)
            .await
            .map_err(QuestionnaireError::from)
            .and_then(|reply| reply.into_result());

        match result {
            Ok(()) => {
                info!("question deleted");
                self.page.remove_item(id);
                self.notifier.notify_success(DELETE_SUCCESS);
                Ok(Outcome::Completed)
            }
            Err(err) => {
                warn!(error = %err, "question not deleted");
                self.notifier.notify_error(&err.user_message());
                Err(err)
            }
        }
    }
}
