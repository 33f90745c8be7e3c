use std::time::Duration;

use crate::{
    client::{ClientError, GENERIC_FAILURE},
    entities::review::NewReviewRequest,
};

/// How long the success message stays up before the modal closes.
pub const CLOSE_DELAY: Duration = Duration::from_secs(2);

pub const MAX_STARS: u8 = 5;
pub const MISSING_FIELDS: &str = "Please fill all fields";
pub const MISSING_RATING: &str = "Please select a rating";
pub const SUBMIT_FAILED: &str = "Failed to submit review";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMessage {
    Success(String),
    Error(String),
}

/// What the modal should do once a submission finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    StayOpen,
    CloseAndReload { after: Duration },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewFormState {
    pub name: String,
    pub review: String,
    pub rating: u8,
    pub is_submitting: bool,
    pub message: Option<FormMessage>,
}

impl ReviewFormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clicking the star that is already the rating steps it down by one.
    pub fn click_star(&mut self, star: u8) {
        let star = star.min(MAX_STARS);
        self.rating = if star == self.rating { star.saturating_sub(1) } else { star };
    }

    pub fn validate(&self) -> Result<NewReviewRequest, String> {
        if self.name.trim().is_empty() || self.review.trim().is_empty() {
            return Err(MISSING_FIELDS.to_string());
        }
        if self.rating < 1 {
            return Err(MISSING_RATING.to_string());
        }
        Ok(NewReviewRequest {
            name: self.name.clone(),
            review: self.review.clone(),
            rating: i32::from(self.rating),
        })
    }

    /// Returns the request to send, or records the validation message.
    pub fn begin_submit(&mut self) -> Option<NewReviewRequest> {
        if self.is_submitting {
            return None;
        }
        match self.validate() {
            Ok(request) => {
                self.is_submitting = true;
                self.message = None;
                Some(request)
            }
            Err(message) => {
                self.message = Some(FormMessage::Error(message));
                None
            }
        }
    }

    pub fn finish_submit(&mut self, result: Result<String, ClientError>) -> SubmitOutcome {
        self.is_submitting = false;

        match result {
            Ok(message) => {
                *self = ReviewFormState {
                    message: Some(FormMessage::Success(message)),
                    ..Default::default()
                };
                SubmitOutcome::CloseAndReload { after: CLOSE_DELAY }
            }
            Err(err) => {
                tracing::warn!("Review submission failed: {}", err);
                let message = match &err {
                    ClientError::Server { .. } => err.user_message(SUBMIT_FAILED),
                    _ => err.user_message(GENERIC_FAILURE),
                };
                self.message = Some(FormMessage::Error(message));
                SubmitOutcome::StayOpen
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> ReviewFormState {
        let mut form = ReviewFormState::new();
        form.name = "Meera".into();
        form.review = "Lovely drape".into();
        form.click_star(4);
        form
    }

    #[test]
    fn clicking_current_star_steps_down() {
        let mut form = ReviewFormState::new();
        form.click_star(3);
        assert_eq!(form.rating, 3);
        form.click_star(3);
        assert_eq!(form.rating, 2);
        form.click_star(5);
        assert_eq!(form.rating, 5);
        form.click_star(1);
        form.click_star(1);
        assert_eq!(form.rating, 0);
    }

    #[test]
    fn blank_fields_are_rejected() {
        let mut form = filled();
        form.review = "   ".into();
        assert!(form.begin_submit().is_none());
        assert_eq!(form.message, Some(FormMessage::Error(MISSING_FIELDS.into())));
        assert!(!form.is_submitting);
    }

    #[test]
    fn zero_rating_is_rejected() {
        let mut form = filled();
        form.rating = 0;
        assert!(form.begin_submit().is_none());
        assert_eq!(form.message, Some(FormMessage::Error(MISSING_RATING.into())));
    }

    #[test]
    fn success_clears_and_schedules_close() {
        let mut form = filled();
        let request = form.begin_submit().unwrap();
        assert_eq!(request.rating, 4);
        assert!(form.is_submitting);

        let outcome = form.finish_submit(Ok("Review added successfully".into()));
        assert_eq!(outcome, SubmitOutcome::CloseAndReload { after: CLOSE_DELAY });
        assert!(form.name.is_empty());
        assert_eq!(form.rating, 0);
        assert_eq!(form.message, Some(FormMessage::Success("Review added successfully".into())));
    }

    #[test]
    fn server_message_is_shown_verbatim() {
        let mut form = filled();
        form.begin_submit().unwrap();
        let outcome = form.finish_submit(Err(ClientError::Server {
            status: 400,
            message: Some("Rating must be between 1 and 5".into()),
        }));

        assert_eq!(outcome, SubmitOutcome::StayOpen);
        assert_eq!(form.message, Some(FormMessage::Error("Rating must be between 1 and 5".into())));
        assert_eq!(form.name, "Meera");
    }

    #[test]
    fn transport_failure_uses_generic_message() {
        let mut form = filled();
        form.begin_submit().unwrap();
        form.finish_submit(Err(ClientError::Transport("connection refused".into())));
        assert_eq!(form.message, Some(FormMessage::Error(GENERIC_FAILURE.into())));
        assert!(!form.is_submitting);
    }
}
