//! User-facing texts.

pub const CONFIRM_SUBMIT: &str = "Are you sure you want to submit your responses?";
pub const SUBMIT_SUCCESS: &str = "Your responses have been saved successfully!";
pub const SUBMIT_FAILED: &str = "Error sending responses. Please try again.";

pub const CONFIRM_DELETE: &str = "Are you sure you want to delete this question?";
pub const DELETE_SUCCESS: &str = "Question deleted";
pub const ADD_SUCCESS: &str = "Question created successfully";
