mod feedback;

pub use feedback::{apply_feedback, significant_words, FeedbackOutcome};
