// Portfolio scoring: category scores, rank table, and threshold-based feedback.

pub mod feedback;
pub mod handlers;
pub mod scoring;
