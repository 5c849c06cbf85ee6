// Job matching: required-skill coverage against skills evidenced by a project set.

pub mod handlers;
pub mod job_match;
