// Skill matching core: normalization, role taxonomy, gap analysis, detection,
// and the extraction fan-out.

pub mod detection;
pub mod extraction;
pub mod gap;
pub mod handlers;
pub mod matcher;
pub mod taxonomy;
