// Project recommendations: template catalog, ranking engine, live-merge source,
// and the filter/sort pass.

pub mod catalog;
pub mod engine;
pub mod filters;
pub mod handlers;
pub mod live;
