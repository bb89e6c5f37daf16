//! State module for tracking indexing progress
//!
//! - `SiteStatus`: the indexing state of a site (indexing, indexed, failed)

mod site_status;

pub use site_status::SiteStatus;
