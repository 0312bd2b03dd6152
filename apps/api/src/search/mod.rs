// Search flow: credit gate → job-listings fetch → batch reconnaissance
// scoring of the first few results.

pub mod handlers;
pub mod jobs_client;
pub mod orchestrator;
