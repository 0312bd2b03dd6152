// Resume ingestion: PDF text extraction behind a fixed adapter contract.

pub mod extract;
pub mod handlers;
