//! Boda Endpoint — HTTP client for the remote form-script endpoint.

pub mod http_submitter;
