//! Error types for the memory graph viewer

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
	#[error("invalid config: {0}")]
	Config(String),

	#[error("parse error: {0}")]
	Parse(#[from] serde_json::Error),

	#[error("provider error: {0}")]
	Provider(String),
}

pub type Result<T> = std::result::Result<T, Error>;
