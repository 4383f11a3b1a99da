use std::{fmt::Display, path::Path};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
	/// A candidate or field the resolver cannot turn into valid code.
	#[error("unrecognized construct in `{input_type}.{field}`: {reason}")]
	UnrecognizedConstruct {
		input_type: String,
		field: String,
		reason: String,
	},
	/// The model mappings name a model missing from the datamodel.
	#[error("model operations reference unknown model `{0}`")]
	UnknownModel(String),
	#[error("invalid JSON: {0}")]
	Json(#[from] serde_json::Error),
	/// The generator protocol channel (stdin/stderr) failed.
	#[error("generator protocol I/O error: {0}")]
	Protocol(#[from] std::io::Error),
	#[error(transparent)]
	FileIO(#[from] FileIOError),
}

impl Error {
	pub(crate) fn unrecognized(
		input_type: impl Into<String>,
		field: impl Into<String>,
		reason: impl Into<String>,
	) -> Self {
		Self::UnrecognizedConstruct {
			input_type: input_type.into(),
			field: field.into(),
			reason: reason.into(),
		}
	}
}

/// File I/O error that includes the path that caused the error
#[derive(Error, Debug)]
pub struct FileIOError {
	pub path: Box<Path>,
	#[source]
	pub source: std::io::Error,
	pub maybe_context: Option<&'static str>,
}

impl Display for FileIOError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"file I/O error{}: {}; path: '{}'",
			self.maybe_context
				.map(|ctx| format!(" ({ctx})"))
				.unwrap_or_default(),
			self.source,
			self.path.display()
		)
	}
}

impl FileIOError {
	pub fn from_std_io_err(path: impl AsRef<Path>, source: std::io::Error) -> Self {
		Self {
			path: path.as_ref().into(),
			source,
			maybe_context: None,
		}
	}

	pub fn from_std_io_err_with_msg(
		path: impl AsRef<Path>,
		source: std::io::Error,
		msg: &'static str,
	) -> Self {
		Self {
			path: path.as_ref().into(),
			source,
			maybe_context: Some(msg),
		}
	}
}

impl<P: AsRef<Path>> From<(P, std::io::Error)> for FileIOError {
	fn from((path, source): (P, std::io::Error)) -> Self {
		Self::from_std_io_err(path, source)
	}
}

impl<P: AsRef<Path>> From<(P, std::io::Error, &'static str)> for FileIOError {
	fn from((path, source, msg): (P, std::io::Error, &'static str)) -> Self {
		Self::from_std_io_err_with_msg(path, source, msg)
	}
}
