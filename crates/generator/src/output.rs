//! Writes generated artifacts below the output directory.

use std::path::{Path, PathBuf};

use futures::future::try_join_all;
use tokio::fs;
use tracing::{debug, info, trace};

use crate::{EmittedSchema, FileIOError, Result};

const INDEX_PATH: &str = "schemas/index.ts";

/// Creates `output` and removes anything a previous run left in it.
pub async fn prepare_output_dir(output: &Path) -> Result<()> {
	fs::create_dir_all(output)
		.await
		.map_err(|e| FileIOError::from((output, e, "creating output directory")))?;

	let mut entries = fs::read_dir(output)
		.await
		.map_err(|e| FileIOError::from((output, e, "reading output directory")))?;

	let mut removals = Vec::new();
	while let Some(entry) = entries
		.next_entry()
		.await
		.map_err(|e| FileIOError::from((output, e, "reading output directory")))?
	{
		let path = entry.path();
		let is_dir = entry
			.file_type()
			.await
			.map_err(|e| FileIOError::from((&path, e)))?
			.is_dir();

		removals.push(async move {
			trace!(path = %path.display(), "removing stale output");
			let removed = if is_dir {
				fs::remove_dir_all(&path).await
			} else {
				fs::remove_file(&path).await
			};

			removed.map_err(|e| FileIOError::from((path, e, "cleaning output directory")))
		});
	}

	try_join_all(removals).await?;

	Ok(())
}

async fn write_file(path: PathBuf, contents: String) -> Result<PathBuf> {
	if let Some(parent) = path.parent() {
		fs::create_dir_all(parent)
			.await
			.map_err(|e| FileIOError::from((parent, e)))?;
	}

	fs::write(&path, contents)
		.await
		.map_err(|e| FileIOError::from((&path, e, "writing schema")))?;

	debug!(path = %path.display(), "wrote schema");

	Ok(path)
}

/// Re-exports every artifact, in the given order.
pub fn index_source(schemas: &[EmittedSchema]) -> String {
	schemas
		.iter()
		.map(|schema| {
			let relative = schema
				.logical_path()
				.strip_prefix("schemas")
				.map(Path::to_path_buf)
				.unwrap_or_else(|_| schema.logical_path());
			let module = relative.with_extension("");

			let module = module
				.components()
				.map(|c| c.as_os_str().to_string_lossy())
				.collect::<Vec<_>>()
				.join("/");

			format!("export * from './{module}';\n")
		})
		.collect()
}

/// Writes every artifact concurrently, then the index. Returns the written
/// paths, index last.
pub async fn write_schemas(output: &Path, schemas: &[EmittedSchema]) -> Result<Vec<PathBuf>> {
	let mut written = try_join_all(
		schemas
			.iter()
			.map(|schema| write_file(output.join(schema.logical_path()), schema.source_text())),
	)
	.await?;

	written.push(write_file(output.join(INDEX_PATH), index_source(schemas)).await?);

	info!(output = %output.display(), files = written.len(), "wrote schemas");

	Ok(written)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		emit::ArtifactCategory,
		expr::Expr,
		imports::ImportTracker,
	};

	fn schema(category: ArtifactCategory, stem: &str) -> EmittedSchema {
		EmittedSchema {
			category,
			stem: stem.into(),
			export_name: format!("{stem}Schema"),
			body: Expr::Enum(vec!["A".into()]),
			imports: ImportTracker::new(),
			object: None,
		}
	}

	#[test]
	fn index_keeps_emission_order() {
		let schemas = [
			schema(ArtifactCategory::Enum, "Role"),
			schema(ArtifactCategory::Object, "UserWhereInput"),
			schema(ArtifactCategory::Operation, "findManyUser"),
		];

		assert_eq!(
			index_source(&schemas),
			"export * from './enums/Role.schema';\nexport * from './objects/UserWhereInput.schema';\nexport * from './findManyUser.schema';\n"
		);
	}

	#[tokio::test]
	async fn prepare_empties_previous_output() {
		let dir = tempfile::tempdir().unwrap();
		let output = dir.path().join("generated");

		std::fs::create_dir_all(output.join("schemas/objects")).unwrap();
		std::fs::write(output.join("schemas/objects/Stale.schema.ts"), "").unwrap();
		std::fs::write(output.join("notes.txt"), "").unwrap();

		prepare_output_dir(&output).await.unwrap();

		assert!(output.is_dir());
		assert_eq!(std::fs::read_dir(&output).unwrap().count(), 0);
	}
}
