//! Generates Zod validators for Prisma query arguments from a DMMF document.
//!
//! [`Generator::generate`] resolves every artifact in memory, [`output`]
//! persists them, and [`rpc`] exposes the whole pipeline as a Prisma
//! generator.

use std::path::Path;

use tracing::info;

pub mod aggregate;
pub mod config;
pub mod constraints;
pub mod dmmf;
pub mod emit;
pub mod enums;
mod error;
pub mod expr;
pub mod imports;
pub mod input;
pub mod naming;
pub mod operations;
pub mod output;
pub mod resolve;
pub mod rpc;

pub use config::{GeneratorConfig, GeneratorSettings, Provider};
pub use emit::EmittedSchema;
pub use error::{Error, FileIOError};

pub type Result<T, E = Error> = std::result::Result<T, E>;

use aggregate::AggregateCapabilities;
use dmmf::Document;
use input::InputTypeDescriptor;
use operations::OperationAssembler;

pub struct Generator {
	document: Document,
	config: GeneratorConfig,
}

impl Generator {
	/// `output` is only used to locate a custom Prisma client relative to the
	/// generated files.
	pub fn new(document: Document, settings: &GeneratorSettings, output: &Path) -> Self {
		let config = GeneratorConfig::new(settings, &document, output);
		Self { document, config }
	}

	pub fn config(&self) -> &GeneratorConfig {
		&self.config
	}

	/// Every artifact of the run, enums first, then objects, then
	/// operations.
	pub fn generate(&self) -> Result<Vec<EmittedSchema>> {
		let mut schemas = self
			.document
			.enum_types()
			.map(enums::enum_schema)
			.collect::<Result<Vec<_>>>()?;
		let enum_count = schemas.len();

		let mut descriptors = self
			.document
			.schema
			.input_object_types
			.prisma
			.iter()
			.map(InputTypeDescriptor::from)
			.collect::<Vec<_>>();

		constraints::mark_required_fields(&mut descriptors);

		for descriptor in &descriptors {
			schemas.push(resolve::object_schema(descriptor, &self.config)?);
		}
		let object_count = schemas.len() - enum_count;

		let capabilities = AggregateCapabilities::from_descriptors(&descriptors);
		let assembler = OperationAssembler::new(&self.config, &self.document.datamodel, &capabilities);

		for mapping in &self.document.mappings.model_operations {
			schemas.extend(assembler.assemble(mapping)?);
		}

		info!(
			enums = enum_count,
			objects = object_count,
			operations = schemas.len() - enum_count - object_count,
			"generated schemas"
		);

		Ok(schemas)
	}
}
