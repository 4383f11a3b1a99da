//! Field-to-validator resolution.
//!
//! Each input type is resolved on its own by an [`ObjectResolver`]: every
//! field becomes one [`FieldLine`], every referenced artifact lands in the
//! resolver's [`ImportTracker`], and the whole type either resolves or fails.

mod policy;

pub use policy::*;

use tracing::{debug, trace};

use crate::{
	config::GeneratorConfig,
	emit::{ArtifactCategory, EmittedSchema, ObjectDeclaration},
	expr::Expr,
	imports::ImportTracker,
	input::{InputTypeDescriptor, NamedRef, Provenance, ScalarKind, SchemaField, TypeKind, TypeRef},
	naming::{self, ObjectNames},
	Error,
};

/// `name: expr` entry of a generated object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLine {
	pub name: String,
	pub expr: Expr,
}

pub(crate) fn is_identifier(s: &str) -> bool {
	let mut chars = s.chars();
	chars
		.next()
		.is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
		&& chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

pub struct ObjectResolver<'a> {
	config: &'a GeneratorConfig,
	owner: &'a str,
	imports: ImportTracker,
	uses_json: bool,
}

impl<'a> ObjectResolver<'a> {
	pub fn new(config: &'a GeneratorConfig, owner: &'a str) -> Self {
		Self {
			config,
			owner,
			imports: ImportTracker::new(),
			uses_json: false,
		}
	}

	/// Resolves one field, `None` when none of its candidates has a
	/// validator.
	pub fn resolve_field(&mut self, field: &SchemaField) -> Result<Option<FieldLine>, Error> {
		if !is_identifier(&field.name) {
			return Err(Error::unrecognized(
				self.owner,
				&field.name,
				"field name is not a valid identifier",
			));
		}

		let mut alternatives = Vec::with_capacity(field.candidates.len());
		for candidate in &field.candidates {
			if let Some(alternative) = self.alternative(field, candidate)? {
				alternatives.push(alternative);
			}
		}

		if alternatives.is_empty() {
			debug!(input_type = self.owner, field = %field.name, "no validator for any candidate, field dropped");
			return Ok(None);
		}

		if is_filter_field(&field.name)
			&& alternatives.len() > 1
			&& alternatives.iter().any(Expr::is_list)
		{
			alternatives.retain(Expr::is_list);
		}

		let relation_filter = is_relation_filter_field(&field.name);
		let modifier = Modifier::for_field(field.is_required, field.is_nullable, relation_filter);

		let mut expr = match alternatives.len() {
			1 => modifier.apply(alternatives.remove(0)),
			_ => {
				let union = modifier.apply(Expr::union(
					alternatives.into_iter().map(Expr::strip_optional).collect(),
				));

				match first_generated_object(&field.candidates) {
					Some(object) => union.cast(naming::rewrite_relation_filter(&object.name)),
					None => union,
				}
			}
		};

		if relation_filter {
			expr = expr.strip_nullable();
		}

		Ok(Some(FieldLine {
			name: field.name.clone(),
			expr,
		}))
	}

	/// Validator of a single candidate, carrying its own `.optional()` when
	/// the field is not required.
	fn alternative(&mut self, field: &SchemaField, candidate: &TypeRef) -> Result<Option<Expr>, Error> {
		let list = |expr: Expr| if candidate.is_list { expr.list() } else { expr };

		let branch = match &candidate.kind {
			TypeKind::Scalar(kind) => {
				if *kind == ScalarKind::Json {
					self.uses_json = true;
				}
				list(Expr::Scalar((*kind).into()))
			}
			TypeKind::Enum(named) => {
				let reference = self.reference(field, named, true)?;
				list(Expr::reference(reference.ident).deferred())
			}
			TypeKind::Object(named) if named.provenance == Provenance::Generated => {
				let reference = self.reference(field, named, false)?;
				let target = if candidate.is_list {
					format!("{}[]", reference.type_name)
				} else {
					reference.type_name
				};

				list(Expr::reference(reference.ident).deferred()).cast(target)
			}
			TypeKind::Object(NamedRef { name, .. }) | TypeKind::Unsupported(name) => {
				trace!(input_type = self.owner, field = %field.name, candidate = %name, "candidate skipped");
				return Ok(None);
			}
		};

		Ok(Some(if field.is_required {
			branch
		} else {
			branch.optional()
		}))
	}

	fn reference(
		&mut self,
		field: &SchemaField,
		named: &NamedRef,
		is_enum: bool,
	) -> Result<naming::Reference, Error> {
		if !is_identifier(&named.name) {
			return Err(Error::unrecognized(
				self.owner,
				&field.name,
				format!("candidate type `{}` is not a valid identifier", named.name),
			));
		}

		let is_enum = is_enum || self.config.is_enum(&named.name);
		let reference = naming::resolve_reference(&named.name, is_enum, self.owner);

		if let Some(import) = &reference.import {
			self.imports.insert(import.clone());
		}

		Ok(reference)
	}

	pub fn imports(&self) -> &ImportTracker {
		&self.imports
	}

	pub fn uses_json(&self) -> bool {
		self.uses_json
	}

	fn finish(self) -> (ImportTracker, bool) {
		(self.imports, self.uses_json)
	}
}

fn first_generated_object(candidates: &[TypeRef]) -> Option<&NamedRef> {
	candidates.iter().find_map(|candidate| match &candidate.kind {
		TypeKind::Object(named) if named.provenance == Provenance::Generated => Some(named),
		_ => None,
	})
}

/// Resolves a whole input type into its object schema.
pub fn object_schema(
	descriptor: &InputTypeDescriptor,
	config: &GeneratorConfig,
) -> Result<EmittedSchema, Error> {
	if !is_identifier(&descriptor.name) {
		return Err(Error::unrecognized(
			&descriptor.name,
			"",
			"input type name is not a valid identifier",
		));
	}

	let mut resolver = ObjectResolver::new(config, &descriptor.name);

	let mut fields = Vec::with_capacity(descriptor.fields.len());
	for field in &descriptor.fields {
		if let Some(line) = resolver.resolve_field(field)? {
			fields.push((line.name, line.expr));
		}
	}

	let names = ObjectNames::resolve(&descriptor.name, config);
	let (imports, uses_json) = resolver.finish();

	debug!(
		input_type = %descriptor.name,
		fields = fields.len(),
		imports = imports.len(),
		"resolved object schema"
	);

	Ok(EmittedSchema {
		category: ArtifactCategory::Object,
		stem: names.export.clone(),
		export_name: names.schema_ident(),
		body: Expr::Object(fields).strict(),
		imports,
		object: Some(ObjectDeclaration {
			prisma_type: names.prisma_type,
			prisma_import: config.prisma_client_import.clone(),
			uses_json,
		}),
	})
}
