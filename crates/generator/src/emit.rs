//! Generated artifacts and their source text.

use std::{fmt::Write, path::PathBuf};

use crate::{expr::Expr, imports::ImportTracker};

const ZOD_IMPORT: &str = "import { z } from 'zod';\n";

const JSON_SCHEMA_DECLARATION: &str = "\
const literalSchema = z.union([z.string(), z.number(), z.boolean()]);
const jsonSchema: z.ZodType<Prisma.InputJsonValue> = z.lazy(() =>
  z.union([literalSchema, z.array(jsonSchema.nullable()), z.record(jsonSchema.nullable())]),
);
";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactCategory {
	Enum,
	Object,
	Operation,
}

impl ArtifactCategory {
	/// Directory under `schemas/`, `None` for the `schemas/` root.
	pub fn dir(self) -> Option<&'static str> {
		match self {
			Self::Enum => Some("enums"),
			Self::Object => Some("objects"),
			Self::Operation => None,
		}
	}
}

/// Declaration specific to object schemas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectDeclaration {
	/// Library type the schema is annotated with (`Prisma.<T>`).
	pub prisma_type: String,
	/// Module specifier of the Prisma client.
	pub prisma_import: String,
	/// Whether the shared JSON validator must be declared.
	pub uses_json: bool,
}

/// A generated schema, ready to be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedSchema {
	pub category: ArtifactCategory,
	/// File stem, unique within the category.
	pub stem: String,
	pub export_name: String,
	pub body: Expr,
	pub imports: ImportTracker,
	pub object: Option<ObjectDeclaration>,
}

impl EmittedSchema {
	/// Path of the artifact relative to the output directory.
	pub fn logical_path(&self) -> PathBuf {
		let mut path = PathBuf::from("schemas");
		if let Some(dir) = self.category.dir() {
			path.push(dir);
		}
		path.push(format!("{}.schema.ts", self.stem));
		path
	}

	pub fn source_text(&self) -> String {
		let mut out = String::from(ZOD_IMPORT);
		out.push_str(&self.imports.render(self.category));

		match &self.object {
			Some(object) => {
				let _ = writeln!(out, "import type {{ Prisma }} from '{}';", object.prisma_import);
				out.push('\n');

				if object.uses_json {
					out.push_str(JSON_SCHEMA_DECLARATION);
					out.push('\n');
				}

				let _ = writeln!(
					out,
					"const Schema: z.ZodType<Prisma.{}> = {:#};",
					object.prisma_type, self.body
				);
				out.push('\n');
				let _ = writeln!(out, "export const {} = Schema;", self.export_name);
			}
			None => {
				out.push('\n');
				let _ = writeln!(out, "export const {} = {:#};", self.export_name, self.body);
			}
		}

		out
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		expr::Scalar,
		imports::{Import, ImportTracker},
	};

	#[test]
	fn enum_artifacts_live_under_enums() {
		let schema = EmittedSchema {
			category: ArtifactCategory::Enum,
			stem: "Role".into(),
			export_name: "RoleSchema".into(),
			body: Expr::Enum(vec!["USER".into(), "ADMIN".into()]),
			imports: ImportTracker::new(),
			object: None,
		};

		assert_eq!(schema.logical_path(), PathBuf::from("schemas/enums/Role.schema.ts"));
		assert_eq!(
			schema.source_text(),
			"import { z } from 'zod';\n\nexport const RoleSchema = z.enum([\"USER\", \"ADMIN\"]);\n"
		);
	}

	#[test]
	fn object_artifacts_declare_json_and_annotation() {
		let mut imports = ImportTracker::new();
		imports.insert(Import {
			ident: "RoleSchema".into(),
			kind: ArtifactCategory::Enum,
			stem: "Role".into(),
		});

		let schema = EmittedSchema {
			category: ArtifactCategory::Object,
			stem: "UserCreateInput".into(),
			export_name: "UserCreateInputObjectSchema".into(),
			body: Expr::object([("meta", Expr::Scalar(Scalar::Json).optional())]).strict(),
			imports,
			object: Some(ObjectDeclaration {
				prisma_type: "UserCreateInput".into(),
				prisma_import: "@prisma/client".into(),
				uses_json: true,
			}),
		};

		assert_eq!(
			schema.logical_path(),
			PathBuf::from("schemas/objects/UserCreateInput.schema.ts")
		);

		let text = schema.source_text();
		assert!(text.starts_with(
			"import { z } from 'zod';\nimport { RoleSchema } from '../enums/Role.schema';\nimport type { Prisma } from '@prisma/client';\n\nconst literalSchema"
		));
		assert!(text.contains(
			"const Schema: z.ZodType<Prisma.UserCreateInput> = z.object({\n  meta: jsonSchema.optional(),\n}).strict();\n\nexport const UserCreateInputObjectSchema = Schema;\n"
		));
	}

	#[test]
	fn operation_artifacts_live_at_the_root() {
		let schema = EmittedSchema {
			category: ArtifactCategory::Operation,
			stem: "deleteManyUser".into(),
			export_name: "UserDeleteManySchema".into(),
			body: Expr::object(Vec::<(String, Expr)>::new()),
			imports: ImportTracker::new(),
			object: None,
		};

		assert_eq!(schema.logical_path(), PathBuf::from("schemas/deleteManyUser.schema.ts"));
	}
}
