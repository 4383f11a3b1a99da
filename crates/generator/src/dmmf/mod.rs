//! Serde mirror of the Prisma DMMF document.
//!
//! Only the parts of the document the generator reads are modelled; every
//! other key is ignored while deserializing.

mod model;
mod schema;

pub use model::*;
pub use schema::*;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Document {
	pub datamodel: Datamodel,
	pub schema: Schema,
	pub mappings: Mappings,
}

impl Document {
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(json)
	}

	/// Schema enums of both namespaces, prisma first.
	pub fn enum_types(&self) -> impl Iterator<Item = &SchemaEnum> {
		self.schema
			.enum_types
			.prisma
			.iter()
			.chain(self.schema.enum_types.model.iter())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const DOCUMENT: &str = r#"{
		"datamodel": {
			"models": [
				{
					"name": "User",
					"dbName": null,
					"fields": [
						{ "name": "id", "kind": "scalar", "isList": false, "isRequired": true, "type": "Int" },
						{ "name": "posts", "kind": "object", "isList": true, "isRequired": true, "type": "Post" }
					]
				}
			],
			"enums": []
		},
		"schema": {
			"inputObjectTypes": {
				"prisma": [
					{
						"name": "UserWhereUniqueInput",
						"constraints": { "maxNumFields": 1, "minNumFields": 1 },
						"fields": [
							{
								"name": "id",
								"isRequired": false,
								"isNullable": false,
								"inputTypes": [{ "type": "Int", "location": "scalar", "isList": false }]
							}
						]
					}
				]
			},
			"outputObjectTypes": { "prisma": [] },
			"enumTypes": {
				"prisma": [{ "name": "SortOrder", "values": ["asc", "desc"] }],
				"model": [{ "name": "Role", "values": ["USER", "ADMIN"] }]
			}
		},
		"mappings": {
			"modelOperations": [
				{ "model": "User", "plural": "users", "findUnique": "findUniqueUser", "createMany": "createManyUser" }
			],
			"otherOperations": { "read": [], "write": [] }
		}
	}"#;

	#[test]
	fn decodes_a_minimal_document() {
		let document = Document::from_json(DOCUMENT).unwrap();

		let user = document.datamodel.model("User").unwrap();
		assert!(user.has_relation());

		let input = &document.schema.input_object_types.prisma[0];
		assert_eq!(input.constraints.min_num_fields, Some(1));
		assert_eq!(input.fields[0].input_types[0].location, Location::Scalar);

		let mapping = &document.mappings.model_operations[0];
		assert_eq!(mapping.find_unique.as_deref(), Some("findUniqueUser"));
		assert_eq!(mapping.find_many, None);

		let enums = document.enum_types().map(|e| e.name.as_str()).collect::<Vec<_>>();
		assert_eq!(enums, ["SortOrder", "Role"]);
	}
}
