use crate::{
	dmmf::SchemaEnum,
	emit::{ArtifactCategory, EmittedSchema},
	expr::Expr,
	imports::ImportTracker,
	naming,
	resolve::is_identifier,
	Error,
};

pub fn enum_schema(schema_enum: &SchemaEnum) -> Result<EmittedSchema, Error> {
	if !is_identifier(&schema_enum.name) {
		return Err(Error::unrecognized(
			&schema_enum.name,
			"",
			"enum name is not a valid identifier",
		));
	}

	Ok(EmittedSchema {
		category: ArtifactCategory::Enum,
		stem: schema_enum.name.clone(),
		export_name: naming::enum_schema_ident(&schema_enum.name),
		body: Expr::Enum(schema_enum.values.clone()),
		imports: ImportTracker::new(),
		object: None,
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn scalar_field_enums_keep_value_order() {
		let schema = enum_schema(&SchemaEnum {
			name: "UserScalarFieldEnum".into(),
			values: vec!["id".into(), "email".into(), "name".into()],
		})
		.unwrap();

		assert_eq!(schema.export_name, "UserScalarFieldEnumSchema");
		assert_eq!(
			schema.body.to_string(),
			r#"z.enum(["id", "email", "name"])"#
		);
	}
}
