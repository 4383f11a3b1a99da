use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
	pub input_object_types: InputObjectTypes,
	pub enum_types: EnumTypes,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InputObjectTypes {
	#[serde(default)]
	pub prisma: Vec<InputType>,
	#[serde(default)]
	pub model: Vec<InputType>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnumTypes {
	#[serde(default)]
	pub prisma: Vec<SchemaEnum>,
	#[serde(default)]
	pub model: Vec<SchemaEnum>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SchemaEnum {
	pub name: String,
	pub values: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InputType {
	pub name: String,
	#[serde(default)]
	pub constraints: Constraints,
	pub fields: Vec<SchemaArg>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraints {
	pub max_num_fields: Option<u32>,
	pub min_num_fields: Option<u32>,
	#[serde(default)]
	pub fields: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaArg {
	pub name: String,
	#[serde(default)]
	pub is_required: bool,
	#[serde(default)]
	pub is_nullable: bool,
	pub input_types: Vec<InputTypeRef>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputTypeRef {
	#[serde(rename = "type")]
	pub type_name: String,
	#[serde(default)]
	pub namespace: Option<Namespace>,
	pub location: Location,
	#[serde(default)]
	pub is_list: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
	Prisma,
	Model,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Location {
	Scalar,
	InputObjectTypes,
	OutputObjectTypes,
	EnumTypes,
	FieldRefTypes,
}
