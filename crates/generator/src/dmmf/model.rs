use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Datamodel {
	pub models: Vec<Model>,
}

impl Datamodel {
	pub fn model(&self, name: &str) -> Option<&Model> {
		self.models.iter().find(|m| m.name == name)
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct Model {
	pub name: String,
	pub fields: Vec<ModelField>,
}

impl Model {
	/// Whether any field of the model points at another model.
	pub fn has_relation(&self) -> bool {
		self.fields.iter().any(|f| f.kind == FieldKind::Object)
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelField {
	pub name: String,
	pub kind: FieldKind,
	#[serde(default)]
	pub is_list: bool,
	#[serde(default)]
	pub is_required: bool,
	#[serde(rename = "type")]
	pub type_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
	Scalar,
	Object,
	Enum,
	Unsupported,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mappings {
	pub model_operations: Vec<ModelMapping>,
}

/// Action names of the operations available on one model, e.g.
/// `findUnique: "findUniqueUser"`. A missing key means the model lacks that
/// operation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelMapping {
	pub model: String,
	pub find_unique: Option<String>,
	pub find_first: Option<String>,
	pub find_many: Option<String>,
	pub create_one: Option<String>,
	pub create_many: Option<String>,
	pub delete_one: Option<String>,
	pub delete_many: Option<String>,
	pub update_one: Option<String>,
	pub update_many: Option<String>,
	pub upsert_one: Option<String>,
	pub aggregate: Option<String>,
	pub group_by: Option<String>,
	pub find_raw: Option<String>,
	pub aggregate_raw: Option<String>,
}
