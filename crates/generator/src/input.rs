//! The generator's own view of the input object types, decoupled from the
//! raw DMMF shapes.

use std::str::FromStr;

use crate::dmmf::{self, Location, Namespace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
	String,
	Int,
	Float,
	Decimal,
	BigInt,
	Boolean,
	DateTime,
	Json,
	True,
	Bytes,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown scalar type `{0}`")]
pub struct UnknownScalar(pub String);

impl FromStr for ScalarKind {
	type Err = UnknownScalar;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(match s {
			"String" => Self::String,
			"Int" => Self::Int,
			"Float" => Self::Float,
			"Decimal" => Self::Decimal,
			"BigInt" => Self::BigInt,
			"Boolean" => Self::Boolean,
			"DateTime" => Self::DateTime,
			"Json" => Self::Json,
			"True" => Self::True,
			"Bytes" => Self::Bytes,
			_ => return Err(UnknownScalar(s.to_string())),
		})
	}
}

/// Who declares a referenced enum or object type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
	/// Emitted by this generator.
	Generated,
	/// Built into the target model library.
	Library,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedRef {
	pub name: String,
	pub provenance: Provenance,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
	Scalar(ScalarKind),
	Enum(NamedRef),
	Object(NamedRef),
	/// A candidate the resolver has no validator for (field references,
	/// the `Null` scalar, output types). It yields no alternative.
	Unsupported(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
	pub kind: TypeKind,
	pub is_list: bool,
}

impl TypeRef {
	pub fn scalar(kind: ScalarKind) -> Self {
		Self {
			kind: TypeKind::Scalar(kind),
			is_list: false,
		}
	}

	pub fn generated_enum(name: impl Into<String>) -> Self {
		Self {
			kind: TypeKind::Enum(NamedRef {
				name: name.into(),
				provenance: Provenance::Generated,
			}),
			is_list: false,
		}
	}

	pub fn generated_object(name: impl Into<String>) -> Self {
		Self {
			kind: TypeKind::Object(NamedRef {
				name: name.into(),
				provenance: Provenance::Generated,
			}),
			is_list: false,
		}
	}

	pub fn list(mut self) -> Self {
		self.is_list = true;
		self
	}
}

impl From<&dmmf::InputTypeRef> for TypeRef {
	fn from(raw: &dmmf::InputTypeRef) -> Self {
		let provenance = match raw.namespace {
			Some(Namespace::Model) => Provenance::Library,
			Some(Namespace::Prisma) | None => Provenance::Generated,
		};
		let named = || NamedRef {
			name: raw.type_name.clone(),
			provenance,
		};

		let kind = match raw.location {
			Location::Scalar => raw
				.type_name
				.parse()
				.map(TypeKind::Scalar)
				.unwrap_or_else(|UnknownScalar(name)| TypeKind::Unsupported(name)),
			Location::EnumTypes => TypeKind::Enum(named()),
			Location::InputObjectTypes => TypeKind::Object(named()),
			Location::OutputObjectTypes | Location::FieldRefTypes => {
				TypeKind::Unsupported(raw.type_name.clone())
			}
		};

		Self {
			kind,
			is_list: raw.is_list,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaField {
	pub name: String,
	pub is_required: bool,
	pub is_nullable: bool,
	pub candidates: Vec<TypeRef>,
}

impl SchemaField {
	pub fn new(name: impl Into<String>, candidates: Vec<TypeRef>) -> Self {
		Self {
			name: name.into(),
			is_required: false,
			is_nullable: false,
			candidates,
		}
	}

	pub fn required(mut self) -> Self {
		self.is_required = true;
		self
	}

	pub fn nullable(mut self) -> Self {
		self.is_nullable = true;
		self
	}
}

impl From<&dmmf::SchemaArg> for SchemaField {
	fn from(arg: &dmmf::SchemaArg) -> Self {
		Self {
			name: arg.name.clone(),
			is_required: arg.is_required,
			is_nullable: arg.is_nullable,
			candidates: arg.input_types.iter().map(Into::into).collect(),
		}
	}
}

/// Structural constraints carried by unique-lookup input types.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldConstraints {
	pub min_required: Option<u32>,
	pub max_required: Option<u32>,
	pub required_fields: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputTypeDescriptor {
	pub name: String,
	pub fields: Vec<SchemaField>,
	pub constraints: FieldConstraints,
}

impl InputTypeDescriptor {
	pub fn new(name: impl Into<String>, fields: Vec<SchemaField>) -> Self {
		Self {
			name: name.into(),
			fields,
			constraints: FieldConstraints::default(),
		}
	}
}

impl From<&dmmf::InputType> for InputTypeDescriptor {
	fn from(input: &dmmf::InputType) -> Self {
		Self {
			name: input.name.clone(),
			fields: input.fields.iter().map(Into::into).collect(),
			constraints: FieldConstraints {
				min_required: input.constraints.min_num_fields,
				max_required: input.constraints.max_num_fields,
				required_fields: input.constraints.fields.clone(),
			},
		}
	}
}
