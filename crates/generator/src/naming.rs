//! Emitted names and cross-artifact references.
//!
//! Everything here is a pure function of a type name and the frozen
//! [`GeneratorConfig`].

use std::{borrow::Cow, collections::HashMap, sync::OnceLock};

use regex::Regex;

use crate::{
	config::{GeneratorConfig, Provider},
	dmmf::ModelMapping,
	emit::ArtifactCategory,
	imports::Import,
};

const LIST_RELATION_FILTER: &str = "ListRelationFilter";
const RELATION_FILTER: &str = "RelationFilter";
const WHERE_INPUT: &str = "WhereInput";

const AGGREGATE_INPUT_SUFFIXES: [&str; 5] = [
	"CountAggregateInput",
	"SumAggregateInput",
	"AvgAggregateInput",
	"MinAggregateInput",
	"MaxAggregateInput",
];

/// Query argument types that are emitted as operation schemas instead of
/// object schemas, with the operation they belong to.
const MODEL_QUERY_TYPES: [(&str, &str); 1] = [("FindManyArgs", "findMany")];

/// Collapses relation filter shapes onto the owning model's where input.
///
/// `PostRelationFilter` → `PostWhereInput`, `TagListRelationFilter` →
/// `TagWhereInput`.
pub fn rewrite_relation_filter(name: &str) -> Cow<'_, str> {
	[LIST_RELATION_FILTER, RELATION_FILTER]
		.into_iter()
		.find_map(|suffix| name.strip_suffix(suffix))
		.map_or(Cow::Borrowed(name), |model| {
			Cow::Owned(format!("{model}{WHERE_INPUT}"))
		})
}

pub fn object_schema_ident(name: &str) -> String {
	format!("{name}ObjectSchema")
}

pub fn enum_schema_ident(name: &str) -> String {
	format!("{name}Schema")
}

/// Export identifier of the operation schema `op` of `model`, e.g.
/// `UserFindManySchema`.
pub fn operation_schema_ident(model: &str, op: &str) -> String {
	format!("{}{}Schema", capitalize(model), capitalize(op))
}

pub fn capitalize(s: &str) -> Cow<'_, str> {
	let mut chars = s.chars();
	match chars.next() {
		Some(first) if !first.is_uppercase() => {
			Cow::Owned(first.to_uppercase().chain(chars).collect())
		}
		_ => Cow::Borrowed(s),
	}
}

/// A query argument type such as `PostFindManyArgs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelQuery {
	pub model: String,
	pub query: &'static str,
}

impl ModelQuery {
	pub fn detect(name: &str) -> Option<Self> {
		MODEL_QUERY_TYPES.iter().find_map(|&(marker, query)| {
			name.find(marker).map(|index| Self {
				model: name[..index].to_string(),
				query,
			})
		})
	}

	pub fn schema_ident(&self) -> String {
		operation_schema_ident(&self.model, self.query)
	}

	/// Stem of the per-operation file, matching the action name
	/// (`findManyPost`).
	pub fn file_stem(&self) -> String {
		format!("{}{}", self.query, self.model)
	}
}

pub fn is_aggregate_input(name: &str) -> bool {
	AGGREGATE_INPUT_SUFFIXES
		.iter()
		.any(|suffix| name.ends_with(suffix))
}

/// Name of the library type an input type validates against. Aggregate
/// inputs are exported by the client with a `Type` suffix.
pub fn prisma_type_name(name: &str) -> Cow<'_, str> {
	if is_aggregate_input(name) {
		Cow::Owned(format!("{name}Type"))
	} else {
		Cow::Borrowed(name)
	}
}

fn raw_op_regex() -> &'static Regex {
	static RAW_OP: OnceLock<Regex> = OnceLock::new();
	RAW_OP.get_or_init(|| {
		Regex::new(r"find[\s\S]*?Raw|aggregate[\s\S]*?Raw").expect("raw op pattern is valid")
	})
}

pub fn is_mongodb_raw_op(name: &str) -> bool {
	raw_op_regex().is_match(name)
}

/// Maps `find<Model>Raw` / `aggregate<Model>Raw` input type names to the
/// client's argument types, for every model exposing raw operations.
pub fn raw_ops_map(mappings: &[ModelMapping]) -> HashMap<String, String> {
	let mut map = HashMap::new();

	for mapping in mappings {
		let model = &mapping.model;
		if mapping.find_raw.is_some() {
			map.insert(format!("find{model}Raw"), format!("{model}FindRawArgs"));
		}
		if mapping.aggregate_raw.is_some() {
			map.insert(
				format!("aggregate{model}Raw"),
				format!("{model}AggregateRawArgs"),
			);
		}
	}

	map
}

/// Names under which an input type is emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectNames {
	/// File stem and prefix of the `<export>ObjectSchema` identifier.
	pub export: String,
	/// Library type the schema is annotated with.
	pub prisma_type: String,
}

impl ObjectNames {
	pub fn resolve(name: &str, config: &GeneratorConfig) -> Self {
		let aliased = (config.provider == Provider::Mongodb && is_mongodb_raw_op(name))
			.then(|| config.raw_ops.get(name))
			.flatten();

		match aliased {
			Some(args) => Self {
				export: args.strip_suffix("Args").unwrap_or(args).to_string(),
				prisma_type: prisma_type_name(args).into_owned(),
			},
			None => Self {
				export: name.to_string(),
				prisma_type: prisma_type_name(name).into_owned(),
			},
		}
	}

	pub fn schema_ident(&self) -> String {
		object_schema_ident(&self.export)
	}
}

/// How a field refers to an enum or object type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
	/// Identifier used in the validator expression.
	pub ident: String,
	/// Library type name for casts, after relation filter renaming.
	pub type_name: String,
	/// `None` for references to the artifact being emitted.
	pub import: Option<Import>,
}

/// Resolves a raw candidate type name referenced from the artifact `owner`.
pub fn resolve_reference(raw: &str, is_enum: bool, owner: &str) -> Reference {
	if let Some(query) = ModelQuery::detect(raw) {
		return Reference {
			ident: query.schema_ident(),
			type_name: raw.to_string(),
			import: Some(Import {
				ident: query.schema_ident(),
				kind: ArtifactCategory::Operation,
				stem: query.file_stem(),
			}),
		};
	}

	let name = rewrite_relation_filter(raw).into_owned();
	let (ident, kind) = if is_enum {
		(enum_schema_ident(&name), ArtifactCategory::Enum)
	} else {
		(object_schema_ident(&name), ArtifactCategory::Object)
	};

	let import = (name != owner).then(|| Import {
		ident: ident.clone(),
		kind,
		stem: name.clone(),
	});

	Reference {
		ident,
		type_name: name,
		import,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn relation_filters_collapse_onto_where_inputs() {
		assert_eq!(rewrite_relation_filter("PostRelationFilter"), "PostWhereInput");
		assert_eq!(rewrite_relation_filter("TagListRelationFilter"), "TagWhereInput");
		assert_eq!(rewrite_relation_filter("StringFilter"), "StringFilter");
	}

	#[test]
	fn references_import_the_rewritten_name() {
		let reference = resolve_reference("PostRelationFilter", false, "UserWhereInput");

		assert_eq!(reference.ident, "PostWhereInputObjectSchema");
		assert_eq!(reference.type_name, "PostWhereInput");
		assert_eq!(
			reference.import,
			Some(Import {
				ident: "PostWhereInputObjectSchema".into(),
				kind: ArtifactCategory::Object,
				stem: "PostWhereInput".into(),
			})
		);
	}

	#[test]
	fn self_references_are_not_imported() {
		let reference = resolve_reference("UserWhereInput", false, "UserWhereInput");
		assert_eq!(reference.import, None);
	}

	#[test]
	fn enum_references_use_enum_identifiers() {
		let reference = resolve_reference("Role", true, "UserCreateInput");
		assert_eq!(reference.ident, "RoleSchema");
		assert_eq!(reference.import.unwrap().kind, ArtifactCategory::Enum);
	}

	#[test]
	fn find_many_args_are_operation_schemas() {
		let query = ModelQuery::detect("postFindManyArgs").unwrap();
		assert_eq!(query.model, "post");
		assert_eq!(query.schema_ident(), "PostFindManySchema");
		assert_eq!(query.file_stem(), "findManypost");

		let reference = resolve_reference("PostFindManyArgs", false, "UserInclude");
		assert_eq!(reference.ident, "PostFindManySchema");
		assert_eq!(reference.import.unwrap().stem, "findManyPost");
	}

	#[test]
	fn aggregate_inputs_get_a_type_suffix() {
		assert_eq!(prisma_type_name("UserCountAggregateInput"), "UserCountAggregateInputType");
		assert_eq!(prisma_type_name("UserWhereInput"), "UserWhereInput");
	}

	#[test]
	fn raw_ops_are_aliased_for_mongodb_only() {
		let mappings = [ModelMapping {
			model: "User".into(),
			find_raw: Some("findUserRaw".into()),
			aggregate_raw: Some("aggregateUserRaw".into()),
			..Default::default()
		}];
		let mut config = GeneratorConfig {
			raw_ops: raw_ops_map(&mappings),
			..Default::default()
		};

		assert_eq!(
			ObjectNames::resolve("findUserRaw", &config).export,
			"findUserRaw"
		);

		config.provider = Provider::Mongodb;
		assert_eq!(
			ObjectNames::resolve("findUserRaw", &config),
			ObjectNames {
				export: "UserFindRaw".into(),
				prisma_type: "UserFindRawArgs".into(),
			}
		);
		assert_eq!(
			ObjectNames::resolve("aggregateUserRaw", &config).schema_ident(),
			"UserAggregateRawObjectSchema"
		);
	}
}
