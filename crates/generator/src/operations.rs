//! Per-model operation argument schemas (`findManyUser.schema.ts`, ..).

use tracing::debug;

use crate::{
	aggregate::{AggregateCapabilities, AggregateCapability},
	config::GeneratorConfig,
	dmmf::{Datamodel, Model, ModelMapping},
	emit::{ArtifactCategory, EmittedSchema},
	expr::{Expr, Scalar},
	imports::{Import, ImportTracker},
	naming,
	resolve::is_identifier,
	Error,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
	FindUnique,
	FindFirst,
	FindMany,
	CreateOne,
	CreateMany,
	DeleteOne,
	DeleteMany,
	UpdateOne,
	UpdateMany,
	Upsert,
	Aggregate,
	GroupBy,
}

impl OperationKind {
	pub const ALL: [Self; 12] = [
		Self::FindUnique,
		Self::FindFirst,
		Self::FindMany,
		Self::CreateOne,
		Self::CreateMany,
		Self::DeleteOne,
		Self::DeleteMany,
		Self::UpdateOne,
		Self::UpdateMany,
		Self::Upsert,
		Self::Aggregate,
		Self::GroupBy,
	];

	/// Action name of this operation on the mapped model, used as file stem.
	pub fn action(self, mapping: &ModelMapping) -> Option<&str> {
		match self {
			Self::FindUnique => mapping.find_unique.as_deref(),
			Self::FindFirst => mapping.find_first.as_deref(),
			Self::FindMany => mapping.find_many.as_deref(),
			Self::CreateOne => mapping.create_one.as_deref(),
			Self::CreateMany => mapping.create_many.as_deref(),
			Self::DeleteOne => mapping.delete_one.as_deref(),
			Self::DeleteMany => mapping.delete_many.as_deref(),
			Self::UpdateOne => mapping.update_one.as_deref(),
			Self::UpdateMany => mapping.update_many.as_deref(),
			Self::Upsert => mapping.upsert_one.as_deref(),
			Self::Aggregate => mapping.aggregate.as_deref(),
			Self::GroupBy => mapping.group_by.as_deref(),
		}
	}

	pub fn export_suffix(self) -> &'static str {
		match self {
			Self::FindUnique => "FindUnique",
			Self::FindFirst => "FindFirst",
			Self::FindMany => "FindMany",
			Self::CreateOne => "CreateOne",
			Self::CreateMany => "CreateMany",
			Self::DeleteOne => "DeleteOne",
			Self::DeleteMany => "DeleteMany",
			Self::UpdateOne => "UpdateOne",
			Self::UpdateMany => "UpdateMany",
			Self::Upsert => "Upsert",
			Self::Aggregate => "Aggregate",
			Self::GroupBy => "GroupBy",
		}
	}
}

/// Fields and imports of one operation schema under construction.
struct Assembly<'a> {
	model: &'a str,
	imports: ImportTracker,
	fields: Vec<(String, Expr)>,
}

impl<'a> Assembly<'a> {
	fn new(model: &'a str) -> Self {
		Self {
			model,
			imports: ImportTracker::new(),
			fields: Vec::new(),
		}
	}

	/// Reference to the object schema `<Model><suffix>`.
	fn object(&mut self, suffix: &str) -> Expr {
		let name = format!("{}{suffix}", self.model);
		let ident = naming::object_schema_ident(&name);
		self.imports.insert(Import {
			ident: ident.clone(),
			kind: ArtifactCategory::Object,
			stem: name,
		});
		Expr::reference(ident)
	}

	fn scalar_field_enum(&mut self) -> Expr {
		let name = format!("{}ScalarFieldEnum", self.model);
		let ident = naming::enum_schema_ident(&name);
		self.imports.insert(Import {
			ident: ident.clone(),
			kind: ArtifactCategory::Enum,
			stem: name,
		});
		Expr::reference(ident)
	}

	fn field(&mut self, name: &str, expr: Expr) {
		self.fields.push((name.to_string(), expr));
	}

	fn number(&mut self, name: &str) {
		self.field(name, Expr::Scalar(Scalar::Number).optional());
	}
}

pub struct OperationAssembler<'a> {
	config: &'a GeneratorConfig,
	datamodel: &'a Datamodel,
	capabilities: &'a AggregateCapabilities,
}

impl<'a> OperationAssembler<'a> {
	pub fn new(
		config: &'a GeneratorConfig,
		datamodel: &'a Datamodel,
		capabilities: &'a AggregateCapabilities,
	) -> Self {
		Self {
			config,
			datamodel,
			capabilities,
		}
	}

	/// One schema per operation enabled in `mapping`.
	pub fn assemble(&self, mapping: &ModelMapping) -> Result<Vec<EmittedSchema>, Error> {
		let enabled = OperationKind::ALL
			.into_iter()
			.filter_map(|kind| kind.action(mapping).map(|action| (kind, action)))
			.collect::<Vec<_>>();

		if enabled.is_empty() {
			return Ok(vec![]);
		}

		let model = self
			.datamodel
			.model(&mapping.model)
			.ok_or_else(|| Error::UnknownModel(mapping.model.clone()))?;

		if !is_identifier(&model.name) {
			return Err(Error::unrecognized(
				&model.name,
				"",
				"model name is not a valid identifier",
			));
		}

		let capability = self.capabilities.get(&model.name);

		enabled
			.into_iter()
			.map(|(kind, action)| {
				if !is_identifier(action) {
					return Err(Error::unrecognized(
						&model.name,
						action,
						"operation action is not a valid identifier",
					));
				}

				let assembly = self.build(kind, model, capability);
				debug!(model = %model.name, action, fields = assembly.fields.len(), "assembled operation schema");

				Ok(EmittedSchema {
					category: ArtifactCategory::Operation,
					stem: action.to_string(),
					export_name: naming::operation_schema_ident(&model.name, kind.export_suffix()),
					body: Expr::Object(assembly.fields),
					imports: assembly.imports,
					object: None,
				})
			})
			.collect()
	}

	fn build<'m>(&self, kind: OperationKind, model: &'m Model, capability: AggregateCapability) -> Assembly<'m> {
		let mut asm = Assembly::new(&model.name);

		match kind {
			OperationKind::FindUnique | OperationKind::DeleteOne => {
				self.projection(&mut asm, model, false);
				let unique = asm.object("WhereUniqueInput");
				asm.field("where", unique);
			}
			OperationKind::FindFirst | OperationKind::FindMany => {
				self.projection(&mut asm, model, kind == OperationKind::FindMany);
				self.order_by(&mut asm);
				self.window(&mut asm);
				let distinct = asm.scalar_field_enum().list().optional();
				asm.field("distinct", distinct);
			}
			OperationKind::CreateOne => {
				self.projection(&mut asm, model, false);
				let data = Expr::union(vec![
					asm.object("CreateInput"),
					asm.object("UncheckedCreateInput"),
				]);
				asm.field("data", data);
			}
			OperationKind::CreateMany => {
				let input = asm.object("CreateManyInput");
				asm.field("data", Expr::union(vec![input.clone(), input.list()]));
				if self.config.provider.supports_skip_duplicates() {
					asm.field("skipDuplicates", Expr::Scalar(Scalar::Boolean).optional());
				}
			}
			OperationKind::DeleteMany => {
				let filter = asm.object("WhereInput").optional();
				asm.field("where", filter);
			}
			OperationKind::UpdateOne => {
				self.projection(&mut asm, model, false);
				let data = Expr::union(vec![
					asm.object("UpdateInput"),
					asm.object("UncheckedUpdateInput"),
				]);
				asm.field("data", data);
				let unique = asm.object("WhereUniqueInput");
				asm.field("where", unique);
			}
			OperationKind::UpdateMany => {
				let data = asm.object("UpdateManyMutationInput");
				asm.field("data", data);
				let filter = asm.object("WhereInput").optional();
				asm.field("where", filter);
			}
			OperationKind::Upsert => {
				self.projection(&mut asm, model, false);
				let unique = asm.object("WhereUniqueInput");
				asm.field("where", unique);
				let create = Expr::union(vec![
					asm.object("CreateInput"),
					asm.object("UncheckedCreateInput"),
				]);
				asm.field("create", create);
				let update = Expr::union(vec![
					asm.object("UpdateInput"),
					asm.object("UncheckedUpdateInput"),
				]);
				asm.field("update", update);
			}
			OperationKind::Aggregate => {
				self.order_by(&mut asm);
				self.window(&mut asm);
				for (clause, agg) in capability.clauses() {
					let input = asm.object(&format!("{agg}AggregateInput"));
					let expr = if clause == "_count" {
						Expr::union(vec![Expr::Scalar(Scalar::True), input])
					} else {
						input
					};
					asm.field(clause, expr.optional());
				}
			}
			OperationKind::GroupBy => {
				let filter = asm.object("WhereInput").optional();
				asm.field("where", filter);
				let order = asm.object("OrderByWithAggregationInput");
				asm.field("orderBy", Expr::union(vec![order.clone(), order.list()]).optional());
				let having = asm.object("ScalarWhereWithAggregatesInput").optional();
				asm.field("having", having);
				asm.number("take");
				asm.number("skip");
				let by = asm.scalar_field_enum().list();
				asm.field("by", by);
			}
		}

		asm
	}

	/// `select` and, for models with relations, `include`.
	fn projection(&self, asm: &mut Assembly<'_>, model: &Model, deferred: bool) {
		let defer = |expr: Expr| if deferred { expr.deferred() } else { expr };

		if self.config.generate_select {
			let select = asm.object("Select").optional();
			asm.field("select", defer(select));
		}

		if self.config.generate_include && model.has_relation() {
			let include = asm.object("Include").optional();
			asm.field("include", defer(include));
		}
	}

	fn order_by(&self, asm: &mut Assembly<'_>) {
		let suffix = if self.config.full_text_search() {
			"OrderByWithRelationAndSearchRelevanceInput"
		} else {
			"OrderByWithRelationInput"
		};

		let order = asm.object(suffix);
		asm.field("orderBy", Expr::union(vec![order.clone(), order.list()]).optional());
	}

	/// `where`, `cursor`, `take`, `skip`.
	fn window(&self, asm: &mut Assembly<'_>) {
		let filter = asm.object("WhereInput").optional();
		asm.field("where", filter);
		let cursor = asm.object("WhereUniqueInput").optional();
		asm.field("cursor", cursor);
		asm.number("take");
		asm.number("skip");
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		config::{Provider, FULL_TEXT_SEARCH},
		dmmf::{FieldKind, ModelField},
		input::InputTypeDescriptor,
	};

	fn datamodel() -> Datamodel {
		let field = |name: &str, kind, type_name: &str| ModelField {
			name: name.into(),
			kind,
			is_list: false,
			is_required: true,
			type_name: type_name.into(),
		};

		Datamodel {
			models: vec![
				Model {
					name: "User".into(),
					fields: vec![
						field("id", FieldKind::Scalar, "Int"),
						field("posts", FieldKind::Object, "Post"),
					],
				},
				Model {
					name: "Tag".into(),
					fields: vec![field("id", FieldKind::Scalar, "Int")],
				},
			],
		}
	}

	fn mapping(model: &str) -> ModelMapping {
		ModelMapping {
			model: model.into(),
			find_unique: Some(format!("findUnique{model}")),
			find_many: Some(format!("findMany{model}")),
			create_many: Some(format!("createMany{model}")),
			aggregate: Some(format!("aggregate{model}")),
			group_by: Some(format!("groupBy{model}")),
			..Default::default()
		}
	}

	fn assemble(config: &GeneratorConfig, capabilities: &AggregateCapabilities, model: &str) -> Vec<EmittedSchema> {
		let datamodel = datamodel();
		OperationAssembler::new(config, &datamodel, capabilities)
			.assemble(&mapping(model))
			.unwrap()
	}

	fn find<'a>(schemas: &'a [EmittedSchema], stem: &str) -> &'a EmittedSchema {
		schemas.iter().find(|s| s.stem == stem).unwrap()
	}

	#[test]
	fn one_schema_per_enabled_operation() {
		let schemas = assemble(&GeneratorConfig::default(), &AggregateCapabilities::default(), "User");

		assert_eq!(
			schemas.iter().map(|s| s.export_name.as_str()).collect::<Vec<_>>(),
			[
				"UserFindUniqueSchema",
				"UserFindManySchema",
				"UserCreateManySchema",
				"UserAggregateSchema",
				"UserGroupBySchema",
			]
		);
		assert_eq!(
			find(&schemas, "findUniqueUser").body.to_string(),
			"z.object({ where: UserWhereUniqueInputObjectSchema })"
		);
	}

	#[test]
	fn aggregate_emits_supported_clauses_in_order() {
		let descriptors = ["UserMaxAggregateInput", "UserCountAggregateInput"]
			.map(|name| InputTypeDescriptor::new(name, vec![]));
		let capabilities = AggregateCapabilities::from_descriptors(&descriptors);

		let schemas = assemble(&GeneratorConfig::default(), &capabilities, "User");
		let aggregate = find(&schemas, "aggregateUser").body.to_string();

		assert!(aggregate.ends_with(
			"skip: z.number().optional(), _count: z.union([z.literal(true), UserCountAggregateInputObjectSchema]).optional(), _max: UserMaxAggregateInputObjectSchema.optional() })"
		));
		assert!(!aggregate.contains("_min"));
		assert!(!aggregate.contains("_sum"));
	}

	#[test]
	fn skip_duplicates_depends_on_provider() {
		let capabilities = AggregateCapabilities::default();

		for (provider, expected) in [
			(Provider::Mongodb, false),
			(Provider::Sqlserver, false),
			(Provider::Postgresql, true),
			(Provider::Sqlite, true),
		] {
			let config = GeneratorConfig {
				provider,
				..Default::default()
			};
			let schemas = assemble(&config, &capabilities, "User");
			let create_many = find(&schemas, "createManyUser").body.to_string();

			assert_eq!(create_many.contains("skipDuplicates"), expected, "{create_many}");
		}
	}

	#[test]
	fn select_and_include_are_deferred_in_find_many_only() {
		let config = GeneratorConfig {
			generate_select: true,
			generate_include: true,
			..Default::default()
		};
		let schemas = assemble(&config, &AggregateCapabilities::default(), "User");

		let find_many = find(&schemas, "findManyUser").body.to_string();
		assert!(find_many.starts_with(
			"z.object({ select: z.lazy(() => UserSelectObjectSchema.optional()), include: z.lazy(() => UserIncludeObjectSchema.optional()), orderBy:"
		));

		let find_unique = find(&schemas, "findUniqueUser").body.to_string();
		assert!(find_unique.starts_with(
			"z.object({ select: UserSelectObjectSchema.optional(), include: UserIncludeObjectSchema.optional(),"
		));
	}

	#[test]
	fn include_needs_a_relation() {
		let config = GeneratorConfig {
			generate_include: true,
			..Default::default()
		};
		let schemas = assemble(&config, &AggregateCapabilities::default(), "Tag");

		assert!(!find(&schemas, "findUniqueTag").imports.contains("TagIncludeObjectSchema"));
	}

	#[test]
	fn search_relevance_ordering_needs_full_text_search() {
		let mut config = GeneratorConfig {
			provider: Provider::Postgresql,
			..Default::default()
		};
		let schemas = assemble(&config, &AggregateCapabilities::default(), "Tag");
		assert!(find(&schemas, "findManyTag")
			.imports
			.contains("TagOrderByWithRelationInputObjectSchema"));

		config.preview_features.insert(FULL_TEXT_SEARCH.to_string());
		let schemas = assemble(&config, &AggregateCapabilities::default(), "Tag");
		let find_many = find(&schemas, "findManyTag");
		assert!(find_many
			.imports
			.contains("TagOrderByWithRelationAndSearchRelevanceInputObjectSchema"));
		assert!(find_many.body.to_string().contains(
			"orderBy: z.union([TagOrderByWithRelationAndSearchRelevanceInputObjectSchema, TagOrderByWithRelationAndSearchRelevanceInputObjectSchema.array()]).optional()"
		));
	}

	#[test]
	fn group_by_requires_by() {
		let schemas = assemble(&GeneratorConfig::default(), &AggregateCapabilities::default(), "Tag");
		let group_by = find(&schemas, "groupByTag");

		assert!(group_by
			.body
			.to_string()
			.ends_with("by: TagScalarFieldEnumSchema.array() })"));
		assert_eq!(
			group_by.imports.iter().last().unwrap().module_path(ArtifactCategory::Operation),
			"./enums/TagScalarFieldEnum.schema"
		);
	}

	#[test]
	fn unknown_models_are_fatal() {
		let datamodel = datamodel();
		let config = GeneratorConfig::default();
		let capabilities = AggregateCapabilities::default();
		let assembler = OperationAssembler::new(&config, &datamodel, &capabilities);

		assert!(matches!(
			assembler.assemble(&mapping("Ghost")),
			Err(Error::UnknownModel(model)) if model == "Ghost"
		));

		let idle = ModelMapping {
			model: "Ghost".into(),
			..Default::default()
		};
		assert!(assembler.assemble(&idle).unwrap().is_empty());
	}
}
