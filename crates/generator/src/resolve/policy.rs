use crate::expr::Expr;

/// Field names of nested relation matches (`is`, `isNot`). They are optional,
/// never nullable.
pub const RELATION_FILTER_FIELDS: [&str; 2] = ["is", "isNot"];

/// Field names of scalar filters, which never offer a scalar-vs-list union.
pub const FILTER_FIELDS: [&str; 13] = [
	"in",
	"notIn",
	"equals",
	"not",
	"lt",
	"lte",
	"gt",
	"gte",
	"contains",
	"startsWith",
	"endsWith",
	"mode",
	"path",
];

pub fn is_relation_filter_field(name: &str) -> bool {
	RELATION_FILTER_FIELDS.contains(&name)
}

pub fn is_filter_field(name: &str) -> bool {
	FILTER_FIELDS.contains(&name)
}

/// The single modifier a field's validator ends with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
	None,
	Optional,
	Nullable,
}

impl Modifier {
	pub fn for_field(is_required: bool, is_nullable: bool, relation_filter: bool) -> Self {
		match (is_required, is_nullable) {
			(false, _) if relation_filter => Self::Optional,
			(false, true) => Self::Nullable,
			(false, false) => Self::Optional,
			(true, true) => Self::Nullable,
			(true, false) => Self::None,
		}
	}

	pub fn apply(self, expr: Expr) -> Expr {
		match self {
			Self::None => expr,
			Self::Optional => expr.optional(),
			Self::Nullable => expr.nullable(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn follows_the_modifier_table() {
		let cases = [
			((false, false, true), Modifier::Optional),
			((false, true, true), Modifier::Optional),
			((false, true, false), Modifier::Nullable),
			((false, false, false), Modifier::Optional),
			((true, true, false), Modifier::Nullable),
			((true, false, false), Modifier::None),
		];

		for ((required, nullable, relation_filter), expected) in cases {
			assert_eq!(
				Modifier::for_field(required, nullable, relation_filter),
				expected,
				"required={required} nullable={nullable} relation_filter={relation_filter}"
			);
		}
	}

	#[test]
	fn relation_filter_fields_never_become_nullable() {
		for name in RELATION_FILTER_FIELDS {
			assert!(is_relation_filter_field(name));
			assert_ne!(Modifier::for_field(false, true, true), Modifier::Nullable);
		}
		assert!(!is_relation_filter_field("some"));
	}
}
