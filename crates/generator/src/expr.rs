//! Structured Zod expressions.
//!
//! Every piece of generated validator code is built as an [`Expr`] tree and
//! turned into text by its [`Display`](fmt::Display) impl, the only place that
//! knows Zod syntax. `{:#}` renders top-level objects one field per line.

use std::fmt;

use itertools::Itertools;

use crate::input::ScalarKind;

/// Name of the shared recursive JSON validator declared in files that need it.
pub const JSON_SCHEMA: &str = "jsonSchema";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scalar {
	String,
	Number,
	BigInt,
	Boolean,
	Date,
	Json,
	True,
	Buffer,
}

impl From<ScalarKind> for Scalar {
	fn from(kind: ScalarKind) -> Self {
		match kind {
			ScalarKind::String => Self::String,
			ScalarKind::Int | ScalarKind::Float | ScalarKind::Decimal => Self::Number,
			ScalarKind::BigInt => Self::BigInt,
			ScalarKind::Boolean => Self::Boolean,
			ScalarKind::DateTime => Self::Date,
			ScalarKind::Json => Self::Json,
			ScalarKind::True => Self::True,
			ScalarKind::Bytes => Self::Buffer,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
	Scalar(Scalar),
	/// Eager reference to another schema identifier.
	Ref(String),
	/// `z.lazy(() => ..)`, resolved only when the validator first runs.
	Deferred(Box<Expr>),
	List(Box<Expr>),
	Optional(Box<Expr>),
	Nullable(Box<Expr>),
	/// `inner as z.ZodType<Prisma.target>`
	Cast {
		inner: Box<Expr>,
		target: String,
	},
	Union(Vec<Expr>),
	Object(Vec<(String, Expr)>),
	Strict(Box<Expr>),
	Enum(Vec<String>),
}

impl Expr {
	pub fn reference(ident: impl Into<String>) -> Self {
		Self::Ref(ident.into())
	}

	pub fn deferred(self) -> Self {
		Self::Deferred(Box::new(self))
	}

	pub fn list(self) -> Self {
		Self::List(Box::new(self))
	}

	/// Marks the expression optional unless it already is.
	pub fn optional(self) -> Self {
		match self {
			Self::Optional(_) => self,
			other => Self::Optional(Box::new(other)),
		}
	}

	/// Marks the expression nullable unless it already is.
	pub fn nullable(self) -> Self {
		match self {
			Self::Nullable(_) => self,
			other => Self::Nullable(Box::new(other)),
		}
	}

	pub fn cast(self, target: impl Into<String>) -> Self {
		Self::Cast {
			inner: Box::new(self),
			target: target.into(),
		}
	}

	pub fn strict(self) -> Self {
		Self::Strict(Box::new(self))
	}

	pub fn union(alternatives: Vec<Self>) -> Self {
		Self::Union(alternatives)
	}

	pub fn object(fields: impl IntoIterator<Item = (impl Into<String>, Self)>) -> Self {
		Self::Object(
			fields
				.into_iter()
				.map(|(name, expr)| (name.into(), expr))
				.collect(),
		)
	}

	/// Whether the value accepted is an array, looking through modifiers and
	/// casts.
	pub fn is_list(&self) -> bool {
		match self {
			Self::List(_) => true,
			Self::Optional(inner) | Self::Nullable(inner) | Self::Cast { inner, .. } => {
				inner.is_list()
			}
			_ => false,
		}
	}

	/// Drops an outermost `.optional()`.
	pub fn strip_optional(self) -> Self {
		match self {
			Self::Optional(inner) => *inner,
			other => other,
		}
	}

	/// Drops every `.nullable()` in the modifier chain, including one sitting
	/// under a cast.
	pub fn strip_nullable(self) -> Self {
		match self {
			Self::Nullable(inner) => inner.strip_nullable(),
			Self::Optional(inner) => Self::Optional(Box::new(inner.strip_nullable())),
			Self::Cast { inner, target } => Self::Cast {
				inner: Box::new(inner.strip_nullable()),
				target,
			},
			other => other,
		}
	}

	pub fn is_nullable(&self) -> bool {
		match self {
			Self::Nullable(_) => true,
			Self::Optional(inner) | Self::Cast { inner, .. } => inner.is_nullable(),
			_ => false,
		}
	}

	/// Receiver of a `.method()` call; casts bind looser than member access.
	fn fmt_receiver(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Cast { .. } => write!(f, "({self})"),
			_ if f.alternate() => write!(f, "{self:#}"),
			_ => write!(f, "{self}"),
		}
	}
}

impl fmt::Display for Scalar {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::String => "z.string()",
			Self::Number => "z.number()",
			Self::BigInt => "z.bigint()",
			Self::Boolean => "z.boolean()",
			Self::Date => "z.coerce.date()",
			Self::Json => JSON_SCHEMA,
			Self::True => "z.literal(true)",
			Self::Buffer => "z.instanceof(Buffer)",
		})
	}
}

impl fmt::Display for Expr {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Scalar(scalar) => write!(f, "{scalar}"),
			Self::Ref(ident) => f.write_str(ident),
			Self::Deferred(inner) => write!(f, "z.lazy(() => {inner})"),
			Self::List(inner) => {
				inner.fmt_receiver(f)?;
				f.write_str(".array()")
			}
			Self::Optional(inner) => {
				inner.fmt_receiver(f)?;
				f.write_str(".optional()")
			}
			Self::Nullable(inner) => {
				inner.fmt_receiver(f)?;
				f.write_str(".nullable()")
			}
			Self::Strict(inner) => {
				inner.fmt_receiver(f)?;
				f.write_str(".strict()")
			}
			Self::Cast { inner, target } => write!(f, "{inner} as z.ZodType<Prisma.{target}>"),
			Self::Union(alternatives) => {
				write!(f, "z.union([{}])", alternatives.iter().join(", "))
			}
			Self::Object(fields) if fields.is_empty() => f.write_str("z.object({})"),
			Self::Object(fields) if f.alternate() => {
				f.write_str("z.object({\n")?;
				for (name, expr) in fields {
					writeln!(f, "  {name}: {expr},")?;
				}
				f.write_str("})")
			}
			Self::Object(fields) => write!(
				f,
				"z.object({{ {} }})",
				fields
					.iter()
					.format_with(", ", |(name, expr), g| g(&format_args!("{name}: {expr}")))
			),
			Self::Enum(values) => write!(
				f,
				"z.enum([{}])",
				values
					.iter()
					.map(|v| serde_json::Value::from(v.as_str()))
					.join(", ")
			),
		}
	}
}
