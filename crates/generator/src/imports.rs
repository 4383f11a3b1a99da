use std::fmt::Write;

use crate::emit::ArtifactCategory;

/// One schema identifier pulled in from another artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
	pub ident: String,
	pub kind: ArtifactCategory,
	/// File stem of the artifact declaring `ident`.
	pub stem: String,
}

impl Import {
	/// Module specifier of this import as seen from an artifact of category
	/// `from`.
	pub fn module_path(&self, from: ArtifactCategory) -> String {
		let prefix = match (from.dir(), self.kind.dir()) {
			(Some(a), Some(b)) if a == b => "./".to_string(),
			(Some(_), Some(b)) => format!("../{b}/"),
			(Some(_), None) => "../".to_string(),
			(None, Some(b)) => format!("./{b}/"),
			(None, None) => "./".to_string(),
		};

		format!("{prefix}{}.schema", self.stem)
	}
}

/// Insertion-ordered set of imports of one artifact, keyed by identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportTracker {
	entries: Vec<Import>,
}

impl ImportTracker {
	pub fn new() -> Self {
		Self::default()
	}

	/// Records `import` unless an import of the same identifier exists.
	pub fn insert(&mut self, import: Import) -> bool {
		if self.contains(&import.ident) {
			return false;
		}

		self.entries.push(import);
		true
	}

	pub fn contains(&self, ident: &str) -> bool {
		self.entries.iter().any(|i| i.ident == ident)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &Import> {
		self.entries.iter()
	}

	/// One `import` statement per entry, for an artifact of category `from`.
	pub fn render(&self, from: ArtifactCategory) -> String {
		self.entries.iter().fold(String::new(), |mut out, import| {
			let _ = writeln!(
				out,
				"import {{ {} }} from '{}';",
				import.ident,
				import.module_path(from)
			);
			out
		})
	}
}

impl Extend<Import> for ImportTracker {
	fn extend<T: IntoIterator<Item = Import>>(&mut self, iter: T) {
		for import in iter {
			self.insert(import);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn object(name: &str) -> Import {
		Import {
			ident: format!("{name}ObjectSchema"),
			kind: ArtifactCategory::Object,
			stem: name.to_string(),
		}
	}

	#[test]
	fn deduplicates_by_identifier() {
		let mut imports = ImportTracker::new();

		assert!(imports.insert(object("PostWhereInput")));
		assert!(!imports.insert(object("PostWhereInput")));
		assert!(imports.insert(object("IntFilter")));

		assert_eq!(imports.len(), 2);
		assert_eq!(
			imports.iter().map(|i| i.stem.as_str()).collect::<Vec<_>>(),
			["PostWhereInput", "IntFilter"]
		);
	}

	#[test]
	fn routes_paths_by_category() {
		let role = Import {
			ident: "RoleSchema".into(),
			kind: ArtifactCategory::Enum,
			stem: "Role".into(),
		};
		let find_many = Import {
			ident: "PostFindManySchema".into(),
			kind: ArtifactCategory::Operation,
			stem: "findManyPost".into(),
		};
		let filter = object("IntFilter");

		assert_eq!(role.module_path(ArtifactCategory::Object), "../enums/Role.schema");
		assert_eq!(role.module_path(ArtifactCategory::Operation), "./enums/Role.schema");
		assert_eq!(find_many.module_path(ArtifactCategory::Object), "../findManyPost.schema");
		assert_eq!(filter.module_path(ArtifactCategory::Object), "./IntFilter.schema");
		assert_eq!(filter.module_path(ArtifactCategory::Operation), "./objects/IntFilter.schema");
	}

	#[test]
	fn renders_one_statement_per_entry() {
		let mut imports = ImportTracker::new();
		imports.extend([object("A"), object("B"), object("A")]);

		assert_eq!(
			imports.render(ArtifactCategory::Object),
			"import { AObjectSchema } from './A.schema';\nimport { BObjectSchema } from './B.schema';\n"
		);
	}
}
