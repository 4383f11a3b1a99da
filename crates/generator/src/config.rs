//! Run configuration.
//!
//! [`GeneratorSettings`] is what users write (a JSON file, CLI flags or the
//! Prisma generator block). [`GeneratorConfig`] is the frozen value derived
//! from it and the DMMF once per run and handed to every resolution step.

use std::{
	collections::{BTreeSet, HashMap, HashSet},
	fmt,
	path::{Component, Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{dmmf::Document, naming};

pub const DEFAULT_PRISMA_CLIENT: &str = "@prisma/client";
pub const FULL_TEXT_SEARCH: &str = "fullTextSearch";

/// Datasource provider tag.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Provider {
	#[default]
	Postgresql,
	Mysql,
	Sqlite,
	Sqlserver,
	Mongodb,
	Cockroachdb,
	Other(String),
}

impl Provider {
	pub fn as_str(&self) -> &str {
		match self {
			Self::Postgresql => "postgresql",
			Self::Mysql => "mysql",
			Self::Sqlite => "sqlite",
			Self::Sqlserver => "sqlserver",
			Self::Mongodb => "mongodb",
			Self::Cockroachdb => "cockroachdb",
			Self::Other(other) => other,
		}
	}

	/// Whether `createMany` accepts `skipDuplicates`.
	pub fn supports_skip_duplicates(&self) -> bool {
		!matches!(self, Self::Mongodb | Self::Sqlserver)
	}

	pub fn supports_full_text_search(&self) -> bool {
		matches!(self, Self::Postgresql | Self::Mysql)
	}
}

impl From<&str> for Provider {
	fn from(tag: &str) -> Self {
		match tag {
			"postgresql" | "postgres" => Self::Postgresql,
			"mysql" => Self::Mysql,
			"sqlite" => Self::Sqlite,
			"sqlserver" => Self::Sqlserver,
			"mongodb" => Self::Mongodb,
			"cockroachdb" => Self::Cockroachdb,
			other => Self::Other(other.to_string()),
		}
	}
}

impl fmt::Display for Provider {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl Serialize for Provider {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(self.as_str())
	}
}

impl<'de> Deserialize<'de> for Provider {
	fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		String::deserialize(deserializer).map(|tag| Self::from(tag.as_str()))
	}
}

/// User-facing generator options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorSettings {
	pub provider: Provider,
	pub preview_features: BTreeSet<String>,
	/// Offer `select` on operation schemas.
	pub is_generate_select: bool,
	/// Offer `include` on operation schemas of models with relations.
	pub is_generate_include: bool,
	/// Custom output directory of the Prisma client, if it is not imported
	/// from `@prisma/client`.
	pub prisma_client_output: Option<PathBuf>,
}

impl GeneratorSettings {
	pub fn load(path: impl AsRef<Path>) -> Result<Self, crate::Error> {
		let path = path.as_ref();
		let json = std::fs::read_to_string(path).map_err(|e| {
			crate::FileIOError::from_std_io_err_with_msg(path, e, "reading generator settings")
		})?;

		Ok(serde_json::from_str(&json)?)
	}

	/// Reads the string-valued `config` block of a Prisma generator. Unknown
	/// keys are ignored.
	pub fn apply_generator_block<'a>(
		&mut self,
		config: impl IntoIterator<Item = (&'a str, &'a str)>,
	) {
		for (key, value) in config {
			match key {
				"isGenerateSelect" => self.is_generate_select = value == "true",
				"isGenerateInclude" => self.is_generate_include = value == "true",
				_ => {}
			}
		}
	}
}

/// Frozen per-run configuration.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
	pub provider: Provider,
	pub preview_features: BTreeSet<String>,
	pub generate_select: bool,
	pub generate_include: bool,
	/// Module specifier used by `import type { Prisma } from '..'`.
	pub prisma_client_import: String,
	pub enum_names: HashSet<String>,
	/// `find<Model>Raw` / `aggregate<Model>Raw` → `<Model>FindRawArgs` / ..
	pub raw_ops: HashMap<String, String>,
}

impl GeneratorConfig {
	pub fn new(settings: &GeneratorSettings, document: &Document, output: &Path) -> Self {
		let prisma_client_import = match &settings.prisma_client_output {
			Some(client) if client.as_os_str() != DEFAULT_PRISMA_CLIENT => {
				relative_import(&output.join("schemas").join("objects"), client)
			}
			_ => DEFAULT_PRISMA_CLIENT.to_string(),
		};

		Self {
			provider: settings.provider.clone(),
			preview_features: settings.preview_features.clone(),
			generate_select: settings.is_generate_select,
			generate_include: settings.is_generate_include,
			prisma_client_import,
			enum_names: document.enum_types().map(|e| e.name.clone()).collect(),
			raw_ops: naming::raw_ops_map(&document.mappings.model_operations),
		}
	}

	pub fn full_text_search(&self) -> bool {
		self.provider.supports_full_text_search() && self.preview_features.contains(FULL_TEXT_SEARCH)
	}

	pub fn is_enum(&self, name: &str) -> bool {
		self.enum_names.contains(name)
	}
}

impl Default for GeneratorConfig {
	fn default() -> Self {
		Self {
			provider: Provider::default(),
			preview_features: BTreeSet::new(),
			generate_select: false,
			generate_include: false,
			prisma_client_import: DEFAULT_PRISMA_CLIENT.to_string(),
			enum_names: HashSet::new(),
			raw_ops: HashMap::new(),
		}
	}
}

/// Relative module path from directory `from` to `to`, always `/` separated.
fn relative_import(from: &Path, to: &Path) -> String {
	let absolute = |p: &Path| std::path::absolute(p).unwrap_or_else(|_| p.to_path_buf());
	let (from, to) = (absolute(from), absolute(to));

	let from = normalize(&from);
	let to = normalize(&to);

	let common = from
		.iter()
		.zip(to.iter())
		.take_while(|(a, b)| a == b)
		.count();

	let ups = std::iter::repeat("..").take(from.len() - common);
	let downs = to[common..].iter().map(String::as_str);

	let relative = ups.chain(downs).collect::<Vec<_>>().join("/");

	if relative.is_empty() {
		".".to_string()
	} else if relative.starts_with("..") {
		relative
	} else {
		format!("./{relative}")
	}
}

fn normalize(path: &Path) -> Vec<String> {
	let mut parts = Vec::new();
	for component in path.components() {
		match component {
			Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
			Component::ParentDir => {
				parts.pop();
			}
			Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
		}
	}
	parts
}
