//! The Prisma generator protocol.
//!
//! Prisma spawns the generator and exchanges newline-delimited JSON-RPC
//! messages with it: requests arrive on stdin, responses go to stderr.

use std::{collections::HashMap, path::PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::{dmmf::Document, output, Generator, GeneratorSettings, Provider, Result};

const PRISMA_CLIENT_JS: &str = "prisma-client-js";

const SERVER_ERROR: i32 = -32000;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;

/// A value Prisma may take from the environment (`env("..")` in the schema).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvValue {
	pub value: Option<String>,
	pub from_env_var: Option<String>,
}

impl EnvValue {
	pub fn resolve(&self) -> Option<String> {
		self.value.clone().or_else(|| {
			self.from_env_var
				.as_deref()
				.and_then(|var| std::env::var(var).ok())
		})
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorBlock {
	pub name: String,
	pub provider: EnvValue,
	pub output: Option<EnvValue>,
	/// Values are strings, or string lists for repeated keys.
	#[serde(default)]
	pub config: HashMap<String, Value>,
	#[serde(default)]
	pub preview_features: Vec<String>,
	#[serde(default)]
	pub is_custom_output: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Datasource {
	pub provider: Option<String>,
	pub active_provider: Option<String>,
}

impl Datasource {
	/// `activeProvider` when Prisma sent it, the declared provider otherwise.
	pub fn provider(&self) -> Option<&str> {
		self.active_provider
			.as_deref()
			.or(self.provider.as_deref())
	}
}

/// Parameters of a `generate` request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorOptions {
	pub generator: GeneratorBlock,
	#[serde(default)]
	pub other_generators: Vec<GeneratorBlock>,
	pub dmmf: Document,
	#[serde(default)]
	pub datasources: Vec<Datasource>,
}

impl GeneratorOptions {
	fn generator_by_provider(&self, provider: &str) -> Option<&GeneratorBlock> {
		self.other_generators
			.iter()
			.find(|g| g.provider.resolve().as_deref() == Some(provider))
	}

	/// Settings from the datasource, the Prisma client generator and this
	/// generator's `config` block.
	pub fn settings(&self) -> GeneratorSettings {
		let mut settings = GeneratorSettings::default();

		if let Some(provider) = self.datasources.first().and_then(Datasource::provider) {
			settings.provider = Provider::from(provider);
		}

		if let Some(client) = self.generator_by_provider(PRISMA_CLIENT_JS) {
			settings.preview_features = client.preview_features.iter().cloned().collect();
			if client.is_custom_output {
				settings.prisma_client_output = client
					.output
					.as_ref()
					.and_then(EnvValue::resolve)
					.map(PathBuf::from);
			}
		}

		settings.apply_generator_block(
			self.generator
				.config
				.iter()
				.filter_map(|(key, value)| value.as_str().map(|value| (key.as_str(), value))),
		);

		settings
	}
}

#[async_trait]
pub trait PrismaGenerator: Send + Sync {
	const NAME: &'static str;
	const DEFAULT_OUTPUT: &'static str;
	const REQUIRES_GENERATORS: &'static [&'static str] = &[PRISMA_CLIENT_JS];

	type Error: std::error::Error + Send;

	async fn generate(&self, options: GeneratorOptions) -> Result<(), Self::Error>;

	fn manifest() -> Value {
		json!({
			"manifest": {
				"prettyName": Self::NAME,
				"defaultOutput": Self::DEFAULT_OUTPUT,
				"requiresGenerators": Self::REQUIRES_GENERATORS,
			}
		})
	}
}

#[derive(Debug, Deserialize)]
struct Request {
	id: Value,
	method: String,
	#[serde(default)]
	params: Value,
}

#[derive(Debug, Serialize)]
struct RpcError {
	code: i32,
	message: String,
}

#[derive(Debug, Serialize)]
struct Response {
	jsonrpc: &'static str,
	id: Value,
	#[serde(skip_serializing_if = "Option::is_none")]
	result: Option<Value>,
	#[serde(skip_serializing_if = "Option::is_none")]
	error: Option<RpcError>,
}

impl Response {
	fn result(id: Value, result: Value) -> Self {
		Self {
			jsonrpc: "2.0",
			id,
			result: Some(result),
			error: None,
		}
	}

	fn error(id: Value, code: i32, message: impl Into<String>) -> Self {
		Self {
			jsonrpc: "2.0",
			id,
			result: None,
			error: Some(RpcError {
				code,
				message: message.into(),
			}),
		}
	}
}

async fn handle<G: PrismaGenerator>(generator: &G, request: Request) -> Response {
	match request.method.as_str() {
		"getManifest" => Response::result(request.id, G::manifest()),
		"generate" => {
			let options = match serde_json::from_value::<GeneratorOptions>(request.params) {
				Ok(options) => options,
				Err(e) => {
					error!(?e, "invalid generate parameters");
					return Response::error(request.id, INVALID_PARAMS, e.to_string());
				}
			};

			match generator.generate(options).await {
				Ok(()) => Response::result(request.id, Value::Null),
				Err(e) => {
					error!(%e, "generation failed");
					Response::error(request.id, SERVER_ERROR, e.to_string())
				}
			}
		}
		method => {
			warn!(method, "unknown generator method");
			Response::error(request.id, METHOD_NOT_FOUND, format!("unknown method `{method}`"))
		}
	}
}

/// Answers requests from `input` on `output` until `input` closes.
pub async fn serve<G, R, W>(generator: &G, input: R, mut output: W) -> Result<()>
where
	G: PrismaGenerator,
	R: AsyncBufRead + Unpin,
	W: AsyncWrite + Unpin,
{
	let mut lines = input.lines();

	while let Some(line) = lines.next_line().await? {
		if line.trim().is_empty() {
			continue;
		}

		let request = match serde_json::from_str::<Request>(&line) {
			Ok(request) => request,
			Err(e) => {
				warn!(?e, "skipping malformed generator request");
				continue;
			}
		};

		debug!(method = %request.method, "generator request");
		let response = handle(generator, request).await;

		let mut message = serde_json::to_vec(&response)?;
		message.push(b'\n');
		output.write_all(&message).await?;
		output.flush().await?;
	}

	Ok(())
}

/// Runs `generator` over the process' stdin and stderr.
pub async fn run<G: PrismaGenerator>(generator: &G) -> Result<()> {
	serve(generator, BufReader::new(tokio::io::stdin()), tokio::io::stderr()).await
}

/// The Zod schema generator.
pub struct ZodGenerator;

#[async_trait]
impl PrismaGenerator for ZodGenerator {
	const NAME: &'static str = "Prisma Zod Generator";
	const DEFAULT_OUTPUT: &'static str = "./generated";

	type Error = crate::Error;

	async fn generate(&self, options: GeneratorOptions) -> Result<(), Self::Error> {
		let settings = options.settings();
		let out_dir = options
			.generator
			.output
			.as_ref()
			.and_then(EnvValue::resolve)
			.map_or_else(|| PathBuf::from(Self::DEFAULT_OUTPUT), PathBuf::from);

		info!(output = %out_dir.display(), provider = %settings.provider, "generating zod schemas");

		output::prepare_output_dir(&out_dir).await?;

		let schemas = Generator::new(options.dmmf, &settings, &out_dir).generate()?;
		output::write_schemas(&out_dir, &schemas).await?;

		Ok(())
	}
}
