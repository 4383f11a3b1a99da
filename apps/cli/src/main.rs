use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use pz_generator::{
	dmmf::Document,
	output,
	rpc::{self, PrismaGenerator, ZodGenerator},
	Generator, GeneratorSettings, Provider,
};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(
	name = "prisma-zod-generator",
	about = "Zod schemas for Prisma query arguments",
	version
)]
struct Cli {
	/// Without a subcommand, speaks the Prisma generator protocol on stdin/stderr
	#[command(subcommand)]
	command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// Generate schemas from a DMMF JSON file
	Generate(GenerateArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
	/// DMMF document, as produced by `getDMMF`
	#[arg(long)]
	dmmf: PathBuf,
	/// Output directory, emptied before writing
	#[arg(long, default_value = ZodGenerator::DEFAULT_OUTPUT)]
	output: PathBuf,
	/// JSON file with generator settings; flags override it
	#[arg(long)]
	config: Option<PathBuf>,
	/// Datasource provider (postgresql, mysql, sqlite, sqlserver, mongodb, ..)
	#[arg(long)]
	provider: Option<String>,
	/// Enabled Prisma preview feature, repeatable
	#[arg(long = "preview-feature")]
	preview_features: Vec<String>,
	/// Offer `select` on operation schemas
	#[arg(long)]
	select: bool,
	/// Offer `include` on operation schemas
	#[arg(long)]
	include: bool,
	/// Directory of a Prisma client generated to a custom location
	#[arg(long)]
	prisma_client_output: Option<PathBuf>,
}

impl GenerateArgs {
	fn settings(&self) -> Result<GeneratorSettings> {
		let mut settings = match &self.config {
			Some(path) => GeneratorSettings::load(path)?,
			None => GeneratorSettings::default(),
		};

		if let Some(provider) = &self.provider {
			settings.provider = Provider::from(provider.as_str());
		}
		settings
			.preview_features
			.extend(self.preview_features.iter().cloned());
		settings.is_generate_select |= self.select;
		settings.is_generate_include |= self.include;
		if let Some(client) = &self.prisma_client_output {
			settings.prisma_client_output = Some(client.clone());
		}

		Ok(settings)
	}
}

async fn generate(args: GenerateArgs) -> Result<()> {
	let settings = args.settings()?;

	let json = tokio::fs::read_to_string(&args.dmmf)
		.await
		.with_context(|| format!("failed to read DMMF document {}", args.dmmf.display()))?;
	let document = Document::from_json(&json).context("failed to decode DMMF document")?;

	output::prepare_output_dir(&args.output).await?;

	let schemas = Generator::new(document, &settings, &args.output).generate()?;
	let written = output::write_schemas(&args.output, &schemas).await?;

	info!(files = written.len(), output = %args.output.display(), "done");

	Ok(())
}

fn init_tracing() {
	// stdout stays clean; Prisma reads protocol responses and logs from stderr
	let _ = tracing_subscriber::registry()
		.with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.with(fmt::layer().with_target(false).with_writer(std::io::stderr))
		.try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
	init_tracing();

	let cli = Cli::parse();

	match cli.command {
		Some(Commands::Generate(args)) => generate(args).await,
		None => rpc::run(&ZodGenerator)
			.await
			.context("generator protocol failed"),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use clap::CommandFactory;

	#[test]
	fn cli_is_well_formed() {
		Cli::command().debug_assert();
	}

	#[test]
	fn flags_build_settings() {
		let cli = Cli::parse_from([
			"prisma-zod-generator",
			"generate",
			"--dmmf",
			"dmmf.json",
			"--provider",
			"mongodb",
			"--preview-feature",
			"fullTextSearch",
			"--select",
		]);

		let Some(Commands::Generate(args)) = cli.command else {
			panic!("expected the generate subcommand");
		};
		assert_eq!(args.output, PathBuf::from("./generated"));

		let settings = args.settings().unwrap();
		assert_eq!(settings.provider, Provider::Mongodb);
		assert!(settings.preview_features.contains("fullTextSearch"));
		assert!(settings.is_generate_select);
		assert!(!settings.is_generate_include);
	}

	#[test]
	fn no_subcommand_means_protocol_mode() {
		assert!(Cli::parse_from(["prisma-zod-generator"]).command.is_none());
	}
}
