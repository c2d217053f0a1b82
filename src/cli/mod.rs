use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "hubload")]
#[command(version, about = "A lightweight model-hub loading and resolution layer", long_about = None)]
pub struct Cli {
	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Download a model snapshot from the hub
	Pull {
		/// Model repository identifier (e.g., "damo/nlp-bert-backbone-base")
		identifier: String,

		/// Revision to fetch
		#[arg(long, default_value = "main")]
		revision: String,
	},

	/// Resolve the effective model and preprocessor types without building
	Resolve {
		/// Model repository identifier or local snapshot directory
		identifier: String,

		/// Task to resolve for, overriding the configuration's task field
		#[arg(long)]
		task: Option<String>,

		/// Working mode: "train", "eval" or "inference"
		#[arg(long, default_value = "inference")]
		mode: String,

		/// Revision to fetch when the identifier is remote
		#[arg(long, default_value = "main")]
		revision: String,

		/// Fail instead of downloading when no local snapshot exists
		#[arg(long)]
		prefetched: bool,
	},

	/// List locally indexed snapshots
	List,
}
