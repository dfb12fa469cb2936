mod doctor_cmd;
mod runtime;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;

use vidwatch_core::ToolRegistry;
use vidwatch_tools::VideoQuery;

#[derive(Parser)]
#[command(name = "vidwatch")]
#[command(about = "Ask a vision model questions about stored videos")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.vidwatch/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print the full tool output object as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a question about a video
    Ask {
        /// Name of the video, as listed by `vidwatch list`
        video: String,
        /// Question about the video's visual content
        #[arg(default_value = vidwatch_tools::DEFAULT_QUESTION)]
        question: String,
        /// Override the number of sampled frames
        #[arg(long)]
        max_frames: Option<usize>,
    },
    /// List available videos
    List,
    /// Print the tool descriptor handed to agents
    Descriptor,
    /// Check configuration and ffmpeg availability
    Doctor,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| vidwatch_config::config_file_path(&vidwatch_config::config_dir()));
    let config = vidwatch_config::load_and_prepare(&config_path).await?;

    vidwatch_logging::init_logger(config.logging.level(), config.logging.dir.as_deref());
    debug!(path = %config_path.display(), "Configuration ready");

    match cli.command {
        Commands::Ask {
            video,
            question,
            max_frames,
        } => {
            runtime::ensure_valid(&config)?;
            let mut tool = runtime::build_tool(&config);
            if let Some(n) = max_frames {
                tool = tool.with_max_frames(n);
            }
            let result = tool.analyze(&VideoQuery::new(video, question)).await;
            let succeeded = result.is_success();
            print_output(result.into_output(), cli.json)?;
            if !succeeded {
                std::process::exit(1);
            }
        }
        Commands::List => {
            let tool = runtime::build_tool(&config);
            let videos = tool.list_videos().await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&videos)?);
            } else if videos.is_empty() {
                println!("No videos in {}", config.storage.input_folder().display());
            } else {
                for video in videos {
                    println!("{video}");
                }
            }
        }
        Commands::Descriptor => {
            let mut registry = ToolRegistry::new();
            registry.register(Arc::new(runtime::build_tool(&config)));
            println!("{}", serde_json::to_string_pretty(&registry.descriptors())?);
        }
        Commands::Doctor => {
            if !doctor_cmd::run(&config, &config_path).await? {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn print_output(output: vidwatch_core::ToolOutput, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", output.output);
    }
    Ok(())
}
