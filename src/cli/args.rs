// ABOUTME: Command line argument definitions and parsing using Clap
// ABOUTME: Defines the main CLI structure and subcommands for view-interpolate

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "view-interpolate")]
#[command(about = "Render and watch {{placeholder}} templates bound to a tree of view state")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Path to configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Disable colored output")]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interpolate a template once against a view of a scene
    Render {
        #[arg(help = "Path to scene YAML file")]
        scene: PathBuf,

        #[arg(long, help = "Name of the view to interpolate against")]
        view: String,

        #[arg(short, long, help = "Template to interpolate")]
        template: String,

        #[arg(
            short = 'S',
            long = "set",
            help = "Override state of the view before rendering (key=value)"
        )]
        sets: Vec<String>,
    },

    /// Bind every scene template and play the scene's updates
    Watch {
        #[arg(help = "Path to scene YAML file")]
        scene: PathBuf,
    },

    /// Validate a scene without playing updates
    Validate {
        #[arg(help = "Path to scene YAML file")]
        scene: PathBuf,

        #[arg(long, help = "Treat warnings as errors")]
        strict: bool,
    },

    /// Write a starter scene file
    Init {
        #[arg(help = "Name of the new scene")]
        name: String,

        #[arg(
            short,
            long,
            default_value = ".",
            help = "Directory to write the scene file into"
        )]
        output_dir: PathBuf,
    },
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parse state overrides from key=value format.
    ///
    /// Values are read as JSON when possible and as plain strings otherwise.
    pub fn parse_assignments(sets: &[String]) -> anyhow::Result<Vec<(String, serde_json::Value)>> {
        let mut assignments = Vec::new();

        for set in sets {
            if let Some((key, value)) = set.split_once('=') {
                let value = serde_json::from_str(value)
                    .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
                assignments.push((key.to_string(), value));
            } else {
                return Err(anyhow::anyhow!(
                    "Invalid assignment format '{}'. Expected 'key=value'",
                    set
                ));
            }
        }

        Ok(assignments)
    }
}
