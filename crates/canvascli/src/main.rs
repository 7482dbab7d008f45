use anyhow::{bail, Context, Result};
use canvascore::{CanvasEvent, Identity, ImageFormat, Payload, TaskEvent, TaskPhase};
use canvasruntime::{Workspace, WorkspaceConfig, ALL_CATEGORIES};
use canvastools::{builtin_registry, HttpToolClient, HttpWorkflowStore};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "canvas")]
#[command(about = "Neural Canvas CLI", long_about = None)]
struct Cli {
    /// Path to a workspace config JSON file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Base URL of the tool and workflow service
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available tools
    Tools {
        /// Only show tools in this category
        #[arg(long, default_value = ALL_CATEGORIES)]
        category: String,
    },

    /// Run one tool on some input
    Run {
        /// Tool id, e.g. summarizer
        #[arg(short, long)]
        tool: String,

        /// Input text for the tool
        #[arg(short, long)]
        input: String,

        /// Write the result to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Save a workflow made of the given tools
    Save {
        /// Owner of the workflow
        #[arg(short, long)]
        user: String,

        /// Workflow name
        #[arg(short, long)]
        name: Option<String>,

        /// Tool id for each node, in order
        #[arg(short, long = "tool", required = true)]
        tools: Vec<String>,
    },

    /// List saved workflows of a user
    History {
        #[arg(short, long)]
        user: String,
    },

    /// Print the nodes and wires of a saved workflow
    Show {
        /// Workflow id
        #[arg(long)]
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let config = load_config(cli.config.as_deref(), cli.api_url)?;

    match cli.command {
        Commands::Tools { category } => list_tools(&category)?,
        Commands::Run {
            tool,
            input,
            output,
        } => run_tool(config, &tool, &input, output.as_deref()).await?,
        Commands::Save { user, name, tools } => save_workflow(config, &user, name, &tools).await?,
        Commands::History { user } => show_history(config, &user).await?,
        Commands::Show { id } => show_workflow(config, &id).await?,
    }

    Ok(())
}

fn load_config(path: Option<&Path>, api_url: Option<String>) -> Result<WorkspaceConfig> {
    let config = WorkspaceConfig::load(path).with_context(|| match path {
        Some(path) => format!("Failed to read config {}", path.display()),
        None => "Failed to load config".to_string(),
    })?;
    Ok(config.with_api_url_override(api_url))
}

fn build_workspace(config: WorkspaceConfig) -> Result<Workspace> {
    let registry = Arc::new(builtin_registry()?);
    let transport = Arc::new(HttpToolClient::new(config.api_base_url.clone()));
    let store = Arc::new(HttpWorkflowStore::new(config.api_base_url.clone()));
    tracing::debug!("Using service at {}", config.api_base_url);

    Ok(Workspace::new(registry, transport, store, config))
}

/// `MM:SS`, as shown on a running image node
fn format_elapsed(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

fn list_tools(category: &str) -> Result<()> {
    let registry = builtin_registry()?;
    let tools = registry.list_by_category(category);
    if tools.is_empty() {
        bail!(
            "No tools in category {} (known: {})",
            category,
            registry.categories().join(", ")
        );
    }

    println!("📦 Available Tools:");
    println!();
    for tool in tools {
        println!("  • {} - {} ({})", tool.id, tool.name, tool.category);
        println!("    {}", tool.description);
    }
    Ok(())
}

async fn run_tool(
    config: WorkspaceConfig,
    tool_id: &str,
    input: &str,
    output: Option<&Path>,
) -> Result<()> {
    let mut workspace = build_workspace(config)?;
    let tool = workspace.registry().lookup(tool_id)?.clone();
    println!("🚀 Running {} ({})", tool.name, tool.endpoint);

    let mut events = workspace.subscribe_events();
    let event_task = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            let CanvasEvent::NodeEvent { event, .. } = event else {
                continue;
            };
            match event {
                TaskEvent::Started { tool_id } => println!("  ⚡ Started {}", tool_id),
                TaskEvent::Progress { elapsed_seconds } => {
                    println!("  ⏳ {}", format_elapsed(elapsed_seconds))
                }
                TaskEvent::Succeeded { duration_ms } => {
                    println!("  ✅ Completed in {}ms", duration_ms)
                }
                TaskEvent::Failed { message, .. } => println!("  ❌ {}", message),
            }
        }
    });

    let node = workspace.add_node(tool_id)?;
    workspace.execute(&node.id, input)?.finished().await;

    // Wait for events to finish printing
    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
    event_task.abort();

    let state = workspace
        .task_state(&node.id)
        .context("Node disappeared while running")?;
    match state.phase {
        TaskPhase::Succeeded => write_payload(&state.payload, output),
        TaskPhase::Failed => bail!("{}", state.payload.as_str().unwrap_or("Error")),
        phase => bail!("Run ended in unexpected phase {:?}", phase),
    }
}

fn write_payload(payload: &Payload, output: Option<&Path>) -> Result<()> {
    println!();
    match (payload, output) {
        (Payload::Empty, _) => println!("(empty result)"),
        (Payload::Text(text), None) => println!("{}", text),
        (Payload::Text(text), Some(path)) => {
            std::fs::write(path, text)?;
            println!("💾 Wrote {} characters to {}", text.chars().count(), path.display());
        }
        (Payload::Binary(bytes), Some(path)) => {
            std::fs::write(path, bytes)?;
            println!(
                "💾 Wrote {} bytes ({}) to {}",
                bytes.len(),
                describe_binary(bytes),
                path.display()
            );
        }
        (Payload::Binary(bytes), None) => {
            println!(
                "📦 Received {} bytes ({}); pass --output to save them",
                bytes.len(),
                describe_binary(bytes)
            );
        }
    }
    Ok(())
}

fn describe_binary(bytes: &[u8]) -> &'static str {
    ImageFormat::sniff(bytes)
        .map(|f| f.mime_type())
        .unwrap_or("audio")
}

async fn save_workflow(
    config: WorkspaceConfig,
    user: &str,
    name: Option<String>,
    tools: &[String],
) -> Result<()> {
    let mut workspace = build_workspace(config)?;
    workspace.set_identity(Some(Identity::signed_in(user)));
    if let Some(name) = name {
        workspace.rename(name);
    }
    for tool in tools {
        workspace.add_node(tool)?;
    }

    workspace.save().await?;

    println!(
        "✨ Saved {} ({}) with {} nodes",
        workspace.name(),
        workspace.workflow_id(),
        workspace.nodes().len()
    );
    println!();
    println!("Show it with:");
    println!("  canvas show --id {}", workspace.workflow_id());
    Ok(())
}

async fn show_history(config: WorkspaceConfig, user: &str) -> Result<()> {
    let mut workspace = build_workspace(config)?;
    workspace.set_identity(Some(Identity::signed_in(user)));

    let workflows = workspace.history().await?;
    if workflows.is_empty() {
        println!("No saved workflows for {}", user);
        return Ok(());
    }

    println!("📚 Workflows for {}:", user);
    for workflow in workflows {
        println!(
            "  • {} ({}) - {}",
            workflow.name,
            workflow.id,
            workflow.created_at.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

async fn show_workflow(config: WorkspaceConfig, workflow_id: &str) -> Result<()> {
    let mut workspace = build_workspace(config)?;
    workspace.load(workflow_id).await?;

    println!("📋 Workflow: {}", workspace.name());
    println!("   Nodes: {}", workspace.nodes().len());
    println!();

    for (node, (_, wire)) in workspace.nodes().iter().zip(workspace.wire_paths()) {
        let tool = workspace.registry().lookup(&node.tool_id)?;
        println!(
            "  • {} {} at ({}, {})",
            node.id, tool.name, node.position.x, node.position.y
        );
        println!("    wire: {}", wire.to_svg_path());
    }
    Ok(())
}
