use clap::{Parser, Subcommand};
use itertools::Itertools;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use yoshiki::prelude::*;
use yoshiki::session::explain_visibility;

/// Render schema-driven forms and inspect their visibility rules
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a schema file against an optional answers file
    Render {
        /// Path to the form schema JSON file
        schema_path: PathBuf,
        /// Optional path to a JSON object of answers
        answers_path: Option<String>,

        /// Print the render instructions as JSON instead of a tree
        #[arg(long)]
        json: bool,

        /// Print how every visibility rule was evaluated
        #[arg(long)]
        explain: bool,
    },
    /// Fetch the schema from the form service and render it unanswered
    FetchSchema {
        /// Path to an engine config JSON file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Overrides the base URL of the config
        #[arg(long)]
        base_url: Option<String>,

        /// Print the render instructions as JSON instead of a tree
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Render {
            schema_path,
            answers_path,
            json,
            explain,
        } => run_render(schema_path, answers_path, json, explain),
        Command::FetchSchema {
            config,
            base_url,
            json,
        } => run_fetch_schema(config, base_url, json),
    }
}

fn run_render(schema_path: PathBuf, answers_path: Option<String>, json: bool, explain: bool) {
    let start = Instant::now();

    let forms = load_forms(&schema_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to load schema '{}': {}",
            schema_path.display(),
            e
        ))
    });

    let answers = match answers_path {
        Some(path) => Answers::from_file(&path).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to load answers from '{}': {}", path, e))
        }),
        None => Answers::new(),
    };

    let mut session = FormSession::new(forms);
    for (field_id, value) in answers.iter().sorted_by_key(|(field_id, _)| *field_id) {
        // Fetches are not run here; dependent fields show the placeholder only.
        if let Err(e) = session.set_answer(field_id, value) {
            exit_with_error(&format!("Invalid answer for '{}': {}", field_id, e));
        }
    }

    print_instructions(&session.render(), json);

    if explain {
        println!("\n--- Visibility ---");
        for (field_id, trace) in explain_visibility(&session) {
            let verdict = if trace.outcome { "shown" } else { "hidden" };
            println!("{:<24} {:<7} {}", field_id, verdict, trace);
        }
    }

    if !json {
        println!("\nRendered in {:?}", start.elapsed());
    }
}

fn run_fetch_schema(config_path: Option<PathBuf>, base_url: Option<String>, json: bool) {
    let mut config = match config_path {
        Some(path) => EngineConfig::from_file(&path).unwrap_or_else(|e| {
            exit_with_error(&format!(
                "Failed to load config '{}': {}",
                path.display(),
                e
            ))
        }),
        None => EngineConfig::default(),
    };
    if let Some(url) = base_url {
        config.base_url = url;
    }
    if let Err(e) = config.validate() {
        exit_with_error(&e.to_string());
    }

    let runtime = tokio::runtime::Runtime::new()
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to start async runtime: {}", e)));

    let instructions = runtime.block_on(async {
        let mut controller = FormController::with_config(&config)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to build HTTP client: {}", e)));
        if let Err(e) = controller.load().await {
            exit_with_error(&e.to_string());
        }
        controller
            .render()
            .unwrap_or_else(|e| exit_with_error(&e.to_string()))
    });

    print_instructions(&instructions, json);
}

fn print_instructions(instructions: &[RenderInstruction], json: bool) {
    if json {
        let output = serde_json::to_string_pretty(instructions)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize output: {}", e)));
        println!("{}", output);
    } else {
        print!("{}", RenderTree::new(instructions));
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
