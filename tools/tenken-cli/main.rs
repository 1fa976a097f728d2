use clap::{Parser, Subcommand};
use serde_json::Value;
use std::fs;
use std::time::Instant;
use tenken::prelude::*;

/// Inspect, preview and check stored inspection procedures
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Optional engine configuration JSON file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rebuild a fetched procedure and print the save payload it produces
    Preview {
        /// Path to a fetch response JSON file
        procedure_path: String,
        /// Organization id for the request (overrides the configuration)
        #[arg(short, long)]
        org: Option<String>,
    },
    /// Print the procedure as an indented tree
    Outline { procedure_path: String },
    /// Show which nodes are visible for a set of answers
    Visible {
        procedure_path: String,
        /// JSON object of answers keyed by field id or field label
        answers_path: String,
        /// Print the verdict of every evaluated condition
        #[arg(short, long)]
        trace: bool,
    },
    /// Check that a fetched procedure loads and satisfies the tree rules
    Validate { procedure_path: String },
}

fn main() {
    env_logger::Builder::from_default_env()
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load configuration: {}", e))),
        None => EngineConfig::default(),
    };

    match cli.command {
        Command::Preview {
            procedure_path,
            org,
        } => {
            if let Some(org) = org {
                config.organization_id = org;
            }
            let procedure = load_procedure(&procedure_path, &config);
            let request = procedure.to_save_request(&config.organization_id);
            let json = serde_json::to_string_pretty(&request)
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to encode payload: {}", e)));
            println!("{}", json);
        }
        Command::Outline { procedure_path } => {
            let procedure = load_procedure(&procedure_path, &config);
            print!("{}", procedure);
        }
        Command::Visible {
            procedure_path,
            answers_path,
            trace,
        } => run_visible(&procedure_path, &answers_path, trace, &config),
        Command::Validate { procedure_path } => {
            let start = Instant::now();
            let procedure = load_procedure(&procedure_path, &config);
            println!(
                "OK: '{}' ({} nodes, {} condition groups) in {:?}",
                procedure.meta.title,
                procedure.len(),
                procedure.condition_count(),
                start.elapsed()
            );
        }
    }
}

fn load_procedure(path: &str, config: &EngineConfig) -> Procedure {
    let json = fs::read_to_string(path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to read procedure file '{}': {}", path, e))
    });
    let response =
        FetchResponse::from_json(&json).unwrap_or_else(|e| exit_with_error(&e.to_string()));
    Procedure::load(response, IdGenerator::new(config.id_strategy))
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load procedure: {}", e)))
}

fn run_visible(procedure_path: &str, answers_path: &str, trace: bool, config: &EngineConfig) {
    let procedure = load_procedure(procedure_path, config);
    let json = fs::read_to_string(answers_path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to read answers file '{}': {}", answers_path, e))
    });
    let raw: serde_json::Map<String, Value> = serde_json::from_str(&json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse answers JSON: {}", e)));

    let mut answers = Answers::new();
    for (key, value) in raw {
        match resolve_field(&procedure, &key) {
            Some(id) => {
                answers.insert(id, value);
            }
            None => log::warn!("ignoring answer for unknown field '{}'", key),
        }
    }

    let report = resolve_visibility(&procedure, &answers);
    for id in &report.visible {
        if let Some(node) = procedure.find(*id) {
            println!("  -> [{}] {}", node.kind_name(), node.label());
        }
    }
    println!(
        "\n{} of {} nodes visible",
        report.visible.len(),
        procedure.len()
    );

    if trace {
        println!("\n--- Condition Trace ---");
        for (_, condition_trace) in &report.traces {
            println!("{}", TraceFormatter::format_trace(condition_trace));
        }
    }
}

/// Answers may be keyed by node id or, more conveniently, by field label.
fn resolve_field(procedure: &Procedure, key: &str) -> Option<NodeId> {
    if let Some(id) = NodeId::parse(key).filter(|id| procedure.contains(*id)) {
        return Some(id);
    }
    let mut found = None;
    procedure.walk(|visit| match visit {
        Visit::Node { node, .. } if node.as_field().is_some() && node.label() == key => {
            found = Some(node.id);
            Walk::Stop
        }
        _ => Walk::Continue,
    });
    found
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
