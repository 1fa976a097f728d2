use clap::Parser;
use rand::Rng;
use rand::rngs::ThreadRng;
use std::fs;
use tenken::prelude::*;
use tenken::wire::flatten;

/// A CLI tool to generate random procedures in the backend's fetch format
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_procedure.json")]
    output: String,

    /// The number of sections to generate
    #[arg(long, default_value_t = 3)]
    sections: usize,

    /// The maximum number of fields per container
    #[arg(long, default_value_t = 6)]
    max_fields: usize,

    /// How deep condition groups may nest
    #[arg(long, default_value_t = 2)]
    depth: usize,
}

const LABELS: &[&str] = &[
    "Oil level",
    "Belt tension",
    "Pressure reading",
    "Visible leaks",
    "Guard in place",
    "Filter condition",
    "Noise level",
    "Operator signature",
    "Temperature",
    "Photo of defect",
];

const OPTIONS: &[&str] = &["Good", "Fair", "Poor", "Replaced"];

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env().init();
    let cli = Cli::parse();
    let mut rng = rand::rng();

    if cli.max_fields == 0 {
        eprintln!("Error: --max-fields must be at least 1");
        std::process::exit(1);
    }

    println!(
        "Generating a procedure ({} sections, up to {} fields per container, depth {})...",
        cli.sections, cli.max_fields, cli.depth
    );

    let mut procedure = Procedure::empty(IdGenerator::random());
    procedure.meta.title = format!("Generated inspection #{}", rng.random_range(100..1000));
    procedure.meta.description = "Randomly generated procedure".to_string();

    fill(&mut procedure, &mut rng, Container::Root, &cli, cli.depth);
    for index in 0..cli.sections {
        let draft = NodeDraft::section(format!("Section {}", index + 1));
        if let Some(section) = procedure.insert(Container::Root, draft) {
            fill(&mut procedure, &mut rng, Container::Section(section), &cli, cli.depth);
        }
    }
    procedure.validate()?;

    let response = flatten(&procedure.to_save_request("generated"), "generated");
    let json_output = serde_json::to_string_pretty(&response)?;
    fs::write(&cli.output, json_output)?;

    println!(
        "-> {} nodes, {} condition groups",
        procedure.len(),
        procedure.condition_count()
    );
    println!(
        "Successfully generated and saved procedure to '{}'",
        cli.output
    );

    Ok(())
}

/// Adds a random run of fields and headings to `container`, gating some of
/// them behind conditions while `depth` allows.
fn fill(
    procedure: &mut Procedure,
    rng: &mut ThreadRng,
    container: Container,
    cli: &Cli,
    depth: usize,
) {
    let count = rng.random_range(1..=cli.max_fields);
    for _ in 0..count {
        if rng.random_bool(0.15) {
            procedure.insert(container, NodeDraft::heading(pick(rng, LABELS)));
            continue;
        }

        let field_type = pick_type(rng);
        let mut draft = NodeDraft::field(pick(rng, LABELS), field_type.clone());
        if rng.random_bool(0.5) {
            draft = draft.required();
        }
        if field_type.has_options() {
            draft = draft.with_options(OPTIONS.iter().copied());
        }
        if field_type == FieldType::MeterReading {
            draft = draft.with_meter(MeterRef::new(format!("meter-{}", rng.random_range(1..50))));
        }

        let Some(field) = procedure.insert(container, draft) else {
            continue;
        };
        if depth > 0 && field_type.is_logic_enabled() && rng.random_bool(0.4) {
            let condition = random_condition(rng, &field_type);
            if let Some(group) = procedure.add_condition(field, condition) {
                fill(procedure, rng, Container::Condition(group), cli, depth - 1);
            }
        }
    }
}

fn pick<'a>(rng: &mut ThreadRng, items: &[&'a str]) -> &'a str {
    items[rng.random_range(0..items.len())]
}

fn pick_type(rng: &mut ThreadRng) -> FieldType {
    let known = FieldType::KNOWN;
    known[rng.random_range(0..known.len())].clone()
}

fn random_condition(rng: &mut ThreadRng, field_type: &FieldType) -> Condition {
    let operators = field_type.operators();
    let operator = operators[rng.random_range(0..operators.len())];
    let condition = Condition::new(operator);
    if operator == Operator::Between {
        let low = rng.random_range(0..50);
        condition.with_range(low.to_string(), (low + rng.random_range(1..50)).to_string())
    } else if operator.is_numeric() {
        condition.with_value(rng.random_range(0..100).to_string())
    } else if operator.takes_value() {
        condition.with_value(pick(rng, OPTIONS))
    } else {
        condition
    }
}
