use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use typelens::reflect::{ClassReflection, ReflectionError, Reflector};

/// Reflect PHP classes and print their resolved members.
#[derive(Parser)]
#[command(name = "typelens", version, about)]
struct Args {
    /// PHP files to load.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Reflect only this class instead of every class found.
    #[arg(long)]
    class: Option<String>,

    /// Emit class metadata as JSON instead of a readable listing.
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let reflector = Reflector::new();
    let mut found = Vec::new();

    for path in &args.files {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(error) => {
                eprintln!("error: cannot read {}: {error}", path.display());
                return ExitCode::FAILURE;
            }
        };
        for metadata in typelens::parser::parse_source(&content) {
            found.push(metadata.name.clone());
            reflector.add_metadata(metadata);
        }
    }

    let targets: Vec<String> = match &args.class {
        Some(class) => vec![class.clone()],
        None => found,
    };

    for class in &targets {
        match reflector.reflect(class) {
            Ok(reflection) => {
                if let Err(error) = print_class(&reflection, args.json) {
                    eprintln!("error: {error}");
                    return ExitCode::FAILURE;
                }
            }
            Err(error) => {
                eprintln!("error: {error}");
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}

fn print_class(reflection: &ClassReflection, json: bool) -> Result<(), ReflectionError> {
    if json {
        match serde_json::to_string_pretty(reflection.metadata()) {
            Ok(rendered) => println!("{rendered}"),
            Err(error) => eprintln!("error: cannot serialize metadata: {error}"),
        }
        return Ok(());
    }

    println!("{}", reflection.name());
    for (name, constant) in reflection.constants()? {
        println!("  const {name}: {}", constant.facets.resolved());
    }
    for (name, property) in reflection.properties()? {
        println!("  ${name}: {}", property.facets.resolved());
    }
    for (name, method) in reflection.methods()? {
        let parameters: Vec<String> = method
            .parameters
            .iter()
            .map(|parameter| format!("{} ${}", parameter.facets.resolved(), parameter.name))
            .collect();
        println!(
            "  {name}({}): {}",
            parameters.join(", "),
            method.return_facets.resolved()
        );
    }
    Ok(())
}
