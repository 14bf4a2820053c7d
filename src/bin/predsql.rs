//! predsql — predicate to SQL WHERE clause
//!
//! # Usage
//!
//! ```bash
//! # Translate a predicate
//! predsql '"First Name" BEGINSWITH "Jo" AND "Last Name" CONTAINS "Smith"'
//!
//! # Translate a tree exported by an editor
//! predsql --json tree.json
//!
//! # Show what an editor should offer
//! predsql templates --criteria people.toml
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use predicate_sql::config;
use predicate_sql::prelude::*;
use tracing::{debug, Level};

#[derive(Parser)]
#[command(name = "predsql")]
#[command(version)]
#[command(about = "Turn predicate expressions into SQL WHERE clauses", long_about = None)]
#[command(after_help = "EXAMPLES:
    predsql '\"First Name\" BEGINSWITH \"Jo\"' --criteria people.toml
    predsql 'zipcode = \"02139\" OR zipcode = \"02140\"' --strip-parens
    predsql --json tree.json --strict")]
struct Cli {
    /// The predicate expression to translate
    expr: Option<String>,

    /// Read a JSON expression tree instead of a text expression
    #[arg(long, conflicts_with = "expr")]
    json: Option<PathBuf>,

    /// Criteria file (TOML)
    #[arg(short, long, global = true, env = "PREDSQL_CRITERIA")]
    criteria: Option<PathBuf>,

    /// Reject operators a criteria does not offer
    #[arg(long, global = true)]
    strict: bool,

    /// Drop the parentheses around the outermost group
    #[arg(long, global = true)]
    strip_parens: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a predicate and show its tree next to the SQL
    Explain {
        /// The predicate expression to explain
        expr: String,
    },
    /// Show the operator table
    Operators,
    /// Print the editor row templates for the loaded criteria as JSON
    Templates,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Some(Commands::Operators) => {
            show_operators();
            Ok(())
        }
        Some(Commands::Templates) => {
            let registry = load_criteria(cli)?;
            println!("{}", serde_json::to_string_pretty(&registry.row_templates())?);
            Ok(())
        }
        Some(Commands::Explain { expr }) => {
            let registry = load_criteria(cli)?;
            explain(expr, &registry, cli)
        }
        None => {
            let expr = if let Some(path) = &cli.json {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read '{}'", path.display()))?;
                Expr::from_json(&content)?
            } else if let Some(text) = &cli.expr {
                predicate_sql::parse(text)?
            } else {
                println!("{}", "predsql — predicates to SQL".cyan().bold());
                println!();
                println!("Usage: predsql <EXPR> [OPTIONS]");
                println!();
                println!("Try: predsql --help");
                return Ok(());
            };

            let registry = load_criteria(cli)?;
            println!("{}", translator(&registry, cli).translate(&expr)?);
            Ok(())
        }
    }
}

fn translator<'a>(registry: &'a CriteriaRegistry, cli: &Cli) -> Translator<'a> {
    Translator::new(registry)
        .strict_operators(cli.strict)
        .strip_outer_parens(cli.strip_parens)
}

/// Explicit path, then the user's config dir.
fn load_criteria(cli: &Cli) -> Result<CriteriaRegistry> {
    let path = match &cli.criteria {
        Some(p) => p.clone(),
        None => config::default_criteria_path()
            .filter(|p| p.exists())
            .context("No criteria file. Use --criteria or set PREDSQL_CRITERIA")?,
    };
    debug!("Using criteria file {}", path.display());

    let registry = config::load_registry(&path)
        .with_context(|| format!("Failed to load criteria from '{}'", path.display()))?;
    if registry.is_empty() {
        eprintln!(
            "{}",
            format!("⚠ No criteria defined in {}", path.display()).yellow()
        );
    }
    Ok(registry)
}

fn explain(text: &str, registry: &CriteriaRegistry, cli: &Cli) -> Result<()> {
    println!("{} {}", "Expression:".dimmed(), text.yellow());
    println!();

    let expr = predicate_sql::parse(text)?;
    println!("{}", "Parsed Structure:".green().bold());
    print_tree(&expr, registry, 1);

    println!();
    println!("{}", "Generated SQL:".green().bold());
    let sql = translator(registry, cli).translate(&expr)?;
    println!("  {}", sql.white());
    Ok(())
}

fn print_tree(expr: &Expr, registry: &CriteriaRegistry, depth: usize) {
    let indent = "  ".repeat(depth);
    match expr {
        Expr::Compound(c) => {
            println!("{}{}", indent, c.kind.to_string().cyan());
            for child in &c.children {
                print_tree(child, registry, depth + 1);
            }
        }
        Expr::Comparison(c) => {
            let column = match registry.resolve_backing_name(&c.criteria) {
                Some(col) => col.white(),
                None => "?".red(),
            };
            println!(
                "{}• {} → {} {} {}",
                indent,
                c.criteria.white(),
                column,
                c.operator.to_string().dimmed(),
                format!("{:?}", c.value).yellow()
            );
        }
    }
}

fn show_operators() {
    println!(
        "{:14} {:12} {:6} {}",
        "Operator".white().bold(),
        "Syntax".white().bold(),
        "SQL".white().bold(),
        "Value".white().bold()
    );
    println!("{}", "─".repeat(44).dimmed());

    for tag in OperatorTag::ALL {
        let op = tag.sql();
        println!(
            "{:14} {:12} {:6} {}",
            tag.to_string().cyan().bold(),
            tag.keyword().yellow(),
            op.sql.white(),
            op.template.to_string().dimmed()
        );
    }
}
