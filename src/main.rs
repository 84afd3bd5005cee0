use clap::{Parser as ClapParser, Subcommand};
use std::io::{self, Read};
use tenpen::cli::{self, CliError, EvalOptions, EvalOutcome};

#[derive(ClapParser)]
#[command(name = "tenpen")]
#[command(about = "Tenpen - evaluate JSON rules against JSON facts")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a rule
    Eval {
        /// The rule document
        rule: String,

        /// JSON fact document (reads from stdin if not provided)
        #[arg(short, long)]
        facts: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Only validate the rule, don't evaluate it
        #[arg(long)]
        syntax_only: bool,
    },

    /// List documentation categories
    Docs,

    /// Show documentation for a specific category
    Doc {
        /// Category name (use 'tenpen docs' to list categories)
        category: String,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Eval {
            rule,
            facts,
            pretty,
            syntax_only,
        } => run_eval(rule, facts, pretty, syntax_only),
        Commands::Docs => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
        Commands::Doc { category } => cli::get_doc_category(&category).map(|content| {
            print!("{}", content);
        }),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_eval(
    rule: String,
    facts: Option<String>,
    pretty: bool,
    syntax_only: bool,
) -> Result<(), CliError> {
    let facts = match facts {
        Some(s) => Some(s),
        None if !syntax_only && !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Some(buffer)
        }
        None => None,
    };

    let options = EvalOptions {
        rule,
        facts,
        pretty,
        syntax_only,
    };

    match cli::execute_eval(&options)? {
        EvalOutcome::SyntaxValid => println!("Rule is valid"),
        EvalOutcome::Success(output) => println!("{}", output),
    }
    Ok(())
}
