use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow, bail};
use tracing_subscriber::EnvFilter;

use exprlang::config::{self, FrontendConfig};
use exprlang::frontend::{self, FrontendReport, Outcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Emit {
    Tokens,
    Tree,
    Analysis,
    All,
}

impl Emit {
    fn from_name(name: &str) -> Result<Self> {
        Ok(match name {
            "tokens" => Self::Tokens,
            "tree" => Self::Tree,
            "analysis" => Self::Analysis,
            "all" => Self::All,
            _ => bail!("Unknown emit mode '{name}', expected tokens, tree, analysis or all"),
        })
    }

    fn includes(self, other: Emit) -> bool {
        self == Emit::All || self == other
    }
}

struct Options {
    emit: Emit,
    max_depth: Option<usize>,
    max_operators: Option<usize>,
    verbose: bool,
    input_path: Option<String>,
}

fn parse_args() -> Result<Options> {
    let mut args = std::env::args().skip(1);
    let mut options = Options {
        emit: Emit::Analysis,
        max_depth: None,
        max_operators: None,
        verbose: false,
        input_path: None,
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--emit" | "-e" => {
                let mode = args
                    .next()
                    .ok_or_else(|| anyhow!("Missing emit mode after {arg}"))?;
                options.emit = Emit::from_name(&mode)?;
            }
            "--max-depth" => {
                let value = args
                    .next()
                    .ok_or_else(|| anyhow!("Missing depth after {arg}"))?;
                options.max_depth = Some(config::parse_limit("--max-depth", &value)?);
            }
            "--max-operators" => {
                let value = args
                    .next()
                    .ok_or_else(|| anyhow!("Missing operator count after {arg}"))?;
                options.max_operators = Some(config::parse_limit("--max-operators", &value)?);
            }
            "--verbose" | "-v" => options.verbose = true,
            _ => {
                options.input_path = Some(arg);
                if args.next().is_some() {
                    bail!("Only one input file is supported");
                }
                break;
            }
        }
    }
    Ok(options)
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn print_report(report: &FrontendReport, emit: Emit) {
    if emit.includes(Emit::Tokens) {
        for token in &report.tokens {
            println!("{token}");
        }
    }
    if emit.includes(Emit::Tree)
        && let Some(tree) = report.tree()
    {
        print!("{}", tree.pretty());
    }
    for diagnostic in &report.lexical {
        eprintln!("{diagnostic}");
    }
    match &report.outcome {
        Outcome::Rejected(error) => eprintln!("{}", error.diagnostic()),
        Outcome::Analyzed { analysis, .. } => {
            if emit.includes(Emit::Analysis) {
                print!("{analysis}");
            } else {
                for diagnostic in analysis.diagnostics() {
                    eprintln!("{diagnostic}");
                }
            }
        }
    }
}

fn main() -> Result<ExitCode> {
    let options = parse_args()?;
    init_logging(options.verbose);

    let mut config = FrontendConfig::from_env()?;
    if let Some(max_depth) = options.max_depth {
        config = config.with_max_depth(max_depth);
    }
    if let Some(max_operators) = options.max_operators {
        config = config.with_max_operators(max_operators);
    }

    let source = if let Some(path) = &options.input_path {
        fs::read_to_string(path).with_context(|| format!("Reading {path}"))?
    } else {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Reading stdin")?;
        buffer
    };

    let report = frontend::run(&source, &config);
    print_report(&report, options.emit);

    Ok(if report.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
