use chat_query::config::config_search_paths;
use chat_query::validate::{self, Severity};
use chat_query::{
    encode_request, read_request, ChatRequest, CodecConfig, DecodePolicy, FunctionCallDirective,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "chat-query",
    about = "Inspect, normalize and check chat-completion request documents",
    version
)]
struct Cli {
    /// Path to config file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Require `stream` and `function_call` when decoding (overrides config)
    #[arg(long, global = true)]
    strict: bool,

    /// Print config search paths and exit
    #[arg(long)]
    show_config_paths: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Decode a request and print its canonical wire form
    Normalize {
        /// Request JSON file, or `-` for stdin
        input: PathBuf,
        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },
    /// Decode a request and report conventional-range problems
    Check {
        /// Request JSON file, or `-` for stdin
        input: PathBuf,
    },
    /// Print a short summary of a request
    Describe {
        /// Request JSON file, or `-` for stdin
        input: PathBuf,
    },
}

fn describe(req: &ChatRequest) {
    println!("model:     {}", req.model);
    println!("stream:    {}", req.is_streaming());
    println!("messages:  {}", req.messages.len());
    for (i, msg) in req.messages.iter().enumerate() {
        let detail = match (&msg.content, &msg.function_call) {
            (_, Some(call)) => format!("calls {}", call.name),
            (Some(text), None) => format!("{} chars", text.chars().count()),
            (None, None) => "empty".to_string(),
        };
        let role = format!("{:?}", msg.role).to_lowercase();
        println!("  [{i}] {role:<9} {detail}");
    }
    let functions = req.functions.as_deref().unwrap_or_default();
    println!("functions: {}", functions.len());
    for function in functions {
        println!("  - {}", function.name);
    }
    let directive = match req.function_call {
        None | Some(FunctionCallDirective::None) => "(not sent)".to_string(),
        Some(FunctionCallDirective::Auto) => "auto".to_string(),
        Some(FunctionCallDirective::Named(ref name)) => format!("call {name}"),
    };
    println!("function_call: {directive}");
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chat_query=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if cli.show_config_paths {
        println!("Config search paths:");
        for (i, path) in config_search_paths().iter().enumerate() {
            println!("  {}. {}", i + 1, path.display());
        }
        return Ok(ExitCode::SUCCESS);
    }

    let mut config = CodecConfig::find_and_load(cli.config.as_deref())?;
    if cli.strict {
        config.decode.policy = DecodePolicy::Strict;
    }

    let Some(command) = cli.command else {
        anyhow::bail!("no command given, see --help");
    };

    match command {
        Command::Normalize { input, pretty } => {
            let req = read_request(&input, config.decode.policy)?;
            if pretty || config.encode.pretty {
                println!("{}", serde_json::to_string_pretty(&req)?);
            } else {
                let body = encode_request(&req);
                println!("{}", String::from_utf8_lossy(&body));
            }
        }
        Command::Check { input } => {
            let req = match read_request(&input, config.decode.policy) {
                Ok(req) => req,
                Err(e) => {
                    eprintln!("error: {e}");
                    return Ok(ExitCode::FAILURE);
                }
            };
            let issues = validate::check(&req, &config.validate);
            for issue in &issues {
                println!("{issue}");
            }
            let errors = issues
                .iter()
                .filter(|i| i.severity == Severity::Error)
                .count();
            info!(
                errors,
                warnings = issues.len() - errors,
                "checked {}",
                input.display()
            );
            if validate::is_failure(&issues, &config.validate) {
                return Ok(ExitCode::FAILURE);
            }
            println!("ok");
        }
        Command::Describe { input } => {
            let req = read_request(&input, config.decode.policy)?;
            describe(&req);
        }
    }

    Ok(ExitCode::SUCCESS)
}
