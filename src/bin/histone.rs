//! Command-line interface for histone
//! This binary inspects histone templates: their tokens, their AST and the pseudo-source
//! rendered back from it.
//!
//! Usage:
//!   histone tokens `<path>` [--context `<context>`]          - Print the token stream as JSON
//!   histone parse `<path>` [--envelope] [--format `<format>`]  - Parse and serialize the AST
//!   histone deparse `<path>` [--ast]                          - Render pseudo-source
//!   histone fingerprint `<path>` [--ast]                      - Print structural fingerprints
//!   histone formats                                         - List available output formats

use clap::{Arg, ArgAction, ArgMatches, Command};
use histone::histone::ast::{wire, Template};
use histone::histone::config::{HistoneConfig, Loader};
use histone::histone::formats::{Deparser, Fingerprint, FormatRegistry};
use histone::histone::lexing::TokenizerFactory;
use histone::histone::parsing::{format_source_context, parse_from};
use histone::histone::token::Context;
use histone::histone::HistoneError;
use serde_json::{json, Value};
use std::path::Path;

fn main() {
    let matches = Command::new("histone")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for inspecting histone templates")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("TOML file layered over the built-in defaults"),
        )
        .subcommand(
            Command::new("tokens")
                .about("Print the token stream as JSON")
                .arg(path_arg("Path to the template"))
                .arg(
                    Arg::new("context")
                        .long("context")
                        .help("Context to start scanning in (defaults to lexer.start_context)")
                        .value_parser(Context::ALL.map(|context| context.name())),
                ),
        )
        .subcommand(
            Command::new("parse")
                .about("Parse a template and serialize its AST")
                .arg(path_arg("Path to the template"))
                .arg(
                    Arg::new("envelope")
                        .long("envelope")
                        .action(ArgAction::SetTrue)
                        .help("Wrap the AST in a HISTONE signature envelope"),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format (see 'histone formats')")
                        .default_value("ast-json"),
                ),
        )
        .subcommand(
            Command::new("deparse")
                .about("Render a template or an AST as pseudo-source")
                .arg(path_arg("Path to the template or AST"))
                .arg(ast_arg()),
        )
        .subcommand(
            Command::new("fingerprint")
                .about("Print the leaf-hash fingerprint and node count of an AST")
                .arg(path_arg("Path to the template or AST"))
                .arg(ast_arg()),
        )
        .subcommand(Command::new("formats").about("List available output formats"))
        .get_matches();

    let config = load_config(matches.get_one::<String>("config"));

    match matches.subcommand() {
        Some(("tokens", sub)) => handle_tokens_command(&config, sub),
        Some(("parse", sub)) => handle_parse_command(&config, sub),
        Some(("deparse", sub)) => handle_deparse_command(&config, sub),
        Some(("fingerprint", sub)) => handle_fingerprint_command(&config, sub),
        Some(("formats", _)) => handle_formats_command(),
        _ => unreachable!(),
    }
}

fn path_arg(help: &'static str) -> Arg {
    Arg::new("path").help(help).required(true).index(1)
}

fn ast_arg() -> Arg {
    Arg::new("ast")
        .long("ast")
        .action(ArgAction::SetTrue)
        .help("Read a JSON or YAML AST instead of template source")
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

fn load_config(path: Option<&String>) -> HistoneConfig {
    let loader = match path {
        Some(path) => Loader::new().with_file(path),
        None => Loader::new(),
    };
    loader.build().unwrap_or_else(|e| fail(e))
}

fn build_factory(config: &HistoneConfig) -> TokenizerFactory {
    TokenizerFactory::from_config(config).unwrap_or_else(|e| fail(e))
}

fn read_source(path: &str) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|e| fail(format!("reading {}: {}", path, e)))
}

fn parse_source(config: &HistoneConfig, source: &str) -> Template {
    let factory = build_factory(config);
    match parse_from(&factory, source, config.lexer.start_context) {
        Ok(items) => Template::new(items),
        Err(HistoneError::Parse(err)) => {
            eprintln!("Error: {}", err);
            eprint!("{}", format_source_context(source, err.line));
            std::process::exit(1);
        }
        Err(e) => fail(e),
    }
}

/// Template source is parsed; `--ast` reads a wire AST, YAML by extension, JSON otherwise.
fn read_input(config: &HistoneConfig, sub: &ArgMatches) -> Value {
    let path = sub.get_one::<String>("path").unwrap();
    let source = read_source(path);
    if !sub.get_flag("ast") {
        return parse_source(config, &source).to_value();
    }
    let is_yaml = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == "yaml" || ext == "yml");
    let value = if is_yaml {
        wire::from_yaml_str(&source)
    } else {
        wire::from_json_str(&source)
    };
    value.unwrap_or_else(|e| fail(e))
}

fn handle_tokens_command(config: &HistoneConfig, sub: &ArgMatches) {
    let path = sub.get_one::<String>("path").unwrap();
    let start = sub
        .get_one::<String>("context")
        .and_then(|name| Context::ALL.into_iter().find(|context| context.name() == name))
        .unwrap_or(config.lexer.start_context);
    let source = read_source(path);
    let factory = build_factory(config);
    let tokens = factory
        .tokenizer(&source, start)
        .unwrap_or_else(|e| fail(e))
        .collect_tokens();
    let output = serde_json::to_string_pretty(&tokens).unwrap_or_else(|e| fail(e));
    println!("{}", output);
}

fn handle_parse_command(config: &HistoneConfig, sub: &ArgMatches) {
    let path = sub.get_one::<String>("path").unwrap();
    let format = sub.get_one::<String>("format").unwrap();
    let source = read_source(path);
    let mut template = parse_source(config, &source);
    if sub.get_flag("envelope") {
        template = template.with_signature(json!({ "source": path }));
    }
    let output = FormatRegistry::with_defaults()
        .serialize(&template, format)
        .unwrap_or_else(|e| fail(e));
    print!("{}", output);
    if !output.ends_with('\n') {
        println!();
    }
}

fn handle_deparse_command(config: &HistoneConfig, sub: &ArgMatches) {
    let value = read_input(config, sub);
    let output = Deparser::new(&config.deparser)
        .deparse_value(&value)
        .unwrap_or_else(|e| fail(e));
    print!("{}", output);
}

fn handle_fingerprint_command(config: &HistoneConfig, sub: &ArgMatches) {
    let value = read_input(config, sub);
    // Reject malformed trees instead of hashing whatever arrays they contain
    if let Err(e) = wire::from_value(&value) {
        fail(e);
    }
    println!("{}", Fingerprint::of_value(&value));
}

fn handle_formats_command() {
    let registry = FormatRegistry::with_defaults();
    println!("Available formats:\n");
    for name in registry.list_formats() {
        if let Some(formatter) = registry.get(&name) {
            println!("  {}", name);
            println!("    {}", formatter.description());
        }
    }
}
