//! CAultron CLI — cellular-automaton key derivation
//!
//! Commands:
//!   caultron derive  — derive a key and print it as hex
//!   caultron trace   — derive a key and print every evolution step
//!   caultron rule    — decode the MetaRule of a 32-byte seed
//!   caultron sweep   — Hamming distances against a plain hash across counters
//!   caultron salt    — print a fresh random salt

use caultron::{
    counter_sweep, generate_salt, prepare_secrets, KdfConfig, KdfError, KeyBlock, KeyDerivation,
    MetaRule, Result,
};
use std::env;
use std::process::ExitCode;

fn print_usage() {
    println!(
        r#"
CAultron — keyed cellular-automaton key derivation

Usage: caultron <command> [options]

Commands:
  derive  --password <s> --salt <hex|text> [--counter N] [--size N] [--config file]
  trace   --password <s> --salt <hex|text> [--counter N] [--size N] [--config file]
  rule    --seed <64 hex chars>
  sweep   --password <s> --salt <hex|text> [--from N] [--to N] [--size N] [--config file]
  salt

The salt is hex-decoded when possible, otherwise used as raw text, and must be
exactly 32 bytes. Without a command, options are passed to 'derive'.

Examples:
  caultron salt
  caultron derive --password hunter2 --salt <64 hex chars> --counter 3
  RUST_LOG=debug caultron trace --password hunter2 --salt <64 hex chars>
"#
    );
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        return ExitCode::SUCCESS;
    }

    let result = match args[1].as_str() {
        "derive" => cmd_derive(&args[2..]),
        "trace" => cmd_trace(&args[2..]),
        "rule" => cmd_rule(&args[2..]),
        "sweep" => cmd_sweep(&args[2..]),
        "salt" => {
            println!("{}", hex::encode(generate_salt()));
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        flag if flag.starts_with("--") => cmd_derive(&args[1..]),
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Value following `--name`, if present.
fn flag<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}

fn required<'a>(args: &'a [String], name: &str) -> Result<&'a str> {
    flag(args, name).ok_or_else(|| KdfError::Validation(format!("missing required {}", name)))
}

fn parsed<T: std::str::FromStr>(args: &[String], name: &str, default: T) -> Result<T> {
    match flag(args, name) {
        Some(raw) => raw
            .parse()
            .map_err(|_| KdfError::Validation(format!("{} must be a number, got '{}'", name, raw))),
        None => Ok(default),
    }
}

/// Hex when it decodes, raw text bytes otherwise.
fn parse_salt(raw: &str) -> Vec<u8> {
    hex::decode(raw).unwrap_or_else(|_| raw.as_bytes().to_vec())
}

fn load_config(args: &[String]) -> Result<KdfConfig> {
    let mut config = match flag(args, "--config") {
        Some(path) => KdfConfig::load(path)?,
        None => KdfConfig::default(),
    };
    config.universe_size = parsed(args, "--size", config.universe_size)?;
    config.validate()?;
    Ok(config)
}

struct Inputs {
    secrets: Vec<KeyBlock>,
    salt: Vec<u8>,
    config: KdfConfig,
}

fn read_inputs(args: &[String]) -> Result<Inputs> {
    Ok(Inputs {
        secrets: prepare_secrets([required(args, "--password")?]),
        salt: parse_salt(required(args, "--salt")?),
        config: load_config(args)?,
    })
}

fn cmd_derive(args: &[String]) -> Result<()> {
    let inputs = read_inputs(args)?;
    let counter: u64 = parsed(args, "--counter", 1)?;
    let key = KeyDerivation::new(inputs.config)?.derive(&inputs.secrets, &inputs.salt, counter)?;
    println!("{}", hex::encode(key));
    Ok(())
}

fn cmd_trace(args: &[String]) -> Result<()> {
    let inputs = read_inputs(args)?;
    let counter: u64 = parsed(args, "--counter", 1)?;
    let d = KeyDerivation::new(inputs.config)?.derive_with_trace(
        &inputs.secrets,
        &inputs.salt,
        counter,
    )?;

    println!("\n  {}", d.summary());
    println!("  {}", d.initial_rule.summary());
    println!("  {}", "-".repeat(72));
    println!("  {:>5}  {:>9}  {:>9}  {:>7}  {}", "step", "before", "after", "mutated", "rule");
    for s in &d.steps {
        let marker = if s.step == d.mid { "  <- midpoint" } else { "" };
        println!(
            "  {:>5}  {:>9.5}  {:>9.5}  {:>7}  {}{}",
            s.step, s.entropy_before, s.entropy_after, s.mutated, s.meta_rule, marker
        );
    }
    println!("  {}", "-".repeat(72));
    println!("  midpoint: {}", hex::encode(d.midpoint));
    println!("  endpoint: {}", hex::encode(d.endpoint));
    println!("  key:      {}", hex::encode(d.key));
    Ok(())
}

fn cmd_rule(args: &[String]) -> Result<()> {
    let raw = required(args, "--seed")?;
    let bytes = hex::decode(raw)
        .map_err(|e| KdfError::Validation(format!("seed must be hex: {}", e)))?;
    let seed: KeyBlock = bytes.as_slice().try_into().map_err(|_| {
        KdfError::Validation(format!("seed must be 32 bytes, got {}", bytes.len()))
    })?;
    let rule = MetaRule::from_seed(&seed);
    println!("Core Rule: {:08b}", rule.core_rule());
    println!("Neighborhood Size: {}", rule.neighborhood_size());
    println!("Boundary: {:?}", rule.boundary());
    println!("Inversion: {}", rule.inversion());
    println!("Modulation: {:08b}", rule.modulation());
    println!("Temporal: {:08b}", rule.temporal());
    Ok(())
}

fn cmd_sweep(args: &[String]) -> Result<()> {
    let inputs = read_inputs(args)?;
    let from: u32 = parsed(args, "--from", 1)?;
    let to: u32 = parsed(args, "--to", 10)?;
    let report = counter_sweep(&inputs.secrets, &inputs.salt, from..=to, &inputs.config)?;

    println!("\n  {:>8}  {:>8}", "counter", "distance");
    for e in &report.entries {
        println!("  {:>8}  {:>8}", e.counter, e.distance);
    }
    println!("\n  {}", report.summary());
    Ok(())
}
