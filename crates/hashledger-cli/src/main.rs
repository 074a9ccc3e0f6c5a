use anyhow::Result;
use clap::{Parser, Subcommand};
use hashledger_core::constants::{HASH_HEX_SIZE, POW_DIFFICULTY};
use hashledger_core::{pow, Chain, ChainConfig, ProofOfWork};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_TAMPER_TX: &str = "Alice pays Bob 50 BTC";

#[derive(Parser, Debug)]
#[command(name = "hashledger-cli")]
#[command(about = "Builds a small proof-of-work ledger, tampers with it and validates it")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a three-block chain, tamper with one block and validate before and after
    Demo {
        /// Leading zero hex characters required of each proof digest (0-64)
        #[arg(long, default_value_t = POW_DIFFICULTY, value_parser = parse_difficulty)]
        difficulty: usize,
        /// Give up the proof search after this many attempts
        #[arg(long)]
        max_attempts: Option<u64>,
        /// Block to rewrite
        #[arg(long, default_value_t = 1)]
        tamper_index: usize,
        /// Replacement transaction (repeatable)
        #[arg(long = "tamper-tx")]
        tamper_txs: Vec<String>,
        /// Print a JSON report instead of text
        #[arg(long)]
        json: bool,
    },
    /// Search for the proof that follows `last_proof`
    Prove {
        /// Proof of the block the new proof will follow
        #[arg(long)]
        last_proof: u64,
        /// Leading zero hex characters required of the proof digest (0-64)
        #[arg(long, default_value_t = POW_DIFFICULTY, value_parser = parse_difficulty)]
        difficulty: usize,
    },
}

fn parse_difficulty(s: &str) -> std::result::Result<usize, String> {
    let difficulty: usize = s.parse().map_err(|e| format!("{e}"))?;
    if difficulty > HASH_HEX_SIZE {
        return Err(format!(
            "must be at most {HASH_HEX_SIZE}, the length of a hex digest"
        ));
    }
    Ok(difficulty)
}

#[derive(Serialize)]
struct DemoReport {
    before: Chain,
    valid_before: bool,
    tamper_index: usize,
    /// Why the tamper was skipped, if it was.
    tamper_skipped: Option<String>,
    after: Chain,
    valid_after: bool,
    violation: Option<String>,
}

fn run_demo(
    config: ChainConfig,
    tamper_index: usize,
    tamper_txs: Vec<String>,
) -> Result<DemoReport> {
    let mut chain = Chain::with_config(config);
    chain.append_block(vec![
        "Alice pays Bob 5 BTC".to_string(),
        "Bob pays Charlie 3 BTC".to_string(),
    ])?;
    chain.append_block(vec![
        "Charlie pays Dave 2 BTC".to_string(),
        "Dave pays Eve 1 BTC".to_string(),
    ])?;

    let before = chain.clone();
    let valid_before = before.is_chain_valid();

    let tamper_skipped = chain
        .try_tamper_with_chain(tamper_index, tamper_txs)
        .err()
        .map(|e| e.to_string());
    let violation = chain.validate().err().map(|e| e.to_string());

    Ok(DemoReport {
        before,
        valid_before,
        tamper_index,
        tamper_skipped,
        valid_after: violation.is_none(),
        after: chain,
        violation,
    })
}

fn print_report(report: &DemoReport) {
    println!("Blockchain before tampering:");
    print!("{}", report.before);
    println!("Is blockchain valid? {}", report.valid_before);
    println!();
    match &report.tamper_skipped {
        Some(reason) => {
            println!("Tamper with block {} skipped: {reason}", report.tamper_index);
            println!("Blockchain unchanged:");
        }
        None => println!(
            "Blockchain after tampering with block {}:",
            report.tamper_index
        ),
    }
    print!("{}", report.after);
    println!("Is blockchain valid? {}", report.valid_after);
    if let Some(violation) = &report.violation {
        println!("Violation: {violation}");
    }
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .pretty()
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Demo {
            difficulty,
            max_attempts,
            tamper_index,
            mut tamper_txs,
            json,
        } => {
            if tamper_txs.is_empty() {
                tamper_txs.push(DEFAULT_TAMPER_TX.to_string());
            }
            let config = ChainConfig {
                difficulty,
                max_attempts,
            };
            info!("Running demo with difficulty {}", difficulty);
            let report = run_demo(config, tamper_index, tamper_txs)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }
        Command::Prove {
            last_proof,
            difficulty,
        } => {
            let proof = ProofOfWork::new(difficulty).find(last_proof)?;
            println!("proof: {proof}");
            println!("digest: {}", pow::proof_digest(last_proof, proof));
        }
    }
    Ok(())
}
