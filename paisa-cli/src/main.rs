use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use paisa_core::InboundMessage;
use paisa_ingest::pipeline::{ParseOutcome, Pipeline};

#[derive(Parser, Debug)]
#[command(name = "paisa", version, about = "Parse transaction records out of bank/UPI notification text")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a single message and print the extracted transaction
    Parse {
        /// Message body text
        #[arg(long)]
        body: String,

        /// Sender id (e.g. "HDFC", "GPAY")
        #[arg(long)]
        sender: String,

        /// Received-at timestamp, RFC3339 (defaults to now)
        #[arg(long)]
        received_at: Option<DateTime<Utc>>,

        /// Print the record as JSON instead of a summary line
        #[arg(long)]
        json: bool,
    },

    /// Import a CSV backlog of messages (columns: body,sender[,received_at])
    Import {
        /// Path to the exported messages CSV
        #[arg(long)]
        csv: PathBuf,

        /// Print parsed records as JSON lines after the counts
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let pipeline = Pipeline::new()?;

    match cli.command {
        Command::Parse {
            body,
            sender,
            received_at,
            json,
        } => {
            let mut msg = InboundMessage::new(body, sender);
            msg.received_at = received_at;

            match pipeline.parse_with_outcome(&msg)? {
                ParseOutcome::Parsed(txn) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&txn)?);
                    } else {
                        println!(
                            "{} INR {:.2} {} [{}] {} ({})",
                            match txn.direction {
                                paisa_core::Direction::Debit => "debit ",
                                paisa_core::Direction::Credit => "credit",
                            },
                            txn.amount,
                            txn.counterparty,
                            txn.category.label(),
                            txn.institution.code(),
                            txn.raw_source,
                        );
                    }
                }
                ParseOutcome::Spam => println!("no transaction (dropped as spam)"),
                ParseOutcome::NoMatch => println!("no transaction (no pattern matched)"),
            }
        }

        Command::Import { csv, json } => {
            let msgs = read_messages_csv(&csv)
                .with_context(|| format!("reading {}", csv.display()))?;

            let summary = pipeline.parse_batch(&msgs);
            println!(
                "Parsed {} transactions, {} failed (of {} messages)",
                summary.parsed,
                summary.failed,
                msgs.len()
            );

            if json {
                for txn in &summary.transactions {
                    println!("{}", serde_json::to_string(txn)?);
                }
            }
        }
    }

    Ok(())
}

/// Read a `body,sender[,received_at]` CSV. A header row starting with
/// "body" is skipped; rows with an empty body are ignored.
fn read_messages_csv(path: &PathBuf) -> Result<Vec<InboundMessage>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_path(path)?;

    let mut msgs = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        let body = record.get(0).unwrap_or("").trim();
        if body.is_empty() || (i == 0 && body.eq_ignore_ascii_case("body")) {
            continue;
        }

        let mut msg = InboundMessage::new(body, record.get(1).unwrap_or("").trim());
        if let Some(raw) = record.get(2) {
            if let Ok(at) = raw.trim().parse::<DateTime<Utc>>() {
                msg.received_at = Some(at);
            }
        }
        msgs.push(msg);
    }

    Ok(msgs)
}
