//! Score a dispensing CSV export and print the results as JSON.
//!
//! Usage: `rxguard <export.csv> [seed]`

use anyhow::{bail, Context, Result};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let path = match args.next() {
        Some(path) => path,
        None => bail!("usage: rxguard <export.csv> [seed]"),
    };
    let seed = match args.next() {
        Some(raw) => raw.parse().context("seed must be an unsigned integer")?,
        None => rand::random(),
    };

    let raw_text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    let scored = rxguard_core::score_batch(&raw_text, seed)?;

    println!("{}", serde_json::to_string_pretty(&scored)?);
    Ok(())
}
