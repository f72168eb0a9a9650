// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Command line utility for inspecting Cardano UR payloads

use std::path::Path;

use clap::Parser;
use log::{debug, info, warn, LevelFilter};
use tokio::io::AsyncReadExt;

use ur_inspect::{
    engine::Inspection, inspect_payload, Error, Format, Status, UrPayload, UrSession,
};

mod helpers;
use helpers::*;

/// Cardano UR inspection utility
#[derive(Clone, PartialEq, Debug, Parser)]
struct Options {
    /// Subcommand to execute
    #[clap(subcommand)]
    cmd: Actions,

    /// Report output format
    #[clap(long, value_enum, default_value = "text")]
    format: Format,

    /// Write report to file (`.json` or `.txt`)
    #[clap(long)]
    output: Option<String>,

    /// Enable verbose logging
    #[clap(long, default_value = "info")]
    log_level: LevelFilter,
}

#[derive(Clone, PartialEq, Debug, Parser)]
enum Actions {
    /// Reassemble UR fragments (one per line) and inspect the payload
    Fragments {
        /// Fragment file, reads from stdin if omitted
        input: Option<String>,
    },

    /// Inspect a reassembled payload
    Payload {
        /// UR type tag (eg. `cardano-sign-request`)
        #[clap(long)]
        ur_type: String,

        /// Hex encoded CBOR payload
        #[clap(long, group = "cbor")]
        hex: Option<HexData>,

        /// Base64 encoded CBOR payload
        #[clap(long, group = "cbor")]
        base64: Option<B64Data>,

        /// Binary CBOR payload file
        #[clap(long, group = "cbor")]
        file: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Options::parse();

    // Setup logging
    simplelog::SimpleLogger::init(args.log_level, simplelog::Config::default())?;

    debug!("Executing command: {:?}", args.cmd);

    // Fetch payload
    let payload = match &args.cmd {
        Actions::Fragments { input } => read_fragments(input.as_deref()).await?,
        Actions::Payload {
            ur_type,
            hex,
            base64,
            file,
        } => {
            let cbor = match (hex, base64, file) {
                (Some(h), _, _) => h.0.clone(),
                (_, Some(b), _) => b.0.clone(),
                (_, _, Some(f)) => tokio::fs::read(f).await?,
                _ => return Err(anyhow::anyhow!("one of --hex, --base64 or --file is required")),
            };

            UrPayload {
                ur_type: ur_type.clone(),
                cbor,
            }
        }
    };

    // Inspect payload
    let inspection = inspect_payload(&payload)?;

    // Render and output report
    let report = match args.format {
        Format::Text => render_text(&inspection),
        Format::Json => serde_json::to_string_pretty(&inspection)?,
    };

    println!("{report}");

    if let Some(output) = &args.output {
        write_output(output, &inspection).await?;
    }

    Ok(())
}

/// Collect fragments from a file or stdin until the payload completes
async fn read_fragments(file_name: Option<&str>) -> anyhow::Result<UrPayload> {
    let s = match file_name {
        Some(f) => {
            debug!("Reading fragments from '{}'", f);
            tokio::fs::read_to_string(f).await?
        }
        None => {
            debug!("Reading fragments from stdin");
            let mut s = String::new();
            tokio::io::stdin().read_to_string(&mut s).await?;
            s
        }
    };

    let mut session = UrSession::default();

    for line in s.lines() {
        match session.receive(line)? {
            Status::Complete(p) => return Ok(p),
            Status::Pending(progress) => info!("Progress: {}", progress),
            Status::Rejected => warn!("Fragment rejected: '{}'", line.trim()),
            Status::Ignored | Status::Duplicate => (),
        }
    }

    Err(Error::Incomplete(session.progress()).into())
}

/// Render report lines followed by the raw payload views
fn render_text(i: &Inspection) -> String {
    let mut lines = i.lines();

    lines.push(String::new());
    if let Some(h) = i.primary_hex() {
        lines.push(format!("Primary Hex: {h}"));
    }
    lines.push(format!("CBOR Hex: {}", i.raw.hex));
    lines.push(format!("CBOR Base64: {}", i.raw.base64));

    lines.join("\n")
}

/// Helper to write output files if `--output` argument is provided
async fn write_output(file_name: &str, i: &Inspection) -> anyhow::Result<()> {
    debug!("Writing output to '{}'", file_name);

    // Determine format from file name
    let p = Path::new(file_name);
    match p.extension().and_then(|e| e.to_str()) {
        // Encode to JSON for `.json` files
        Some("json") => {
            let s = serde_json::to_string_pretty(i)?;
            tokio::fs::write(p, s).await?;
        }
        // Report lines for `.txt` files
        Some("txt") => {
            tokio::fs::write(p, render_text(i)).await?;
        }
        _ => return Err(anyhow::anyhow!("unsupported output file format")),
    }

    Ok(())
}
