use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use emv_card::{extract_all, find_pan, CardReader, ExtractConfig};
use emv_tlv::tags;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "emv-extract")]
#[command(about = "EMV Certificate Extractor - pull certificate material from payment cards")]
#[command(version)]
struct Args {
    /// Reader index in enumeration order (default: first reader)
    #[arg(short, long)]
    reader: Option<usize>,

    /// Write the merged CPCL + certificate buffer to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Scan the whole SFI/record space instead of stopping once both
    /// certificates have been found
    #[arg(long)]
    exhaustive: bool,

    /// Also report the last four digits of the card number
    #[arg(long)]
    pan: bool,
}

fn main() -> ExitCode {
    // Set RUST_LOG=debug for per-record logs, RUST_LOG=trace for every
    // skipped address. Default: info level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();

    let reader = match CardReader::new() {
        Ok(r) => r,
        Err(err) => {
            eprintln!("Failed to establish PC/SC context: {}", err);
            return ExitCode::FAILURE;
        }
    };

    match reader.list_readers() {
        Ok(names) if !names.is_empty() => {
            for (i, name) in names.iter().enumerate() {
                println!("Reader {}: {}", i, name);
            }
        }
        Ok(_) | Err(_) => {
            eprintln!("No card reader found");
            return ExitCode::FAILURE;
        }
    }

    let (mut session, reader_name) = match reader.connect_index(args.reader.unwrap_or(0)) {
        Ok(connected) => connected,
        Err(err) => {
            eprintln!("Failed to connect to card: {}", err);
            eprintln!("Please ensure a card is present on the reader");
            return ExitCode::FAILURE;
        }
    };
    println!("Connected: {}\n", reader_name);

    let mut config = ExtractConfig::default();
    config.scan.stop_when_complete = !args.exhaustive;

    let bundle = match extract_all(&mut session, &config) {
        Ok(bundle) => bundle,
        Err(err) => {
            eprintln!("Extraction failed: {}", err);
            return ExitCode::FAILURE;
        }
    };

    println!("=== Extracted Data ===\n");
    let pieces = [
        (tags::tag_name(tags::CPCL_DATA), &bundle.cpcl),
        (tags::tag_name(tags::ICC_PK_CERTIFICATE), &bundle.icc_cert),
        (tags::tag_name(tags::ISSUER_PK_CERTIFICATE), &bundle.issuer_cert),
    ];
    for (name, piece) in pieces {
        match piece {
            Some(bytes) => {
                println!("{} ({} bytes):", name, bytes.len());
                println!("  {}", hex::encode_upper(bytes));
            }
            None => println!("{}: absent", name),
        }
    }

    println!("\nMerged buffer: {} bytes", bundle.data().len());

    if args.pan {
        match find_pan(&mut session, &config.cancel) {
            Ok(Some(digits)) => println!("Card number ending {}", digits),
            Ok(None) => println!("Card number: not readable"),
            Err(err) => {
                eprintln!("PAN lookup failed: {}", err);
                return ExitCode::FAILURE;
            }
        }
    }

    if let Some(path) = args.output {
        if let Err(err) = std::fs::write(&path, bundle.data()) {
            eprintln!("Failed to write {}: {}", path.display(), err);
            return ExitCode::FAILURE;
        }
        println!("Written to {}", path.display());
    }

    ExitCode::SUCCESS
}
