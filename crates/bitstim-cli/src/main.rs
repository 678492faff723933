//! bitstim - packet document to serial stimulus scripts
//!
//! Reads a document of packets, packs each packet's fields into bytes and
//! writes `<packet>.stim`, a script that transmits those bytes bit by bit on
//! one pin. A short report per packet is printed to stdout.
//!
//! ```bash
//! bitstim package.yaml --out-dir stim/
//! bitstim packets.json --packet status --dry-run
//! bitstim packets.toml --delay "#104" --set-pin "PORTB |= 0x01" --clear-pin "PORTB &= 0xFE"
//! ```

mod load;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use bitstim::{Packet, PacketOutput, ScriptDialect, process_packet, stim_file_name};
use clap::Parser;
use log::{error, info};

#[derive(Parser)]
#[command(name = "bitstim")]
#[command(version)]
#[command(about = "Generate bit-banged serial stimulus scripts from packet documents", long_about = None)]
struct Cli {
    /// Packet document (YAML, JSON or TOML)
    #[arg(value_name = "DOCUMENT")]
    document: PathBuf,

    /// Directory the .stim files are written to
    #[arg(short, long, value_name = "DIR", default_value = ".", env = "BITSTIM_OUT_DIR")]
    out_dir: PathBuf,

    /// Dialect file (YAML, JSON or TOML) with set_pin, clear_pin, delay and comment_prefix
    #[arg(long, value_name = "FILE")]
    dialect: Option<PathBuf>,

    /// Statement that drives the pin high
    #[arg(long, value_name = "TOKEN")]
    set_pin: Option<String>,

    /// Statement that drives the pin low
    #[arg(long, value_name = "TOKEN")]
    clear_pin: Option<String>,

    /// Statement that waits one bit period
    #[arg(long, value_name = "TOKEN")]
    delay: Option<String>,

    /// Only process the named packet (repeatable)
    #[arg(short, long = "packet", value_name = "NAME")]
    packets: Vec<String>,

    /// Print reports without writing any files
    #[arg(long)]
    dry_run: bool,

    /// Enable debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn log_level(&self) -> log::LevelFilter {
        if self.verbose {
            log::LevelFilter::Debug
        } else if self.quiet {
            log::LevelFilter::Error
        } else {
            log::LevelFilter::Warn
        }
    }

    fn script_dialect(&self) -> Result<ScriptDialect> {
        let mut dialect = match &self.dialect {
            Some(path) => load::load_dialect(path)?,
            None => ScriptDialect::default(),
        };

        if let Some(token) = &self.set_pin {
            dialect.set_pin = token.clone();
        }
        if let Some(token) = &self.clear_pin {
            dialect.clear_pin = token.clone();
        }
        if let Some(token) = &self.delay {
            dialect.delay = token.clone();
        }

        Ok(dialect)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    let dialect = cli.script_dialect()?;
    let packets = select_packets(
        load::load_document(&cli.document)?.into_packets(),
        &cli.packets,
    )?;

    if !cli.dry_run {
        std::fs::create_dir_all(&cli.out_dir)
            .with_context(|| format!("failed to create {}", cli.out_dir.display()))?;
    }

    let failed = process_all(&packets, &dialect, &cli.out_dir, cli.dry_run)?;
    if failed > 0 {
        bail!("{failed} of {} packets failed", packets.len());
    }

    Ok(())
}

/// Keeps only the packets named in `only`, in document order. An empty
/// filter keeps everything; an unknown name is an error.
fn select_packets(packets: Vec<Packet>, only: &[String]) -> Result<Vec<Packet>> {
    if only.is_empty() {
        return Ok(packets);
    }

    if let Some(missing) = only.iter().find(|name| !packets.iter().any(|p| &p.name == *name)) {
        bail!("packet `{missing}` is not defined in the document");
    }

    Ok(packets
        .into_iter()
        .filter(|p| only.contains(&p.name))
        .collect())
}

/// Processes every packet and returns how many failed to encode. A packet
/// that fails is logged and skipped; a write error aborts the run.
fn process_all(
    packets: &[Packet],
    dialect: &ScriptDialect,
    out_dir: &Path,
    dry_run: bool,
) -> Result<usize> {
    let mut failed = 0;
    for packet in packets {
        match process_packet(packet, dialect) {
            Ok(output) => write_output(&output, out_dir, dry_run)?,
            Err(err) => {
                error!("{err}: {}", err.source);
                failed += 1;
            }
        }
    }

    Ok(failed)
}

/// Writes the packet's script (unless `dry_run`) and prints its report.
fn write_output(output: &PacketOutput, out_dir: &Path, dry_run: bool) -> Result<()> {
    if !dry_run {
        let path = out_dir.join(stim_file_name(&output.encoded.name));
        std::fs::write(&path, &output.script)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(
            "wrote {} ({} bytes of payload)",
            path.display(),
            output.encoded.bytes.len()
        );
    }

    println!("{}", output.report);
    Ok(())
}
