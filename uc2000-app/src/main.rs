// uc2000 -- command-line tool for the Synrad UC-2000 laser controller.
//
// Encodes REMOTE protocol messages, polls the controller's status and fires
// timed shot sequences over a serial port. The controller must be in REMOTE
// mode.
//
// Usage:
//   uc2000 list
//   uc2000 encode percent 10 --checksum
//   uc2000 encode mode anv
//   uc2000 --port /dev/ttyUSB0 status
//   uc2000 --port /dev/ttyUSB0 send lase false --checksum
//   uc2000 --port COM3 fire --power 10 --shot-time 0.5 --delay 0.5 --shots 2
//   uc2000 fire --power 25 --shots 3 --dry-run
//
// THE FIRE COMMAND FIRES THE LASER. Disconnect the controller from the laser
// head when trying it out.

use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use uc2000::proto::message::{PERCENT, STATUS_REQUEST};
use uc2000::{
    DEFAULT_BAUD_RATE, Family, SerialTransport, ShotConfig, ShotSequencer, Transport, Value, encode,
    plan,
};

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// Encode UC-2000 messages and fire shot sequences.
#[derive(Parser)]
#[command(name = "uc2000", version, about)]
struct Cli {
    /// Serial port path (e.g. /dev/ttyUSB0, COM3).
    /// Required by `status`, `send` and `fire` (unless --dry-run).
    #[arg(long, global = true)]
    port: Option<String>,

    /// Baud rate of the serial port.
    #[arg(long, global = true, default_value_t = DEFAULT_BAUD_RATE)]
    baud: u32,

    /// How long to wait for a reply line, in milliseconds.
    #[arg(long, global = true, default_value_t = 50)]
    read_timeout_ms: u64,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    /// RUST_LOG overrides this.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every command and its legal data values.
    List,

    /// Print the bytes of one message without sending it.
    Encode {
        /// Command name (e.g. percent, lase, mode, status_request).
        command: String,
        /// Data value (e.g. 10, true, anv). Omit for status_request.
        data: Option<String>,
        /// Append the checksum byte.
        #[arg(long)]
        checksum: bool,
    },

    /// Send one message and print any reply.
    Send {
        command: String,
        data: Option<String>,
        #[arg(long)]
        checksum: bool,
    },

    /// Send a status request and print the raw reply.
    Status,

    /// Set the power and fire a sequence of timed shots.
    Fire {
        /// Output power in percent (0-100).
        #[arg(long, default_value_t = 10.0)]
        power: f64,

        /// Time the laser is on per shot, in seconds.
        #[arg(long, default_value = "0.5", value_parser = parse_seconds)]
        shot_time: Duration,

        /// Time between shots, in seconds.
        #[arg(long, default_value = "0.5", value_parser = parse_seconds)]
        delay: Duration,

        /// Number of shots.
        #[arg(long, default_value_t = 2)]
        shots: u32,

        /// Print the planned frames and timing, send nothing.
        #[arg(long)]
        dry_run: bool,

        /// Do not ask for confirmation.
        #[arg(long)]
        yes: bool,
    },
}

/// Parse a non-negative number of seconds such as "0.5".
fn parse_seconds(s: &str) -> std::result::Result<Duration, String> {
    let secs: f64 = s.parse().map_err(|e| format!("invalid seconds '{s}': {e}"))?;
    Duration::try_from_secs_f64(secs).map_err(|e| format!("invalid seconds '{s}': {e}"))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Format bytes as space-separated hex, e.g. `5B 7F 14`.
fn format_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn data_value(data: Option<&str>) -> Value {
    data.map(Value::parse).unwrap_or(Value::None)
}

/// Prompt the user for y/N confirmation. Returns true only if "y" or "Y" entered.
fn confirm(prompt: &str) -> bool {
    print!("{prompt}");
    io::stdout().flush().ok();
    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return false;
    }
    matches!(input.trim(), "y" | "Y")
}

async fn open_port(cli: &Cli) -> Result<SerialTransport> {
    let port = cli
        .port
        .as_deref()
        .context("--port is required for this command")?;
    tracing::info!(port, baud = cli.baud, "Opening serial port");
    SerialTransport::open(port, cli.baud)
        .await
        .with_context(|| format!("opening {port} at {} baud", cli.baud))
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_list() -> Result<()> {
    println!("{:<18}  Data", "Command");
    println!("{:<18}  ----", "-------");
    for family in Family::ALL {
        println!("{:<18}  {}", family.name(), family.keys().join(", "));
    }
    println!("{PERCENT:<18}  0-100 (percent, half-percent steps)");
    println!("{STATUS_REQUEST:<18}  (none)");
    Ok(())
}

fn cmd_encode(command: &str, data: Option<&str>, checksum: bool) -> Result<()> {
    let bytes = encode(command, &data_value(data), checksum)?;
    println!("{}", format_bytes(&bytes));
    Ok(())
}

async fn cmd_send(cli: &Cli, command: &str, data: Option<&str>, checksum: bool) -> Result<()> {
    let bytes = encode(command, &data_value(data), checksum)?;
    tracing::debug!(command, bytes = ?bytes, "encoded");
    let mut transport = open_port(cli).await?;

    transport.send(&bytes).await?;
    println!("sent:  {}", format_bytes(&bytes));

    let reply = transport
        .read_line(Duration::from_millis(cli.read_timeout_ms))
        .await?;
    if reply.is_empty() {
        println!("reply: (none)");
    } else {
        println!("reply: {}", format_bytes(&reply));
    }

    transport.close().await?;
    Ok(())
}

async fn cmd_status(cli: &Cli) -> Result<()> {
    cmd_send(cli, STATUS_REQUEST, None, false).await
}

async fn cmd_fire(cli: &Cli, config: ShotConfig, dry_run: bool, yes: bool) -> Result<()> {
    config.validate()?;

    if dry_run {
        for step in plan(&config)? {
            println!("{step}");
        }
        return Ok(());
    }

    if config.num_shots > 0 && !yes {
        println!(
            "WARNING: This will fire the laser {} time(s) at {:.1} %.",
            config.num_shots, config.power_percent
        );
        if !confirm("Continue? [y/N] ") {
            println!("Aborted.");
            return Ok(());
        }
    }

    tracing::info!(
        power = config.power_percent,
        shots = config.num_shots,
        confirmed_by_flag = yes,
        "Firing"
    );

    let transport = open_port(cli).await?;
    let mut sequencer = ShotSequencer::new(transport, config)?;

    println!("Setting the power to {:.1} percent.", sequencer.config().power_percent);
    let report = sequencer.run().await.context("shot sequence failed")?;

    if report.status_reply.is_empty() {
        println!("Controller status: (no reply)");
    } else {
        println!("Controller status: {}", format_bytes(&report.status_reply));
    }
    println!("Fired {} shot(s).", report.shots_fired);

    sequencer.into_inner().close().await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.baud == 0 {
        bail!("--baud must be non-zero");
    }

    match &cli.command {
        Command::List => cmd_list(),
        Command::Encode {
            command,
            data,
            checksum,
        } => cmd_encode(command, data.as_deref(), *checksum),
        Command::Send {
            command,
            data,
            checksum,
        } => cmd_send(&cli, command, data.as_deref(), *checksum).await,
        Command::Status => cmd_status(&cli).await,
        Command::Fire {
            power,
            shot_time,
            delay,
            shots,
            dry_run,
            yes,
        } => {
            let config = ShotConfig::default()
                .power(*power)
                .shot_time(*shot_time)
                .delay(*delay)
                .shots(*shots)
                .read_timeout(Duration::from_millis(cli.read_timeout_ms));
            cmd_fire(&cli, config, *dry_run, *yes).await
        }
    }
}
