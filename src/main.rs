//! # SmartParallel CLI
//!
//! Command-line interface for printing text files through a SmartParallel
//! interface.
//!
//! ## Usage
//!
//! ```bash
//! # Print a file at 80 columns, wrapping on spaces
//! smartparallel print -f notes.txt
//!
//! # Condensed mode, hard wrap
//! smartparallel print -f listing.txt --columns 132 --wrap hard-split
//!
//! # See what would be printed without touching the hardware
//! smartparallel print -f notes.txt --dry-run
//!
//! # Show reflowed lines only
//! smartparallel preview -f notes.txt --columns 40
//!
//! # Ask the interface for its status
//! smartparallel status
//! ```

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use smartparallel::{
    ColumnWidth, DisplayLine, PrintConfig, SmartParallelError, WrapPolicy,
    protocol::query_status,
    reflow,
    text,
    transmit::{TransmissionResult, TransmitEvent, Transmitter},
    transport::{Channel, ConsoleChannel, HardwareChannel},
};

/// SmartParallel - print text files over a CTS-handshaked serial link
#[derive(Parser, Debug)]
#[command(name = "smartparallel")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON config file; flags override its values
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print a text file
    Print {
        /// File to print
        #[arg(short, long, value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        layout: LayoutArgs,

        #[command(flatten)]
        link: LinkArgs,

        /// Number of not-ready polls per line before giving up
        #[arg(long)]
        retry_limit: Option<u32>,

        /// Milliseconds between not-ready polls
        #[arg(long, value_name = "MS")]
        retry_delay_ms: Option<u64>,

        /// Write to stdout instead of the printer
        #[arg(long)]
        dry_run: bool,

        /// Echo each line to stdout as it is sent
        #[arg(long)]
        echo: bool,
    },

    /// Show the reflowed lines without printing
    Preview {
        /// File to reflow
        #[arg(short, long, value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Query the interface status
    Status {
        #[command(flatten)]
        link: LinkArgs,
    },
}

#[derive(Args, Debug)]
struct LayoutArgs {
    /// Number of columns: 40 (double width), 80 (normal) or 132 (condensed).
    /// Other values fall back to 80.
    #[arg(short, long)]
    columns: Option<usize>,

    /// How to handle lines longer than the column width.
    /// `truncate` discards everything past the last column.
    #[arg(short, long, value_enum)]
    wrap: Option<WrapPolicy>,
}

#[derive(Args, Debug)]
struct LinkArgs {
    /// Serial device
    #[arg(long)]
    device: Option<String>,

    /// Serial baud rate
    #[arg(long)]
    baud: Option<u32>,

    /// GPIO pin wired to CTS
    #[arg(long)]
    cts_pin: Option<u32>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(cli: Cli) -> Result<(), SmartParallelError> {
    let mut config = match &cli.config {
        Some(path) => PrintConfig::load(path)?,
        None => PrintConfig::default(),
    };

    match cli.command {
        Commands::Print {
            file,
            layout,
            link,
            retry_limit,
            retry_delay_ms,
            dry_run,
            echo,
        } => {
            layout.apply(&mut config);
            link.apply(&mut config);
            if let Some(limit) = retry_limit {
                config.retry_limit = limit;
            }
            if let Some(delay) = retry_delay_ms {
                config.retry_delay_ms = delay;
            }
            config.validate()?;

            let lines = load_lines(&file, &config)?;

            let result = if dry_run {
                send(ConsoleChannel::stdout(), &config, lines, false)?
            } else {
                let channel =
                    HardwareChannel::open(&config.device, config.baud_rate, config.cts_pin)?;
                send(channel, &config, lines, echo)?
            };

            let result = result.into_result()?;
            println!("Sent {} lines", result.lines_sent);
        }

        Commands::Preview { file, layout } => {
            layout.apply(&mut config);
            for line in load_lines(&file, &config)? {
                println!("{}", line);
            }
        }

        Commands::Status { link } => {
            link.apply(&mut config);
            config.validate()?;

            let mut channel =
                HardwareChannel::open(&config.device, config.baud_rate, config.cts_pin)?;
            let status = query_status(&mut channel, &config.command)?;
            if status.is_empty() {
                println!("(no response)");
            } else {
                println!("{}", status);
            }
        }
    }

    Ok(())
}

impl LayoutArgs {
    fn apply(&self, config: &mut PrintConfig) {
        if let Some(columns) = self.columns {
            config.columns = ColumnWidth::new(columns);
            if config.columns.get() != columns {
                tracing::warn!(
                    requested = columns,
                    "unsupported column width, using {}",
                    config.columns.get()
                );
            }
        }
        if let Some(wrap) = self.wrap {
            config.wrap_policy = wrap;
        }
    }
}

impl LinkArgs {
    fn apply(&self, config: &mut PrintConfig) {
        if let Some(device) = &self.device {
            config.device = device.clone();
        }
        if let Some(baud) = self.baud {
            config.baud_rate = baud;
        }
        if let Some(pin) = self.cts_pin {
            config.cts_pin = pin;
        }
    }
}

/// Read and reflow a text file
fn load_lines(file: &Path, config: &PrintConfig) -> Result<Vec<DisplayLine>, SmartParallelError> {
    let raw = text::read_lines(file)?;
    let lines = reflow(&raw, config.columns.get(), config.wrap_policy);

    tracing::info!(
        file = %file.display(),
        raw_lines = raw.len(),
        lines = lines.len(),
        columns = config.columns.get(),
        mode = %config.columns.mode(),
        "reflowed text"
    );
    Ok(lines)
}

/// Run the handshake over `channel`, reporting progress on stderr/stdout
fn send<C: Channel>(
    channel: C,
    config: &PrintConfig,
    lines: Vec<DisplayLine>,
    echo: bool,
) -> Result<TransmissionResult, SmartParallelError> {
    let echoed = if echo { lines.clone() } else { Vec::new() };

    let mut transmitter =
        Transmitter::new(channel, config.transmit_settings()).on_event(move |event| match event {
            TransmitEvent::Retry { .. } => eprint!("."),
            TransmitEvent::LineSent { line_index } => {
                if let Some(line) = echoed.get(*line_index) {
                    println!("{}", line);
                }
            }
            _ => {}
        });

    transmitter.transmit(&lines)
}
