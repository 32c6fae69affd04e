//! `avocado` - send single commands to actuators on a serial line.
//!
//! Usage examples:
//!
//! ```text
//! avocado --port /dev/ttyACM0 velocity 1 50.0
//! avocado --port COM7 --position-unit degrees position 3 -90
//! avocado --config bus.yaml get 3 temperature
//! avocado --dry-run demo
//! ```

use anyhow::{Context, Result};
use avocado_comm::{
    CommConfig, Communicator, PositionUnit, Reply, SimulatedBus, Transport, VelocityUnit,
};
use avocado_protocol::{Address, ChecksumEncoding};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Address, velocity and default velocity unit used by the `demo` command.
const DEMO_ADDRESS: Address = Address(1337);
const DEMO_VELOCITY: f64 = 50.0;
const DEMO_VELOCITY_UNIT: VelocityUnit = VelocityUnit::Rpm;

#[derive(Parser, Debug)]
#[command(name = "avocado", version, about = "Drive Avocado actuators over a shared serial line")]
struct Cli {
    /// YAML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Serial device (overrides the configuration file).
    #[arg(short, long)]
    port: Option<String>,

    /// Baud rate.
    #[arg(long)]
    baud: Option<u32>,

    /// Read timeout per poll, in milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Unit for positions.
    #[arg(long, value_enum)]
    position_unit: Option<PositionUnit>,

    /// Unit for velocities.
    #[arg(long, value_enum)]
    velocity_unit: Option<VelocityUnit>,

    /// Checksum rendering.
    #[arg(long, value_enum)]
    checksum: Option<ChecksumArg>,

    /// Talk to simulated actuators instead of a serial port.
    #[arg(long)]
    dry_run: bool,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rotate to a position.
    Position {
        address: u16,
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },
    /// Rotate at a velocity.
    Velocity {
        address: u16,
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },
    /// Drive at a current in amperes.
    Current {
        address: u16,
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },
    /// Read a value from an actuator.
    Get {
        address: u16,
        #[arg(value_enum)]
        quantity: Quantity,
    },
    /// Spin actuator 1337 at 50 RPM and print the reply.
    ///
    /// The velocity is read in RPM unless --velocity-unit says otherwise.
    Demo,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Quantity {
    Position,
    Velocity,
    Current,
    Temperature,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ChecksumArg {
    Decimal,
    Padded,
}

impl From<ChecksumArg> for ChecksumEncoding {
    fn from(arg: ChecksumArg) -> Self {
        match arg {
            ChecksumArg::Decimal => ChecksumEncoding::Decimal,
            ChecksumArg::Padded => ChecksumEncoding::Padded,
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(cli: &Cli) -> Result<CommConfig> {
    let mut config = match &cli.config {
        Some(path) => CommConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => CommConfig::default(),
    };

    if let Some(port) = &cli.port {
        config.port = port.clone();
    }
    if let Some(baud) = cli.baud {
        config.baud_rate = baud;
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.timeout_ms = timeout_ms;
    }
    if let Some(unit) = cli.position_unit {
        config.position_unit = unit;
    }
    match (cli.velocity_unit, &cli.command) {
        (Some(unit), _) => config.velocity_unit = unit,
        (None, Commands::Demo) => config.velocity_unit = DEMO_VELOCITY_UNIT,
        (None, _) => {}
    }
    if let Some(checksum) = cli.checksum {
        config.checksum = checksum.into();
    }

    config.validate()?;
    Ok(config)
}

fn execute<T: Transport>(comm: &mut Communicator<T>, command: &Commands) -> Result<Reply> {
    let reply = match *command {
        Commands::Position { address, value } => comm.rotate_to_position(Address(address), value)?,
        Commands::Velocity { address, value } => comm.rotate_at_velocity(Address(address), value)?,
        Commands::Current { address, value } => comm.rotate_at_current(Address(address), value)?,
        Commands::Get { address, quantity } => {
            let address = Address(address);
            match quantity {
                Quantity::Position => comm.get_position(address)?,
                Quantity::Velocity => comm.get_velocity(address)?,
                Quantity::Current => comm.get_current(address)?,
                Quantity::Temperature => comm.get_temperature(address)?,
            }
        }
        Commands::Demo => {
            info!("Running demo against actuator {}", DEMO_ADDRESS);
            comm.rotate_at_velocity(DEMO_ADDRESS, DEMO_VELOCITY)?
        }
    };
    Ok(reply)
}

fn print_reply(reply: &Reply) {
    match reply {
        Some(text) => println!("{}", text),
        None => println!("(no reply)"),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = build_config(&cli)?;

    let reply = if cli.dry_run {
        let (transport, _peer) = SimulatedBus::new(config.checksum).into_transport();
        let mut comm = Communicator::with_config(transport, &config);
        let reply = execute(&mut comm, &cli.command)?;
        comm.close();
        reply
    } else {
        let mut comm = Communicator::open(&config)
            .with_context(|| format!("opening actuator line on {}", config.port))?;
        let reply = execute(&mut comm, &cli.command)?;
        comm.close();
        reply
    };

    print_reply(&reply);
    Ok(())
}
