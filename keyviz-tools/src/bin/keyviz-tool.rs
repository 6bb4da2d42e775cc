use clap::{Parser, Subcommand};
use keyviz::device::hid::{self, HidUsage};
use keyviz::device::{AnalogInput, DeviceProbe, SysfsProbe};
use keyviz::Config;
use keyviz_tools::init_logging;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(
    name = "keyviz-tool",
    version,
    about = "Device and configuration helpers for keyviz"
)]
struct Cli {
    /// Debug logging to stderr
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List analog keyboards found under hidraw
    ListDevices {
        /// sysfs hidraw class directory
        #[arg(long, default_value = "/sys/class/hidraw")]
        class_dir: PathBuf,

        /// Directory holding the hidraw device nodes
        #[arg(long, default_value = "/dev")]
        dev_dir: PathBuf,
    },
    /// Print the HID usage for key codes such as KeyA or ArrowLeft
    Scancode {
        #[arg(required = true, value_name = "CODE")]
        codes: Vec<String>,
    },
    /// Print the simulated depth readings for one key press
    Ramp {
        /// Key code to press
        #[arg(default_value = "KeyA")]
        key: String,

        /// How long the key stays down
        #[arg(long, default_value_t = 400)]
        hold_ms: u64,

        /// YAML file with analog settings
        #[arg(short = 'c', long = "config")]
        config: Option<PathBuf>,
    },
    /// Load and validate a configuration file
    CheckConfig { file: PathBuf },
}

fn list_devices(class_dir: PathBuf, dev_dir: PathBuf) -> Result<(), ()> {
    let probe = SysfsProbe::new(class_dir, dev_dir);
    let found = probe.enumerate().map_err(|e| {
        eprintln!("Device enumeration failed: {}", e);
    })?;
    if found.is_empty() {
        println!("No analog keyboards found");
    }
    for info in found {
        println!("{}", info);
    }
    Ok(())
}

fn scancodes(codes: Vec<String>) -> Result<(), ()> {
    let mut missing = false;
    for code in codes {
        match hid::scancode(&code) {
            Some(sc) => {
                let usage = HidUsage::from(sc);
                println!("{:<14} 0x{:02X}  {:?}", code, sc, usage);
            }
            None => {
                println!("{:<14} -", code);
                missing = true;
            }
        }
    }
    if missing {
        Err(())
    } else {
        Ok(())
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<Config, ()> {
    let config = match path {
        Some(path) => Config::load(path),
        None => Ok(Config::default()),
    }
    .and_then(|config| config.validate().map(|_| config));
    config.map_err(|e| eprintln!("{}", e))
}

fn ramp(key: String, hold_ms: u64, config: Option<PathBuf>) -> Result<(), ()> {
    let config = load_config(config.as_ref())?;
    let poll = config.analog.poll_ms;
    let mut input = AnalogInput::simulated(config.ramp(), config.analog.threshold);
    let key: Arc<str> = key.into();
    let held = [key];
    let released: [Arc<str>; 0] = [];

    println!("{:>6}  {:>6}", "t(ms)", "depth");
    let mut t = 0;
    loop {
        t += poll;
        let down = t <= hold_ms;
        let keys: &[Arc<str>] = if down { &held } else { &released };
        let readings = input.poll(keys, t);
        for reading in &readings {
            println!("{:>6}  {:>6.3}", t, reading.depth);
        }
        if !down && readings.iter().any(|r| r.depth == 0.0) {
            break;
        }
        // hold shorter than one poll: the key was never seen
        if !down && t > hold_ms + poll * 64 {
            break;
        }
    }
    Ok(())
}

fn check_config(file: PathBuf) -> Result<(), ()> {
    let config = load_config(Some(&file))?;
    println!("{:#?}", config);
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let _ = init_logging(None, cli.verbose, true);

    let result = match cli.command {
        Commands::ListDevices { class_dir, dev_dir } => list_devices(class_dir, dev_dir),
        Commands::Scancode { codes } => scancodes(codes),
        Commands::Ramp {
            key,
            hold_ms,
            config,
        } => ramp(key, hold_ms, config),
        Commands::CheckConfig { file } => check_config(file),
    };

    if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        eprintln!("FAILED");
        ExitCode::FAILURE
    }
}
