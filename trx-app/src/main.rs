// trxd -- bootstraps the trxlib transceiver pipeline from the command line.
//
// The binary drives the scriptable mock backend from trxlib-test-harness;
// the device argument string selects its behaviour, so every bootstrap
// path can be exercised without radio hardware.
//
// Usage:
//   trxd -c 2
//   trxd -m -c 4 -l DEBUG
//   trxd -a "capability=1" -c 2          # resampling device, fails on chan 1
//   trxd -a "missing-fifo=1" -c 2
//   trxd -x -t 20

use std::net::IpAddr;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};

use trxlib::{ConfigError, Lifecycle, ShutdownFlag, TrxConfig, TrxOptions};
use trxlib_test_harness::MockBackend;

/// trxd -- multi-channel GSM transceiver bootstrap.
#[derive(Parser, Debug)]
#[command(name = "trxd", version, about)]
struct Cli {
    /// Device args (mock script: capability=<n>, fail-open, missing-fifo=<n>, ...)
    #[arg(short = 'a', value_name = "ARGS")]
    dev_args: Option<String>,

    /// Logging level (EMERG, ALERT, CRT, ERR, WARNING, NOTICE, INFO, DEBUG)
    #[arg(short = 'l', value_name = "LEVEL")]
    log_level: Option<String>,

    /// Remote address of the GSM core
    #[arg(short = 'i', value_name = "ADDR")]
    remote_addr: Option<IpAddr>,

    /// Bind to this address
    #[arg(short = 'j', value_name = "ADDR")]
    local_addr: Option<IpAddr>,

    /// Base port number
    #[arg(short = 'p', value_name = "PORT")]
    port: Option<u16>,

    /// Enable EDGE receiver
    #[arg(short = 'e')]
    edge: bool,

    /// Enable multi-ARFCN transceiver
    #[arg(short = 'm')]
    multi_arfcn: bool,

    /// Enable external 10 MHz reference
    #[arg(short = 'x')]
    external_reference: bool,

    /// Enable GPSDO reference
    #[arg(short = 'g')]
    gps_reference: bool,

    /// Tx samples-per-symbol (1 or 4)
    #[arg(short = 's', value_name = "SPS")]
    tx_sps: Option<u32>,

    /// Rx samples-per-symbol (1 or 4)
    #[arg(short = 'b', value_name = "SPS")]
    rx_sps: Option<u32>,

    /// Number of ARFCN channels
    #[arg(short = 'c', value_name = "CHANS")]
    chans: Option<usize>,

    /// Enable C0 filler table
    #[arg(short = 'f')]
    filler_table: bool,

    /// Baseband frequency offset in Hz
    #[arg(short = 'o', value_name = "HZ", allow_negative_numbers = true)]
    offset: Option<f64>,

    /// Random normal burst test mode with given TSC
    #[arg(short = 'r', value_name = "TSC")]
    tsc: Option<u32>,

    /// Random access burst test mode with given delay
    #[arg(short = 'A', value_name = "DELAY")]
    rach_delay: Option<u32>,

    /// RSSI to dBm offset in dB
    #[arg(short = 'R', value_name = "DB", allow_negative_numbers = true)]
    rssi_offset: Option<f64>,

    /// Swap channels (UmTRX only)
    #[arg(short = 'S')]
    swap_channels: bool,

    /// SCHED_RR real-time priority (1..99)
    #[arg(short = 't', value_name = "PRIO")]
    sched_rr: Option<i32>,
}

impl Cli {
    /// Fold the flags into validator input.
    ///
    /// Filler flags are applied lowest precedence first, so `-A` wins over
    /// `-r`, which wins over `-f`.
    fn to_options(&self) -> TrxOptions {
        let mut opts = TrxOptions::new()
            .edge(self.edge)
            .multi_arfcn(self.multi_arfcn)
            .external_reference(self.external_reference)
            .gps_reference(self.gps_reference)
            .swap_channels(self.swap_channels);

        if let Some(args) = &self.dev_args {
            opts = opts.device_args(args);
        }
        if let Some(level) = &self.log_level {
            opts = opts.log_level(level);
        }
        if let Some(addr) = self.remote_addr {
            opts = opts.remote_addr(addr);
        }
        if let Some(addr) = self.local_addr {
            opts = opts.local_addr(addr);
        }
        if let Some(port) = self.port {
            opts = opts.port(port);
        }
        if let Some(sps) = self.tx_sps {
            opts = opts.tx_sps(sps);
        }
        if let Some(sps) = self.rx_sps {
            opts = opts.rx_sps(sps);
        }
        if let Some(chans) = self.chans {
            opts = opts.chans(chans);
        }
        if let Some(hz) = self.offset {
            opts = opts.offset(hz);
        }
        if let Some(db) = self.rssi_offset {
            opts = opts.rssi_offset(db);
        }
        if let Some(priority) = self.sched_rr {
            opts = opts.sched_rr(priority);
        }

        if self.filler_table {
            opts = opts.filler_table();
        }
        if let Some(tsc) = self.tsc {
            opts = opts.normal_burst_test(tsc);
        }
        if let Some(delay) = self.rach_delay {
            opts = opts.access_burst_test(delay);
        }
        opts
    }
}

/// Parse the command line and validate it.
///
/// `None` means the invocation ended at usage: `-h`, `--version`, a
/// malformed flag, or a rejected combination. All of those exit 0.
fn configure() -> Option<TrxConfig> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help and version go to stdout, parse errors to stderr.
            let _ = e.print();
            return None;
        }
    };

    match cli.to_options().validate() {
        Ok(config) => Some(config),
        Err(e) => {
            eprintln!("{e}");
            if let ConfigError::UnknownLogLevel(_) = e {
                eprintln!("Valid levels: {}", trxlib::logging::LOG_LEVEL_NAMES);
            }
            eprintln!();
            let _ = Cli::command().print_help();
            None
        }
    }
}

async fn serve(config: &TrxConfig) -> Result<ExitCode> {
    let backend = MockBackend::from_device_args(config.device_args())
        .context("invalid mock device arguments")?;

    let mut lifecycle = Lifecycle::new(ShutdownFlag::new());
    let result = trxlib::run(config, &backend, &mut lifecycle).await;
    Ok(trxlib::exit_code(&result))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let Some(config) = configure() else {
        return ExitCode::SUCCESS;
    };

    trxlib::logging::init(config.log_level());

    match serve(&config).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
