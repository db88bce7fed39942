use anyhow::Context;
use clap::Parser;
use futures::StreamExt;
use lottosim_simulator::{config, Config, ConfigError, InlineExecutor, Ledger, Worker};
use lottosim_types::{CfgUpdate, Event, LimitConfig, LimitKind, Preset, Settings, Target};
use std::{path::PathBuf, str::FromStr};
use tracing::{info, warn, Level};

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless lottery simulator.", long_about = None)]
struct Args {
    /// Settings file (YAML, or JSON with a .json extension).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Game preset: classic6, mini5, megaMillions, powerball, euroMillions.
    #[arg(short, long)]
    preset: Option<String>,

    /// Stop after this many tickets (0 for no limit).
    #[arg(short, long, conflicts_with_all = ["minutes", "days"])]
    tickets: Option<u64>,

    /// Stop after this many minutes.
    #[arg(long, conflicts_with = "days")]
    minutes: Option<u64>,

    /// Stop after this many simulated days.
    #[arg(long)]
    days: Option<u64>,

    #[arg(long)]
    tickets_per_day: Option<u32>,

    #[arg(long)]
    batch_size: Option<u32>,

    /// Delay between batches in milliseconds.
    #[arg(long)]
    ui_delay: Option<u64>,

    /// Cap throughput at this many tickets per second.
    #[arg(long)]
    rate_cap: Option<u32>,

    /// Seed for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    stop_on_jackpot: bool,

    /// Winning main numbers, comma separated.
    #[arg(long, value_delimiter = ',')]
    target: Option<Vec<u16>>,

    /// Winning bonus number (with --target).
    #[arg(long, requires = "target")]
    bonus: Option<u16>,

    /// Run as if the host were backgrounded.
    #[arg(long)]
    background: bool,

    /// Run the worker on this runtime instead of a dedicated thread.
    #[arg(long)]
    inline: bool,

    /// Print every event as a JSON line on stdout.
    #[arg(long)]
    events: bool,

    #[arg(long, default_value = "info")]
    log_level: String,

    /// Structured (JSON) logs.
    #[arg(long)]
    json: bool,
}

impl Args {
    fn settings(&self) -> anyhow::Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => config::load(path)
                .with_context(|| format!("failed to load settings from {}", path.display()))?,
            None => Settings::default(),
        };
        if let Some(key) = &self.preset {
            let preset =
                Preset::from_key(key).ok_or_else(|| ConfigError::UnknownPreset(key.clone()))?;
            settings.apply_preset(preset);
        }
        if let Some(value) = self.tickets {
            settings.cfg.limit = LimitConfig::tickets(value);
        }
        if let Some(value) = self.minutes {
            settings.cfg.limit = LimitConfig {
                kind: LimitKind::Minutes,
                value,
            };
        }
        if let Some(value) = self.days {
            settings.cfg.limit = LimitConfig {
                kind: LimitKind::Days,
                value,
            };
        }
        if let Some(tickets_per_day) = self.tickets_per_day {
            settings.pricing.tickets_per_day = tickets_per_day;
        }
        if let Some(batch_size) = self.batch_size {
            settings.pricing.batch_size = batch_size;
        }
        if let Some(ui_delay) = self.ui_delay {
            settings.pricing.ui_delay_ms = ui_delay;
        }
        if let Some(rate_cap) = self.rate_cap {
            settings.eco.enabled = true;
            settings.eco.rate_cap_per_second = rate_cap;
        }
        if self.seed.is_some() {
            settings.seed = self.seed;
        }
        Ok(settings.normalize())
    }
}

enum Step {
    Event(Option<Event>),
    Interrupt,
}

/// Tracks when the event loop is done: the worker is idle after having run,
/// or after a stop was requested.
#[derive(Default)]
struct Progress {
    started: bool,
    stopping: bool,
}

impl Progress {
    fn stop_requested(&mut self) {
        self.stopping = true;
    }

    fn finished(&mut self, ledger: &Ledger) -> bool {
        self.started |= ledger.is_running();
        (self.started || self.stopping) && ledger.is_idle()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse args
    let args = Args::parse();

    // Create logger (stderr, so --events output stays parseable)
    let level = Level::from_str(&args.log_level).context("invalid log level")?;
    let logger = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr);
    if args.json {
        logger.json().init();
    } else {
        logger.init();
    }

    // Load settings
    let settings = args.settings()?;
    info!(
        preset = %settings.preset,
        limit = ?settings.cfg.limit,
        batch_size = settings.pricing.batch_size,
        "loaded settings"
    );
    if settings.cfg.limit.is_unlimited() {
        warn!("no run limit set, press ctrl-c to stop");
    }

    // Start worker
    let mut worker = if args.inline {
        Worker::with_executor(Config::default(), InlineExecutor::current()?)
    } else {
        Worker::spawn(Config::default())?
    };
    let mut ledger = Ledger::new(settings.log_cap);
    worker.mailbox.settings(settings).await?;
    worker
        .mailbox
        .cfg(CfgUpdate {
            stop_on_jackpot: args.stop_on_jackpot.then_some(true),
            hidden: args.background.then_some(true),
        })
        .await?;
    if let Some(main) = args.target.clone() {
        worker.mailbox.target(Target::new(main, args.bonus)).await?;
    }
    worker.mailbox.start().await?;

    // Consume events until the session ends
    let mut progress = Progress::default();
    loop {
        let step = tokio::select! {
            event = worker.events.next() => Step::Event(event),
            _ = tokio::signal::ctrl_c() => Step::Interrupt,
        };
        let event = match step {
            Step::Event(Some(event)) => event,
            Step::Event(None) => break,
            Step::Interrupt => {
                info!("interrupted, stopping session");
                worker.mailbox.stop().await?;
                progress.stop_requested();
                continue;
            }
        };
        if args.events {
            println!("{}", serde_json::to_string(&event)?);
        }
        if let Event::Advisory { kind } = &event {
            warn!(?kind, "worker degraded");
        }
        ledger.apply(&event);
        if progress.finished(&ledger) {
            break;
        }
    }
    worker.shutdown().await;

    // Report
    if args.events {
        eprint!("{}", ledger.summary());
    } else {
        print!("{}", ledger.summary());
    }
    Ok(())
}
