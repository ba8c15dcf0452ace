mod action;
mod app;
mod event;
mod ui;

use std::io::{self, Write};
use std::ops::ControlFlow;
use std::path::PathBuf;

use app::App;
use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use crossterm::event::KeyEventKind;
use event::{Event, EventHandler};
use hostmon::config::{self, Config, load_config, load_config_from_path};
use hostmon::logging;
use hostmon::scheduler::Scheduler;
use hostmon::system::kill::ProcessController;
use hostmon::system::registry::ProcessRegistry;
use hostmon::system::sampler::SystemSampler;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "hostmon",
    about = "Local host monitor: CPU/memory/disk history and a searchable process list"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Sampling period in milliseconds
    #[arg(long, env = "HOSTMON_REFRESH_MS")]
    refresh_rate: Option<u64>,

    /// Number of samples kept per metric
    #[arg(long, env = "HOSTMON_WINDOW")]
    window: Option<usize>,

    /// Path whose filesystem usage is reported as disk usage
    #[arg(long, env = "HOSTMON_DISK_PATH")]
    disk_path: Option<PathBuf>,

    /// Write JSON log lines to this file
    #[arg(long, env = "HOSTMON_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Initial process search text
    #[arg(long)]
    filter: Option<String>,

    /// Print one JSON line per tick instead of drawing the terminal UI
    #[arg(long, default_value_t = false)]
    headless: bool,

    /// Number of ticks in headless mode (0 runs until interrupted)
    #[arg(long, default_value_t = 0)]
    iterations: usize,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    if cli.iterations > 0 && !cli.headless {
        return Err(eyre!("--iterations only applies together with --headless"));
    }
    let config = load_config_for_cli(&cli);
    init_logging(&config, cli.headless)?;

    let scheduler = build_scheduler(&config.general);
    info!(
        period_ms = scheduler.period().as_millis() as u64,
        window = scheduler.series().capacity(),
        disk_path = %config.general.disk_path.display(),
        headless = cli.headless,
        "starting"
    );

    let filter = cli.filter.clone().unwrap_or_default();
    if cli.headless {
        return run_headless(scheduler, &filter, cli.iterations).await;
    }

    let mut terminal = ratatui::init();
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let app = App::new(&config, scheduler, ProcessController::new(), filter);
    let result = run(&mut terminal, app).await;

    ratatui::restore();
    result
}

fn build_scheduler(general: &config::GeneralConfig) -> Scheduler {
    Scheduler::new(
        general.refresh_period(),
        general.window_capacity(),
        SystemSampler::new(general.disk_path.clone()),
        ProcessRegistry::system(),
    )
}

async fn run(terminal: &mut ratatui::DefaultTerminal, mut app: App) -> Result<()> {
    let mut events = EventHandler::new(app.period());

    terminal.draw(|frame| ui::draw(frame, &mut app))?;

    while app.running {
        let Some(event) = events.next().await else {
            break;
        };
        match event {
            Event::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let action = app.map_key(key);
                app.dispatch(action);
            }
            Event::Tick => app.on_tick(),
            Event::Resize => {}
        }
        app.expire_status();
        terminal.draw(|frame| ui::draw(frame, &mut app))?;
    }

    Ok(())
}

async fn run_headless(mut scheduler: Scheduler, filter: &str, iterations: usize) -> Result<()> {
    let limit = (iterations > 0).then_some(iterations);
    let mut stdout = io::stdout().lock();
    let mut write_error: Option<io::Error> = None;

    scheduler
        .run(filter, limit, |update| {
            let written = serde_json::to_writer(&mut stdout, update)
                .map_err(io::Error::from)
                .and_then(|()| writeln!(stdout))
                .and_then(|()| stdout.flush());
            match written {
                Ok(()) => ControlFlow::Continue(()),
                Err(err) => {
                    write_error = Some(err);
                    ControlFlow::Break(())
                }
            }
        })
        .await;

    match write_error {
        // The reader went away (e.g. `| head`); nothing left to report.
        Some(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

fn init_logging(config: &Config, headless: bool) -> Result<()> {
    match (&config.general.log_file, headless) {
        (Some(path), _) => logging::init_json_file(path),
        (None, true) => logging::init_stderr(),
        // stdout belongs to the terminal UI
        (None, false) => Ok(()),
    }
}

fn load_config_for_cli(cli: &Cli) -> Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(rate) = cli.refresh_rate {
        config.general.refresh_rate_ms = rate;
    }
    if let Some(window) = cli.window {
        config.general.window_capacity = window;
    }
    if let Some(ref path) = cli.disk_path {
        config.general.disk_path = path.clone();
    }
    if let Some(ref path) = cli.log_file {
        config.general.log_file = Some(path.clone());
    }

    config
}
