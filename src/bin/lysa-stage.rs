use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use lysa_stage::{Element, HeadlessPage, Millis, ScrollSnapshot, Stage, StageConfig};

#[derive(Parser, Debug)]
#[command(name = "lysa-stage", version)]
struct Cli {
    /// Log orchestration decisions to stderr.
    #[arg(long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a page load headlessly and print the resulting state.
    Simulate(SimulateArgs),
    /// Print the scroll signals for one snapshot.
    Signals(SignalsArgs),
    /// Print the route table.
    Routes(RoutesArgs),
}

/// A value applied at a stage time, written `MS:VALUE`.
#[derive(Clone, Debug)]
struct Timed<T> {
    at: Millis,
    value: T,
}

impl<T: FromStr> FromStr for Timed<T> {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (at, value) = s
            .split_once(':')
            .ok_or_else(|| format!("expected MS:VALUE, got '{s}'"))?;
        let at = at
            .parse::<u64>()
            .map_err(|e| format!("bad time '{at}': {e}"))?;
        let value = value
            .parse::<T>()
            .map_err(|_| format!("bad value '{value}'"))?;
        Ok(Self {
            at: Millis(at),
            value,
        })
    }
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Stage configuration JSON. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path the page is loaded at.
    #[arg(long, default_value = "/")]
    path: String,

    /// Load a document without a preloader.
    #[arg(long, default_value_t = false)]
    no_preloader: bool,

    /// Scroll to OFFSET at MS, as `MS:OFFSET`. Repeatable.
    #[arg(long = "scroll")]
    scrolls: Vec<Timed<f64>>,

    /// Click a link at MS, as `MS:HREF`. Repeatable.
    #[arg(long = "click")]
    clicks: Vec<Timed<String>>,

    /// Press the browser back button at MS. Repeatable.
    #[arg(long = "back")]
    backs: Vec<u64>,

    /// Stage time to run until.
    #[arg(long, default_value_t = 15_000)]
    until: u64,

    /// Print the report as JSON.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Also print every recorded page mutation as JSON lines.
    #[arg(long, default_value_t = false)]
    journal: bool,
}

#[derive(Parser, Debug)]
struct SignalsArgs {
    #[arg(long)]
    config: Option<PathBuf>,

    /// Document scroll offset.
    #[arg(long)]
    offset: f64,

    /// Viewport height.
    #[arg(long, default_value_t = 800.0)]
    viewport_height: f64,
}

#[derive(Parser, Debug)]
struct RoutesArgs {
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug)]
enum Input {
    Scroll(f64),
    Click(String),
    Back,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Simulate(args) => cmd_simulate(args),
        Command::Signals(args) => cmd_signals(args),
        Command::Routes(args) => cmd_routes(args),
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<StageConfig> {
    let Some(path) = path else {
        return Ok(StageConfig::default());
    };
    let cfg = StageConfig::from_path(path)
        .with_context(|| format!("load stage config '{}'", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_ref())?;

    let mut page = HeadlessPage::new().at_path(args.path.clone());
    if args.no_preloader {
        page = page.without(Element::Preloader);
    }

    let mut inputs: Vec<(Millis, Input)> = Vec::new();
    inputs.extend(args.scrolls.into_iter().map(|t| (t.at, Input::Scroll(t.value))));
    inputs.extend(args.clicks.into_iter().map(|t| (t.at, Input::Click(t.value))));
    inputs.extend(args.backs.into_iter().map(|ms| (Millis(ms), Input::Back)));
    inputs.sort_by_key(|(at, _)| *at);

    let mut stage = Stage::load(page, cfg).context("load stage")?;
    for (at, input) in inputs {
        stage.advance_to(at);
        match input {
            Input::Scroll(offset) => stage.scroll_to_offset(offset),
            Input::Click(href) => {
                if !stage.on_link_click(&href) {
                    eprintln!("{at}: '{href}' not intercepted");
                }
            }
            Input::Back => {
                if stage.page_mut().back().is_some() {
                    stage.on_popstate();
                } else {
                    eprintln!("{at}: history is at its first entry");
                }
            }
        }
    }
    stage.advance_to(Millis(args.until));

    if args.journal {
        for op in stage.page().journal() {
            println!("{}", serde_json::to_string(op)?);
        }
    }

    let report = stage.report();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("time        {}", report.now);
    println!("phase       {:?}", report.phase);
    println!("location    {}", report.location);
    println!("deep link   {:?}", report.deep_link);
    println!(
        "effect      {:?} (loops {}, frames {})",
        report.gate, report.loops_started, report.frames_drawn
    );
    println!("samples     {}", report.samples);
    println!("navigations {}", report.navigations);
    if let Some(s) = report.signals {
        println!(
            "signals     hero {:.3} effect {:.3} indicator {:.3}",
            s.hero_fade, s.effect_opacity, s.indicator_fade
        );
    }
    Ok(())
}

fn cmd_signals(args: SignalsArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_ref())?;
    let signals = cfg.scroll.evaluate(ScrollSnapshot {
        offset: args.offset,
        viewport_height: args.viewport_height,
    });
    println!("{}", serde_json::to_string_pretty(&signals)?);
    Ok(())
}

fn cmd_routes(args: RoutesArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_ref())?;
    for route in cfg.routes.routes() {
        println!("{:<10} -> #{}", route.path, route.section);
    }
    Ok(())
}
