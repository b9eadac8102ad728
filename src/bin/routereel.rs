use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use routereel::{
    PngDirSink, Rate, RenderOpts, Route, RouteRenderer, StaticMapClient, StaticMapOpts, Waypoint,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "routereel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the route summary and the sample timeline.
    Inspect(InspectArgs),
    /// Render one static-map PNG per tick.
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Input track (.kml or .json).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Seconds of route time between two samples.
    #[arg(long, default_value_t = 1.0)]
    rate: f64,

    /// Print JSON instead of a table.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input track (.kml or .json).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory for numbered PNG frames.
    #[arg(long, default_value = "output")]
    out: PathBuf,

    /// Seconds of route time between two frames.
    #[arg(long, default_value_t = 1.0)]
    rate: f64,

    /// Static map API key.
    #[arg(long, env = "ROUTEREEL_API_KEY", hide_env_values = true, default_value = "")]
    api_key: String,

    /// Static map endpoint.
    #[arg(long)]
    endpoint: Option<String>,

    /// Map zoom level.
    #[arg(long, default_value_t = 17)]
    zoom: u8,

    /// Map size as WIDTHxHEIGHT.
    #[arg(long, default_value = "400x400", value_parser = parse_size)]
    size: (u32, u32),

    /// Minimum digits in frame file names.
    #[arg(long, default_value_t = 4)]
    digits: usize,

    /// Fetch again even when a position/icon pair was already fetched.
    #[arg(long, default_value_t = false)]
    no_reuse: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Inspect(args) => cmd_inspect(args),
        Command::Render(args) => cmd_render(args),
    }
}

#[derive(serde::Serialize)]
struct SampleRow<'a> {
    index: u64,
    at_secs: f64,
    became_active: bool,
    waypoint: &'a Waypoint,
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let route = Route::from_path(&args.in_path)
        .with_context(|| format!("load route '{}'", args.in_path.display()))?;
    let rate = Rate::from_secs_f64(args.rate)?;
    let rows: Vec<SampleRow<'_>> = route
        .play(rate)?
        .map(|s| SampleRow {
            index: s.index.0,
            at_secs: s.at_secs(),
            became_active: s.became_active,
            waypoint: s.payload,
        })
        .collect();

    if args.json {
        let out = serde_json::json!({
            "summary": route.summary(),
            "rate_secs": rate.as_secs_f64(),
            "samples": rows,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let summary = route.summary();
    println!(
        "{} waypoints, {} -> {} ({}s), {} samples at {rate}",
        summary.waypoints,
        summary.start,
        summary.stop,
        summary.duration_secs,
        rows.len()
    );
    for row in &rows {
        println!(
            "{:>6} {:>10.3}s {} {:.6},{:.6} {}",
            row.index,
            row.at_secs,
            if row.became_active { "*" } else { " " },
            row.waypoint.latitude,
            row.waypoint.longitude,
            row.waypoint.icon_ref
        );
    }
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let route = Route::from_path(&args.in_path)
        .with_context(|| format!("load route '{}'", args.in_path.display()))?;
    let rate = Rate::from_secs_f64(args.rate)?;

    let mut opts = StaticMapOpts::new(args.api_key);
    if let Some(endpoint) = args.endpoint {
        opts.endpoint = endpoint;
    }
    opts.zoom = args.zoom;
    (opts.width, opts.height) = args.size;

    let client = StaticMapClient::new(opts)?;
    let mut renderer = RouteRenderer::new(
        client,
        RenderOpts {
            reuse_fetched: !args.no_reuse,
        },
    );
    let mut sink = PngDirSink::new(&args.out).with_digits(args.digits);
    let stats = renderer.render(&route, rate, &mut sink)?;

    eprintln!(
        "wrote {} frames ({} fetched) to {}",
        stats.frames,
        stats.fetches,
        args.out.display()
    );
    Ok(())
}

fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let w = w.trim().parse::<u32>().map_err(|e| format!("bad width: {e}"))?;
    let h = h.trim().parse::<u32>().map_err(|e| format!("bad height: {e}"))?;
    Ok((w, h))
}
