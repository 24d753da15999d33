use anyhow::Context as _;
use clap::Parser;
use mimalloc::MiMalloc;
use platform::RunOptions;
use player::{PlayerApp, PlayerParams};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// TeraBox video player with popup blocking and ad-click tracking.
#[derive(Parser, Debug)]
#[command(name = "teraplay", version, about)]
struct Cli {
    /// Player page URL or bare query string, e.g. `videoId=1abc&title=Clip`.
    page: String,

    /// Verbose logging (same as PLAYER_DEBUG=1). RUST_LOG still wins.
    #[arg(long)]
    debug: bool,

    /// Print the page head (title, meta tags, JSON-LD) as JSON and exit.
    #[arg(long)]
    print_meta: bool,

    #[arg(long, default_value_t = 1024)]
    width: u32,

    #[arg(long, default_value_t = 768)]
    height: u32,
}

fn init_logging(debug: bool) {
    let debug = debug || std::env::var("PLAYER_DEBUG").is_ok_and(|v| v == "1");
    let default = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let params = PlayerParams::from_page_url(&cli.page)
        .with_context(|| format!("reading player parameters from {:?}", cli.page))?;
    log::debug!(
        "video={:?} title={:?} blocked={:?}",
        params.video_id,
        params.title,
        params.blocked_domains.as_slice()
    );

    let app = PlayerApp::new(params);

    if cli.print_meta {
        let head = app.page().meta().head(chrono::Utc::now());
        let json = serde_json::to_string_pretty(&head).context("encoding page head")?;
        println!("{json}");
        return Ok(());
    }

    platform::run(
        Box::new(app),
        RunOptions {
            width: cli.width,
            height: cli.height,
        },
    )
    .context("running player window")
}
