mod args;
mod routes;
mod server;

use culturo_core::model::{Activity, ActivityStars, MAX_STARS_PER_REGION, Region};
use services::{AppServices, ProgressService, StartMode};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::args::{Args, Command, print_usage};
use crate::server::AppState;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn print_region(region: &Region, stars: &ActivityStars) {
    println!("{region} ({}/{MAX_STARS_PER_REGION})", stars.total());
    for name in Activity::KNOWN {
        println!("  {name}: {}", stars.get(name).render());
    }
    // activities written by callers outside the known set
    for (activity, count) in stars.iter() {
        if !Activity::KNOWN.contains(&activity.as_str()) {
            println!("  {activity}: {}", count.render());
        }
    }
}

async fn show(progress: &ProgressService, region: Option<Region>) {
    match region {
        Some(region) => {
            let stars = progress.region_stars(&region).await;
            print_region(&region, &stars);
        }
        None => {
            let record = progress.all_stars().await;
            for (region, stars) in record.iter() {
                print_region(region, stars);
            }
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse(std::env::args().skip(1), |key| std::env::var(key).ok()).map_err(
        |e| {
            eprintln!("{e}");
            print_usage();
            e
        },
    )?;

    if args.command == Command::Help {
        print_usage();
        return Ok(());
    }

    let mode = if args.starts_fresh() {
        StartMode::Fresh
    } else {
        StartMode::Resume
    };
    // Constructed once here and shared with every handler.
    let services = AppServices::new_json_file(&args.data_path, mode).await?;
    let progress = services.progress();
    info!(path = %args.data_path.display(), "progress store ready");

    match args.command {
        Command::Serve => {
            server::run(AppState::new(progress), args.addr).await?;
        }
        Command::Show(region) => show(&progress, region).await,
        Command::Total(region) => {
            println!("{}", progress.total_stars(region.as_ref()).await);
        }
        Command::Stats => {
            let stats = progress.overall_stats().await;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Command::Progress(region) => {
            let report = progress.region_progress(&region).await;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Set {
            region,
            activity,
            stars,
        } => {
            let stored = progress.try_set_stars(&region, &activity, stars).await?;
            println!("{region} / {activity}: {}", stored.render());
        }
        Command::Reset => {
            progress.try_reset_all().await?;
            println!("all progress reset");
        }
        Command::Help => print_usage(),
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
