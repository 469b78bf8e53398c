mod canvas;
mod config;
mod format;
mod geoadmin;
mod geometry;
mod locator;

pub const USER_AGENT: &str = "Mozilla/5.0 QGIS Swiss MapGeoAdmin Locator Filter";

use std::time::Duration;

use clap::Parser;
use reqwest::Client;
use tracing::{debug, error, info};

use canvas::{IdentityTransform, RecordingCanvas, trigger_result};
use config::Settings;
use geoadmin::{Crs, GeoAdminClient, Lang};
use locator::{LocatorFilter, SearchOutcome};

/// TCP connection establishment timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Global HTTP client timeout covering DNS + connect + response body.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Search Swiss locations (geo.admin.ch) from the command line.
///
/// Flags override the `SWISS_LOCATOR_*` environment variables.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Search text (at least 2 characters)
    search: String,
    /// Response language; defaults to the locale
    #[arg(long, value_enum)]
    lang: Option<Lang>,
    /// Locale used when no language is configured (e.g. "German", "fr_CH.UTF-8"); defaults to $LANG
    #[arg(long)]
    locale: Option<String>,
    /// Coordinate system of the returned boxes
    #[arg(long, value_enum)]
    crs: Option<Crs>,
    /// Strip leading digits from group labels
    #[arg(long)]
    remove_leading_digits: bool,
    /// Replace underscores with spaces in group labels
    #[arg(long)]
    replace_underscore: bool,
    /// Split camel-case group labels into words
    #[arg(long)]
    break_camelcase: bool,
    /// Print results as JSON
    #[arg(long)]
    json: bool,
    /// Frame the N-th result (1-based) and print the resulting map extent
    #[arg(long, value_name = "N")]
    zoom: Option<usize>,
    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

impl Cli {
    fn settings(&self, mut settings: Settings) -> Settings {
        settings.lang = self.lang.or(settings.lang);
        settings.crs = self.crs.unwrap_or(settings.crs);
        settings.beautify.remove_leading_digits |= self.remove_leading_digits;
        settings.beautify.replace_underscore |= self.replace_underscore;
        settings.beautify.break_camelcase |= self.break_camelcase;
        settings
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let directive = if cli.debug {
        "swiss_locator=debug"
    } else {
        "swiss_locator=info"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(directive.parse()?),
        )
        .init();

    let locale = cli
        .locale
        .clone()
        .or_else(|| std::env::var("LANG").ok())
        .unwrap_or_default();

    let http = Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(HTTP_TIMEOUT)
        .build()?;
    let mut filter = LocatorFilter::new(GeoAdminClient::new(http), Settings::from_env()?, locale);
    filter.configure(cli.settings(*filter.settings()));
    debug!(
        filter = LocatorFilter::<GeoAdminClient>::NAME,
        prefix = LocatorFilter::<GeoAdminClient>::PREFIX,
        "filter ready"
    );

    let mut results = Vec::new();
    let outcome = {
        let search = filter.fetch_results(&cli.search, None, |r| results.push(r));
        tokio::pin!(search);
        tokio::select! {
            outcome = &mut search => outcome,
            _ = tokio::signal::ctrl_c() => {
                filter.cancel();
                search.await
            }
        }
    }
    .inspect_err(|e| error!("search failed: {e}"))?;

    match outcome {
        SearchOutcome::Skipped => {
            info!(
                "search text must have at least {} characters",
                geoadmin::MIN_SEARCH_CHARS
            );
            return Ok(());
        }
        SearchOutcome::Cancelled => return Ok(()),
        SearchOutcome::Rejected { status } => {
            error!(status, "search service returned an error, no results");
            return Ok(());
        }
        SearchOutcome::Completed { .. } => {}
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print!(
            "{}",
            format::format_results(
                LocatorFilter::<GeoAdminClient>::DISPLAY_NAME,
                &cli.search,
                &results,
                &filter.settings().beautify,
            )
        );
    }

    if let Some(n) = cli.zoom {
        let Some(result) = n.checked_sub(1).and_then(|i| results.get(i)) else {
            return Err(format!("--zoom {n}: only {} results", results.len()).into());
        };
        let crs = filter.settings().crs;
        let mut canvas = RecordingCanvas::new(crs.epsg());
        trigger_result(result, crs, &IdentityTransform, &mut canvas)?;
        if let (Some(h), Some(e)) = (canvas.highlighted, canvas.extent) {
            println!(
                "highlight {}: [{}, {}, {}, {}]\nextent {}: [{}, {}, {}, {}]",
                crs.authid(),
                h.xmin,
                h.ymin,
                h.xmax,
                h.ymax,
                crs.authid(),
                e.xmin,
                e.ymin,
                e.xmax,
                e.ymax
            );
        }
    }

    Ok(())
}
