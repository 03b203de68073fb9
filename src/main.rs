use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dye_color::{
    Catalog, ConversionCache, DistanceMetric, Dye, HarmonyEngine, HarmonyKind, HarmonyResult,
};
use dyematch::assets::AssetSource;
use dyematch::error::AppError;
use dyematch::models::AppConfig;
use dyematch::services::catalog_loader::{find_dye, load_catalog};
use dyematch::services::{
    decode_png_pixels, extract_palette, Locale, PriceService, TranslationTable,
};

#[derive(Parser)]
#[command(name = "dyematch")]
#[command(about = "Match colors to the dye catalog and derive hue harmonies")]
struct Cli {
    /// Output language for dye names (en, ja, de, fr)
    #[arg(long, global = true, default_value = "en")]
    locale: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the dyes closest to a color
    Match {
        /// Input color as hex, e.g. "#FF5733" or "F53"
        hex: String,

        /// Distance metric: rgb, cie76, cie2000, oklab, hyab, oklch-weighted
        #[arg(short, long)]
        metric: Option<String>,

        /// Number of matches to show
        #[arg(short, long, default_value_t = 5)]
        limit: usize,

        /// Only show dyes within this distance
        #[arg(long)]
        max_distance: Option<f64>,
    },
    /// Derive a harmony set from a color
    Harmony {
        /// Harmony kind: complementary, analogous, triadic, square,
        /// tetradic, split-complementary, compound, shades
        kind: String,

        /// Anchor color as hex
        hex: String,

        /// Distance metric used to resolve the anchor
        #[arg(short, long)]
        metric: Option<String>,
    },
    /// Tonal variants of a color within its hue neighbourhood
    Mono {
        /// Anchor color as hex
        hex: String,

        /// Number of variants to show
        #[arg(short, long, default_value_t = 5)]
        limit: usize,
    },
    /// Extract a dominant palette from a PNG and match each color
    Palette {
        /// Input image
        image: PathBuf,

        /// Number of palette clusters
        #[arg(short = 'k', long, default_value_t = 6)]
        clusters: usize,
    },
    /// Look up the market price of a dye
    Price {
        /// Dye item id, name, or unique name fragment
        dye: String,

        /// World to query (defaults to the configured world)
        #[arg(short, long)]
        world: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let locale =
        Locale::parse_name(&cli.locale).ok_or_else(|| AppError::UnknownLocale(cli.locale.clone()))?;

    match cli.command {
        Some(Commands::Match {
            hex,
            metric,
            limit,
            max_distance,
        }) => run_match(&hex, metric.as_deref(), limit, max_distance, locale),
        Some(Commands::Harmony { kind, hex, metric }) => {
            run_harmony(&kind, &hex, metric.as_deref(), locale)
        }
        Some(Commands::Mono { hex, limit }) => run_mono(&hex, limit, locale),
        Some(Commands::Palette { image, clusters }) => run_palette(&image, clusters, locale),
        Some(Commands::Price { dye, world }) => run_price(&dye, world.as_deref()),
        None => {
            run_status();
            Ok(())
        }
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dyematch=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

/// Load config, catalog, and name table, and build the engine.
fn build_engine() -> anyhow::Result<(AppConfig, HarmonyEngine, TranslationTable)> {
    let config = AppConfig::load();
    let assets = AssetSource::from_config(&config);

    let catalog = Arc::new(load_catalog(&assets.read_catalog()?)?);
    let names = TranslationTable::from_csv(&assets.read_names()?)
        .map_err(AppError::Translation)?;

    let cache = Arc::new(ConversionCache::with_capacity(
        config.conversion_cache_capacity,
    ));
    let engine = HarmonyEngine::new(catalog).with_cache(cache);

    Ok((config, engine, names))
}

fn resolve_metric(config: &AppConfig, flag: Option<&str>) -> Result<DistanceMetric, AppError> {
    match flag {
        Some(name) => {
            DistanceMetric::parse_name(name).ok_or_else(|| AppError::UnknownMetric(name.to_string()))
        }
        None => Ok(config.metric()),
    }
}

fn print_dye(dye: &Dye, names: &TranslationTable, locale: Locale, detail: &str) {
    println!(
        "  {:<28} {}  {:<8} {}",
        names.display_name(dye, locale),
        dye.rgb(),
        dye.category(),
        detail
    );
}

fn run_match(
    hex: &str,
    metric: Option<&str>,
    limit: usize,
    max_distance: Option<f64>,
    locale: Locale,
) -> anyhow::Result<()> {
    let (config, engine, names) = build_engine()?;
    let metric = resolve_metric(&config, metric)?;

    let hits = engine.matcher().within(
        hex,
        max_distance.unwrap_or(f64::INFINITY),
        Some(limit),
        metric,
    )?;

    if hits.is_empty() {
        println!("No dye within range of {hex}.");
        return Ok(());
    }

    println!("Closest dyes to {hex} ({metric}):");
    for hit in &hits {
        print_dye(
            &hit.dye,
            &names,
            locale,
            &format!("distance {:.2}", hit.distance),
        );
    }
    Ok(())
}

fn run_harmony(
    kind: &str,
    hex: &str,
    metric: Option<&str>,
    locale: Locale,
) -> anyhow::Result<()> {
    let (config, engine, names) = build_engine()?;
    let kind =
        HarmonyKind::parse_name(kind).ok_or_else(|| AppError::UnknownHarmony(kind.to_string()))?;
    let metric = resolve_metric(&config, metric)?;

    let result = engine.harmony_with(kind, hex, metric)?;
    print_harmony(kind, hex, &result, &names, locale);
    Ok(())
}

fn print_harmony(
    kind: HarmonyKind,
    hex: &str,
    result: &HarmonyResult,
    names: &TranslationTable,
    locale: Locale,
) {
    let Some(anchor) = &result.anchor else {
        println!("No anchor dye found for {hex}.");
        return;
    };

    println!("{kind} harmony for {hex}:");
    print_dye(anchor, names, locale, "(anchor)");
    for slot in &result.slots {
        let detail = match (slot.offset, slot.fallback) {
            (Some(offset), false) => format!("offset {offset:+.0}\u{00B0}"),
            (Some(offset), true) => format!("offset {offset:+.0}\u{00B0} (closest available)"),
            (None, _) => "(complement)".to_string(),
        };
        print_dye(&slot.dye, names, locale, &detail);
    }
    if result.slots.is_empty() {
        println!("  (no companion dyes available)");
    }
}

fn run_mono(hex: &str, limit: usize, locale: Locale) -> anyhow::Result<()> {
    let (_, engine, names) = build_engine()?;
    let dyes = engine.monochromatic(hex, limit)?;

    if dyes.is_empty() {
        println!("No tonal variants near {hex}.");
        return Ok(());
    }
    println!("Tonal variants of {hex}:");
    for dye in &dyes {
        let hsv = dye.hsv();
        print_dye(
            dye,
            &names,
            locale,
            &format!("s {:.0} v {:.0}", hsv.s, hsv.v),
        );
    }
    Ok(())
}

fn run_palette(image: &PathBuf, clusters: usize, locale: Locale) -> anyhow::Result<()> {
    let (config, engine, names) = build_engine()?;
    let metric = config.metric();

    let pixels = decode_png_pixels(image)?;
    let mut rng = rand::thread_rng();
    let palette = extract_palette(&pixels, clusters, &mut rng);

    if palette.is_empty() {
        println!("No colors extracted from {}.", image.display());
        return Ok(());
    }

    println!("Palette of {} ({} pixels):", image.display(), pixels.len());
    for entry in &palette {
        println!("{}  {:.1}% of image", entry.rgb, entry.share * 100.0);
        if let Some(hit) = engine
            .matcher()
            .nearest(&entry.rgb.to_string(), &[], metric)?
        {
            print_dye(
                &hit.dye,
                &names,
                locale,
                &format!("distance {:.2}", hit.distance),
            );
        }
    }
    Ok(())
}

fn run_price(dye_query: &str, world: Option<&str>) -> anyhow::Result<()> {
    let (config, engine, _) = build_engine()?;
    let dye = find_dye(engine.catalog(), dye_query)
        .ok_or_else(|| AppError::UnknownDye(dye_query.to_string()))?;

    let world = world.unwrap_or(&config.default_world);
    let service = PriceService::new(&config).map_err(AppError::Price)?;
    let quote = service.quote(dye.id(), world).map_err(AppError::Price)?;

    println!("{} on {world}:", dye.name());
    match quote.lowest_listing {
        Some(price) => println!("  lowest listing: {price} gil"),
        None => println!("  no current listings"),
    }
    if let Some(avg) = quote.average_price {
        println!("  average price:  {avg:.0} gil");
    }
    println!(
        "  fetched {}{}",
        quote.fetched_at.format("%Y-%m-%d %H:%M UTC"),
        if quote.cached { " (cached)" } else { "" }
    );
    Ok(())
}

/// Bare invocation: show catalog, config, and cache status.
fn run_status() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    println!("dyematch v{VERSION}");
    println!("Match colors to the dye catalog and derive hue harmonies\n");

    let config = AppConfig::load();
    let assets = AssetSource::from_config(&config);

    println!("Asset Sources:");
    println!("  Catalog: {}", assets.catalog_source());
    println!("  Names:   {}", assets.names_source());

    match assets.read_catalog().map(|json| load_catalog(&json)) {
        Ok(Ok(catalog)) => {
            let facewear = catalog.len() - catalog.matchable_slots().len();
            println!("\nCatalog:");
            println!("  {} dyes ({} facewear, excluded from matching)", catalog.len(), facewear);
            print_category_counts(&catalog);
        }
        Ok(Err(e)) => println!("\nCatalog failed to load: {e}"),
        Err(e) => println!("\nCatalog failed to load: {e}"),
    }

    println!("\nConfiguration:");
    println!("  default world:  {}", config.default_world);
    println!("  default metric: {}", config.default_metric);
    println!("  price API:      {}", config.price_api_base);

    println!("\nCommands:");
    println!("  dyematch match <hex>            Find the closest dyes");
    println!("  dyematch harmony <kind> <hex>   Derive a harmony set");
    println!("  dyematch mono <hex>             Tonal variants");
    println!("  dyematch palette <image.png>    Extract and match a palette");
    println!("  dyematch price <dye>            Market price lookup");
    println!("\nRun 'dyematch --help' for more details.");
}

fn print_category_counts(catalog: &Catalog) {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for dye in catalog.dyes() {
        match counts.iter_mut().find(|(name, _)| name == dye.category()) {
            Some((_, count)) => *count += 1,
            None => counts.push((dye.category().to_string(), 1)),
        }
    }
    for (category, count) in counts {
        println!("    {category:<10} {count}");
    }
}
