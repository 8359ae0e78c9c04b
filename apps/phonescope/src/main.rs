use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use phonescope_aggregate::{arg_min_by, count_by, mean_by, summarize};
use phonescope_bins::PriceBinTable;
use phonescope_filter::{filter_phones, PhoneFilter};
use phonescope_ingest_csv::load_source;
use phonescope_rank::{feature_heavy_keys, rank, refine_top, SortKey};
use phonescope_render_md as render;
use phonescope_schema::{FeatureFlag, Field, Record};

/// Columns shown by the buyer-facing `browse` table.
const BROWSE_COLUMNS: &[Field] = &[
    Field::ModelName,
    Field::Brand,
    Field::PriceInr,
    Field::ProcessorBrand,
    Field::ProcessorModel,
    Field::CoreCount,
    Field::RomGb,
    Field::RamGb,
    Field::TotalRearCameraMp,
    Field::RearCameraCount,
    Field::TotalFrontCameraMp,
    Field::FrontCameraCount,
    Field::DisplaySizeCm,
    Field::BatteryMah,
    Field::FastCharge,
    Field::FastChargeWatts,
    Field::FiveG,
    Field::Fingerprint,
    Field::Nfc,
    Field::OsType,
    Field::OsVersion,
];

/// Columns shown by the stock `top7` table.
const TOP7_COLUMNS: &[Field] = &[
    Field::ModelName,
    Field::PriceInr,
    Field::RomGb,
    Field::RamGb,
    Field::ProcessorBrand,
    Field::TotalRearCameraMp,
    Field::RearCameraCount,
    Field::TotalFrontCameraMp,
    Field::FrontCameraCount,
    Field::BatteryMah,
    Field::FastCharge,
    Field::FiveG,
    Field::Nfc,
];

#[derive(Parser, Debug)]
#[command(name = "phonescope")]
#[command(about = "Explore the smartphone dataset: filter, aggregate, rank.", long_about = None)]
struct Cli {
    /// CSV path or http(s) URL. If omitted, PHONESCOPE_DATA is used.
    #[arg(long, global = true)]
    data: Option<String>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Dataset size and phones per brand.
    Summary,

    /// Per-year price summary and model release counts for one brand.
    BrandTrend {
        #[arg(long)]
        brand: String,
    },

    /// Phones per price-range label, optionally narrowed by brand/year.
    PriceBins {
        #[arg(long)]
        brand: Option<String>,
        #[arg(long)]
        year: Option<i32>,
        /// Use the fine-grained buyer table instead of the coarse one.
        #[arg(long)]
        fine: bool,
    },

    /// Mean price per year, split by operating system.
    OsTrend,

    /// Cheapest phone per year among phones with a capability flag set.
    FeatureFloor {
        /// One of: 5g, nfc, fast_charge, fingerprint.
        #[arg(long)]
        feature: String,
        /// Comma-separated brands; when given, the floor is per year and
        /// brand.
        #[arg(long)]
        brands: Option<String>,
    },

    /// Per-processor-brand price summary with the max-min spread,
    /// ordered by count desc, spread desc, mean asc.
    ProcessorReport {
        /// Only phones released in or after this year.
        #[arg(long, default_value_t = 2021)]
        since: i32,
        /// Core-count label to restrict to.
        #[arg(long, default_value = "Octa")]
        cores: String,
    },

    /// Filtered record table sorted by price descending.
    Browse {
        #[arg(long)]
        brand: Option<String>,
        #[arg(long)]
        year: Option<i32>,
        /// Price-range label from the selected bin table.
        #[arg(long)]
        bin: String,
        #[arg(long)]
        fine: bool,
    },

    /// The 7 most feature-heavy phones for a year, optionally refined by
    /// up to 3 chosen features (price ascending breaks ties).
    Top7 {
        #[arg(long)]
        year: i32,
        #[arg(long)]
        brand: Option<String>,
        /// Comma-separated field names, e.g. ram_gb,rom_gb,battery_mah.
        #[arg(long)]
        features: Option<String>,
    },
}

fn load_dataset(data: Option<String>) -> Result<Vec<Record>> {
    let source = data
        .or_else(|| std::env::var("PHONESCOPE_DATA").ok())
        .context("no dataset given; pass --data or set PHONESCOPE_DATA")?;
    let report = load_source(&source)?;
    if !report.rejected.is_empty() {
        eprintln!(
            "WARN: rejected {} row(s) while loading {source}",
            report.rejected.len()
        );
        for row in &report.rejected {
            eprintln!("  line {}: {}", row.line, row.reason);
        }
    }
    Ok(report.records)
}

fn parse_fields(list: &str) -> Result<Vec<Field>> {
    list.split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.parse::<Field>().map_err(Into::into))
        .collect()
}

fn bin_table(fine: bool) -> PriceBinTable {
    if fine {
        PriceBinTable::fine()
    } else {
        PriceBinTable::coarse()
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let dataset = load_dataset(cli.data)?;

    match cli.cmd {
        Command::Summary => {
            println!("phones: {}\n", dataset.len());
            let counts = count_by(&dataset, &[Field::Brand]);
            print!("{}", render::count_table(&[Field::Brand], &counts));
        }

        Command::BrandTrend { brand } => {
            let subset = filter_phones(&dataset, &PhoneFilter::new().with_brand(&brand));
            let by_year = summarize(&subset, &[Field::ReleaseYear], Field::PriceInr)?;
            println!("## {brand}: price by year\n");
            print!("{}", render::summary_table(&[Field::ReleaseYear], &by_year));

            let releases = count_by(&subset, &[Field::ReleaseYear, Field::ModelName]);
            println!("\n## {brand}: model releases by year\n");
            print!(
                "{}",
                render::count_table(&[Field::ReleaseYear, Field::ModelName], &releases)
            );
        }

        Command::PriceBins { brand, year, fine } => {
            let mut filter = PhoneFilter::new();
            if let Some(brand) = brand {
                filter = filter.with_brand(brand);
            }
            if let Some(year) = year {
                filter = filter.with_year(year);
            }
            let subset = filter_phones(&dataset, &filter);

            let table = bin_table(fine);
            println!("| price_range | count |");
            println!("| --- | --- |");
            for label in table.labels() {
                let n = subset
                    .iter()
                    .filter(|r| table.assign(r.price_inr) == Some(label))
                    .count();
                println!("| {label} | {n} |");
            }
            let unassigned = subset
                .iter()
                .filter(|r| table.assign(r.price_inr).is_none())
                .count();
            if unassigned > 0 {
                eprintln!("WARN: {unassigned} phone(s) priced outside every bin");
            }
        }

        Command::OsTrend => {
            let means = mean_by(
                &dataset,
                &[Field::OsType, Field::ReleaseYear],
                Field::PriceInr,
            )?;
            print!(
                "{}",
                render::metric_table(&[Field::OsType, Field::ReleaseYear], &means, "mean_price")
            );
        }

        Command::FeatureFloor { feature, brands } => {
            let feature: FeatureFlag = feature.parse()?;
            let mut filter = PhoneFilter::new().with_feature(feature);
            let keys: &[Field] = if let Some(ref list) = brands {
                for brand in list.split(',').filter(|s| !s.trim().is_empty()) {
                    filter = filter.with_brand(brand.trim());
                }
                &[Field::ReleaseYear, Field::Brand]
            } else {
                &[Field::ReleaseYear]
            };
            let subset = filter_phones(&dataset, &filter);
            let floors = arg_min_by(&subset, keys, Field::PriceInr)?;
            print!("{}", render::picks_table(keys, &floors, Field::PriceInr));
        }

        Command::ProcessorReport { since, cores } => {
            let filter = PhoneFilter::new()
                .with_year_range(Some(since), None)
                .with_core_count(cores);
            let subset = filter_phones(&dataset, &filter);
            let mut report = summarize(&subset, &[Field::ProcessorBrand], Field::PriceInr)?;
            report.sort_by(|a, b| {
                b.count
                    .cmp(&a.count)
                    .then((b.max - b.min).total_cmp(&(a.max - a.min)))
                    .then(a.mean.total_cmp(&b.mean))
            });
            print!(
                "{}",
                render::summary_table(&[Field::ProcessorBrand], &report)
            );
        }

        Command::Browse {
            brand,
            year,
            bin,
            fine,
        } => {
            let table = bin_table(fine);
            if !table.has_label(&bin) {
                bail!(
                    "unknown price range {bin:?}; expected one of: {}",
                    table.labels().collect::<Vec<_>>().join(", ")
                );
            }
            let mut filter = PhoneFilter::new().with_price_bin(bin, table);
            if let Some(brand) = brand {
                filter = filter.with_brand(brand);
            }
            if let Some(year) = year {
                filter = filter.with_year(year);
            }
            let subset = filter_phones(&dataset, &filter);
            let ordered = rank(&subset, &[SortKey::desc(Field::PriceInr)], None);
            print!("{}", render::record_table(&ordered, BROWSE_COLUMNS));
        }

        Command::Top7 {
            year,
            brand,
            features,
        } => {
            let mut filter = PhoneFilter::new().with_year(year);
            if let Some(brand) = brand {
                filter = filter.with_brand(brand);
            }
            let subset = filter_phones(&dataset, &filter);
            let top = rank(&subset, &feature_heavy_keys(), Some(7));

            match features {
                None => print!("{}", render::record_table(&top, TOP7_COLUMNS)),
                Some(list) => {
                    let chosen = parse_fields(&list)?;
                    if chosen.is_empty() {
                        bail!("choose at least one feature to refine by");
                    }
                    if chosen.len() > 3 {
                        bail!("choose at most 3 features, got {}", chosen.len());
                    }
                    let refined = refine_top(&top, &chosen, 7);
                    let mut columns = vec![Field::ModelName, Field::PriceInr];
                    columns.extend(&chosen);
                    print!("{}", render::record_table(&refined, &columns));
                }
            }
        }
    }

    Ok(())
}
