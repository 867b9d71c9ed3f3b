use abl_app::{
    AppResult, CatalogCache, CorpusConfig, SummaryField, available_conditions,
    available_customer_counts, compare_conditions, cuts_start, extract_series, get_iteration_data,
    get_summary_stats, list_instances,
};
use abl_core::MaybeReal;
use abl_results::{Column, IterationTable};
use clap::{Args, Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "abl-cli")]
#[command(about = "ablview CLI - VRPTW ablation study explorer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CorpusArgs {
    /// Corpus root directory (overrides the config file)
    #[arg(long)]
    root: Option<PathBuf>,
    /// YAML file with root_dir, datasets, conditions and entry_prefix
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the corpus and print an overview of the catalog
    Summary {
        #[command(flatten)]
        corpus: CorpusArgs,
    },
    /// List instances for a customer count and condition
    Instances {
        #[command(flatten)]
        corpus: CorpusArgs,
        /// Number of customers (25, 50 or 100)
        #[arg(long)]
        num_cust: u32,
        /// Ablation condition name
        #[arg(long)]
        condition: String,
    },
    /// Show summary statistics for one run
    Stats {
        #[command(flatten)]
        corpus: CorpusArgs,
        /// Instance name (e.g. c101)
        instance: String,
        /// Ablation condition name
        condition: String,
    },
    /// Export the iteration table of one run as CSV
    Export {
        #[command(flatten)]
        corpus: CorpusArgs,
        /// Instance name (e.g. c101)
        instance: String,
        /// Ablation condition name
        condition: String,
        /// Comma-separated column names (defaults to the display columns)
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Export one (x, y) series of a run as CSV
    Series {
        #[command(flatten)]
        corpus: CorpusArgs,
        /// Instance name (e.g. c101)
        instance: String,
        /// Ablation condition name
        condition: String,
        /// X column (e.g. iteration, cumulative_time)
        #[arg(long, default_value = "iteration")]
        x: Column,
        /// Y column (e.g. lblp_lower, start_timeGraph)
        #[arg(long, default_value = "lblp_lower")]
        y: Column,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Compare lower-bound convergence of one instance across conditions
    Compare {
        #[command(flatten)]
        corpus: CorpusArgs,
        /// Instance name (e.g. c101)
        instance: String,
        /// Conditions to compare (defaults to all loaded conditions)
        #[arg(long, value_delimiter = ',')]
        conditions: Vec<String>,
    },
}

fn main() -> AppResult<()> {
    // Logs go to stderr so CSV on stdout stays clean.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let mut cache = CatalogCache::new();

    match cli.command {
        Commands::Summary { corpus } => cmd_summary(&mut cache, &corpus),
        Commands::Instances {
            corpus,
            num_cust,
            condition,
        } => cmd_instances(&mut cache, &corpus, num_cust, &condition),
        Commands::Stats {
            corpus,
            instance,
            condition,
        } => cmd_stats(&mut cache, &corpus, &instance, &condition),
        Commands::Export {
            corpus,
            instance,
            condition,
            columns,
            output,
        } => cmd_export(
            &mut cache,
            &corpus,
            &instance,
            &condition,
            &columns,
            output.as_deref(),
        ),
        Commands::Series {
            corpus,
            instance,
            condition,
            x,
            y,
            output,
        } => cmd_series(
            &mut cache,
            &corpus,
            &instance,
            &condition,
            x,
            y,
            output.as_deref(),
        ),
        Commands::Compare {
            corpus,
            instance,
            conditions,
        } => cmd_compare(&mut cache, &corpus, &instance, conditions),
    }
}

fn resolve_config(args: &CorpusArgs) -> AppResult<CorpusConfig> {
    let mut config = match &args.config {
        Some(path) => CorpusConfig::load_yaml(path)?,
        None => CorpusConfig::default(),
    };
    if let Some(root) = &args.root {
        config.root_dir = root.clone();
    }
    Ok(config)
}

fn cmd_summary(cache: &mut CatalogCache, args: &CorpusArgs) -> AppResult<()> {
    let config = resolve_config(args)?;
    println!("Loading corpus: {}", config.root_dir.display());
    let lookup = cache.get_or_load(&config)?;
    let catalog = &lookup.catalog;

    println!("\nCatalog Summary:");
    println!("  Loaded at: {}", lookup.loaded_at.to_rfc3339());
    println!("  Runs: {}", catalog.len());
    println!("  Skipped: {}", catalog.skipped().len());
    println!(
        "  Customer counts: {}",
        available_customer_counts(catalog)
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("  Conditions: {}", available_conditions(catalog).join(", "));

    let mut counts: BTreeMap<(&str, &str), usize> = BTreeMap::new();
    for record in catalog.iter() {
        *counts
            .entry((record.dataset.as_str(), record.condition.as_str()))
            .or_default() += 1;
    }
    println!("\nRuns per dataset/condition:");
    for ((dataset, condition), count) in counts {
        println!("  {}/{}: {}", dataset, condition, count);
    }

    if !catalog.skipped().is_empty() {
        println!("\nSkipped runs:");
        for skip in catalog.skipped() {
            println!("  {}: {}", skip.path.display(), skip.reason);
        }
    }

    let duplicates = catalog.duplicates();
    if !duplicates.is_empty() {
        println!("\nDuplicate instance/condition pairs (first record is used):");
        for group in duplicates {
            let datasets: Vec<&str> = group
                .indices
                .iter()
                .map(|&i| catalog.records()[i].dataset.as_str())
                .collect();
            println!(
                "  {} / {}: {}",
                group.instance,
                group.condition,
                datasets.join(", ")
            );
        }
    }

    Ok(())
}

fn cmd_instances(
    cache: &mut CatalogCache,
    args: &CorpusArgs,
    num_cust: u32,
    condition: &str,
) -> AppResult<()> {
    let config = resolve_config(args)?;
    let lookup = cache.get_or_load(&config)?;
    let instances = list_instances(&lookup.catalog, num_cust, condition);

    if instances.is_empty() {
        println!(
            "No instances found for {} customers and {} condition",
            num_cust, condition
        );
    } else {
        for instance in instances {
            println!("{}", instance);
        }
    }
    Ok(())
}

fn cmd_stats(
    cache: &mut CatalogCache,
    args: &CorpusArgs,
    instance: &str,
    condition: &str,
) -> AppResult<()> {
    let config = resolve_config(args)?;
    let lookup = cache.get_or_load(&config)?;

    let Some(stats) = get_summary_stats(&lookup.catalog, instance, condition) else {
        println!("No run found for {} with {} condition", instance, condition);
        return Ok(());
    };

    println!("Instance: {} | Condition: {}", instance, condition);
    for (field, value) in stats.iter() {
        println!("  {:<15} {}", field.label(), format_stat(field, value));
    }

    if let Some(table) = get_iteration_data(&lookup.catalog, instance, condition)
        && let Some(start) = cuts_start(table, Column::Iteration)
    {
        println!("  {:<15} {}", "Cuts Start", start);
    }
    Ok(())
}

fn format_stat(field: SummaryField, value: MaybeReal) -> String {
    value.map_or_else(|| "-".to_string(), |v| field.format_value(v))
}

fn cmd_export(
    cache: &mut CatalogCache,
    args: &CorpusArgs,
    instance: &str,
    condition: &str,
    column_names: &[String],
    output: Option<&Path>,
) -> AppResult<()> {
    let columns: Vec<Column> = if column_names.is_empty() {
        Column::DISPLAY.to_vec()
    } else {
        column_names
            .iter()
            .map(|name| name.parse::<Column>())
            .collect::<Result<_, _>>()?
    };

    let config = resolve_config(args)?;
    let lookup = cache.get_or_load(&config)?;
    let Some(table) = get_iteration_data(&lookup.catalog, instance, condition) else {
        println!(
            "No iteration data found for {} with {} condition",
            instance, condition
        );
        return Ok(());
    };

    let csv = table_csv(table, &columns);
    write_csv(&csv, table.len(), output)
}

fn table_csv(table: &IterationTable, columns: &[Column]) -> String {
    let header: Vec<&str> = columns.iter().map(|c| c.name()).collect();
    let mut csv = header.join(",");
    csv.push('\n');
    for row in table.rows() {
        let cells: Vec<String> = columns
            .iter()
            .map(|c| c.value(row).map(|v| v.to_string()).unwrap_or_default())
            .collect();
        csv.push_str(&cells.join(","));
        csv.push('\n');
    }
    csv
}

fn cmd_series(
    cache: &mut CatalogCache,
    args: &CorpusArgs,
    instance: &str,
    condition: &str,
    x: Column,
    y: Column,
    output: Option<&Path>,
) -> AppResult<()> {
    let config = resolve_config(args)?;
    let lookup = cache.get_or_load(&config)?;
    let Some(table) = get_iteration_data(&lookup.catalog, instance, condition) else {
        println!(
            "No iteration data found for {} with {} condition",
            instance, condition
        );
        return Ok(());
    };

    let series = extract_series(table, x, y);
    let mut csv = format!("{},{}\n", x, y);
    for (xv, yv) in &series {
        csv.push_str(&format!("{},{}\n", xv, yv));
    }
    write_csv(&csv, series.len(), output)
}

fn cmd_compare(
    cache: &mut CatalogCache,
    args: &CorpusArgs,
    instance: &str,
    conditions: Vec<String>,
) -> AppResult<()> {
    let config = resolve_config(args)?;
    let lookup = cache.get_or_load(&config)?;
    let conditions = if conditions.is_empty() {
        available_conditions(&lookup.catalog)
    } else {
        conditions
    };

    let series = compare_conditions(&lookup.catalog, instance, &conditions);
    if series.is_empty() {
        println!("No lower-bound data found for {}", instance);
        return Ok(());
    }

    println!("LP lower bound comparison - {}", instance);
    for s in series {
        let first = s.points.first().map(|p| p.1).unwrap_or_default();
        let last = s.points.last().map(|p| p.1).unwrap_or_default();
        println!(
            "  {:<22} iterations={:<5} first={:.2}  last={:.2}  gain={:.2}",
            s.condition,
            s.points.len(),
            first,
            last,
            last - first
        );
    }
    Ok(())
}

fn write_csv(csv: &str, points: usize, output: Option<&Path>) -> AppResult<()> {
    if let Some(path) = output {
        std::fs::write(path, csv)?;
        println!("✓ Exported {} data points to {}", points, path.display());
    } else {
        print!("{}", csv);
    }
    Ok(())
}
