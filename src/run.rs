use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Result;
use rust_decimal::Decimal;

use crate::categorize::CategoryClassifier;
use crate::dataset::{Dataset, FilterState};
use crate::import::{
    detect_format, import_generic, import_izvoz, CsvImporter, ImportWizard, NumberFormat,
    SourceFormat, WizardStep, IZVOZ_TARGET_YEAR,
};
use crate::insights::FindingKind;
use crate::models::{BudgetTargets, CostCategory, ImportIssue, SpendRecord};
use crate::store::Store;

pub(crate) fn as_cli(args: &[String], store: &Store) -> Result<()> {
    match args[1].as_str() {
        "import" => cli_import(&args[2..], store),
        "export" => cli_export(&args[2..], store),
        "template" => cli_template(&args[2..]),
        "summary" | "s" => cli_summary(&args[2..], store),
        "add" => cli_add(&args[2..], store),
        "edit" => cli_edit(&args[2..], store),
        "delete" => cli_delete(&args[2..], store),
        "targets" => cli_targets(&args[2..], store),
        "insights" => cli_insights(&args[2..], store),
        "clear" => cli_clear(store),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("spendtrack {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

pub(crate) fn print_usage() {
    println!("SpendTrack — local-only indirect spend tracker");
    println!();
    println!("Usage: spendtrack <command>");
    println!();
    println!("Commands:");
    println!("  import <file.csv>             Import a CSV file (auto-detects SAP/Izvoz/generic format)");
    println!("    --append                    Append to the dataset instead of replacing it");
    println!("    --format <EU|US>            Override the detected number format (SAP imports)");
    println!("  export [path]                 Export records to CSV");
    println!("    --year <YYYY>               Only records from this year");
    println!("    --month <M>                 Only records from this month (1-12)");
    println!("    --category <name>           Only records in this category");
    println!("  template [path]               Write a blank import template");
    println!("  summary                       Print spend summary (same filter flags as export)");
    println!("  add <date> <category> <sku>   Add a record manually");
    println!("    --supplier / --description / --quantity / --unit-price / --total");
    println!("  edit <index>                  Edit one record (same field flags as add)");
    println!("  delete <index>                Delete one record");
    println!("  targets                       List budget targets");
    println!("  targets set <year> <category> <amount>");
    println!("  insights                      Print savings opportunities");
    println!("  clear                         Delete all records");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
}

// ── Lenient loads ────────────────────────────────────────────
// Corrupt or unreadable blobs degrade to empty state with a warning; the
// current session's data stays authoritative either way.

fn load_dataset(store: &Store) -> Dataset {
    match Dataset::load(store) {
        Ok(dataset) => dataset,
        Err(e) => {
            eprintln!("Warning: failed to load stored records: {e:#}");
            Dataset::new()
        }
    }
}

fn load_classifier(store: &Store) -> CategoryClassifier {
    match store.load_category_mappings() {
        Ok(mappings) => CategoryClassifier::from_mappings(mappings),
        Err(e) => {
            eprintln!("Warning: failed to load category mappings: {e:#}");
            CategoryClassifier::new()
        }
    }
}

fn load_targets(store: &Store) -> BudgetTargets {
    match store.load_targets() {
        Ok(targets) => targets,
        Err(e) => {
            eprintln!("Warning: failed to load budget targets: {e:#}");
            BudgetTargets::default()
        }
    }
}

fn warn_on_save_failure(result: Result<()>, what: &str) {
    if let Err(e) = result {
        eprintln!("Warning: failed to save {what}: {e:#}");
    }
}

fn print_issues(issues: &[ImportIssue]) {
    const SHOWN: usize = 15;
    for issue in issues.iter().take(SHOWN) {
        println!("  {issue}");
    }
    if issues.len() > SHOWN {
        println!("  ... and {} more", issues.len() - SHOWN);
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_filter(args: &[String]) -> Result<FilterState> {
    let mut filter = FilterState::default();
    if let Some(year) = flag_value(args, "--year") {
        filter.year = Some(
            year.parse()
                .map_err(|_| anyhow::anyhow!("Invalid year: {year}"))?,
        );
    }
    if let Some(month) = flag_value(args, "--month") {
        let month: u32 = month
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid month: {month}"))?;
        if !(1..=12).contains(&month) {
            anyhow::bail!("Invalid month: {month}");
        }
        filter.month = Some(month);
    }
    if let Some(category) = flag_value(args, "--category") {
        filter.category = Some(parse_category(category)?);
    }
    Ok(filter)
}

fn parse_category(s: &str) -> Result<CostCategory> {
    CostCategory::parse(s).ok_or_else(|| {
        let names: Vec<&str> = CostCategory::all().iter().map(|c| c.as_str()).collect();
        anyhow::anyhow!(
            "Unknown category '{s}'. Valid categories:\n  {}",
            names.join("\n  ")
        )
    })
}

fn parse_amount(s: &str) -> Result<Decimal> {
    Decimal::from_str(s).map_err(|_| anyhow::anyhow!("Invalid amount: {s}"))
}

fn fmt_eur(amount: Decimal) -> String {
    format!("€{amount:.2}")
}

// ── Import ───────────────────────────────────────────────────

fn cli_import(args: &[String], store: &Store) -> Result<()> {
    let Some(file) = args.first().filter(|a| !a.starts_with('-')) else {
        anyhow::bail!("Usage: spendtrack import <file.csv> [--append] [--format EU|US]");
    };
    let path = Path::new(file);
    if !path.exists() {
        anyhow::bail!("File not found: {file}");
    }

    let append = args.iter().any(|a| a == "--append");
    let format_override = match flag_value(args, "--format") {
        Some(flag) => Some(
            NumberFormat::from_flag(flag)
                .ok_or_else(|| anyhow::anyhow!("Invalid number format: {flag} (use EU or US)"))?,
        ),
        None => None,
    };

    let table = CsvImporter::read_path(path)?;
    if table.parse_errors > 0 {
        eprintln!(
            "Warning: {} rows could not be tokenized and were skipped",
            table.parse_errors
        );
    }

    let mut classifier = load_classifier(store);
    let mut dataset = load_dataset(store);
    let format = detect_format(&table.headers);
    println!("Detected format: {}", format.as_str());

    match format {
        // SAP uploads always go through the wizard, driven non-interactively
        // here: auto-mapping, saved/guessed categories, then execute.
        SourceFormat::Sap => {
            let mut wizard = ImportWizard::start(table, classifier.mappings())?;
            if let Some(format) = format_override {
                wizard.set_number_format(format);
            }
            if wizard.detected_sap() {
                println!("SAP S4 HANA export detected");
            }
            println!(
                "Auto-mapped {}/{} columns, number format {}",
                wizard.mapping().mapped_count(),
                wizard.headers().len(),
                wizard.number_format().as_str(),
            );
            for header in wizard.headers() {
                let target = wizard.mapping().get(header);
                println!("  {header:<24} -> {}", target.label());
            }

            while wizard.step() != WizardStep::ReviewSettings {
                wizard.next();
                println!(
                    "Step {}: {}",
                    wizard.step().index() + 1,
                    wizard.step().title()
                );
            }
            println!("{} category values mapped", wizard.category_mapping().len());

            if let Some(stats) = wizard.stats() {
                println!(
                    "{} rows -> {} records | total {} | {} suppliers | {} SKUs",
                    stats.row_count,
                    stats.record_count,
                    fmt_eur(stats.total_amount),
                    stats.unique_suppliers,
                    stats.unique_skus,
                );
                if let Some((first, last)) = &stats.date_range {
                    println!("Date range: {first} — {last}");
                }
            }
            for record in wizard.preview_records(10) {
                println!(
                    "  {} | {} | {} | {} | {}",
                    record.date,
                    record.cost_category,
                    record.sku,
                    record.supplier,
                    fmt_eur(record.total_amount),
                );
            }
            if let Some(preview) = wizard.preview() {
                print_issues(&preview.issues);
                let warns = preview.warn_count();
                if warns > 0 {
                    println!("{warns} warnings during import");
                }
            }

            let summary = wizard.execute(&mut dataset, &mut classifier, store)?;
            print_issues(&summary.issues);
            println!(
                "Imported {} new records ({} duplicates skipped)",
                summary.added, summary.skipped_duplicates
            );
        }
        SourceFormat::Izvoz => {
            let import = import_izvoz(&table, &classifier);
            print_issues(&import.issues);
            if import.records.is_empty() {
                anyhow::bail!("No records to import after processing");
            }

            if !import.targets.is_empty() {
                let mut targets = load_targets(store);
                targets.merge_year(IZVOZ_TARGET_YEAR, &import.targets);
                warn_on_save_failure(store.save_targets(&targets), "budget targets");
            }

            commit_records(&mut dataset, store, import.records, append);
        }
        SourceFormat::Generic => {
            let outcome = import_generic(&table, &classifier);
            print_issues(&outcome.issues);
            let warns = outcome.warn_count();
            if warns > 0 {
                println!("{warns} warnings during import");
            }
            if outcome.records.is_empty() {
                anyhow::bail!("No records to import after processing");
            }
            commit_records(&mut dataset, store, outcome.records, append);
        }
    }

    Ok(())
}

fn commit_records(dataset: &mut Dataset, store: &Store, records: Vec<SpendRecord>, append: bool) {
    if append {
        let (added, skipped) = dataset.merge_append(records);
        let suffix = if skipped > 0 {
            format!(" — {skipped} duplicates skipped")
        } else {
            String::new()
        };
        println!("Added {added} new records{suffix}");
    } else {
        let count = records.len();
        dataset.replace_all(records);
        println!("Loaded {count} records");
    }
    warn_on_save_failure(dataset.save(store), "data");
}

// ── Export / template ────────────────────────────────────────

fn cli_export(args: &[String], store: &Store) -> Result<()> {
    let filter = parse_filter(args)?;
    let dataset = load_dataset(store);

    let records = if filter.is_all() {
        dataset.records().to_vec()
    } else {
        dataset.filtered(&filter)
    };
    if records.is_empty() {
        println!("No data to export");
        return Ok(());
    }

    let default_name = if filter.is_all() {
        "indirect_spend_all.csv"
    } else {
        "indirect_spend_filtered.csv"
    };
    let path: PathBuf = args
        .first()
        .filter(|a| !a.starts_with('-'))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default_name));

    let count = crate::export::write_csv(&path, &records)?;
    println!("Exported {count} records to {}", path.display());
    Ok(())
}

fn cli_template(args: &[String]) -> Result<()> {
    let path: PathBuf = args
        .first()
        .filter(|a| !a.starts_with('-'))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("indirect_spend_template.csv"));
    crate::export::write_template(&path)?;
    println!("Template written to {}", path.display());
    Ok(())
}

// ── Summary ──────────────────────────────────────────────────

fn cli_summary(args: &[String], store: &Store) -> Result<()> {
    let filter = parse_filter(args)?;
    let dataset = load_dataset(store);
    if dataset.is_empty() {
        println!("No data loaded. Import a CSV file first.");
        return Ok(());
    }

    let summary = dataset.summary(&filter);
    println!("SpendTrack");
    println!("{}", "─".repeat(44));
    println!("  Records:        {}", summary.record_count);
    println!("  Total spend:    {}", fmt_eur(summary.total_spend));
    println!("  Price impact:   {}", fmt_eur(summary.price_impact));
    println!("  Volume impact:  {}", fmt_eur(summary.volume_impact));
    println!("  Insourcing:     {}", fmt_eur(summary.insourcing_savings));
    println!("  Total savings:  {}", fmt_eur(summary.total_savings()));
    println!("  Suppliers:      {}", summary.unique_suppliers);
    println!("  Requesters:     {}", summary.unique_requesters);
    if let Some((first, last)) = &summary.date_range {
        println!("  Date range:     {first} — {last}");
    }

    let by_category = dataset.spend_by_category(&filter);
    if !by_category.is_empty() {
        println!();
        println!("Spend by category:");
        for (category, amount) in &by_category {
            println!("  {:<40} {}", category.as_str(), fmt_eur(*amount));
        }
    }

    let trend = dataset.monthly_trend(&filter);
    if !trend.is_empty() {
        println!();
        println!("Monthly spend:");
        for (month, amount) in &trend {
            println!("  {month}   {}", fmt_eur(*amount));
        }
    }

    // Target variance for the filtered year, when targets exist.
    if let Some(year) = filter.year {
        let targets = load_targets(store);
        let year_key = year.to_string();
        if targets.for_year(&year_key).is_some() {
            println!();
            println!("Targets {year}:");
            for category in CostCategory::all() {
                let Some(target) = targets.get(&year_key, *category) else {
                    continue;
                };
                let actual = by_category.get(category).copied().unwrap_or(Decimal::ZERO);
                let variance = actual - target;
                println!(
                    "  {:<40} target {} | actual {} | variance {}",
                    category.as_str(),
                    fmt_eur(target),
                    fmt_eur(actual),
                    fmt_eur(variance),
                );
            }
        }
    }

    Ok(())
}

// ── Manual record entry ──────────────────────────────────────

fn apply_field_flags(record: &mut SpendRecord, args: &[String]) -> Result<()> {
    if let Some(date) = flag_value(args, "--date") {
        record.date = crate::import::month_key(date);
    }
    if let Some(category) = flag_value(args, "--category") {
        record.cost_category = parse_category(category)?;
    }
    if let Some(sku) = flag_value(args, "--sku") {
        record.sku = sku.to_string();
    }
    if let Some(supplier) = flag_value(args, "--supplier") {
        record.supplier = supplier.to_string();
    }
    if let Some(description) = flag_value(args, "--description") {
        record.description = description.to_string();
    }
    if let Some(quantity) = flag_value(args, "--quantity") {
        record.quantity = parse_amount(quantity)?;
    }
    if let Some(unit_price) = flag_value(args, "--unit-price") {
        record.unit_price = parse_amount(unit_price)?;
    }
    if let Some(total) = flag_value(args, "--total") {
        record.total_amount = parse_amount(total)?;
    }
    if let Some(notes) = flag_value(args, "--notes") {
        record.notes = notes.to_string();
    }
    Ok(())
}

fn backfill_total(record: &mut SpendRecord) {
    if record.total_amount == Decimal::ZERO
        && record.quantity > Decimal::ZERO
        && record.unit_price > Decimal::ZERO
    {
        record.total_amount = record.quantity * record.unit_price;
    }
}

fn cli_add(args: &[String], store: &Store) -> Result<()> {
    let positional: Vec<&String> = args.iter().take_while(|a| !a.starts_with('-')).collect();
    let (Some(date), Some(category), Some(sku)) =
        (positional.first(), positional.get(1), positional.get(2))
    else {
        anyhow::bail!("Usage: spendtrack add <date> <category> <sku> [--total N] [--supplier X] ...");
    };

    let mut record = SpendRecord {
        date: crate::import::month_key(date.as_str()),
        cost_category: parse_category(category.as_str())?,
        sku: (*sku).clone(),
        ..SpendRecord::default()
    };
    apply_field_flags(&mut record, args)?;
    backfill_total(&mut record);

    let mut dataset = load_dataset(store);
    dataset.add(record);
    warn_on_save_failure(dataset.save(store), "data");
    println!("Entry added ({} records total)", dataset.len());
    Ok(())
}

fn cli_edit(args: &[String], store: &Store) -> Result<()> {
    let Some(index) = args.first().and_then(|a| a.parse::<usize>().ok()) else {
        anyhow::bail!("Usage: spendtrack edit <index> [--total N] [--category X] ...");
    };

    let mut dataset = load_dataset(store);
    let Some(existing) = dataset.records().get(index) else {
        anyhow::bail!("No record at index {index}");
    };
    let mut record = existing.clone();
    apply_field_flags(&mut record, &args[1..])?;
    backfill_total(&mut record);
    dataset.update(index, record)?;
    warn_on_save_failure(dataset.save(store), "data");
    println!("Entry {index} updated");
    Ok(())
}

fn cli_delete(args: &[String], store: &Store) -> Result<()> {
    let Some(index) = args.first().and_then(|a| a.parse::<usize>().ok()) else {
        anyhow::bail!("Usage: spendtrack delete <index>");
    };

    let mut dataset = load_dataset(store);
    let removed = dataset.remove(index)?;
    warn_on_save_failure(dataset.save(store), "data");
    println!(
        "Deleted record {index} ({} / {})",
        removed.supplier, removed.sku
    );
    Ok(())
}

// ── Targets / insights / clear ───────────────────────────────

fn cli_targets(args: &[String], store: &Store) -> Result<()> {
    if args.first().map(String::as_str) == Some("set") {
        let (Some(year), Some(category), Some(amount)) = (args.get(1), args.get(2), args.get(3))
        else {
            anyhow::bail!("Usage: spendtrack targets set <year> <category> <amount>");
        };
        year.parse::<i32>()
            .map_err(|_| anyhow::anyhow!("Invalid year: {year}"))?;
        let category = parse_category(category)?;
        let amount = parse_amount(amount)?;

        let mut targets = load_targets(store);
        targets.set(year, category, amount);
        store.save_targets(&targets)?;
        println!(
            "Target set: {year} / {} = {}",
            category.as_str(),
            fmt_eur(amount)
        );
        return Ok(());
    }

    let targets = load_targets(store);
    if targets.is_empty() {
        println!("No budget targets set");
        return Ok(());
    }
    for year in targets.years() {
        println!("{year}:");
        if let Some(entries) = targets.for_year(year) {
            for (category, amount) in entries {
                println!("  {category:<40} {}", fmt_eur(*amount));
            }
        }
    }
    Ok(())
}

fn cli_insights(args: &[String], store: &Store) -> Result<()> {
    let filter = parse_filter(args)?;
    let dataset = load_dataset(store);
    if dataset.is_empty() {
        println!("No data loaded. Import spend data to generate savings insights.");
        return Ok(());
    }

    let records = if filter.is_all() {
        dataset.records().to_vec()
    } else {
        dataset.filtered(&filter)
    };
    let findings = crate::insights::analyze(&records);
    if findings.is_empty() {
        println!("No savings opportunities found");
        return Ok(());
    }

    let total: Decimal = findings.iter().map(|f| f.estimated_savings).sum();
    let quick_wins = findings
        .iter()
        .filter(|f| {
            matches!(
                f.kind,
                FindingKind::PriceVariance | FindingKind::VolumeBundling | FindingKind::TailSpend
            )
        })
        .count();
    println!(
        "{} opportunities ({} quick wins), estimated savings {}",
        findings.len(),
        quick_wins,
        fmt_eur(total)
    );
    for finding in &findings {
        println!();
        println!(
            "[{}] {} — {}",
            finding.priority.as_str(),
            finding.title,
            finding.category
        );
        println!("  {}", finding.detail);
        if !finding.affected.is_empty() {
            println!("  Affected: {}", finding.affected.join(", "));
        }
        println!("  Estimated savings: {}", fmt_eur(finding.estimated_savings));
        println!("  Action: {}", finding.action);
    }
    Ok(())
}

fn cli_clear(store: &Store) -> Result<()> {
    let count = load_dataset(store).len();
    store.clear_records()?;
    println!("Cleared {count} records");
    Ok(())
}
