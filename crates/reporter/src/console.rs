use crate::format::{amount, opt_amount, percent, ratio, text};
use analytics::{Distribution, EdaReport, EpisodeDeals, SharkDealCount};
use cleaner::{CleaningReport, DealFlagConflict};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use core_types::{Dataset, PitchRecord};
use std::fmt::Write;

const RULE_WIDTH: usize = 60;

/// The "CLEANING DONE!" banner, a preview of the first records and what
/// the cleaning phase changed.
pub fn render_cleaning(dataset: &Dataset, cleaning: &CleaningReport, preview_rows: usize) -> String {
    let mut out = String::new();
    banner(&mut out, "CLEANING DONE!");

    let _ = writeln!(
        out,
        "Records: {} ({} read, {} duplicate(s) removed)",
        dataset.len(),
        cleaning.rows_read,
        cleaning.duplicates_removed
    );
    let _ = writeln!(out, "Deal flag: {}", cleaning.deal_flag_source);
    let _ = writeln!(out, "Sharks: {}", dataset.roster().names().join(", "));

    let preview: Vec<&PitchRecord> = dataset.records().iter().take(preview_rows).collect();
    if !preview.is_empty() {
        let _ = writeln!(out, "\nFirst {} record(s):", preview.len());
        let _ = writeln!(out, "{}", preview_table(&preview));
    }

    if !cleaning.renamed_columns.is_empty() {
        let mut table = new_table(&["Original column", "Renamed to"]);
        for rename in &cleaning.renamed_columns {
            table.add_row(vec![&rename.original, &rename.canonical]);
        }
        let _ = writeln!(out, "\nRenamed columns:\n{table}");
    }

    let missing: Vec<_> = cleaning
        .missing_values
        .iter()
        .filter(|m| m.missing > 0)
        .collect();
    if !missing.is_empty() {
        let mut table = new_table(&["Column", "Missing values"]);
        for m in missing {
            table.add_row(vec![Cell::new(&m.column), Cell::new(m.missing)]);
        }
        align_right(&mut table, &[1]);
        let _ = writeln!(out, "\nMissing values:\n{table}");
    }

    let failed: Vec<_> = cleaning.coercion.columns.iter().filter(|c| c.failed > 0).collect();
    if !failed.is_empty() {
        let mut table = new_table(&["Column", "Parsed", "Not numeric"]);
        for c in failed {
            table.add_row(vec![Cell::new(&c.column), Cell::new(c.parsed), Cell::new(c.failed)]);
        }
        align_right(&mut table, &[1, 2]);
        let _ = writeln!(out, "\nCells that could not be read as numbers (now missing):\n{table}");
    }

    if !cleaning.deal_flag_conflicts.is_empty() {
        let _ = writeln!(
            out,
            "\nDeal flag conflicts ({}), kept as flagged:",
            cleaning.deal_flag_conflicts.len()
        );
        for conflict in &cleaning.deal_flag_conflicts {
            let _ = writeln!(out, "  - {}", describe_conflict(conflict));
        }
    }

    out
}

/// Every metric of the report, section by section.
pub fn render_report(report: &EdaReport) -> String {
    let mut out = String::new();

    section(&mut out, "I. Deal Outcomes");
    let deals = &report.deals;
    if deals.total_pitches == 0 {
        let _ = writeln!(out, "No pitches.");
    } else {
        let _ = writeln!(out, "Total pitches: {}", deals.total_pitches);
        let _ = writeln!(out, "Successful deals: {}", deals.successful_deals);
        let _ = writeln!(out, "Deal percentage: {}", percent(deals.deal_percentage));
    }
    let _ = writeln!(out, "Average deal amount: {}", opt_amount(report.deal_amounts.average));
    let _ = writeln!(out, "Median deal amount: {}", opt_amount(report.deal_amounts.median));
    let _ = writeln!(out, "Total amount invested: {}", amount(report.deal_amounts.total_invested));

    section(&mut out, "II. Shark Activity");
    let _ = writeln!(out, "Top {} investing sharks:\n{}", report.top_sharks.len(), shark_table(&report.top_sharks));
    let _ = writeln!(out, "All sharks:\n{}", shark_table(&report.shark_investments));

    section(&mut out, "III. Equity and Valuation");
    let _ = writeln!(out, "Deal equity (closed deals):\n{}", distribution_table(&report.deal_equity));
    let _ = writeln!(
        out,
        "Deal vs ask valuation correlation: {}",
        ratio(report.valuation_correlation)
    );
    let _ = writeln!(out, "Average equity given: {}", percent(report.average_equity_given));

    section(&mut out, "IV. Episodes and Filters");
    let _ = writeln!(out, "Deals by episode:\n{}", episode_table(&report.deals_by_episode));
    match &report.busiest_episode {
        Some(busiest) => {
            let _ = writeln!(
                out,
                "Most deals in one episode: episode {} with {} deal(s)",
                busiest.episode, busiest.deals
            );
        }
        None => {
            let _ = writeln!(out, "Most deals in one episode: n/a");
        }
    }
    let high_ask = &report.high_ask;
    let _ = writeln!(
        out,
        "Pitches asking more than {}: {} ({} closed a deal)",
        amount(high_ask.threshold),
        high_ask.pitches,
        high_ask.with_deal
    );
    let _ = writeln!(
        out,
        "Pitches with more than one shark: {} ({})",
        report.multi_shark.pitches,
        percent(report.multi_shark.percentage)
    );
    for total in &report.named_shark_totals {
        let _ = writeln!(out, "Total invested by {}: {}", total.shark, amount(total.total_invested));
    }
    let _ = writeln!(out, "Amount per shark:\n{}", distribution_table(&report.amount_per_shark));

    if report.over_ask_deals.is_empty() {
        let _ = writeln!(out, "No deal closed above the ask.");
    } else {
        let mut table = new_table(&["Episode", "Pitch", "Brand", "Ask amount", "Deal amount"]);
        for deal in &report.over_ask_deals {
            table.add_row(vec![
                Cell::new(deal.episode.as_ref().map(|e| e.to_string()).unwrap_or_else(|| text(None))),
                Cell::new(text(deal.pitch_number.as_deref())),
                Cell::new(text(deal.brand_name.as_deref())),
                Cell::new(amount(deal.ask_amount)),
                Cell::new(amount(deal.deal_amount)),
            ]);
        }
        align_right(&mut table, &[3, 4]);
        let _ = writeln!(out, "Deals closed above the ask ({}):\n{table}", report.over_ask_deals.len());
    }

    section(&mut out, "V. Rankings and Trends");
    let mut roi = new_table(&["Rank", "Shark", "Deals", "Equity (sum)", "Invested", "ROI"]);
    for (rank, shark) in report.shark_roi.iter().enumerate() {
        roi.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(&shark.shark),
            Cell::new(shark.deals),
            Cell::new(format!("{:.2}", shark.total_equity)),
            Cell::new(amount(shark.total_amount)),
            Cell::new(format!("{:.8}", shark.roi)),
        ]);
    }
    align_right(&mut roi, &[0, 2, 3, 4, 5]);
    let _ = writeln!(out, "Equity obtained per unit invested:\n{roi}");

    let mut trend = new_table(&["Episode", "Average deal equity"]);
    for point in &report.equity_trend {
        trend.add_row(vec![
            Cell::new(&point.episode),
            Cell::new(
                point
                    .average_equity
                    .map(|v| format!("{v:.2}"))
                    .unwrap_or_else(|| text(None)),
            ),
        ]);
    }
    align_right(&mut trend, &[1]);
    let _ = writeln!(out, "Equity trend by episode:\n{trend}");

    let ask = &report.ask_outcome;
    let _ = writeln!(out, "Ask vs deal amount correlation: {}", ratio(ask.correlation));
    let _ = writeln!(out, "Mean ask with a deal: {}", opt_amount(ask.mean_ask_with_deal));
    let _ = writeln!(out, "Mean ask without a deal: {}", opt_amount(ask.mean_ask_without_deal));
    let _ = writeln!(out, "Insight: {}", ask.insight.message());

    let _ = writeln!(out, "\nDeals per episode:\n{}", episode_table(&report.deals_per_episode));

    let ev = &report.equity_valuation;
    let _ = writeln!(out, "Ask equity vs deal valuation correlation: {}", ratio(ev.correlation));
    let _ = writeln!(
        out,
        "Mean deal valuation, ask equity <= {}%: {}",
        ev.split_pct,
        opt_amount(ev.mean_valuation_low_equity)
    );
    let _ = writeln!(
        out,
        "Mean deal valuation, ask equity > {}%: {}",
        ev.split_pct,
        opt_amount(ev.mean_valuation_high_equity)
    );
    let _ = writeln!(out, "Insight: {}", ev.insight.message());

    if !report.warnings.is_empty() {
        section(&mut out, "Warnings");
        for warning in &report.warnings {
            let _ = writeln!(out, "  - {warning}");
        }
    }

    out
}

fn banner(out: &mut String, title: &str) {
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
    let _ = writeln!(out, "{title:^RULE_WIDTH$}");
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n--- {title} {}", "-".repeat(RULE_WIDTH.saturating_sub(title.len() + 5)));
}

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.to_vec());
    table
}

fn align_right(table: &mut Table, columns: &[usize]) {
    for &idx in columns {
        if let Some(column) = table.column_mut(idx) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }
}

fn preview_table(records: &[&PitchRecord]) -> Table {
    let mut table = new_table(&[
        "Episode",
        "Pitch",
        "Brand",
        "Ask amount",
        "Ask equity",
        "Deal",
        "Deal amount",
        "Deal equity",
        "Sharks",
    ]);
    for r in records {
        table.add_row(vec![
            Cell::new(r.episode.as_ref().map(|e| e.to_string()).unwrap_or_else(|| text(None))),
            Cell::new(text(r.pitch_number.as_deref())),
            Cell::new(text(r.brand_name.as_deref())),
            Cell::new(opt_amount(r.pitcher_ask_amount)),
            Cell::new(opt_amount(r.ask_equity)),
            Cell::new(r.deal_flag_value()),
            Cell::new(opt_amount(r.deal_amount)),
            Cell::new(opt_amount(r.deal_equity)),
            Cell::new(r.sharks_invested_count()),
        ]);
    }
    align_right(&mut table, &[3, 4, 5, 6, 7, 8]);
    table
}

fn shark_table(sharks: &[SharkDealCount]) -> Table {
    let mut table = new_table(&["Rank", "Shark", "Deals joined"]);
    for (rank, s) in sharks.iter().enumerate() {
        table.add_row(vec![Cell::new(rank + 1), Cell::new(&s.shark), Cell::new(s.deals)]);
    }
    align_right(&mut table, &[0, 2]);
    table
}

fn episode_table(episodes: &[EpisodeDeals]) -> Table {
    let mut table = new_table(&["Episode", "Deals"]);
    for e in episodes {
        table.add_row(vec![Cell::new(&e.episode), Cell::new(e.deals)]);
    }
    align_right(&mut table, &[1]);
    table
}

fn distribution_table(d: &Distribution) -> Table {
    let mut table = new_table(&["count", "mean", "std", "min", "25%", "50%", "75%", "max"]);
    table.add_row(vec![
        d.count.to_string(),
        opt_amount(d.mean),
        opt_amount(d.std),
        opt_amount(d.min),
        opt_amount(d.q1),
        opt_amount(d.median),
        opt_amount(d.q3),
        opt_amount(d.max),
    ]);
    align_right(&mut table, &[0, 1, 2, 3, 4, 5, 6, 7]);
    table
}

fn describe_conflict(conflict: &DealFlagConflict) -> String {
    match conflict {
        DealFlagConflict::NoDealWithAmount { row, deal_amount } => format!(
            "row {row}: flagged as no deal but records a deal amount of {}",
            amount(*deal_amount)
        ),
        DealFlagConflict::DealWithoutAmount { row } => {
            format!("row {row}: flagged as a deal but records no deal amount")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::{AnalyticsEngine, AskInsight};
    use core_types::{DealFlagSource, EpisodeKey, SharkRoster};

    fn dataset() -> Dataset {
        let record = |episode: i64, deal: Option<f64>, sharks: Vec<bool>| PitchRecord {
            episode: Some(EpisodeKey::Number(episode)),
            pitch_number: Some(episode.to_string()),
            brand_name: Some(format!("Brand {episode}")),
            pitcher_ask_amount: Some(100.0),
            ask_valuation: Some(1000.0),
            ask_equity: Some(10.0),
            deal_amount: deal,
            deal_valuation: deal.map(|d| d * 10.0),
            deal_equity: deal.map(|_| 10.0),
            amount_per_shark: deal,
            shark_deals: sharks,
            deal_flag: deal.is_some(),
        };
        Dataset::new(
            SharkRoster::new(vec!["ashneer".into(), "peyush".into()]),
            vec![
                record(1, Some(120.0), vec![true, false]),
                record(2, None, vec![false, false]),
            ],
            DealFlagSource::DerivedFromAmount,
        )
        .unwrap()
    }

    #[test]
    fn report_renders_every_section() {
        let report = AnalyticsEngine::default().calculate(&dataset());
        let out = render_report(&report);

        for title in [
            "I. Deal Outcomes",
            "II. Shark Activity",
            "III. Equity and Valuation",
            "IV. Episodes and Filters",
            "V. Rankings and Trends",
        ] {
            assert!(out.contains(title), "missing section {title}");
        }
        assert!(out.contains("Deal percentage: 50.00%"));
        assert!(out.contains("Deals closed above the ask (1)"));
        assert!(out.contains(AskInsight::NoClearPattern.message()));
        assert!(!out.contains("Warnings"));
    }

    #[test]
    fn empty_report_says_no_pitches() {
        let out = render_report(&EdaReport::default());
        assert!(out.contains("No pitches."));
        assert!(out.contains("Most deals in one episode: n/a"));
    }

    #[test]
    fn cleaning_banner_previews_records() {
        let data = dataset();
        let cleaning = CleaningReport {
            renamed_columns: vec![],
            rows_read: 3,
            duplicates_removed: 1,
            missing_values: vec![],
            coercion: Default::default(),
            deal_flag_source: DealFlagSource::DerivedFromAmount,
            deal_flag_conflicts: vec![DealFlagConflict::DealWithoutAmount { row: 1 }],
        };
        let out = render_cleaning(&data, &cleaning, 1);

        assert!(out.contains("CLEANING DONE!"));
        assert!(out.contains("First 1 record(s):"));
        assert!(out.contains("Brand 1"));
        assert!(!out.contains("Brand 2"));
        assert!(out.contains("1 duplicate(s) removed"));
        assert!(out.contains("row 1: flagged as a deal but records no deal amount"));
    }
}
