use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};

use qixing_data::DrawRecord;
use qixing_engine::features::{CorrelationTable, DigitTable};
use qixing_engine::{DrawSummary, PositionFeatureSet, Prediction};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn format_digits(digits: &[u8]) -> String {
    digits.iter().map(|d| d.to_string()).collect::<Vec<_>>().join(" ")
}

fn format_table(table: &DigitTable<f64>) -> String {
    if table.is_empty() {
        return "—".to_string();
    }
    table
        .iter()
        .map(|(k, v)| format!("{}:{:.3}", k, v))
        .collect::<Vec<_>>()
        .join("  ")
}

pub fn display_history(records: &[DrawRecord]) {
    if records.is_empty() {
        println!("No draws to show.");
        return;
    }

    let mut table = new_table();
    table.set_header(vec!["Draw", "Time", "Weekday", "Digits"]);
    for record in records {
        table.add_row(vec![
            record.draw_id.clone(),
            record.draw_time.format("%Y-%m-%d %H:%M").to_string(),
            record.weekday.to_string(),
            format_digits(&record.digits),
        ]);
    }
    println!("{table}");
}

pub fn display_summary(record: &DrawRecord, summary: &DrawSummary) {
    println!("\nLatest draw {} ({})", record.draw_id, record.draw_time.format("%Y-%m-%d"));
    println!("  Digits      : {}", format_digits(&record.digits));
    println!("  Sum         : {}", summary.sum);
    println!("  Spread      : {}", summary.spread);
    println!("  Big:Small   : {}:{}", summary.big, summary.small);
    println!("  Odd:Even    : {}:{}", summary.odd, summary.even);
    println!("  Mod 3 (0:1:2): {}:{}:{}", summary.ways[0], summary.ways[1], summary.ways[2]);
    println!("  Repeated    : {}", summary.repeated);
}

pub fn display_features(set: &PositionFeatureSet) {
    println!("\n── {} (0-{}) ──", set.position, set.position.max_digit());

    let mut table = new_table();
    table.set_header(vec!["Digit", "Frequency", "Missing", "Repeats", "Same period"]);
    for digit in set.position.digits() {
        let freq = set.frequency.get(digit).unwrap_or(0.0);
        let streak = set.missing_streak.get(digit).unwrap_or(0);
        let repeats = set.prev_repeat.get(digit).unwrap_or(0);
        let period = set
            .same_period_pattern
            .get(digit)
            .map(|v| format!("{:.3}", v))
            .unwrap_or_else(|| "—".to_string());
        table.add_row(vec![
            digit.to_string(),
            format!("{:.3}", freq),
            streak.to_string(),
            repeats.to_string(),
            period,
        ]);
    }
    println!("{table}");

    match (set.big_small_ratio, set.odd_even_ratio, set.mod3_distribution) {
        (Some(bs), Some(oe), Some(m3)) => {
            println!("  Big/Small : {:.3} / {:.3}", bs.big_ratio, bs.small_ratio);
            println!("  Odd/Even  : {:.3} / {:.3}", oe.odd_ratio, oe.even_ratio);
            println!("  Mod 3     : {:.3} / {:.3} / {:.3}", m3.way_0, m3.way_1, m3.way_2);
        }
        _ => println!("  (no ratios: empty history)"),
    }
    println!("  Spans     : {}", format_table(&set.span_distribution));
}

pub fn display_correlation(correlation: &CorrelationTable) {
    println!("\n── {} → {} ──", correlation.from, correlation.to);
    if correlation.rows.is_empty() {
        println!("  (no data)");
        return;
    }

    let mut table = new_table();
    table.set_header(vec!["From", "Most likely next", "Distribution"]);
    for (digit, row) in correlation.rows.iter() {
        let likely = correlation
            .likely_successors(digit, 3)
            .iter()
            .map(|(d, p)| format!("{} ({:.0}%)", d, p * 100.0))
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![digit.to_string(), likely, format_table(&row)]);
    }
    println!("{table}");
}

pub fn display_prediction(prediction: &Prediction) {
    if let Some(next) = &prediction.next_draw {
        println!("\nNext draw {} ({})", next.draw_id, next.draw_time.format("%Y-%m-%d"));
    }

    let mut table = new_table();
    table.set_header(vec!["Position", "#1", "#2", "#3", "Confidence"]);
    for p in &prediction.positions {
        let mut row = vec![Cell::new(p.position.to_string())];
        for c in &p.candidates {
            row.push(Cell::new(format!("{} ({:.1})", c.digit, c.score)));
        }
        let color = if p.confidence >= 0.5 { Color::Green } else { Color::White };
        row.push(Cell::new(format!("{:.2}", p.confidence)).fg(color));
        table.add_row(row);
    }
    println!("{table}");

    println!("\nCombinations:");
    let mut table = new_table();
    table.set_header(vec!["#", "Digits"]);
    for (i, combination) in prediction.combinations.iter().enumerate() {
        table.add_row(vec![(i + 1).to_string(), format_digits(combination)]);
    }
    println!("{table}");
}
