//! Output formatting for listings and price statistics (table, JSON, markdown, CSV).

use crate::coinafrique::models::{ItemRow, ItemTable};
use crate::config::OutputFormat;
use crate::sink;
use crate::stats::PriceStats;

/// Formats tables and statistics for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a cleaned table.
    pub fn format_table(&self, table: &ItemTable) -> String {
        if table.is_empty() {
            return match self.format {
                OutputFormat::Json => "[]".to_string(),
                OutputFormat::Csv => ItemTable::COLUMNS.join(","),
                _ => "No listings found.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => self.json_table(table),
            OutputFormat::Table => self.table_rows(table),
            OutputFormat::Markdown => self.markdown_rows(table),
            OutputFormat::Csv => self.csv_rows(table),
        }
    }

    /// Formats price statistics.
    pub fn format_stats(&self, stats: &PriceStats) -> String {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(stats).unwrap_or_else(|_| "{}".to_string())
            }
            OutputFormat::Table => [
                format!("Listings:    {}", stats.total),
                format!("With price:  {}", stats.with_price),
                format!("Mean:        {}", fcfa(stats.mean)),
                format!("Median:      {}", fcfa(stats.median)),
                format!("Min:         {}", fcfa(stats.min)),
                format!("Max:         {}", fcfa(stats.max)),
            ]
            .join("\n"),
            OutputFormat::Markdown => [
                "| Metric | Value |".to_string(),
                "|--------|-------|".to_string(),
                format!("| Listings | {} |", stats.total),
                format!("| With price | {} |", stats.with_price),
                format!("| Mean | {} |", fcfa(stats.mean)),
                format!("| Median | {} |", fcfa(stats.median)),
                format!("| Min | {} |", fcfa(stats.min)),
                format!("| Max | {} |", fcfa(stats.max)),
            ]
            .join("\n"),
            OutputFormat::Csv => format!(
                "total,with_price,mean,median,min,max\n{},{},{},{},{},{}",
                stats.total, stats.with_price, stats.mean, stats.median, stats.min, stats.max
            ),
        }
    }

    // JSON formatting

    fn json_table(&self, table: &ItemTable) -> String {
        serde_json::to_string_pretty(table).unwrap_or_else(|_| "[]".to_string())
    }

    // Table formatting

    fn table_rows(&self, table: &ItemTable) -> String {
        let index_width = 4;
        let price_width = 16;
        let address_width = 24;
        let name_width = 50;

        let mut lines = Vec::new();

        lines.push(format!(
            "{:<index_width$}  {:<price_width$}  {:<address_width$}  {}",
            "#", "Prix", "Adresse", "Nom"
        ));
        lines.push(format!(
            "{:-<index_width$}  {:-<price_width$}  {:-<address_width$}  {:-<name_width$}",
            "", "", "", ""
        ));

        for (i, row) in table.iter().enumerate() {
            lines.push(format!(
                "{:<index_width$}  {:>price_width$}  {:<address_width$}  {}",
                i,
                truncate(row.price.as_deref().unwrap_or("N/A"), price_width),
                truncate(row.address.as_deref().unwrap_or("N/A"), address_width),
                truncate(&row.name, name_width)
            ));
        }

        lines.push(String::new());
        lines.push(format!("Total: {} listings", table.len()));

        lines.join("\n")
    }

    // Markdown formatting

    fn markdown_rows(&self, table: &ItemTable) -> String {
        let mut lines = Vec::new();

        lines.push("| # | Nom | Prix | Adresse | Image |".to_string());
        lines.push("|---|-----|------|---------|-------|".to_string());

        for (i, row) in table.iter().enumerate() {
            lines.push(self.markdown_row(i, row));
        }

        lines.push(String::new());
        lines.push(format!("*{} listings found*", table.len()));

        lines.join("\n")
    }

    fn markdown_row(&self, index: usize, row: &ItemRow) -> String {
        let image = row.image_url.as_deref().map(|u| format!("[image]({})", u)).unwrap_or_default();
        format!(
            "| {} | {} | {} | {} | {} |",
            index,
            row.name.replace('|', "\\|"),
            row.price.as_deref().unwrap_or("N/A"),
            row.address.as_deref().unwrap_or("N/A"),
            image
        )
    }

    // CSV formatting

    fn csv_rows(&self, table: &ItemTable) -> String {
        let mut buf = Vec::new();
        match sink::write_csv(table, &mut buf) {
            Ok(()) => String::from_utf8_lossy(&buf).trim_end().to_string(),
            Err(_) => ItemTable::COLUMNS.join(","),
        }
    }
}

/// Truncates on a char boundary, marking the cut with "...".
fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let kept: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        s.to_string()
    }
}

/// Formats an amount with space thousands separators: 1234567 -> "1 234 567 FCFA".
fn fcfa(amount: f64) -> String {
    let digits = format!("{:.0}", amount.abs());
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }
    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{}{} FCFA", sign, grouped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_table() -> ItemTable {
        ItemTable::new(vec![
            ItemRow {
                name: "Berger allemand".to_string(),
                price: Some("150 000 CFA".to_string()),
                address: Some("Dakar".to_string()),
                image_url: Some("https://img/1.jpg".to_string()),
            },
            ItemRow { name: "Caniche".to_string(), price: None, address: None, image_url: None },
        ])
    }

    fn make_stats() -> PriceStats {
        PriceStats {
            total: 3,
            with_price: 2,
            mean: 125000.0,
            median: 125000.0,
            min: 100000.0,
            max: 150000.0,
        }
    }

    #[test]
    fn test_table_format() {
        let output = Formatter::new(OutputFormat::Table).format_table(&make_table());
        assert!(output.contains("Berger allemand"));
        assert!(output.contains("150 000 CFA"));
        assert!(output.contains("N/A"));
        assert!(output.contains("Total: 2 listings"));
    }

    #[test]
    fn test_json_format() {
        let output = Formatter::new(OutputFormat::Json).format_table(&make_table());
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);
        assert_eq!(parsed[0]["nom"], "Berger allemand");
        assert_eq!(parsed[1]["prix"], serde_json::Value::Null);
    }

    #[test]
    fn test_markdown_format() {
        let output = Formatter::new(OutputFormat::Markdown).format_table(&make_table());
        assert!(output.contains("| # | Nom | Prix | Adresse | Image |"));
        assert!(output.contains("[image](https://img/1.jpg)"));
        assert!(output.contains("*2 listings found*"));
    }

    #[test]
    fn test_csv_format() {
        let output = Formatter::new(OutputFormat::Csv).format_table(&make_table());
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines[0], "nom,prix,adresse,image_lien");
        assert_eq!(lines[2], "Caniche,,,");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_empty_table() {
        let empty = ItemTable::default();
        assert_eq!(Formatter::new(OutputFormat::Json).format_table(&empty), "[]");
        assert_eq!(
            Formatter::new(OutputFormat::Csv).format_table(&empty),
            "nom,prix,adresse,image_lien"
        );
        assert_eq!(Formatter::new(OutputFormat::Table).format_table(&empty), "No listings found.");
    }

    #[test]
    fn test_stats_formats() {
        let stats = make_stats();

        let table = Formatter::new(OutputFormat::Table).format_stats(&stats);
        assert!(table.contains("Mean:        125 000 FCFA"));
        assert!(table.contains("With price:  2"));

        let json = Formatter::new(OutputFormat::Json).format_stats(&stats);
        let parsed: PriceStats = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, stats);

        let csv = Formatter::new(OutputFormat::Csv).format_stats(&stats);
        assert!(csv.starts_with("total,with_price,mean,median,min,max\n3,2,"));

        let md = Formatter::new(OutputFormat::Markdown).format_stats(&stats);
        assert!(md.contains("| Max | 150 000 FCFA |"));
    }

    #[test]
    fn test_fcfa() {
        assert_eq!(fcfa(0.0), "0 FCFA");
        assert_eq!(fcfa(999.0), "999 FCFA");
        assert_eq!(fcfa(1000.0), "1 000 FCFA");
        assert_eq!(fcfa(1234567.4), "1 234 567 FCFA");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("Bélier", 10), "Bélier");
        assert_eq!(truncate("Poules pondeuses élevées", 10), "Poules ...");
    }
}
