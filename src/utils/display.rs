use colored::Colorize;
use prettytable::{format, Cell, Row, Table};

use crate::models::{TransactionRecord, TxStatus};
use crate::services::Provenance;

pub struct DisplayFormatter;

impl Default for DisplayFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn format_header(&self, text: &str) -> String {
        format!("\n=== {} ===", text.bright_white().bold())
    }

    /// `0x5B0736...240212` style abbreviation for long hex strings.
    pub fn short_hex(&self, value: &str) -> String {
        if value.len() <= 16 || !value.is_ascii() {
            return value.to_string();
        }
        format!("{}...{}", &value[..8], &value[value.len() - 6..])
    }

    pub fn format_status(&self, status: TxStatus) -> String {
        match status {
            TxStatus::Success => status.as_str().green().to_string(),
            TxStatus::Failed => status.as_str().red().to_string(),
        }
    }

    pub fn format_transaction_table(&self, records: &[TransactionRecord]) -> String {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);

        table.add_row(Row::new(
            ["#", "Hash", "From", "Value (ETH)", "Status", "Time"]
                .iter()
                .map(|h| Cell::new(h).style_spec("b"))
                .collect(),
        ));

        for record in records {
            table.add_row(Row::new(vec![
                Cell::new(&record.id.to_string()),
                Cell::new(&self.short_hex(&record.hash)),
                Cell::new(&self.short_hex(&record.from)),
                Cell::new(&record.value).style_spec("r"),
                Cell::new(&self.format_status(record.status)),
                Cell::new(&record.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()),
            ]));
        }

        table.to_string()
    }

    /// Header line plus table for a served transaction list.
    pub fn format_transaction_list(
        &self,
        contract: &str,
        records: &[TransactionRecord],
        provenance: Provenance,
    ) -> String {
        let mut output = Vec::new();
        output.push(self.format_header(&format!("Transactions for {}", contract)));
        output.push(format!(
            "Source: {} | Count: {}",
            provenance.label(),
            records.len()
        ));
        if records.is_empty() {
            output.push("No transactions yet.".to_string());
        } else {
            output.push(self.format_transaction_table(records));
        }

        output.join("\n")
    }

    pub fn format_balance(&self, contract: &str, balance: &str) -> String {
        format!(
            "{}\nBalance: {} ETH",
            self.format_header(&format!("Contract {}", contract)),
            balance.bright_green()
        )
    }
}
