//! CSV input parsing for order and precision files.
//!
//! Both inputs are small, comma-delimited tables with a header line;
//! fields are looked up by column name so column order does not matter.

use std::collections::HashMap;

use sirocco_core::error::ConfigError;
use sirocco_core::types::AccountId;
use sirocco_engine::OrderRow;

/// Decimal scales for one account's orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Precision {
    /// Decimal places for prices.
    pub price: u32,
    /// Decimal places for quantities.
    pub quantity: u32,
}

/// Reads the order file (`Account, Pair, Direction, Quantity, Price`).
pub fn read_orders(path: &str) -> Result<Vec<OrderRow>, ConfigError> {
    let content = read_file(path)?;
    parse_orders(path, &content)
}

/// Reads the precision file
/// (`Account, Price Precision, Quantity Precision`).
pub fn read_precision(path: &str) -> Result<HashMap<AccountId, Precision>, ConfigError> {
    let content = read_file(path)?;
    parse_precision(path, &content)
}

fn read_file(path: &str) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|e| ConfigError::InvalidInput {
        path: path.to_string(),
        reason: e.to_string(),
    })
}

fn parse_orders(path: &str, content: &str) -> Result<Vec<OrderRow>, ConfigError> {
    let table = Table::parse(path, content)?;
    let mut rows = Vec::new();
    for record in &table.records {
        rows.push(OrderRow {
            account_id: parse_account(path, table.field(record, "Account")?)?,
            pair: table.field(record, "Pair")?.to_string(),
            direction: table.field(record, "Direction")?.to_string(),
            quantity: table.field(record, "Quantity")?.to_string(),
            price: table.field(record, "Price")?.to_string(),
        });
    }
    Ok(rows)
}

fn parse_precision(
    path: &str,
    content: &str,
) -> Result<HashMap<AccountId, Precision>, ConfigError> {
    let table = Table::parse(path, content)?;
    let mut precision = HashMap::new();
    for record in &table.records {
        let account_id = parse_account(path, table.field(record, "Account")?)?;
        let price = parse_scale(path, table.field(record, "Price Precision")?)?;
        let quantity = parse_scale(path, table.field(record, "Quantity Precision")?)?;
        precision.insert(account_id, Precision { price, quantity });
    }
    Ok(precision)
}

fn parse_account(path: &str, value: &str) -> Result<AccountId, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidInput {
        path: path.to_string(),
        reason: format!("'{value}' is not an account id"),
    })
}

fn parse_scale(path: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidInput {
        path: path.to_string(),
        reason: format!("'{value}' is not a precision"),
    })
}

/// A parsed comma-delimited table with header-indexed field access.
struct Table {
    path: String,
    columns: HashMap<String, usize>,
    records: Vec<Vec<String>>,
}

impl Table {
    fn parse(path: &str, content: &str) -> Result<Self, ConfigError> {
        let mut lines = content.lines().filter(|line| !line.trim().is_empty());
        let header = lines.next().ok_or_else(|| ConfigError::InvalidInput {
            path: path.to_string(),
            reason: "file is empty".to_string(),
        })?;

        let columns = split_line(header)
            .into_iter()
            .enumerate()
            .map(|(index, name)| (name, index))
            .collect();
        let records = lines.map(split_line).collect();

        Ok(Self {
            path: path.to_string(),
            columns,
            records,
        })
    }

    fn field<'a>(&self, record: &'a [String], column: &str) -> Result<&'a str, ConfigError> {
        let index = *self
            .columns
            .get(column)
            .ok_or_else(|| ConfigError::InvalidInput {
                path: self.path.clone(),
                reason: format!("missing column '{column}'"),
            })?;
        record
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| ConfigError::InvalidInput {
                path: self.path.clone(),
                reason: format!("row is missing the '{column}' field"),
            })
    }
}

fn split_line(line: &str) -> Vec<String> {
    line.split(',').map(|field| field.trim().to_string()).collect()
}
