//! Dashboard assembly and text rendering: load every enabled source,
//! normalize, compute totals for the selected date range, and print the
//! KPI block, monthly flow, category breakdown, and per-source detail.

use std::path::Path;

use anyhow::Result;
use chrono::NaiveDate;
use saldo_core::{
    category_breakdown, date_bounds, filter_by_date, monthly_flow, normalize, sorted_by_date_desc,
    total_amount, DateRange, Table, Value, COL_DATE,
};
use saldo_ingest::{IngestCache, IngestWarning, SourceKind};

use crate::config::{BalanceMode, Config};

/// Guidance printed when the mandatory statement source is unusable.
pub const NO_DATA_GUIDANCE: &str = "No usable bank statement data found. Put \
at least one extratos_*.csv with `data` and `valor` columns in the data \
directory and run again.";

/// How many rows of each source the detail section lists.
const DETAIL_ROWS: usize = 10;

/// All enabled sources, loaded and normalized. Disabled sources are empty
/// tables so callers need no special cases.
#[derive(Debug, Default)]
pub struct Sources {
    pub statements: Table,
    pub credit_card: Table,
    pub investments: Table,
    pub loans: Table,
    pub warnings: Vec<IngestWarning>,
}

impl Sources {
    pub fn get(&self, kind: SourceKind) -> &Table {
        match kind {
            SourceKind::Statements => &self.statements,
            SourceKind::CreditCard => &self.credit_card,
            SourceKind::Investments => &self.investments,
            SourceKind::Loans => &self.loans,
        }
    }
}

/// Headline figures for the selected range. Statement flow is range
/// filtered; investments and loans are lifetime totals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    pub account: f64,
    pub investments: f64,
    pub loans: f64,
}

impl Totals {
    pub fn net(&self) -> f64 {
        self.account + self.investments - self.loans
    }

    pub fn headline(&self, mode: BalanceMode) -> f64 {
        match mode {
            BalanceMode::CashOnly => self.account,
            BalanceMode::NetWorth => self.net(),
        }
    }
}

/// Everything the report and insights commands share.
#[derive(Debug)]
pub struct Dashboard {
    pub sources: Sources,
    pub range: DateRange,
    pub totals: Totals,
}

/// Load and normalize every enabled source.
pub fn load_sources(
    cache: &mut IngestCache,
    data_dir: &Path,
    include_secondary: bool,
) -> Result<Sources> {
    let mut out = Sources::default();
    for kind in SourceKind::enabled(include_secondary) {
        let report = cache.load(data_dir, kind.pattern())?;
        let table = normalize(&report.table);
        out.warnings.extend(report.warnings);
        match kind {
            SourceKind::Statements => out.statements = table,
            SourceKind::CreditCard => out.credit_card = table,
            SourceKind::Investments => out.investments = table,
            SourceKind::Loans => out.loans = table,
        }
    }
    Ok(out)
}

/// Outcome of [`prepare`]: a renderable dashboard, or the terminal
/// precondition (statements empty after normalization, lacking a date
/// column, or with no parseable date to anchor the range on). The
/// ingestion warnings survive either way.
#[derive(Debug)]
pub enum Prepared {
    Ready(Dashboard),
    NoData(Vec<IngestWarning>),
}

/// Load everything and compute the range and totals.
pub fn prepare(
    cache: &mut IngestCache,
    cfg: &Config,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<Prepared> {
    let sources = load_sources(cache, &cfg.data_dir, cfg.include_secondary_sources)?;

    if sources.statements.is_empty() || !sources.statements.has_column(COL_DATE) {
        return Ok(Prepared::NoData(sources.warnings));
    }
    let Some((min, max)) = date_bounds(&sources.statements) else {
        return Ok(Prepared::NoData(sources.warnings));
    };

    let range = DateRange {
        start: from.unwrap_or(min),
        end: to.unwrap_or(max),
    };

    let in_range = filter_by_date(&sources.statements, range);
    let totals = Totals {
        account: total_amount(&in_range),
        investments: total_amount(&sources.investments),
        loans: total_amount(&sources.loans),
    };

    Ok(Prepared::Ready(Dashboard {
        sources,
        range,
        totals,
    }))
}

/// Render the full text dashboard.
pub fn render(dash: &Dashboard, cfg: &Config) {
    let in_range = filter_by_date(&dash.sources.statements, dash.range);

    println!("saldo: {} to {}", dash.range.start, dash.range.end);
    println!();

    // KPI block.
    println!("Account balance   {:>18}", format_brl(dash.totals.account));
    if cfg.include_secondary_sources {
        println!("Investments       {:>18}", format_brl(dash.totals.investments));
        println!("Loans             {:>18}", format_brl(dash.totals.loans));
    }
    let label = match cfg.balance {
        BalanceMode::CashOnly => "Balance (cash)",
        BalanceMode::NetWorth => "Net total",
    };
    println!("{label:<17} {:>18}", format_brl(dash.totals.headline(cfg.balance)));
    println!();

    // Monthly flow.
    println!("Monthly flow");
    let flow = monthly_flow(&in_range);
    if flow.is_empty() {
        println!("  (no rows in range)");
    }
    for f in &flow {
        println!("  {}  {:>18}", f.month.format("%Y-%m"), format_brl(f.total));
    }
    println!();

    // Category breakdown, only when the column exists at all.
    if let Some(cats) = category_breakdown(&in_range) {
        println!("Spending by category");
        for c in &cats {
            println!("  {:<24} {:>18}", c.category, format_brl(c.total));
        }
        println!();
    }

    // Per-source detail, newest first.
    for kind in SourceKind::enabled(cfg.include_secondary_sources) {
        let table = if kind == SourceKind::Statements {
            &in_range
        } else {
            dash.sources.get(kind)
        };
        if table.is_empty() {
            continue;
        }
        println!("{} ({} records)", kind.label(), table.n_rows());
        let sorted = sorted_by_date_desc(table);
        for (i, row) in sorted.rows().enumerate() {
            if i >= DETAIL_ROWS {
                println!("  ...");
                break;
            }
            println!("  {}", format_row(&sorted, row));
        }
        println!();
    }
}

fn format_row(table: &Table, row: &[Value]) -> String {
    let mut parts = Vec::new();
    for (col, cell) in table.columns().iter().zip(row) {
        let rendered = match cell {
            Value::Missing => continue,
            Value::Text(s) => s.clone(),
            Value::Number(n) => format_brl(*n),
            Value::Date(d) => d.to_string(),
        };
        parts.push(format!("{col}={rendered}"));
    }
    parts.join("  ")
}

/// Brazilian currency rendering: dot thousands, comma decimals.
pub fn format_brl(v: f64) -> String {
    let cents = (v.abs() * 100.0).round() as i64;
    let int = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::new();
    for (i, ch) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if v < 0.0 && cents > 0 { "-" } else { "" };
    format!("R$ {sign}{grouped},{frac:02}")
}

/// The single user-role prompt for the insights call.
pub fn build_insights_prompt(totals: &Totals, end: NaiveDate) -> String {
    format!(
        "I have the following personal finance figures up to {end}:\n\
         - Account balance in the period: {}\n\
         - Total investments: {}\n\
         - Total loans: {}\n\
         Write a brief summary of insights and recommendations.",
        format_brl(totals.account),
        format_brl(totals.investments),
        format_brl(totals.loans),
    )
}
