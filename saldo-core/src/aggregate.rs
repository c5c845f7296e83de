//! Date-range filtering and the two aggregation shapes the dashboard
//! renders: monthly flow and category breakdown.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::table::{Table, Value, COL_AMOUNT, COL_CATEGORY, COL_DATE};

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, d: NaiveDate) -> bool {
        d >= self.start && d <= self.end
    }
}

/// Sum of amounts in one calendar month. `month` is the first day of the
/// month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyFlow {
    pub month: NaiveDate,
    pub total: f64,
}

/// Sum of amounts for one category value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

/// Keep the rows whose `data` is a valid date inside `range`. Rows with a
/// missing date are excluded.
pub fn filter_by_date(table: &Table, range: DateRange) -> Table {
    let Some(col) = table.column_index(COL_DATE) else {
        return table.retain_rows(|_| false);
    };
    table.retain_rows(|i| {
        table
            .cell(i, col)
            .as_date()
            .is_some_and(|d| range.contains(d))
    })
}

/// Earliest and latest valid dates in the table, or `None` when no row has
/// one. Used to default the dashboard's date pickers.
pub fn date_bounds(table: &Table) -> Option<(NaiveDate, NaiveDate)> {
    let dates: Vec<NaiveDate> = table
        .column_values(COL_DATE)?
        .filter_map(Value::as_date)
        .collect();
    let min = dates.iter().min()?;
    let max = dates.iter().max()?;
    Some((*min, *max))
}

/// Sum of the `valor` column. Zero for tables without the column.
pub fn total_amount(table: &Table) -> f64 {
    table
        .column_values(COL_AMOUNT)
        .map(|vals| vals.filter_map(Value::as_number).sum())
        .unwrap_or(0.0)
}

/// Bucket rows by calendar month of `data` and sum `valor` per bucket,
/// ascending by month. Rows with missing dates are excluded.
pub fn monthly_flow(table: &Table) -> Vec<MonthlyFlow> {
    let Some(date_col) = table.column_index(COL_DATE) else {
        return Vec::new();
    };
    let amount_col = table.column_index(COL_AMOUNT);

    let mut buckets: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for (i, _) in table.rows().enumerate() {
        let Some(date) = table.cell(i, date_col).as_date() else {
            continue;
        };
        let month = NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
            .unwrap_or(date);
        let amount = amount_col
            .and_then(|c| table.cell(i, c).as_number())
            .unwrap_or(0.0);
        *buckets.entry(month).or_insert(0.0) += amount;
    }

    buckets
        .into_iter()
        .map(|(month, total)| MonthlyFlow { month, total })
        .collect()
}

/// Group rows with a non-missing `categoria` and sum `valor`, sorted by
/// total descending (ties by name, for a stable report). Returns `None`
/// when the table has no `categoria` column at all: the category chart is
/// an absent feature, not an error.
pub fn category_breakdown(table: &Table) -> Option<Vec<CategoryTotal>> {
    let cat_col = table.column_index(COL_CATEGORY)?;
    let amount_col = table.column_index(COL_AMOUNT);

    let mut groups: HashMap<String, f64> = HashMap::new();
    for (i, _) in table.rows().enumerate() {
        let Some(category) = table.cell(i, cat_col).as_text() else {
            continue;
        };
        let category = category.trim();
        if category.is_empty() {
            continue;
        }
        let amount = amount_col
            .and_then(|c| table.cell(i, c).as_number())
            .unwrap_or(0.0);
        *groups.entry(category.to_string()).or_insert(0.0) += amount;
    }

    let mut out: Vec<CategoryTotal> = groups
        .into_iter()
        .map(|(category, total)| CategoryTotal { category, total })
        .collect();
    out.sort_by(|a, b| {
        b.total
            .partial_cmp(&a.total)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.category.cmp(&b.category))
    });
    Some(out)
}

/// Rows sorted by `data` descending (newest first), missing dates last.
/// Used for the detail listing.
pub fn sorted_by_date_desc(table: &Table) -> Table {
    let Some(col) = table.column_index(COL_DATE) else {
        return table.clone();
    };
    let mut order: Vec<usize> = (0..table.n_rows()).collect();
    order.sort_by(|&a, &b| {
        let da = table.cell(a, col).as_date();
        let db = table.cell(b, col).as_date();
        match (da, db) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.cmp(&b),
        }
    });

    let mut out = Table::new(table.columns().to_vec());
    for i in order {
        out.push_row(table.rows().nth(i).map(|r| r.to_vec()).unwrap_or_default());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn table(rows: &[(Option<NaiveDate>, f64, Option<&str>)]) -> Table {
        let mut t = Table::new(vec![
            COL_DATE.to_string(),
            COL_AMOUNT.to_string(),
            COL_CATEGORY.to_string(),
        ]);
        for (d, v, c) in rows {
            t.push_row(vec![
                d.map(Value::Date).unwrap_or(Value::Missing),
                Value::Number(*v),
                c.map(|s| Value::Text(s.to_string())).unwrap_or(Value::Missing),
            ]);
        }
        t
    }

    #[test]
    fn test_filter_by_date_inclusive() {
        let t = table(&[
            (Some(date(2024, 1, 1)), 1.0, None),
            (Some(date(2024, 2, 15)), 2.0, None),
            (Some(date(2024, 3, 31)), 3.0, None),
            (None, 4.0, None),
        ]);
        let range = DateRange {
            start: date(2024, 1, 1),
            end: date(2024, 2, 15),
        };
        let f = filter_by_date(&t, range);
        assert_eq!(f.n_rows(), 2);
        assert_eq!(total_amount(&f), 3.0);
    }

    #[test]
    fn test_monthly_flow_buckets_and_orders() {
        let t = table(&[
            (Some(date(2024, 3, 10)), 30.0, None),
            (Some(date(2024, 1, 5)), 10.0, None),
            (Some(date(2024, 1, 20)), -4.0, None),
            (None, 999.0, None), // missing date never bucketed
        ]);
        let flow = monthly_flow(&t);
        assert_eq!(
            flow,
            vec![
                MonthlyFlow { month: date(2024, 1, 1), total: 6.0 },
                MonthlyFlow { month: date(2024, 3, 1), total: 30.0 },
            ]
        );
    }

    #[test]
    fn test_monthly_flow_empty_range_is_empty() {
        let t = table(&[(Some(date(2024, 1, 5)), 10.0, None)]);
        let range = DateRange {
            start: date(2025, 1, 1),
            end: date(2025, 12, 31),
        };
        let flow = monthly_flow(&filter_by_date(&t, range));
        assert!(flow.is_empty());
    }

    #[test]
    fn test_category_breakdown_sorted_descending() {
        let t = table(&[
            (Some(date(2024, 1, 1)), 5.0, Some("mercado")),
            (Some(date(2024, 1, 2)), 40.0, Some("aluguel")),
            (Some(date(2024, 1, 3)), 7.0, Some("mercado")),
            (Some(date(2024, 1, 4)), 1.0, None), // no category, excluded
        ]);
        let cats = category_breakdown(&t).unwrap();
        assert_eq!(
            cats,
            vec![
                CategoryTotal { category: "aluguel".to_string(), total: 40.0 },
                CategoryTotal { category: "mercado".to_string(), total: 12.0 },
            ]
        );
    }

    #[test]
    fn test_category_breakdown_absent_column() {
        let mut t = Table::new(vec![COL_DATE.to_string(), COL_AMOUNT.to_string()]);
        t.push_row(vec![Value::Date(date(2024, 1, 1)), Value::Number(1.0)]);
        assert!(category_breakdown(&t).is_none());
    }

    #[test]
    fn test_date_bounds() {
        let t = table(&[
            (Some(date(2024, 5, 2)), 0.0, None),
            (None, 0.0, None),
            (Some(date(2024, 1, 9)), 0.0, None),
        ]);
        assert_eq!(date_bounds(&t), Some((date(2024, 1, 9), date(2024, 5, 2))));

        let none = table(&[(None, 0.0, None)]);
        assert_eq!(date_bounds(&none), None);
    }

    #[test]
    fn test_sorted_by_date_desc_missing_last() {
        let t = table(&[
            (Some(date(2024, 1, 1)), 1.0, None),
            (None, 2.0, None),
            (Some(date(2024, 6, 1)), 3.0, None),
        ]);
        let s = sorted_by_date_desc(&t);
        assert_eq!(s.get(0, COL_AMOUNT).unwrap().as_number(), Some(3.0));
        assert_eq!(s.get(1, COL_AMOUNT).unwrap().as_number(), Some(1.0));
        assert_eq!(s.get(2, COL_AMOUNT).unwrap().as_number(), Some(2.0));
    }
}
