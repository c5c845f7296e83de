//! saldo-core: table model, normalization, and aggregation for the saldo dashboard

pub mod aggregate;
pub mod normalize;
pub mod table;

pub use aggregate::{
    category_breakdown, date_bounds, filter_by_date, monthly_flow, sorted_by_date_desc,
    total_amount, CategoryTotal, DateRange, MonthlyFlow,
};
pub use normalize::normalize;
pub use table::{canonical_name, Table, Value};
pub use table::{COL_AMOUNT, COL_CATEGORY, COL_DATE, COL_DESCRIPTION, COL_ORIGIN};
