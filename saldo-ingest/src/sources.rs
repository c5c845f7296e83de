//! The four fixed data sources the dashboard knows about.

use serde::{Deserialize, Serialize};

/// A kind of CSV export, each with its own filename pattern. Statements
/// are the mandatory source; the rest are secondary and can be switched
/// off to reproduce the statements-only dashboard variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    Statements,
    CreditCard,
    Investments,
    Loans,
}

impl SourceKind {
    pub const ALL: [SourceKind; 4] = [
        SourceKind::Statements,
        SourceKind::CreditCard,
        SourceKind::Investments,
        SourceKind::Loans,
    ];

    pub fn pattern(self) -> &'static str {
        match self {
            SourceKind::Statements => "extratos_*.csv",
            SourceKind::CreditCard => "cartao_*.csv",
            SourceKind::Investments => "investimentos*.csv",
            SourceKind::Loans => "emprestimos*.csv",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SourceKind::Statements => "Bank account",
            SourceKind::CreditCard => "Credit card",
            SourceKind::Investments => "Investments",
            SourceKind::Loans => "Loans",
        }
    }

    /// The dashboard cannot render at all without this source.
    pub fn is_mandatory(self) -> bool {
        matches!(self, SourceKind::Statements)
    }

    /// Sources to load: statements always, the rest only when secondary
    /// sources are enabled.
    pub fn enabled(include_secondary: bool) -> Vec<SourceKind> {
        Self::ALL
            .into_iter()
            .filter(|s| include_secondary || s.is_mandatory())
            .collect()
    }
}
