//! End-to-end ingestion scenarios: discover, parse, tag, concatenate,
//! then normalize via saldo-core.

use std::fs;

use chrono::NaiveDate;
use saldo_core::{
    category_breakdown, monthly_flow, normalize, total_amount, COL_AMOUNT, COL_DATE, COL_ORIGIN,
};
use saldo_ingest::{load_csvs, IngestWarning, SourceKind};

#[test]
fn statement_plus_empty_file_scenario() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("extratos_jan.csv"),
        "data,valor\n01/03/2024,100.00\n",
    )
    .unwrap();
    fs::write(dir.path().join("extratos_feb.csv"), "").unwrap();

    let report = load_csvs(dir.path(), SourceKind::Statements.pattern()).unwrap();

    assert_eq!(report.table.n_rows(), 1);
    assert_eq!(
        report.table.get(0, COL_ORIGIN).unwrap().as_text(),
        Some("extratos_jan")
    );
    assert_eq!(
        report.warnings,
        vec![IngestWarning::EmptyFile("extratos_feb.csv".to_string())]
    );
}

#[test]
fn ingested_rows_all_carry_origin() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("extratos_jan.csv"),
        "data,valor\n01/01/2024,10\n02/01/2024,20\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("extratos_fev.csv"),
        "data,valor\n01/02/2024,30\n",
    )
    .unwrap();

    let report = load_csvs(dir.path(), "extratos_*.csv").unwrap();
    assert_eq!(report.table.n_rows(), 3);
    for row in 0..report.table.n_rows() {
        let origin = report.table.get(row, COL_ORIGIN).unwrap();
        assert!(origin.as_text().is_some());
    }
}

#[test]
fn normalized_pipeline_produces_aggregates() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("extratos_2024.csv"),
        concat!(
            " Data ,VALOR,categoria\n",
            "05/01/2024,\"1.500,00\",salario\n",
            "20/01/2024,-300.25,mercado\n",
            "10/02/2024,abc,mercado\n",
            "bogus,-50,lazer\n",
        ),
    )
    .unwrap();

    let report = load_csvs(dir.path(), "extratos_*.csv").unwrap();
    let table = normalize(&report.table);

    // The unparseable amount is zero, not missing.
    assert_eq!(table.get(2, COL_AMOUNT).unwrap().as_number(), Some(0.0));
    // The unparseable date is the missing marker.
    assert!(table.get(3, COL_DATE).unwrap().is_missing());

    let flow = monthly_flow(&table);
    assert_eq!(
        flow.iter().map(|f| f.month).collect::<Vec<_>>(),
        vec![
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        ]
    );
    assert!((flow[0].total - 1199.75).abs() < 1e-9);

    // The bogus-date row still counts toward category totals.
    let cats = category_breakdown(&table).unwrap();
    assert_eq!(cats[0].category, "salario");
    assert!((total_amount(&table) - 1149.75).abs() < 1e-9);
}

#[test]
fn normalizing_twice_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("extratos_a.csv"),
        "Data,Valor,Descricao\n03/04/2024,12.50,padaria\nxx,abc,\n",
    )
    .unwrap();

    let report = load_csvs(dir.path(), "extratos_*.csv").unwrap();
    let once = normalize(&report.table);
    assert_eq!(once, normalize(&once));
}

#[test]
fn headerless_and_empty_files_contribute_nothing() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("extratos_blank.csv"), "").unwrap();
    fs::write(dir.path().join("extratos_newlines.csv"), "\n\n").unwrap();

    let report = load_csvs(dir.path(), "extratos_*.csv").unwrap();
    assert!(report.table.is_empty());
    assert_eq!(report.warnings.len(), 2);

    let n = normalize(&report.table);
    assert!(n.is_empty());
}
