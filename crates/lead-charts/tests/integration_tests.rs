//! Integration tests for the lead chart pipeline.
//!
//! These tests run the full pipeline over the CSV exports in `tests/fixtures`.

use lead_charts::{
    AggregateRow, ChartConfig, ChartKind, Dashboard, DashboardOutput, FilterDimension,
    FilterSelection, LeadChartsError, RankingConfig, ReportGenerator,
};
use pretty_assertions::assert_eq;
use std::path::PathBuf;

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_sample() -> Dashboard {
    Dashboard::from_csv(fixtures_path().join("leads_sample.csv")).expect("sample export loads")
}

fn rows(output: &DashboardOutput, kind: ChartKind) -> Vec<AggregateRow> {
    output
        .chart(kind)
        .and_then(|chart| chart.table())
        .map(|table| table.rows.clone())
        .unwrap_or_default()
}

fn compute_all(dashboard: &Dashboard) -> DashboardOutput {
    dashboard
        .compute(&FilterSelection::all(), &RankingConfig::default())
        .unwrap()
}

// ============================================================================
// Ingestion
// ============================================================================

#[test]
fn test_ingestion_summary() {
    let dashboard = load_sample();
    let summary = dashboard.base().summary();

    assert_eq!(summary.rows_read, 26);
    assert_eq!(summary.rows_kept, 22);
    assert_eq!(summary.rows_dropped(), 4);
    assert_eq!(summary.blocked_sources.get("HYPERFLOW"), Some(&2));
    assert_eq!(summary.blocked_sources.get("TALLOS"), Some(&1));
    assert_eq!(summary.blocked_sources.get("META - Whatsapp"), Some(&1));
    // empty, non-numeric and negative commissions
    assert_eq!(summary.unbinned_commissions, 3);
}

#[test]
fn test_base_table_is_normalized() {
    let dashboard = load_sample();
    let leads = dashboard.base().leads();

    for lead in leads {
        assert!(!lead.stage.contains("(Pipeline de"));
        assert_eq!(lead.stage, lead.stage.to_uppercase());
        assert_eq!(lead.tax_id, "12345678900");
        assert!(!["HYPERFLOW", "TALLOS", "META - Whatsapp"].contains(&lead.source.as_str()));
    }

    let first = &leads[0];
    assert_eq!(first.id, "101");
    assert_eq!(first.stage, "NOVO LEAD");
    assert_eq!(first.commission_total, Some(300.0));
    assert_eq!(first.campaign_tag, "");

    // currency marker is stripped
    assert_eq!(leads[1].commission_total, Some(650.0));
}

#[test]
fn test_filter_options() {
    let dashboard = load_sample();
    let options = dashboard.options();

    assert_eq!(options.stages, vec!["NOVO LEAD", "EM NEGOCIACAO", "GANHO"]);
    assert_eq!(options.campaign_types, vec!["ATIVA", "RECEPTIVA"]);
    // owners seen only on blocked rows are not offered
    assert_eq!(options.owners, vec!["Ana", "Bia"]);
}

#[test]
fn test_wrong_column_count_is_rejected() {
    let result = Dashboard::from_csv(fixtures_path().join("leads_bad_schema.csv"));
    let err = result.unwrap_err();

    assert!(err.is_schema_mismatch());
    assert_eq!(err.error_code(), "SCHEMA_MISMATCH");
    assert!(err.to_string().contains("expected 12 columns, found 11"));
}

#[test]
fn test_short_data_row_is_rejected() {
    let err = Dashboard::from_csv(fixtures_path().join("leads_short_row.csv")).unwrap_err();

    assert_eq!(err.error_code(), "SCHEMA_MISMATCH");
    assert!(err.to_string().contains("at row 2: expected 12 columns, found 11"));
}

#[test]
fn test_long_data_row_is_rejected() {
    let err = Dashboard::from_csv(fixtures_path().join("leads_long_row.csv")).unwrap_err();

    assert_eq!(err.error_code(), "SCHEMA_MISMATCH");
    assert!(err.to_string().contains("at row 2: expected 12 columns, found 13"));
}

#[test]
fn test_duplicate_ids_are_rejected() {
    let err = Dashboard::from_csv(fixtures_path().join("leads_duplicate_ids.csv")).unwrap_err();
    assert_eq!(err.error_code(), "DUPLICATE_LEAD_ID");
}

#[test]
fn test_missing_file_is_an_io_error() {
    let err = Dashboard::from_csv(fixtures_path().join("does_not_exist.csv")).unwrap_err();
    assert!(matches!(
        err.error_code(),
        "IO_ERROR" | "POLARS_ERROR"
    ));
    assert!(!err.is_recoverable());
}

// ============================================================================
// Charts Without Filters
// ============================================================================

#[test]
fn test_leads_by_source() {
    let output = compute_all(&load_sample());

    assert_eq!(output.base_rows, 22);
    assert_eq!(output.filtered_rows, 22);
    // ANUNCIO has only 2 leads and is suppressed
    assert_eq!(
        rows(&output, ChartKind::LeadsBySource),
        vec![
            AggregateRow::single("GOOGLE", 10),
            AggregateRow::single("META", 7),
            AggregateRow::single("INDICACAO", 3),
        ]
    );
}

#[test]
fn test_stage_distribution_by_source() {
    let output = compute_all(&load_sample());

    assert_eq!(
        rows(&output, ChartKind::StageDistributionBySource),
        vec![
            AggregateRow::pair("GOOGLE", "EM NEGOCIACAO", 4),
            AggregateRow::pair("GOOGLE", "NOVO LEAD", 6),
            AggregateRow::pair("META", "GANHO", 4),
            AggregateRow::pair("META", "NOVO LEAD", 3),
        ]
    );
}

#[test]
fn test_plans_by_source() {
    let output = compute_all(&load_sample());

    // every other (plan, source) pair has 3 leads or fewer
    assert_eq!(
        rows(&output, ChartKind::PlansBySource),
        vec![
            AggregateRow::pair("UNIMED", "GOOGLE", 7),
            AggregateRow::pair("UNIMED", "META", 6),
        ]
    );
}

#[test]
fn test_plans_by_commission_band() {
    let output = compute_all(&load_sample());

    assert_eq!(
        rows(&output, ChartKind::PlansByCommissionBand),
        vec![
            AggregateRow::pair("UNIMED", "0-499", 5),
            AggregateRow::pair("UNIMED", "500-800", 2),
            AggregateRow::pair("UNIMED", "800-1200", 2),
            AggregateRow::pair("UNIMED", "1200-1500", 3),
            AggregateRow::pair("AMIL", "0-499", 1),
            AggregateRow::pair("AMIL", "500-800", 1),
            AggregateRow::pair("AMIL", "1800+", 2),
            AggregateRow::pair("BRADESCO", "500-800", 2),
            AggregateRow::pair("BRADESCO", "1800+", 1),
        ]
    );
}

#[test]
fn test_top_n_limits_band_chart() {
    let dashboard = load_sample();
    let output = dashboard
        .compute(&FilterSelection::all(), &RankingConfig::new(5, 2).unwrap())
        .unwrap();

    let table = output
        .chart(ChartKind::PlansByCommissionBand)
        .unwrap()
        .table()
        .unwrap();
    assert_eq!(table.primary_categories(), vec!["UNIMED", "AMIL"]);
    assert_eq!(table.totals().get("UNIMED"), Some(&12));
    assert_eq!(table.totals().get("AMIL"), Some(&4));
}

#[test]
fn test_invalid_top_n_is_rejected() {
    let ranking = RankingConfig {
        top_plans_by_source: 5,
        top_plans_by_band: 0,
    };
    let err: LeadChartsError = load_sample()
        .compute(&FilterSelection::all(), &ranking)
        .unwrap_err();
    assert_eq!(err.error_code(), "INVALID_CONFIG");
    assert!(err.is_recoverable());
}

// ============================================================================
// Filters
// ============================================================================

#[test]
fn test_owner_filter_only_affects_source_chart() {
    let dashboard = load_sample();
    let unfiltered = compute_all(&dashboard);
    let output = dashboard
        .compute(
            &FilterSelection::all().with(FilterDimension::Owner, ["Bia"]),
            &RankingConfig::default(),
        )
        .unwrap();

    assert_eq!(output.filtered_rows, 10);
    // GOOGLE and INDICACAO tie at 3; the smaller key comes first
    assert_eq!(
        rows(&output, ChartKind::LeadsBySource),
        vec![
            AggregateRow::single("META", 4),
            AggregateRow::single("GOOGLE", 3),
            AggregateRow::single("INDICACAO", 3),
        ]
    );

    for kind in [
        ChartKind::StageDistributionBySource,
        ChartKind::PlansBySource,
        ChartKind::PlansByCommissionBand,
    ] {
        assert_eq!(output.chart(kind), unfiltered.chart(kind));
    }
}

#[test]
fn test_filters_are_conjunctive() {
    let dashboard = load_sample();
    let filters = FilterSelection::all()
        .with(FilterDimension::Stage, ["GANHO"])
        .with(FilterDimension::CampaignType, ["ATIVA"]);
    let output = dashboard.compute(&filters, &RankingConfig::default()).unwrap();

    assert_eq!(output.filtered_rows, 5);
    assert_eq!(
        rows(&output, ChartKind::LeadsBySource),
        vec![AggregateRow::single("META", 3)]
    );
}

#[test]
fn test_explicit_full_selection_matches_default() {
    let dashboard = load_sample();
    let explicit = dashboard.options().select_all();

    let default_output = compute_all(&dashboard);
    let explicit_output = dashboard
        .compute(&explicit, &RankingConfig::default())
        .unwrap();
    assert_eq!(default_output, explicit_output);
}

#[test]
fn test_no_data_for_filters() {
    let dashboard = load_sample();
    // Carla only owns leads from blocked sources
    let output = dashboard
        .compute(
            &FilterSelection::all().with(FilterDimension::Owner, ["Carla"]),
            &RankingConfig::default(),
        )
        .unwrap();

    assert_eq!(output.filtered_rows, 0);
    assert!(output.no_data_for_filters());
    // the page shows only the warning, not the base-table charts
    for kind in ChartKind::ALL {
        assert!(output.chart(kind).unwrap().is_no_data());
    }
}

#[test]
fn test_filters_from_json_file() {
    let content = std::fs::read_to_string(fixtures_path().join("filters_bia_ativa.json")).unwrap();
    let filters: FilterSelection = serde_json::from_str(&content).unwrap();
    let output = load_sample()
        .compute(&filters, &RankingConfig::default())
        .unwrap();

    // Bia's ATIVA leads: GOOGLE 3, META 4
    assert_eq!(output.filtered_rows, 7);
    assert_eq!(
        rows(&output, ChartKind::LeadsBySource),
        vec![
            AggregateRow::single("META", 4),
            AggregateRow::single("GOOGLE", 3),
        ]
    );
}

// ============================================================================
// Configuration and Reporting
// ============================================================================

#[test]
fn test_custom_thresholds() {
    let config = ChartConfig::builder()
        .source_count_threshold(0)
        .plan_source_threshold(2)
        .build()
        .unwrap();
    let dashboard = load_sample().with_config(config).unwrap();
    let output = compute_all(&dashboard);

    assert_eq!(rows(&output, ChartKind::LeadsBySource).len(), 4);
    let plans = output.chart(ChartKind::PlansBySource).unwrap().table().unwrap();
    assert_eq!(plans.primary_categories(), vec!["UNIMED", "AMIL"]);
}

#[test]
fn test_report_serializes_outcomes() {
    let dashboard = load_sample();
    let filters = FilterSelection::all().with(FilterDimension::Owner, ["Carla"]);
    let ranking = RankingConfig::default();
    let output = dashboard.compute(&filters, &ranking).unwrap();
    let report =
        ReportGenerator::build_report("leads_sample.csv", dashboard.base(), &filters, &ranking, &output);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["no_data_for_filters"], true);
    assert_eq!(json["charts"][0]["status"], "no_data");
    assert_eq!(json["charts"][1]["status"], "no_data");
    assert_eq!(
        json["charts"][1]["message"],
        "No data available for the selected filters"
    );
    assert_eq!(json["ingestion"]["unbinned_commissions"], 3);
    assert_eq!(json["filters"]["owners"][0], "Carla");
    assert_eq!(json["theme"]["legend"]["title"], "Legenda");
}

#[test]
fn test_chart_dataframe_hand_off() {
    let output = compute_all(&load_sample());
    let table = output
        .chart(ChartKind::StageDistributionBySource)
        .unwrap()
        .table()
        .unwrap();
    let df = table.to_dataframe().unwrap();

    assert_eq!(df.shape(), (4, 3));
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|n| n.to_string())
        .collect();
    assert_eq!(names, vec!["origem", "etapa", "quantidade"]);
}
