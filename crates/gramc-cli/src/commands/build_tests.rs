use gramc_lib::ProcessReport;

use super::build::report_text;

#[test]
fn report_text_lists_printed_grammars_then_skipped_files() {
    let report = ProcessReport {
        compiled: vec!["P.g".to_string()],
        skipped: vec!["L.g".to_string(), "sub/M.g".to_string()],
        printed: vec!["parser grammar P;\n\na : B ;".to_string()],
        ..ProcessReport::default()
    };

    insta::assert_snapshot!(report_text(&report), @r"
    parser grammar P;

    a : B ;
    L.g is up to date
    sub/M.g is up to date
    ");
}

#[test]
fn quiet_run_prints_nothing() {
    let report = ProcessReport {
        compiled: vec!["P.g".to_string()],
        ..ProcessReport::default()
    };

    assert_eq!(report_text(&report), "");
}

#[test]
fn json_report_shape() {
    let report = ProcessReport {
        compiled: vec!["L.g".to_string()],
        failed: vec!["Bad.g".to_string()],
        ..ProcessReport::default()
    };

    insta::assert_snapshot!(serde_json::to_string_pretty(&report).unwrap(), @r#"
    {
      "compiled": [
        "L.g"
      ],
      "skipped": [],
      "failed": [
        "Bad.g"
      ],
      "generated": [],
      "dependencies": [],
      "printed": [],
      "reports": []
    }
    "#);
}
