use crate::domain::{Program, ProgramId};
use crate::tests::utils::{body_string, get, header, init_test_app};
use std::io::Read;

#[test]
fn csv_export_honours_filters_and_selection() {
    let app = init_test_app();
    let resp = get(&app, "/export/csv?ids=1,3", None).expect("Failed to handle request");
    assert_eq!(resp.status(), 200);
    assert!(header(&resp, "Content-Type").starts_with("text/csv"));
    assert!(header(&resp, "Content-Disposition").contains(".csv"));

    let body = body_string(resp);
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("\"Program Name\""));
    assert!(lines[1].starts_with("\"Garcia Summer Program\""));
    assert!(lines[2].starts_with("\"Research Science Institute\""));
}

#[test]
fn checkbox_style_ids_are_merged() {
    let app = init_test_app();
    let body = body_string(get(&app, "/export/json?ids=1&ids=9", None).unwrap());
    let programs: Vec<Program> = serde_json::from_str(&body).unwrap();
    let ids: Vec<ProgramId> = programs.into_iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![ProgramId::Int(9), ProgramId::Int(1)]);
}

#[test]
fn json_export_without_ids_exports_the_filtered_set() {
    let app = init_test_app();
    let body = body_string(get(&app, "/export/json?costCategory=PAID", None).unwrap());
    let programs: Vec<Program> = serde_json::from_str(&body).unwrap();
    assert_eq!(programs.len(), 5);
    assert!(programs.iter().all(|p| p.cost_category.as_ref().map(|c| c.as_str()) == Some("PAID")));
}

#[test]
fn xlsx_export_is_a_zip() {
    let app = init_test_app();
    let resp = get(&app, "/export/xlsx", None).unwrap();
    assert_eq!(
        header(&resp, "Content-Type"),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    let mut bytes = Vec::new();
    resp.into_body().reader().read_to_end(&mut bytes).unwrap();
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn print_view_triggers_print_dialog() {
    let app = init_test_app();
    let body = body_string(get(&app, "/export/print?ids=4", None).unwrap());
    assert!(body.contains("window.print()"));
    assert!(body.contains("Summer Science Program in Astrophysics"));
    assert!(!body.contains("Ross Mathematics Program"));
}

#[test]
fn unknown_format_is_not_found() {
    let app = init_test_app();
    assert!(get(&app, "/export/pdf", None).is_err());
}
