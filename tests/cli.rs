mod common;

use std::fs;

use assert_cmd::Command;
use common::{TestWorkspace, numbered_sheet};
use predicates::prelude::*;
use predicates::str::contains;

fn appointment_cards() -> Command {
    Command::cargo_bin("appointment-cards").expect("binary exists")
}

#[test]
fn view_prints_total_page_and_grid() {
    let workspace = TestWorkspace::new();
    let sheet = workspace.sample_sheet();
    appointment_cards()
        .args(["view", "-i", sheet.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("Total de Atendimentos: 4"))
        .stdout(contains("Page 1/1"))
        .stdout(contains("OrderId"))
        .stdout(contains("OS-104"));
}

#[test]
fn view_search_narrows_to_matching_defect() {
    let workspace = TestWorkspace::new();
    let sheet = workspace.sample_sheet();
    appointment_cards()
        .args(["view", "-i", sheet.to_str().unwrap(), "--search", "tela"])
        .assert()
        .success()
        .stdout(contains("Total de Atendimentos: 1"))
        .stdout(contains("OS-102"))
        .stdout(contains("OS-101").not());
}

#[test]
fn view_renders_cards_for_a_selected_day() {
    let workspace = TestWorkspace::new();
    let sheet = workspace.sample_sheet();
    appointment_cards()
        .args([
            "view",
            "-i",
            sheet.to_str().unwrap(),
            "--cards",
            "--date",
            "07/05/2024",
        ])
        .assert()
        .success()
        .stdout(contains("Total de Atendimentos: 1"))
        .stdout(contains("Carla Dias"))
        .stdout(contains("postalCode"))
        .stdout(contains("01305-000"));
}

#[test]
fn view_falls_back_to_first_page_when_page_is_out_of_range() {
    let workspace = TestWorkspace::new();
    let sheet = workspace.write("many.csv", &numbered_sheet(25));
    appointment_cards()
        .args(["view", "-i", sheet.to_str().unwrap(), "--page", "3"])
        .assert()
        .success()
        .stdout(contains("Page 3/3"))
        .stdout(contains("OS-24"));

    appointment_cards()
        .args([
            "view",
            "-i",
            sheet.to_str().unwrap(),
            "--page",
            "9",
            "--page-size",
            "24",
        ])
        .assert()
        .success()
        .stdout(contains("Page 1/2"));
}

#[test]
fn export_writes_tabular_csv_for_selected_days() {
    let workspace = TestWorkspace::new();
    let sheet = workspace.sample_sheet();
    let output = workspace.path().join("report.csv");
    appointment_cards()
        .args([
            "export",
            "-i",
            sheet.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "-d",
            "06/05/2024",
        ])
        .assert()
        .success();

    let contents = fs::read_to_string(&output).expect("read export");
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines[0], "Date,OrderId,ClientName,Product,Manufacturer,Defect");
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[2], "06/05/2024,OS-102,Bruno Lima,TV,Samsung,Tela quebrada");
}

#[test]
fn export_writes_cards_as_json() {
    let workspace = TestWorkspace::new();
    let sheet = workspace.sample_sheet();
    let output = workspace.path().join("cards.json");
    appointment_cards()
        .args([
            "export",
            "-i",
            sheet.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--projection",
            "cards",
        ])
        .assert()
        .success();

    let contents = fs::read_to_string(&output).expect("read export");
    let report: serde_json::Value = serde_json::from_str(&contents).expect("parse cards");
    assert_eq!(report["title"], "Relatório de Atendimentos");
    let cards = report["cards"].as_array().expect("array of cards");
    assert_eq!(cards.len(), 4);
    assert_eq!(cards[0]["orderId"], "OS-101");
    assert_eq!(cards[0]["date"], "06/05/2024");
    assert_eq!(cards[3]["date"], "");
}

#[test]
fn export_rejects_json_for_tabular_projection() {
    let workspace = TestWorkspace::new();
    let sheet = workspace.sample_sheet();
    appointment_cards()
        .args([
            "export",
            "-i",
            sheet.to_str().unwrap(),
            "--format",
            "json",
        ])
        .assert()
        .failure()
        .stderr(contains("Tabular export only supports csv"));
}

#[test]
fn dates_lists_distinct_days_in_order() {
    let workspace = TestWorkspace::new();
    let sheet = workspace.sample_sheet();
    appointment_cards()
        .args(["dates", "-i", sheet.to_str().unwrap()])
        .assert()
        .success()
        .stdout("06/05/2024\n07/05/2024\n");
}

#[test]
fn columns_reports_bindings_and_gaps() {
    let workspace = TestWorkspace::new();
    let sheet = workspace.write("thin.csv", "DATA,Nome Completo\n06/05/2024,Ana\n");
    appointment_cards()
        .args(["columns", "-i", sheet.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("ClientName"))
        .stdout(contains("Nome Completo (#1)"))
        .stdout(contains("ORDEM DE SERVIÇO"))
        .stdout(contains("missing"));
}

#[test]
fn strict_columns_abort_with_the_missing_list() {
    let workspace = TestWorkspace::new();
    let sheet = workspace.write("thin.csv", "DATA,Nome Completo\n06/05/2024,Ana\n");
    appointment_cards()
        .args(["view", "-i", sheet.to_str().unwrap(), "--strict-columns"])
        .assert()
        .failure()
        .stderr(contains("Required column(s) not found"))
        .stderr(contains("Fabricante"));
}

#[test]
fn missing_input_file_fails() {
    let workspace = TestWorkspace::new();
    let missing = workspace.path().join("absent.csv");
    appointment_cards()
        .args(["view", "-i", missing.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("error:"));
}

#[test]
fn unparsable_date_selection_fails() {
    let workspace = TestWorkspace::new();
    let sheet = workspace.sample_sheet();
    appointment_cards()
        .args(["view", "-i", sheet.to_str().unwrap(), "--date", "amanhã"])
        .assert()
        .failure()
        .stderr(contains("Failed to parse 'amanhã' as a date"));
}

#[test]
fn card_export_title_names_selected_days() {
    let workspace = TestWorkspace::new();
    let sheet = workspace.sample_sheet();
    appointment_cards()
        .args([
            "export",
            "-i",
            sheet.to_str().unwrap(),
            "--projection",
            "cards",
            "--format",
            "yaml",
            "-d",
            "07/05/2024",
            "-d",
            "06/05/2024",
        ])
        .assert()
        .success()
        .stdout(contains("title:"))
        .stdout(contains("Atendimentos do(s) dia(s): 06/05/2024, 07/05/2024"))
        .stdout(contains("orderId: OS-103"));
}

#[test]
fn header_only_sheet_halts_with_a_warning() {
    let workspace = TestWorkspace::new();
    let sheet = workspace.write("header.csv", "DATA,Produto\n");
    appointment_cards()
        .env_remove("RUST_LOG")
        .args(["view", "-i", sheet.to_str().unwrap()])
        .assert()
        .success()
        .stdout("")
        .stderr(contains("Sheet source returned no rows"))
        .stderr(contains("error:").not());
}

#[test]
fn date_column_option_binds_a_renamed_column() {
    let workspace = TestWorkspace::new();
    let sheet = workspace.write(
        "renamed.csv",
        "Data Atendimento,ORDEM DE SERVIÇO\n06/05/2024,OS-1\n07/05/2024,OS-2\n",
    );
    appointment_cards()
        .args(["dates", "-i", sheet.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("Required column(s) not found: DATA"));

    appointment_cards()
        .args([
            "dates",
            "-i",
            sheet.to_str().unwrap(),
            "--date-column",
            "Data Atendimento",
        ])
        .assert()
        .success()
        .stdout("06/05/2024\n07/05/2024\n");
}

#[test]
fn lenient_date_accepts_a_sheet_without_dates() {
    let workspace = TestWorkspace::new();
    let sheet = workspace.write("undated.csv", "Nome Completo,Produto\nAna,TV\n");
    appointment_cards()
        .args(["view", "-i", sheet.to_str().unwrap(), "--lenient-date"])
        .assert()
        .success()
        .stdout(contains("Total de Atendimentos: 1"))
        .stdout(contains("Ana"));
}

#[test]
fn strict_columns_with_lenient_date_still_require_other_columns() {
    let workspace = TestWorkspace::new();
    let sheet = workspace.write("undated.csv", "Nome Completo,Produto\nAna,TV\n");
    appointment_cards()
        .args([
            "view",
            "-i",
            sheet.to_str().unwrap(),
            "--strict-columns",
            "--lenient-date",
        ])
        .assert()
        .failure()
        .stderr(contains("Required column(s) not found"))
        .stderr(contains("Fabricante"));
}

#[test]
fn month_first_reads_ambiguous_dates_as_month_day() {
    let workspace = TestWorkspace::new();
    let sheet = workspace.sample_sheet();
    appointment_cards()
        .args(["dates", "-i", sheet.to_str().unwrap(), "--month-first"])
        .assert()
        .success()
        .stdout("05/06/2024\n05/07/2024\n");
}

#[test]
fn config_file_supplies_registry_and_page_size() {
    let workspace = TestWorkspace::new();
    let sheet = workspace.write(
        "custom.csv",
        "Quando,OS,Cliente\n06/05/2024,OS-1,Ana\n06/05/2024,OS-2,Bia\n07/05/2024,OS-3,Caio\n",
    );
    let config = workspace.write(
        "config.yaml",
        "page_size: 6\n\
         registry:\n\
         \x20 - source: Quando\n\
         \x20   canonical: Date\n\
         \x20 - source: OS\n\
         \x20   canonical: OrderId\n\
         \x20 - source: Cliente\n\
         \x20   canonical: ClientName\n",
    );
    appointment_cards()
        .args([
            "view",
            "-i",
            sheet.to_str().unwrap(),
            "-c",
            config.to_str().unwrap(),
            "-d",
            "06/05/2024",
        ])
        .assert()
        .success()
        .stdout(contains("Total de Atendimentos: 2"))
        .stdout(contains("Page 1/1"))
        .stdout(contains("Bia"))
        .stdout(contains("Caio").not());
}
