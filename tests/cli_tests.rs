use assert_cmd::prelude::*;
use chrono::Datelike;
use predicates::prelude::*;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn tally_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("tally"))
}

/// Run `tally -C <dir> <args>` and expect success
fn run_ok(config_path: &Path, args: &[&str]) -> String {
    let output = tally_cmd()
        .arg("-C")
        .arg(config_path)
        .args(args)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "tally {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap()
}

/// Initialized config dir with one client, "acme"
fn setup() -> (TempDir, std::path::PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("tally-config");

    run_ok(&config_path, &["init"]);
    run_ok(
        &config_path,
        &[
            "add-client",
            "--name",
            "Acme Corp",
            "--email",
            "billing@acme.test",
            "--id",
            "acme",
            "--company",
            "Acme Holdings",
        ],
    );

    (temp_dir, config_path)
}

/// Create an invoice for acme issued 2025-03-01 and due far in the future
fn new_invoice(config_path: &Path, lines: &[&str]) -> String {
    let mut args = vec![
        "new",
        "--client",
        "acme",
        "--issue-date",
        "2025-03-01",
        "--due-date",
        "2099-12-31",
    ];
    for line in lines {
        args.push("--line");
        args.push(line);
    }
    run_ok(config_path, &args)
}

#[test]
fn test_help() {
    tally_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Small invoicing system with clients",
        ));
}

#[test]
fn test_version() {
    tally_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tally"));
}

#[test]
fn test_init_creates_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("tally-config");

    tally_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized tally config"));

    assert!(config_path.join("config.toml").exists());
    assert!(config_path.join("items.toml").exists());
}

#[test]
fn test_init_fails_if_exists() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("tally-config");

    tally_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success();

    tally_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_status_without_init() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("nonexistent");

    tally_cmd()
        .args(["-C", config_path.to_str().unwrap(), "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_status() {
    let (_temp_dir, config_path) = setup();

    tally_cmd()
        .args(["-C", config_path.to_str().unwrap(), "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Your Business Name"))
        .stdout(predicate::str::contains("Clients:          1"))
        .stdout(predicate::str::contains("Items:            3"))
        .stdout(predicate::str::contains("SGD"));
}

#[test]
fn test_status_reads_stored_sequence() {
    let (_temp_dir, config_path) = setup();
    let year = chrono::Utc::now().year();

    // A number can be reserved without an invoice being saved
    std::fs::write(
        config_path.join("state.toml"),
        format!("[sequences]\n\"{year}\" = 7\n"),
    )
    .unwrap();

    tally_cmd()
        .args(["-C", config_path.to_str().unwrap(), "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Next invoice:     {year}-0008")));
}

#[test]
fn test_items_list() {
    let (_temp_dir, config_path) = setup();

    tally_cmd()
        .args(["-C", config_path.to_str().unwrap(), "items"])
        .assert()
        .success()
        .stdout(predicate::str::contains("consulting"))
        .stdout(predicate::str::contains("S$150.00"))
        .stdout(predicate::str::contains("project-setup"));
}

#[test]
fn test_add_client_and_search() {
    let (_temp_dir, config_path) = setup();

    run_ok(
        &config_path,
        &["add-client", "--name", "Jane Tan", "--email", "jane@lumen.sg"],
    );

    let out = run_ok(&config_path, &["clients"]);
    assert!(out.contains("acme"));
    assert!(out.contains("jane-tan"));

    let out = run_ok(&config_path, &["clients", "--search", "lumen"]);
    assert!(out.contains("Jane Tan"));
    assert!(!out.contains("Acme Corp"));
    assert!(out.contains("Showing 1 of 2 clients"));
}

#[test]
fn test_edit_client() {
    let (_temp_dir, config_path) = setup();

    let out = run_ok(
        &config_path,
        &[
            "edit-client",
            "acme",
            "--name",
            "Acme Global",
            "--email",
            "ap@acme.test",
            "--company",
            "",
        ],
    );
    assert!(out.contains("Updated client acme"));
    assert!(out.contains("Acme Global"));
    assert!(!out.contains("Company:"));

    let out = run_ok(&config_path, &["clients"]);
    assert!(out.contains("Acme Global"));
    assert!(out.contains("ap@acme.test"));
    assert!(!out.contains("Acme Holdings"));

    tally_cmd()
        .args(["-C", config_path.to_str().unwrap()])
        .args(["edit-client", "acme", "--email", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not an email address"));

    tally_cmd()
        .args(["-C", config_path.to_str().unwrap()])
        .args(["edit-client", "ghost", "--name", "Ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Client 'ghost' not found"));
}

#[test]
fn test_add_client_rejects_duplicates_and_bad_email() {
    let (_temp_dir, config_path) = setup();

    tally_cmd()
        .args(["-C", config_path.to_str().unwrap()])
        .args(["add-client", "--name", "Acme", "--email", "a@b.c", "--id", "acme"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Client 'acme' already exists"));

    tally_cmd()
        .args(["-C", config_path.to_str().unwrap()])
        .args(["add-client", "--name", "Nobody", "--email", "nobody"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not an email address"));
}

#[test]
fn test_new_missing_client() {
    let (_temp_dir, config_path) = setup();

    tally_cmd()
        .args(["-C", config_path.to_str().unwrap()])
        .args(["new", "--client", "nonexistent", "--line", "consulting:10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Client 'nonexistent' not found"));
}

#[test]
fn test_new_missing_item() {
    let (_temp_dir, config_path) = setup();

    tally_cmd()
        .args(["-C", config_path.to_str().unwrap()])
        .args(["new", "--client", "acme", "--line", "nonexistent:10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Item 'nonexistent' not found"));
}

#[test]
fn test_new_invalid_quantity() {
    let (_temp_dir, config_path) = setup();

    tally_cmd()
        .args(["-C", config_path.to_str().unwrap()])
        .args(["new", "--client", "acme", "--line", "consulting:abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid quantity"));

    tally_cmd()
        .args(["-C", config_path.to_str().unwrap()])
        .args(["new", "--client", "acme", "--line", "consulting:0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be greater than 0"));
}

#[test]
fn test_new_without_billable_lines() {
    let (_temp_dir, config_path) = setup();

    tally_cmd()
        .args(["-C", config_path.to_str().unwrap()])
        .args(["new", "--client", "acme", "--line", "section:Design"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Invoice is missing: at least one billable line item",
        ));

    // The failed attempt must not consume an invoice number
    let out = new_invoice(&config_path, &["consulting:1"]);
    assert!(out.contains("Created 2025-0001"));
}

#[test]
fn test_new_with_only_a_discount() {
    let (_temp_dir, config_path) = setup();

    tally_cmd()
        .args(["-C", config_path.to_str().unwrap()])
        .args(["new", "--client", "acme", "--line", "discount:Goodwill:50"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Invoice is missing: at least one billable line item",
        ));

    let out = run_ok(&config_path, &["list"]);
    assert!(out.contains("No invoices yet."));
}

#[test]
fn test_new_computes_totals_with_discount() {
    let (_temp_dir, config_path) = setup();

    let out = new_invoice(
        &config_path,
        &[
            "section:Build",
            "consulting:8",
            "custom:Hosting:2:units:49.995",
            "discount:Loyalty:200",
        ],
    );
    // 8 x 150 + 2 x 49.995 - 200 = 1099.99
    assert!(out.contains("Created 2025-0001"));
    assert!(out.contains("S$1,099.99"));
    assert!(out.contains("Draft"));

    let out = run_ok(&config_path, &["show", "1"]);
    assert!(out.contains("Invoice #2025-0001"));
    assert!(out.contains("BUILD"));
    assert!(out.contains("Discount: Loyalty"));
    assert!(out.contains("-S$200.00"));
    assert!(out.contains("S$1,299.99"));
}

#[test]
fn test_numbers_are_sequential() {
    let (_temp_dir, config_path) = setup();

    assert!(new_invoice(&config_path, &["consulting:1"]).contains("2025-0001"));
    assert!(new_invoice(&config_path, &["consulting:2"]).contains("2025-0002"));

    // Index 1 is the newest invoice
    let out = run_ok(&config_path, &["show", "1"]);
    assert!(out.contains("Invoice #2025-0002"));
}

#[test]
fn test_send_and_pay_flow() {
    let (_temp_dir, config_path) = setup();
    new_invoice(&config_path, &["consulting:8"]);

    let out = run_ok(&config_path, &["send", "2025-0001"]);
    assert!(out.contains("Sent 2025-0001 to billing@acme.test"));
    assert!(out.contains("http://localhost:3000/i/"));

    let out = run_ok(&config_path, &["list", "--status", "pending"]);
    assert!(out.contains("2025-0001"));
    assert!(out.contains("PENDING"));
    assert!(out.contains("Pending (1)"));

    tally_cmd()
        .args(["-C", config_path.to_str().unwrap(), "send", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Cannot send invoice 2025-0001: it is pending",
        ));

    let out = run_ok(&config_path, &["pay", "1", "--date", "2025-03-15"]);
    assert!(out.contains("Marked 2025-0001 as paid (S$1,200.00)"));

    let out = run_ok(&config_path, &["list"]);
    assert!(out.contains("PAID"));
    assert!(out.contains("Paid (1)"));

    let out = run_ok(&config_path, &["clients"]);
    assert!(out.contains("S$1,200.00"));
    assert!(out.contains("1 Mar 2025"));
}

#[test]
fn test_paid_invoice_cannot_be_cancelled_or_edited() {
    let (_temp_dir, config_path) = setup();
    new_invoice(&config_path, &["consulting:1"]);
    run_ok(&config_path, &["send", "1"]);
    run_ok(&config_path, &["pay", "1"]);

    tally_cmd()
        .args(["-C", config_path.to_str().unwrap(), "cancel", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("it is paid"));

    tally_cmd()
        .args(["-C", config_path.to_str().unwrap()])
        .args(["edit", "1", "--line", "consulting:2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot edit invoice 2025-0001"));
}

#[test]
fn test_edit_and_cancel() {
    let (_temp_dir, config_path) = setup();
    new_invoice(&config_path, &["consulting:1"]);

    let out = run_ok(
        &config_path,
        &["edit", "1", "--line", "development:4", "--due-date", "2099-01-15"],
    );
    assert!(out.contains("Updated 2025-0001"));
    assert!(out.contains("S$500.00"));
    assert!(out.contains("15 Jan 2099"));

    let out = run_ok(&config_path, &["cancel", "2025-0001"]);
    assert!(out.contains("Cancelled 2025-0001"));

    let out = run_ok(&config_path, &["list", "--status", "cancelled"]);
    assert!(out.contains("CANCELLED"));
}

#[test]
fn test_overdue_from_past_due_date() {
    let (_temp_dir, config_path) = setup();

    run_ok(
        &config_path,
        &[
            "new",
            "--client",
            "acme",
            "--issue-date",
            "2020-01-01",
            "--due-date",
            "2020-01-31",
            "--line",
            "consulting:2",
            "--send",
        ],
    );

    let out = run_ok(&config_path, &["list", "--status", "overdue"]);
    assert!(out.contains("2020-0001"));
    assert!(out.contains("OVERDUE"));

    let out = run_ok(&config_path, &["dashboard"]);
    assert!(out.contains("Overdue:           S$300.00 (1 invoice)"));
    assert!(out.contains("Invoice #2020-0001 is overdue"));
}

#[test]
fn test_list_limit_and_invalid_index() {
    let (_temp_dir, config_path) = setup();
    new_invoice(&config_path, &["consulting:1"]);
    new_invoice(&config_path, &["consulting:2"]);
    new_invoice(&config_path, &["consulting:3"]);

    let out = run_ok(&config_path, &["list", "--limit", "2"]);
    assert!(out.contains("2025-0003"));
    assert!(out.contains("2025-0002"));
    assert!(!out.contains("2025-0001"));
    assert!(out.contains("All (3)"));

    tally_cmd()
        .args(["-C", config_path.to_str().unwrap(), "show", "9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid invoice index"));

    tally_cmd()
        .args(["-C", config_path.to_str().unwrap()])
        .args(["list", "--status", "unknown"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid status"));
}

#[test]
fn test_public_view_by_token() {
    let (_temp_dir, config_path) = setup();
    new_invoice(&config_path, &["consulting:8"]);
    run_ok(&config_path, &["send", "1"]);

    let url = run_ok(&config_path, &["share", "1"]);
    let token = url.trim().rsplit('/').next().unwrap().to_string();
    assert_eq!(token.len(), 32);

    let out = run_ok(&config_path, &["public", &token]);
    assert!(out.contains("Your Business Name"));
    assert!(out.contains("Acme Corp (Acme Holdings)"));
    assert!(out.contains("Amount due: S$1,200.00"));

    let out = run_ok(&config_path, &["public", &token, "--json"]);
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["status"], "pending");
    assert_eq!(json["can_pay"], true);
    assert_eq!(json["is_paid"], false);
    assert_eq!(json["invoice"]["invoice_number"], "2025-0001");
    assert_eq!(json["client"]["name"], "Acme Corp");

    run_ok(&config_path, &["pay", "1"]);
    let out = run_ok(&config_path, &["public", &token]);
    assert!(out.contains("This invoice has been paid"));
}

#[test]
fn test_public_unknown_token() {
    let (_temp_dir, config_path) = setup();

    tally_cmd()
        .args(["-C", config_path.to_str().unwrap(), "public", "deadbeef"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "No invoice is shared under token 'deadbeef'",
        ));
}

#[test]
fn test_dashboard_activity() {
    let (_temp_dir, config_path) = setup();
    new_invoice(&config_path, &["consulting:2"]);
    run_ok(&config_path, &["send", "1"]);

    let out = run_ok(&config_path, &["dashboard", "--limit", "10"]);
    assert!(out.contains("Outstanding:       S$300.00"));
    assert!(out.contains("Invoice #2025-0001 created for Acme Corp"));
    assert!(out.contains("Invoice #2025-0001 sent to Acme Corp"));
    assert!(out.contains("New client Acme Corp added"));
    assert!(out.contains("Just now"));
}

#[test]
fn test_state_is_persisted_to_toml() {
    let (_temp_dir, config_path) = setup();
    new_invoice(&config_path, &["consulting:1"]);

    let state = std::fs::read_to_string(config_path.join("state.toml")).unwrap();
    assert!(state.contains("2025-0001"));
    assert!(state.contains("[sequences]"));
}
