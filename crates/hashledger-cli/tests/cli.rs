use assert_cmd::Command;
use predicates::prelude::*;

fn cli() -> Command {
    Command::cargo_bin("hashledger-cli").expect("binary built")
}

#[test]
fn demo_reports_validity_before_and_after() {
    cli()
        .args(["demo", "--difficulty", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Blockchain before tampering:"))
        .stdout(predicate::str::contains("Is blockchain valid? true"))
        .stdout(predicate::str::contains(
            "Blockchain after tampering with block 1:",
        ))
        .stdout(predicate::str::contains("Is blockchain valid? false"))
        .stdout(predicate::str::contains(r#"["Alice pays Bob 50 BTC"]"#));
}

#[test]
fn demo_json_is_machine_readable() {
    let output = cli()
        .args(["demo", "--difficulty", "2", "--json", "--tamper-index", "2"])
        .args(["--tamper-tx", "one", "--tamper-tx", "two"])
        .output()
        .expect("run demo");
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(report["valid_before"], true);
    assert_eq!(report["valid_after"], true);
    assert_eq!(report["after"]["blocks"][2]["transactions"][1], "two");
    assert_eq!(report["before"]["blocks"].as_array().unwrap().len(), 3);
}

#[test]
fn demo_fails_when_search_bound_is_hit() {
    cli()
        .args(["demo", "--max-attempts", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("exhausted"));
}

#[test]
fn demo_says_when_tamper_index_is_out_of_range() {
    cli()
        .args(["demo", "--difficulty", "2", "--tamper-index", "99"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Tamper with block 99 skipped: block index 99 out of range (chain length 3)",
        ))
        .stdout(predicate::str::contains("Blockchain unchanged:"))
        .stdout(predicate::str::contains("tampering with block 99").not())
        .stdout(predicate::str::contains("Is blockchain valid? false").not());
}

#[test]
fn unreachable_difficulty_is_refused() {
    for sub in [&["demo"][..], &["prove", "--last-proof", "100"][..]] {
        cli()
            .args(sub)
            .args(["--difficulty", "65"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("must be at most 64"));
    }
}

#[test]
fn prove_prints_known_proof() {
    cli()
        .args(["prove", "--last-proof", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("proof: 35293"))
        .stdout(predicate::str::contains(
            "digest: 0000c415de5ceea33c02daa85a1c218ecca1b1c9e9864ed34d183597844de8e2",
        ));
}
