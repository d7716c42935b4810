use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

mod common;

#[test]
fn test_exact_remaining_balance_completes_order() {
    let file = common::batch_file(&["open, 1, 99.99", "pay, 1, 99.99, cash"]);

    let mut cmd = Command::new(cargo_bin!("order-ledger"));
    cmd.arg("apply").arg(file.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1,99.99,99.99,0.00,completed,,1"));
}

#[test]
fn test_one_cent_over_balance_is_rejected() {
    let file = common::batch_file(&[
        "open, 1, 100.00",
        "pay, 1, 40.00, cash",
        "pay, 1, 60.01, cash",
    ]);

    let mut cmd = Command::new(cargo_bin!("order-ledger"));
    cmd.arg("apply").arg(file.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1,100.00,40.00,60.00,partial,,1"))
        .stderr(predicate::str::contains("maximum payment allowed is $60.00"));
}

#[test]
fn test_zelle_confirmation_boundary() {
    let file = common::batch_file(&[
        "open, 1, 100.00",
        "pay, 1, 10.00, zelle, ,",
        "pay, 1, 10.00, zelle, ZL-1",
    ]);

    let mut cmd = Command::new(cargo_bin!("order-ledger"));
    cmd.arg("apply").arg(file.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1,100.00,10.00,90.00,partial,,1"))
        .stderr(predicate::str::contains(
            "zelle payments require `zelleConfirmation`",
        ));
}

#[test]
fn test_extreme_decimal_precision() {
    let file = common::batch_file(&[
        "open, 1, 0.0003",
        "pay, 1, 0.0001, cash",
        "pay, 1, 0.0001, cash",
    ]);

    let mut cmd = Command::new(cargo_bin!("order-ledger"));
    cmd.arg("apply").arg(file.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1,0.0003,0.0002,0.0001,partial,,2"));
}

#[test]
fn test_large_order_id() {
    let file = common::batch_file(&[
        "open, 18446744073709551615, 1000000.00",
        "pay, 18446744073709551615, 1000000.00, cash",
    ]);

    let mut cmd = Command::new(cargo_bin!("order-ledger"));
    cmd.arg("apply").arg(file.path());

    cmd.assert().success().stdout(predicate::str::contains(
        "18446744073709551615,1000000.00,1000000.00,0.00,completed,,1",
    ));
}
