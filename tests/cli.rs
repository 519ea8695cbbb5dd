use assert_cmd::Command;

#[test]
fn extra_arguments_print_usage_and_exit_64() {
    Command::cargo_bin("klox")
        .unwrap()
        .args(["one.klox", "two.klox"])
        .assert()
        .stdout("Usage: klox [script]\n")
        .code(64);
}

#[test]
fn clean_scripts_exit_zero() {
    Command::cargo_bin("klox")
        .unwrap()
        .arg("tests/target/string/hello_world.klox")
        .assert()
        .stdout("Hello, world!\n")
        .stderr("")
        .success();
}

#[test]
fn debug_flag_prints_the_ast_instead_of_running() {
    Command::cargo_bin("klox")
        .unwrap()
        .args(["--debug", "tests/target/string/hello_world.klox"])
        .assert()
        .stdout("print \"Hello, world!\";\n")
        .code(0);
}

#[test]
fn debug_flag_shows_desugared_loops() {
    Command::cargo_bin("klox")
        .unwrap()
        .args(["--debug", "tests/target/for/missing_increment.klox"])
        .assert()
        .stdout("{ var i = 0; while (i < 2) { print i; i = i + 1; } }\n")
        .code(0);
}

#[test]
fn static_errors_exit_65() {
    Command::cargo_bin("klox")
        .unwrap()
        .arg("tests/target/return/top_level_return.klox")
        .assert()
        .code(65);
}

#[test]
fn runtime_errors_exit_70() {
    Command::cargo_bin("klox")
        .unwrap()
        .arg("tests/target/variable/undefined_global.klox")
        .assert()
        .stderr("Undefined variable 'unknown'.\n[line 1]\n")
        .code(70);
}
