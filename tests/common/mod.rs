/// Runs a `.klox` fixture script from `tests/target/<scope>/`.
///
/// OK scripts run in-process against a byte-sink driver in test mode and the
/// captured program output is compared line by line. ERR scripts run the real
/// binary so the exit code and exact stderr can be asserted.
#[macro_export]
macro_rules! tests {
    ($file:ident in $scope:ident is OK $($expected:expr)*) => {
        #[test]
        fn $file() {
            use klox::Klox;

            let mut expected = vec![$($expected),*];

            // The trailing empty entry puts a newline after the last line.
            let expected = match expected.len() {
                0 => String::new(),
                _ => {
                    expected.push("");
                    expected.join("\n")
                }
            };

            let mut output = Vec::new();
            let mut klox = Klox::new(&mut output);
            klox.set_test_mode(true);
            klox.run_file(&format!(
                "tests/target/{}/{}.klox",
                stringify!($scope),
                stringify!($file)
            ));

            assert!(
                !klox.had_error() && !klox.had_runtime_error(),
                "script reported errors"
            );

            drop(klox);
            assert_eq!(expected, std::str::from_utf8(&output).unwrap());
        }
    };

    ($file:ident in $scope:ident is ERR($code:literal) $($expected:expr)+) => {
        #[test]
        fn $file() {
            use assert_cmd::Command;

            let output = vec![$($expected),+].join("\n");
            let file = format!(
                "tests/target/{}/{}.klox",
                stringify!($scope),
                stringify!($file)
            );

            Command::cargo_bin("klox")
                .unwrap()
                .arg(file)
                .assert()
                .stderr(format!("{output}\n"))
                .code($code);
        }
    };
}
