use slack_driver::setup_logging;

#[test]
fn test_logging_setup_is_idempotent() {
    let result = std::panic::catch_unwind(|| {
        setup_logging();
        setup_logging();
    });

    assert!(result.is_ok(), "setup_logging should tolerate repeated calls");
}
