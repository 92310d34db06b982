#[cfg(test)]
mod tests {
    use tracing::{debug, error, info, warn};
    use typesupport_macros::test_traced;

    #[test_traced(level = "INFO")]
    fn test_info_level() {
        info!(field = "code", "encoded scalar");
        debug!("filtered out at INFO");
        assert_eq!(2 + 2, 4);
    }

    #[test_traced]
    fn test_default_level() {
        debug!(bytes = 8, "encoded record");
        assert_eq!(3 * 3, 9);
    }

    #[test_traced("warn")]
    fn test_bare_level() {
        warn!("padding mismatch");
        assert_eq!(6 - 1, 5);
    }

    #[test_traced(level = "ERROR")]
    fn test_error_level() {
        error!("truncated buffer");
        assert_eq!(5 * 2, 10);
    }

    #[test_traced]
    fn test_returns_result() -> Result<(), String> {
        debug!("returning from the traced block");
        Ok(())
    }

    #[test_traced]
    #[should_panic(expected = "decode failed")]
    fn test_panic_propagates() {
        panic!("decode failed");
    }
}
