//! Sample portfolio compiled into the binary.

const PORTFOLIO_FIXTURE: &str = include_str!("../fixtures/portfolio.json");

/// The default dataset used when no `--data` file is configured.
pub fn default_dataset() -> &'static str {
    PORTFOLIO_FIXTURE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dataset_is_valid_json() {
        let value: serde_json::Value = serde_json::from_str(default_dataset()).unwrap();
        assert!(value["regions"].as_array().unwrap().len() >= 6);
    }
}
