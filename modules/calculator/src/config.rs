use serde::{Deserialize, Serialize};

/// Configuration for the `calculator` module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalculatorConfig {
    /// Title rendered in the calculator page header and `<title>`.
    #[serde(default = "default_page_title")]
    pub page_title: String,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            page_title: default_page_title(),
        }
    }
}

fn default_page_title() -> String {
    "Calculator".to_owned()
}
