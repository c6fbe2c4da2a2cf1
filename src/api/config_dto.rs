use serde::Deserialize;

/// JSON shape of an analysis configuration file. Every field is optional; missing
/// values fall back to the defaults of `AnalysisConfig`.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AnalysisConfigDto {
    pub delay_model: Option<String>,
    pub sharing_policy: Option<String>,
    /// Default link capacity in bit/s.
    pub link_capacity: Option<f64>,
    /// Per-hop processing delay in seconds (delay model B).
    pub processing_delay: Option<f64>,
    pub strict_link_endpoints: Option<bool>,
    pub time_unit: Option<String>,
    pub priority_classes: Option<u8>,
}
