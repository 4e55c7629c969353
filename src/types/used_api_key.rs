use derivative::Derivative;

/// A struct to hold the used API key.
///
/// The key is masked when debug-printed, so it can be traced safely.
#[derive(Derivative, Clone, PartialEq, Eq)]
#[derivative(Debug)]
pub struct UsedApiKey {
    #[derivative(Debug(format_with = "crate::utils::mask_fmt"))]
    pub api_key: String,
}
