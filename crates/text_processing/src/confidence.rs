//! Confidence scoring for parsed expenses

/// Collaborator answered and something structured was found
pub const COMPLETION_BACKED_CONFIDENCE: f64 = 0.85;
/// Only the deterministic extractors found something
pub const EXTRACTED_CONFIDENCE: f64 = 0.6;
/// Nothing structured was found
pub const FALLBACK_CONFIDENCE: f64 = 0.3;

/// Inputs to [`derive_confidence`]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConfidenceSignals {
    /// Confidence reported by the completion collaborator
    pub external: Option<f64>,
    /// The collaborator was consulted and returned a non-empty payload
    pub used_completion: bool,
    pub has_amount: bool,
    pub has_category: bool,
}

/// Combine signals into a score in `[0, 1]`
///
/// An external score is clamped and wins outright; non-finite external
/// values are ignored.
pub fn derive_confidence(signals: &ConfidenceSignals) -> f64 {
    if let Some(external) = signals.external.filter(|value| value.is_finite()) {
        return external.clamp(0.0, 1.0);
    }

    let has_structure = signals.has_amount || signals.has_category;
    match (signals.used_completion, has_structure) {
        (true, true) => COMPLETION_BACKED_CONFIDENCE,
        (false, true) => EXTRACTED_CONFIDENCE,
        (_, false) => FALLBACK_CONFIDENCE,
    }
}
