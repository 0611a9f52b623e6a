//! Pluggable post-processing traits.

/// One pure rewrite in a formatting pipeline.
pub trait TextTransform: Send + Sync {
    fn name(&self) -> &'static str;
    fn apply(&self, text: &str) -> String;
}
