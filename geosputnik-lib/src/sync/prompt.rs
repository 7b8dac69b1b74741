use std::future::Future;

/// Asks the user for a marker description.
///
/// The returned future resolves to `None` when the user dismisses the question. The controller
/// may drop the future before it resolves, which must be treated as a dismissal.
pub trait DescriptionPrompt {
    fn ask(&self, question: &str) -> impl Future<Output = Option<String>>;
}
