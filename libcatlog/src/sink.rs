use crate::context::Context;

/// A destination for rendered log lines.
///
/// `handle` may be called from any number of threads at once and must not
/// fail; implementations swallow their own I/O errors.
pub trait Sink: Send + Sync {
    fn handle(&self, line: &str, context: &Context<'_>);
}

impl<F> Sink for F
where
    F: Fn(&str, &Context<'_>) + Send + Sync,
{
    fn handle(&self, line: &str, context: &Context<'_>) {
        self(line, context)
    }
}
