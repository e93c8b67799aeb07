use std::future::Future;
use std::pin::Pin;

/// Resolves the value of a reference (e.g. `color.primary`) into the text to print.
pub type ReferenceResolver = Box<
    dyn (Fn(&str) -> Pin<Box<dyn Future<Output = anyhow::Result<String>> + Send + 'static>>)
        + Send
        + Sync,
>;

/// Rewrites a reference identifier before the node is built.
pub type IdentifierResolver = Box<dyn (Fn(&str) -> anyhow::Result<String>) + Send + Sync>;
