//! Binding a [`ResolvedContext`] into a [`tera::Context`].

use serde_yaml::Value;
use stanza_core::ResolvedContext;

/// Variable name under which a non-mapping context root is exposed.
pub const ROOT_BINDING: &str = "this";

/// Convert a resolved context into Tera variables.
///
/// A mapping root exposes each key as a top-level variable; any other root
/// (sequence, scalar, null) is bound as [`ROOT_BINDING`].
pub fn tera_context(ctx: &ResolvedContext) -> Result<tera::Context, tera::Error> {
    match ctx.value() {
        Value::Mapping(_) => tera::Context::from_serialize(ctx.value()),
        other => {
            let mut tera_ctx = tera::Context::new();
            tera_ctx.insert(ROOT_BINDING, other);
            Ok(tera_ctx)
        }
    }
}
