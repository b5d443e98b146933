//! Recognizing React components.

use pattern_resolver::{Type, TypeContext};
use std::path::Path;

/// Names of the React types every component inherits from.
pub const MARKER_TYPES: [&str; 3] = ["Component", "StatelessComponent", "ComponentClass"];

/// The declaration file the marker types must come from.
pub const MARKER_DECLARATION_FILE: &str = "react/index.d.ts";

/// Whether `ty` is one of the React marker types.
///
/// Both the symbol name and the declaring file must match, so a user type
/// that happens to be called `Component` is not mistaken for React's.
pub fn is_react_marker(ctx: &TypeContext, ty: &Type) -> bool {
    ctx.symbol(ty).map_or(false, |symbol| {
        MARKER_TYPES.contains(&symbol.name) && symbol.file.ends_with(Path::new(MARKER_DECLARATION_FILE))
    })
}
