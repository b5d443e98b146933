//! Type analysis over TypeScript declaration files.
//!
//! A [`TypeContext`] loads a set of `.d.ts` files and everything they
//! import, binds their declarations into scopes, and answers the queries
//! the component analyzers need:
//!
//! - the type a declaration introduces ([`TypeContext::type_at_declaration`])
//! - direct base types ([`TypeContext::base_types`])
//! - own and inherited members ([`TypeContext::apparent_members`])
//! - the named declaration behind a type ([`TypeContext::symbol`])
//!
//! Resolution is deliberately partial. Constructs the context does not
//! model resolve to [`Type::Unresolved`] rather than failing.

mod binder;
mod context;
mod loader;
mod types;

pub use binder::{DeclKind, Declaration, ImportBinding, ImportKind, ScopeKind};
pub use context::{ResolverOptions, SourceFile, Substitution, TypeContext};
pub use loader::{normalize, resolve_specifier};
pub use types::{DeclId, FileId, MemberInfo, ScopeId, Symbol, Type};
