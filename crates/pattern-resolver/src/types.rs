//! Resolved types and members.

use pattern_core::ast::{DocComment, KeywordType, LiteralType, MemberKind};
use std::path::Path;

/// Index of a loaded declaration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub(crate) usize);

/// Index of a declaration in the context's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(pub(crate) usize);

/// Index of a scope in the context's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub(crate) usize);

/// A resolved type.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Primitive(KeywordType),
    Literal(LiteralType),
    /// The type of an enum declaration (the union of its members)
    Enum(DeclId),
    /// A single member of an enum, e.g. `Size.Small`
    EnumMember { decl: DeclId, index: usize },
    /// An instance of a class or interface with resolved type arguments
    Reference { decl: DeclId, args: Vec<Type> },
    Array(Box<Type>),
    Tuple(Vec<Type>),
    Union(Vec<Type>),
    Intersection(Vec<Type>),
    /// An object type literal with resolved members
    Object(Vec<MemberInfo>),
    Function,
    /// A type parameter without a binding
    TypeParameter(String),
    /// A name or construct that could not be resolved
    Unresolved(String),
}

impl Type {
    /// Build a union: nested unions are flattened, `null` and `undefined`
    /// arms are dropped, and a single remaining arm replaces the union.
    pub fn union(arms: Vec<Type>) -> Type {
        let mut flat = Vec::with_capacity(arms.len());
        for arm in arms {
            match arm {
                Type::Union(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }

        let mut kept: Vec<Type> = flat.iter().filter(|t| !t.is_nullish()).cloned().collect();
        if kept.is_empty() {
            kept = flat;
        }

        match kept.len() {
            0 => Type::Primitive(KeywordType::Never),
            1 => kept.remove(0),
            _ => Type::Union(kept),
        }
    }

    pub fn is_nullish(&self) -> bool {
        matches!(
            self,
            Type::Primitive(KeywordType::Null | KeywordType::Undefined)
        )
    }

    /// The declaration behind a nominal type.
    pub fn decl(&self) -> Option<DeclId> {
        match self {
            Type::Reference { decl, .. } | Type::Enum(decl) | Type::EnumMember { decl, .. } => {
                Some(*decl)
            }
            _ => None,
        }
    }

    /// Type arguments of a class or interface instance.
    pub fn type_args(&self) -> &[Type] {
        match self {
            Type::Reference { args, .. } => args,
            _ => &[],
        }
    }
}

/// A member after name and type resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberInfo {
    pub name: String,
    pub kind: MemberKind,
    pub optional: bool,
    pub readonly: bool,
    pub ty: Type,
    pub doc: Option<DocComment>,
}

impl MemberInfo {
    /// Property signatures and accessors hold values; methods and
    /// signatures do not.
    pub fn is_property(&self) -> bool {
        matches!(
            self.kind,
            MemberKind::Property | MemberKind::Getter | MemberKind::Setter
        )
    }
}

/// The named declaration behind a nominal type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Symbol<'a> {
    pub name: &'a str,
    pub decl: DeclId,
    /// Declaration file the symbol is declared in
    pub file: &'a Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_drops_nullish_arms() {
        let ty = Type::union(vec![
            Type::Primitive(KeywordType::String),
            Type::Primitive(KeywordType::Undefined),
            Type::Primitive(KeywordType::Null),
        ]);
        assert_eq!(ty, Type::Primitive(KeywordType::String));
    }

    #[test]
    fn test_union_flattens() {
        let ty = Type::union(vec![
            Type::Union(vec![
                Type::Literal(LiteralType::String("a".into())),
                Type::Literal(LiteralType::String("b".into())),
            ]),
            Type::Literal(LiteralType::String("c".into())),
        ]);
        if let Type::Union(arms) = ty {
            assert_eq!(arms.len(), 3);
        } else {
            panic!("Expected union");
        }
    }

    #[test]
    fn test_all_nullish_union_is_kept() {
        let ty = Type::union(vec![
            Type::Primitive(KeywordType::Null),
            Type::Primitive(KeywordType::Undefined),
        ]);
        assert!(matches!(ty, Type::Union(arms) if arms.len() == 2));
    }
}
