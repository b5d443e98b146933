//! Abstract Syntax Tree types for declaration files.
//!
//! The tree covers the subset of the declaration-file language that
//! component libraries emit: imports and exports, interfaces, classes,
//! enums, type aliases, variables, and namespaces.

use smallvec::SmallVec;

/// A parsed declaration file.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Module {
    /// Top-level statements in source order
    pub statements: Vec<Statement>,
    /// Source span for error reporting
    pub span: Span,
}

impl Module {
    /// A file with no imports or exports is a global script: its
    /// declarations are visible from every other file.
    pub fn is_script(&self) -> bool {
        !self.statements.iter().any(|s| match s {
            Statement::Import(_)
            | Statement::ExportNamed(_)
            | Statement::ExportAll(_)
            | Statement::ExportAssignment(_)
            | Statement::ExportAsNamespace(_) => true,
            other => other.modifiers().map_or(false, |m| m.export),
        })
    }
}

/// Source location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: u32,
    pub column: u32,
}

/// A dotted name like `React.Component`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QualifiedName(pub SmallVec<[String; 2]>);

impl QualifiedName {
    pub fn single(name: impl Into<String>) -> Self {
        let mut parts = SmallVec::new();
        parts.push(name.into());
        Self(parts)
    }

    /// First segment of the name.
    pub fn head(&self) -> &str {
        self.0.first().map(String::as_str).unwrap_or_default()
    }

    /// Last segment of the name.
    pub fn last(&self) -> &str {
        self.0.last().map(String::as_str).unwrap_or_default()
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_single(&self) -> bool {
        self.0.len() == 1
    }
}

impl std::fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

impl From<&str> for QualifiedName {
    fn from(s: &str) -> Self {
        QualifiedName(s.split('.').map(str::to_string).collect())
    }
}

/// A documentation comment (`/** ... */`).
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocComment {
    /// Free text before the first tag
    pub text: String,
    pub tags: Vec<DocTag>,
}

/// A `@tag text` entry inside a documentation comment.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocTag {
    pub name: String,
    pub text: String,
}

impl DocComment {
    /// Value of a tag. Repeated tags are joined with a space.
    pub fn tag(&self, name: &str) -> Option<String> {
        let mut result: Option<String> = None;
        for tag in self.tags.iter().filter(|t| t.name == name) {
            let acc = result.get_or_insert_with(String::new);
            acc.push(' ');
            acc.push_str(&tag.text);
        }
        result.map(|s| s.trim().to_string())
    }
}

/// Declaration modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Modifiers {
    pub export: bool,
    pub default: bool,
    pub declare: bool,
    pub is_abstract: bool,
}

/// A top-level or namespace-level statement.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Statement {
    Import(ImportDecl),
    ExportNamed(ExportNamedDecl),
    ExportAll(ExportAllDecl),
    ExportAssignment(ExportAssignment),
    ExportAsNamespace(String),
    Interface(InterfaceDecl),
    Class(ClassDecl),
    Enum(EnumDecl),
    TypeAlias(TypeAliasDecl),
    Variable(VariableStatement),
    Function(FunctionDecl),
    Namespace(NamespaceDecl),
}

impl Statement {
    /// Modifiers of declaration statements.
    pub fn modifiers(&self) -> Option<&Modifiers> {
        match self {
            Statement::Interface(d) => Some(&d.modifiers),
            Statement::Class(d) => Some(&d.modifiers),
            Statement::Enum(d) => Some(&d.modifiers),
            Statement::TypeAlias(d) => Some(&d.modifiers),
            Statement::Variable(d) => Some(&d.modifiers),
            Statement::Function(d) => Some(&d.modifiers),
            Statement::Namespace(d) => Some(&d.modifiers),
            _ => None,
        }
    }

    /// Whether this statement contributes to the module's exports.
    pub fn is_export(&self) -> bool {
        match self {
            Statement::ExportNamed(_)
            | Statement::ExportAll(_)
            | Statement::ExportAssignment(_) => true,
            other => other.modifiers().map_or(false, |m| m.export),
        }
    }
}

/// `import ... from '...'`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImportDecl {
    pub specifier: String,
    /// `import React from ...`
    pub default: Option<String>,
    /// `import * as React from ...`
    pub namespace: Option<String>,
    /// `import { a as b } from ...`
    pub named: Vec<ImportSpecifier>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImportSpecifier {
    pub imported: String,
    pub local: String,
}

/// `export { a as b } [from '...']`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExportNamedDecl {
    pub specifiers: Vec<ExportSpecifier>,
    pub from: Option<String>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExportSpecifier {
    pub local: String,
    pub exported: String,
}

/// `export * [as ns] from '...'`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExportAllDecl {
    pub from: String,
    pub alias: Option<String>,
    pub span: Span,
}

/// `export default <expr>;` or `export = <expr>;`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExportAssignment {
    /// The exported expression when it is a (possibly dotted) name.
    pub target: Option<QualifiedName>,
    /// `true` for `export default`, `false` for `export =`
    pub is_default: bool,
    pub span: Span,
}

/// A generic type parameter `T extends C = D`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeParam {
    pub name: String,
    pub constraint: Option<TypeExpr>,
    pub default: Option<TypeExpr>,
}

/// A type reference in a heritage clause or type position.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeRef {
    pub name: QualifiedName,
    pub args: Vec<TypeExpr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterfaceDecl {
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub extends: Vec<TypeRef>,
    pub members: Vec<Member>,
    pub modifiers: Modifiers,
    pub doc: Option<DocComment>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassDecl {
    /// `None` for `export default class extends ...`
    pub name: Option<String>,
    pub type_params: Vec<TypeParam>,
    pub extends: Option<TypeRef>,
    pub implements: Vec<TypeRef>,
    pub members: Vec<Member>,
    pub modifiers: Modifiers,
    pub doc: Option<DocComment>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnumDecl {
    pub name: String,
    pub members: Vec<EnumMember>,
    pub is_const: bool,
    pub modifiers: Modifiers,
    pub doc: Option<DocComment>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnumMember {
    pub name: String,
    pub initializer: Option<EnumInitializer>,
    pub doc: Option<DocComment>,
    pub span: Span,
}

/// Initializer of an enum member.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EnumInitializer {
    Number(f64),
    String(String),
    /// Any other constant expression, kept as source text
    Other(String),
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeAliasDecl {
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub ty: TypeExpr,
    pub modifiers: Modifiers,
    pub doc: Option<DocComment>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VariableKind {
    Var,
    Let,
    Const,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VariableStatement {
    pub kind: VariableKind,
    pub declarations: Vec<VariableDecl>,
    pub modifiers: Modifiers,
    pub doc: Option<DocComment>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VariableDecl {
    pub name: String,
    pub ty: Option<TypeExpr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FunctionDecl {
    pub name: Option<String>,
    pub modifiers: Modifiers,
    pub span: Span,
}

/// Name of a namespace-like block.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NamespaceName {
    /// `namespace A.B { }`
    Name(QualifiedName),
    /// `declare module 'name' { }`
    Module(String),
    /// `declare global { }`
    Global,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NamespaceDecl {
    pub name: NamespaceName,
    pub body: Vec<Statement>,
    pub modifiers: Modifiers,
    pub span: Span,
}

/// A member of an interface, class, or object type literal.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Member {
    pub kind: MemberKind,
    /// Member name; `None` for call, construct, and index signatures
    pub name: Option<String>,
    pub optional: bool,
    pub readonly: bool,
    pub is_static: bool,
    /// Declared type (property type, accessor type, or return type)
    pub ty: Option<TypeExpr>,
    pub doc: Option<DocComment>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MemberKind {
    Property,
    Method,
    Getter,
    Setter,
    Call,
    Construct,
    Index,
    Constructor,
}

/// Keyword (primitive) types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KeywordType {
    String,
    Number,
    Boolean,
    BigInt,
    Symbol,
    Object,
    Any,
    Unknown,
    Void,
    Null,
    Undefined,
    Never,
    This,
}

impl KeywordType {
    pub fn from_keyword(word: &str) -> Option<Self> {
        Some(match word {
            "string" => Self::String,
            "number" => Self::Number,
            "boolean" => Self::Boolean,
            "bigint" => Self::BigInt,
            "symbol" => Self::Symbol,
            "object" => Self::Object,
            "any" => Self::Any,
            "unknown" => Self::Unknown,
            "void" => Self::Void,
            "null" => Self::Null,
            "undefined" => Self::Undefined,
            "never" => Self::Never,
            "this" => Self::This,
            _ => return None,
        })
    }
}

/// A literal type.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LiteralType {
    String(String),
    Number(f64),
    Boolean(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TypeOperator {
    KeyOf,
    Readonly,
    Unique,
}

/// A function or constructor type `(a: A) => R`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FunctionType {
    pub params: Vec<Param>,
    pub ret: TypeExpr,
    pub is_constructor: bool,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Param {
    pub name: String,
    pub ty: Option<TypeExpr>,
    pub optional: bool,
    pub rest: bool,
}

/// A type expression as written in source.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TypeExpr {
    Keyword(KeywordType),
    Literal(LiteralType),
    Reference(TypeRef),
    Array(Box<TypeExpr>),
    Tuple(Vec<TypeExpr>),
    Union(Vec<TypeExpr>),
    Intersection(Vec<TypeExpr>),
    Function(Box<FunctionType>),
    Object(Vec<Member>),
    /// `typeof x`
    Query(QualifiedName),
    Operator {
        op: TypeOperator,
        ty: Box<TypeExpr>,
    },
    IndexedAccess {
        object: Box<TypeExpr>,
        index: Box<TypeExpr>,
    },
    /// Conditional, mapped, and template literal types; parsed but not modeled
    Unsupported(String),
}
