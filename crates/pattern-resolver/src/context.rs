//! The type analysis context.
//!
//! A `TypeContext` owns every parsed declaration file of one analysis pass
//! together with the bound symbol table, and answers type queries over
//! them. It is built once per pass and dropped afterwards; nothing is
//! shared between passes.

use indexmap::IndexMap;
use pattern_core::ast::*;
use pattern_core::ResolveError;
use smallvec::SmallVec;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::binder::{Binder, DeclKind, Declaration, ImportKind, Meaning, ScopeKind, SymbolTable};
use crate::loader::{load_all, normalize, LoadFailure};
use crate::types::{DeclId, FileId, MemberInfo, ScopeId, Symbol, Type};

/// Maximum hops when following imports and re-exports.
const MAX_LOOKUP_DEPTH: usize = 32;

/// Type parameter bindings.
pub type Substitution = IndexMap<String, Type>;

/// Options for building a context.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolverOptions {
    /// Extra directories searched for bare module specifiers
    pub type_roots: Vec<PathBuf>,
    /// Maximum nesting of type alias expansion
    pub max_alias_depth: usize,
    /// Maximum length of an inheritance chain
    pub max_inheritance_depth: usize,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            type_roots: Vec::new(),
            max_alias_depth: 32,
            max_inheritance_depth: 32,
        }
    }
}

impl ResolverOptions {
    pub fn with_type_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.type_roots.push(root.into());
        self
    }

    pub fn with_max_inheritance_depth(mut self, depth: usize) -> Self {
        self.max_inheritance_depth = depth;
        self
    }

    pub fn with_max_alias_depth(mut self, depth: usize) -> Self {
        self.max_alias_depth = depth;
        self
    }
}

/// A parsed declaration file.
#[derive(Debug)]
pub struct SourceFile {
    id: FileId,
    path: PathBuf,
    module: Module,
    scope: ScopeId,
    imports: IndexMap<String, FileId>,
    statement_decls: Vec<SmallVec<[DeclId; 1]>>,
}

impl SourceFile {
    pub fn id(&self) -> FileId {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn module(&self) -> &Module {
        &self.module
    }

    /// Declarations created by the top-level statement at `index`.
    ///
    /// Variable statements yield one declaration per declarator, in order.
    pub fn statement_declarations(&self, index: usize) -> &[DeclId] {
        self.statement_decls
            .get(index)
            .map(|decls| decls.as_slice())
            .unwrap_or_default()
    }
}

/// Type analysis over a set of declaration files.
#[derive(Debug)]
pub struct TypeContext {
    files: Vec<SourceFile>,
    by_path: IndexMap<PathBuf, FileId>,
    failures: IndexMap<PathBuf, LoadFailure>,
    table: SymbolTable,
    options: ResolverOptions,
}

impl TypeContext {
    /// Load and bind `paths` and every declaration file they import.
    ///
    /// Files that cannot be read or parsed are recorded; [`TypeContext::file`]
    /// reports them as errors. They never prevent other files from loading.
    pub fn build<P: AsRef<Path>>(paths: &[P], options: ResolverOptions) -> Self {
        let roots: Vec<PathBuf> = paths.iter().map(|p| p.as_ref().to_path_buf()).collect();
        let loaded = load_all(&roots, &options.type_roots);

        let by_path: IndexMap<PathBuf, FileId> = loaded
            .files
            .iter()
            .enumerate()
            .map(|(i, file)| (file.path.clone(), FileId(i)))
            .collect();

        let mut table = SymbolTable::new();
        let scopes: Vec<ScopeId> = loaded
            .files
            .iter()
            .enumerate()
            .map(|(i, file)| {
                table.add_module_scope(FileId(i), &module_name(&file.path), file.module.is_script())
            })
            .collect();

        let mut files = Vec::with_capacity(loaded.files.len());
        for (i, file) in loaded.files.into_iter().enumerate() {
            let mut binder = Binder::new(&mut table, FileId(i));
            binder.bind_module(&file.module, scopes[i]);
            let statement_decls = binder.statement_decls;

            let imports = file
                .imports
                .into_iter()
                .filter_map(|(specifier, path)| by_path.get(&path).map(|id| (specifier, *id)))
                .collect();

            files.push(SourceFile {
                id: FileId(i),
                path: file.path,
                module: file.module,
                scope: scopes[i],
                imports,
                statement_decls,
            });
        }

        info!(
            files = files.len(),
            failed = loaded.failures.len(),
            declarations = table.decls.len(),
            "built type analysis context"
        );

        Self {
            files,
            by_path,
            failures: loaded.failures,
            table,
            options,
        }
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Look up a loaded file.
    pub fn file(&self, path: &Path) -> Result<&SourceFile, ResolveError> {
        let path = normalize(path);
        if let Some(id) = self.by_path.get(&path) {
            return Ok(&self.files[id.0]);
        }
        match self.failures.get(&path) {
            Some(LoadFailure::Parse(err)) => Err(ResolveError::Parse {
                path,
                source: err.clone(),
            }),
            Some(LoadFailure::Io { kind, message }) => Err(ResolveError::Io {
                path,
                source: std::io::Error::new(*kind, message.clone()),
            }),
            None => Err(ResolveError::FileNotLoaded { path }),
        }
    }

    /// All successfully loaded files, roots first.
    pub fn files(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.iter()
    }

    pub fn file_path(&self, id: FileId) -> &Path {
        &self.files[id.0].path
    }

    pub fn declaration(&self, id: DeclId) -> &Declaration {
        self.table.decl(id)
    }

    /// The enum declared by `decl`, if it is an enum.
    pub fn enum_declaration(&self, decl: DeclId) -> Option<&EnumDecl> {
        match &self.table.decl(decl).kind {
            DeclKind::Enum(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_interface(&self, decl: DeclId) -> bool {
        matches!(self.table.decl(decl).kind, DeclKind::Interface(_))
    }

    /// A variable declared at the top level of `file`. Imports are not followed.
    pub fn local_variable(&self, file: &SourceFile, name: &str) -> Option<DeclId> {
        self.table
            .scope(file.scope)
            .symbols
            .get(name)?
            .iter()
            .copied()
            .find(|id| {
                let decl = self.table.decl(*id);
                decl.file == file.id && matches!(decl.kind, DeclKind::Variable(_))
            })
    }

    /// The named declaration behind a nominal type.
    pub fn symbol(&self, ty: &Type) -> Option<Symbol<'_>> {
        let decl = ty.decl()?;
        let d = self.table.decl(decl);
        Some(Symbol {
            name: &d.name,
            decl,
            file: &self.files[d.file.0].path,
        })
    }

    /// The type a declaration introduces.
    ///
    /// Variables yield their annotated type, classes and interfaces their
    /// instance type with unbound type parameters.
    pub fn type_at_declaration(&self, id: DeclId) -> Type {
        let decl = self.table.decl(id);
        match &decl.kind {
            DeclKind::Variable(var) => match &var.ty {
                Some(ty) => self.resolve_type(ty, decl.scope, &Substitution::new(), 0),
                None => Type::Unresolved(decl.name.clone()),
            },
            DeclKind::Interface(iface) => Type::Reference {
                decl: id,
                args: unbound_params(&iface.type_params),
            },
            DeclKind::Class(class) => Type::Reference {
                decl: id,
                args: unbound_params(&class.type_params),
            },
            DeclKind::Enum(_) => Type::Enum(id),
            DeclKind::TypeAlias(alias) => {
                let subst = bind_params(&alias.type_params, &[]);
                self.resolve_type(&alias.ty, decl.scope, &subst, 1)
            }
            DeclKind::Function => Type::Function,
            DeclKind::Import(_) => match self.follow_import(id, Meaning::Type, 0) {
                Some(target) if target != id => self.type_at_declaration(target),
                _ => Type::Unresolved(decl.name.clone()),
            },
            DeclKind::Namespace(_) => Type::Unresolved(decl.name.clone()),
        }
    }

    /// Direct base types: the class `extends` clause or the interface
    /// `extends` list, with type arguments substituted. An intersection's
    /// base types are its parts.
    pub fn base_types(&self, ty: &Type) -> Vec<Type> {
        match ty {
            Type::Reference { decl, args } => {
                let mut bases = Vec::new();
                for id in self.merged_declarations(*decl) {
                    let d = self.table.decl(id);
                    let (params, heritage): (&[TypeParam], Vec<&TypeRef>) = match &d.kind {
                        DeclKind::Class(class) => (class.type_params.as_slice(), class.extends.iter().collect()),
                        DeclKind::Interface(iface) => (iface.type_params.as_slice(), iface.extends.iter().collect()),
                        _ => continue,
                    };
                    let subst = bind_params(params, args);
                    for reference in heritage {
                        match self.resolve_reference(reference, d.scope, &subst, 0) {
                            base @ (Type::Reference { .. } | Type::Intersection(_) | Type::Object(_)) => {
                                bases.push(base)
                            }
                            other => debug!(
                                decl = %d.name,
                                base = %reference.name,
                                resolved = ?other,
                                "dropping unresolvable base type"
                            ),
                        }
                    }
                }
                bases
            }
            Type::Intersection(parts) => parts.clone(),
            _ => Vec::new(),
        }
    }

    /// Own members first, then inherited members not already present.
    pub fn apparent_members(&self, ty: &Type) -> Vec<MemberInfo> {
        let mut members = IndexMap::new();
        let mut chain = Vec::new();
        self.collect_members(ty, &mut members, &mut chain);
        members.into_values().collect()
    }

    fn collect_members(
        &self,
        ty: &Type,
        out: &mut IndexMap<String, MemberInfo>,
        chain: &mut Vec<DeclId>,
    ) {
        match ty {
            Type::Reference { decl, args } => {
                if chain.contains(decl) || chain.len() >= self.options.max_inheritance_depth {
                    debug!(decl = %self.table.decl(*decl).name, "inheritance cycle or depth limit reached");
                    return;
                }
                chain.push(*decl);

                for id in self.merged_declarations(*decl) {
                    let d = self.table.decl(id);
                    let (params, members): (&[TypeParam], &[Member]) = match &d.kind {
                        DeclKind::Class(class) => (class.type_params.as_slice(), class.members.as_slice()),
                        DeclKind::Interface(iface) => (iface.type_params.as_slice(), iface.members.as_slice()),
                        _ => continue,
                    };
                    let subst = bind_params(params, args);
                    for member in self.resolve_members(members, d.scope, &subst, 0) {
                        out.entry(member.name.clone()).or_insert(member);
                    }
                }

                for base in self.base_types(ty) {
                    self.collect_members(&base, out, chain);
                }
                chain.pop();
            }
            Type::Object(members) => {
                for member in members {
                    out.entry(member.name.clone()).or_insert_with(|| member.clone());
                }
            }
            Type::Intersection(parts) => {
                for part in parts {
                    self.collect_members(part, out, chain);
                }
            }
            _ => {}
        }
    }

    /// Every class and interface declaration merged with `decl`.
    fn merged_declarations(&self, decl: DeclId) -> SmallVec<[DeclId; 2]> {
        let d = self.table.decl(decl);
        let merged: SmallVec<[DeclId; 2]> = self
            .table
            .scope(d.scope)
            .symbols
            .get(&d.name)
            .map(|ids| {
                ids.iter()
                    .copied()
                    .filter(|id| {
                        matches!(
                            self.table.decl(*id).kind,
                            DeclKind::Class(_) | DeclKind::Interface(_)
                        )
                    })
                    .collect()
            })
            .unwrap_or_default();

        if merged.contains(&decl) {
            merged
        } else {
            smallvec::smallvec![decl]
        }
    }

    // ----- type resolution -----

    fn resolve_type(&self, expr: &TypeExpr, scope: ScopeId, subst: &Substitution, depth: usize) -> Type {
        if depth > self.options.max_alias_depth {
            debug!("type alias expansion too deep");
            return Type::Unresolved("<recursive alias>".to_string());
        }

        match expr {
            TypeExpr::Keyword(keyword) => Type::Primitive(*keyword),
            TypeExpr::Literal(literal) => Type::Literal(literal.clone()),
            TypeExpr::Reference(reference) => self.resolve_reference(reference, scope, subst, depth),
            TypeExpr::Array(inner) => Type::Array(Box::new(self.resolve_type(inner, scope, subst, depth))),
            TypeExpr::Tuple(items) => Type::Tuple(
                items
                    .iter()
                    .map(|item| self.resolve_type(item, scope, subst, depth))
                    .collect(),
            ),
            TypeExpr::Union(arms) => Type::union(
                arms.iter()
                    .map(|arm| self.resolve_type(arm, scope, subst, depth))
                    .collect(),
            ),
            TypeExpr::Intersection(parts) => {
                let mut parts: Vec<Type> = parts
                    .iter()
                    .map(|part| self.resolve_type(part, scope, subst, depth))
                    .collect();
                if parts.len() == 1 {
                    parts.remove(0)
                } else {
                    Type::Intersection(parts)
                }
            }
            TypeExpr::Function(_) => Type::Function,
            TypeExpr::Object(members) => Type::Object(self.resolve_members(members, scope, subst, depth)),
            TypeExpr::Query(name) => self.resolve_query(name, scope, depth),
            TypeExpr::Operator { op, ty } => match op {
                TypeOperator::Readonly => self.resolve_type(ty, scope, subst, depth),
                TypeOperator::Unique => Type::Primitive(KeywordType::Symbol),
                TypeOperator::KeyOf => Type::Unresolved("keyof".to_string()),
            },
            TypeExpr::IndexedAccess { object, index } => {
                let object = self.resolve_type(object, scope, subst, depth);
                match index.as_ref() {
                    TypeExpr::Literal(LiteralType::String(key)) => self
                        .apparent_members(&object)
                        .into_iter()
                        .find(|m| &m.name == key)
                        .map(|m| m.ty)
                        .unwrap_or_else(|| Type::Unresolved(key.clone())),
                    _ => Type::Unresolved("indexed access".to_string()),
                }
            }
            TypeExpr::Unsupported(text) => Type::Unresolved(text.clone()),
        }
    }

    fn resolve_members(
        &self,
        members: &[Member],
        scope: ScopeId,
        subst: &Substitution,
        depth: usize,
    ) -> Vec<MemberInfo> {
        members
            .iter()
            .filter(|m| !m.is_static && m.kind != MemberKind::Constructor)
            .filter_map(|m| {
                let name = m.name.clone()?;
                let ty = match (m.kind, &m.ty) {
                    (MemberKind::Method, _) => Type::Function,
                    (_, Some(ty)) => self.resolve_type(ty, scope, subst, depth),
                    (_, None) => Type::Primitive(KeywordType::Any),
                };
                Some(MemberInfo {
                    name,
                    kind: m.kind,
                    optional: m.optional,
                    readonly: m.readonly || m.kind == MemberKind::Getter,
                    ty,
                    doc: m.doc.clone(),
                })
            })
            .collect()
    }

    fn resolve_reference(&self, reference: &TypeRef, scope: ScopeId, subst: &Substitution, depth: usize) -> Type {
        let name = &reference.name;
        if name.is_single() {
            if let Some(bound) = subst.get(name.head()) {
                return bound.clone();
            }
        }

        let mut args: Vec<Type> = reference
            .args
            .iter()
            .map(|arg| self.resolve_type(arg, scope, subst, depth))
            .collect();

        if name.is_single() {
            if let Some(builtin) = builtin_type(name.head(), &mut args) {
                return builtin;
            }
        }

        if let Some(decl) = self.resolve_qualified(name, scope, Meaning::Type, 0) {
            return self.instantiate(decl, args, depth);
        }
        if let Some(member) = self.enum_member_reference(name, scope) {
            return member;
        }

        debug!(name = %name, "unresolved type reference");
        Type::Unresolved(name.to_string())
    }

    /// The type of a declaration applied to type arguments.
    fn instantiate(&self, id: DeclId, args: Vec<Type>, depth: usize) -> Type {
        let decl = self.table.decl(id);
        match &decl.kind {
            DeclKind::Interface(iface) => Type::Reference {
                decl: id,
                args: self.complete_args(&iface.type_params, args, decl.scope, depth),
            },
            DeclKind::Class(class) => Type::Reference {
                decl: id,
                args: self.complete_args(&class.type_params, args, decl.scope, depth),
            },
            DeclKind::Enum(_) => Type::Enum(id),
            DeclKind::TypeAlias(alias) => {
                let args = self.complete_args(&alias.type_params, args, decl.scope, depth);
                let subst = bind_params(&alias.type_params, &args);
                self.resolve_type(&alias.ty, decl.scope, &subst, depth + 1)
            }
            _ => Type::Unresolved(decl.name.clone()),
        }
    }

    /// Fill omitted type arguments from declared defaults.
    fn complete_args(&self, params: &[TypeParam], args: Vec<Type>, scope: ScopeId, depth: usize) -> Vec<Type> {
        let mut subst = Substitution::new();
        let mut completed = Vec::with_capacity(params.len());

        for (i, param) in params.iter().enumerate() {
            let ty = match args.get(i) {
                Some(arg) => arg.clone(),
                None => match &param.default {
                    Some(default) => self.resolve_type(default, scope, &subst, depth + 1),
                    None => Type::TypeParameter(param.name.clone()),
                },
            };
            subst.insert(param.name.clone(), ty.clone());
            completed.push(ty);
        }

        completed
    }

    /// `Size.Small` where `Size` is an enum.
    fn enum_member_reference(&self, name: &QualifiedName, scope: ScopeId) -> Option<Type> {
        let (last, init) = name.segments().split_last()?;
        if init.is_empty() {
            return None;
        }
        let container = QualifiedName(init.iter().cloned().collect());
        let decl = self.resolve_qualified(&container, scope, Meaning::Namespace, 0)?;
        let index = self
            .enum_declaration(decl)?
            .members
            .iter()
            .position(|m| &m.name == last)?;
        Some(Type::EnumMember { decl, index })
    }

    /// `typeof name`
    fn resolve_query(&self, name: &QualifiedName, scope: ScopeId, depth: usize) -> Type {
        let Some(id) = self.resolve_qualified(name, scope, Meaning::Value, 0) else {
            return Type::Unresolved(name.to_string());
        };
        let decl = self.table.decl(id);
        match &decl.kind {
            DeclKind::Variable(var) => match &var.ty {
                Some(ty) => self.resolve_type(ty, decl.scope, &Substitution::new(), depth + 1),
                None => Type::Unresolved(name.to_string()),
            },
            DeclKind::Class(_) | DeclKind::Function => Type::Function,
            _ => Type::Unresolved(name.to_string()),
        }
    }

    // ----- name lookup -----

    /// Resolve a possibly dotted name as seen from `scope`.
    fn resolve_qualified(&self, name: &QualifiedName, scope: ScopeId, meaning: Meaning, depth: usize) -> Option<DeclId> {
        let (last, init) = name.segments().split_last()?;
        if init.is_empty() {
            return self.lookup(last, scope, meaning, depth);
        }

        let mut container = self.lookup(&init[0], scope, Meaning::Namespace, depth)?;
        for segment in &init[1..] {
            container = self.member_of(container, segment, Meaning::Namespace, depth)?;
        }
        self.member_of(container, last, meaning, depth)
    }

    /// Walk the scope chain up to the global scope.
    fn lookup(&self, name: &str, scope: ScopeId, meaning: Meaning, depth: usize) -> Option<DeclId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            if let Some(found) = self.find_symbol(id, name, meaning, depth) {
                return Some(found);
            }
            current = self.table.scope(id).parent;
        }
        None
    }

    fn find_symbol(&self, scope: ScopeId, name: &str, meaning: Meaning, depth: usize) -> Option<DeclId> {
        let ids = self.table.scope(scope).symbols.get(name)?;
        ids.iter().copied().find_map(|id| {
            let decl = self.table.decl(id);
            if !decl.kind.has_meaning(meaning) {
                return None;
            }
            match decl.kind {
                DeclKind::Import(_) => self.follow_import(id, meaning, depth + 1),
                _ => Some(id),
            }
        })
    }

    fn member_of(&self, container: DeclId, name: &str, meaning: Meaning, depth: usize) -> Option<DeclId> {
        match self.table.decl(container).kind {
            DeclKind::Namespace(scope) => self.scope_member(scope, name, meaning, depth),
            _ => None,
        }
    }

    fn scope_member(&self, scope: ScopeId, name: &str, meaning: Meaning, depth: usize) -> Option<DeclId> {
        match self.table.scope(scope).kind {
            ScopeKind::Module | ScopeKind::AmbientModule => self.export_of(scope, name, meaning, depth + 1),
            ScopeKind::Namespace | ScopeKind::Global => self.find_symbol(scope, name, meaning, depth),
        }
    }

    fn follow_import(&self, id: DeclId, meaning: Meaning, depth: usize) -> Option<DeclId> {
        if depth > MAX_LOOKUP_DEPTH {
            return None;
        }
        let decl = self.table.decl(id);
        let DeclKind::Import(binding) = &decl.kind else {
            return Some(id);
        };
        let target = self.module_scope(Some(decl.file), &binding.specifier)?;

        match &binding.kind {
            ImportKind::Namespace => self.table.scope(target).self_decl,
            ImportKind::Default => self
                .export_of(target, "default", meaning, depth + 1)
                .or_else(|| self.export_equals(target, meaning, depth + 1)),
            ImportKind::Named(name) => self.export_of(target, name, meaning, depth + 1),
        }
    }

    /// The scope of the module `specifier` names, as seen from `file`.
    fn module_scope(&self, file: Option<FileId>, specifier: &str) -> Option<ScopeId> {
        if let Some(target) = file.and_then(|f| self.files.get(f.0)).and_then(|f| f.imports.get(specifier)) {
            return Some(self.files[target.0].scope);
        }
        self.table.ambient_modules.get(specifier).copied()
    }

    fn export_equals(&self, scope: ScopeId, meaning: Meaning, depth: usize) -> Option<DeclId> {
        let target = self.table.scope(scope).export_equals.as_ref()?;
        self.resolve_qualified(target, scope, meaning, depth + 1)
    }

    /// The declaration a module exports under `name`.
    fn export_of(&self, scope: ScopeId, name: &str, meaning: Meaning, depth: usize) -> Option<DeclId> {
        use crate::binder::ExportBinding;

        if depth > MAX_LOOKUP_DEPTH {
            debug!(%name, "export lookup too deep");
            return None;
        }
        let module = self.table.scope(scope);

        if let Some(binding) = module.exports.get(name) {
            let found = match binding {
                ExportBinding::Local(target) => self.resolve_qualified(target, scope, meaning, depth + 1),
                ExportBinding::From { specifier, name } => self
                    .module_scope(module.file, specifier)
                    .and_then(|target| self.export_of(target, name, meaning, depth + 1)),
                ExportBinding::Namespace { specifier } => self
                    .module_scope(module.file, specifier)
                    .and_then(|target| self.table.scope(target).self_decl),
            };
            if found.is_some() {
                return found;
            }
        }

        if name == "default" {
            return None;
        }

        if let Some(target) = self.export_equals(scope, Meaning::Namespace, depth) {
            if let Some(found) = self.member_of(target, name, meaning, depth + 1) {
                return Some(found);
            }
        }

        for specifier in &module.export_all {
            let found = self
                .module_scope(module.file, specifier)
                .and_then(|target| self.export_of(target, name, meaning, depth + 1));
            if found.is_some() {
                return found;
            }
        }

        // Declaration files export their top-level declarations implicitly.
        module.symbols.get(name)?.iter().copied().find(|id| {
            let kind = &self.table.decl(*id).kind;
            !matches!(kind, DeclKind::Import(_)) && kind.has_meaning(meaning)
        })
    }
}

/// Type-level helpers that need no declaration.
fn builtin_type(name: &str, args: &mut Vec<Type>) -> Option<Type> {
    if args.len() != 1 {
        return None;
    }
    match name {
        "Array" | "ReadonlyArray" => Some(Type::Array(Box::new(args.remove(0)))),
        "Readonly" | "Partial" | "Required" | "NonNullable" => Some(args.remove(0)),
        _ => None,
    }
}

fn bind_params(params: &[TypeParam], args: &[Type]) -> Substitution {
    params
        .iter()
        .enumerate()
        .map(|(i, param)| {
            let ty = args
                .get(i)
                .cloned()
                .unwrap_or_else(|| Type::TypeParameter(param.name.clone()));
            (param.name.clone(), ty)
        })
        .collect()
}

fn unbound_params(params: &[TypeParam]) -> Vec<Type> {
    params
        .iter()
        .map(|p| Type::TypeParameter(p.name.clone()))
        .collect()
}

/// File name without the declaration suffix.
fn module_name(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    name.strip_suffix(".d.ts").map(str::to_string).unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const REACT: &str = r#"
export = React;
export as namespace React;
declare namespace React {
    type SFC<P = {}> = StatelessComponent<P>;
    interface StatelessComponent<P = {}> {
        (props: P, context?: any): any;
        displayName?: string;
    }
    interface ComponentClass<P = {}> {
        new (props: P): Component<P, any>;
    }
    class Component<P, S> {
        constructor(props: Readonly<P>);
        props: Readonly<P>;
        state: Readonly<S>;
    }
}
"#;

    fn write(root: &Path, rel: &str, text: &str) -> Result<PathBuf, std::io::Error> {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, text)?;
        Ok(path)
    }

    fn first_decl(ctx: &TypeContext, path: &Path, statement: usize) -> DeclId {
        ctx.file(path).unwrap().statement_declarations(statement)[0]
    }

    fn member_names(members: &[MemberInfo]) -> Vec<&str> {
        members.iter().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn test_resolves_imported_react_types() -> Result<(), Box<dyn std::error::Error>> {
        let temp = TempDir::new()?;
        let root = temp.path();
        write(root, "node_modules/@types/react/index.d.ts", REACT)?;
        let button = write(
            root,
            "button.d.ts",
            "import * as React from 'react';\n\
             export interface Props { label: string }\n\
             export declare const Button: React.SFC<Props>;\n\
             export declare class Card extends React.Component<Props, {}> {}",
        )?;

        let ctx = TypeContext::build(&[&button], ResolverOptions::default());

        let ty = ctx.type_at_declaration(first_decl(&ctx, &button, 2));
        let symbol = ctx.symbol(&ty).unwrap();
        assert_eq!(symbol.name, "StatelessComponent");
        assert!(symbol.file.ends_with("react/index.d.ts"));
        assert_eq!(ty.type_args().len(), 1);
        let props = &ty.type_args()[0];
        assert_eq!(ctx.symbol(props).unwrap().name, "Props");

        let card = ctx.type_at_declaration(first_decl(&ctx, &button, 3));
        let bases = ctx.base_types(&card);
        assert_eq!(bases.len(), 1);
        assert_eq!(ctx.symbol(&bases[0]).unwrap().name, "Component");
        assert_eq!(ctx.symbol(&bases[0].type_args()[0]).unwrap().name, "Props");
        Ok(())
    }

    #[test]
    fn test_apparent_members_substitute_inherited_generics() -> Result<(), Box<dyn std::error::Error>> {
        let temp = TempDir::new()?;
        let path = write(
            temp.path(),
            "types.d.ts",
            "export interface Base<T> { value: T; base: boolean }\n\
             export interface Child extends Base<number> { own?: string; base: boolean; run(): void }",
        )?;
        let ctx = TypeContext::build(&[&path], ResolverOptions::default());
        let child = ctx.type_at_declaration(first_decl(&ctx, &path, 1));

        let members = ctx.apparent_members(&child);
        assert_eq!(member_names(&members), vec!["own", "base", "run", "value"]);
        assert!(members[0].optional);
        assert!(!members[2].is_property());
        assert_eq!(members[3].ty, Type::Primitive(KeywordType::Number));
        Ok(())
    }

    #[test]
    fn test_aliases_and_defaults() -> Result<(), Box<dyn std::error::Error>> {
        let temp = TempDir::new()?;
        let path = write(
            temp.path(),
            "types.d.ts",
            "export declare enum Size { Small, Large }\n\
             export type Maybe<T> = T | null | undefined;\n\
             export interface Box<T = string> { item: T }\n\
             export declare const a: Maybe<Size>;\n\
             export declare const b: Box;\n\
             export declare const c: Array<string>;\n\
             export declare const d: Size.Large;",
        )?;
        let ctx = TypeContext::build(&[&path], ResolverOptions::default());
        let size = first_decl(&ctx, &path, 0);

        assert_eq!(ctx.type_at_declaration(first_decl(&ctx, &path, 3)), Type::Enum(size));
        let b = ctx.type_at_declaration(first_decl(&ctx, &path, 4));
        assert_eq!(b.type_args(), &[Type::Primitive(KeywordType::String)]);
        assert_eq!(
            ctx.type_at_declaration(first_decl(&ctx, &path, 5)),
            Type::Array(Box::new(Type::Primitive(KeywordType::String)))
        );
        assert_eq!(
            ctx.type_at_declaration(first_decl(&ctx, &path, 6)),
            Type::EnumMember { decl: size, index: 1 }
        );
        Ok(())
    }

    #[test]
    fn test_recursive_alias_terminates() -> Result<(), Box<dyn std::error::Error>> {
        let temp = TempDir::new()?;
        let path = write(
            temp.path(),
            "types.d.ts",
            "type A = B;\ntype B = A;\nexport declare const x: A;",
        )?;
        let ctx = TypeContext::build(&[&path], ResolverOptions::default());
        assert!(matches!(
            ctx.type_at_declaration(first_decl(&ctx, &path, 2)),
            Type::Unresolved(_)
        ));
        Ok(())
    }

    #[test]
    fn test_inheritance_cycle_terminates() -> Result<(), Box<dyn std::error::Error>> {
        let temp = TempDir::new()?;
        let path = write(
            temp.path(),
            "types.d.ts",
            "export interface A extends B { a: string }\nexport interface B extends A { b: string }",
        )?;
        let ctx = TypeContext::build(&[&path], ResolverOptions::default());
        let a = ctx.type_at_declaration(first_decl(&ctx, &path, 0));
        assert_eq!(member_names(&ctx.apparent_members(&a)), vec!["a", "b"]);
        Ok(())
    }

    #[test]
    fn test_reexports() -> Result<(), Box<dyn std::error::Error>> {
        let temp = TempDir::new()?;
        let root = temp.path();
        write(root, "lib/props.d.ts", "export interface Props { x: number }")?;
        write(root, "lib/index.d.ts", "export * from './props';")?;
        let main = write(
            root,
            "main.d.ts",
            "import { Props as P } from './lib';\nexport declare const v: P;",
        )?;
        let ctx = TypeContext::build(&[&main], ResolverOptions::default());
        let ty = ctx.type_at_declaration(first_decl(&ctx, &main, 1));
        assert_eq!(ctx.symbol(&ty).unwrap().name, "Props");
        Ok(())
    }

    #[test]
    fn test_file_errors() -> Result<(), Box<dyn std::error::Error>> {
        let temp = TempDir::new()?;
        let broken = write(temp.path(), "broken.d.ts", "export interface A { a: string")?;
        let ctx = TypeContext::build(&[&broken], ResolverOptions::default());

        assert!(matches!(ctx.file(&broken), Err(ResolveError::Parse { .. })));
        assert!(matches!(
            ctx.file(&temp.path().join("other.d.ts")),
            Err(ResolveError::FileNotLoaded { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_local_variable() -> Result<(), Box<dyn std::error::Error>> {
        let temp = TempDir::new()?;
        let path = write(
            temp.path(),
            "a.d.ts",
            "declare const Primary: string;\nexport default Primary;",
        )?;
        let ctx = TypeContext::build(&[&path], ResolverOptions::default());
        let file = ctx.file(&path)?;
        assert!(ctx.local_variable(file, "Primary").is_some());
        assert!(ctx.local_variable(file, "Missing").is_none());
        Ok(())
    }
}
