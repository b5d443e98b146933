//! Declaration binding: scopes, symbols, and export tables.
//!
//! Every module file gets its own scope. Script files (no imports or
//! exports) and `declare global` blocks contribute to the shared global
//! scope. Namespaces with the same name in the same scope are merged.

use indexmap::IndexMap;
use pattern_core::ast::*;
use smallvec::SmallVec;

use crate::types::{DeclId, FileId, ScopeId};

/// What kind of scope a name table belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    /// A module file
    Module,
    /// `declare module 'name' { }`
    AmbientModule,
    Namespace,
}

/// How an exported name maps back to a declaration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ExportBinding {
    /// A name visible in the exporting scope
    Local(QualifiedName),
    /// `export { name } from 'specifier'`
    From { specifier: String, name: String },
    /// `export * as ns from 'specifier'`
    Namespace { specifier: String },
}

#[derive(Debug, Clone)]
pub(crate) struct Scope {
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    /// File that owns the scope; `None` for the global scope
    pub file: Option<FileId>,
    pub symbols: IndexMap<String, SmallVec<[DeclId; 2]>>,
    pub exports: IndexMap<String, ExportBinding>,
    /// `export * from '...'` specifiers
    pub export_all: Vec<String>,
    /// Target of `export = X`
    pub export_equals: Option<QualifiedName>,
    /// Declaration standing for the module itself, for namespace imports
    pub self_decl: Option<DeclId>,
}

impl Scope {
    fn new(kind: ScopeKind, parent: Option<ScopeId>, file: Option<FileId>) -> Self {
        Self {
            kind,
            parent,
            file,
            symbols: IndexMap::new(),
            exports: IndexMap::new(),
            export_all: Vec::new(),
            export_equals: None,
            self_decl: None,
        }
    }
}

/// A binding brought in by an import statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportBinding {
    pub specifier: String,
    pub kind: ImportKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImportKind {
    Default,
    Namespace,
    Named(String),
}

/// What a declaration declares.
#[derive(Debug, Clone, PartialEq)]
pub enum DeclKind {
    Interface(InterfaceDecl),
    Class(ClassDecl),
    Enum(EnumDecl),
    TypeAlias(TypeAliasDecl),
    Variable(VariableDecl),
    Function,
    /// A namespace, ambient module, or module file
    Namespace(ScopeId),
    Import(ImportBinding),
}

/// Which declaration space a lookup searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Meaning {
    Type,
    Value,
    Namespace,
}

impl DeclKind {
    pub(crate) fn has_meaning(&self, meaning: Meaning) -> bool {
        match self {
            DeclKind::Import(_) => true,
            DeclKind::Interface(_) | DeclKind::TypeAlias(_) => meaning == Meaning::Type,
            DeclKind::Class(_) => meaning != Meaning::Namespace,
            DeclKind::Enum(_) => true,
            DeclKind::Variable(_) | DeclKind::Function => meaning == Meaning::Value,
            DeclKind::Namespace(_) => meaning != Meaning::Type,
        }
    }
}

/// A named declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub name: String,
    pub file: FileId,
    /// Scope the declaration's own type references resolve in
    pub scope: ScopeId,
    pub kind: DeclKind,
    pub modifiers: Modifiers,
}

/// Arena of scopes and declarations.
#[derive(Debug, Clone)]
pub(crate) struct SymbolTable {
    pub scopes: Vec<Scope>,
    pub decls: Vec<Declaration>,
    pub global: ScopeId,
    pub ambient_modules: IndexMap<String, ScopeId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::new(ScopeKind::Global, None, None)],
            decls: Vec::new(),
            global: ScopeId(0),
            ambient_modules: IndexMap::new(),
        }
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    pub fn decl(&self, id: DeclId) -> &Declaration {
        &self.decls[id.0]
    }

    fn add_scope(&mut self, kind: ScopeKind, parent: Option<ScopeId>, file: Option<FileId>) -> ScopeId {
        self.scopes.push(Scope::new(kind, parent, file));
        ScopeId(self.scopes.len() - 1)
    }

    fn add_decl(&mut self, scope: ScopeId, decl: Declaration) -> DeclId {
        let id = DeclId(self.decls.len());
        let name = decl.name.clone();
        self.decls.push(decl);
        self.scopes[scope.0].symbols.entry(name).or_default().push(id);
        id
    }

    /// Create the scope of a module file and its self declaration.
    pub fn add_module_scope(&mut self, file: FileId, name: &str, is_script: bool) -> ScopeId {
        if is_script {
            return self.global;
        }
        let scope = self.add_scope(ScopeKind::Module, Some(self.global), Some(file));
        self.decls.push(Declaration {
            name: name.to_string(),
            file,
            scope,
            kind: DeclKind::Namespace(scope),
            modifiers: Modifiers::default(),
        });
        self.scopes[scope.0].self_decl = Some(DeclId(self.decls.len() - 1));
        scope
    }

    /// Find or create a namespace scope named `name` inside `parent`.
    fn namespace_scope(&mut self, parent: ScopeId, file: FileId, name: &str, modifiers: Modifiers) -> ScopeId {
        let existing = self.scopes[parent.0].symbols.get(name).and_then(|ids| {
            ids.iter().find_map(|id| match self.decls[id.0].kind {
                DeclKind::Namespace(scope) => Some(scope),
                _ => None,
            })
        });
        if let Some(scope) = existing {
            return scope;
        }

        let scope = self.add_scope(ScopeKind::Namespace, Some(parent), Some(file));
        self.add_decl(
            parent,
            Declaration {
                name: name.to_string(),
                file,
                scope: parent,
                kind: DeclKind::Namespace(scope),
                modifiers,
            },
        );
        scope
    }

    fn ambient_module_scope(&mut self, file: FileId, name: &str) -> ScopeId {
        if let Some(&scope) = self.ambient_modules.get(name) {
            return scope;
        }
        let scope = self.add_scope(ScopeKind::AmbientModule, Some(self.global), Some(file));
        self.decls.push(Declaration {
            name: name.to_string(),
            file,
            scope,
            kind: DeclKind::Namespace(scope),
            modifiers: Modifiers::default(),
        });
        self.scopes[scope.0].self_decl = Some(DeclId(self.decls.len() - 1));
        self.ambient_modules.insert(name.to_string(), scope);
        scope
    }
}

/// Binds the statements of one file into a symbol table.
pub(crate) struct Binder<'a> {
    table: &'a mut SymbolTable,
    file: FileId,
    /// Declarations created for each top-level statement
    pub statement_decls: Vec<SmallVec<[DeclId; 1]>>,
}

impl<'a> Binder<'a> {
    pub fn new(table: &'a mut SymbolTable, file: FileId) -> Self {
        Self {
            table,
            file,
            statement_decls: Vec::new(),
        }
    }

    /// Bind a file's top-level statements into `scope`.
    pub fn bind_module(&mut self, module: &Module, scope: ScopeId) {
        for statement in &module.statements {
            let decls = self.bind_statement(statement, scope);
            self.statement_decls.push(decls);
        }
    }

    fn bind_statements(&mut self, statements: &[Statement], scope: ScopeId) {
        for statement in statements {
            self.bind_statement(statement, scope);
        }
    }

    fn declare(&mut self, scope: ScopeId, name: &str, kind: DeclKind, modifiers: Modifiers) -> DeclId {
        let id = self.table.add_decl(
            scope,
            Declaration {
                name: name.to_string(),
                file: self.file,
                scope,
                kind,
                modifiers,
            },
        );
        if modifiers.export {
            let exports = &mut self.table.scopes[scope.0].exports;
            let target = ExportBinding::Local(QualifiedName::single(name));
            if modifiers.default {
                exports.insert("default".to_string(), target);
            } else {
                exports.insert(name.to_string(), target);
            }
        }
        id
    }

    fn import(&mut self, scope: ScopeId, local: &str, specifier: &str, kind: ImportKind) -> DeclId {
        self.declare(
            scope,
            local,
            DeclKind::Import(ImportBinding {
                specifier: specifier.to_string(),
                kind,
            }),
            Modifiers::default(),
        )
    }

    fn bind_statement(&mut self, statement: &Statement, scope: ScopeId) -> SmallVec<[DeclId; 1]> {
        let mut created = SmallVec::new();

        match statement {
            Statement::Import(import) => {
                if let Some(local) = &import.default {
                    created.push(self.import(scope, local, &import.specifier, ImportKind::Default));
                }
                if let Some(local) = &import.namespace {
                    created.push(self.import(scope, local, &import.specifier, ImportKind::Namespace));
                }
                for named in &import.named {
                    let kind = ImportKind::Named(named.imported.clone());
                    created.push(self.import(scope, &named.local, &import.specifier, kind));
                }
            }
            Statement::ExportNamed(export) => {
                let exports = &mut self.table.scopes[scope.0].exports;
                for spec in &export.specifiers {
                    let binding = match &export.from {
                        Some(specifier) => ExportBinding::From {
                            specifier: specifier.clone(),
                            name: spec.local.clone(),
                        },
                        None => ExportBinding::Local(QualifiedName::single(spec.local.as_str())),
                    };
                    exports.insert(spec.exported.clone(), binding);
                }
            }
            Statement::ExportAll(export) => {
                let target = &mut self.table.scopes[scope.0];
                match &export.alias {
                    Some(alias) => {
                        target.exports.insert(
                            alias.clone(),
                            ExportBinding::Namespace {
                                specifier: export.from.clone(),
                            },
                        );
                    }
                    None => target.export_all.push(export.from.clone()),
                }
            }
            Statement::ExportAssignment(assign) => {
                if let Some(target) = &assign.target {
                    let scope = &mut self.table.scopes[scope.0];
                    if assign.is_default {
                        scope
                            .exports
                            .insert("default".to_string(), ExportBinding::Local(target.clone()));
                    } else {
                        scope.export_equals = Some(target.clone());
                    }
                }
            }
            Statement::ExportAsNamespace(name) => {
                // UMD global: the module is visible under `name` everywhere
                if let Some(module) = self.table.scopes[scope.0].self_decl {
                    let global = self.table.global;
                    self.table.scopes[global.0]
                        .symbols
                        .entry(name.clone())
                        .or_default()
                        .push(module);
                }
            }
            Statement::Interface(decl) => {
                created.push(self.declare(scope, &decl.name, DeclKind::Interface(decl.clone()), decl.modifiers));
            }
            Statement::Class(decl) => {
                if let Some(name) = &decl.name {
                    created.push(self.declare(scope, name, DeclKind::Class(decl.clone()), decl.modifiers));
                }
            }
            Statement::Enum(decl) => {
                created.push(self.declare(scope, &decl.name, DeclKind::Enum(decl.clone()), decl.modifiers));
            }
            Statement::TypeAlias(decl) => {
                created.push(self.declare(scope, &decl.name, DeclKind::TypeAlias(decl.clone()), decl.modifiers));
            }
            Statement::Variable(var) => {
                for decl in &var.declarations {
                    created.push(self.declare(scope, &decl.name, DeclKind::Variable(decl.clone()), var.modifiers));
                }
            }
            Statement::Function(func) => {
                if let Some(name) = &func.name {
                    // overloads share one symbol
                    let exists = self.table.scopes[scope.0]
                        .symbols
                        .get(name)
                        .map_or(false, |ids| ids.iter().any(|id| self.table.decl(*id).kind == DeclKind::Function));
                    if !exists {
                        created.push(self.declare(scope, name, DeclKind::Function, func.modifiers));
                    }
                }
            }
            Statement::Namespace(ns) => self.bind_namespace(ns, scope),
        }

        created
    }

    fn bind_namespace(&mut self, ns: &NamespaceDecl, scope: ScopeId) {
        match &ns.name {
            NamespaceName::Name(name) => {
                let mut inner = scope;
                for (i, segment) in name.segments().iter().enumerate() {
                    let modifiers = if i == 0 { ns.modifiers } else { Modifiers::default() };
                    inner = self.table.namespace_scope(inner, self.file, segment, modifiers);
                }
                if ns.modifiers.export {
                    self.table.scopes[scope.0].exports.insert(
                        name.head().to_string(),
                        ExportBinding::Local(QualifiedName::single(name.head())),
                    );
                }
                self.bind_statements(&ns.body, inner);
            }
            NamespaceName::Module(specifier) => {
                let inner = self.table.ambient_module_scope(self.file, specifier);
                self.bind_statements(&ns.body, inner);
            }
            NamespaceName::Global => {
                let global = self.table.global;
                self.bind_statements(&ns.body, global);
            }
        }
    }
}
