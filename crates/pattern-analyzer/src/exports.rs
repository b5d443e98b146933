//! Export extraction and type inheritance trees.

use pattern_core::ast::Statement;
use pattern_resolver::{DeclId, SourceFile, Type, TypeContext};
use serde::Serialize;
use tracing::debug;

/// One type and its ancestor chain.
///
/// `resolution_aborted` marks the node at which the stop predicate matched.
/// Such a node has no base types of its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeInheritanceTree {
    pub type_name: Option<String>,
    #[serde(skip)]
    pub ty: Type,
    pub base_types: Vec<TypeInheritanceTree>,
    pub resolution_aborted: bool,
}

impl TypeInheritanceTree {
    /// Build the tree for `ty`, descending through base types until `stop`
    /// matches. Inheritance cycles and chains longer than `max_depth` end
    /// the branch.
    pub fn build<F>(ctx: &TypeContext, ty: Type, stop: &F, max_depth: usize) -> Self
    where
        F: Fn(&Type) -> bool,
    {
        let mut chain = Vec::new();
        Self::build_node(ctx, ty, stop, max_depth, &mut chain)
    }

    fn build_node<F>(ctx: &TypeContext, ty: Type, stop: &F, max_depth: usize, chain: &mut Vec<DeclId>) -> Self
    where
        F: Fn(&Type) -> bool,
    {
        let type_name = ctx.symbol(&ty).map(|s| s.name.to_string());

        if stop(&ty) {
            return Self {
                type_name,
                ty,
                base_types: Vec::new(),
                resolution_aborted: true,
            };
        }

        let decl = ty.decl();
        let cyclic = decl.map_or(false, |d| chain.contains(&d));
        if cyclic || chain.len() >= max_depth {
            debug!(type_name = ?type_name, "inheritance walk cut off");
            return Self {
                type_name,
                ty,
                base_types: Vec::new(),
                resolution_aborted: false,
            };
        }

        if let Some(decl) = decl {
            chain.push(decl);
        }
        let base_types = ctx
            .base_types(&ty)
            .into_iter()
            .map(|base| Self::build_node(ctx, base, stop, max_depth, chain))
            .collect();
        if decl.is_some() {
            chain.pop();
        }

        Self {
            type_name,
            ty,
            base_types,
            resolution_aborted: false,
        }
    }

    /// The first node, in pre-order, at which resolution was aborted.
    pub fn marker(&self) -> Option<&TypeInheritanceTree> {
        if self.resolution_aborted {
            return Some(self);
        }
        self.base_types.iter().find_map(|base| base.marker())
    }
}

/// An exported declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Export {
    /// `None` for default exports
    pub export_name: Option<String>,
    pub export_type: TypeInheritanceTree,
}

impl Export {
    /// Whether the inheritance walk reached a node the stop predicate matched.
    pub fn is_component(&self) -> bool {
        self.export_type.marker().is_some()
    }

    /// First type argument of the matched ancestor: the property bag.
    pub fn props_type(&self) -> Option<&Type> {
        self.export_type.marker()?.ty.type_args().first()
    }
}

/// Collect the exports of one declaration file.
///
/// Recognized shapes are an exported variable with a type annotation, an
/// exported named class, and a default export of a variable declared in the
/// same file. Other statements are skipped.
pub fn extract_exports<F>(ctx: &TypeContext, file: &SourceFile, stop: F, max_depth: usize) -> Vec<Export>
where
    F: Fn(&Type) -> bool,
{
    let mut exports = Vec::new();

    for (index, statement) in file.module().statements.iter().enumerate() {
        if !statement.is_export() {
            continue;
        }
        let decls = file.statement_declarations(index);

        let found = match statement {
            Statement::Variable(var) => var
                .declarations
                .iter()
                .zip(decls)
                .find(|(decl, _)| decl.ty.is_some())
                .map(|(decl, id)| (Some(decl.name.clone()), *id)),
            Statement::Class(class) => class
                .name
                .clone()
                .zip(decls.first().copied())
                .map(|(name, id)| (Some(name), id)),
            Statement::ExportAssignment(assign) => assign
                .target
                .as_ref()
                .filter(|target| target.is_single())
                .and_then(|target| ctx.local_variable(file, target.head()))
                .map(|id| (None, id)),
            _ => None,
        };

        let Some((export_name, decl)) = found else {
            debug!(path = %file.path().display(), statement = index, "export shape not recognized");
            continue;
        };

        let ty = first_arm(ctx.type_at_declaration(decl));
        exports.push(Export {
            export_name,
            export_type: TypeInheritanceTree::build(ctx, ty, &stop, max_depth),
        });
    }

    exports
}

/// A union-typed declaration is represented by its first arm.
fn first_arm(ty: Type) -> Type {
    match ty {
        Type::Union(mut arms) if !arms.is_empty() => arms.swap_remove(0),
        other => other,
    }
}
