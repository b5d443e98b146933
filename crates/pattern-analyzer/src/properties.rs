//! Mapping a component's property type to the property schema.

use pattern_core::ast::{EnumInitializer, KeywordType, LiteralType};
use pattern_core::{EnumOption, Property, PropertyMap};
use pattern_resolver::{DeclId, MemberInfo, Type, TypeContext};
use tracing::debug;

/// Map the property members of `props` to a property map.
///
/// Members of unsupported types are left out. Nested interfaces are
/// expanded up to `max_object_depth` levels; an interface that is already
/// being expanded on the current path is left out as well.
pub fn map_properties(ctx: &TypeContext, props: &Type, max_object_depth: usize) -> PropertyMap {
    let mut mapper = PropertyMapper {
        ctx,
        max_object_depth,
        expanding: Vec::new(),
    };
    mapper.expanding.extend(props.decl());
    mapper.map_members(props)
}

struct PropertyMapper<'a> {
    ctx: &'a TypeContext,
    max_object_depth: usize,
    /// Interfaces on the current expansion path
    expanding: Vec<DeclId>,
}

impl PropertyMapper<'_> {
    fn map_members(&mut self, ty: &Type) -> PropertyMap {
        let mut properties = PropertyMap::new();
        for member in self.ctx.apparent_members(ty) {
            if !member.is_property() {
                continue;
            }
            match self.map_member(&member) {
                Some(property) => {
                    properties.insert(member.name, property);
                }
                None => debug!(member = %member.name, ty = ?member.ty, "dropping unsupported member"),
            }
        }
        properties
    }

    fn map_member(&mut self, member: &MemberInfo) -> Option<Property> {
        self.map_type(&member.ty, !member.optional)
    }

    fn map_type(&mut self, ty: &Type, required: bool) -> Option<Property> {
        match ty {
            Type::Union(arms) => match literal_options(arms) {
                Some(options) => Some(Property::Enum { options, required }),
                None => self.map_type(arms.first()?, required),
            },
            Type::Primitive(KeywordType::String) => Some(Property::String { required }),
            Type::Primitive(KeywordType::Number) => Some(Property::Number { required }),
            Type::Primitive(KeywordType::Boolean) | Type::Literal(LiteralType::Boolean(_)) => {
                Some(Property::Boolean { required })
            }
            Type::Enum(decl) | Type::EnumMember { decl, .. } => Some(Property::Enum {
                options: self.enum_options(*decl)?,
                required,
            }),
            Type::Array(element) => match element.as_ref() {
                Type::Primitive(KeywordType::String) => Some(Property::StringArray { required }),
                Type::Primitive(KeywordType::Number) => Some(Property::NumberArray { required }),
                _ => None,
            },
            Type::Reference { decl, .. } if self.ctx.is_interface(*decl) => self.map_object(*decl, ty),
            _ => None,
        }
    }

    fn map_object(&mut self, decl: DeclId, ty: &Type) -> Option<Property> {
        if self.expanding.contains(&decl) || self.expanding.len() > self.max_object_depth {
            debug!(interface = %self.ctx.declaration(decl).name, "object expansion cut off");
            return None;
        }

        self.expanding.push(decl);
        let properties = self.map_members(ty);
        self.expanding.pop();

        Some(Property::Object { properties })
    }

    /// One option per enum member, in declaration order.
    fn enum_options(&self, decl: DeclId) -> Option<Vec<EnumOption>> {
        let declaration = self.ctx.enum_declaration(decl)?;
        let options = declaration
            .members
            .iter()
            .enumerate()
            .map(|(index, member)| {
                let display_name = member
                    .doc
                    .as_ref()
                    .and_then(|doc| doc.tag("name"))
                    .filter(|name| !name.is_empty())
                    .unwrap_or_else(|| member.name.clone());
                let ordinal = match member.initializer {
                    Some(EnumInitializer::Number(value)) if value.is_finite() => value as i64,
                    _ => index as i64,
                };
                EnumOption::new(member.name.as_str(), display_name, ordinal)
            })
            .collect();
        Some(options)
    }
}

/// Options for a union made only of string literals.
fn literal_options(arms: &[Type]) -> Option<Vec<EnumOption>> {
    arms.iter()
        .enumerate()
        .map(|(index, arm)| match arm {
            Type::Literal(LiteralType::String(value)) => {
                Some(EnumOption::new(value.as_str(), value.as_str(), index as i64))
            }
            _ => None,
        })
        .collect()
}
