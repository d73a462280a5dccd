use indexmap::IndexMap;
use log::debug;

use crate::error::ResolveError;
use crate::ir::PrimitiveType;
use crate::parse::spec::ArgumentType;

/// Maps domain aliases to primitive wire types.
///
/// Every declared domain is resolved when the resolver is built, so a spec
/// whose domain table names an unsupported type fails before any class is
/// visited.
#[derive(Debug, Clone, Default)]
pub struct DomainResolver {
    domains: IndexMap<String, PrimitiveType>,
}

impl DomainResolver {
    pub fn new(domains: &[(String, String)]) -> Result<Self, ResolveError> {
        let mut resolved = IndexMap::with_capacity(domains.len());
        for (alias, type_name) in domains {
            let ty: PrimitiveType = type_name.parse()?;
            debug!("domain {alias} -> {ty}");
            resolved.insert(alias.clone(), ty);
        }
        Ok(Self { domains: resolved })
    }

    /// Resolve a domain alias.
    pub fn resolve(&self, alias: &str) -> Result<PrimitiveType, ResolveError> {
        self.domains
            .get(alias)
            .copied()
            .ok_or_else(|| ResolveError::UnknownDomain(alias.to_string()))
    }

    /// Resolve an argument's type reference, direct or through a domain.
    pub fn resolve_type(&self, type_ref: ArgumentType<'_>) -> Result<PrimitiveType, ResolveError> {
        match type_ref {
            ArgumentType::Direct(name) => name.parse(),
            ArgumentType::Domain(alias) => self.resolve(alias),
        }
    }

    pub fn domains(&self) -> &IndexMap<String, PrimitiveType> {
        &self.domains
    }

    pub fn into_domains(self) -> IndexMap<String, PrimitiveType> {
        self.domains
    }
}
