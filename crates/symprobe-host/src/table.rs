//! # In-memory Symbol Table
//!
//! [`SymbolTable`] is a [`HostResolver`] backed by declared types, methods,
//! fields and constructors. It is the host the CLI and the tests run against.
//!
//! ## Lookup rules
//!
//! | Situation | Failure |
//! |-----------|---------|
//! | owner reference not declared | `LocationUnresolvable` |
//! | no member with that name, or no overload with that signature | `NotFound` |
//! | field exists with a different value kind | `NotFound` |
//! | constructor signature returning something other than the owner | `TypeMismatch` |
//! | static-ness differs from the lookup | `AccessDenied` |
//! | private member, public capability | `AccessDenied` |
//! | setter lookup on a final field | `AccessDenied` |
//! | special lookup from a caller outside the owner's hierarchy | `AccessDenied` |
//! | handle registry full | `Fatal(ResourceExhausted)` |
//!
//! Static, virtual, bind and field lookups walk the supertype chain starting at
//! the owner; special and constructor lookups consider the owner only.
//!
//! Handles are interned: resolving the same member twice yields equal handles.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use thiserror::Error;
use tracing::{debug, trace, warn};

use symprobe_types::env_utils::{env_var_or, MAX_HANDLES_VAR};
use symprobe_types::{
    validate_symbol_name, AccessScope, CapabilityToken, Handle, HandleId, HandleInfo, HandleKind,
    Location, Owner, Receiver, Signature, ValueKind,
};

use crate::failure::{FatalFailure, HostResult, LookupFailure};
use crate::model::{FieldDef, MethodDef, TableDocument, TypeDef, Visibility};
use crate::resolver::HostResolver;

pub const DEFAULT_MAX_HANDLES: usize = 65_536;

static NEXT_HOST_ID: AtomicU64 = AtomicU64::new(1);

/// Settings for a [`SymbolTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableConfig {
    /// Capacity of the handle registry. Exceeding it is a fatal host failure.
    pub max_handles: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            max_handles: env_var_or(MAX_HANDLES_VAR, DEFAULT_MAX_HANDLES),
        }
    }
}

/// Errors raised while building a table from declarations.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to read symbol table {}: {source}", .path.display())]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid symbol table JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("type '{0}' is declared more than once")]
    DuplicateType(String),

    #[error("type '{ty}' extends undeclared type '{supertype}'")]
    UnknownSupertype { ty: String, supertype: String },

    #[error("type '{0}' is part of a supertype cycle")]
    CyclicSupertype(String),

    #[error("type '{ty}' declares member '{name}' containing a qualifier separator")]
    InvalidMemberName { ty: String, name: String },

    #[error("type '{ty}' declares {member} more than once")]
    DuplicateMember { ty: String, member: String },
}

#[derive(Debug, Default)]
struct HandleRegistry {
    infos: Vec<HandleInfo>,
    index: HashMap<HandleInfo, u64>,
}

/// In-memory host over declared types.
#[derive(Debug)]
pub struct SymbolTable {
    host_id: u64,
    types: BTreeMap<String, TypeDef>,
    config: TableConfig,
    handles: RwLock<HandleRegistry>,
    next_receiver: AtomicU64,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new(TableConfig::default())
    }
}

impl SymbolTable {
    /// Create an empty table.
    pub fn new(config: TableConfig) -> Self {
        Self {
            host_id: NEXT_HOST_ID.fetch_add(1, Ordering::Relaxed),
            types: BTreeMap::new(),
            config,
            handles: RwLock::new(HandleRegistry::default()),
            next_receiver: AtomicU64::new(1),
        }
    }

    /// Build and validate a table from type declarations.
    pub fn from_types(types: impl IntoIterator<Item = TypeDef>) -> Result<Self, TableError> {
        Self::from_types_with(types, TableConfig::default())
    }

    pub fn from_types_with(
        types: impl IntoIterator<Item = TypeDef>,
        config: TableConfig,
    ) -> Result<Self, TableError> {
        let mut table = Self::new(config);
        for ty in types {
            table.insert_type(ty)?;
        }
        table.validate()?;
        debug!(types = table.types.len(), "built symbol table");
        Ok(table)
    }

    pub fn from_document(doc: TableDocument, config: TableConfig) -> Result<Self, TableError> {
        Self::from_types_with(doc.types, config)
    }

    pub fn from_json_str(json: &str) -> Result<Self, TableError> {
        let doc: TableDocument = serde_json::from_str(json)?;
        Self::from_document(doc, TableConfig::default())
    }

    pub fn from_path(path: &Path) -> Result<Self, TableError> {
        let json = std::fs::read_to_string(path).map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_json_str(&json)?;
        debug!(path = %path.display(), types = table.types.len(), "loaded symbol table");
        Ok(table)
    }

    /// Replace the configuration (e.g. a smaller handle registry).
    pub fn with_config(mut self, config: TableConfig) -> Self {
        self.config = config;
        self
    }

    /// Add one type, checking member names and duplicates.
    ///
    /// Supertype links are checked by [`validate`](Self::validate).
    pub fn insert_type(&mut self, ty: TypeDef) -> Result<(), TableError> {
        if self.types.contains_key(&ty.name) {
            return Err(TableError::DuplicateType(ty.name));
        }
        check_members(&ty)?;
        self.types.insert(ty.name.clone(), ty);
        Ok(())
    }

    /// Check that every supertype is declared and the hierarchy is acyclic.
    pub fn validate(&self) -> Result<(), TableError> {
        for ty in self.types.values() {
            let mut steps = 0;
            let mut current = ty;
            while let Some(sup) = &current.supertype {
                current = self
                    .types
                    .get(sup)
                    .ok_or_else(|| TableError::UnknownSupertype {
                        ty: current.name.clone(),
                        supertype: sup.clone(),
                    })?;
                steps += 1;
                if steps > self.types.len() {
                    return Err(TableError::CyclicSupertype(ty.name.clone()));
                }
            }
        }
        Ok(())
    }

    pub fn config(&self) -> TableConfig {
        self.config
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn get_type(&self, name: &str) -> Option<&TypeDef> {
        self.types.get(name)
    }

    /// Number of distinct handles minted so far.
    pub fn handle_count(&self) -> usize {
        self.handles.read().infos.len()
    }

    /// Create a live instance of a declared type, for bind lookups.
    pub fn instantiate(&self, reference: &str) -> Result<Receiver, LookupFailure> {
        if !self.types.contains_key(reference) {
            return Err(LookupFailure::unresolvable(reference));
        }
        let id = self.next_receiver.fetch_add(1, Ordering::Relaxed);
        Ok(Receiver::new(id, Location::new(reference)))
    }

    fn type_def(&self, location: &Location) -> Result<&TypeDef, LookupFailure> {
        self.types
            .get(location.name())
            .ok_or_else(|| LookupFailure::unresolvable(location.name()))
    }

    /// The type followed by its supertypes, most derived first.
    fn chain<'a>(&'a self, start: &'a TypeDef) -> impl Iterator<Item = &'a TypeDef> + 'a {
        let limit = self.types.len();
        std::iter::successors(Some(start), move |ty| {
            ty.supertype.as_ref().and_then(|s| self.types.get(s))
        })
        .take(limit.max(1))
    }

    fn is_subtype(&self, sub: &TypeDef, sup: &str) -> bool {
        self.chain(sub).any(|ty| ty.name == sup)
    }

    fn lookup_method(
        &self,
        token: &CapabilityToken,
        owner: &Location,
        name: &str,
        signature: &Signature,
        want_static: bool,
        walk: bool,
    ) -> HostResult<(&TypeDef, &MethodDef)> {
        let start = self.type_def(owner)?;
        let depth = if walk { usize::MAX } else { 1 };
        let mut overloads = 0usize;

        for ty in self.chain(start).take(depth) {
            for method in ty.methods.iter().filter(|m| m.name == name) {
                if &method.signature != signature {
                    overloads += 1;
                    continue;
                }
                if method.is_static != want_static {
                    let detail = if want_static {
                        "expected a static method"
                    } else {
                        "expected an instance method"
                    };
                    return Err(LookupFailure::access_denied(owner, name, detail).into());
                }
                check_visibility(token, method.visibility, owner, name)?;
                return Ok((ty, method));
            }
        }

        let detail = if overloads > 0 {
            format!("{overloads} overload(s) exist, none with signature {signature}")
        } else {
            "no such method".to_string()
        };
        Err(LookupFailure::not_found(owner, name, detail).into())
    }

    fn lookup_field(
        &self,
        token: &CapabilityToken,
        owner: &Location,
        name: &str,
        value: &ValueKind,
        want_static: bool,
        for_write: bool,
    ) -> HostResult<(&TypeDef, &FieldDef)> {
        let start = self.type_def(owner)?;
        let found = self
            .chain(start)
            .find_map(|ty| ty.fields.iter().find(|f| f.name == name).map(|f| (ty, f)));

        let Some((ty, field)) = found else {
            return Err(LookupFailure::not_found(owner, name, "no such field").into());
        };
        if &field.value_type != value {
            return Err(LookupFailure::not_found(
                owner,
                name,
                format!("field has kind {}, not {}", field.value_type, value),
            )
            .into());
        }
        if field.is_static != want_static {
            let detail = if want_static {
                "expected a static field"
            } else {
                "expected an instance field"
            };
            return Err(LookupFailure::access_denied(owner, name, detail).into());
        }
        check_visibility(token, field.visibility, owner, name)?;
        if for_write && field.is_final {
            return Err(LookupFailure::access_denied(owner, name, "field is final").into());
        }
        Ok((ty, field))
    }

    fn mint(
        &self,
        kind: HandleKind,
        owner: Owner,
        name: Option<&str>,
        signature: Signature,
    ) -> HostResult<Handle> {
        let info = HandleInfo {
            kind,
            owner,
            name: name.map(str::to_string),
            signature: signature.clone(),
        };

        let mut registry = self.handles.write();
        if let Some(&slot) = registry.index.get(&info) {
            trace!(slot, "reusing interned handle");
            return Ok(Handle::new(self.handle_id(slot), signature));
        }
        if registry.infos.len() >= self.config.max_handles {
            warn!(
                limit = self.config.max_handles,
                "handle registry exhausted"
            );
            return Err(FatalFailure::ResourceExhausted {
                resource: "handle registry".to_string(),
                limit: self.config.max_handles,
            }
            .into());
        }
        let slot = registry.infos.len() as u64;
        registry.infos.push(info.clone());
        registry.index.insert(info, slot);
        Ok(Handle::new(self.handle_id(slot), signature))
    }

    fn handle_id(&self, slot: u64) -> HandleId {
        HandleId {
            host: self.host_id,
            slot,
        }
    }

    fn field_handle(
        &self,
        token: &CapabilityToken,
        owner: &Location,
        name: &str,
        value: &ValueKind,
        kind: HandleKind,
    ) -> HostResult<Handle> {
        let (want_static, for_write) = match kind {
            HandleKind::Getter => (false, false),
            HandleKind::StaticGetter => (true, false),
            HandleKind::Setter => (false, true),
            _ => (true, true),
        };
        let (ty, _) = self.lookup_field(token, owner, name, value, want_static, for_write)?;
        let signature = if for_write {
            Signature::setter(value.clone())
        } else {
            Signature::getter(value.clone())
        };
        let declaring = Owner::Location(Location::new(ty.name.as_str()));
        self.mint(kind, declaring, Some(name), signature)
    }
}

fn check_visibility(
    token: &CapabilityToken,
    visibility: Visibility,
    owner: &Location,
    name: &str,
) -> Result<(), LookupFailure> {
    match (visibility, token.scope()) {
        (Visibility::Private, AccessScope::Public) => Err(LookupFailure::access_denied(
            owner,
            name,
            format!("member is private to capability '{}'", token.label()),
        )),
        _ => Ok(()),
    }
}

fn check_members(ty: &TypeDef) -> Result<(), TableError> {
    let invalid = |name: &str| TableError::InvalidMemberName {
        ty: ty.name.clone(),
        name: name.to_string(),
    };
    let duplicate = |member: String| TableError::DuplicateMember {
        ty: ty.name.clone(),
        member,
    };

    let mut methods = std::collections::HashSet::new();
    for m in &ty.methods {
        validate_symbol_name(&m.name).map_err(|_| invalid(&m.name))?;
        if !methods.insert((m.name.as_str(), &m.signature)) {
            return Err(duplicate(format!("method {}{}", m.name, m.signature)));
        }
    }
    let mut fields = std::collections::HashSet::new();
    for f in &ty.fields {
        validate_symbol_name(&f.name).map_err(|_| invalid(&f.name))?;
        if !fields.insert(f.name.as_str()) {
            return Err(duplicate(format!("field {}", f.name)));
        }
    }
    let mut ctors = std::collections::HashSet::new();
    for c in &ty.constructors {
        if !ctors.insert(&c.params) {
            return Err(duplicate(format!("constructor {}", DisplayParams(&c.params))));
        }
    }
    Ok(())
}

struct DisplayParams<'a>(&'a [ValueKind]);

impl fmt::Display for DisplayParams<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ValueKind::to_string).collect();
        write!(f, "({})", parts.join(", "))
    }
}

impl HostResolver for SymbolTable {
    fn resolve_location(&self, reference: &str) -> HostResult<Location> {
        let ty = self
            .types
            .get(reference)
            .ok_or_else(|| LookupFailure::unresolvable(reference))?;
        Ok(Location::new(ty.name.as_str()))
    }

    fn find_static(
        &self,
        token: &CapabilityToken,
        owner: &Location,
        name: &str,
        signature: &Signature,
    ) -> HostResult<Handle> {
        let (ty, _) = self.lookup_method(token, owner, name, signature, true, true)?;
        let declaring = Owner::Location(Location::new(ty.name.as_str()));
        self.mint(HandleKind::Static, declaring, Some(name), signature.clone())
    }

    fn find_virtual(
        &self,
        token: &CapabilityToken,
        owner: &Location,
        name: &str,
        signature: &Signature,
    ) -> HostResult<Handle> {
        let (ty, _) = self.lookup_method(token, owner, name, signature, false, true)?;
        let declaring = Owner::Location(Location::new(ty.name.as_str()));
        self.mint(HandleKind::Virtual, declaring, Some(name), signature.clone())
    }

    fn find_special(
        &self,
        token: &CapabilityToken,
        owner: &Location,
        name: &str,
        signature: &Signature,
        caller: &Location,
    ) -> HostResult<Handle> {
        self.type_def(owner)?;
        let caller_ty = self.type_def(caller)?;
        if !self.is_subtype(caller_ty, owner.name()) {
            return Err(LookupFailure::access_denied(
                owner,
                name,
                format!("caller {caller} is not {owner} or one of its subtypes"),
            )
            .into());
        }
        let (ty, _) = self.lookup_method(token, owner, name, signature, false, false)?;
        let declaring = Owner::Location(Location::new(ty.name.as_str()));
        self.mint(HandleKind::Special, declaring, Some(name), signature.clone())
    }

    fn bind(
        &self,
        token: &CapabilityToken,
        receiver: &Receiver,
        name: &str,
        signature: &Signature,
    ) -> HostResult<Handle> {
        self.lookup_method(token, receiver.location(), name, signature, false, true)?;
        let bound = Owner::Receiver(receiver.clone());
        self.mint(HandleKind::Bound, bound, Some(name), signature.clone())
    }

    fn find_getter(
        &self,
        token: &CapabilityToken,
        owner: &Location,
        name: &str,
        value: &ValueKind,
    ) -> HostResult<Handle> {
        self.field_handle(token, owner, name, value, HandleKind::Getter)
    }

    fn find_static_getter(
        &self,
        token: &CapabilityToken,
        owner: &Location,
        name: &str,
        value: &ValueKind,
    ) -> HostResult<Handle> {
        self.field_handle(token, owner, name, value, HandleKind::StaticGetter)
    }

    fn find_setter(
        &self,
        token: &CapabilityToken,
        owner: &Location,
        name: &str,
        value: &ValueKind,
    ) -> HostResult<Handle> {
        self.field_handle(token, owner, name, value, HandleKind::Setter)
    }

    fn find_static_setter(
        &self,
        token: &CapabilityToken,
        owner: &Location,
        name: &str,
        value: &ValueKind,
    ) -> HostResult<Handle> {
        self.field_handle(token, owner, name, value, HandleKind::StaticSetter)
    }

    fn find_constructor(
        &self,
        token: &CapabilityToken,
        owner: &Location,
        signature: &Signature,
    ) -> HostResult<Handle> {
        let ty = self.type_def(owner)?;
        let ret = signature.ret();
        if !ret.is_void() && ret != &ValueKind::named(ty.name.as_str()) {
            return Err(LookupFailure::TypeMismatch {
                owner: owner.to_string(),
                name: "<init>".to_string(),
                expected: format!("void or {}", ty.name),
                found: ret.to_string(),
            }
            .into());
        }
        let ctor = ty
            .constructors
            .iter()
            .find(|c| c.params.as_slice() == signature.params())
            .ok_or_else(|| {
                LookupFailure::not_found(
                    owner,
                    "<init>",
                    format!("no constructor taking {}", DisplayParams(signature.params())),
                )
            })?;
        check_visibility(token, ctor.visibility, owner, "<init>")?;
        let declaring = Owner::Location(Location::new(ty.name.as_str()));
        self.mint(HandleKind::Constructor, declaring, None, signature.clone())
    }

    fn reveal(&self, _token: &CapabilityToken, handle: &Handle) -> HostResult<HandleInfo> {
        let id = handle.id();
        let foreign = || {
            LookupFailure::not_found(
                format!("host#{}", id.host),
                format!("slot {}", id.slot),
                "handle was not minted by this symbol table",
            )
        };
        if id.host != self.host_id {
            return Err(foreign().into());
        }
        let registry = self.handles.read();
        let info = registry.infos.get(id.slot as usize).ok_or_else(foreign)?;
        Ok(info.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::failure::{FailureKind, HostFailure};
    use crate::model::ConstructorDef;

    fn sig(s: &str) -> Signature {
        s.parse().unwrap()
    }

    fn loc(s: &str) -> Location {
        Location::new(s)
    }

    fn table() -> SymbolTable {
        SymbolTable::from_types([
            TypeDef::new("demo.Base")
                .with_method(MethodDef::instance("describe", sig("()->String")))
                .with_method(MethodDef::static_method("create", sig("()->demo.Base")))
                .with_field(FieldDef::instance("id", ValueKind::Long).immutable())
                .with_constructor(ConstructorDef::new([])),
            TypeDef::new("demo.Derived")
                .extends("demo.Base")
                .with_method(MethodDef::instance("describe", sig("()->String")))
                .with_method(MethodDef::instance("secret", sig("()->int")).private())
                .with_field(FieldDef::instance("count", ValueKind::Int))
                .with_field(FieldDef::static_field("INSTANCES", ValueKind::Int))
                .with_constructor(ConstructorDef::new([ValueKind::Int])),
        ])
        .unwrap()
    }

    fn kind(err: HostFailure) -> FailureKind {
        match err {
            HostFailure::Lookup(f) => f.kind(),
            HostFailure::Fatal(f) => panic!("unexpected fatal failure: {f}"),
        }
    }

    #[test]
    fn test_resolve_location() {
        let t = table();
        assert_eq!(t.resolve_location("demo.Base").unwrap(), loc("demo.Base"));
        assert_eq!(
            kind(t.resolve_location("demo.Missing").unwrap_err()),
            FailureKind::LocationUnresolvable
        );
    }

    #[test]
    fn test_static_lookup_walks_supertypes() {
        let t = table();
        let token = CapabilityToken::public();
        let h = t
            .find_static(&token, &loc("demo.Derived"), "create", &sig("()->demo.Base"))
            .unwrap();
        let info = t.reveal(&token, &h).unwrap();
        assert_eq!(info.owner, Owner::Location(loc("demo.Base")));
        assert_eq!(info.kind, HandleKind::Static);
    }

    #[test]
    fn test_static_mismatch_is_access_denied() {
        let t = table();
        let token = CapabilityToken::public();
        let err = t
            .find_static(&token, &loc("demo.Base"), "describe", &sig("()->String"))
            .unwrap_err();
        assert_eq!(kind(err), FailureKind::AccessDenied);
    }

    #[test]
    fn test_overload_mismatch_is_not_found() {
        let t = table();
        let err = t
            .find_virtual(
                &CapabilityToken::public(),
                &loc("demo.Base"),
                "describe",
                &sig("(int)->String"),
            )
            .unwrap_err();
        assert!(err.to_string().contains("1 overload(s) exist"));
        assert_eq!(kind(err), FailureKind::NotFound);
    }

    #[test]
    fn test_virtual_picks_most_derived() {
        let t = table();
        let token = CapabilityToken::public();
        let h = t
            .find_virtual(&token, &loc("demo.Derived"), "describe", &sig("()->String"))
            .unwrap();
        assert_eq!(
            t.reveal(&token, &h).unwrap().owner,
            Owner::Location(loc("demo.Derived"))
        );
    }

    #[test]
    fn test_private_member_needs_trusted_token() {
        let t = table();
        let owner = loc("demo.Derived");
        let err = t
            .find_virtual(&CapabilityToken::public(), &owner, "secret", &sig("()->int"))
            .unwrap_err();
        assert_eq!(kind(err), FailureKind::AccessDenied);
        assert!(t
            .find_virtual(&CapabilityToken::trusted("tests"), &owner, "secret", &sig("()->int"))
            .is_ok());
    }

    #[test]
    fn test_special_requires_caller_in_hierarchy() {
        let t = table();
        let token = CapabilityToken::public();
        let base = loc("demo.Base");
        let h = t
            .find_special(&token, &base, "describe", &sig("()->String"), &loc("demo.Derived"))
            .unwrap();
        // Pinned to the base declaration, not the override.
        assert_eq!(t.reveal(&token, &h).unwrap().owner, Owner::Location(base.clone()));

        let err = t
            .find_special(
                &token,
                &loc("demo.Derived"),
                "describe",
                &sig("()->String"),
                &base,
            )
            .unwrap_err();
        assert_eq!(kind(err), FailureKind::AccessDenied);
    }

    #[test]
    fn test_special_unknown_owner_is_unresolvable() {
        let t = table();
        let token = CapabilityToken::public();
        let err = t
            .find_special(
                &token,
                &loc("demo.Missing"),
                "describe",
                &sig("()->String"),
                &loc("demo.Derived"),
            )
            .unwrap_err();
        assert_eq!(kind(err), FailureKind::LocationUnresolvable);
    }

    #[test]
    fn test_bind_records_receiver() {
        let t = table();
        let token = CapabilityToken::public();
        let recv = t.instantiate("demo.Derived").unwrap();
        let h = t.bind(&token, &recv, "describe", &sig("()->String")).unwrap();
        let info = t.reveal(&token, &h).unwrap();
        assert_eq!(info.owner, Owner::Receiver(recv));
        assert_eq!(info.kind, HandleKind::Bound);
    }

    #[test]
    fn test_setter_on_final_vs_absent_field() {
        let t = table();
        let token = CapabilityToken::public();
        let final_err = t
            .find_setter(&token, &loc("demo.Base"), "id", &ValueKind::Long)
            .unwrap_err();
        assert_eq!(kind(final_err), FailureKind::AccessDenied);

        let absent_err = t
            .find_setter(&token, &loc("demo.Base"), "nope", &ValueKind::Long)
            .unwrap_err();
        assert_eq!(kind(absent_err), FailureKind::NotFound);
    }

    #[test]
    fn test_field_handles_carry_accessor_signatures() {
        let t = table();
        let token = CapabilityToken::public();
        let getter = t
            .find_getter(&token, &loc("demo.Derived"), "id", &ValueKind::Long)
            .unwrap();
        assert_eq!(getter.signature(), &Signature::getter(ValueKind::Long));
        let setter = t
            .find_static_setter(&token, &loc("demo.Derived"), "INSTANCES", &ValueKind::Int)
            .unwrap();
        assert_eq!(setter.signature(), &Signature::setter(ValueKind::Int));

        let err = t
            .find_getter(&token, &loc("demo.Derived"), "count", &ValueKind::Long)
            .unwrap_err();
        assert_eq!(kind(err), FailureKind::NotFound);
    }

    #[test]
    fn test_constructor_lookup() {
        let t = table();
        let token = CapabilityToken::public();
        let h = t
            .find_constructor(&token, &loc("demo.Derived"), &sig("(int)->void"))
            .unwrap();
        let info = t.reveal(&token, &h).unwrap();
        assert_eq!(info.name, None);
        assert_eq!(info.kind, HandleKind::Constructor);

        // Constructors are not inherited.
        let err = t
            .find_constructor(&token, &loc("demo.Derived"), &sig("()->void"))
            .unwrap_err();
        assert_eq!(kind(err), FailureKind::NotFound);
    }

    #[test]
    fn test_handles_are_interned() {
        let t = table();
        let token = CapabilityToken::public();
        let a = t
            .find_virtual(&token, &loc("demo.Base"), "describe", &sig("()->String"))
            .unwrap();
        let b = t
            .find_virtual(&token, &loc("demo.Base"), "describe", &sig("()->String"))
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(t.handle_count(), 1);
    }

    #[test]
    fn test_registry_exhaustion_is_fatal() {
        let t = table().with_config(TableConfig { max_handles: 1 });
        let token = CapabilityToken::public();
        t.find_virtual(&token, &loc("demo.Base"), "describe", &sig("()->String"))
            .unwrap();
        let err = t
            .find_virtual(&token, &loc("demo.Derived"), "describe", &sig("()->String"))
            .unwrap_err();
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_reveal_rejects_foreign_handles() {
        let a = table();
        let b = table();
        let token = CapabilityToken::public();
        let h = a
            .find_virtual(&token, &loc("demo.Base"), "describe", &sig("()->String"))
            .unwrap();
        assert!(b.reveal(&token, &h).is_err());
    }

    #[test]
    fn test_validation_errors() {
        let err = SymbolTable::from_types([TypeDef::new("a.B").extends("a.Missing")]).unwrap_err();
        assert!(matches!(err, TableError::UnknownSupertype { .. }));

        let err = SymbolTable::from_types([
            TypeDef::new("a.A").extends("a.B"),
            TypeDef::new("a.B").extends("a.A"),
        ])
        .unwrap_err();
        assert!(matches!(err, TableError::CyclicSupertype(_)));

        let err = SymbolTable::from_types([TypeDef::new("a.B")
            .with_method(MethodDef::instance("x.y", sig("()->void")))])
        .unwrap_err();
        assert!(matches!(err, TableError::InvalidMemberName { .. }));

        let err = SymbolTable::from_types([TypeDef::new("a.B"), TypeDef::new("a.B")]).unwrap_err();
        assert!(matches!(err, TableError::DuplicateType(_)));

        let err = SymbolTable::from_types([TypeDef::new("a.B")
            .with_field(FieldDef::instance("f", ValueKind::Int))
            .with_field(FieldDef::instance("f", ValueKind::Long))])
        .unwrap_err();
        assert_eq!(err.to_string(), "type 'a.B' declares field f more than once");
    }
}
