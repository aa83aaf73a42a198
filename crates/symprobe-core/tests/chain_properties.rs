//! Fallback-chain behaviour checked against a scripted, call-counting host.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use symprobe_core::{Candidate, ErrorClass, FinderError, ProbeStatus, Strategy, Template};
use symprobe_host::{FailureKind, FatalFailure, HostFailure, HostResolver, HostResult, LookupFailure};
use symprobe_types::{
    CapabilityToken, Handle, HandleId, HandleInfo, HandleKind, Location, Owner, OwnerRef,
    Receiver, Signature, ValueKind,
};

#[derive(Clone)]
enum Script {
    Hit,
    Miss(FailureKind),
    Fatal,
}

/// Host whose answers are scripted per `owner::name` and which records every call.
#[derive(Default)]
struct ScriptedHost {
    locations: Vec<String>,
    script: HashMap<String, Script>,
    calls: Mutex<Vec<String>>,
    minted: Mutex<Vec<HandleInfo>>,
}

impl ScriptedHost {
    fn with_locations(names: &[&str]) -> Self {
        Self {
            locations: names.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    fn script(mut self, key: &str, script: Script) -> Self {
        self.script.insert(key.to_string(), script);
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Mint a handle outside any probe, as a caller holding a literal would.
    fn literal(&self, owner: &str, name: &str, signature: Signature) -> Handle {
        self.mint(
            HandleKind::Static,
            Owner::Location(Location::new(owner)),
            Some(name.to_string()),
            signature,
        )
    }

    fn mint(&self, kind: HandleKind, owner: Owner, name: Option<String>, signature: Signature) -> Handle {
        let mut minted = self.minted.lock();
        let slot = minted.len() as u64;
        minted.push(HandleInfo {
            kind,
            owner,
            name,
            signature: signature.clone(),
        });
        Handle::new(HandleId { host: 99, slot }, signature)
    }

    fn answer(
        &self,
        call: &str,
        kind: HandleKind,
        owner: Owner,
        name: &str,
        signature: Signature,
    ) -> HostResult<Handle> {
        let key = format!("{}::{}", owner, name);
        self.calls.lock().push(format!("{call} {key}"));
        match self.script.get(&key).cloned() {
            Some(Script::Hit) => Ok(self.mint(kind, owner, Some(name.to_string()), signature)),
            Some(Script::Miss(FailureKind::AccessDenied)) => {
                Err(LookupFailure::access_denied(&owner, name, "scripted").into())
            }
            Some(Script::Miss(FailureKind::TypeMismatch)) => Err(LookupFailure::TypeMismatch {
                owner: owner.to_string(),
                name: name.to_string(),
                expected: signature.to_string(),
                found: "()->void".to_string(),
            }
            .into()),
            Some(Script::Miss(_)) | None => {
                Err(LookupFailure::not_found(&owner, name, "scripted").into())
            }
            Some(Script::Fatal) => Err(FatalFailure::ResourceExhausted {
                resource: "handle slots".to_string(),
                limit: 0,
            }
            .into()),
        }
    }
}

impl HostResolver for ScriptedHost {
    fn resolve_location(&self, reference: &str) -> HostResult<Location> {
        self.calls.lock().push(format!("resolve {reference}"));
        if self.locations.iter().any(|l| l == reference) {
            Ok(Location::new(reference))
        } else {
            Err(LookupFailure::unresolvable(reference).into())
        }
    }

    fn find_static(&self, _: &CapabilityToken, owner: &Location, name: &str, sig: &Signature) -> HostResult<Handle> {
        self.answer("static", HandleKind::Static, Owner::Location(owner.clone()), name, sig.clone())
    }

    fn find_virtual(&self, _: &CapabilityToken, owner: &Location, name: &str, sig: &Signature) -> HostResult<Handle> {
        self.answer("virtual", HandleKind::Virtual, Owner::Location(owner.clone()), name, sig.clone())
    }

    fn find_special(
        &self,
        _: &CapabilityToken,
        owner: &Location,
        name: &str,
        sig: &Signature,
        caller: &Location,
    ) -> HostResult<Handle> {
        self.calls.lock().push(format!("caller {caller}"));
        self.answer("special", HandleKind::Special, Owner::Location(owner.clone()), name, sig.clone())
    }

    fn bind(&self, _: &CapabilityToken, receiver: &Receiver, name: &str, sig: &Signature) -> HostResult<Handle> {
        self.answer("bind", HandleKind::Bound, Owner::Receiver(receiver.clone()), name, sig.clone())
    }

    fn find_getter(&self, _: &CapabilityToken, owner: &Location, name: &str, value: &ValueKind) -> HostResult<Handle> {
        let sig = Signature::getter(value.clone());
        self.answer("getter", HandleKind::Getter, Owner::Location(owner.clone()), name, sig)
    }

    fn find_static_getter(&self, _: &CapabilityToken, owner: &Location, name: &str, value: &ValueKind) -> HostResult<Handle> {
        let sig = Signature::getter(value.clone());
        self.answer("static_getter", HandleKind::StaticGetter, Owner::Location(owner.clone()), name, sig)
    }

    fn find_setter(&self, _: &CapabilityToken, owner: &Location, name: &str, value: &ValueKind) -> HostResult<Handle> {
        let sig = Signature::setter(value.clone());
        self.answer("setter", HandleKind::Setter, Owner::Location(owner.clone()), name, sig)
    }

    fn find_static_setter(&self, _: &CapabilityToken, owner: &Location, name: &str, value: &ValueKind) -> HostResult<Handle> {
        let sig = Signature::setter(value.clone());
        self.answer("static_setter", HandleKind::StaticSetter, Owner::Location(owner.clone()), name, sig)
    }

    fn find_constructor(&self, _: &CapabilityToken, owner: &Location, sig: &Signature) -> HostResult<Handle> {
        self.answer("constructor", HandleKind::Constructor, Owner::Location(owner.clone()), "<init>", sig.clone())
    }

    fn reveal(&self, _: &CapabilityToken, handle: &Handle) -> HostResult<HandleInfo> {
        self.minted
            .lock()
            .get(handle.id().slot as usize)
            .cloned()
            .ok_or_else(|| LookupFailure::not_found("host", "handle", "unknown").into())
    }
}

fn caller_sig() -> Signature {
    "(int)->Class".parse().unwrap()
}

fn caller_host() -> Arc<ScriptedHost> {
    Arc::new(
        ScriptedHost::with_locations(&["com.example.Callers", "com.example.Legacy", "com.example.Broken"])
            .script("com.example.Callers::getCallerClass", Script::Hit)
            .script("com.example.Legacy::getCallerClass", Script::Miss(FailureKind::AccessDenied))
            .script("com.example.Broken::getCallerClass", Script::Fatal),
    )
}

fn static_template(host: &Arc<ScriptedHost>) -> Template {
    Template::new(host.clone(), Strategy::StaticCall, caller_sig()).unwrap()
}

#[test]
fn test_get_caller_class_chain() {
    let host = caller_host();
    let t = static_template(&host);

    let mut finder = t.start(("sun.reflect.Reflection", "getCallerClass")).unwrap();
    assert_eq!(
        finder.last_failure().map(|f| f.kind()),
        Some(FailureKind::LocationUnresolvable)
    );

    assert_eq!(
        finder.probe(("com.example.Callers", "getCallerClass")).unwrap(),
        ProbeStatus::Resolved
    );
    assert_eq!(finder.found_name(), Some("getCallerClass"));
    assert_eq!(
        finder.found_owner(),
        Some(&Owner::Location(Location::new("com.example.Callers")))
    );

    let calls_before = host.call_count();
    let handle = finder
        .or_else(("com.example.Legacy", "getCallerClass"))
        .unwrap()
        .into_handle()
        .unwrap();
    assert_eq!(host.call_count(), calls_before);
    assert_eq!(handle.signature(), &caller_sig());
}

#[test]
fn test_exhausted_chain_reports_last_failure() {
    let host = caller_host();
    let t = static_template(&host);

    let outcome = t
        .start(("sun.reflect.Reflection", "getCallerClass"))
        .unwrap()
        .or_else(("com.example.Callers", "missing"))
        .unwrap()
        .fallback(("com.example.Legacy", "getCallerClass"))
        .unwrap();
    assert!(!outcome.is_found());
    assert!(outcome.handle().is_none());
    assert_eq!(outcome.name(), Some("getCallerClass"));
    assert_eq!(outcome.owner(), Some(&OwnerRef::from("com.example.Legacy")));

    // Same failure as probing the last candidate alone.
    let alone = t
        .start(("com.example.Legacy", "getCallerClass"))
        .unwrap()
        .into_outcome();
    assert_eq!(outcome.failure(), alone.failure());
    assert_eq!(outcome.failure().map(|f| f.kind()), Some(FailureKind::AccessDenied));

    let err = outcome.into_handle().unwrap_err();
    assert_eq!(err.class(), ErrorClass::Unresolved);
    assert_eq!(err.last_failure(), alone.failure());
}

#[test]
fn test_success_equals_probing_alone() {
    let host = caller_host();
    let t = static_template(&host);

    let chained = t
        .start(("com.example.Legacy", "getCallerClass"))
        .unwrap()
        .or_else(("com.example.Callers", "getCallerClass"))
        .unwrap()
        .fallback(("com.example.Legacy", "other"))
        .unwrap();
    let alone = t
        .start(("com.example.Callers", "getCallerClass"))
        .unwrap()
        .into_outcome();

    assert_eq!(chained.owner(), alone.owner());
    assert_eq!(chained.name(), alone.name());
    let minted = host.minted.lock();
    assert_eq!(
        minted[chained.handle().unwrap().id().slot as usize],
        minted[alone.handle().unwrap().id().slot as usize]
    );
}

#[test]
fn test_probes_after_success_never_reach_host() {
    let host = caller_host();
    let t = static_template(&host);
    let mut finder = t.start(("com.example.Callers", "getCallerClass")).unwrap();
    let calls = host.calls();

    for candidate in [
        ("com.example.Legacy", "getCallerClass"),
        ("com.example.Broken", "getCallerClass"),
        ("not.a.Location", "x"),
    ] {
        assert_eq!(finder.probe(candidate).unwrap(), ProbeStatus::Skipped);
    }
    assert_eq!(host.calls(), calls);
}

#[test]
fn test_invalid_name_makes_no_host_call() {
    let host = caller_host();
    let t = static_template(&host);

    let err = t
        .start(("com.example.Callers", "sun.reflect.getCallerClass"))
        .unwrap_err();
    assert_eq!(err.class(), ErrorClass::InvalidName);
    assert_eq!(host.call_count(), 0);

    let mut finder = t.start(("com.example.Legacy", "getCallerClass")).unwrap();
    let before = host.call_count();
    let err = finder.probe(("com.example.Callers", "a.b")).unwrap_err();
    assert!(matches!(err, FinderError::InvalidName(_)));
    assert_eq!(host.call_count(), before);
    // The chain is untouched and can continue.
    assert_eq!(finder.last_failure().map(|f| f.kind()), Some(FailureKind::AccessDenied));
    assert_eq!(
        finder.probe(("com.example.Callers", "getCallerClass")).unwrap(),
        ProbeStatus::Resolved
    );
}

#[test]
fn test_fatal_failure_propagates_and_leaves_state() {
    let host = caller_host();
    let t = static_template(&host);

    let err = t.start(("com.example.Broken", "getCallerClass")).unwrap_err();
    assert!(matches!(err, FinderError::Unrecoverable(FatalFailure::ResourceExhausted { .. })));
    assert_eq!(err.class(), ErrorClass::Unrecoverable);

    let mut finder = t.start(("com.example.Legacy", "getCallerClass")).unwrap();
    let err = finder.probe(("com.example.Broken", "getCallerClass")).unwrap_err();
    assert_eq!(err.class(), ErrorClass::Unrecoverable);
    assert!(!finder.is_resolved());
    assert_eq!(finder.last_failure().map(|f| f.kind()), Some(FailureKind::AccessDenied));
    assert_eq!(
        finder.last_attempt().map(|(o, n)| (o.to_string(), n.map(str::to_string))),
        Some(("com.example.Legacy".to_string(), Some("getCallerClass".to_string())))
    );
}

#[test]
fn test_type_mismatch_keeps_identity_through_into_handle() {
    let host = Arc::new(
        ScriptedHost::with_locations(&["a.B"])
            .script("a.B::f", Script::Miss(FailureKind::TypeMismatch)),
    );
    let t = static_template(&host);
    let err = t.start(("a.B", "f")).unwrap().into_handle().unwrap_err();
    assert!(matches!(err, FinderError::Lookup(LookupFailure::TypeMismatch { .. })));
    assert_eq!(err.class(), ErrorClass::Lookup);
}

#[test]
fn test_literal_signature_mismatch_regardless_of_state() {
    let host = caller_host();
    let t = static_template(&host);
    let wrong = host.literal("com.example.Callers", "getCallerClass", "()->Class".parse().unwrap());

    let searching = t.start(("com.example.Legacy", "getCallerClass")).unwrap();
    let err = searching.fallback_handle(wrong.clone()).unwrap_err();
    assert_eq!(err.class(), ErrorClass::InvalidArgument);

    let resolved = t.start(("com.example.Callers", "getCallerClass")).unwrap();
    let err = resolved.fallback_handle(wrong).unwrap_err();
    assert!(matches!(err, FinderError::SignatureMismatch { .. }));
}

#[test]
fn test_literal_adopts_introspected_owner_and_name() {
    let host = caller_host();
    let t = static_template(&host);
    let literal = host.literal("com.example.Fallback", "callerOf", caller_sig());

    let mut finder = t.start(("com.example.Legacy", "getCallerClass")).unwrap();
    assert_eq!(finder.accept_literal(literal.clone()).unwrap(), ProbeStatus::Resolved);
    assert_eq!(finder.found(), Some(&literal));
    assert_eq!(finder.found_name(), Some("callerOf"));
    assert_eq!(
        finder.found_owner(),
        Some(&Owner::Location(Location::new("com.example.Fallback")))
    );
}

#[test]
fn test_literal_on_resolved_finder_keeps_first_result() {
    let host = caller_host();
    let t = static_template(&host);
    let literal = host.literal("com.example.Fallback", "callerOf", caller_sig());

    let outcome = t
        .start(("com.example.Callers", "getCallerClass"))
        .unwrap()
        .fallback_handle(literal.clone())
        .unwrap();
    assert_ne!(outcome.handle(), Some(&literal));
    assert_eq!(outcome.name(), Some("getCallerClass"));
}

#[test]
fn test_default_name_and_owner_views() {
    let host = caller_host();
    let by_owner = static_template(&host).with_default_name("getCallerClass");
    let outcome = by_owner
        .start(Candidate::in_owner("sun.reflect.Reflection"))
        .unwrap()
        .fallback(Candidate::in_owner("com.example.Callers"))
        .unwrap();
    assert_eq!(outcome.name(), Some("getCallerClass"));
    assert!(outcome.is_found());

    let by_name = static_template(&host).with_default_owner("com.example.Callers");
    let outcome = by_name
        .start(Candidate::named("missing"))
        .unwrap()
        .fallback(Candidate::named("getCallerClass"))
        .unwrap();
    assert_eq!(outcome.owner(), Some(&OwnerRef::Location(Location::new("com.example.Callers"))));
}

#[test]
fn test_special_call_passes_caller_context() {
    let host = Arc::new(
        ScriptedHost::with_locations(&["a.Base", "a.Derived"]).script("a.Base::run", Script::Hit),
    );
    let t = Template::new(host.clone(), Strategy::SpecialCall, "()->void".parse().unwrap())
        .unwrap()
        .with_default_caller("a.Derived");
    let handle = t.start(("a.Base", "run")).unwrap().into_handle().unwrap();
    assert_eq!(handle.signature().to_string(), "()->void");
    assert!(host.calls().contains(&"caller a.Derived".to_string()));
}

#[test]
fn test_bind_resolves_against_receiver() {
    let receiver = Receiver::new(1, Location::new("a.Queue"));
    let host = Arc::new(ScriptedHost::default().script(&format!("{receiver}::size"), Script::Hit));
    let t = Template::new(host.clone(), Strategy::Bind, "()->int".parse().unwrap())
        .unwrap()
        .with_default_receiver(receiver.clone());

    let finder = t.start(Candidate::named("size")).unwrap();
    assert_eq!(finder.found_owner(), Some(&Owner::Receiver(receiver)));
    // A receiver needs no location lookup.
    assert!(host.calls().iter().all(|c| !c.starts_with("resolve")));
}

#[test]
fn test_field_setter_distinguishes_denied_from_missing() {
    let host = Arc::new(
        ScriptedHost::with_locations(&["a.Config"])
            .script("a.Config::LIMIT", Script::Miss(FailureKind::AccessDenied)),
    );
    let t = Template::field(host, Strategy::FieldSetter, ValueKind::Int).unwrap();
    assert_eq!(t.signature().to_string(), "(int)->void");

    let denied = t.start(("a.Config", "LIMIT")).unwrap().into_outcome();
    let missing = t.start(("a.Config", "absent")).unwrap().into_outcome();
    assert_eq!(denied.failure().map(|f| f.kind()), Some(FailureKind::AccessDenied));
    assert_eq!(missing.failure().map(|f| f.kind()), Some(FailureKind::NotFound));
}

#[test]
fn test_host_failure_classification() {
    let fatal: HostFailure = FatalFailure::Internal { reason: "x".into() }.into();
    assert!(!fatal.is_recoverable());
}
