//! Tests for lazy options resolution and inheritance.

use std::sync::Arc;

use crate::config::{Headers, Options, OptionsRegistry};

#[test]
fn root_type_resolves_to_defaults_lazily() {
    let registry = OptionsRegistry::new();
    let people = registry.define(["name", "age"]);

    assert!(!registry.is_resolved(people.id()));
    assert_eq!(people.delimiter(), ",");
    assert!(registry.is_resolved(people.id()));

    let opts = registry.snapshot(people.id());
    assert_eq!(opts, Options::default());
}

#[test]
fn get_returns_the_same_live_handle() {
    let registry = OptionsRegistry::new();
    let people = registry.define(["name"]);

    let first = people.options();
    let second = people.options();
    assert!(Arc::ptr_eq(&first, &second));

    first.write().unwrap().col_sep = "|".into();
    assert_eq!(people.delimiter(), "|");
}

#[test]
fn derived_type_copies_parent_options_at_first_access() {
    let registry = OptionsRegistry::new();
    let base = registry.define(["a", "b"]);
    let derived = base.derive();

    assert_eq!(derived.parent(), Some(base.id()));
    assert_eq!(base.parent(), None);
    assert_eq!(derived.schema(), base.schema());

    base.set_delimiter("|");
    // derived has not been touched yet, so it starts from the current parent value
    assert_eq!(derived.delimiter(), "|");
    assert!(!Arc::ptr_eq(&base.options(), &derived.options()));
}

#[test]
fn parent_and_child_mutate_independently_after_resolution() {
    let registry = OptionsRegistry::new();
    let base = registry.define(["a", "b"]);
    let derived = base.derive();

    // both resolved
    assert_eq!(base.delimiter(), ",");
    assert_eq!(derived.delimiter(), ",");

    base.set_delimiter(";");
    assert_eq!(derived.delimiter(), ",");

    derived.update_options(|o| {
        o.col_sep = "\t".into();
        o.liberal_parsing = true;
    });
    assert_eq!(base.delimiter(), ";");
    assert!(!registry.snapshot(base.id()).liberal_parsing);
}

#[test]
fn resolving_child_first_resolves_parent() {
    let registry = OptionsRegistry::new();
    let base = registry.define(["a"]);
    let child = base.derive();
    let grandchild = child.derive();

    let _ = grandchild.options();
    assert!(registry.is_resolved(base.id()));
    assert!(registry.is_resolved(child.id()));
    assert!(registry.is_resolved(grandchild.id()));
}

#[test]
fn set_replaces_options_and_detaches_old_handles() {
    let registry = OptionsRegistry::new();
    let people = registry.define(["name"]);

    let old = people.options();
    people.set_options(
        Options::new()
            .with_col_sep("::")
            .with_headers(Headers::FirstRow),
    );
    old.write().unwrap().col_sep = "x".into();

    assert_eq!(people.delimiter(), "::");
    assert_eq!(
        registry.snapshot(people.id()).headers,
        Headers::FirstRow
    );
}

#[test]
fn set_before_first_access_is_not_overwritten_by_inheritance() {
    let registry = OptionsRegistry::new();
    let base = registry.define(["a"]);
    base.set_delimiter("|");
    let derived = base.derive();

    derived.set_options(Options::new().with_col_sep(";"));
    assert_eq!(derived.delimiter(), ";");
    assert_eq!(base.delimiter(), "|");
}

#[test]
fn unknown_id_is_treated_as_a_root_type() {
    let registry = OptionsRegistry::new();
    let other = OptionsRegistry::new();
    let base = other.define(["a"]);
    other.get(base.id()).write().unwrap().col_sep = "|".into();

    let opts = registry.snapshot(base.id());
    assert_eq!(opts.col_sep, ",");
}

#[test]
fn define_schema_uses_the_global_registry() {
    let a = crate::define_schema(["x"]);
    let b = crate::define_schema(["x"]);

    assert_ne!(a.id(), b.id());
    assert!(Arc::ptr_eq(a.registry(), &OptionsRegistry::global()));
    a.set_delimiter("|");
    assert_eq!(b.delimiter(), ",");
}
