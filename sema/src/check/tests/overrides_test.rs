#[cfg(test)]
mod overrides_tests {
    use super::super::test_helpers::*;
    use crate::check::{DiagKind, NoteKind};
    use crate::config::CheckerConfig;
    use crate::decls::*;

    /// `class Base {}` and `class Sub: Base {}`
    fn hierarchy(b: &mut ModuleBuilder) -> (DeclId, DeclId) {
        let base = b.class("Base", &[]);
        let sub = b.class("Sub", &["Base"]);
        (base, sub)
    }

    /// `class Animal {}` and `class Dog: Animal {}`
    fn animals(b: &mut ModuleBuilder) {
        b.class("Animal", &[]);
        b.class("Dog", &["Animal"]);
    }

    fn available(platform: &str, introduced: Option<Version>, unavailable: bool) -> AvailableAttr {
        AvailableAttr {
            platform: platform.to_string(),
            introduced,
            unavailable,
        }
    }

    #[test]
    fn test_method_override_is_recorded() {
        let mut b = ModuleBuilder::new("M");
        let (base, sub) = hierarchy(&mut b);
        let base_f = b.func(Some(base), "f", &[(Some("x"), "Int")], Some("Int"));
        let sub_f = b.func(Some(sub), "f", &[(Some("x"), "Int")], Some("Int"));
        mark_override(&mut b, sub_f);
        let checked = check(b);

        assert!(checked.diagnostics.is_empty(), "unexpected: {:?}", checked.codes());
        assert_eq!(
            checked.decl(sub_f).override_edge(),
            Some(OverrideEdge { base: base_f, exact: true })
        );
        assert_eq!(checked.decl(base_f).overridden(), None);
        assert_eq!(checked.stats.overrides_recorded, 1);
    }

    #[test]
    fn test_missing_override_keyword() {
        let mut b = ModuleBuilder::new("M");
        let (base, sub) = hierarchy(&mut b);
        let base_f = b.func(Some(base), "f", &[], None);
        let sub_f = b.func(Some(sub), "f", &[], None);
        let checked = check(b);

        assert_eq!(checked.codes(), vec![1417]);
        let diag = checked.first(1417);
        assert_eq!(diag.fixits.len(), 1, "insert 'override '");
        assert!(matches!(diag.notes[0].0, NoteKind::OverriddenHere));
        assert!(checked.decl(sub_f).attrs.is_override, "keyword is implied after the error");
        assert_eq!(checked.decl(sub_f).overridden(), Some(base_f));
    }

    #[test]
    fn test_override_without_superclass_member() {
        let mut b = ModuleBuilder::new("M");
        let (_, sub) = hierarchy(&mut b);
        let f = b.func(Some(sub), "nothing", &[], None);
        mark_override(&mut b, f);
        let root = b.class("Root", &[]);
        let g = b.func(Some(root), "g", &[], None);
        mark_override(&mut b, g);
        let checked = check(b);

        assert_eq!(checked.codes(), vec![1402, 1402]);
        assert_eq!(checked.decl(f).overridden(), None);
    }

    #[test]
    fn test_argument_label_mismatch_still_overrides() {
        let mut b = ModuleBuilder::new("M");
        let (base, sub) = hierarchy(&mut b);
        let base_f = b.func(Some(base), "f", &[(Some("x"), "Int")], None);
        let sub_f = b.func(Some(sub), "f", &[(Some("y"), "Int")], None);
        mark_override(&mut b, sub_f);
        let checked = check(b);

        assert_eq!(checked.codes(), vec![1406]);
        match &checked.first(1406).kind {
            DiagKind::ArgumentNameMismatch { name, base_name, .. } => {
                assert_eq!(name, "f(y:)");
                assert_eq!(base_name, "f(x:)");
            }
            other => panic!("unexpected diagnostic {other:?}"),
        }
        assert_eq!(checked.decl(sub_f).overridden(), Some(base_f));
    }

    #[test]
    fn test_covariant_result_is_accepted() {
        let mut b = ModuleBuilder::new("M");
        animals(&mut b);
        let (base, sub) = hierarchy(&mut b);
        let base_make = b.func(Some(base), "make", &[], Some("Animal"));
        let sub_make = b.func(Some(sub), "make", &[], Some("Dog"));
        mark_override(&mut b, sub_make);
        let checked = check(b);

        assert!(checked.diagnostics.is_empty(), "unexpected: {:?}", checked.codes());
        assert_eq!(
            checked.decl(sub_make).override_edge(),
            Some(OverrideEdge {
                base: base_make,
                exact: false
            })
        );
    }

    #[test]
    fn test_property_override_pairs_accessors() {
        let mut b = ModuleBuilder::new("M");
        let (base, sub) = hierarchy(&mut b);
        let base_v = b.var(Some(base), "v", "Int");
        b.set_initializer(base_v);
        let sub_v = b.var(Some(sub), "v", "Int");
        b.set_storage(sub_v, StorageKind::ComputedSettable);
        mark_override(&mut b, sub_v);
        let checked = check(b);

        assert!(checked.diagnostics.is_empty(), "unexpected: {:?}", checked.codes());
        assert_eq!(checked.decl(sub_v).overridden(), Some(base_v));
        let (getter, setter) = checked.decl(sub_v).accessors();
        let (base_getter, base_setter) = checked.decl(base_v).accessors();
        assert_eq!(checked.decl(getter.unwrap()).overridden(), base_getter);
        assert_eq!(checked.decl(setter.unwrap()).overridden(), base_setter);
    }

    #[test]
    fn test_private_base_setter_is_not_overridden() {
        let mut b = ModuleBuilder::new("M");
        let (base, sub) = hierarchy(&mut b);
        let base_v = b.var(Some(base), "v", "Int");
        b.set_initializer(base_v);
        b.attrs(base_v).setter_access = Some(Accessibility::Private);
        let sub_v = b.var(Some(sub), "v", "Int");
        b.set_storage(sub_v, StorageKind::ComputedSettable);
        mark_override(&mut b, sub_v);
        let checked = check(b);

        assert!(checked.diagnostics.is_empty(), "unexpected: {:?}", checked.codes());
        let (getter, setter) = checked.decl(sub_v).accessors();
        assert!(checked.decl(getter.unwrap()).overridden().is_some());
        assert_eq!(checked.decl(setter.unwrap()).overridden(), None);
    }

    #[test]
    fn test_property_type_mismatch() {
        let mut b = ModuleBuilder::new("M");
        let (base, sub) = hierarchy(&mut b);
        let base_v = b.var(Some(base), "v", "Int");
        b.set_storage(base_v, StorageKind::ComputedSettable);
        let sub_v = b.var(Some(sub), "v", "String");
        b.set_storage(sub_v, StorageKind::ComputedSettable);
        mark_override(&mut b, sub_v);
        let checked = check(b);

        assert_eq!(checked.codes(), vec![1410]);
        let diag = checked.first(1410);
        assert!(matches!(diag.notes[0].0, NoteKind::PropertyOverrideHere));
        assert_eq!(checked.decl(sub_v).overridden(), Some(base_v), "the edge survives the mismatch");
    }

    #[test]
    fn test_covariant_property_needs_readonly_base() {
        let mut b = ModuleBuilder::new("M");
        animals(&mut b);
        let (base, sub) = hierarchy(&mut b);
        let pet = b.var(Some(base), "pet", "Animal");
        b.set_storage(pet, StorageKind::ComputedSettable);
        let friend = b.var(Some(base), "friend", "Animal");
        b.set_storage(friend, StorageKind::Computed);
        let sub_pet = b.var(Some(sub), "pet", "Dog");
        b.set_storage(sub_pet, StorageKind::ComputedSettable);
        mark_override(&mut b, sub_pet);
        let sub_friend = b.var(Some(sub), "friend", "Dog");
        b.set_storage(sub_friend, StorageKind::Computed);
        mark_override(&mut b, sub_friend);
        let checked = check(b);

        assert_eq!(checked.codes(), vec![1411]);
        match &checked.first(1411).kind {
            DiagKind::MutableCovariantProperty { name, ty, base_ty } => {
                assert_eq!(name, "pet");
                assert_eq!(ty, "Dog");
                assert_eq!(base_ty, "Animal");
            }
            other => panic!("unexpected diagnostic {other:?}"),
        }
        assert_eq!(checked.decl(sub_friend).overridden(), Some(friend));
    }

    #[test]
    fn test_stored_property_cannot_override() {
        let mut b = ModuleBuilder::new("M");
        let (base, sub) = hierarchy(&mut b);
        let base_v = b.var(Some(base), "v", "Int");
        b.set_initializer(base_v);
        let sub_v = b.var(Some(sub), "v", "Int");
        b.set_initializer(sub_v);
        mark_override(&mut b, sub_v);
        let checked = check(b);

        assert_eq!(checked.codes(), vec![1412]);
    }

    #[test]
    fn test_let_property_cannot_be_made_settable() {
        let mut b = ModuleBuilder::new("M");
        let (base, sub) = hierarchy(&mut b);
        let base_v = b.var(Some(base), "v", "Int");
        b.set_let(base_v);
        b.set_initializer(base_v);
        let sub_v = b.var(Some(sub), "v", "Int");
        b.set_storage(sub_v, StorageKind::ComputedSettable);
        mark_override(&mut b, sub_v);
        let checked = check(b);

        assert_eq!(checked.codes(), vec![1415]);
    }

    #[test]
    fn test_observers_need_settable_base() {
        let mut b = ModuleBuilder::new("M");
        let (base, sub) = hierarchy(&mut b);
        let base_v = b.var(Some(base), "v", "Int");
        b.set_storage(base_v, StorageKind::Computed);
        let sub_v = b.var(Some(sub), "v", "Int");
        b.set_storage(sub_v, StorageKind::Observed);
        b.set_initializer(sub_v);
        mark_override(&mut b, sub_v);
        let checked = check(b);

        assert_eq!(checked.codes(), vec![1413]);
    }

    #[test]
    fn test_settable_base_needs_settable_override() {
        let mut b = ModuleBuilder::new("M");
        let (base, sub) = hierarchy(&mut b);
        let base_v = b.var(Some(base), "v", "Int");
        b.set_initializer(base_v);
        let sub_v = b.var(Some(sub), "v", "Int");
        b.set_storage(sub_v, StorageKind::Computed);
        mark_override(&mut b, sub_v);
        let checked = check(b);

        assert_eq!(checked.codes(), vec![1414]);
    }

    #[test]
    fn test_ownership_must_match() {
        let mut b = ModuleBuilder::new("M");
        animals(&mut b);
        let (base, sub) = hierarchy(&mut b);
        let base_v = b.var(Some(base), "delegate", "Animal?");
        b.attrs(base_v).ownership = Ownership::Weak;
        let sub_v = b.var(Some(sub), "delegate", "Animal?");
        b.set_storage(sub_v, StorageKind::ComputedSettable);
        mark_override(&mut b, sub_v);
        let checked = check(b);

        assert_eq!(checked.codes(), vec![1425]);
        assert_eq!(checked.decl(sub_v).overridden(), Some(base_v));
    }

    #[test]
    fn test_settable_subscript_is_invariant() {
        let mut b = ModuleBuilder::new("M");
        animals(&mut b);
        let (base, sub) = hierarchy(&mut b);
        b.subscript(base, &[(None, "Int")], "Animal", true);
        let readonly = b.subscript(base, &[(Some("named"), "String")], "Animal", false);
        let sub_index = b.subscript(sub, &[(None, "Int")], "Dog", true);
        mark_override(&mut b, sub_index);
        let sub_named = b.subscript(sub, &[(Some("named"), "String")], "Dog", false);
        mark_override(&mut b, sub_named);
        let checked = check(b);

        assert_eq!(checked.codes(), vec![1409]);
        assert_eq!(checked.decl(sub_named).overridden(), Some(readonly));
    }

    #[test]
    fn test_effects_must_line_up() {
        let mut b = ModuleBuilder::new("M");
        let (base, sub) = hierarchy(&mut b);
        b.func(Some(base), "f", &[], None);
        let g = b.func(Some(base), "g", &[], None);
        b.attrs(g).rethrows = true;
        let h = b.func(Some(base), "h", &[], None);
        b.attrs(h).noreturn = true;
        let k = b.func(Some(base), "k", &[], None);
        b.set_throws(k);
        b.attrs(k).objc = Some(ObjCAttr::default());

        let sub_f = b.func(Some(sub), "f", &[], None);
        b.set_throws(sub_f);
        let sub_g = b.func(Some(sub), "g", &[], None);
        b.set_throws(sub_g);
        let sub_h = b.func(Some(sub), "h", &[], None);
        let sub_k = b.func(Some(sub), "k", &[], None);
        for id in [sub_f, sub_g, sub_h, sub_k] {
            mark_override(&mut b, id);
        }
        let checked = check(b);

        assert_eq!(checked.codes(), vec![1418, 1422, 1424, 1419]);
        assert_eq!(checked.stats.overrides_recorded, 4);
    }

    #[test]
    fn test_throwing_override_allowed_without_objc() {
        let mut b = ModuleBuilder::new("M");
        let (base, sub) = hierarchy(&mut b);
        let k = b.func(Some(base), "k", &[], None);
        b.set_throws(k);
        let sub_k = b.func(Some(sub), "k", &[], None);
        mark_override(&mut b, sub_k);
        let checked = check(b);

        assert!(checked.diagnostics.is_empty(), "unexpected: {:?}", checked.codes());
    }

    #[test]
    fn test_final_base_cannot_be_overridden() {
        let mut b = ModuleBuilder::new("M");
        let (base, sub) = hierarchy(&mut b);
        let f = b.func(Some(base), "f", &[], None);
        b.attrs(f).is_final = true;
        let sub_f = b.func(Some(sub), "f", &[], None);
        mark_override(&mut b, sub_f);
        let checked = check(b);

        assert_eq!(checked.codes(), vec![1423]);
        assert_eq!(checked.first(1423).notes.len(), 1);
    }

    #[test]
    fn test_unavailable_base() {
        let mut b = ModuleBuilder::new("M");
        let (base, sub) = hierarchy(&mut b);
        let f = b.func(Some(base), "f", &[], None);
        b.attrs(f).available.push(available("*", None, true));
        let sub_f = b.func(Some(sub), "f", &[], None);
        mark_override(&mut b, sub_f);
        let checked = check(b);

        assert_eq!(checked.codes(), vec![1420]);
    }

    #[test]
    fn test_override_less_available_than_base() {
        let mut b = ModuleBuilder::new("M");
        let (base, sub) = hierarchy(&mut b);
        let f = b.func(Some(base), "f", &[], None);
        b.attrs(f).available.push(available("macos", Some(Version::new(10, 9, 0)), false));
        let sub_f = b.func(Some(sub), "f", &[], None);
        b.attrs(sub_f).available.push(available("macos", Some(Version::new(10, 10, 0)), false));
        mark_override(&mut b, sub_f);
        let g = b.func(Some(base), "g", &[], None);
        b.attrs(g).available.push(available("macos", Some(Version::new(10, 10, 0)), false));
        let sub_g = b.func(Some(sub), "g", &[], None);
        b.attrs(sub_g).available.push(available("ios", Some(Version::new(9, 0, 0)), false));
        mark_override(&mut b, sub_g);
        let checked = check(b);

        assert_eq!(checked.codes(), vec![1421]);
        match &checked.first(1421).kind {
            DiagKind::OverrideLessAvailable { platform, version, .. } => {
                assert_eq!(platform, "macos");
                assert_eq!(*version, Version::new(10, 9, 0));
            }
            other => panic!("unexpected diagnostic {other:?}"),
        }
    }

    #[test]
    fn test_availability_checking_can_be_disabled() {
        let mut b = ModuleBuilder::new("M");
        let (base, sub) = hierarchy(&mut b);
        let f = b.func(Some(base), "f", &[], None);
        b.attrs(f).available.push(available("*", None, true));
        let sub_f = b.func(Some(sub), "f", &[], None);
        mark_override(&mut b, sub_f);
        let config = CheckerConfig {
            enable_availability_checking: false,
            ..CheckerConfig::default()
        };
        let checked = check_with(b, config);

        assert!(checked.diagnostics.is_empty(), "unexpected: {:?}", checked.codes());
    }

    #[test]
    fn test_override_must_be_as_accessible() {
        let mut b = ModuleBuilder::new("M");
        let (base, sub) = hierarchy(&mut b);
        b.set_access(base, Accessibility::Public);
        b.set_access(sub, Accessibility::Public);
        let f = b.func(Some(base), "f", &[], None);
        b.set_access(f, Accessibility::Public);
        let sub_f = b.func(Some(sub), "f", &[], None);
        b.set_access(sub_f, Accessibility::Private);
        mark_override(&mut b, sub_f);
        let checked = check(b);

        assert_eq!(checked.codes(), vec![1408]);
        match &checked.first(1408).kind {
            DiagKind::OverrideNotAccessible { setter, required, .. } => {
                assert!(!setter);
                assert_eq!(*required, Accessibility::Public);
            }
            other => panic!("unexpected diagnostic {other:?}"),
        }
    }

    #[test]
    fn test_override_setter_must_be_as_accessible() {
        let mut b = ModuleBuilder::new("M");
        let (base, sub) = hierarchy(&mut b);
        b.set_access(base, Accessibility::Public);
        b.set_access(sub, Accessibility::Public);
        let base_v = b.var(Some(base), "v", "Int");
        b.set_initializer(base_v);
        b.set_access(base_v, Accessibility::Public);
        let sub_v = b.var(Some(sub), "v", "Int");
        b.set_storage(sub_v, StorageKind::ComputedSettable);
        b.set_access(sub_v, Accessibility::Public);
        b.attrs(sub_v).setter_access = Some(Accessibility::Private);
        mark_override(&mut b, sub_v);
        let checked = check(b);

        assert_eq!(checked.codes(), vec![1408]);
        match &checked.first(1408).kind {
            DiagKind::OverrideNotAccessible { setter, required, .. } => {
                assert!(*setter);
                assert_eq!(*required, Accessibility::Public);
            }
            other => panic!("unexpected diagnostic {other:?}"),
        }
        assert_eq!(checked.decl(sub_v).overridden(), Some(base_v), "the edge survives the mismatch");
    }

    #[test]
    fn test_ambiguous_exposed_override() {
        let mut b = ModuleBuilder::new("M");
        let (base, sub) = hierarchy(&mut b);
        let plain = b.func(Some(base), "f", &[(Some("x"), "Int")], Some("Int"));
        let optional = b.func(Some(base), "f", &[(Some("x"), "Int")], Some("Int?"));
        let sub_f = b.func(Some(sub), "f", &[(Some("x"), "Int")], Some("Int"));
        for id in [plain, optional, sub_f] {
            b.attrs(id).objc = Some(ObjCAttr::default());
        }
        mark_override(&mut b, sub_f);
        let checked = check(b);

        assert_eq!(checked.codes(), vec![1405]);
        assert_eq!(checked.first(1405).notes.len(), 2);
        assert_eq!(checked.decl(sub_f).overridden(), None);
    }

    #[test]
    fn test_exposed_selector_type_conflict() {
        let mut b = ModuleBuilder::new("M");
        let (base, sub) = hierarchy(&mut b);
        let f = b.func(Some(base), "f", &[(Some("x"), "Int")], Some("Int"));
        let sub_f = b.func(Some(sub), "f", &[(Some("x"), "String")], Some("Int"));
        b.attrs(f).objc = Some(ObjCAttr::default());
        b.attrs(sub_f).objc = Some(ObjCAttr::default());
        mark_override(&mut b, sub_f);
        let checked = check(b);

        assert_eq!(checked.codes(), vec![1407]);
        match &checked.first(1407).kind {
            DiagKind::ObjCTypeMismatch { selector, .. } => assert_eq!(selector, "f:"),
            other => panic!("unexpected diagnostic {other:?}"),
        }
    }

    #[test]
    fn test_override_in_extension() {
        let mut b = ModuleBuilder::new("M");
        let (base, _) = hierarchy(&mut b);
        b.func(Some(base), "f", &[], None);
        let exposed = b.func(Some(base), "g", &[], None);
        b.attrs(exposed).objc = Some(ObjCAttr::default());
        let ext = b.extension("Sub", &[]);
        let ext_f = b.func(Some(ext), "f", &[], None);
        let ext_g = b.func(Some(ext), "g", &[], None);
        mark_override(&mut b, ext_f);
        mark_override(&mut b, ext_g);
        let checked = check(b);

        assert_eq!(checked.codes(), vec![1416]);
        assert!(matches!(
            checked.first(1416).kind,
            DiagKind::OverrideDeclExtension {
                base_in_extension: false,
                ..
            }
        ));
        assert_eq!(checked.decl(ext_g).overridden(), Some(exposed));
    }

    #[test]
    fn test_attributes_carry_over() {
        let mut b = ModuleBuilder::new("M");
        let (base, sub) = hierarchy(&mut b);
        let f = b.func(Some(base), "f", &[], None);
        b.attrs(f).is_dynamic = true;
        b.attrs(f).objc = Some(ObjCAttr {
            name: Some("doIt".into()),
            implicit: false,
        });
        let sub_f = b.func(Some(sub), "f", &[], None);
        mark_override(&mut b, sub_f);
        let checked = check(b);

        assert!(checked.diagnostics.is_empty(), "unexpected: {:?}", checked.codes());
        let attrs = &checked.decl(sub_f).attrs;
        assert!(attrs.is_dynamic);
        assert_eq!(
            attrs.objc,
            Some(ObjCAttr {
                name: Some("doIt".into()),
                implicit: true,
            })
        );
    }

    #[test]
    fn test_initializer_overrides() {
        let mut b = ModuleBuilder::new("M");
        let (base, sub) = hierarchy(&mut b);
        let base_init = b.init(base, &[(Some("value"), "Int")]);
        let required = b.init(base, &[(Some("name"), "String")]);
        b.attrs(required).is_required = true;
        let sub_init = b.init(sub, &[(Some("value"), "Int")]);
        let sub_required = b.init(sub, &[(Some("name"), "String")]);
        b.attrs(sub_required).is_required = true;
        let checked = check(b);

        assert_eq!(checked.codes(), vec![1417], "a required initializer needs no keyword");
        assert_eq!(checked.decl(sub_init).overridden(), Some(base_init));
        assert_eq!(checked.decl(sub_required).overridden(), Some(required));
        assert!(checked.implicit_ctors(sub).is_empty());
    }

    #[test]
    fn test_initializer_does_not_override() {
        let mut b = ModuleBuilder::new("M");
        let (base, sub) = hierarchy(&mut b);
        let base_init = b.init(base, &[(Some("value"), "Int")]);
        let sub_init = b.init(sub, &[(Some("name"), "String")]);
        mark_override(&mut b, sub_init);
        let checked = check(b);

        assert_eq!(checked.codes(), vec![1403]);
        let diag = checked.first(1403);
        assert!(matches!(diag.notes[0].0, NoteKind::OverriddenNearMatchHere { .. }));
        assert_eq!(checked.decl(sub_init).overridden(), None);
        assert_eq!(checked.decl(base_init).overridden(), None);
    }

    #[test]
    fn test_generic_superclass_member_is_substituted() {
        let mut b = ModuleBuilder::new("M");
        let boxed = b.class("Box", &[]);
        b.generic_param(boxed, "T", &[]);
        let get = b.func(Some(boxed), "get", &[], Some("T"));
        let int_box = b.class("IntBox", &["Box<Int>"]);
        let int_get = b.func(Some(int_box), "get", &[], Some("Int"));
        mark_override(&mut b, int_get);
        let checked = check(b);

        assert!(checked.diagnostics.is_empty(), "unexpected: {:?}", checked.codes());
        assert_eq!(checked.decl(int_get).overridden(), Some(get));
    }

    #[test]
    fn test_generic_method_override() {
        let mut b = ModuleBuilder::new("M");
        let (base, sub) = hierarchy(&mut b);
        let base_f = b.func(Some(base), "f", &[(Some("x"), "T")], Some("T"));
        b.generic_param(base_f, "T", &[]);
        let sub_f = b.func(Some(sub), "f", &[(Some("x"), "U")], Some("U"));
        b.generic_param(sub_f, "U", &[]);
        mark_override(&mut b, sub_f);
        let plain = b.func(Some(sub), "f", &[(Some("x"), "Int")], Some("Int"));
        let checked = check(b);

        assert!(checked.diagnostics.is_empty(), "unexpected: {:?}", checked.codes());
        assert_eq!(
            checked.decl(sub_f).override_edge(),
            Some(OverrideEdge { base: base_f, exact: true })
        );
        assert_eq!(checked.decl(plain).overridden(), None, "a non-generic method is a new overload");
    }

    #[test]
    fn test_generic_method_of_generic_superclass() {
        let mut b = ModuleBuilder::new("M");
        let boxed = b.class("Box", &[]);
        b.generic_param(boxed, "T", &[]);
        let map = b.func(Some(boxed), "map", &[(Some("with"), "U")], Some("T"));
        b.generic_param(map, "U", &[]);
        let int_box = b.class("IntBox", &["Box<Int>"]);
        let int_map = b.func(Some(int_box), "map", &[(Some("with"), "V")], Some("Int"));
        b.generic_param(int_map, "V", &[]);
        mark_override(&mut b, int_map);
        let checked = check(b);

        assert!(checked.diagnostics.is_empty(), "unexpected: {:?}", checked.codes());
        assert_eq!(checked.decl(int_map).overridden(), Some(map));
    }

    #[test]
    fn test_generic_parameter_positions_must_line_up() {
        let mut b = ModuleBuilder::new("M");
        let (base, sub) = hierarchy(&mut b);
        let base_f = b.func(Some(base), "f", &[(Some("x"), "T")], None);
        b.generic_param(base_f, "T", &[]);
        b.generic_param(base_f, "U", &[]);
        let sub_f = b.func(Some(sub), "f", &[(Some("x"), "U")], None);
        b.generic_param(sub_f, "T", &[]);
        b.generic_param(sub_f, "U", &[]);
        mark_override(&mut b, sub_f);
        let checked = check(b);

        assert_eq!(checked.codes(), vec![1402]);
        assert_eq!(checked.decl(sub_f).overridden(), None);
    }
}
