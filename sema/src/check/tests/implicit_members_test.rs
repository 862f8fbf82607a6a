#[cfg(test)]
mod implicit_members_tests {
    use super::super::test_helpers::*;
    use crate::check::{DiagKind, NoteKind};
    use crate::decls::*;
    use diagnostics::FixItKind;

    fn implicit_ctor_ids(checked: &Checked, owner: DeclId) -> Vec<DeclId> {
        checked
            .decl(owner)
            .members()
            .iter()
            .copied()
            .filter(|&m| matches!(&checked.decl(m).kind, DeclKind::Constructor(c) if c.implicit.is_some()))
            .collect()
    }

    #[test]
    fn test_struct_memberwise_initializer() {
        let mut b = ModuleBuilder::new("M");
        let point = b.struct_decl("Point", &[]);
        b.var(Some(point), "x", "Int");
        b.var(Some(point), "y", "Int");
        let checked = check(b);

        assert!(checked.diagnostics.is_empty(), "unexpected: {:?}", checked.codes());
        assert_eq!(
            checked.implicit_ctors(point),
            vec![(ImplicitCtorKind::Memberwise, "init(x:y:)".to_string())]
        );
        let init = implicit_ctor_ids(&checked, point)[0];
        assert!(checked.decl(init).implicit);
        assert!(checked.decl(init).is_designated_init());
        assert_eq!(checked.stats.implicit_ctors_added, 1);
    }

    #[test]
    fn test_struct_default_initializer() {
        let mut b = ModuleBuilder::new("M");
        let s = b.struct_decl("Settings", &[]);
        b.var(Some(s), "name", "String?");
        let id = b.var(Some(s), "id", "Int");
        b.set_let(id);
        b.set_initializer(id);
        let counter = b.var(Some(s), "count", "Int");
        b.attrs(counter).is_static = true;
        let checked = check(b);

        assert!(checked.diagnostics.is_empty(), "unexpected: {:?}", checked.codes());
        assert_eq!(
            checked.implicit_ctors(s),
            vec![
                (ImplicitCtorKind::Memberwise, "init(name:)".to_string()),
                (ImplicitCtorKind::Default, "init()".to_string()),
            ],
            "initialized lets and static properties are not parameters"
        );
        let memberwise = implicit_ctor_ids(&checked, s)[0];
        let param = &checked.decl(memberwise).params()[0];
        assert_eq!(checked.module.type_name(param.ty.ty.unwrap()), "String?");
    }

    #[test]
    fn test_explicit_initializer_suppresses_synthesis() {
        let mut b = ModuleBuilder::new("M");
        let s = b.struct_decl("S", &[]);
        b.var(Some(s), "x", "Int");
        b.init(s, &[(Some("x"), "Int")]);
        let checked = check(b);

        assert!(checked.diagnostics.is_empty(), "unexpected: {:?}", checked.codes());
        assert!(checked.implicit_ctors(s).is_empty());
    }

    #[test]
    fn test_root_class_without_initializers() {
        let mut b = ModuleBuilder::new("M");
        let root = b.class("Root", &[]);
        b.var(Some(root), "x", "Int");
        let lazy = b.class("Lazy", &[]);
        b.var(Some(lazy), "x", "Int?");
        let checked = check(b);

        assert_eq!(checked.codes(), vec![1601]);
        let diag = checked.first(1601);
        match &diag.kind {
            DiagKind::ClassWithoutInit { class, properties } => {
                assert_eq!(class, "Root");
                assert_eq!(properties, &vec!["x".to_string()]);
            }
            other => panic!("unexpected diagnostic {other:?}"),
        }
        assert!(matches!(diag.notes[0].0, NoteKind::StoredPropertyWithoutInit { .. }));
        assert_eq!(diag.fixits.len(), 1);
        assert_eq!(diag.fixits[0].kind, FixItKind::Insert(" = 0".into()));
        assert!(checked.implicit_ctors(root).is_empty());
        assert_eq!(
            checked.implicit_ctors(lazy),
            vec![(ImplicitCtorKind::Default, "init()".to_string())]
        );
    }

    #[test]
    fn test_subclass_inherits_designated_initializers() {
        let mut b = ModuleBuilder::new("M");
        let base = b.class("Base", &[]);
        let base_init = b.init(base, &[(Some("value"), "Int")]);
        b.set_throws(base_init);
        let sub = b.class("Sub", &["Base"]);
        b.var(Some(sub), "tag", "String?");
        let checked = check(b);

        assert!(checked.diagnostics.is_empty(), "unexpected: {:?}", checked.codes());
        assert_eq!(
            checked.implicit_ctors(sub),
            vec![(ImplicitCtorKind::Chaining, "init(value:)".to_string())]
        );
        let inherited = implicit_ctor_ids(&checked, sub)[0];
        assert_eq!(checked.decl(inherited).overridden(), Some(base_init));
        assert!(checked.decl(inherited).throws(), "effects follow the base");
        assert!(checked.decl(inherited).attrs.is_override);
        assert!(checked.implicit_ctors(base).is_empty());
    }

    #[test]
    fn test_inheritance_is_transitive() {
        let mut b = ModuleBuilder::new("M");
        let a = b.class("A", &[]);
        b.init(a, &[(Some("a"), "Int")]);
        let middle = b.class("B", &["A"]);
        let leaf = b.class("C", &["B"]);
        let checked = check(b);

        assert!(checked.diagnostics.is_empty(), "unexpected: {:?}", checked.codes());
        let middle_init = implicit_ctor_ids(&checked, middle)[0];
        let leaf_init = implicit_ctor_ids(&checked, leaf)[0];
        assert_eq!(checked.module.full_name(leaf_init), "init(a:)");
        assert_eq!(checked.decl(leaf_init).overridden(), Some(middle_init));
    }

    #[test]
    fn test_inherited_parameters_are_substituted() {
        let mut b = ModuleBuilder::new("M");
        let boxed = b.class("Box", &[]);
        b.generic_param(boxed, "T", &[]);
        b.init(boxed, &[(Some("value"), "T")]);
        let int_box = b.class("IntBox", &["Box<Int>"]);
        let checked = check(b);

        assert!(checked.diagnostics.is_empty(), "unexpected: {:?}", checked.codes());
        let init = implicit_ctor_ids(&checked, int_box)[0];
        let param = &checked.decl(init).params()[0];
        assert_eq!(checked.module.type_name(param.ty.ty.unwrap()), "Int");
    }

    #[test]
    fn test_unavailable_initializers_are_not_inherited() {
        let mut b = ModuleBuilder::new("M");
        let base = b.class("Base", &[]);
        let gone = b.init(base, &[(Some("a"), "Int")]);
        b.attrs(gone).available.push(AvailableAttr {
            platform: "*".into(),
            introduced: None,
            unavailable: true,
        });
        b.init(base, &[(Some("b"), "Int")]);
        let sub = b.class("Sub", &["Base"]);
        let checked = check(b);

        assert!(checked.diagnostics.is_empty(), "unexpected: {:?}", checked.codes());
        assert_eq!(
            checked.implicit_ctors(sub),
            vec![(ImplicitCtorKind::Chaining, "init(b:)".to_string())]
        );
    }

    #[test]
    fn test_missing_required_initializer_is_stubbed() {
        let mut b = ModuleBuilder::new("M");
        let base = b.class("Base", &[]);
        let required = b.init(base, &[(Some("name"), "String")]);
        b.attrs(required).is_required = true;
        let sub = b.class("Sub", &["Base"]);
        b.init(sub, &[(Some("value"), "Int")]);
        let checked = check(b);

        assert_eq!(checked.codes(), vec![1602]);
        let diag = checked.first(1602);
        assert!(matches!(diag.notes[0].0, NoteKind::RequiredInitHere));
        match &diag.fixits[0].kind {
            FixItKind::Insert(text) => assert!(text.contains("required init(name: String)"), "{text}"),
            other => panic!("unexpected fix-it {other:?}"),
        }
        assert_eq!(
            checked.implicit_ctors(sub),
            vec![(ImplicitCtorKind::Stub, "init(name:)".to_string())]
        );
        let stub = implicit_ctor_ids(&checked, sub)[0];
        assert!(checked.decl(stub).attrs.is_required);
        assert_eq!(checked.decl(stub).overridden(), Some(required));
    }

    #[test]
    fn test_subclass_with_uninitialized_storage() {
        let mut b = ModuleBuilder::new("M");
        let base = b.class("Base", &[]);
        b.init(base, &[]);
        let sub = b.class("Sub", &["Base"]);
        b.var(Some(sub), "count", "Int");
        let checked = check(b);

        assert_eq!(checked.codes(), vec![1601]);
        assert!(checked.implicit_ctors(sub).is_empty(), "nothing is inherited");
    }

    #[test]
    fn test_enums_and_protocols_get_nothing() {
        let mut b = ModuleBuilder::new("M");
        let e = b.enum_decl("E", &[]);
        b.case(e, "a", None);
        let p = b.protocol("P", &[]);
        let checked = check(b);

        assert!(checked.diagnostics.is_empty(), "unexpected: {:?}", checked.codes());
        assert!(checked.implicit_ctors(e).is_empty());
        assert!(checked.implicit_ctors(p).is_empty());
        assert_eq!(checked.stats.implicit_ctors_added, 0);
    }
}
