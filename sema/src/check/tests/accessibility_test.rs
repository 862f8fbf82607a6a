#[cfg(test)]
mod accessibility_tests {
    use super::super::test_helpers::*;
    use crate::check::{DiagKind, NoteKind};
    use crate::config::CheckerConfig;
    use crate::decls::*;

    #[test]
    fn test_default_accessibility() {
        let mut b = ModuleBuilder::new("M");
        let public_struct = b.struct_decl("Open", &[]);
        b.set_access(public_struct, Accessibility::Public);
        let member = b.func(Some(public_struct), "f", &[], None);
        let private_struct = b.struct_decl("Hidden", &[]);
        b.set_access(private_struct, Accessibility::Private);
        let hidden_member = b.func(Some(private_struct), "g", &[], None);
        let proto = b.protocol("P", &[]);
        b.set_access(proto, Accessibility::Public);
        let requirement = b.func(Some(proto), "h", &[], None);
        let global = b.var(None, "counter", "Int");
        let checked = check(b);

        assert!(checked.diagnostics.is_empty(), "unexpected: {:?}", checked.codes());
        assert_eq!(checked.decl(member).access, Some(Accessibility::Internal));
        assert_eq!(checked.decl(hidden_member).access, Some(Accessibility::Private));
        assert_eq!(checked.decl(requirement).access, Some(Accessibility::Public), "protocol members follow the protocol");
        assert_eq!(checked.decl(global).access, Some(Accessibility::Internal));
    }

    #[test]
    fn test_setter_accessibility_is_narrowed() {
        let mut b = ModuleBuilder::new("M");
        let s = b.struct_decl("S", &[]);
        b.set_access(s, Accessibility::Public);
        let x = b.var(Some(s), "x", "Int");
        b.set_access(x, Accessibility::Public);
        b.attrs(x).setter_access = Some(Accessibility::Private);
        let checked = check(b);

        assert!(checked.diagnostics.is_empty(), "unexpected: {:?}", checked.codes());
        assert_eq!(checked.decl(x).access, Some(Accessibility::Public));
        assert_eq!(checked.decl(x).setter_access, Some(Accessibility::Private));
        let (getter, setter) = checked.decl(x).accessors();
        assert_eq!(checked.decl(getter.unwrap()).access, Some(Accessibility::Public));
        assert_eq!(checked.decl(setter.unwrap()).access, Some(Accessibility::Private));
    }

    #[test]
    fn test_setter_above_getter() {
        let mut b = ModuleBuilder::new("M");
        let x = b.var(None, "x", "Int");
        b.set_access(x, Accessibility::Internal);
        b.attrs(x).setter_access = Some(Accessibility::Public);
        let checked = check(b);

        assert_eq!(checked.codes(), vec![1308]);
        assert_eq!(checked.decl(x).setter_access, Some(Accessibility::Internal));
    }

    #[test]
    fn test_public_property_of_private_type() {
        let mut b = ModuleBuilder::new("M");
        let secret = b.struct_decl("Secret", &[]);
        b.set_access(secret, Accessibility::Private);
        let v = b.var(None, "leak", "[Secret]");
        b.set_access(v, Accessibility::Public);
        let checked = check(b);

        assert_eq!(checked.codes(), vec![1301]);
        let diag = checked.first(1301);
        assert!(matches!(
            diag.kind,
            DiagKind::TypeAccessViolation {
                decl_access: Accessibility::Public,
                type_access: Accessibility::Private,
                ..
            }
        ));
        assert_eq!(
            diag.notes[0].0,
            NoteKind::TypeDeclaredHere {
                name: "Secret".into(),
                access: Accessibility::Private
            }
        );
        assert_eq!(diag.notes[0].1, checked.decl(secret).span);
    }

    #[test]
    fn test_function_signature_audit() {
        let mut b = ModuleBuilder::new("M");
        b.struct_decl("Inner", &[]);
        let outer = b.struct_decl("Outer", &[]);
        b.set_access(outer, Accessibility::Public);
        let f = b.func(Some(outer), "take", &[(Some("x"), "Inner")], Some("Inner"));
        b.set_access(f, Accessibility::Public);
        let checked = check(b);

        assert_eq!(checked.codes(), vec![1302], "reported once per declaration");
    }

    #[test]
    fn test_signature_audit_names_narrowest_part() {
        let mut b = ModuleBuilder::new("M");
        b.struct_decl("InternalT", &[]);
        let private_t = b.struct_decl("PrivateT", &[]);
        b.set_access(private_t, Accessibility::Private);
        let f = b.func(None, "f", &[(Some("a"), "InternalT"), (Some("b"), "PrivateT")], None);
        b.set_access(f, Accessibility::Public);
        let checked = check(b);

        assert_eq!(checked.codes(), vec![1302]);
        match &checked.first(1302).kind {
            DiagKind::TypeAccessViolation { type_access, ty, .. } => {
                assert_eq!(*type_access, Accessibility::Private);
                assert_eq!(ty, "PrivateT");
            }
            other => panic!("unexpected diagnostic {other:?}"),
        }
    }

    #[test]
    fn test_generic_audit_reports_once() {
        let mut b = ModuleBuilder::new("M");
        b.protocol("Hidden", &[]);
        let secret = b.protocol("Secret", &[]);
        b.set_access(secret, Accessibility::Private);
        let boxed = b.struct_decl("Box", &[]);
        b.set_access(boxed, Accessibility::Public);
        b.generic_param(boxed, "T", &["Hidden"]);
        b.generic_param(boxed, "U", &["Secret"]);
        let checked = check(b);

        assert_eq!(checked.codes(), vec![1305]);
        let diag = checked.first(1305);
        assert_eq!(
            diag.notes[0].0,
            NoteKind::TypeDeclaredHere {
                name: "Secret".into(),
                access: Accessibility::Private
            }
        );
    }

    #[test]
    fn test_inherited_and_generic_audit() {
        let mut b = ModuleBuilder::new("M");
        b.class("Base", &[]);
        b.protocol("Hidden", &[]);
        let sub = b.class("Sub", &["Base"]);
        b.set_access(sub, Accessibility::Public);
        let boxed = b.struct_decl("Box", &[]);
        b.set_access(boxed, Accessibility::Public);
        b.generic_param(boxed, "T", &["Hidden"]);
        let checked = check(b);

        assert_eq!(checked.count(1304), 1, "codes: {:?}", checked.codes());
        assert_eq!(checked.count(1305), 1, "codes: {:?}", checked.codes());
    }

    #[test]
    fn test_associated_type_default_audit() {
        let mut b = ModuleBuilder::new("M");
        b.struct_decl("Impl", &[]);
        let p = b.protocol("P", &[]);
        b.set_access(p, Accessibility::Public);
        b.associated_type(p, "A", &[], Some("Impl"));
        let checked = check(b);

        assert_eq!(checked.codes(), vec![1306]);
    }

    #[test]
    fn test_audit_disabled_without_access_control() {
        let mut b = ModuleBuilder::new("M");
        let secret = b.struct_decl("Secret", &[]);
        b.set_access(secret, Accessibility::Private);
        let v = b.var(None, "leak", "Secret");
        b.set_access(v, Accessibility::Public);
        b.attrs(v).setter_access = Some(Accessibility::Private);
        let config = CheckerConfig {
            enable_access_control: false,
            ..CheckerConfig::default()
        };
        let checked = check_with(b, config);

        assert!(checked.diagnostics.is_empty(), "unexpected: {:?}", checked.codes());
        assert_eq!(checked.decl(v).setter_access, Some(Accessibility::Public), "explicit setter access ignored");
    }

    #[test]
    fn test_extension_access() {
        let mut b = ModuleBuilder::new("M");
        let p = b.protocol("P", &[]);
        b.set_access(p, Accessibility::Private);
        let boxed = b.struct_decl("Box", &[]);
        b.set_access(boxed, Accessibility::Public);
        b.generic_param(boxed, "T", &[]);
        let plain = b.extension("Box", &[]);
        let plain_member = b.func(Some(plain), "a", &[], None);
        let constrained = b.extension("Box", &[]);
        b.requirement(constrained, "T: P");
        let constrained_member = b.func(Some(constrained), "b", &[], None);
        let checked = check(b);

        assert!(checked.diagnostics.is_empty(), "unexpected: {:?}", checked.codes());
        let plain_data = checked.decl(plain).extension().unwrap();
        assert_eq!(plain_data.max_access, Some(Accessibility::Public));
        assert_eq!(plain_data.default_access, Some(Accessibility::Internal));
        assert_eq!(checked.decl(plain_member).access, Some(Accessibility::Internal));

        let constrained_data = checked.decl(constrained).extension().unwrap();
        assert_eq!(constrained_data.max_access, Some(Accessibility::Private));
        assert_eq!(checked.decl(constrained_member).access, Some(Accessibility::Private));
    }

    #[test]
    fn test_compute_accessibility_is_stable() {
        let mut b = ModuleBuilder::new("M");
        let s = b.struct_decl("S", &[]);
        b.set_access(s, Accessibility::Public);
        let f = b.func(Some(s), "f", &[], None);
        let mut module = b.finish().unwrap();
        let mut checker = crate::check::DeclChecker::new(&mut module);
        let first = checker.compute_accessibility(f);
        assert_eq!(first, Accessibility::Internal);
        checker.module.decl_mut(s).attrs.access = Some(Accessibility::Private);
        assert_eq!(checker.compute_accessibility(f), first, "computed once");
    }
}
