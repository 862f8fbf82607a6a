#[cfg(test)]
mod generics_tests {
    use super::super::test_helpers::*;
    use crate::check::DeclChecker;
    use crate::decls::*;

    #[test]
    fn test_param_bounds_become_requirements() {
        let mut b = ModuleBuilder::new("M");
        let p = b.protocol("P", &[]);
        let boxed = b.struct_decl("Box", &[]);
        let t = b.generic_param(boxed, "T", &["P"]);
        let checked = check(b);

        assert!(checked.diagnostics.is_empty(), "unexpected: {:?}", checked.codes());
        let signature = checked.decl(boxed).signature().expect("generic struct has a signature");
        assert_eq!(signature.params, vec![t]);
        let subject = checked.module.types.kind(checked.decl(t).interface_type.unwrap()).clone();
        assert_eq!(subject, TypeKind::GenericParam { decl: t });
        assert_eq!(signature.conformances(&checked.module.types, t).collect::<Vec<_>>(), vec![p]);
        assert_eq!(checked.type_of(boxed), "Box<T>");
    }

    #[test]
    fn test_same_type_to_concrete() {
        let mut b = ModuleBuilder::new("M");
        let f = b.func(None, "f", &[(Some("x"), "T")], None);
        let t = b.generic_param(f, "T", &[]);
        b.requirement(f, "T == Int");
        let mut checked = check(b);

        assert!(checked.diagnostics.is_empty(), "unexpected: {:?}", checked.codes());
        let int = checked.module.types.builtin(BuiltinType::Int);
        let signature = checked.decl(f).signature().cloned().unwrap();
        assert_eq!(signature.concrete_type(t), Some(int));

        let t_ty = checked.module.types.generic_param(t);
        let mut checker = DeclChecker::new(&mut checked.module);
        assert_eq!(checker.map_type_into_context(f, t_ty), int);
    }

    #[test]
    fn test_same_type_between_params_merges_classes() {
        let mut b = ModuleBuilder::new("M");
        let f = b.func(None, "f", &[(None, "T"), (None, "U")], None);
        let t = b.generic_param(f, "T", &[]);
        let u = b.generic_param(f, "U", &[]);
        b.requirement(f, "T == U");
        let mut checked = check(b);

        let signature = checked.decl(f).signature().cloned().unwrap();
        assert!(signature.same_class(t, u));
        assert_eq!(signature.concrete_type(u), None);

        let (t_ty, u_ty) = (checked.module.types.generic_param(t), checked.module.types.generic_param(u));
        let mut checker = DeclChecker::new(&mut checked.module);
        let t_ctx = checker.map_type_into_context(f, t_ty);
        let u_ctx = checker.map_type_into_context(f, u_ty);
        assert_eq!(t_ctx, u_ctx, "both map to the representative's archetype");
    }

    #[test]
    fn test_solved_classes_are_written_back() {
        let mut b = ModuleBuilder::new("M");
        let f = b.func(None, "f", &[(Some("x"), "T"), (Some("y"), "U")], Some("U"));
        let t = b.generic_param(f, "T", &[]);
        b.generic_param(f, "U", &[]);
        b.requirement(f, "T == U");
        let checked = check(b);

        assert!(checked.diagnostics.is_empty(), "unexpected: {:?}", checked.codes());
        assert_eq!(checked.type_of(f), "(x: T, y: T) -> T");
        let requirement = &checked.decl(f).generic_params().unwrap().requirements[0];
        assert_eq!(requirement.constraint.ty, checked.decl(t).interface_type, "'U' is rewritten to 'T'");
    }

    #[test]
    fn test_nested_params_get_depths() {
        let mut b = ModuleBuilder::new("M");
        let boxed = b.class("Box", &[]);
        let t = b.generic_param(boxed, "T", &[]);
        let map = b.func(Some(boxed), "map", &[(None, "U")], Some("T"));
        let u = b.generic_param(map, "U", &[]);
        let v = b.generic_param(map, "V", &[]);
        let checked = check(b);

        let position = |id: DeclId| match &checked.decl(id).kind {
            DeclKind::GenericParam(data) => (data.depth, data.index),
            other => panic!("not a generic parameter: {other:?}"),
        };
        assert_eq!(position(t), (0, 0));
        assert_eq!(position(u), (1, 0));
        assert_eq!(position(v), (1, 1));
    }

    #[test]
    fn test_conflicting_concrete_types() {
        let mut b = ModuleBuilder::new("M");
        let f = b.func(None, "f", &[(None, "T")], None);
        b.generic_param(f, "T", &[]);
        b.requirement(f, "T == Int");
        b.requirement(f, "T == String");
        let checked = check(b);

        assert_eq!(checked.codes(), vec![1202]);
        let requirements = &checked.decl(f).generic_params().unwrap().requirements;
        assert!(!requirements[0].invalid);
        assert!(requirements[1].invalid, "the conflicting requirement is marked");
    }

    #[test]
    fn test_requirement_subject_must_be_generic() {
        let mut b = ModuleBuilder::new("M");
        b.protocol("P", &[]);
        let f = b.func(None, "f", &[(None, "T")], None);
        b.generic_param(f, "T", &[]);
        b.requirement(f, "Int: P");
        let checked = check(b);

        assert_eq!(checked.codes(), vec![1203]);
    }

    #[test]
    fn test_requirement_constraint_kind() {
        let mut b = ModuleBuilder::new("M");
        let f = b.func(None, "f", &[(None, "T")], None);
        b.generic_param(f, "T", &[]);
        b.requirement(f, "T: Int");
        let checked = check(b);

        assert_eq!(checked.codes(), vec![1201]);
    }

    #[test]
    fn test_two_superclass_bounds() {
        let mut b = ModuleBuilder::new("M");
        b.class("A", &[]);
        b.class("B", &[]);
        let f = b.func(None, "f", &[(None, "T")], None);
        b.generic_param(f, "T", &[]);
        b.requirement(f, "T: A");
        b.requirement(f, "T: B");
        let checked = check(b);

        assert_eq!(checked.codes(), vec![1204]);
    }

    #[test]
    fn test_where_clause_reaches_associated_types() {
        let mut b = ModuleBuilder::new("M");
        let seq = b.protocol("Sequence", &[]);
        b.associated_type(seq, "Element", &[], None);
        let f = b.func(None, "first", &[(None, "S")], Some("S.Element"));
        b.generic_param(f, "S", &[]);
        b.requirement(f, "S: Sequence");
        b.requirement(f, "S.Element == Int");
        let checked = check(b);

        assert!(checked.diagnostics.is_empty(), "unexpected: {:?}", checked.codes());
        let signature = checked.decl(f).signature().unwrap();
        assert_eq!(signature.requirements.len(), 2);
    }

    #[test]
    fn test_nested_generic_sees_outer_params() {
        let mut b = ModuleBuilder::new("M");
        let boxed = b.class("Box", &[]);
        let t = b.generic_param(boxed, "T", &[]);
        let map = b.func(Some(boxed), "map", &[(None, "T")], Some("U"));
        let u = b.generic_param(map, "U", &[]);
        let checked = check(b);

        assert!(checked.diagnostics.is_empty(), "unexpected: {:?}", checked.codes());
        let signature = checked.decl(map).signature().unwrap();
        assert_eq!(signature.params, vec![t, u], "outer parameters come first");
        assert_eq!(checked.type_of(map), "(T) -> U");
    }

    #[test]
    fn test_signature_is_cached() {
        let mut b = ModuleBuilder::new("M");
        let boxed = b.struct_decl("Box", &[]);
        b.generic_param(boxed, "T", &[]);
        let mut module = b.finish().unwrap();
        let mut checker = DeclChecker::new(&mut module);
        let first = checker.validate_generic_signature(boxed).unwrap();
        let second = checker.validate_generic_signature(boxed).unwrap();
        assert!(std::rc::Rc::ptr_eq(&first, &second));
    }
}
