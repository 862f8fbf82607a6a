#[cfg(test)]
mod inheritance_tests {
    use super::super::test_helpers::*;
    use crate::decls::*;

    #[test]
    fn test_superclass_and_protocols_are_split() {
        let mut b = ModuleBuilder::new("M");
        let p = b.protocol("P", &[]);
        let base = b.class("Base", &[]);
        let sub = b.class("Sub", &["Base", "P"]);
        let checked = check(b);

        assert!(checked.diagnostics.is_empty(), "unexpected: {:?}", checked.codes());
        assert_eq!(checked.module.superclass_decl(sub), Some(base));
        assert_eq!(checked.decl(sub).nominal().unwrap().protocols, vec![p]);
        assert!(checked.decl(sub).state.inheritance_checked);
    }

    #[test]
    fn test_superclass_must_come_first() {
        let mut b = ModuleBuilder::new("M");
        b.protocol("P", &[]);
        let base = b.class("Base", &[]);
        let sub = b.class("Sub", &["P", "Base"]);
        let checked = check(b);

        let diag = checked.first(1103);
        assert_eq!(diag.fixits.len(), 2, "remove and re-insert at the front");
        // the misplaced superclass is still recorded
        assert_eq!(checked.module.superclass_decl(sub), Some(base));
    }

    #[test]
    fn test_second_superclass_is_dropped() {
        let mut b = ModuleBuilder::new("M");
        let a = b.class("A", &[]);
        b.class("B", &[]);
        let c = b.class("C", &["A", "B"]);
        let checked = check(b);

        assert_eq!(checked.count(1102), 1);
        assert_eq!(checked.module.superclass_decl(c), Some(a));
    }

    #[test]
    fn test_duplicate_entry() {
        let mut b = ModuleBuilder::new("M");
        let p = b.protocol("P", &[]);
        let s = b.struct_decl("S", &["P", "P"]);
        let checked = check(b);

        assert_eq!(checked.codes(), vec![1101]);
        assert_eq!(checked.decl(s).nominal().unwrap().protocols, vec![p]);
    }

    #[test]
    fn test_non_class_cannot_inherit_class() {
        let mut b = ModuleBuilder::new("M");
        b.class("Base", &[]);
        let s = b.struct_decl("S", &["Base"]);
        let checked = check(b);

        assert_eq!(checked.codes(), vec![1106]);
        assert_eq!(checked.decl(s).nominal().unwrap().superclass, None);
    }

    #[test]
    fn test_inheriting_from_a_struct() {
        let mut b = ModuleBuilder::new("M");
        b.struct_decl("Value", &[]);
        b.class("C", &["Value"]);
        b.struct_decl("T", &["Value"]);
        let checked = check(b);

        assert_eq!(checked.count(1108), 1, "class clause: {:?}", checked.codes());
        assert_eq!(checked.count(1109), 1, "struct clause: {:?}", checked.codes());
    }

    #[test]
    fn test_enum_raw_types() {
        let mut b = ModuleBuilder::new("M");
        b.protocol("P", &[]);
        let late = b.enum_decl("Late", &["P", "Int"]);
        b.case(late, "a", None);
        let twice = b.enum_decl("Twice", &["Int", "String"]);
        b.case(twice, "a", None);
        let checked = check(b);

        assert_eq!(checked.count(1105), 1);
        assert_eq!(checked.count(1104), 1);
        let int = checked.module.types.builtin(BuiltinType::Int);
        assert_eq!(checked.decl(late).nominal().unwrap().raw_type, Some(int));
        assert_eq!(checked.decl(twice).nominal().unwrap().raw_type, Some(int));
    }

    #[test]
    fn test_protocol_extension_cannot_add_conformances() {
        let mut b = ModuleBuilder::new("M");
        b.protocol("P", &[]);
        b.protocol("Q", &[]);
        let ext = b.extension("P", &["Q"]);
        let checked = check(b);

        assert_eq!(checked.codes(), vec![1110]);
        assert!(checked.decl(ext).inherited().is_empty(), "clause is cleared");
    }

    #[test]
    fn test_constrained_extension_cannot_add_conformances() {
        let mut b = ModuleBuilder::new("M");
        b.protocol("P", &[]);
        let boxed = b.struct_decl("Box", &[]);
        b.generic_param(boxed, "T", &[]);
        let ext = b.extension("Box", &["P"]);
        b.requirement(ext, "T: P");
        let checked = check(b);

        assert_eq!(checked.codes(), vec![1111]);
        assert!(checked.decl(ext).extension().unwrap().protocols.is_empty());
    }

    #[test]
    fn test_extension_adds_protocols() {
        let mut b = ModuleBuilder::new("M");
        let p = b.protocol("P", &[]);
        let s = b.struct_decl("S", &[]);
        let ext = b.extension("S", &["P"]);
        let checked = check(b);

        assert!(checked.diagnostics.is_empty(), "unexpected: {:?}", checked.codes());
        assert_eq!(checked.decl(ext).extension().unwrap().nominal, Some(s));
        assert_eq!(checked.decl(ext).extension().unwrap().protocols, vec![p]);
        assert_eq!(checked.decl(s).nominal().unwrap().extensions, vec![ext]);
    }

    #[test]
    fn test_extension_cannot_add_superclass() {
        let mut b = ModuleBuilder::new("M");
        b.class("Base", &[]);
        b.class("C", &[]);
        b.extension("C", &["Base"]);
        let checked = check(b);

        assert_eq!(checked.codes(), vec![1107]);
    }

    #[test]
    fn test_extension_of_non_nominal() {
        let mut b = ModuleBuilder::new("M");
        let builtin = b.extension("Int", &[]);
        let missing = b.extension("Missing", &[]);
        let checked = check(b);

        assert_eq!(checked.count(1011), 1);
        assert_eq!(checked.count(1001), 1, "unresolved name reported once");
        assert!(checked.decl(builtin).is_invalid());
        assert!(checked.decl(missing).is_invalid());
    }

    #[test]
    fn test_generic_param_clause() {
        let mut b = ModuleBuilder::new("M");
        let p = b.protocol("P", &[]);
        let base = b.class("Base", &[]);
        let f = b.func(None, "f", &[(None, "T")], None);
        let t = b.generic_param(f, "T", &["Base", "P"]);
        let checked = check(b);

        assert!(checked.diagnostics.is_empty(), "unexpected: {:?}", checked.codes());
        let bounds = checked.decl(t).bounds().unwrap();
        assert_eq!(bounds.protocols, vec![p]);
        let base_ty = bounds.superclass.and_then(|s| checked.module.types.nominal_decl(s));
        assert_eq!(base_ty, Some(base));
    }
}
