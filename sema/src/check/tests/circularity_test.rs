#[cfg(test)]
mod circularity_tests {
    use super::super::test_helpers::*;
    use crate::check::{DiagKind, NoteKind};
    use crate::decls::*;

    #[test]
    fn test_class_cycle_reported_once() {
        let mut b = ModuleBuilder::new("M");
        let a = b.class("A", &["B"]);
        let c = b.class("B", &["A"]);
        let checked = check(b);

        assert_eq!(checked.count(1112), 1, "codes: {:?}", checked.codes());
        let diag = checked.first(1112);
        assert!(
            matches!(&diag.kind, DiagKind::CircularClassInheritance { path } if path == "'A' -> 'B' -> 'A'"),
            "got {:?}",
            diag.kind
        );
        assert!(matches!(diag.notes[0].0, NoteKind::KindDeclaredHere { .. }));
        assert!(checked.decl(a).is_invalid(), "cycle is broken at its first node");
        assert_eq!(checked.decl(a).nominal().unwrap().superclass, None);
        assert!(!checked.decl(c).is_invalid());
        assert_eq!(checked.decl(c).state.circularity, CircularityCheck::Checked);
    }

    #[test]
    fn test_class_inheriting_itself() {
        let mut b = ModuleBuilder::new("M");
        let a = b.class("A", &["A"]);
        let checked = check(b);

        let diag = checked.first(1112);
        assert!(matches!(&diag.kind, DiagKind::CircularClassInheritance { path } if path == "A"));
        assert!(diag.notes.is_empty());
        assert!(checked.module.types.is_error(checked.decl(a).interface_type.unwrap()));
    }

    #[test]
    fn test_protocol_cycle() {
        let mut b = ModuleBuilder::new("M");
        b.protocol("P", &["Q"]);
        b.protocol("Q", &["R"]);
        b.protocol("R", &["P"]);
        let checked = check(b);

        assert_eq!(checked.codes(), vec![1113]);
    }

    #[test]
    fn test_enum_raw_type_cycle() {
        let mut b = ModuleBuilder::new("M");
        let e = b.enum_decl("E", &["F"]);
        b.case(e, "a", None);
        let f = b.enum_decl("F", &["E"]);
        b.case(f, "b", None);
        let checked = check(b);

        assert_eq!(checked.count(1114), 1, "codes: {:?}", checked.codes());
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        let mut b = ModuleBuilder::new("M");
        b.protocol("Root", &[]);
        b.protocol("Left", &["Root"]);
        b.protocol("Right", &["Root"]);
        let bottom = b.protocol("Bottom", &["Left", "Right"]);
        let checked = check(b);

        assert!(checked.diagnostics.is_empty(), "unexpected: {:?}", checked.codes());
        assert_eq!(checked.decl(bottom).state.circularity, CircularityCheck::Checked);
    }

    #[test]
    fn test_member_lookup_through_broken_cycle_terminates() {
        let mut b = ModuleBuilder::new("M");
        let a = b.class("A", &["B"]);
        let c = b.class("B", &["A"]);
        let f = b.func(Some(c), "f", &[], None);
        mark_override(&mut b, f);
        let checked = check(b);

        assert_eq!(checked.count(1112), 1);
        assert!(checked.decl(a).is_invalid());
        assert_eq!(checked.count(1402), 1, "nothing to override in the broken cycle");
    }
}
