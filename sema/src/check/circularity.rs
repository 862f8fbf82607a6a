//! Inheritance cycle detection
//!
//! Depth-first walk over "inherits from" edges (superclass, inherited
//! protocols, enum raw type) using each declaration's [`CircularityCheck`]
//! state. Re-reaching a node still marked `Checking` closes a cycle, which is
//! reported once at its first node and broken there.

use super::{DeclChecker, DeclDiagnostic, DiagKind, NoteKind};
use crate::decls::*;
use log::debug;
use smallvec::SmallVec;

type InheritancePath = SmallVec<[DeclId; 8]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EdgeKind {
    Superclass,
    Protocols,
    RawType,
}

impl DeclChecker<'_> {
    /// Detect and break inheritance cycles reachable from `decl`
    pub fn check_circularity(&mut self, decl: DeclId) {
        let mut path = InheritancePath::new();
        self.visit_inheritance(decl, &mut path);
    }

    fn edge_kind(&self, decl: DeclId) -> Option<EdgeKind> {
        match self.decl(decl).kind {
            DeclKind::Class(_) => Some(EdgeKind::Superclass),
            DeclKind::Protocol(_) => Some(EdgeKind::Protocols),
            DeclKind::Enum(_) => Some(EdgeKind::RawType),
            _ => None,
        }
    }

    fn visit_inheritance(&mut self, decl: DeclId, path: &mut InheritancePath) {
        let Some(edge) = self.edge_kind(decl) else {
            return;
        };
        match self.decl(decl).state.circularity {
            CircularityCheck::Checked => return,
            CircularityCheck::Checking => {
                self.report_cycle(decl, edge, path);
                return;
            }
            CircularityCheck::Unchecked => {}
        }

        path.push(decl);
        self.decl_mut(decl).state.circularity = CircularityCheck::Checking;
        self.check_inheritance_clause(decl);
        for next in self.inheritance_successors(decl, edge) {
            self.visit_inheritance(next, path);
        }
        self.decl_mut(decl).state.circularity = CircularityCheck::Checked;
        path.pop();
    }

    fn inheritance_successors(&self, decl: DeclId, edge: EdgeKind) -> Vec<DeclId> {
        let Some(data) = self.decl(decl).nominal() else {
            return Vec::new();
        };
        match edge {
            EdgeKind::Superclass => self.module.superclass_decl(decl).into_iter().collect(),
            EdgeKind::Protocols => data.protocols.clone(),
            EdgeKind::RawType => data
                .raw_type
                .and_then(|t| self.module.types.nominal_decl(t))
                .filter(|d| self.decl(*d).is_enum())
                .into_iter()
                .collect(),
        }
    }

    fn report_cycle(&mut self, decl: DeclId, edge: EdgeKind, path: &InheritancePath) {
        let Some(start) = path.iter().position(|d| *d == decl) else {
            return;
        };
        let cycle = &path[start..];
        let description = if cycle.len() == 1 {
            self.name(decl)
        } else {
            let mut text = cycle
                .iter()
                .map(|d| format!("'{}'", self.name(*d)))
                .collect::<Vec<_>>()
                .join(" -> ");
            text.push_str(&format!(" -> '{}'", self.name(decl)));
            text
        };
        let kind = match edge {
            EdgeKind::Superclass => DiagKind::CircularClassInheritance { path: description },
            EdgeKind::Protocols => DiagKind::CircularProtocolDef { path: description },
            EdgeKind::RawType => DiagKind::CircularEnumInheritance { path: description },
        };
        let mut diag = DeclDiagnostic::new(kind, self.span(decl));
        for &node in &cycle[1..] {
            let note = NoteKind::KindDeclaredHere {
                kind: self.decl(node).descriptive_kind(),
                name: self.name(node),
            };
            diag = diag.note(note, self.span(node));
        }
        self.emit(diag);
        debug!("breaking inheritance cycle at '{}'", self.name(decl));
        self.break_inheritance_cycle(decl, edge);
    }

    fn break_inheritance_cycle(&mut self, decl: DeclId, edge: EdgeKind) {
        self.poison(decl);
        if let Some(data) = self.decl_mut(decl).nominal_mut() {
            match edge {
                EdgeKind::Superclass => data.superclass = None,
                EdgeKind::Protocols => data.protocols.clear(),
                EdgeKind::RawType => data.raw_type = None,
            }
        }
    }
}
