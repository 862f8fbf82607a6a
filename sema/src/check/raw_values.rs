//! Enum raw value checking
//!
//! Assigns implicit raw values (auto-increment for integer raw types, the
//! case name for string raw types), type-checks every value against the raw
//! type and reports duplicates. Values are compared through [`RawValueKey`]
//! so `0x10` and `16` collide while floats compare by bit pattern.

use super::collaborators::{FLOAT_LITERAL, GRAPHEME_LITERAL, INTEGER_LITERAL, STRING_LITERAL, UNICODE_SCALAR_LITERAL};
use super::literals::{parse_float, parse_integer};
use super::{DeclChecker, DeclDiagnostic, DiagKind, NoteKind};
use crate::decls::collections::IdMap;
use crate::decls::*;
use log::{debug, trace};
use source_map::SourceSpan;

/// Canonical form of a raw value for uniqueness checks
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RawValueKey {
    Int(i128),
    Float(u64),
    Str(String),
}

impl RawValueKey {
    pub fn of(literal: &LiteralExpr) -> Option<Self> {
        match literal.kind {
            LiteralKind::Integer => parse_integer(&literal.text).map(RawValueKey::Int),
            LiteralKind::Float => {
                let value = parse_float(&literal.text)?;
                // integral floats share the integer key space; -0.0 keeps its bits
                let integral = value.fract() == 0.0 && value.abs() < 1e38 && !(value == 0.0 && value.is_sign_negative());
                if integral {
                    Some(RawValueKey::Int(value as i128))
                } else {
                    Some(RawValueKey::Float(value.to_bits()))
                }
            }
            LiteralKind::String => Some(RawValueKey::Str(literal.text.clone())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AutoIncrement {
    Integer,
    CaseName,
    Unsupported,
}

impl DeclChecker<'_> {
    /// Check the raw values of an enum's cases. Runs at most once per enum.
    pub fn check_enum_raw_values(&mut self, id: DeclId) {
        match self.decl_mut(id).nominal_mut() {
            Some(data) if !data.raw_values_checked => data.raw_values_checked = true,
            _ => return,
        }
        if !self.decl(id).is_enum() {
            return;
        }
        self.check_inheritance_clause(id);

        let cases: Vec<DeclId> = self
            .module
            .all_members(id)
            .into_iter()
            .filter(|m| matches!(self.decl(*m).kind, DeclKind::EnumElement(_)))
            .collect();
        let raw_type = self.decl(id).nominal().and_then(|n| n.raw_type);
        let Some(raw_type) = raw_type else {
            for &case in &cases {
                if let Some(span) = self.explicit_raw_value(case).map(|l| l.span) {
                    self.diagnose(DiagKind::RawValueWithoutRawType, span);
                }
            }
            return;
        };
        if self.module.types.is_error(raw_type) {
            return;
        }

        let raw_span = self.raw_type_span(id, raw_type);
        if cases.is_empty() {
            self.diagnose(DiagKind::EmptyEnumRawType, raw_span);
            return;
        }

        let context = DeclContext::Decl(id);
        let integer = self.conforms_to(raw_type, INTEGER_LITERAL, context);
        let string = self.conforms_to(raw_type, STRING_LITERAL, context);
        let any_literal = integer
            || string
            || [FLOAT_LITERAL, GRAPHEME_LITERAL, UNICODE_SCALAR_LITERAL]
                .iter()
                .any(|p| self.conforms_to(raw_type, p, context));
        if !any_literal {
            let diag = DeclDiagnostic::new(
                DiagKind::RawTypeNotLiteralConvertible {
                    ty: self.type_name(raw_type),
                },
                raw_span,
            );
            self.emit(diag);
            return;
        }
        let strategy = if integer {
            AutoIncrement::Integer
        } else if string {
            AutoIncrement::CaseName
        } else {
            AutoIncrement::Unsupported
        };
        debug!("raw values of '{}' ({:?})", self.name(id), strategy);

        let mut seen: IdMap<RawValueKey, (DeclId, SourceSpan)> = IdMap::default();
        let mut previous: Option<LiteralExpr> = None;
        let mut last_explicit: Option<SourceSpan> = None;

        for case in cases {
            let case_span = self.span(case);
            if self.has_payload(case) {
                let diag = DeclDiagnostic::new(DiagKind::CaseWithPayload, case_span).note(
                    NoteKind::EnumRawTypeHere {
                        ty: self.type_name(raw_type),
                    },
                    raw_span,
                );
                self.emit(diag);
                continue;
            }

            let literal = match self.explicit_raw_value(case).cloned() {
                Some(literal) => {
                    last_explicit = Some(literal.span);
                    literal
                }
                None => {
                    let implicit = match strategy {
                        AutoIncrement::Integer => match &previous {
                            None => LiteralExpr::integer("0"),
                            Some(prev) if prev.kind == LiteralKind::Integer => {
                                let Some(next) = parse_integer(&prev.text).and_then(|v| v.checked_add(1)) else {
                                    continue;
                                };
                                LiteralExpr::integer(next.to_string())
                            }
                            Some(_) => {
                                self.diagnose(DiagKind::NonIntegerAutoIncrement, case_span);
                                continue;
                            }
                        },
                        AutoIncrement::CaseName => LiteralExpr::string(self.name(case)),
                        AutoIncrement::Unsupported => {
                            self.diagnose(DiagKind::CaseNeedsRawValue, case_span);
                            continue;
                        }
                    };
                    let implicit = implicit.implicit().at(case_span);
                    if let DeclKind::EnumElement(e) = &mut self.decl_mut(case).kind {
                        e.raw_value = Some(implicit.clone());
                    }
                    implicit
                }
            };
            trace!("case '{}' = {}", self.name(case), literal);

            if self.type_check_literal(&literal, context, raw_type) {
                previous = Some(literal);
                continue;
            }
            let Some(key) = RawValueKey::of(&literal) else {
                previous = Some(literal);
                continue;
            };
            match seen.get(&key) {
                Some(&(_, first_span)) => {
                    let mut diag = DeclDiagnostic::new(DiagKind::RawValueNotUnique, literal.span)
                        .note(NoteKind::RawValueUsedHere, first_span);
                    if literal.implicit && strategy == AutoIncrement::Integer {
                        diag = match last_explicit {
                            Some(from) => diag.note(NoteKind::IncrementingFromHere, from),
                            None => diag.note(NoteKind::IncrementingFromZero, SourceSpan::unknown()),
                        };
                    }
                    self.emit(diag);
                    self.decl_mut(case).set_invalid();
                }
                None => {
                    seen.insert(key, (case, literal.span));
                }
            }
            previous = Some(literal);
        }
    }

    fn explicit_raw_value(&self, case: DeclId) -> Option<&LiteralExpr> {
        match &self.decl(case).kind {
            DeclKind::EnumElement(e) => e.raw_value.as_ref().filter(|l| !l.implicit),
            _ => None,
        }
    }

    fn has_payload(&self, case: DeclId) -> bool {
        matches!(&self.decl(case).kind, DeclKind::EnumElement(e) if e.payload.is_some())
    }

    /// Span of the inheritance entry naming the raw type
    fn raw_type_span(&self, id: DeclId, raw_type: TypeId) -> SourceSpan {
        self.decl(id)
            .inherited()
            .iter()
            .find(|l| l.ty == Some(raw_type))
            .map_or_else(|| self.span(id), |l| l.span)
    }
}
