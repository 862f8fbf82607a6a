//! Re-entrancy tracking for declaration validation

use crate::decls::collections::DeclSet;
use crate::decls::{Decl, DeclId, ValidationStatus};
use std::cell::RefCell;
use std::rc::Rc;

/// Declarations whose validation is currently on the stack
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    set: Rc<RefCell<DeclSet>>,
}

impl InFlight {
    /// Mark `decl` as being validated. Returns `None` when it already is,
    /// which callers treat as "return early, fields may be unset".
    pub fn enter(&self, decl: DeclId) -> Option<ValidationGuard> {
        if !self.set.borrow_mut().insert(decl) {
            return None;
        }
        Some(ValidationGuard {
            set: Rc::clone(&self.set),
            decl,
        })
    }

    pub fn contains(&self, decl: DeclId) -> bool {
        self.set.borrow().contains(&decl)
    }

    pub fn len(&self) -> usize {
        self.set.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.borrow().is_empty()
    }
}

/// Clears the in-flight mark on every exit path
#[must_use]
pub struct ValidationGuard {
    set: Rc<RefCell<DeclSet>>,
    decl: DeclId,
}

impl Drop for ValidationGuard {
    fn drop(&mut self) {
        self.set.borrow_mut().remove(&self.decl);
    }
}

/// Observable status: being-checked wins over everything else, then invalid
pub fn status_of(decl: &Decl, in_flight: bool) -> ValidationStatus {
    if in_flight {
        ValidationStatus::BeingChecked
    } else if decl.is_invalid() {
        ValidationStatus::Invalid
    } else if decl.state.validated {
        ValidationStatus::Checked
    } else {
        ValidationStatus::Unchecked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_clears_on_drop() {
        let in_flight = InFlight::default();
        let d = DeclId::from_raw(4);
        {
            let _guard = in_flight.enter(d).unwrap();
            assert!(in_flight.contains(d));
            assert!(in_flight.enter(d).is_none());
        }
        assert!(!in_flight.contains(d));
        assert!(in_flight.enter(d).is_some());
    }

    #[test]
    fn test_guard_clears_on_early_return() {
        fn bail(in_flight: &InFlight, d: DeclId) -> Result<(), ()> {
            let _guard = in_flight.enter(d).ok_or(())?;
            Err(())
        }
        let in_flight = InFlight::default();
        let d = DeclId::from_raw(1);
        assert!(bail(&in_flight, d).is_err());
        assert!(in_flight.is_empty());
    }
}
