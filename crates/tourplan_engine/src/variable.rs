use crate::{
    define_index_newtype,
    domain::Domain,
    store::{Conflict, DomainStore},
};

define_index_newtype!(VarIdx, Domain);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralSign {
    Eq,
    Ne,
}

/// An atomic condition `var == value` or `var != value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Literal {
    pub var: VarIdx,
    pub sign: LiteralSign,
    pub value: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralState {
    True,
    False,
    Undecided,
}

impl Literal {
    pub fn eq(var: VarIdx, value: i64) -> Self {
        Literal {
            var,
            sign: LiteralSign::Eq,
            value,
        }
    }

    pub fn ne(var: VarIdx, value: i64) -> Self {
        Literal {
            var,
            sign: LiteralSign::Ne,
            value,
        }
    }

    pub fn negated(&self) -> Self {
        Literal {
            var: self.var,
            sign: match self.sign {
                LiteralSign::Eq => LiteralSign::Ne,
                LiteralSign::Ne => LiteralSign::Eq,
            },
            value: self.value,
        }
    }

    pub fn state(&self, store: &DomainStore) -> LiteralState {
        let domain = store.domain(self.var);
        let holds_eq = if !domain.contains(self.value) {
            Some(false)
        } else if domain.is_fixed() {
            Some(true)
        } else {
            None
        };

        match (holds_eq, self.sign) {
            (None, _) => LiteralState::Undecided,
            (Some(eq), LiteralSign::Eq) if eq => LiteralState::True,
            (Some(_), LiteralSign::Eq) => LiteralState::False,
            (Some(eq), LiteralSign::Ne) if eq => LiteralState::False,
            (Some(_), LiteralSign::Ne) => LiteralState::True,
        }
    }

    pub fn holds(&self, value: i64) -> bool {
        match self.sign {
            LiteralSign::Eq => value == self.value,
            LiteralSign::Ne => value != self.value,
        }
    }

    /// Narrows the store so that the literal holds.
    pub fn enforce(&self, store: &mut DomainStore) -> Result<bool, Conflict> {
        match self.sign {
            LiteralSign::Eq => store.fix(self.var, self.value),
            LiteralSign::Ne => store.remove(self.var, self.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_state() {
        let mut store = DomainStore::new(vec![Domain::range(0, 3)]);
        let var = VarIdx::new(0);

        assert_eq!(Literal::eq(var, 2).state(&store), LiteralState::Undecided);
        assert_eq!(Literal::eq(var, 7).state(&store), LiteralState::False);
        assert_eq!(Literal::ne(var, 7).state(&store), LiteralState::True);

        Literal::eq(var, 2).enforce(&mut store).unwrap();
        assert_eq!(Literal::eq(var, 2).state(&store), LiteralState::True);
        assert_eq!(Literal::ne(var, 2).state(&store), LiteralState::False);
        assert_eq!(Literal::ne(var, 2).negated(), Literal::eq(var, 2));
    }
}
