use verdant_syntax::Symbol;

/// Constant bitset over the grammar's symbols. `Symbol::ERROR` is never a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct SymbolSet {
    bits: u64,
}

impl SymbolSet {
    pub(crate) const fn new<const N: usize>(symbols: [Symbol; N]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < symbols.len() {
            let raw = symbols[i].raw();
            assert!(raw < u64::BITS as u16, "symbol does not fit the set");
            bits |= 1 << raw;
            i += 1;
        }
        Self { bits }
    }

    pub(crate) const fn union(self, other: Self) -> Self {
        Self { bits: self.bits | other.bits }
    }

    pub(crate) const fn contains(&self, symbol: Symbol) -> bool {
        let raw = symbol.raw();
        raw < u64::BITS as u16 && self.bits & (1 << raw) != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::{COMMA, IDENTIFIER, SEMICOLON};

    #[test]
    fn membership() {
        const SET: SymbolSet = SymbolSet::new([IDENTIFIER, SEMICOLON]);
        assert!(SET.contains(IDENTIFIER));
        assert!(!SET.contains(COMMA));
        assert!(!SET.contains(Symbol::ERROR));
        assert!(SET.union(SymbolSet::new([COMMA])).contains(COMMA));
    }
}
