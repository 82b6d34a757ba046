use verdant_syntax::Symbol;

use crate::kinds::*;
use crate::parser::{Block, Marker, Parser};
use crate::symbol_set::SymbolSet;

mod exprs;
mod items;
mod stmts;

const TOP_LEVEL_REUSABLE: SymbolSet =
    SymbolSet::new([FUNCTION_DEFINITION]).union(stmts::STATEMENT_REUSABLE);

/// Parses items until the end of input, checkpointing before each one.
/// `blocks` are those a resumed parse stopped inside of.
pub(crate) fn translation_unit(p: &mut Parser<'_>, root: Marker, blocks: &[Block]) {
    stmts::resume_blocks(p, blocks);
    loop {
        if p.save_checkpoint() || p.at(EOF) {
            break;
        }
        if p.try_reuse(TOP_LEVEL_REUSABLE) {
            continue;
        }

        if p.at(PRIMITIVE_TYPE) {
            items::declaration(p, true);
        } else {
            stmts::statement(p);
        }
    }

    if p.is_halted() {
        root.suspend();
    } else {
        root.complete(p, TRANSLATION_UNIT);
    }
}

/// Parses `bra element (delim element)* ket`. `element` returns `false` when
/// nothing it could start is ahead.
pub(crate) fn delimited(
    p: &mut Parser<'_>,
    ket: Symbol,
    delim: Symbol,
    first: SymbolSet,
    mut element: impl FnMut(&mut Parser<'_>) -> bool,
) {
    p.bump();

    while !p.at(ket) && !p.at(EOF) {
        if p.at(delim) {
            let m = p.start();
            p.bump();
            m.complete(p, Symbol::ERROR);
            continue;
        }

        if !element(p) {
            break;
        }

        if !p.eat(delim) {
            if p.at_set(first) {
                p.missing(delim, None);
            } else {
                break;
            }
        }
    }

    p.expect(ket);
}
