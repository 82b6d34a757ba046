use drop_bomb::DropBomb;
use text_size::TextRange;
use tracing::{debug, trace};
use verdant_parse::{EngineOutcome, Interrupt, SourceText};
use verdant_syntax::{Builder, FieldId, Leaf, ReusableNodes, Subtree, Symbol, Tree};

use crate::kinds::{COMMENT, EOF, UNKNOWN};
use crate::symbol_set::SymbolSet;
use crate::symbols::GRAMMAR;
use crate::tokenizer::{Token, Tokenizer};

pub(crate) enum Event {
    /// `kind: None` marks an abandoned or not yet completed node.
    Start { kind: Option<Symbol>, field: Option<FieldId>, forward_parent: Option<u32> },
    Token { kind: Symbol, field: Option<FieldId>, range: TextRange, lookahead: u32, extra: bool },
    Missing { kind: Symbol, field: Option<FieldId> },
    Reuse(Subtree),
    Finish,
}

impl Event {
    const TOMBSTONE: Self = Self::Start { kind: None, field: None, forward_parent: None };
}

/// A compound statement whose items are being parsed.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Block {
    compound: u32,
    field: Option<FieldId>,
    /// Function definition that ends with this block.
    definition: Option<u32>,
}

impl Block {
    pub(crate) fn new(
        compound: &Marker,
        field: Option<FieldId>,
        definition: Option<&Marker>,
    ) -> Self {
        Self { compound: compound.position, field, definition: definition.map(|m| m.position) }
    }

    pub(crate) fn field(&self) -> Option<FieldId> {
        self.field
    }

    /// Markers of the still open compound statement and function definition.
    pub(crate) fn markers(&self) -> (Marker, Option<Marker>) {
        (Marker::new(self.compound), self.definition.map(Marker::new))
    }
}

#[derive(Debug, Clone, Default)]
struct Checkpoint {
    events: usize,
    byte: u32,
    last_end: u32,
    blocks: Vec<Block>,
}

/// Progress of a halted parse: every event up to the last checkpoint and the
/// blocks open there, outermost first.
pub(crate) struct Suspension {
    events: Vec<Event>,
    byte: u32,
    last_end: u32,
    blocks: Vec<Block>,
}

pub(crate) struct Parser<'s> {
    source: &'s SourceText<'s>,
    tokenizer: Tokenizer<'s>,
    events: Vec<Event>,
    reusable: ReusableNodes<'s>,
    interrupt: &'s mut Interrupt,
    last_end: u32,
    blocks: Vec<Block>,
    checkpoint: Checkpoint,
    /// Event count a resumed parse started from. Interrupts are ignored
    /// until a checkpoint past it has been saved.
    resumed_at: Option<usize>,
    halted: bool,
}

impl<'s> Parser<'s> {
    pub(crate) fn new(
        source: &'s SourceText<'s>,
        old_tree: Option<&'s Tree>,
        interrupt: &'s mut Interrupt,
    ) -> Self {
        Self {
            source,
            tokenizer: Tokenizer::new(source, 0),
            events: Vec::new(),
            reusable: ReusableNodes::new(old_tree),
            interrupt,
            last_end: 0,
            blocks: Vec::new(),
            checkpoint: Checkpoint::default(),
            resumed_at: None,
            halted: false,
        }
    }

    pub(crate) fn start_root(&mut self) -> Marker {
        let root = self.push_start();
        self.checkpoint = Checkpoint { events: self.events.len(), ..Checkpoint::default() };
        root
    }

    /// Continues a halted parse; returns the marker of its root node and the
    /// blocks to re-enter, outermost first.
    pub(crate) fn resume(&mut self, suspension: Suspension) -> (Marker, Vec<Block>) {
        let Suspension { events, byte, last_end, blocks } = suspension;
        debug!(events = events.len(), byte, depth = blocks.len(), "resuming from checkpoint");
        self.events = events;
        self.last_end = last_end;
        self.tokenizer.reset(byte);
        self.resumed_at = Some(self.events.len());
        self.checkpoint =
            Checkpoint { events: self.events.len(), byte, last_end, blocks: blocks.clone() };
        (Marker::new(0), blocks)
    }

    pub(crate) fn is_halted(&self) -> bool {
        self.halted
    }

    /// Kind of the next significant token. Comments before it are attached
    /// to the current node as extras.
    pub(crate) fn current(&mut self) -> Symbol {
        if self.halted {
            return EOF;
        }
        self.eat_extras();
        self.tokenizer.peek().kind
    }

    /// Kind of the next significant token. Comments before it stay pending,
    /// to be attached by whichever node consumes the next token.
    pub(crate) fn peek(&self) -> Symbol {
        if self.halted {
            return EOF;
        }
        if self.tokenizer.peek().kind != COMMENT {
            return self.tokenizer.peek().kind;
        }

        let mut lookahead = self.tokenizer.clone();
        while lookahead.peek().kind == COMMENT {
            lookahead.next_token();
        }
        lookahead.peek().kind
    }

    pub(crate) fn at(&mut self, kind: Symbol) -> bool {
        self.current() == kind
    }

    pub(crate) fn at_set(&mut self, set: SymbolSet) -> bool {
        set.contains(self.current())
    }

    /// Consumes the current token; returns the index of its event.
    pub(crate) fn bump(&mut self) -> u32 {
        self.bump_with(None)
    }

    pub(crate) fn bump_field(&mut self, field: FieldId) -> u32 {
        self.bump_with(Some(field))
    }

    fn bump_with(&mut self, field: Option<FieldId>) -> u32 {
        if self.current() == EOF {
            return self.events.len() as u32;
        }
        let token = self.tokenizer.next_token();
        self.poll();
        self.push_token(token, field, false)
    }

    pub(crate) fn eat(&mut self, kind: Symbol) -> bool {
        if !self.at(kind) {
            return false;
        }
        self.bump();
        true
    }

    pub(crate) fn expect(&mut self, kind: Symbol) -> bool {
        self.expect_field(kind, None)
    }

    /// Consumes a `kind` token, or records a zero-width missing one.
    pub(crate) fn expect_field(&mut self, kind: Symbol, field: Option<FieldId>) -> bool {
        if self.at(kind) {
            self.bump_with(field);
            return true;
        }
        self.missing(kind, field);
        false
    }

    pub(crate) fn missing(&mut self, kind: Symbol, field: Option<FieldId>) {
        trace!(kind = GRAMMAR.symbol_name(kind), at = self.last_end, "missing");
        self.events.push(Event::Missing { kind, field });
    }

    pub(crate) fn start(&mut self) -> Marker {
        if !self.halted {
            self.eat_extras();
        }
        self.push_start()
    }

    fn push_start(&mut self) -> Marker {
        let position = self.events.len() as u32;
        self.events.push(Event::TOMBSTONE);
        Marker::new(position)
    }

    /// Opens a node that begins with the token at `event`.
    pub(crate) fn precede_token(&mut self, event: u32) -> Marker {
        let index = (event as usize).min(self.events.len());
        self.events.insert(index, Event::TOMBSTONE);
        Marker::new(index as u32)
    }

    pub(crate) fn set_field(&mut self, event: u32, field: FieldId) {
        if let Some(
            Event::Start { field: slot, .. }
            | Event::Token { field: slot, .. }
            | Event::Missing { field: slot, .. },
        ) = self.events.get_mut(event as usize)
        {
            *slot = Some(field);
        }
    }

    /// Records a point the parse can be resumed from. Returns `true` once
    /// the interrupt has fired.
    pub(crate) fn save_checkpoint(&mut self) -> bool {
        if self.halted {
            return true;
        }
        self.checkpoint = Checkpoint {
            events: self.events.len(),
            byte: self.tokenizer.peek().range.start().into(),
            last_end: self.last_end,
            blocks: self.blocks.clone(),
        };
        self.poll();
        self.halted
    }

    /// Halts on an interrupt, unless no progress was checkpointed since the
    /// parse resumed.
    fn poll(&mut self) {
        let advanced = self.resumed_at.is_none_or(|at| self.checkpoint.events > at);
        if self.interrupt.check() && advanced {
            self.halted = true;
        }
    }

    pub(crate) fn enter_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub(crate) fn leave_block(&mut self) {
        self.blocks.pop();
    }

    /// Takes over an unchanged node of the old tree that starts at the current
    /// token and has a kind in `allowed`.
    pub(crate) fn try_reuse(&mut self, allowed: SymbolSet) -> bool {
        if self.halted || self.reusable.is_empty() {
            return false;
        }
        let token = *self.tokenizer.peek();
        if token.kind == EOF {
            return false;
        }

        let token_start: u32 = token.range.start().into();
        let end_of_input = self.source.end_of_input();
        let candidate = self.reusable.candidates_at(self.last_end).into_iter().find(|node| {
            node.start_byte() == token_start
                && node.end_byte() <= end_of_input
                && allowed.contains(node.symbol())
        });
        let Some(node) = candidate else {
            return false;
        };

        trace!(
            kind = node.kind(),
            start = node.start_byte(),
            end = node.end_byte(),
            "reusing node"
        );
        self.events.push(Event::Reuse(node.subtree()));
        self.last_end = node.end_byte();
        self.tokenizer.reset(self.last_end);
        self.poll();
        true
    }

    fn eat_extras(&mut self) {
        while self.tokenizer.peek().kind == COMMENT {
            let token = self.tokenizer.next_token();
            self.push_token(token, None, true);
        }
    }

    fn push_token(&mut self, token: Token, field: Option<FieldId>, extra: bool) -> u32 {
        let kind = if token.kind == UNKNOWN { Symbol::ERROR } else { token.kind };
        self.last_end = token.range.end().into();
        let index = self.events.len() as u32;
        self.events.push(Event::Token {
            kind,
            field,
            range: token.range,
            lookahead: token.lookahead,
            extra,
        });
        index
    }

    pub(crate) fn finish(self) -> EngineOutcome {
        if self.halted {
            let Self { mut events, checkpoint, .. } = self;
            events.truncate(checkpoint.events);
            debug!(
                events = events.len(),
                byte = checkpoint.byte,
                depth = checkpoint.blocks.len(),
                "halted, keeping progress"
            );
            return EngineOutcome::Halted(Box::new(Suspension {
                events,
                byte: checkpoint.byte,
                last_end: checkpoint.last_end,
                blocks: checkpoint.blocks,
            }));
        }
        EngineOutcome::Complete(self.build_tree())
    }

    fn build_tree(self) -> Tree {
        let Self { source, mut events, .. } = self;
        let mut builder = Builder::new(&GRAMMAR);
        let mut forward_parents = Vec::new();

        for i in 0..events.len() {
            match std::mem::replace(&mut events[i], Event::TOMBSTONE) {
                Event::Start { kind: None, .. } => {}
                Event::Start { kind: Some(kind), field, forward_parent } => {
                    forward_parents.push((kind, field));
                    let mut index = i;
                    let mut next = forward_parent;
                    while let Some(offset) = next {
                        index += offset as usize;
                        next = match std::mem::replace(&mut events[index], Event::TOMBSTONE) {
                            Event::Start { kind, field, forward_parent } => {
                                if let Some(kind) = kind {
                                    forward_parents.push((kind, field));
                                }
                                forward_parent
                            }
                            _ => unreachable!(),
                        };
                    }

                    for (kind, field) in forward_parents.drain(..).rev() {
                        builder.start_node(kind, field);
                    }
                }
                Event::Token { kind, field, range, lookahead, extra } => builder.leaf(Leaf {
                    symbol: kind,
                    field,
                    start: source.length_at(range.start().into()),
                    end: source.length_at(range.end().into()),
                    lookahead_bytes: lookahead,
                    extra,
                }),
                Event::Missing { kind, field } => builder.missing(kind, field),
                Event::Reuse(subtree) => builder.reuse(subtree, None),
                Event::Finish => builder.finish_node(),
            }
        }

        builder.finish(source.length_at(source.end_of_input()), source.included_ranges().to_vec())
    }
}

pub(crate) struct Marker {
    position: u32,
    bomb: DropBomb,
}

impl Marker {
    fn new(position: u32) -> Self {
        Self { position, bomb: DropBomb::new("Marker must be either completed or abandoned") }
    }

    pub(crate) fn complete(self, p: &mut Parser<'_>, kind: Symbol) -> CompletedMarker {
        self.complete_field(p, kind, None)
    }

    pub(crate) fn complete_field(
        mut self,
        p: &mut Parser<'_>,
        kind: Symbol,
        field: Option<FieldId>,
    ) -> CompletedMarker {
        self.bomb.defuse();
        if let Some(Event::Start { kind: slot, field: field_slot, .. }) =
            p.events.get_mut(self.position as usize)
        {
            *slot = Some(kind);
            if field.is_some() {
                *field_slot = field;
            }
        }
        p.events.push(Event::Finish);
        CompletedMarker { position: self.position }
    }

    pub(crate) fn abandon(mut self, p: &mut Parser<'_>) {
        self.bomb.defuse();
        if self.position as usize + 1 == p.events.len() {
            p.events.pop();
        }
    }

    /// Leaves the node open in a halted parse, to be completed on resume.
    pub(crate) fn suspend(mut self) {
        self.bomb.defuse();
    }
}

#[derive(Clone, Copy)]
pub(crate) struct CompletedMarker {
    position: u32,
}

impl CompletedMarker {
    pub(crate) fn event(self) -> u32 {
        self.position
    }

    /// Wraps the completed node in a new one that starts where it starts.
    pub(crate) fn precede(self, p: &mut Parser<'_>) -> Marker {
        let new = p.push_start();
        if let Some(Event::Start { forward_parent, .. }) =
            p.events.get_mut(self.position as usize)
        {
            *forward_parent = Some(new.position - self.position);
        }
        new
    }
}
