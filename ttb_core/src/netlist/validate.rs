use crate::diagnostic::{DiagResult, Diagnostic};
use crate::graph::connection::Slice;
use crate::netlist::ir::{
    ConstInfo, Design, EventInfo, Expr, ExprInfo, ExprKind, LogicInfo, LpmInfo, LpmKind, Lval, LvalTarget, NetSignal,
    Nexus, OtherDeviceInfo, ProcessInfo, ScopeInfo, ScopeKind, SignalInfo, Stmt, StmtInfo, StmtKind,
};
use crate::util::arena::{Arena, IndexType};
use std::fmt::Display;

impl Design {
    /// Check that every reference points into its arena, that statement and expression trees only refer
    /// backwards, and that the scope hierarchy is rooted in modules.
    pub fn validate(&self) -> DiagResult {
        let Design {
            nexus_count,
            scopes,
            signals,
            logic,
            lpms,
            constants,
            others,
            expressions,
            statements,
            processes,
        } = self;
        let nexus_count = *nexus_count;

        for (scope, info) in scopes {
            let ScopeInfo { name: _, kind, parent } = info;
            match parent {
                None => {
                    if *kind != ScopeKind::Module {
                        return Err(Diagnostic::new_unsupported(format!("top level scope type `{kind}`"))
                            .note(format!("scope `{}` is not a module", info.name))
                            .finish());
                    }
                }
                Some(parent) => {
                    // parents must come first, which also rules out cycles
                    if parent.index() >= scope.index() {
                        return Err(Diagnostic::new_input(format!(
                            "scope `{}` refers to parent {} which is not declared before it",
                            info.name,
                            parent.index()
                        ))
                        .finish());
                    }
                }
            }
        }

        for (_, info) in signals {
            let SignalInfo {
                scope,
                name,
                kind: _,
                port: _,
                msb,
                lsb,
                array_dimensions: _,
                array_base: _,
                words,
                local: _,
            } = info;
            let owner = format!("signal `{name}`");
            check_key(scopes, *scope, &owner)?;
            if msb.abs_diff(*lsb) == u32::MAX {
                return Err(Diagnostic::new_input(format!("{owner} is wider than 32 bit indices")).finish());
            }
            if words.is_empty() {
                return Err(Diagnostic::new_input(format!("{owner} has no words")).finish());
            }
            for nexus in words.iter().flatten() {
                check_nexus(nexus_count, *nexus, &owner)?;
            }
        }

        for (device, info) in logic {
            let LogicInfo { kind, pins } = info;
            let owner = format!("logic gate {} ({kind})", device.index());
            if pins.is_empty() {
                return Err(Diagnostic::new_input(format!("{owner} has no pins")).finish());
            }
            for &pin in pins {
                check_nexus(nexus_count, pin, &owner)?;
            }
        }

        for (device, info) in lpms {
            let LpmInfo {
                kind,
                width,
                q,
                data,
                select,
                base,
                base_nexus,
            } = info;
            let owner = format!("LPM device {} ({kind})", device.index());
            if *width == 0 {
                return Err(Diagnostic::new_input(format!("{owner} has zero width")).finish());
            }
            if matches!(kind, LpmKind::PartVp | LpmKind::PartPv) && Slice::checked_from_base(*base, *width).is_none() {
                return Err(Diagnostic::new_input(format!(
                    "{owner} selects {width} bits at base {base}, beyond 32 bit indices"
                ))
                .finish());
            }
            check_nexus(nexus_count, *q, &owner)?;
            for &nexus in data.iter().chain(select).chain(base_nexus) {
                check_nexus(nexus_count, nexus, &owner)?;
            }
        }

        for (constant, info) in constants {
            let ConstInfo { bits, nexus } = info;
            let owner = format!("constant {}", constant.index());
            check_bits(bits, &owner)?;
            check_nexus(nexus_count, *nexus, &owner)?;
        }

        for (device, info) in others {
            let OtherDeviceInfo { kind, pins } = info;
            let owner = format!("{kind} {}", device.index());
            for &pin in pins {
                check_nexus(nexus_count, pin, &owner)?;
            }
        }

        for (expr, info) in expressions {
            info.validate(expr, signals)?;
        }

        for (stmt, info) in statements {
            info.validate(stmt, nexus_count, signals, expressions)?;
        }

        for (index, process) in processes.iter().enumerate() {
            let ProcessInfo { kind, scope, body } = process;
            let owner = format!("process {index} ({kind})");
            check_key(scopes, *scope, &owner)?;
            check_key(statements, *body, &owner)?;
        }

        Ok(())
    }
}

impl ExprInfo {
    fn validate(&self, expr: Expr, signals: &Arena<NetSignal, SignalInfo>) -> DiagResult {
        let owner = format!("expression {}", expr.index());
        let check_child = |child: Expr| check_earlier(child, expr, &owner);
        if self.width == 0 {
            return Err(Diagnostic::new_input(format!("{owner} has zero width")).finish());
        }

        match &self.kind {
            ExprKind::Number { bits } => check_bits(bits, &owner),
            ExprKind::Signal { signal, word } => {
                check_key(signals, *signal, &owner)?;
                if let Some(word) = word {
                    check_child(*word)?;
                }
                Ok(())
            }
            ExprKind::Select { base, offset } => {
                check_child(*base)?;
                if let Some(offset) = offset {
                    check_child(*offset)?;
                }
                Ok(())
            }
            ExprKind::Unary { op: _, operand } => check_child(*operand),
            ExprKind::Binary { op: _, left, right } => {
                check_child(*left)?;
                check_child(*right)
            }
            ExprKind::Ternary {
                cond,
                if_true,
                if_false,
            } => {
                check_child(*cond)?;
                check_child(*if_true)?;
                check_child(*if_false)
            }
            ExprKind::Concat { parts, repeat } => {
                if *repeat == 0 {
                    return Err(Diagnostic::new_input(format!("{owner} has a zero repeat count")).finish());
                }
                for &part in parts {
                    check_child(part)?;
                }
                Ok(())
            }
            ExprKind::Unsupported(_) => Ok(()),
        }
    }
}

impl StmtInfo {
    fn validate(
        &self,
        stmt: Stmt,
        nexus_count: usize,
        signals: &Arena<NetSignal, SignalInfo>,
        expressions: &Arena<Expr, ExprInfo>,
    ) -> DiagResult {
        let owner = format!("statement {}", stmt.index());
        let located = |e: crate::diagnostic::DiagError| e.or_location(self.loc.as_ref());

        match &self.kind {
            StmtKind::Noop | StmtKind::Unsupported(_) => Ok(()),
            StmtKind::Assign { lvals, rval } | StmtKind::AssignNb { lvals, rval } => {
                check_key(expressions, *rval, &owner).map_err(located)?;
                for lval in lvals {
                    lval.validate(&owner, signals, expressions).map_err(located)?;
                }
                Ok(())
            }
            StmtKind::Condit {
                cond,
                if_true,
                if_false,
            } => {
                check_key(expressions, *cond, &owner).map_err(located)?;
                for &branch in if_true.iter().chain(if_false) {
                    check_earlier(branch, stmt, &owner).map_err(located)?;
                }
                Ok(())
            }
            StmtKind::Wait { events, body } => {
                for event in events {
                    let EventInfo { pos, neg, any } = event;
                    for &nexus in pos.iter().chain(neg).chain(any) {
                        check_nexus(nexus_count, nexus, &owner).map_err(located)?;
                    }
                }
                if let Some(body) = body {
                    check_earlier(*body, stmt, &owner).map_err(located)?;
                }
                Ok(())
            }
        }
    }
}

impl Lval {
    fn validate(
        &self,
        owner: &str,
        signals: &Arena<NetSignal, SignalInfo>,
        expressions: &Arena<Expr, ExprInfo>,
    ) -> DiagResult {
        let Lval {
            width,
            target,
            part_offset,
            word,
        } = self;
        if *width == 0 {
            return Err(Diagnostic::new_input(format!("{owner} assigns to zero bits")).finish());
        }
        for &expr in part_offset.iter().chain(word) {
            check_key(expressions, expr, owner)?;
        }
        match target {
            LvalTarget::Signal(signal) => check_key(signals, *signal, owner),
            LvalTarget::Nested(inner) => inner.validate(owner, signals, expressions),
        }
    }
}

fn check_key<K: IndexType, T>(arena: &Arena<K, T>, key: K, owner: &str) -> DiagResult {
    if arena.contains_key(key) {
        Ok(())
    } else {
        Err(Diagnostic::new_input(format!("{owner} refers to missing {key:?}"))
            .note(format!("only {} entries exist", arena.len()))
            .finish())
    }
}

fn check_earlier<K: IndexType>(child: K, parent: K, owner: &str) -> DiagResult {
    if child.index() < parent.index() {
        Ok(())
    } else {
        Err(
            Diagnostic::new_input(format!("{owner} refers to {child:?} which is not declared before it"))
                .finish(),
        )
    }
}

fn check_nexus(nexus_count: usize, nexus: Nexus, owner: &impl Display) -> DiagResult {
    if nexus.index() < nexus_count {
        Ok(())
    } else {
        Err(Diagnostic::new_input(format!("{owner} refers to missing {nexus:?}"))
            .note(format!("the design declares {nexus_count} nexuses"))
            .finish())
    }
}

fn check_bits(bits: &str, owner: &str) -> DiagResult {
    if bits.is_empty() {
        return Err(Diagnostic::new_input(format!("{owner} has no bits")).finish());
    }
    match bits.chars().find(|c| !matches!(c, '0' | '1' | 'x' | 'z')) {
        None => Ok(()),
        Some(c) => Err(Diagnostic::new_input(format!("{owner} has invalid bit `{c}`")).finish()),
    }
}
