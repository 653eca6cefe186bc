//! Read-only view of an elaborated design.

pub mod builder;
pub mod ir;
pub mod validate;

use crate::diagnostic::{DiagResult, Diagnostic};
use crate::netlist::ir::{
    ConstInfo, Design, Expr, ExprInfo, Logic, LogicInfo, Lpm, LpmInfo, NetConst, NetSignal, Nexus, NexusInfo,
    NexusObject, NexusPtr, ProcessInfo, Scope, ScopeInfo, SignalInfo, Stmt, StmtInfo,
};
use crate::util::arena::{Arena, IndexType};
use indexmap::IndexMap;
use std::path::Path;

/// A validated [Design] together with the connection points of every nexus.
#[derive(Debug)]
pub struct Netlist {
    design: Design,
    nexuses: Vec<NexusInfo>,
    roots: Vec<Scope>,
    children: IndexMap<Scope, ScopeChildren>,
}

#[derive(Debug, Default)]
pub struct ScopeChildren {
    pub scopes: Vec<Scope>,
    pub signals: Vec<NetSignal>,
}

impl Netlist {
    pub fn new(design: Design) -> DiagResult<Netlist> {
        design.validate()?;

        let nexuses = link_nexuses(&design);

        let mut roots = vec![];
        let mut children: IndexMap<Scope, ScopeChildren> =
            design.scopes.keys().map(|s| (s, ScopeChildren::default())).collect();
        for (scope, info) in &design.scopes {
            match info.parent {
                None => roots.push(scope),
                Some(parent) => children[&parent].scopes.push(scope),
            }
        }
        for (signal, info) in &design.signals {
            children[&info.scope].signals.push(signal);
        }

        Ok(Netlist {
            design,
            nexuses,
            roots,
            children,
        })
    }

    pub fn from_json(source: &str) -> DiagResult<Netlist> {
        let design: Design = serde_json::from_str(source).map_err(|e| {
            Diagnostic::new_input("failed to parse netlist")
                .note(e.to_string())
                .finish()
        })?;
        Netlist::new(design)
    }

    pub fn from_path(path: &Path) -> DiagResult<Netlist> {
        let source = ttb_util::io::read_to_string(path)
            .map_err(|e| Diagnostic::new_input("failed to read netlist").note(e.to_string()).finish())?;
        Netlist::from_json(&source)
    }

    pub fn design(&self) -> &Design {
        &self.design
    }

    pub fn root_scopes(&self) -> &[Scope] {
        &self.roots
    }

    pub fn scope_children(&self, scope: Scope) -> &ScopeChildren {
        &self.children[&scope]
    }

    /// Full hierarchical path of a scope, joined with `.`.
    pub fn scope_path(&self, scope: Scope) -> String {
        let mut names = vec![];
        let mut curr = Some(scope);
        while let Some(scope) = curr {
            let info = self.scope(scope);
            names.push(info.name.as_str());
            curr = info.parent;
        }
        names.reverse();
        names.join(".")
    }

    pub fn nexus_ptrs(&self, nexus: Nexus) -> &[NexusPtr] {
        &self.nexuses[nexus.index()].ptrs
    }

    pub fn nexus_count(&self) -> usize {
        self.nexuses.len()
    }

    pub fn scope(&self, scope: Scope) -> &ScopeInfo {
        &self.design.scopes[scope]
    }

    pub fn signal(&self, signal: NetSignal) -> &SignalInfo {
        &self.design.signals[signal]
    }

    pub fn logic(&self, logic: Logic) -> &LogicInfo {
        &self.design.logic[logic]
    }

    pub fn lpm(&self, lpm: Lpm) -> &LpmInfo {
        &self.design.lpms[lpm]
    }

    pub fn constant(&self, constant: NetConst) -> &ConstInfo {
        &self.design.constants[constant]
    }

    pub fn expr(&self, expr: Expr) -> &ExprInfo {
        &self.design.expressions[expr]
    }

    pub fn stmt(&self, stmt: Stmt) -> &StmtInfo {
        &self.design.statements[stmt]
    }

    pub fn processes(&self) -> &[ProcessInfo] {
        &self.design.processes
    }

    pub fn signals(&self) -> &Arena<NetSignal, SignalInfo> {
        &self.design.signals
    }
}

/// Derive the connection points of each nexus, visiting signals, logic, lpms, constants and other devices
/// in that order so the pointer order is stable.
fn link_nexuses(design: &Design) -> Vec<NexusInfo> {
    let mut nexuses = vec![NexusInfo::default(); design.nexus_count];
    let mut attach = |nexus: Nexus, pin: usize, object: NexusObject| {
        nexuses[nexus.index()].ptrs.push(NexusPtr {
            pin: pin as u32,
            object,
        });
    };

    for (signal, info) in &design.signals {
        for (word, &nexus) in info.words.iter().enumerate() {
            if let Some(nexus) = nexus {
                attach(nexus, word, NexusObject::Signal(signal));
            }
        }
    }
    for (logic, info) in &design.logic {
        for (pin, &nexus) in info.pins.iter().enumerate() {
            attach(nexus, pin, NexusObject::Logic(logic));
        }
    }
    for (lpm, info) in &design.lpms {
        // pin numbering: output, data inputs, select, base
        let LpmInfo {
            kind: _,
            width: _,
            q,
            data,
            select,
            base: _,
            base_nexus,
        } = info;
        let pins = std::iter::once(q).chain(data).chain(select).chain(base_nexus);
        for (pin, &nexus) in pins.enumerate() {
            attach(nexus, pin, NexusObject::Lpm(lpm));
        }
    }
    for (constant, info) in &design.constants {
        attach(info.nexus, 0, NexusObject::Constant(constant));
    }
    for (device, info) in &design.others {
        for (pin, &nexus) in info.pins.iter().enumerate() {
            attach(nexus, pin, NexusObject::Other(device, info.kind));
        }
    }

    nexuses
}
