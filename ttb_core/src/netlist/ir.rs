//! Elaborated netlist as produced by an external front-end.
//!
//! The structure mirrors what an elaborator hands to a backend: scopes with the signals declared in them,
//! structural devices (logic gates, LPM devices, constants) whose pins are connected through nexuses,
//! and the statement trees of behavioral processes.
//!
//! Nexuses are only counted here, their connection points are derived when the design is linked into a
//! [crate::netlist::Netlist]. Statements and expressions live in arenas and may only refer to entries that
//! come strictly earlier in their arena, which keeps the trees acyclic.

use crate::new_index_type;
use crate::util::arena::Arena;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

new_index_type!(pub Scope);
new_index_type!(pub NetSignal);
new_index_type!(pub Nexus);
new_index_type!(pub Logic);
new_index_type!(pub Lpm);
new_index_type!(pub NetConst);
new_index_type!(pub OtherDevice);
new_index_type!(pub Expr);
new_index_type!(pub Stmt);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Design {
    pub nexus_count: usize,
    #[serde(default)]
    pub scopes: Arena<Scope, ScopeInfo>,
    #[serde(default)]
    pub signals: Arena<NetSignal, SignalInfo>,
    #[serde(default)]
    pub logic: Arena<Logic, LogicInfo>,
    #[serde(default)]
    pub lpms: Arena<Lpm, LpmInfo>,
    #[serde(default)]
    pub constants: Arena<NetConst, ConstInfo>,
    #[serde(default)]
    pub others: Arena<OtherDevice, OtherDeviceInfo>,
    #[serde(default)]
    pub expressions: Arena<Expr, ExprInfo>,
    #[serde(default)]
    pub statements: Arena<Stmt, StmtInfo>,
    #[serde(default)]
    pub processes: Vec<ProcessInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScopeInfo {
    pub name: String,
    pub kind: ScopeKind,
    #[serde(default)]
    pub parent: Option<Scope>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ScopeKind {
    Module,
    Function,
    Task,
    Begin,
    Fork,
    Generate,
    Package,
    Class,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignalInfo {
    pub scope: Scope,
    pub name: String,
    #[serde(default = "SignalType::default_wire")]
    pub kind: SignalType,
    #[serde(default)]
    pub port: PortDirection,
    #[serde(default)]
    pub msb: u32,
    #[serde(default)]
    pub lsb: u32,
    /// Number of unpacked dimensions, zero for plain vectors.
    #[serde(default)]
    pub array_dimensions: u32,
    #[serde(default)]
    pub array_base: u32,
    /// One nexus per array word, `None` for words the elaborator did not connect.
    pub words: Vec<Option<Nexus>>,
    /// Whether this signal was synthesized by the elaborator instead of declared by the user.
    #[serde(default)]
    pub local: bool,
}

impl SignalInfo {
    pub fn width(&self) -> u32 {
        self.msb.abs_diff(self.lsb) + 1
    }

    pub fn is_arrayed(&self) -> bool {
        self.array_dimensions > 0
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SignalType {
    Reg,
    Wire,
    Tri,
    Tri0,
    Tri1,
    Triand,
    Trior,
    Uwire,
}

impl SignalType {
    fn default_wire() -> Self {
        SignalType::Wire
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Default, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PortDirection {
    #[default]
    None,
    Input,
    Output,
    Inout,
}

/// A logic gate. Pin 0 is the output of every gate, all other pins are inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogicInfo {
    pub kind: LogicKind,
    pub pins: Vec<Nexus>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LogicKind {
    And,
    Buf,
    Bufif0,
    Bufif1,
    Bufz,
    Cmos,
    Nand,
    Nmos,
    Nor,
    Not,
    Notif0,
    Notif1,
    Or,
    Pmos,
    Pulldown,
    Pullup,
    Rcmos,
    Rnmos,
    Rpmos,
    Udp,
    Xnor,
    Xor,
}

/// An arithmetic, comparison, selection or concatenation device.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LpmInfo {
    pub kind: LpmKind,
    /// Width of the output.
    pub width: u32,
    /// Output nexus.
    pub q: Nexus,
    #[serde(default)]
    pub data: Vec<Nexus>,
    #[serde(default)]
    pub select: Option<Nexus>,
    /// Constant base of a part select.
    #[serde(default)]
    pub base: u32,
    /// Non-constant base of a part select.
    #[serde(default)]
    pub base_nexus: Option<Nexus>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LpmKind {
    Abs,
    Add,
    Array,
    CastInt,
    CastInt2,
    CastReal,
    Concat,
    Concatz,
    CmpEeq,
    CmpEqx,
    CmpEqz,
    CmpEq,
    CmpGe,
    CmpGt,
    CmpNe,
    CmpNee,
    Divide,
    Ff,
    Mod,
    Mult,
    Mux,
    PartVp,
    PartPv,
    Pow,
    ReAnd,
    ReNand,
    ReNor,
    ReOr,
    ReXnor,
    ReXor,
    Repeat,
    Sfunc,
    Shiftl,
    Shiftr,
    SignExt,
    Sub,
    Substitute,
    Ufunc,
}

/// A constant net driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConstInfo {
    /// Value bits, most significant first, each one of `0`, `1`, `x`, `z`.
    pub bits: String,
    pub nexus: Nexus,
}

impl ConstInfo {
    pub fn width(&self) -> u32 {
        self.bits.len() as u32
    }
}

/// Connection point kinds this tool does not know how to traverse.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OtherDeviceInfo {
    pub kind: OtherDeviceKind,
    pub pins: Vec<Nexus>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OtherDeviceKind {
    Switch,
    Branch,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExprInfo {
    pub width: u32,
    pub kind: ExprKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum ExprKind {
    /// Literal bits, most significant first.
    Number {
        bits: String,
    },
    Signal {
        signal: NetSignal,
        #[serde(default)]
        word: Option<Expr>,
    },
    /// Part select of `base`, the low bit is at `offset`.
    Select {
        base: Expr,
        #[serde(default)]
        offset: Option<Expr>,
    },
    Unary {
        op: char,
        operand: Expr,
    },
    Binary {
        op: char,
        left: Expr,
        right: Expr,
    },
    Ternary {
        cond: Expr,
        if_true: Expr,
        if_false: Expr,
    },
    /// Operands are listed most significant first.
    Concat {
        parts: Vec<Expr>,
        #[serde(default = "default_repeat")]
        repeat: u32,
    },
    Unsupported(UnsupportedExprKind),
}

fn default_repeat() -> u32 {
    1
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UnsupportedExprKind {
    Array,
    ArrayPattern,
    Delay,
    Enumtype,
    Event,
    New,
    Null,
    Property,
    Real,
    Scope,
    Sfunc,
    Shallow,
    String,
    Ufunc,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StmtInfo {
    pub kind: StmtKind,
    #[serde(default)]
    pub loc: Option<SourceLoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum StmtKind {
    Noop,
    Assign {
        lvals: Vec<Lval>,
        rval: Expr,
    },
    AssignNb {
        lvals: Vec<Lval>,
        rval: Expr,
    },
    Condit {
        cond: Expr,
        #[serde(default)]
        if_true: Option<Stmt>,
        #[serde(default)]
        if_false: Option<Stmt>,
    },
    Wait {
        events: Vec<EventInfo>,
        #[serde(default)]
        body: Option<Stmt>,
    },
    Unsupported(UnsupportedStmtKind),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UnsupportedStmtKind {
    Alloc,
    Block,
    Case,
    Casex,
    Casez,
    Caser,
    Cassign,
    Contrib,
    Deassign,
    Delay,
    Delayx,
    Disable,
    DoWhile,
    Force,
    Forever,
    Fork,
    ForkJoinAny,
    ForkJoinNone,
    Free,
    Release,
    Repeat,
    Stask,
    Trigger,
    Utask,
    While,
}

/// Assignment target.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Lval {
    pub width: u32,
    pub target: LvalTarget,
    /// Offset of the lowest assigned bit, for part-select targets.
    #[serde(default)]
    pub part_offset: Option<Expr>,
    /// Word index, for memory targets.
    #[serde(default)]
    pub word: Option<Expr>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum LvalTarget {
    Signal(NetSignal),
    Nested(Box<Lval>),
}

/// One event of a wait statement, with the nexuses it is sensitive to per edge kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventInfo {
    #[serde(default)]
    pub pos: Vec<Nexus>,
    #[serde(default)]
    pub neg: Vec<Nexus>,
    #[serde(default)]
    pub any: Vec<Nexus>,
}

impl EventInfo {
    pub fn is_edge_sensitive(&self) -> bool {
        !self.pos.is_empty() || !self.neg.is_empty()
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EdgeKind {
    Pos,
    Neg,
    Any,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProcessInfo {
    pub kind: ProcessKind,
    pub scope: Scope,
    pub body: Stmt,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProcessKind {
    Initial,
    Always,
    AlwaysComb,
    AlwaysFf,
    AlwaysLatch,
    Final,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceLoc {
    pub file: PathBuf,
    pub line: u32,
}

impl std::fmt::Display for SourceLoc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.file.display(), self.line)
    }
}

/// Connection point on a nexus, derived while linking.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct NexusPtr {
    /// Pin of the object this pointer belongs to. For signals this is the array word.
    pub pin: u32,
    pub object: NexusObject,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum NexusObject {
    Signal(NetSignal),
    Logic(Logic),
    Lpm(Lpm),
    Constant(NetConst),
    Other(OtherDevice, OtherDeviceKind),
}

#[derive(Debug, Clone, Default)]
pub struct NexusInfo {
    pub ptrs: Vec<NexusPtr>,
}
