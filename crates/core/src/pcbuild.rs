//! PC-builder compatibility rule engine.
//!
//! Evaluates a hypothetical build assembled from catalog components and
//! flags rule-based incompatibilities: CPU/mainboard socket, cooler socket
//! support, RAM generation, case/mainboard form factor, and PSU headroom.
//!
//! The engine is pure and stateless: callers (the API layer) extract
//! [`ComponentProfile`]s from denormalized product specification strings
//! and pass them in. Fields that are absent or unparseable are `None` and
//! simply opt out of the rules that need them; the checker never guesses.

use serde::{Deserialize, Serialize};

/// Extra PSU capacity expected on top of the estimated draw, in percent.
pub const PSU_HEADROOM_PERCENT: u32 = 30;

/// The component slots the builder understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    Cpu,
    Motherboard,
    Ram,
    Gpu,
    Psu,
    Case,
    Storage,
    Cooler,
}

impl ComponentKind {
    /// Stable wire/database representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cpu => "cpu",
            Self::Motherboard => "motherboard",
            Self::Ram => "ram",
            Self::Gpu => "gpu",
            Self::Psu => "psu",
            Self::Case => "case",
            Self::Storage => "storage",
            Self::Cooler => "cooler",
        }
    }
}

impl std::str::FromStr for ComponentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cpu" => Ok(Self::Cpu),
            "motherboard" => Ok(Self::Motherboard),
            "ram" => Ok(Self::Ram),
            "gpu" => Ok(Self::Gpu),
            "psu" => Ok(Self::Psu),
            "case" => Ok(Self::Case),
            "storage" => Ok(Self::Storage),
            "cooler" => Ok(Self::Cooler),
            _ => Err(format!("invalid component kind: {s}")),
        }
    }
}

/// RAM generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MemoryType {
    Ddr3,
    Ddr4,
    Ddr5,
}

impl MemoryType {
    /// Find a memory generation mentioned anywhere in a spec string,
    /// e.g. `"2x16GB DDR5 6000MHz"`.
    #[must_use]
    pub fn find_in(text: &str) -> Option<Self> {
        let upper = text.to_uppercase();
        // DDR5 before DDR4 before DDR3: longest token wins on strings
        // like "DDR5 (khong ho tro DDR4)".
        if upper.contains("DDR5") {
            Some(Self::Ddr5)
        } else if upper.contains("DDR4") {
            Some(Self::Ddr4)
        } else if upper.contains("DDR3") {
            Some(Self::Ddr3)
        } else {
            None
        }
    }
}

impl std::fmt::Display for MemoryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ddr3 => f.write_str("DDR3"),
            Self::Ddr4 => f.write_str("DDR4"),
            Self::Ddr5 => f.write_str("DDR5"),
        }
    }
}

/// Mainboard / case form factor, ordered from smallest to largest.
///
/// A case hosts a board when the case's supported size is at least the
/// board's size (standard tower convention: an ATX case takes mATX and
/// ITX boards, not the other way around).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormFactor {
    MiniItx,
    MicroAtx,
    Atx,
    Eatx,
}

impl FormFactor {
    /// Find a form factor mentioned anywhere in a spec string.
    #[must_use]
    pub fn find_in(text: &str) -> Option<Self> {
        let upper = text.to_uppercase();
        // Match the most specific token first: "MICRO-ATX" contains "ATX".
        if upper.contains("E-ATX") || upper.contains("EATX") {
            Some(Self::Eatx)
        } else if upper.contains("MICRO") || upper.contains("MATX") || upper.contains("M-ATX") {
            Some(Self::MicroAtx)
        } else if upper.contains("ITX") {
            Some(Self::MiniItx)
        } else if upper.contains("ATX") {
            Some(Self::Atx)
        } else {
            None
        }
    }

    /// Whether a chassis of this size can host a board of size `board`.
    #[must_use]
    pub fn hosts(self, board: Self) -> bool {
        self >= board
    }
}

impl std::fmt::Display for FormFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MiniItx => f.write_str("Mini-ITX"),
            Self::MicroAtx => f.write_str("Micro-ATX"),
            Self::Atx => f.write_str("ATX"),
            Self::Eatx => f.write_str("E-ATX"),
        }
    }
}

/// Denormalized compatibility data for one selected component.
///
/// Only the fields relevant to the component's kind are expected to be
/// set; everything else stays `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentProfile {
    pub kind: ComponentKind,
    /// Display name used in issue messages.
    pub name: String,
    /// CPU/mainboard socket, e.g. `LGA1700`, `AM5`.
    #[serde(default)]
    pub socket: Option<String>,
    /// Sockets a cooler ships mounting kits for.
    #[serde(default)]
    pub supported_sockets: Vec<String>,
    /// RAM generation (RAM sticks and mainboards).
    #[serde(default)]
    pub memory_type: Option<MemoryType>,
    /// Board size (mainboards) or largest supported board size (cases).
    #[serde(default)]
    pub form_factor: Option<FormFactor>,
    /// Rated capacity in watts (PSUs only).
    #[serde(default)]
    pub wattage: Option<u32>,
    /// Estimated draw in watts (CPU TDP, GPU board power, ...).
    #[serde(default)]
    pub power_draw: Option<u32>,
}

impl ComponentProfile {
    /// An empty profile for the given slot.
    #[must_use]
    pub fn new(kind: ComponentKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            socket: None,
            supported_sockets: Vec::new(),
            memory_type: None,
            form_factor: None,
            wattage: None,
            power_draw: None,
        }
    }
}

/// How severe an issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// The build will not work; the report is marked incompatible.
    Blocking,
    /// The build works but is not advisable (e.g. thin PSU headroom).
    Warning,
}

/// Machine-readable rule identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCode {
    SocketMismatch,
    CoolerSocketUnsupported,
    MemoryTypeMismatch,
    FormFactorMismatch,
    PsuUnderpowered,
    PsuLowHeadroom,
}

/// A single detected incompatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Incompatibility {
    pub severity: Severity,
    pub code: RuleCode,
    /// Vietnamese message shown in the builder UI.
    pub message: String,
    /// Names of the components involved.
    pub components: Vec<String>,
}

/// Result of evaluating a build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildReport {
    /// True when no blocking issue was found.
    pub compatible: bool,
    pub issues: Vec<Incompatibility>,
    /// Sum of the known power draws, in watts.
    pub estimated_draw_w: u32,
    /// Draw plus [`PSU_HEADROOM_PERCENT`] headroom, rounded up.
    pub recommended_psu_w: u32,
}

fn normalize_socket(socket: &str) -> String {
    socket
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect::<String>()
        .to_uppercase()
}

fn find<'a>(components: &'a [ComponentProfile], kind: ComponentKind) -> Option<&'a ComponentProfile> {
    components.iter().find(|c| c.kind == kind)
}

/// Evaluate a build and report every incompatibility found.
///
/// Rules only fire when both sides of a comparison are present: a lone CPU
/// is a compatible (if useless) build, and a mainboard without a published
/// memory type cannot conflict with any RAM stick.
#[must_use]
pub fn evaluate(components: &[ComponentProfile]) -> BuildReport {
    let mut issues = Vec::new();

    let cpu = find(components, ComponentKind::Cpu);
    let board = find(components, ComponentKind::Motherboard);
    let case = find(components, ComponentKind::Case);
    let psu = find(components, ComponentKind::Psu);
    let cooler = find(components, ComponentKind::Cooler);

    // CPU socket must match the mainboard socket.
    if let (Some(cpu), Some(board)) = (cpu, board)
        && let (Some(cpu_socket), Some(board_socket)) = (&cpu.socket, &board.socket)
        && normalize_socket(cpu_socket) != normalize_socket(board_socket)
    {
        issues.push(Incompatibility {
            severity: Severity::Blocking,
            code: RuleCode::SocketMismatch,
            message: format!(
                "{} (socket {cpu_socket}) không tương thích với {} (socket {board_socket})",
                cpu.name, board.name
            ),
            components: vec![cpu.name.clone(), board.name.clone()],
        });
    }

    // The cooler must ship a mounting kit for the CPU socket.
    if let (Some(cpu), Some(cooler)) = (cpu, cooler)
        && let Some(cpu_socket) = &cpu.socket
        && !cooler.supported_sockets.is_empty()
    {
        let wanted = normalize_socket(cpu_socket);
        let supported = cooler
            .supported_sockets
            .iter()
            .any(|s| normalize_socket(s) == wanted);
        if !supported {
            issues.push(Incompatibility {
                severity: Severity::Blocking,
                code: RuleCode::CoolerSocketUnsupported,
                message: format!(
                    "{} không hỗ trợ socket {cpu_socket} của {}",
                    cooler.name, cpu.name
                ),
                components: vec![cooler.name.clone(), cpu.name.clone()],
            });
        }
    }

    // Every RAM stick must match the mainboard memory generation.
    if let Some(board) = board
        && let Some(board_mem) = board.memory_type
    {
        for ram in components
            .iter()
            .filter(|c| c.kind == ComponentKind::Ram)
        {
            if let Some(ram_mem) = ram.memory_type
                && ram_mem != board_mem
            {
                issues.push(Incompatibility {
                    severity: Severity::Blocking,
                    code: RuleCode::MemoryTypeMismatch,
                    message: format!(
                        "{} ({ram_mem}) không tương thích với {} ({board_mem})",
                        ram.name, board.name
                    ),
                    components: vec![ram.name.clone(), board.name.clone()],
                });
            }
        }
    }

    // The case must be able to host the mainboard form factor.
    if let (Some(case), Some(board)) = (case, board)
        && let (Some(case_ff), Some(board_ff)) = (case.form_factor, board.form_factor)
        && !case_ff.hosts(board_ff)
    {
        issues.push(Incompatibility {
            severity: Severity::Blocking,
            code: RuleCode::FormFactorMismatch,
            message: format!(
                "{} (tối đa {case_ff}) không chứa được bo mạch chủ {} ({board_ff})",
                case.name, board.name
            ),
            components: vec![case.name.clone(), board.name.clone()],
        });
    }

    // PSU capacity versus estimated draw.
    let estimated_draw_w: u32 = components.iter().filter_map(|c| c.power_draw).sum();
    let recommended_psu_w = estimated_draw_w
        .saturating_mul(100 + PSU_HEADROOM_PERCENT)
        .div_ceil(100);

    if let Some(psu) = psu
        && let Some(capacity) = psu.wattage
        && estimated_draw_w > 0
    {
        if capacity < estimated_draw_w {
            issues.push(Incompatibility {
                severity: Severity::Blocking,
                code: RuleCode::PsuUnderpowered,
                message: format!(
                    "{} ({capacity}W) không đủ công suất cho cấu hình (ước tính {estimated_draw_w}W)",
                    psu.name
                ),
                components: vec![psu.name.clone()],
            });
        } else if capacity < recommended_psu_w {
            issues.push(Incompatibility {
                severity: Severity::Warning,
                code: RuleCode::PsuLowHeadroom,
                message: format!(
                    "{} ({capacity}W) hơi thấp, nên dùng nguồn từ {recommended_psu_w}W trở lên",
                    psu.name
                ),
                components: vec![psu.name.clone()],
            });
        }
    }

    let compatible = !issues.iter().any(|i| i.severity == Severity::Blocking);
    BuildReport {
        compatible,
        issues,
        estimated_draw_w,
        recommended_psu_w,
    }
}
