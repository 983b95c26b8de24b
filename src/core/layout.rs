//! Fixed positions of the Recipes sheet
//!
//! Every field of the reaction table is read from a fixed place: amine fields
//! from absolute rows of the amine's column, aldehyde fields from offsets
//! relative to the base row of their 15-row stride.

/// Substrings of the amine-name cell that mark a solvent/control column.
///
/// Only markers observed in real planners are listed; whether this covers
/// every sheet in circulation is not known.
pub const SOLVENT_MARKERS: &[&str] = &["MeCN"];

/// Substrings of a stride's name cell that mark a repeated label row
pub const HEADER_MARKERS: &[&str] = &["Molecular wt"];

/// Text form a missing amine name takes when the planner was round-tripped
/// through another tool
pub const MISSING_SENTINEL: &str = "nan";

/// Where a field of the reaction table comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Absolute row of the amine column, forward-filled across columns
    BlockRow(usize),
    /// Absolute row of the amine column
    Row(usize),
    /// Offset from the base row of an aldehyde stride
    StrideOffset(usize),
}

/// A named field of the reaction table and its source position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSource {
    pub name: &'static str,
    pub position: Position,
}

const fn field(name: &'static str, position: Position) -> FieldSource {
    FieldSource { name, position }
}

/// Absolute rows of the per-column amine fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmineRows {
    pub block: usize,
    pub name: usize,
    pub mw: usize,
    pub actual_mass: usize,
    pub actual_conc: usize,
    pub hmdso_mass: usize,
    pub hmdso_conc: usize,
}

/// Offsets of the aldehyde fields from the base row of a stride
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AldehydeOffsets {
    pub name: usize,
    pub mw: usize,
    pub actual_mass: usize,
    pub vol_required: usize,
    pub actual_conc: usize,
    pub vol_amine_sol: usize,
    pub amount_amine: usize,
    pub vol_aldehyde_sol: usize,
    pub total_volume: usize,
    pub amount_aldehyde: usize,
    pub amount_hmdso: usize,
}

/// Sheet geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Column 0 holds row labels; data columns start here
    pub first_column: usize,
    pub amine: AmineRows,
    /// Base row of the first aldehyde stride
    pub first_stride_row: usize,
    pub stride_height: usize,
    pub max_strides: usize,
    pub aldehyde: AldehydeOffsets,
}

impl Layout {
    /// The reaction planner's Recipes sheet
    pub const RECIPES: Layout = Layout {
        first_column: 1,
        amine: AmineRows {
            block: 0,
            name: 1,
            mw: 3,
            actual_mass: 7,
            actual_conc: 8,
            hmdso_mass: 11,
            hmdso_conc: 12,
        },
        first_stride_row: 13,
        stride_height: 15,
        max_strides: 20,
        aldehyde: AldehydeOffsets {
            name: 0,
            mw: 2,
            actual_mass: 6,
            vol_required: 7,
            actual_conc: 8,
            vol_amine_sol: 9,
            amount_amine: 10,
            vol_aldehyde_sol: 11,
            total_volume: 12,
            amount_aldehyde: 13,
            amount_hmdso: 14,
        },
    };

    /// Base row of stride `index`
    pub const fn stride_row(&self, index: usize) -> usize {
        self.first_stride_row + index * self.stride_height
    }

    /// Output schema: every table column in order, with its source position
    pub const fn fields(&self) -> [FieldSource; 18] {
        let a = &self.amine;
        let d = &self.aldehyde;
        [
            field("Experiment_Block", Position::BlockRow(a.block)),
            field("Amine_Name", Position::Row(a.name)),
            field("Amine_MW_g_mol", Position::Row(a.mw)),
            field("Actual_Mass_Amine_g", Position::Row(a.actual_mass)),
            field("Actual_Amine_Conc_mM", Position::Row(a.actual_conc)),
            field("Actual_Mass_HMDSO_mg", Position::Row(a.hmdso_mass)),
            field("Actual_Conc_HMDSO_mM", Position::Row(a.hmdso_conc)),
            field("Aldehyde_Name", Position::StrideOffset(d.name)),
            field("Aldehyde_MW_g_mol", Position::StrideOffset(d.mw)),
            field("Aldehyde_Actual_Mass_mg", Position::StrideOffset(d.actual_mass)),
            field("Aldehyde_Vol_Required_uL", Position::StrideOffset(d.vol_required)),
            field("Actual_Aldehyde_Conc_mM", Position::StrideOffset(d.actual_conc)),
            field("Vol_Amine_Sol_uL", Position::StrideOffset(d.vol_amine_sol)),
            field("Amount_Amine_mmol", Position::StrideOffset(d.amount_amine)),
            field("Vol_Aldehyde_Sol_uL", Position::StrideOffset(d.vol_aldehyde_sol)),
            field("Total_Volume_uL", Position::StrideOffset(d.total_volume)),
            field("Amount_Aldehyde_mmol", Position::StrideOffset(d.amount_aldehyde)),
            field("Amount_HMDSO_mmol", Position::StrideOffset(d.amount_hmdso)),
        ]
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::RECIPES
    }
}

/// Reaction table schema of the Recipes sheet
pub const RECORD_FIELDS: [FieldSource; 18] = Layout::RECIPES.fields();

/// Column names of the reaction table, in order
pub fn field_names() -> Vec<&'static str> {
    RECORD_FIELDS.iter().map(|f| f.name).collect()
}

/// True when the amine-name text marks a solvent or control column
pub fn is_solvent_column(name: &str) -> bool {
    SOLVENT_MARKERS.iter().any(|marker| name.contains(marker))
}

/// True when a stride's name cell is a repeated label row rather than data
pub fn is_header_row(name: &str) -> bool {
    HEADER_MARKERS.iter().any(|marker| name.contains(marker))
}
