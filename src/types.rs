use serde::{Deserialize, Deserializer, Serialize};

//==============================================================================
// Cells
//==============================================================================

/// A single spreadsheet cell as seen by the extractor
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    /// Unset or blank
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
    /// Dates, durations and error values, kept in their text form
    Other(String),
}

impl Cell {
    /// Blank means unset, or text made only of whitespace.
    ///
    /// Stricter than a null check: a name cell holding only spaces is empty,
    /// so no record carries a whitespace-only amine or aldehyde name.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Text form of the cell, trimmed. Integral numbers print without a fraction.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Number(n) => format_cell_number(*n),
            Cell::Text(s) => s.trim().to_string(),
            Cell::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            Cell::Other(s) => s.trim().to_string(),
        }
    }

    /// Numeric coercion: anything that is not a finite number becomes `None`
    pub fn to_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) if n.is_finite() => Some(*n),
            Cell::Text(s) => parse_number(s),
            _ => None,
        }
    }
}

fn format_cell_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Parse trimmed text as a finite `f64`
pub fn parse_number(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

fn missing_or_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_number))
}

//==============================================================================
// Records
//==============================================================================

/// Per-column amine metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmineRecord {
    pub experiment_block: Option<String>,
    pub name: String,
    pub mw_g_mol: Option<f64>,
    pub actual_mass_g: Option<f64>,
    pub actual_conc_mm: Option<f64>,
    pub hmdso_mass_mg: Option<f64>,
    pub hmdso_conc_mm: Option<f64>,
}

/// One aldehyde stride within an amine column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AldehydeRecord {
    pub name: String,
    pub mw_g_mol: Option<f64>,
    pub actual_mass_mg: Option<f64>,
    pub vol_required_ul: Option<f64>,
    pub actual_conc_mm: Option<f64>,
    pub vol_amine_sol_ul: Option<f64>,
    pub amount_amine_mmol: Option<f64>,
    pub vol_aldehyde_sol_ul: Option<f64>,
    pub total_volume_ul: Option<f64>,
    pub amount_aldehyde_mmol: Option<f64>,
    pub amount_hmdso_mmol: Option<f64>,
}

/// One row of the reaction table: an amine joined with one of its aldehydes.
///
/// Field order and serialized names form the table schema consumed by the
/// SI generator; see [`crate::core::layout::RECORD_FIELDS`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionRecord {
    #[serde(rename = "Experiment_Block", default)]
    pub experiment_block: Option<String>,
    #[serde(rename = "Amine_Name")]
    pub amine_name: String,
    #[serde(rename = "Amine_MW_g_mol", deserialize_with = "missing_or_number", default)]
    pub amine_mw_g_mol: Option<f64>,
    #[serde(rename = "Actual_Mass_Amine_g", deserialize_with = "missing_or_number", default)]
    pub actual_mass_amine_g: Option<f64>,
    #[serde(rename = "Actual_Amine_Conc_mM", deserialize_with = "missing_or_number", default)]
    pub actual_amine_conc_mm: Option<f64>,
    #[serde(rename = "Actual_Mass_HMDSO_mg", deserialize_with = "missing_or_number", default)]
    pub actual_mass_hmdso_mg: Option<f64>,
    #[serde(rename = "Actual_Conc_HMDSO_mM", deserialize_with = "missing_or_number", default)]
    pub actual_conc_hmdso_mm: Option<f64>,
    #[serde(rename = "Aldehyde_Name")]
    pub aldehyde_name: String,
    #[serde(rename = "Aldehyde_MW_g_mol", deserialize_with = "missing_or_number", default)]
    pub aldehyde_mw_g_mol: Option<f64>,
    #[serde(rename = "Aldehyde_Actual_Mass_mg", deserialize_with = "missing_or_number", default)]
    pub aldehyde_actual_mass_mg: Option<f64>,
    #[serde(rename = "Aldehyde_Vol_Required_uL", deserialize_with = "missing_or_number", default)]
    pub aldehyde_vol_required_ul: Option<f64>,
    #[serde(rename = "Actual_Aldehyde_Conc_mM", deserialize_with = "missing_or_number", default)]
    pub actual_aldehyde_conc_mm: Option<f64>,
    #[serde(rename = "Vol_Amine_Sol_uL", deserialize_with = "missing_or_number", default)]
    pub vol_amine_sol_ul: Option<f64>,
    #[serde(rename = "Amount_Amine_mmol", deserialize_with = "missing_or_number", default)]
    pub amount_amine_mmol: Option<f64>,
    #[serde(rename = "Vol_Aldehyde_Sol_uL", deserialize_with = "missing_or_number", default)]
    pub vol_aldehyde_sol_ul: Option<f64>,
    #[serde(rename = "Total_Volume_uL", deserialize_with = "missing_or_number", default)]
    pub total_volume_ul: Option<f64>,
    #[serde(rename = "Amount_Aldehyde_mmol", deserialize_with = "missing_or_number", default)]
    pub amount_aldehyde_mmol: Option<f64>,
    #[serde(rename = "Amount_HMDSO_mmol", deserialize_with = "missing_or_number", default)]
    pub amount_hmdso_mmol: Option<f64>,
}

impl ReactionRecord {
    /// Flatten an amine and one of its aldehyde strides into a table row
    pub fn join(amine: &AmineRecord, aldehyde: AldehydeRecord) -> Self {
        Self {
            experiment_block: amine.experiment_block.clone(),
            amine_name: amine.name.clone(),
            amine_mw_g_mol: amine.mw_g_mol,
            actual_mass_amine_g: amine.actual_mass_g,
            actual_amine_conc_mm: amine.actual_conc_mm,
            actual_mass_hmdso_mg: amine.hmdso_mass_mg,
            actual_conc_hmdso_mm: amine.hmdso_conc_mm,
            aldehyde_name: aldehyde.name,
            aldehyde_mw_g_mol: aldehyde.mw_g_mol,
            aldehyde_actual_mass_mg: aldehyde.actual_mass_mg,
            aldehyde_vol_required_ul: aldehyde.vol_required_ul,
            actual_aldehyde_conc_mm: aldehyde.actual_conc_mm,
            vol_amine_sol_ul: aldehyde.vol_amine_sol_ul,
            amount_amine_mmol: aldehyde.amount_amine_mmol,
            vol_aldehyde_sol_ul: aldehyde.vol_aldehyde_sol_ul,
            total_volume_ul: aldehyde.total_volume_ul,
            amount_aldehyde_mmol: aldehyde.amount_aldehyde_mmol,
            amount_hmdso_mmol: aldehyde.amount_hmdso_mmol,
        }
    }

    /// The amine half of the row
    pub fn amine(&self) -> AmineRecord {
        AmineRecord {
            experiment_block: self.experiment_block.clone(),
            name: self.amine_name.clone(),
            mw_g_mol: self.amine_mw_g_mol,
            actual_mass_g: self.actual_mass_amine_g,
            actual_conc_mm: self.actual_amine_conc_mm,
            hmdso_mass_mg: self.actual_mass_hmdso_mg,
            hmdso_conc_mm: self.actual_conc_hmdso_mm,
        }
    }

    /// Numeric fields in table order, paired with their column names
    pub fn numeric_fields(&self) -> [(&'static str, Option<f64>); 15] {
        [
            ("Amine_MW_g_mol", self.amine_mw_g_mol),
            ("Actual_Mass_Amine_g", self.actual_mass_amine_g),
            ("Actual_Amine_Conc_mM", self.actual_amine_conc_mm),
            ("Actual_Mass_HMDSO_mg", self.actual_mass_hmdso_mg),
            ("Actual_Conc_HMDSO_mM", self.actual_conc_hmdso_mm),
            ("Aldehyde_MW_g_mol", self.aldehyde_mw_g_mol),
            ("Aldehyde_Actual_Mass_mg", self.aldehyde_actual_mass_mg),
            ("Aldehyde_Vol_Required_uL", self.aldehyde_vol_required_ul),
            ("Actual_Aldehyde_Conc_mM", self.actual_aldehyde_conc_mm),
            ("Vol_Amine_Sol_uL", self.vol_amine_sol_ul),
            ("Amount_Amine_mmol", self.amount_amine_mmol),
            ("Vol_Aldehyde_Sol_uL", self.vol_aldehyde_sol_ul),
            ("Total_Volume_uL", self.total_volume_ul),
            ("Amount_Aldehyde_mmol", self.amount_aldehyde_mmol),
            ("Amount_HMDSO_mmol", self.amount_hmdso_mmol),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_blank() {
        assert!(Cell::Empty.is_blank());
        assert!(Cell::Text("   ".to_string()).is_blank());
        assert!(!Cell::Text("AmineA".to_string()).is_blank());
        assert!(!Cell::Number(0.0).is_blank());
        assert!(!Cell::Bool(false).is_blank());
    }

    #[test]
    fn test_cell_as_text() {
        assert_eq!(Cell::Number(1.0).as_text(), "1");
        assert_eq!(Cell::Number(2.5).as_text(), "2.5");
        assert_eq!(Cell::Text("  AmineA ".to_string()).as_text(), "AmineA");
        assert_eq!(Cell::Empty.as_text(), "");
    }

    #[test]
    fn test_cell_to_number() {
        assert_eq!(Cell::Number(101.19).to_number(), Some(101.19));
        assert_eq!(Cell::Text(" 12.5 ".to_string()).to_number(), Some(12.5));
        assert_eq!(Cell::Text("n/a".to_string()).to_number(), None);
        assert_eq!(Cell::Text("nan".to_string()).to_number(), None);
        assert_eq!(Cell::Text("inf".to_string()).to_number(), None);
        assert_eq!(Cell::Bool(true).to_number(), None);
        assert_eq!(Cell::Other("2024-01-01".to_string()).to_number(), None);
        assert_eq!(Cell::Empty.to_number(), None);
        assert_eq!(Cell::Number(f64::NAN).to_number(), None);
    }

    #[test]
    fn test_join_then_amine_roundtrips_amine_half() {
        let amine = AmineRecord {
            experiment_block: Some("1".to_string()),
            name: "Benzylamine".to_string(),
            mw_g_mol: Some(107.15),
            actual_mass_g: Some(53.6),
            actual_conc_mm: Some(50.0),
            hmdso_mass_mg: Some(8.1),
            hmdso_conc_mm: None,
        };
        let aldehyde = AldehydeRecord {
            name: "Benzaldehyde".to_string(),
            mw_g_mol: Some(106.12),
            actual_mass_mg: None,
            vol_required_ul: None,
            actual_conc_mm: None,
            vol_amine_sol_ul: None,
            amount_amine_mmol: None,
            vol_aldehyde_sol_ul: None,
            total_volume_ul: None,
            amount_aldehyde_mmol: None,
            amount_hmdso_mmol: Some(0.002),
        };

        let record = ReactionRecord::join(&amine, aldehyde);
        assert_eq!(record.amine(), amine);
        assert_eq!(record.aldehyde_name, "Benzaldehyde");
        assert_eq!(record.amount_hmdso_mmol, Some(0.002));
    }
}
