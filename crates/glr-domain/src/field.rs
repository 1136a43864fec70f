//! Field module - the fixed list of data points pulled from field reports

use std::fmt;

/// One named data point the pipeline must locate in the evidence
///
/// The list is fixed at compile time. Declaration order is the order used
/// in prompts, tables and JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExtractionField {
    /// Name of the insured party
    InsuredName,
    /// Insured home street address
    InsuredHStreet,
    /// Insured home city
    InsuredHCity,
    /// Insured home state
    InsuredHState,
    /// Insured home ZIP code
    InsuredHZip,
    /// Date of loss
    DateLoss,
    /// Date the property was inspected
    DateInspected,
    /// Date the claim was received
    DateReceived,
    /// Type-of-loss code
    TolCode,
    /// Mortgagee named on the policy
    Mortgagee,
    /// Mortgage company
    MortgageCo,
    /// Carrier claim number
    ClaimNumber,
    /// Policy number
    PolicyNumber,
    /// Short description of the dwelling
    DwellingDescription,
    /// Dwelling damage narrative
    DwellingNarrative,
    /// Other structures narrative
    OtherStructuresNarrative,
    /// Fencing narrative
    FencingNarrative,
    /// Contents narrative
    ContentsNarrative,
    /// Supplement narrative
    SupplementNarrative,
    /// Prior losses narrative
    PriorsNarrative,
    /// Code upgrade items narrative
    CodeItemsNarrative,
    /// Overhead and profit narrative
    OpNarrative,
    /// MICA narrative
    MicaNarrative,
    /// Mortgage information narrative
    MortgageInfoNarrative,
    /// Cause and origin narrative
    CauseOriginNarrative,
    /// Subrogation narrative
    SubrogationNarrative,
    /// Salvage narrative
    SalvageNarrative,
}

impl ExtractionField {
    /// Every field, in declaration order
    pub const ALL: [ExtractionField; 27] = [
        ExtractionField::InsuredName,
        ExtractionField::InsuredHStreet,
        ExtractionField::InsuredHCity,
        ExtractionField::InsuredHState,
        ExtractionField::InsuredHZip,
        ExtractionField::DateLoss,
        ExtractionField::DateInspected,
        ExtractionField::DateReceived,
        ExtractionField::TolCode,
        ExtractionField::Mortgagee,
        ExtractionField::MortgageCo,
        ExtractionField::ClaimNumber,
        ExtractionField::PolicyNumber,
        ExtractionField::DwellingDescription,
        ExtractionField::DwellingNarrative,
        ExtractionField::OtherStructuresNarrative,
        ExtractionField::FencingNarrative,
        ExtractionField::ContentsNarrative,
        ExtractionField::SupplementNarrative,
        ExtractionField::PriorsNarrative,
        ExtractionField::CodeItemsNarrative,
        ExtractionField::OpNarrative,
        ExtractionField::MicaNarrative,
        ExtractionField::MortgageInfoNarrative,
        ExtractionField::CauseOriginNarrative,
        ExtractionField::SubrogationNarrative,
        ExtractionField::SalvageNarrative,
    ];

    /// Get the wire name of the field (the JSON key and placeholder name)
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionField::InsuredName => "INSURED_NAME",
            ExtractionField::InsuredHStreet => "INSURED_H_STREET",
            ExtractionField::InsuredHCity => "INSURED_H_CITY",
            ExtractionField::InsuredHState => "INSURED_H_STATE",
            ExtractionField::InsuredHZip => "INSURED_H_ZIP",
            ExtractionField::DateLoss => "DATE_LOSS",
            ExtractionField::DateInspected => "DATE_INSPECTED",
            ExtractionField::DateReceived => "DATE_RECEIVED",
            ExtractionField::TolCode => "TOL_CODE",
            ExtractionField::Mortgagee => "MORTGAGEE",
            ExtractionField::MortgageCo => "MORTGAGE_CO",
            ExtractionField::ClaimNumber => "CLAIM_NUMBER",
            ExtractionField::PolicyNumber => "POLICY_NUMBER",
            ExtractionField::DwellingDescription => "DWELLING_DESCRIPTION",
            ExtractionField::DwellingNarrative => "DWELLING_NARRATIVE",
            ExtractionField::OtherStructuresNarrative => "OTHER_STRUCTURES_NARRATIVE",
            ExtractionField::FencingNarrative => "FENCING_NARRATIVE",
            ExtractionField::ContentsNarrative => "CONTENTS_NARRATIVE",
            ExtractionField::SupplementNarrative => "SUPPLEMENT_NARRATIVE",
            ExtractionField::PriorsNarrative => "PRIORS_NARRATIVE",
            ExtractionField::CodeItemsNarrative => "CODE_ITEMS_NARRATIVE",
            ExtractionField::OpNarrative => "OP_NARRATIVE",
            ExtractionField::MicaNarrative => "MICA_NARRATIVE",
            ExtractionField::MortgageInfoNarrative => "MORTGAGE_INFO_NARRATIVE",
            ExtractionField::CauseOriginNarrative => "CAUSE_ORIGIN_NARRATIVE",
            ExtractionField::SubrogationNarrative => "SUBROGATION_NARRATIVE",
            ExtractionField::SalvageNarrative => "SALVAGE_NARRATIVE",
        }
    }

    /// Parse a field from its wire name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.as_str().eq_ignore_ascii_case(wanted))
    }

    /// Whether the template filler should write prose for this field
    pub fn is_narrative(&self) -> bool {
        self.as_str().ends_with("_NARRATIVE")
    }

    /// The placeholder token for this field in a template, e.g. `[DATE_LOSS]`
    pub fn placeholder(&self) -> String {
        format!("[{}]", self.as_str())
    }
}

impl fmt::Display for ExtractionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ExtractionField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Unknown extraction field: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<_> = ExtractionField::ALL.iter().map(|f| f.as_str()).collect();
        assert_eq!(names.len(), ExtractionField::ALL.len());
    }

    #[test]
    fn test_parse_round_trip() {
        for field in ExtractionField::ALL {
            assert_eq!(ExtractionField::parse(field.as_str()), Some(field));
        }
        assert_eq!(ExtractionField::parse("date_loss"), Some(ExtractionField::DateLoss));
        assert_eq!(ExtractionField::parse("NOT_A_FIELD"), None);
    }

    #[test]
    fn test_narrative_fields() {
        assert!(ExtractionField::DwellingNarrative.is_narrative());
        assert!(ExtractionField::SalvageNarrative.is_narrative());
        assert!(!ExtractionField::DwellingDescription.is_narrative());
        assert!(!ExtractionField::InsuredName.is_narrative());

        let narratives = ExtractionField::ALL.iter().filter(|f| f.is_narrative()).count();
        assert_eq!(narratives, 13);
    }

    #[test]
    fn test_placeholder() {
        assert_eq!(ExtractionField::DateLoss.placeholder(), "[DATE_LOSS]");
    }

    #[test]
    fn test_order_matches_declaration() {
        assert_eq!(ExtractionField::ALL[0], ExtractionField::InsuredName);
        assert_eq!(ExtractionField::ALL[26], ExtractionField::SalvageNarrative);
        assert!(ExtractionField::InsuredName < ExtractionField::SalvageNarrative);
    }
}
