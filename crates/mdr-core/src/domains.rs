//! Built-in SDTM domain-code table
//!
//! Used as the default `domains` entry of [`crate::config::MdrConfig`].
//! Deployments can replace or extend it from the configuration file.

/// `(domain prefix, domain name)` pairs, sorted by prefix
pub const DEFAULT_DOMAINS: &[(&str, &str)] = &[
    ("AD", "Analysis Dataset"),
    ("AE", "Adverse Events"),
    ("AG", "Procedure Agents"),
    ("AU", "Autopsy"),
    ("AX", "Non-Compliant ADaM Datasets"),
    ("BE", "Biospecimen Events"),
    ("BM", "Bone Measurements"),
    ("BR", "Biopsy"),
    ("BS", "Biospecimen"),
    ("CE", "Clinical Events"),
    ("CM", "Concomitant Meds"),
    ("CO", "Comments"),
    ("CV", "Cardiovascular System Findings"),
    ("DA", "Drug Accountability"),
    ("DD", "Death Diagnosis"),
    ("DE", "Device Events"),
    ("DI", "Device Identifiers"),
    ("DM", "Demographics"),
    ("DO", "Device Properties"),
    ("DP", "Developmental Milestone"),
    ("DR", "Device to Subject Relationship"),
    ("DS", "Disposition"),
    ("DT", "Device Tracking and Disposition"),
    ("DU", "Device-In-Use"),
    ("DV", "Protocol Deviations"),
    ("DX", "Device Exposure"),
    ("ED", "Endocrine System Findings"),
    ("EG", "Electrocardiogram"),
    ("EX", "Exposure"),
    ("FA", "Findings About Events or Interventions"),
    ("FH", "Family History"),
    ("FT", "Functional Tests"),
    ("GI", "Gastrointestinal System Findings"),
    ("HM", "Hematopoietic System Findings"),
    ("HO", "Healthcare Encounters"),
    ("HU", "Healthcare Resource Utilization"),
    ("IE", "Inclusion/Exclusion"),
    ("IG", "Integumentary System Findings"),
    ("IM", "Immune System Findings"),
    ("IS", "Immunogenicity Specimen Assessments"),
    ("LB", "Laboratory Data"),
    ("MB", "Microbiology"),
    ("MH", "Medical History"),
    ("MI", "Microscopic Findings"),
    ("MK", "Musculoskeletal Findings, Connective and Soft Tissue Findings"),
    ("ML", "Meal Data"),
    ("MO", "Morphology Findings"),
    ("MS", "Microbiology Susceptibility"),
    ("NV", "Nervous System Findings"),
    ("PB", "Pharmacogenomics Biomarker"),
    ("PC", "Pharmacokinetic Concentration"),
    ("PE", "Physical Exam"),
    ("PF", "Pharmacogenomics Findings"),
    ("PG", "Pharmacogenomics/Genetics Methods and Supporting Information"),
    ("PP", "Pharmacokinetic Parameters"),
    ("PR", "Procedure"),
    ("PS", "Protocol Summary for PGx"),
    ("PT", "Pharmacogenomics Trial Characteristics"),
    ("QS", "Questionnaires"),
    ("RE", "Respiratory System Findings"),
    ("RP", "Reproductive System Findings"),
    ("RS", "Disease Response"),
    ("SB", "Subject Biomarker"),
    ("SC", "Subject Characteristics"),
    ("SE", "Subject Element"),
    ("SG", "Surgery"),
    ("SK", "Skin Test"),
    ("SL", "Sleep Polysomnography Data"),
    ("SR", "Skin Response"),
    ("SU", "Substance Use"),
    ("SV", "Subject Visits"),
    ("TA", "Trial Arms"),
    ("TE", "Trial Elements"),
    ("TF", "Tumor Findings"),
    ("TI", "Trial Inclusion/Exclusion Criteria"),
    ("TP", "Trial Paths"),
    ("TR", "Tumor Results"),
    ("TS", "Trial Summary"),
    ("TU", "Tumor Identifier"),
    ("TV", "Trial Visits"),
    ("TX", "Trial Sets"),
    ("UR", "Urinary System Findings"),
    ("VR", "Viral Resistance Findings"),
    ("VS", "Vital Signs"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_domains_sorted_and_unique() {
        let prefixes: Vec<&str> = DEFAULT_DOMAINS.iter().map(|(p, _)| *p).collect();
        let mut sorted = prefixes.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(prefixes, sorted);
    }

    #[test]
    fn test_default_domains_contains_common_codes() {
        assert!(DEFAULT_DOMAINS.contains(&("VS", "Vital Signs")));
        assert!(DEFAULT_DOMAINS.contains(&("DM", "Demographics")));
    }
}
