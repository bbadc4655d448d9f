//! Department context lookup.
//!
//! Maps a department name to a short description of its domain, appended to
//! the use-case instruction. Lookup never fails: exact key, then substring
//! containment, then a generic description.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct DepartmentProfile {
    /// Display name; also the canonical value for the enumerated variant.
    pub name: &'static str,
    #[serde(skip)]
    pub keys: &'static [&'static str],
    pub context: &'static str,
}

/// Containment matching ignores keys and inputs shorter than this, so that
/// aliases like "it" or "hr" never match inside unrelated words.
const MIN_CONTAINMENT_LEN: usize = 3;

pub const GENERIC_CONTEXT: &str = "A business department looking for practical ways to \
    apply generative AI to everyday work: drafting and summarising documents, answering \
    recurring questions, analysing data, and automating repetitive steps.";

pub const DEPARTMENTS: &[DepartmentProfile] = &[
    DepartmentProfile {
        name: "Marketing",
        keys: &["marketing"],
        context: "Campaign planning, content creation, brand voice, audience segmentation, \
            SEO, social media, and measuring campaign performance.",
    },
    DepartmentProfile {
        name: "Sales",
        keys: &["sales"],
        context: "Lead qualification, prospect research, outreach emails, proposals, \
            pipeline forecasting, and CRM hygiene.",
    },
    DepartmentProfile {
        name: "Human Resources",
        keys: &["human resources", "hr", "people"],
        context: "Recruiting, job descriptions, candidate screening, onboarding, policy \
            questions, performance reviews, and employee engagement.",
    },
    DepartmentProfile {
        name: "Finance",
        keys: &["finance", "accounting"],
        context: "Budgeting, forecasting, invoice processing, expense review, financial \
            reporting, variance analysis, and compliance checks.",
    },
    DepartmentProfile {
        name: "Customer Service",
        keys: &["customer service", "customer support", "support"],
        context: "Ticket triage, response drafting, knowledge-base articles, sentiment \
            analysis, escalation handling, and customer satisfaction tracking.",
    },
    DepartmentProfile {
        name: "Operations",
        keys: &["operations", "ops", "logistics", "supply chain"],
        context: "Process documentation, scheduling, inventory and supply chain \
            planning, vendor management, and operational reporting.",
    },
    DepartmentProfile {
        name: "IT",
        keys: &["it", "information technology"],
        context: "Help-desk requests, system documentation, incident reports, access \
            management, scripting and automation, and security awareness.",
    },
    DepartmentProfile {
        name: "Engineering",
        keys: &["engineering", "software", "development"],
        context: "Code review, technical documentation, test generation, debugging \
            assistance, architecture notes, and release planning.",
    },
    DepartmentProfile {
        name: "Legal",
        keys: &["legal", "compliance"],
        context: "Contract review, clause comparison, policy drafting, regulatory \
            research, and compliance checklists.",
    },
    DepartmentProfile {
        name: "Product",
        keys: &["product", "product management"],
        context: "User research synthesis, requirement writing, roadmap prioritisation, \
            competitive analysis, and release notes.",
    },
];

fn normalize(department: &str) -> String {
    department.trim().to_lowercase()
}

/// Finds a profile by exact key, then by substring containment either way.
pub fn find_department(department: &str) -> Option<&'static DepartmentProfile> {
    let wanted = normalize(department);
    if wanted.is_empty() {
        return None;
    }

    if let Some(profile) = find_exact(&wanted) {
        return Some(profile);
    }

    if wanted.chars().count() < MIN_CONTAINMENT_LEN {
        return None;
    }
    DEPARTMENTS.iter().find(|profile| {
        profile.keys.iter().any(|key| {
            key.chars().count() >= MIN_CONTAINMENT_LEN
                && (wanted.contains(key) || key.contains(wanted.as_str()))
        })
    })
}

/// Exact, case-insensitive match against display names and keys only.
pub fn find_known_department(department: &str) -> Option<&'static DepartmentProfile> {
    find_exact(&normalize(department))
}

fn find_exact(wanted: &str) -> Option<&'static DepartmentProfile> {
    DEPARTMENTS.iter().find(|profile| {
        profile.name.to_lowercase() == wanted || profile.keys.iter().any(|key| *key == wanted)
    })
}

/// Domain context for the instruction; the generic text when nothing matches.
pub fn department_context(department: &str) -> &'static str {
    find_department(department)
        .map(|profile| profile.context)
        .unwrap_or(GENERIC_CONTEXT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_is_case_insensitive() {
        assert_eq!(find_department("  MARKETING ").unwrap().name, "Marketing");
        assert_eq!(find_department("hr").unwrap().name, "Human Resources");
        assert_eq!(find_department("IT").unwrap().name, "IT");
    }

    #[test]
    fn test_containment_match_either_direction() {
        assert_eq!(
            find_department("Digital Marketing Team").unwrap().name,
            "Marketing"
        );
        assert_eq!(find_department("fin").unwrap().name, "Finance");
    }

    #[test]
    fn test_short_aliases_do_not_match_inside_words() {
        // "editorial" contains "it", "chrome" contains "hr"
        assert!(find_department("editorial").is_none());
        assert!(find_department("chrome").is_none());
    }

    #[test]
    fn test_unknown_department_gets_generic_context() {
        assert_eq!(department_context("Astronaut Corps"), GENERIC_CONTEXT);
    }

    #[test]
    fn test_known_department_context_is_specific() {
        assert!(department_context("Legal").contains("Contract review"));
    }

    #[test]
    fn test_find_known_department_requires_exact_name() {
        assert!(find_known_department("customer service").is_some());
        assert!(find_known_department("Digital Marketing Team").is_none());
    }

    #[test]
    fn test_every_key_is_lowercase_and_trimmed() {
        for profile in DEPARTMENTS {
            for key in profile.keys {
                assert_eq!(*key, key.trim().to_lowercase());
            }
        }
    }
}
