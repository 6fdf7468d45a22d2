use crate::pipeline::lexicon::Department;

use super::keywords::KeywordSet;

pub(crate) struct DepartmentMatch<'a> {
    pub department: &'a Department,
    pub match_count: usize,
}

pub(crate) fn keyword_overlap(keywords: &KeywordSet, department: &Department) -> usize {
    let department_keywords: Vec<String> = department
        .keywords
        .iter()
        .map(|keyword| keyword.to_lowercase())
        .collect();

    keywords
        .iter()
        .filter(|keyword| department_keywords.iter().any(|candidate| candidate == keyword))
        .count()
}

/// Department with the strictly highest overlap. Ties keep the earlier candidate.
pub(crate) fn best_match<'a>(
    keywords: &KeywordSet,
    candidates: &'a [Department],
) -> Option<DepartmentMatch<'a>> {
    if keywords.is_empty() {
        return None;
    }

    let mut best: Option<DepartmentMatch<'a>> = None;
    for department in candidates {
        let match_count = keyword_overlap(keywords, department);
        let current = best.as_ref().map(|found| found.match_count).unwrap_or(0);
        if match_count > current {
            best = Some(DepartmentMatch {
                department,
                match_count,
            });
        }
    }

    best
}

pub(crate) fn confidence(keywords: &KeywordSet, match_count: usize) -> u8 {
    if keywords.is_empty() || match_count == 0 {
        return 0;
    }

    let ratio = match_count as f64 / keywords.len().max(1) as f64 * 100.0;
    ratio.min(100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn department(name: &str, keywords: &[&str]) -> Department {
        Department {
            id: None,
            name: name.to_string(),
            display_name: None,
            keywords: keywords.iter().map(|keyword| keyword.to_string()).collect(),
            description: None,
        }
    }

    #[test]
    fn ties_resolve_to_first_candidate() {
        let keywords: KeywordSet = ["road", "tender"].into_iter().collect();
        let candidates = vec![
            department("Municipal", &["road"]),
            department("PWD", &["tender"]),
        ];

        let found = best_match(&keywords, &candidates).expect("match found");
        assert_eq!(found.department.name, "Municipal");
        assert_eq!(found.match_count, 1);
    }

    #[test]
    fn department_keywords_compare_case_insensitively() {
        let keywords: KeywordSet = ["hospital"].into_iter().collect();
        let candidates = vec![department("Health", &["Hospital"])];
        assert_eq!(keyword_overlap(&keywords, &candidates[0]), 1);
    }

    #[test]
    fn no_overlap_means_no_match() {
        let keywords: KeywordSet = ["weather"].into_iter().collect();
        let candidates = vec![department("Health", &["hospital"])];
        assert!(best_match(&keywords, &candidates).is_none());
    }

    #[test]
    fn confidence_rounds_ratio() {
        let keywords: KeywordSet = ["road", "repair", "contractor"].into_iter().collect();
        assert_eq!(confidence(&keywords, 2), 67);
        assert_eq!(confidence(&keywords, 3), 100);
        assert_eq!(confidence(&keywords, 0), 0);
        assert_eq!(confidence(&KeywordSet::new(), 4), 0);
    }
}
