use crate::candidate::Candidate;
use crate::error::DiscoveryError;
use crate::signature::Signature;

/// Score `candidate` against `signature`. Zero means disqualified; higher
/// positive values are better matches. The individual constants below are
/// load-bearing: callers compare scores across the whole tree, so changing
/// one tier's weight would silently re-rank every existing signature.
pub fn score(candidate: &Candidate, signature: &Signature) -> Result<f64, DiscoveryError> {
    if !signature.kind.matches(candidate.kind) {
        return Ok(0.0);
    }

    let name_score = name_score(&candidate.name, signature)?;
    if name_score == 0.0 {
        return Ok(0.0);
    }
    let mut total = name_score;

    if !signature.methods.is_empty() {
        let matches = signature.methods.iter().filter(|m| candidate.methods.iter().any(|cm| cm == *m)).count();
        if matches != signature.methods.len() {
            let ratio = matches as f64 / signature.methods.len() as f64;
            if ratio < 0.5 {
                return Ok(0.0);
            }
            total += 0.2 * ratio;
        } else {
            total += 0.3;
        }
    }

    if !signature.decorators.is_empty() {
        let matches = signature.decorators.iter().filter(|d| candidate.decorators.iter().any(|cd| cd == *d)).count();
        if matches != signature.decorators.len() {
            return Ok(0.0);
        }
        total += 0.05;
    }

    if !signature.bases.is_empty() {
        let matches = signature.bases.iter().filter(|b| candidate.bases.iter().any(|cb| cb == *b)).count();
        if matches != signature.bases.len() {
            return Ok(0.0);
        }
        total += 0.1;
    }

    if !signature.docstring_contains.is_empty() {
        let docstring = candidate.docstring.as_deref().unwrap_or_default().to_lowercase();
        let matches = signature.docstring_contains.iter().filter(|fragment| docstring.contains(&fragment.to_lowercase())).count();
        total += 0.02 * matches as f64;
    }

    if let Some(module) = &signature.module {
        if &candidate.module != module {
            return Ok(0.0);
        }
        total += 0.1;
    } else if signature.module_pattern.is_some() {
        if !signature.module_regex()?.is_match(&candidate.module) {
            return Ok(0.0);
        }
        total += 0.05;
    }

    let file_stem = candidate.file_path.file_stem().map(|s| s.to_string_lossy().to_lowercase()).unwrap_or_default();
    if file_stem == signature.name.to_lowercase() {
        total += 0.02;
    }

    Ok(total)
}

fn name_score(candidate_name: &str, signature: &Signature) -> Result<f64, DiscoveryError> {
    if signature.regex {
        return Ok(if signature.name_regex()?.is_match(candidate_name) { 0.6 } else { 0.0 });
    }

    let (candidate, target): (String, String) = if signature.case_sensitive {
        (candidate_name.to_string(), signature.name.clone())
    } else {
        (candidate_name.to_lowercase(), signature.name.to_lowercase())
    };

    if candidate == target {
        Ok(0.7)
    } else if candidate.starts_with(&target) {
        Ok(0.5)
    } else if candidate.ends_with(&target) {
        Ok(0.4)
    } else if candidate.contains(&target) {
        Ok(0.3)
    } else {
        Ok(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::CandidateKind;
    use crate::signature::Kind;
    use std::path::PathBuf;

    fn candidate(name: &str) -> Candidate {
        Candidate {
            name: name.to_string(),
            kind: CandidateKind::Class,
            module: "pkg.widgets".to_string(),
            file_path: PathBuf::from("pkg/widgets.py"),
            lineno: 1,
            methods: vec!["spin".to_string(), "stop".to_string()],
            decorators: vec!["dataclass".to_string()],
            bases: vec!["Base".to_string()],
            docstring: Some("A small widget.".to_string()),
        }
    }

    #[test]
    fn exact_name_match_scores_highest_name_tier() {
        let sig = Signature::new("Widget");
        let c = candidate("Widget");
        assert_eq!(score(&c, &sig).unwrap(), 0.7);
    }

    #[test]
    fn kind_mismatch_disqualifies() {
        let sig = Signature::new("Widget").kind(Kind::Function);
        let c = candidate("Widget");
        assert_eq!(score(&c, &sig).unwrap(), 0.0);
    }

    #[test]
    fn partial_method_match_below_half_disqualifies() {
        let sig = Signature::new("Widget").methods(["spin", "stop", "rotate", "tilt"]);
        let c = candidate("Widget");
        assert_eq!(score(&c, &sig).unwrap(), 0.0);
    }

    #[test]
    fn full_method_match_adds_bonus() {
        let sig = Signature::new("Widget").methods(["spin", "stop"]);
        let c = candidate("Widget");
        assert_eq!(score(&c, &sig).unwrap(), 0.7 + 0.3);
    }

    #[test]
    fn missing_required_decorator_disqualifies() {
        let sig = Signature::new("Widget").decorators(["frozen"]);
        let c = candidate("Widget");
        assert_eq!(score(&c, &sig).unwrap(), 0.0);
    }

    #[test]
    fn exact_module_and_pattern_bonuses_are_mutually_exclusive() {
        let c = candidate("Widget");
        let exact = Signature::new("Widget").module("pkg.widgets");
        assert_eq!(score(&c, &exact).unwrap(), 0.7 + 0.1);

        let pattern = Signature::new("Widget").module_pattern("^pkg\\.");
        assert_eq!(score(&c, &pattern).unwrap(), 0.7 + 0.05);
    }

    #[test]
    fn docstring_fragment_bonus_is_additive_per_fragment() {
        let sig = Signature::new("Widget").docstring_contains(["small", "widget"]);
        let c = candidate("Widget");
        assert!((score(&c, &sig).unwrap() - (0.7 + 0.04)).abs() < 1e-9);
    }

    #[test]
    fn duplicate_docstring_fragments_do_not_inflate_score() {
        let sig = Signature::new("Widget").docstring_contains(["small", "small"]);
        let c = candidate("Widget");
        assert!((score(&c, &sig).unwrap() - (0.7 + 0.02)).abs() < 1e-9);
    }

    #[test]
    fn regex_name_match_scores_point_six() {
        let sig = Signature::new("^Wid.*$").regex(true);
        let c = candidate("Widget");
        assert_eq!(score(&c, &sig).unwrap(), 0.6);
    }

    #[test]
    fn file_stem_equal_to_name_adds_small_bonus() {
        let sig = Signature::new("widgets");
        let mut c = candidate("widgets");
        c.file_path = PathBuf::from("pkg/widgets.py");
        assert!((score(&c, &sig).unwrap() - (0.7 + 0.02)).abs() < 1e-9);
    }
}
