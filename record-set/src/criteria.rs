use crate::ordinals::Ordinals;
use crate::record::Record;
use std::fmt;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CriteriaError {
    /// A key with no digits following it, e.g. a trailing `"s"`.
    EmptyValue { key: char },
    /// A key this grammar doesn't recognize. The frozen key set is `a`,
    /// `i`, `g`, `n`, `m`, `s`.
    UnknownKey { key: char },
    /// A value too large to fit the field it addresses.
    ValueOverflow { key: char, value: String },
}

impl fmt::Display for CriteriaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CriteriaError::EmptyValue { key } => {
                write!(f, "query criteria key {key:?} has no digits after it")
            }
            CriteriaError::UnknownKey { key } => {
                write!(f, "query criteria key {key:?} is not recognized")
            }
            CriteriaError::ValueOverflow { key, value } => {
                write!(f, "query criteria key {key:?} has value {value:?} that is too large")
            }
        }
    }
}

impl std::error::Error for CriteriaError {}

/// A conjunction of equality predicates parsed from a `q-` query name's
/// encoded leftmost label. The frozen key set is `a`, `i`, `g`, `n`, `m`,
/// `s` (see [`Criteria`]'s field list).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Criteria {
    az_id: Option<String>,
    instance_index: Option<String>,
    group_ordinal: Option<u32>,
    network_ordinal: Option<u32>,
    deployment_ordinal: Option<u32>,
    status: Option<u32>,
}

impl Criteria {
    /// True iff `record` satisfies every predicate this criteria carries.
    /// A criteria with no predicates (an empty encoded segment) matches
    /// every record.
    #[must_use]
    pub fn matches(&self, record: &Record, ordinals: &Ordinals) -> bool {
        if let Some(az_id) = &self.az_id {
            if record.az_id.as_deref() != Some(az_id.as_str()) {
                return false;
            }
        }
        if let Some(instance_index) = &self.instance_index {
            if record.instance_index.as_deref() != Some(instance_index.as_str()) {
                return false;
            }
        }
        if let Some(group_ordinal) = self.group_ordinal {
            if ordinals.group_ordinal(&record.instance_group) != Some(group_ordinal) {
                return false;
            }
        }
        if let Some(network_ordinal) = self.network_ordinal {
            if ordinals.network_ordinal(&record.network) != Some(network_ordinal) {
                return false;
            }
        }
        if let Some(deployment_ordinal) = self.deployment_ordinal {
            if ordinals.deployment_ordinal(&record.deployment) != Some(deployment_ordinal) {
                return false;
            }
        }
        if let Some(status) = self.status {
            // This core carries no live health state (health checking is a
            // separate out-of-scope subsystem); every known record is
            // treated as healthy.
            if status != 0 {
                return false;
            }
        }
        true
    }
}

/// Parses the encoded segment of a `q-` query name, e.g. `"s0"` or
/// `"a1i3"`, into a [`Criteria`].
///
/// # Errors
/// Returns [`CriteriaError::UnknownKey`] for any key outside `a`, `i`,
/// `g`, `n`, `m`, `s`, and [`CriteriaError::EmptyValue`] for a key with no
/// digits following it.
pub fn parse(encoded: &str) -> Result<Criteria, CriteriaError> {
    let mut criteria = Criteria::default();
    let mut chars = encoded.char_indices().peekable();
    while let Some((_, key)) = chars.next() {
        let mut value = String::new();
        while let Some(&(_, c)) = chars.peek() {
            if c.is_ascii_digit() {
                value.push(c);
                chars.next();
            } else {
                break;
            }
        }
        if value.is_empty() {
            return Err(CriteriaError::EmptyValue { key });
        }
        match key {
            'a' => criteria.az_id = Some(value),
            'i' => criteria.instance_index = Some(value),
            'g' => criteria.group_ordinal = Some(parse_ordinal(key, value)?),
            'n' => criteria.network_ordinal = Some(parse_ordinal(key, value)?),
            'm' => criteria.deployment_ordinal = Some(parse_ordinal(key, value)?),
            's' => criteria.status = Some(parse_ordinal(key, value)?),
            key => return Err(CriteriaError::UnknownKey { key }),
        }
    }
    Ok(criteria)
}

fn parse_ordinal(key: char, value: String) -> Result<u32, CriteriaError> {
    value
        .parse()
        .map_err(|_| CriteriaError::ValueOverflow { key, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_encoding_matches_everything() {
        let criteria = parse("").unwrap();
        assert_eq!(Criteria::default(), criteria);
    }

    #[test]
    fn parses_a_single_segment() {
        let criteria = parse("s0").unwrap();
        assert_eq!(Some(0), criteria.status);
    }

    #[test]
    fn parses_multiple_segments() {
        let criteria = parse("a1i3").unwrap();
        assert_eq!(Some("1".to_string()), criteria.az_id);
        assert_eq!(Some("3".to_string()), criteria.instance_index);
    }

    #[test]
    fn rejects_unknown_keys() {
        assert_eq!(
            Err(CriteriaError::UnknownKey { key: 'z' }),
            parse("z1")
        );
    }

    #[test]
    fn rejects_a_key_with_no_digits() {
        assert_eq!(Err(CriteriaError::EmptyValue { key: 's' }), parse("s"));
    }

    #[test]
    fn rejects_a_trailing_key_with_no_digits() {
        assert_eq!(Err(CriteriaError::EmptyValue { key: 'a' }), parse("s0a"));
    }

    #[test]
    fn status_other_than_zero_never_matches() {
        use dns_name::Fqdn;
        let record = Record {
            id: "i1".to_string(),
            instance_group: "g".to_string(),
            network: "n".to_string(),
            deployment: "d".to_string(),
            ip: "10.0.0.1".to_string(),
            domain: Fqdn::new("bosh."),
            az_id: None,
            instance_index: None,
        };
        let ordinals = Ordinals::build(std::slice::from_ref(&record));
        assert!(parse("s0").unwrap().matches(&record, &ordinals));
        assert!(!parse("s1").unwrap().matches(&record, &ordinals));
    }
}
